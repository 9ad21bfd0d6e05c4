use jbridge_api::{ClasspathEntry, EntryKind};
use jbridge_classpath::ClasspathIndex;
use jbridge_runtime::ClasspathConfig;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct EntryReport<'a> {
    path: &'a ClasspathEntry,
    /// `None` when the entry is missing or unrecognised
    kind: Option<EntryKind>,
}

pub fn run(config: ClasspathConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let index = config.build_index();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        print_json(&index, &mut out)?;
    } else {
        print_index(&index, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn reports(index: &ClasspathIndex) -> Vec<EntryReport<'_>> {
    index
        .entries()
        .map(|entry| EntryReport {
            path: entry,
            kind: ClasspathIndex::entry_kind(entry),
        })
        .collect()
}

/// One line per entry in construction order, so the last line wins lookups.
fn print_index<W: Write>(index: &ClasspathIndex, out: &mut W) -> std::io::Result<()> {
    if index.is_empty() {
        writeln!(out, "(empty classpath)")?;
        return Ok(());
    }
    for report in reports(index) {
        let kind = report.kind.map(|kind| kind.as_str()).unwrap_or("missing");
        writeln!(out, "{:<14}{}", kind, report.path)?;
    }
    Ok(())
}

fn print_json<W: Write>(index: &ClasspathIndex, out: &mut W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &reports(index))?;
    writeln!(out).map_err(serde_json::Error::io)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> (tempfile::TempDir, String, String, ClasspathIndex) {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().to_string_lossy().into_owned();
        let missing = temp.path().join("nope").to_string_lossy().into_owned();
        let separator = jbridge_api::PATH_SEPARATOR.to_string();
        let index = ClasspathIndex::build([[dir.clone(), missing.clone()].join(&separator)]);
        (temp, dir, missing, index)
    }

    #[test]
    fn test_print_index() {
        let (_temp, dir, missing, index) = sample_index();

        let mut out = Vec::new();
        print_index(&index, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("directory"));
        assert!(lines[0].ends_with(&dir));
        assert!(lines[1].starts_with("missing"));
        assert!(lines[1].ends_with(&missing));
    }

    #[test]
    fn test_print_empty_index() {
        let mut out = Vec::new();
        print_index(&ClasspathIndex::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "(empty classpath)\n");
    }

    #[test]
    fn test_print_json() {
        let (_temp, dir, missing, index) = sample_index();

        let mut out = Vec::new();
        print_json(&index, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(
            value,
            serde_json::json!([
                { "path": dir, "kind": "directory" },
                { "path": missing, "kind": null },
            ])
        );
    }
}
