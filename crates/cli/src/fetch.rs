use jbridge_api::{ClassSource, FetchResult};
use jbridge_runtime::ClasspathConfig;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(
    config: ClasspathConfig,
    class_name: &str,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    jbridge_runtime::startup();
    let index = config.build_index();
    let bytes = lookup(&index, class_name)?;

    match output {
        Some(path) => {
            write_file(&path, &bytes)?;
            info!("Wrote {} ({} bytes) to {}", class_name, bytes.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(&bytes)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn lookup(
    source: &dyn ClassSource,
    class_name: &str,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match source.find_class(class_name) {
        FetchResult::Found(bytes) => Ok(bytes),
        FetchResult::NotFound => Err(format!("class {} not found", class_name).into()),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(bytes)?;
    file.flush()
}
