//! Whole sessions against a class server backed by a real classpath index.

use jbridge_api::PATH_SEPARATOR;
use jbridge_classpath::ClasspathIndex;
use jbridge_core::protocol::{ClassServer, Framing, STATUS_END, STATUS_OK, ServerConfig};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write_class(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn create_jar(path: &Path, entries: &[(&str, &[u8])]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

fn server_for<P: AsRef<Path>>(paths: &[P]) -> ClassServer {
    let joined = paths
        .iter()
        .map(|p| p.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(&PATH_SEPARATOR.to_string());
    ClassServer::new(Arc::new(ClasspathIndex::build([joined])))
}

fn session(server: &ClassServer, input: &str) -> Vec<u8> {
    let mut out = Vec::new();
    server
        .serve(Cursor::new(input.as_bytes().to_vec()), &mut out)
        .unwrap();
    out
}

fn found(bytes: &[u8]) -> Vec<u8> {
    let mut frame = vec![STATUS_OK];
    frame.extend_from_slice(bytes);
    frame
}

#[test]
fn test_fetch_found_then_missing() {
    let temp = TempDir::new().unwrap();
    let classes = temp.path().join("classes");
    write_class(&classes, "a/B.class", b"0123456789");

    let server = server_for(&[&classes]);
    let out = session(&server, "Ra/B\nRx/Y\nQ\n");

    let mut expected = found(b"0123456789");
    expected.push(STATUS_END);
    assert_eq!(out, expected);
}

#[test]
fn test_newest_entry_overrides() {
    let temp = TempDir::new().unwrap();
    let old = temp.path().join("old");
    let new = temp.path().join("new");
    write_class(&old, "a/B.class", b"old");
    write_class(&new, "a/B.class", b"new");

    let server = server_for(&[&old, &new]);
    assert_eq!(session(&server, "Ra/B\n"), found(b"new"));
}

#[test]
fn test_package_from_archive() {
    let temp = TempDir::new().unwrap();
    let jar = temp.path().join("lib.jar");
    create_jar(
        &jar,
        &[
            ("pkg/One.class", b"one"),
            ("pkg/Two.class", b"two"),
            ("pkg/inner/Three.class", b"three"),
            ("pkg/readme.txt", b"text"),
        ],
    );

    let server = server_for(&[&jar]);
    let out = session(&server, "Ppkg\n");

    let mut one_two = found(b"one");
    one_two.extend(found(b"two"));
    one_two.push(STATUS_END);
    let mut two_one = found(b"two");
    two_one.extend(found(b"one"));
    two_one.push(STATUS_END);
    assert!(out == one_two || out == two_one, "unexpected output {out:?}");
}

#[test]
fn test_package_shadowed_class_sent_once() {
    let temp = TempDir::new().unwrap();
    let jar = temp.path().join("base.jar");
    let patch = temp.path().join("patch");
    create_jar(&jar, &[("pkg/A.class", b"base"), ("pkg/B.class", b"b")]);
    write_class(&patch, "pkg/A.class", b"patched");

    let server = server_for(&[&jar, &patch]);
    let out = session(&server, "Ppkg\nPpkg\n");

    let mut listing = found(b"patched");
    listing.extend(found(b"b"));
    listing.push(STATUS_END);
    let mut expected = listing.clone();
    expected.extend(listing);
    assert_eq!(out, expected);
}

#[test]
fn test_empty_line_produces_nothing() {
    let temp = TempDir::new().unwrap();
    let server = server_for(&[temp.path()]);
    assert_eq!(session(&server, "\n?\n"), vec![STATUS_OK]);
}

#[test]
fn test_corrupt_archive_does_not_abort() {
    let temp = TempDir::new().unwrap();
    let good = temp.path().join("good");
    let bad = temp.path().join("bad.jar");
    write_class(&good, "a/B.class", b"good");
    std::fs::write(&bad, b"PK\x03\x04 definitely not a zip").unwrap();

    let server = server_for(&[&good, &bad]);
    let out = session(&server, "Ra/B\nPa\n?\n");

    let mut expected = found(b"good");
    expected.extend(found(b"good"));
    expected.push(STATUS_END);
    expected.push(STATUS_OK);
    assert_eq!(out, expected);
}

#[test]
fn test_length_prefixed_session() {
    let temp = TempDir::new().unwrap();
    let classes = temp.path().join("classes");
    write_class(&classes, "a/B.class", b"abcd");

    let server = server_for(&[&classes]).with_config(ServerConfig {
        framing: Framing::LengthPrefixed,
        strict: false,
    });
    let out = session(&server, "Ra/B\nRa/C\n");
    assert_eq!(
        out,
        vec![STATUS_OK, 0, 0, 0, 4, b'a', b'b', b'c', b'd', STATUS_END]
    );
}
