use std::fs;

use snapsht_client::{artifact_filename, ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("captures");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn saving_twice_replaces_the_artifact() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let filename = artifact_filename(Some("s1.png"), "/api/screenshot/s1");

    let first = writer.write(&filename, &[1, 2, 3]).unwrap();
    assert_eq!(first.file_name().unwrap(), "s1.png");
    assert_eq!(fs::read(&first).unwrap(), vec![1, 2, 3]);

    let second = writer.write(&filename, &[9]).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), vec![9]);
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("s1.png", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("s1.png").exists());
}
