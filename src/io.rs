use glob::{glob, Pattern};
use log::debug;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::ImageAnnotation;

/// List the `*.json` files directly inside `dirname`, sorted by path.
///
/// Sorting makes image and annotation ids independent of directory listing order.
pub fn discover_json_files(dirname: &Path) -> Result<Vec<PathBuf>> {
    if !dirname.is_dir() {
        return Err(Error::InvalidInput(format!(
            "the specified labelme directory does not exist or is not a directory: {}",
            dirname.display()
        )));
    }

    let pattern = format!("{}/*.json", Pattern::escape(&dirname.to_string_lossy()));
    let entries = glob(&pattern)
        .map_err(|e| Error::InvalidInput(format!("invalid glob pattern {}: {}", pattern, e)))?;

    let mut json_files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            Error::io(path, e.into_error())
        })?;
        if path.is_file() {
            json_files.push(path);
        }
    }
    json_files.sort();
    Ok(json_files)
}

/// Read and parse a single LabelMe JSON file.
/// The file is parsed from a buffered stream instead of being loaded whole.
pub fn read_and_parse_json(path: &Path) -> Result<ImageAnnotation> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let annotation = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        Error::MalformedRecord {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!("Parsed {}", path.display());
    Ok(annotation)
}

/// Serialize `value` as JSON, pretty-printed with four-space indentation unless `compact`
pub fn to_json_bytes<T: Serialize>(value: &T, compact: bool) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if compact {
        serde_json::to_writer(&mut buffer, value).map_err(Error::Serialize)?;
    } else {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        value.serialize(&mut serializer).map_err(Error::Serialize)?;
    }
    Ok(buffer)
}

/// One label per line, newline-terminated
pub fn label_file_bytes<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<u8> {
    let mut content = String::new();
    for label in labels {
        content.push_str(label);
        content.push('\n');
    }
    content.into_bytes()
}

/// Contents written to a temporary sibling of `path`, waiting to be renamed into place.
/// Dropping it without committing removes the temporary file.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.tmp_path);
    }
}

/// Write `bytes` next to `path` under a temporary name, creating parent directories as needed
pub fn stage_file(path: &Path, bytes: &[u8]) -> Result<StagedFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or_else(|| Error::InvalidInput(format!("not a file path: {}", path.display())))?;
    tmp_name.push(".tmp");
    let staged = StagedFile {
        path: path.to_path_buf(),
        tmp_path: path.with_file_name(tmp_name),
    };

    File::create(&staged.tmp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .map_err(|e| Error::io(&staged.tmp_path, e))?;
    Ok(staged)
}

/// Rename every staged file into place. If any rename fails, the files already
/// committed are removed again, so either all outputs exist or none do.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<()> {
    let mut committed: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for file in &staged {
        if let Err(e) = fs::rename(&file.tmp_path, &file.path) {
            for path in &committed {
                let _ = fs::remove_file(path);
            }
            return Err(Error::io(&file.path, e));
        }
        committed.push(file.path.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_json_files_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "c.txt", "a.jpg"] {
            fs::write(temp_dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested/d.json"), "{}").unwrap();

        let files = discover_json_files(temp_dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            discover_json_files(&missing),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_read_malformed_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, r#"{"imagePath": "a.jpg", "shapes": []}"#).unwrap();
        match read_and_parse_json(&path) {
            Err(Error::MalformedRecord { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let bytes = to_json_bytes(&serde_json::json!({ "a": [1] }), false).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\n    \"a\": [\n        1\n    ]\n}"
        );
        let compact = to_json_bytes(&serde_json::json!({ "a": [1] }), true).unwrap();
        assert_eq!(compact, b"{\"a\":[1]}");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out/nested/classes.txt");
        let staged = stage_file(&path, &label_file_bytes(["cat", "dog"])).unwrap();
        assert_eq!(staged.path(), path.as_path());
        assert!(!path.exists());

        commit_all(vec![staged]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "cat\ndog\n");
        assert!(!temp_dir.path().join("out/nested/classes.txt.tmp").exists());
    }

    #[test]
    fn test_dropped_stage_leaves_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("trainval.json");
        drop(stage_file(&path, b"{}").unwrap());
        assert!(!path.exists());
        assert!(!temp_dir.path().join("trainval.json.tmp").exists());
    }

    #[test]
    fn test_failed_commit_removes_earlier_outputs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let first = temp_dir.path().join("trainval.json");
        let second = temp_dir.path().join("classes.txt");
        let staged = vec![
            stage_file(&first, b"{}").unwrap(),
            stage_file(&second, b"cat\n").unwrap(),
        ];
        // A non-empty directory cannot be replaced by a file
        fs::create_dir(&second).unwrap();
        fs::write(second.join("keep"), "").unwrap();

        assert!(matches!(commit_all(staged), Err(Error::Io { .. })));
        assert!(!first.exists());
        assert!(!temp_dir.path().join("trainval.json.tmp").exists());
        assert!(!temp_dir.path().join("classes.txt.tmp").exists());
    }
}
