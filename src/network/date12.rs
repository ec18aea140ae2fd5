/// Plain-text pair lists: one `date12` per line, first column only.
use std::path::{Path, PathBuf};

use super::date::normalize_date12;
use super::errors::NetworkError;

/// Suffix appended to the input stem by `--list`.
pub const LIST_SUFFIX: &str = "_date12_list.txt";

/// Read a pair list file, normalizing every entry.
///
/// Blank lines and `#` comments are skipped. Extra columns after the first
/// (e.g. a coherence value) are ignored.
///
/// # Errors
///
/// Returns `NetworkError::Io` if unreadable, `NetworkError::Parse` for a bad
/// entry.
pub fn read_date12_file(path: &Path) -> Result<Vec<String>, NetworkError> {
    let text = std::fs::read_to_string(path).map_err(|e| NetworkError::io(path, e))?;
    let mut list = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let Some(first) = line.split_whitespace().next() else {
            continue;
        };
        if first.starts_with('#') {
            continue;
        }
        let date12 = normalize_date12(first).map_err(|e| NetworkError::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            message: e.to_string(),
        })?;
        list.push(date12);
    }
    Ok(list)
}

/// Write one date12 per line.
///
/// # Errors
///
/// Returns `NetworkError::Io` if the file cannot be written.
pub fn write_date12_file(path: &Path, date12_list: &[String]) -> Result<(), NetworkError> {
    let mut text = date12_list.join("\n");
    text.push('\n');
    std::fs::write(path, text).map_err(|e| NetworkError::io(path, e))
}

/// Path of the saved pair list for an input file: `<stem>_date12_list.txt`
/// beside the input.
#[must_use]
pub fn list_file_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{LIST_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_first_column_and_normalize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ifgram_list.txt");
        std::fs::write(
            &path,
            "# pairs\n070709-100901  0.83\n20070709_20101017\n\n070824-071009\n",
        )
        .unwrap();
        let list = read_date12_file(&path).unwrap();
        assert_eq!(list, vec!["070709-100901", "070709-101017", "070824-071009"]);
    }

    #[test]
    fn test_bad_entry_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        std::fs::write(&path, "070709-100901\nnot-a-pair\n").unwrap();
        assert!(matches!(
            read_date12_file(&path),
            Err(NetworkError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let list = vec!["070709-100901".to_owned(), "070824-071009".to_owned()];
        write_date12_file(&path, &list).unwrap();
        assert_eq!(read_date12_file(&path).unwrap(), list);
    }

    #[test]
    fn test_list_file_path() {
        assert_eq!(
            list_file_path(Path::new("/data/unwrapIfgram.h5")),
            PathBuf::from("/data/unwrapIfgram_date12_list.txt")
        );
    }
}
