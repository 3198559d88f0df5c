//! Delivery of server-produced files to the user.

use std::path::{Path, PathBuf};

/// Somewhere a finished file can be handed to the user.
///
/// Implementations take ownership of the bytes and must not keep them once
/// `offer` returns.
pub trait DownloadSink {
    fn offer(&mut self, file_name: &str, contents: Vec<u8>) -> std::io::Result<PathBuf>;
}

/// Writes offered files into one directory, replacing same-named files.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectoryDownloads {
    fn offer(&mut self, file_name: &str, contents: Vec<u8>) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(safe_file_name(file_name));
        std::fs::write(&path, &contents)?;
        drop(contents);
        log::info!("Saved {}", path.display());
        Ok(path)
    }
}

/// Model names are user-chosen; keep them from escaping the directory.
fn safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect();
    match cleaned.trim_start_matches('.') {
        "" => "download".to_string(),
        rest => rest.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectoryDownloads::new(dir.path().join("downloads"));

        let path = sink.offer("m1_predictions.csv", b"y\n1\n".to_vec()).unwrap();
        assert_eq!(path, dir.path().join("downloads").join("m1_predictions.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"y\n1\n");
    }

    #[test]
    fn test_file_name_cannot_escape() {
        assert_eq!(safe_file_name("../etc/passwd"), "_etc_passwd");
        assert_eq!(safe_file_name("a/b_predictions.csv"), "a_b_predictions.csv");
        assert_eq!(safe_file_name(".."), "download");
    }
}
