use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// What the device should download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadTarget {
    /// Passed to the device as-is
    Uri(String),
    /// Local file uploaded to the device
    File(PathBuf),
}

impl DownloadTarget {
    /// Classifies by prefix only: `http:` and `magnet:` are URIs,
    /// anything else is a local path.
    #[must_use]
    pub fn classify(input: &str) -> Self {
        if input.starts_with("http:") || input.starts_with("magnet:") {
            DownloadTarget::Uri(input.to_string())
        } else {
            DownloadTarget::File(PathBuf::from(input))
        }
    }
}

/// A local file read into memory, ready to upload
#[derive(Debug)]
pub struct FileUpload {
    pub name: String,
    pub data: Vec<u8>,
}

impl FileUpload {
    /// Reads the file and keeps its basename as the upload name
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the path has no file name
    pub fn read(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("Path has no file name: {}", path.display()))?;
        let data =
            fs::read(path).with_context(|| format!("Could not read file: {}", path.display()))?;
        Ok(Self { name, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_classify_uris() {
        assert_eq!(
            DownloadTarget::Uri("http://example.com/file.iso".into()),
            DownloadTarget::classify("http://example.com/file.iso")
        );
        assert_eq!(
            DownloadTarget::Uri("magnet:?xt=urn:btih:abc".into()),
            DownloadTarget::classify("magnet:?xt=urn:btih:abc")
        );
    }

    #[test]
    fn test_classify_everything_else_as_file() {
        for input in ["/tmp/foo.torrent", "foo.torrent", "https://example.com/a", "ftp://host/a", ""] {
            assert_eq!(
                DownloadTarget::File(PathBuf::from(input)),
                DownloadTarget::classify(input)
            );
        }
    }

    #[test]
    fn test_read_file_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.torrent");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"d8:announce0:e").unwrap();

        let upload = FileUpload::read(&path).unwrap();
        assert_eq!("foo.torrent", upload.name);
        assert_eq!(b"d8:announce0:e".to_vec(), upload.data);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileUpload::read(&dir.path().join("missing.torrent"));
        assert!(result.is_err());
    }
}
