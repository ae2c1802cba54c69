use crate::timestamp::Timestamp;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode metadata of {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("field {field} not present in {path}")]
    FieldNotFound { path: PathBuf, field: String },
    #[error("field {field} is not a timestamp: {value:?}")]
    TimestampParse { field: String, value: String },
}

/// Per-file named fields, such as EXIF tags.
pub trait MetadataSource {
    fn get(&self, path: &Path, field: &str) -> Result<String, MetadataError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub name: String,
    /// Without the leading dot; empty when the file has none.
    pub extension: String,
    pub size: u64,
    pub modified: Timestamp,
}

pub trait FileAttributes {
    fn stat(&self, path: &Path) -> Result<FileStat, MetadataError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileAttributes;

impl FileAttributes for FsFileAttributes {
    fn stat(&self, path: &Path) -> Result<FileStat, MetadataError> {
        let io_err = |source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        };
        let meta = fs::metadata(path).map_err(io_err)?;
        let modified = meta.modified().map_err(io_err)?;
        let modified: DateTime<Local> = DateTime::from(modified);

        Ok(FileStat {
            name: path
                .file_name()
                .map(|v| v.to_string_lossy().to_string())
                .unwrap_or_default(),
            extension: path
                .extension()
                .map(|v| v.to_string_lossy().to_string())
                .unwrap_or_default(),
            size: meta.len(),
            modified: modified.fixed_offset(),
        })
    }
}

impl<T: MetadataSource + ?Sized> MetadataSource for &T {
    fn get(&self, path: &Path, field: &str) -> Result<String, MetadataError> {
        (**self).get(path, field)
    }
}

impl<T: FileAttributes + ?Sized> FileAttributes for &T {
    fn stat(&self, path: &Path) -> Result<FileStat, MetadataError> {
        (**self).stat(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fs_stat_reports_name_extension_and_size() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("IMG_0001.JPG");
        fs::write(&path, b"12345").expect("write");

        let stat = FsFileAttributes.stat(&path).expect("stat");
        assert_eq!(stat.name, "IMG_0001.JPG");
        assert_eq!(stat.extension, "JPG");
        assert_eq!(stat.size, 5);
    }

    #[test]
    fn fs_stat_without_extension_is_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("README");
        fs::write(&path, b"").expect("write");

        let stat = FsFileAttributes.stat(&path).expect("stat");
        assert_eq!(stat.extension, "");
    }

    #[test]
    fn fs_stat_missing_file_is_io_error() {
        let dir = tempdir().expect("tempdir");
        let err = FsFileAttributes
            .stat(&dir.path().join("missing.jpg"))
            .expect_err("must fail");
        assert!(matches!(err, MetadataError::Io { .. }));
    }
}
