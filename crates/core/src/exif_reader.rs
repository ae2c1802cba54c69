use crate::metadata::{MetadataError, MetadataSource};
use exif::{In, Reader, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads EXIF fields by tag name. The container is decoded on every lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataSource;

impl MetadataSource for ExifMetadataSource {
    fn get(&self, path: &Path, field: &str) -> Result<String, MetadataError> {
        let exif = read_exif(path)?;
        find_field_value(&exif, field).ok_or_else(|| MetadataError::FieldNotFound {
            path: path.to_path_buf(),
            field: field.to_string(),
        })
    }
}

fn read_exif(path: &Path) -> Result<exif::Exif, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buf = BufReader::new(file);
    Reader::new()
        .read_from_container(&mut buf)
        .map_err(|err| MetadataError::Decode {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}

fn find_field_value(exif: &exif::Exif, name: &str) -> Option<String> {
    let matches = |field: &&exif::Field| field.tag.to_string() == name;
    let field = exif
        .fields()
        .filter(matches)
        .find(|field| field.ifd_num == In::PRIMARY)
        .or_else(|| exif.fields().find(matches))?;

    let value = match &field.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|raw| String::from_utf8_lossy(raw).to_string())
            .unwrap_or_default(),
        _ => field.display_value().with_unit(exif).to_string(),
    };
    Some(
        value
            .trim_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string(),
    )
}
