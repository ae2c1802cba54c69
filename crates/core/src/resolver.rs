use crate::date_index::DateIndexCollector;
use crate::metadata::{FileAttributes, MetadataError, MetadataSource};
use crate::tags::{parse_tag_group, TagReference};
use crate::timestamp::{
    format_timestamp, is_timestamp_field, parse_exif_timestamp, Timestamp, TimestampProperty,
};
use std::path::Path;
use tracing::trace;

/// Category reserved for file-system attributes and sequence counters.
pub const FILE_CATEGORY: &str = "File";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    File(FileTag),
    Metadata {
        field: String,
        property: TimestampProperty,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTag {
    Index,
    IndexByCaptureYear,
    IndexByCaptureMonth,
    IndexByCaptureDate,
    Extension,
    Size,
    Name,
    ModTime(TimestampProperty),
    Unknown,
}

impl TagReference {
    pub fn kind(&self) -> TagKind {
        if self.name == FILE_CATEGORY {
            return TagKind::File(self.file_tag());
        }
        TagKind::Metadata {
            field: self.name.clone(),
            property: TimestampProperty::parse(self.property(0)),
        }
    }

    fn file_tag(&self) -> FileTag {
        match self.property(0) {
            Some("Index") => FileTag::Index,
            Some("IndexByCaptureYear") => FileTag::IndexByCaptureYear,
            Some("IndexByCaptureMonth") => FileTag::IndexByCaptureMonth,
            Some("IndexByCaptureDate") => FileTag::IndexByCaptureDate,
            Some("Extension") => FileTag::Extension,
            Some("Size") => FileTag::Size,
            Some("Name") => FileTag::Name,
            Some("ModTime") => FileTag::ModTime(TimestampProperty::parse(self.property(1))),
            _ => FileTag::Unknown,
        }
    }
}

/// What the resolver knows about the file being rendered.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub path: &'a Path,
    pub capture_time: Option<&'a Timestamp>,
    pub collector: &'a DateIndexCollector,
}

pub struct TagResolver<'a> {
    metadata: &'a dyn MetadataSource,
    files: &'a dyn FileAttributes,
}

impl<'a> TagResolver<'a> {
    pub fn new(metadata: &'a dyn MetadataSource, files: &'a dyn FileAttributes) -> Self {
        Self { metadata, files }
    }

    /// Resolves a `|`-separated group. Alternatives are tried left to right and
    /// the last one that succeeds wins; if none do the value is empty.
    pub fn resolve_group(&self, raw_tag: &str, ctx: &FileContext<'_>) -> String {
        let mut value = String::new();
        for tag in parse_tag_group(raw_tag) {
            match self.resolve(&tag, ctx) {
                Ok(resolved) => value = resolved,
                Err(err) => {
                    trace!(
                        path = %ctx.path.display(),
                        tag = %tag.name,
                        %err,
                        "tag alternative skipped"
                    );
                }
            }
        }
        value
    }

    pub fn resolve(
        &self,
        tag: &TagReference,
        ctx: &FileContext<'_>,
    ) -> Result<String, MetadataError> {
        match tag.kind() {
            TagKind::File(file_tag) => self.resolve_file(file_tag, ctx),
            TagKind::Metadata { field, property } => {
                self.resolve_metadata(&field, property, ctx.path)
            }
        }
    }

    fn resolve_file(&self, tag: FileTag, ctx: &FileContext<'_>) -> Result<String, MetadataError> {
        let capture_index = |index: fn(&DateIndexCollector, &Timestamp) -> usize| {
            ctx.capture_time
                .map(|ts| index(ctx.collector, ts))
                .unwrap_or_default()
        };

        let value = match tag {
            FileTag::Index => format_index(ctx.collector.len()),
            FileTag::IndexByCaptureYear => {
                format_index(capture_index(DateIndexCollector::index_by_year))
            }
            FileTag::IndexByCaptureMonth => {
                format_index(capture_index(DateIndexCollector::index_by_month))
            }
            FileTag::IndexByCaptureDate => {
                format_index(capture_index(DateIndexCollector::index_by_day))
            }
            FileTag::Extension => self.files.stat(ctx.path)?.extension,
            FileTag::Size => self.files.stat(ctx.path)?.size.to_string(),
            FileTag::Name => self.files.stat(ctx.path)?.name,
            FileTag::ModTime(property) => {
                format_timestamp(&self.files.stat(ctx.path)?.modified, property)
            }
            FileTag::Unknown => String::new(),
        };
        Ok(value)
    }

    fn resolve_metadata(
        &self,
        field: &str,
        property: TimestampProperty,
        path: &Path,
    ) -> Result<String, MetadataError> {
        let raw = self.metadata.get(path, field)?;
        if !is_timestamp_field(field) {
            return Ok(raw);
        }
        let timestamp = parse_exif_timestamp(&raw).ok_or_else(|| MetadataError::TimestampParse {
            field: field.to_string(),
            value: raw.clone(),
        })?;
        Ok(format_timestamp(&timestamp, property))
    }
}

fn format_index(index: usize) -> String {
    format!("{:06}", index)
}
