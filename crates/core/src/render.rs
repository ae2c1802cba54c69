use crate::date_index::DateIndexCollector;
use crate::metadata::{FileAttributes, MetadataSource};
use crate::resolver::{FileContext, TagResolver};
use crate::tags::{distinct_tags, extract_tags, replace_tag_in_pattern};
use crate::timestamp::{parse_exif_timestamp, Timestamp};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_TEMPLATE: &str =
    "{DateTime.Year}{DateTime.Month}{DateTime.Day}_{File.Index}.{File.Extension}";

/// Fields consulted for the capture time, first readable one wins.
pub const DEFAULT_CAPTURE_FIELDS: &[&str] = &["DateTime", "DateTimeDigitized", "DateTimeOriginal"];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no capture time ({fields}) could be read from {path}", fields = .fields.join(", "))]
    CaptureTimeUnavailable { path: PathBuf, fields: Vec<String> },
}

/// What to do with a file whose capture time cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapturePolicy {
    /// Stop the batch at that file.
    #[default]
    Abort,
    /// Render it anyway without counting it in the date index.
    Continue,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub template: String,
    pub capture_fields: Vec<String>,
    pub capture_policy: CapturePolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            capture_fields: DEFAULT_CAPTURE_FIELDS
                .iter()
                .map(|v| v.to_string())
                .collect(),
            capture_policy: CapturePolicy::Abort,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedName {
    pub source: PathBuf,
    pub rendered: String,
    pub capture_time: Option<Timestamp>,
}

pub struct Renderer<M, F> {
    config: RenderConfig,
    tags: Vec<String>,
    metadata: M,
    files: F,
}

impl<M: MetadataSource, F: FileAttributes> Renderer<M, F> {
    pub fn new(config: RenderConfig, metadata: M, files: F) -> Self {
        let tags = distinct_tags(extract_tags(&config.template));
        Self {
            config,
            tags,
            metadata,
            files,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Renders one name per input path, lazily and in input order. Each call
    /// starts from an empty date index.
    pub fn render<I>(&self, files: I) -> Render<'_, M, F, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        Render {
            renderer: self,
            files: files.into_iter(),
            collector: DateIndexCollector::new(),
            halted: false,
        }
    }

    fn capture_time(&self, path: &Path) -> Option<Timestamp> {
        self.config.capture_fields.iter().find_map(|field| {
            let raw = self.metadata.get(path, field).ok()?;
            let parsed = parse_exif_timestamp(&raw);
            if parsed.is_some() {
                debug!(path = %path.display(), %field, "capture time found");
            }
            parsed
        })
    }

    fn render_one(
        &self,
        path: &Path,
        collector: &mut DateIndexCollector,
    ) -> Result<RenderedName, RenderError> {
        let capture_time = self.capture_time(path);
        match (&capture_time, self.config.capture_policy) {
            (Some(ts), _) => collector.add(ts),
            (None, CapturePolicy::Abort) => {
                return Err(RenderError::CaptureTimeUnavailable {
                    path: path.to_path_buf(),
                    fields: self.config.capture_fields.clone(),
                });
            }
            (None, CapturePolicy::Continue) => {
                warn!(path = %path.display(), "no capture time; date indexes read as zero");
            }
        }

        let resolver = TagResolver::new(&self.metadata, &self.files);
        let ctx = FileContext {
            path,
            capture_time: capture_time.as_ref(),
            collector: &*collector,
        };
        let mut rendered = self.config.template.clone();
        for tag in &self.tags {
            let value = resolver.resolve_group(tag, &ctx);
            rendered = replace_tag_in_pattern(&rendered, tag, &value);
        }

        debug!(path = %path.display(), %rendered, "rendered");
        Ok(RenderedName {
            source: path.to_path_buf(),
            rendered,
            capture_time,
        })
    }
}

/// Lazy rendering of one batch. Ends after the first error.
pub struct Render<'r, M, F, I> {
    renderer: &'r Renderer<M, F>,
    files: I,
    collector: DateIndexCollector,
    halted: bool,
}

impl<M, F, I> Render<'_, M, F, I> {
    pub fn collector(&self) -> &DateIndexCollector {
        &self.collector
    }
}

impl<M, F, I> Iterator for Render<'_, M, F, I>
where
    M: MetadataSource,
    F: FileAttributes,
    I: Iterator,
    I::Item: AsRef<Path>,
{
    type Item = Result<RenderedName, RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        let path = self.files.next()?;
        let result = self.renderer.render_one(path.as_ref(), &mut self.collector);
        if result.is_err() {
            self.halted = true;
        }
        Some(result)
    }
}

impl<M, F, I> std::iter::FusedIterator for Render<'_, M, F, I>
where
    M: MetadataSource,
    F: FileAttributes,
    I: std::iter::FusedIterator,
    I::Item: AsRef<Path>,
{
}
