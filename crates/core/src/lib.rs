mod apply;
mod config;
mod date_index;
mod exif_reader;
mod metadata;
mod planner;
mod render;
mod resolver;
mod tags;
#[cfg(test)]
mod testing;
mod timestamp;

pub use apply::{apply_plan, ApplyResult};
pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
};
pub use date_index::DateIndexCollector;
pub use exif_reader::ExifMetadataSource;
pub use metadata::{FileAttributes, FileStat, FsFileAttributes, MetadataError, MetadataSource};
pub use planner::{
    collect_files, generate_plan, plan_renames, PlanOptions, RenameEntry, RenamePlan,
    DEFAULT_FILTER,
};
pub use render::{
    CapturePolicy, Render, RenderConfig, RenderError, RenderedName, Renderer,
    DEFAULT_CAPTURE_FIELDS, DEFAULT_TEMPLATE,
};
pub use resolver::{FileContext, FileTag, TagResolver, TagKind, FILE_CATEGORY};
pub use tags::{
    distinct_tags, extract_tags, parse_tag_group, replace_tag_in_pattern, TagReference,
};
pub use timestamp::{
    format_timestamp, parse_exif_timestamp, Timestamp, TimestampProperty, TIMESTAMP_FIELDS,
};
