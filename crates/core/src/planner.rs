use crate::exif_reader::ExifMetadataSource;
use crate::metadata::{FileAttributes, FsFileAttributes, MetadataSource};
use crate::render::{RenderConfig, Renderer};
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub const DEFAULT_FILTER: &str = r"\.jpg$";

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub workdir: PathBuf,
    pub filter: String,
    pub recursive: bool,
    pub render: RenderConfig,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            filter: DEFAULT_FILTER.to_string(),
            recursive: false,
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEntry {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl RenameEntry {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub template: String,
    pub entries: Vec<RenameEntry>,
}

pub fn generate_plan(options: &PlanOptions) -> Result<RenamePlan> {
    if !options.workdir.is_dir() {
        anyhow::bail!("working directory does not exist: {}", options.workdir.display());
    }
    let workdir = options
        .workdir
        .canonicalize()
        .with_context(|| format!("could not resolve {}", options.workdir.display()))?;

    let files = collect_files(&workdir, &options.filter, options.recursive)?;
    info!(count = files.len(), root = %workdir.display(), "collected files");

    let renderer = Renderer::new(
        options.render.clone(),
        ExifMetadataSource,
        FsFileAttributes,
    );
    plan_renames(&renderer, files)
}

/// Drains a render batch into a plan, stopping at the first failing file.
pub fn plan_renames<M, F>(renderer: &Renderer<M, F>, files: Vec<PathBuf>) -> Result<RenamePlan>
where
    M: MetadataSource,
    F: FileAttributes,
{
    let mut entries = Vec::with_capacity(files.len());
    for rendered in renderer.render(&files) {
        let rendered = rendered?;
        let to = target_path(&rendered.source, &rendered.rendered);
        entries.push(RenameEntry {
            from: rendered.source,
            to,
        });
    }

    Ok(RenamePlan {
        template: renderer.config().template.clone(),
        entries,
    })
}

/// Files under `root` whose full path matches `filter`, sorted by name.
pub fn collect_files(root: &Path, filter: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let filter = Regex::new(filter).with_context(|| format!("invalid file filter: {filter}"))?;
    let mut walker = WalkDir::new(root).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut out = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if filter.is_match(&path.to_string_lossy()) {
            out.push(path.to_path_buf());
        } else {
            debug!(path = %path.display(), "skipped by filter");
        }
    }

    Ok(out)
}

fn target_path(source: &Path, rendered: &str) -> PathBuf {
    match source.parent() {
        Some(parent) => parent.join(rendered),
        None => PathBuf::from(rendered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CapturePolicy;
    use crate::testing::write_exif_fixture;
    use exif::Tag;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, b"x").expect("write");
    }

    #[test]
    fn collect_respects_filter_and_sorts() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("b.jpg"));
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("c.png"));
        touch(&dir.path().join("sub").join("d.jpg"));

        let files = collect_files(dir.path(), DEFAULT_FILTER, false).expect("collect");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().expect("name").to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn collect_recurses_when_asked() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("sub").join("d.jpg"));

        let files = collect_files(dir.path(), DEFAULT_FILTER, true).expect("collect");
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("sub/d.jpg")));
    }

    #[test]
    fn collect_accepts_case_insensitive_filter() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("A.JPG"));
        touch(&dir.path().join("b.jpeg"));

        let files = collect_files(dir.path(), r"(?i)\.jpe?g$", false).expect("collect");
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn invalid_filter_is_error() {
        let dir = tempdir().expect("tempdir");
        assert!(collect_files(dir.path(), "(", false).is_err());
    }

    #[test]
    fn target_is_next_to_source() {
        assert_eq!(
            target_path(Path::new("/photos/IMG_1.jpg"), "2016_000001.jpg"),
            PathBuf::from("/photos/2016_000001.jpg")
        );
        assert_eq!(
            target_path(Path::new("/photos/IMG_1.jpg"), "/archive/x.jpg"),
            PathBuf::from("/archive/x.jpg")
        );
    }

    #[test]
    fn plan_stops_on_unreadable_capture_time() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("a.jpg"));

        let options = PlanOptions {
            workdir: dir.path().to_path_buf(),
            ..PlanOptions::default()
        };
        let err = generate_plan(&options).expect_err("no exif in fixture");
        assert!(err.to_string().contains("capture time"));
    }

    #[test]
    fn plan_numbers_files_by_exif_capture_date() {
        let dir = tempdir().expect("tempdir");
        write_exif_fixture(
            &dir.path().join("a.jpg"),
            &[(Tag::DateTime, "2016:03:04 09:00:00"), (Tag::Model, "X-T5")],
        );
        write_exif_fixture(
            &dir.path().join("b.jpg"),
            &[(Tag::DateTime, "2016:03:04 10:00:00"), (Tag::Model, "X-T5")],
        );

        let options = PlanOptions {
            workdir: dir.path().to_path_buf(),
            render: RenderConfig {
                template: "{DateTime.Year}{DateTime.Month}_{Model}_{File.IndexByCaptureDate}.{File.Extension}"
                    .to_string(),
                ..RenderConfig::default()
            },
            ..PlanOptions::default()
        };
        let plan = generate_plan(&options).expect("plan");
        let targets: Vec<_> = plan
            .entries
            .iter()
            .map(|e| e.to.file_name().expect("name").to_string_lossy().to_string())
            .collect();
        assert_eq!(
            targets,
            vec!["201603_X-T5_000001.jpg", "201603_X-T5_000002.jpg"]
        );
    }

    #[test]
    fn continue_policy_plans_files_without_exif() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("b.jpg"));

        let options = PlanOptions {
            workdir: dir.path().to_path_buf(),
            render: RenderConfig {
                template: "{File.IndexByCaptureDate}_{File.Name}".to_string(),
                capture_policy: CapturePolicy::Continue,
                ..RenderConfig::default()
            },
            ..PlanOptions::default()
        };
        let plan = generate_plan(&options).expect("plan");
        let targets: Vec<_> = plan
            .entries
            .iter()
            .map(|e| e.to.file_name().expect("name").to_string_lossy().to_string())
            .collect();
        assert_eq!(targets, vec!["000000_a.jpg", "000000_b.jpg"]);
        assert!(plan.entries.iter().all(RenameEntry::changed));
    }

    #[test]
    fn missing_workdir_is_error() {
        let dir = tempdir().expect("tempdir");
        let options = PlanOptions {
            workdir: dir.path().join("missing"),
            ..PlanOptions::default()
        };
        assert!(generate_plan(&options).is_err());
    }
}
