use crate::planner::RenamePlan;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    pub applied: usize,
    pub unchanged: usize,
}

/// Renames every changed entry in plan order. The first failure stops the
/// batch; renames already done are kept.
pub fn apply_plan(plan: &RenamePlan) -> Result<ApplyResult> {
    let mut applied = 0usize;
    let mut unchanged = 0usize;

    for entry in &plan.entries {
        if !entry.changed() {
            unchanged += 1;
            continue;
        }

        if let Some(parent) = entry.to.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("could not create directory {}", parent.display())
                })?;
            }
        }

        fs::rename(&entry.from, &entry.to).with_context(|| {
            format!(
                "rename failed: {} -> {}",
                entry.from.display(),
                entry.to.display()
            )
        })?;
        info!(from = %entry.from.display(), to = %entry.to.display(), "renamed");
        applied += 1;
    }

    Ok(ApplyResult { applied, unchanged })
}
