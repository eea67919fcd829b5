use std::path::{Path, PathBuf};

use crate::assets::{load_assets, AssetSet};
use crate::errors::{Error, Result};
use crate::outline::{Outliner, StrokeOutliner};
use crate::rewrite::rewrite_asset_with;
use crate::workspace::{persist_in, WORKSPACE_PREFIX};

/// Outcome of a single pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineReport {
    /// Number of SVG files loaded from the source directory
    pub loaded: usize,
    /// Number of files whose content was changed by rewriting
    pub converted: usize,
    /// Absolute path of the workspace holding the rewritten files
    pub workspace: PathBuf,
}

/// Rewrite every asset, producing a new set with identical keys.
///
/// Returns the new set and the number of assets whose content changed.
/// The first malformed asset aborts the whole batch.
pub fn rewrite_assets<O: Outliner + ?Sized>(
    assets: &AssetSet,
    outliner: &O,
) -> Result<(AssetSet, usize)> {
    let mut converted = 0;
    let mut rewritten = AssetSet::new();
    for (filename, original) in assets {
        let content = rewrite_asset_with(original, outliner).map_err(|e| match e {
            Error::Parse(reason) => Error::Parse(format!("{filename}: {reason}")),
            other => other,
        })?;
        if &content != original {
            converted += 1;
        }
        rewritten.insert(filename.clone(), content);
    }
    Ok((rewritten, converted))
}

/// Load, rewrite and persist the SVG files of a directory.
///
/// Stages run strictly in sequence and the first failure of any stage ends
/// the run. The workspace is left in place for the caller to consume.
#[derive(Clone, Debug)]
pub struct Pipeline<O = StrokeOutliner> {
    outliner: O,
    temp_root: PathBuf,
    prefix: String,
}

impl Default for Pipeline<StrokeOutliner> {
    fn default() -> Self {
        Self::with_outliner(StrokeOutliner::default())
    }
}

impl Pipeline<StrokeOutliner> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: Outliner> Pipeline<O> {
    pub fn with_outliner(outliner: O) -> Self {
        Self {
            outliner,
            temp_root: std::env::temp_dir(),
            prefix: WORKSPACE_PREFIX.to_string(),
        }
    }

    /// Directory under which workspaces are created (default: system temp dir)
    pub fn temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    /// Workspace directory name prefix (default: `mickofont-processed`)
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub async fn run(&self, source_dir: impl AsRef<Path>) -> Result<PipelineReport> {
        let source_dir = source_dir.as_ref();

        log::info!("[Step 1/4] Loading SVG files from: {}", source_dir.display());
        let assets = load_assets(source_dir).await?;
        log::info!("[Step 2/4] Found {} SVG files.", assets.len());

        log::info!("[Step 3/4] Processing files: checking for strokes and converting to fills...");
        let (rewritten, converted) = rewrite_assets(&assets, &self.outliner)?;
        log::info!("[Step 3/4] Conversion complete. {converted} files were modified.");

        log::info!("[Step 4/4] Writing processed files to a new temporary directory...");
        let workspace = persist_in(&self.temp_root, &self.prefix, rewritten).await?;
        log::info!(
            "[Step 4/4] Success! Processed files are ready in: {}",
            workspace.display()
        );

        Ok(PipelineReport {
            loaded: assets.len(),
            converted,
            workspace,
        })
    }
}

/// Convert strokes to fills for every SVG in `source_dir`, returning the
/// path of a new temporary directory holding the results.
pub async fn process_directory(source_dir: impl AsRef<Path>) -> Result<PathBuf> {
    Ok(Pipeline::new().run(source_dir).await?.workspace)
}
