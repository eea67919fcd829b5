use std::collections::BTreeMap;
use std::path::Path;

use tokio::fs;
use tokio::task::JoinSet;

use crate::errors::{Error, Result};

/// SVG file contents keyed by filename (not path) within a single directory.
pub type AssetSet = BTreeMap<String, String>;

/// Wait for every task in `tasks` to finish.
///
/// Tasks are never cancelled early: if any fails, the remaining tasks are
/// still awaited and the first failure is returned. `wrap` converts a task
/// which could not be joined (e.g. one which panicked) into a stage error.
pub(crate) async fn settle<T: 'static>(
    mut tasks: JoinSet<Result<T>>,
    wrap: fn(String) -> Error,
) -> Result<Vec<T>> {
    let mut done = Vec::with_capacity(tasks.len());
    let mut first_err = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(value)) => done.push(value),
            Ok(Err(e)) => {
                first_err.get_or_insert(e);
            }
            Err(e) => {
                first_err.get_or_insert(wrap(e.to_string()));
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(done),
    }
}

fn is_svg_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".svg")
}

/// Read every `.svg` file (case-insensitive extension) in `source_dir`.
///
/// All files are read concurrently. Any failure discards the whole set and
/// is reported as `Error::Load` carrying the underlying IO error message.
/// Subdirectories are not descended into.
pub async fn load_assets(source_dir: impl AsRef<Path>) -> Result<AssetSet> {
    let source_dir = source_dir.as_ref();
    let load_err = |e: std::io::Error| Error::Load(format!("{}: {e}", source_dir.display()));

    // listing completes before any read is issued
    let mut entries = fs::read_dir(source_dir).await.map_err(load_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(load_err)? {
        let Ok(name) = entry.file_name().into_string() else {
            log::warn!("Ignoring non-UTF8 filename {:?}", entry.file_name());
            continue;
        };
        if !is_svg_name(&name) {
            continue;
        }
        if entry.file_type().await.map_err(load_err)?.is_dir() {
            continue;
        }
        files.push((name, entry.path()));
    }

    let mut reads = JoinSet::new();
    for (name, path) in files {
        reads.spawn(async move {
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| Error::Load(format!("{}: {e}", path.display())))?;
            Ok((name, content))
        });
    }

    Ok(settle(reads, Error::Load).await?.into_iter().collect())
}
