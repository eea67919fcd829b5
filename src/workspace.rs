use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::task::JoinSet;

use crate::assets::{settle, AssetSet};
use crate::errors::{Error, Result};

/// Directory name prefix used for workspaces by default.
pub const WORKSPACE_PREFIX: &str = "mickofont-processed";

/// Number of random bytes in a workspace name suffix.
const SUFFIX_BYTES: usize = 6;

/// Return a new directory name of the form `<prefix>-<random hex>`.
pub fn workspace_name(prefix: &str) -> String {
    let suffix: [u8; SUFFIX_BYTES] = rand::random();
    let mut name = format!("{prefix}-");
    for b in suffix {
        // writing to a String can't fail
        let _ = write!(name, "{b:02x}");
    }
    name
}

/// Write `assets` into a fresh workspace directory under the system temp dir.
///
/// See `persist_in`.
pub async fn persist(assets: AssetSet) -> Result<PathBuf> {
    persist_in(&std::env::temp_dir(), WORKSPACE_PREFIX, assets).await
}

/// Write `assets` into a fresh `<prefix>-<hex>` directory under `root`,
/// returning its absolute path once every file is written.
///
/// The directory (and any missing parents) is created before any writes;
/// files are then written concurrently, each asset to its own filename.
/// Nothing is cleaned up on failure, and the workspace is never removed
/// by this crate.
pub async fn persist_in(root: &Path, prefix: &str, assets: AssetSet) -> Result<PathBuf> {
    let root = std::path::absolute(root)
        .map_err(|e| Error::Write(format!("{}: {e}", root.display())))?;
    let workspace = root.join(workspace_name(prefix));

    fs::create_dir_all(&workspace)
        .await
        .map_err(|e| Error::Write(format!("{}: {e}", workspace.display())))?;

    let mut writes = JoinSet::new();
    for (filename, content) in assets {
        let path = workspace.join(filename);
        writes.spawn(async move {
            fs::write(&path, content)
                .await
                .map_err(|e| Error::Write(format!("{}: {e}", path.display())))
        });
    }
    settle(writes, Error::Write).await?;

    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_name() {
        let name = workspace_name("icons");
        let suffix = name.strip_prefix("icons-").expect("prefix");
        assert_eq!(suffix.len(), SUFFIX_BYTES * 2);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(workspace_name("icons"), workspace_name("icons"));
    }

    #[tokio::test]
    async fn test_persist_in() {
        let root = tempfile::tempdir().unwrap();
        let assets = AssetSet::from([
            ("a.svg".to_string(), "<svg/>".to_string()),
            ("b.svg".to_string(), "<svg><g/></svg>".to_string()),
        ]);
        let workspace = persist_in(root.path(), "test", assets).await.unwrap();

        assert!(workspace.is_absolute());
        assert!(workspace.starts_with(root.path()));
        assert_eq!(std::fs::read_to_string(workspace.join("a.svg")).unwrap(), "<svg/>");
        assert_eq!(
            std::fs::read_to_string(workspace.join("b.svg")).unwrap(),
            "<svg><g/></svg>"
        );
    }

    #[tokio::test]
    async fn test_persist_in_creates_parents() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("x").join("y");
        let workspace = persist_in(&nested, "test", AssetSet::new()).await.unwrap();
        assert!(workspace.is_dir());
        assert!(workspace.starts_with(&nested));
    }

    #[tokio::test]
    async fn test_persist_in_unique() {
        let root = tempfile::tempdir().unwrap();
        let first = persist_in(root.path(), "test", AssetSet::new()).await.unwrap();
        let second = persist_in(root.path(), "test", AssetSet::new()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_persist_in_bad_root() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("not-a-dir");
        std::fs::write(&file, "").unwrap();
        let err = persist_in(&file, "test", AssetSet::new()).await.unwrap_err();
        assert!(matches!(err, Error::Write(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_persist_in_failed_write() {
        let root = tempfile::tempdir().unwrap();
        let assets = AssetSet::from([
            ("a.svg".to_string(), "<svg/>".to_string()),
            ("missing/b.svg".to_string(), "<svg/>".to_string()),
            ("c.svg".to_string(), "<svg><g/></svg>".to_string()),
        ]);
        let err = persist_in(root.path(), "test", assets).await.unwrap_err();
        assert!(matches!(err, Error::Write(_)), "{err:?}");
        assert!(err.to_string().contains("b.svg"), "{err}");

        // siblings are still written
        let workspace = std::fs::read_dir(root.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        assert_eq!(std::fs::read_to_string(workspace.join("a.svg")).unwrap(), "<svg/>");
        assert_eq!(
            std::fs::read_to_string(workspace.join("c.svg")).unwrap(),
            "<svg><g/></svg>"
        );
    }
}
