use std::path::{Path, PathBuf};

use tokio::fs;

/// What is known about a filesystem path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathCheck {
    /// Absolute form of the checked path
    pub path: PathBuf,
    pub exists: bool,
    pub readable: bool,
    pub writable: bool,
    pub is_file: bool,
    pub is_dir: bool,
}

/// Inspect `path`. Never fails; anything which can't be determined is
/// reported as `false`.
pub async fn check_path(path: impl AsRef<Path>) -> PathCheck {
    let path = path.as_ref();
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut res = PathCheck {
        path,
        ..Default::default()
    };

    let Ok(meta) = fs::metadata(&res.path).await else {
        return res;
    };
    res.exists = true;
    res.is_file = meta.is_file();
    res.is_dir = meta.is_dir();
    res.writable = !meta.permissions().readonly();
    res.readable = if res.is_dir {
        fs::read_dir(&res.path).await.is_ok()
    } else {
        fs::File::open(&res.path).await.is_ok()
    };
    res
}
