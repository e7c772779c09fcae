use std::path::Path;

use tracing::debug;

/// Create each directory (and its parents) if missing.
pub(crate) fn ensure_dirs<'a, I>(dirs: I) -> std::io::Result<()>
where
    I: IntoIterator<Item = &'a Path>,
{
    for dir in dirs {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "creating directory");
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
