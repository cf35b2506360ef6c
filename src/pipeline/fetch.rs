//! Download one artifact class from the bucket into its staging directory.

use crate::artifact::{self, ArtifactClass};
use crate::context::Context;
use crate::error::Result;

/// Replace the local staging directory for `class` with the bucket's
/// contents.
///
/// The whole directory is cleared first, so stale local files never survive
/// a fetch. Objects whose names end in `/` are directory markers and are
/// skipped; everything else matching the class filter is downloaded into the
/// mirrored local path. A storage failure aborts the fetch mid-way — partial
/// downloads are acceptable to leave on disk.
pub async fn fetch(ctx: &Context, class: ArtifactClass) -> Result<usize> {
    let dir = class.local_dir(ctx.root());
    match std::fs::remove_dir_all(&dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    artifact::ensure_dirs(ctx.root())?;

    let prefix = format!("{}/", class.dir());
    let names = ctx.store.list(&prefix).await?;

    let mut downloaded = 0;
    for name in names {
        if name.ends_with('/') {
            continue;
        }
        let Some(relative) = name.strip_prefix(&prefix) else {
            continue;
        };
        if !artifact::matches_filter(relative, class.filter()) {
            continue;
        }
        tracing::info!(object = %name, "downloading");
        ctx.store.download(&name, &ctx.root().join(&name)).await?;
        downloaded += 1;
    }
    Ok(downloaded)
}
