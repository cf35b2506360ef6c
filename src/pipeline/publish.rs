//! Upload one artifact class from its staging directory to the bucket.

use crate::artifact::{self, ArtifactClass};
use crate::context::Context;
use crate::error::Result;

/// Upload every local artifact of `class` to its mirrored object name.
///
/// No existence check is made before uploading — the remote copy is always
/// overwritten, and nothing remote is ever deleted.
pub async fn publish(ctx: &Context, class: ArtifactClass) -> Result<usize> {
    artifact::ensure_dirs(ctx.root())?;

    let mut uploaded = 0;
    for item in artifact::list_local(ctx.root(), class)? {
        let object = class.object_name(&item.uuid);
        let src = class.local_path(ctx.root(), &item.uuid);
        tracing::info!(object = %object, "uploading");
        ctx.store.upload(&src, &object).await?;
        uploaded += 1;
    }
    Ok(uploaded)
}
