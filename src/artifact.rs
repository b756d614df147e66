//! Downloads generated results to local files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::MediaError;

/// Fetch `url` and stream the body to `dest`, creating parent directories.
/// Returns the number of bytes written.
///
/// The body goes to a `.part` sibling first and is renamed onto `dest` only
/// once complete, so a failed call never leaves a usable file at `dest`.
pub async fn materialize(client: &Client, url: &str, dest: &Path) -> Result<u64, MediaError> {
    let response = client.get(url).send().await?.error_for_status()?;

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let part = part_path(dest);
    let written = match write_body(response, &part).await {
        Ok(written) => written,
        Err(e) => {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e);
        }
    };
    tokio::fs::rename(&part, dest).await?;

    debug!(url, dest = %dest.display(), bytes = written, "artifact written");
    Ok(written)
}

async fn write_body(mut response: Response, part: &Path) -> Result<u64, MediaError> {
    let mut file = tokio::fs::File::create(part).await?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}
