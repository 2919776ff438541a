use std::path::Path;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{PodsplitError, Result};

/// Artwork size requested from the template URL.
const ARTWORK_SIZE: u32 = 600;
const ARTWORK_FORMAT: &str = "png";

/// Fill an artwork template URL's `{w}`, `{h}` and `{f}` placeholders.
pub fn render_template(template: &str, width: u32, height: u32, format: &str) -> String {
    template
        .replace("{w}", &width.to_string())
        .replace("{h}", &height.to_string())
        .replace("{f}", format)
}

/// Download artwork for the given template URL to `dest` at the default
/// size. Returns the rendered URL that was fetched.
pub async fn download_artwork(
    client: &reqwest::Client,
    template: &str,
    dest: &Path,
) -> Result<String> {
    let url = render_template(template, ARTWORK_SIZE, ARTWORK_SIZE, ARTWORK_FORMAT);
    download(client, &url, dest).await?;
    Ok(url)
}

/// Stream a URL to a file in chunks.
pub async fn download(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    debug!("Downloading {} to {}", url, dest.display());

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(PodsplitError::Api(format!(
            "Artwork download failed ({}): {url}",
            response.status()
        )));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    info!("Downloaded artwork to {}", dest.display());
    Ok(())
}
