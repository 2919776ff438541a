use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::debug;
use url::Url;

use crate::error::{PodsplitError, Result};

/// A podcast show that has at least one downloaded episode.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Show {
    pub id: i64,
    pub title: String,
    pub uuid: String,
    pub artwork_template_url: Option<String>,
}

/// A downloaded episode of a show. `asset_url` is a `file://` URL pointing
/// into the player's cache.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Episode {
    pub uuid: String,
    pub title: String,
    pub asset_url: String,
    pub artwork_template_url: Option<String>,
}

/// Open the Apple Podcasts library read-only. The database belongs to the
/// player; we never write to it.
pub async fn open_library(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(PodsplitError::FileNotFound(db_path.display().to_string()));
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    debug!("Opened podcast library at {}", db_path.display());
    Ok(pool)
}

/// Shows that have downloaded episodes with an asset on disk.
pub async fn shows_with_downloads(pool: &SqlitePool) -> Result<Vec<Show>> {
    let shows = sqlx::query_as::<_, Show>(
        r#"
        SELECT DISTINCT
            ZMTPODCAST.Z_PK AS id,
            ZMTPODCAST.ZTITLE AS title,
            ZMTPODCAST.ZUUID AS uuid,
            ZMTPODCAST.ZARTWORKTEMPLATEURL AS artwork_template_url
        FROM ZMTEPISODE, ZMTPODCAST
        WHERE ZMTEPISODE.ZPODCAST = ZMTPODCAST.Z_PK
          AND ZMTPODCAST.ZDOWNLOADEDEPISODESCOUNT > 0
          AND ZASSETURL IS NOT NULL
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(shows)
}

/// Downloaded episodes of one show, newest-first ordering left to the player.
pub async fn episodes_for_show(pool: &SqlitePool, show_id: i64) -> Result<Vec<Episode>> {
    let episodes = sqlx::query_as::<_, Episode>(
        r#"
        SELECT
            ZUUID AS uuid,
            ZCLEANEDTITLE AS title,
            ZASSETURL AS asset_url,
            ZARTWORKTEMPLATEURL AS artwork_template_url
        FROM ZMTEPISODE
        WHERE ZPODCAST = ? AND ZASSETURL IS NOT NULL
        "#,
    )
    .bind(show_id)
    .fetch_all(pool)
    .await?;

    Ok(episodes)
}

/// Resolve an episode's `file://` asset URL to a filesystem path, decoding
/// percent-escapes.
pub fn asset_path(asset_url: &str) -> Result<PathBuf> {
    let url = Url::parse(asset_url)
        .map_err(|e| PodsplitError::Library(format!("Invalid asset URL '{asset_url}': {e}")))?;

    if url.scheme() != "file" {
        return Err(PodsplitError::Library(format!(
            "Asset URL is not a file URL: {asset_url}"
        )));
    }

    url.to_file_path()
        .map_err(|_| PodsplitError::Library(format!("Asset URL has no local path: {asset_url}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_path_decodes_escapes() {
        let path = asset_path("file:///Users/me/Library/Cache/My%20Episode.mp3").unwrap();
        assert_eq!(
            path,
            PathBuf::from("/Users/me/Library/Cache/My Episode.mp3")
        );
    }

    #[test]
    fn test_asset_path_rejects_http() {
        let result = asset_path("https://example.com/episode.mp3");
        assert!(matches!(result, Err(PodsplitError::Library(_))));
    }

    #[test]
    fn test_asset_path_rejects_garbage() {
        let result = asset_path("not a url");
        assert!(matches!(result, Err(PodsplitError::Library(_))));
    }
}
