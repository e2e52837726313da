//! Resolution-specific image download with a generic fallback.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, Response, Url};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::bing::ImageMetadata;
use crate::resolution::Resolution;

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("metadata has no generic image URL to fall back to")]
    NoTarget,

    #[error("invalid image URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request for {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("download phase exceeded {0:?}")]
    DeadlineExceeded(Duration),
}

/// Which target ended up in the destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Resolution(Resolution),
    Generic,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Resolution(res) => write!(f, "{res}"),
            Source::Generic => f.write_str("generic"),
        }
    }
}

/// Downloads today's image into a single destination file.
pub struct Resolver<'a> {
    client: &'a Client,
    origin: &'a Url,
}

impl<'a> Resolver<'a> {
    pub fn new(client: &'a Client, origin: &'a Url) -> Self {
        Self { client, origin }
    }

    /// Try each wanted resolution in order, then the generic URL.
    ///
    /// The whole phase is bounded by `deadline`; when it expires the
    /// in-flight request is dropped and no further targets are tried. The
    /// destination is left as the last attempt truncated it.
    pub async fn download<I>(
        &self,
        meta: &ImageMetadata,
        wanted: I,
        dest: &Path,
        deadline: Duration,
    ) -> Result<Source, DownloadError>
    where
        I: IntoIterator<Item = Resolution>,
    {
        match tokio::time::timeout(deadline, self.resolve(meta, wanted, dest)).await {
            Ok(result) => result,
            Err(_) => Err(DownloadError::DeadlineExceeded(deadline)),
        }
    }

    async fn resolve<I>(
        &self,
        meta: &ImageMetadata,
        wanted: I,
        dest: &Path,
    ) -> Result<Source, DownloadError>
    where
        I: IntoIterator<Item = Resolution>,
    {
        for resolution in wanted {
            let url = self
                .origin
                .join(&format!("{}_{resolution}.jpg", meta.urlbase))?;
            match self.fetch_to(&url, dest).await {
                Ok(()) => {
                    tracing::info!(%url, %resolution, "downloaded wallpaper");
                    return Ok(Source::Resolution(resolution));
                }
                Err(DownloadError::Request { url, source }) => {
                    tracing::warn!(%url, error = %source, "resolution unavailable, trying next");
                }
                Err(err) => return Err(err),
            }
        }

        let generic = meta.url.as_deref().ok_or(DownloadError::NoTarget)?;
        let url = self.origin.join(generic)?;
        self.fetch_to(&url, dest).await?;
        tracing::info!(%url, "downloaded generic wallpaper");
        Ok(Source::Generic)
    }

    /// Stream one URL into `dest`, truncating whatever was there.
    async fn fetch_to(&self, url: &Url, dest: &Path) -> Result<(), DownloadError> {
        let io_err = |source| DownloadError::Io {
            path: dest.to_path_buf(),
            source,
        };
        let request_err = |source| DownloadError::Request {
            url: url.clone(),
            source,
        };

        let mut file = File::create(dest).await.map_err(io_err)?;
        tracing::debug!(%url, "requesting image");
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(request_err)?;

        while let Some(chunk) = response.chunk().await.map_err(request_err)? {
            file.write_all(&chunk).await.map_err(io_err)?;
        }
        file.flush().await.map_err(io_err)?;
        Ok(())
    }
}
