//! Bing "image of the day" metadata.

use reqwest::{Client, Url};
use serde::Deserialize;

/// Failure to obtain usable metadata.
#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    #[error("invalid metadata endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("metadata request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("metadata response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("metadata response lists no images")]
    NoImages,
}

#[derive(Debug, Deserialize)]
struct ImageArchive {
    images: Vec<ImageMetadata>,
}

/// One entry of the archive; only the first entry is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageMetadata {
    pub startdate: String,
    pub urlbase: String,
    /// Generic (default resolution) image URL, usually relative.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
}

/// `{origin}/HPImageArchive.aspx?format=js&idx=0&n=1&mkt={market}`
pub fn endpoint(origin: &Url, market: &str) -> Result<Url, url::ParseError> {
    let mut url = origin.join("/HPImageArchive.aspx")?;
    url.query_pairs_mut()
        .append_pair("format", "js")
        .append_pair("idx", "0")
        .append_pair("n", "1")
        .append_pair("mkt", market);
    Ok(url)
}

/// Fetch and parse today's image metadata.
pub async fn fetch(
    client: &Client,
    origin: &Url,
    market: &str,
) -> Result<ImageMetadata, MetadataError> {
    let url = endpoint(origin, market)?;
    tracing::info!(%url, "fetching image metadata");
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    parse(&body)
}

fn parse(body: &[u8]) -> Result<ImageMetadata, MetadataError> {
    let archive: ImageArchive = serde_json::from_slice(body)?;
    archive
        .images
        .into_iter()
        .next()
        .ok_or(MetadataError::NoImages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample() -> serde_json::Value {
        json!({
            "images": [
                {
                    "startdate": "20240102",
                    "urlbase": "/th?id=OHR.Sample_EN-US123",
                    "url": "/th?id=OHR.Sample_EN-US123_1920x1080.jpg&rf=LaDigue_1920x1080.jpg",
                    "title": "Sample",
                    "copyright": "Someone",
                    "hsh": "abc"
                },
                {
                    "startdate": "20240101",
                    "urlbase": "/th?id=OHR.Older",
                    "url": "/th?id=OHR.Older_1920x1080.jpg"
                }
            ],
            "tooltips": {}
        })
    }

    #[test]
    fn endpoint_carries_market() {
        let origin = Url::parse("https://www.bing.com").unwrap();
        let url = endpoint(&origin, "de-DE").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.bing.com/HPImageArchive.aspx?format=js&idx=0&n=1&mkt=de-DE"
        );
    }

    #[test]
    fn parse_uses_first_image() {
        let meta = parse(sample().to_string().as_bytes()).unwrap();
        assert_eq!(meta.startdate, "20240102");
        assert_eq!(meta.urlbase, "/th?id=OHR.Sample_EN-US123");
        assert_eq!(meta.title.as_deref(), Some("Sample"));
    }

    #[test]
    fn parse_tolerates_missing_url() {
        let body = json!({"images": [{"startdate": "1", "urlbase": "/b"}]});
        let meta = parse(body.to_string().as_bytes()).unwrap();
        assert_eq!(meta.url, None);
    }

    #[test]
    fn parse_rejects_empty_archive_and_garbage() {
        let empty = json!({"images": []}).to_string();
        assert!(matches!(parse(empty.as_bytes()), Err(MetadataError::NoImages)));
        assert!(matches!(parse(b"<html>"), Err(MetadataError::Parse(_))));
    }

    #[tokio::test]
    async fn fetch_queries_archive_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/HPImageArchive.aspx"))
            .and(query_param("format", "js"))
            .and(query_param("mkt", "en-US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample()))
            .expect(1)
            .mount(&server)
            .await;

        let origin = Url::parse(&server.uri()).unwrap();
        let meta = fetch(&Client::new(), &origin, "en-US").await.unwrap();
        assert_eq!(meta.startdate, "20240102");

        server.verify().await;
    }

    #[tokio::test]
    async fn fetch_reports_http_errors_as_request_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let origin = Url::parse(&server.uri()).unwrap();
        let err = fetch(&Client::new(), &origin, "en-US").await.unwrap_err();
        assert!(matches!(err, MetadataError::Request(_)));
    }
}
