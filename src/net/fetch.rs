use crate::config::GalleryConfig;
use crate::net::Response;
use futures::future::BoxFuture;
use futures::FutureExt;
use http::StatusCode;
use std::sync::Arc;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("asset not found: {0}")]
    NotFound(Url),
    #[error("unexpected status {status} for {url}")]
    Status { url: Url, status: u16 },
    #[error("unsupported asset scheme: {0}")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Presence/content check against a static asset location.
///
/// Implementations must report every failure through [`FetchError`]; the renderer turns any
/// error into a fallback texture.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, url: Url) -> BoxFuture<'static, Result<Response, FetchError>>;
}

/// Fetches assets over HTTP(S) with a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: Url) -> BoxFuture<'static, Result<Response, FetchError>> {
        let client = self.client.clone();

        async move {
            let res = client.get(url.clone()).send().await?;

            let status = res.status();
            if status == StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(url));
            }
            if !status.is_success() {
                return Err(FetchError::Status { url, status: status.as_u16() });
            }

            let final_url = res.url().clone();
            let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();
            let headers = res.headers().clone();

            // Fetch body. We don't do streaming
            let body = res.bytes().await?.to_vec();

            Ok(Response {
                url: final_url,
                status: status.as_u16(),
                status_text,
                headers,
                body,
            })
        }
        .boxed()
    }
}

/// Reads assets from a local directory addressed by `file://` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryFetcher;

impl AssetFetcher for DirectoryFetcher {
    fn fetch(&self, url: Url) -> BoxFuture<'static, Result<Response, FetchError>> {
        async move {
            if url.scheme() != "file" {
                return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
            }
            let path = url
                .to_file_path()
                .map_err(|_| FetchError::NotFound(url.clone()))?;

            match tokio::fs::read(&path).await {
                Ok(body) => Ok(Response::ok(url, body)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FetchError::NotFound(url)),
                Err(e) => Err(FetchError::Io(e)),
            }
        }
        .boxed()
    }
}

/// Picks the fetcher matching the configured asset root.
pub fn fetcher_for(config: &GalleryConfig) -> Result<Arc<dyn AssetFetcher>, FetchError> {
    match config.asset_root.scheme() {
        "http" | "https" => Ok(Arc::new(HttpFetcher::new(&config.user_agent)?)),
        "file" => Ok(Arc::new(DirectoryFetcher)),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

/// Normalizes a logical asset path to absolute form. Blank paths have no asset.
pub fn normalize_asset_path(path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        None
    } else if path.starts_with('/') {
        Some(path.to_string())
    } else {
        Some(format!("/{path}"))
    }
}

/// Resolves an exhibit's image path beneath `root`.
///
/// Returns `None` when there is nothing to fetch: no path, a blank path, or a path that
/// would escape the asset root (absolute URLs, `..` segments).
pub fn asset_url(root: &Url, image_path: Option<&str>) -> Option<Url> {
    let logical = normalize_asset_path(image_path?)?;
    let url = root.join(logical.trim_start_matches('/')).ok()?;

    let same_origin = url.scheme() == root.scheme() && url.host() == root.host() && url.port() == root.port();
    if !same_origin || !url.path().starts_with(root.path()) {
        return None;
    }

    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Url {
        Url::parse("https://example.org/").unwrap()
    }

    #[test]
    fn normalize_prefixes_separator() {
        assert_eq!(normalize_asset_path("art/a.jpg").as_deref(), Some("/art/a.jpg"));
        assert_eq!(normalize_asset_path("/a.jpg").as_deref(), Some("/a.jpg"));
        assert_eq!(normalize_asset_path("   "), None);
    }

    #[test]
    fn relative_and_absolute_paths_resolve_alike() {
        let a = asset_url(&root(), Some("homecoming.jpg")).unwrap();
        let b = asset_url(&root(), Some("/homecoming.jpg")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "https://example.org/homecoming.jpg");
    }

    #[test]
    fn paths_stay_under_nested_root() {
        let root = Url::parse("https://example.org/static/").unwrap();
        let url = asset_url(&root, Some("/art/a.jpg")).unwrap();
        assert_eq!(url.as_str(), "https://example.org/static/art/a.jpg");
        assert_eq!(asset_url(&root, Some("../secret.jpg")), None);
    }

    #[test]
    fn foreign_urls_are_refused() {
        assert_eq!(asset_url(&root(), Some("https://elsewhere.net/a.jpg")), None);
        assert_eq!(asset_url(&root(), None), None);
        assert_eq!(asset_url(&root(), Some("")), None);
    }

    #[test]
    fn fetcher_for_rejects_unknown_schemes() {
        let mut config = GalleryConfig::default();
        config.asset_root = Url::parse("ftp://example.org/").unwrap();
        assert!(matches!(fetcher_for(&config), Err(FetchError::UnsupportedScheme(s)) if s == "ftp"));
    }

    #[tokio::test]
    async fn directory_fetcher_reads_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.bin"), b"abc").unwrap();
        let root = Url::from_directory_path(dir.path()).unwrap();

        let found = DirectoryFetcher.fetch(root.join("a.bin").unwrap()).await.unwrap();
        assert_eq!(found.status, 200);
        assert_eq!(found.body, b"abc");

        let missing = DirectoryFetcher.fetch(root.join("nope.bin").unwrap()).await;
        assert!(matches!(missing, Err(FetchError::NotFound(_))));
    }

    #[tokio::test]
    async fn directory_fetcher_refuses_http() {
        let res = DirectoryFetcher.fetch(root()).await;
        assert!(matches!(res, Err(FetchError::UnsupportedScheme(_))));
    }
}
