//! Notify REST API client.
//!
//! Each method issues exactly one request and hands back the decoded
//! body. Non-success statuses come back as [`NotifyError::Status`] with
//! the response body attached so callers can build their own messages.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{NotifyError, Result};
use crate::models::{
    Album, LogEntry, LoginRequest, LoginResponse, MonitoringMetrics, RegisterRequest,
    RegisterResponse,
};

/// Scheme prefix of the `Authorization` header.
pub const AUTH_SCHEME: &str = "Token";

const USER_AGENT: &str = concat!("notify-client/", env!("CARGO_PKG_VERSION"));

/// Notify backend client.
///
/// # Example
///
/// ```rust,no_run
/// use notify_client::{ClientConfig, NotifyApi};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = NotifyApi::new(&ClientConfig::default())?;
///     for album in api.search_albums("discovery").await? {
///         println!("{} - {}", album.artist, album.title);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct NotifyApi {
    client: Client,
    api_url: Url,
    login_url: Url,
}

impl NotifyApi {
    /// Create a new client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            api_url: parse_url(&config.api_url)?,
            login_url: parse_url(&config.login_url)?,
        })
    }

    /// Build an API URL from raw path segments. Each segment is
    /// percent-encoded as a whole, so `/` inside a value stays data.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| NotifyError::Config(format!("{} cannot be a base URL", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, turning transport and status failures into errors.
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                warn!("Backend unreachable: {}", e);
                NotifyError::Unreachable(e.to_string())
            } else {
                NotifyError::RequestError(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not read error body from {}: {}", url, e);
                String::new()
            }
        };
        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text)))
        };

        warn!("{} returned {}", url, status);
        Err(NotifyError::Status { status, body })
    }

    /// GET a URL and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, token: Option<&str>) -> Result<T> {
        debug!("GET {}", url);
        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, auth_header(token));
        }
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    /// Search albums by name or artist.
    pub async fn search_albums(&self, query: &str) -> Result<Vec<Album>> {
        let url = self.endpoint(&["albums", query])?;
        let albums: Vec<Album> = self.get_json(url, None).await?;
        debug!("Search '{}' returned {} albums", query, albums.len());
        Ok(albums)
    }

    /// Get full information for one album.
    pub async fn get_album(&self, artist: &str, title: &str) -> Result<Album> {
        let url = self.endpoint(&["album", artist, title])?;
        self.get_json(url, None).await
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        debug!("POST {} as {}", self.login_url, credentials.username);
        let request = self.client.post(self.login_url.clone()).json(credentials);
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    /// Create an account. Sent as multipart form data so a photo can
    /// ride along.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        let url = self.endpoint(&["usuarios", "register"])?;
        debug!("POST {} for {}", url, request.username);

        let mut form = Form::new();
        for (name, value) in request.text_fields() {
            form = form.text(name, value);
        }
        if let Some(photo) = &request.photo {
            let part = Part::bytes(photo.data.to_vec())
                .file_name(photo.file_name.clone())
                .mime_str(&photo.mime_type)?;
            form = form.part("foto", part);
        }

        let response = self
            .execute(self.client.post(url).multipart(form))
            .await?;
        Ok(response.json().await?)
    }

    /// Aggregate request metrics for the last `hours` hours. Admin only.
    pub async fn monitoring_dashboard(&self, token: &str, hours: u32) -> Result<MonitoringMetrics> {
        let mut url = self.endpoint(&["logger", "monitoring", "dashboard"])?;
        url.query_pairs_mut()
            .append_pair("hours", &hours.to_string());
        self.get_json(url, Some(token)).await
    }

    /// The most recent backend log entries. Admin only.
    pub async fn monitoring_logs(&self, token: &str) -> Result<Vec<LogEntry>> {
        let url = self.endpoint(&["logger", "monitoring", "logs"])?;
        self.get_json(url, Some(token)).await
    }

    /// Stream a cover image to `dest`, returning the number of bytes written.
    pub async fn download_cover<P: AsRef<Path>>(&self, cover_url: &str, dest: P) -> Result<u64> {
        let url = parse_url(cover_url)?;
        debug!("GET {}", url);
        let response = self.execute(self.client.get(url)).await?;

        let dest = dest.as_ref();
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // `dest` only appears once the whole body has arrived.
        let partial = partial_path(dest);
        let written = match write_stream(response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                warn!("Cover download to {} failed: {}", dest.display(), e);
                if let Err(rm) = tokio::fs::remove_file(&partial).await {
                    warn!("Could not remove {}: {}", partial.display(), rm);
                }
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, dest).await?;

        debug!("Wrote {} bytes to {}", written, dest.display());
        Ok(written)
    }
}

async fn write_stream(response: Response, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "cover".into());
    name.push(".part");
    dest.with_file_name(name)
}

/// Value of the `Authorization` header for a token.
pub fn auth_header(token: &str) -> String {
    format!("{} {}", AUTH_SCHEME, token)
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| NotifyError::Config(format!("invalid URL {}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> NotifyApi {
        NotifyApi::new(&ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = api().endpoint(&["album", "AC/DC", "Back in Black"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/api/v1/album/AC%2FDC/Back%20in%20Black"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let config = ClientConfig {
            api_url: "http://localhost:8000/api/v1/".to_string(),
            ..Default::default()
        };
        let api = NotifyApi::new(&config).unwrap();
        let url = api.endpoint(&["albums", "¿Qué?"]).unwrap();
        assert_eq!(url.path(), "/api/v1/albums/%C2%BFQu%C3%A9%3F");
    }

    #[test]
    fn test_partial_path_sits_next_to_dest() {
        assert_eq!(
            partial_path(Path::new("covers/discovery.png")),
            PathBuf::from("covers/discovery.png.part")
        );
    }

    #[test]
    fn test_auth_header() {
        assert_eq!(auth_header("abc123"), "Token abc123");
    }
}
