//! HTTP client for the asset store service
//!
//! [`SoundApi`] is the seam the controller talks through; [`HttpSoundApi`] is
//! the reqwest-backed implementation.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use thiserror::Error;

use timer_sounds_types::{MessageResponse, UPLOAD_FIELD};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid server url {url}")]
    InvalidUrl { url: String },

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Remote operations the countdown controller needs
#[async_trait]
pub trait SoundApi: Send + Sync {
    /// `GET /sounds`
    async fn list(&self) -> Result<Vec<String>, ApiClientError>;

    /// `POST /upload` with every path as one `sounds` part
    async fn upload(&self, files: Vec<PathBuf>) -> Result<String, ApiClientError>;

    /// `DELETE /delete/{name}`
    async fn delete(&self, name: &str) -> Result<String, ApiClientError>;

    /// `GET /uploads/{name}`
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, ApiClientError>;
}

/// reqwest-backed [`SoundApi`]
#[derive(Debug, Clone)]
pub struct HttpSoundApi {
    client: Client,
    base: Url,
}

impl HttpSoundApi {
    pub fn new(server_url: &str) -> Result<Self, ApiClientError> {
        let base = Url::parse(server_url).map_err(|_| ApiClientError::InvalidUrl {
            url: server_url.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiClientError::InvalidUrl {
                url: server_url.to_string(),
            });
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiClientError::InvalidUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<Response, ApiClientError> {
        let response = request
            .send()
            .await
            .map_err(|source| ApiClientError::Request {
                url: url.to_string(),
                source,
            })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let message = response
            .json::<MessageResponse>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| "no message".to_string());
        Err(ApiClientError::Status {
            url: url.to_string(),
            status,
            message,
        })
    }

    async fn message(response: Response, url: &Url) -> Result<String, ApiClientError> {
        response
            .json::<MessageResponse>()
            .await
            .map(|body| body.message)
            .map_err(|source| ApiClientError::Request {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl SoundApi for HttpSoundApi {
    async fn list(&self) -> Result<Vec<String>, ApiClientError> {
        let url = self.endpoint(&["sounds"])?;
        let request = self.client.get(url.clone()).timeout(REQUEST_TIMEOUT);
        let response = self.send(request, &url).await?;
        response
            .json::<Vec<String>>()
            .await
            .map_err(|source| ApiClientError::Request {
                url: url.to_string(),
                source,
            })
    }

    async fn upload(&self, files: Vec<PathBuf>) -> Result<String, ApiClientError> {
        let url = self.endpoint(&["upload"])?;

        let mut form = Form::new();
        for path in files {
            let content = tokio::fs::read(&path)
                .await
                .map_err(|source| ApiClientError::ReadFile {
                    path: path.clone(),
                    source,
                })?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "sound".to_string());
            form = form.part(UPLOAD_FIELD, Part::bytes(content).file_name(filename));
        }

        let request = self
            .client
            .post(url.clone())
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT);
        let response = self.send(request, &url).await?;
        Self::message(response, &url).await
    }

    async fn delete(&self, name: &str) -> Result<String, ApiClientError> {
        let url = self.endpoint(&["delete", name])?;
        let request = self.client.delete(url.clone()).timeout(REQUEST_TIMEOUT);
        let response = self.send(request, &url).await?;
        Self::message(response, &url).await
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>, ApiClientError> {
        let url = self.endpoint(&["uploads", name])?;
        let request = self.client.get(url.clone()).timeout(REQUEST_TIMEOUT);
        let response = self.send(request, &url).await?;
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|source| ApiClientError::Request {
                url: url.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_names() {
        let api = HttpSoundApi::new("http://localhost:3001").unwrap();
        let url = api.endpoint(&["delete", "1-my song.mp3"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/delete/1-my%20song.mp3");

        let url = api.endpoint(&["uploads", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/uploads/a%2Fb");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = HttpSoundApi::new("https://example.com/timer/").unwrap();
        let url = api.endpoint(&["sounds"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/timer/sounds");
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(matches!(
            HttpSoundApi::new("mailto:someone@example.com"),
            Err(ApiClientError::InvalidUrl { .. })
        ));
        assert!(HttpSoundApi::new("not a url").is_err());
    }
}
