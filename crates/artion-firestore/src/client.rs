//! HTTP client for the Firestore REST API.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use artion_core::error::{BackendError, InvalidInputError, TransportError};
use artion_core::{Error, Result};

/// Body of a failed request: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<u16>,
    message: Option<String>,
    status: Option<String>,
}

/// Thin wrapper around `reqwest::Client` that maps failures onto the crate's
/// error type.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(token: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                InvalidInputError::Other {
                    message: "access token contains invalid header characters".to_string(),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("artion/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(transport_error)?;
        Ok(Self { client })
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        trace!(%method, url, "Firestore request");
        self.client.request(method, url)
    }

    /// Send a request and decode a successful JSON body.
    pub async fn send_json<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(Error::wire)
    }

    /// Send a request, returning `None` instead of an error on 404.
    pub async fn send_json_optional<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<R>> {
        match self.send_json(request).await {
            Ok(body) => Ok(Some(body)),
            Err(Error::Backend(e)) if e.status == StatusCode::NOT_FOUND.as_u16() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Send a request whose successful body is irrelevant.
    pub async fn send_no_content(&self, request: RequestBuilder) -> Result<()> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        trace!(status = %status, "Firestore response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Backend(parse_error_response(response).await))
        }
    }
}

/// Build a [`BackendError`] from a failed response.
///
/// `runQuery` wraps its error in a one-element array; other endpoints
/// return the envelope directly.
async fn parse_error_response(response: Response) -> BackendError {
    let status = response.status().as_u16();
    let body = response.bytes().await.unwrap_or_default();

    let envelope = serde_json::from_slice::<ErrorEnvelope>(&body).ok().or_else(|| {
        serde_json::from_slice::<Vec<ErrorEnvelope>>(&body)
            .ok()
            .and_then(|mut all| all.pop())
    });

    match envelope {
        Some(envelope) => BackendError::new(status, envelope.error.status, envelope.error.message),
        None => BackendError::new(status, None, None),
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        assert!(HttpClient::new(None, None).is_ok());
        assert!(HttpClient::new(Some("token"), Some(Duration::from_secs(5))).is_ok());
    }

    #[test]
    fn token_with_newline_rejected() {
        let err = HttpClient::new(Some("bad\ntoken"), None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
