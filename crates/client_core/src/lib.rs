use reqwest::{Client, StatusCode};
use shared::{
    domain::{is_in_range, CounterOp},
    error::{ApiError, ApiException},
    protocol::{CounterRequest, CounterResponse},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{op} request could not reach the counter service: {source}")]
    Transport {
        op: CounterOp,
        #[source]
        source: reqwest::Error,
    },
    #[error("{op} request was rejected with status {status}")]
    Status {
        op: CounterOp,
        status: StatusCode,
        #[source]
        source: Option<ApiException>,
    },
    #[error("{op} response could not be decoded: {source}")]
    MalformedResponse {
        op: CounterOp,
        #[source]
        source: reqwest::Error,
    },
    #[error("{op} response carried out-of-range value {value}")]
    OutOfRange { op: CounterOp, value: i64 },
}

/// HTTP client for the counter service.
///
/// Keeps the last value the service reported. That copy is a cache only: it
/// is replaced by successful responses and left alone when a request fails.
pub struct CounterClient {
    http: Client,
    server_url: Url,
    last_value: i64,
}

impl CounterClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_http(server_url, Client::new())
    }

    pub fn with_http(server_url: &str, http: Client) -> Result<Self, ClientError> {
        let mut server_url =
            Url::parse(server_url).map_err(|source| ClientError::InvalidServerUrl {
                url: server_url.to_string(),
                source,
            })?;
        // Routes are joined relative to the base, so it must end in a directory.
        if !server_url.path().ends_with('/') {
            let path = format!("{}/", server_url.path());
            server_url.set_path(&path);
        }
        Ok(Self {
            http,
            server_url,
            last_value: 0,
        })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    pub fn last_value(&self) -> i64 {
        self.last_value
    }

    pub async fn increment(&mut self) -> Result<i64, ClientError> {
        self.perform(CounterOp::Increment).await
    }

    pub async fn decrement(&mut self) -> Result<i64, ClientError> {
        self.perform(CounterOp::Decrement).await
    }

    pub async fn read(&mut self) -> Result<i64, ClientError> {
        self.perform(CounterOp::Read).await
    }

    pub async fn reset(&mut self) -> Result<i64, ClientError> {
        self.perform(CounterOp::Reset).await
    }

    pub async fn perform(&mut self, op: CounterOp) -> Result<i64, ClientError> {
        match self.exchange(op).await {
            Ok(value) => {
                debug!(%op, value, "counter updated from service");
                self.last_value = value;
                Ok(value)
            }
            Err(error) => {
                warn!(%op, %error, last_value = self.last_value, "counter request failed");
                Err(error)
            }
        }
    }

    /// Resolves `op`'s route under the server URL, keeping any base path.
    pub fn endpoint(&self, op: CounterOp) -> Result<Url, ClientError> {
        self.server_url
            .join(op.route().trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidServerUrl {
                url: self.server_url.to_string(),
                source,
            })
    }

    async fn exchange(&self, op: CounterOp) -> Result<i64, ClientError> {
        let url = self.endpoint(op)?;

        let request = match op {
            CounterOp::Reset => self.http.get(url),
            _ => self
                .http
                .post(url)
                .json(&CounterRequest::with_value(self.last_value)),
        };
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport { op, source })?;

        let status = response.status();
        if !status.is_success() {
            let source = response.json::<ApiError>().await.ok().map(ApiException::from);
            return Err(ClientError::Status { op, status, source });
        }

        let body: CounterResponse = response
            .json()
            .await
            .map_err(|source| ClientError::MalformedResponse { op, source })?;
        if !is_in_range(body.value) {
            return Err(ClientError::OutOfRange {
                op,
                value: body.value,
            });
        }
        Ok(body.value)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
