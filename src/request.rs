use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::RequestError;

/// Thin wrapper around a pooled reqwest client used for every upstream call.
///
/// Requests are never retried: a failed call is reported once and the
/// caller waits for its next scheduled cycle.
#[derive(Clone)]
pub struct Request {
    client: Client,
}

impl Request {
    pub fn new(timeout: Duration) -> Result<Self, RequestError> {
        Ok(Self {
            client: Self::create_client(timeout)?,
        })
    }

    /// Creates an HTTP client with connection pooling shared by all monitor tasks
    fn create_client(timeout: Duration) -> Result<Client, RequestError> {
        Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Duration::from_secs(30))
            .no_proxy()
            .build()
            .map_err(|e| RequestError::ConnectionError(e.to_string()))
    }

    /// Sends a GET request and decodes a 200 response body as `T`.
    ///
    /// # Errors
    ///
    /// * `RequestError::StatusError` - for any status other than 200
    /// * `RequestError::TimeoutError` / `ConnectionError` - transport failures
    /// * `RequestError::DecodeError` - the body is not the expected JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RequestError> {
        debug!("Sending request to {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RequestError::TimeoutError(format!("{}: {}", url, e))
            } else if e.is_connect() {
                RequestError::ConnectionError(format!("{}: {}", url, e))
            } else {
                RequestError::ApiError(format!("Request failed for URL: {}: {}", url, e))
            }
        })?;

        debug!("Response from {}: status {}", url, response.status());

        match response.status() {
            StatusCode::OK => response
                .json::<T>()
                .await
                .map_err(|e| RequestError::DecodeError(format!("{}: {}", url, e))),
            status => Err(RequestError::StatusError {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_get_json_maps_statuses() {
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("GET", "/ok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"a": 1}"#)
            .create_async()
            .await;
        let failing = server
            .mock("GET", "/fail")
            .with_status(503)
            .create_async()
            .await;
        let garbage = server
            .mock("GET", "/garbage")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let request = Request::new(Duration::from_secs(5)).unwrap();

        let value: Value = request.get_json(&format!("{}/ok", server.url())).await.unwrap();
        assert_eq!(value["a"], 1);

        let err = request
            .get_json::<Value>(&format!("{}/fail", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::StatusError { status: 503, .. }));

        let err = request
            .get_json::<Value>(&format!("{}/garbage", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::DecodeError(_)));

        ok.assert_async().await;
        failing.assert_async().await;
        garbage.assert_async().await;
    }
}
