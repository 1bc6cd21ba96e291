//! HTTP transport: builds `reqwest` clients from the resolved config and
//! dispatches calls, in an async and a blocking flavour.
//!
//! Both transports funnel their responses through the same pure helpers
//! ([`endpoint_url`], [`decode_json`], [`check_content`]) so they cannot
//! disagree on URLs, error mapping or decoding.

use std::io::BufReader;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::client::ClientError;
use crate::options::{ClientConfig, DefaultModels};
use crate::request::Payload;

const JSON: &str = "application/json";
const EVENT_STREAM: &str = "text/event-stream";
const USER_AGENT_VALUE: &str = concat!("shuttleai-rs/", env!("CARGO_PKG_VERSION"));

/// Join the base URL and an endpoint path.
///
/// # Example
/// ```
/// use shuttleai::http::endpoint_url;
///
/// assert_eq!(
///     endpoint_url("https://api.shuttleai.com/v1/", "/chat/completions"),
///     "https://api.shuttleai.com/v1/chat/completions"
/// );
/// ```
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Percent-encode a caller-supplied id for use as one path segment.
///
/// # Example
/// ```
/// use shuttleai::http::path_segment;
///
/// assert_eq!(path_segment("openai/gpt-4o"), "openai%2Fgpt-4o");
/// ```
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Map a finished response to the declared type.
///
/// Non-2xx becomes [`ClientError::Api`] carrying the raw body; a 2xx body
/// that does not fit `T` becomes [`ClientError::Decode`].
pub fn decode_json<T: DeserializeOwned>(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<T, ClientError> {
    tracing::debug!(%status, bytes = body.len(), "received response");
    if !status.is_success() {
        return Err(api_error(status, headers.clone(), body));
    }
    Ok(serde_json::from_slice(body)?)
}

/// Pass binary content through, or report a failed content fetch.
pub fn check_content(status: StatusCode, body: Bytes) -> Result<Bytes, ClientError> {
    if !status.is_success() {
        tracing::warn!(%status, "content fetch failed");
        return Err(ClientError::ContentFetch {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(body)
}

fn api_error(status: StatusCode, headers: HeaderMap, body: &[u8]) -> ClientError {
    tracing::warn!(%status, "API request failed");
    ClientError::Api {
        status,
        headers,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

/// Headers sent with every API call (not with absolute content URLs).
fn api_headers(config: &ClientConfig) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
            .map_err(|_| ClientError::Config("Invalid API key".to_string()))?,
    );

    for (key, value) in &config.extra_headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| ClientError::Config(format!("Invalid header name: {key}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ClientError::Config(format!("Invalid value for header {key}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

fn proxy(config: &ClientConfig) -> Result<Option<reqwest::Proxy>, ClientError> {
    config
        .proxy
        .as_deref()
        .map(|url| {
            reqwest::Proxy::all(url)
                .map_err(|err| ClientError::Config(format!("Invalid proxy URL {url}: {err}")))
        })
        .transpose()
}

/// Build a configured async HTTP client.
pub fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, ClientError> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(USER_AGENT_VALUE);

    if let Some(proxy) = proxy(config)? {
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

/// Build a configured blocking HTTP client.
pub fn build_blocking_client(
    config: &ClientConfig,
) -> Result<reqwest::blocking::Client, ClientError> {
    let mut builder = reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .user_agent(USER_AGENT_VALUE);

    if let Some(proxy) = proxy(config)? {
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

/// Async dispatcher over `reqwest::Client`.
#[derive(Debug)]
pub struct AsyncTransport {
    http: reqwest::Client,
    headers: HeaderMap,
    config: Arc<ClientConfig>,
}

impl AsyncTransport {
    pub fn new(config: Arc<ClientConfig>) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http_client(&config)?,
            headers: api_headers(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn default_models(&self) -> &DefaultModels {
        &self.config.default_models
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Payload>,
    ) -> reqwest::RequestBuilder {
        let url = endpoint_url(&self.config.base_url, path);
        tracing::debug!(%method, %url, "dispatching request");
        let request = self.http.request(method, url).headers(self.headers.clone());
        match payload {
            Some(payload) => request.json(payload),
            None => request,
        }
    }

    /// Send a call and decode its JSON body into `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Payload>,
    ) -> Result<T, ClientError> {
        let response = self.request(method, path, payload).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        decode_json(status, &headers, &body)
    }

    /// Send a call and return the raw body with the given `Accept` header.
    pub async fn request_bytes(
        &self,
        method: Method,
        path: &str,
        accept: &str,
    ) -> Result<Bytes, ClientError> {
        let response = self
            .request(method, path, None)
            .header(ACCEPT, accept)
            .send()
            .await?;
        let status = response.status();
        check_content(status, response.bytes().await?)
    }

    /// Open an event stream. The returned response is known to be 2xx.
    pub async fn request_stream(
        &self,
        path: &str,
        payload: &Payload,
    ) -> Result<reqwest::Response, ClientError> {
        let response = self
            .request(Method::POST, path, Some(payload))
            .header(ACCEPT, EVENT_STREAM)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            return Err(api_error(status, headers, &body));
        }
        Ok(response)
    }

    /// GET an absolute URL without API credentials.
    pub async fn fetch_url(&self, url: &str) -> Result<Bytes, ClientError> {
        tracing::debug!(%url, "fetching content");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        check_content(status, response.bytes().await?)
    }
}

/// Blocking dispatcher over `reqwest::blocking::Client`.
#[derive(Debug)]
pub struct BlockingTransport {
    http: reqwest::blocking::Client,
    headers: HeaderMap,
    config: Arc<ClientConfig>,
}

impl BlockingTransport {
    pub fn new(config: Arc<ClientConfig>) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_blocking_client(&config)?,
            headers: api_headers(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn default_models(&self) -> &DefaultModels {
        &self.config.default_models
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Payload>,
    ) -> reqwest::blocking::RequestBuilder {
        let url = endpoint_url(&self.config.base_url, path);
        tracing::debug!(%method, %url, "dispatching request");
        let request = self.http.request(method, url).headers(self.headers.clone());
        match payload {
            Some(payload) => request.json(payload),
            None => request,
        }
    }

    pub fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Payload>,
    ) -> Result<T, ClientError> {
        let response = self.request(method, path, payload).send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?;
        decode_json(status, &headers, &body)
    }

    pub fn request_bytes(
        &self,
        method: Method,
        path: &str,
        accept: &str,
    ) -> Result<Bytes, ClientError> {
        let response = self
            .request(method, path, None)
            .header(ACCEPT, accept)
            .send()?;
        let status = response.status();
        check_content(status, response.bytes()?)
    }

    pub fn request_stream(
        &self,
        path: &str,
        payload: &Payload,
    ) -> Result<BufReader<reqwest::blocking::Response>, ClientError> {
        let response = self
            .request(Method::POST, path, Some(payload))
            .header(ACCEPT, EVENT_STREAM)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.bytes()?;
            return Err(api_error(status, headers, &body));
        }
        Ok(BufReader::new(response))
    }

    pub fn fetch_url(&self, url: &str) -> Result<Bytes, ClientError> {
        tracing::debug!(%url, "fetching content");
        let response = self.http.get(url).send()?;
        let status = response.status();
        check_content(status, response.bytes()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChatCompletion;
    use crate::options::ClientOptions;
    use serde_json::json;
    use std::time::Duration;

    fn config(options: ClientOptions) -> ClientConfig {
        ClientConfig::resolve_with(options.with_api_key("test"), |_| None).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let config = config(ClientOptions::new().with_timeout(Duration::from_secs(30)));
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_build_http_client_with_proxy() {
        let config = config(ClientOptions::new().with_proxy("http://proxy.example.com:8080"));
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_api_headers_include_auth_and_extras() {
        let config = config(ClientOptions::new().with_header("x-trace", "abc"));
        let headers = api_headers(&config).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer test");
        assert_eq!(headers[CONTENT_TYPE], JSON);
        assert_eq!(headers["x-trace"], "abc");
    }

    #[test]
    fn test_invalid_extra_header_is_config_error() {
        let config = config(ClientOptions::new().with_header("bad header", "x"));
        assert!(matches!(api_headers(&config), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_decode_json_separates_api_and_decode_errors() {
        let headers = HeaderMap::new();

        let api = decode_json::<ChatCompletion>(StatusCode::UNAUTHORIZED, &headers, b"{}");
        assert!(matches!(
            api,
            Err(ClientError::Api { status, .. }) if status == StatusCode::UNAUTHORIZED
        ));

        let decode = decode_json::<ChatCompletion>(StatusCode::OK, &headers, br#"{"id": 1}"#);
        assert!(matches!(decode, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_decode_json_is_repeatable() {
        let body = serde_json::to_vec(&json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 7,
            "model": "shuttle-3.5",
            "choices": []
        }))
        .unwrap();
        let first: ChatCompletion = decode_json(StatusCode::OK, &HeaderMap::new(), &body).unwrap();
        let second: ChatCompletion = decode_json(StatusCode::OK, &HeaderMap::new(), &body).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_check_content() {
        let ok = check_content(StatusCode::OK, Bytes::from_static(b"\x00\x01"));
        assert_eq!(ok.unwrap().as_ref(), b"\x00\x01");

        let err = check_content(StatusCode::NOT_FOUND, Bytes::from_static(b"gone"));
        assert!(matches!(
            err,
            Err(ClientError::ContentFetch { status, .. }) if status == StatusCode::NOT_FOUND
        ));
    }
}
