//! Novelty endpoints: jokes, insults and web search.

use std::sync::Arc;

use reqwest::Method;

use crate::client::ClientError;
use crate::http::{AsyncTransport, BlockingTransport};
use crate::model::{InsultResponse, JokeResponse, WebSearchResponse};
use crate::request::web_search_payload;

const JOKES_PATH: &str = "/etc/jokes";
const INSULTS_PATH: &str = "/etc/insults";
const WEB_PATH: &str = "/etc/web";

#[derive(Debug, Clone)]
pub struct Jokes {
    transport: Arc<AsyncTransport>,
}

impl Jokes {
    pub(crate) fn new(transport: Arc<AsyncTransport>) -> Self {
        Self { transport }
    }

    pub async fn random(&self) -> Result<JokeResponse, ClientError> {
        self.transport
            .request_json(Method::GET, JOKES_PATH, None)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct Insults {
    transport: Arc<AsyncTransport>,
}

impl Insults {
    pub(crate) fn new(transport: Arc<AsyncTransport>) -> Self {
        Self { transport }
    }

    pub async fn random(&self) -> Result<InsultResponse, ClientError> {
        self.transport
            .request_json(Method::GET, INSULTS_PATH, None)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct Web {
    transport: Arc<AsyncTransport>,
}

impl Web {
    pub(crate) fn new(transport: Arc<AsyncTransport>) -> Self {
        Self { transport }
    }

    pub async fn search(&self, query: &str) -> Result<WebSearchResponse, ClientError> {
        let payload = web_search_payload(query);
        self.transport
            .request_json(Method::POST, WEB_PATH, Some(&payload))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct BlockingJokes {
    transport: Arc<BlockingTransport>,
}

impl BlockingJokes {
    pub(crate) fn new(transport: Arc<BlockingTransport>) -> Self {
        Self { transport }
    }

    pub fn random(&self) -> Result<JokeResponse, ClientError> {
        self.transport.request_json(Method::GET, JOKES_PATH, None)
    }
}

#[derive(Debug, Clone)]
pub struct BlockingInsults {
    transport: Arc<BlockingTransport>,
}

impl BlockingInsults {
    pub(crate) fn new(transport: Arc<BlockingTransport>) -> Self {
        Self { transport }
    }

    pub fn random(&self) -> Result<InsultResponse, ClientError> {
        self.transport.request_json(Method::GET, INSULTS_PATH, None)
    }
}

#[derive(Debug, Clone)]
pub struct BlockingWeb {
    transport: Arc<BlockingTransport>,
}

impl BlockingWeb {
    pub(crate) fn new(transport: Arc<BlockingTransport>) -> Self {
        Self { transport }
    }

    pub fn search(&self, query: &str) -> Result<WebSearchResponse, ClientError> {
        let payload = web_search_payload(query);
        self.transport
            .request_json(Method::POST, WEB_PATH, Some(&payload))
    }
}
