//! Chat completions.

use std::io::BufReader;
use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt};
use reqwest::Method;

use crate::client::ClientError;
use crate::http::{AsyncTransport, BlockingTransport};
use crate::model::{ChatCompletion, ChatCompletionChunk};
use crate::request::{chat_payload, ChatRequest};
use crate::sse::{SseIter, SseResponseExt};

const COMPLETIONS_PATH: &str = "/chat/completions";

/// Async stream of completion chunks, ending at `[DONE]`.
pub type ChatStream = BoxStream<'static, Result<ChatCompletionChunk, ClientError>>;

/// Blocking iterator over streamed completion chunks.
pub type BlockingChatStream = SseIter<BufReader<reqwest::blocking::Response>, ChatCompletionChunk>;

#[derive(Debug, Clone)]
pub struct Chat {
    transport: Arc<AsyncTransport>,
}

impl Chat {
    pub(crate) fn new(transport: Arc<AsyncTransport>) -> Self {
        Self { transport }
    }

    /// Create a completion and wait for the whole answer.
    ///
    /// A `stream` flag on the request is ignored; use [`create_stream`](Self::create_stream).
    pub async fn create(&self, request: ChatRequest) -> Result<ChatCompletion, ClientError> {
        let payload = chat_payload(&request.with_stream(false), self.transport.default_models())?;
        self.transport
            .request_json(Method::POST, COMPLETIONS_PATH, Some(&payload))
            .await
    }

    /// Create a completion and receive it as a stream of chunks.
    pub async fn create_stream(
        &self,
        request: ChatRequest,
    ) -> Result<ChatStream, ClientError> {
        let payload = chat_payload(&request.with_stream(true), self.transport.default_models())?;
        let response = self
            .transport
            .request_stream(COMPLETIONS_PATH, &payload)
            .await?;
        Ok(response.sse_events().boxed())
    }
}

#[derive(Debug, Clone)]
pub struct BlockingChat {
    transport: Arc<BlockingTransport>,
}

impl BlockingChat {
    pub(crate) fn new(transport: Arc<BlockingTransport>) -> Self {
        Self { transport }
    }

    pub fn create(&self, request: ChatRequest) -> Result<ChatCompletion, ClientError> {
        let payload = chat_payload(&request.with_stream(false), self.transport.default_models())?;
        self.transport
            .request_json(Method::POST, COMPLETIONS_PATH, Some(&payload))
    }

    pub fn create_stream(&self, request: ChatRequest) -> Result<BlockingChatStream, ClientError> {
        let payload = chat_payload(&request.with_stream(true), self.transport.default_models())?;
        let reader = self.transport.request_stream(COMPLETIONS_PATH, &payload)?;
        Ok(SseIter::new(reader))
    }
}
