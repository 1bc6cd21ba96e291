//! Text embeddings.

use std::sync::Arc;

use reqwest::Method;

use crate::client::ClientError;
use crate::http::{AsyncTransport, BlockingTransport};
use crate::model::EmbeddingResponse;
use crate::request::{embedding_payload, EmbeddingRequest};

const EMBEDDINGS_PATH: &str = "/embeddings";

#[derive(Debug, Clone)]
pub struct Embeddings {
    transport: Arc<AsyncTransport>,
}

impl Embeddings {
    pub(crate) fn new(transport: Arc<AsyncTransport>) -> Self {
        Self { transport }
    }

    pub async fn create(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, ClientError> {
        let payload = embedding_payload(&request, self.transport.default_models())?;
        self.transport
            .request_json(Method::POST, EMBEDDINGS_PATH, Some(&payload))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct BlockingEmbeddings {
    transport: Arc<BlockingTransport>,
}

impl BlockingEmbeddings {
    pub(crate) fn new(transport: Arc<BlockingTransport>) -> Self {
        Self { transport }
    }

    pub fn create(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ClientError> {
        let payload = embedding_payload(&request, self.transport.default_models())?;
        self.transport
            .request_json(Method::POST, EMBEDDINGS_PATH, Some(&payload))
    }
}
