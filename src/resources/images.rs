//! Image generation.

use std::sync::Arc;

use reqwest::Method;

use crate::client::ClientError;
use crate::http::{AsyncTransport, BlockingTransport};
use crate::model::ImageGenerationResponse;
use crate::request::{image_payload, ImageRequest};

const GENERATIONS_PATH: &str = "/images/generations";

#[derive(Debug, Clone)]
pub struct Images {
    transport: Arc<AsyncTransport>,
}

impl Images {
    pub(crate) fn new(transport: Arc<AsyncTransport>) -> Self {
        Self { transport }
    }

    pub async fn generate(
        &self,
        request: ImageRequest,
    ) -> Result<ImageGenerationResponse, ClientError> {
        let payload = image_payload(&request, self.transport.default_models());
        self.transport
            .request_json(Method::POST, GENERATIONS_PATH, Some(&payload))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct BlockingImages {
    transport: Arc<BlockingTransport>,
}

impl BlockingImages {
    pub(crate) fn new(transport: Arc<BlockingTransport>) -> Self {
        Self { transport }
    }

    pub fn generate(&self, request: ImageRequest) -> Result<ImageGenerationResponse, ClientError> {
        let payload = image_payload(&request, self.transport.default_models());
        self.transport
            .request_json(Method::POST, GENERATIONS_PATH, Some(&payload))
    }
}
