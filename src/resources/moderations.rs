//! Content moderation.

use std::sync::Arc;

use reqwest::Method;

use crate::client::ClientError;
use crate::http::{AsyncTransport, BlockingTransport};
use crate::model::ModerationResponse;
use crate::request::{moderation_payload, ModerationRequest};

const MODERATIONS_PATH: &str = "/moderations";

#[derive(Debug, Clone)]
pub struct Moderations {
    transport: Arc<AsyncTransport>,
}

impl Moderations {
    pub(crate) fn new(transport: Arc<AsyncTransport>) -> Self {
        Self { transport }
    }

    pub async fn create(
        &self,
        request: ModerationRequest,
    ) -> Result<ModerationResponse, ClientError> {
        let payload = moderation_payload(&request, self.transport.default_models())?;
        self.transport
            .request_json(Method::POST, MODERATIONS_PATH, Some(&payload))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct BlockingModerations {
    transport: Arc<BlockingTransport>,
}

impl BlockingModerations {
    pub(crate) fn new(transport: Arc<BlockingTransport>) -> Self {
        Self { transport }
    }

    pub fn create(&self, request: ModerationRequest) -> Result<ModerationResponse, ClientError> {
        let payload = moderation_payload(&request, self.transport.default_models())?;
        self.transport
            .request_json(Method::POST, MODERATIONS_PATH, Some(&payload))
    }
}
