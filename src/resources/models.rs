//! Model catalogue.

use std::sync::Arc;

use reqwest::Method;

use crate::client::ClientError;
use crate::http::{path_segment, AsyncTransport, BlockingTransport};
use crate::model::{ModelInfo, ModelList};

const MODELS_PATH: &str = "/models";

fn model_path(model_id: &str) -> String {
    format!("{MODELS_PATH}/{}", path_segment(model_id))
}

#[derive(Debug, Clone)]
pub struct Models {
    transport: Arc<AsyncTransport>,
}

impl Models {
    pub(crate) fn new(transport: Arc<AsyncTransport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<ModelList, ClientError> {
        self.transport
            .request_json(Method::GET, MODELS_PATH, None)
            .await
    }

    pub async fn retrieve(&self, model_id: &str) -> Result<ModelInfo, ClientError> {
        self.transport
            .request_json(Method::GET, &model_path(model_id), None)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct BlockingModels {
    transport: Arc<BlockingTransport>,
}

impl BlockingModels {
    pub(crate) fn new(transport: Arc<BlockingTransport>) -> Self {
        Self { transport }
    }

    pub fn list(&self) -> Result<ModelList, ClientError> {
        self.transport.request_json(Method::GET, MODELS_PATH, None)
    }

    pub fn retrieve(&self, model_id: &str) -> Result<ModelInfo, ClientError> {
        self.transport
            .request_json(Method::GET, &model_path(model_id), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_path_escapes_id() {
        assert_eq!(model_path("shuttle-3.5"), "/models/shuttle-3.5");
        assert_eq!(model_path("openai/gpt-4o"), "/models/openai%2Fgpt-4o");
    }
}
