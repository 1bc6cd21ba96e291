//! Speech synthesis, transcription and translation.

use std::sync::Arc;

use reqwest::Method;

use crate::client::ClientError;
use crate::http::{AsyncTransport, BlockingTransport};
use crate::model::{AudioSpeechResponse, TranscriptionResponse};
use crate::request::{speech_payload, transcription_payload, SpeechRequest, TranscriptionRequest};

const SPEECH_PATH: &str = "/audio/speech";
const TRANSCRIPTIONS_PATH: &str = "/audio/transcriptions";
const TRANSLATIONS_PATH: &str = "/audio/translations";

#[derive(Debug, Clone)]
pub struct Audio {
    transport: Arc<AsyncTransport>,
}

impl Audio {
    pub(crate) fn new(transport: Arc<AsyncTransport>) -> Self {
        Self { transport }
    }

    pub async fn speech(&self, request: SpeechRequest) -> Result<AudioSpeechResponse, ClientError> {
        let payload = speech_payload(&request, self.transport.default_models());
        self.transport
            .request_json(Method::POST, SPEECH_PATH, Some(&payload))
            .await
    }

    pub async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, ClientError> {
        let payload = transcription_payload(&request, self.transport.default_models());
        self.transport
            .request_json(Method::POST, TRANSCRIPTIONS_PATH, Some(&payload))
            .await
    }

    /// Transcribe and translate into English.
    pub async fn translate(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, ClientError> {
        let payload = transcription_payload(&request, self.transport.default_models());
        self.transport
            .request_json(Method::POST, TRANSLATIONS_PATH, Some(&payload))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct BlockingAudio {
    transport: Arc<BlockingTransport>,
}

impl BlockingAudio {
    pub(crate) fn new(transport: Arc<BlockingTransport>) -> Self {
        Self { transport }
    }

    pub fn speech(&self, request: SpeechRequest) -> Result<AudioSpeechResponse, ClientError> {
        let payload = speech_payload(&request, self.transport.default_models());
        self.transport
            .request_json(Method::POST, SPEECH_PATH, Some(&payload))
    }

    pub fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, ClientError> {
        let payload = transcription_payload(&request, self.transport.default_models());
        self.transport
            .request_json(Method::POST, TRANSCRIPTIONS_PATH, Some(&payload))
    }

    pub fn translate(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, ClientError> {
        let payload = transcription_payload(&request, self.transport.default_models());
        self.transport
            .request_json(Method::POST, TRANSLATIONS_PATH, Some(&payload))
    }
}
