//! Client entry points and error types.
//!
//! [`ShuttleAi`] suspends at the network boundary and is meant for async
//! code; [`BlockingShuttleAi`] runs every call to completion on the calling
//! thread. Both share the same configuration, request builders and decoders,
//! so a call produces the same payload either way.

use std::sync::{Arc, OnceLock};

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::http::{AsyncTransport, BlockingTransport};
use crate::options::{BaseUrlNotice, ClientConfig, ClientOptions};
use crate::resources::{
    Audio, BlockingAudio, BlockingChat, BlockingEmbeddings, BlockingImages, BlockingInsults,
    BlockingJokes, BlockingModels, BlockingModerations, BlockingVideo, BlockingWeb, Chat,
    Embeddings, Images, Insults, Jokes, Models, Moderations, Video, Web,
};

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {body}")]
    Api {
        status: StatusCode,
        headers: HeaderMap,
        body: String,
    },

    /// The body could not be parsed into the expected shape.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("JSON encode error: {0}")]
    Encode(serde_json::Error),

    /// Fetching generated binary content returned a non-2xx status.
    #[error("Content fetch failed ({status}): {body}")]
    ContentFetch { status: StatusCode, body: String },

    #[error("No video URL available")]
    MissingVideoUrl,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ClientError {
    /// HTTP status of an API or content-fetch error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } | ClientError::ContentFetch { status, .. } => {
                Some(*status)
            }
            ClientError::Http(err) => err.status(),
            _ => None,
        }
    }

    /// `error.message` of a structured API error body, if the body has one.
    pub fn message(&self) -> Option<String> {
        match self {
            ClientError::Api { body, .. } => serde_json::from_str::<ApiErrorBody>(body)
                .ok()
                .map(|parsed| parsed.error.message),
            _ => None,
        }
    }
}

fn announce(config: &ClientConfig) {
    if let Some(notice) = config.notice {
        tracing::warn!(base_url = %config.base_url, "{}", notice);
    }
    tracing::info!(base_url = %config.base_url, "ShuttleAI client initialized");
}

/// Async ShuttleAI client. Cheap facades are built on first access and reused.
///
/// # Example
/// ```no_run
/// use shuttleai::{ChatMessage, ChatRequest, ShuttleAi};
/// use shuttleai::options::ClientOptions;
///
/// #[tokio::main]
/// async fn main() -> Result<(), shuttleai::ClientError> {
///     let client = ShuttleAi::new(ClientOptions::new().with_api_key("sk-..."))?;
///     let completion = client
///         .chat()
///         .create(ChatRequest::new([ChatMessage::user("Hello!")]))
///         .await?;
///     println!("{:?}", completion.first_content());
///     Ok(())
/// }
/// ```
pub struct ShuttleAi {
    transport: Arc<AsyncTransport>,
    chat: OnceLock<Chat>,
    images: OnceLock<Images>,
    video: OnceLock<Video>,
    audio: OnceLock<Audio>,
    embeddings: OnceLock<Embeddings>,
    moderations: OnceLock<Moderations>,
    models: OnceLock<Models>,
    jokes: OnceLock<Jokes>,
    insults: OnceLock<Insults>,
    web: OnceLock<Web>,
}

impl ShuttleAi {
    /// Resolve options against the environment and build the client.
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        Self::from_config(ClientConfig::resolve(options)?)
    }

    /// Build the client purely from `SHUTTLEAI_API_KEY` / `SHUTTLEAI_API_BASE`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientOptions::default())
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        announce(&config);
        Ok(Self {
            transport: Arc::new(AsyncTransport::new(Arc::new(config))?),
            chat: OnceLock::new(),
            images: OnceLock::new(),
            video: OnceLock::new(),
            audio: OnceLock::new(),
            embeddings: OnceLock::new(),
            moderations: OnceLock::new(),
            models: OnceLock::new(),
            jokes: OnceLock::new(),
            insults: OnceLock::new(),
            web: OnceLock::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// Warning raised at construction for a non-official base URL.
    pub fn base_url_notice(&self) -> Option<BaseUrlNotice> {
        self.config().notice
    }

    pub fn chat(&self) -> &Chat {
        self.chat.get_or_init(|| Chat::new(self.transport.clone()))
    }

    pub fn images(&self) -> &Images {
        self.images.get_or_init(|| Images::new(self.transport.clone()))
    }

    pub fn video(&self) -> &Video {
        self.video.get_or_init(|| Video::new(self.transport.clone()))
    }

    pub fn audio(&self) -> &Audio {
        self.audio.get_or_init(|| Audio::new(self.transport.clone()))
    }

    pub fn embeddings(&self) -> &Embeddings {
        self.embeddings
            .get_or_init(|| Embeddings::new(self.transport.clone()))
    }

    pub fn moderations(&self) -> &Moderations {
        self.moderations
            .get_or_init(|| Moderations::new(self.transport.clone()))
    }

    pub fn models(&self) -> &Models {
        self.models.get_or_init(|| Models::new(self.transport.clone()))
    }

    pub fn jokes(&self) -> &Jokes {
        self.jokes.get_or_init(|| Jokes::new(self.transport.clone()))
    }

    pub fn insults(&self) -> &Insults {
        self.insults.get_or_init(|| Insults::new(self.transport.clone()))
    }

    pub fn web(&self) -> &Web {
        self.web.get_or_init(|| Web::new(self.transport.clone()))
    }
}

/// Blocking ShuttleAI client.
///
/// Must not be constructed or dropped inside an async runtime; use
/// [`ShuttleAi`] there.
pub struct BlockingShuttleAi {
    transport: Arc<BlockingTransport>,
    chat: OnceLock<BlockingChat>,
    images: OnceLock<BlockingImages>,
    video: OnceLock<BlockingVideo>,
    audio: OnceLock<BlockingAudio>,
    embeddings: OnceLock<BlockingEmbeddings>,
    moderations: OnceLock<BlockingModerations>,
    models: OnceLock<BlockingModels>,
    jokes: OnceLock<BlockingJokes>,
    insults: OnceLock<BlockingInsults>,
    web: OnceLock<BlockingWeb>,
}

impl BlockingShuttleAi {
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        Self::from_config(ClientConfig::resolve(options)?)
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientOptions::default())
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        announce(&config);
        Ok(Self {
            transport: Arc::new(BlockingTransport::new(Arc::new(config))?),
            chat: OnceLock::new(),
            images: OnceLock::new(),
            video: OnceLock::new(),
            audio: OnceLock::new(),
            embeddings: OnceLock::new(),
            moderations: OnceLock::new(),
            models: OnceLock::new(),
            jokes: OnceLock::new(),
            insults: OnceLock::new(),
            web: OnceLock::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    pub fn base_url_notice(&self) -> Option<BaseUrlNotice> {
        self.config().notice
    }

    pub fn chat(&self) -> &BlockingChat {
        self.chat
            .get_or_init(|| BlockingChat::new(self.transport.clone()))
    }

    pub fn images(&self) -> &BlockingImages {
        self.images
            .get_or_init(|| BlockingImages::new(self.transport.clone()))
    }

    pub fn video(&self) -> &BlockingVideo {
        self.video
            .get_or_init(|| BlockingVideo::new(self.transport.clone()))
    }

    pub fn audio(&self) -> &BlockingAudio {
        self.audio
            .get_or_init(|| BlockingAudio::new(self.transport.clone()))
    }

    pub fn embeddings(&self) -> &BlockingEmbeddings {
        self.embeddings
            .get_or_init(|| BlockingEmbeddings::new(self.transport.clone()))
    }

    pub fn moderations(&self) -> &BlockingModerations {
        self.moderations
            .get_or_init(|| BlockingModerations::new(self.transport.clone()))
    }

    pub fn models(&self) -> &BlockingModels {
        self.models
            .get_or_init(|| BlockingModels::new(self.transport.clone()))
    }

    pub fn jokes(&self) -> &BlockingJokes {
        self.jokes
            .get_or_init(|| BlockingJokes::new(self.transport.clone()))
    }

    pub fn insults(&self) -> &BlockingInsults {
        self.insults
            .get_or_init(|| BlockingInsults::new(self.transport.clone()))
    }

    pub fn web(&self) -> &BlockingWeb {
        self.web.get_or_init(|| BlockingWeb::new(self.transport.clone()))
    }
}
