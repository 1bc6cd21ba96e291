//! # shuttleai - ShuttleAI API client
//!
//! A small, pragmatic client for the ShuttleAI API: chat, images, video,
//! audio, embeddings, moderations, the model catalogue and a few novelty
//! endpoints.
//!
//! ## Features
//! - Async client ([`ShuttleAi`], tokio/reqwest) and blocking client ([`BlockingShuttleAi`])
//!   sharing the same payload builders and decoders
//! - Streaming chat completions via Server-Sent Events
//! - Video generation jobs with an explicit polling contract
//! - Typed request/response models; unset arguments are never sent as `null`
//!
//! ## Architecture
//!
//! - **[`request`]**: pure functions turning call arguments into a payload,
//!   filling in per-resource default models
//! - **[`http`]**: transports that send a payload and decode the typed response
//! - **[`resources`]**: one facade per capability, built lazily per client
//! - **[`video`]**: job schemas, status sets and [`wait_for_job`](video::wait_for_job)
//!
//! ## Example
//! ```no_run
//! use shuttleai::{ChatMessage, ChatRequest, ShuttleAi};
//! use shuttleai::options::ClientOptions;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), shuttleai::ClientError> {
//!     // Falls back to SHUTTLEAI_API_KEY / SHUTTLEAI_API_BASE when unset
//!     let client = ShuttleAi::new(ClientOptions::new().with_api_key("your-api-key"))?;
//!
//!     let request = ChatRequest::new([ChatMessage::user("Hello!")]).with_max_tokens(100);
//!     let mut stream = client.chat().create_stream(request).await?;
//!     while let Some(chunk) = stream.next().await {
//!         print!("{}", chunk?.delta_content().unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod model;
pub mod options;
pub mod request;
pub mod resources;
pub mod sse;
pub mod video;

// Re-exports for convenience
pub use client::{BlockingShuttleAi, ClientError, ShuttleAi};
pub use model::{
    ChatCompletion, ChatCompletionChunk, ChatMessage, Function, MessageInput, Role, Tool,
    ToolChoice, UsageInfo,
};
pub use options::{BaseUrlNotice, ClientConfig, ClientOptions};
pub use request::{
    ChatRequest, EmbeddingRequest, ImageRequest, ModerationRequest, Payload, SpeechRequest,
    TranscriptionRequest, VideoRequest,
};
pub use video::{VideoGeneration, VideoGenerationResponse, VideoJobResponse, VideoJobStatus};
