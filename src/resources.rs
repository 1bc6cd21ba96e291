//! Resource facades, one module per API capability.
//!
//! Each module pairs an async facade over [`AsyncTransport`](crate::http::AsyncTransport)
//! with a blocking one over [`BlockingTransport`](crate::http::BlockingTransport).
//! Both call the same payload builder and decoder.

pub mod audio;
pub mod chat;
pub mod embeddings;
pub mod etc;
pub mod images;
pub mod models;
pub mod moderations;
pub mod video;

pub use audio::{Audio, BlockingAudio};
pub use chat::{BlockingChat, BlockingChatStream, Chat, ChatStream};
pub use embeddings::{BlockingEmbeddings, Embeddings};
pub use etc::{BlockingInsults, BlockingJokes, BlockingWeb, Insults, Jokes, Web};
pub use images::{BlockingImages, Images};
pub use models::{BlockingModels, Models};
pub use moderations::{BlockingModerations, Moderations};
pub use video::{BlockingVideo, Video};
