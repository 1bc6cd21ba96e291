//! Request payload construction.
//!
//! Every builder here is a pure function from call arguments plus the
//! client's [`DefaultModels`] to a [`Payload`]. Unset arguments are omitted
//! from the payload, never sent as `null`. An empty `model` counts as unset.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::ClientError;
use crate::model::{FunctionSpec, MessageInput, Tool, ToolChoiceInput};
use crate::options::DefaultModels;

/// Normalized request body.
pub type Payload = Map<String, Value>;

pub const DEFAULT_VIDEO_WIDTH: u32 = 480;
pub const DEFAULT_VIDEO_HEIGHT: u32 = 480;
pub const DEFAULT_VIDEO_SECONDS: u32 = 5;

/// Arguments of a chat completion.
///
/// # Example
/// ```rust
/// use shuttleai::{ChatMessage, ChatRequest};
///
/// let request = ChatRequest::new([ChatMessage::user("Hello!")])
///     .with_model("shuttle-3.5")
///     .with_temperature(0.7);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<MessageInput>,
    pub model: Option<String>,
    /// URL of an image the model should look at
    pub image: Option<String>,
    /// Let the model augment its answer with internet results
    pub internet: Option<bool>,
    pub tools: Option<Vec<Tool>>,
    pub tool_choice: Option<ToolChoiceInput>,
    pub stream: Option<bool>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
}

impl ChatRequest {
    pub fn new<I, M>(messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MessageInput>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image = Some(image_url.into());
        self
    }

    pub fn with_internet(mut self, internet: bool) -> Self {
        self.internet = Some(internet);
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: impl Into<ToolChoiceInput>) -> Self {
        self.tool_choice = Some(tool_choice.into());
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub model: Option<String>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Arguments of a video generation job. Unset dimensions fall back to
/// 480x480 and 5 seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub n_seconds: Option<u32>,
}

impl VideoRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_seconds(mut self, n_seconds: u32) -> Self {
        self.n_seconds = Some(n_seconds);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechRequest {
    pub input: String,
    pub model: Option<String>,
    pub voice: Option<String>,
}

impl SpeechRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }
}

/// Shared by transcriptions and translations. `file` is a URL or file
/// reference understood by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub file: String,
    pub model: Option<String>,
}

impl TranscriptionRequest {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// One text or a batch of texts.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Batch(Vec<String>),
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::Single(text.to_string())
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::Single(text)
    }
}

impl From<Vec<String>> for TextInput {
    fn from(texts: Vec<String>) -> Self {
        TextInput::Batch(texts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingRequest {
    pub input: TextInput,
    pub model: Option<String>,
}

impl EmbeddingRequest {
    pub fn new(input: impl Into<TextInput>) -> Self {
        Self {
            input: input.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationRequest {
    pub input: TextInput,
    pub model: Option<String>,
}

impl ModerationRequest {
    pub fn new(input: impl Into<TextInput>) -> Self {
        Self {
            input: input.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// An explicit, non-empty model wins over the default.
pub fn resolve_model(explicit: Option<&str>, default: &str) -> String {
    explicit
        .filter(|model| !model.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Insert a present value. Values that serialize to `null` (non-finite
/// floats) are dropped like absent ones.
fn insert_some(payload: &mut Payload, key: &str, value: Option<impl Into<Value>>) {
    match value.map(Into::into) {
        Some(Value::Null) => tracing::debug!(key, "dropping value with no JSON form"),
        Some(value) => {
            payload.insert(key.to_string(), value);
        }
        None => {}
    }
}

fn to_object<T: Serialize>(value: &T) -> Result<Value, ClientError> {
    serde_json::to_value(value).map_err(ClientError::Encode)
}

fn normalize_message(message: &MessageInput) -> Result<Value, ClientError> {
    match message {
        MessageInput::Message(message) => to_object(message),
        MessageInput::Raw(map) => Ok(Value::Object(map.clone())),
    }
}

/// Keep `"function"` tools only, in order, with plain-object descriptors.
fn normalize_tools(tools: &[Tool]) -> Result<Vec<Value>, ClientError> {
    tools
        .iter()
        .filter(|tool| tool.tool_type == "function")
        .map(|tool| -> Result<Value, ClientError> {
            let function = match &tool.function {
                FunctionSpec::Typed(function) => to_object(function)?,
                FunctionSpec::Raw(value) => value.clone(),
            };
            let mut entry = Payload::new();
            entry.insert("type".to_string(), Value::from(tool.tool_type.as_str()));
            entry.insert("function".to_string(), function);
            Ok(Value::Object(entry))
        })
        .collect()
}

fn normalize_tool_choice(tool_choice: &ToolChoiceInput) -> &str {
    match tool_choice {
        ToolChoiceInput::Choice(choice) => choice.as_str(),
        ToolChoiceInput::Literal(literal) => literal,
    }
}

fn log_payload(kind: &str, payload: &Payload) {
    tracing::debug!(kind, ?payload, "built request payload");
}

/// Build the body of `POST /chat/completions`.
pub fn chat_payload(
    request: &ChatRequest,
    defaults: &DefaultModels,
) -> Result<Payload, ClientError> {
    let mut payload = Payload::new();

    let messages = request
        .messages
        .iter()
        .map(normalize_message)
        .collect::<Result<Vec<_>, _>>()?;
    payload.insert("messages".to_string(), Value::Array(messages));
    payload.insert(
        "model".to_string(),
        Value::from(resolve_model(request.model.as_deref(), &defaults.chat)),
    );

    insert_some(
        &mut payload,
        "image",
        request.image.as_deref().filter(|image| !image.is_empty()),
    );
    insert_some(&mut payload, "internet", request.internet.filter(|on| *on));

    if let Some(tools) = &request.tools {
        let tools = normalize_tools(tools)?;
        if !tools.is_empty() {
            payload.insert("tools".to_string(), Value::Array(tools));
        }
    }

    insert_some(
        &mut payload,
        "tool_choice",
        request
            .tool_choice
            .as_ref()
            .map(normalize_tool_choice)
            .filter(|choice| !choice.is_empty()),
    );
    insert_some(&mut payload, "stream", request.stream.filter(|on| *on));
    insert_some(&mut payload, "temperature", request.temperature);
    insert_some(&mut payload, "max_tokens", request.max_tokens);
    insert_some(&mut payload, "top_p", request.top_p);

    log_payload("chat", &payload);
    Ok(payload)
}

/// Build the body of `POST /images/generations`.
pub fn image_payload(request: &ImageRequest, defaults: &DefaultModels) -> Payload {
    let mut payload = Payload::new();
    payload.insert("prompt".to_string(), Value::from(request.prompt.as_str()));
    payload.insert(
        "model".to_string(),
        Value::from(resolve_model(request.model.as_deref(), &defaults.image)),
    );
    log_payload("image", &payload);
    payload
}

/// Build the body of `POST /video/generations/jobs`.
pub fn video_payload(request: &VideoRequest, defaults: &DefaultModels) -> Payload {
    let mut payload = Payload::new();
    payload.insert("prompt".to_string(), Value::from(request.prompt.as_str()));
    payload.insert(
        "model".to_string(),
        Value::from(resolve_model(request.model.as_deref(), &defaults.video)),
    );
    payload.insert(
        "width".to_string(),
        Value::from(request.width.unwrap_or(DEFAULT_VIDEO_WIDTH)),
    );
    payload.insert(
        "height".to_string(),
        Value::from(request.height.unwrap_or(DEFAULT_VIDEO_HEIGHT)),
    );
    payload.insert(
        "n_seconds".to_string(),
        Value::from(request.n_seconds.unwrap_or(DEFAULT_VIDEO_SECONDS)),
    );
    log_payload("video", &payload);
    payload
}

/// Build the body of `POST /audio/speech`.
pub fn speech_payload(request: &SpeechRequest, defaults: &DefaultModels) -> Payload {
    let mut payload = Payload::new();
    payload.insert("input".to_string(), Value::from(request.input.as_str()));
    payload.insert(
        "model".to_string(),
        Value::from(resolve_model(request.model.as_deref(), &defaults.audio_speech)),
    );
    insert_some(
        &mut payload,
        "voice",
        request.voice.as_deref().filter(|voice| !voice.is_empty()),
    );
    log_payload("audio_speech", &payload);
    payload
}

/// Build the body of `POST /audio/transcriptions` and `POST /audio/translations`.
pub fn transcription_payload(request: &TranscriptionRequest, defaults: &DefaultModels) -> Payload {
    let mut payload = Payload::new();
    payload.insert("file".to_string(), Value::from(request.file.as_str()));
    payload.insert(
        "model".to_string(),
        Value::from(resolve_model(
            request.model.as_deref(),
            &defaults.audio_transcription,
        )),
    );
    log_payload("audio_transcription", &payload);
    payload
}

/// Build the body of `POST /embeddings`.
pub fn embedding_payload(
    request: &EmbeddingRequest,
    defaults: &DefaultModels,
) -> Result<Payload, ClientError> {
    let mut payload = Payload::new();
    payload.insert("input".to_string(), to_object(&request.input)?);
    payload.insert(
        "model".to_string(),
        Value::from(resolve_model(request.model.as_deref(), &defaults.embedding)),
    );
    log_payload("embedding", &payload);
    Ok(payload)
}

/// Build the body of `POST /moderations`.
pub fn moderation_payload(
    request: &ModerationRequest,
    defaults: &DefaultModels,
) -> Result<Payload, ClientError> {
    let mut payload = Payload::new();
    payload.insert("input".to_string(), to_object(&request.input)?);
    payload.insert(
        "model".to_string(),
        Value::from(resolve_model(request.model.as_deref(), &defaults.moderation)),
    );
    log_payload("moderation", &payload);
    Ok(payload)
}

/// Build the body of the web search endpoint.
pub fn web_search_payload(query: &str) -> Payload {
    let mut payload = Payload::new();
    payload.insert("query".to_string(), Value::from(query));
    log_payload("web_search", &payload);
    payload
}
