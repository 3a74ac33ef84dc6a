use serde::{ Serialize, Deserialize };
use uuid::Uuid;

/// Who a message bubble belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    SystemError,
}

/// One entry in the in-memory message list. Never mutated after
/// creation; the transient loading placeholder is the only message
/// that is ever removed.
#[derive(Clone, Debug)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: String,
    pub forecast: Option<Forecast>,
    pub sources: Vec<Source>,
    pub loading: bool,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>, timestamp: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp,
            forecast: None,
            sources: Vec::new(),
            loading: false,
        }
    }

    pub fn loading_placeholder(timestamp: String) -> Self {
        let mut msg = Self::new(Role::Assistant, "", timestamp);
        msg.loading = true;
        msg
    }

    /// Assistant message built from a webhook response. The answer text
    /// falls back to `response`, then to a fixed literal, matching the
    /// webhook contract where any field may be absent. An empty string
    /// counts as absent, the way the front-end contract treats falsy
    /// fields.
    pub fn from_response(resp: ChatResponse, timestamp: String) -> Self {
        let text = resp.answer
            .filter(|s| !s.is_empty())
            .or(resp.response.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string());
        let mut msg = Self::new(Role::Assistant, text, timestamp);
        msg.forecast = resp.forecast;
        msg.sources = resp.sources;
        msg
    }
}

pub const FALLBACK_ANSWER: &str = "Response received successfully.";

/// Wire shape returned by the webhook. The endpoint is an external
/// workflow engine whose output is duck-typed (`answer` or `response`),
/// so every field is optional and unknown fields are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: Option<String>,
    pub response: Option<String>,
    pub forecast: Option<Forecast>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Forecast {
    pub total_predicted_kg: f64,
    pub lower_bound_total: f64,
    pub upper_bound_total: f64,
    pub recommendation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Source {
    pub machine_id: Option<String>,
    pub date: Option<String>,
    pub score: f64,
}
