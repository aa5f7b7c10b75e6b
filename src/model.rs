use reqwest::Client;
use std::fmt;
use tracing::{debug, warn};

use crate::config::{Config, EndpointMode};
use crate::credential::Credential;
use crate::providers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Chat,
    Completion,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Completion => "completion",
        }
    }
}

/// Decides which completion endpoint a model is served from.
pub trait EndpointPolicy {
    fn endpoint_for(&self, model_id: &str) -> Endpoint;
}

/// Treats a model as conversational when its id contains any marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPolicy {
    markers: Vec<String>,
}

impl MarkerPolicy {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|marker| marker.as_ref().to_ascii_lowercase())
                .filter(|marker| !marker.is_empty())
                .collect(),
        }
    }
}

impl EndpointPolicy for MarkerPolicy {
    fn endpoint_for(&self, model_id: &str) -> Endpoint {
        let model_id = model_id.to_ascii_lowercase();
        if self
            .markers
            .iter()
            .any(|marker| model_id.contains(marker.as_str()))
        {
            Endpoint::Chat
        } else {
            Endpoint::Completion
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPolicy(pub Endpoint);

impl EndpointPolicy for FixedPolicy {
    fn endpoint_for(&self, _model_id: &str) -> Endpoint {
        self.0
    }
}

pub fn policy_from_config(cfg: &Config) -> Box<dyn EndpointPolicy> {
    match cfg.endpoint_mode {
        EndpointMode::Auto => Box::new(MarkerPolicy::new(&cfg.chat_model_markers)),
        EndpointMode::Chat => Box::new(FixedPolicy(Endpoint::Chat)),
        EndpointMode::Completion => Box::new(FixedPolicy(Endpoint::Completion)),
    }
}

/// Outcome of one prompt. Every variant renders as transcript text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    UnexpectedFormat,
    Failed(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::UnexpectedFormat => f.write_str("Unexpected response format."),
            Self::Failed(reason) => write!(f, "API error: {reason}"),
        }
    }
}

pub async fn generate(
    client: &Client,
    cfg: &Config,
    policy: &dyn EndpointPolicy,
    credential: &Credential,
    model_id: &str,
    prompt: &str,
) -> Reply {
    let endpoint = policy.endpoint_for(model_id);
    debug!(
        model = %model_id,
        endpoint = endpoint.as_str(),
        prompt_len = prompt.len(),
        "dispatching completion request"
    );

    match providers::groq::complete(client, cfg, credential, endpoint, model_id, prompt).await {
        Ok(reply) => reply,
        Err(err) => {
            warn!(model = %model_id, error = %format!("{err:#}"), "completion request failed");
            Reply::Failed(format!("{err:#}"))
        }
    }
}
