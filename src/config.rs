use std::collections::BTreeSet;
use std::env;

const DEFAULT_API_BASE_URL: &str = "https://api.groq.com";
const DEFAULT_CHAT_MODEL_MARKERS: &[&str] = &["llama", "chat"];
const DEFAULT_EXCLUDED_POSITIONS: &[usize] = &[2, 4, 5, 9, 14, 16, 17, 18, 19];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMode {
    Auto,
    Chat,
    Completion,
}

impl EndpointMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Chat => "chat",
            Self::Completion => "completion",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// `None` leaves the HTTP client's own default in place.
    pub request_timeout_secs: Option<u64>,
    pub endpoint_mode: EndpointMode,
    pub chat_model_markers: Vec<String>,
    pub catalog_excluded_positions: BTreeSet<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env_with(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        let api_base_url = parse_base_url(get_var("GROQ_BASE_URL").as_deref());
        let request_timeout_secs = parse_timeout_secs(get_var("GROQ_TIMEOUT_SECS").as_deref());
        let endpoint_mode = parse_endpoint_mode(get_var("GROQ_ENDPOINT").as_deref());
        let chat_model_markers = parse_markers(get_var("CHAT_MODEL_MARKERS").as_deref());
        let catalog_excluded_positions =
            parse_excluded_positions(get_var("CATALOG_EXCLUDE_POSITIONS").as_deref());

        Self {
            api_base_url,
            request_timeout_secs,
            endpoint_mode,
            chat_model_markers,
            catalog_excluded_positions,
        }
    }
}

fn parse_base_url(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}

fn parse_timeout_secs(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
}

fn parse_endpoint_mode(raw: Option<&str>) -> EndpointMode {
    match raw.unwrap_or("auto").trim().to_ascii_lowercase().as_str() {
        "chat" => EndpointMode::Chat,
        "completion" | "completions" => EndpointMode::Completion,
        _ => EndpointMode::Auto,
    }
}

fn parse_markers(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return DEFAULT_CHAT_MODEL_MARKERS
            .iter()
            .map(|marker| marker.to_string())
            .collect();
    };

    raw.split(',')
        .map(|marker| marker.trim().to_ascii_lowercase())
        .filter(|marker| !marker.is_empty())
        .collect()
}

fn parse_excluded_positions(raw: Option<&str>) -> BTreeSet<usize> {
    let Some(raw) = raw else {
        return DEFAULT_EXCLUDED_POSITIONS.iter().copied().collect();
    };

    raw.split(',')
        .filter_map(|position| position.trim().parse::<usize>().ok())
        .collect()
}
