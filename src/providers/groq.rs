use anyhow::{Context, Result, anyhow};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalog::ModelDescriptor;
use crate::config::Config;
use crate::credential::Credential;
use crate::model::{Endpoint, Reply};
use crate::providers::http_errors::api_request_error;

const COMPLETION_MAX_TOKENS: u32 = 100;
const COMPLETION_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    data: Vec<ModelDescriptor>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
}

fn api_url(base_url: &str, path: &str) -> String {
    format!("{}/openai/v1/{}", base_url.trim_end_matches('/'), path)
}

fn models_url(base_url: &str) -> String {
    api_url(base_url, "models")
}

fn endpoint_url(base_url: &str, endpoint: Endpoint) -> String {
    match endpoint {
        Endpoint::Chat => api_url(base_url, "chat/completions"),
        Endpoint::Completion => api_url(base_url, "completions"),
    }
}

fn completion_body(endpoint: Endpoint, model_id: &str, prompt: &str) -> Result<Value> {
    let body = match endpoint {
        Endpoint::Chat => serde_json::to_value(ChatRequest {
            model: model_id,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        }),
        Endpoint::Completion => serde_json::to_value(CompletionRequest {
            model: model_id,
            prompt,
            max_tokens: COMPLETION_MAX_TOKENS,
            temperature: COMPLETION_TEMPERATURE,
        }),
    };
    body.context("Failed to encode completion request")
}

/// Pulls the generated text out of a completion response body.
fn extract_reply(endpoint: Endpoint, body: &Value) -> Result<Reply> {
    let Some(choices) = body.get("choices") else {
        return Ok(Reply::UnexpectedFormat);
    };

    let first = choices
        .get(0)
        .ok_or_else(|| anyhow!("response contained no choices"))?;
    let text = match endpoint {
        Endpoint::Chat => first
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("response is missing choices[0].message.content"))?,
        Endpoint::Completion => first
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("response is missing choices[0].text"))?,
    };
    Ok(Reply::Text(text.to_string()))
}

async fn send(request: RequestBuilder, api_url: &str, cfg: &Config) -> Result<Response> {
    let response = request.send().await.map_err(|err| {
        debug!(api_url = %api_url, error = %err, "groq request failed");
        api_request_error(err, api_url, cfg.request_timeout_secs)
    })?;

    if !response.status().is_success() {
        let status = response.status();
        let response_body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string());
        debug!(
            api_url = %api_url,
            status = %status,
            response_body_len = response_body.len(),
            "groq returned non-success status"
        );
        return Err(anyhow!(
            "request to '{}' failed with status {}: {}",
            api_url,
            status,
            response_body
        ));
    }

    Ok(response)
}

pub async fn list_models(
    client: &Client,
    cfg: &Config,
    credential: &Credential,
) -> Result<Vec<ModelDescriptor>> {
    let api_url = models_url(&cfg.api_base_url);
    debug!(api_url = %api_url, "requesting model catalog");

    let request = client
        .get(&api_url)
        .bearer_auth(credential.expose())
        .header(CONTENT_TYPE, "application/json");
    let parsed: ModelListResponse = send(request, &api_url, cfg)
        .await?
        .json()
        .await
        .context("Failed to parse model list response")?;

    debug!(model_count = parsed.data.len(), "received model catalog");
    Ok(parsed.data)
}

pub async fn complete(
    client: &Client,
    cfg: &Config,
    credential: &Credential,
    endpoint: Endpoint,
    model_id: &str,
    prompt: &str,
) -> Result<Reply> {
    let api_url = endpoint_url(&cfg.api_base_url, endpoint);
    let body = completion_body(endpoint, model_id, prompt)?;
    debug!(
        api_url = %api_url,
        model = %model_id,
        endpoint = endpoint.as_str(),
        "sending groq completion request"
    );

    let request = client
        .post(&api_url)
        .bearer_auth(credential.expose())
        .json(&body);
    let parsed: Value = send(request, &api_url, cfg)
        .await?
        .json()
        .await
        .context("Failed to parse completion response")?;

    let reply = extract_reply(endpoint, &parsed)?;
    if let Reply::Text(text) = &reply {
        debug!(model = %model_id, response_len = text.len(), "received groq completion");
    }
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{completion_body, endpoint_url, extract_reply, models_url};
    use crate::model::{Endpoint, Reply};

    #[test]
    fn urls_trim_trailing_slash() {
        assert_eq!(
            models_url("https://api.groq.com/"),
            "https://api.groq.com/openai/v1/models"
        );
        assert_eq!(
            endpoint_url("https://api.groq.com", Endpoint::Chat),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            endpoint_url("https://api.groq.com", Endpoint::Completion),
            "https://api.groq.com/openai/v1/completions"
        );
    }

    #[test]
    fn chat_body_wraps_prompt_in_single_user_message() {
        let body = completion_body(Endpoint::Chat, "llama-3-70b", "hello").expect("body");
        assert_eq!(
            body,
            json!({
                "model": "llama-3-70b",
                "messages": [{"role": "user", "content": "hello"}],
            })
        );
    }

    #[test]
    fn completion_body_carries_sampling_settings() {
        let body = completion_body(Endpoint::Completion, "mixtral-8x7b", "ping").expect("body");
        assert_eq!(body["model"], "mixtral-8x7b");
        assert_eq!(body["prompt"], "ping");
        assert_eq!(body["max_tokens"], 100);
        let temperature = body["temperature"].as_f64().expect("temperature");
        assert!((temperature - 0.7).abs() < 1e-6);
        assert!(body.get("messages").is_none());
    }

    #[test]
    fn extract_reply_reads_chat_content() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "hi there"}}]});
        assert_eq!(
            extract_reply(Endpoint::Chat, &body).expect("reply"),
            Reply::Text("hi there".to_string())
        );
    }

    #[test]
    fn extract_reply_reads_completion_text() {
        let body = json!({"choices": [{"text": "pong", "index": 0}]});
        assert_eq!(
            extract_reply(Endpoint::Completion, &body).expect("reply"),
            Reply::Text("pong".to_string())
        );
    }

    #[test]
    fn extract_reply_flags_missing_choices_as_unexpected_format() {
        let body = json!({"error": {"message": "nope"}});
        assert_eq!(
            extract_reply(Endpoint::Chat, &body).expect("reply"),
            Reply::UnexpectedFormat
        );
    }

    #[test]
    fn extract_reply_errors_on_wrong_choice_shape() {
        let empty = json!({"choices": []});
        assert!(extract_reply(Endpoint::Chat, &empty).is_err());

        let chat_shape = json!({"choices": [{"message": {"content": "hi"}}]});
        let err = extract_reply(Endpoint::Completion, &chat_shape).expect_err("wrong shape");
        assert!(err.to_string().contains("choices[0].text"));
    }
}
