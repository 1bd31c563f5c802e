//! Generative-model client: the live Gemini REST backend and a deterministic mock.
//!
//! Every remote step of the pipeline (classification, generation, transcription, synthesis)
//! is one `GenerativeModel::generate` call with a named prompt.

use crate::config::{LlmMode, SoulConfig};
use crate::error::{SoulError, SoulResult};
use crate::media::DataUri;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One piece of prompt content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    /// Raw bytes sent inline (audio clips).
    Media(DataUri),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

/// Which configured model serves the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Text,
    Speech,
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Stable prompt name, used for logs and by the mock backend.
    pub prompt_name: &'static str,
    pub kind: ModelKind,
    /// Prompt input values before rendering (e.g. `{"query": "..."}`).
    pub input: serde_json::Value,
    pub parts: Vec<Part>,
    /// When set, the model must answer with JSON matching this schema.
    pub response_schema: Option<serde_json::Value>,
    pub safety_settings: Vec<SafetySetting>,
    /// Prebuilt voice for audio output. Only used with `ModelKind::Speech`.
    pub voice: Option<String>,
}

impl GenerateRequest {
    pub fn text(prompt_name: &'static str, input: serde_json::Value, prompt: String) -> Self {
        Self {
            prompt_name,
            kind: ModelKind::Text,
            input,
            parts: vec![Part::Text(prompt)],
            response_schema: None,
            safety_settings: Vec::new(),
            voice: None,
        }
    }

    pub fn with_media(mut self, media: DataUri) -> Self {
        self.parts.push(Part::Media(media));
        self
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_safety(mut self, settings: &[SafetySetting]) -> Self {
        self.safety_settings.extend_from_slice(settings);
        self
    }

    pub fn speech(prompt_name: &'static str, text: String, voice: impl Into<String>) -> Self {
        Self {
            prompt_name,
            kind: ModelKind::Speech,
            input: serde_json::json!({ "text": text }),
            parts: vec![Part::Text(text)],
            response_schema: None,
            safety_settings: Vec::new(),
            voice: Some(voice.into()),
        }
    }

    /// String value of a prompt input field.
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.input.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub text: Option<String>,
    pub media: Option<DataUri>,
}

impl GenerateResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            media: None,
        }
    }

    /// Parse the text output as JSON. `Ok(None)` when the model returned no text.
    pub fn json<T: DeserializeOwned>(&self) -> SoulResult<Option<T>> {
        let Some(text) = self.text.as_deref() else {
            return Ok(None);
        };
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(body)
            .map(Some)
            .map_err(|e| SoulError::validation(format!("model output does not match schema: {}", e)))
    }
}

/// Models sometimes wrap JSON in ```json fences even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let t = text.trim();
    let Some(inner) = t.strip_prefix("```") else {
        return t;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// A remote (or simulated) generative model.
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> SoulResult<GenerateResponse>;
}

// -----------------------------------------------------------------------------
// Gemini REST backend
// -----------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "no_settings")]
    safety_settings: &'a [SafetySetting],
}

fn no_settings(settings: &&[SafetySetting]) -> bool {
    settings.is_empty()
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiBlob>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiBlob {
    mime_type: String,
    data: String,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Gemini `generateContent` over reqwest.
pub struct GeminiClient {
    api_base: String,
    api_key: String,
    text_model: String,
    tts_model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        text_model: impl Into<String>,
        tts_model: impl Into<String>,
        timeout: Duration,
    ) -> SoulResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            text_model: text_model.into(),
            tts_model: tts_model.into(),
            client,
        })
    }

    pub fn from_config(config: &SoulConfig) -> SoulResult<Self> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or_else(|| SoulError::Config("Gemini API key is not configured".into()))?;
        Self::new(
            config.gemini_api_base.clone(),
            api_key,
            config.text_model.clone(),
            config.tts_model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn model_for(&self, kind: ModelKind) -> &str {
        match kind {
            ModelKind::Text => &self.text_model,
            ModelKind::Speech => &self.tts_model,
        }
    }

    fn build_body<'a>(request: &'a GenerateRequest) -> GeminiRequest<'a> {
        let parts = request
            .parts
            .iter()
            .map(|p| match p {
                Part::Text(t) => GeminiPart {
                    text: Some(t.clone()),
                    inline_data: None,
                },
                Part::Media(m) => GeminiPart {
                    text: None,
                    inline_data: Some(GeminiBlob {
                        mime_type: m.mime_type.clone(),
                        data: m.base64_payload(),
                    }),
                },
            })
            .collect();

        let generation_config = match (request.kind, &request.response_schema) {
            (ModelKind::Speech, _) => Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO"]),
                speech_config: request.voice.as_ref().map(|v| {
                    serde_json::json!({
                        "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": v } }
                    })
                }),
                ..GenerationConfig::default()
            }),
            (ModelKind::Text, Some(schema)) => Some(GenerationConfig {
                response_mime_type: Some("application/json"),
                response_schema: Some(schema.clone()),
                ..GenerationConfig::default()
            }),
            (ModelKind::Text, None) => None,
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config,
            safety_settings: &request.safety_settings,
        }
    }

    fn read_response(parsed: GeminiResponse) -> SoulResult<GenerateResponse> {
        if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(SoulError::EmptyOutput(format!("prompt blocked by safety filter: {}", reason)));
        }
        let Some(candidate) = parsed.candidates.into_iter().next() else {
            return Ok(GenerateResponse::default());
        };
        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(SoulError::EmptyOutput("response blocked by safety filter".into()));
        }

        let mut text = String::new();
        let mut media = None;
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            let Some(blob) = part.inline_data else {
                continue;
            };
            if media.is_none() {
                let bytes = STANDARD
                    .decode(blob.data.as_bytes())
                    .map_err(|e| SoulError::Synthesis(format!("inline data is not base64: {}", e)))?;
                media = Some(DataUri::new(blob.mime_type, bytes));
            }
        }

        Ok(GenerateResponse {
            text: (!text.trim().is_empty()).then_some(text),
            media,
        })
    }
}

#[async_trait::async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> SoulResult<GenerateResponse> {
        let model = self.model_for(request.kind);
        let url = format!("{}/models/{}:generateContent", self.api_base, model);
        tracing::debug!(target: "securesoul::llm", prompt = request.prompt_name, model, "generateContent");

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_body(&request))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            tracing::warn!(
                target: "securesoul::llm",
                prompt = request.prompt_name,
                status = status.as_u16(),
                "model API returned an error"
            );
            return Err(SoulError::Llm {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)?;
        Self::read_response(parsed)
    }
}

// -----------------------------------------------------------------------------
// Mock backend
// -----------------------------------------------------------------------------

/// Deterministic offline model. Answers each named prompt with schema-valid output so the
/// whole pipeline runs without network access.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockModel;

const MOCK_PANIC_WORDS: &[&str] = &["panic", "emergency", "urgent", "save me", "danger"];
const MOCK_LEGAL_WORDS: &[&str] = &["lawyer", "legal", "court", "fir", "police complaint", "rights"];
const MOCK_SCHEME_WORDS: &[&str] = &["scheme", "yojana", "subsidy", "pension", "scholarship", "ration"];
const MOCK_SAFETY_WORDS: &[&str] = &["unsafe", "stalk", "harass", "threat", "followed"];

impl MockModel {
    /// Silence returned for speech requests: 16-bit mono PCM, 24 kHz.
    pub const SPEECH_MIME: &'static str = "audio/L16;codec=pcm;rate=24000";
    const SPEECH_SAMPLES: usize = 2400;

    fn contains_any(text: &str, words: &[&str]) -> bool {
        words.iter().any(|w| text.contains(w))
    }

    fn classify(query: &str) -> serde_json::Value {
        let q = query.to_lowercase();
        let (intent, emergency) = if Self::contains_any(&q, MOCK_PANIC_WORDS) {
            ("Panic", true)
        } else if Self::contains_any(&q, MOCK_SAFETY_WORDS) {
            ("Safety", false)
        } else if Self::contains_any(&q, MOCK_LEGAL_WORDS) {
            ("Legal", false)
        } else if Self::contains_any(&q, MOCK_SCHEME_WORDS) {
            ("Government Schemes", false)
        } else {
            ("Mental Health", false)
        };
        serde_json::json!({
            "intent": intent,
            "reasoning": format!("[Mock] keyword match classified the query as {}.", intent),
            "emergency": emergency,
        })
    }

    fn emotion(text: &str) -> &'static str {
        let t = text.to_lowercase();
        if Self::contains_any(&t, &["scared", "afraid", "panic", "danger"]) {
            "scared"
        } else if Self::contains_any(&t, &["sad", "lonely", "depressed", "cry"]) {
            "sad"
        } else if Self::contains_any(&t, &["angry", "furious", "unfair"]) {
            "angry"
        } else if Self::contains_any(&t, &["confused", "don't understand", "not sure"]) {
            "confused"
        } else if Self::contains_any(&t, &["happy", "great", "thank"]) {
            "happy"
        } else {
            "neutral"
        }
    }
}

#[async_trait::async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, request: GenerateRequest) -> SoulResult<GenerateResponse> {
        use crate::prompts;

        let response = match request.prompt_name {
            prompts::DETECT_USER_INTENT => {
                let query = request.input_str("query").unwrap_or_default();
                GenerateResponse::from_text(Self::classify(query).to_string())
            }
            prompts::DETECT_EMOTION => {
                let query = request.input_str("query").unwrap_or_default();
                GenerateResponse::from_text(serde_json::json!({ "emotion": Self::emotion(query) }).to_string())
            }
            prompts::RAG_BASED_RESPONSE => {
                let intent = request.input_str("intent").unwrap_or("General");
                let query = request.input_str("query").unwrap_or_default();
                GenerateResponse::from_text(format!(
                    "[Mock] Here is some {} guidance for: \"{}\"\n\n- Take a slow breath; you reached out, which matters.\n- See the resources below for next steps.",
                    intent, query
                ))
            }
            prompts::SPEECH_TO_TEXT => {
                let bytes = request
                    .parts
                    .iter()
                    .find_map(|p| match p {
                        Part::Media(m) => Some(m.bytes.len()),
                        Part::Text(_) => None,
                    })
                    .unwrap_or(0);
                GenerateResponse::from_text(format!("[Mock transcription of {} bytes of audio]", bytes))
            }
            prompts::TEXT_TO_SPEECH => GenerateResponse {
                text: None,
                media: Some(DataUri::new(Self::SPEECH_MIME, vec![0u8; Self::SPEECH_SAMPLES * 2])),
            },
            other => GenerateResponse::from_text(format!("[Mock] no canned answer for prompt '{}'", other)),
        };
        Ok(response)
    }
}

/// Build the model backend selected by `llm_mode`.
pub fn build_model(config: &SoulConfig) -> SoulResult<Arc<dyn GenerativeModel>> {
    match config.llm_mode {
        LlmMode::Mock => {
            tracing::info!(target: "securesoul::llm", "LLM mode: mock (offline, deterministic)");
            Ok(Arc::new(MockModel))
        }
        LlmMode::Live => {
            let client = GeminiClient::from_config(config)?;
            tracing::info!(
                target: "securesoul::llm",
                text_model = %config.text_model,
                tts_model = %config.tts_model,
                "LLM mode: live (Gemini)"
            );
            Ok(Arc::new(client))
        }
    }
}
