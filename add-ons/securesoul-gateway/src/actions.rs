//! Orchestration actions: one call per user turn, from raw request body to the reply the UI shows.
//!
//! Both actions are infallible at the boundary. Every error is logged and folded into an
//! `ActionResponse` carrying `error` and a fallback reply, so the UI never sees a server error.

use securesoul_core::{
    detect_emotion, detect_user_intent, rag_based_response, Domain, Emotion, GenerativeModel, Intent,
    IntentDetection, KnowledgeBase, ProcessUserAudioInput, ProcessUserMessageInput, ResponseRequest, SoulConfig,
    SoulError, SoulResult, ValidAudio, ValidMessage,
};
use securesoul_voice::{GeminiStt, GeminiTts, SttBackend, TtsBackend};
use serde::Serialize;
use std::sync::Arc;

pub const FALLBACK_RESPONSE: &str = "I am having trouble processing your request. Please try again in a moment.";
pub const DATA_FORMAT_ERROR: &str = "There was an issue with the data format. Please check your input.";
pub const UNTRANSCRIBED_QUERY: &str = "Could not transcribe audio.";

/// What the UI receives for one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub response: String,
    pub is_emergency: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Transcript of a voice message, echoed so the UI can show what was heard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_query: Option<String>,
    /// `data:audio/wav;base64,...`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    /// Domain the reply was generated for; Safety when the query was a panic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

impl ActionResponse {
    pub fn failure(err: &SoulError) -> Self {
        let error = if err.is_validation() {
            DATA_FORMAT_ERROR.to_string()
        } else {
            format!("An error occurred: {}", err)
        };
        Self {
            response: FALLBACK_RESPONSE.to_string(),
            is_emergency: false,
            error: Some(error),
            ..Self::default()
        }
    }

    fn from_turn(turn: Turn) -> Self {
        Self {
            response: turn.response,
            is_emergency: turn.detection.is_emergency(),
            intent: Some(turn.detection.intent),
            emotion: Some(turn.emotion),
            domain: Some(turn.domain),
            ..Self::default()
        }
    }
}

/// Result of answering one query.
struct Turn {
    response: String,
    detection: IntentDetection,
    emotion: Emotion,
    domain: Domain,
}

/// Model backends plus knowledge shared by every request.
pub struct Pipeline {
    model: Arc<dyn GenerativeModel>,
    knowledge: KnowledgeBase,
    stt: Arc<dyn SttBackend>,
    /// None when spoken replies are disabled.
    tts: Option<Arc<dyn TtsBackend>>,
}

impl Pipeline {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        stt: Arc<dyn SttBackend>,
        tts: Option<Arc<dyn TtsBackend>>,
    ) -> Self {
        Self {
            model,
            knowledge: KnowledgeBase::new(),
            stt,
            tts,
        }
    }

    /// Wire the transcriber and synthesizer to `model` using the configured voice.
    pub fn from_config(model: Arc<dyn GenerativeModel>, config: &SoulConfig) -> Self {
        let stt: Arc<dyn SttBackend> = Arc::new(GeminiStt::new(Arc::clone(&model)));
        let tts = config.speech_enabled.then(|| {
            Arc::new(GeminiTts::new(Arc::clone(&model), config.tts_voice.clone())) as Arc<dyn TtsBackend>
        });
        Self::new(model, stt, tts)
    }

    /// Classify, route and answer `query` for the `selected` tab.
    async fn answer(&self, query: &str, selected: Domain) -> SoulResult<Turn> {
        let model = self.model.as_ref();
        let (detection, emotion) = tokio::join!(detect_user_intent(model, query), detect_emotion(model, query));
        let detection = detection?;
        let emotion = match emotion {
            Ok(e) => e.emotion,
            Err(e) => {
                tracing::warn!(target: "securesoul::gateway", error = %e, "emotion detection failed; using neutral");
                Emotion::Neutral
            }
        };

        let domain = detection.intent.route(selected);
        let request = ResponseRequest {
            query: query.to_string(),
            intent: domain,
            emotion: Some(emotion),
            context: Some(format!(
                "User has shown interest in the {} domain. Emotion detected: {}. Reasoning for intent detection: {}",
                domain, emotion, detection.reasoning
            )),
        };
        let reply = rag_based_response(model, &self.knowledge, &request).await?;

        tracing::info!(
            target: "securesoul::gateway",
            selected = %selected,
            intent = %detection.intent,
            domain = %domain,
            emotion = %emotion,
            emergency = detection.is_emergency(),
            "turn answered"
        );
        Ok(Turn {
            response: reply.response,
            detection,
            emotion,
            domain,
        })
    }

    /// Spoken reply, or None when disabled or synthesis fails.
    async fn speak(&self, text: &str) -> Option<String> {
        let tts = self.tts.as_ref()?;
        match tts.synthesize(text).await {
            Ok(speech) => Some(speech.media),
            Err(e) => {
                tracing::warn!(target: "securesoul::gateway", error = %e, "speech synthesis failed; replying with text only");
                None
            }
        }
    }
}

/// Answer a typed message.
pub async fn process_user_message(pipeline: &Pipeline, input: ProcessUserMessageInput) -> ActionResponse {
    match run_message(pipeline, input).await {
        Ok(res) => res,
        Err(e) => {
            tracing::error!(target: "securesoul::gateway", error = %e, "error processing user message");
            ActionResponse::failure(&e)
        }
    }
}

async fn run_message(pipeline: &Pipeline, input: ProcessUserMessageInput) -> SoulResult<ActionResponse> {
    let ValidMessage { query, domain } = input.validate()?;
    let turn = pipeline.answer(&query, domain).await?;
    Ok(ActionResponse::from_turn(turn))
}

/// Answer a recorded voice message: transcribe, answer, then speak the reply.
///
/// A bad clip or domain gets the same data-format message as a bad text message, not the
/// generic `An error occurred: ...`, so both paths report malformed input the same way.
pub async fn process_user_audio(pipeline: &Pipeline, input: ProcessUserAudioInput) -> ActionResponse {
    match run_audio(pipeline, input).await {
        Ok(res) => res,
        Err(e) => {
            tracing::error!(target: "securesoul::gateway", error = %e, "error processing user audio");
            ActionResponse {
                user_query: Some(UNTRANSCRIBED_QUERY.to_string()),
                ..ActionResponse::failure(&e)
            }
        }
    }
}

async fn run_audio(pipeline: &Pipeline, input: ProcessUserAudioInput) -> SoulResult<ActionResponse> {
    let ValidAudio { audio, domain } = input.validate()?;
    let transcription = pipeline.stt.transcribe(&audio).await.map_err(SoulError::from)?;
    let turn = pipeline.answer(&transcription.text, domain).await?;
    let response_audio = pipeline.speak(&turn.response).await;
    Ok(ActionResponse {
        user_query: Some(transcription.text),
        response_audio,
        ..ActionResponse::from_turn(turn)
    })
}
