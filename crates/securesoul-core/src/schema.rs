//! Structural contracts enforced at every boundary of the assistant pipeline.
//!
//! Inputs arrive as loosely-typed request bodies and are turned into `Valid*` values by
//! `validate()`. Model outputs are deserialized into the detection types and checked the same way.

use crate::error::{SoulError, SoulResult};
use crate::media::DataUri;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Support domain a conversation is scoped to. Serialized as its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "Mental Health")]
    MentalHealth,
    #[serde(rename = "Legal")]
    Legal,
    #[serde(rename = "Government Schemes")]
    GovernmentSchemes,
    #[serde(rename = "Safety")]
    Safety,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::MentalHealth,
        Domain::Legal,
        Domain::GovernmentSchemes,
        Domain::Safety,
    ];

    /// Position in `Domain::ALL`.
    pub fn index(&self) -> usize {
        match self {
            Domain::MentalHealth => 0,
            Domain::Legal => 1,
            Domain::GovernmentSchemes => 2,
            Domain::Safety => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::MentalHealth => "Mental Health",
            Domain::Legal => "Legal",
            Domain::GovernmentSchemes => "Government Schemes",
            Domain::Safety => "Safety",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = SoulError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SoulError::validation(format!("unknown domain '{}'", wanted)))
    }
}

/// Category assigned to a query by the remote classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    #[serde(rename = "Mental Health")]
    MentalHealth,
    #[serde(rename = "Legal")]
    Legal,
    #[serde(rename = "Government Schemes")]
    GovernmentSchemes,
    #[serde(rename = "Safety")]
    Safety,
    #[serde(rename = "Panic")]
    Panic,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::MentalHealth,
        Intent::Legal,
        Intent::GovernmentSchemes,
        Intent::Safety,
        Intent::Panic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::MentalHealth => "Mental Health",
            Intent::Legal => "Legal",
            Intent::GovernmentSchemes => "Government Schemes",
            Intent::Safety => "Safety",
            Intent::Panic => "Panic",
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Intent::Panic)
    }

    /// Domain to answer from. Panic always escalates to Safety; otherwise the selected tab wins.
    pub fn route(&self, selected: Domain) -> Domain {
        if self.is_panic() {
            Domain::Safety
        } else {
            selected
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mood label assigned to a query or audio clip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Sad,
    Angry,
    Happy,
    Scared,
    Confused,
    #[default]
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Happy,
        Emotion::Scared,
        Emotion::Confused,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Happy => "happy",
            Emotion::Scared => "scared",
            Emotion::Confused => "confused",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Emotion::Neutral)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// Request inputs
// -----------------------------------------------------------------------------

/// Body of a text message. The domain stays a string until validation so a bad value is a
/// validation error, not a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessUserMessageInput {
    pub query: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMessage {
    pub query: String,
    pub domain: Domain,
}

impl ProcessUserMessageInput {
    pub fn validate(self) -> SoulResult<ValidMessage> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(SoulError::validation("Message cannot be empty."));
        }
        let domain = self.domain.parse::<Domain>()?;
        Ok(ValidMessage {
            query: query.to_string(),
            domain,
        })
    }
}

/// Body of a recorded voice message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessUserAudioInput {
    /// `data:<mime>;base64,<payload>`
    pub audio: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAudio {
    pub audio: DataUri,
    pub domain: Domain,
}

impl ProcessUserAudioInput {
    pub fn validate(self) -> SoulResult<ValidAudio> {
        let domain = self.domain.parse::<Domain>()?;
        let audio = DataUri::parse(&self.audio)?;
        if !audio.is_audio() {
            return Err(SoulError::validation(format!(
                "expected an audio clip, got '{}'",
                audio.mime_type
            )));
        }
        Ok(ValidAudio { audio, domain })
    }
}

// -----------------------------------------------------------------------------
// Model outputs
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentDetection {
    pub intent: Intent,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency: Option<bool>,
}

impl IntentDetection {
    pub const NO_REASONING: &'static str = "No reasoning provided.";

    pub fn validate(mut self) -> SoulResult<Self> {
        if self.reasoning.trim().is_empty() {
            self.reasoning = Self::NO_REASONING.to_string();
        }
        Ok(self)
    }

    /// Emergency when the classifier says Panic or raises the emergency flag.
    pub fn is_emergency(&self) -> bool {
        self.intent.is_panic() || self.emergency.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionDetection {
    pub emotion: Emotion,
}

/// Input of the response generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRequest {
    pub query: String,
    pub intent: Domain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedResponse {
    pub response: String,
}

impl GeneratedResponse {
    pub fn validate(self) -> SoulResult<Self> {
        let response = self.response.trim();
        if response.is_empty() {
            return Err(SoulError::EmptyOutput("model returned an empty response".to_string()));
        }
        Ok(Self {
            response: response.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
}

/// Synthesized reply, packaged as `data:audio/wav;base64,...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizedSpeech {
    pub media: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_round_trips_display_name() {
        let json = serde_json::to_string(&Domain::GovernmentSchemes).unwrap();
        assert_eq!(json, "\"Government Schemes\"");
        assert_eq!("government schemes".parse::<Domain>().unwrap(), Domain::GovernmentSchemes);
    }

    #[test]
    fn unknown_domain_is_a_validation_error() {
        let err = "Astrology".parse::<Domain>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn panic_routes_to_safety() {
        assert_eq!(Intent::Panic.route(Domain::Legal), Domain::Safety);
        assert_eq!(Intent::Legal.route(Domain::MentalHealth), Domain::MentalHealth);
    }

    #[test]
    fn message_input_trims_and_rejects_blank() {
        let ok = ProcessUserMessageInput {
            query: "  I need help  ".into(),
            domain: "Legal".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.query, "I need help");
        assert_eq!(ok.domain, Domain::Legal);

        let blank = ProcessUserMessageInput {
            query: "   ".into(),
            domain: "Legal".into(),
        };
        assert!(blank.validate().unwrap_err().is_validation());
    }

    #[test]
    fn audio_input_requires_audio_mime() {
        let not_audio = ProcessUserAudioInput {
            audio: "data:image/png;base64,AAEC".into(),
            domain: "Safety".into(),
        };
        assert!(not_audio.validate().unwrap_err().is_validation());

        let ok = ProcessUserAudioInput {
            audio: "data:audio/wav;base64,AAEC".into(),
            domain: "Safety".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.domain, Domain::Safety);
    }

    #[test]
    fn intent_detection_parses_model_json() {
        let raw = r#"{"intent":"Panic","reasoning":"user says help","emergency":true}"#;
        let det: IntentDetection = serde_json::from_str(raw).unwrap();
        assert!(det.is_emergency());

        let raw = r#"{"intent":"Legal"}"#;
        let det = serde_json::from_str::<IntentDetection>(raw).unwrap().validate().unwrap();
        assert_eq!(det.reasoning, IntentDetection::NO_REASONING);
        assert!(!det.is_emergency());
    }

    #[test]
    fn emergency_flag_alone_escalates() {
        let det = IntentDetection {
            intent: Intent::MentalHealth,
            reasoning: "urgent".into(),
            emergency: Some(true),
        };
        assert!(det.is_emergency());
    }

    #[test]
    fn emotion_rejects_labels_outside_the_set() {
        assert!(serde_json::from_str::<EmotionDetection>(r#"{"emotion":"bored"}"#).is_err());
        let e: EmotionDetection = serde_json::from_str(r#"{"emotion":"scared"}"#).unwrap();
        assert_eq!(e.emotion, Emotion::Scared);
    }

    #[test]
    fn generated_response_rejects_empty() {
        let r = GeneratedResponse { response: " \n".into() };
        assert!(r.validate().is_err());
    }
}
