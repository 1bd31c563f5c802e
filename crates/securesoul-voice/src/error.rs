//! Error types for transcription and synthesis.

use securesoul_core::SoulError;
use thiserror::Error;

pub type VoiceResult<T> = Result<T, VoiceError>;

#[derive(Error, Debug)]
pub enum VoiceError {
    /// The underlying model call failed.
    #[error(transparent)]
    Model(#[from] SoulError),

    /// The model answered without the text or audio we asked for.
    #[error("{0}")]
    NoOutput(String),

    #[error("STT error: {0}")]
    Stt(String),

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),
}

impl From<VoiceError> for SoulError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Model(inner) => inner,
            VoiceError::NoOutput(msg) => SoulError::EmptyOutput(msg),
            VoiceError::Stt(msg) => SoulError::Transcription(msg),
            VoiceError::Tts(msg) => SoulError::Synthesis(msg),
            VoiceError::Wav(e) => SoulError::Synthesis(e.to_string()),
        }
    }
}
