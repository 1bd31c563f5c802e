//! securesoul-voice: speech transcription and synthesis for voice messages.
//!
//! - **stt**: recorded clip → `Transcription` (`SttBackend`, `GeminiStt`)
//! - **tts**: reply text → `data:audio/wav` URI (`TtsBackend`, `GeminiTts`)
//! - **wav**: raw 16-bit PCM → WAV container

mod error;
pub mod stt;
pub mod tts;
pub mod wav;

pub use error::{VoiceError, VoiceResult};
pub use stt::{transcribe, GeminiStt, SttBackend};
pub use tts::{synthesize, GeminiTts, TtsBackend};
