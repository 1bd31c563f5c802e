//! Speech prompts. Transcription sends the clip inline after this instruction; synthesis sends
//! the reply text as-is.

pub const SPEECH_TO_TEXT_INSTRUCTION: &str = r#"Transcribe the user's words in the following audio clip into text.
The speaker may mix English and Hindi (Hinglish); keep the words as spoken.
Return only the transcription, with no commentary."#;
