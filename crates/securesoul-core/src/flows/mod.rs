//! Text flows: one named prompt, one model call, one validated output each.

pub mod emotion;
pub mod intent;
pub mod response;

pub use emotion::detect_emotion;
pub use intent::detect_user_intent;
pub use response::rag_based_response;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::error::{SoulError, SoulResult};
    use crate::llm::{GenerateRequest, GenerateResponse, GenerativeModel};
    use std::sync::Mutex;

    /// Returns a fixed answer and records every request it receives.
    pub struct ScriptedModel {
        pub answer: Option<String>,
        pub fail: bool,
        pub seen: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedModel {
        pub fn answering(answer: &str) -> Self {
            Self {
                answer: Some(answer.to_string()),
                fail: false,
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn silent() -> Self {
            Self {
                answer: None,
                fail: false,
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                answer: None,
                fail: true,
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn last_request(&self) -> GenerateRequest {
            self.seen.lock().unwrap().last().cloned().expect("no request recorded")
        }
    }

    #[async_trait::async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(&self, request: GenerateRequest) -> SoulResult<GenerateResponse> {
            self.seen.lock().unwrap().push(request);
            if self.fail {
                return Err(SoulError::Llm {
                    status: 503,
                    body: "model overloaded".into(),
                });
            }
            Ok(GenerateResponse {
                text: self.answer.clone(),
                media: None,
            })
        }
    }
}
