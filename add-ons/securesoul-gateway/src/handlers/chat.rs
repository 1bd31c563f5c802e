//! `POST /api/message` and `POST /api/audio`.
//!
//! A body that is not valid JSON (or is too large) is answered with the same `ActionResponse`
//! shape as any other failure, under the rejection's status code.

use crate::actions::{self, ActionResponse, UNTRANSCRIBED_QUERY};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use securesoul_core::{ProcessUserAudioInput, ProcessUserMessageInput, SoulError};

fn rejected(rejection: JsonRejection) -> (StatusCode, ActionResponse) {
    tracing::warn!(target: "securesoul::gateway", error = %rejection.body_text(), "request body rejected");
    (
        rejection.status(),
        ActionResponse::failure(&SoulError::validation(rejection.body_text())),
    )
}

pub async fn post_message(
    State(state): State<AppState>,
    body: Result<Json<ProcessUserMessageInput>, JsonRejection>,
) -> (StatusCode, Json<ActionResponse>) {
    match body {
        Ok(Json(input)) => (
            StatusCode::OK,
            Json(actions::process_user_message(&state.pipeline, input).await),
        ),
        Err(rejection) => {
            let (status, res) = rejected(rejection);
            (status, Json(res))
        }
    }
}

pub async fn post_audio(
    State(state): State<AppState>,
    body: Result<Json<ProcessUserAudioInput>, JsonRejection>,
) -> (StatusCode, Json<ActionResponse>) {
    match body {
        Ok(Json(input)) => (
            StatusCode::OK,
            Json(actions::process_user_audio(&state.pipeline, input).await),
        ),
        Err(rejection) => {
            let (status, res) = rejected(rejection);
            let res = ActionResponse {
                user_query: Some(UNTRANSCRIBED_QUERY.to_string()),
                ..res
            };
            (status, Json(res))
        }
    }
}
