//! `GET /api/domains`: tab personas, their seeded threads, and the emergency numbers.

use crate::AppState;
use axum::{extract::State, Json};
use securesoul_core::{ChatState, DomainProfile, EmergencyContact, EMERGENCY_CONTACTS};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEntry {
    #[serde(flatten)]
    pub profile: DomainProfile,
    pub initial_state: ChatState,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainsResponse {
    pub app_name: String,
    pub emergency_contacts: &'static [EmergencyContact],
    pub domains: Vec<DomainEntry>,
}

pub async fn list_domains(State(state): State<AppState>) -> Json<DomainsResponse> {
    let domains = DomainProfile::all()
        .into_iter()
        .map(|profile| DomainEntry {
            initial_state: ChatState::new(&profile),
            profile,
        })
        .collect();
    Json(DomainsResponse {
        app_name: state.config.app_name.clone(),
        emergency_contacts: &EMERGENCY_CONTACTS,
        domains,
    })
}
