//! Conversation threads: one per domain tab, held in memory for the session only.

use crate::schema::Domain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persona shown for a domain tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainProfile {
    pub domain: Domain,
    pub persona: &'static str,
    pub initial_message: &'static str,
    /// CSS class applied to the page while this tab is active.
    pub theme: &'static str,
}

impl DomainProfile {
    pub fn for_domain(domain: Domain) -> Self {
        match domain {
            Domain::MentalHealth => Self {
                domain,
                persona: "Sheny",
                initial_message: "Hi, I'm Sheny. How can I help you with your mental well-being today? 😊",
                theme: "theme-mental-health",
            },
            Domain::Legal => Self {
                domain,
                persona: "Gravy",
                initial_message: "I'm Gravy. What legal information can I provide for you?",
                theme: "theme-legal",
            },
            Domain::GovernmentSchemes => Self {
                domain,
                persona: "Aarogya",
                initial_message: "I am Aarogya. How can I assist you with government schemes?",
                theme: "theme-government",
            },
            Domain::Safety => Self {
                domain,
                persona: "Alert",
                initial_message: "This is Alert. What safety concerns can I help you with?",
                theme: "theme-safety",
            },
        }
    }

    pub fn all() -> Vec<Self> {
        Domain::ALL.into_iter().map(Self::for_domain).collect()
    }

    /// Resolve a tab by persona name ("gravy") or domain name ("legal").
    pub fn find(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all().into_iter().find(|p| {
            p.persona.eq_ignore_ascii_case(name) || p.domain.as_str().eq_ignore_ascii_case(name)
        })
    }
}

/// Number shown in the emergency banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    pub label: &'static str,
    pub number: &'static str,
}

pub const EMERGENCY_CONTACTS: [EmergencyContact; 3] = [
    EmergencyContact {
        label: "Police",
        number: "100",
    },
    EmergencyContact {
        label: "Fire",
        number: "101",
    },
    EmergencyContact {
        label: "Ambulance",
        number: "102",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Playable `data:` URI for voice messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            audio: None,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_audio(mut self, audio: Option<String>) -> Self {
        self.audio = audio;
        self
    }
}

/// One domain's thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub is_emergency: bool,
}

impl ChatState {
    /// New thread seeded with the persona greeting.
    pub fn new(profile: &DomainProfile) -> Self {
        Self {
            messages: vec![Message::assistant(profile.initial_message)],
            is_loading: false,
            is_emergency: false,
        }
    }

    /// Record the user's message and enter the loading state.
    pub fn begin_turn(&mut self, message: Message) {
        self.messages.push(message);
        self.is_loading = true;
    }

    /// Append the assistant reply and leave the loading state. The emergency flag latches:
    /// once set it stays set for the rest of the thread.
    pub fn finish_turn(&mut self, reply: Message, is_emergency: bool) {
        self.messages.push(reply);
        self.is_emergency |= is_emergency;
        self.is_loading = false;
    }
}

/// All domain threads plus the active tab and any switch awaiting confirmation.
#[derive(Debug, Clone)]
pub struct ChatSessions {
    selected: Domain,
    pending: Option<Domain>,
    threads: [ChatState; 4],
}

impl Default for ChatSessions {
    fn default() -> Self {
        Self::new(Domain::MentalHealth)
    }
}

impl ChatSessions {
    pub fn new(selected: Domain) -> Self {
        let threads = Domain::ALL.map(|d| ChatState::new(&DomainProfile::for_domain(d)));
        Self {
            selected,
            pending: None,
            threads,
        }
    }

    pub fn selected(&self) -> Domain {
        self.selected
    }

    pub fn profile(&self) -> DomainProfile {
        DomainProfile::for_domain(self.selected)
    }

    pub fn pending(&self) -> Option<Domain> {
        self.pending
    }

    pub fn thread(&self, domain: Domain) -> &ChatState {
        &self.threads[domain.index()]
    }

    pub fn current(&self) -> &ChatState {
        self.thread(self.selected)
    }

    pub fn current_mut(&mut self) -> &mut ChatState {
        &mut self.threads[self.selected.index()]
    }

    /// Ask to switch tabs. Returns false when `domain` is already active.
    pub fn request_switch(&mut self, domain: Domain) -> bool {
        if domain == self.selected {
            self.pending = None;
            return false;
        }
        self.pending = Some(domain);
        true
    }

    /// Apply the pending switch. The previous thread is kept as it was.
    pub fn confirm_switch(&mut self) -> Option<Domain> {
        let next = self.pending.take()?;
        self.selected = next;
        Some(next)
    }

    pub fn cancel_switch(&mut self) {
        self.pending = None;
    }
}
