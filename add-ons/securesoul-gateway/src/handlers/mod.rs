//! HTTP handlers for the chat API.

pub mod chat;
pub mod domains;
