//! Terminal chat (`--chat`): the browser UI's tabs and threads, driven from stdin.

use crate::actions::{process_user_message, ActionResponse, Pipeline};
use securesoul_core::{ChatSessions, DomainProfile, Message, ProcessUserMessageInput, EMERGENCY_CONTACTS};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands: /switch <persona|domain>, /tabs, /help, /quit. Anything else is sent as a message.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Switch(String),
    Tabs,
    Help,
    Quit,
    Empty,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Say(line.to_string());
    };
    let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    match name.to_ascii_lowercase().as_str() {
        "switch" => Command::Switch(arg.trim().to_string()),
        "tabs" => Command::Tabs,
        "quit" | "exit" => Command::Quit,
        "help" => Command::Help,
        _ => Command::Say(line.to_string()),
    }
}

fn emergency_banner() -> String {
    let numbers: Vec<String> = EMERGENCY_CONTACTS
        .iter()
        .map(|c| format!("{} {}", c.label, c.number))
        .collect();
    format!("!! EMERGENCY: if you are in danger call {}", numbers.join(" | "))
}

/// Chat state for one terminal session.
pub struct TerminalChat {
    sessions: ChatSessions,
    pipeline: Arc<Pipeline>,
}

impl TerminalChat {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            sessions: ChatSessions::default(),
            pipeline,
        }
    }

    pub fn sessions(&self) -> &ChatSessions {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut ChatSessions {
        &mut self.sessions
    }

    /// Send `text` on the active tab and record both sides of the turn.
    pub async fn send(&mut self, text: &str) -> ActionResponse {
        let domain = self.sessions.selected();
        self.sessions.current_mut().begin_turn(Message::user(text));
        let res = process_user_message(
            &self.pipeline,
            ProcessUserMessageInput {
                query: text.to_string(),
                domain: domain.to_string(),
            },
        )
        .await;
        self.sessions
            .current_mut()
            .finish_turn(Message::assistant(res.response.clone()), res.is_emergency);
        res
    }
}

fn prompt(chat: &TerminalChat) {
    print!("[{}] you> ", chat.sessions().profile().persona);
    let _ = std::io::stdout().flush();
}

/// Read stdin until EOF or `/quit`.
pub async fn run(pipeline: Arc<Pipeline>) -> std::io::Result<()> {
    let mut chat = TerminalChat::new(pipeline);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    let profile = chat.sessions().profile();
    println!("{}: {}", profile.persona, profile.initial_message);
    prompt(&chat);

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Tabs => {
                for p in DomainProfile::all() {
                    let marker = if p.domain == chat.sessions().selected() { "*" } else { " " };
                    let count = chat.sessions().thread(p.domain).messages.len();
                    println!("{} {} ({}) - {} messages", marker, p.persona, p.domain, count);
                }
            }
            Command::Switch(name) => {
                let Some(target) = DomainProfile::find(&name) else {
                    println!("No tab named '{}'. Try /tabs.", name);
                    prompt(&chat);
                    continue;
                };
                if !chat.sessions_mut().request_switch(target.domain) {
                    println!("Already talking to {}.", target.persona);
                    prompt(&chat);
                    continue;
                }
                print!(
                    "Switch to {} ({})? Your current conversation will be kept. [y/N] ",
                    target.persona, target.domain
                );
                let _ = std::io::stdout().flush();
                let answer = lines.next_line().await?.unwrap_or_default();
                if answer.trim().eq_ignore_ascii_case("y") || answer.trim().eq_ignore_ascii_case("yes") {
                    chat.sessions_mut().confirm_switch();
                    let thread = chat.sessions().current();
                    if let Some(last) = thread.messages.last() {
                        println!("{}: {}", target.persona, last.content);
                    }
                    if thread.is_emergency {
                        println!("{}", emergency_banner());
                    }
                } else {
                    chat.sessions_mut().cancel_switch();
                    println!("Staying with {}.", chat.sessions().profile().persona);
                }
            }
            Command::Say(text) => {
                let res = chat.send(&text).await;
                println!("{}: {}", chat.sessions().profile().persona, res.response);
                if let Some(err) = res.error {
                    println!("  ({})", err);
                }
                if chat.sessions().current().is_emergency {
                    println!("{}", emergency_banner());
                }
            }
        }
        prompt(&chat);
    }
    println!();
    Ok(())
}
