//! Chat session state.
//!
//! A submission walks `Idle -> Sending -> Idle`. While a request is in flight
//! the send control stays disabled, so [`ChatSession::submit`] refuses a second
//! question until [`ChatSession::complete`] has run. There is no cancellation.

use std::fmt::Display as FmtDisplay;

use chrono::{DateTime, Local};
use clara_core::Answer;
use tracing::{debug, warn};

use crate::render::{render_answer, Block};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One bubble of the transcript, already rendered for display
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<Block>,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn user(text: &str, timestamp: DateTime<Local>) -> Self {
        Self {
            role: Role::User,
            content: vec![Block::Plain(text.to_string())],
            timestamp,
        }
    }

    pub fn assistant(answer: &Answer, timestamp: DateTime<Local>) -> Self {
        Self {
            role: Role::Assistant,
            content: render_answer(answer),
            timestamp,
        }
    }

    /// Time label shown under the bubble
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
}

/// Keys the input box reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    input: String,
    send_enabled: bool,
    typing: bool,
    phase: Phase,
    input_focused: bool,
    focus_count: usize,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Fresh session with an empty transcript and the input focused
    pub fn new() -> Self {
        let mut session = Self {
            transcript: Vec::new(),
            input: String::new(),
            send_enabled: true,
            typing: false,
            phase: Phase::Idle,
            input_focused: false,
            focus_count: 0,
        };
        session.focus_input();
        session
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_send_enabled(&self) -> bool {
        self.send_enabled
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    /// Number of times the input box has been given focus
    pub fn focus_count(&self) -> usize {
        self.focus_count
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Enter without shift submits; shift+Enter and characters edit the input.
    pub fn key_press(&mut self, key: Key, shift: bool, now: DateTime<Local>) -> Option<String> {
        match key {
            Key::Enter if !shift => self.submit(now),
            Key::Enter => {
                self.input.push('\n');
                None
            }
            Key::Char(c) => {
                self.input.push(c);
                None
            }
        }
    }

    /// Starts a submission and returns the question to send.
    ///
    /// Returns `None` without touching any state when the trimmed input is
    /// empty or a request is already in flight.
    pub fn submit(&mut self, now: DateTime<Local>) -> Option<String> {
        if !self.send_enabled || self.phase == Phase::Sending {
            debug!("Submission ignored, a request is already in flight");
            return None;
        }

        let question = self.input.trim();
        if question.is_empty() {
            return None;
        }
        let question = question.to_string();

        self.transcript.push(ChatMessage::user(&question, now));
        self.input.clear();
        self.send_enabled = false;
        self.typing = true;
        self.phase = Phase::Sending;

        Some(question)
    }

    /// Finishes the in-flight submission with the request outcome.
    ///
    /// Failures are shown as the fixed client error answer. Send is re-enabled
    /// and the input focused whatever the outcome. Returns `false` when no
    /// submission was in flight.
    pub fn complete<E: FmtDisplay>(
        &mut self,
        outcome: Result<Answer, E>,
        now: DateTime<Local>,
    ) -> bool {
        if self.phase != Phase::Sending {
            return false;
        }

        self.typing = false;
        let answer = outcome.unwrap_or_else(|e| {
            warn!(error = %e, "Request to Clara failed");
            Answer::client_error()
        });
        self.transcript.push(ChatMessage::assistant(&answer, now));

        self.send_enabled = true;
        self.phase = Phase::Idle;
        self.focus_input();
        true
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
        self.focus_count += 1;
    }
}
