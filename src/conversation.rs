//! Prompt building and transcript bookkeeping for human/assistant dialogue.
//!
//! Two flavours share the same serialization:
//! - [`ConversationManager`] is stateless. The caller owns the history string
//!   and passes it back on every turn, which is what the HTTP service uses.
//! - [`ChatSession`] keeps a [`Transcript`] in memory for a single interactive
//!   session, optionally capped to the most recent exchanges.

use crate::error::{AppError, Result};
use crate::model::{CompletionBackend, CompletionRequest, DEFAULT_MAX_TOKENS};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Human => "Human",
            Role::Assistant => "AI",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.role.label(), self.text)
    }
}

/// One question and the answer it received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

impl Exchange {
    pub fn turns(&self) -> [Turn; 2] {
        [
            Turn { role: Role::Human, text: self.question.clone() },
            Turn { role: Role::Assistant, text: self.answer.clone() },
        ]
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.turns().iter().try_for_each(|turn| write!(f, "{turn}"))
    }
}

/// Ordered exchanges, oldest first. With a cap, the oldest exchange is
/// dropped once the cap is exceeded.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    exchanges: VecDeque<Exchange>,
    max_exchanges: Option<usize>,
}

impl Transcript {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A cap of zero keeps no history at all.
    pub fn bounded(max_exchanges: usize) -> Self {
        Self { exchanges: VecDeque::with_capacity(max_exchanges), max_exchanges: Some(max_exchanges) }
    }

    pub fn push(&mut self, exchange: Exchange) {
        self.exchanges.push_back(exchange);
        if let Some(max) = self.max_exchanges {
            while self.exchanges.len() > max {
                self.exchanges.pop_front();
            }
        }
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn turns(&self) -> impl Iterator<Item = Turn> + '_ {
        self.exchanges.iter().flat_map(Exchange::turns)
    }

    /// The serialized `Human: ..\nAI: ..\n` form used inside prompts.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.turns().try_for_each(|turn| write!(f, "{turn}"))
    }
}

/// Answer plus the history the caller must send back next turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionResult {
    pub answer: String,
    pub history: String,
}

pub fn build_prompt(history: &str, question: &str) -> String {
    format!("{history}Human: {question}\nAI:")
}

pub fn validate_question(question: Option<&str>) -> Result<&str> {
    match question {
        Some(q) if !q.trim().is_empty() => Ok(q),
        _ => Err(AppError::question_required()),
    }
}

pub struct ConversationManager<B> {
    backend: Arc<B>,
    max_tokens: u32,
}

impl<B> Clone for ConversationManager<B> {
    fn clone(&self) -> Self {
        Self { backend: self.backend.clone(), max_tokens: self.max_tokens }
    }
}

impl<B: CompletionBackend> ConversationManager<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend, max_tokens: DEFAULT_MAX_TOKENS }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// One-shot question: the bare question is the prompt, no stop sequences.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let question = validate_question(Some(question))?;
        let req = CompletionRequest::new(question, self.max_tokens);
        let text = self.backend.complete(&req).await?;
        Ok(text.trim().to_string())
    }

    pub async fn converse(&self, question: &str, history: &str) -> Result<CompletionResult> {
        let question = validate_question(Some(question))?;
        let req = CompletionRequest::new(build_prompt(history, question), self.max_tokens)
            .stop_at_turn_boundary();
        let answer = self.backend.complete(&req).await?.trim().to_string();
        let exchange = Exchange { question: question.to_string(), answer };
        let history = format!("{history}{exchange}");
        Ok(CompletionResult { answer: exchange.answer, history })
    }
}

/// A single in-memory dialogue, as used by the interactive chat tool.
pub struct ChatSession<B> {
    manager: ConversationManager<B>,
    transcript: Transcript,
}

impl<B: CompletionBackend> ChatSession<B> {
    pub fn new(backend: Arc<B>, transcript: Transcript) -> Self {
        Self { manager: ConversationManager::new(backend), transcript }
    }

    /// Asks with the retained history. A failed call leaves history untouched.
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        let result = self.manager.converse(question, &self.transcript.render()).await?;
        self.transcript.push(Exchange { question: question.to_string(), answer: result.answer.clone() });
        Ok(result.answer)
    }

    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    pub fn history(&self) -> String {
        self.transcript.render()
    }

    /// Exchanges currently carried into the prompt.
    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
