//! External AI adapter - optional chat-completion delegation
//!
//! This crate wraps the rule-based engine in `chatty-core` with an optional
//! remote AI path:
//! - `ChatProvider` - pluggable trait over chat-completion backends
//! - one implementation per provider (OpenAI, Anthropic, Hugging Face,
//!   Cloudflare Workers AI) plus an in-process `Demo` provider
//! - `AssistedResponder` - sends the recent history plus a fixed system
//!   instruction to the configured provider and falls back to the
//!   rule-based reply on any failure
//!
//! # Safety principle
//!
//! The remote model only ever phrases free-form idle chatter. Quote and
//! order state transitions are decided by the deterministic flow engine in
//! `chatty-core`; an AI outage degrades wording, never behavior.

pub mod provider;
pub mod providers;
pub mod responder;

pub use provider::{ChatMessage, ChatProvider, ChatRole, CompletionRequest, ProviderError};
pub use providers::build_provider;
pub use responder::{default_system_instruction, AssistedResponder};
