//! Narrative collaborator - LLM client, prompts, response parsing

pub mod client;
pub mod context;
pub mod narrator;
pub mod parser;

pub use client::LlmClient;
pub use narrator::{Narrator, ScriptedNarrator};
