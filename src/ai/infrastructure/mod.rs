//! Scorer adapters for external providers.

pub mod openai;
