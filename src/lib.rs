//! Task Garden — a gamified task tracker with a chat assistant.

pub mod api;
pub mod chat;
pub mod classifier;
pub mod config;
pub mod error;
pub mod garden;
pub mod llm;
