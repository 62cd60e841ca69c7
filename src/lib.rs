//! chat-digest: per-participant LLM summaries of exported chat transcripts.
//!
//! Laid out as a hexagonal architecture: domain, ports, use cases, adapters.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
