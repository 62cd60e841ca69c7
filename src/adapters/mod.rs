//! Infrastructure adapters. Implement outbound ports.
//!
//! AI services, transcript files, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod transcript;
pub mod ui;
