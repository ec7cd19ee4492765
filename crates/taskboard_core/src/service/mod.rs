//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into board-level operations.
//! - Keep the presentation layer decoupled from store details.

pub mod board_service;
