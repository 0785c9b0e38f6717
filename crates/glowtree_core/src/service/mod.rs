//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate stores and scene state into use-case level APIs.
//! - Keep UI layers decoupled from storage and rendering details.

pub mod tree_service;
