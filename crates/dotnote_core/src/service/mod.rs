//! Core use-case services.
//!
//! # Responsibility
//! - Validate user input before any transactional write.
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod category_service;
pub mod note_service;
pub mod profile_service;
