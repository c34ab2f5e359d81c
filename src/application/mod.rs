// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - The boundary between HTTP (axum) and the repository layer
// - Translates between DTOs and domain entities
// - Owns the error → status mapping

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod router;
pub mod state;

#[cfg(test)]
mod router_tests;

pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType};
pub use router::build_router;
pub use state::AppState;
