// src/application/commands/mod.rs
//
// HTTP Handlers
//
// ARCHITECTURE:
// - Handlers are thin adapters between HTTP and repositories
// - Handlers accept DTOs, return DTOs
// - Handlers NEVER contain business logic

pub mod article_commands;
pub mod view_commands;

pub use article_commands::*;
pub use view_commands::*;
