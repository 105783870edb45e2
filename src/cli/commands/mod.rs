//! Subcommand implementations.

/// Endpoint check command handler.
pub mod check;

/// Configure command handler.
pub mod configure;

/// File statistics command handler.
pub mod stats;

/// Translation command handler.
pub mod translate;
