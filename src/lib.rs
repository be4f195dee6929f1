// ABOUTME: Root library module exposing the Matrix transport and core re-exports
// ABOUTME: The bot logic lives in inder-core; this crate wires it to matrix-sdk

pub mod matrix_client;
pub mod platform;

// Re-export platform-agnostic modules from inder-core
pub use inder_core::bot;
pub use inder_core::commands;
pub use inder_core::config;
pub use inder_core::gate;
pub use inder_core::interpreter;
pub use inder_core::paths;
pub use inder_core::session;
pub use inder_core::traits;
