// src/lib.rs
//! Resume PDF generation service: LaTeX assembly compiled by an external
//! engine, a direct PDF renderer, and a staging area served over HTTP.

pub mod cli;
pub mod core;
pub mod environment;
pub mod error;
pub mod types;
pub mod web;

pub use environment::ServiceConfig;
pub use error::{GenerationError, GenerationResult};
pub use web::{build_rocket, start_web_server, ServerState};
