// src/error.rs
use std::time::Duration;
use thiserror::Error;

/// Failures of a single resume generation request.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid resume data: {0}")]
    Validation(String),

    #[error("Compiler could not be started: {0}")]
    CompilerUnavailable(String),

    #[error("Compilation did not finish within {}s", .0.as_secs())]
    CompileTimeout(Duration),

    #[error("Compilation failed: {0}")]
    Compile(String),

    #[error("Compiled document not found: {0}")]
    ArtifactMissing(String),

    #[error("Staging area error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Rendering failed: {0}")]
    Render(String),
}

impl GenerationError {
    pub fn status_code(&self) -> u16 {
        match self {
            GenerationError::Validation(_) => 400,
            GenerationError::CompileTimeout(_) => 504,
            _ => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::Validation(_) => "VALIDATION_ERROR",
            GenerationError::CompilerUnavailable(_) => "COMPILER_UNAVAILABLE",
            GenerationError::CompileTimeout(_) => "COMPILE_TIMEOUT",
            GenerationError::Compile(_) => "COMPILE_ERROR",
            GenerationError::ArtifactMissing(_) => "ARTIFACT_MISSING",
            GenerationError::Storage(_) => "STORAGE_ERROR",
            GenerationError::Render(_) => "RENDER_ERROR",
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            GenerationError::Validation(_) => vec![
                "Shorten the offending field or list".to_string(),
                "Check your request JSON format".to_string(),
            ],
            GenerationError::CompileTimeout(_) | GenerationError::Compile(_) => vec![
                "Try again in a few moments".to_string(),
                "Remove unusual characters from the form fields".to_string(),
            ],
            _ => vec![
                "Try again in a few moments".to_string(),
                "Contact support if the problem persists".to_string(),
            ],
        }
    }

    /// Message safe to show to callers; internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            GenerationError::Validation(_) | GenerationError::CompileTimeout(_) => self.to_string(),
            GenerationError::ArtifactMissing(_) | GenerationError::Compile(_) => {
                "PDF generation failed.".to_string()
            }
            _ => "Failed to generate resume.".to_string(),
        }
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;
