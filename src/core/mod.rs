// src/core/mod.rs
//! Resume rendering, compilation and artifact staging.

pub mod artifact_store;
pub mod compiler;
pub mod direct_pdf;
pub mod latex;
pub mod retention;
pub mod sanitizer;

pub use artifact_store::{ArtifactKey, ArtifactStore, FsArtifactStore, MemoryArtifactStore};
pub use compiler::{CompileReport, DocumentCompiler, LatexCompiler};
pub use direct_pdf::DirectRenderer;
pub use latex::ResumeDocument;
pub use retention::spawn_retention_sweeper;
