// src/types/mod.rs
pub mod lenient;
pub mod resume;

pub use resume::{FlatResumeRequest, ResumeRequest};
