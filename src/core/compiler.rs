// src/core/compiler.rs
//! External LaTeX compiler invocation.

use crate::core::artifact_store::{ArtifactKey, ArtifactStore};
use crate::environment::CompilerSettings;
use crate::error::{GenerationError, GenerationResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Files the compiler leaves next to the PDF that are never served.
const AUXILIARY_EXTENSIONS: [&str; 3] = ["aux", "log", "out"];

const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// Outcome of a compiler run that finished within its time budget.
///
/// A non-zero exit is reported, not raised: the presence of the PDF decides.
#[derive(Debug, Clone)]
pub struct CompileReport {
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait DocumentCompiler: Send + Sync {
    /// Compile the `.tex` artifact named by `key` into `<job>.pdf` in `store`.
    async fn compile(
        &self,
        key: &ArtifactKey,
        store: &dyn ArtifactStore,
    ) -> GenerationResult<CompileReport>;
}

pub struct LatexCompiler {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl LatexCompiler {
    pub fn new(settings: &CompilerSettings) -> Self {
        Self {
            program: settings.program.clone(),
            args: settings.args.clone(),
            timeout: settings.timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn expand_args(&self, source: &Path, out_dir: &Path, job: &str) -> Vec<String> {
        let source = source.display().to_string();
        let out_dir = out_dir.display().to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{{source}}", &source)
                    .replace("{{out_dir}}", &out_dir)
                    .replace("{{job}}", job)
            })
            .collect()
    }

    async fn remove_auxiliary_files(&self, key: &ArtifactKey, store: &dyn ArtifactStore) {
        for ext in AUXILIARY_EXTENSIONS {
            if let Err(e) = store.remove(&key.file_name(ext)).await {
                warn!("Failed to remove {}: {}", key.file_name(ext), e);
            }
        }
    }
}

#[async_trait]
impl DocumentCompiler for LatexCompiler {
    async fn compile(
        &self,
        key: &ArtifactKey,
        store: &dyn ArtifactStore,
    ) -> GenerationResult<CompileReport> {
        let out_dir = store.local_dir().ok_or_else(|| {
            GenerationError::CompilerUnavailable(
                "staging area is not on the local filesystem".to_string(),
            )
        })?;
        let source = out_dir.join(key.file_name("tex"));
        let args = self.expand_args(&source, out_dir, &key.job_name());

        debug!("Running {} {:?}", self.program, args);

        let child = Command::new(&self.program)
            .args(&args)
            .current_dir(out_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GenerationError::CompilerUnavailable(format!("{}: {}", self.program, e)))?;

        // Dropping the wait future on timeout kills the child.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result
                .map_err(|e| GenerationError::Compile(format!("waiting for {}: {}", self.program, e)))?,
            Err(_) => {
                warn!(
                    "{} exceeded {}s for {}, killed",
                    self.program,
                    self.timeout.as_secs_f32(),
                    key.job_name()
                );
                self.remove_auxiliary_files(key, store).await;
                return Err(GenerationError::CompileTimeout(self.timeout));
            }
        };

        let report = CompileReport {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if report.success {
            info!("{} finished for {}", self.program, key.job_name());
        } else {
            warn!(
                "{} exited with {:?} for {}\nstderr: {}\nstdout: {}",
                self.program,
                report.exit_code,
                key.job_name(),
                tail(&report.stderr, DIAGNOSTIC_TAIL_LINES),
                tail(&report.stdout, DIAGNOSTIC_TAIL_LINES)
            );
        }

        self.remove_auxiliary_files(key, store).await;
        Ok(report)
    }
}

/// Last `lines` lines of `text`.
pub fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
