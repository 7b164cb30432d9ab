// src/web/handlers/resume_handlers.rs
//! Resume generation handlers for the LaTeX and direct renderers.

use crate::core::{ArtifactKey, DirectRenderer, ResumeDocument};
use crate::error::{GenerationError, GenerationResult};
use crate::types::{FlatResumeRequest, ResumeRequest};
use crate::web::types::{DirectResumeResponse, GenerateResumeResponse, ServerState};
use rocket::serde::json::Json;
use tracing::{error, info, info_span, warn, Instrument};

/// Assemble the LaTeX source, compile it and hand back the PDF location.
///
/// A failing compiler exit is only logged: `pdflatex` in nonstop mode often
/// exits non-zero on recoverable problems while still writing the PDF, so
/// the presence of `<job>.pdf` decides the outcome.
pub async fn generate_resume_handler(
    request: ResumeRequest,
    state: &ServerState,
) -> GenerationResult<Json<GenerateResumeResponse>> {
    request.check_limits(&state.config.limits)?;

    let key = ArtifactKey::for_submitter(request.name.as_deref());
    let span = info_span!(
        "resume_generation",
        job = %key.job_name(),
        request_id = %key.request_id()
    );

    async {
        let document = ResumeDocument::from_request(&request);
        info!("Sections: {}", document.section_titles().join(", "));

        let source = document.render()?;
        let tex = key.file_name("tex");
        state.store.put(&tex, source.as_bytes()).await?;
        info!("Staged {} ({} bytes)", tex, source.len());

        let report = state.compiler.compile(&key, state.store.as_ref()).await?;
        if !report.success {
            warn!(
                "Compiler exited with {:?}, checking for output anyway",
                report.exit_code
            );
        }

        let pdf = key.file_name("pdf");
        if !state.store.exists(&pdf).await? {
            error!("No PDF produced for {}", key.job_name());
            return Err(GenerationError::ArtifactMissing(pdf));
        }

        info!("Resume ready: {}", pdf);
        Ok(Json(GenerateResumeResponse {
            resume_url: format!("/resumes/{}", pdf),
        }))
    }
    .instrument(span)
    .await
    .inspect_err(|e| error!("Resume generation failed ({}): {}", e.code(), e))
}

/// Draw the flat form straight to PDF, no compiler involved.
pub async fn direct_resume_handler(
    request: FlatResumeRequest,
    state: &ServerState,
) -> GenerationResult<Json<DirectResumeResponse>> {
    request.check_limits(&state.config.limits)?;

    let key = ArtifactKey::for_submitter(request.name.as_deref());
    let pdf = key.file_name("pdf");

    let bytes = DirectRenderer::render(&request);
    state
        .store
        .put(&pdf, &bytes)
        .await
        .inspect_err(|e| error!("Failed to store {}: {}", pdf, e))?;
    info!("Direct resume written: {} ({} bytes)", pdf, bytes.len());

    let base = state
        .config
        .public_base_url
        .as_deref()
        .unwrap_or_default()
        .trim_end_matches('/');
    Ok(Json(DirectResumeResponse {
        url: format!("{}/resumes/{}", base, pdf),
    }))
}
