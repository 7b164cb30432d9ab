// src/web/handlers/artifact_handlers.rs
use crate::web::types::{ArtifactResponse, ServerState};
use rocket::http::Status;
use std::io;
use tracing::{debug, error};

/// Serve one staged artifact by file name. Invalid names are reported as
/// missing rather than as bad requests.
pub async fn get_artifact_handler(
    file: &str,
    state: &ServerState,
) -> Result<ArtifactResponse, Status> {
    match state.store.get(file).await {
        Ok(Some(data)) => {
            debug!("Serving {} ({} bytes)", file, data.len());
            Ok(ArtifactResponse::new(file, data))
        }
        Ok(None) => Err(Status::NotFound),
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => Err(Status::NotFound),
        Err(e) => {
            error!("Failed to read artifact {}: {}", file, e);
            Err(Status::InternalServerError)
        }
    }
}
