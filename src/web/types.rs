// src/web/types.rs
use crate::core::{ArtifactStore, DocumentCompiler};
use crate::environment::ServiceConfig;
use crate::error::GenerationError;
use rocket::http::{ContentType, Status};
use rocket::response::{self, status, Responder};
use rocket::serde::json::Json;
use rocket::serde::Serialize;
use rocket::{Request, Response};
use std::sync::Arc;

/// Shared by every route through `State`.
pub struct ServerState {
    pub store: Arc<dyn ArtifactStore>,
    pub compiler: Arc<dyn DocumentCompiler>,
    pub config: ServiceConfig,
}

impl ServerState {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        compiler: Arc<dyn DocumentCompiler>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            compiler,
            config,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct GenerateResumeResponse {
    #[serde(rename = "resumeUrl")]
    pub resume_url: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DirectResumeResponse {
    pub url: String,
}

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

impl From<&GenerationError> for StandardErrorResponse {
    fn from(err: &GenerationError) -> Self {
        Self::new(
            err.public_message(),
            err.code().to_string(),
            err.suggestions(),
        )
    }
}

impl<'r> Responder<'r, 'static> for GenerationError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = Status::from_code(self.status_code()).unwrap_or(Status::InternalServerError);
        status::Custom(status, Json(StandardErrorResponse::from(&self))).respond_to(request)
    }
}

/// Raw staged file with a content type taken from its extension.
pub struct ArtifactResponse {
    pub data: Vec<u8>,
    pub content_type: ContentType,
}

impl ArtifactResponse {
    pub fn new(file_name: &str, data: Vec<u8>) -> Self {
        let content_type = file_name
            .rsplit_once('.')
            .and_then(|(_, ext)| ContentType::from_extension(ext))
            .unwrap_or(ContentType::Binary);
        Self { data, content_type }
    }
}

impl<'r> Responder<'r, 'static> for ArtifactResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(self.content_type)
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}
