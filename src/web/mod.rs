// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::core::{spawn_retention_sweeper, FsArtifactStore, LatexCompiler};
use crate::environment::ServiceConfig;
use crate::error::GenerationResult;
use crate::types::{FlatResumeRequest, ResumeRequest};
use anyhow::{Context, Result};
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{AdHoc, Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "Content-Type"));
    }
}

#[post("/generate-resume", data = "<request>")]
pub async fn generate_resume(
    request: Json<ResumeRequest>,
    state: &State<ServerState>,
) -> GenerationResult<Json<GenerateResumeResponse>> {
    handlers::generate_resume_handler(request.into_inner(), state).await
}

#[post("/generate-resume", data = "<request>")]
pub async fn generate_direct_resume(
    request: Json<FlatResumeRequest>,
    state: &State<ServerState>,
) -> GenerationResult<Json<DirectResumeResponse>> {
    handlers::direct_resume_handler(request.into_inner(), state).await
}

#[get("/resumes/<file>")]
pub async fn get_artifact(
    file: &str,
    state: &State<ServerState>,
) -> Result<ArtifactResponse, Status> {
    handlers::get_artifact_handler(file, state).await
}

#[get("/health")]
pub async fn health() -> &'static str {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Check your request JSON format".to_string()],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Generated resumes expire; generate it again".to_string()],
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body too large".to_string(),
        "PAYLOAD_TOO_LARGE".to_string(),
        vec!["Shorten the resume content".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body is not a JSON object".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Send the form fields as a JSON object".to_string(),
            "Check your request JSON format".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Routes, catchers and fairings around `state`; does not launch.
pub fn build_rocket(state: ServerState) -> Rocket<Build> {
    let config = &state.config;
    let figment = rocket::Config::figment()
        .merge(("address", config.address.clone()))
        .merge(("port", config.port))
        .merge((
            "limits",
            Limits::default().limit("json", config.limits.max_body_bytes.bytes()),
        ));

    let retention = config.retention.clone();
    let store = state.store.clone();

    rocket::custom(figment)
        .attach(Cors)
        .attach(AdHoc::on_liftoff("Retention sweeper", move |_| {
            Box::pin(async move {
                match retention.ttl() {
                    Some(ttl) => {
                        spawn_retention_sweeper(store, ttl, retention.sweep_interval());
                    }
                    None => info!("Retention disabled, staged artifacts are kept"),
                }
            })
        }))
        .manage(state)
        .register(
            "/",
            catchers![
                bad_request,
                not_found,
                payload_too_large,
                unprocessable,
                internal_error
            ],
        )
        .mount("/api", routes![generate_resume, health])
        .mount("/", routes![generate_direct_resume, get_artifact, options])
}

// Main server start function
pub async fn start_web_server(config: ServiceConfig) -> Result<()> {
    let store = FsArtifactStore::open(&config.staging_dir)
        .await
        .with_context(|| format!("Failed to open staging directory {}", config.staging_dir.display()))?;
    let compiler = LatexCompiler::new(&config.compiler);

    info!("Starting resume generator on {}:{}", config.address, config.port);
    info!("Staging directory: {}", store.root().display());
    info!(
        "Compiler: {} (timeout {}s)",
        config.compiler.program, config.compiler.timeout_secs
    );

    let state = ServerState::new(Arc::new(store), Arc::new(compiler), config);

    build_rocket(state)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
