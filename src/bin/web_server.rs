//! Web server for the multi-carrier steganography API

use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use clap::Parser;
use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use stegify::common::config::StegifyConfig;
use stegify::common::logging::init_logger;
use stegify::{StegError, StegService};

/// Command-line arguments for the web server binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (TOML format)
    ///
    /// Example: config/stegify.toml
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Serialize)]
struct EncodeResponse {
    success: bool,
    message: String,
    result_images_base64: Vec<String>,
}

#[derive(Serialize)]
struct DecodeResponse {
    success: bool,
    message: String,
    payload_base64: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

struct AppState {
    service: StegService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();
    let config = StegifyConfig::load_or_default(args.config.as_deref())?;

    info!("🚀 Initializing web server...");

    let state = Arc::new(AppState {
        service: StegService::new(&config.runtime),
    });

    let app = Router::new()
        .route("/api/encode", post(encode_handler))
        .route("/api/decode", post(decode_handler))
        .route("/api/health", get(health_check))
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = config.server.address.as_str();
    info!("🌐 Web server running on http://{}", addr);
    info!("📡 API endpoints: http://{0}/api/encode, http://{0}/api/decode", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "stegify",
        "operations": ["encode", "decode"]
    }))
}

fn bad_request(error: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

/// HTTP status for a library error: bad input is 400, an unusable carrier 422.
fn status_for(e: &StegError) -> StatusCode {
    match e {
        StegError::Capacity { .. } | StegError::ResultCountMismatch { .. } => {
            StatusCode::BAD_REQUEST
        }
        StegError::Codec { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        StegError::Io { .. } | StegError::Worker { .. } | StegError::Join(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn steg_failure(e: StegError) -> ApiError {
    let status = status_for(&e);
    if status.is_server_error() {
        error!("❌ Request failed: {}", e);
    } else {
        warn!("⚠️ Request rejected: {}", e);
    }
    (status, Json(ErrorResponse { error: e.to_string() }))
}

/// Multipart fields of one request, carriers kept in upload order.
#[derive(Default)]
struct Upload {
    data: Option<Vec<u8>>,
    carriers: Vec<Vec<u8>>,
}

impl Upload {
    fn record(&mut self, name: &str, bytes: Vec<u8>) {
        match name {
            "data" => self.data = Some(bytes),
            "carrier" => self.carriers.push(bytes),
            other => warn!("Ignoring unknown multipart field '{}'", other),
        }
    }

    fn finish(self) -> Result<Self, ApiError> {
        if self.carriers.is_empty() {
            return Err(bad_request("No carrier images provided".to_string()));
        }
        Ok(self)
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Failed to read multipart data: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("Failed to read field '{}': {}", name, e)))?;

        upload.record(&name, bytes.to_vec());
    }

    upload.finish()
}

async fn encode_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_upload(multipart).await?;
    let data = upload
        .data
        .ok_or_else(|| bad_request("No data provided".to_string()))?;

    let request_id = rand::random::<u64>();
    info!(
        "📤 Encode request #{}: {} bytes, {} carrier(s)",
        request_id,
        data.len(),
        upload.carriers.len()
    );

    let results = state
        .service
        .encode_bytes(data, upload.carriers)
        .await
        .map_err(steg_failure)?;

    info!("✅ Encode request #{} complete", request_id);

    Ok((
        StatusCode::OK,
        Json(EncodeResponse {
            success: true,
            message: format!("Encoded payload across {} carrier(s)", results.len()),
            result_images_base64: results
                .iter()
                .map(|png| general_purpose::STANDARD.encode(png))
                .collect(),
        }),
    ))
}

async fn decode_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_upload(multipart).await?;

    let request_id = rand::random::<u64>();
    info!(
        "📥 Decode request #{}: {} carrier(s)",
        request_id,
        upload.carriers.len()
    );

    let payload = state
        .service
        .decode_bytes(upload.carriers)
        .await
        .map_err(steg_failure)?;

    info!("✅ Decode request #{} complete", request_id);

    Ok((
        StatusCode::OK,
        Json(DecodeResponse {
            success: true,
            message: format!("Recovered {} bytes", payload.len()),
            payload_base64: general_purpose::STANDARD.encode(&payload),
        }),
    ))
}
