use crate::analysis::ShiftAnalyzer;
use crate::cli::Args;
use crate::records;
use crate::shift_notes::{AnalysisResult, ShiftNote};
use crate::AppState;
use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};
use tracing_subscriber::{prelude::*, Registry};
use tracing_tree::HierarchicalLayer;

const ANALYZER_UNAVAILABLE: &str =
    "AI service not available. Please configure GEMINI_API_KEY in .env file.";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    database: &'static str,
    gemini: &'static str,
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    summary: String,
}

#[instrument(skip(state))]
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        message: "Server is running",
        database: if state.db.get().is_ok() {
            "connected"
        } else {
            "unavailable"
        },
        gemini: if state.analyzer.is_some() {
            "available"
        } else {
            "not configured"
        },
    })
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn require_analyzer(
    state: &AppState,
) -> Result<Arc<ShiftAnalyzer>, Response> {
    state.analyzer.clone().ok_or_else(|| {
        error_response(StatusCode::SERVICE_UNAVAILABLE, ANALYZER_UNAVAILABLE)
    })
}

struct ShiftInputs {
    notes: Vec<ShiftNote>,
    shift: records::ShiftRecord,
    recipient: Option<records::CareRecipientRecord>,
}

// Ok(None) means the shift does not exist.
fn load_shift_inputs(
    state: &AppState,
    shift_id: &str,
) -> Result<Option<ShiftInputs>> {
    let Some(shift) = records::get_shift(state, shift_id)? else {
        return Ok(None);
    };
    let stored = records::get_shift_notes(state, shift_id)?;
    let notes = shift.notes(stored);
    let recipient = match shift.care_recipient_id.as_deref() {
        Some(id) => records::get_care_recipient(state, id)?,
        None => None,
    };
    Ok(Some(ShiftInputs {
        notes,
        shift,
        recipient,
    }))
}

#[axum::debug_handler]
async fn analyze_shift_notes(
    State(state): State<Arc<AppState>>,
    Path(shift_id): Path<String>,
) -> Response {
    let analyzer = match require_analyzer(&state) {
        Ok(analyzer) => analyzer,
        Err(response) => return response,
    };

    let inputs = match load_shift_inputs(&state, &shift_id) {
        Ok(Some(inputs)) => inputs,
        Ok(None) => {
            return error_response(StatusCode::NOT_FOUND, "Shift not found")
        }
        Err(e) => {
            error!("Error loading shift {}: {}", shift_id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnalysisResult {
                    error: Some(format!("Error analyzing shift notes: {}", e)),
                    ..Default::default()
                }),
            )
                .into_response();
        }
    };

    info!(
        "Analyzing {} notes for shift {}",
        inputs.notes.len(),
        shift_id
    );
    let context = inputs.shift.context();
    let recipient_name = inputs
        .recipient
        .as_ref()
        .and_then(|recipient| recipient.name.as_deref());
    let profile = inputs
        .recipient
        .as_ref()
        .and_then(|recipient| recipient.profile.as_ref());

    let analysis = analyzer
        .analyze(&inputs.notes, recipient_name, Some(&context), profile)
        .await;
    Json(analysis).into_response()
}

#[axum::debug_handler]
async fn get_shift_summary(
    State(state): State<Arc<AppState>>,
    Path(shift_id): Path<String>,
) -> Response {
    let analyzer = match require_analyzer(&state) {
        Ok(analyzer) => analyzer,
        Err(response) => return response,
    };

    let inputs = match load_shift_inputs(&state, &shift_id) {
        Ok(Some(inputs)) => inputs,
        Ok(None) => {
            return error_response(StatusCode::NOT_FOUND, "Shift not found")
        }
        Err(e) => {
            error!("Error loading shift {}: {}", shift_id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Error generating summary: {}", e),
                    "summary": "",
                })),
            )
                .into_response();
        }
    };

    let summary = analyzer.summarize(&inputs.notes).await;
    Json(SummaryResponse { summary }).into_response()
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/shifts/{shift_id}/analyze", post(analyze_shift_notes))
        .route("/shifts/{shift_id}/summary", get(get_shift_summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn open_db_pool(path: &str) -> Result<Pool<SqliteConnectionManager>> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::new(manager)?;
    {
        let mut conn = pool.get()?;
        crate::init_carelog_db(&mut conn)?;
    }
    Ok(pool)
}

pub async fn serve() -> Result<()> {
    // Initialize logging with tracing
    let subscriber = Registry::default()
        .with(
            HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        );
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Starting carelog service");
    info!("Opening database at {}", args.db);
    let db_pool = open_db_pool(&args.db)?;

    let state = crate::create_app_state(crate::AppConfig {
        db_pool,
        gemini_api_key: args.gemini_api_key,
        gemini_api_base: Some(args.gemini_api_base),
        model: args.model,
    });

    let app = routes(state);
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("Received CTRL-C, initiating shutdown");
            }
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
