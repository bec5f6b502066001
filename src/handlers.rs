use crate::errors::{AppError, LedgerError};
use crate::explorer;
use crate::models::{
    ConnectRequest, ConnectResponse, ExplorerRecord, LogRequest, LogResponse, SummaryResponse,
    UsageEntry,
};
use crate::session::{session_id, SessionCookie};
use crate::state::AppState;
use crate::stats::build_summary;
use crate::ui::{render_explorer, render_index};
use crate::wallet::{self, short_address, ReportedProvider};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, Redirect},
    Form, Json,
};
use std::time::Instant;
use tracing::info;

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let summary = summary_for(&state, &headers).await;
    Html(render_index(&summary))
}

pub async fn explorer_page(Path(tx_hash): Path<String>) -> Html<String> {
    Html(render_explorer(&explorer::lookup(&tx_hash)))
}

pub async fn get_explorer(Path(tx_hash): Path<String>) -> Json<ExplorerRecord> {
    Json(explorer::lookup(&tx_hash))
}

pub async fn get_summary(State(state): State<AppState>, headers: HeaderMap) -> Json<SummaryResponse> {
    Json(summary_for(&state, &headers).await)
}

pub async fn get_logs(State(state): State<AppState>, headers: HeaderMap) -> Json<Vec<UsageEntry>> {
    let mut sessions = state.sessions.lock().await;
    let entries = session_id(&headers)
        .and_then(|id| sessions.lookup(&id, Instant::now()).map(|s| s.ledger.entries().to_vec()))
        .unwrap_or_default();
    Json(entries)
}

pub async fn connect_wallet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ConnectRequest>,
) -> Result<(SessionCookie, Json<ConnectResponse>), AppError> {
    let provider = ReportedProvider::from(payload);
    let address = wallet::connect(&provider).await?;

    let mut sessions = state.sessions.lock().await;
    let requested = session_id(&headers);
    let (id, session, created) = sessions.get_or_create(requested.as_deref(), Instant::now());
    session.wallet = Some(address.clone());
    if created {
        info!(sessions = sessions.len(), "session started");
    }
    info!(wallet = %short_address(&address), "wallet connected");

    let cookie = if created {
        SessionCookie::Set(id)
    } else {
        SessionCookie::Keep
    };
    Ok((
        cookie,
        Json(ConnectResponse {
            display: short_address(&address),
            wallet: address,
        }),
    ))
}

pub async fn log_usage(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LogRequest>,
) -> Result<Json<LogResponse>, AppError> {
    let entry = apply_log(&state, &headers, payload.liters.as_deref()).await?;
    Ok(Json(LogResponse {
        explorer_url: state.config.explorer_url(&entry.tx_hash),
        entry,
    }))
}

pub async fn log_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(payload): Form<LogRequest>,
) -> Result<Redirect, AppError> {
    apply_log(&state, &headers, payload.liters.as_deref()).await?;
    Ok(Redirect::to("/"))
}

pub async fn end_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (SessionCookie, StatusCode) {
    let Some(id) = session_id(&headers) else {
        return (SessionCookie::Keep, StatusCode::NO_CONTENT);
    };
    let mut sessions = state.sessions.lock().await;
    if let Some(session) = sessions.remove(&id) {
        info!(entries = session.ledger.len(), "session ended");
    }
    (SessionCookie::Clear, StatusCode::NO_CONTENT)
}

async fn apply_log(
    state: &AppState,
    headers: &HeaderMap,
    liters: Option<&str>,
) -> Result<UsageEntry, AppError> {
    let id = session_id(headers).ok_or(LedgerError::InvalidSubmission)?;
    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .lookup(&id, Instant::now())
        .ok_or(LedgerError::InvalidSubmission)?;

    let entry = session.ledger.append(liters, session.wallet.as_deref())?;
    info!(id = entry.id, liters = entry.liters, tx = %entry.tx_hash, "usage logged");
    Ok(entry)
}

async fn summary_for(state: &AppState, headers: &HeaderMap) -> SummaryResponse {
    let mut sessions = state.sessions.lock().await;
    let session = session_id(headers).and_then(|id| sessions.lookup(&id, Instant::now()));
    build_summary(session.as_deref(), &state.config)
}
