//! HTTP routes of the dashboard datasource.

use std::time::Instant;

use axum::extract::{Query, Request, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use futures::future::try_join_all;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::require_auth;
use crate::bridge::{MetricOption, QueryRequest};
use crate::catalog::list_report_kinds;
use crate::error::ApiError;
use crate::export::{csv_content_type, table_to_csv};
use crate::ingest::issue_records;
use crate::report::{
    aggregate, organization_agent_crosstab, BreakdownMode, IssueRecord, ReportOutput,
    TimeRangeField,
};
use crate::translator::{parse_range_value, translate, PlannedReport, TimeWindow};
use crate::AppState;

/// Window exported by `/download` when no start is given.
const DEFAULT_EXPORT_DAYS: i64 = 30;

pub fn router(state: AppState) -> Router {
    let auth = state.auth.clone();
    Router::new()
        .route("/", get(health))
        .route("/test-jira", get(test_jira))
        .route("/search", get(search).post(search))
        .route("/query", post(query))
        .route("/download", get(download))
        .layer(middleware::from_fn_with_state(auth, require_auth))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// One log line per request: method, path, status, latency.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    info!(
        "{} {} {} {}ms",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

async fn health() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("{}: OK", Utc::now().to_rfc2822()),
    )
}

async fn test_jira(State(state): State<AppState>) -> Response {
    match state.client.myself().await {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => {
            warn!("Tracker connectivity check failed: {}", err);
            let body = err
                .raw_payload()
                .unwrap_or_else(|| json!({ "error": err.to_string() }));
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    }
}

async fn search(State(state): State<AppState>) -> Json<Vec<MetricOption>> {
    let filters = match state.client.favourite_filters().await {
        Ok(filters) => filters,
        Err(err) => {
            warn!("Favourite filters unavailable, listing fixed reports only: {}", err);
            Vec::new()
        }
    };
    Json(list_report_kinds(&filters))
}

async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<Vec<ReportOutput>>, ApiError> {
    let normalized = translate(&request.range, &request.targets)?;
    let outputs = try_join_all(
        normalized
            .reports
            .iter()
            .map(|planned| run_report(&state, planned)),
    )
    .await?;
    Ok(Json(outputs))
}

async fn run_report(state: &AppState, planned: &PlannedReport) -> Result<ReportOutput, ApiError> {
    let issues = fetch_records(state, &planned.jql).await?;
    debug!(
        "Report {} reduced {} issues",
        planned.descriptor.kind.identifier(),
        issues.len()
    );
    Ok(aggregate(&issues, &planned.descriptor))
}

async fn fetch_records(state: &AppState, jql: &str) -> Result<Vec<IssueRecord>, ApiError> {
    let settings = &state.settings;
    let issues = state
        .client
        .search(jql, settings.max_results, &settings.search_fields())
        .await?;
    Ok(issue_records(&issues, &settings.organization_field))
}

#[derive(Debug, Default, Deserialize)]
struct DownloadParams {
    from: Option<String>,
    to: Option<String>,
    mode: Option<String>,
}

async fn download(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let to = match params.to {
        Some(value) => parse_range_value(&Value::String(value))?,
        None => Utc::now(),
    };
    let from = match params.from {
        Some(value) => parse_range_value(&Value::String(value))?,
        None => to - Duration::days(DEFAULT_EXPORT_DAYS),
    };
    let window = TimeWindow::new(from, to)?;
    let mode = params
        .mode
        .as_deref()
        .and_then(BreakdownMode::parse)
        .unwrap_or_default();

    let issues = fetch_records(&state, &window.clause(TimeRangeField::Created)).await?;
    let table = organization_agent_crosstab(&issues, mode);
    let body = table_to_csv(&table)?;

    let disposition = format!(
        "attachment; filename=\"jsd-report-{}-{}.csv\"",
        window.from.format("%Y%m%d"),
        window.to.format("%Y%m%d")
    );
    Ok((
        [(CONTENT_TYPE, csv_content_type()), (CONTENT_DISPOSITION, disposition)],
        body,
    )
        .into_response())
}
