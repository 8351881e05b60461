// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /request, GET /request/{id}, GET /request and GET /health.

use std::str::FromStr;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use blankfill_core::{NewRequest, Page, PageRequest, RequestRecord, RequestStatus, SearchFilter};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `OK` while the process serves requests.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// RFC 3339 time the server started.
    pub deployed: String,
}

/// Query parameters of GET /request.
///
/// Kept as strings so malformed values map to `422` with a useful message.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub status: Option<String>,
    pub client: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_date(name: &str, value: Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    non_empty(value)
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").map_err(|_| {
                ApiError::Unprocessable(format!("{name} must be a date in YYYY-MM-DD form, got `{v}`"))
            })
        })
        .transpose()
}

impl SearchParams {
    /// Validate the parameters into a filter and a page selection.
    pub fn into_query(
        self,
        default_size: u32,
        max_size: u32,
    ) -> Result<(SearchFilter, PageRequest), ApiError> {
        let status = non_empty(self.status)
            .map(|s| {
                RequestStatus::from_str(s.trim())
                    .map_err(|_| ApiError::Unprocessable(format!("unknown status `{s}`")))
            })
            .transpose()?;

        let filter = SearchFilter {
            status,
            client: non_empty(self.client),
            date_from: parse_date("date_from", self.date_from)?,
            date_to: parse_date("date_to", self.date_to)?,
        };

        let page = PageRequest::new(
            self.page.unwrap_or(1),
            self.size.unwrap_or(default_size),
            max_size,
        )?;
        Ok((filter, page))
    }
}

/// POST /request
///
/// Validates the sentence, runs it through the lifecycle and returns the
/// request as last persisted with `202 Accepted`.
pub async fn create_request(
    State(state): State<GatewayState>,
    body: Result<Json<NewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RequestRecord>), ApiError> {
    let Json(body) = body.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    info!(client = %body.client, "create request");
    let record = state.controller.submit(body).await?;
    Ok((StatusCode::ACCEPTED, Json(record)))
}

/// GET /request/{id}
pub async fn get_request(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<RequestRecord>, ApiError> {
    info!(request_id = %id, "get request");
    Ok(Json(state.controller.retrieve(&id).await?))
}

/// GET /request
pub async fn search_requests(
    State(state): State<GatewayState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Page<RequestRecord>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    let (filter, page) = params.into_query(state.default_page_size, state.max_page_size)?;
    info!(?filter, page = page.page, size = page.size, "search requests");
    Ok(Json(state.controller.search(&filter, page).await?))
}

/// GET /health
///
/// Unauthenticated liveness probe.
pub async fn health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    trace!("health check");
    Json(HealthResponse {
        status: "OK".to_string(),
        version: state.version.to_string(),
        deployed: state.deployed.to_string(),
    })
}
