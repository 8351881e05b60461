// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Blankfill service.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::BlankfillError;

/// Page size used when a search does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size a search may ask for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Inference,
}

/// Lifecycle status of a fill-in-the-blank request.
///
/// Statuses only move forward: `SUBMITTED -> RUNNING -> COMPLETED | FAILED`,
/// with `SUBMITTED -> FAILED` and `SUBMITTED -> COMPLETED` also allowed.
/// `COMPLETED` and `FAILED` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Submitted,
    Running,
    Completed,
    Failed,
}

impl RequestStatus {
    /// The string stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    /// Whether a request in this status can move to `next`.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, next),
            (Submitted, Running) | (Submitted, Completed) | (Submitted, Failed)
                | (Running, Completed)
                | (Running, Failed)
        )
    }

    /// Completed and failed requests never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A fill-in-the-blank request as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequest {
    /// Sentence containing the `<blank>` placeholder.
    pub sentence: String,
    /// Free-text tag identifying the submitter.
    pub client: String,
}

impl NewRequest {
    pub fn new(sentence: impl Into<String>, client: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
            client: client.into(),
        }
    }

    /// Check the sentence against the input rules.
    pub fn validate(&self) -> Result<(), BlankfillError> {
        crate::validation::validate_sentence(&self.sentence)
    }
}

/// A persisted request and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// 32-character lowercase hex identifier.
    pub id: String,
    pub sentence: String,
    pub client: String,
    /// Creation time, never changed afterwards.
    pub requested_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated: DateTime<Utc>,
    pub status: RequestStatus,
    /// Accepted completions. Empty until inference succeeds, and possibly after.
    pub results: Vec<String>,
}

impl RequestRecord {
    /// Build a fresh `SUBMITTED` record with a new identifier.
    ///
    /// Timestamps are truncated to millisecond precision, the resolution the
    /// store keeps.
    pub fn submitted(request: NewRequest) -> Self {
        let now = Utc::now().trunc_subsecs(3);
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            sentence: request.sentence,
            client: request.client,
            requested_at: now,
            updated: now,
            status: RequestStatus::Submitted,
            results: Vec::new(),
        }
    }
}

/// Search criteria. All fields are optional and combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Exact status match.
    pub status: Option<RequestStatus>,
    /// Exact client match. An empty string is treated as absent.
    pub client: Option<String>,
    /// Inclusive lower bound on the request date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the request date, covering the whole day.
    pub date_to: Option<NaiveDate>,
}

impl SearchFilter {
    /// The client filter, ignoring empty strings.
    pub fn client(&self) -> Option<&str> {
        self.client.as_deref().filter(|c| !c.is_empty())
    }
}

/// A 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a page selection, rejecting a zero page and sizes outside `1..=max_size`.
    pub fn new(page: u32, size: u32, max_size: u32) -> Result<Self, BlankfillError> {
        if page == 0 {
            return Err(BlankfillError::Validation(
                "page must be greater than or equal to 1".to_string(),
            ));
        }
        if size == 0 || size > max_size {
            return Err(BlankfillError::Validation(format!(
                "size must be between 1 and {max_size}"
            )));
        }
        Ok(Self { page, size })
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of matches across all pages.
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let size = u64::from(request.size.max(1));
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
            pages: total.div_ceil(size),
        }
    }
}
