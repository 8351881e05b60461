// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filtered, paginated request search.
//!
//! Query construction ([`SearchQuery::build`]) is kept apart from execution
//! ([`paginate`]) so the filter translation can be tested without a database.

use blankfill_core::{BlankfillError, Page, PageRequest, RequestRecord, SearchFilter};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::params_from_iter;

use crate::database::{Database, map_tr_err};
use crate::queries::requests::{COLUMNS, format_timestamp, row_to_record};

/// A WHERE clause and its positional text parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    clauses: Vec<&'static str>,
    params: Vec<String>,
}

/// Midnight UTC at the start of `date`, in stored timestamp form.
fn start_of_day(date: NaiveDate) -> String {
    format_timestamp(&date.and_time(NaiveTime::MIN).and_utc())
}

impl SearchQuery {
    /// Translate a filter into SQL conditions.
    ///
    /// `date_from` is an inclusive lower bound at the start of the day;
    /// `date_to` includes the whole day by bounding at the next midnight.
    pub fn build(filter: &SearchFilter) -> Self {
        let mut query = Self::default();
        if let Some(status) = filter.status {
            query.push("status = ?", status.as_str().to_string());
        }
        if let Some(client) = filter.client() {
            query.push("client = ?", client.to_string());
        }
        if let Some(from) = filter.date_from {
            query.push("requested_at >= ?", start_of_day(from));
        }
        if let Some(to) = filter.date_to {
            // The last representable date has no following day to bound by.
            if let Some(next) = to.succ_opt() {
                query.push("requested_at <= ?", start_of_day(next));
            }
        }
        query
    }

    fn push(&mut self, clause: &'static str, param: String) {
        self.clauses.push(clause);
        self.params.push(param);
    }

    /// The WHERE clause, or an empty string when nothing is filtered.
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Count of all matching rows.
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM requests{}", self.where_sql())
    }

    /// One page of matching rows, oldest first.
    pub fn page_sql(&self, page: PageRequest) -> String {
        format!(
            "SELECT {COLUMNS} FROM requests{} ORDER BY requested_at ASC, id ASC LIMIT {} OFFSET {}",
            self.where_sql(),
            page.size,
            page.offset()
        )
    }
}

/// Run a search, reading the count and the page in one transaction.
pub async fn paginate(
    db: &Database,
    filter: &SearchFilter,
    page: PageRequest,
) -> Result<Page<RequestRecord>, BlankfillError> {
    let query = SearchQuery::build(filter);
    let (total, items) = db
        .transact(move |tx| {
            let total: i64 = tx.query_row(
                &query.count_sql(),
                params_from_iter(query.params()),
                |row| row.get(0),
            )?;
            let mut stmt = tx.prepare(&query.page_sql(page))?;
            let rows = stmt.query_map(params_from_iter(query.params()), row_to_record)?;
            let items = rows.collect::<Result<Vec<_>, _>>()?;
            Ok((total, items))
        })
        .await
        .map_err(map_tr_err)?;

    Ok(Page::new(items, u64::try_from(total).unwrap_or(0), page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blankfill_core::{NewRequest, RequestStatus};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use crate::queries::requests;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("search.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    /// Insert a request with a fixed creation time and status.
    async fn seed(
        db: &Database,
        client: &str,
        status: RequestStatus,
        requested_at: chrono::DateTime<Utc>,
    ) -> RequestRecord {
        let mut record = RequestRecord::submitted(NewRequest::new("a <blank>", client));
        record.requested_at = requested_at;
        record.updated = requested_at;
        record.status = status;
        requests::insert(db, &record).await.unwrap()
    }

    fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let query = SearchQuery::build(&SearchFilter::default());
        assert_eq!(query.where_sql(), "");
        assert!(query.params().is_empty());
        assert_eq!(
            query.page_sql(PageRequest::default()),
            format!(
                "SELECT {COLUMNS} FROM requests ORDER BY requested_at ASC, id ASC LIMIT 50 OFFSET 0"
            )
        );
    }

    #[test]
    fn filter_fields_become_anded_conditions() {
        let filter = SearchFilter {
            status: Some(RequestStatus::Submitted),
            client: Some("acme".to_string()),
            date_from: Some(date(1)),
            date_to: Some(date(2)),
        };
        let query = SearchQuery::build(&filter);
        assert_eq!(
            query.where_sql(),
            " WHERE status = ? AND client = ? AND requested_at >= ? AND requested_at <= ?"
        );
        assert_eq!(
            query.params(),
            &[
                "SUBMITTED".to_string(),
                "acme".to_string(),
                "2026-03-01T00:00:00.000Z".to_string(),
                "2026-03-03T00:00:00.000Z".to_string(),
            ]
        );
    }

    #[test]
    fn empty_client_is_not_a_condition() {
        let filter = SearchFilter {
            client: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(SearchQuery::build(&filter).where_sql(), "");
    }

    #[tokio::test]
    async fn status_and_client_filter_in_creation_order() {
        let (db, _dir) = setup_db().await;
        let second = seed(&db, "acme", RequestStatus::Submitted, at(2, 10)).await;
        seed(&db, "acme", RequestStatus::Completed, at(1, 9)).await;
        seed(&db, "other", RequestStatus::Submitted, at(1, 8)).await;
        let first = seed(&db, "acme", RequestStatus::Submitted, at(1, 7)).await;

        let filter = SearchFilter {
            status: Some(RequestStatus::Submitted),
            client: Some("acme".to_string()),
            ..Default::default()
        };
        let page = paginate(&db, &filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 2);
        let ids: Vec<&str> = page.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn date_range_is_inclusive_on_both_ends() {
        let (db, _dir) = setup_db().await;
        seed(&db, "c", RequestStatus::Submitted, at(1, 23)).await;
        let start = seed(&db, "c", RequestStatus::Submitted, at(2, 0)).await;
        let end = seed(&db, "c", RequestStatus::Submitted, at(3, 23)).await;
        seed(&db, "c", RequestStatus::Submitted, at(4, 1)).await;

        let filter = SearchFilter {
            date_from: Some(date(2)),
            date_to: Some(date(3)),
            ..Default::default()
        };
        let page = paginate(&db, &filter, PageRequest::default()).await.unwrap();
        let ids: Vec<String> = page.items.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![start.id, end.id]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn pages_split_results_and_report_totals() {
        let (db, _dir) = setup_db().await;
        for hour in 0..5 {
            seed(&db, "c", RequestStatus::Submitted, at(1, hour)).await;
        }

        let filter = SearchFilter::default();
        let first = paginate(&db, &filter, PageRequest::new(1, 2, 100).unwrap())
            .await
            .unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total, 5);
        assert_eq!(first.pages, 3);

        let last = paginate(&db, &filter, PageRequest::new(3, 2, 100).unwrap())
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].requested_at, at(1, 4));

        let past_end = paginate(&db, &filter, PageRequest::new(4, 2, 100).unwrap())
            .await
            .unwrap();
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 5);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_database_returns_empty_page() {
        let (db, _dir) = setup_db().await;
        let page = paginate(&db, &SearchFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
        db.close().await.unwrap();
    }
}
