//! Raw list parameters and the date-range filter shared by list endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Untrusted list parameters exactly as they arrive in a query string.
///
/// Everything is kept as a string so that malformed values surface as
/// validation errors from the query builder rather than as extractor
/// rejections with framework-specific wording.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
    /// Free-text search term.
    pub search: Option<String>,
    /// Role filter (user listings).
    pub role: Option<String>,
    /// Status filter (announcement listings).
    pub status: Option<String>,
    /// Creation time lower bound.
    pub start_date: Option<String>,
    /// Creation time upper bound.
    pub end_date: Option<String>,
    /// Sort key.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
}

/// Inclusive creation-time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Lower bound (inclusive).
    pub from: Option<DateTime<Utc>>,
    /// Upper bound (inclusive).
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parse `startDate` / `endDate` query values.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            from: parse_timestamp("startDate", start)?,
            to: parse_timestamp("endDate", end)?,
        })
    }

    /// Whether neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether `ts` falls inside the window.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| ts >= from) && self.to.is_none_or(|to| ts <= to)
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(name: &str, value: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| {
            AppError::validation(format!(
                "Query parameter '{name}' must be a date (YYYY-MM-DD) or RFC 3339 timestamp"
            ))
        })
}

/// Trim a free-text search term, dropping it when empty.
pub fn normalize_search(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_only() {
        let ts = parse_timestamp("startDate", Some("2024-01-05")).unwrap().unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("endDate", Some("2024-01-05T10:00:00+02:00"))
            .unwrap()
            .unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_timestamp("startDate", Some("yesterday")).unwrap_err();
        assert!(err.message.contains("startDate"));
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 1).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()));
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search(Some("  alice ")), Some("alice".to_string()));
        assert_eq!(normalize_search(Some("   ")), None);
        assert_eq!(normalize_search(None), None);
    }
}
