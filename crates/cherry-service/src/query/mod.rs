//! Turns untrusted list parameters into typed, whitelisted store queries.
//!
//! Every value is checked here so that a store only ever sees a known sort
//! column, a closed-enum filter, a literal search term, and a bounded page.
//! Anything malformed surfaces as a validation error.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use cherry_core::error::AppError;
use cherry_core::result::AppResult;
use cherry_core::types::query::normalize_search;
use cherry_core::types::{DateRange, ListParams, PageRequest, SortDirection, SortField};
use cherry_entity::announcement::{AnnouncementQuery, AnnouncementSortKey, PublishedQuery};
use cherry_entity::user::{UserQuery, UserRole};

/// Build the admin user listing query.
pub fn user_query(params: &ListParams) -> AppResult<UserQuery> {
    Ok(UserQuery {
        search: normalize_search(params.search.as_deref()),
        role: parse_filter::<UserRole>(params.role.as_deref())?,
        created: date_range(params)?,
        sort: sort_field(params)?,
        page: page_request(params)?,
    })
}

/// Build the admin announcement listing query.
pub fn announcement_query(params: &ListParams) -> AppResult<AnnouncementQuery> {
    Ok(AnnouncementQuery {
        search: normalize_search(params.search.as_deref()),
        status: parse_filter(params.status.as_deref())?,
        created: date_range(params)?,
        sort: sort_field::<AnnouncementSortKey>(params)?,
        page: page_request(params)?,
    })
}

/// Build the public listing query. Only paging is caller-controlled; the
/// filter and order are fixed.
pub fn published_query(params: &ListParams, now: DateTime<Utc>) -> AppResult<PublishedQuery> {
    Ok(PublishedQuery {
        now,
        page: page_request(params)?,
    })
}

fn page_request(params: &ListParams) -> AppResult<PageRequest> {
    PageRequest::parse(params.page.as_deref(), params.limit.as_deref())
}

fn date_range(params: &ListParams) -> AppResult<DateRange> {
    DateRange::parse(params.start_date.as_deref(), params.end_date.as_deref())
}

/// Parse an optional closed-enum filter; blank means "no filter".
fn parse_filter<T>(value: Option<&str>) -> AppResult<Option<T>>
where
    T: FromStr<Err = AppError>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
}

fn sort_field<K>(params: &ListParams) -> AppResult<SortField<K>>
where
    K: FromStr<Err = AppError> + Default,
{
    let key = parse_filter::<K>(params.sort_by.as_deref())?.unwrap_or_default();
    let direction =
        parse_filter::<SortDirection>(params.order.as_deref())?.unwrap_or(SortDirection::Desc);
    Ok(SortField::new(key, direction))
}
