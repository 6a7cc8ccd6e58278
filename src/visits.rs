//! Visit counting carried in client cookies
//!
//! The home page keeps two cookies on the client: `visits`, the number of
//! distinct day-sessions seen so far, and `last_visit`, the moment the counter
//! was last moved. Nothing is stored server-side. This module holds the pure
//! decision of whether a request starts a new day-session, plus the codec
//! for the cookie values.

use chrono::NaiveDateTime;

/// Cookie holding the visit counter
pub const VISITS_COOKIE: &str = "visits";
/// Cookie holding the last recorded visit
pub const LAST_VISIT_COOKIE: &str = "last_visit";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
/// Width of the fractional-seconds suffix (`.ffffff`) dropped before parsing
const SUFFIX_LEN: usize = 7;

/// Visit state as read from the request cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisitState {
    pub count: u64,
    pub last_visit: Option<NaiveDateTime>,
}

/// What the response should carry back to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitUpdate {
    pub count: u64,
    pub last_visit: NaiveDateTime,
    /// Whether the cookies need rewriting
    pub persist: bool,
}

impl VisitState {
    /// Build the state from raw cookie values. Unreadable values fall back to
    /// their defaults instead of failing the request.
    pub fn from_cookies(visits: Option<&str>, last_visit: Option<&str>) -> Self {
        let count = visits.map(parse_visits).unwrap_or(0);
        let last_visit = last_visit.and_then(parse_last_visit);
        Self { count, last_visit }
    }

    pub fn update(&self, now: NaiveDateTime) -> VisitUpdate {
        compute_visit_update(self.count, self.last_visit, now)
    }
}

/// Decide whether `now` begins a new day-session.
///
/// A missing `last_visit` sets the baseline without counting. Otherwise the
/// counter moves by one when at least one whole day (a truncated duration,
/// not a calendar-date difference) separates the two instants, however many
/// days that is.
pub fn compute_visit_update(
    current_count: u64,
    last_visit: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> VisitUpdate {
    match last_visit {
        None => VisitUpdate {
            count: current_count,
            last_visit: now,
            persist: true,
        },
        Some(last) if (now - last).num_days() > 0 => VisitUpdate {
            count: current_count.saturating_add(1),
            last_visit: now,
            persist: true,
        },
        Some(last) => VisitUpdate {
            count: current_count,
            last_visit: last,
            persist: false,
        },
    }
}

/// Parse the `visits` cookie; anything but a non-negative integer reads as 0.
pub fn parse_visits(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

/// Parse the `last_visit` cookie, dropping its fixed-width fractional suffix.
pub fn parse_last_visit(raw: &str) -> Option<NaiveDateTime> {
    let end = raw.len().checked_sub(SUFFIX_LEN)?;
    let head = raw.get(..end)?;
    NaiveDateTime::parse_from_str(head, TIMESTAMP_FORMAT).ok()
}

/// Encode a timestamp for the `last_visit` cookie.
///
/// Microseconds are always written so the suffix stays seven characters wide.
pub fn format_last_visit(at: NaiveDateTime) -> String {
    at.format(WRITE_FORMAT).to_string()
}
