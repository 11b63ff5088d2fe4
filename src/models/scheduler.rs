//! Due-date filtering. Comparisons are by calendar day: a card due at 23:59
//! today is due this morning, and a card due at 00:01 tomorrow is not.

use super::Flashcard;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

fn calendar_day<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

pub fn is_due_in<Tz: TimeZone>(card: &Flashcard, as_of: DateTime<Utc>, tz: &Tz) -> bool {
    calendar_day(card.next_review_date, tz) <= calendar_day(as_of, tz)
}

/// Splits `cards` into `(due, not_due)` using calendar days in `tz`.
/// Both halves keep the input order.
pub fn partition_due_in<Tz: TimeZone>(
    cards: Vec<Flashcard>,
    as_of: DateTime<Utc>,
    tz: &Tz,
) -> (Vec<Flashcard>, Vec<Flashcard>) {
    cards.into_iter().partition(|card| is_due_in(card, as_of, tz))
}

/// Same as [`partition_due_in`] in the local time zone.
pub fn partition_due(cards: Vec<Flashcard>, as_of: DateTime<Utc>) -> (Vec<Flashcard>, Vec<Flashcard>) {
    partition_due_in(cards, as_of, &Local)
}
