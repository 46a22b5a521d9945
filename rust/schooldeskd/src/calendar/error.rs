//! Error types for the academic calendar core.

/// Validation failures raised while building calendar values.
///
/// The week and overlay functions never return these; they degrade to
/// "unavailable" or "not blocked" instead. Only constructors and the ISO
/// date parser are fallible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a date string is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date: {input:?} (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The rejected input, trimmed.
        input: String,
    },

    /// Returned when a day index is outside 0..=6.
    #[error("invalid day index: {index} (must be 0..=6)")]
    InvalidDayIndex {
        /// The rejected index.
        index: i64,
    },

    /// Returned when a break ends before it starts.
    #[error("break {name:?} ends ({end}) before it starts ({start})")]
    InvertedBreak {
        /// Break name.
        name: String,
        /// Start date as given.
        start: chrono::NaiveDate,
        /// End date as given.
        end: chrono::NaiveDate,
    },
}
