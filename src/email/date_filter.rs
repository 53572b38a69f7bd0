//! Keep/skip decision against the cutoff date.

use chrono::{DateTime, FixedOffset, Utc};

/// Outcome of comparing a message date with the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Dated on or after the cutoff.
    Keep,
    /// No usable date; saved anyway rather than silently dropped.
    KeepUndated,
    /// Dated before the cutoff.
    Skip,
}

impl Verdict {
    pub fn is_kept(self) -> bool {
        !matches!(self, Verdict::Skip)
    }
}

/// Decides whether a message belongs in the backup.
///
/// Both sides are compared as UTC instants and the cutoff itself is included.
pub fn decide(date: Option<&DateTime<FixedOffset>>, cutoff: &DateTime<Utc>) -> Verdict {
    match date {
        None => Verdict::KeepUndated,
        Some(date) if date.with_timezone(&Utc) >= *cutoff => Verdict::Keep,
        Some(_) => Verdict::Skip,
    }
}
