//! File names for saved messages.

use chrono::{DateTime, FixedOffset};

use super::folder::FolderKind;

/// Maximum number of characters kept from a subject.
pub const MAX_SUBJECT_LEN: usize = 50;

/// Date tag used when the message has no usable date.
pub const NO_DATE: &str = "nodate";

/// Subject used when the message has none.
pub const NO_SUBJECT: &str = "No_subject";

const ALLOWED_PUNCTUATION: &[char] = &[' ', '-', '_', '.'];
const REPLACEMENT: char = '_';

/// How saved files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileNaming {
    /// `<seq>_<date>_<subject>.eml`
    Sequential,
    /// `<FOLDERTAG>_<seq>_<date>_<subject>.eml`
    FolderTagged(FolderKind),
}

/// Replaces every character that is not alphanumeric or allowed punctuation
/// and truncates the result to [`MAX_SUBJECT_LEN`] characters.
pub fn sanitize_subject(subject: &str) -> String {
    subject
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || ALLOWED_PUNCTUATION.contains(&c) {
                c
            } else {
                REPLACEMENT
            }
        })
        .take(MAX_SUBJECT_LEN)
        .collect()
}

/// `YYYYMMDD` in the message's own offset, or [`NO_DATE`].
pub fn date_tag(date: Option<&DateTime<FixedOffset>>) -> String {
    date.map(|d| d.format("%Y%m%d").to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Builds the file name for the `sequence`-th saved message.
pub fn build_filename(
    naming: FileNaming,
    sequence: usize,
    date: Option<&DateTime<FixedOffset>>,
    subject: Option<&str>,
) -> String {
    let subject = match subject.map(str::trim) {
        Some(s) if !s.is_empty() => sanitize_subject(s),
        _ => NO_SUBJECT.to_string(),
    };
    let date = date_tag(date);

    match naming {
        FileNaming::Sequential => format!("{:04}_{}_{}.eml", sequence, date, subject),
        FileNaming::FolderTagged(folder) => {
            format!("{}_{:04}_{}_{}.eml", folder.tag(), sequence, date, subject)
        }
    }
}
