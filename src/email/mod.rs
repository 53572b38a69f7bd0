pub mod common;
pub mod date_filter;
pub mod date_parser;
pub mod filename;
pub mod folder;

// Re-export commonly used items
pub use common::{BackupSummary, MessageRecord};
pub use date_filter::{decide, Verdict};
pub use date_parser::{parse_cutoff, parse_email_date};
pub use filename::{build_filename, sanitize_subject, FileNaming};
pub use folder::FolderKind;
