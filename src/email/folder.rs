use std::fmt;

/// Logical mailbox folder to back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FolderKind {
    #[default]
    Inbox,
    Sent,
}

/// Names under which servers expose the sent folder, most common first.
/// The second entry is Mail.ru's localized "Отправленные" in modified UTF-7.
const SENT_CANDIDATES: &[&str] = &[
    "Sent",
    "&BB4EQgQ,BEAEMAQyBDsENQQ9BD0ESwQ1-",
    "Sent Items",
    "Sent Messages",
    "[Gmail]/Sent Mail",
    "INBOX.Sent",
];

impl FolderKind {
    /// Folder names to try with `SELECT`, in order.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            FolderKind::Inbox => &["INBOX"],
            FolderKind::Sent => SENT_CANDIDATES,
        }
    }

    /// Prefix used in folder-tagged file names.
    pub fn tag(self) -> &'static str {
        match self {
            FolderKind::Inbox => "INBOX",
            FolderKind::Sent => "SENT",
        }
    }
}

impl fmt::Display for FolderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderKind::Inbox => write!(f, "Inbox"),
            FolderKind::Sent => write!(f, "Sent"),
        }
    }
}
