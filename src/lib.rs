// Library exports for the mailbackup crate
// Shared by the console binary, the desktop front-end and the tests

pub mod config;
pub mod error;
pub mod mailbox;
pub mod imap_client;
pub mod email;

// Fetch/filter/save loop and background worker
pub mod backup;

// Desktop front-end
#[cfg(feature = "gui")]
pub mod gui;
