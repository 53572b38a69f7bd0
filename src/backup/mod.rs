/// Backup orchestration: the fetch/filter/save loop and its background worker
pub mod processor;
pub mod progress;
pub mod request;
pub mod worker;

pub use processor::BackupProcessor;
pub use progress::{ConsoleReporter, ProgressReporter};
pub use request::BackupRequest;
pub use worker::{BackupWorker, WorkerEvent};
