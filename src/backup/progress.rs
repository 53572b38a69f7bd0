//! Where progress lines of a run end up.

/// Receives one human-readable line per step of a backup run.
pub trait ProgressReporter {
    fn report(&self, line: &str);
}

impl<F> ProgressReporter for F
where
    F: Fn(&str),
{
    fn report(&self, line: &str) {
        self(line)
    }
}

/// Prints progress lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn report(&self, line: &str) {
        println!("{}", line);
    }
}
