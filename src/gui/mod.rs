//! Desktop front-end built on eframe.

pub mod app;
pub mod theme;

pub use app::BackupApp;
pub use theme::Theme;

use eframe::egui;

use crate::config::Config;

/// Opens the backup window and blocks until it is closed.
pub fn run(config: Config, theme: Theme) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 620.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mail backup",
        options,
        Box::new(move |cc| Ok(Box::new(BackupApp::new(cc, config, theme)))),
    )
}
