use eframe::egui;
use log::{info, warn};
use secrecy::SecretString;

use super::theme::Theme;
use crate::backup::{BackupRequest, BackupWorker, WorkerEvent};
use crate::config::Config;
use crate::email::{parse_cutoff, BackupSummary, FileNaming, FolderKind};
use crate::imap_client::ImapConnector;

/// Cutoff shown in the form on startup.
pub const DEFAULT_SINCE: &str = "2000-01-01";

#[derive(Debug, Clone)]
struct FormState {
    email: String,
    password: String,
    since: String,
    folder: FolderKind,
    destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Idle,
    Running,
    Done(String),
    Error(String),
}

pub struct BackupApp {
    config: Config,
    theme: Theme,
    form: FormState,
    log: Vec<String>,
    status: Status,
    worker: Option<BackupWorker>,
}

impl BackupApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, theme: Theme) -> Self {
        theme.apply(&cc.egui_ctx);

        let destination = config.backup_dir.clone().unwrap_or_default();

        Self {
            config,
            theme,
            form: FormState {
                email: String::new(),
                password: String::new(),
                since: DEFAULT_SINCE.to_string(),
                folder: FolderKind::Inbox,
                destination,
            },
            log: Vec::new(),
            status: Status::Idle,
            worker: None,
        }
    }

    fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    fn start(&mut self, ctx: &egui::Context) {
        let since = match parse_cutoff(&self.form.since) {
            Ok(since) => since,
            Err(e) => {
                self.status = Status::Error(e.to_string());
                return;
            }
        };

        let request = match BackupRequest::new(
            &self.form.email,
            SecretString::from(self.form.password.clone()),
            &self.form.destination,
            since,
            self.form.folder,
        ) {
            Ok(request) => request.with_naming(FileNaming::FolderTagged(self.form.folder)),
            Err(e) => {
                self.status = Status::Error(e.to_string());
                return;
            }
        };

        info!("Starting backup of {} for {}", self.form.folder, self.form.email);
        self.log.clear();

        let repaint = ctx.clone();
        match BackupWorker::spawn(
            ImapConnector::new(self.config.imap.clone()),
            request,
            move || repaint.request_repaint(),
        ) {
            Ok(worker) => {
                self.worker = Some(worker);
                self.status = Status::Running;
            }
            Err(e) => {
                warn!("Unable to start worker: {}", e);
                self.status = Status::Error(format!("Unable to start worker: {}", e));
            }
        }
    }

    fn stop(&mut self) {
        if let Some(worker) = &self.worker {
            worker.cancel();
            self.log
                .push("Stopping...".to_string());
        }
    }

    /// Drains worker events into the log and status line.
    fn poll_worker(&mut self) {
        let Some(worker) = self.worker.as_mut() else {
            return;
        };

        let mut events = Vec::new();
        while let Some(event) = worker.try_next() {
            events.push(event);
        }

        let mut finished = false;
        for event in events {
            finished |= event.is_terminal();
            match event {
                WorkerEvent::Progress(line) => self.log.push(line),
                WorkerEvent::Finished(summary) => {
                    self.status = Status::Done(summary_line(&summary));
                }
                WorkerEvent::Failed(message) => {
                    self.log.push(format!("Error: {}", message));
                    self.status = Status::Error(message);
                }
            }
        }

        if finished {
            if let Some(worker) = self.worker.take() {
                worker.join();
            }
        }
    }

    fn form_ui(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("backup_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Email:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.form.email)
                        .hint_text("user@mail.ru")
                        .desired_width(320.0),
                );
                ui.end_row();

                ui.label("App password:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.form.password)
                        .password(true)
                        .desired_width(320.0),
                );
                ui.end_row();

                ui.label("Since (YYYY-MM-DD):");
                ui.add(egui::TextEdit::singleline(&mut self.form.since).desired_width(120.0));
                ui.end_row();

                ui.label("Folder:");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.form.folder, FolderKind::Inbox, "Inbox");
                    ui.radio_value(&mut self.form.folder, FolderKind::Sent, "Sent");
                });
                ui.end_row();

                ui.label("Save to:");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.form.destination)
                            .desired_width(240.0),
                    );
                    if ui.button("Browse…").clicked() {
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            self.form.destination = dir.display().to_string();
                        }
                    }
                });
                ui.end_row();
            });
    }

    fn status_ui(&self, ui: &mut egui::Ui) {
        let (text, color) = match &self.status {
            Status::Idle => ("Ready".to_string(), ui.visuals().text_color()),
            Status::Running if self.worker.as_ref().is_some_and(|w| w.is_cancelled()) => {
                ("Stopping...".to_string(), self.theme.accent)
            }
            Status::Running => ("Backup in progress...".to_string(), self.theme.accent),
            Status::Done(summary) => (summary.clone(), self.theme.success),
            Status::Error(message) => (format!("Error: {}", message), self.theme.error),
        };
        ui.label(egui::RichText::new(text).color(color));
    }
}

fn summary_line(summary: &BackupSummary) -> String {
    format!(
        "{}: {} found, {} saved, {} skipped{} in {}",
        if summary.cancelled { "Cancelled" } else { "Done" },
        summary.found,
        summary.saved,
        summary.skipped,
        if summary.failed > 0 {
            format!(", {} failed", summary.failed)
        } else {
            String::new()
        },
        summary.destination.display()
    )
}

impl eframe::App for BackupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.add_space(4.0);
            self.status_ui(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Mail backup");
            ui.add_space(8.0);

            let running = self.is_running();
            ui.add_enabled_ui(!running, |ui| self.form_ui(ui));
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.add_enabled(!running, egui::Button::new("Start")).clicked() {
                    self.start(ctx);
                }
                let can_stop = self.worker.as_ref().is_some_and(|w| !w.is_cancelled());
                if ui.add_enabled(can_stop, egui::Button::new("Stop")).clicked() {
                    self.stop();
                }
            });

            ui.separator();

            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for line in &self.log {
                        ui.label(
                            egui::RichText::new(line)
                                .monospace()
                                .color(self.theme.log_text),
                        );
                    }
                });
        });
    }
}
