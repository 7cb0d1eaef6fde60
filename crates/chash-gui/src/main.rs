#![windows_subsystem = "windows"]

mod ui;

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc,
    },
    thread,
    time::Duration,
};

use chash_core::{
    engine::{compute_digest, HashRequest, HashedFile},
    export::export_json,
    report::HashReport,
};
use eframe::egui;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::ui::results::{results_panel, ResultAction};

#[derive(Clone, Copy, PartialEq)]
enum UiTheme {
    Dark,
    Light,
}

#[derive(Debug)]
enum WorkerMsg {
    Progress(u64, u64, u64),
    Done(u64, PathBuf, HashedFile),
    Cancelled(u64),
    Error(u64, String),
}

struct HashApp {
    path_text: String,
    uppercase: bool,

    progress_done: u64,
    progress_total: u64,
    busy: bool,
    status: String,
    error: Option<String>,

    report: Option<HashReport>,
    cancel: Option<Arc<AtomicBool>>,

    theme: UiTheme,
    job_id: u64,
    active_job: u64,

    tx: mpsc::Sender<WorkerMsg>,
    rx: mpsc::Receiver<WorkerMsg>,
}

impl Default for HashApp {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();

        Self {
            path_text: String::new(),
            uppercase: false,

            progress_done: 0,
            progress_total: 0,
            busy: false,
            status: "Ready. Browse or drop a file, then click Hash.".into(),
            error: None,

            report: None,
            cancel: None,

            theme: UiTheme::Dark,
            job_id: 0,
            active_job: 0,

            tx,
            rx,
        }
    }
}

fn apply_fonts(cc: &eframe::CreationContext<'_>) {
    let mut style = (*cc.egui_ctx.style()).clone();

    style
        .text_styles
        .insert(egui::TextStyle::Heading, egui::FontId::proportional(22.0));
    style
        .text_styles
        .insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
    style
        .text_styles
        .insert(egui::TextStyle::Monospace, egui::FontId::monospace(13.0));

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    cc.egui_ctx.set_style(style);
}

fn apply_theme(ctx: &egui::Context, theme: UiTheme) {
    match theme {
        UiTheme::Dark => ctx.set_visuals(egui::Visuals::dark()),
        UiTheme::Light => ctx.set_visuals(egui::Visuals::light()),
    }
}

impl HashApp {
    fn next_job(&mut self) -> u64 {
        self.job_id = self.job_id.wrapping_add(1);
        self.active_job = self.job_id;
        self.active_job
    }

    fn finish_job(&mut self) {
        self.busy = false;
        self.cancel = None;
    }

    fn pump_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                WorkerMsg::Progress(job, done, total) => {
                    if job != self.active_job {
                        continue;
                    }
                    self.progress_done = done;
                    self.progress_total = total;
                }
                WorkerMsg::Done(job, path, hashed) => {
                    if job != self.active_job {
                        continue;
                    }
                    let report = HashReport::new(path, &hashed, self.uppercase);
                    self.status = format!(
                        "Done. {} bytes in {:.3} s",
                        report.size_bytes, report.elapsed_seconds
                    );
                    self.report = Some(report);
                    self.finish_job();
                }
                WorkerMsg::Cancelled(job) => {
                    if job != self.active_job {
                        continue;
                    }
                    self.status = "Cancelled.".into();
                    self.finish_job();
                }
                WorkerMsg::Error(job, e) => {
                    if job != self.active_job {
                        continue;
                    }
                    warn!(job, error = %e, "hash failed");
                    self.status = "Hashing failed.".into();
                    self.error = Some(e);
                    self.finish_job();
                }
            }
        }
    }

    fn set_path(&mut self, p: PathBuf) {
        self.path_text = p.display().to_string();
    }

    fn start_hash(&mut self) {
        if self.busy {
            return;
        }

        let path = PathBuf::from(self.path_text.trim());
        if !path.is_file() {
            self.error = Some(format!("File not found: {}", path.display()));
            return;
        }

        self.busy = true;
        self.status = "Hashing...".into();
        self.progress_done = 0;
        self.progress_total = 0;

        let job = self.next_job();
        info!(job, path = %path.display(), "hash started");
        let cancel = Arc::new(AtomicBool::new(false));
        self.cancel = Some(cancel.clone());

        let tx = self.tx.clone();
        let progress_tx = tx.clone();
        let cb = Arc::new(move |done: u64, total: u64| {
            let _ = progress_tx.send(WorkerMsg::Progress(job, done, total));
        });

        thread::spawn(move || {
            let req = HashRequest::new(&path).with_cancel(cancel).with_progress(cb);

            let msg = match compute_digest(&req) {
                Ok(hashed) => WorkerMsg::Done(job, path, hashed),
                Err(e) if e.is_cancelled() => WorkerMsg::Cancelled(job),
                Err(e) => WorkerMsg::Error(job, e.to_string()),
            };
            let _ = tx.send(msg);
        });
    }

    fn cancel_hash(&mut self) {
        if let Some(flag) = &self.cancel {
            flag.store(true, Ordering::Relaxed);
            self.status = "Cancelling...".into();
        }
    }

    fn export_report_json(&mut self) {
        if let Some(r) = self.report.as_ref() {
            if let Some(path) = rfd::FileDialog::new()
                .set_title("Export JSON")
                .set_file_name("chash_report.json")
                .save_file()
            {
                if let Err(e) = export_json(r, &path) {
                    self.error = Some(format!("Export JSON failed: {:#}", e));
                } else {
                    self.status = format!("Exported JSON: {}", path.display());
                }
            }
        }
    }

    fn take_dropped_file(&mut self, ctx: &egui::Context) {
        if self.busy {
            return;
        }
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(p) = dropped {
            self.set_path(p);
            self.start_hash();
        }
    }

    fn error_modal(&mut self, ctx: &egui::Context) {
        let Some(msg) = self.error.clone() else {
            return;
        };
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(msg);
                if ui.button("OK").clicked() {
                    self.error = None;
                }
            });
    }
}

impl eframe::App for HashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        apply_theme(ctx, self.theme);
        self.pump_messages();
        self.take_dropped_file(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("chash");
                ui.label("streamed SHA-256");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::ComboBox::from_id_source("theme_picker")
                        .selected_text(match self.theme {
                            UiTheme::Dark => "Dark",
                            UiTheme::Light => "Light",
                        })
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.theme, UiTheme::Dark, "Dark");
                            ui.selectable_value(&mut self.theme, UiTheme::Light, "Light");
                        });
                });
            });

            ui.horizontal_wrapped(|ui| {
                ui.label("File:");
                ui.add_sized(
                    [480.0, 0.0],
                    egui::TextEdit::singleline(&mut self.path_text),
                );
                if ui
                    .add_enabled(!self.busy, egui::Button::new("Browse…"))
                    .clicked()
                {
                    if let Some(p) = rfd::FileDialog::new().pick_file() {
                        self.set_path(p);
                    }
                }

                ui.separator();

                if ui
                    .add_enabled(!self.busy, egui::Button::new("Hash"))
                    .clicked()
                {
                    self.start_hash();
                }
                if ui
                    .add_enabled(self.busy, egui::Button::new("Cancel"))
                    .clicked()
                {
                    self.cancel_hash();
                }
            });

            ui.horizontal(|ui| {
                let total = self.progress_total.max(1);
                let frac = (self.progress_done as f32 / total as f32).min(1.0);
                ui.add_sized(
                    [220.0, 18.0],
                    egui::ProgressBar::new(frac).show_percentage(),
                );
                ui.separator();
                ui.label(&self.status);
            });
        });

        let action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let Some(report) = &self.report else {
                    ui.label("No result yet. Drop a file on this window or pick one with Browse.");
                    return ResultAction::None;
                };
                results_panel(ui, report, &mut self.uppercase)
            })
            .inner;

        match action {
            ResultAction::None => {}
            ResultAction::ToggleCase(upper) => {
                if let Some(r) = self.report.as_mut() {
                    r.set_uppercase(upper);
                }
            }
            ResultAction::Copy(text) => {
                ctx.output_mut(|o| o.copied_text = text);
                self.status = "Copied to clipboard.".into();
            }
            ResultAction::ExportJson => self.export_report_json(),
        }

        self.error_modal(ctx);

        if self.busy {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_env("CHASH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("chash")
            .with_inner_size([820.0, 380.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "chash",
        opts,
        Box::new(|cc| {
            apply_fonts(cc);
            Box::<HashApp>::default()
        }),
    )
}
