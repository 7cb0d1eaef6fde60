use eframe::egui;
use chash_core::{metrics::elapsed_millis, report::HashReport};

pub enum ResultAction {
    None,
    ToggleCase(bool),
    Copy(String),
    ExportJson,
}

fn field_row(ui: &mut egui::Ui, label: &str, value: &str) -> bool {
    let mut copy = false;
    ui.horizontal(|ui| {
        ui.add_sized(
            [90.0, 0.0],
            egui::Label::new(
                egui::RichText::new(label).color(egui::Color32::from_rgb(150, 180, 220)),
            ),
        );
        let mut text = value;
        ui.add_sized(
            [560.0, 0.0],
            egui::TextEdit::singleline(&mut text).font(egui::TextStyle::Monospace),
        );
        copy = ui.button("Copy").clicked();
    });
    copy
}

fn info_row(ui: &mut egui::Ui, label: &str, value: String) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [90.0, 0.0],
            egui::Label::new(
                egui::RichText::new(label).color(egui::Color32::from_rgb(150, 180, 220)),
            ),
        );
        ui.monospace(value);
    });
}

/// Labeled output fields for the last finished hash.
pub fn results_panel(ui: &mut egui::Ui, report: &HashReport, uppercase: &mut bool) -> ResultAction {
    let mut action = ResultAction::None;

    info_row(ui, "File:", report.path.display().to_string());
    info_row(ui, "Size:", format!("{} bytes", report.size_bytes));
    info_row(ui, "Elapsed:", format!("{} ms", elapsed_millis(report.elapsed_seconds)));
    info_row(
        ui,
        "Throughput:",
        format!("{:.2} MiB/s", report.throughput_mib_per_sec),
    );

    ui.add_space(6.0);

    if field_row(ui, "HEX:", &report.sha256_hex) {
        action = ResultAction::Copy(report.sha256_hex.clone());
    }
    if field_row(ui, "Base64:", &report.sha256_base64) {
        action = ResultAction::Copy(report.sha256_base64.clone());
    }

    ui.horizontal(|ui| {
        if ui.checkbox(uppercase, "Uppercase HEX").changed() {
            action = ResultAction::ToggleCase(*uppercase);
        }
        ui.separator();
        if ui.button("Export JSON").clicked() {
            action = ResultAction::ExportJson;
        }
    });

    action
}
