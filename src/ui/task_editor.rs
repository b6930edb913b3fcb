use chrono::NaiveDate;
use egui::{Color32, Id, RichText, Ui};
use uuid::Uuid;

use crate::model::calendar::{format_date, parse_date};
use crate::model::{HexColor, Milestone, MilestoneSymbol, Progress, Section, Task, PALETTE};
use crate::ui::theme;

/// Actions the editor can request. Plain field edits are made on the draft
/// and reported as `Changed`; the rest go through the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    None,
    Changed,
    AssignSection(Option<Uuid>),
    SetProgress(u8),
    AddSubtask(String),
    ToggleSubtask(usize),
    RemoveSubtask(usize),
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgressKind {
    None,
    Manual,
    Subtasks,
}

impl ProgressKind {
    fn of(progress: Option<&Progress>) -> Self {
        match progress {
            None => ProgressKind::None,
            Some(Progress::Manual { .. }) => ProgressKind::Manual,
            Some(Progress::Subtasks { .. }) => ProgressKind::Subtasks,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ProgressKind::None => "Not tracked",
            ProgressKind::Manual => "Percentage",
            ProgressKind::Subtasks => "Subtasks",
        }
    }
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

fn editor_frame() -> egui::Frame {
    egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(6.0),
        inner_margin: egui::Margin::same(10.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        shadow: egui::epaint::Shadow::NONE,
    }
}

fn editor_heading(ui: &mut Ui, title: &str) -> bool {
    let mut delete = false;
    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new(title).strong().size(13.0).color(theme::TEXT_PRIMARY));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let del = ui.add(
                egui::Button::new(RichText::new(egui_phosphor::regular::TRASH).size(11.0).color(theme::DANGER))
                    .frame(false),
            );
            delete = del.on_hover_text("Delete").clicked();
        });
    });
    ui.add_space(4.0);
    delete
}

fn section_combo(
    ui: &mut Ui,
    salt: &str,
    current: Option<Uuid>,
    sections: &[Section],
) -> Option<Option<Uuid>> {
    let mut picked = None;
    let current_label = current
        .and_then(|id| sections.iter().find(|s| s.id == id))
        .map(|s| s.name.as_str())
        .unwrap_or(crate::model::section::UNASSIGNED);
    egui::ComboBox::from_id_salt(salt)
        .selected_text(RichText::new(current_label).size(11.0))
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            if ui.selectable_label(current.is_none(), crate::model::section::UNASSIGNED).clicked() {
                picked = Some(None);
            }
            for section in sections {
                if ui.selectable_label(current == Some(section.id), section.name.as_str()).clicked() {
                    picked = Some(Some(section.id));
                }
            }
        });
    picked.filter(|choice| *choice != current)
}

/// Palette swatches; returns the clicked color.
fn color_swatches(ui: &mut Ui, current: HexColor) -> Option<HexColor> {
    let mut picked = None;
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(4.0, 4.0);
        for color in PALETTE {
            let is_current = current == color;
            let size = if is_current { 20.0 } else { 16.0 };
            let (rect, resp) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::click());
            ui.painter().rect_filled(rect, egui::Rounding::same(3.0), theme::color32(color));
            if is_current {
                ui.painter().rect_stroke(
                    rect.expand(1.0),
                    egui::Rounding::same(4.0),
                    egui::Stroke::new(2.0, Color32::WHITE),
                );
            }
            if resp.on_hover_text(color.to_string()).clicked() {
                picked = Some(color);
            }
        }
    });
    picked
}

/// Date picker over a `YYYY-MM-DD` string; unparseable text starts the
/// picker at `fallback`. Returns the picked date when it changed.
fn date_field(ui: &mut Ui, salt: &str, text: &str, fallback: NaiveDate) -> Option<NaiveDate> {
    let mut date = parse_date(text).unwrap_or(fallback);
    let resp = ui.add(egui_extras::DatePickerButton::new(&mut date).id_salt(salt));
    resp.changed().then_some(date)
}

/// Inline editor for the selected task. `task` is a draft the caller
/// writes back when `Changed` comes out.
pub fn show_task_editor(task: &mut Task, sections: &[Section], today: NaiveDate, ui: &mut Ui) -> EditorAction {
    let mut action = EditorAction::None;

    if editor_heading(ui, "Edit Task") {
        return EditorAction::Delete;
    }

    editor_frame().show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;
        ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

        field_label(ui, "Name");
        let name_edit = ui.add_sized(
            [ui.available_width(), 24.0],
            egui::TextEdit::singleline(&mut task.name)
                .font(egui::FontId::proportional(12.0))
                .text_color(theme::TEXT_PRIMARY),
        );
        if name_edit.changed() {
            action = EditorAction::Changed;
        }

        field_label(ui, "Section");
        if let Some(section_id) = section_combo(ui, "task_section_combo", task.section_id, sections) {
            action = EditorAction::AssignSection(section_id);
        }

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                field_label(ui, "Start");
                if let Some(start) = date_field(ui, "dp_start", &task.start, today) {
                    task.start = format_date(start);
                    if task.end_date().is_some_and(|end| end < start) {
                        task.end = task.start.clone();
                    }
                    action = EditorAction::Changed;
                }
            });
            ui.add_space(8.0);
            ui.vertical(|ui| {
                field_label(ui, "End");
                if let Some(end) = date_field(ui, "dp_end", &task.end, today) {
                    task.end = format_date(end);
                    if task.start_date().is_some_and(|start| start > end) {
                        task.start = task.end.clone();
                    }
                    action = EditorAction::Changed;
                }
            });
        });
        if let Some(days) = task.duration_days() {
            ui.label(
                RichText::new(format!("{days} day{}", if days == 1 { "" } else { "s" }))
                    .size(10.0)
                    .color(theme::TEXT_SECONDARY),
            );
        }

        field_label(ui, "Color");
        if let Some(color) = color_swatches(ui, task.color) {
            task.color = color;
            action = EditorAction::Changed;
        }

        field_label(ui, "Notes");
        let notes_resp = ui.add_sized(
            [ui.available_width(), 60.0],
            egui::TextEdit::multiline(&mut task.description)
                .font(egui::FontId::proportional(11.0))
                .text_color(theme::TEXT_SECONDARY)
                .hint_text("Add notes or description..."),
        );
        if notes_resp.changed() {
            action = EditorAction::Changed;
        }

        ui.separator();
        if let Some(progress_action) = progress_editor(task, ui) {
            action = progress_action;
        }
    });

    action
}

fn progress_editor(task: &mut Task, ui: &mut Ui) -> Option<EditorAction> {
    let mut action = None;
    let current = ProgressKind::of(task.progress.as_ref());

    field_label(ui, "Progress");
    let mut kind = current;
    egui::ComboBox::from_id_salt("progress_kind")
        .selected_text(RichText::new(kind.label()).size(11.0))
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for k in [ProgressKind::None, ProgressKind::Manual, ProgressKind::Subtasks] {
                ui.selectable_value(&mut kind, k, k.label());
            }
        });
    if kind != current {
        match kind {
            ProgressKind::None => {
                task.progress = None;
                action = Some(EditorAction::Changed);
            }
            ProgressKind::Manual => {
                let percent = (task.progress_fraction() * 100.0).round() as u8;
                action = Some(EditorAction::SetProgress(percent));
            }
            ProgressKind::Subtasks => {
                task.progress = Some(Progress::Subtasks { items: Vec::new() });
                action = Some(EditorAction::Changed);
            }
        }
        return action;
    }

    match &task.progress {
        Some(Progress::Manual { percent }) => {
            let mut value = *percent;
            let slider = egui::Slider::new(&mut value, 0..=100).suffix("%");
            if ui.add(slider).changed() {
                action = Some(EditorAction::SetProgress(value));
            }
        }
        Some(Progress::Subtasks { items }) => {
            ui.add(
                egui::ProgressBar::new(task.progress_fraction())
                    .desired_width(ui.available_width())
                    .fill(theme::color32(task.color))
                    .rounding(egui::Rounding::same(3.0))
                    .show_percentage(),
            );
            for (index, subtask) in items.iter().enumerate() {
                ui.horizontal(|ui| {
                    let mut done = subtask.done;
                    if ui.checkbox(&mut done, "").changed() {
                        action = Some(EditorAction::ToggleSubtask(index));
                    }
                    let text = RichText::new(&subtask.name).size(11.0);
                    let text = if subtask.done {
                        text.strikethrough().color(theme::TEXT_DIM)
                    } else {
                        text.color(theme::TEXT_PRIMARY)
                    };
                    ui.add(egui::Label::new(text).truncate());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let del = ui.add(
                            egui::Button::new(RichText::new(egui_phosphor::regular::X).size(9.0).color(theme::TEXT_DIM))
                                .frame(false),
                        );
                        if del.on_hover_text("Remove subtask").clicked() {
                            action = Some(EditorAction::RemoveSubtask(index));
                        }
                    });
                });
            }

            // Pending subtask name lives in egui memory between frames.
            let draft_id = Id::new(("subtask-draft", task.id));
            let mut draft: String = ui.ctx().data_mut(|d| d.get_temp(draft_id).unwrap_or_default());
            ui.horizontal(|ui| {
                let width = (ui.available_width() - 36.0).max(60.0);
                let edit = ui.add_sized(
                    [width, 22.0],
                    egui::TextEdit::singleline(&mut draft).hint_text("New subtask..."),
                );
                let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let add = ui.add_enabled(
                    !draft.trim().is_empty(),
                    egui::Button::new(RichText::new(egui_phosphor::regular::PLUS).color(Color32::WHITE))
                        .fill(theme::ACCENT),
                );
                if (submitted || add.clicked()) && !draft.trim().is_empty() {
                    action = Some(EditorAction::AddSubtask(std::mem::take(&mut draft)));
                }
            });
            ui.ctx().data_mut(|d| d.insert_temp(draft_id, draft));
        }
        None => {
            ui.label(RichText::new("Progress is not tracked").size(10.0).color(theme::TEXT_DIM));
        }
    }
    action
}

/// Inline editor for the selected milestone, on a draft like the task editor.
pub fn show_milestone_editor(
    milestone: &mut Milestone,
    sections: &[Section],
    today: NaiveDate,
    ui: &mut Ui,
) -> EditorAction {
    let mut action = EditorAction::None;

    if editor_heading(ui, "Edit Milestone") {
        return EditorAction::Delete;
    }

    editor_frame().show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;
        ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

        field_label(ui, "Name");
        let name_edit = ui.add_sized(
            [ui.available_width(), 24.0],
            egui::TextEdit::singleline(&mut milestone.name)
                .font(egui::FontId::proportional(12.0))
                .text_color(theme::TEXT_PRIMARY),
        );
        if name_edit.changed() {
            action = EditorAction::Changed;
        }

        field_label(ui, "Section");
        if let Some(section_id) = section_combo(ui, "milestone_section_combo", milestone.section_id, sections) {
            action = EditorAction::AssignSection(section_id);
        }

        field_label(ui, "Date");
        if let Some(date) = date_field(ui, "dp_milestone", &milestone.date, today) {
            milestone.date = format_date(date);
            action = EditorAction::Changed;
        }

        field_label(ui, "Symbol");
        egui::ComboBox::from_id_salt("milestone_symbol")
            .selected_text(RichText::new(milestone.symbol.label()).size(11.0))
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for symbol in MilestoneSymbol::ALL {
                    if ui.selectable_value(&mut milestone.symbol, symbol, symbol.label()).changed() {
                        action = EditorAction::Changed;
                    }
                }
            });

        field_label(ui, "Color");
        if let Some(color) = color_swatches(ui, milestone.color) {
            milestone.color = color;
            action = EditorAction::Changed;
        }
    });

    action
}
