use std::path::PathBuf;

use chrono::NaiveDate;
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::io::{self, file, ExportArtifact, ExportContext, ExportError, ExportFormat};
use crate::model::calendar::{format_date, today_utc};
use crate::model::{DragController, HexColor, Milestone, MilestoneSymbol, NewMilestone, NewTask, Plan, Task, PALETTE};
use crate::ui;
use crate::ui::task_editor::EditorAction;
use crate::ui::task_table::TaskTableAction;

/// The record shown in the editor and highlighted on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Task(Uuid),
    Milestone(Uuid),
}

#[derive(Debug, Clone)]
pub struct SectionForm {
    pub name: String,
    pub color: HexColor,
}

#[derive(Debug, Clone)]
pub struct MarkerForm {
    pub label: String,
    pub date: NaiveDate,
    pub color: HexColor,
}

/// Editor draft of the selected record.
///
/// The draft keeps the raw text while the user types (the plan trims names
/// on write-back) and is reloaded whenever the record changes elsewhere,
/// e.g. by a drag on the chart.
#[derive(Debug, Clone)]
pub struct EditBuffer<T> {
    pub draft: T,
    synced: T,
}

impl<T: Clone + PartialEq> EditBuffer<T> {
    pub fn new(current: &T) -> Self {
        Self {
            draft: current.clone(),
            synced: current.clone(),
        }
    }

    pub fn refresh(&mut self, current: &T) {
        if self.synced != *current {
            *self = Self::new(current);
        }
    }

    /// Record what the plan holds after the draft was written back.
    pub fn mark_synced(&mut self, current: &T) {
        self.synced = current.clone();
    }
}

/// Main application state.
pub struct PlannerApp {
    pub plan: Plan,
    pub config: AppConfig,
    config_path: PathBuf,
    pub drag: DragController,
    pub selection: Option<Selection>,
    task_buffer: Option<EditBuffer<Task>>,
    milestone_buffer: Option<EditBuffer<Milestone>>,

    // Dialog state
    pub show_add_task: bool,
    pub show_add_milestone: bool,
    pub show_add_section: bool,
    pub show_calendar: bool,
    pub show_plan_details: bool,
    pub show_about: bool,
    pub task_form: NewTask,
    pub milestone_form: NewMilestone,
    pub section_form: SectionForm,
    pub marker_form: MarkerForm,
    pub off_day_form: NaiveDate,

    pub export_format: ExportFormat,

    // Status message
    pub status_message: String,
}

impl PlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, config_path: PathBuf) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        Self::with_plan(Plan::sample(), config, config_path)
    }

    /// State without a window, for a given plan.
    pub fn with_plan(mut plan: Plan, config: AppConfig, config_path: PathBuf) -> Self {
        let today = today_utc();
        let (start, end) = Plan::default_new_task_days(today);
        plan.padding_days = config.padding_days;
        Self {
            plan,
            config,
            config_path,
            drag: DragController::new(),
            selection: None,
            task_buffer: None,
            milestone_buffer: None,
            show_add_task: false,
            show_add_milestone: false,
            show_add_section: false,
            show_calendar: false,
            show_plan_details: false,
            show_about: false,
            task_form: NewTask {
                name: String::new(),
                start,
                end,
                description: String::new(),
                section_id: None,
            },
            milestone_form: NewMilestone {
                name: String::new(),
                date: today,
                section_id: None,
                symbol: MilestoneSymbol::Diamond,
            },
            section_form: SectionForm {
                name: String::new(),
                color: PALETTE[0],
            },
            marker_form: MarkerForm {
                label: String::new(),
                date: today,
                color: PALETTE[4],
            },
            off_day_form: today,
            export_format: ExportFormat::default(),
            status_message: "Ready".to_string(),
        }
    }

    fn any_dialog_open(&self) -> bool {
        self.show_add_task
            || self.show_add_milestone
            || self.show_add_section
            || self.show_calendar
            || self.show_plan_details
            || self.show_about
    }

    // --- Dialogs ---

    pub fn open_add_task(&mut self) {
        let (start, end) = Plan::default_new_task_days(today_utc());
        self.task_form = NewTask {
            name: String::new(),
            start,
            end,
            description: String::new(),
            section_id: self.selected_section(),
        };
        self.show_add_task = true;
    }

    pub fn open_add_milestone(&mut self) {
        self.milestone_form = NewMilestone {
            name: String::new(),
            date: today_utc(),
            section_id: self.selected_section(),
            symbol: MilestoneSymbol::Diamond,
        };
        self.show_add_milestone = true;
    }

    pub fn open_add_section(&mut self) {
        self.section_form = SectionForm {
            name: String::new(),
            color: self.plan.suggested_section_color(),
        };
        self.show_add_section = true;
    }

    /// Section of the selected record, so new items land next to it.
    fn selected_section(&self) -> Option<Uuid> {
        match self.selection? {
            Selection::Task(id) => self.plan.task(id)?.section_id,
            Selection::Milestone(id) => self.plan.milestone(id)?.section_id,
        }
    }

    pub fn create_task_from_dialog(&mut self) {
        let id = self.plan.add_task(self.task_form.clone());
        self.selection = Some(Selection::Task(id));
        if let Some(task) = self.plan.task(id) {
            self.status_message = format!("Added task '{}'", task.name);
        }
    }

    pub fn create_milestone_from_dialog(&mut self) {
        let id = self.plan.add_milestone(self.milestone_form.clone());
        self.selection = Some(Selection::Milestone(id));
        if let Some(milestone) = self.plan.milestone(id) {
            self.status_message = format!("Added milestone '{}'", milestone.name);
        }
    }

    pub fn create_section_from_dialog(&mut self) {
        let form = self.section_form.clone();
        self.status_message = match self.plan.add_section(&form.name, form.color) {
            Some(_) => format!("Added section '{}'", form.name.trim()),
            None => "A section needs a name".to_string(),
        };
    }

    pub fn add_off_day_from_dialog(&mut self) {
        let day = self.off_day_form;
        self.status_message = if self.plan.add_off_day(day) {
            format!("{} is now an off day", format_date(day))
        } else {
            format!("{} is already an off day", format_date(day))
        };
    }

    pub fn add_marker_from_dialog(&mut self) {
        let form = self.marker_form.clone();
        match self.plan.add_marker(&form.label, &format_date(form.date), form.color) {
            Some(_) => {
                self.status_message = format!("Added marker '{}'", form.label.trim());
                self.marker_form.label.clear();
            }
            None => self.status_message = "A marker needs a label".to_string(),
        }
    }

    // --- Plan operations ---

    pub fn delete(&mut self, target: Selection) {
        let removed = match target {
            Selection::Task(id) => self.plan.delete_task(id),
            Selection::Milestone(id) => self.plan.delete_milestone(id),
        };
        if self.selection == Some(target) {
            self.selection = None;
        }
        if removed {
            self.status_message = match target {
                Selection::Task(_) => "Task deleted".to_string(),
                Selection::Milestone(_) => "Milestone deleted".to_string(),
            };
        }
    }

    pub fn apply_table_action(&mut self, action: TaskTableAction) {
        match action {
            TaskTableAction::None => {}
            TaskTableAction::Select(selection) => self.selection = Some(selection),
            TaskTableAction::Delete(target) => self.delete(target),
            TaskTableAction::DeleteSection(id) => {
                if self.plan.delete_section(id) {
                    self.status_message = "Section deleted; its items are unassigned".to_string();
                }
            }
            TaskTableAction::AddTask => self.open_add_task(),
            TaskTableAction::AddMilestone => self.open_add_milestone(),
            TaskTableAction::AddSection => self.open_add_section(),
        }
    }

    /// Route an editor action for task `id`; `draft` is the edited copy.
    pub fn apply_task_edit(&mut self, id: Uuid, action: EditorAction, draft: Task) {
        let changed = match action {
            EditorAction::None => false,
            EditorAction::Changed => {
                let written = self.plan.update_task(id, |task| *task = draft);
                if let (Some(buffer), Some(task)) = (self.task_buffer.as_mut(), self.plan.task(id)) {
                    buffer.mark_synced(task);
                }
                written
            }
            EditorAction::AssignSection(section_id) => self.plan.assign_task_section(id, section_id),
            EditorAction::SetProgress(percent) => self.plan.set_manual_progress(id, percent),
            EditorAction::AddSubtask(name) => self.plan.add_subtask(id, &name),
            EditorAction::ToggleSubtask(index) => self.plan.toggle_subtask(id, index),
            EditorAction::RemoveSubtask(index) => self.plan.remove_subtask(id, index),
            EditorAction::Delete => {
                self.delete(Selection::Task(id));
                return;
            }
        };
        if changed {
            self.status_message = "Task updated".to_string();
        }
    }

    pub fn apply_milestone_edit(&mut self, id: Uuid, action: EditorAction, draft: Milestone) {
        let changed = match action {
            EditorAction::Changed => {
                let written = self.plan.update_milestone(id, |milestone| *milestone = draft);
                if let (Some(buffer), Some(milestone)) = (self.milestone_buffer.as_mut(), self.plan.milestone(id)) {
                    buffer.mark_synced(milestone);
                }
                written
            }
            EditorAction::AssignSection(section_id) => self.plan.assign_milestone_section(id, section_id),
            EditorAction::Delete => {
                self.delete(Selection::Milestone(id));
                return;
            }
            // progress belongs to tasks
            EditorAction::None
            | EditorAction::SetProgress(_)
            | EditorAction::AddSubtask(_)
            | EditorAction::ToggleSubtask(_)
            | EditorAction::RemoveSubtask(_) => false,
        };
        if changed {
            self.status_message = "Milestone updated".to_string();
        }
    }

    // --- Export ---

    pub fn export(&mut self, format: ExportFormat) {
        self.export_format = format;
        let ctx = ExportContext::now(self.config.export_timeline_width);
        let artifact = match io::export(&self.plan, format, &ctx) {
            Ok(Some(artifact)) => artifact,
            Ok(None) => {
                self.status_message = "Nothing to export, the plan has no tasks".to_string();
                return;
            }
            Err(e) => {
                error!("{} export failed: {e}", format.label());
                self.status_message = format!("{} export failed: {e}", format.label());
                return;
            }
        };
        match format {
            ExportFormat::Pdf => self.open_print_view(&artifact),
            ExportFormat::Json | ExportFormat::Csv | ExportFormat::Tsv | ExportFormat::Svg | ExportFormat::Png => {
                self.save_artifact(format, &artifact)
            }
        }
    }

    fn save_artifact(&mut self, format: ExportFormat, artifact: &ExportArtifact) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter(format.label(), &[format.extension()])
            .set_file_name(&artifact.file_name)
            .save_file()
        else {
            return;
        };
        match file::write_artifact(artifact, &path) {
            Ok(()) => self.status_message = format!("Exported {} to {}", format.label(), path.display()),
            Err(e) => {
                error!("writing {} failed: {e}", path.display());
                self.status_message = format!("Export failed: {e}");
            }
        }
    }

    /// Print HTML goes to a temp file opened in the browser, whose print
    /// dialog saves the PDF.
    fn open_print_view(&mut self, artifact: &ExportArtifact) {
        let opened = file::write_artifact_in(artifact, &std::env::temp_dir()).and_then(|path| {
            open::that(&path)?;
            Ok::<_, ExportError>(path)
        });
        match opened {
            Ok(path) => {
                info!("opened print view {}", path.display());
                self.status_message = "Opened the print view; print it to PDF from the browser".to_string();
            }
            Err(e) => {
                error!("print view failed: {e}");
                self.status_message = format!("Could not open the print view: {e}");
            }
        }
    }

    fn persist_config(&self) {
        match self.config.save(&self.config_path) {
            Ok(()) => debug!("saved settings to {}", self.config_path.display()),
            Err(e) => warn!("could not save settings: {e}"),
        }
    }

    // --- Panels ---

    fn show_selection_editor(&mut self, ui: &mut egui::Ui, today: NaiveDate) {
        match self.selection {
            Some(Selection::Task(id)) => {
                let Some(current) = self.plan.task(id).cloned() else {
                    self.selection = None;
                    return;
                };
                if self.task_buffer.as_ref().map(|b| b.draft.id) != Some(id) {
                    self.task_buffer = Some(EditBuffer::new(&current));
                }
                let Some(buffer) = self.task_buffer.as_mut() else {
                    return;
                };
                buffer.refresh(&current);
                let action = ui::task_editor::show_task_editor(&mut buffer.draft, &self.plan.sections, today, ui);
                let draft = buffer.draft.clone();
                self.apply_task_edit(id, action, draft);
            }
            Some(Selection::Milestone(id)) => {
                let Some(current) = self.plan.milestone(id).cloned() else {
                    self.selection = None;
                    return;
                };
                if self.milestone_buffer.as_ref().map(|b| b.draft.id) != Some(id) {
                    self.milestone_buffer = Some(EditBuffer::new(&current));
                }
                let Some(buffer) = self.milestone_buffer.as_mut() else {
                    return;
                };
                buffer.refresh(&current);
                let action =
                    ui::task_editor::show_milestone_editor(&mut buffer.draft, &self.plan.sections, today, ui);
                let draft = buffer.draft.clone();
                self.apply_milestone_edit(id, action, draft);
            }
            None => return,
        }
        ui.add_space(4.0);
        ui.separator();
        ui.add_space(2.0);
    }

    fn show_status_bar(&self, ctx: &egui::Context, today: NaiveDate) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let dim = |text: String| egui::RichText::new(text).size(10.5).color(ui::theme::TEXT_DIM);
                        ui.label(dim(format!("Zoom: {:.0}%", self.config.zoom * 100.0)));
                        ui.label(dim(" · ".to_string()));
                        ui.label(dim(self.plan.timeline(today).label()));
                        ui.label(dim(" · ".to_string()));
                        ui.label(dim(format!(
                            "Tasks: {}  Milestones: {}",
                            self.plan.tasks.len(),
                            self.plan.milestones.len()
                        )));
                    });
                });
            });
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let config_before = self.config.clone();
        let today = today_utc();

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && !self.any_dialog_open() && !self.drag.is_dragging() {
            self.selection = None;
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        self.show_status_bar(ctx, today);

        // Left panel: editor + outline
        let mut table_action = TaskTableAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(260.0)
            .max_width(ui::theme::SIDE_PANEL_WIDTH * 2.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                if self.selection.is_some() {
                    egui::ScrollArea::vertical()
                        .id_salt("editor_scroll")
                        .max_height(ui.available_height() * 0.6)
                        .show(ui, |ui| self.show_selection_editor(ui, today));
                }
                table_action = ui::task_table::show_task_table(&self.plan, self.selection, ui);
            });
        self.apply_table_action(table_action);

        // Central panel: timeline
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let interaction = ui::gantt_chart::show_gantt_chart(
                &mut self.plan,
                &mut self.drag,
                &mut self.config,
                &mut self.selection,
                today,
                ui,
            );
            if interaction.changed {
                if let Some(task) = self.drag.active_task().and_then(|id| self.plan.task(id)) {
                    self.status_message = format!("Moving '{}' ({} → {})", task.name, task.start, task.end);
                }
            }
            if let Some(task) = interaction.committed.and_then(|id| self.plan.task(id)) {
                info!("rescheduled '{}' to {}..={}", task.name, task.start, task.end);
                self.status_message = format!("Updated '{}' ({} → {})", task.name, task.start, task.end);
            }
        });

        // Dialogs
        if self.show_add_task {
            ui::dialogs::show_add_task_dialog(self, ctx);
        }
        if self.show_add_milestone {
            ui::dialogs::show_add_milestone_dialog(self, ctx);
        }
        if self.show_add_section {
            ui::dialogs::show_add_section_dialog(self, ctx);
        }
        if self.show_calendar {
            ui::dialogs::show_calendar_dialog(self, ctx);
        }
        if self.show_plan_details {
            ui::dialogs::show_plan_details_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }

        self.config = std::mem::take(&mut self.config).clamped();
        if self.config != config_before {
            self.plan.padding_days = self.config.padding_days;
            self.persist_config();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::parse_date;
    use pretty_assertions::assert_eq;

    fn app() -> (PlannerApp, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = PlannerApp::with_plan(Plan::sample(), AppConfig::default(), dir.path().join("config.json"));
        (app, dir)
    }

    #[test]
    fn dialog_creates_and_selects_a_task() {
        let (mut app, _dir) = app();
        let before = app.plan.tasks.len();
        app.open_add_task();
        app.task_form.name = "  Write intro ".to_string();
        app.create_task_from_dialog();
        assert_eq!(app.plan.tasks.len(), before + 1);
        let Some(Selection::Task(id)) = app.selection else {
            panic!("new task is not selected");
        };
        assert_eq!(app.plan.task(id).unwrap().name, "Write intro");
    }

    #[test]
    fn deleting_the_selection_clears_it() {
        let (mut app, _dir) = app();
        let id = app.plan.tasks[0].id;
        app.apply_table_action(TaskTableAction::Select(Selection::Task(id)));
        app.apply_table_action(TaskTableAction::Delete(Selection::Task(id)));
        assert!(app.plan.task(id).is_none());
        assert_eq!(app.selection, None);
    }

    #[test]
    fn editor_changes_are_written_back_normalized() {
        let (mut app, _dir) = app();
        let id = app.plan.tasks[0].id;
        let mut draft = app.plan.tasks[0].clone();
        draft.name = "Renamed ".to_string();
        draft.start = "2026-03-10".to_string();
        draft.end = "2026-03-01".to_string();
        app.apply_task_edit(id, EditorAction::Changed, draft);
        let task = app.plan.task(id).unwrap();
        assert_eq!(task.name, "Renamed");
        assert_eq!((task.start.as_str(), task.end.as_str()), ("2026-03-01", "2026-03-10"));
        assert_eq!(app.status_message, "Task updated");
    }

    #[test]
    fn progress_actions_go_through_the_plan() {
        let (mut app, _dir) = app();
        let id = app.plan.tasks[0].id;
        let draft = app.plan.tasks[0].clone();
        app.apply_task_edit(id, EditorAction::AddSubtask("Outline".into()), draft.clone());
        app.apply_task_edit(id, EditorAction::AddSubtask("Draft".into()), draft.clone());
        app.apply_task_edit(id, EditorAction::ToggleSubtask(0), draft);
        assert_eq!(app.plan.task(id).unwrap().progress_fraction(), 0.5);
    }

    #[test]
    fn edit_buffer_keeps_raw_text_until_the_record_changes() {
        let original = Task::new("Survey", parse_date("2026-02-01").unwrap(), parse_date("2026-02-03").unwrap());
        let mut buffer = EditBuffer::new(&original);
        buffer.draft.name = "Survey ".to_string();
        buffer.mark_synced(&original);
        buffer.refresh(&original);
        assert_eq!(buffer.draft.name, "Survey ");

        let mut moved = original.clone();
        moved.start = "2026-02-02".to_string();
        buffer.refresh(&moved);
        assert_eq!(buffer.draft, moved);
    }

    #[test]
    fn empty_plan_export_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = PlannerApp::with_plan(Plan::new("Empty"), AppConfig::default(), dir.path().join("config.json"));
        app.export(ExportFormat::Csv);
        assert_eq!(app.status_message, "Nothing to export, the plan has no tasks");
        assert_eq!(app.export_format, ExportFormat::Csv);
    }

    #[test]
    fn duplicate_off_day_is_reported() {
        let (mut app, _dir) = app();
        let before = app.plan.off_days.len();
        app.off_day_form = parse_date("2026-02-11").unwrap();
        app.add_off_day_from_dialog();
        app.add_off_day_from_dialog();
        assert_eq!(app.status_message, "2026-02-11 is already an off day");
        assert_eq!(app.plan.off_days.len(), before + 1);
    }
}
