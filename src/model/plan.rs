use chrono::{Datelike, NaiveDate, Weekday};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::{add_days, format_date, parse_date};
use super::color::{next_palette_color, HexColor, PALETTE};
use super::drag::DragUpdate;
use super::geometry::GeometryMapper;
use super::marker::{Marker, MarkerPlacement};
use super::milestone::{Milestone, MilestoneSymbol};
use super::range::TimelineRange;
use super::section::{Section, SectionGroup, UNASSIGNED};
use super::task::{Progress, Subtask, Task};

/// Input for a new task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub description: String,
    /// `None` picks the first section.
    pub section_id: Option<Uuid>,
}

/// Input for a new milestone.
#[derive(Debug, Clone)]
pub struct NewMilestone {
    pub name: String,
    pub date: NaiveDate,
    pub section_id: Option<Uuid>,
    pub symbol: MilestoneSymbol,
}

/// The whole in-memory project plan. The owning controller is the only
/// writer; every mutation goes through a method here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub title: String,
    pub subtitle: String,
    pub tasks: Vec<Task>,
    pub sections: Vec<Section>,
    pub milestones: Vec<Milestone>,
    pub markers: Vec<Marker>,
    /// Specific days excluded from the schedule.
    pub off_days: Vec<NaiveDate>,
    /// Weekdays excluded every week.
    pub off_weekdays: Vec<Weekday>,
    pub padding_days: i64,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            title: "PlanIt".to_string(),
            subtitle: String::new(),
            tasks: Vec::new(),
            sections: Vec::new(),
            milestones: Vec::new(),
            markers: Vec::new(),
            off_days: Vec::new(),
            off_weekdays: vec![Weekday::Sat],
            padding_days: 3,
        }
    }
}

impl Plan {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// A small research-project plan used on first launch.
    pub fn sample() -> Self {
        let mut plan = Plan::new("PlanIt");
        plan.subtitle = "Thesis research plan".to_string();

        let research = plan.add_section("Research", PALETTE[0]).unwrap_or_default();
        let writing = plan.add_section("Writing", PALETTE[1]).unwrap_or_default();
        let review = plan.add_section("Review", PALETTE[4]).unwrap_or_default();

        let day = |text: &str| parse_date(text).unwrap_or(NaiveDate::MIN);
        let rows = [
            ("Discovery & Goals", "2026-02-05", "2026-02-08", research, "Align on scope, define research questions, and clarify deliverables."),
            ("Design System", "2026-02-07", "2026-02-13", writing, "Create visual language, templates, and key document layouts."),
            ("Core Build", "2026-02-10", "2026-02-21", writing, "Execute the primary work, experiments, and writing sprints."),
            ("Review & QA", "2026-02-18", "2026-02-24", review, "Edit, validate, and prep for final submission."),
        ];
        for (name, start, end, section, description) in rows {
            plan.add_task(NewTask {
                name: name.to_string(),
                start: day(start),
                end: day(end),
                description: description.to_string(),
                section_id: Some(section),
            });
        }
        let proposal = plan.add_milestone(NewMilestone {
            name: "Thesis Proposal Due".to_string(),
            date: day("2026-02-14"),
            section_id: Some(research),
            symbol: MilestoneSymbol::Diamond,
        });
        plan.update_milestone(proposal, |m| m.color = HexColor::rgb(0xf7, 0x88, 0x83));
        plan.off_days = vec![day("2026-02-09"), day("2026-02-16")];
        plan
    }

    // ── Derived views ────────────────────────────────────────────

    pub fn timeline(&self, today: NaiveDate) -> TimelineRange {
        TimelineRange::compute(&self.tasks, &self.milestones, self.padding_days, today)
    }

    pub fn section(&self, id: Uuid) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn milestone(&self, id: Uuid) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// Whether `section_id` names an existing section.
    fn is_assigned(&self, section_id: Option<Uuid>) -> bool {
        section_id.is_some_and(|id| self.section(id).is_some())
    }

    /// Sections in order with their items, plus an "Unassigned" group when
    /// any item has an empty or unknown section reference.
    pub fn sections_with_items(&self) -> Vec<SectionGroup<'_>> {
        let mut groups: Vec<SectionGroup<'_>> = self
            .sections
            .iter()
            .map(|section| SectionGroup {
                id: Some(section.id),
                name: section.name.clone(),
                color: Some(section.color),
                tasks: self
                    .tasks
                    .iter()
                    .filter(|t| t.section_id == Some(section.id))
                    .collect(),
                milestones: self
                    .milestones
                    .iter()
                    .filter(|m| m.section_id == Some(section.id))
                    .collect(),
            })
            .collect();

        let tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| !self.is_assigned(t.section_id))
            .collect();
        let milestones: Vec<&Milestone> = self
            .milestones
            .iter()
            .filter(|m| !self.is_assigned(m.section_id))
            .collect();
        if !tasks.is_empty() || !milestones.is_empty() {
            groups.push(SectionGroup {
                id: None,
                name: UNASSIGNED.to_string(),
                color: None,
                tasks,
                milestones,
            });
        }
        groups
    }

    /// Indices into `days` that are specific off days or fall on a recurring
    /// off weekday.
    pub fn off_day_indexes(&self, days: &[NaiveDate]) -> Vec<usize> {
        days.iter()
            .enumerate()
            .filter(|(_, day)| self.off_weekdays.contains(&day.weekday()) || self.off_days.contains(*day))
            .map(|(index, _)| index)
            .collect()
    }

    /// Markers inside the visible sequence. Markers outside it, or with an
    /// unparseable date, are left out rather than clamped.
    pub fn marker_placements(&self, mapper: &GeometryMapper) -> Vec<MarkerPlacement> {
        self.markers
            .iter()
            .filter_map(|marker| {
                let day_index = mapper.visible_index(marker.day()?)?;
                Some(MarkerPlacement {
                    id: marker.id,
                    label: marker.label.clone(),
                    color: marker.color,
                    day_index,
                })
            })
            .collect()
    }

    fn default_section(&self, requested: Option<Uuid>) -> Option<Uuid> {
        requested
            .filter(|id| self.section(*id).is_some())
            .or_else(|| self.sections.first().map(|s| s.id))
    }

    fn section_color(&self, section_id: Option<Uuid>) -> HexColor {
        section_id
            .and_then(|id| self.section(id))
            .map(|s| s.color)
            .unwrap_or(PALETTE[0])
    }

    // ── Tasks ────────────────────────────────────────────────────

    pub fn add_task(&mut self, input: NewTask) -> Uuid {
        let section_id = self.default_section(input.section_id);
        let mut task = Task::new(input.name, input.start, input.end);
        task.description = input.description.trim().to_string();
        task.section_id = section_id;
        task.color = self.section_color(section_id);
        let id = task.id;
        debug!("add task {id} '{}'", task.name);
        self.tasks.push(task);
        id
    }

    /// Edit a task in place; invariants are re-established afterwards.
    pub fn update_task(&mut self, id: Uuid, edit: impl FnOnce(&mut Task)) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                edit(task);
                task.normalize();
                true
            }
            None => false,
        }
    }

    /// Move a task to another section, taking on that section's color.
    pub fn assign_task_section(&mut self, id: Uuid, section_id: Option<Uuid>) -> bool {
        let color = self.section_color(section_id);
        self.update_task(id, |task| {
            task.section_id = section_id;
            task.color = color;
        })
    }

    pub fn delete_task(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        debug!("delete task {id}");
        self.tasks.len() != before
    }

    /// Write a drag step back into the task's dates.
    pub fn apply_drag(&mut self, update: DragUpdate) -> bool {
        let (start, end) = update.dates();
        let (start, end) = (format_date(start), format_date(end));
        match self.tasks.iter_mut().find(|t| t.id == update.task_id) {
            Some(task) if task.start != start || task.end != end => {
                task.start = start;
                task.end = end;
                true
            }
            _ => false,
        }
    }

    pub fn set_manual_progress(&mut self, id: Uuid, percent: u8) -> bool {
        self.update_task(id, |task| task.progress = Some(Progress::manual(percent)))
    }

    pub fn add_subtask(&mut self, id: Uuid, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.update_task(id, |task| {
            let subtask = Subtask {
                name: name.to_string(),
                done: false,
            };
            match &mut task.progress {
                Some(Progress::Subtasks { items }) => items.push(subtask),
                _ => {
                    task.progress = Some(Progress::Subtasks {
                        items: vec![subtask],
                    })
                }
            }
        })
    }

    pub fn toggle_subtask(&mut self, id: Uuid, index: usize) -> bool {
        let mut toggled = false;
        self.update_task(id, |task| {
            if let Some(Progress::Subtasks { items }) = &mut task.progress {
                if let Some(item) = items.get_mut(index) {
                    item.done = !item.done;
                    toggled = true;
                }
            }
        });
        toggled
    }

    pub fn remove_subtask(&mut self, id: Uuid, index: usize) -> bool {
        let mut removed = false;
        self.update_task(id, |task| {
            if let Some(Progress::Subtasks { items }) = &mut task.progress {
                if index < items.len() {
                    items.remove(index);
                    removed = true;
                }
            }
        });
        removed
    }

    // ── Sections ─────────────────────────────────────────────────

    /// Add a section; blank names are ignored.
    pub fn add_section(&mut self, name: &str, color: HexColor) -> Option<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let section = Section::new(name, color);
        let id = section.id;
        debug!("add section {id} '{name}'");
        self.sections.push(section);
        Some(id)
    }

    /// Color to suggest for the next section.
    pub fn suggested_section_color(&self) -> HexColor {
        self.sections
            .last()
            .map(|s| next_palette_color(s.color))
            .unwrap_or(PALETTE[0])
    }

    /// Remove a section; its items fall into the unassigned group.
    pub fn delete_section(&mut self, id: Uuid) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != id);
        for task in self.tasks.iter_mut().filter(|t| t.section_id == Some(id)) {
            task.section_id = None;
        }
        for milestone in self.milestones.iter_mut().filter(|m| m.section_id == Some(id)) {
            milestone.section_id = None;
        }
        self.sections.len() != before
    }

    // ── Milestones ───────────────────────────────────────────────

    pub fn add_milestone(&mut self, input: NewMilestone) -> Uuid {
        let section_id = self.default_section(input.section_id);
        let mut milestone = Milestone::new(input.name, input.date);
        milestone.section_id = section_id;
        milestone.color = self.section_color(section_id);
        milestone.symbol = input.symbol;
        let id = milestone.id;
        debug!("add milestone {id} '{}'", milestone.name);
        self.milestones.push(milestone);
        id
    }

    pub fn update_milestone(&mut self, id: Uuid, edit: impl FnOnce(&mut Milestone)) -> bool {
        match self.milestones.iter_mut().find(|m| m.id == id) {
            Some(milestone) => {
                edit(milestone);
                milestone.normalize();
                true
            }
            None => false,
        }
    }

    pub fn assign_milestone_section(&mut self, id: Uuid, section_id: Option<Uuid>) -> bool {
        let color = self.section_color(section_id);
        self.update_milestone(id, |milestone| {
            milestone.section_id = section_id;
            milestone.color = color;
        })
    }

    pub fn delete_milestone(&mut self, id: Uuid) -> bool {
        let before = self.milestones.len();
        self.milestones.retain(|m| m.id != id);
        self.milestones.len() != before
    }

    // ── Markers and off days ─────────────────────────────────────

    /// Add a marker; blank labels and unparseable dates are ignored.
    pub fn add_marker(&mut self, label: &str, date: &str, color: HexColor) -> Option<Uuid> {
        let label = label.trim();
        let day = parse_date(date)?;
        if label.is_empty() {
            return None;
        }
        let marker = Marker::new(label, day, color);
        let id = marker.id;
        debug!("add marker {id} '{label}' on {}", format_date(day));
        self.markers.push(marker);
        Some(id)
    }

    pub fn delete_marker(&mut self, id: Uuid) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != id);
        self.markers.len() != before
    }

    /// Returns `false` when the day was already off.
    pub fn add_off_day(&mut self, day: NaiveDate) -> bool {
        if self.off_days.contains(&day) {
            return false;
        }
        self.off_days.push(day);
        true
    }

    pub fn remove_off_day(&mut self, day: NaiveDate) -> bool {
        let before = self.off_days.len();
        self.off_days.retain(|d| *d != day);
        self.off_days.len() != before
    }

    pub fn toggle_off_weekday(&mut self, weekday: Weekday) {
        if let Some(pos) = self.off_weekdays.iter().position(|w| *w == weekday) {
            self.off_weekdays.remove(pos);
        } else {
            self.off_weekdays.push(weekday);
        }
    }

    /// Default dates for a new task: today through a week later.
    pub fn default_new_task_days(today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (today, add_days(today, 7))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    fn new_task(name: &str, start: &str, end: &str, section_id: Option<Uuid>) -> NewTask {
        NewTask {
            name: name.to_string(),
            start: d(start),
            end: d(end),
            description: String::new(),
            section_id,
        }
    }

    #[test]
    fn add_task_defaults_to_first_section_and_its_color() {
        let mut plan = Plan::new("p");
        let section = plan.add_section("Research", PALETTE[2]).unwrap();
        let id = plan.add_task(new_task("  ", "2026-02-08", "2026-02-05", None));
        let task = plan.task(id).unwrap();
        assert_eq!(task.name, "Untitled task");
        assert_eq!(task.section_id, Some(section));
        assert_eq!(task.color, PALETTE[2]);
        assert_eq!((task.start.as_str(), task.end.as_str()), ("2026-02-05", "2026-02-08"));
    }

    #[test]
    fn blank_section_names_are_ignored() {
        let mut plan = Plan::new("p");
        assert_eq!(plan.add_section("   ", PALETTE[0]), None);
        assert!(plan.sections.is_empty());
        plan.add_section("A", PALETTE[0]);
        assert_eq!(plan.suggested_section_color(), PALETTE[1]);
    }

    #[test]
    fn grouping_collects_orphans_under_unassigned() {
        let mut plan = Plan::new("p");
        let a = plan.add_section("A", PALETTE[0]).unwrap();
        plan.add_task(new_task("in a", "2026-02-01", "2026-02-02", Some(a)));
        let orphan = plan.add_task(new_task("orphan", "2026-02-01", "2026-02-02", Some(a)));
        plan.update_task(orphan, |t| t.section_id = Some(Uuid::new_v4()));

        let groups = plan.sections_with_items();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].tasks.len(), 1);
        assert!(groups[1].is_unassigned());
        assert_eq!(groups[1].name, "Unassigned");
        assert_eq!(groups[1].tasks[0].name, "orphan");
    }

    #[test]
    fn no_unassigned_group_when_everything_is_placed() {
        let plan = Plan::sample();
        let groups = plan.sections_with_items();
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| !g.is_unassigned()));
    }

    #[test]
    fn deleting_a_section_orphans_its_items() {
        let mut plan = Plan::sample();
        let research = plan.sections[0].id;
        assert!(plan.delete_section(research));
        let groups = plan.sections_with_items();
        let unassigned = groups.last().unwrap();
        assert!(unassigned.is_unassigned());
        assert_eq!(unassigned.tasks.len(), 1);
        assert_eq!(unassigned.milestones.len(), 1);
    }

    #[test]
    fn off_days_combine_dates_and_weekdays() {
        let mut plan = Plan::new("p");
        plan.off_weekdays = vec![Weekday::Sat];
        assert!(plan.add_off_day(d("2026-02-09")));
        assert!(!plan.add_off_day(d("2026-02-09")));
        // 2026-02-01 is a Sunday
        let days: Vec<NaiveDate> = (0..10).map(|i| add_days(d("2026-02-01"), i)).collect();
        assert_eq!(plan.off_day_indexes(&days), vec![6, 8]);
        plan.toggle_off_weekday(Weekday::Sat);
        assert_eq!(plan.off_day_indexes(&days), vec![8]);
    }

    #[test]
    fn markers_outside_the_window_are_dropped() {
        let mut plan = Plan::new("p");
        plan.add_marker("Kickoff", "2026-02-03", PALETTE[3]).unwrap();
        plan.add_marker("Later", "2026-05-01", PALETTE[3]).unwrap();
        assert_eq!(plan.add_marker("  ", "2026-02-03", PALETTE[3]), None);
        assert_eq!(plan.add_marker("Bad", "2026-02-31", PALETTE[3]), None);

        let mapper = GeometryMapper::new(d("2026-02-01"), 20);
        let placements = plan.marker_placements(&mapper);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].day_index, 2);
        assert_eq!(placements[0].label, "Kickoff");
    }

    #[test]
    fn apply_drag_writes_dates_only_when_changed() {
        let mut plan = Plan::new("p");
        let id = plan.add_task(new_task("t", "2026-02-05", "2026-02-08", None));
        let origin = GeometryMapper::new(d("2026-02-01"), 20);
        let same = DragUpdate {
            task_id: id,
            span: crate::model::geometry::IndexSpan { start: 4, end: 7 },
            origin,
        };
        assert!(!plan.apply_drag(same));
        let moved = DragUpdate {
            task_id: id,
            span: crate::model::geometry::IndexSpan { start: 6, end: 9 },
            origin,
        };
        assert!(plan.apply_drag(moved));
        let task = plan.task(id).unwrap();
        assert_eq!((task.start.as_str(), task.end.as_str()), ("2026-02-07", "2026-02-10"));
    }

    #[test]
    fn subtasks_drive_progress() {
        let mut plan = Plan::new("p");
        let id = plan.add_task(new_task("t", "2026-02-05", "2026-02-08", None));
        assert!(plan.add_subtask(id, "outline"));
        assert!(plan.add_subtask(id, "draft"));
        assert!(!plan.add_subtask(id, "   "));
        assert!(plan.toggle_subtask(id, 0));
        assert_eq!(plan.task(id).unwrap().progress_fraction(), 0.5);
        assert!(plan.remove_subtask(id, 1));
        assert_eq!(plan.task(id).unwrap().progress_fraction(), 1.0);
        assert!(!plan.toggle_subtask(id, 5));
    }
}
