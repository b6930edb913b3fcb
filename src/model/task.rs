use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::{day_difference, format_date, parse_date};
use super::color::{HexColor, PALETTE};

/// Name given to tasks created or edited with an empty name.
pub const UNTITLED_TASK: &str = "Untitled task";

/// A single checklist item inside a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub name: String,
    pub done: bool,
}

/// How completion of a task is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Progress {
    /// Manually entered percentage, 0–100.
    Manual { percent: u8 },
    /// Derived from the share of completed subtasks.
    Subtasks { items: Vec<Subtask> },
}

impl Progress {
    pub fn manual(percent: u8) -> Self {
        Progress::Manual {
            percent: percent.min(100),
        }
    }

    /// Completion in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        match self {
            Progress::Manual { percent } => f32::from((*percent).min(100)) / 100.0,
            Progress::Subtasks { items } => {
                if items.is_empty() {
                    return 0.0;
                }
                let done = items.iter().filter(|s| s.done).count();
                done as f32 / items.len() as f32
            }
        }
    }
}

/// A dated bar on the timeline.
///
/// Dates are kept as the `YYYY-MM-DD` text the editor produced. A task whose
/// dates do not parse stays in the plan but is skipped by layout until fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub start: String,
    /// Inclusive.
    pub end: String,
    pub color: HexColor,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub section_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
}

impl Task {
    /// Create a task; the name is trimmed and the dates ordered.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self {
            id: Uuid::new_v4(),
            name: clean_name(name.into(), UNTITLED_TASK),
            start: format_date(start),
            end: format_date(end),
            color: PALETTE[0],
            description: String::new(),
            section_id: None,
            progress: None,
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_date(&self.start)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        parse_date(&self.end)
    }

    /// Both dates, earliest first. `None` when either fails to parse.
    pub fn day_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let (a, b) = (self.start_date()?, self.end_date()?);
        Some(if a <= b { (a, b) } else { (b, a) })
    }

    /// Inclusive length in days.
    pub fn duration_days(&self) -> Option<i64> {
        Some(day_difference(self.start_date()?, self.end_date()?) + 1)
    }

    pub fn progress_fraction(&self) -> f32 {
        self.progress.as_ref().map(Progress::fraction).unwrap_or(0.0)
    }

    /// Re-establish record invariants after an edit: trimmed, non-empty name
    /// and `start <= end` whenever both dates parse.
    pub fn normalize(&mut self) {
        self.name = clean_name(std::mem::take(&mut self.name), UNTITLED_TASK);
        if let (Some(start), Some(end)) = (self.start_date(), self.end_date()) {
            if start > end {
                std::mem::swap(&mut self.start, &mut self.end);
            }
        }
        if let Some(Progress::Manual { percent }) = &mut self.progress {
            *percent = (*percent).min(100);
        }
    }
}

/// Trim `name`, substituting `placeholder` when nothing is left.
pub(crate) fn clean_name(name: String, placeholder: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else if trimmed.len() == name.len() {
        name
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn new_task_orders_dates_and_defaults_name() {
        let task = Task::new("   ", d(2026, 2, 8), d(2026, 2, 5));
        assert_eq!(task.name, UNTITLED_TASK);
        assert_eq!(task.start, "2026-02-05");
        assert_eq!(task.end, "2026-02-08");
        assert_eq!(task.duration_days(), Some(4));
    }

    #[test]
    fn normalize_swaps_reversed_dates() {
        let mut task = Task::new("Build", d(2026, 2, 5), d(2026, 2, 8));
        task.start = "2026-03-01".into();
        task.normalize();
        assert_eq!(task.start, "2026-02-08");
        assert_eq!(task.end, "2026-03-01");
    }

    #[test]
    fn normalize_leaves_unparseable_dates_alone() {
        let mut task = Task::new("Build", d(2026, 2, 5), d(2026, 2, 8));
        task.end = "2026-13-40".into();
        task.normalize();
        assert_eq!(task.end, "2026-13-40");
        assert_eq!(task.day_span(), None);
        assert_eq!(task.duration_days(), None);
    }

    #[test]
    fn progress_fraction_from_subtasks() {
        let mut task = Task::new("Write", d(2026, 2, 5), d(2026, 2, 8));
        assert_eq!(task.progress_fraction(), 0.0);
        task.progress = Some(Progress::Subtasks {
            items: vec![
                Subtask { name: "outline".into(), done: true },
                Subtask { name: "draft".into(), done: false },
                Subtask { name: "edit".into(), done: true },
                Subtask { name: "submit".into(), done: false },
            ],
        });
        assert_eq!(task.progress_fraction(), 0.5);
        task.progress = Some(Progress::manual(250));
        assert_eq!(task.progress_fraction(), 1.0);
        task.progress = Some(Progress::Subtasks { items: vec![] });
        assert_eq!(task.progress_fraction(), 0.0);
    }
}
