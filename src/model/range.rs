use chrono::NaiveDate;

use super::calendar::{add_days, day_difference, format_date};
use super::milestone::Milestone;
use super::task::Task;

/// Days shown when the plan has nothing dated yet.
pub const DEFAULT_SPAN_DAYS: i64 = 14;

/// The visible stretch of calendar days, padding included.
///
/// `days` is the index space for all geometry: index `i` is
/// `start + i` days. It always holds at least one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub padding_days: i64,
    pub days: Vec<NaiveDate>,
}

impl TimelineRange {
    /// Derive the range from every dated task and milestone.
    ///
    /// Items whose dates do not parse are ignored. With nothing dated the
    /// base range is `today ..= today + 13`. The bounds are then widened by
    /// `padding_days` on both sides.
    pub fn compute(
        tasks: &[Task],
        milestones: &[Milestone],
        padding_days: i64,
        today: NaiveDate,
    ) -> Self {
        let task_bounds = tasks
            .iter()
            .filter_map(Task::day_span)
            .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, (s, e)| {
                Some(match acc {
                    Some((lo, hi)) => (lo.min(s), hi.max(e)),
                    None => (s, e),
                })
            });

        let (mut min, mut max) =
            task_bounds.unwrap_or((today, add_days(today, DEFAULT_SPAN_DAYS - 1)));

        for day in milestones.iter().filter_map(Milestone::day) {
            min = min.min(day);
            max = max.max(day);
        }

        let padded_start = add_days(min, -padding_days);
        let padded_end = add_days(max, padding_days);
        let total = (day_difference(padded_start, padded_end) + 1).max(1);
        let days: Vec<NaiveDate> = (0..total).map(|i| add_days(padded_start, i)).collect();
        let end = days.last().copied().unwrap_or(padded_start);

        Self {
            start: padded_start,
            end,
            padding_days,
            days,
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// `2026-02-01 → 2026-02-20`
    pub fn label(&self) -> String {
        format!("{} → {}", format_date(self.start), format_date(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::parse_date;

    fn d(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    fn task(start: &str, end: &str) -> Task {
        Task::new("t", d(start), d(end))
    }

    #[test]
    fn empty_plan_shows_two_weeks_from_today() {
        let range = TimelineRange::compute(&[], &[], 0, d("2026-10-19"));
        assert_eq!(range.len(), 14);
        assert_eq!(range.start, d("2026-10-19"));
        assert_eq!(range.end, d("2026-11-01"));
    }

    #[test]
    fn padding_widens_both_sides() {
        let tasks = vec![task("2026-02-05", "2026-02-08"), task("2026-02-10", "2026-02-21")];
        let range = TimelineRange::compute(&tasks, &[], 3, d("2030-01-01"));
        assert_eq!(range.start, d("2026-02-02"));
        assert_eq!(range.end, d("2026-02-24"));
        assert_eq!(range.len(), 23);
        assert_eq!(range.label(), "2026-02-02 → 2026-02-24");
    }

    #[test]
    fn milestones_extend_the_range() {
        let tasks = vec![task("2026-02-05", "2026-02-08")];
        let milestones = vec![Milestone::new("Due", d("2026-02-14"))];
        let range = TimelineRange::compute(&tasks, &milestones, 0, d("2030-01-01"));
        assert_eq!(range.start, d("2026-02-05"));
        assert_eq!(range.end, d("2026-02-14"));
    }

    #[test]
    fn undated_items_are_ignored() {
        let mut broken = task("2026-02-05", "2026-02-08");
        broken.start = "not a date".into();
        let tasks = vec![broken, task("2026-03-01", "2026-03-02")];
        let range = TimelineRange::compute(&tasks, &[], 0, d("2030-01-01"));
        assert_eq!(range.start, d("2026-03-01"));
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn negative_padding_still_yields_one_day() {
        let tasks = vec![task("2026-02-05", "2026-02-06")];
        let range = TimelineRange::compute(&tasks, &[], -10, d("2030-01-01"));
        assert_eq!(range.len(), 1);
        assert_eq!(range.start, range.end);
    }
}
