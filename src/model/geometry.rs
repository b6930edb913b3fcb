//! Date ⇄ position mapping.
//!
//! Placements are fractions of the full timeline width so every renderer
//! (interactive view, print HTML, SVG/PNG) multiplies the same numbers by
//! its own width. Nothing here looks at live widget sizes.

use chrono::NaiveDate;

use super::calendar::{add_days, clamp, day_difference};
use super::milestone::Milestone;
use super::range::TimelineRange;
use super::task::Task;

/// Horizontal placement as fractions of the timeline width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub width: f64,
}

impl Placement {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Inclusive day-index span with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpan {
    pub start: usize,
    pub end: usize,
}

impl IndexSpan {
    /// Build a span from two indices in either order.
    pub fn ordered(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// `end - start`
    pub fn length(&self) -> usize {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryMapper {
    range_start: NaiveDate,
    day_count: usize,
}

impl GeometryMapper {
    pub fn new(range_start: NaiveDate, day_count: usize) -> Self {
        Self {
            range_start,
            day_count,
        }
    }

    pub fn from_range(range: &TimelineRange) -> Self {
        Self::new(range.start, range.len())
    }

    pub fn range_start(&self) -> NaiveDate {
        self.range_start
    }

    pub fn day_count(&self) -> usize {
        self.day_count
    }

    /// Unclamped offset of `date` from the first visible day.
    pub fn day_offset(&self, date: NaiveDate) -> i64 {
        day_difference(self.range_start, date)
    }

    /// Index of `date` clamped into `[0, N-1]`; `None` for an empty sequence.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        let last = self.day_count.checked_sub(1)?;
        Some(clamp(self.day_offset(date), 0, last as i64) as usize)
    }

    /// Index of `date` only when it lies inside the sequence.
    pub fn visible_index(&self, date: NaiveDate) -> Option<usize> {
        let offset = self.day_offset(date);
        (offset >= 0 && (offset as u64) < self.day_count as u64).then_some(offset as usize)
    }

    /// The calendar day at `index`.
    pub fn date_at(&self, index: usize) -> NaiveDate {
        add_days(self.range_start, index as i64)
    }

    pub fn index_span(&self, start: NaiveDate, end: NaiveDate) -> Option<IndexSpan> {
        Some(IndexSpan::ordered(self.day_index(start)?, self.day_index(end)?))
    }

    /// Clamped span of a task, `None` if its dates do not parse.
    pub fn task_span(&self, task: &Task) -> Option<IndexSpan> {
        self.index_span(task.start_date()?, task.end_date()?)
    }

    /// `left = s/N`, `width = (e-s+1)/N`
    pub fn span_placement(&self, span: IndexSpan) -> Placement {
        let n = self.day_count.max(1) as f64;
        Placement {
            left: span.start as f64 / n,
            width: (span.end - span.start + 1) as f64 / n,
        }
    }

    pub fn bar_placement(&self, task: &Task) -> Option<Placement> {
        self.task_span(task).map(|span| self.span_placement(span))
    }

    /// One-day cell at `index`, used for off days and marker bands.
    pub fn day_cell(&self, index: usize) -> Placement {
        self.span_placement(IndexSpan {
            start: index,
            end: index,
        })
    }

    /// Centre of the day at `index`: `(index + 0.5)/N`.
    pub fn point_fraction(&self, index: usize) -> f64 {
        (index as f64 + 0.5) / self.day_count.max(1) as f64
    }

    pub fn milestone_index(&self, milestone: &Milestone) -> Option<usize> {
        self.day_index(milestone.day()?)
    }

    pub fn milestone_fraction(&self, milestone: &Milestone) -> Option<f64> {
        self.milestone_index(milestone).map(|i| self.point_fraction(i))
    }
}

/// Day-index placement snapped to segments of a coarser granularity, where
/// each of the `segment_count` columns has equal width.
pub fn snapped_span_placement(span: IndexSpan, day_to_segment: &[usize], segment_count: usize) -> Placement {
    let start_segment = day_to_segment.get(span.start).copied().unwrap_or(0);
    let end_segment = day_to_segment
        .get(span.end)
        .copied()
        .unwrap_or(start_segment)
        .max(start_segment);
    let n = segment_count.max(1) as f64;
    Placement {
        left: start_segment as f64 / n,
        width: (end_segment - start_segment + 1) as f64 / n,
    }
}

pub fn snapped_point_fraction(index: usize, day_to_segment: &[usize], segment_count: usize) -> f64 {
    let segment = day_to_segment.get(index).copied().unwrap_or(0);
    (segment as f64 + 0.5) / segment_count.max(1) as f64
}

/// Pixels per day, or `None` when there is nothing to divide.
pub fn day_width(timeline_width: f32, day_count: usize) -> Option<f32> {
    if timeline_width <= 0.0 || day_count == 0 {
        return None;
    }
    Some(timeline_width / day_count as f32)
}

/// Whole-day delta for a horizontal pointer movement. Halves round toward
/// positive infinity, so `-1.5` days is `-1`.
pub fn pixel_delta_to_days(pixel_delta: f32, day_width: f32) -> i64 {
    if day_width <= 0.0 {
        return 0;
    }
    (pixel_delta / day_width + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::parse_date;

    fn d(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    fn mapper() -> GeometryMapper {
        GeometryMapper::new(d("2026-02-01"), 20)
    }

    #[test]
    fn bar_in_twenty_day_window() {
        let task = Task::new("Discovery", d("2026-02-05"), d("2026-02-08"));
        let span = mapper().task_span(&task).unwrap();
        assert_eq!(span, IndexSpan { start: 4, end: 7 });
        let placement = mapper().bar_placement(&task).unwrap();
        assert_eq!(placement.left, 0.20);
        assert_eq!(placement.width, 0.20);
    }

    #[test]
    fn milestone_is_centered_on_its_day() {
        let milestone = Milestone::new("Proposal", d("2026-02-14"));
        assert_eq!(mapper().milestone_index(&milestone), Some(13));
        assert_eq!(mapper().milestone_fraction(&milestone), Some(0.675));
    }

    #[test]
    fn out_of_range_dates_clamp() {
        let m = mapper();
        assert_eq!(m.day_index(d("2025-12-01")), Some(0));
        assert_eq!(m.day_index(d("2026-06-01")), Some(19));
        assert_eq!(m.visible_index(d("2026-06-01")), None);
        assert_eq!(m.visible_index(d("2026-02-20")), Some(19));
    }

    #[test]
    fn reversed_task_dates_are_reordered() {
        let mut task = Task::new("x", d("2026-02-05"), d("2026-02-08"));
        std::mem::swap(&mut task.start, &mut task.end);
        assert_eq!(mapper().task_span(&task), Some(IndexSpan { start: 4, end: 7 }));
    }

    #[test]
    fn unparseable_task_has_no_placement() {
        let mut task = Task::new("x", d("2026-02-05"), d("2026-02-08"));
        task.end = String::new();
        assert_eq!(mapper().bar_placement(&task), None);
    }

    #[test]
    fn empty_sequence_short_circuits() {
        let empty = GeometryMapper::new(d("2026-02-01"), 0);
        assert_eq!(empty.day_index(d("2026-02-01")), None);
        assert_eq!(day_width(800.0, 0), None);
        assert_eq!(day_width(0.0, 20), None);
        assert_eq!(pixel_delta_to_days(120.0, 0.0), 0);
    }

    #[test]
    fn inverse_mapping_rounds() {
        let width = day_width(800.0, 20).unwrap();
        assert_eq!(width, 40.0);
        assert_eq!(pixel_delta_to_days(59.0, width), 1);
        assert_eq!(pixel_delta_to_days(61.0, width), 2);
        assert_eq!(pixel_delta_to_days(-81.0, width), -2);
    }

    #[test]
    fn half_days_round_up() {
        assert_eq!(pixel_delta_to_days(-60.0, 40.0), -1);
        assert_eq!(pixel_delta_to_days(-20.0, 40.0), 0);
        assert_eq!(pixel_delta_to_days(20.0, 40.0), 1);
        assert_eq!(pixel_delta_to_days(60.0, 40.0), 2);
    }

    #[test]
    fn snapping_to_week_columns() {
        let map: Vec<usize> = (0..20).map(|i| i / 7).collect();
        let placement = snapped_span_placement(IndexSpan { start: 4, end: 7 }, &map, 3);
        assert_eq!(placement.left, 0.0);
        assert_eq!(placement.width, 2.0 / 3.0);
        assert_eq!(snapped_point_fraction(13, &map, 3), 1.5 / 3.0);
    }
}
