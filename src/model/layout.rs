//! Width-independent layout of a plan on the timeline.
//!
//! Every horizontal value here is a fraction of the timeline width. The
//! interactive chart and the exporters multiply the same fractions by their
//! own width, so they cannot drift apart.

use chrono::NaiveDate;
use uuid::Uuid;

use super::color::HexColor;
use super::geometry::{snapped_point_fraction, snapped_span_placement, GeometryMapper, IndexSpan, Placement};
use super::marker::MarkerPlacement;
use super::milestone::Milestone;
use super::plan::Plan;
use super::range::TimelineRange;
use super::segments::{day_to_segment, timeline_segments, HeaderTracks, Segment, ViewMode};
use super::task::Task;

/// One row of the chart, in display order.
#[derive(Debug, Clone)]
pub enum LayoutRow<'a> {
    Section {
        id: Option<Uuid>,
        name: String,
        color: Option<HexColor>,
    },
    /// `placement` is `None` when the task's dates do not parse.
    Task {
        task: &'a Task,
        placement: Option<Placement>,
    },
    /// `center` is `None` when the date does not parse.
    Milestone {
        milestone: &'a Milestone,
        center: Option<f64>,
    },
}

impl LayoutRow<'_> {
    pub fn is_section(&self) -> bool {
        matches!(self, LayoutRow::Section { .. })
    }
}

#[derive(Debug, Clone)]
pub struct TimelineLayout<'a> {
    pub range: TimelineRange,
    pub mapper: GeometryMapper,
    pub view_mode: ViewMode,
    pub headers: HeaderTracks,
    /// Columns for `view_mode`; one per day in day view.
    pub segments: Vec<Segment>,
    pub day_to_segment: Vec<usize>,
    pub rows: Vec<LayoutRow<'a>>,
    pub off_days: Vec<usize>,
    pub markers: Vec<MarkerPlacement>,
}

impl<'a> TimelineLayout<'a> {
    pub fn build(plan: &'a Plan, today: NaiveDate, view_mode: ViewMode) -> Self {
        let range = plan.timeline(today);
        let mapper = GeometryMapper::from_range(&range);
        let segments = timeline_segments(&range.days, view_mode);
        let day_to_segment = day_to_segment(&segments, range.len());
        let headers = HeaderTracks::build(&range.days);
        let off_days = plan.off_day_indexes(&range.days);
        let markers = plan.marker_placements(&mapper);

        let mut layout = Self {
            range,
            mapper,
            view_mode,
            headers,
            segments,
            day_to_segment,
            rows: Vec::new(),
            off_days,
            markers,
        };

        let mut rows = Vec::new();
        for group in plan.sections_with_items() {
            rows.push(LayoutRow::Section {
                id: group.id,
                name: group.name.clone(),
                color: group.color,
            });
            for task in group.tasks {
                rows.push(LayoutRow::Task {
                    task,
                    placement: layout.task_placement(task),
                });
            }
            for milestone in group.milestones {
                rows.push(LayoutRow::Milestone {
                    milestone,
                    center: layout.milestone_center(milestone),
                });
            }
        }
        layout.rows = rows;
        layout
    }

    pub fn day_count(&self) -> usize {
        self.range.len()
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.range.days
    }

    /// Day view maps indices directly; week and month views snap to columns.
    pub fn span_placement(&self, span: IndexSpan) -> Placement {
        match self.view_mode {
            ViewMode::Day => self.mapper.span_placement(span),
            ViewMode::Week | ViewMode::Month => {
                snapped_span_placement(span, &self.day_to_segment, self.segments.len())
            }
        }
    }

    pub fn point_fraction(&self, index: usize) -> f64 {
        match self.view_mode {
            ViewMode::Day => self.mapper.point_fraction(index),
            ViewMode::Week | ViewMode::Month => {
                snapped_point_fraction(index, &self.day_to_segment, self.segments.len())
            }
        }
    }

    pub fn task_placement(&self, task: &Task) -> Option<Placement> {
        self.mapper.task_span(task).map(|span| self.span_placement(span))
    }

    pub fn milestone_center(&self, milestone: &Milestone) -> Option<f64> {
        self.mapper
            .milestone_index(milestone)
            .map(|index| self.point_fraction(index))
    }

    /// Column placement of segment `index` of [`Self::segments`].
    pub fn segment_placement(&self, index: usize) -> Placement {
        let n = self.segments.len().max(1) as f64;
        Placement {
            left: index as f64 / n,
            width: 1.0 / n,
        }
    }

    /// One-day band for off days and markers; only meaningful in day view,
    /// where every day is its own column.
    pub fn day_band(&self, index: usize) -> Placement {
        self.mapper.day_cell(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::parse_date;
    use crate::model::plan::NewTask;
    use crate::model::PALETTE;
    use pretty_assertions::assert_eq;

    fn d(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    #[test]
    fn rows_follow_section_order() {
        let plan = Plan::sample();
        let layout = TimelineLayout::build(&plan, d("2026-02-01"), ViewMode::Day);
        let kinds: Vec<&str> = layout
            .rows
            .iter()
            .map(|row| match row {
                LayoutRow::Section { .. } => "section",
                LayoutRow::Task { .. } => "task",
                LayoutRow::Milestone { .. } => "milestone",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["section", "task", "milestone", "section", "task", "task", "section", "task"]
        );
    }

    #[test]
    fn day_view_matches_the_mapper() {
        let plan = Plan::sample();
        let layout = TimelineLayout::build(&plan, d("2026-02-01"), ViewMode::Day);
        for row in &layout.rows {
            if let LayoutRow::Task { task, placement } = row {
                assert_eq!(*placement, layout.mapper.bar_placement(task));
            }
        }
    }

    #[test]
    fn week_view_snaps_to_columns() {
        let mut plan = Plan::new("p");
        plan.padding_days = 0;
        plan.add_section("A", PALETTE[0]);
        plan.add_task(NewTask {
            name: "a".into(),
            start: d("2026-02-01"),
            end: d("2026-02-20"),
            description: String::new(),
            section_id: None,
        });
        let id = plan.add_task(NewTask {
            name: "b".into(),
            start: d("2026-02-09"),
            end: d("2026-02-10"),
            description: String::new(),
            section_id: None,
        });
        let layout = TimelineLayout::build(&plan, d("2026-02-01"), ViewMode::Week);
        assert_eq!(layout.segments.len(), 3);
        let placement = layout.task_placement(plan.task(id).unwrap()).unwrap();
        assert_eq!(placement.left, 1.0 / 3.0);
        assert_eq!(placement.width, 1.0 / 3.0);
    }
}
