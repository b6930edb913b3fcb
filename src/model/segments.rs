//! Header tracks for the timeline.
//!
//! Three parallel tracks partition the day sequence: months (run-length of
//! calendar month), weeks (fixed groups of seven counted from the first
//! visible day) and single days. The week grouping and the day "major"
//! flag are modulo-7 from index 0 and deliberately ignore real weekdays.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::{day_of_month_label, format_date, month_day_label, month_label};

/// Granularity of the timeline columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Day,
    Week,
    Month,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Day, ViewMode::Week, ViewMode::Month];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Day => "Days",
            ViewMode::Week => "Weeks",
            ViewMode::Month => "Months",
        }
    }
}

/// A contiguous run of days sharing one header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub key: String,
    pub label: String,
    /// Index of the first day covered.
    pub start: usize,
    pub span: usize,
    pub major: bool,
}

pub const WEEK_LEN: usize = 7;

/// One segment per day, labelled with the day of month.
pub fn day_segments(days: &[NaiveDate]) -> Vec<Segment> {
    days.iter()
        .enumerate()
        .map(|(index, day)| Segment {
            key: format!("day-{}", format_date(*day)),
            label: day_of_month_label(*day),
            start: index,
            span: 1,
            major: index % WEEK_LEN == 0,
        })
        .collect()
}

/// Groups of seven days from index 0, labelled `Week n`.
pub fn week_segments(days: &[NaiveDate]) -> Vec<Segment> {
    (0..days.len())
        .step_by(WEEK_LEN)
        .enumerate()
        .map(|(ordinal, start)| Segment {
            key: format!("week-{start}"),
            label: format!("Week {}", ordinal + 1),
            start,
            span: WEEK_LEN.min(days.len() - start),
            major: true,
        })
        .collect()
}

/// Runs of consecutive days in the same calendar month.
pub fn month_segments(days: &[NaiveDate]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut cursor = 0;
    while cursor < days.len() {
        let first = days[cursor];
        let span = days[cursor..]
            .iter()
            .take_while(|d| d.year() == first.year() && d.month() == first.month())
            .count();
        segments.push(Segment {
            key: format!("month-{}-{:02}-{}", first.year(), first.month(), cursor),
            label: month_label(first),
            start: cursor,
            span,
            major: true,
        });
        cursor += span;
    }
    segments
}

/// Column segments for the chosen granularity. Week columns are labelled
/// with the month and day they start on; a month column is major when its
/// label differs from the previous column's.
pub fn timeline_segments(days: &[NaiveDate], mode: ViewMode) -> Vec<Segment> {
    match mode {
        ViewMode::Day => day_segments(days),
        ViewMode::Week => week_segments(days)
            .into_iter()
            .map(|mut segment| {
                segment.label = month_day_label(days[segment.start]);
                segment
            })
            .collect(),
        ViewMode::Month => {
            let mut segments = month_segments(days);
            let mut previous: Option<String> = None;
            for segment in &mut segments {
                segment.major = previous.as_deref() != Some(segment.label.as_str());
                previous = Some(segment.label.clone());
            }
            segments
        }
    }
}

/// Resolve each day index to the index of the segment containing it.
pub fn day_to_segment(segments: &[Segment], day_count: usize) -> Vec<usize> {
    let mut map = Vec::with_capacity(day_count);
    for (segment_index, segment) in segments.iter().enumerate() {
        for _ in 0..segment.span {
            if map.len() == day_count {
                return map;
            }
            map.push(segment_index);
        }
    }
    map
}

/// Month, week and day header tracks for one day sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTracks {
    pub months: Vec<Segment>,
    pub weeks: Vec<Segment>,
    pub days: Vec<Segment>,
}

impl HeaderTracks {
    pub fn build(days: &[NaiveDate]) -> Self {
        Self {
            months: month_segments(days),
            weeks: week_segments(days),
            days: day_segments(days),
        }
    }
}

/// Below this many pixels per week, week labels drop the `Week` prefix.
pub const WEEK_LABEL_MIN_WIDTH: f32 = 56.0;

/// Which header labels fit at the current zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelThinning {
    /// Show a day label every `day_step` days.
    pub day_step: usize,
    pub compact_weeks: bool,
}

impl LabelThinning {
    pub fn for_day_width(day_width: f32) -> Self {
        let day_step = if day_width < 10.0 {
            4
        } else if day_width < 14.0 {
            3
        } else if day_width < 18.0 {
            2
        } else {
            1
        };
        Self {
            day_step,
            compact_weeks: day_width * (WEEK_LEN as f32) < WEEK_LABEL_MIN_WIDTH,
        }
    }

    pub fn shows_day_label(&self, index: usize) -> bool {
        index % self.day_step == 0
    }

    /// Label for a week track segment (1-based ordinal).
    pub fn week_label(&self, ordinal: usize) -> String {
        if self.compact_weeks {
            ordinal.to_string()
        } else {
            format!("Week {ordinal}")
        }
    }
}
