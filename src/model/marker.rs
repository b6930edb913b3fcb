use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::{format_date, parse_date};
use super::color::HexColor;

/// A labelled day highlighted across every row of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: Uuid,
    pub label: String,
    pub date: String,
    pub color: HexColor,
}

impl Marker {
    pub fn new(label: impl Into<String>, date: NaiveDate, color: HexColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            date: format_date(date),
            color,
        }
    }

    pub fn day(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// A marker resolved to a day index inside the visible sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPlacement {
    pub id: Uuid,
    pub label: String,
    pub color: HexColor,
    pub day_index: usize,
}
