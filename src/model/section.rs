use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::color::HexColor;
use super::milestone::Milestone;
use super::task::Task;

/// Display name of the synthetic group holding items without a valid section.
pub const UNASSIGNED: &str = "Unassigned";

/// A named, colored group of tasks and milestones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub name: String,
    pub color: HexColor,
}

impl Section {
    pub fn new(name: impl Into<String>, color: HexColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color,
        }
    }
}

/// One section (or the unassigned group) with the items listed under it.
#[derive(Debug, Clone)]
pub struct SectionGroup<'a> {
    /// `None` for the unassigned group.
    pub id: Option<Uuid>,
    pub name: String,
    pub color: Option<HexColor>,
    pub tasks: Vec<&'a Task>,
    pub milestones: Vec<&'a Milestone>,
}

impl SectionGroup<'_> {
    pub fn is_unassigned(&self) -> bool {
        self.id.is_none()
    }
}
