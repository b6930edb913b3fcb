pub mod calendar;
pub mod color;
pub mod drag;
pub mod geometry;
pub mod layout;
pub mod marker;
pub mod milestone;
pub mod plan;
pub mod range;
pub mod section;
pub mod segments;
pub mod task;

pub use color::{HexColor, PALETTE};
pub use drag::{DragController, DragEvent, DragMode, DragUpdate};
pub use geometry::{GeometryMapper, IndexSpan, Placement};
pub use layout::{LayoutRow, TimelineLayout};
pub use marker::{Marker, MarkerPlacement};
pub use milestone::{Milestone, MilestoneSymbol};
pub use plan::{NewMilestone, NewTask, Plan};
pub use range::TimelineRange;
pub use section::{Section, SectionGroup};
pub use segments::{HeaderTracks, LabelThinning, Segment, ViewMode};
pub use task::{Progress, Subtask, Task};
