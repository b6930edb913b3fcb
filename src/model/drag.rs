//! Pointer-driven move / resize of task bars.
//!
//! The controller is a small state machine fed with [`DragEvent`]s. It never
//! touches the plan itself; each applied step comes back as a [`DragUpdate`]
//! for the owner to write into the task record.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use log::debug;
use uuid::Uuid;

use super::calendar::clamp;
use super::geometry::{day_width, pixel_delta_to_days, GeometryMapper, IndexSpan};

/// Window after a drag in which a click on the same bar is not a selection.
pub const CLICK_SUPPRESS_WINDOW: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeLeft,
    ResizeRight,
}

/// What was captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub span: IndexSpan,
    /// Day sequence the span indexes into. Edits during the gesture may
    /// widen the live range, so every step resolves against this one.
    pub origin: GeometryMapper,
    pub pointer_id: u64,
    pub pointer_x: f32,
    pub last_delta: i64,
    /// Whether a non-zero delta was applied at any point in the gesture.
    pub moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        mode: DragMode,
        task_id: Uuid,
        anchor: DragAnchor,
    },
}

/// Input to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    PointerDown {
        task_id: Uuid,
        mode: DragMode,
        span: IndexSpan,
        origin: GeometryMapper,
        pointer_id: u64,
        x: f32,
    },
    PointerMove {
        pointer_id: u64,
        x: f32,
        /// Current pixel width of the whole timeline.
        timeline_width: f32,
        day_count: usize,
    },
    PointerUp {
        pointer_id: u64,
        at: Instant,
    },
}

/// New index span for a task, to be written back as dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragUpdate {
    pub task_id: Uuid,
    pub span: IndexSpan,
    /// Day sequence captured at pointer-down.
    pub origin: GeometryMapper,
}

impl DragUpdate {
    /// Calendar days of the new span.
    pub fn dates(&self) -> (NaiveDate, NaiveDate) {
        (self.origin.date_at(self.span.start), self.origin.date_at(self.span.end))
    }
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
    last_drag: Option<(Uuid, Instant)>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn active_task(&self) -> Option<Uuid> {
        match self.state {
            DragState::Dragging { task_id, .. } => Some(task_id),
            DragState::Idle => None,
        }
    }

    pub fn active_mode(&self) -> Option<DragMode> {
        match self.state {
            DragState::Dragging { mode, .. } => Some(mode),
            DragState::Idle => None,
        }
    }

    /// Feed one event; returns the span to apply when the task should change.
    pub fn handle(&mut self, event: DragEvent) -> Option<DragUpdate> {
        match event {
            DragEvent::PointerDown {
                task_id,
                mode,
                span,
                origin,
                pointer_id,
                x,
            } => {
                self.pointer_down(task_id, mode, span, origin, pointer_id, x);
                None
            }
            DragEvent::PointerMove {
                pointer_id,
                x,
                timeline_width,
                day_count,
            } => self.pointer_move(pointer_id, x, timeline_width, day_count),
            DragEvent::PointerUp { pointer_id, at } => {
                self.pointer_up(pointer_id, at);
                None
            }
        }
    }

    pub fn pointer_down(
        &mut self,
        task_id: Uuid,
        mode: DragMode,
        span: IndexSpan,
        origin: GeometryMapper,
        pointer_id: u64,
        x: f32,
    ) {
        debug!("drag start {task_id} {mode:?} at {}..={}", span.start, span.end);
        self.state = DragState::Dragging {
            mode,
            task_id,
            anchor: DragAnchor {
                span: IndexSpan::ordered(span.start, span.end),
                origin,
                pointer_id,
                pointer_x: x,
                last_delta: 0,
                moved: false,
            },
        };
    }

    /// `timeline_width` and `day_count` describe the live timeline and only
    /// set the pixels per day; clamping uses the day sequence captured at
    /// pointer-down.
    pub fn pointer_move(
        &mut self,
        pointer_id: u64,
        x: f32,
        timeline_width: f32,
        day_count: usize,
    ) -> Option<DragUpdate> {
        let DragState::Dragging {
            mode,
            task_id,
            ref mut anchor,
        } = self.state
        else {
            return None;
        };
        if anchor.pointer_id != pointer_id {
            return None;
        }
        let per_day = day_width(timeline_width, day_count)?;
        let delta = pixel_delta_to_days(x - anchor.pointer_x, per_day);
        if delta == anchor.last_delta {
            return None;
        }
        anchor.last_delta = delta;
        if delta != 0 {
            anchor.moved = true;
        }

        let span = apply_delta(mode, anchor.span, delta, anchor.origin.day_count());
        Some(DragUpdate {
            task_id,
            span,
            origin: anchor.origin,
        })
    }

    /// End the gesture. Returns the task id when the gesture changed it.
    pub fn pointer_up(&mut self, pointer_id: u64, at: Instant) -> Option<Uuid> {
        let DragState::Dragging { task_id, anchor, .. } = self.state else {
            return None;
        };
        if anchor.pointer_id != pointer_id {
            return None;
        }
        self.state = DragState::Idle;
        if anchor.moved {
            debug!("drag committed for {task_id}");
            self.last_drag = Some((task_id, at));
            Some(task_id)
        } else {
            None
        }
    }

    /// True when a click on `task_id` at `at` is the tail of a drag.
    pub fn suppresses_click(&self, task_id: Uuid, at: Instant) -> bool {
        match self.last_drag {
            Some((id, when)) => {
                id == task_id && at.saturating_duration_since(when) < CLICK_SUPPRESS_WINDOW
            }
            None => false,
        }
    }
}

/// Shift `span` by `delta` days according to `mode`, clamped into `[0, N-1]`.
pub fn apply_delta(mode: DragMode, span: IndexSpan, delta: i64, day_count: usize) -> IndexSpan {
    let last = day_count.saturating_sub(1) as i64;
    let (start, end) = (span.start as i64, span.end as i64);
    let (next_start, next_end) = match mode {
        DragMode::Move => {
            let duration = end - start;
            let next = clamp(start + delta, 0, last - duration);
            (next, next + duration)
        }
        DragMode::ResizeLeft => (clamp(start + delta, 0, end), end),
        DragMode::ResizeRight => (start, clamp(end + delta, start, last)),
    };
    IndexSpan::ordered(next_start.max(0) as usize, next_end.max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::parse_date;
    use pretty_assertions::assert_eq;

    const N: usize = 20;
    const WIDTH: f32 = 800.0; // 40px per day

    fn origin() -> GeometryMapper {
        GeometryMapper::new(parse_date("2026-02-01").unwrap(), N)
    }

    fn start(controller: &mut DragController, mode: DragMode) -> Uuid {
        let id = Uuid::new_v4();
        controller.pointer_down(id, mode, IndexSpan { start: 4, end: 7 }, origin(), 1, 100.0);
        id
    }

    fn span(start: usize, end: usize) -> IndexSpan {
        IndexSpan { start, end }
    }

    #[test]
    fn move_shifts_both_edges() {
        let mut c = DragController::new();
        let id = start(&mut c, DragMode::Move);
        let update = c.pointer_move(1, 180.0, WIDTH, N).unwrap();
        assert_eq!(
            update,
            DragUpdate {
                task_id: id,
                span: span(6, 9),
                origin: origin()
            }
        );
        assert_eq!(
            update.dates(),
            (parse_date("2026-02-07").unwrap(), parse_date("2026-02-10").unwrap())
        );
    }

    #[test]
    fn unchanged_delta_is_a_no_op() {
        let mut c = DragController::new();
        start(&mut c, DragMode::Move);
        assert_eq!(c.pointer_move(1, 110.0, WIDTH, N), None);
        assert!(c.pointer_move(1, 140.0, WIDTH, N).is_some());
        assert_eq!(c.pointer_move(1, 145.0, WIDTH, N), None);
    }

    #[test]
    fn resize_handles_cannot_cross() {
        let mut c = DragController::new();
        start(&mut c, DragMode::ResizeLeft);
        let update = c.pointer_move(1, 100.0 + 40.0 * 10.0, WIDTH, N).unwrap();
        assert_eq!(update.span, span(7, 7));

        let mut c = DragController::new();
        start(&mut c, DragMode::ResizeRight);
        let update = c.pointer_move(1, 100.0 - 40.0 * 10.0, WIDTH, N).unwrap();
        assert_eq!(update.span, span(4, 4));
    }

    #[test]
    fn steps_resolve_against_the_pointer_down_range() {
        let mut c = DragController::new();
        start(&mut c, DragMode::Move);
        // the live range grew by ten days after the first step
        c.pointer_move(1, 60.0, WIDTH, N);
        let update = c.pointer_move(1, 20.0, WIDTH + 400.0, N + 10).unwrap();
        assert_eq!(update.span, span(2, 5));
        assert_eq!(update.origin, origin());
        assert_eq!(update.dates().0, parse_date("2026-02-03").unwrap());
    }

    #[test]
    fn resize_right_stops_at_the_last_day() {
        assert_eq!(apply_delta(DragMode::ResizeRight, span(4, 7), 50, N), span(4, N - 1));
    }

    #[test]
    fn resize_left_stops_at_day_zero() {
        assert_eq!(apply_delta(DragMode::ResizeLeft, span(4, 7), -50, N), span(0, 7));
    }

    #[test]
    fn resize_left_stops_at_the_end() {
        assert_eq!(apply_delta(DragMode::ResizeLeft, span(4, 7), 5, N), span(7, 7));
    }

    #[test]
    fn move_keeps_duration_at_either_edge() {
        assert_eq!(apply_delta(DragMode::Move, span(4, 7), 50, N), span(N - 4, N - 1));
        assert_eq!(apply_delta(DragMode::Move, span(4, 7), -50, N), span(0, 3));
        assert_eq!(apply_delta(DragMode::Move, span(4, 7), 3, N), span(7, 10));
    }

    #[test]
    fn zero_width_viewport_ignores_moves() {
        let mut c = DragController::new();
        start(&mut c, DragMode::Move);
        assert_eq!(c.pointer_move(1, 500.0, 0.0, N), None);
        assert_eq!(c.pointer_move(1, 500.0, WIDTH, 0), None);
        assert!(c.is_dragging());
    }

    #[test]
    fn other_pointers_are_ignored() {
        let mut c = DragController::new();
        start(&mut c, DragMode::Move);
        assert_eq!(c.pointer_move(2, 500.0, WIDTH, N), None);
        assert_eq!(c.pointer_up(2, Instant::now()), None);
        assert!(c.is_dragging());
    }

    #[test]
    fn click_after_drag_is_suppressed_briefly() {
        let mut c = DragController::new();
        let id = start(&mut c, DragMode::Move);
        c.pointer_move(1, 180.0, WIDTH, N);
        let up = Instant::now();
        assert_eq!(c.pointer_up(1, up), Some(id));
        assert!(!c.is_dragging());
        assert!(c.suppresses_click(id, up + Duration::from_millis(50)));
        assert!(!c.suppresses_click(id, up + Duration::from_millis(400)));
        assert!(!c.suppresses_click(Uuid::new_v4(), up));
    }

    #[test]
    fn stationary_gesture_does_not_suppress() {
        let mut c = DragController::new();
        let id = start(&mut c, DragMode::Move);
        let up = Instant::now();
        assert_eq!(c.pointer_up(1, up), None);
        assert!(!c.suppresses_click(id, up));
    }

    #[test]
    fn handle_dispatches_events() {
        let mut c = DragController::new();
        let id = Uuid::new_v4();
        let span = span(0, 2);
        let down = DragEvent::PointerDown {
            task_id: id,
            mode: DragMode::Move,
            span,
            origin: origin(),
            pointer_id: 0,
            x: 0.0,
        };
        assert_eq!(c.handle(down), None);
        let update = c.handle(DragEvent::PointerMove { pointer_id: 0, x: -400.0, timeline_width: WIDTH, day_count: N });
        assert_eq!(
            update,
            Some(DragUpdate {
                task_id: id,
                span,
                origin: origin()
            })
        );
        c.handle(DragEvent::PointerUp { pointer_id: 0, at: Instant::now() });
        assert_eq!(c.state(), &DragState::Idle);
    }
}
