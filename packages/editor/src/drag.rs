//! # Drag Reorder Resolver
//!
//! Turns raw pointer events into a single committed reorder.
//!
//! ```text
//!          begin                 pointer_over
//!   Idle ─────────▶ Dragging ─────────────────▶ Hovering(target, edge)
//!    ▲                 ▲  ◀────────────────────        │
//!    │                 │     pointer_leave             │ drop
//!    │   end / cancel  │                               ▼
//!    └─────────────────┴──────────────────────── DropIntent
//! ```
//!
//! ## Hover edge
//!
//! The pointer's offset from the target's top edge decides the insertion
//! side: the upper half means [`Edge::Top`], the lower half [`Edge::Bottom`].
//!
//! ## Debounce
//!
//! Raw pointer-over events arrive far faster than the indicator should move.
//! The resolver tracks the latest `(target, edge)` immediately but only
//! publishes it through [`DragResolver::hover`] once it has been stable for the
//! configured window, and only when it actually differs from what is shown.
//!
//! ## Auto-scroll
//!
//! While a drag is active and the pointer sits within a band near the top or
//! bottom of the scroll container, a single repeating timer yields a fixed
//! scroll step per tick. Leaving the band or ending the drag stops it.
//!
//! The resolver never reads a clock: every event and [`DragResolver::tick`]
//! takes the current [`Instant`] from the caller.

use crate::config::EditorConfig;
use crate::mutations::Edit;
use crate::operations::Edge;
use crate::timer::{Debouncer, RepeatingTimer};
use std::time::Instant;
use tracing::{debug, trace};

/// A pointer position in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Inclusive on the top/left edges, exclusive on bottom/right
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }
}

/// Insertion side for a pointer over `target`
pub fn compute_edge(pointer_y: f64, target: &Rect) -> Edge {
    let relative_y = pointer_y - target.top;
    if relative_y < target.height / 2.0 {
        Edge::Top
    } else {
        Edge::Bottom
    }
}

/// The block under the pointer and the side a drop would insert on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    pub block_id: String,
    pub edge: Edge,
}

/// Resolver state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,

    Dragging {
        dragged_id: String,
    },

    Hovering {
        dragged_id: String,
        target: HoverTarget,
    },
}

impl DragState {
    pub fn dragged_id(&self) -> Option<&str> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { dragged_id } | DragState::Hovering { dragged_id, .. } => Some(dragged_id),
        }
    }
}

/// A resolved drop, ready to become a reorder edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIntent {
    pub dragged_id: String,
    pub target_id: String,
    pub edge: Edge,
}

impl DropIntent {
    pub fn into_edit(self, page: impl Into<String>) -> Edit {
        Edit::ReorderBlocks {
            page: page.into(),
            dragged_id: self.dragged_id,
            target_id: self.target_id,
            edge: self.edge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Edge-band auto-scroll driven by one repeating timer
#[derive(Debug, Clone)]
pub struct AutoScroller {
    band_px: f64,
    step_px: f64,
    timer: RepeatingTimer,
    direction: Option<ScrollDirection>,
}

impl AutoScroller {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            band_px: config.auto_scroll_band_px,
            step_px: config.auto_scroll_step_px,
            timer: RepeatingTimer::new(config.auto_scroll_interval()),
            direction: None,
        }
    }

    /// Band the pointer is in, if any
    pub fn direction_for(&self, pointer_y: f64, container: &Rect) -> Option<ScrollDirection> {
        if pointer_y < container.top + self.band_px {
            Some(ScrollDirection::Up)
        } else if pointer_y > container.bottom() - self.band_px {
            Some(ScrollDirection::Down)
        } else {
            None
        }
    }

    /// Start, retarget or stop scrolling for a new pointer position
    pub fn update(&mut self, pointer_y: f64, container: &Rect, now: Instant) {
        match self.direction_for(pointer_y, container) {
            Some(direction) => {
                if self.direction != Some(direction) {
                    trace!(?direction, "Auto-scroll engaged");
                }
                self.direction = Some(direction);
                self.timer.start(now);
            }
            None => self.stop(),
        }
    }

    pub fn stop(&mut self) {
        if self.direction.take().is_some() {
            trace!("Auto-scroll stopped");
        }
        self.timer.stop();
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    /// Scroll offset to apply for ticks elapsed up to `now`
    pub fn tick(&mut self, now: Instant) -> f64 {
        let ticks = self.timer.poll(now);
        let step = match self.direction {
            Some(ScrollDirection::Up) => -self.step_px,
            Some(ScrollDirection::Down) => self.step_px,
            None => 0.0,
        };
        step * f64::from(ticks)
    }
}

/// Result of advancing the resolver's timers
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragTick {
    /// The published hover changed during this tick
    pub hover_changed: bool,

    /// Amount to add to the container's scroll offset (negative = up)
    pub scroll_delta: f64,
}

/// Pointer-event state machine for block drag-and-drop
#[derive(Debug, Clone)]
pub struct DragResolver {
    state: DragState,

    /// Hover as published to the UI
    hover: Option<HoverTarget>,

    hover_update: Debouncer<HoverTarget>,

    auto_scroll: AutoScroller,
}

impl DragResolver {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: DragState::Idle,
            hover: None,
            hover_update: Debouncer::new(config.hover_debounce()),
            auto_scroll: AutoScroller::new(config),
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != DragState::Idle
    }

    pub fn dragged_id(&self) -> Option<&str> {
        self.state.dragged_id()
    }

    /// Hover target currently shown to the user
    pub fn hover(&self) -> Option<&HoverTarget> {
        self.hover.as_ref()
    }

    /// Whether a hover update or auto-scroll tick is outstanding
    pub fn has_pending_timers(&self) -> bool {
        self.hover_update.is_pending() || self.auto_scroll.is_active()
    }

    pub fn auto_scroll(&self) -> &AutoScroller {
        &self.auto_scroll
    }

    /// User started dragging `block_id`
    ///
    /// Beginning a new drag discards whatever the previous one left behind.
    pub fn begin(&mut self, block_id: impl Into<String>) {
        self.reset();
        let dragged_id = block_id.into();
        debug!(block_id = %dragged_id, "Drag started");
        self.state = DragState::Dragging { dragged_id };
    }

    /// Pointer moved over a block's bounding box
    pub fn pointer_over(&mut self, target_id: &str, target_rect: &Rect, pointer: Point, now: Instant) {
        let Some(dragged_id) = self.state.dragged_id().map(str::to_string) else {
            return;
        };

        let target = HoverTarget {
            block_id: target_id.to_string(),
            edge: compute_edge(pointer.y, target_rect),
        };

        // Latest value already heading for the UI
        let latest = self.hover_update.pending().or(self.hover.as_ref());
        if latest != Some(&target) {
            if self.hover.as_ref() == Some(&target) {
                // Back to what is already shown before the window elapsed
                self.hover_update.cancel();
            } else {
                self.hover_update.schedule(target.clone(), now);
            }
        }

        self.state = DragState::Hovering { dragged_id, target };
    }

    /// Pointer left a block's bounding box
    ///
    /// Leave events also bubble up from child elements, so the hover is only
    /// cleared when `pointer` really lies outside `target_rect`. Returns
    /// whether the hover was cleared.
    ///
    /// The pointer is still held, so the resolver drops back to
    /// [`DragState::Dragging`] with the source kept; hovering another block
    /// continues the same drag, and releasing now commits nothing.
    pub fn pointer_leave(&mut self, target_id: &str, target_rect: &Rect, pointer: Point) -> bool {
        let DragState::Hovering { dragged_id, target } = &self.state else {
            return false;
        };
        if target.block_id != target_id || target_rect.contains(pointer) {
            return false;
        }

        trace!(block_id = %target_id, "Drag left target");
        self.state = DragState::Dragging {
            dragged_id: dragged_id.clone(),
        };
        self.hover_update.cancel();
        self.hover = None;
        true
    }

    /// Pointer moved anywhere during the drag; drives auto-scroll
    pub fn pointer_move(&mut self, pointer: Point, container: &Rect, now: Instant) {
        if self.is_active() {
            self.auto_scroll.update(pointer.y, container, now);
        }
    }

    /// Advance timers to `now`
    pub fn tick(&mut self, now: Instant) -> DragTick {
        let mut tick = DragTick::default();

        if let Some(target) = self.hover_update.poll(now) {
            if self.hover.as_ref() != Some(&target) {
                trace!(block_id = %target.block_id, edge = %target.edge, "Hover published");
                self.hover = Some(target);
                tick.hover_changed = true;
            }
        }

        tick.scroll_delta = self.auto_scroll.tick(now);
        tick
    }

    /// Pointer released; yields the reorder to commit, if any
    ///
    /// The most recently computed target wins even if its debounce window has
    /// not elapsed yet. The resolver is back in [`DragState::Idle`] afterwards.
    pub fn complete(&mut self) -> Option<DropIntent> {
        let state = std::mem::take(&mut self.state);
        self.reset();

        match state {
            DragState::Hovering { dragged_id, target } => {
                debug!(
                    dragged_id = %dragged_id,
                    target_id = %target.block_id,
                    edge = %target.edge,
                    "Drag dropped"
                );
                Some(DropIntent {
                    dragged_id,
                    target_id: target.block_id,
                    edge: target.edge,
                })
            }
            DragState::Dragging { dragged_id } => {
                debug!(dragged_id = %dragged_id, "Drag dropped outside any target");
                None
            }
            DragState::Idle => None,
        }
    }

    /// Drag ended without a drop, or was cancelled
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!("Drag cancelled");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.state = DragState::Idle;
        self.hover = None;
        self.hover_update.cancel();
        self.auto_scroll.stop();
    }
}
