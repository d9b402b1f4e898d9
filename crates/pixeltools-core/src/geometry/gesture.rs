//! Move and resize gestures on a [`SelectionRect`].
//!
//! A gesture is one pointer-down to pointer-up sequence. [`begin_gesture`]
//! snapshots the rect and the pointer, [`update_gesture`] is a pure function of
//! the pointer delta since then, and [`end_gesture`] closes the gesture.
//!
//! Every rect returned by [`update_gesture`] lies inside the frame and is at
//! least the effective minimum size on both axes. Sizes are clamped before
//! positions so a resize against a frame edge can never push the rect out.

use serde::{Deserialize, Serialize};

use super::rect::{clamp_or, DisplayFrame, GeometryError, Point, SelectionRect};

/// Default minimum selection side, in display pixels.
pub const DEFAULT_MIN_SIZE: f64 = 20.0;

/// A resize handle on the selection: four corners and four edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    /// Which edges the handle moves: -1 moves the left/top edge, +1 the
    /// right/bottom edge, 0 leaves the axis alone.
    pub fn axes(self) -> (f64, f64) {
        match self {
            Handle::TopLeft => (-1.0, -1.0),
            Handle::Top => (0.0, -1.0),
            Handle::TopRight => (1.0, -1.0),
            Handle::Right => (1.0, 0.0),
            Handle::BottomRight => (1.0, 1.0),
            Handle::Bottom => (0.0, 1.0),
            Handle::BottomLeft => (-1.0, 1.0),
            Handle::Left => (-1.0, 0.0),
        }
    }

    pub fn is_corner(self) -> bool {
        let (hx, vy) = self.axes();
        hx != 0.0 && vy != 0.0
    }
}

/// What a gesture does to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureMode {
    Move,
    Resize(Handle),
}

/// Aspect constraint applied while resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectLock {
    /// Width and height stay equal.
    #[default]
    Square,
    /// Width and height resize independently.
    Free,
}

/// Constraints shared by every gesture of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureOptions {
    pub min_size: f64,
    pub aspect: AspectLock,
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            aspect: AspectLock::default(),
        }
    }
}

/// Snapshot captured when a gesture begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub mode: GestureMode,
    pub origin: Point,
    pub start: SelectionRect,
    pub frame: DisplayFrame,
    pub options: GestureOptions,
    active: bool,
}

impl GestureState {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Start a gesture.
///
/// The starting rect is normalized into the frame first, so a stale rect
/// (e.g. from before a viewport change) cannot leak an invalid state into
/// the gesture.
///
/// # Errors
///
/// Returns `GeometryError::InvalidFrame` when `frame` has no usable area.
pub fn begin_gesture(
    mode: GestureMode,
    pointer: Point,
    rect: SelectionRect,
    frame: DisplayFrame,
    options: GestureOptions,
) -> Result<GestureState, GeometryError> {
    frame.ensure_valid()?;

    let start = rect.clamped_to(&frame, options.min_size);
    log::debug!("begin {mode:?} gesture at ({:.1}, {:.1})", pointer.x, pointer.y);

    Ok(GestureState {
        mode,
        origin: pointer,
        start,
        frame,
        options,
        active: true,
    })
}

/// Compute the selection for the current pointer position.
///
/// Pure: the result depends only on `state` and `pointer`. If the computed
/// rect would be invalid (non-finite input), the starting rect is returned.
pub fn update_gesture(state: &GestureState, pointer: Point) -> SelectionRect {
    if !state.active {
        return state.start;
    }

    let dx = pointer.x - state.origin.x;
    let dy = pointer.y - state.origin.y;

    let next = match state.mode {
        GestureMode::Move => move_rect(&state.start, &state.frame, dx, dy),
        GestureMode::Resize(handle) => match state.options.aspect {
            AspectLock::Free => resize_free(&state.start, &state.frame, handle, dx, dy, state.options.min_size),
            AspectLock::Square => {
                resize_square(&state.start, &state.frame, handle, dx, dy, state.options.min_size)
            }
        },
    };

    match next.validate(&state.frame, state.options.min_size) {
        Ok(()) => next,
        Err(err) => {
            log::warn!("discarding {:?} update: {err}", state.mode);
            state.start
        }
    }
}

/// Close the gesture. Calling it again has no effect.
pub fn end_gesture(state: &mut GestureState) {
    if state.active {
        log::debug!("end {:?} gesture", state.mode);
    }
    state.active = false;
}

fn move_rect(start: &SelectionRect, frame: &DisplayFrame, dx: f64, dy: f64) -> SelectionRect {
    SelectionRect {
        x: clamp_or(start.x + dx, frame.left, frame.right() - start.width),
        y: clamp_or(start.y + dy, frame.top, frame.bottom() - start.height),
        ..*start
    }
}

/// Room available to grow along one axis while the opposite edge stays put.
fn max_extent(sign: f64, start_lo: f64, start_hi: f64, frame_lo: f64, frame_hi: f64) -> f64 {
    if sign > 0.0 {
        frame_hi - start_lo
    } else if sign < 0.0 {
        start_hi - frame_lo
    } else {
        frame_hi - frame_lo
    }
}

/// New low coordinate for an axis of size `size`, anchored at the edge the
/// handle does not move.
fn anchored(sign: f64, start_lo: f64, start_hi: f64, size: f64) -> f64 {
    if sign < 0.0 {
        start_hi - size
    } else {
        start_lo
    }
}

fn resize_free(
    start: &SelectionRect,
    frame: &DisplayFrame,
    handle: Handle,
    dx: f64,
    dy: f64,
    min_size: f64,
) -> SelectionRect {
    let min = frame.effective_min_size(min_size);
    let (hx, vy) = handle.axes();

    let width = if hx != 0.0 {
        let max_w = max_extent(hx, start.x, start.right(), frame.left, frame.right());
        clamp_or(start.width + hx * dx, min, max_w)
    } else {
        start.width
    };
    let height = if vy != 0.0 {
        let max_h = max_extent(vy, start.y, start.bottom(), frame.top, frame.bottom());
        clamp_or(start.height + vy * dy, min, max_h)
    } else {
        start.height
    };

    SelectionRect {
        x: anchored(hx, start.x, start.right(), width),
        y: anchored(vy, start.y, start.bottom(), height),
        width,
        height,
    }
}

fn resize_square(
    start: &SelectionRect,
    frame: &DisplayFrame,
    handle: Handle,
    dx: f64,
    dy: f64,
    min_size: f64,
) -> SelectionRect {
    let min = frame.effective_min_size(min_size);
    let (hx, vy) = handle.axes();
    let max_w = max_extent(hx, start.x, start.right(), frame.left, frame.right());
    let max_h = max_extent(vy, start.y, start.bottom(), frame.top, frame.bottom());
    let center = start.center();

    if handle.is_corner() {
        // The dominant delta along the corner's outward diagonal drives the size.
        let delta = (hx * dx).max(vy * dy);
        let size = clamp_or(start.width + delta, min, max_w.min(max_h));
        return SelectionRect {
            x: anchored(hx, start.x, start.right(), size),
            y: anchored(vy, start.y, start.bottom(), size),
            width: size,
            height: size,
        };
    }

    if hx != 0.0 {
        // The other axis grows symmetrically around its center, then is
        // pushed back inside the frame.
        let size = clamp_or(start.width + hx * dx, min, max_w.min(frame.height));
        SelectionRect {
            x: anchored(hx, start.x, start.right(), size),
            y: clamp_or(center.y - size / 2.0, frame.top, frame.bottom() - size),
            width: size,
            height: size,
        }
    } else {
        let size = clamp_or(start.height + vy * dy, min, max_h.min(frame.width));
        SelectionRect {
            x: clamp_or(center.x - size / 2.0, frame.left, frame.right() - size),
            y: anchored(vy, start.y, start.bottom(), size),
            width: size,
            height: size,
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
