//! Display-space geometry for the interactive crop box.
//!
//! # Coordinate System
//!
//! - Display pixels, origin at the top-left of the positioning container
//! - [`DisplayFrame`] is where the rendered image sits in that space
//! - [`SelectionRect`] lives in the same space and never leaves the frame

mod gesture;
mod rect;

pub use gesture::{
    begin_gesture, end_gesture, update_gesture, AspectLock, GestureMode, GestureOptions,
    GestureState, Handle, DEFAULT_MIN_SIZE,
};
pub use rect::{DisplayFrame, GeometryError, ImageSize, Point, SelectionRect};
