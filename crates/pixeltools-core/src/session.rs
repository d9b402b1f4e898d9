//! The interactive crop session.
//!
//! A [`CropSession`] owns everything the crop tool mutates: the selection,
//! the rotation, the gesture in progress, and the most recent result. The
//! host forwards pointer events and viewport changes; the session keeps the
//! selection valid through all of them.
//!
//! # Stale Results
//!
//! Encoding may finish after the user has already asked for another apply.
//! Each apply takes an [`ApplyTicket`]; only the newest ticket may store a
//! result, so at most one live result exists at a time.

use crate::config::EditorConfig;
use crate::decode::RasterBuffer;
use crate::encode::OutputFormat;
use crate::geometry::{
    begin_gesture, end_gesture, update_gesture, AspectLock, DisplayFrame, GeometryError,
    GestureMode, GestureState, ImageSize, Point, SelectionRect,
};
use crate::pipeline::{crop_and_encode, CropError, CropOutput};
use crate::transform::{Rotation, TransformError};

/// Identifies one apply request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApplyTicket(u64);

impl ApplyTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Crop state for one loaded image.
#[derive(Debug, Clone)]
pub struct CropSession {
    frame: DisplayFrame,
    natural: ImageSize,
    selection: SelectionRect,
    rotation: Rotation,
    config: EditorConfig,
    gesture: Option<GestureState>,
    generation: u64,
    result: Option<CropOutput>,
}

impl CropSession {
    /// Start a session with a centered square selection.
    ///
    /// # Errors
    ///
    /// - `TransformError::ImageNotReady` when a natural dimension is zero
    /// - `TransformError::InvalidFrame` when the frame has no area
    pub fn new(
        frame: DisplayFrame,
        natural: ImageSize,
        config: EditorConfig,
    ) -> Result<Self, TransformError> {
        if !natural.is_ready() {
            return Err(TransformError::ImageNotReady);
        }
        if !frame.has_area() {
            return Err(TransformError::InvalidFrame);
        }

        let config = config.sanitized();
        let selection =
            SelectionRect::centered(&frame, config.initial_coverage, config.min_selection_size);
        log::debug!(
            "crop session for {}x{} image, initial selection {selection:?}",
            natural.width,
            natural.height
        );

        Ok(Self {
            frame,
            natural,
            selection,
            rotation: Rotation::Deg0,
            config,
            gesture: None,
            generation: 0,
            result: None,
        })
    }

    pub fn selection(&self) -> SelectionRect {
        self.selection
    }

    pub fn frame(&self) -> DisplayFrame {
        self.frame
    }

    pub fn natural(&self) -> ImageSize {
        self.natural
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some_and(|g| g.is_active())
    }

    /// Begin a move or resize at `pointer`. A gesture already in progress is
    /// ended first.
    pub fn pointer_down(&mut self, mode: GestureMode, pointer: Point) -> Result<(), GeometryError> {
        self.pointer_up();
        let state = begin_gesture(
            mode,
            pointer,
            self.selection,
            self.frame,
            self.config.gesture_options(),
        )?;
        self.selection = state.start;
        self.gesture = Some(state);
        Ok(())
    }

    /// Update the selection for the pointer position. Without an active
    /// gesture the selection is unchanged.
    pub fn pointer_move(&mut self, pointer: Point) -> SelectionRect {
        if let Some(state) = &self.gesture {
            self.selection = update_gesture(state, pointer);
        }
        self.selection
    }

    /// Finish the gesture, keeping the last selection.
    pub fn pointer_up(&mut self) {
        if let Some(mut state) = self.gesture.take() {
            end_gesture(&mut state);
        }
    }

    /// Same as [`pointer_up`](Self::pointer_up): the last valid selection
    /// is kept.
    pub fn pointer_cancel(&mut self) {
        self.pointer_up();
    }

    pub fn rotate_left(&mut self) -> Rotation {
        self.rotation = self.rotation.rotate_left();
        self.rotation
    }

    pub fn rotate_right(&mut self) -> Rotation {
        self.rotation = self.rotation.rotate_right();
        self.rotation
    }

    /// Move the session to a new display frame after a viewport change.
    ///
    /// The selection keeps its relative position and size and is clamped to
    /// the new frame. Any gesture in progress is ended.
    pub fn set_frame(&mut self, frame: DisplayFrame) -> Result<(), GeometryError> {
        frame.ensure_valid()?;
        self.pointer_up();

        let keep_square = self.config.aspect_lock == AspectLock::Square;
        let rescaled = self.selection.rescaled(&self.frame, &frame, keep_square);
        self.selection = rescaled.clamped_to(&frame, self.config.min_selection_size);
        self.frame = frame;
        Ok(())
    }

    /// Take a ticket for a new apply. Every earlier ticket becomes stale.
    pub fn begin_apply(&mut self) -> ApplyTicket {
        self.generation += 1;
        ApplyTicket(self.generation)
    }

    /// Store the result for `ticket`. Returns `false` and drops the result if
    /// a newer apply has started since.
    pub fn accept(&mut self, ticket: ApplyTicket, result: CropOutput) -> bool {
        if ticket.0 != self.generation {
            log::warn!(
                "discarding stale crop result (ticket {}, current {})",
                ticket.0,
                self.generation
            );
            return false;
        }
        self.result = Some(result);
        true
    }

    pub fn latest_result(&self) -> Option<&CropOutput> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<CropOutput> {
        self.result.take()
    }

    /// Crop `image` to the current selection and rotation, encode it, and
    /// keep the result as the latest one.
    pub fn apply(
        &mut self,
        image: &RasterBuffer,
        format: OutputFormat,
        quality: u8,
    ) -> Result<CropOutput, CropError> {
        let ticket = self.begin_apply();
        let output = crop_and_encode(
            &self.selection,
            &self.frame,
            self.natural,
            self.rotation,
            image,
            format,
            quality,
        )?;
        self.accept(ticket, output.clone());
        Ok(output)
    }

    /// [`apply`](Self::apply) with the configured format and quality.
    pub fn apply_default(&mut self, image: &RasterBuffer) -> Result<CropOutput, CropError> {
        self.apply(image, self.config.default_format, self.config.default_quality)
    }
}
