//! Overlay geometry kept in sync with an asynchronously loaded image.
//!
//! [`AnnotationProjector`] owns the detections for one image, the image's
//! native size (known only once the resource has loaded) and the displayed
//! size (changes on resize). Every effective input change recomputes the
//! render-ready annotation list once; readers get the cached slice.
//!
//! Loading is tracked with [`LoadTicket`]s. Each source change issues a new
//! ticket and only a completion carrying the current ticket is accepted, so a
//! slow load for a superseded image can never overwrite the current state.

use serde::Serialize;
use weedscope_feed::Detection;

use crate::model::{DetectionRecord, RenderedAnnotation, records_from_batch};
use crate::projection::{Dimensions, project_box, scale_factors};

/// Identifies one image load. Tickets increase monotonically per projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LoadTicket(u64);

impl LoadTicket {
    /// Raw ticket value, for handing across an FFI boundary.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Rebuild a ticket from its raw value.
    pub fn from_value(value: u64) -> Self {
        Self(value)
    }
}

/// Load lifecycle of the current image source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadState {
    /// No image source has been set
    NoSource,
    /// Source set, waiting for the resource to report its size
    SourcePending { ticket: LoadTicket },
    /// Resource loaded with the given native size
    NativeDimensionsKnown {
        ticket: LoadTicket,
        native: Dimensions,
    },
    /// Resource failed to load (or reported an empty size)
    LoadFailed { ticket: LoadTicket },
}

impl LoadState {
    /// Ticket of the current source, if any.
    pub fn ticket(&self) -> Option<LoadTicket> {
        match self {
            LoadState::NoSource => None,
            LoadState::SourcePending { ticket }
            | LoadState::NativeDimensionsKnown { ticket, .. }
            | LoadState::LoadFailed { ticket } => Some(*ticket),
        }
    }

    /// Native dimensions, known only after a successful load.
    pub fn native(&self) -> Option<Dimensions> {
        match self {
            LoadState::NativeDimensionsKnown { native, .. } => Some(*native),
            _ => None,
        }
    }
}

/// Keeps screen-space overlay boxes correct for one displayed image.
#[derive(Debug)]
pub struct AnnotationProjector {
    source: Option<String>,
    state: LoadState,
    next_ticket: u64,
    display: Dimensions,
    detections: Vec<DetectionRecord>,
    annotations: Vec<RenderedAnnotation>,
    revision: u64,
}

impl AnnotationProjector {
    /// Create a projector with no source, no detections and unknown display size.
    pub fn new() -> Self {
        Self {
            source: None,
            state: LoadState::NoSource,
            next_ticket: 1,
            display: Dimensions::unknown(),
            detections: Vec::new(),
            annotations: Vec::new(),
            revision: 0,
        }
    }

    /// Current image source, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Ticket of the current source, if any.
    pub fn current_ticket(&self) -> Option<LoadTicket> {
        self.state.ticket()
    }

    pub fn native_dimensions(&self) -> Option<Dimensions> {
        self.state.native()
    }

    pub fn display_dimensions(&self) -> Dimensions {
        self.display
    }

    pub fn detections(&self) -> &[DetectionRecord] {
        &self.detections
    }

    /// Render-ready annotations for the current inputs.
    ///
    /// Empty until the native size is known.
    pub fn annotations(&self) -> &[RenderedAnnotation] {
        &self.annotations
    }

    /// Counter bumped on every effective input change.
    ///
    /// Equal revisions guarantee equal [`annotations`](Self::annotations).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Switch to a new image source.
    ///
    /// Native dimensions become unknown and a fresh ticket is issued for the
    /// load. Setting the current source again is not a change and returns the
    /// existing ticket, even after `LoadFailed`; to retry a failed load, call
    /// [`clear_source`](Self::clear_source) first.
    pub fn on_image_source_change(&mut self, new_source: impl Into<String>) -> LoadTicket {
        let new_source = new_source.into();
        if self.source.as_deref() == Some(new_source.as_str()) {
            if let Some(ticket) = self.state.ticket() {
                log::trace!("Image source unchanged, keeping ticket {:?}", ticket);
                return ticket;
            }
        }

        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        log::info!("Image source changed, awaiting load (ticket {})", ticket.0);

        self.source = Some(new_source);
        self.state = LoadState::SourcePending { ticket };
        self.recompute();
        ticket
    }

    /// Drop the current source entirely (e.g. while an upload is processed).
    pub fn clear_source(&mut self) {
        if self.source.is_none() {
            return;
        }
        log::debug!("Image source cleared");
        self.source = None;
        self.state = LoadState::NoSource;
        self.recompute();
    }

    /// Record that the image for `ticket` finished loading.
    ///
    /// Works the same whether called right after the source change (resource
    /// already cached) or later. Returns `false` when the completion is stale
    /// or a duplicate and was discarded. An empty reported size counts as a
    /// failed load.
    pub fn on_image_load_complete(
        &mut self,
        ticket: LoadTicket,
        native_width: f32,
        native_height: f32,
    ) -> bool {
        if !self.is_pending(ticket) {
            log::debug!(
                "Discarding load completion for ticket {} (state {:?})",
                ticket.0,
                self.state
            );
            return false;
        }

        let native = Dimensions::new(native_width, native_height);
        if native.is_known() {
            log::debug!(
                "Image loaded: {}x{} (ticket {})",
                native_width,
                native_height,
                ticket.0
            );
            self.state = LoadState::NativeDimensionsKnown { ticket, native };
        } else {
            log::warn!(
                "Image reported empty size {}x{}, no annotations will be shown",
                native_width,
                native_height
            );
            self.state = LoadState::LoadFailed { ticket };
        }
        self.recompute();
        true
    }

    /// Record that the image for `ticket` failed to load.
    ///
    /// Returns `false` when the ticket is not the pending one.
    pub fn on_image_load_failed(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_pending(ticket) {
            log::debug!("Discarding load failure for ticket {}", ticket.0);
            return false;
        }
        log::warn!("Image failed to load (ticket {})", ticket.0);
        self.state = LoadState::LoadFailed { ticket };
        self.recompute();
        true
    }

    /// Update the on-screen size of the image element.
    ///
    /// Returns `true` if the size changed.
    pub fn on_display_resize(&mut self, width: f32, height: f32) -> bool {
        let display = Dimensions::new(width, height);
        if display == self.display {
            return false;
        }
        self.display = display;
        self.recompute();
        true
    }

    /// Replace the detection batch for the current image.
    pub fn set_detections(&mut self, detections: Vec<DetectionRecord>) {
        if detections == self.detections {
            return;
        }
        self.detections = detections;
        self.recompute();
    }

    /// Replace the detection batch from wire detections.
    pub fn set_detection_batch(&mut self, batch: &[Detection]) {
        self.set_detections(records_from_batch(batch));
    }

    fn is_pending(&self, ticket: LoadTicket) -> bool {
        matches!(self.state, LoadState::SourcePending { ticket: t } if t == ticket)
    }

    fn recompute(&mut self) {
        self.annotations = match self
            .state
            .native()
            .and_then(|native| scale_factors(native, self.display))
        {
            Some((scale_x, scale_y)) => self
                .detections
                .iter()
                .map(|d| {
                    RenderedAnnotation::new(d, project_box(&d.bounding_box, scale_x, scale_y))
                })
                .collect(),
            None => Vec::new(),
        };
        self.revision += 1;
    }
}

impl Default for AnnotationProjector {
    fn default() -> Self {
        Self::new()
    }
}
