//! Dashboard state fed by backend fetches and image uploads.
//!
//! The host performs the HTTP requests and hands the decoded results to
//! [`DashboardState`]; everything here runs on the UI thread.

use thiserror::Error;
use weedscope_feed::{LatestImage, UploadResponse, WeedLocation, WeedTypeCount};

use crate::constants::{IMAGE_MIME_PREFIX, UPLOAD_ERROR_IMAGE_URL};
use crate::model::{Recommendation, UNKNOWN_WEED, recommendation_for};
use crate::projector::{AnnotationProjector, LoadTicket};
use crate::summary::{TreatmentSelection, locate_detections, selectable_types};

#[cfg(test)]
mod tests;

/// Where the displayed image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrigin {
    LatestDrone,
    Uploaded,
}

impl ImageOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            ImageOrigin::LatestDrone => "latest drone",
            ImageOrigin::Uploaded => "uploaded",
        }
    }

    /// Caption under the image, e.g. `Displaying data for the uploaded image.`
    pub fn caption(&self) -> String {
        format!("Displaying data for the {} image.", self.label())
    }
}

/// What the image panel should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePanel<'a> {
    /// An upload is being processed
    Processing,
    /// The last dashboard fetch failed
    Error(&'a str),
    /// An image (and its overlay) is available
    Ready(ImageOrigin),
    /// Nothing fetched yet
    Loading,
}

/// Reasons an upload is refused before it is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please upload an image file (e.g., JPEG, PNG).")]
    NotAnImage { mime: String },

    #[error("An upload is already in progress.")]
    Busy,
}

/// Message shown when the upload request fails.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload image for processing. Please try again.";

/// Message shown when the dashboard refresh fails.
pub fn fetch_error_message(backend_url: &str) -> String {
    format!(
        "Failed to load dashboard data. Is the backend running at {}?",
        backend_url
    )
}

/// State behind the dashboard: image overlay, map points, summary, uploads.
#[derive(Debug, Default)]
pub struct DashboardState {
    projector: AnnotationProjector,
    image_origin: Option<ImageOrigin>,
    locations: Vec<WeedLocation>,
    summary: Vec<WeedTypeCount>,
    selection: TreatmentSelection,
    fetch_error: Option<String>,
    uploading: bool,
    upload_error: Option<String>,
    uploaded_preview: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projector(&self) -> &AnnotationProjector {
        &self.projector
    }

    /// Mutable access for image load and resize events.
    pub fn projector_mut(&mut self) -> &mut AnnotationProjector {
        &mut self.projector
    }

    pub fn locations(&self) -> &[WeedLocation] {
        &self.locations
    }

    pub fn summary(&self) -> &[WeedTypeCount] {
        &self.summary
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Whether an uploaded image is being shown instead of the drone feed.
    pub fn has_uploaded_image(&self) -> bool {
        self.uploaded_preview.is_some()
    }

    // -------------------- Dashboard refresh --------------------

    /// Start a refresh cycle: clears the previous fetch error.
    pub fn begin_refresh(&mut self) {
        self.fetch_error = None;
    }

    /// Whether the refresh should fetch the latest drone image.
    ///
    /// An uploaded image (or one being processed) takes precedence.
    pub fn wants_latest_image(&self) -> bool {
        self.uploaded_preview.is_none() && !self.uploading
    }

    /// Show the latest drone capture. Returns the load ticket for the image,
    /// or `None` if the payload was ignored because an upload is showing.
    pub fn apply_latest_image(&mut self, image: &LatestImage) -> Option<LoadTicket> {
        if !self.wants_latest_image() {
            log::debug!("Ignoring latest image {} while an upload is shown", image.id);
            return None;
        }
        let ticket = self.show_image(&image.image_url, image);
        self.image_origin = Some(ImageOrigin::LatestDrone);
        Some(ticket)
    }

    fn show_image(&mut self, url: &str, image: &LatestImage) -> LoadTicket {
        let ticket = self.projector.on_image_source_change(url);
        self.projector.set_detection_batch(&image.detections);
        ticket
    }

    /// Replace the map points with the backend's aggregated list.
    pub fn apply_locations(&mut self, locations: Vec<WeedLocation>) {
        self.locations = locations;
    }

    /// Replace the per-type summary; selects a default weed type if none is chosen.
    pub fn apply_summary(&mut self, summary: Vec<WeedTypeCount>) {
        self.selection.sync_with(&summary);
        self.summary = summary;
    }

    /// Record a failed refresh.
    pub fn apply_fetch_error(&mut self, backend_url: &str) {
        let message = fetch_error_message(backend_url);
        log::warn!("{}", message);
        self.fetch_error = Some(message);
    }

    // -------------------- Uploads --------------------

    /// Start processing a user-chosen image.
    ///
    /// Non-image MIME types are refused. On success the current image is
    /// cleared and `data_url` becomes the preview.
    pub fn begin_upload(
        &mut self,
        mime: &str,
        data_url: impl Into<String>,
    ) -> Result<(), UploadError> {
        if self.uploading {
            return Err(UploadError::Busy);
        }
        if !mime.starts_with(IMAGE_MIME_PREFIX) {
            let err = UploadError::NotAnImage {
                mime: mime.to_string(),
            };
            self.upload_error = Some(err.to_string());
            return Err(err);
        }

        self.uploading = true;
        self.upload_error = None;
        self.uploaded_preview = Some(data_url.into());
        self.image_origin = None;
        self.projector.clear_source();
        Ok(())
    }

    /// The preview of the image being uploaded, as a data URL.
    pub fn uploaded_preview(&self) -> Option<&str> {
        self.uploaded_preview.as_deref()
    }

    /// Show the backend's analysis of the uploaded image and add its
    /// detections to the map.
    pub fn complete_upload(&mut self, response: &UploadResponse) -> Option<LoadTicket> {
        if !self.uploading {
            log::warn!("Upload response received without a pending upload");
            return None;
        }
        self.uploading = false;
        let url = self.uploaded_preview.clone().unwrap_or_default();

        let ticket = self.projector.on_image_source_change(url);
        self.projector.set_detection_batch(&response.detections);
        self.image_origin = Some(ImageOrigin::Uploaded);

        self.locations.extend(locate_detections(
            response.drone_lat,
            response.drone_lng,
            &response.detections,
        ));
        Some(ticket)
    }

    /// Record a failed upload: shows the error placeholder image without detections.
    pub fn fail_upload(&mut self) -> Option<LoadTicket> {
        if !self.uploading {
            return None;
        }
        self.uploading = false;
        self.upload_error = Some(UPLOAD_FAILED_MESSAGE.to_string());
        log::warn!("{}", UPLOAD_FAILED_MESSAGE);

        let ticket = self.projector.on_image_source_change(UPLOAD_ERROR_IMAGE_URL);
        self.projector.set_detections(Vec::new());
        self.image_origin = Some(ImageOrigin::Uploaded);
        Some(ticket)
    }

    // -------------------- Panels --------------------

    /// Status of the image panel, in priority order.
    pub fn image_panel(&self) -> ImagePanel<'_> {
        if self.uploading {
            ImagePanel::Processing
        } else if let Some(error) = &self.fetch_error {
            ImagePanel::Error(error)
        } else if let Some(origin) = self.image_origin {
            ImagePanel::Ready(origin)
        } else {
            ImagePanel::Loading
        }
    }

    /// Weed types offered by the treatment selector.
    pub fn treatment_options(&self) -> Vec<String> {
        selectable_types(&self.summary)
    }

    pub fn select_weed_type(&mut self, weed_type: impl Into<String>) {
        self.selection.select(weed_type);
    }

    pub fn selected_weed_type(&self) -> Option<&str> {
        self.selection.selected()
    }

    /// Advice for the selected weed type; `None` until a summary arrived.
    pub fn recommendation(&self) -> Option<&'static Recommendation> {
        if self.summary.is_empty() {
            return None;
        }
        Some(recommendation_for(
            self.selection.selected().unwrap_or(UNKNOWN_WEED),
        ))
    }
}
