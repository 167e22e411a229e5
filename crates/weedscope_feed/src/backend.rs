//! Wire types for the detection backend.
//!
//! Field names follow the backend's JSON keys (`imageUrl`, `droneLat`,
//! `weedType`, ...), so the structs rename on the serde side and keep Rust
//! naming in code.

use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// Bounding box in native image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDto {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One weed sighting as sent by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "box")]
    pub bbox: BoxDto,
    /// Classifier label; may be missing for unclassified sightings
    #[serde(rename = "weedType", default)]
    pub weed_type: Option<String>,
    pub confidence: f32,
    /// Latitude offset from the drone position
    #[serde(default)]
    pub lat_offset: f64,
    /// Longitude offset from the drone position
    #[serde(default)]
    pub lng_offset: f64,
}

/// Payload of `GET /latest_image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestImage {
    pub id: String,
    pub image_url: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub drone_lat: f64,
    pub drone_lng: f64,
    pub detections: Vec<Detection>,
}

/// Payload of `POST /upload_image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub detections: Vec<Detection>,
    pub drone_lat: f64,
    pub drone_lng: f64,
}

/// Request body of `POST /upload_image`.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRequest<'a> {
    /// Image encoded as a `data:` URL
    pub image: &'a str,
}

/// One entry of `GET /weed_locations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeedLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub weed_type: Option<String>,
    pub confidence: f32,
}

/// One entry of `GET /classified_weeds_summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeedTypeCount {
    #[serde(default)]
    pub weed_type: Option<String>,
    pub count: u32,
}

/// Check every detection of a batch for values the overlay cannot use.
pub fn validate_detections(detections: &[Detection]) -> Result<(), FeedError> {
    for (index, det) in detections.iter().enumerate() {
        if !(0.0..=1.0).contains(&det.confidence) {
            return Err(FeedError::ConfidenceOutOfRange {
                index,
                value: det.confidence,
            });
        }
        let b = det.bbox;
        if ![b.x, b.y, b.width, b.height].iter().all(|v| v.is_finite()) {
            return Err(FeedError::invalid_box(index, "non-finite coordinate"));
        }
        if b.width < 0.0 || b.height < 0.0 {
            return Err(FeedError::invalid_box(
                index,
                format!("negative extent {}x{}", b.width, b.height),
            ));
        }
    }
    Ok(())
}

/// Decode and validate a `latest_image` payload.
pub fn decode_latest_image(json: &str) -> Result<LatestImage, FeedError> {
    let image: LatestImage = serde_json::from_str(json)?;
    validate_detections(&image.detections)?;
    log::debug!(
        "Decoded image {} with {} detections",
        image.id,
        image.detections.len()
    );
    Ok(image)
}

/// Decode and validate an `upload_image` response.
pub fn decode_upload_response(json: &str) -> Result<UploadResponse, FeedError> {
    let response: UploadResponse = serde_json::from_str(json)?;
    validate_detections(&response.detections)?;
    Ok(response)
}

/// Decode a bare detection batch (a JSON array of detections).
pub fn decode_detections(json: &str) -> Result<Vec<Detection>, FeedError> {
    let detections: Vec<Detection> = serde_json::from_str(json)?;
    validate_detections(&detections)?;
    Ok(detections)
}

/// Decode the `weed_locations` list.
pub fn decode_weed_locations(json: &str) -> Result<Vec<WeedLocation>, FeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Decode the `classified_weeds_summary` list.
pub fn decode_summary(json: &str) -> Result<Vec<WeedTypeCount>, FeedError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LATEST: &str = r#"{
        "id": "img_2",
        "imageUrl": "https://via.placeholder.com/800x600/D3D3D3/000000?text=Drone+Image+2",
        "timestamp": "2025-06-01T12:00:00+00:00",
        "droneLat": 18.5902,
        "droneLng": -72.3298,
        "detections": [
            {"box": {"x": 50, "y": 100, "width": 150, "height": 100}, "weedType": "Goosegrass", "confidence": 0.95, "lat_offset": 0.0001, "lng_offset": -0.0002},
            {"box": {"x": 200, "y": 250, "width": 120, "height": 80}, "confidence": 0.88}
        ]
    }"#;

    #[test]
    fn test_decode_latest_image() {
        let image = decode_latest_image(LATEST).unwrap();
        assert_eq!(image.id, "img_2");
        assert_eq!(image.detections.len(), 2);
        assert_eq!(image.detections[0].weed_type.as_deref(), Some("Goosegrass"));
        assert_eq!(image.detections[0].bbox.width, 150.0);
        assert_eq!(image.detections[1].weed_type, None);
        assert_eq!(image.detections[1].lat_offset, 0.0);
    }

    #[test]
    fn test_confidence_out_of_range() {
        let json = r#"[{"box": {"x": 0, "y": 0, "width": 1, "height": 1}, "weedType": "x", "confidence": 1.5}]"#;
        match decode_detections(json) {
            Err(FeedError::ConfidenceOutOfRange { index, .. }) => assert_eq!(index, 0),
            other => panic!("Expected confidence error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_box_rejected() {
        let json = r#"[
            {"box": {"x": 0, "y": 0, "width": 1, "height": 1}, "confidence": 0.5},
            {"box": {"x": 0, "y": 0, "width": -4, "height": 1}, "confidence": 0.5}
        ]"#;
        assert!(matches!(
            decode_detections(json),
            Err(FeedError::InvalidBox { index: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            decode_latest_image("{not json"),
            Err(FeedError::Json(_))
        ));
    }

    #[test]
    fn test_summary_and_locations() {
        let summary =
            decode_summary(r#"[{"weedType": "Goosegrass", "count": 3}, {"count": 1}]"#).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[1].weed_type, None);

        let locations = decode_weed_locations(
            r#"[{"lat": 18.5, "lng": -72.3, "weedType": "Goosegrass", "confidence": 0.9}]"#,
        )
        .unwrap();
        assert_eq!(locations[0].lat, 18.5);
    }

    #[test]
    fn test_upload_request_body() {
        let body = serde_json::to_string(&UploadRequest {
            image: "data:image/png;base64,AAAA",
        })
        .unwrap();
        assert_eq!(body, r#"{"image":"data:image/png;base64,AAAA"}"#);
    }
}
