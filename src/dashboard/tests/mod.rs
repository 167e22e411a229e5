//! Scenario tests for the dashboard state.

mod refresh_tests;

use weedscope_feed::{BoxDto, Detection, LatestImage, UploadResponse};

/// A latest-image payload with two detections, shaped like the backend's.
fn latest_image(id: &str) -> LatestImage {
    LatestImage {
        id: id.to_string(),
        image_url: format!("https://example.test/{}.jpg", id),
        timestamp: None,
        drone_lat: 18.5902,
        drone_lng: -72.3298,
        detections: vec![
            detection(50.0, 100.0, Some("Goosegrass")),
            detection(200.0, 250.0, Some("Nut Sedge")),
        ],
    }
}

fn detection(x: f32, y: f32, weed_type: Option<&str>) -> Detection {
    Detection {
        bbox: BoxDto {
            x,
            y,
            width: 100.0,
            height: 80.0,
        },
        weed_type: weed_type.map(str::to_string),
        confidence: 0.9,
        lat_offset: 0.0001,
        lng_offset: -0.0002,
    }
}

fn upload_response() -> UploadResponse {
    UploadResponse {
        detections: vec![detection(10.0, 20.0, Some("Water hyacinth"))],
        drone_lat: 18.6,
        drone_lng: -72.3,
    }
}
