//! Tests for the periodic dashboard refresh.

use weedscope_feed::WeedTypeCount;

use super::latest_image;
use crate::dashboard::{DashboardState, ImageOrigin, ImagePanel, fetch_error_message};
use crate::model::UNKNOWN_WEED;
use crate::projector::LoadState;

#[test]
fn test_initial_panel_is_loading() {
    let state = DashboardState::new();
    assert_eq!(state.image_panel(), ImagePanel::Loading);
    assert!(state.wants_latest_image());
    assert!(state.recommendation().is_none());
}

#[test]
fn test_latest_image_feeds_projector() {
    let mut state = DashboardState::new();
    let ticket = state.apply_latest_image(&latest_image("img_001")).unwrap();

    assert_eq!(state.image_panel(), ImagePanel::Ready(ImageOrigin::LatestDrone));
    assert_eq!(
        state.projector().source(),
        Some("https://example.test/img_001.jpg")
    );
    assert_eq!(state.projector().detections().len(), 2);
    // Nothing to draw until the image reports its size
    assert!(state.projector().annotations().is_empty());

    let projector = state.projector_mut();
    projector.on_display_resize(400.0, 300.0);
    assert!(projector.on_image_load_complete(ticket, 800.0, 600.0));
    let anns = projector.annotations();
    assert_eq!(anns.len(), 2);
    assert_eq!(anns[0].rect.left, 25.0);
    assert_eq!(anns[1].display_name, UNKNOWN_WEED);
}

#[test]
fn test_refresh_with_same_image_keeps_load() {
    let mut state = DashboardState::new();
    let ticket = state.apply_latest_image(&latest_image("img_001")).unwrap();
    state
        .projector_mut()
        .on_image_load_complete(ticket, 800.0, 600.0);

    // The next poll returns the same capture
    let again = state.apply_latest_image(&latest_image("img_001")).unwrap();
    assert_eq!(again, ticket);
    assert!(matches!(
        state.projector().state(),
        LoadState::NativeDimensionsKnown { .. }
    ));
}

#[test]
fn test_new_capture_invalidates_previous_load() {
    let mut state = DashboardState::new();
    let first = state.apply_latest_image(&latest_image("img_001")).unwrap();
    let second = state.apply_latest_image(&latest_image("img_002")).unwrap();

    // The first image finishes loading after the second poll
    assert!(
        !state
            .projector_mut()
            .on_image_load_complete(first, 800.0, 600.0)
    );
    assert_eq!(
        state.projector().state(),
        LoadState::SourcePending { ticket: second }
    );
}

#[test]
fn test_fetch_error_and_recovery() {
    let mut state = DashboardState::new();
    state.apply_latest_image(&latest_image("img_001"));

    state.begin_refresh();
    state.apply_fetch_error("http://localhost:5000/api");
    assert_eq!(
        state.image_panel(),
        ImagePanel::Error(&fetch_error_message("http://localhost:5000/api"))
    );
    assert_eq!(
        state.fetch_error(),
        Some("Failed to load dashboard data. Is the backend running at http://localhost:5000/api?")
    );

    state.begin_refresh();
    assert_eq!(state.image_panel(), ImagePanel::Ready(ImageOrigin::LatestDrone));
}

#[test]
fn test_summary_selects_default_and_recommends() {
    let mut state = DashboardState::new();
    state.apply_summary(vec![
        WeedTypeCount {
            weed_type: Some("Goosegrass".into()),
            count: 3,
        },
        WeedTypeCount {
            weed_type: Some("Broadleaf Weed".into()),
            count: 1,
        },
    ]);

    assert_eq!(state.selected_weed_type(), Some("Goosegrass"));
    assert_eq!(state.treatment_options(), vec!["Goosegrass", "Broadleaf Weed"]);
    assert_eq!(state.recommendation().unwrap().weed_type, "Goosegrass");

    state.select_weed_type("Broadleaf Weed");
    assert_eq!(state.recommendation().unwrap().weed_type, UNKNOWN_WEED);
}
