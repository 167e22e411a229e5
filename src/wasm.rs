use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;
use web_time::Instant;
use weedscope_feed::{
    Endpoint, UploadRequest, WeatherResource, decode_latest_image, decode_summary,
    decode_upload_response, decode_weed_locations,
};

use crate::config::AppConfig;
use crate::dashboard::{DashboardState, ImagePanel};
use crate::model::{recommendation_for, style_for_label};
use crate::poll::PollTimer;
use crate::projector::{AnnotationProjector, LoadTicket};
use crate::weather::FarmingTip;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load_from_local_storage().unwrap_or_default();
    let level = config
        .log_level
        .to_level_filter()
        .to_level()
        .unwrap_or(log::Level::Error);
    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::log_1(&format!("Logger already initialized: {}", e).into());
    }
    log::info!("weedscope WASM started");
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn ticket_from_js(ticket: f64) -> LoadTicket {
    LoadTicket::from_value(ticket as u64)
}

fn ticket_to_js(ticket: LoadTicket) -> f64 {
    ticket.value() as f64
}

/// Overlay state bound to one `<img>` element.
///
/// Load completion is observed through the element's `load`/`error` events;
/// an image that is already complete when its source is set is handled
/// synchronously. Window resizes re-read the element's on-screen size.
#[wasm_bindgen]
pub struct ImageOverlay {
    img: HtmlImageElement,
    projector: Rc<RefCell<AnnotationProjector>>,
    /// Closures stored to prevent deallocation while the element references them
    _onload: Option<Closure<dyn FnMut()>>,
    _onerror: Option<Closure<dyn FnMut()>>,
    onresize: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl ImageOverlay {
    #[wasm_bindgen(constructor)]
    pub fn new(img: HtmlImageElement) -> ImageOverlay {
        let projector = Rc::new(RefCell::new(AnnotationProjector::new()));
        let onresize = web_sys::window().map(|window| {
            let projector = Rc::clone(&projector);
            let img = img.clone();
            let closure = Closure::wrap(Box::new(move || {
                projector
                    .borrow_mut()
                    .on_display_resize(img.client_width() as f32, img.client_height() as f32);
            }) as Box<dyn FnMut()>);
            if let Err(e) = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            {
                log::warn!("Failed to watch window resize: {:?}", e);
            }
            closure
        });

        ImageOverlay {
            img,
            projector,
            _onload: None,
            _onerror: None,
            onresize,
        }
    }

    /// Point the element at a new image and start observing its load.
    pub fn set_source(&mut self, url: &str) {
        let previous = self.projector.borrow().current_ticket();
        let ticket = self.projector.borrow_mut().on_image_source_change(url);
        if previous == Some(ticket) {
            return;
        }

        let onload = {
            let projector = Rc::clone(&self.projector);
            let img = self.img.clone();
            Closure::wrap(Box::new(move || {
                projector.borrow_mut().on_image_load_complete(
                    ticket,
                    img.natural_width() as f32,
                    img.natural_height() as f32,
                );
                projector
                    .borrow_mut()
                    .on_display_resize(img.client_width() as f32, img.client_height() as f32);
            }) as Box<dyn FnMut()>)
        };
        let onerror = {
            let projector = Rc::clone(&self.projector);
            Closure::wrap(Box::new(move || {
                projector.borrow_mut().on_image_load_failed(ticket);
            }) as Box<dyn FnMut()>)
        };

        self.img.set_onload(Some(onload.as_ref().unchecked_ref()));
        self.img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        self._onload = Some(onload);
        self._onerror = Some(onerror);

        self.img.set_src(url);
        if self.img.complete() && self.img.natural_width() > 0 {
            self.complete_now(ticket);
        }
    }

    /// Replace detections from a JSON array of backend detections.
    pub fn set_detections_json(&mut self, json: &str) -> Result<(), JsValue> {
        let batch = weedscope_feed::decode_detections(json).map_err(to_js_error)?;
        self.projector.borrow_mut().set_detection_batch(&batch);
        Ok(())
    }

    /// Show a `latest_image` payload: source and detections together.
    pub fn set_latest_image_json(&mut self, json: &str) -> Result<(), JsValue> {
        let image = weedscope_feed::decode_latest_image(json).map_err(to_js_error)?;
        self.projector
            .borrow_mut()
            .set_detection_batch(&image.detections);
        self.set_source(&image.image_url);
        Ok(())
    }

    /// Re-read the element's on-screen size after a layout change that is
    /// not a window resize.
    pub fn sync_display_size(&mut self) -> bool {
        self.projector.borrow_mut().on_display_resize(
            self.img.client_width() as f32,
            self.img.client_height() as f32,
        )
    }

    /// Set the displayed size explicitly.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.projector.borrow_mut().on_display_resize(width, height)
    }

    /// Current annotations as a JSON array.
    pub fn annotations_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.projector.borrow().annotations()).map_err(to_js_error)
    }

    /// Changes whenever the annotations may have changed.
    pub fn revision(&self) -> f64 {
        self.projector.borrow().revision() as f64
    }
}

impl Drop for ImageOverlay {
    fn drop(&mut self) {
        if let (Some(window), Some(onresize)) = (web_sys::window(), &self.onresize) {
            let _ = window
                .remove_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref());
        }
    }
}

impl ImageOverlay {
    fn complete_now(&self, ticket: LoadTicket) {
        let mut projector = self.projector.borrow_mut();
        projector.on_image_load_complete(
            ticket,
            self.img.natural_width() as f32,
            self.img.natural_height() as f32,
        );
        projector.on_display_resize(
            self.img.client_width() as f32,
            self.img.client_height() as f32,
        );
    }
}

/// CSS color for a weed label (unknown labels get the fallback color).
#[wasm_bindgen]
pub fn weed_color(label: &str) -> String {
    style_for_label(label).css_color.to_string()
}

/// Treatment advice for a weed type as JSON.
#[wasm_bindgen]
pub fn treatment_json(weed_type: &str) -> Result<String, JsValue> {
    serde_json::to_string(recommendation_for(weed_type)).map_err(to_js_error)
}

/// Farming tip text for the current temperature and last-hour rain.
#[wasm_bindgen]
pub fn farming_tip(temp_c: f32, rain_mm_1h: f32) -> String {
    FarmingTip::for_conditions(temp_c, rain_mm_1h)
        .message()
        .to_string()
}

/// Dashboard state for the browser host.
///
/// The host owns the `fetch` calls and the `<img>` element: it asks which
/// feeds are due, fetches them, hands the JSON back, and reports image
/// load events with the ticket returned when the image was shown.
#[wasm_bindgen]
pub struct Dashboard {
    state: DashboardState,
    config: AppConfig,
    dashboard_timer: PollTimer,
    weather_timer: PollTimer,
}

#[wasm_bindgen]
impl Dashboard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Dashboard {
        let config = AppConfig::load_from_local_storage().unwrap_or_default();
        Dashboard {
            state: DashboardState::new(),
            dashboard_timer: config.dashboard_timer(),
            weather_timer: config.weather_timer(),
            config,
        }
    }

    // -------------------- Polling --------------------

    /// Whether the backend feeds should be fetched now.
    pub fn dashboard_due(&self) -> bool {
        self.dashboard_timer.is_due()
    }

    /// Whether the weather feeds should be fetched now. Always `false`
    /// without a usable API key.
    pub fn weather_due(&self) -> bool {
        self.config.weather.usable_api_key().is_some() && self.weather_timer.is_due()
    }

    /// Milliseconds until the next feed is due.
    pub fn ms_until_next_poll(&self) -> f64 {
        let now = Instant::now();
        let mut next = self.dashboard_timer.remaining_at(now);
        if self.config.weather.usable_api_key().is_some() {
            next = next.min(self.weather_timer.remaining_at(now));
        }
        next.as_millis() as f64
    }

    /// Start a backend refresh; returns the URLs to fetch as a JSON array.
    ///
    /// The latest image is skipped while an uploaded image is shown.
    pub fn begin_refresh(&mut self) -> Result<String, JsValue> {
        self.state.begin_refresh();
        self.dashboard_timer.mark_fired();
        let urls: Vec<String> = Endpoint::polled()
            .iter()
            .filter(|e| **e != Endpoint::LatestImage || self.state.wants_latest_image())
            .map(|e| self.config.backend.endpoint_url(*e))
            .collect();
        serde_json::to_string(&urls).map_err(to_js_error)
    }

    /// Start a weather refresh; returns `[current_url, forecast_url]`.
    pub fn begin_weather_refresh(&mut self) -> Result<String, JsValue> {
        let current = self
            .config
            .weather
            .request_url(WeatherResource::Current)
            .map_err(to_js_error)?;
        let forecast = self
            .config
            .weather
            .request_url(WeatherResource::Forecast)
            .map_err(to_js_error)?;
        self.weather_timer.mark_fired();
        serde_json::to_string(&[current, forecast]).map_err(to_js_error)
    }

    /// Make the backend feeds due immediately.
    pub fn refresh_now(&mut self) {
        self.dashboard_timer.reset();
    }

    /// Point the dashboard at another backend and persist the choice.
    pub fn set_backend_url(&mut self, url: &str) -> Result<(), JsValue> {
        self.config.backend.url = url.to_string();
        self.config.save_to_local_storage().map_err(to_js_error)?;
        self.dashboard_timer.reset();
        Ok(())
    }

    // -------------------- Feed results --------------------

    /// Show a `latest_image` payload. Returns the load ticket for the image,
    /// or `undefined` when an uploaded image is shown instead.
    pub fn apply_latest_image_json(&mut self, json: &str) -> Result<Option<f64>, JsValue> {
        let image = decode_latest_image(json).map_err(to_js_error)?;
        Ok(self.state.apply_latest_image(&image).map(ticket_to_js))
    }

    pub fn apply_locations_json(&mut self, json: &str) -> Result<(), JsValue> {
        let locations = decode_weed_locations(json).map_err(to_js_error)?;
        self.state.apply_locations(locations);
        Ok(())
    }

    pub fn apply_summary_json(&mut self, json: &str) -> Result<(), JsValue> {
        let summary = decode_summary(json).map_err(to_js_error)?;
        self.state.apply_summary(summary);
        Ok(())
    }

    /// Record that a backend fetch failed.
    pub fn apply_fetch_error(&mut self) {
        self.state.apply_fetch_error(&self.config.backend.url);
    }

    // -------------------- Uploads --------------------

    /// Start an upload; returns `[url, body]` for the POST request.
    pub fn begin_upload(&mut self, mime: &str, data_url: &str) -> Result<String, JsValue> {
        self.state
            .begin_upload(mime, data_url)
            .map_err(to_js_error)?;
        let body = serde_json::to_string(&UploadRequest { image: data_url }).map_err(to_js_error)?;
        let url = self.config.backend.endpoint_url(Endpoint::UploadImage);
        serde_json::to_string(&[url, body]).map_err(to_js_error)
    }

    /// Show the analysis of the uploaded image; returns its load ticket.
    pub fn complete_upload_json(&mut self, json: &str) -> Result<Option<f64>, JsValue> {
        let response = decode_upload_response(json).map_err(to_js_error)?;
        Ok(self.state.complete_upload(&response).map(ticket_to_js))
    }

    /// Record a failed upload; returns the load ticket of the placeholder image.
    pub fn fail_upload(&mut self) -> Option<f64> {
        self.state.fail_upload().map(ticket_to_js)
    }

    pub fn has_uploaded_image(&self) -> bool {
        self.state.has_uploaded_image()
    }

    /// Data URL of the image being uploaded, for an immediate preview.
    pub fn uploaded_preview(&self) -> Option<String> {
        self.state.uploaded_preview().map(str::to_string)
    }

    pub fn upload_error(&self) -> Option<String> {
        self.state.upload_error().map(str::to_string)
    }

    // -------------------- Image and overlay --------------------

    /// Source the host should display, if any.
    pub fn image_source(&self) -> Option<String> {
        self.state.projector().source().map(str::to_string)
    }

    pub fn image_loaded(&mut self, ticket: f64, width: f32, height: f32) -> bool {
        self.state
            .projector_mut()
            .on_image_load_complete(ticket_from_js(ticket), width, height)
    }

    pub fn image_failed(&mut self, ticket: f64) -> bool {
        self.state
            .projector_mut()
            .on_image_load_failed(ticket_from_js(ticket))
    }

    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.state.projector_mut().on_display_resize(width, height)
    }

    pub fn annotations_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.state.projector().annotations()).map_err(to_js_error)
    }

    pub fn revision(&self) -> f64 {
        self.state.projector().revision() as f64
    }

    /// Text for the image panel: progress, error or caption.
    pub fn status_text(&self) -> String {
        match self.state.image_panel() {
            ImagePanel::Processing => "Processing uploaded image...".to_string(),
            ImagePanel::Error(message) => message.to_string(),
            ImagePanel::Ready(origin) => origin.caption(),
            ImagePanel::Loading => "Loading latest drone image...".to_string(),
        }
    }

    // -------------------- Map and treatment --------------------

    pub fn locations_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.state.locations()).map_err(to_js_error)
    }

    pub fn summary_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.state.summary()).map_err(to_js_error)
    }

    pub fn treatment_options_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.treatment_options()).map_err(to_js_error)
    }

    pub fn select_weed_type(&mut self, weed_type: &str) {
        self.state.select_weed_type(weed_type);
    }

    pub fn selected_weed_type(&self) -> Option<String> {
        self.state.selected_weed_type().map(str::to_string)
    }

    /// Advice for the selected weed type, `null` until a summary arrived.
    pub fn recommendation_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.recommendation()).map_err(to_js_error)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}
