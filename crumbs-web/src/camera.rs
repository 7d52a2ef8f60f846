//! `getUserMedia` implementation of [`CaptureSurface`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crumbs_core::{CaptureError, CaptureSurface, Snapshot};
use js_sys::Reflect;
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use yew::NodeRef;

use crate::dom;

pub const SNAPSHOT_MIME: &str = "image/jpeg";

pub type FailureHandler = Rc<dyn Fn(CaptureError)>;

/// Rear camera streamed into a `<video>`, snapshotted through a `<canvas>`.
///
/// Permission prompts resolve after [`CaptureSurface::start_capture`]
/// returns, so late failures are reported through the failure handler.
#[derive(Clone)]
pub struct MediaCapture {
    video: NodeRef,
    canvas: NodeRef,
    stream: Rc<RefCell<Option<MediaStream>>>,
    generation: Rc<Cell<u64>>,
    on_failure: FailureHandler,
}

impl MediaCapture {
    pub fn new(video: NodeRef, canvas: NodeRef, on_failure: FailureHandler) -> Self {
        Self {
            video,
            canvas,
            stream: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
            on_failure,
        }
    }

    fn constraints() -> Result<MediaStreamConstraints, JsValue> {
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&dom::to_js(&json!({
            "facingMode": "environment",
            "width": { "ideal": 1920 },
            "height": { "ideal": 1080 }
        }))?);
        constraints.set_audio(&JsValue::FALSE);
        Ok(constraints)
    }
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

fn classify(err: &JsValue) -> CaptureError {
    let name = Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
        .unwrap_or_default();
    let message = dom::js_error_message(err);
    match name.as_str() {
        "NotAllowedError" | "SecurityError" => CaptureError::PermissionDenied(message),
        _ => CaptureError::Unavailable(message),
    }
}

fn encode_error(err: &JsValue) -> CaptureError {
    CaptureError::Encode(dom::js_error_message(err))
}

impl CaptureSurface for MediaCapture {
    fn start_capture(&mut self) -> Result<(), CaptureError> {
        let unavailable = |err: JsValue| CaptureError::Unavailable(dom::js_error_message(&err));
        let window = dom::window()
            .ok_or_else(|| CaptureError::Unavailable("no browser window".to_string()))?;
        let devices = window.navigator().media_devices().map_err(unavailable)?;
        let constraints = Self::constraints().map_err(unavailable)?;
        let request = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(unavailable)?;

        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        let current = Rc::clone(&self.generation);
        let slot = Rc::clone(&self.stream);
        let video = self.video.clone();
        let on_failure = Rc::clone(&self.on_failure);
        wasm_bindgen_futures::spawn_local(async move {
            let stream = match JsFuture::from(request).await {
                Ok(value) => value.unchecked_into::<MediaStream>(),
                Err(err) => {
                    let err = classify(&err);
                    log::error!("error accessing camera: {err}");
                    on_failure(err);
                    return;
                }
            };
            if current.get() != generation {
                log::debug!("camera closed before the stream arrived");
                stop_tracks(&stream);
                return;
            }
            if let Some(video) = video.cast::<HtmlVideoElement>() {
                video.set_src_object(Some(&stream));
            }
            slot.replace(Some(stream));
        });
        Ok(())
    }

    fn take_snapshot(&mut self) -> Result<Snapshot, CaptureError> {
        let video = self
            .video
            .cast::<HtmlVideoElement>()
            .ok_or(CaptureError::NoFrame)?;
        let canvas = self
            .canvas
            .cast::<HtmlCanvasElement>()
            .ok_or_else(|| CaptureError::Encode("canvas is not mounted".to_string()))?;
        let (width, height) = (video.video_width(), video.video_height());
        if width == 0 || height == 0 {
            return Err(CaptureError::NoFrame);
        }
        canvas.set_width(width);
        canvas.set_height(height);
        let context = canvas
            .get_context("2d")
            .map_err(|err| encode_error(&err))?
            .ok_or_else(|| CaptureError::Encode("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CaptureError::Encode("unexpected context type".to_string()))?;
        context
            .draw_image_with_html_video_element(&video, 0.0, 0.0)
            .map_err(|err| encode_error(&err))?;
        let data_url = canvas
            .to_data_url_with_type(SNAPSHOT_MIME)
            .map_err(|err| encode_error(&err))?;
        Ok(Snapshot {
            data_url,
            width,
            height,
        })
    }

    fn stop_capture(&mut self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        if let Some(stream) = self.stream.borrow_mut().take() {
            stop_tracks(&stream);
        }
        if let Some(video) = self.video.cast::<HtmlVideoElement>() {
            video.set_src_object(None);
        }
    }
}
