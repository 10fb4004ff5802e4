//! Rear camera acquisition and release.

use js_sys::{Object, Reflect};
use scene::session::MediaError;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{DomException, HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack, Window};

use crate::error::describe;

const IDEAL_WIDTH: u32 = 1280;
const IDEAL_HEIGHT: u32 = 720;

/// Map a rejected `getUserMedia` promise onto the media error taxonomy.
fn classify(err: JsValue) -> MediaError {
    match err.dyn_ref::<DomException>() {
        Some(dom) => MediaError::from_dom_name(&dom.name(), &dom.message()),
        None => MediaError::Other(describe(&err)),
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), MediaError> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ()).map_err(classify)
}

fn ideal(value: u32) -> Result<Object, MediaError> {
    let constraint = Object::new();
    set(&constraint, "ideal", &JsValue::from(value))?;
    Ok(constraint)
}

/// `{ facingMode: "environment", width: { ideal: 1280 }, height: { ideal: 720 } }`
fn video_constraints() -> Result<Object, MediaError> {
    let video = Object::new();
    set(&video, "facingMode", &JsValue::from_str("environment"))?;
    set(&video, "width", &ideal(IDEAL_WIDTH)?.into())?;
    set(&video, "height", &ideal(IDEAL_HEIGHT)?.into())?;
    Ok(video)
}

/// Request the rear-facing camera.
///
/// # Errors
///
/// Returns `Unsupported` when the page has no media devices, otherwise the
/// classified rejection of `getUserMedia`.
pub async fn acquire_rear_camera(window: &Window) -> Result<MediaStream, MediaError> {
    let devices = window.navigator().media_devices().map_err(|_| MediaError::Unsupported)?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video_constraints()?.into());
    constraints.set_audio(&JsValue::FALSE);
    let promise = devices.get_user_media_with_constraints(&constraints).map_err(classify)?;
    let stream = JsFuture::from(promise).await.map_err(classify)?;
    stream
        .dyn_into::<MediaStream>()
        .map_err(|value| MediaError::Other(format!("unexpected getUserMedia result: {}", describe(&value))))
}

/// Show `stream` in `video`, muted and inline.
///
/// # Errors
///
/// Returns `Other` if playback cannot be started.
pub fn attach(video: &HtmlVideoElement, stream: &MediaStream) -> Result<(), MediaError> {
    video.set_muted(true);
    video.set_attribute("playsinline", "").map_err(classify)?;
    video.set_src_object(Some(stream));
    video.play().map(|_| ()).map_err(classify)
}

/// Stop every track of `stream` and detach it from `video`.
pub fn release(stream: &MediaStream, video: Option<&HtmlVideoElement>) {
    for track in stream.get_tracks().iter() {
        match track.dyn_into::<MediaStreamTrack>() {
            Ok(track) => track.stop(),
            Err(value) => log::warn!("skipping non-track entry: {}", describe(&value)),
        }
    }
    if let Some(video) = video {
        video.set_src_object(None);
    }
    log::info!("camera stream released");
}
