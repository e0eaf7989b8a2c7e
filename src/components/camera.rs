//! Camera panel: live preview with a detection overlay, still capture, and
//! submission to the verification endpoint.
//!
//! Detection runs on a fixed interval while the camera is on. A tick is
//! skipped while the previous one is still running, and any detection error
//! just leaves the overlay empty for that frame.

use crate::{
    app::use_app,
    components::{Alert, AlertKind, Button, ButtonVariant, Spinner},
    features::face::{
        capture::{DEFAULT_FILENAME, capture_image_from_video, image_to_form_data},
        client::verify_face,
        detect_faces, draw_detections, load_models,
        overlay::CanvasSurface,
        types::VerificationResponse,
    },
};
use gloo_timers::callback::Interval;
use leptos::{html, prelude::*, task::spawn_local};
use std::{cell::Cell, rc::Rc};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack};

const DETECTION_INTERVAL_MS: u32 = 200;

async fn open_camera() -> Result<MediaStream, String> {
    let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| "camera access is not supported by this browser".to_string())?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    let pending = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|_| "camera request was rejected".to_string())?;
    JsFuture::from(pending)
        .await
        .map_err(|_| "camera permission denied".to_string())?
        .dyn_into::<MediaStream>()
        .map_err(|_| "camera returned no stream".to_string())
}

fn stop_stream(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// Ratio between the displayed preview and the video's native resolution.
fn display_scale(video: &HtmlVideoElement) -> Option<(f64, f64)> {
    let (native_w, native_h) = (video.video_width(), video.video_height());
    if native_w == 0 || native_h == 0 {
        return None;
    }
    Some((
        f64::from(video.client_width()) / f64::from(native_w),
        f64::from(video.client_height()) / f64::from(native_h),
    ))
}

#[component]
pub fn CameraPanel<F>(
    on_verified: F,
    #[prop(optional, into)] submit_label: Option<String>,
) -> impl IntoView
where
    F: Fn(VerificationResponse) + Clone + 'static,
{
    let app = use_app();
    let video_ref = NodeRef::<html::Video>::new();
    let canvas_ref = NodeRef::<html::Canvas>::new();

    let progress = RwSignal::new(0u8);
    let camera_on = RwSignal::new(false);
    let flip = RwSignal::new(true);
    let faces = RwSignal::new(0usize);
    let verifying = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let stream = StoredValue::new_local(None::<MediaStream>);
    let ticker = StoredValue::new_local(None::<Interval>);
    let submit_label = submit_label.unwrap_or_else(|| "Verify face".to_string());

    {
        let ctx = app.get_value();
        spawn_local(async move {
            let sources = ctx.config.model_sources();
            if let Err(err) = load_models(ctx.face.as_ref(), &sources, |value| progress.set(value)).await {
                warn!("{err}");
                error.set(Some("Failed to load the face detection models.".to_string()));
            }
        });
    }

    let stop_camera = move || {
        ticker.set_value(None);
        if let Some(active) = stream.get_value() {
            stop_stream(&active);
        }
        stream.set_value(None);
        camera_on.set(false);
        faces.set(0);
        let mut surface = canvas_ref.get_untracked().and_then(CanvasSurface::new);
        draw_detections(surface.as_mut(), &[], 1.0, 1.0);
    };

    let start_detection = move || {
        let face = app.get_value().face;
        let busy = Rc::new(Cell::new(false));
        let interval = Interval::new(DETECTION_INTERVAL_MS, move || {
            if busy.get() {
                return;
            }
            let (Some(video), Some(canvas)) = (video_ref.get_untracked(), canvas_ref.get_untracked())
            else {
                return;
            };
            let Some((scale_x, scale_y)) = display_scale(&video) else {
                return;
            };
            busy.set(true);
            let busy = Rc::clone(&busy);
            let face = Rc::clone(&face);
            spawn_local(async move {
                let element: &HtmlElement = video.as_ref();
                let detections = detect_faces(face.as_ref(), element).await;
                canvas.set_width(video.client_width().max(0).unsigned_abs());
                canvas.set_height(video.client_height().max(0).unsigned_abs());
                let mut surface = CanvasSurface::new(canvas);
                draw_detections(surface.as_mut(), &detections, scale_x, scale_y);
                faces.set(detections.len());
                busy.set(false);
            });
        });
        ticker.set_value(Some(interval));
    };

    let start_camera = move |_| {
        error.set(None);
        spawn_local(async move {
            match open_camera().await {
                Ok(opened) => {
                    if let Some(video) = video_ref.get_untracked() {
                        video.set_src_object(Some(&opened));
                        if let Ok(playing) = video.play() {
                            let _ = JsFuture::from(playing).await;
                        }
                    }
                    stream.set_value(Some(opened));
                    camera_on.set(true);
                    start_detection();
                }
                Err(reason) => {
                    debug!("camera unavailable: {reason}");
                    error.set(Some(reason));
                }
            }
        });
    };

    let on_capture = {
        let on_verified = on_verified.clone();
        move |_| {
            if verifying.get_untracked() {
                return;
            }
            let Some(video) = video_ref.get_untracked() else {
                return;
            };
            error.set(None);
            let upload = match capture_image_from_video(&video, flip.get_untracked())
                .and_then(|frame| image_to_form_data(&frame, DEFAULT_FILENAME))
            {
                Ok(upload) => upload,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            verifying.set(true);
            let ctx = app.get_value();
            let on_verified = on_verified.clone();
            spawn_local(async move {
                match verify_face(&ctx.gateway, upload).await {
                    Ok(response) => on_verified(response),
                    Err(err) => error.set(Some(err.to_string())),
                }
                verifying.set(false);
            });
        }
    };

    on_cleanup(move || {
        ticker.set_value(None);
        if let Some(active) = stream.get_value() {
            stop_stream(&active);
        }
    });

    let mirrored = move || if flip.get() { "transform: scaleX(-1);" } else { "" };

    view! {
        <div class="space-y-4">
            <div class="relative overflow-hidden rounded-lg bg-gray-900 aspect-video">
                <video
                    node_ref=video_ref
                    class="h-full w-full object-cover"
                    style=mirrored
                    autoplay
                    playsinline
                    muted
                ></video>
                <canvas
                    node_ref=canvas_ref
                    class="pointer-events-none absolute inset-0 h-full w-full"
                    style=mirrored
                ></canvas>
            </div>

            {move || {
                let value = progress.get();
                (value < 100 && error.get().is_none())
                    .then(|| view! { <Spinner label=format!("Loading face detection models… {value}%") /> })
            }}

            <div class="flex flex-wrap items-center gap-3">
                <Show
                    when=move || camera_on.get()
                    fallback=move || view! {
                        <Button
                            variant=ButtonVariant::Secondary
                            disabled=Signal::derive(move || progress.get() < 100)
                            {..}
                            on:click=start_camera
                        >
                            "Start camera"
                        </Button>
                    }
                >
                    <Button variant=ButtonVariant::Secondary {..} on:click=move |_| stop_camera()>
                        "Stop camera"
                    </Button>
                </Show>
                <label class="inline-flex items-center gap-2 text-sm text-gray-700 dark:text-gray-300">
                    <input
                        type="checkbox"
                        prop:checked=move || flip.get()
                        on:change=move |event| flip.set(event_target_checked(&event))
                    />
                    "Mirror preview"
                </label>
                <span class="text-sm text-gray-500 dark:text-gray-400">
                    {move || camera_on.get().then(|| format!("Faces detected: {}", faces.get()))}
                </span>
            </div>

            <Button
                disabled=Signal::derive(move || !camera_on.get() || verifying.get())
                {..}
                on:click=on_capture
            >
                {submit_label}
            </Button>
            {move || verifying.get().then(|| view! { <Spinner label="Verifying…" /> })}
            {move || {
                error
                    .get()
                    .map(|message| view! { <Alert kind=AlertKind::Error message=message /> })
            }}
        </div>
    }
}
