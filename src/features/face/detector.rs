//! Seam around the external face-detection library. The library is loaded by a
//! `<script>` tag and exposed as the global `faceapi`; only two of its calls
//! are used: loading the tiny face detector weights and `detectAllFaces`.
//!
//! Model loading is a two-stage protocol: each configured source is tried in
//! order and [`ModelLoadError`] is returned only after every source failed.

use crate::features::face::types::DetectionBox;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DetectionError {
    #[error("face detection models are not loaded")]
    NotLoaded,
    #[error("face detection failed: {0}")]
    Library(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelLoadAttempt {
    pub source: String,
    pub reason: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModelLoadError {
    #[error("face detection library is not available")]
    LibraryUnavailable,
    #[error("no face detection model sources are configured")]
    NoSources,
    #[error("failed to load face detection models: {}", describe_attempts(.0))]
    AllSourcesFailed(Vec<ModelLoadAttempt>),
}

fn describe_attempts(attempts: &[ModelLoadAttempt]) -> String {
    attempts
        .iter()
        .map(|attempt| format!("{} ({})", attempt.source, attempt.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelsReady {
    AlreadyLoaded,
    LoadedFrom(String),
}

#[allow(async_fn_in_trait)]
pub trait ModelLoader {
    fn library_available(&self) -> bool;
    fn models_loaded(&self) -> bool;
    async fn load_from(&self, source: &str) -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait FaceDetector {
    type Input: ?Sized;

    async fn detect_all(&self, input: &Self::Input) -> Result<Vec<DetectionBox>, DetectionError>;
}

/// Loads the detector weights from the first source that works.
///
/// `on_progress` receives 25 once the library is present and 100 when a
/// source succeeded.
pub async fn load_models<L: ModelLoader>(
    loader: &L,
    sources: &[String],
    mut on_progress: impl FnMut(u8),
) -> Result<ModelsReady, ModelLoadError> {
    if loader.models_loaded() {
        on_progress(100);
        return Ok(ModelsReady::AlreadyLoaded);
    }
    if !loader.library_available() {
        return Err(ModelLoadError::LibraryUnavailable);
    }
    if sources.is_empty() {
        return Err(ModelLoadError::NoSources);
    }
    on_progress(25);

    let mut attempts = Vec::with_capacity(sources.len());
    for source in sources {
        match loader.load_from(source).await {
            Ok(()) => {
                info!(source = source.as_str(), "face detection models loaded");
                on_progress(100);
                return Ok(ModelsReady::LoadedFrom(source.clone()));
            }
            Err(reason) => {
                warn!(source = source.as_str(), "model source failed: {reason}");
                attempts.push(ModelLoadAttempt {
                    source: source.clone(),
                    reason,
                });
            }
        }
    }

    Err(ModelLoadError::AllSourcesFailed(attempts))
}

/// Runs detection and degrades any failure to "no faces this frame".
pub async fn detect_faces<D: FaceDetector>(detector: &D, input: &D::Input) -> Vec<DetectionBox> {
    match detector.detect_all(input).await {
        Ok(detections) => detections,
        Err(err) => {
            debug!("detection skipped: {err}");
            Vec::new()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::FaceApi;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{DetectionError, FaceDetector, ModelLoader};
    use crate::features::face::types::DetectionBox;
    use js_sys::{Array, Function, Promise, Reflect};
    use std::cell::Cell;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    /// Binding to the global `faceapi` object.
    #[derive(Default)]
    pub struct FaceApi {
        loaded: Cell<bool>,
    }

    impl FaceApi {
        pub fn new() -> Self {
            Self::default()
        }

        fn library() -> Option<JsValue> {
            let library = Reflect::get(&js_sys::global(), &JsValue::from_str("faceapi")).ok()?;
            (!library.is_undefined() && !library.is_null()).then_some(library)
        }
    }

    fn describe(value: JsValue) -> String {
        value
            .as_string()
            .or_else(|| {
                Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|message| message.as_string())
            })
            .unwrap_or_else(|| "unknown error".to_string())
    }

    fn property(target: &JsValue, key: &str) -> Result<JsValue, String> {
        let value = Reflect::get(target, &JsValue::from_str(key)).map_err(describe)?;
        if value.is_undefined() || value.is_null() {
            Err(format!("faceapi.{key} is missing"))
        } else {
            Ok(value)
        }
    }

    fn function(target: &JsValue, key: &str) -> Result<Function, String> {
        property(target, key)?
            .dyn_into::<Function>()
            .map_err(|_| format!("faceapi.{key} is not a function"))
    }

    impl ModelLoader for FaceApi {
        fn library_available(&self) -> bool {
            Self::library().is_some()
        }

        fn models_loaded(&self) -> bool {
            self.loaded.get()
        }

        async fn load_from(&self, source: &str) -> Result<(), String> {
            let library = Self::library().ok_or_else(|| "faceapi is not loaded".to_string())?;
            let net = property(&property(&library, "nets")?, "tinyFaceDetector")?;
            let load = function(&net, "loadFromUri")?;
            let pending = load
                .call1(&net, &JsValue::from_str(source))
                .map_err(describe)?;
            JsFuture::from(Promise::resolve(&pending))
                .await
                .map_err(describe)?;
            self.loaded.set(true);
            Ok(())
        }
    }

    impl FaceDetector for FaceApi {
        type Input = web_sys::HtmlElement;

        async fn detect_all(
            &self,
            input: &web_sys::HtmlElement,
        ) -> Result<Vec<DetectionBox>, DetectionError> {
            if !self.loaded.get() {
                return Err(DetectionError::NotLoaded);
            }
            let library = Self::library().ok_or(DetectionError::NotLoaded)?;

            let options_ctor =
                function(&library, "TinyFaceDetectorOptions").map_err(DetectionError::Library)?;
            let options = Reflect::construct(&options_ctor, &Array::new())
                .map_err(|err| DetectionError::Library(describe(err)))?;
            let detect = function(&library, "detectAllFaces").map_err(DetectionError::Library)?;
            // `detectAllFaces` returns a thenable task, not a `Promise` instance.
            let task = detect
                .call2(&library, input.as_ref(), &options)
                .map_err(|err| DetectionError::Library(describe(err)))?;
            let result = JsFuture::from(Promise::resolve(&task))
                .await
                .map_err(|err| DetectionError::Library(describe(err)))?;

            let detections: Array = result
                .dyn_into()
                .map_err(|_| DetectionError::Library("unexpected detection result".to_string()))?;
            detections.iter().map(|detection| read_box(&detection)).collect()
        }
    }

    fn read_box(detection: &JsValue) -> Result<DetectionBox, DetectionError> {
        let rect = property(detection, "box").map_err(DetectionError::Library)?;
        let number = |key: &str| {
            Reflect::get(&rect, &JsValue::from_str(key))
                .ok()
                .and_then(|value| value.as_f64())
                .ok_or_else(|| DetectionError::Library(format!("detection box has no {key}")))
        };
        Ok(DetectionBox {
            x: number("x")?,
            y: number("y")?,
            width: number("width")?,
            height: number("height")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct ScriptedLoader {
        library: bool,
        working_source: Option<&'static str>,
        loaded: Cell<bool>,
        tried: RefCell<Vec<String>>,
    }

    impl ModelLoader for ScriptedLoader {
        fn library_available(&self) -> bool {
            self.library
        }

        fn models_loaded(&self) -> bool {
            self.loaded.get()
        }

        async fn load_from(&self, source: &str) -> Result<(), String> {
            self.tried.borrow_mut().push(source.to_string());
            if self.working_source == Some(source) {
                self.loaded.set(true);
                Ok(())
            } else {
                Err("404".to_string())
            }
        }
    }

    fn sources() -> Vec<String> {
        vec!["/models".to_string(), "https://cdn.example/weights".to_string()]
    }

    #[tokio::test]
    async fn primary_source_wins_when_it_loads() {
        let loader = ScriptedLoader {
            library: true,
            working_source: Some("/models"),
            ..ScriptedLoader::default()
        };
        let mut progress = Vec::new();

        let ready = load_models(&loader, &sources(), |value| progress.push(value))
            .await
            .unwrap();

        assert_eq!(ready, ModelsReady::LoadedFrom("/models".to_string()));
        assert_eq!(progress, vec![25, 100]);
        assert_eq!(loader.tried.borrow().len(), 1);
    }

    #[tokio::test]
    async fn falls_back_to_secondary_source() {
        let loader = ScriptedLoader {
            library: true,
            working_source: Some("https://cdn.example/weights"),
            ..ScriptedLoader::default()
        };

        let ready = load_models(&loader, &sources(), |_| {}).await.unwrap();

        assert_eq!(
            ready,
            ModelsReady::LoadedFrom("https://cdn.example/weights".to_string())
        );
        assert_eq!(*loader.tried.borrow(), sources());
    }

    #[tokio::test]
    async fn reports_every_failed_source() {
        let loader = ScriptedLoader {
            library: true,
            ..ScriptedLoader::default()
        };

        let err = load_models(&loader, &sources(), |_| {}).await.unwrap_err();

        match &err {
            ModelLoadError::AllSourcesFailed(attempts) => assert_eq!(attempts.len(), 2),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "failed to load face detection models: /models (404), https://cdn.example/weights (404)"
        );
    }

    #[tokio::test]
    async fn missing_library_is_fatal() {
        let loader = ScriptedLoader::default();
        assert_eq!(
            load_models(&loader, &sources(), |_| {}).await,
            Err(ModelLoadError::LibraryUnavailable)
        );
    }

    #[tokio::test]
    async fn already_loaded_is_a_no_op() {
        let loader = ScriptedLoader {
            library: true,
            loaded: Cell::new(true),
            ..ScriptedLoader::default()
        };

        let ready = load_models(&loader, &sources(), |_| {}).await.unwrap();

        assert_eq!(ready, ModelsReady::AlreadyLoaded);
        assert!(loader.tried.borrow().is_empty());
    }

    struct FixedDetector(Result<Vec<DetectionBox>, DetectionError>);

    impl FaceDetector for FixedDetector {
        type Input = ();

        async fn detect_all(&self, _input: &()) -> Result<Vec<DetectionBox>, DetectionError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn detection_failure_yields_no_boxes() {
        let failing = FixedDetector(Err(DetectionError::Library("webgl lost".to_string())));
        assert!(detect_faces(&failing, &()).await.is_empty());

        let not_loaded = FixedDetector(Err(DetectionError::NotLoaded));
        assert!(detect_faces(&not_loaded, &()).await.is_empty());
    }

    #[tokio::test]
    async fn detection_success_passes_boxes_through() {
        let boxes = vec![DetectionBox::new(1.0, 2.0, 3.0, 4.0)];
        let detector = FixedDetector(Ok(boxes.clone()));
        assert_eq!(detect_faces(&detector, &()).await, boxes);
    }
}
