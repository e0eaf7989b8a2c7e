//! Camera capture, detection overlay, and server-side face verification.

pub mod capture;
pub mod client;
pub mod detector;
pub mod overlay;
pub mod types;

pub use detector::{FaceDetector, ModelLoader, detect_faces, load_models};
pub use overlay::{DrawSurface, draw_detections};
