//! Shared UI components exported for routes and features.

pub(crate) mod camera;
pub(crate) mod layout;
pub(crate) mod notices;
pub(crate) mod ui;

pub(crate) use camera::CameraPanel;
pub(crate) use layout::AppShell;
pub(crate) use notices::{NoticeCenter, NoticeStack};
pub(crate) use ui::{Alert, AlertKind, Button, ButtonVariant, Spinner};
