//! Alert banners for notices and inline errors. Messages must be safe to render
//! and should never include secrets or tokens.

use crate::app_lib::notify::NoticeLevel;
use leptos::prelude::*;

#[derive(Clone, Copy)]
/// Supported alert styles.
pub enum AlertKind {
    Error,
    Warning,
    Success,
    Info,
}

impl From<NoticeLevel> for AlertKind {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Success => Self::Success,
            NoticeLevel::Info => Self::Info,
            NoticeLevel::Warning => Self::Warning,
            NoticeLevel::Error => Self::Error,
        }
    }
}

/// Renders a styled alert banner with an optional bold title.
#[component]
pub fn Alert(
    kind: AlertKind,
    message: String,
    #[prop(optional, into)] title: Option<String>,
) -> impl IntoView {
    let class = match kind {
        AlertKind::Error => {
            "rounded-lg border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-700 dark:border-red-400 dark:bg-red-900/30 dark:text-red-200"
        }
        AlertKind::Warning => {
            "rounded-lg border border-amber-200 bg-amber-50 px-4 py-3 text-sm text-amber-800 dark:border-amber-400 dark:bg-amber-900/30 dark:text-amber-200"
        }
        AlertKind::Success => {
            "rounded-lg border border-emerald-200 bg-emerald-50 px-4 py-3 text-sm text-emerald-700 dark:border-emerald-400 dark:bg-emerald-900/30 dark:text-emerald-200"
        }
        AlertKind::Info => {
            "rounded-lg border border-blue-200 bg-blue-50 px-4 py-3 text-sm text-blue-700 dark:border-blue-400 dark:bg-blue-900/30 dark:text-blue-200"
        }
    };

    view! {
        <div class=class role="alert">
            {title.map(|title| view! { <p class="font-semibold">{title}</p> })}
            <p>{message}</p>
        </div>
    }
}
