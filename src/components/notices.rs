//! Transient notice toasts. Session and guard code reports through the
//! [`Notifier`] trait; this is its browser implementation.

use crate::{
    app::use_app,
    app_lib::notify::{Notice, Notifier},
    components::{Alert, AlertKind},
};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct NoticeCenter {
    items: RwSignal<Vec<(u64, Notice)>>,
    next_id: StoredValue<u64>,
}

impl NoticeCenter {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    /// Shows a notice and schedules its removal.
    pub fn push(&self, notice: Notice) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id.wrapping_add(1));
        let duration = notice.duration_ms();
        self.items.update(|items| items.push((id, notice)));

        let center = *self;
        Timeout::new(duration, move || center.dismiss(id)).forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|(item, _)| *item != id));
    }
}

impl Notifier for NoticeCenter {
    fn notify(&self, notice: Notice) {
        self.push(notice);
    }
}

#[component]
pub fn NoticeStack() -> impl IntoView {
    let center = use_app().get_value().notices;

    view! {
        <div class="fixed top-4 right-4 z-50 flex w-80 flex-col gap-2" aria-live="polite">
            <For
                each=move || center.items.get()
                key=|(id, _)| *id
                children=move |(id, notice)| {
                    view! {
                        <div class="shadow-md" on:click=move |_| center.dismiss(id)>
                            <Alert
                                kind=AlertKind::from(notice.level)
                                title=notice.title
                                message=notice.message
                            />
                        </div>
                    }
                }
            />
        </div>
    }
}
