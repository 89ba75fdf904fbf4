//! Header with connection badge and last push time

use chrono::Local;
use leptos::*;

use crate::state::{last_push_label, DashboardState};

#[component]
pub fn StatusBar(state: RwSignal<DashboardState>) -> impl IntoView {
    view! {
        <header class="header">
            <h1>"🚚 Driver Tracking Dashboard"</h1>
            <div class="status">
                <span>{move || state.with(|s| s.status().label())}</span>
                <span>{move || state.with(|s| last_push_label(s.last_push(), &Local))}</span>
            </div>
        </header>
    }
}
