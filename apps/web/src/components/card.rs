//! Card Components

use leptos::*;

/// Titled sidebar panel
#[component]
pub fn Card(title: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="card">
            <h2>{title}</h2>
            <div>
                {children()}
            </div>
        </div>
    }
}
