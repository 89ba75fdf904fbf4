//! Tracking link generator

use leptos::*;

use crate::api::ApiClient;
use crate::model::GeneratedLink;
use crate::state::DashboardState;

#[component]
pub fn LinkPanel(state: RwSignal<DashboardState>) -> impl IntoView {
    let (generating, set_generating) = create_signal(false);

    let generate = move |_| {
        if generating.get_untracked() {
            return;
        }
        set_generating.set(true);

        spawn_local(async move {
            match ApiClient::new().generate_link().await {
                Ok(link) => state.update(|s| s.push_link(link)),
                Err(err) => {
                    gloo_console::error!("Error generating link:", err);
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message("Failed to generate tracking link");
                    }
                }
            }
            set_generating.set(false);
        });
    };

    view! {
        <button class="btn" disabled=generating on:click=generate>
            {move || if generating.get() { "Generating..." } else { "Generate Tracking Link" }}
        </button>
        <For
            each=move || state.with(|s| s.links())
            key=|link| link.driver_id.clone()
            children=|link| view! { <LinkItem link=link /> }
        />
    }
}

#[component]
fn LinkItem(link: GeneratedLink) -> impl IntoView {
    let url = link.tracking_link.clone();

    let copy = move |_| {
        let text = url.clone();
        spawn_local(async move {
            if let Some(window) = web_sys::window() {
                let clipboard = window.navigator().clipboard();
                let _ = wasm_bindgen_futures::JsFuture::from(clipboard.write_text(&text)).await;
            }
        });
    };

    view! {
        <div class="generated-link">
            <div class="link-url">{link.tracking_link.clone()}</div>
            <button class="copy-btn" on:click=copy>"Copy Link"</button>
            <div class="link-driver-id">{format!("Driver ID: {}", link.driver_id)}</div>
        </div>
    }
}
