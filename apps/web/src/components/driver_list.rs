//! Active driver list

use chrono::Local;
use leptos::*;

use crate::model::DriverSnapshot;
use crate::state::{last_update_label, status_label, DashboardState};

/// Sidebar list of active drivers; `on_select` receives the clicked driver id
#[component]
pub fn DriverList<F>(state: RwSignal<DashboardState>, on_select: F) -> impl IntoView
where
    F: Fn(String) + Clone + 'static,
{
    let drivers = move || state.with(|s| s.drivers().to_vec());

    view! {
        <div class="driver-list">
            <Show
                when=move || state.with(|s| !s.drivers().is_empty())
                fallback=|| view! { <p class="empty">"No active drivers"</p> }
            >
                <For
                    each=drivers
                    key=DriverSnapshot::render_key
                    children={
                        let on_select = on_select.clone();
                        move |driver| {
                            view! { <DriverRow driver=driver on_select=on_select.clone() /> }
                        }
                    }
                />
            </Show>
        </div>
    }
}

#[component]
fn DriverRow<F>(driver: DriverSnapshot, on_select: F) -> impl IntoView
where
    F: Fn(String) + 'static,
{
    let online = driver.is_online();
    let driver_id = driver.driver_id.clone();
    let status_class = if online { "status-online" } else { "status-offline" };

    view! {
        <div class="driver-item" class:active=online on:click=move |_| on_select(driver_id.clone())>
            <div class="driver-name">{driver.username.clone()}</div>
            <div class="driver-id">{driver.driver_id.clone()}</div>
            <div class="driver-status">
                <span class=status_class>{status_label(&driver)}</span>
                <span>{last_update_label(&driver, &Local)}</span>
            </div>
        </div>
    }
}
