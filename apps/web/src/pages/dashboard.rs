//! Dashboard Page

use leaflet::{LatLng, LatLngBounds};
use leptos::*;

use crate::api::{use_tracking_websocket, ApiClient, WsState};
use crate::components::{Card, DriverList, DriverMap, LinkPanel, StatusBar};
use crate::model::ServerFrame;
use crate::state::{
    Bounds, ConnectionStatus, DashboardState, MarkerHandles, FOCUS_ZOOM, REFRESH_INTERVAL,
};

/// Live map, driver list and link generator
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = create_rw_signal(DashboardState::new());
    let (map, set_map) = create_signal::<Option<leaflet::Map>>(None);
    let markers = store_value(MarkerHandles::<leaflet::Marker>::default());
    let (ws_state, last_frame) = use_tracking_websocket();

    let load_drivers = move || {
        spawn_local(async move {
            match ApiClient::new().all_drivers().await {
                Ok(drivers) => {
                    let bounds = state.try_update(|s| s.apply_snapshot(drivers)).flatten();
                    if let (Some(bounds), Some(map)) = (bounds, map.try_get_untracked().flatten()) {
                        fit_bounds(&map, bounds);
                    }
                }
                Err(err) => {
                    gloo_console::error!("Error loading drivers:", err);
                }
            }
        });
    };

    load_drivers();

    let refresh = set_interval_with_handle(load_drivers, REFRESH_INTERVAL).ok();
    on_cleanup(move || {
        if let Some(handle) = refresh {
            handle.clear();
        }
    });

    create_effect(move |_| {
        let status = match ws_state.get() {
            WsState::Connected => ConnectionStatus::Connected,
            _ => ConnectionStatus::Disconnected,
        };
        state.update(|s| s.set_status(status));
    });

    create_effect(move |_| {
        let Some(frame) = last_frame.get() else {
            return;
        };

        match frame {
            ServerFrame::LocationUpdate {
                driver_id,
                location,
            } => {
                state.update(|s| {
                    s.apply_location_update(&driver_id, &location, chrono::Utc::now())
                });
                load_drivers();
            }
            ServerFrame::DriverRegistered { .. } | ServerFrame::DriverDeactivated { .. } => {
                load_drivers();
            }
            ServerFrame::Error { message, .. } => {
                gloo_console::warn!("Server error:", message);
            }
            ServerFrame::Connected { .. } | ServerFrame::Pong => {}
        }
    });

    let focus_driver = move |driver_id: String| {
        let target = state.with_untracked(|s| s.focus(&driver_id));
        if let (Some((lat, lng)), Some(map)) = (target, map.get_untracked()) {
            map.set_view(&LatLng::new(lat, lng), FOCUS_ZOOM);
            markers.with_value(|m| {
                if let Some(marker) = m.get(&driver_id) {
                    marker.open_popup();
                }
            });
        }
    };

    view! {
        <StatusBar state=state />
        <div class="layout">
            <aside class="sidebar">
                <Card title="Generate Tracking Link">
                    <LinkPanel state=state />
                </Card>
                <Card title="Active Drivers">
                    <DriverList state=state on_select=focus_driver />
                </Card>
            </aside>
            <section class="map-panel">
                <DriverMap state=state map=set_map handles=markers />
            </section>
        </div>
    }
}

fn fit_bounds(map: &leaflet::Map, bounds: Bounds) {
    let corners = LatLngBounds::new(
        &LatLng::new(bounds.south, bounds.west),
        &LatLng::new(bounds.north, bounds.east),
    );
    map.fit_bounds(&corners);
}
