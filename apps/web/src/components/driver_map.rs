//! Leaflet map with one truck marker per located driver

use chrono::Local;
use leptos::*;
use leptos_leaflet::*;

use crate::state::{DashboardState, MarkerHandles, MarkerView, INITIAL_CENTER, INITIAL_ZOOM};

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

const TRUCK_ICON: &str = "data:image/svg+xml;charset=utf-8,\
<svg xmlns='http://www.w3.org/2000/svg' width='30' height='30'>\
<text x='15' y='22' font-size='20' text-anchor='middle'>🚚</text></svg>";

/// The map; the created Leaflet handle is written to `map` so the page can
/// fit bounds and recentre it, and every marker is registered in `handles`
#[component]
pub fn DriverMap(
    state: RwSignal<DashboardState>,
    map: WriteSignal<Option<leaflet::Map>>,
    handles: StoredValue<MarkerHandles<leaflet::Marker>>,
) -> impl IntoView {
    let markers = move || state.with(|s| s.markers());

    view! {
        <MapContainer
            style="height: 100%; min-height: 400px"
            center=Position::new(INITIAL_CENTER.0, INITIAL_CENTER.1)
            zoom=INITIAL_ZOOM
            set_view=true
            map=map
        >
            <TileLayer url=TILE_URL attribution=TILE_ATTRIBUTION />
            <For
                each=markers
                key=MarkerView::render_key
                children=move |marker| view! { <TruckMarker marker=marker handles=handles /> }
            />
        </MapContainer>
    }
}

#[component]
fn TruckMarker(
    marker: MarkerView,
    handles: StoredValue<MarkerHandles<leaflet::Marker>>,
) -> impl IntoView {
    let popup_time = marker.popup_time(&Local);

    view! {
        <Marker
            position=Position::new(marker.latitude, marker.longitude)
            icon_url=Some(TRUCK_ICON.to_string())
            icon_size=Some((30.0, 30.0))
        >
            <MarkerHandle driver_id=marker.driver_id.clone() handles=handles />
            <Popup>
                <div class="popup-driver-name">{marker.title.clone()}</div>
                <div class="popup-driver-time">{popup_time}</div>
            </Popup>
        </Marker>
    }
}

/// Registers the enclosing Leaflet marker under `driver_id` while it exists
#[component]
fn MarkerHandle(
    driver_id: String,
    handles: StoredValue<MarkerHandles<leaflet::Marker>>,
) -> impl IntoView {
    let registration = store_value(None::<u64>);

    if let Some(overlay) = use_context::<LeafletOverlayContainerContext>() {
        let id = driver_id.clone();
        create_effect(move |_| {
            if let Some(marker) = overlay.container::<leaflet::Marker>() {
                let token = handles.try_update_value(|h| h.register(&id, marker));
                registration.set_value(token);
            }
        });
    }

    on_cleanup(move || {
        if let Some(token) = registration.try_get_value().flatten() {
            let _ = handles.try_update_value(|h| h.release(&driver_id, token));
        }
    });
}
