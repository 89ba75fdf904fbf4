//! Dashboard state
//!
//! Everything the page shows is derived from one [`DashboardState`]: the
//! latest driver snapshot, the markers built from it (plus provisional ones
//! created by pushes between refreshes), the recently generated links, and
//! the push channel status. Kept free of DOM types so it can be tested
//! natively.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

use crate::model::{DriverSnapshot, GeneratedLink, LocationPayload};

/// Polling fallback period
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);
/// Generated links kept on screen
pub const MAX_RECENT_LINKS: usize = 5;
/// Map view before any driver is known
pub const INITIAL_CENTER: (f64, f64) = (0.0, 0.0);
pub const INITIAL_ZOOM: f64 = 2.0;
/// Zoom used when a driver row is clicked
pub const FOCUS_ZOOM: f64 = 15.0;
/// Extra margin around the markers when fitting the map
pub const BOUNDS_PADDING: f64 = 0.1;

/// Push channel status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connected => "🟢 Connected",
            Self::Disconnected => "🔴 Disconnected",
        }
    }
}

/// Time line shown in a marker popup
#[derive(Debug, Clone, PartialEq)]
pub enum PopupTime {
    At(DateTime<Utc>),
    Unknown,
    JustUpdated,
}

/// Marker drawn for one driver
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub driver_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub time: PopupTime,
}

impl MarkerView {
    fn from_snapshot(driver: &DriverSnapshot) -> Option<Self> {
        let (latitude, longitude) = driver.position()?;
        Some(Self {
            driver_id: driver.driver_id.clone(),
            latitude,
            longitude,
            title: driver.username.clone(),
            time: driver
                .last_update
                .map(PopupTime::At)
                .unwrap_or(PopupTime::Unknown),
        })
    }

    fn provisional(driver_id: &str, location: &LocationPayload) -> Self {
        Self {
            driver_id: driver_id.to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
            title: provisional_title(driver_id),
            time: PopupTime::JustUpdated,
        }
    }

    /// Key that changes whenever the rendered marker must change
    pub fn render_key(&self) -> String {
        format!(
            "{}:{}:{}:{}:{:?}",
            self.driver_id,
            self.latitude.to_bits(),
            self.longitude.to_bits(),
            self.title,
            self.time
        )
    }

    pub fn popup_time<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        match &self.time {
            PopupTime::At(ts) => format!("Last update: {}", format_datetime(ts, tz)),
            PopupTime::Unknown => "Last update: Unknown".to_string(),
            PopupTime::JustUpdated => "Just updated".to_string(),
        }
    }
}

/// Popup title for a driver only known from a push
pub fn provisional_title(driver_id: &str) -> String {
    let short: String = driver_id.chars().take(8).collect();
    format!("Driver {}...", short)
}

/// Geographic bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        points.into_iter().fold(None, |acc, (lat, lng)| {
            Some(match acc {
                None => Bounds {
                    south: lat,
                    west: lng,
                    north: lat,
                    east: lng,
                },
                Some(b) => Bounds {
                    south: b.south.min(lat),
                    west: b.west.min(lng),
                    north: b.north.max(lat),
                    east: b.east.max(lng),
                },
            })
        })
    }

    /// Grow each side by `ratio` of the box's extent
    pub fn padded(self, ratio: f64) -> Self {
        let height = (self.north - self.south).abs() * ratio;
        let width = (self.east - self.west).abs() * ratio;
        Self {
            south: self.south - height,
            west: self.west - width,
            north: self.north + height,
            east: self.east + width,
        }
    }
}

/// Whole dashboard state
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    drivers: Vec<DriverSnapshot>,
    markers: BTreeMap<String, MarkerView>,
    links: VecDeque<GeneratedLink>,
    status: ConnectionStatus,
    last_push: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list and rebuild every marker from a polling snapshot.
    ///
    /// Returns the padded bounds the map should fit, if any marker exists.
    pub fn apply_snapshot(&mut self, drivers: Vec<DriverSnapshot>) -> Option<Bounds> {
        self.markers = drivers
            .iter()
            .filter_map(MarkerView::from_snapshot)
            .map(|marker| (marker.driver_id.clone(), marker))
            .collect();
        self.drivers = drivers;
        self.bounds()
    }

    /// Move (or provisionally create) a marker from a push
    pub fn apply_location_update(
        &mut self,
        driver_id: &str,
        location: &LocationPayload,
        received_at: DateTime<Utc>,
    ) {
        match self.markers.get_mut(driver_id) {
            Some(marker) => {
                marker.latitude = location.latitude;
                marker.longitude = location.longitude;
            }
            None => {
                self.markers.insert(
                    driver_id.to_string(),
                    MarkerView::provisional(driver_id, location),
                );
            }
        }
        self.last_push = Some(received_at);
    }

    /// Remember a generated link, newest first
    pub fn push_link(&mut self, link: GeneratedLink) {
        self.links.push_front(link);
        self.links.truncate(MAX_RECENT_LINKS);
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }

    pub fn drivers(&self) -> &[DriverSnapshot] {
        &self.drivers
    }

    pub fn markers(&self) -> Vec<MarkerView> {
        self.markers.values().cloned().collect()
    }

    pub fn marker(&self, driver_id: &str) -> Option<&MarkerView> {
        self.markers.get(driver_id)
    }

    pub fn links(&self) -> Vec<GeneratedLink> {
        self.links.iter().cloned().collect()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn last_push(&self) -> Option<DateTime<Utc>> {
        self.last_push
    }

    /// Padded bounds around all markers
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.markers.values().map(|m| (m.latitude, m.longitude)))
            .map(|b| b.padded(BOUNDS_PADDING))
    }

    /// Where to centre the map when a driver row is clicked
    pub fn focus(&self, driver_id: &str) -> Option<(f64, f64)> {
        self.drivers
            .iter()
            .find(|d| d.driver_id == driver_id)
            .and_then(DriverSnapshot::position)
    }
}

/// Live map objects keyed by driver id.
///
/// A redrawn marker registers its new handle before or after the old one is
/// dropped, so each release names the registration it undoes.
#[derive(Debug)]
pub struct MarkerHandles<H> {
    handles: HashMap<String, (u64, H)>,
    next: u64,
}

impl<H> Default for MarkerHandles<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
            next: 0,
        }
    }
}

impl<H> MarkerHandles<H> {
    pub fn register(&mut self, driver_id: &str, handle: H) -> u64 {
        self.next += 1;
        self.handles.insert(driver_id.to_string(), (self.next, handle));
        self.next
    }

    /// Drop the handle if it is still the one from `registration`
    pub fn release(&mut self, driver_id: &str, registration: u64) {
        if self
            .handles
            .get(driver_id)
            .is_some_and(|(current, _)| *current == registration)
        {
            self.handles.remove(driver_id);
        }
    }

    pub fn get(&self, driver_id: &str) -> Option<&H> {
        self.handles.get(driver_id).map(|(_, handle)| handle)
    }
}

pub fn status_label(driver: &DriverSnapshot) -> &'static str {
    if driver.is_online() {
        "Online"
    } else {
        "Offline"
    }
}

/// Row time: local time of day, or "Never"
pub fn last_update_label<Tz: TimeZone>(driver: &DriverSnapshot, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    driver
        .last_update
        .map(|ts| format_time(&ts, tz))
        .unwrap_or_else(|| "Never".to_string())
}

/// Header line for the latest push
pub fn last_push_label<Tz: TimeZone>(last_push: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match last_push {
        Some(ts) => format!("Last update: {}", format_time(&ts, tz)),
        None => "Last update: -".to_string(),
    }
}

fn format_time<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%H:%M:%S").to_string()
}

fn format_datetime<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string()
}
