//! Convoy driver tracking dashboard
//!
//! Leptos front end for the tracking server: a live map of active drivers,
//! the driver list and the tracking link generator.

pub mod api;
pub mod app;
pub mod components;
pub mod model;
pub mod pages;
pub mod state;

pub use app::App;
