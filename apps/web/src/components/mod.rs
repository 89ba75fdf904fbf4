//! Reusable UI Components

mod card;
mod driver_list;
mod driver_map;
mod link_panel;
mod status_bar;

pub use card::Card;
pub use driver_list::DriverList;
pub use driver_map::DriverMap;
pub use link_panel::LinkPanel;
pub use status_bar::StatusBar;
