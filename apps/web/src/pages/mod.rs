//! Page Components

mod dashboard;

pub use dashboard::Dashboard;
