//! Interactive terminal interface
//!
//! A single screen, `repair::RepairManager`, for looking up a pothole report
//! and managing its repair assignment.

pub mod components;
pub mod repair;
pub mod theme;

pub use repair::{RepairManager, RepairManagerProps};
pub use theme::Theme;
