//! Display scale detection for Unix desktops.
//!
//! The scale is derived from whatever the running desktop environment exposes: the
//! `gsettings` database on GNOME and the monitor configuration file (falling back to
//! `gsettings`) on Cinnamon. Other desktops are recognized but not probed. Whenever no
//! usable value can be found the scale is `1.0`.

pub mod cinnamon;
pub mod config;
pub mod desktop;
pub mod gsettings;
pub mod host;
pub mod resolver;

pub use {
    cinnamon::{MonitorConfig, Output},
    config::Config,
    desktop::Desktop,
    gsettings::GSettings,
    host::{Host, SystemHost},
    resolver::{Resolution, Resolver, Source},
};

/// The scale used when the desktop does not provide one.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Returns the scale factor of the current desktop.
///
/// `x` and `y` identify the position of the window. They are reserved for per-monitor
/// scaling and currently ignored. The result is always strictly positive.
pub fn get_scale(x: i32, y: i32) -> f64 {
    Resolver::new(SystemHost::default()).get_scale(x, y)
}

/// Maps degenerate scale values to `None`.
pub(crate) fn signal(scale: f64) -> Option<f64> {
    (scale.is_finite() && scale > 0.0).then_some(scale)
}
