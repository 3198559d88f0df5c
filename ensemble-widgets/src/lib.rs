pub mod app_trait;
pub mod components;
pub mod theme;

pub use app_trait::{AppInfo, AppRegistry, ConsoleApp};

use makepad_widgets::Cx;

/// Register all shared widgets with Makepad.
///
/// Call from `LiveRegister::live_register`, after `makepad_widgets::live_design`
/// and before any app crate.
pub fn live_design(cx: &mut Cx) {
    // Components use the theme's fonts and colors, so it goes first.
    theme::live_design(cx);
    components::live_design(cx);
}
