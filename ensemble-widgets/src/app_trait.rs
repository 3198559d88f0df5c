//! # ConsoleApp Trait - Plugin App Interface
//!
//! Screens are separate crates that implement [`ConsoleApp`]. The shell
//! imports and registers them via `live_design(cx)` calls; their widget types
//! are then available in the shell's `live_design!` block by module path.
//!
//! ## Usage in Shell
//!
//! ```rust,ignore
//! use ensemble_widgets::{ConsoleApp, AppRegistry};
//! use ensemble_models::EnsembleModelsApp;
//!
//! fn live_register(cx: &mut Cx) {
//!     makepad_widgets::live_design(cx);
//!     ensemble_widgets::live_design(cx);
//!     <EnsembleModelsApp as ConsoleApp>::live_design(cx);
//! }
//! ```

use makepad_widgets::Cx;

/// Metadata about a registered app
#[derive(Clone, Debug)]
pub struct AppInfo {
    /// Display name, logged at registration
    pub name: &'static str,
    /// Unique identifier for the app
    pub id: &'static str,
}

/// Trait for apps hosted by the console shell
pub trait ConsoleApp {
    /// Returns metadata about this app
    fn info() -> AppInfo
    where
        Self: Sized;

    /// Register this app's widgets with Makepad
    fn live_design(cx: &mut Cx);
}

/// Registry of all installed apps
pub struct AppRegistry {
    apps: Vec<AppInfo>,
}

impl AppRegistry {
    pub const fn new() -> Self {
        Self { apps: Vec::new() }
    }

    pub fn register(&mut self, info: AppInfo) {
        ::log::debug!("Registered app {} ({})", info.name, info.id);
        self.apps.push(info);
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_counts_apps() {
        let mut registry = AppRegistry::new();
        assert!(registry.is_empty());

        registry.register(AppInfo { name: "Models", id: "ensemble-models" });
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }
}
