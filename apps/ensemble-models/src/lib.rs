pub mod screen;

use ensemble_widgets::{AppInfo, ConsoleApp};
use makepad_widgets::Cx;

pub use screen::{ModelsScreen, ModelsScreenRef};

pub struct EnsembleModelsApp;

impl ConsoleApp for EnsembleModelsApp {
    fn info() -> AppInfo {
        AppInfo {
            name: "Models",
            id: "ensemble-models",
        }
    }

    fn live_design(cx: &mut Cx) {
        crate::screen::design::live_design(cx);
    }
}
