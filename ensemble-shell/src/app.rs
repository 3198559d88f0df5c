use anyhow::Context;
use makepad_widgets::*;

use ensemble_data::ConsoleConfig;
use ensemble_models::EnsembleModelsApp;
use ensemble_widgets::{AppRegistry, ConsoleApp};

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use ensemble_widgets::theme::*;

    // Import app widgets from external app crates
    use ensemble_models::screen::design::*;

    App = {{App}} {
        ui: <Window> {
            window: { title: "Ensemble Console", inner_size: vec2(1200, 800) }
            pass: {
                clear_color: (PAGE_BG)
            }

            body = <View> {
                width: Fill, height: Fill
                flow: Down
                show_bg: true
                draw_bg: {
                    color: (PAGE_BG)
                }

                // Header
                header = <View> {
                    width: Fill, height: 56
                    flow: Right
                    align: {y: 0.5}
                    padding: {left: 24, right: 24}
                    show_bg: true
                    draw_bg: {
                        color: (PANEL_BG)
                    }

                    title_label = <Label> {
                        text: "Ensemble Console"
                        draw_text: {
                            color: (TEXT_PRIMARY)
                            text_style: <FONT_SEMIBOLD>{ font_size: 18.0 }
                        }
                    }

                    <View> { width: Fill } // Spacer

                    registry_label = <Label> {
                        draw_text: {
                            color: (TEXT_MUTED)
                            text_style: <FONT_REGULAR>{ font_size: 10.0 }
                        }
                    }
                }

                <View> {
                    width: Fill, height: 1
                    show_bg: true
                    draw_bg: { color: (DIVIDER) }
                }

                // Content area
                content = <View> {
                    width: Fill, height: Fill
                    models_screen = <ModelsScreen> {}
                }
            }
        }
    }
}

#[derive(Live)]
pub struct App {
    #[live]
    ui: WidgetRef,
    #[rust]
    config: ConsoleConfig,
    #[rust]
    apps: AppRegistry,
    #[rust]
    initialized: bool,
}

impl LiveHook for App {
    fn after_new_from_doc(&mut self, _cx: &mut Cx) {
        if !self.initialized {
            // Loaded before the first event so the screen finds it in scope
            self.config = load_config().unwrap_or_else(|e| {
                ::log::warn!("{:#}; using defaults", e);
                ConsoleConfig::default()
            });
            self.apps.register(EnsembleModelsApp::info());
            self.initialized = true;
        }
    }
}

impl LiveRegister for App {
    fn live_register(cx: &mut Cx) {
        makepad_widgets::live_design(cx);
        ensemble_widgets::live_design(cx);
        // Register app widgets from external app crates via ConsoleApp trait
        <EnsembleModelsApp as ConsoleApp>::live_design(cx);
    }
}

impl MatchEvent for App {
    fn handle_startup(&mut self, cx: &mut Cx) {
        let registry = format!("Registry: {}", self.config.base_url);
        self.ui.label(ids!(body.header.registry_label)).set_text(cx, &registry);
        ::log::info!(
            "App initialized with {} app(s), registry {}",
            self.apps.len(),
            self.config.base_url
        );
    }
}

impl AppMain for App {
    fn handle_event(&mut self, cx: &mut Cx, event: &Event) {
        let scope = &mut Scope::with_data(&mut self.config);
        self.ui.handle_event(cx, event, scope);

        // Process actions after they've been generated
        self.match_event(cx, event);
    }
}

/// Defaults, then `~/.ensemble/console.json`, then `ENSEMBLE_CONSOLE_URL`.
fn load_config() -> anyhow::Result<ConsoleConfig> {
    let path = ConsoleConfig::override_path();
    ConsoleConfig::load().with_context(|| match path {
        Some(path) => format!("cannot load console config from {}", path.display()),
        None => "cannot load console config".to_string(),
    })
}

app_main!(App);
