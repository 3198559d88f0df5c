pub mod design;

use std::sync::Arc;

use ensemble_data::{
    ConsoleConfig, CreateModelForm, DialogState, DirectoryDownloads, FitRequest, InfoBody, ModelKind,
    Orchestrator, PredictRequest, RegistryClient, RequestRunner, RowAction, UserAction,
    CATALOG_HEADERS,
};
use makepad_widgets::*;

// ── Widget ────────────────────────────────────────────────────────────────────

#[derive(Live, LiveHook, Widget)]
pub struct ModelsScreen {
    #[deref]
    pub view: View,

    #[rust]
    initialized: bool,

    #[rust]
    orchestrator: Option<Orchestrator<DirectoryDownloads>>,

    #[rust]
    runner: Option<RequestRunner>,

    /// Kind chosen in the create form
    #[rust]
    create_kind: ModelKind,

    /// Dialog generation the inputs were last cleared for
    #[rust]
    mounted_generation: u64,
}

impl Widget for ModelsScreen {
    fn handle_event(&mut self, cx: &mut Cx, event: &Event, scope: &mut Scope) {
        // ── One-time initialisation ───────────────────────────────────────
        if !self.initialized {
            self.initialized = true;
            self.start(cx, scope);
        }

        let actions = cx.capture_actions(|cx| {
            self.view.handle_event(cx, event, scope);
        });

        let mut requested = Vec::new();
        self.collect_header_actions(&actions, &mut requested);
        self.collect_row_actions(&actions, &mut requested);
        self.collect_dialog_actions(cx, &actions, &mut requested);
        for action in requested {
            self.perform(cx, action);
        }

        // ── Poll background requests ──────────────────────────────────────
        self.poll_requests(cx);

        if self.orchestrator.as_mut().map_or(false, |o| o.take_dirty()) {
            self.view.redraw(cx);
        }
    }

    fn draw_walk(&mut self, cx: &mut Cx2d, scope: &mut Scope, walk: Walk) -> DrawStep {
        self.update_header(cx);
        self.update_dialog(cx);

        let catalog_list = self.view.portal_list(ids!(catalog_list));
        let catalog_list_uid = catalog_list.widget_uid();

        while let Some(widget) = self.view.draw_walk(cx, scope, walk).step() {
            if widget.widget_uid() == catalog_list_uid {
                self.draw_catalog(cx, scope, widget);
            }
        }

        DrawStep::done()
    }
}

impl ModelsScreen {
    // ── Setup ─────────────────────────────────────────────────────────────────

    fn start(&mut self, cx: &mut Cx, scope: &mut Scope) {
        let config = match scope.data.get::<ConsoleConfig>() {
            Some(config) => config.clone(),
            None => ConsoleConfig::load().unwrap_or_else(|e| {
                ::log::warn!("Using default console config: {}", e);
                ConsoleConfig::default()
            }),
        };
        ::log::info!(
            "Models screen using registry {} (downloads to {})",
            config.base_url,
            config.download_dir.display()
        );

        let client = RegistryClient::from_config(&config);
        let mut runner = RequestRunner::new(Arc::new(client));
        let mut orchestrator = Orchestrator::new(DirectoryDownloads::new(config.download_dir.clone()));

        runner.submit_all(orchestrator.start());
        self.runner = Some(runner);
        self.orchestrator = Some(orchestrator);
        cx.new_next_frame();
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn collect_header_actions(&self, actions: &Actions, out: &mut Vec<UserAction>) {
        if self.view.button(ids!(refresh_button)).clicked(actions) {
            out.push(UserAction::Refresh);
        }
        if self.view.button(ids!(new_model_button)).clicked(actions) {
            out.push(UserAction::OpenCreate);
        }
    }

    fn collect_row_actions(&self, actions: &Actions, out: &mut Vec<UserAction>) {
        let Some(orchestrator) = &self.orchestrator else { return };
        // Rows sit under the overlay while the dialog is up.
        if orchestrator.dialog().is_open() {
            return;
        }

        let catalog = orchestrator.catalog();
        let catalog_list = self.view.portal_list(ids!(catalog_list));
        for (item_id, item) in catalog_list.items_with_actions(actions) {
            if item.button(ids!(info_button)).clicked(actions) {
                out.extend(catalog.action(item_id, RowAction::Info));
            }
            if item.button(ids!(fit_button)).clicked(actions) {
                out.extend(catalog.action(item_id, RowAction::Fit));
            }
            if item.button(ids!(predict_button)).clicked(actions) {
                out.extend(catalog.action(item_id, RowAction::Predict));
            }
            if item.button(ids!(delete_button)).clicked(actions) {
                out.extend(catalog.action(item_id, RowAction::Delete));
            }
        }
    }

    fn collect_dialog_actions(&mut self, cx: &mut Cx, actions: &Actions, out: &mut Vec<UserAction>) {
        let Some(orchestrator) = &self.orchestrator else { return };
        let state = orchestrator.dialog().clone();

        if self.view.button(ids!(kind_boosting_btn)).clicked(actions) {
            self.create_kind = ModelKind::GradientBoosting;
            self.view.redraw(cx);
        }
        if self.view.button(ids!(kind_forest_btn)).clicked(actions) {
            self.create_kind = ModelKind::RandomForest;
            // The field is hidden for forests; nothing typed there is sent.
            self.view.text_input(ids!(learning_rate_field.input)).set_text(cx, "");
            self.view.redraw(cx);
        }

        if self.view.button(ids!(dismiss_button)).clicked(actions) {
            out.push(UserAction::Dismiss);
        }
        if self.view.button(ids!(export_button)).clicked(actions) {
            out.push(UserAction::ExportDiagnostics);
        }
        if self.view.button(ids!(submit_button)).clicked(actions) {
            match &state {
                DialogState::CreateForm { .. } => out.push(UserAction::SubmitCreate(self.read_create_form())),
                DialogState::FitForm { model, .. } => out.push(UserAction::SubmitFit(FitRequest::from_form(
                    model,
                    &self.view.text_input(ids!(train_field.input)).text(),
                    &self.view.text_input(ids!(validation_field.input)).text(),
                    &self.view.text_input(ids!(target_field.input)).text(),
                    &self.view.text_input(ids!(data_description_field.input)).text(),
                ))),
                DialogState::PredictForm { model, .. } => {
                    out.push(UserAction::SubmitPredict(PredictRequest::from_form(
                        model,
                        &self.view.text_input(ids!(test_field.input)).text(),
                        &self.view.text_input(ids!(column_field.input)).text(),
                    )))
                }
                _ => {}
            }
        }
    }

    /// Every text input of the dialog, blanked whenever a new workflow mounts.
    fn clear_inputs(&mut self, cx: &mut Cx) {
        let inputs = [
            self.view.text_input(ids!(name_field.input)),
            self.view.text_input(ids!(description_field.input)),
            self.view.text_input(ids!(estimators_field.input)),
            self.view.text_input(ids!(depth_field.input)),
            self.view.text_input(ids!(features_field.input)),
            self.view.text_input(ids!(learning_rate_field.input)),
            self.view.text_input(ids!(train_field.input)),
            self.view.text_input(ids!(validation_field.input)),
            self.view.text_input(ids!(target_field.input)),
            self.view.text_input(ids!(data_description_field.input)),
            self.view.text_input(ids!(test_field.input)),
            self.view.text_input(ids!(column_field.input)),
        ];
        for input in inputs {
            input.set_text(cx, "");
        }
    }

    fn read_create_form(&self) -> CreateModelForm {
        CreateModelForm {
            kind: self.create_kind,
            name: self.view.text_input(ids!(name_field.input)).text(),
            description: self.view.text_input(ids!(description_field.input)).text(),
            n_estimators: self.view.text_input(ids!(estimators_field.input)).text(),
            max_depth: self.view.text_input(ids!(depth_field.input)).text(),
            feature_subsample_size: self.view.text_input(ids!(features_field.input)).text(),
            learning_rate: self.view.text_input(ids!(learning_rate_field.input)).text(),
        }
    }

    // ── Orchestration ─────────────────────────────────────────────────────────

    fn perform(&mut self, cx: &mut Cx, action: UserAction) {
        let (Some(orchestrator), Some(runner)) = (self.orchestrator.as_mut(), self.runner.as_mut()) else {
            return;
        };
        let dispatches = orchestrator.handle(action);
        if !dispatches.is_empty() {
            runner.submit_all(dispatches);
            cx.new_next_frame();
        }
    }

    fn poll_requests(&mut self, cx: &mut Cx) {
        let (Some(orchestrator), Some(runner)) = (self.orchestrator.as_mut(), self.runner.as_mut()) else {
            return;
        };
        if runner.in_flight() == 0 {
            return;
        }
        for settled in runner.poll() {
            let follow_up = orchestrator.settle(settled);
            runner.submit_all(follow_up);
        }
        if runner.in_flight() > 0 {
            cx.new_next_frame();
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn update_header(&mut self, cx: &mut Cx2d) {
        let Some(orchestrator) = &self.orchestrator else { return };
        let catalog = orchestrator.catalog();

        let status = match orchestrator.catalog_notice() {
            Some(notice) => notice.to_string(),
            None if catalog.skipped() > 0 => format!(
                "{} models ({} hidden: unknown type)",
                catalog.len(),
                catalog.skipped()
            ),
            None => format!("{} models", catalog.len()),
        };
        self.view.label(ids!(catalog_status)).set_text(cx, &status);

        let [name, kind, description, actions] = CATALOG_HEADERS;
        self.view.label(ids!(catalog_header.header_name)).set_text(cx, &name.to_uppercase());
        self.view.label(ids!(catalog_header.header_kind)).set_text(cx, &kind.to_uppercase());
        self.view
            .label(ids!(catalog_header.header_description))
            .set_text(cx, &description.to_uppercase());
        self.view.label(ids!(catalog_header.header_actions)).set_text(cx, &actions.to_uppercase());
    }

    fn update_dialog(&mut self, cx: &mut Cx2d) {
        let Some(orchestrator) = &self.orchestrator else { return };
        let state = orchestrator.dialog().clone();
        let generation = orchestrator.dialog_generation();

        // A new workflow starts from blank inputs.
        if generation != self.mounted_generation {
            self.mounted_generation = generation;
            self.create_kind = ModelKind::default();
            self.clear_inputs(cx);
        }

        self.view.widget(ids!(dialog_overlay)).set_visible(cx, state.is_open());
        if !state.is_open() {
            return;
        }
        self.view.label(ids!(dialog_title)).set_text(cx, &state.title());

        // ── Body ──
        let is_create = matches!(state, DialogState::CreateForm { .. });
        self.view.widget(ids!(create_body)).set_visible(cx, is_create);
        self.view.widget(ids!(fit_body)).set_visible(cx, matches!(state, DialogState::FitForm { .. }));
        self.view.widget(ids!(predict_body)).set_visible(cx, matches!(state, DialogState::PredictForm { .. }));

        let detail = match &state {
            DialogState::InfoView { body: InfoBody::Ready(detail), .. } => Some(detail),
            _ => None,
        };
        let pending = matches!(state, DialogState::InfoView { body: InfoBody::Pending, .. });
        self.view.widget(ids!(info_pending)).set_visible(cx, pending);
        self.view.widget(ids!(info_body)).set_visible(cx, detail.is_some());
        if let Some(detail) = detail {
            let rows = detail.info_rows();
            let labels: Vec<&str> = rows.iter().map(|r| r.label).collect();
            let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
            self.view.label(ids!(info_labels)).set_text(cx, &labels.join("\n"));
            self.view.label(ids!(info_values)).set_text(cx, &values.join("\n"));
        }

        if is_create {
            self.view
                .button(ids!(kind_boosting_btn))
                .set_text(cx, ModelKind::GradientBoosting.label());
            self.view.button(ids!(kind_forest_btn)).set_text(cx, ModelKind::RandomForest.label());
            let boosting = if self.create_kind == ModelKind::GradientBoosting { 1.0_f64 } else { 0.0_f64 };
            self.view.button(ids!(kind_boosting_btn)).apply_over(cx, live! { draw_bg: { selected: (boosting) } });
            self.view.button(ids!(kind_forest_btn)).apply_over(cx, live! { draw_bg: { selected: (1.0 - boosting) } });
            self.view
                .widget(ids!(learning_rate_field))
                .set_visible(cx, self.create_kind.uses_learning_rate());
        }

        let notice = state.notice();
        self.view.label(ids!(dialog_notice)).set_text(cx, notice.unwrap_or_default());
        self.view.widget(ids!(dialog_notice)).set_visible(cx, notice.is_some());

        // ── Footer ──
        let submitting = state.is_submitting();
        let submit_label = match &state {
            DialogState::CreateForm { .. } => Some("Create"),
            DialogState::FitForm { .. } => Some("Fit"),
            DialogState::PredictForm { .. } => Some("Predict"),
            _ => None,
        };
        self.view.widget(ids!(working_label)).set_visible(cx, submitting);
        self.view.widget(ids!(submit_button)).set_visible(cx, submit_label.is_some());
        if let Some(text) = submit_label {
            let disabled = if submitting { 1.0_f64 } else { 0.0_f64 };
            self.view.button(ids!(submit_button)).set_text(cx, text);
            self.view.button(ids!(submit_button)).apply_over(cx, live! { draw_bg: { disabled: (disabled) } });
        }
        let dismiss_label = if submit_label.is_some() { "Cancel" } else { "Close" };
        self.view.button(ids!(dismiss_button)).set_text(cx, dismiss_label);

        let exportable = detail.map_or(false, |d| d.visible_diagnostics().is_some());
        self.view.widget(ids!(export_button)).set_visible(cx, exportable);
    }

    fn draw_catalog(&self, cx: &mut Cx2d, scope: &mut Scope, widget: WidgetRef) {
        let Some(orchestrator) = &self.orchestrator else { return };
        let catalog = orchestrator.catalog();

        let binding = widget.as_portal_list();
        let Some(mut list) = binding.borrow_mut() else { return };

        if catalog.is_empty() {
            list.set_item_range(cx, 0, 1);
            if let Some(0) = list.next_visible_item(cx) {
                let item = list.item(cx, 0, live_id!(CatalogEmptyItem));
                item.draw_all(cx, scope);
            }
            return;
        }

        list.set_item_range(cx, 0, catalog.len());
        while let Some(item_id) = list.next_visible_item(cx) {
            let Some(row) = catalog.row(item_id) else { continue };
            let odd = if item_id % 2 == 1 { 1.0_f64 } else { 0.0_f64 };
            let forest = if row.kind == ModelKind::RandomForest { 1.0_f64 } else { 0.0_f64 };

            let item = list.item(cx, item_id, live_id!(CatalogRowItem));
            item.apply_over(cx, live! { draw_bg: { odd: (odd) } });
            item.label(ids!(row_name)).set_text(cx, &row.name);
            item.view(ids!(kind_badge)).apply_over(cx, live! { draw_bg: { forest: (forest) } });
            item.label(ids!(kind_label)).set_text(cx, row.kind.label());
            item.label(ids!(row_description)).set_text(cx, &row.description);
            item.button(ids!(info_button)).set_text(cx, RowAction::Info.label());
            item.button(ids!(fit_button)).set_text(cx, RowAction::Fit.label());
            item.button(ids!(predict_button)).set_text(cx, RowAction::Predict.label());
            item.button(ids!(delete_button)).set_text(cx, RowAction::Delete.label());
            item.draw_all(cx, scope);
        }
    }
}
