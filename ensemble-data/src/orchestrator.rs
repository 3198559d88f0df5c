//! Lifecycle orchestration.
//!
//! The [`Orchestrator`] is driven from two sides. The view feeds it
//! [`UserAction`]s; the request runner feeds it [`Settled`] responses. Both
//! return the [`Dispatch`]es to send next. Nothing here touches the network
//! or the UI toolkit.
//!
//! Every dispatch carries a [`Ticket`] from one of two slots. A response whose
//! ticket is no longer the newest for its slot has no visible effect. A
//! completed mutation is followed by one catalog refresh either way.

use crate::catalog::CatalogTable;
use crate::dialog::{DialogController, DialogEffect, DialogEvent, DialogState, InfoBody};
use crate::download::DownloadSink;
use crate::error::RegistryError;
use crate::model::{CreateModelForm, FitRequest, ModelDetail, ModelSummary, PredictRequest};
use crate::registry_client::RegistryApi;

// ─── Sequencing ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Catalog refreshes.
    Catalog,
    /// Everything whose result lands in the dialog.
    Dialog,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Self::Catalog => 0,
            Self::Dialog => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub slot: Slot,
    pub seq: u64,
}

#[derive(Debug, Default)]
struct Sequencer {
    latest: [u64; 2],
}

impl Sequencer {
    fn issue(&mut self, slot: Slot) -> Ticket {
        self.latest[slot.index()] += 1;
        self.current(slot)
    }

    fn current(&self, slot: Slot) -> Ticket {
        Ticket { slot, seq: self.latest[slot.index()] }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.latest[ticket.slot.index()] == ticket.seq
    }
}

// ─── Operations ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Refresh,
    Create,
    Fit,
    Predict,
    Inspect,
    Delete,
}

impl Workflow {
    /// Fixed message for failures that never got a server answer.
    pub fn transport_message(&self) -> &'static str {
        match self {
            Self::Refresh => "Could not load the model list. Try again.",
            Self::Create => "Could not create the model. Check your input and try again.",
            Self::Fit => "Could not fit the model. Try again.",
            Self::Predict => "Could not get predictions. Try again.",
            Self::Inspect => "Could not load the model details. Try again.",
            Self::Delete => "Could not delete the model. Try again.",
        }
    }

    /// Mutations are always followed by a catalog refresh.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Create | Self::Fit | Self::Predict | Self::Delete)
    }

    /// What the user reads for `err`.
    pub fn user_message(&self, err: &RegistryError) -> String {
        match err {
            RegistryError::Rejected(message) => message.clone(),
            RegistryError::File { path, .. } => format!("Cannot read {}.", path),
            other => {
                log::warn!("{:?} failed: {}", self, other);
                self.transport_message().to_string()
            }
        }
    }
}

/// One registry call.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    ListModels,
    CreateModel(CreateModelForm),
    DeleteModel(String),
    FitModel(FitRequest),
    PredictModel(PredictRequest),
    DescribeModel(String),
}

impl Operation {
    pub fn workflow(&self) -> Workflow {
        match self {
            Self::ListModels => Workflow::Refresh,
            Self::CreateModel(_) => Workflow::Create,
            Self::DeleteModel(_) => Workflow::Delete,
            Self::FitModel(_) => Workflow::Fit,
            Self::PredictModel(_) => Workflow::Predict,
            Self::DescribeModel(_) => Workflow::Inspect,
        }
    }

    /// Run against `api`, blocking until it answers.
    pub fn execute(&self, api: &dyn RegistryApi) -> Outcome {
        match self {
            Self::ListModels => Outcome::Listed(api.list_models()),
            Self::CreateModel(form) => Outcome::Created(api.create_model(form)),
            Self::DeleteModel(name) => Outcome::Deleted {
                model: name.clone(),
                result: api.delete_model(name),
            },
            Self::FitModel(request) => Outcome::Fitted(api.fit_model(request)),
            Self::PredictModel(request) => Outcome::Predicted {
                model: request.model.clone(),
                result: api.predict_model(request),
            },
            Self::DescribeModel(name) => Outcome::Described {
                model: name.clone(),
                result: api.describe_model(name),
            },
        }
    }

    /// The outcome of this operation failing with `err` before it was sent.
    pub fn fail(&self, err: RegistryError) -> Outcome {
        match self {
            Self::ListModels => Outcome::Listed(Err(err)),
            Self::CreateModel(_) => Outcome::Created(Err(err)),
            Self::DeleteModel(name) => Outcome::Deleted { model: name.clone(), result: Err(err) },
            Self::FitModel(_) => Outcome::Fitted(Err(err)),
            Self::PredictModel(request) => Outcome::Predicted { model: request.model.clone(), result: Err(err) },
            Self::DescribeModel(name) => Outcome::Described { model: name.clone(), result: Err(err) },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Listed(Result<Vec<ModelSummary>, RegistryError>),
    Created(Result<(), RegistryError>),
    Deleted { model: String, result: Result<(), RegistryError> },
    Fitted(Result<(), RegistryError>),
    Predicted { model: String, result: Result<Vec<u8>, RegistryError> },
    Described { model: String, result: Result<ModelDetail, RegistryError> },
}

impl Outcome {
    pub fn workflow(&self) -> Workflow {
        match self {
            Self::Listed(_) => Workflow::Refresh,
            Self::Created(_) => Workflow::Create,
            Self::Deleted { .. } => Workflow::Delete,
            Self::Fitted(_) => Workflow::Fit,
            Self::Predicted { .. } => Workflow::Predict,
            Self::Described { .. } => Workflow::Inspect,
        }
    }
}

/// A call to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub ticket: Ticket,
    pub operation: Operation,
}

/// A call that came back.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

/// Everything the user can do.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Refresh,
    OpenCreate,
    OpenFit(String),
    OpenPredict(String),
    OpenInfo(String),
    Delete(String),
    Dismiss,
    SubmitCreate(CreateModelForm),
    SubmitFit(FitRequest),
    SubmitPredict(PredictRequest),
    ExportDiagnostics,
}

// ─── Orchestrator ─────────────────────────────────────────────────────────────

pub struct Orchestrator<D: DownloadSink> {
    dialog: DialogController,
    catalog: CatalogTable,
    catalog_notice: Option<String>,
    sequencer: Sequencer,
    downloads: D,
    started: bool,
    dirty: bool,
}

impl<D: DownloadSink> Orchestrator<D> {
    pub fn new(downloads: D) -> Self {
        Self {
            dialog: DialogController::new(),
            catalog: CatalogTable::default(),
            catalog_notice: None,
            sequencer: Sequencer::default(),
            downloads,
            started: false,
            dirty: true,
        }
    }

    /// Initial load. Issues exactly one refresh, the first time only.
    pub fn start(&mut self) -> Vec<Dispatch> {
        if self.started {
            return Vec::new();
        }
        self.started = true;
        vec![self.refresh()]
    }

    pub fn handle(&mut self, action: UserAction) -> Vec<Dispatch> {
        match action {
            UserAction::Refresh => vec![self.refresh()],

            UserAction::OpenCreate => self.open(DialogEvent::OpenCreate),
            UserAction::OpenFit(name) => self.open(DialogEvent::OpenFit(name)),
            UserAction::OpenPredict(name) => self.open(DialogEvent::OpenPredict(name)),
            UserAction::OpenInfo(name) => self.open(DialogEvent::OpenInfo(name)),

            UserAction::Delete(name) => {
                log::info!("Deleting model {}", name);
                vec![Dispatch {
                    ticket: self.sequencer.current(Slot::Dialog),
                    operation: Operation::DeleteModel(name),
                }]
            }

            UserAction::Dismiss => {
                self.apply_dialog(DialogEvent::Dismiss);
                Vec::new()
            }

            UserAction::SubmitCreate(form) => {
                let matches = matches!(self.dialog.state(), DialogState::CreateForm { .. });
                self.submit(matches, Operation::CreateModel(form))
            }
            UserAction::SubmitFit(request) => {
                let matches = matches!(self.dialog.state(), DialogState::FitForm { model, .. } if *model == request.model);
                self.submit(matches, Operation::FitModel(request))
            }
            UserAction::SubmitPredict(request) => {
                let matches =
                    matches!(self.dialog.state(), DialogState::PredictForm { model, .. } if *model == request.model);
                self.submit(matches, Operation::PredictModel(request))
            }

            UserAction::ExportDiagnostics => {
                self.export_diagnostics();
                Vec::new()
            }
        }
    }

    /// Take in a response. Returns the refresh that follows a mutation.
    pub fn settle(&mut self, settled: Settled) -> Vec<Dispatch> {
        let Settled { ticket, outcome } = settled;
        let workflow = outcome.workflow();

        if self.sequencer.is_current(ticket) {
            self.apply_outcome(outcome);
        } else {
            log::debug!("Discarding stale {:?} response (seq {})", workflow, ticket.seq);
        }

        if workflow.is_mutation() {
            vec![self.refresh()]
        } else {
            Vec::new()
        }
    }

    pub fn dialog(&self) -> &DialogState {
        self.dialog.state()
    }

    /// Changes whenever the dialog body is remounted.
    pub fn dialog_generation(&self) -> u64 {
        self.dialog.generation()
    }

    pub fn catalog(&self) -> &CatalogTable {
        &self.catalog
    }

    /// Why the last refresh did not update the catalog, if it did not.
    pub fn catalog_notice(&self) -> Option<&str> {
        self.catalog_notice.as_deref()
    }

    pub fn downloads(&self) -> &D {
        &self.downloads
    }

    /// True once after any visible change.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ── Internal ─────────────────────────────────────────────────────────────

    fn refresh(&mut self) -> Dispatch {
        Dispatch {
            ticket: self.sequencer.issue(Slot::Catalog),
            operation: Operation::ListModels,
        }
    }

    /// Opening a workflow makes every earlier dialog response stale.
    fn open(&mut self, event: DialogEvent) -> Vec<Dispatch> {
        let ticket = self.sequencer.issue(Slot::Dialog);
        match self.apply_dialog(event) {
            DialogEffect::FetchDetail(name) => vec![Dispatch { ticket, operation: Operation::DescribeModel(name) }],
            _ => Vec::new(),
        }
    }

    fn submit(&mut self, matches_dialog: bool, operation: Operation) -> Vec<Dispatch> {
        if !matches_dialog {
            log::debug!("Ignoring {:?} submit for a dialog that is not showing it", operation.workflow());
            return Vec::new();
        }
        match self.apply_dialog(DialogEvent::Submit) {
            DialogEffect::BeginSubmit => vec![Dispatch { ticket: self.sequencer.current(Slot::Dialog), operation }],
            _ => Vec::new(),
        }
    }

    fn apply_dialog(&mut self, event: DialogEvent) -> DialogEffect {
        let effect = self.dialog.apply(event);
        if effect != DialogEffect::Ignored {
            self.dirty = true;
        }
        effect
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        let workflow = outcome.workflow();
        match outcome {
            Outcome::Listed(Ok(models)) => {
                self.catalog = CatalogTable::render(&models);
                self.catalog_notice = None;
                self.dirty = true;
            }
            Outcome::Listed(Err(err)) => {
                self.catalog_notice = Some(workflow.user_message(&err));
                self.dirty = true;
            }

            Outcome::Created(result) | Outcome::Fitted(result) => match result {
                Ok(()) => {
                    self.apply_dialog(DialogEvent::Succeeded);
                }
                Err(err) => {
                    self.apply_dialog(DialogEvent::Failed(workflow.user_message(&err)));
                }
            },

            Outcome::Deleted { model, result } => match result {
                Ok(()) => log::info!("Deleted model {}", model),
                Err(err) => {
                    let body = workflow.user_message(&err);
                    self.apply_dialog(DialogEvent::Notify { title: "Error".to_string(), body });
                }
            },

            Outcome::Predicted { model, result } => match result {
                Ok(csv) => {
                    let file_name = PredictRequest::download_name(&model);
                    match self.downloads.offer(&file_name, csv) {
                        Ok(path) => {
                            log::info!("Predictions for {} saved to {}", model, path.display());
                            self.apply_dialog(DialogEvent::Succeeded);
                        }
                        Err(err) => {
                            log::warn!("Cannot save {}: {}", file_name, err);
                            self.apply_dialog(DialogEvent::Failed("Could not save the predictions file.".to_string()));
                        }
                    }
                }
                Err(err) => {
                    self.apply_dialog(DialogEvent::Failed(workflow.user_message(&err)));
                }
            },

            Outcome::Described { result, .. } => match result {
                Ok(detail) => {
                    self.apply_dialog(DialogEvent::DetailLoaded(detail));
                }
                Err(err) => {
                    self.apply_dialog(DialogEvent::DetailFailed(workflow.user_message(&err)));
                }
            },
        }
    }

    fn export_diagnostics(&mut self) {
        let DialogState::InfoView { model, body: InfoBody::Ready(detail) } = self.dialog.state() else {
            return;
        };
        let Some(diagnostics) = detail.visible_diagnostics() else {
            return;
        };
        let file_name = format!("{}_diagnostics.json", model);
        let contents = match diagnostics {
            // Stored as an already-serialized chart.
            serde_json::Value::String(raw) => raw.clone().into_bytes(),
            other => serde_json::to_vec_pretty(other).unwrap_or_default(),
        };

        if let Err(err) = self.downloads.offer(&file_name, contents) {
            log::warn!("Cannot save {}: {}", file_name, err);
            self.apply_dialog(DialogEvent::Notify {
                title: "Error".to_string(),
                body: "Could not save the diagnostics file.".to_string(),
            });
        }
    }
}
