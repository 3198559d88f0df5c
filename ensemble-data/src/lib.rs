//! UI-free core of the ensemble console.
//!
//! Everything with state-transition logic lives here so the Makepad screen
//! only has to forward clicks and paint whatever the [`Orchestrator`] holds.

pub mod catalog;
pub mod config;
pub mod dialog;
pub mod download;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod registry_client;
pub mod runner;
pub mod tagged;

pub use catalog::{CatalogRow, CatalogTable, RowAction, CATALOG_HEADERS};
pub use config::{ConfigError, ConsoleConfig};
pub use dialog::{DialogController, DialogEffect, DialogEvent, DialogState, FormStatus, InfoBody};
pub use download::{DirectoryDownloads, DownloadSink};
pub use error::RegistryError;
pub use model::{
    CreateModelForm, FitRequest, Hyperparameters, InfoRow, ModelDetail, ModelKind, ModelSummary,
    PredictRequest,
};
pub use orchestrator::{
    Dispatch, Operation, Orchestrator, Outcome, Settled, Slot, Ticket, UserAction, Workflow,
};
pub use registry_client::{RegistryApi, RegistryClient};
pub use runner::RequestRunner;
pub use tagged::Tagged;
