//! Catalog table projection.
//!
//! Each refresh rebuilds the whole table from the server's list. Rows are
//! never patched in place.

use crate::model::{ModelKind, ModelSummary};
use crate::orchestrator::UserAction;

pub const CATALOG_HEADERS: [&str; 4] = ["Name", "Type", "Description", "Actions"];

/// Per-row actions, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Info,
    Fit,
    Predict,
    Delete,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Fit => "Fit",
            Self::Predict => "Predict",
            Self::Delete => "Delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub name: String,
    pub kind: ModelKind,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTable {
    rows: Vec<CatalogRow>,
    skipped: usize,
}

impl CatalogTable {
    /// Build the table for one list response. Rows with an unknown type tag
    /// are left out without failing the refresh.
    pub fn render(models: &[ModelSummary]) -> Self {
        let mut rows = Vec::with_capacity(models.len());
        let mut skipped = 0;
        for model in models {
            match model.model_kind() {
                Some(kind) => rows.push(CatalogRow {
                    name: model.name.clone(),
                    kind,
                    description: model.description.clone(),
                }),
                None => {
                    log::debug!("catalog: skipping {:?} with unknown type {:?}", model.name, model.kind);
                    skipped += 1;
                }
            }
        }
        log::info!("catalog: {} models, {} skipped", rows.len(), skipped);
        Self { rows, skipped }
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows dropped for an unrecognized type.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn row(&self, index: usize) -> Option<&CatalogRow> {
        self.rows.get(index)
    }

    /// User action for a row button. `None` if the row no longer exists.
    pub fn action(&self, index: usize, action: RowAction) -> Option<UserAction> {
        let name = self.rows.get(index)?.name.clone();
        Some(match action {
            RowAction::Info => UserAction::OpenInfo(name),
            RowAction::Fit => UserAction::OpenFit(name),
            RowAction::Predict => UserAction::OpenPredict(name),
            RowAction::Delete => UserAction::Delete(name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_rows_are_skipped() {
        let models = vec![ModelSummary::new("m1", "rf", "desc"), ModelSummary::new("m2", "xx", "bad")];
        let table = CatalogTable::render(&models);

        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped(), 1);
        assert_eq!(
            table.row(0),
            Some(&CatalogRow { name: "m1".into(), kind: ModelKind::RandomForest, description: "desc".into() })
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let models = vec![
            ModelSummary::new("b", "bt", ""),
            ModelSummary::new("a", "rf", ""),
            ModelSummary::new("c", "bt", ""),
        ];
        let names: Vec<_> = CatalogTable::render(&models).rows().iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_row_actions_carry_name() {
        let table = CatalogTable::render(&[ModelSummary::new("m1", "bt", "")]);
        assert_eq!(table.action(0, RowAction::Fit), Some(UserAction::OpenFit("m1".into())));
        assert_eq!(table.action(0, RowAction::Delete), Some(UserAction::Delete("m1".into())));
        assert_eq!(table.action(3, RowAction::Info), None);
    }

    #[test]
    fn test_header_and_action_labels() {
        assert_eq!(CATALOG_HEADERS, ["Name", "Type", "Description", "Actions"]);
        assert_eq!(RowAction::Info.label(), "Info");
        assert_eq!(RowAction::Delete.label(), "Delete");
    }

    #[test]
    fn test_empty() {
        let table = CatalogTable::render(&[]);
        assert!(table.is_empty());
        assert_eq!(table.skipped(), 0);
    }
}
