//! Model records as the console sees them.
//!
//! The registry server owns every model. The console reads projections of
//! those records (catalog rows, detail sheets) and throws them away on the
//! next refresh; nothing here is ever patched locally.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Number of trees the server uses when the estimators field is left blank.
pub const DEFAULT_ESTIMATORS: u32 = 100;

/// Learning rate the server uses for gradient boosting when left blank.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

// ─── Kind ─────────────────────────────────────────────────────────────────────

/// Ensemble family, fixed at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[default]
    #[serde(rename = "bt")]
    GradientBoosting,
    #[serde(rename = "rf")]
    RandomForest,
}

impl ModelKind {
    /// Parse the server's type tag. Anything unknown is `None`, never an error.
    pub fn from_wire(tag: &str) -> Option<Self> {
        match tag {
            "bt" => Some(Self::GradientBoosting),
            "rf" => Some(Self::RandomForest),
            _ => None,
        }
    }

    pub fn wire(&self) -> &'static str {
        match self {
            Self::GradientBoosting => "bt",
            Self::RandomForest => "rf",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GradientBoosting => "Gradient boosting",
            Self::RandomForest => "Random forest",
        }
    }

    /// Learning rate only means something for boosting.
    pub fn uses_learning_rate(&self) -> bool {
        matches!(self, Self::GradientBoosting)
    }
}

// ─── Summary ──────────────────────────────────────────────────────────────────

/// One `[name, type, description]` tuple from `GET /get_all_models`.
///
/// `kind` is kept as the raw tag so that version skew between server and
/// console shows up as a skipped row in the catalog rather than a failed
/// refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub name: String,
    pub kind: String,
    pub description: String,
}

impl ModelSummary {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            description: description.into(),
        }
    }

    pub fn model_kind(&self) -> Option<ModelKind> {
        ModelKind::from_wire(&self.kind)
    }

    /// Read one catalog tuple. Rows without a string name and type are `None`;
    /// a missing or null description reads as empty.
    pub(crate) fn from_row(row: &Value) -> Option<Self> {
        let cells = row.as_array()?;
        let name = cells.first()?.as_str()?;
        let kind = cells.get(1)?.as_str()?;
        let description = cells.get(2).and_then(Value::as_str).unwrap_or_default();
        Some(Self::new(name, kind, description))
    }
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Raw values of the create form, exactly as typed.
///
/// The server does all validation. Blank optional fields are left out of the
/// request so the server applies its own defaults instead of receiving zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateModelForm {
    pub kind: ModelKind,
    pub name: String,
    pub description: String,
    pub n_estimators: String,
    pub max_depth: String,
    pub feature_subsample_size: String,
    pub learning_rate: String,
}

impl CreateModelForm {
    /// JSON body for `POST /add_model`.
    pub fn payload(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("model_type".into(), Value::from(self.kind.wire()));
        body.insert("model_name".into(), Value::from(self.name.as_str()));
        body.insert("model_descr".into(), Value::from(self.description.as_str()));

        let optional = [
            ("model_est", &self.n_estimators),
            ("model_depth", &self.max_depth),
            ("model_features", &self.feature_subsample_size),
            ("model_lr", &self.learning_rate),
        ];
        for (key, raw) in optional {
            insert_non_blank(&mut body, key, raw);
        }
        body
    }
}

/// Whitespace-only counts as blank. Anything else goes out as typed.
fn insert_non_blank(body: &mut Map<String, Value>, key: &str, raw: &str) {
    if !raw.trim().is_empty() {
        body.insert(key.to_string(), Value::from(raw));
    }
}

// ─── Fit / Predict ────────────────────────────────────────────────────────────

/// Inputs of the fit workflow. Files are only opened when the request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitRequest {
    pub model: String,
    pub train_file: PathBuf,
    pub validation_file: Option<PathBuf>,
    pub target_column: String,
    pub data_description: String,
}

impl FitRequest {
    /// Build from form text. A blank validation path means no validation set.
    pub fn from_form(
        model: &str,
        train_file: &str,
        validation_file: &str,
        target_column: &str,
        data_description: &str,
    ) -> Self {
        let validation_file = validation_file.trim();
        Self {
            model: model.to_string(),
            train_file: PathBuf::from(train_file.trim()),
            validation_file: (!validation_file.is_empty()).then(|| PathBuf::from(validation_file)),
            target_column: target_column.trim().to_string(),
            data_description: data_description.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictRequest {
    pub model: String,
    pub test_file: PathBuf,
    pub column_name: String,
}

impl PredictRequest {
    pub fn from_form(model: &str, test_file: &str, column_name: &str) -> Self {
        Self {
            model: model.to_string(),
            test_file: PathBuf::from(test_file.trim()),
            column_name: column_name.trim().to_string(),
        }
    }

    /// Name under which the prediction CSV is offered.
    pub fn download_name(model: &str) -> String {
        format!("{}_predictions.csv", model)
    }
}

/// File name shown to the server for an upload path.
pub(crate) fn upload_name(path: &Path, fallback: &str) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string())
}

// ─── Detail ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Hyperparameters {
    #[serde(default)]
    pub n_estimators: Option<u32>,
    /// `None` means unbounded depth.
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// `None` means one third of the features.
    #[serde(default)]
    pub feature_subsample_size: Option<f64>,
    #[serde(default)]
    pub learning_rate: Option<f64>,
}

/// Success payload of `GET /get_info_about_model`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModelDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "model_type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub hyperparameters: Hyperparameters,
    #[serde(default)]
    pub is_fitted: bool,
    #[serde(default, alias = "data_descr")]
    pub data_description: Option<String>,
    /// Serialized chart, never interpreted.
    #[serde(default, alias = "plot")]
    pub diagnostics: Option<Value>,
}

/// One label/value line of the info sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    pub label: &'static str,
    pub value: String,
}

impl InfoRow {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self { label, value: value.into() }
    }
}

impl ModelDetail {
    pub fn model_kind(&self) -> Option<ModelKind> {
        ModelKind::from_wire(&self.kind)
    }

    /// Data description, only once the model is fitted.
    pub fn visible_data_description(&self) -> Option<&str> {
        if !self.is_fitted {
            return None;
        }
        self.data_description.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// Diagnostics payload, only once the model is fitted.
    pub fn visible_diagnostics(&self) -> Option<&Value> {
        if !self.is_fitted {
            return None;
        }
        self.diagnostics.as_ref().filter(|d| !d.is_null())
    }

    /// Lines of the info sheet. Fit-only fields are dropped for unfitted
    /// models even when a stale payload still carries them.
    pub fn info_rows(&self) -> Vec<InfoRow> {
        let kind = self.model_kind();
        let hp = &self.hyperparameters;
        let mut rows = vec![
            InfoRow::new("Name", self.name.clone()),
            InfoRow::new("Type", kind.map(|k| k.label().to_string()).unwrap_or_else(|| self.kind.clone())),
        ];

        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            rows.push(InfoRow::new("Description", description));
        }

        rows.push(InfoRow::new(
            "Estimators",
            hp.n_estimators.unwrap_or(DEFAULT_ESTIMATORS).to_string(),
        ));
        rows.push(InfoRow::new(
            "Max depth",
            hp.max_depth.map(|d| d.to_string()).unwrap_or_else(|| "unbounded".to_string()),
        ));
        rows.push(InfoRow::new(
            "Feature subsample",
            hp.feature_subsample_size
                .map(|f| f.to_string())
                .unwrap_or_else(|| "1/3 of features".to_string()),
        ));
        if kind.map_or(false, |k| k.uses_learning_rate()) {
            rows.push(InfoRow::new(
                "Learning rate",
                hp.learning_rate.unwrap_or(DEFAULT_LEARNING_RATE).to_string(),
            ));
        }

        rows.push(InfoRow::new("Fitted", if self.is_fitted { "yes" } else { "no" }));

        if let Some(data) = self.visible_data_description() {
            rows.push(InfoRow::new("Training data", data));
        }
        if let Some(diagnostics) = self.visible_diagnostics() {
            let size = serde_json::to_vec(diagnostics).map(|b| b.len()).unwrap_or(0);
            rows.push(InfoRow::new("Diagnostics", format!("training curves available ({} bytes)", size)));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_wire_tags() {
        assert_eq!(ModelKind::from_wire("bt"), Some(ModelKind::GradientBoosting));
        assert_eq!(ModelKind::from_wire("rf"), Some(ModelKind::RandomForest));
        assert_eq!(ModelKind::from_wire("xx"), None);
        assert_eq!(ModelKind::from_wire("RF"), None);
        assert!(!ModelKind::RandomForest.uses_learning_rate());
    }

    #[test]
    fn test_create_payload_omits_blank_fields() {
        let form = CreateModelForm {
            kind: ModelKind::RandomForest,
            name: "m1".into(),
            description: String::new(),
            n_estimators: String::new(),
            max_depth: "5".into(),
            feature_subsample_size: "  ".into(),
            learning_rate: String::new(),
        };
        let body = form.payload();

        assert_eq!(body.get("model_type"), Some(&json!("rf")));
        assert_eq!(body.get("model_name"), Some(&json!("m1")));
        assert_eq!(body.get("model_depth"), Some(&json!("5")));
        assert!(!body.contains_key("model_est"));
        assert!(!body.contains_key("model_features"));
        assert!(!body.contains_key("model_lr"));
    }

    #[test]
    fn test_create_payload_sends_values_as_typed() {
        let mut form = CreateModelForm {
            name: " gb ".into(),
            description: "boosted ".into(),
            learning_rate: "0.05".into(),
            n_estimators: " 300".into(),
            ..Default::default()
        };
        let body = form.payload();
        assert_eq!(body.get("model_type"), Some(&json!("bt")));
        assert_eq!(body.get("model_name"), Some(&json!(" gb ")));
        assert_eq!(body.get("model_descr"), Some(&json!("boosted ")));
        assert_eq!(body.get("model_lr"), Some(&json!("0.05")));
        assert_eq!(body.get("model_est"), Some(&json!(" 300")));

        // The server decides what a learning rate means for a forest.
        form.kind = ModelKind::RandomForest;
        assert_eq!(form.payload().get("model_lr"), Some(&json!("0.05")));
    }

    #[test]
    fn test_summary_from_row() {
        let row = json!(["m1", "rf", "desc"]);
        assert_eq!(ModelSummary::from_row(&row), Some(ModelSummary::new("m1", "rf", "desc")));

        let null_descr = json!(["m2", "bt", null]);
        assert_eq!(ModelSummary::from_row(&null_descr).map(|s| s.description), Some(String::new()));

        assert_eq!(ModelSummary::from_row(&json!("Error")), None);
        assert_eq!(ModelSummary::from_row(&json!(["only-name"])), None);
    }

    #[test]
    fn test_fit_request_blank_validation() {
        let req = FitRequest::from_form("m1", " train.csv ", "  ", "price", "houses");
        assert_eq!(req.train_file, PathBuf::from("train.csv"));
        assert_eq!(req.validation_file, None);

        let req = FitRequest::from_form("m1", "train.csv", "val.csv", "price", "");
        assert_eq!(req.validation_file, Some(PathBuf::from("val.csv")));
    }

    #[test]
    fn test_detail_accepts_server_aliases() {
        let detail: ModelDetail = serde_json::from_value(json!({
            "name": "m1",
            "model_type": "bt",
            "n_estimators": 50,
            "max_depth": null,
            "learning_rate": 0.2,
            "is_fitted": true,
            "data_descr": "house prices",
            "plot": "{\"data\": []}"
        }))
        .unwrap();

        assert_eq!(detail.hyperparameters.n_estimators, Some(50));
        assert_eq!(detail.hyperparameters.max_depth, None);
        assert_eq!(detail.visible_data_description(), Some("house prices"));
        assert!(detail.visible_diagnostics().is_some());
    }

    #[test]
    fn test_unfitted_detail_hides_fit_fields() {
        let detail = ModelDetail {
            name: "m1".into(),
            kind: "rf".into(),
            is_fitted: false,
            data_description: Some("stale".into()),
            diagnostics: Some(json!({"data": []})),
            ..Default::default()
        };

        let rows = detail.info_rows();
        assert!(rows.iter().all(|r| r.label != "Training data"));
        assert!(rows.iter().all(|r| r.label != "Diagnostics"));
        assert!(rows.iter().all(|r| r.label != "Learning rate"));
        assert!(rows.iter().any(|r| r.label == "Max depth" && r.value == "unbounded"));
        assert!(rows.iter().any(|r| r.label == "Fitted" && r.value == "no"));
    }
}
