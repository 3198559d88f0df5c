//! Blocking client for the model registry endpoints.
//!
//!   GET  /get_all_models                      → [[name, type, description], ...]
//!   POST /add_model             (JSON)         → tagged result
//!   GET  /delete_model?model_name=            → tagged result
//!   GET  /get_info_about_model?model_name=    → tagged result, payload = detail
//!   POST /fit_model             (multipart)    → tagged result
//!   POST /predict               (multipart)    → CSV bytes, or tagged error
//!
//! Every call is one request and one response. Nothing is retried.

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::config::ConsoleConfig;
use crate::error::RegistryError;
use crate::model::{upload_name, CreateModelForm, FitRequest, ModelDetail, ModelSummary, PredictRequest};
use crate::tagged::{self, Tagged};

/// The six registry operations.
///
/// Implemented by [`RegistryClient`] over HTTP; the request runner only sees
/// this trait.
pub trait RegistryApi: Send + Sync {
    fn list_models(&self) -> Result<Vec<ModelSummary>, RegistryError>;
    fn create_model(&self, form: &CreateModelForm) -> Result<(), RegistryError>;
    fn delete_model(&self, name: &str) -> Result<(), RegistryError>;
    fn fit_model(&self, request: &FitRequest) -> Result<(), RegistryError>;
    fn predict_model(&self, request: &PredictRequest) -> Result<Vec<u8>, RegistryError>;
    fn describe_model(&self, name: &str) -> Result<ModelDetail, RegistryError>;
}

/// All calls block the calling thread; run them off the UI thread.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
    request_timeout: Duration,
    transfer_timeout: Duration,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self {
            base_url: url,
            request_timeout: Duration::from_secs(10),
            transfer_timeout: Duration::from_secs(600),
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.base_url.clone())
            .with_timeouts(config.request_timeout(), config.transfer_timeout())
    }

    pub fn with_timeouts(mut self, request: Duration, transfer: Duration) -> Self {
        self.request_timeout = request;
        self.transfer_timeout = transfer;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Internal ─────────────────────────────────────────────────────────────

    fn client(&self, timeout: Duration) -> Result<Client, RegistryError> {
        Ok(Client::builder().timeout(timeout).build()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Body of a 2xx response. Any other status is a transport-class failure
    /// unless the body is a tagged error, whose message is kept.
    fn body(resp: Response) -> Result<Vec<u8>, RegistryError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.bytes()?.to_vec());
        }
        if let Ok(body) = resp.bytes() {
            if let Ok(Tagged::Error(message)) = Tagged::from_slice(&body) {
                return Err(RegistryError::Rejected(message));
            }
        }
        Err(RegistryError::Status(status.as_u16()))
    }

    fn tagged(resp: Response) -> Result<Option<Value>, RegistryError> {
        let body = Self::body(resp)?;
        Tagged::from_slice(&body)?.into_result()
    }

    fn get_by_name(&self, path: &str, name: &str) -> Result<Option<Value>, RegistryError> {
        log::debug!("GET {} model_name={}", path, name);
        let resp = self
            .client(self.request_timeout)?
            .get(self.url(path))
            .query(&[("model_name", name)])
            .send()?;
        Self::tagged(resp)
    }
}

/// Multipart part for an upload, read from disk right now.
fn upload_part(path: &Path, fallback_name: &str) -> Result<Part, RegistryError> {
    let bytes = std::fs::read(path).map_err(|e| RegistryError::File {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(Part::bytes(bytes)
        .file_name(upload_name(path, fallback_name))
        .mime_str("text/csv")?)
}

impl RegistryApi for RegistryClient {
    fn list_models(&self) -> Result<Vec<ModelSummary>, RegistryError> {
        log::debug!("GET /get_all_models");
        let resp = self.client(self.request_timeout)?.get(self.url("/get_all_models")).send()?;
        let body = Self::body(resp)?;
        let value: Value =
            serde_json::from_slice(&body).map_err(|e| RegistryError::Malformed(e.to_string()))?;
        let rows = value
            .as_array()
            .ok_or_else(|| RegistryError::Malformed("model list is not an array".into()))?;

        let models: Vec<ModelSummary> = rows.iter().filter_map(ModelSummary::from_row).collect();
        if models.len() != rows.len() {
            log::debug!("list_models: ignored {} unreadable rows", rows.len() - models.len());
        }
        Ok(models)
    }

    fn create_model(&self, form: &CreateModelForm) -> Result<(), RegistryError> {
        log::debug!("POST /add_model name={}", form.name);
        let resp = self
            .client(self.request_timeout)?
            .post(self.url("/add_model"))
            .json(&form.payload())
            .send()?;
        Self::tagged(resp).map(|_| ())
    }

    fn delete_model(&self, name: &str) -> Result<(), RegistryError> {
        self.get_by_name("/delete_model", name).map(|_| ())
    }

    fn fit_model(&self, request: &FitRequest) -> Result<(), RegistryError> {
        log::debug!("POST /fit_model model={}", request.model);
        let mut form = Form::new()
            .part("train", upload_part(&request.train_file, "train.csv")?)
            .text("target", request.target_column.clone())
            .text("model", request.model.clone())
            .text("data_description", request.data_description.clone());
        if let Some(validation) = &request.validation_file {
            form = form.part("val", upload_part(validation, "val.csv")?);
        }

        let resp = self
            .client(self.transfer_timeout)?
            .post(self.url("/fit_model"))
            .multipart(form)
            .send()?;
        Self::tagged(resp).map(|_| ())
    }

    fn predict_model(&self, request: &PredictRequest) -> Result<Vec<u8>, RegistryError> {
        log::debug!("POST /predict model={}", request.model);
        let form = Form::new()
            .part("test", upload_part(&request.test_file, "test.csv")?)
            .text("model", request.model.clone())
            .text("column_name", request.column_name.clone());

        let resp = self
            .client(self.transfer_timeout)?
            .post(self.url("/predict"))
            .multipart(form)
            .send()?;
        tagged::csv_payload(Self::body(resp)?)
    }

    fn describe_model(&self, name: &str) -> Result<ModelDetail, RegistryError> {
        let payload = self
            .get_by_name("/get_info_about_model", name)?
            .ok_or_else(|| RegistryError::Malformed("model info without payload".into()))?;
        let mut detail: ModelDetail =
            serde_json::from_value(payload).map_err(|e| RegistryError::Malformed(e.to_string()))?;
        if detail.name.is_empty() {
            detail.name = name.to_string();
        }
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelKind;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::io::Write;

    fn client_for(server: &MockServer) -> RegistryClient {
        RegistryClient::new(server.base_url())
            .with_timeouts(Duration::from_secs(5), Duration::from_secs(5))
    }

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_new_trims_trailing_slashes() {
        assert_eq!(RegistryClient::new("http://host:5000//").base_url(), "http://host:5000");
    }

    #[test]
    fn test_list_models_keeps_raw_kind() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/get_all_models");
            then.status(200).json_body(json!([["m1", "rf", "desc"], ["m2", "xx", "bad"]]));
        });

        let models = client_for(&server).list_models().unwrap();
        mock.assert();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].model_kind(), Some(ModelKind::RandomForest));
        assert_eq!(models[1].model_kind(), None);
    }

    #[test]
    fn test_list_models_http_failure_is_transport() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/get_all_models");
            then.status(500).body("boom");
        });

        let err = client_for(&server).list_models().unwrap_err();
        assert_eq!(err, RegistryError::Status(500));
        assert!(err.is_transport());
    }

    #[test]
    fn test_create_model_sends_only_filled_fields() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/add_model").json_body(json!({
                "model_type": "rf",
                "model_name": "m1",
                "model_descr": "",
                "model_depth": "5"
            }));
            then.status(200).json_body(json!(["OK"]));
        });

        let form = CreateModelForm {
            kind: ModelKind::RandomForest,
            name: "m1".into(),
            max_depth: "5".into(),
            ..Default::default()
        };
        client_for(&server).create_model(&form).unwrap();
        mock.assert();
    }

    #[test]
    fn test_create_model_rejection_is_verbatim() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/add_model");
            then.status(200).json_body(json!(["Error", "A model with this name already exists!"]));
        });

        let err = client_for(&server).create_model(&CreateModelForm::default()).unwrap_err();
        assert_eq!(err, RegistryError::Rejected("A model with this name already exists!".into()));
    }

    #[test]
    fn test_delete_model_passes_name_as_query() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/delete_model").query_param("model_name", "my model");
            then.status(200).json_body(json!(["OK"]));
        });

        client_for(&server).delete_model("my model").unwrap();
        mock.assert();
    }

    #[test]
    fn test_fit_model_multipart_without_validation() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/fit_model")
                .body_contains("name=\"train\"")
                .body_contains("name=\"target\"")
                .body_contains("price")
                .body_contains("name=\"data_description\"");
            then.status(200).json_body(json!(["OK"]));
        });
        let with_validation = server.mock(|when, then| {
            when.method(POST).path("/fit_model").body_contains("name=\"val\"");
            then.status(200).json_body(json!(["Error", "val part was sent"]));
        });

        let train = csv_file("a,b,price\n1,2,3\n");
        let request = FitRequest {
            model: "m1".into(),
            train_file: train.path().to_path_buf(),
            validation_file: None,
            target_column: "price".into(),
            data_description: "houses".into(),
        };
        client_for(&server).fit_model(&request).unwrap();
        mock.assert();
        with_validation.assert_hits(0);
    }

    #[test]
    fn test_fit_model_rejected() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/fit_model")
                .body_contains("name=\"train\"")
                .body_contains("name=\"val\"");
            then.status(200).json_body(json!(["Error", "target column not found"]));
        });

        let train = csv_file("a,b\n1,2\n");
        let val = csv_file("a,b\n3,4\n");
        let request = FitRequest {
            model: "m1".into(),
            train_file: train.path().to_path_buf(),
            validation_file: Some(val.path().to_path_buf()),
            target_column: "price".into(),
            data_description: String::new(),
        };
        let err = client_for(&server).fit_model(&request).unwrap_err();
        mock.assert();
        assert_eq!(err.rejection(), Some("target column not found"));
    }

    #[test]
    fn test_fit_model_missing_file_never_sends() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/fit_model");
            then.status(200).json_body(json!(["OK"]));
        });

        let request = FitRequest::from_form("m1", "/definitely/not/here.csv", "", "y", "");
        let err = client_for(&server).fit_model(&request).unwrap_err();
        assert!(matches!(err, RegistryError::File { .. }));
        mock.assert_hits(0);
    }

    #[test]
    fn test_predict_returns_csv_bytes() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/predict")
                .body_contains("name=\"test\"")
                .body_contains("a,b\n1,2")
                .body_contains("name=\"model\"")
                .body_contains("name=\"column_name\"");
            then.status(200).header("content-type", "text/csv").body("y\n1.5\n");
        });

        let test = csv_file("a,b\n1,2\n");
        let request = PredictRequest {
            model: "m1".into(),
            test_file: test.path().to_path_buf(),
            column_name: "y".into(),
        };
        assert_eq!(client_for(&server).predict_model(&request).unwrap(), b"y\n1.5\n".to_vec());
        mock.assert();
    }

    #[test]
    fn test_predict_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/predict");
            then.status(200).json_body(json!(["Error", "model is not fitted"]));
        });

        let test = csv_file("a,b\n1,2\n");
        let request = PredictRequest::from_form("m1", &test.path().display().to_string(), "y");
        let err = client_for(&server).predict_model(&request).unwrap_err();
        assert_eq!(err, RegistryError::Rejected("model is not fitted".into()));
    }

    #[test]
    fn test_error_status_keeps_tagged_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/delete_model");
            then.status(404).json_body(json!(["Error", "No such model"]));
        });

        let err = client_for(&server).delete_model("m1").unwrap_err();
        assert_eq!(err.rejection(), Some("No such model"));
    }

    #[test]
    fn test_describe_model() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/get_info_about_model").query_param("model_name", "m1");
            then.status(200).json_body(json!(["OK", {
                "model_type": "bt",
                "n_estimators": 100,
                "learning_rate": 0.1,
                "is_fitted": false
            }]));
        });

        let detail = client_for(&server).describe_model("m1").unwrap();
        assert_eq!(detail.name, "m1");
        assert_eq!(detail.model_kind(), Some(ModelKind::GradientBoosting));
        assert!(!detail.is_fitted);
    }

    #[test]
    fn test_unreachable_server_is_transport() {
        let client = RegistryClient::new("http://127.0.0.1:1")
            .with_timeouts(Duration::from_secs(2), Duration::from_secs(2));
        let err = client.delete_model("m1").unwrap_err();
        assert!(matches!(err, RegistryError::Transport(_)));
    }
}
