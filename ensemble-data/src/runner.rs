//! Background execution of registry calls.
//!
//! Each dispatch runs on its own thread against the shared [`RegistryApi`];
//! the result comes back over one channel that the UI drains with
//! [`RequestRunner::poll`] every frame while anything is in flight. Requests
//! are independent, so they settle in whatever order the server answers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use crate::error::RegistryError;
use crate::orchestrator::{Dispatch, Settled};
use crate::registry_client::RegistryApi;

pub struct RequestRunner {
    api: Arc<dyn RegistryApi>,
    tx: Sender<Settled>,
    rx: Receiver<Settled>,
    in_flight: usize,
}

impl RequestRunner {
    pub fn new(api: Arc<dyn RegistryApi>) -> Self {
        let (tx, rx): (Sender<Settled>, Receiver<Settled>) = mpsc::channel();
        Self { api, tx, rx, in_flight: 0 }
    }

    pub fn submit(&mut self, dispatch: Dispatch) {
        let Dispatch { ticket, operation } = dispatch;
        let workflow = operation.workflow();
        self.in_flight += 1;

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("registry-{:?}", workflow).to_lowercase())
            .spawn({
                let operation = operation.clone();
                move || {
                    let outcome = operation.execute(api.as_ref());
                    let _ = tx.send(Settled { ticket, outcome });
                }
            });

        if let Err(e) = spawned {
            log::error!("Cannot start {:?} request: {}", workflow, e);
            let outcome = operation.fail(RegistryError::Transport(e.to_string()));
            let _ = self.tx.send(Settled { ticket, outcome });
        }
    }

    pub fn submit_all(&mut self, dispatches: Vec<Dispatch>) {
        for dispatch in dispatches {
            self.submit(dispatch);
        }
    }

    /// Everything that settled since the last poll. Never blocks.
    pub fn poll(&mut self) -> Vec<Settled> {
        let mut settled = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            settled.push(item);
        }
        self.in_flight = self.in_flight.saturating_sub(settled.len());
        settled
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Block until one response arrives or `timeout` passes. For headless use.
    pub fn wait(&mut self, timeout: Duration) -> Option<Settled> {
        match self.rx.recv_timeout(timeout) {
            Ok(item) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(item)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreateModelForm, FitRequest, ModelDetail, ModelSummary, PredictRequest};
    use crate::orchestrator::{Operation, Outcome, Slot, Ticket};
    use std::sync::Mutex;
    use std::time::Instant;

    /// Answers from canned data; `delete_model` waits for a release signal.
    struct FakeApi {
        models: Vec<ModelSummary>,
        release: Mutex<Option<Receiver<()>>>,
    }

    impl RegistryApi for FakeApi {
        fn list_models(&self) -> Result<Vec<ModelSummary>, RegistryError> {
            Ok(self.models.clone())
        }

        fn create_model(&self, _form: &CreateModelForm) -> Result<(), RegistryError> {
            Err(RegistryError::Rejected("A model with this name already exists!".into()))
        }

        fn delete_model(&self, _name: &str) -> Result<(), RegistryError> {
            if let Some(rx) = self.release.lock().unwrap().take() {
                let _ = rx.recv();
            }
            Ok(())
        }

        fn fit_model(&self, _request: &FitRequest) -> Result<(), RegistryError> {
            Err(RegistryError::Transport("connection refused".into()))
        }

        fn predict_model(&self, _request: &PredictRequest) -> Result<Vec<u8>, RegistryError> {
            Ok(b"y\n1\n".to_vec())
        }

        fn describe_model(&self, name: &str) -> Result<ModelDetail, RegistryError> {
            Ok(ModelDetail { name: name.into(), kind: "rf".into(), ..Default::default() })
        }
    }

    fn ticket(slot: Slot, seq: u64) -> Ticket {
        Ticket { slot, seq }
    }

    #[test]
    fn test_results_come_back_with_their_ticket() {
        let api = FakeApi { models: vec![ModelSummary::new("m1", "rf", "")], release: Mutex::new(None) };
        let mut runner = RequestRunner::new(Arc::new(api));

        runner.submit(Dispatch { ticket: ticket(Slot::Catalog, 7), operation: Operation::ListModels });
        assert_eq!(runner.in_flight(), 1);

        let settled = runner.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(settled.ticket, ticket(Slot::Catalog, 7));
        assert_eq!(settled.outcome, Outcome::Listed(Ok(vec![ModelSummary::new("m1", "rf", "")])));
        assert_eq!(runner.in_flight(), 0);
    }

    #[test]
    fn test_later_request_can_settle_first() {
        let (release_tx, release_rx) = mpsc::channel();
        let api = FakeApi { models: Vec::new(), release: Mutex::new(Some(release_rx)) };
        let mut runner = RequestRunner::new(Arc::new(api));

        runner.submit_all(vec![
            Dispatch { ticket: ticket(Slot::Dialog, 1), operation: Operation::DeleteModel("slow".into()) },
            Dispatch { ticket: ticket(Slot::Dialog, 2), operation: Operation::DescribeModel("m1".into()) },
        ]);

        let first = runner.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(first.ticket.seq, 2);

        release_tx.send(()).unwrap();
        let second = runner.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(second.outcome, Outcome::Deleted { model: "slow".into(), result: Ok(()) });
        assert_eq!(runner.in_flight(), 0);
    }

    #[test]
    fn test_poll_never_blocks() {
        let api = FakeApi { models: Vec::new(), release: Mutex::new(None) };
        let mut runner = RequestRunner::new(Arc::new(api));
        assert!(runner.poll().is_empty());

        runner.submit(Dispatch {
            ticket: ticket(Slot::Dialog, 1),
            operation: Operation::FitModel(FitRequest::from_form("m1", "t.csv", "", "y", "")),
        });
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut settled = Vec::new();
        while settled.is_empty() && Instant::now() < deadline {
            settled = runner.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(settled.len(), 1);
        assert!(matches!(settled[0].outcome, Outcome::Fitted(Err(RegistryError::Transport(_)))));
    }
}
