//! The single shared dialog.
//!
//! One surface hosts every workflow. Which workflow owns it is a
//! [`DialogState`]; moving between states is the pure [`transition`], which
//! also says what the view has to do about it ([`DialogEffect`]). Widget
//! values never live here: a state change that remounts the body bumps
//! [`DialogController::generation`] and the view clears its inputs.

use crate::model::ModelDetail;

/// Progress of a form workflow.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormStatus {
    #[default]
    Editing,
    Submitting,
    /// Last submit failed; the message stays inline until the next submit.
    Failed(String),
}

/// Body of the info view, filled in asynchronously.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoBody {
    Pending,
    Ready(ModelDetail),
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DialogState {
    #[default]
    Closed,
    CreateForm { status: FormStatus },
    FitForm { model: String, status: FormStatus },
    PredictForm { model: String, status: FormStatus },
    InfoView { model: String, body: InfoBody },
    /// Title, body and a single dismiss action.
    Message { title: String, body: String },
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn title(&self) -> String {
        match self {
            Self::Closed => String::new(),
            Self::CreateForm { .. } => "New model".to_string(),
            Self::FitForm { model, .. } => format!("Fit {}", model),
            Self::PredictForm { model, .. } => format!("Predict with {}", model),
            Self::InfoView { model, .. } => format!("Model {}", model),
            Self::Message { title, .. } => title.clone(),
        }
    }

    /// Target model of a per-row workflow.
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::FitForm { model, .. } | Self::PredictForm { model, .. } | Self::InfoView { model, .. } => {
                Some(model)
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<&FormStatus> {
        match self {
            Self::CreateForm { status } | Self::FitForm { status, .. } | Self::PredictForm { status, .. } => {
                Some(status)
            }
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.status(), Some(FormStatus::Submitting))
    }

    /// Text shown in the body's message line, if any.
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Message { body, .. } => Some(body),
            Self::InfoView { body: InfoBody::Failed(message), .. } => Some(message),
            _ => match self.status() {
                Some(FormStatus::Failed(message)) => Some(message),
                _ => None,
            },
        }
    }

    fn with_status(&self, status: FormStatus) -> Option<Self> {
        match self {
            Self::CreateForm { .. } => Some(Self::CreateForm { status }),
            Self::FitForm { model, .. } => Some(Self::FitForm { model: model.clone(), status }),
            Self::PredictForm { model, .. } => Some(Self::PredictForm { model: model.clone(), status }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    Dismiss,
    OpenCreate,
    OpenFit(String),
    OpenPredict(String),
    OpenInfo(String),
    Submit,
    Succeeded,
    Failed(String),
    DetailLoaded(ModelDetail),
    DetailFailed(String),
    Notify { title: String, body: String },
}

/// What the view must do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEffect {
    /// Event does not apply to the current state; nothing changed.
    Ignored,
    /// Same workflow, new status or body content.
    Update,
    /// New workflow: replace the body and footer, clear every input.
    Mount,
    /// Hide the dialog.
    Unmount,
    /// Mounted the info view; its detail must be fetched now.
    FetchDetail(String),
    /// A form entered `Submitting`; its request may be sent.
    BeginSubmit,
}

/// Next state and effect for `event` in `state`.
pub fn transition(state: &DialogState, event: DialogEvent) -> (DialogState, DialogEffect) {
    use DialogEffect as E;
    use DialogState as S;

    match event {
        DialogEvent::Dismiss => match state {
            S::Closed => (S::Closed, E::Ignored),
            _ => (S::Closed, E::Unmount),
        },

        DialogEvent::OpenCreate => (S::CreateForm { status: FormStatus::Editing }, E::Mount),
        DialogEvent::OpenFit(model) => (S::FitForm { model, status: FormStatus::Editing }, E::Mount),
        DialogEvent::OpenPredict(model) => (S::PredictForm { model, status: FormStatus::Editing }, E::Mount),
        DialogEvent::OpenInfo(model) => {
            let effect = E::FetchDetail(model.clone());
            (S::InfoView { model, body: InfoBody::Pending }, effect)
        }

        DialogEvent::Submit => match state.status() {
            Some(FormStatus::Editing) | Some(FormStatus::Failed(_)) => match state.with_status(FormStatus::Submitting) {
                Some(next) => (next, E::BeginSubmit),
                None => (state.clone(), E::Ignored),
            },
            _ => (state.clone(), E::Ignored),
        },

        DialogEvent::Succeeded if state.is_submitting() => (S::Closed, E::Unmount),
        DialogEvent::Failed(message) if state.is_submitting() => {
            match state.with_status(FormStatus::Failed(message)) {
                Some(next) => (next, E::Update),
                None => (state.clone(), E::Ignored),
            }
        }

        DialogEvent::DetailLoaded(detail) => match state {
            // The caller's ticket already tied this detail to the open view.
            S::InfoView { model, body: InfoBody::Pending } => {
                (S::InfoView { model: model.clone(), body: InfoBody::Ready(detail) }, E::Update)
            }
            _ => (state.clone(), E::Ignored),
        },
        DialogEvent::DetailFailed(message) => match state {
            S::InfoView { model, body: InfoBody::Pending } => {
                (S::InfoView { model: model.clone(), body: InfoBody::Failed(message) }, E::Update)
            }
            _ => (state.clone(), E::Ignored),
        },

        DialogEvent::Notify { title, body } => (S::Message { title, body }, E::Mount),

        DialogEvent::Succeeded | DialogEvent::Failed(_) => (state.clone(), E::Ignored),
    }
}

/// Owns the current [`DialogState`].
#[derive(Debug, Default)]
pub struct DialogController {
    state: DialogState,
    generation: u64,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    /// Bumped every time the body is remounted.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn apply(&mut self, event: DialogEvent) -> DialogEffect {
        let (next, effect) = transition(&self.state, event);
        if matches!(effect, DialogEffect::Mount | DialogEffect::FetchDetail(_)) {
            self.generation += 1;
        }
        if effect != DialogEffect::Ignored {
            log::debug!("dialog: {:?} -> {:?}", self.state.title(), next.title());
        }
        self.state = next;
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(name: &str, fitted: bool) -> ModelDetail {
        ModelDetail {
            name: name.into(),
            kind: "rf".into(),
            is_fitted: fitted,
            ..Default::default()
        }
    }

    #[test]
    fn test_dismiss_from_every_state() {
        let states = [
            DialogState::CreateForm { status: FormStatus::Submitting },
            DialogState::FitForm { model: "m1".into(), status: FormStatus::Editing },
            DialogState::PredictForm { model: "m1".into(), status: FormStatus::Failed("x".into()) },
            DialogState::InfoView { model: "m1".into(), body: InfoBody::Pending },
            DialogState::Message { title: "Error".into(), body: "x".into() },
        ];
        for state in states {
            assert_eq!(transition(&state, DialogEvent::Dismiss), (DialogState::Closed, DialogEffect::Unmount));
        }
        assert_eq!(
            transition(&DialogState::Closed, DialogEvent::Dismiss),
            (DialogState::Closed, DialogEffect::Ignored)
        );
    }

    #[test]
    fn test_open_replaces_previous_workflow() {
        let mut dialog = DialogController::new();
        assert_eq!(dialog.apply(DialogEvent::OpenCreate), DialogEffect::Mount);
        dialog.apply(DialogEvent::Submit);
        dialog.apply(DialogEvent::Failed("name taken".into()));
        let before = dialog.generation();

        assert_eq!(dialog.apply(DialogEvent::OpenFit("m1".into())), DialogEffect::Mount);
        assert_eq!(
            dialog.state(),
            &DialogState::FitForm { model: "m1".into(), status: FormStatus::Editing }
        );
        assert_eq!(dialog.state().notice(), None);
        assert_eq!(dialog.generation(), before + 1);
    }

    #[test]
    fn test_submit_lifecycle() {
        let mut dialog = DialogController::new();
        dialog.apply(DialogEvent::OpenPredict("m1".into()));

        assert_eq!(dialog.apply(DialogEvent::Submit), DialogEffect::BeginSubmit);
        assert!(dialog.state().is_submitting());
        // A second click while the request is out does nothing.
        assert_eq!(dialog.apply(DialogEvent::Submit), DialogEffect::Ignored);

        assert_eq!(dialog.apply(DialogEvent::Failed("model is not fitted".into())), DialogEffect::Update);
        assert_eq!(dialog.state().notice(), Some("model is not fitted"));
        assert_eq!(dialog.state().model(), Some("m1"));

        // Retry from the failed state.
        assert_eq!(dialog.apply(DialogEvent::Submit), DialogEffect::BeginSubmit);
        assert_eq!(dialog.apply(DialogEvent::Succeeded), DialogEffect::Unmount);
        assert!(!dialog.state().is_open());
    }

    #[test]
    fn test_outcomes_outside_submit_are_ignored() {
        let editing = DialogState::CreateForm { status: FormStatus::Editing };
        assert_eq!(transition(&editing, DialogEvent::Succeeded).1, DialogEffect::Ignored);
        assert_eq!(transition(&DialogState::Closed, DialogEvent::Failed("x".into())).1, DialogEffect::Ignored);
        assert_eq!(transition(&DialogState::Closed, DialogEvent::Submit).1, DialogEffect::Ignored);
    }

    #[test]
    fn test_info_view_fetches_then_fills() {
        let mut dialog = DialogController::new();
        assert_eq!(dialog.apply(DialogEvent::OpenInfo("m1".into())), DialogEffect::FetchDetail("m1".into()));
        assert_eq!(dialog.state().title(), "Model m1");
        assert!(matches!(dialog.state(), DialogState::InfoView { body: InfoBody::Pending, .. }));

        assert_eq!(dialog.apply(DialogEvent::DetailLoaded(detail("m1", false))), DialogEffect::Update);
        assert!(matches!(dialog.state(), DialogState::InfoView { body: InfoBody::Ready(_), .. }));

        // Already filled.
        assert_eq!(dialog.apply(DialogEvent::DetailLoaded(detail("m1", true))), DialogEffect::Ignored);
    }

    #[test]
    fn test_info_view_accepts_server_spelling_of_name() {
        let mut dialog = DialogController::new();
        dialog.apply(DialogEvent::OpenInfo("m1".into()));
        assert_eq!(dialog.apply(DialogEvent::DetailLoaded(detail("M1", true))), DialogEffect::Update);
        match dialog.state() {
            DialogState::InfoView { model, body: InfoBody::Ready(d) } => {
                assert_eq!(model, "m1");
                assert_eq!(d.name, "M1");
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_info_view_failure() {
        let mut dialog = DialogController::new();
        dialog.apply(DialogEvent::OpenInfo("m1".into()));
        dialog.apply(DialogEvent::DetailFailed("No such model".into()));
        assert_eq!(dialog.state().notice(), Some("No such model"));
    }

    #[test]
    fn test_notify_mounts_message() {
        let mut dialog = DialogController::new();
        let effect = dialog.apply(DialogEvent::Notify { title: "Error".into(), body: "No such model".into() });
        assert_eq!(effect, DialogEffect::Mount);
        assert_eq!(dialog.state().title(), "Error");
        assert_eq!(dialog.state().notice(), Some("No such model"));
    }
}
