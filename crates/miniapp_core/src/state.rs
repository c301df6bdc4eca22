use crate::view_model::{AppViewModel, DEFAULT_PROMPT};
use crate::{Credential, Job, UserIdentity, ViewState};

/// Session dimension of the state machine.
///
/// `AuthUnavailable` and `AuthFailed` are terminal until the app is relaunched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
    AuthUnavailable,
    AuthFailed,
}

/// Per-view request lifecycle: `Idle -> Busy -> {Succeeded, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Busy,
    Succeeded,
    Failed,
}

impl RequestState {
    pub fn is_busy(self) -> bool {
        self == RequestState::Busy
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    session: SessionState,
    credential: Option<Credential>,
    user: Option<UserIdentity>,
    view: ViewState,
    auth_error: Option<String>,
    prompt: String,
    generate: RequestState,
    output: String,
    history: RequestState,
    jobs: Vec<Job>,
    history_error: Option<String>,
    billing: RequestState,
    billing_error: Option<String>,
    pending_redirect: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: SessionState::default(),
            credential: None,
            user: None,
            view: ViewState::default(),
            auth_error: None,
            prompt: DEFAULT_PROMPT.to_string(),
            generate: RequestState::default(),
            output: String::new(),
            history: RequestState::default(),
            jobs: Vec::new(),
            history_error: None,
            billing: RequestState::default(),
            billing_error: None,
            pending_redirect: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            authenticated: self.credential.is_some(),
            user: self.user.clone(),
            active_view: self.view,
            busy: self.session == SessionState::Authenticating
                || self.generate.is_busy()
                || self.history.is_busy()
                || self.billing.is_busy(),
            auth_error: self.auth_error.clone(),
            prompt: self.prompt.clone(),
            generate: self.generate,
            output: self.output.clone(),
            history: self.history,
            jobs: self.jobs.clone(),
            history_error: self.history_error.clone(),
            billing: self.billing,
            billing_error: self.billing_error.clone(),
            payment_redirect: self.pending_redirect.clone(),
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn active_view(&self) -> ViewState {
        self.view
    }

    pub fn generate_state(&self) -> RequestState {
        self.generate
    }

    pub fn history_state(&self) -> RequestState {
        self.history
    }

    pub fn billing_state(&self) -> RequestState {
        self.billing
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_user(&mut self, user: Option<UserIdentity>) {
        self.user = user;
        self.mark_dirty();
    }

    pub(crate) fn begin_authentication(&mut self) {
        self.session = SessionState::Authenticating;
        self.mark_dirty();
    }

    pub(crate) fn authenticate(&mut self, credential: Credential) {
        self.session = SessionState::Authenticated;
        self.credential = Some(credential);
        self.auth_error = None;
        self.mark_dirty();
    }

    pub(crate) fn fail_authentication(&mut self, session: SessionState, message: &str) {
        self.session = session;
        self.auth_error = Some(message.to_string());
        self.mark_dirty();
    }

    /// Returns `true` when the active view actually changed.
    pub(crate) fn select_view(&mut self, view: ViewState) -> bool {
        if self.view == view {
            return false;
        }
        self.view = view;
        self.mark_dirty();
        true
    }

    pub(crate) fn set_prompt(&mut self, prompt: String) {
        if self.prompt != prompt {
            self.prompt = prompt;
            self.mark_dirty();
        }
    }

    pub(crate) fn prompt(&self) -> &str {
        &self.prompt
    }

    pub(crate) fn begin_generation(&mut self) {
        self.generate = RequestState::Busy;
        self.output.clear();
        self.mark_dirty();
    }

    pub(crate) fn finish_generation(&mut self, outcome: RequestState, output: String) {
        self.generate = outcome;
        self.output = output;
        self.mark_dirty();
    }

    pub(crate) fn clear_output(&mut self) {
        if !self.output.is_empty() {
            self.output.clear();
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_history_load(&mut self) {
        self.history = RequestState::Busy;
        self.history_error = None;
        self.mark_dirty();
    }

    pub(crate) fn apply_jobs(&mut self, jobs: Vec<Job>) {
        self.history = RequestState::Succeeded;
        self.jobs = jobs;
        self.mark_dirty();
    }

    /// Keeps the previously loaded jobs.
    pub(crate) fn fail_history_load(&mut self, message: &str) {
        self.history = RequestState::Failed;
        self.history_error = Some(message.to_string());
        self.mark_dirty();
    }

    pub(crate) fn begin_payment(&mut self) {
        self.billing = RequestState::Busy;
        self.billing_error = None;
        self.pending_redirect = None;
        self.mark_dirty();
    }

    pub(crate) fn finish_payment(&mut self, url: String) {
        self.billing = RequestState::Succeeded;
        self.pending_redirect = Some(url);
        self.mark_dirty();
    }

    pub(crate) fn fail_payment(&mut self, message: &str) {
        self.billing = RequestState::Failed;
        self.billing_error = Some(message.to_string());
        self.mark_dirty();
    }
}
