use crate::{Job, RequestState, SessionState, UserIdentity, ViewState};

pub const DEFAULT_PROMPT: &str = "Come up with 5 Instagram post ideas about ...";
pub const AUTH_UNAVAILABLE_MESSAGE: &str =
    "Launch data was not received. Open the app from Telegram.";
pub const AUTH_FAILED_MESSAGE: &str =
    "Authorization failed. Check BOT_TOKEN on the backend and the initData signature.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Generation failed. Check that the API is reachable and that you are authorized.";
pub const HISTORY_FAILED_MESSAGE: &str =
    "Could not load history (the /jobs endpoint may not be implemented yet).";
pub const HISTORY_EMPTY_MESSAGE: &str =
    "Nothing here yet. Once /jobs is implemented your jobs will show up here.";
pub const PAYMENT_FAILED_MESSAGE: &str =
    "Payments are not configured yet (/payments/create endpoint).";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub authenticated: bool,
    pub user: Option<UserIdentity>,
    pub active_view: ViewState,
    /// Any request in flight, authentication included.
    pub busy: bool,
    pub auth_error: Option<String>,
    pub prompt: String,
    pub generate: RequestState,
    pub output: String,
    pub history: RequestState,
    pub jobs: Vec<Job>,
    pub history_error: Option<String>,
    pub billing: RequestState,
    pub billing_error: Option<String>,
    pub payment_redirect: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn can_generate(&self) -> bool {
        self.authenticated && !self.generate.is_busy()
    }

    pub fn can_clear_output(&self) -> bool {
        !self.generate.is_busy()
    }

    pub fn can_buy(&self) -> bool {
        self.authenticated && !self.billing.is_busy()
    }

    /// The empty-history hint is shown instead of a list, independent of errors.
    pub fn shows_empty_history(&self) -> bool {
        self.jobs.is_empty()
    }
}
