//! Mini app core: pure session/request state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, RequestState, SessionState};
pub use types::{
    find_product, AuthResponse, AuthUser, Credential, GenerateResponse, Job, JobStatus,
    PaymentResponse, Product, UserIdentity, ViewState, PRODUCTS,
};
pub use update::update;
pub use view_model::{
    AppViewModel, AUTH_FAILED_MESSAGE, AUTH_UNAVAILABLE_MESSAGE, DEFAULT_PROMPT,
    GENERATION_FAILED_MESSAGE, HISTORY_EMPTY_MESSAGE, HISTORY_FAILED_MESSAGE,
    PAYMENT_FAILED_MESSAGE,
};
