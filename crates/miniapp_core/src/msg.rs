use crate::{AuthResponse, Credential, GenerateResponse, Job, PaymentResponse, UserIdentity, ViewState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// First render: what storage and the host handed us.
    Launched {
        cached_credential: Option<Credential>,
        launch_token: String,
        user: Option<UserIdentity>,
    },
    /// User picked a tab.
    ViewSelected(ViewState),
    /// User edited the prompt input.
    PromptChanged(String),
    /// User clicked Generate.
    GenerateClicked,
    /// User clicked Clear on the generate view.
    ClearOutputClicked,
    /// User clicked one of the purchase buttons.
    BuyClicked { product_id: String },
    AuthSucceeded(AuthResponse),
    AuthFailed { reason: String },
    GenerationSucceeded(GenerateResponse),
    GenerationFailed { reason: String },
    JobsLoaded(Vec<Job>),
    JobsFailed { reason: String },
    PaymentCreated(PaymentResponse),
    PaymentFailed { reason: String },
}
