use crate::Credential;

/// Side effects requested by [`crate::update`]; executed by the engine in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Tell the host the UI is interactive and ask for the full viewport.
    SignalReady,
    Authenticate { launch_token: String },
    PersistCredential { credential: Credential },
    SubmitGeneration { credential: Credential, prompt: String },
    ListJobs { credential: Credential },
    CreatePayment { credential: Credential, product_id: String },
    /// Hand the payment provider's page over to the host.
    OpenPaymentUrl { url: String },
}
