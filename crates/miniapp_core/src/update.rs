use crate::view_model::{
    AUTH_FAILED_MESSAGE, AUTH_UNAVAILABLE_MESSAGE, GENERATION_FAILED_MESSAGE,
    HISTORY_FAILED_MESSAGE, PAYMENT_FAILED_MESSAGE,
};
use crate::{
    find_product, AppState, Credential, Effect, GenerateResponse, Msg, RequestState, SessionState,
    ViewState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Launched {
            cached_credential,
            launch_token,
            user,
        } => {
            // Launch happens once per page load.
            if state.session() != SessionState::Unauthenticated {
                return (state, Vec::new());
            }
            state.set_user(user);

            let mut effects = vec![Effect::SignalReady];
            if let Some(credential) = cached_credential {
                // A stored credential is trusted as-is; there is no expiry check.
                state.authenticate(credential);
            } else if launch_token.is_empty() {
                state.fail_authentication(SessionState::AuthUnavailable, AUTH_UNAVAILABLE_MESSAGE);
            } else {
                state.begin_authentication();
                effects.push(Effect::Authenticate { launch_token });
            }
            effects
        }
        Msg::AuthSucceeded(response) => {
            if state.session() != SessionState::Authenticating {
                return (state, Vec::new());
            }
            let credential = if response.ok {
                Credential::new(response.token)
            } else {
                None
            };
            match credential {
                Some(credential) => {
                    state.authenticate(credential.clone());
                    let mut effects = vec![Effect::PersistCredential {
                        credential: credential.clone(),
                    }];
                    if state.active_view() == ViewState::History {
                        state.begin_history_load();
                        effects.push(Effect::ListJobs { credential });
                    }
                    effects
                }
                None => {
                    state.fail_authentication(SessionState::AuthFailed, AUTH_FAILED_MESSAGE);
                    Vec::new()
                }
            }
        }
        Msg::AuthFailed { reason: _ } => {
            if state.session() == SessionState::Authenticating {
                state.fail_authentication(SessionState::AuthFailed, AUTH_FAILED_MESSAGE);
            }
            Vec::new()
        }
        Msg::ViewSelected(view) => {
            if !state.select_view(view) || view != ViewState::History {
                return (state, Vec::new());
            }
            match state.credential().cloned() {
                Some(credential) => {
                    state.begin_history_load();
                    vec![Effect::ListJobs { credential }]
                }
                None => Vec::new(),
            }
        }
        Msg::PromptChanged(prompt) => {
            state.set_prompt(prompt);
            Vec::new()
        }
        Msg::GenerateClicked => {
            // The button is disabled without a credential or while a request is in flight.
            let Some(credential) = state.credential().cloned() else {
                return (state, Vec::new());
            };
            if state.generate_state().is_busy() {
                return (state, Vec::new());
            }
            let prompt = state.prompt().to_string();
            state.begin_generation();
            vec![Effect::SubmitGeneration { credential, prompt }]
        }
        Msg::ClearOutputClicked => {
            if !state.generate_state().is_busy() {
                state.clear_output();
            }
            Vec::new()
        }
        Msg::GenerationSucceeded(response) => {
            match render_generation(&response) {
                Some(output) => state.finish_generation(RequestState::Succeeded, output),
                None => state.finish_generation(
                    RequestState::Failed,
                    GENERATION_FAILED_MESSAGE.to_string(),
                ),
            }
            Vec::new()
        }
        Msg::GenerationFailed { reason: _ } => {
            state.finish_generation(RequestState::Failed, GENERATION_FAILED_MESSAGE.to_string());
            Vec::new()
        }
        Msg::JobsLoaded(jobs) => {
            state.apply_jobs(jobs);
            Vec::new()
        }
        Msg::JobsFailed { reason: _ } => {
            state.fail_history_load(HISTORY_FAILED_MESSAGE);
            Vec::new()
        }
        Msg::BuyClicked { product_id } => {
            let Some(credential) = state.credential().cloned() else {
                return (state, Vec::new());
            };
            if state.billing_state().is_busy() || find_product(&product_id).is_none() {
                return (state, Vec::new());
            }
            state.begin_payment();
            vec![Effect::CreatePayment {
                credential,
                product_id,
            }]
        }
        Msg::PaymentCreated(response) => {
            let url = response.url;
            state.finish_payment(url.clone());
            vec![Effect::OpenPaymentUrl { url }]
        }
        Msg::PaymentFailed { reason: _ } => {
            state.fail_payment(PAYMENT_FAILED_MESSAGE);
            Vec::new()
        }
    };

    (state, effects)
}

/// The generate view shows the response body as received, pretty-printed.
fn render_generation(response: &GenerateResponse) -> Option<String> {
    serde_json::to_string_pretty(response.body()).ok()
}
