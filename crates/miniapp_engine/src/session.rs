use std::collections::VecDeque;
use std::sync::Arc;

use miniapp_core::{update, AppState, AppViewModel, Effect, Msg};
use miniapp_logging::{miniapp_debug, miniapp_error, miniapp_info, miniapp_warn};

use crate::gateway::ApiGateway;
use crate::host::{LaunchContext, Navigator};
use crate::storage::{load_credential, save_credential, LocalStorage};

/// Drives the pure state machine: runs each effect and feeds its outcome back in.
///
/// Everything happens on the caller's task, one effect at a time.
pub struct SessionController {
    state: AppState,
    gateway: Arc<dyn ApiGateway>,
    launch: Arc<dyn LaunchContext>,
    storage: Arc<dyn LocalStorage>,
    navigator: Arc<dyn Navigator>,
}

impl SessionController {
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        launch: Arc<dyn LaunchContext>,
        storage: Arc<dyn LocalStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            state: AppState::new(),
            gateway,
            launch,
            storage,
            navigator,
        }
    }

    /// First render: picks up a cached credential or authenticates with the launch token.
    pub async fn start(&mut self) {
        let cached_credential = match load_credential(self.storage.as_ref()) {
            Ok(credential) => credential,
            Err(err) => {
                miniapp_warn!("Could not read cached credential: {}", err);
                None
            }
        };
        let launch_token = self.launch.read_launch_token();
        let user = self.launch.read_user();
        miniapp_info!(
            "Launch: cached_credential={} launch_token_len={} user={:?}",
            cached_credential.is_some(),
            launch_token.len(),
            user.as_ref().map(|u| u.id)
        );

        self.dispatch(Msg::Launched {
            cached_credential,
            launch_token,
            user,
        })
        .await;
    }

    /// Applies `msg` and every message produced by the effects it triggers.
    pub async fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(reply) = self.run_effect(effect).await {
                    inbox.push_back(reply);
                }
            }
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    async fn run_effect(&self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::SignalReady => {
                self.launch.signal_ready();
                None
            }
            Effect::Authenticate { launch_token } => {
                match self.gateway.authenticate(&launch_token).await {
                    Ok(response) => {
                        miniapp_info!("Authenticated telegram_id={}", response.user.telegram_id);
                        Some(Msg::AuthSucceeded(response))
                    }
                    Err(err) => {
                        miniapp_warn!("Authentication failed: {}", err);
                        Some(Msg::AuthFailed {
                            reason: err.to_string(),
                        })
                    }
                }
            }
            Effect::PersistCredential { credential } => {
                if let Err(err) = save_credential(self.storage.as_ref(), &credential) {
                    miniapp_error!("Failed to persist credential: {}", err);
                }
                None
            }
            Effect::SubmitGeneration { credential, prompt } => {
                match self.gateway.submit_generation(&credential, &prompt).await {
                    Ok(response) => {
                        miniapp_info!(
                            "Generation accepted job_id={} status={}",
                            response.job_id(),
                            response.status()
                        );
                        Some(Msg::GenerationSucceeded(response))
                    }
                    Err(err) => {
                        miniapp_warn!("Generation failed: {}", err);
                        Some(Msg::GenerationFailed {
                            reason: err.to_string(),
                        })
                    }
                }
            }
            Effect::ListJobs { credential } => match self.gateway.list_jobs(&credential).await {
                Ok(jobs) => {
                    miniapp_debug!("Loaded {} job(s)", jobs.len());
                    Some(Msg::JobsLoaded(jobs))
                }
                Err(err) => {
                    miniapp_warn!("Listing jobs failed: {}", err);
                    Some(Msg::JobsFailed {
                        reason: err.to_string(),
                    })
                }
            },
            Effect::CreatePayment {
                credential,
                product_id,
            } => match self.gateway.create_payment(&credential, &product_id).await {
                Ok(response) => Some(Msg::PaymentCreated(response)),
                Err(err) => {
                    miniapp_warn!("Payment creation for {} failed: {}", product_id, err);
                    Some(Msg::PaymentFailed {
                        reason: err.to_string(),
                    })
                }
            },
            Effect::OpenPaymentUrl { url } => {
                self.navigator.open(&url);
                None
            }
        }
    }
}
