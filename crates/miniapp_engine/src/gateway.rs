use miniapp_core::{AuthResponse, Credential, GenerateResponse, Job, PaymentResponse};
use miniapp_logging::{miniapp_debug, miniapp_info, miniapp_warn, redacted};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{ApiError, FailureKind};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// The remote mini app API. None of the calls retry.
#[async_trait::async_trait]
pub trait ApiGateway: Send + Sync {
    /// Exchanges the host's launch payload for a credential.
    async fn authenticate(&self, launch_token: &str) -> Result<AuthResponse, ApiError>;

    async fn submit_generation(
        &self,
        credential: &Credential,
        prompt: &str,
    ) -> Result<GenerateResponse, ApiError>;

    /// Jobs in server order. A missing endpoint (404) lists as empty.
    async fn list_jobs(&self, credential: &Credential) -> Result<Vec<Job>, ApiError>;

    async fn create_payment(
        &self,
        credential: &Credential,
        product_id: &str,
    ) -> Result<PaymentResponse, ApiError>;

    async fn health(&self) -> Result<(), ApiError>;
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    #[serde(rename = "initData")]
    init_data: &'a str,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
struct PaymentRequest<'a> {
    #[serde(rename = "productId")]
    product_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestGateway {
    /// Timeouts are left to the transport defaults.
    pub fn new(settings: GatewaySettings) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base address", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        credential: Option<&Credential>,
    ) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match credential {
            Some(credential) => builder.bearer_auth(credential.as_str()),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await.map_err(map_reqwest_error)?;
        miniapp_debug!("{} -> {}", path, response.status());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl ApiGateway for ReqwestGateway {
    async fn authenticate(&self, launch_token: &str) -> Result<AuthResponse, ApiError> {
        miniapp_info!("Authenticating with launch data {}", redacted(launch_token));
        let builder = self
            .request(Method::POST, "/auth/telegram", None)
            .json(&AuthRequest {
                init_data: launch_token,
            });
        let response = self.send(builder, "/auth/telegram").await?;

        let status = response.status();
        if !status.is_success() {
            miniapp_warn!("Authentication rejected with {}", status);
            return Err(ApiError::new(
                FailureKind::AuthRejected(status.as_u16()),
                status.to_string(),
            ));
        }
        decode(response).await
    }

    async fn submit_generation(
        &self,
        credential: &Credential,
        prompt: &str,
    ) -> Result<GenerateResponse, ApiError> {
        miniapp_info!("Submitting generation prompt_len={}", prompt.len());
        let builder = self
            .request(Method::POST, "/generate", Some(credential))
            .json(&GenerateRequest { prompt });
        let response = self.send(builder, "/generate").await?;
        decode(require_success(response)?).await
    }

    async fn list_jobs(&self, credential: &Credential) -> Result<Vec<Job>, ApiError> {
        let builder = self.request(Method::GET, "/jobs", Some(credential));
        let response = self.send(builder, "/jobs").await?;
        if response.status() == StatusCode::NOT_FOUND {
            miniapp_info!("/jobs not found; listing as empty");
            return Ok(Vec::new());
        }
        decode(require_success(response)?).await
    }

    async fn create_payment(
        &self,
        credential: &Credential,
        product_id: &str,
    ) -> Result<PaymentResponse, ApiError> {
        miniapp_info!("Creating payment product_id={}", product_id);
        let builder = self
            .request(Method::POST, "/payments/create", Some(credential))
            .json(&PaymentRequest { product_id });
        let response = self.send(builder, "/payments/create").await?;
        decode(require_success(response)?).await
    }

    async fn health(&self) -> Result<(), ApiError> {
        let builder = self.request(Method::GET, "/health", None);
        let response = self.send(builder, "/health").await?;
        require_success(response).map(|_| ())
    }
}

fn require_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
