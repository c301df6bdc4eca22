use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-issued bearer token. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep tokens out of debug output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} chars>)", self.0.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Generate,
    History,
    Billing,
}

impl ViewState {
    pub const ALL: [ViewState; 3] = [ViewState::Generate, ViewState::History, ViewState::Billing];
}

/// Identity of the host platform user, as reported in the launch context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

impl UserIdentity {
    /// `@username` when known, otherwise the first name, otherwise empty.
    pub fn display_name(&self) -> String {
        match (&self.username, &self.first_name) {
            (Some(username), _) if !username.is_empty() => format!("@{username}"),
            (_, Some(first_name)) => first_name.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
}

/// One generation request as recorded by the server.
///
/// `status` stays free text here: the listing shows whatever the server reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: String,
    pub prompt: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub telegram_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub ok: bool,
    pub token: String,
    pub user: AuthUser,
}

impl JobStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "done" => Some(Self::Done),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Reply of the generation endpoint.
///
/// The typed fields are read out of the body, which is kept exactly as the
/// server sent it: explicit nulls and unknown fields survive re-serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub struct GenerateResponse {
    job_id: String,
    status: String,
    echo_prompt: Option<String>,
    result_text: Option<String>,
    body: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateFields {
    job_id: String,
    status: String,
    #[serde(default)]
    echo_prompt: Option<String>,
    #[serde(default)]
    result_text: Option<String>,
}

impl GenerateResponse {
    pub fn from_body(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        let fields = GenerateFields::deserialize(&body)?;
        Ok(Self {
            job_id: fields.job_id,
            status: fields.status,
            echo_prompt: fields.echo_prompt,
            result_text: fields.result_text,
            body,
        })
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Status text as reported; the server may use values outside [`JobStatus`].
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn job_status(&self) -> Option<JobStatus> {
        JobStatus::parse(&self.status)
    }

    pub fn echo_prompt(&self) -> Option<&str> {
        self.echo_prompt.as_deref()
    }

    pub fn result_text(&self) -> Option<&str> {
        self.result_text.as_deref()
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }
}

impl TryFrom<serde_json::Value> for GenerateResponse {
    type Error = serde_json::Error;

    fn try_from(body: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_body(body)
    }
}

impl From<GenerateResponse> for serde_json::Value {
    fn from(response: GenerateResponse) -> Self {
        response.body
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub url: String,
}

/// A purchasable item offered on the billing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub id: &'static str,
    pub label: &'static str,
}

pub static PRODUCTS: [Product; 2] = [
    Product {
        id: "credits_100",
        label: "Buy 100 credits",
    },
    Product {
        id: "sub_month",
        label: "Monthly subscription",
    },
];

pub fn find_product(product_id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|product| product.id == product_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_not_a_credential() {
        assert!(Credential::new("").is_none());
        assert_eq!(Credential::new(" ").unwrap().as_str(), " ");
        assert_eq!(Credential::new("sess_1").unwrap().as_str(), "sess_1");
    }

    #[test]
    fn credential_debug_hides_token() {
        let credential = Credential::new("sess_secret").unwrap();
        assert!(!format!("{credential:?}").contains("secret"));
    }

    #[test]
    fn display_name_prefers_username() {
        let user = UserIdentity {
            id: 42,
            username: Some("alice".into()),
            first_name: Some("Alice".into()),
        };
        assert_eq!(user.display_name(), "@alice");

        let user = UserIdentity {
            username: None,
            ..user
        };
        assert_eq!(user.display_name(), "Alice");

        let user = UserIdentity {
            first_name: None,
            ..user
        };
        assert_eq!(user.display_name(), "");
    }

    #[test]
    fn job_tolerates_missing_result_and_unknown_status() {
        let job: Job = serde_json::from_str(
            r#"{"id":"j1","status":"archived","prompt":"hi","created_at":"2024-01-01T00:00:00+00:00"}"#,
        )
        .unwrap();
        assert_eq!(job.status, "archived");
        assert_eq!(job.result_text, None);
    }

    #[test]
    fn generate_response_keeps_body_verbatim() {
        let body = serde_json::json!({
            "job_id": "j1",
            "status": "pending",
            "echo_prompt": "hi",
            "result_text": null,
            "eta_seconds": 5
        });
        let response: GenerateResponse = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(response.job_id(), "j1");
        assert_eq!(response.status(), "pending");
        assert_eq!(response.job_status(), None);
        assert_eq!(response.result_text(), None);
        assert_eq!(serde_json::to_value(&response).unwrap(), body);
    }

    #[test]
    fn generate_response_requires_job_id() {
        assert!(GenerateResponse::from_body(serde_json::json!({ "status": "queued" })).is_err());
    }
}
