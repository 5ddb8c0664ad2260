use crate::error::RelayError;
use crate::models::conversation::ConversationTurn;
use log::error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headers attached to every invocation result, success or failure.
pub const RESPONSE_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
    ("Access-Control-Allow-Methods", "OPTIONS,POST"),
];

const FALLBACK_BODY: &str = r#"{"success":false,"error":"Failed to encode response"}"#;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RequestContext {
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Authorizer {
    #[serde(default)]
    pub claims: Option<UserClaims>,
}

/// The identity fields we read from the authorizer. Other claims are dropped.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UserClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "cognito:username")]
    pub username: Option<String>,
}

impl UserClaims {
    pub fn display_name(&self) -> Option<&str> {
        self.email.as_deref().or(self.username.as_deref())
    }
}

impl InvocationEvent {
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            request_context: None,
        }
    }

    pub fn claims(&self) -> Option<&UserClaims> {
        self.request_context
            .as_ref()?
            .authorizer
            .as_ref()?
            .claims
            .as_ref()
    }
}

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<ConversationTurn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl InvocationResponse {
    pub fn success(reply: String, history: Vec<ConversationTurn>) -> Self {
        Self::new(
            200,
            &ResponseEnvelope {
                success: true,
                response: Some(reply),
                conversation_history: Some(history),
                error: None,
            },
        )
    }

    pub fn failure(err: &RelayError) -> Self {
        Self::new(
            err.status_code().as_u16(),
            &ResponseEnvelope {
                success: false,
                error: Some(err.to_string()),
                ..Default::default()
            },
        )
    }

    fn new(status_code: u16, envelope: &ResponseEnvelope) -> Self {
        let body = match serde_json::to_string(envelope) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to encode response envelope: {}", e);
                FALLBACK_BODY.to_string()
            }
        };
        Self {
            status_code,
            headers: default_headers(),
            body,
        }
    }

    pub fn envelope(&self) -> serde_json::Result<ResponseEnvelope> {
        serde_json::from_str(&self.body)
    }
}

pub fn default_headers() -> BTreeMap<String, String> {
    RESPONSE_HEADERS
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
