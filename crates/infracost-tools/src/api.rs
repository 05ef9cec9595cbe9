//! Infracost Cloud REST Backend Adapter
//!
//! Each operation is described by an [`ApiCall`]. [`CloudApiClient`] sends it
//! with bearer auth and [`normalize_response`] folds the HTTP result into a
//! [`CommandResult`]. Write operations use JSON-API bodies
//! (`{data: {type, attributes}}`); the custom-properties upload is raw CSV.

use crate::catalog::ToolKind;
use async_trait::async_trait;
use infracost_core::{
    CommandResult, CreateGuardrailRequest, CreateTaggingPolicyRequest, Error, Result,
    UpdateGuardrailRequest, UpdateTaggingPolicyRequest,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.infracost.io/v1";

pub const TAGGING_POLICY_TYPE: &str = "tagging-policies";
pub const GUARDRAIL_TYPE: &str = "guardrails";

// ============================================================================
// CALL DESCRIPTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    None,
    Json(Value),
    Csv(String),
}

/// One request against the cloud API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: Method,
    /// Relative to the API base, without a leading slash
    pub path: String,
    pub body: ApiBody,
    /// Reported when the response carries nothing to show
    pub success_message: &'static str,
}

fn json_api(type_tag: &str, attributes: &impl Serialize) -> Result<ApiBody> {
    Ok(ApiBody::Json(json!({
        "data": {
            "type": type_tag,
            "attributes": serde_json::to_value(attributes)?,
        }
    })))
}

impl ApiCall {
    fn new(method: Method, path: String, kind: ToolKind) -> Self {
        Self {
            method,
            path,
            body: ApiBody::None,
            success_message: kind.success_message(),
        }
    }

    fn with_body(mut self, body: ApiBody) -> Self {
        self.body = body;
        self
    }

    pub fn list_tagging_policies(org: &str) -> Self {
        Self::new(
            Method::Get,
            format!("orgs/{}/tagging-policies", org),
            ToolKind::ListTaggingPolicies,
        )
    }

    pub fn get_tagging_policy(org: &str, policy_id: &str) -> Self {
        Self::new(
            Method::Get,
            format!("orgs/{}/tagging-policies/{}", org, policy_id),
            ToolKind::GetTaggingPolicy,
        )
    }

    pub fn create_tagging_policy(org: &str, request: &CreateTaggingPolicyRequest) -> Result<Self> {
        Ok(Self::new(
            Method::Post,
            format!("orgs/{}/tagging-policies", org),
            ToolKind::CreateTaggingPolicy,
        )
        .with_body(json_api(TAGGING_POLICY_TYPE, request)?))
    }

    pub fn update_tagging_policy(
        org: &str,
        policy_id: &str,
        request: &UpdateTaggingPolicyRequest,
    ) -> Result<Self> {
        Ok(Self::new(
            Method::Patch,
            format!("orgs/{}/tagging-policies/{}", org, policy_id),
            ToolKind::UpdateTaggingPolicy,
        )
        .with_body(json_api(TAGGING_POLICY_TYPE, request)?))
    }

    pub fn delete_tagging_policy(org: &str, policy_id: &str) -> Self {
        Self::new(
            Method::Delete,
            format!("orgs/{}/tagging-policies/{}", org, policy_id),
            ToolKind::DeleteTaggingPolicy,
        )
    }

    pub fn list_guardrails(org: &str) -> Self {
        Self::new(
            Method::Get,
            format!("orgs/{}/guardrails", org),
            ToolKind::ListGuardrails,
        )
    }

    pub fn get_guardrail(org: &str, guardrail_id: &str) -> Self {
        Self::new(
            Method::Get,
            format!("orgs/{}/guardrails/{}", org, guardrail_id),
            ToolKind::GetGuardrail,
        )
    }

    pub fn create_guardrail(org: &str, request: &CreateGuardrailRequest) -> Result<Self> {
        Ok(Self::new(
            Method::Post,
            format!("orgs/{}/guardrails", org),
            ToolKind::CreateGuardrail,
        )
        .with_body(json_api(GUARDRAIL_TYPE, request)?))
    }

    pub fn update_guardrail(
        org: &str,
        guardrail_id: &str,
        request: &UpdateGuardrailRequest,
    ) -> Result<Self> {
        Ok(Self::new(
            Method::Patch,
            format!("orgs/{}/guardrails/{}", org, guardrail_id),
            ToolKind::UpdateGuardrail,
        )
        .with_body(json_api(GUARDRAIL_TYPE, request)?))
    }

    pub fn delete_guardrail(org: &str, guardrail_id: &str) -> Self {
        Self::new(
            Method::Delete,
            format!("orgs/{}/guardrails/{}", org, guardrail_id),
            ToolKind::DeleteGuardrail,
        )
    }

    pub fn upload_custom_properties(org: &str, csv: impl Into<String>) -> Self {
        Self::new(
            Method::Post,
            format!("orgs/{}/custom-properties", org),
            ToolKind::UploadCustomProperties,
        )
        .with_body(ApiBody::Csv(csv.into()))
    }
}

// ============================================================================
// RESPONSE NORMALIZATION
// ============================================================================

/// Fold an HTTP response into the result envelope
pub fn normalize_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
    success_message: &str,
) -> CommandResult {
    if !(200..300).contains(&status) {
        return CommandResult::failure(format!(
            "API request failed with status {}: {}",
            status, body
        ));
    }

    if status == 204 {
        return CommandResult::ok(success_message);
    }

    let is_json = content_type
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);
    if !is_json || body.trim().is_empty() {
        return CommandResult::ok(success_message);
    }

    match serde_json::from_str::<Value>(body) {
        Ok(data) => CommandResult::json(data),
        Err(e) => CommandResult::failure(format!("Failed to parse API response: {}", e)),
    }
}

// ============================================================================
// TRANSPORT
// ============================================================================

#[async_trait]
pub trait CloudApi: Send + Sync {
    /// Perform the call. HTTP-level failures come back as a failed envelope;
    /// connection failures are `Error::Transport`.
    async fn send(&self, call: ApiCall) -> Result<CommandResult>;
}

/// Authenticated client for the Infracost Cloud API
#[derive(Debug, Clone)]
pub struct CloudApiClient {
    client: Client,
    base_url: String,
    service_token: String,
}

impl CloudApiClient {
    pub fn new(service_token: impl Into<String>, base_url: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            service_token: service_token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CloudApi for CloudApiClient {
    async fn send(&self, call: ApiCall) -> Result<CommandResult> {
        let url = format!("{}/{}", self.base_url, call.path);
        debug!(method = ?call.method, %url, "Infracost Cloud request");

        let mut req = self
            .client
            .request(call.method.into(), &url)
            .bearer_auth(&self.service_token);
        req = match call.body {
            ApiBody::None => req,
            ApiBody::Json(body) => req.json(&body),
            ApiBody::Csv(csv) => req.header(CONTENT_TYPE, "text/csv").body(csv),
        };

        let resp = req.send().await.map_err(|e| {
            warn!(%url, error = %e, "Infracost Cloud request failed");
            Error::Transport(format!("Request failed: {}", e))
        })?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read API response: {}", e)))?;

        debug!(status, body_len = body.len(), "Infracost Cloud response");
        Ok(normalize_response(
            status,
            content_type.as_deref(),
            &body,
            call.success_message,
        ))
    }
}
