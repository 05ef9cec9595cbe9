//! Tool Dispatcher
//!
//! Owns the registry and both backends. For each call it looks up the tool,
//! validates the arguments, reshapes them, runs exactly one backend call and
//! turns the resulting envelope into a [`ToolResponse`] or a
//! [`DispatchError`].

use crate::api::{ApiCall, CloudApi, CloudApiClient};
use crate::catalog::{Backend, ToolKind};
use crate::cli::{CommandBackend, InfracostCli, Invocation, NOT_INSTALLED_MESSAGE};
use crate::registry::{ToolInfo, ToolRegistry};
use crate::transform;
use crate::validate::{validate, FieldIssue, ValidationErrors};
use infracost_core::{
    CommandResult, CreateGuardrailArgs, CreateTaggingPolicyArgs, Error, ErrorKind, GuardrailIdArgs,
    InfracostConfig, OrgArgs, PolicyIdArgs, Result, Settings, UpdateGuardrailArgs,
    UpdateTaggingPolicyArgs, UploadCustomPropertiesArgs,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Text content block of a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// Successful tool result: `{content: [{type: "text", text}]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<TextContent>,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                content_type: "text".to_string(),
                text: text.into(),
            }],
        }
    }

    /// Concatenated text of every block
    pub fn as_text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(ValidationErrors),

    #[error("{0}")]
    Failed(Error),
}

impl DispatchError {
    /// Field issues of a validation failure
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            DispatchError::InvalidArguments(errors) => &errors.issues,
            _ => &[],
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DispatchError::UnknownTool(_) => None,
            DispatchError::InvalidArguments(_) => Some(ErrorKind::Validation),
            DispatchError::Failed(err) => Some(err.kind()),
        }
    }

    /// Structured detail for protocol clients
    pub fn data(&self) -> Option<Value> {
        match self {
            DispatchError::UnknownTool(_) => None,
            DispatchError::InvalidArguments(errors) => Some(json!({ "issues": errors.issues })),
            DispatchError::Failed(err) => Some(json!({ "kind": err.kind().as_str() })),
        }
    }
}

impl From<Error> for DispatchError {
    fn from(err: Error) -> Self {
        DispatchError::Failed(err)
    }
}

fn parse<T: DeserializeOwned>(validated: Value) -> Result<T> {
    Ok(serde_json::from_value(validated)?)
}

pub struct ToolDispatcher {
    registry: ToolRegistry,
    config: InfracostConfig,
    cli: Arc<dyn CommandBackend>,
    /// Present only when a service token was configured
    cloud: Option<Arc<dyn CloudApi>>,
}

impl ToolDispatcher {
    pub fn new(
        config: InfracostConfig,
        cli: Arc<dyn CommandBackend>,
        cloud: Option<Arc<dyn CloudApi>>,
    ) -> Self {
        Self {
            registry: ToolRegistry::new(),
            config,
            cli,
            cloud,
        }
    }

    /// Wire the real CLI and, when a token is set, the cloud client
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let config = settings.infracost_config();

        let mut cli = InfracostCli::new(settings.bin.as_deref().unwrap_or(crate::cli::DEFAULT_BIN));
        if let Some(limit) = settings.max_output_bytes {
            cli = cli.with_max_output(limit);
        }

        let cloud = match &config.service_token {
            Some(token) => {
                let client = CloudApiClient::new(token.clone(), settings.api_url.as_deref())?;
                Some(Arc::new(client) as Arc<dyn CloudApi>)
            }
            None => None,
        };

        Ok(Self::new(config, Arc::new(cli), cloud))
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.registry.list()
    }

    pub fn cloud_enabled(&self) -> bool {
        self.cloud.is_some()
    }

    /// Validate and run one tool call
    pub async fn call(
        &self,
        name: &str,
        arguments: Value,
    ) -> std::result::Result<ToolResponse, DispatchError> {
        let span = info_span!("tool_call", tool = %name, call_id = %Uuid::new_v4());
        self.dispatch(name, arguments).instrument(span).await
    }

    async fn dispatch(
        &self,
        name: &str,
        arguments: Value,
    ) -> std::result::Result<ToolResponse, DispatchError> {
        let descriptor = self
            .registry
            .get(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;
        let kind = descriptor.kind;

        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };
        let validated =
            validate(&descriptor.schema, &arguments).map_err(DispatchError::InvalidArguments)?;

        info!("Calling tool");
        let result = match kind.backend() {
            Backend::Command => self.run_command(kind, validated).await?,
            Backend::Cloud => self.run_cloud(kind, validated).await?,
        };

        if !result.success {
            let message = result.error_text().unwrap_or(kind.failure_message());
            warn!(error = %message, "Tool failed");
            return Err(Error::backend(message).into());
        }

        Ok(ToolResponse::text(
            result.output_text().unwrap_or(kind.success_message()),
        ))
    }

    async fn run_command(&self, kind: ToolKind, validated: Value) -> Result<CommandResult> {
        if !self.cli.is_installed().await {
            return Err(Error::unavailable(NOT_INSTALLED_MESSAGE));
        }

        let invocation = match kind {
            ToolKind::Breakdown => Invocation::breakdown(&parse(validated)?)?,
            ToolKind::Diff => Invocation::diff(&parse(validated)?)?,
            ToolKind::Output => Invocation::output(&parse(validated)?)?,
            ToolKind::Upload => Invocation::upload(&parse(validated)?)?,
            ToolKind::Comment => Invocation::comment(&parse(validated)?)?,
            other => {
                return Err(Error::internal(format!(
                    "{} is not a command tool",
                    other.name()
                )))
            }
        };

        debug!(args = ?invocation.args, "Invoking infracost CLI");
        Ok(self.cli.execute(invocation).await)
    }

    async fn run_cloud(&self, kind: ToolKind, validated: Value) -> Result<CommandResult> {
        let api = self.cloud.as_ref().ok_or(Error::NotConfigured)?;
        let call = self.cloud_call(kind, validated)?;
        debug!(method = ?call.method, path = %call.path, "Invoking Infracost Cloud API");
        api.send(call).await
    }

    fn org(&self, explicit: Option<String>) -> Result<String> {
        transform::resolve_org(explicit.as_deref(), self.config.org_slug.as_deref())
    }

    fn cloud_call(&self, kind: ToolKind, validated: Value) -> Result<ApiCall> {
        let call = match kind {
            ToolKind::ListTaggingPolicies => {
                let args: OrgArgs = parse(validated)?;
                ApiCall::list_tagging_policies(&self.org(args.org_slug)?)
            }
            ToolKind::GetTaggingPolicy => {
                let args: PolicyIdArgs = parse(validated)?;
                ApiCall::get_tagging_policy(&self.org(args.org_slug)?, &args.policy_id)
            }
            ToolKind::CreateTaggingPolicy => {
                let mut args: CreateTaggingPolicyArgs = parse(validated)?;
                let org = self.org(args.org_slug.take())?;
                ApiCall::create_tagging_policy(&org, &transform::create_tagging_policy_request(args))?
            }
            ToolKind::UpdateTaggingPolicy => {
                let mut args: UpdateTaggingPolicyArgs = parse(validated)?;
                let org = self.org(args.org_slug.take())?;
                let policy_id = std::mem::take(&mut args.policy_id);
                ApiCall::update_tagging_policy(
                    &org,
                    &policy_id,
                    &transform::update_tagging_policy_request(args),
                )?
            }
            ToolKind::DeleteTaggingPolicy => {
                let args: PolicyIdArgs = parse(validated)?;
                ApiCall::delete_tagging_policy(&self.org(args.org_slug)?, &args.policy_id)
            }
            ToolKind::ListGuardrails => {
                let args: OrgArgs = parse(validated)?;
                ApiCall::list_guardrails(&self.org(args.org_slug)?)
            }
            ToolKind::GetGuardrail => {
                let args: GuardrailIdArgs = parse(validated)?;
                ApiCall::get_guardrail(&self.org(args.org_slug)?, &args.guardrail_id)
            }
            ToolKind::CreateGuardrail => {
                let mut args: CreateGuardrailArgs = parse(validated)?;
                let org = self.org(args.org_slug.take())?;
                ApiCall::create_guardrail(&org, &transform::create_guardrail_request(args))?
            }
            ToolKind::UpdateGuardrail => {
                let mut args: UpdateGuardrailArgs = parse(validated)?;
                let org = self.org(args.org_slug.take())?;
                let guardrail_id = std::mem::take(&mut args.guardrail_id);
                ApiCall::update_guardrail(
                    &org,
                    &guardrail_id,
                    &transform::update_guardrail_request(args),
                )?
            }
            ToolKind::DeleteGuardrail => {
                let args: GuardrailIdArgs = parse(validated)?;
                ApiCall::delete_guardrail(&self.org(args.org_slug)?, &args.guardrail_id)
            }
            ToolKind::UploadCustomProperties => {
                let args: UploadCustomPropertiesArgs = parse(validated)?;
                ApiCall::upload_custom_properties(&self.org(args.org_slug)?, args.csv_data)
            }
            other => {
                return Err(Error::internal(format!(
                    "{} is not a cloud tool",
                    other.name()
                )))
            }
        };
        Ok(call)
    }
}
