//! Common types used across infracost-mcp
//!
//! Argument records are deserialized from an already validated value tree,
//! so `Option` fields are `None` exactly when the caller omitted them.
//! Request bodies skip `None` fields so absent input never reaches the wire.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;

// ============================================================================
// COMMAND BACKEND ARGUMENTS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownOptions {
    pub path: String,
    pub format: Option<String>,
    pub out_file: Option<String>,
    pub terraform_var_file: Option<Vec<String>>,
    pub terraform_var: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffOptions {
    pub path: String,
    pub compare_to: String,
    pub format: Option<String>,
    pub out_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub path: String,
    pub format: Option<String>,
    pub out_file: Option<String>,
    pub fields: Option<Vec<String>>,
    pub show_skipped: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOptions {
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentOptions {
    pub path: String,
    pub platform: String,
    pub repo: Option<String>,
    pub pull_request: Option<String>,
    pub commit: Option<String>,
    pub tag: Option<String>,
    pub behavior: Option<String>,
}

// ============================================================================
// SHARED CLOUD SHAPES
// ============================================================================

/// How a tag value is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagValueType {
    Any,
    List,
    Regex,
}

/// A tag definition inside a tagging policy.
///
/// `allowed_values` is only meaningful for `List`, `allowed_regex` only for
/// `Regex`; both are forwarded as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggingPolicyTag {
    pub key: String,
    pub mandatory: bool,
    pub value_type: TagValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

impl FilterSet {
    pub fn include(values: Vec<String>) -> Self {
        Self {
            include: Some(values),
            exclude: None,
        }
    }
}

/// Repo/project/branch/resource filters shared by policies and guardrails
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repos: Option<FilterSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<FilterSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_branches: Option<FilterSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<FilterSet>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.repos.is_none()
            && self.projects.is_none()
            && self.base_branches.is_none()
            && self.resources.is_none()
    }
}

/// Targeting rule as the caller expresses it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeType {
    AllProjects,
    Repo,
    Project,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuardrailScope {
    #[serde(rename = "type")]
    pub scope_type: ScopeType,
    pub repositories: Option<Vec<String>>,
    pub projects: Option<Vec<String>>,
}

/// Scope string the cloud API accepts for guardrails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiScope {
    Repo,
    Project,
}

// ============================================================================
// CLOUD TOOL ARGUMENTS
// ============================================================================

/// Arguments of the list tools: only the organization
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgArgs {
    pub org_slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyIdArgs {
    pub org_slug: Option<String>,
    pub policy_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailIdArgs {
    pub org_slug: Option<String>,
    pub guardrail_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaggingPolicyArgs {
    pub org_slug: Option<String>,
    pub name: String,
    pub message: Option<String>,
    pub pr_comment: Option<bool>,
    pub block_pr: Option<bool>,
    pub tags: Vec<TaggingPolicyTag>,
    pub filters: Option<Filters>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaggingPolicyArgs {
    pub org_slug: Option<String>,
    pub policy_id: String,
    pub name: Option<String>,
    pub message: Option<String>,
    pub pr_comment: Option<bool>,
    pub block_pr: Option<bool>,
    pub tags: Option<Vec<TaggingPolicyTag>>,
    pub filters: Option<Filters>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuardrailArgs {
    pub org_slug: Option<String>,
    pub name: String,
    pub scope: GuardrailScope,
    pub increase_threshold: Option<Number>,
    pub increase_percent_threshold: Option<Number>,
    pub total_threshold: Option<Number>,
    pub message: Option<String>,
    pub webhook_url: Option<String>,
    pub block_pull_request: Option<bool>,
    pub comment_on_pull_request: Option<bool>,
    pub email_recipient_org_member_ids: Option<Vec<String>>,
    pub mailing_list_emails: Option<Vec<String>>,
    pub ms_teams_emails: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuardrailArgs {
    pub org_slug: Option<String>,
    pub guardrail_id: String,
    pub name: Option<String>,
    pub scope: Option<GuardrailScope>,
    pub increase_threshold: Option<Number>,
    pub increase_percent_threshold: Option<Number>,
    pub total_threshold: Option<Number>,
    pub message: Option<String>,
    pub webhook_url: Option<String>,
    pub block_pull_request: Option<bool>,
    pub comment_on_pull_request: Option<bool>,
    pub email_recipient_org_member_ids: Option<Vec<String>>,
    pub mailing_list_emails: Option<Vec<String>>,
    pub ms_teams_emails: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCustomPropertiesArgs {
    pub org_slug: Option<String>,
    pub csv_data: String,
}

// ============================================================================
// CLOUD API REQUEST BODIES (the `attributes` of a JSON-API envelope)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaggingPolicyRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_comment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_pr: Option<bool>,
    pub tags: Vec<TaggingPolicyTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaggingPolicyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_comment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_pr: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TaggingPolicyTag>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuardrailRequest {
    pub name: String,
    pub scope: ApiScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increase_threshold: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increase_percent_threshold: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_threshold: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Always sent; the API rejects a create without it
    pub webhook_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_comment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_pr: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_recipient_org_member_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_list_emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms_teams_emails: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuardrailRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ApiScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increase_threshold: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increase_percent_threshold: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_threshold: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_comment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_pr: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_recipient_org_member_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_list_emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms_teams_emails: Option<Vec<String>>,
}
