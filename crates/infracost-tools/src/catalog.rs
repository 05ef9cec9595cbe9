//! The sixteen Infracost tools
//!
//! Names, descriptions, input schemas and result messages for every tool the
//! server exposes, in listing order.

use crate::schema::{Field, ObjectSchema, Schema};

const REQUIRES_CLI: &str = "Requires infracost CLI to be installed.";
const ORG_SLUG_DESC: &str =
    "Organization slug from Infracost Cloud (defaults to INFRACOST_ORG env var)";

pub const BREAKDOWN_FORMATS: &[&str] = &["json", "table", "html"];
pub const DIFF_FORMATS: &[&str] = &["json", "diff"];
pub const OUTPUT_FORMATS: &[&str] = &[
    "json",
    "table",
    "html",
    "diff",
    "github-comment",
    "gitlab-comment",
    "azure-repos-comment",
    "bitbucket-comment",
];
pub const COMMENT_PLATFORMS: &[&str] = &["github", "gitlab", "azure-repos", "bitbucket"];
pub const COMMENT_BEHAVIORS: &[&str] = &["update", "new", "delete-and-new"];
pub const TAG_VALUE_TYPES: &[&str] = &["ANY", "LIST", "REGEX"];
pub const SCOPE_TYPES: &[&str] = &["ALL_PROJECTS", "REPO", "PROJECT"];

/// Which adapter a tool is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Command,
    Cloud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Breakdown,
    Diff,
    Output,
    Upload,
    Comment,
    ListTaggingPolicies,
    GetTaggingPolicy,
    CreateTaggingPolicy,
    UpdateTaggingPolicy,
    DeleteTaggingPolicy,
    ListGuardrails,
    GetGuardrail,
    CreateGuardrail,
    UpdateGuardrail,
    DeleteGuardrail,
    UploadCustomProperties,
}

impl ToolKind {
    pub const ALL: [ToolKind; 16] = [
        ToolKind::Breakdown,
        ToolKind::Diff,
        ToolKind::Output,
        ToolKind::Upload,
        ToolKind::Comment,
        ToolKind::ListTaggingPolicies,
        ToolKind::GetTaggingPolicy,
        ToolKind::CreateTaggingPolicy,
        ToolKind::UpdateTaggingPolicy,
        ToolKind::DeleteTaggingPolicy,
        ToolKind::ListGuardrails,
        ToolKind::GetGuardrail,
        ToolKind::CreateGuardrail,
        ToolKind::UpdateGuardrail,
        ToolKind::DeleteGuardrail,
        ToolKind::UploadCustomProperties,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Breakdown => "infracost_breakdown",
            ToolKind::Diff => "infracost_diff",
            ToolKind::Output => "infracost_output",
            ToolKind::Upload => "infracost_upload",
            ToolKind::Comment => "infracost_comment",
            ToolKind::ListTaggingPolicies => "infracost_cloud_list_tagging_policies",
            ToolKind::GetTaggingPolicy => "infracost_cloud_get_tagging_policy",
            ToolKind::CreateTaggingPolicy => "infracost_cloud_create_tagging_policy",
            ToolKind::UpdateTaggingPolicy => "infracost_cloud_update_tagging_policy",
            ToolKind::DeleteTaggingPolicy => "infracost_cloud_delete_tagging_policy",
            ToolKind::ListGuardrails => "infracost_cloud_list_guardrails",
            ToolKind::GetGuardrail => "infracost_cloud_get_guardrail",
            ToolKind::CreateGuardrail => "infracost_cloud_create_guardrail",
            ToolKind::UpdateGuardrail => "infracost_cloud_update_guardrail",
            ToolKind::DeleteGuardrail => "infracost_cloud_delete_guardrail",
            ToolKind::UploadCustomProperties => "infracost_cloud_upload_custom_properties",
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            ToolKind::Breakdown
            | ToolKind::Diff
            | ToolKind::Output
            | ToolKind::Upload
            | ToolKind::Comment => Backend::Command,
            _ => Backend::Cloud,
        }
    }

    pub fn description(&self) -> String {
        let (summary, requirement) = match self {
            ToolKind::Breakdown => ("Generate a cost breakdown for Terraform infrastructure. Analyzes Terraform configuration and provides detailed cost estimates for resources.", REQUIRES_CLI),
            ToolKind::Diff => ("Show cost differences between two Terraform configurations. Compares baseline and current infrastructure to identify cost changes.", REQUIRES_CLI),
            ToolKind::Output => ("Combine and format Infracost JSON files. Useful for merging multiple cost estimates or converting formats.", REQUIRES_CLI),
            ToolKind::Upload => ("Upload Infracost JSON output to Infracost Cloud for centralized cost tracking and reporting.", REQUIRES_CLI),
            ToolKind::Comment => ("Post cost estimate comments to pull requests on GitHub, GitLab, Azure Repos, or Bitbucket. Automatically updates existing comments.", "Requires infracost CLI to be installed and appropriate platform credentials."),
            ToolKind::ListTaggingPolicies => ("List all tagging policies in Infracost Cloud.", ""),
            ToolKind::GetTaggingPolicy => ("Get a specific tagging policy from Infracost Cloud.", ""),
            ToolKind::CreateTaggingPolicy => ("Create a new tagging policy in Infracost Cloud for tag validation in pull requests.", ""),
            ToolKind::UpdateTaggingPolicy => ("Update tagging policies in Infracost Cloud with allowed tag values for validation in pull requests.", ""),
            ToolKind::DeleteTaggingPolicy => ("Delete a tagging policy from Infracost Cloud.", ""),
            ToolKind::ListGuardrails => ("List all guardrails in Infracost Cloud.", ""),
            ToolKind::GetGuardrail => ("Get a specific guardrail from Infracost Cloud.", ""),
            ToolKind::CreateGuardrail => ("Create cost guardrails in Infracost Cloud that notify stakeholders or block PRs when cost thresholds are exceeded.", ""),
            ToolKind::UpdateGuardrail => ("Update an existing guardrail in Infracost Cloud.", ""),
            ToolKind::DeleteGuardrail => ("Delete a guardrail from Infracost Cloud.", ""),
            ToolKind::UploadCustomProperties => ("Upload custom property values to Infracost Cloud via CSV for resource classification.", ""),
        };
        let requirement = match self.backend() {
            Backend::Command => requirement,
            Backend::Cloud => "Requires INFRACOST_SERVICE_TOKEN environment variable.",
        };
        format!("{} {}", summary, requirement)
    }

    /// Text returned when the backend succeeded without output
    pub fn success_message(&self) -> &'static str {
        match self {
            ToolKind::Breakdown => "Breakdown completed successfully",
            ToolKind::Diff => "Diff completed successfully",
            ToolKind::Output => "Output generated successfully",
            ToolKind::Upload => "Upload completed successfully",
            ToolKind::Comment => "Comment posted successfully",
            ToolKind::ListTaggingPolicies => "Tagging policies retrieved successfully",
            ToolKind::GetTaggingPolicy => "Tagging policy retrieved successfully",
            ToolKind::CreateTaggingPolicy => "Tagging policy created successfully",
            ToolKind::UpdateTaggingPolicy => "Tagging policy updated successfully",
            ToolKind::DeleteTaggingPolicy => "Tagging policy deleted successfully",
            ToolKind::ListGuardrails => "Guardrails retrieved successfully",
            ToolKind::GetGuardrail => "Guardrail retrieved successfully",
            ToolKind::CreateGuardrail => "Guardrail created successfully",
            ToolKind::UpdateGuardrail => "Guardrail updated successfully",
            ToolKind::DeleteGuardrail => "Guardrail deleted successfully",
            ToolKind::UploadCustomProperties => "Custom properties uploaded successfully",
        }
    }

    /// Error text used when a failed envelope carries no message
    pub fn failure_message(&self) -> &'static str {
        match self {
            ToolKind::Breakdown => "Breakdown command failed",
            ToolKind::Diff => "Diff command failed",
            ToolKind::Output => "Output command failed",
            ToolKind::Upload => "Upload command failed",
            ToolKind::Comment => "Comment command failed",
            ToolKind::ListTaggingPolicies => "List tagging policies request failed",
            ToolKind::GetTaggingPolicy => "Get tagging policy request failed",
            ToolKind::CreateTaggingPolicy => "Create tagging policy request failed",
            ToolKind::UpdateTaggingPolicy => "Update tagging policy request failed",
            ToolKind::DeleteTaggingPolicy => "Delete tagging policy request failed",
            ToolKind::ListGuardrails => "List guardrails request failed",
            ToolKind::GetGuardrail => "Get guardrail request failed",
            ToolKind::CreateGuardrail => "Create guardrail request failed",
            ToolKind::UpdateGuardrail => "Update guardrail request failed",
            ToolKind::DeleteGuardrail => "Delete guardrail request failed",
            ToolKind::UploadCustomProperties => "Upload custom properties request failed",
        }
    }

    pub fn schema(&self) -> ObjectSchema {
        match self {
            ToolKind::Breakdown => breakdown_schema(),
            ToolKind::Diff => diff_schema(),
            ToolKind::Output => output_schema(),
            ToolKind::Upload => upload_schema(),
            ToolKind::Comment => comment_schema(),
            ToolKind::ListTaggingPolicies | ToolKind::ListGuardrails => org_schema(),
            ToolKind::GetTaggingPolicy => org_schema().field(policy_id("Policy ID")),
            ToolKind::DeleteTaggingPolicy => org_schema().field(policy_id("Policy ID to delete")),
            ToolKind::CreateTaggingPolicy => org_schema().extend(tagging_policy_fields()),
            ToolKind::UpdateTaggingPolicy => org_schema()
                .field(policy_id("Policy ID from the URL in Infracost Cloud UI"))
                .extend(tagging_policy_fields().all_optional()),
            ToolKind::GetGuardrail => org_schema().field(guardrail_id("Guardrail ID")),
            ToolKind::DeleteGuardrail => org_schema().field(guardrail_id("Guardrail ID to delete")),
            ToolKind::CreateGuardrail => org_schema().extend(guardrail_fields()),
            ToolKind::UpdateGuardrail => org_schema()
                .field(guardrail_id("Guardrail ID"))
                .extend(guardrail_fields().all_optional()),
            ToolKind::UploadCustomProperties => org_schema().field(
                Field::required("csvData", Schema::String)
                    .describe("CSV data containing custom properties"),
            ),
        }
    }
}

fn out_file() -> Field {
    Field::optional("outFile", Schema::String).describe("Save output to a file")
}

fn breakdown_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            Field::required("path", Schema::String)
                .describe("Path to Terraform directory or plan JSON file"),
        )
        .field(
            Field::optional("format", Schema::Enum(BREAKDOWN_FORMATS))
                .describe("Output format (default: table)"),
        )
        .field(out_file())
        .field(
            Field::optional("terraformVarFile", Schema::string_list())
                .describe("Terraform variable file paths"),
        )
        .field(
            Field::optional("terraformVar", Schema::StringMap)
                .describe("Terraform variables as key-value pairs"),
        )
}

fn diff_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            Field::required("path", Schema::String)
                .describe("Path to current Terraform directory or plan JSON file"),
        )
        .field(
            Field::required("compareTo", Schema::String)
                .describe("Path to baseline Terraform directory or plan JSON file"),
        )
        .field(
            Field::optional("format", Schema::Enum(DIFF_FORMATS))
                .describe("Output format (default: diff)"),
        )
        .field(out_file())
}

fn output_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            Field::required("path", Schema::String)
                .describe("Path to Infracost JSON file(s) - supports glob patterns"),
        )
        .field(Field::optional("format", Schema::Enum(OUTPUT_FORMATS)).describe("Output format"))
        .field(out_file())
        .field(
            Field::optional("fields", Schema::string_list())
                .describe("Fields to include in output (e.g., [\"price\", \"monthlyQuantity\"])"),
        )
        .field(
            Field::optional("showSkipped", Schema::Boolean)
                .describe("Show skipped resources in output"),
        )
}

fn upload_schema() -> ObjectSchema {
    ObjectSchema::new().field(
        Field::required("path", Schema::String).describe("Path to Infracost JSON file to upload"),
    )
}

fn comment_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::required("path", Schema::String).describe("Path to Infracost JSON file"))
        .field(Field::required("platform", Schema::Enum(COMMENT_PLATFORMS)).describe("Git platform"))
        .field(Field::optional("repo", Schema::String).describe("Repository in format owner/repo"))
        .field(Field::optional("pullRequest", Schema::String).describe("Pull request number"))
        .field(
            Field::optional("commit", Schema::String)
                .describe("Commit SHA to associate comment with"),
        )
        .field(Field::optional("tag", Schema::String).describe("Tag for comment identification"))
        .field(
            Field::optional("behavior", Schema::Enum(COMMENT_BEHAVIORS))
                .describe("How to handle existing comments (default: update)"),
        )
}

fn org_schema() -> ObjectSchema {
    ObjectSchema::new().field(Field::optional("orgSlug", Schema::String).describe(ORG_SLUG_DESC))
}

fn policy_id(description: &'static str) -> Field {
    Field::required("policyId", Schema::String).describe(description)
}

fn guardrail_id(description: &'static str) -> Field {
    Field::required("guardrailId", Schema::String).describe(description)
}

fn filter_set() -> Schema {
    Schema::Object(
        ObjectSchema::new()
            .field(Field::optional("include", Schema::string_list()))
            .field(Field::optional("exclude", Schema::string_list())),
    )
}

fn tag_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::required("key", Schema::String).describe("Tag key name"))
        .field(Field::required("mandatory", Schema::Boolean).describe("Whether the tag is required"))
        .field(
            Field::required("valueType", Schema::Enum(TAG_VALUE_TYPES)).describe(
                "Value type: ANY (any value), LIST (predefined values), or REGEX (regex pattern)",
            ),
        )
        .field(
            Field::optional("allowedValues", Schema::string_list())
                .describe("List of allowed values (for LIST type)"),
        )
        .field(
            Field::optional("allowedRegex", Schema::String)
                .describe("Regex pattern for allowed values (for REGEX type)"),
        )
        .field(
            Field::optional("message", Schema::String)
                .describe("Optional message to display if the tag is missing/invalid"),
        )
}

fn filters_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::optional("repos", filter_set()).describe("Repository filters"))
        .field(Field::optional("projects", filter_set()).describe("Project filters"))
        .field(Field::optional("baseBranches", filter_set()).describe("Base branch filters"))
        .field(Field::optional("resources", filter_set()).describe("Resource filters"))
}

fn tagging_policy_fields() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::required("name", Schema::String).describe("Name for the tagging policy"))
        .field(
            Field::optional("message", Schema::String)
                .describe("The message to display in the PR comment"),
        )
        .field(
            Field::optional("prComment", Schema::Boolean)
                .describe("Whether to add a comment to the PR"),
        )
        .field(Field::optional("blockPr", Schema::Boolean).describe("Whether to block the PR"))
        .field(
            Field::required("tags", Schema::array(Schema::Object(tag_schema())))
                .describe("Array of tag definitions"),
        )
        .field(
            Field::optional("filters", Schema::Object(filters_schema()))
                .describe("Filters to limit scope of the policy"),
        )
}

fn scope_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            Field::required("type", Schema::Enum(SCOPE_TYPES))
                .describe("Scope type for the guardrail"),
        )
        .field(
            Field::optional("repositories", Schema::string_list())
                .describe("Repository names (for REPO scope)"),
        )
        .field(
            Field::optional("projects", Schema::string_list())
                .describe("Project names (for PROJECT scope)"),
        )
}

fn guardrail_fields() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::required("name", Schema::String).describe("Name for the guardrail"))
        .field(Field::required("scope", Schema::Object(scope_schema())).describe("Scope configuration"))
        .field(
            Field::optional("increaseThreshold", Schema::Number)
                .describe("Threshold for cost increases (monthly dollar amount)"),
        )
        .field(
            Field::optional("increasePercentThreshold", Schema::Number)
                .describe("Threshold for cost increases (percentage)"),
        )
        .field(
            Field::optional("totalThreshold", Schema::Number)
                .describe("Threshold for total cost (monthly dollar amount)"),
        )
        .field(
            Field::optional("message", Schema::String)
                .describe("Custom message to display when threshold is exceeded"),
        )
        .field(
            Field::optional("webhookUrl", Schema::String)
                .describe("Webhook URL to notify when threshold is exceeded"),
        )
        .field(
            Field::optional("blockPullRequest", Schema::Boolean)
                .describe("Whether to block PR when threshold is exceeded"),
        )
        .field(
            Field::optional("commentOnPullRequest", Schema::Boolean)
                .describe("Whether to comment on PR when threshold is exceeded"),
        )
        .field(
            Field::optional("emailRecipientOrgMemberIds", Schema::string_list())
                .describe("Array of organization member IDs to email"),
        )
        .field(
            Field::optional("mailingListEmails", Schema::string_list())
                .describe("Array of email addresses to notify"),
        )
        .field(
            Field::optional("msTeamsEmails", Schema::string_list())
                .describe("Array of MS Teams email addresses to notify"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = ToolKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), 16);
    }

    #[test]
    fn test_descriptions_name_their_requirement() {
        assert!(ToolKind::Breakdown
            .description()
            .ends_with("Requires infracost CLI to be installed."));
        assert!(ToolKind::DeleteGuardrail
            .description()
            .ends_with("Requires INFRACOST_SERVICE_TOKEN environment variable."));
    }

    #[test]
    fn test_update_schemas_only_require_ids() {
        assert_eq!(
            ToolKind::UpdateGuardrail.schema().required_names(),
            vec!["guardrailId"]
        );
        assert_eq!(
            ToolKind::UpdateTaggingPolicy.schema().required_names(),
            vec!["policyId"]
        );
        // update guardrail advertises the same scope shape create does
        let update = ToolKind::UpdateGuardrail.schema();
        let create = ToolKind::CreateGuardrail.schema();
        assert_eq!(
            update.get("scope").map(|f| &f.schema),
            create.get("scope").map(|f| &f.schema)
        );
        assert!(update.get("filters").is_none());
    }

    #[test]
    fn test_every_cloud_tool_accepts_org_slug() {
        for kind in ToolKind::ALL {
            let has_org = kind.schema().get("orgSlug").is_some();
            assert_eq!(has_org, kind.backend() == Backend::Cloud, "{}", kind.name());
        }
    }

    #[test]
    fn test_create_requirements() {
        assert_eq!(
            ToolKind::CreateTaggingPolicy.schema().required_names(),
            vec!["name", "tags"]
        );
        assert_eq!(
            ToolKind::CreateGuardrail.schema().required_names(),
            vec!["name", "scope"]
        );
        assert_eq!(ToolKind::Comment.schema().required_names(), vec!["path", "platform"]);
    }
}
