//! Request reshaping
//!
//! Pure functions from validated tool arguments to cloud API request bodies.
//! Renames, scope collapsing and partial-update filtering all live here so
//! they can be tested without a backend.

use infracost_core::{
    ApiScope, CreateGuardrailArgs, CreateGuardrailRequest, CreateTaggingPolicyArgs,
    CreateTaggingPolicyRequest, Error, FilterSet, Filters, GuardrailScope, Result, ScopeType,
    UpdateGuardrailArgs, UpdateGuardrailRequest, UpdateTaggingPolicyArgs,
    UpdateTaggingPolicyRequest,
};

/// Explicit non-empty slug, else the configured default
pub fn resolve_org(explicit: Option<&str>, default: Option<&str>) -> Result<String> {
    explicit
        .filter(|s| !s.is_empty())
        .or_else(|| default.filter(|s| !s.is_empty()))
        .map(str::to_string)
        .ok_or(Error::MissingOrganization)
}

/// Collapse a caller scope into the API's scope string plus filters.
///
/// `ALL_PROJECTS` and `REPO` both become `REPO`. Filters are only produced
/// for non-empty lists.
pub fn collapse_scope(scope: &GuardrailScope) -> (ApiScope, Option<Filters>) {
    let api_scope = match scope.scope_type {
        ScopeType::AllProjects | ScopeType::Repo => ApiScope::Repo,
        ScopeType::Project => ApiScope::Project,
    };

    let non_empty = |list: &Option<Vec<String>>| {
        list.as_ref()
            .filter(|l| !l.is_empty())
            .map(|l| FilterSet::include(l.clone()))
    };
    let filters = Filters {
        repos: non_empty(&scope.repositories),
        projects: non_empty(&scope.projects),
        ..Default::default()
    };

    (api_scope, (!filters.is_empty()).then_some(filters))
}

pub fn create_guardrail_request(args: CreateGuardrailArgs) -> CreateGuardrailRequest {
    let (scope, filters) = collapse_scope(&args.scope);
    CreateGuardrailRequest {
        name: args.name,
        scope,
        filters,
        increase_threshold: args.increase_threshold,
        increase_percent_threshold: args.increase_percent_threshold,
        total_threshold: args.total_threshold,
        message: args.message,
        webhook_url: args.webhook_url.unwrap_or_default(),
        pr_comment: args.comment_on_pull_request,
        block_pr: args.block_pull_request,
        email_recipient_org_member_ids: args.email_recipient_org_member_ids,
        mailing_list_emails: args.mailing_list_emails,
        ms_teams_emails: args.ms_teams_emails,
    }
}

pub fn update_guardrail_request(args: UpdateGuardrailArgs) -> UpdateGuardrailRequest {
    let (scope, filters) = match &args.scope {
        Some(scope) => {
            let (scope, filters) = collapse_scope(scope);
            (Some(scope), filters)
        }
        None => (None, None),
    };

    UpdateGuardrailRequest {
        name: args.name,
        scope,
        filters,
        increase_threshold: args.increase_threshold,
        increase_percent_threshold: args.increase_percent_threshold,
        total_threshold: args.total_threshold,
        message: args.message,
        webhook_url: args.webhook_url,
        pr_comment: args.comment_on_pull_request,
        block_pr: args.block_pull_request,
        email_recipient_org_member_ids: args.email_recipient_org_member_ids,
        mailing_list_emails: args.mailing_list_emails,
        ms_teams_emails: args.ms_teams_emails,
    }
}

pub fn create_tagging_policy_request(args: CreateTaggingPolicyArgs) -> CreateTaggingPolicyRequest {
    CreateTaggingPolicyRequest {
        name: args.name,
        message: args.message,
        filters: args.filters,
        pr_comment: args.pr_comment,
        block_pr: args.block_pr,
        tags: args.tags,
    }
}

pub fn update_tagging_policy_request(args: UpdateTaggingPolicyArgs) -> UpdateTaggingPolicyRequest {
    UpdateTaggingPolicyRequest {
        name: args.name,
        message: args.message,
        filters: args.filters,
        pr_comment: args.pr_comment,
        block_pr: args.block_pr,
        tags: args.tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::BTreeSet;

    fn scope(value: Value) -> GuardrailScope {
        serde_json::from_value(value).unwrap()
    }

    fn keys(value: &Value) -> BTreeSet<String> {
        value.as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn test_all_projects_collapses_to_repo() {
        let (api_scope, filters) = collapse_scope(&scope(json!({"type": "ALL_PROJECTS"})));
        assert_eq!(api_scope, ApiScope::Repo);
        assert_eq!(filters, None);
    }

    #[test]
    fn test_repo_scope_filters() {
        let (api_scope, filters) =
            collapse_scope(&scope(json!({"type": "REPO", "repositories": ["a", "b"]})));
        assert_eq!(api_scope, ApiScope::Repo);
        assert_eq!(
            serde_json::to_value(filters).unwrap(),
            json!({"repos": {"include": ["a", "b"]}})
        );
    }

    #[test]
    fn test_project_scope_filters() {
        let (api_scope, filters) =
            collapse_scope(&scope(json!({"type": "PROJECT", "projects": ["x"]})));
        assert_eq!(api_scope, ApiScope::Project);
        assert_eq!(
            serde_json::to_value(filters).unwrap(),
            json!({"projects": {"include": ["x"]}})
        );
    }

    #[test]
    fn test_empty_project_list_adds_no_filter() {
        let (api_scope, filters) =
            collapse_scope(&scope(json!({"type": "PROJECT", "projects": []})));
        assert_eq!(api_scope, ApiScope::Project);
        assert_eq!(filters, None);
    }

    #[test]
    fn test_create_guardrail_renames_and_defaults_webhook() {
        let args: CreateGuardrailArgs = serde_json::from_value(json!({
            "name": "budget",
            "scope": {"type": "ALL_PROJECTS"},
            "totalThreshold": 1000,
            "blockPullRequest": true,
            "commentOnPullRequest": false
        }))
        .unwrap();

        let body = serde_json::to_value(create_guardrail_request(args)).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "budget",
                "scope": "REPO",
                "totalThreshold": 1000,
                "webhookUrl": "",
                "prComment": false,
                "blockPr": true
            })
        );
    }

    #[test]
    fn test_update_guardrail_key_set_matches_input() {
        let input = json!({
            "guardrailId": "g1",
            "orgSlug": "acme",
            "message": "too expensive",
            "blockPullRequest": false,
            "msTeamsEmails": []
        });
        let args: UpdateGuardrailArgs = serde_json::from_value(input).unwrap();
        let body = serde_json::to_value(update_guardrail_request(args)).unwrap();

        let expected: BTreeSet<String> = ["message", "blockPr", "msTeamsEmails"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keys(&body), expected);
        assert_eq!(body["msTeamsEmails"], json!([]));
    }

    #[test]
    fn test_update_guardrail_with_scope() {
        let args: UpdateGuardrailArgs = serde_json::from_value(json!({
            "guardrailId": "g1",
            "scope": {"type": "PROJECT", "projects": ["p1"]}
        }))
        .unwrap();
        let body = serde_json::to_value(update_guardrail_request(args)).unwrap();
        assert_eq!(
            body,
            json!({"scope": "PROJECT", "filters": {"projects": {"include": ["p1"]}}})
        );
    }

    #[test]
    fn test_update_guardrail_nothing_present() {
        let args: UpdateGuardrailArgs =
            serde_json::from_value(json!({"guardrailId": "g1"})).unwrap();
        let body = serde_json::to_value(update_guardrail_request(args)).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_update_tagging_policy_key_set_matches_input() {
        let args: UpdateTaggingPolicyArgs = serde_json::from_value(json!({
            "policyId": "p1",
            "blockPr": true,
            "tags": [{"key": "team", "mandatory": false, "valueType": "ANY"}]
        }))
        .unwrap();
        let body = serde_json::to_value(update_tagging_policy_request(args)).unwrap();
        assert_eq!(
            body,
            json!({
                "blockPr": true,
                "tags": [{"key": "team", "mandatory": false, "valueType": "ANY"}]
            })
        );
    }

    #[test]
    fn test_create_tagging_policy_drops_absent() {
        let args: CreateTaggingPolicyArgs = serde_json::from_value(json!({
            "orgSlug": "acme",
            "name": "tags",
            "tags": [],
            "filters": {"baseBranches": {"include": ["main"]}}
        }))
        .unwrap();
        let body = serde_json::to_value(create_tagging_policy_request(args)).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "tags",
                "filters": {"baseBranches": {"include": ["main"]}},
                "tags": []
            })
        );
    }

    #[test]
    fn test_resolve_org() {
        assert_eq!(resolve_org(Some("explicit"), Some("env")).unwrap(), "explicit");
        assert_eq!(resolve_org(None, Some("env")).unwrap(), "env");
        assert_eq!(resolve_org(Some(""), Some("env")).unwrap(), "env");
        assert!(matches!(
            resolve_org(None, None),
            Err(Error::MissingOrganization)
        ));
    }
}
