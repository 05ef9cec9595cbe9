//! Command Backend Adapter
//!
//! Runs the `infracost` executable with an argument vector derived from
//! validated options. Only present options contribute flags. Captured
//! output is bounded: exceeding the ceiling fails the call instead of
//! returning truncated cost data.

use async_trait::async_trait;
use infracost_core::{
    BreakdownOptions, CommandResult, CommentOptions, DiffOptions, OutputOptions, Result,
    UploadOptions,
};
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

pub const DEFAULT_BIN: &str = "infracost";

/// Ceiling applied to stdout and stderr of each run
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

pub const NOT_INSTALLED_MESSAGE: &str =
    "Infracost CLI is not installed. Please install it from https://www.infracost.io/docs/";

// ============================================================================
// INVOCATION
// ============================================================================

/// One run of the CLI: its arguments and how to read what it prints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub args: Vec<String>,
    /// Parse stdout into `data`
    pub parse_json: bool,
    /// The caller's out-file path as given, reported instead of stdout
    pub out_file: Option<String>,
}

impl Invocation {
    fn new<I, S>(verb: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: verb.into_iter().map(Into::into).collect(),
            parse_json: false,
            out_file: None,
        }
    }

    fn flag(mut self, name: &str, value: impl Into<String>) -> Self {
        self.args.push(name.to_string());
        self.args.push(value.into());
        self
    }

    fn optional_flag(self, name: &str, value: Option<&String>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => self.flag(name, v.clone()),
            None => self,
        }
    }

    fn path_flag(self, name: &str, value: &str) -> Result<Self> {
        let resolved = absolute(value)?;
        Ok(self.flag(name, resolved))
    }

    fn out_file(mut self, out_file: Option<&String>) -> Result<Self> {
        if let Some(file) = out_file.filter(|f| !f.is_empty()) {
            self = self.path_flag("--out-file", file)?;
            self.out_file = Some(file.clone());
        }
        Ok(self)
    }

    fn json_when(mut self, format: Option<&String>) -> Self {
        self.parse_json = format.map(String::as_str) == Some("json") && self.out_file.is_none();
        self
    }

    pub fn breakdown(opts: &BreakdownOptions) -> Result<Self> {
        let mut inv = Invocation::new(["breakdown"])
            .path_flag("--path", &opts.path)?
            .optional_flag("--format", opts.format.as_ref())
            .out_file(opts.out_file.as_ref())?;

        for file in opts.terraform_var_file.iter().flatten() {
            inv = inv.path_flag("--terraform-var-file", file)?;
        }
        for (key, value) in opts.terraform_var.iter().flatten() {
            inv = inv.flag("--terraform-var", format!("{}={}", key, value));
        }
        Ok(inv.json_when(opts.format.as_ref()))
    }

    pub fn diff(opts: &DiffOptions) -> Result<Self> {
        Ok(Invocation::new(["diff"])
            .path_flag("--path", &opts.path)?
            .path_flag("--compare-to", &opts.compare_to)?
            .optional_flag("--format", opts.format.as_ref())
            .out_file(opts.out_file.as_ref())?
            .json_when(opts.format.as_ref()))
    }

    pub fn output(opts: &OutputOptions) -> Result<Self> {
        let mut inv = Invocation::new(["output"])
            .path_flag("--path", &opts.path)?
            .optional_flag("--format", opts.format.as_ref())
            .out_file(opts.out_file.as_ref())?;

        if let Some(fields) = opts.fields.as_ref().filter(|f| !f.is_empty()) {
            inv = inv.flag("--fields", fields.join(","));
        }
        if opts.show_skipped == Some(true) {
            inv.args.push("--show-skipped".to_string());
        }
        Ok(inv.json_when(opts.format.as_ref()))
    }

    pub fn upload(opts: &UploadOptions) -> Result<Self> {
        Invocation::new(["upload"]).path_flag("--path", &opts.path)
    }

    pub fn comment(opts: &CommentOptions) -> Result<Self> {
        Ok(Invocation::new(["comment", opts.platform.as_str()])
            .path_flag("--path", &opts.path)?
            .optional_flag("--repo", opts.repo.as_ref())
            .optional_flag("--pull-request", opts.pull_request.as_ref())
            .optional_flag("--commit", opts.commit.as_ref())
            .optional_flag("--tag", opts.tag.as_ref())
            .optional_flag("--behavior", opts.behavior.as_ref()))
    }
}

/// Resolve against the working directory and drop `.`/`..` lexically
fn absolute(path: &str) -> Result<String> {
    let path = Path::new(path);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized.to_string_lossy().into_owned())
}

// ============================================================================
// BACKEND
// ============================================================================

#[async_trait]
pub trait CommandBackend: Send + Sync {
    /// Whether the executable can be run at all. Never fails.
    async fn is_installed(&self) -> bool;

    async fn execute(&self, invocation: Invocation) -> CommandResult;
}

/// The real `infracost` executable
#[derive(Debug, Clone)]
pub struct InfracostCli {
    bin: PathBuf,
    max_output_bytes: usize,
}

impl Default for InfracostCli {
    fn default() -> Self {
        Self::new(DEFAULT_BIN)
    }
}

impl InfracostCli {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }

    pub fn with_max_output(mut self, bytes: usize) -> Self {
        self.max_output_bytes = bytes;
        self
    }
}

enum Capture {
    Overflow,
    Io(std::io::Error),
}

async fn read_capped<R: AsyncRead + Unpin>(
    pipe: Option<R>,
    limit: usize,
) -> std::result::Result<Vec<u8>, Capture> {
    let mut buf = Vec::new();
    if let Some(pipe) = pipe {
        let ceiling = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
        pipe.take(ceiling)
            .read_to_end(&mut buf)
            .await
            .map_err(Capture::Io)?;
    }
    if buf.len() > limit {
        return Err(Capture::Overflow);
    }
    Ok(buf)
}

/// Kill the child and reap it
async fn abort(child: &mut Child) {
    let _ = child.start_kill();
    let _ = child.wait().await;
}

#[async_trait]
impl CommandBackend for InfracostCli {
    async fn is_installed(&self) -> bool {
        let status = Command::new(&self.bin)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                debug!(bin = %self.bin.display(), error = %e, "infracost probe failed");
                false
            }
        }
    }

    async fn execute(&self, invocation: Invocation) -> CommandResult {
        info!(bin = %self.bin.display(), args = ?invocation.args, "Running infracost");

        let mut child = match Command::new(&self.bin)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!(bin = %self.bin.display(), error = %e, "Failed to spawn infracost");
                return CommandResult::failure(format!(
                    "Failed to run {}: {}",
                    self.bin.display(),
                    e
                ));
            }
        };

        let limit = self.max_output_bytes;
        let captured = tokio::try_join!(
            read_capped(child.stdout.take(), limit),
            read_capped(child.stderr.take(), limit),
        );

        let (stdout, stderr) = match captured {
            Ok(streams) => streams,
            Err(Capture::Overflow) => {
                abort(&mut child).await;
                warn!(limit, "infracost output exceeded buffer ceiling");
                return CommandResult::failure(format!(
                    "Command output exceeded the maximum buffer size of {} bytes",
                    limit
                ));
            }
            Err(Capture::Io(e)) => {
                abort(&mut child).await;
                return CommandResult::failure(format!("Failed to read command output: {}", e));
            }
        };

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => return CommandResult::failure(format!("Failed to wait for command: {}", e)),
        };

        let stdout = String::from_utf8_lossy(&stdout).into_owned();
        let stderr = String::from_utf8_lossy(&stderr).into_owned();

        if !status.success() {
            debug!(%status, stderr_len = stderr.len(), "infracost failed");
            let detail = stderr.trim();
            return CommandResult::failure(if detail.is_empty() {
                format!("Command failed ({})", status)
            } else {
                format!("Command failed ({}): {}", status, detail)
            });
        }

        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "infracost stderr");
        }

        let data = if invocation.parse_json && !stdout.trim().is_empty() {
            match serde_json::from_str(&stdout) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!(error = %e, "stdout is not JSON, returning text only");
                    None
                }
            }
        } else {
            None
        };

        let output = match invocation.out_file {
            Some(file) => format!("Output saved to {}", file),
            None => stdout,
        };

        match data {
            Some(data) => CommandResult::ok_with_data(output, data),
            None => CommandResult::ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn cwd() -> String {
        std::env::current_dir().unwrap().to_string_lossy().into_owned()
    }

    #[test]
    fn test_breakdown_minimal() {
        let inv = Invocation::breakdown(&BreakdownOptions {
            path: "/infra".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(inv.args, vec!["breakdown", "--path", "/infra"]);
        assert!(!inv.parse_json);
        assert_eq!(inv.out_file, None);
    }

    #[test]
    fn test_breakdown_full() {
        let mut vars = BTreeMap::new();
        vars.insert("region".to_string(), "us-east-1".to_string());
        vars.insert("env".to_string(), "prod".to_string());

        let inv = Invocation::breakdown(&BreakdownOptions {
            path: "/infra".into(),
            format: Some("json".into()),
            out_file: None,
            terraform_var_file: Some(vec!["/vars/a.tfvars".into(), "/vars/b.tfvars".into()]),
            terraform_var: Some(vars),
        })
        .unwrap();

        assert_eq!(
            inv.args,
            vec![
                "breakdown",
                "--path",
                "/infra",
                "--format",
                "json",
                "--terraform-var-file",
                "/vars/a.tfvars",
                "--terraform-var-file",
                "/vars/b.tfvars",
                "--terraform-var",
                "env=prod",
                "--terraform-var",
                "region=us-east-1",
            ]
        );
        assert!(inv.parse_json);
    }

    #[test]
    fn test_out_file_disables_json_and_is_resolved() {
        let inv = Invocation::diff(&DiffOptions {
            path: "plan.json".into(),
            compare_to: "/base/../baseline.json".into(),
            format: Some("json".into()),
            out_file: Some("out.json".into()),
        })
        .unwrap();

        assert_eq!(inv.args[2], format!("{}/plan.json", cwd()));
        assert_eq!(inv.args[4], "/baseline.json");
        assert_eq!(inv.args[8], format!("{}/out.json", cwd()));
        assert_eq!(inv.out_file.as_deref(), Some("out.json"));
        assert!(!inv.parse_json);
    }

    #[test]
    fn test_output_fields_and_switch() {
        let inv = Invocation::output(&OutputOptions {
            path: "/a.json".into(),
            fields: Some(vec!["price".into(), "monthlyQuantity".into()]),
            show_skipped: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            inv.args,
            vec!["output", "--path", "/a.json", "--fields", "price,monthlyQuantity", "--show-skipped"]
        );

        let quiet = Invocation::output(&OutputOptions {
            path: "/a.json".into(),
            fields: Some(vec![]),
            show_skipped: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(quiet.args, vec!["output", "--path", "/a.json"]);
    }

    #[test]
    fn test_comment_platform_is_positional() {
        let inv = Invocation::comment(&CommentOptions {
            path: "/a.json".into(),
            platform: "github".into(),
            repo: Some("org/repo".into()),
            pull_request: Some("42".into()),
            behavior: Some("new".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            inv.args,
            vec![
                "comment", "github", "--path", "/a.json", "--repo", "org/repo",
                "--pull-request", "42", "--behavior", "new",
            ]
        );
    }

    #[test]
    fn test_upload() {
        let inv = Invocation::upload(&UploadOptions { path: "/a.json".into() }).unwrap();
        assert_eq!(inv.args, vec!["upload", "--path", "/a.json"]);
    }

    #[tokio::test]
    async fn test_probe_missing_binary() {
        let cli = InfracostCli::new("/nonexistent/path/to/infracost");
        assert!(!cli.is_installed().await);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_envelope() {
        let cli = InfracostCli::new("/nonexistent/path/to/infracost");
        let result = cli
            .execute(Invocation::upload(&UploadOptions { path: "/a.json".into() }).unwrap())
            .await;
        assert!(!result.success);
        assert!(result.error_text().unwrap().starts_with("Failed to run"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_abort_reaps_child() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();

        abort(&mut child).await;

        let status = child.try_wait().unwrap().expect("child should be reaped");
        assert!(!status.success());
    }
}
