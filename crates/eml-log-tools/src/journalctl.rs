//! `journalctl` backend: runs the journal reader as a child process.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::process::Command;

use crate::error::{LogError, LogResult};
use crate::source::{LogQuery, LogSource, QueryTarget};
use crate::types::SourceKind;

/// Settings for the `journalctl` subprocess.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalctlConfig {
    /// Program to execute.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Stdout beyond this many bytes is discarded, oldest lines first.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

fn default_binary() -> String {
    "journalctl".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_output_bytes() -> usize {
    4 * 1024 * 1024
}

impl Default for JournalctlConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

/// Queries the systemd journal through `journalctl --output=short`.
pub struct JournalctlSource {
    config: JournalctlConfig,
}

impl JournalctlSource {
    pub fn new(config: JournalctlConfig) -> Self {
        Self { config }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }
}

impl Default for JournalctlSource {
    fn default() -> Self {
        Self::new(JournalctlConfig::default())
    }
}

/// Absolute timestamp form accepted by `journalctl --since`.
const SINCE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Keep at most `cap` trailing bytes of `stdout`, starting on a line boundary.
///
/// journalctl prints oldest first, so the head is what gets dropped.
fn tail_within(stdout: &[u8], cap: usize) -> &[u8] {
    if stdout.len() <= cap {
        return stdout;
    }
    let start = stdout.len() - cap;
    if start > 0 && stdout[start - 1] == b'\n' {
        return &stdout[start..];
    }
    match stdout[start..].iter().position(|&b| b == b'\n') {
        Some(pos) => &stdout[start + pos + 1..],
        None => &[],
    }
}

/// Validate a systemd unit name: only alphanumeric, `.`, `@`, `-`, `_`.
fn is_valid_unit_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '@' | '-' | '_'))
}

/// Build the argument list for `query`.
fn build_args(query: &LogQuery) -> LogResult<Vec<String>> {
    let mut args = vec!["--no-pager".to_string()];
    match &query.target {
        QueryTarget::All => {}
        QueryTarget::Kernel => args.push("-k".into()),
        QueryTarget::Unit(unit) => {
            if !is_valid_unit_name(unit) {
                return Err(LogError::InvalidUnit(unit.clone()));
            }
            args.push("-u".into());
            args.push(unit.clone());
        }
    }
    if let Some(since) = query.since {
        args.push(format!("--since={}", since.format(SINCE_FORMAT)));
    }
    args.push("-n".into());
    args.push(query.lines.to_string());
    args.push("--output=short".into());
    Ok(args)
}

#[async_trait]
impl LogSource for JournalctlSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Journalctl
    }

    async fn query(&self, query: &LogQuery) -> LogResult<Vec<String>> {
        let args = build_args(query)?;
        tracing::debug!(binary = %self.config.binary, ?args, "running journal query");

        let mut cmd = Command::new(&self.config.binary);
        cmd.args(&args).kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout(), cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(LogError::Io(format!(
                    "failed to run {}: {e}",
                    self.config.binary
                )));
            }
            Err(_) => {
                return Err(LogError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LogError::Backend(format!(
                "{} exited with {}: {}",
                self.config.binary,
                output.status,
                stderr.trim()
            )));
        }

        if output.stdout.len() > self.config.max_output_bytes {
            tracing::warn!(
                bytes = output.stdout.len(),
                cap = self.config.max_output_bytes,
                "journal output truncated, keeping newest lines"
            );
        }
        let stdout = tail_within(&output.stdout, self.config.max_output_bytes);

        let raw = String::from_utf8_lossy(stdout);
        Ok(raw.lines().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::Extractor;
    use chrono::NaiveDate;

    fn with_binary(binary: &str) -> JournalctlSource {
        JournalctlSource::new(JournalctlConfig {
            binary: binary.into(),
            timeout_secs: 5,
            ..Default::default()
        })
    }

    #[test]
    fn valid_unit_names() {
        assert!(is_valid_unit_name("nginx.service"));
        assert!(is_valid_unit_name("systemd-journald.service"));
        assert!(is_valid_unit_name("user@1000.service"));
        assert!(is_valid_unit_name("my_app"));
    }

    #[test]
    fn invalid_unit_names() {
        assert!(!is_valid_unit_name(""));
        assert!(!is_valid_unit_name("foo;bar"));
        assert!(!is_valid_unit_name("$(evil)"));
        assert!(!is_valid_unit_name("unit name"));
        assert!(!is_valid_unit_name("a|b"));
    }

    #[test]
    fn args_for_all() {
        assert_eq!(
            build_args(&LogQuery::all(50)).unwrap(),
            vec!["--no-pager", "-n", "50", "--output=short"]
        );
    }

    #[test]
    fn args_for_kernel() {
        assert_eq!(
            build_args(&LogQuery::kernel(30)).unwrap(),
            vec!["--no-pager", "-k", "-n", "30", "--output=short"]
        );
    }

    #[test]
    fn args_for_unit() {
        assert_eq!(
            build_args(&LogQuery::unit("sshd", 5)).unwrap(),
            vec!["--no-pager", "-u", "sshd", "-n", "5", "--output=short"]
        );
    }

    #[test]
    fn args_with_since() {
        let since = NaiveDate::from_ymd_opt(2026, 4, 2)
            .unwrap()
            .and_hms_opt(16, 30, 0)
            .unwrap();
        assert_eq!(
            build_args(&LogQuery::unit("sshd", 5).with_since(Some(since))).unwrap(),
            vec![
                "--no-pager",
                "-u",
                "sshd",
                "--since=2026-04-02 16:30:00",
                "-n",
                "5",
                "--output=short"
            ]
        );
    }

    #[test]
    fn tail_keeps_whole_newest_lines() {
        let out = b"first line\nsecond line\nthird\n";
        assert_eq!(tail_within(out, 100), &out[..]);
        // Cut lands inside "second line": drop the fragment.
        assert_eq!(tail_within(out, 15), b"third\n");
        // Cut lands exactly on a line start.
        assert_eq!(tail_within(out, 18), b"second line\nthird\n");
        // No full line fits.
        assert_eq!(tail_within(out, 3), b"");
        assert_eq!(tail_within(out, 0), b"");
    }

    #[test]
    fn args_reject_invalid_unit() {
        let err = build_args(&LogQuery::unit("$(whoami)", 5)).unwrap_err();
        assert!(matches!(err, LogError::InvalidUnit(_)));
    }

    #[test]
    fn config_defaults() {
        let config: JournalctlConfig = toml::from_str("").unwrap();
        assert_eq!(config.binary, "journalctl");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_output_bytes, 4 * 1024 * 1024);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn query_returns_stdout_lines() {
        // `echo` prints the arguments we would hand to journalctl.
        let source = with_binary("echo");
        let lines = source.query(&LogQuery::unit("sshd", 5)).await.unwrap();
        assert_eq!(lines, vec!["--no-pager -u sshd -n 5 --output=short"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_backend_error() {
        let source = with_binary("false");
        let err = source.query(&LogQuery::all(5)).await.unwrap_err();
        assert!(matches!(err, LogError::Backend(_)));
    }

    #[tokio::test]
    async fn missing_binary_is_io_error() {
        let source = with_binary("/nonexistent/eml/journalctl");
        let err = source.query(&LogQuery::all(5)).await.unwrap_err();
        assert!(matches!(err, LogError::Io(_)));
    }

    /// Write an executable shell script standing in for journalctl.
    #[cfg(unix)]
    fn fake_journalctl(name: &str, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;
        use std::sync::atomic::{AtomicUsize, Ordering};

        static SEQ: AtomicUsize = AtomicUsize::new(0);
        let seq = SEQ.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "eml-journalctl-{}-{name}-{seq}",
            std::process::id()
        ));
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn capped_output_keeps_newest_whole_lines() {
        let script = fake_journalctl(
            "capped",
            "printf 'Jan 15 12:00:01 h a: oldest line\\nJan 15 12:00:09 h a: newest line\\n'",
        );
        let source = JournalctlSource::new(JournalctlConfig {
            binary: script.display().to_string(),
            timeout_secs: 5,
            max_output_bytes: 62,
        });
        let lines = source.query(&LogQuery::all(5)).await.unwrap();
        assert_eq!(lines, vec!["Jan 15 12:00:09 h a: newest line"]);
        std::fs::remove_file(script).ok();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_journal_times_out() {
        let script = fake_journalctl("slow", "exec sleep 5");
        let source = JournalctlSource::new(JournalctlConfig {
            binary: script.display().to_string(),
            timeout_secs: 1,
            ..Default::default()
        });

        let err = source.query(&LogQuery::all(5)).await.unwrap_err();
        assert!(matches!(err, LogError::Timeout { timeout_secs: 1 }));

        let now = NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let batch = Extractor::Systemd.extract(&source, 10, now).await;
        assert!(batch.events.is_empty());
        assert_eq!(batch.parse_failures, 0);
        std::fs::remove_file(script).ok();
    }

    /// Runs the real journalctl. Only passes on Linux with systemd.
    #[tokio::test]
    #[ignore] // Requires systemd, run with `cargo test -- --ignored`
    async fn live_journalctl_query() {
        let source = JournalctlSource::default();
        let lines = source.query(&LogQuery::all(5)).await.unwrap();
        assert!(lines.len() <= 6);
    }
}
