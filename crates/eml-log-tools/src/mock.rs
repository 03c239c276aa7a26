//! Mock log source for testing: serves pre-loaded lines per query target.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{LogError, LogResult};
use crate::source::{LogQuery, LogSource, QueryTarget};
use crate::types::SourceKind;

/// An in-memory log source.
///
/// Unregistered targets return no lines, like a journal with no entries
/// for that unit. A query's `since` bound filters lines the way
/// [`FileLogSource`](crate::source::FileLogSource) does. Targets marked with [`fail_target`](Self::fail_target)
/// return a backend error. Every query is recorded for later inspection.
pub struct MockLogSource {
    lines: HashMap<QueryTarget, Vec<String>>,
    failing: HashSet<QueryTarget>,
    hostname: String,
    queries: Mutex<Vec<LogQuery>>,
}

impl MockLogSource {
    pub fn new() -> Self {
        Self {
            lines: HashMap::new(),
            failing: HashSet::new(),
            hostname: "mockhost".to_string(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Set the lines returned for `target`.
    pub fn add_lines(&mut self, target: QueryTarget, lines: Vec<String>) {
        self.lines.insert(target, lines);
    }

    /// Make every query for `target` fail.
    pub fn fail_target(&mut self, target: QueryTarget) {
        self.failing.insert(target);
    }

    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        self.hostname = hostname.into();
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<LogQuery> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// A host with a small journal: general, kernel, sshd, nginx and
    /// postgresql messages plus a few lines that do not parse.
    pub fn with_journal_sample() -> Self {
        let mut m = Self::new();
        m.set_hostname("edge1");
        m.add_lines(
            QueryTarget::All,
            vec![
                "-- Logs begin at Mon 2026-01-12 08:00:00 UTC. --".into(),
                "Jan 15 12:00:01 edge1 systemd[1]: Starting Daily Cleanup of Temporary Directories...".into(),
                "Jan 15 12:00:02 edge1 systemd[1]: Failed to start Network Manager Wait Online.".into(),
                "Jan 15 12:00:03 edge1 dbus-daemon[712]: [system] Activating service name='org.freedesktop.hostname1'".into(),
                "Jan 15 12:00:04 edge1 NetworkManager[733]: <warn>  [1705312804.1234] dhcp4 (eth0): request timed out".into(),
                "Jan 15 12:00:05 edge1 systemd[1]: Started Daily Cleanup of Temporary Directories.".into(),
                "kernel log buffer overrun, some lines lost".into(),
            ],
        );
        m.add_lines(
            QueryTarget::Kernel,
            vec![
                "Jan 15 11:59:58 edge1 kernel: Linux version 6.5.0 (INFO test build)".into(),
                "Jan 15 11:59:59 edge1 kernel: ACPI Error: AE_NOT_FOUND, While resolving a named reference".into(),
                "Jan 15 12:00:00 edge1 kernel: usb 1-1: new high-speed USB device number 2 using xhci_hcd".into(),
            ],
        );
        m.add_lines(
            QueryTarget::Unit("sshd".into()),
            vec![
                "Jan 15 12:01:10 edge1 sshd[1234]: Failed password for invalid user root from 10.0.0.9 port 52144 ssh2".into(),
                "Jan 15 12:01:15 edge1 sshd[1240]: Accepted publickey for deploy from 10.0.0.4 port 50122 ssh2".into(),
                "Jan 15 12:01:16 edge1 sshd[1240]: pam_unix(sshd:session): session opened for user deploy".into(),
            ],
        );
        m.add_lines(
            QueryTarget::Unit("nginx".into()),
            vec![
                "Jan 15 12:02:00 edge1 nginx[900]: 2026/01/15 12:02:00 [warn] 900#900: low worker connections".into(),
                "Jan 15 12:02:30 edge1 nginx[900]: 2026/01/15 12:02:30 [info] 900#900: reopening logs".into(),
            ],
        );
        m.add_lines(
            QueryTarget::Unit("postgresql".into()),
            vec![
                "Jan 15 12:03:00 edge1 postgres[1500]: LOG:  database system is ready to accept connections".into(),
            ],
        );
        m
    }
}

impl Default for MockLogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Memory
    }

    async fn query(&self, query: &LogQuery) -> LogResult<Vec<String>> {
        if let Ok(mut seen) = self.queries.lock() {
            seen.push(query.clone());
        }
        if self.failing.contains(&query.target) {
            return Err(LogError::Backend(format!("mock failure for {}", query.target)));
        }
        let lines: Vec<String> = self
            .lines
            .get(&query.target)
            .map(|lines| lines.iter().filter(|l| query.admits(l)).cloned().collect())
            .unwrap_or_default();
        let start = lines.len().saturating_sub(query.lines);
        Ok(lines[start..].to_vec())
    }

    async fn hostname(&self) -> LogResult<String> {
        Ok(self.hostname.clone())
    }
}
