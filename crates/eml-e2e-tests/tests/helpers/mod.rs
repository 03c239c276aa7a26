//! Shared fixtures for the end-to-end suites.
//!
//! Every suite drives the real orchestrator against a `MockLogSource`, so
//! no journal or root access is needed.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use eml_log_tools::{ExtractorConfig, MockLogSource, QueryTarget};

/// Fixed extraction instant used by the suites.
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 4, 2)
        .unwrap()
        .and_hms_opt(18, 30, 0)
        .unwrap()
}

/// `count` well-formed lines for `service`, one second apart.
pub fn service_lines(service: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "Mar  3 08:15:{i:02} web01 {service}[{}]: handled request {i}",
                4000 + i
            )
        })
        .collect()
}

/// A source where every default application service has `per_service`
/// lines available.
pub fn application_fixture(per_service: usize) -> MockLogSource {
    let mut source = MockLogSource::new();
    source.set_hostname("web01");
    for service in ExtractorConfig::default().application_services {
        let lines = service_lines(&service, per_service);
        source.add_lines(QueryTarget::Unit(service), lines);
    }
    source
}

/// A small journal: an sshd failure, a kernel banner,
/// and one malformed line in the general journal.
pub fn scenario_fixture() -> MockLogSource {
    let mut source = MockLogSource::new();
    source.set_hostname("myhost");
    source.add_lines(
        QueryTarget::Unit("sshd".into()),
        vec!["Jan  5 10:22:31 myhost sshd[1234]: Failed password for invalid user root".into()],
    );
    source.add_lines(
        QueryTarget::Kernel,
        vec!["Jan  5 10:22:31 myhost kernel: Linux version 6.5.0 (INFO test build)".into()],
    );
    source.add_lines(
        QueryTarget::All,
        vec![
            "Jan  5 10:22:30 myhost systemd[1]: Reached target Multi-User System.".into(),
            "this line has no timestamp and no separator".into(),
            "Jan  5 10:22:35 myhost systemd[1]: Startup finished in 4.2s.".into(),
        ],
    );
    source
}
