//! End-to-end tests for ExplainMyLogs live in `tests/`.
