// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// RECON_001: The marker column did not appear within the wait budget
pub fn marker_column_timeout(keyspace: &str, table: &str, column: &str, timeout_ms: u64) -> Diagnostic {
	Diagnostic {
		code: "RECON_001".to_string(),
		message: format!(
			"column '{}' did not appear on {}.{} within {} ms",
			column, keyspace, table, timeout_ms
		),
		label: Some("reconciliation timeout".to_string()),
		help: Some("check that the search core was created, or raise the marker timeout".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// RECON_002: Live metadata for a keyspace could not be read
pub fn metadata_unavailable(keyspace: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "RECON_002".to_string(),
		message: format!("live metadata for keyspace '{}' is unavailable: {}", keyspace, reason.into()),
		label: Some("metadata unavailable".to_string()),
		help: Some("the table is skipped for this pass; run the reconciliation again once the ring is reachable".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// RECON_003: An enqueued action failed when it was executed
pub fn execution_failed(action: impl Into<String>, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "RECON_003".to_string(),
		message: format!("failed to execute '{}': {}", action.into(), reason.into()),
		label: Some("execution failed".to_string()),
		help: None,
		notes: vec!["actions after the failing one were not executed".to_string()],
		cause: None,
	}
}
