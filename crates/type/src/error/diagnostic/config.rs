// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// CONFIG_001: The configuration file could not be read
pub fn config_unreadable(path: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CONFIG_001".to_string(),
		message: format!("failed to read config file '{}': {}", path, reason.into()),
		label: Some("unreadable config".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// CONFIG_001: The configuration text is not valid TOML for the expected layout
pub fn config_unparsable(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CONFIG_001".to_string(),
		message: format!("failed to parse config: {}", reason.into()),
		label: Some("unparsable config".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// CONFIG_002: The configuration parsed but is not usable
pub fn invalid_config(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CONFIG_002".to_string(),
		message: format!("invalid configuration: {}", reason.into()),
		label: Some("invalid config".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// CONFIG_003: The tracing subscriber could not be installed
pub fn logging_init_failed(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CONFIG_003".to_string(),
		message: format!("failed to install the tracing subscriber: {}", reason.into()),
		label: Some("logging unavailable".to_string()),
		help: Some("a global subscriber can only be installed once per process".to_string()),
		notes: vec![],
		cause: None,
	}
}
