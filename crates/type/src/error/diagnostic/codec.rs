// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// CODEC_001: JSON serialization or deserialization failed
pub fn json_error(err: serde_json::Error) -> Diagnostic {
	Diagnostic {
		code: "CODEC_001".to_string(),
		message: format!("JSON conversion failed: {}", err),
		label: Some("json error".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// CODEC_001: A cell value does not have the expected shape
pub fn unexpected_value(expected: &str, found: &str) -> Diagnostic {
	Diagnostic {
		code: "CODEC_001".to_string(),
		message: format!("expected {} value, found {}", expected, found),
		label: Some("unexpected value".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// CODEC_001: A stored enum name has no matching variant
pub fn unknown_enum_name(name: &str) -> Diagnostic {
	Diagnostic {
		code: "CODEC_001".to_string(),
		message: format!("'{}' is not a known variant name", name),
		label: Some("unknown enum name".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// CODEC_001: A stored map key does not carry the expected prefix or does not parse
pub fn invalid_map_key(key: &str, prefix: &str) -> Diagnostic {
	Diagnostic {
		code: "CODEC_001".to_string(),
		message: format!("map key '{}' cannot be decoded with prefix '{}'", key, prefix),
		label: Some("invalid map key".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// CODEC_002: A storage type name could not be parsed
pub fn invalid_storage_type(text: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CODEC_002".to_string(),
		message: format!("'{}' is not a valid storage type: {}", text, reason.into()),
		label: Some("invalid storage type".to_string()),
		help: Some("expected one of bigint, blob, boolean, counter, double, int, text, timestamp, set<T>, list<T>, map<K, V>".to_string()),
		notes: vec![],
		cause: None,
	}
}
