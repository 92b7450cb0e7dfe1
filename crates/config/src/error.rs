// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use ringschema_type::{
	Diagnostic, Error, IntoDiagnostic,
	error::diagnostic::config::{config_unparsable, config_unreadable, invalid_config},
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read '{path}': {source}")]
	Read {
		path: String,
		#[source]
		source: std::io::Error,
	},
	#[error(transparent)]
	Parse(#[from] toml::de::Error),
	#[error("{0}")]
	Invalid(String),
}

impl IntoDiagnostic for ConfigError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			ConfigError::Read {
				path,
				source,
			} => config_unreadable(&path, source.to_string()),
			ConfigError::Parse(err) => config_unparsable(err.to_string()),
			ConfigError::Invalid(reason) => invalid_config(reason),
		}
	}
}

impl From<ConfigError> for Error {
	fn from(err: ConfigError) -> Self {
		ringschema_type::error!(err.into_diagnostic())
	}
}
