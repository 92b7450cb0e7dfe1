// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use ringschema_type::{
	Diagnostic, Error, IntoDiagnostic,
	error::diagnostic::config::{invalid_config, logging_init_failed},
};

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
	#[error("invalid filter '{directives}': {reason}")]
	InvalidFilter {
		directives: String,
		reason: String,
	},
	#[error("{0}")]
	Init(String),
}

impl IntoDiagnostic for TracingError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			err @ TracingError::InvalidFilter {
				..
			} => invalid_config(err.to_string()),
			TracingError::Init(reason) => logging_init_failed(reason),
		}
	}
}

impl From<TracingError> for Error {
	fn from(err: TracingError) -> Self {
		ringschema_type::error!(err.into_diagnostic())
	}
}
