// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
};

pub mod diagnostic;
mod r#macro;

use diagnostic::{Diagnostic, codec};

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Box<Diagnostic>);

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		*self.0
	}

	pub fn code(&self) -> &str {
		&self.0.code
	}

	pub fn kind(&self) -> ErrorKind {
		ErrorKind::from_code(&self.0.code)
	}
}

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.0.code, self.0.message)?;
		if let Some(help) = &self.0.help {
			write!(f, " (help: {})", help)?;
		}
		Ok(())
	}
}

impl std::error::Error for Error {}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Error(Box::new(diagnostic))
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		crate::error!(codec::json_error(err))
	}
}

/// Coarse classification of an [`Error`], derived from its diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Descriptor or configuration is invalid; nothing was enqueued for the table.
	Configuration,
	/// A bounded wait ran out of budget.
	Timeout,
	/// Live metadata could not be read.
	MetadataUnavailable,
	/// An enqueued action failed when it was executed.
	Execution,
	/// A record could not be encoded into or decoded from a row.
	Codec,
	Other,
}

impl ErrorKind {
	pub fn from_code(code: &str) -> Self {
		match code {
			"RECON_001" => ErrorKind::Timeout,
			"RECON_002" => ErrorKind::MetadataUnavailable,
			"RECON_003" => ErrorKind::Execution,
			c if c.starts_with("SCHEMA_") || c.starts_with("CONFIG_") => ErrorKind::Configuration,
			c if c.starts_with("CODEC_") => ErrorKind::Codec,
			_ => ErrorKind::Other,
		}
	}
}

impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorKind::Configuration => f.write_str("configuration error"),
			ErrorKind::Timeout => f.write_str("reconciliation timeout"),
			ErrorKind::MetadataUnavailable => f.write_str("live metadata unavailable"),
			ErrorKind::Execution => f.write_str("execution failed"),
			ErrorKind::Codec => f.write_str("codec error"),
			ErrorKind::Other => f.write_str("error"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::diagnostic::{reconcile, schema};

	#[test]
	fn test_kind_from_code() {
		assert_eq!(ErrorKind::from_code("SCHEMA_004"), ErrorKind::Configuration);
		assert_eq!(ErrorKind::from_code("CONFIG_001"), ErrorKind::Configuration);
		assert_eq!(ErrorKind::from_code("RECON_001"), ErrorKind::Timeout);
		assert_eq!(ErrorKind::from_code("RECON_002"), ErrorKind::MetadataUnavailable);
		assert_eq!(ErrorKind::from_code("CODEC_001"), ErrorKind::Codec);
		assert_eq!(ErrorKind::from_code("XYZ"), ErrorKind::Other);
	}

	#[test]
	fn test_display_includes_code_and_help() {
		let err = Error::from(schema::blank_table_name());
		let rendered = err.to_string();
		assert!(rendered.starts_with("SCHEMA_001: "));
		assert!(rendered.contains("help:"));
	}

	#[test]
	fn test_error_macro() {
		fn fails() -> crate::Result<()> {
			crate::return_error!(reconcile::marker_column_timeout("ks", "events", "solr_query", 100));
		}
		let err = fails().unwrap_err();
		assert_eq!(err.code(), "RECON_001");
		assert_eq!(err.kind(), ErrorKind::Timeout);
	}
}
