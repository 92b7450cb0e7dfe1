// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Builder for the process-wide tracing subscriber.

use std::collections::BTreeMap;

use ringschema_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

use crate::TracingError;

/// Builder for the tracing subscriber of a ringschema run
pub struct TracingBuilder {
	level: String,
	targets: BTreeMap<String, String>,
	format: LogFormat,
	ansi: bool,
}

impl Default for TracingBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TracingBuilder {
	/// Create a new builder with the default logging configuration
	pub fn new() -> Self {
		Self::from_config(&LoggingConfig::default())
	}

	pub fn from_config(config: &LoggingConfig) -> Self {
		Self {
			level: config.level.clone(),
			targets: config.targets.clone(),
			format: config.format,
			ansi: config.ansi,
		}
	}

	pub fn level(mut self, level: impl Into<String>) -> Self {
		self.level = level.into();
		self
	}

	/// Override the level of one target, e.g. `ringschema_engine`
	pub fn target(mut self, target: impl Into<String>, level: impl Into<String>) -> Self {
		self.targets.insert(target.into(), level.into());
		self
	}

	pub fn format(mut self, format: LogFormat) -> Self {
		self.format = format;
		self
	}

	pub fn ansi(mut self, ansi: bool) -> Self {
		self.ansi = ansi;
		self
	}

	/// Filter directives: the base level followed by per-target overrides
	pub fn directives(&self) -> String {
		let mut directives = vec![self.level.clone()];
		for (target, level) in &self.targets {
			directives.push(format!("{}={}", target, level));
		}
		directives.join(",")
	}

	pub fn env_filter(&self) -> crate::Result<EnvFilter> {
		let directives = self.directives();
		EnvFilter::try_new(&directives).map_err(|err| {
			TracingError::InvalidFilter {
				directives,
				reason: err.to_string(),
			}
			.into()
		})
	}

	/// Install the subscriber globally. Fails when one is already installed.
	pub fn try_init(self) -> crate::Result<()> {
		let filter = self.env_filter()?;
		let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

		let result = match self.format {
			LogFormat::Json => builder.json().try_init(),
			LogFormat::Pretty => builder.pretty().with_ansi(self.ansi).try_init(),
			LogFormat::Compact => builder.compact().with_ansi(self.ansi).try_init(),
		};

		result.map_err(|err| TracingError::Init(err.to_string()).into())
	}
}

#[cfg(test)]
mod tests {
	use ringschema_config::{LogFormat, LoggingConfig};

	use super::TracingBuilder;

	#[test]
	fn test_directives() {
		let builder = TracingBuilder::new().level("warn").target("ringschema_engine", "trace");
		assert_eq!(builder.directives(), "warn,ringschema_engine=trace");
		assert!(builder.env_filter().is_ok());
	}

	#[test]
	fn test_from_config() {
		let mut config = LoggingConfig::default();
		config.targets.insert("ringschema_catalog".to_string(), "debug".to_string());
		assert_eq!(TracingBuilder::from_config(&config).directives(), "info,ringschema_catalog=debug");
	}

	#[test]
	fn test_invalid_filter() {
		let err = TracingBuilder::new().target("ringschema_engine", "loud").env_filter().unwrap_err();
		assert_eq!(err.code(), "CONFIG_002");
	}

	#[test]
	fn test_second_init_fails() {
		let _ = TracingBuilder::new().format(LogFormat::Json).try_init();
		let err = TracingBuilder::new().ansi(false).try_init().unwrap_err();
		assert_eq!(err.code(), "CONFIG_003");
	}
}
