// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fs, path::Path, str::FromStr};

use tracing::debug;

use crate::{ConfigError, LoggingConfig, MultiRingConfig, SchemaConfig, types::AutoSchemaConfig};

const VALID_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl SchemaConfig {
	/// Load and validate configuration from a TOML file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
		let path = path.as_ref();
		let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.display().to_string(),
			source,
		})?;
		let config = content.parse::<SchemaConfig>()?;
		debug!(path = %path.display(), rings = config.multi_ring.rings.len(), "loaded configuration");
		Ok(config)
	}

	pub fn validate(&self) -> crate::Result<()> {
		self.auto_schema.validate()?;
		self.multi_ring.validate()?;
		self.logging.validate()?;
		Ok(())
	}
}

impl FromStr for SchemaConfig {
	type Err = ringschema_type::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let config: SchemaConfig = toml::from_str(s).map_err(ConfigError::from)?;
		config.validate()?;
		Ok(config)
	}
}

impl AutoSchemaConfig {
	pub fn validate(&self) -> crate::Result<()> {
		if self.marker_timeout_ms == 0 {
			return Err(invalid("auto_schema.marker_timeout_ms must be greater than 0"));
		}
		if self.marker_poll_interval_ms == 0 || self.marker_poll_interval_ms > self.marker_timeout_ms {
			return Err(invalid(format!(
				"auto_schema.marker_poll_interval_ms must be between 1 and marker_timeout_ms ({})",
				self.marker_timeout_ms
			)));
		}
		for table in &self.drop_tables {
			if !is_dotted_pair(table) {
				return Err(invalid(format!(
					"auto_schema.drop_tables entry '{}' must have the form keyspace.table",
					table
				)));
			}
		}
		for column in &self.drop_columns {
			if !is_dotted_pair(column) {
				return Err(invalid(format!(
					"auto_schema.drop_columns entry '{}' must have the form table.column",
					column
				)));
			}
		}
		Ok(())
	}
}

impl MultiRingConfig {
	pub fn validate(&self) -> crate::Result<()> {
		if !self.rings.contains_key(&self.default_ring) {
			return Err(invalid(format!("multi_ring.default_ring '{}' is not a configured ring", self.default_ring)));
		}
		for (name, ring) in &self.rings {
			if ring.keyspace.trim().is_empty() {
				return Err(invalid(format!("multi_ring.rings.{}.keyspace must not be blank", name)));
			}
			if ring.replication_factor == 0 {
				return Err(invalid(format!("multi_ring.rings.{}.replication_factor must be at least 1", name)));
			}
		}
		for (group, ring) in &self.groups {
			if !self.rings.contains_key(ring) {
				return Err(invalid(format!(
					"multi_ring.groups.{} points to unknown ring '{}'",
					group, ring
				)));
			}
		}
		Ok(())
	}
}

impl LoggingConfig {
	pub fn validate(&self) -> crate::Result<()> {
		if !VALID_LEVELS.contains(&self.level.as_str()) {
			return Err(invalid(format!(
				"invalid log level '{}'. Must be one of: {}",
				self.level,
				VALID_LEVELS.join(", ")
			)));
		}
		for (target, level) in &self.targets {
			if !VALID_LEVELS.contains(&level.as_str()) {
				return Err(invalid(format!(
					"invalid log level '{}' for target '{}'. Must be one of: {}",
					level,
					target,
					VALID_LEVELS.join(", ")
				)));
			}
		}
		Ok(())
	}
}

fn is_dotted_pair(text: &str) -> bool {
	matches!(text.split_once('.'), Some((left, right)) if !left.is_empty() && !right.is_empty())
}

fn invalid(reason: impl Into<String>) -> ringschema_type::Error {
	ConfigError::Invalid(reason.into()).into()
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use crate::{LogFormat, SchemaConfig};

	#[test]
	fn test_empty_document_uses_defaults() {
		let config: SchemaConfig = "".parse().unwrap();
		assert_eq!(config, SchemaConfig::default());
		assert_eq!(config.auto_schema.marker_timeout(), Duration::from_secs(60));
		assert_eq!(config.auto_schema.marker_poll_interval(), Duration::from_millis(250));
		assert_eq!(config.multi_ring.default_ring, "default");
		assert_eq!(config.logging.format, LogFormat::Compact);
	}

	#[test]
	fn test_full_document() {
		let config: SchemaConfig = r#"
			[auto_schema]
			dry_run = true
			drop_tables = ["app.old_events"]
			drop_columns = ["events.legacy_flag"]

			[multi_ring]
			default_ring = "main"

			[multi_ring.rings.main]
			keyspace = "app"

			[multi_ring.rings.archive]
			keyspace = "app_archive"
			replication_factor = 3

			[multi_ring.groups]
			audit = "archive"

			[logging]
			level = "debug"
			format = "json"

			[logging.targets]
			ringschema_engine = "trace"
		"#
		.parse()
		.unwrap();

		assert!(config.auto_schema.dry_run);
		assert!(config.auto_schema.drop_tables.contains("app.old_events"));
		assert_eq!(config.multi_ring.rings["main"].replication_factor, 1);
		assert_eq!(config.multi_ring.rings["archive"].replication_factor, 3);
		assert_eq!(config.multi_ring.groups["audit"], "archive");
		assert_eq!(config.logging.format, LogFormat::Json);
	}

	#[test]
	fn test_unknown_default_ring() {
		let err = r#"
			[multi_ring]
			default_ring = "missing"
		"#
		.parse::<SchemaConfig>()
		.unwrap_err();
		assert_eq!(err.code(), "CONFIG_002");
	}

	#[test]
	fn test_syntax_error() {
		let err = "[auto_schema\n".parse::<SchemaConfig>().unwrap_err();
		assert_eq!(err.code(), "CONFIG_001");
	}

	#[test]
	fn test_missing_file() {
		let err = SchemaConfig::from_file("/nonexistent/ringschema.toml").unwrap_err();
		assert_eq!(err.code(), "CONFIG_001");
	}
}
