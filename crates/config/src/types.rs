// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::{BTreeMap, BTreeSet},
	time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Root of a ringschema configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
	pub auto_schema: AutoSchemaConfig,
	pub multi_ring: MultiRingConfig,
	pub logging: LoggingConfig,
}

/// Switches of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSchemaConfig {
	/// Compute and log the diff without enqueuing anything.
	#[serde(default)]
	pub dry_run: bool,
	/// Drop every ring's keyspace before reconciling.
	#[serde(default)]
	pub kill_first: bool,
	/// `keyspace.table` names that may be dropped when no declared table maps to them.
	#[serde(default)]
	pub drop_tables: BTreeSet<String>,
	/// `table.column` names that may be dropped when the declared table no longer has them.
	#[serde(default)]
	pub drop_columns: BTreeSet<String>,
	#[serde(default = "default_marker_timeout_ms")]
	pub marker_timeout_ms: u64,
	#[serde(default = "default_marker_poll_interval_ms")]
	pub marker_poll_interval_ms: u64,
}

impl Default for AutoSchemaConfig {
	fn default() -> Self {
		Self {
			dry_run: false,
			kill_first: false,
			drop_tables: BTreeSet::new(),
			drop_columns: BTreeSet::new(),
			marker_timeout_ms: default_marker_timeout_ms(),
			marker_poll_interval_ms: default_marker_poll_interval_ms(),
		}
	}
}

impl AutoSchemaConfig {
	pub fn marker_timeout(&self) -> Duration {
		Duration::from_millis(self.marker_timeout_ms)
	}

	pub fn marker_poll_interval(&self) -> Duration {
		Duration::from_millis(self.marker_poll_interval_ms)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingConfig {
	pub keyspace: String,
	#[serde(default = "default_replication_factor")]
	pub replication_factor: u32,
}

/// Rings by name plus the mapping from descriptor ring groups to rings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiRingConfig {
	#[serde(default = "default_ring_name")]
	pub default_ring: String,
	#[serde(default = "default_rings")]
	pub rings: BTreeMap<String, RingConfig>,
	#[serde(default)]
	pub groups: BTreeMap<String, String>,
}

impl Default for MultiRingConfig {
	fn default() -> Self {
		Self {
			default_ring: default_ring_name(),
			rings: default_rings(),
			groups: BTreeMap::new(),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Compact,
	Pretty,
	Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
	#[serde(default = "default_log_level")]
	pub level: String,
	#[serde(default)]
	pub format: LogFormat,
	#[serde(default = "default_true")]
	pub ansi: bool,
	/// Per-target level overrides, e.g. `ringschema_engine = "debug"`.
	#[serde(default)]
	pub targets: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: default_log_level(),
			format: LogFormat::default(),
			ansi: default_true(),
			targets: BTreeMap::new(),
		}
	}
}
