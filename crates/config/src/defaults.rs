// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeMap;

use crate::RingConfig;

pub fn default_marker_timeout_ms() -> u64 {
	60_000
}

pub fn default_marker_poll_interval_ms() -> u64 {
	250
}

pub fn default_ring_name() -> String {
	"default".to_string()
}

pub fn default_keyspace() -> String {
	"ringschema".to_string()
}

pub fn default_replication_factor() -> u32 {
	1
}

pub fn default_rings() -> BTreeMap<String, RingConfig> {
	BTreeMap::from([(
		default_ring_name(),
		RingConfig {
			keyspace: default_keyspace(),
			replication_factor: default_replication_factor(),
		},
	)])
}

pub fn default_log_level() -> String {
	"info".to_string()
}

pub fn default_true() -> bool {
	true
}
