// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeMap, sync::Arc};

use ringschema_config::{ConfigError, MultiRingConfig};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingHandle {
	pub name: String,
	pub keyspace: String,
	pub replication_factor: u32,
}

/// Resolves descriptor ring groups to rings.
#[derive(Debug, Clone)]
pub struct RingDirectory {
	default_ring: Arc<RingHandle>,
	rings: BTreeMap<String, Arc<RingHandle>>,
	groups: BTreeMap<String, Arc<RingHandle>>,
}

impl RingDirectory {
	pub fn new(config: &MultiRingConfig) -> crate::Result<Self> {
		config.validate()?;

		let rings = config
			.rings
			.iter()
			.map(|(name, ring)| {
				let handle = RingHandle {
					name: name.clone(),
					keyspace: ring.keyspace.clone(),
					replication_factor: ring.replication_factor,
				};
				(name.clone(), Arc::new(handle))
			})
			.collect::<BTreeMap<_, _>>();

		let groups = config
			.groups
			.iter()
			.filter_map(|(group, ring)| rings.get(ring).map(|handle| (group.clone(), handle.clone())))
			.collect();

		let default_ring = rings.get(&config.default_ring).cloned().ok_or_else(|| {
			ConfigError::Invalid(format!("multi_ring.default_ring '{}' is not a configured ring", config.default_ring))
		})?;

		Ok(Self {
			default_ring,
			rings,
			groups,
		})
	}

	/// A directory with a single ring that every group resolves to.
	pub fn single(keyspace: impl Into<String>) -> Self {
		let handle = Arc::new(RingHandle {
			name: "default".to_string(),
			keyspace: keyspace.into(),
			replication_factor: 1,
		});
		Self {
			rings: BTreeMap::from([(handle.name.clone(), handle.clone())]),
			default_ring: handle,
			groups: BTreeMap::new(),
		}
	}

	/// Blank and unknown groups fall back to the default ring.
	pub fn resolve(&self, group: &str) -> &RingHandle {
		match self.groups.get(group).or_else(|| self.rings.get(group)) {
			Some(ring) => ring,
			None => {
				if !group.is_empty() {
					trace!(group, ring = %self.default_ring.name, "unknown ring group, using default ring");
				}
				&self.default_ring
			}
		}
	}

	pub fn default_ring(&self) -> &RingHandle {
		&self.default_ring
	}

	pub fn all(&self) -> impl Iterator<Item = &RingHandle> {
		self.rings.values().map(|ring| ring.as_ref())
	}
}
