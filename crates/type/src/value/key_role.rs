// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyRole {
	#[default]
	None,
	Static,
	PartitionKey,
	ClusteringKeyAsc,
	ClusteringKeyDesc,
}

impl KeyRole {
	pub fn is_partition(&self) -> bool {
		matches!(self, KeyRole::PartitionKey)
	}

	pub fn is_clustering(&self) -> bool {
		matches!(self, KeyRole::ClusteringKeyAsc | KeyRole::ClusteringKeyDesc)
	}

	pub fn is_static(&self) -> bool {
		matches!(self, KeyRole::Static)
	}

	pub fn is_descending(&self) -> bool {
		matches!(self, KeyRole::ClusteringKeyDesc)
	}
}

impl Display for KeyRole {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			KeyRole::None => f.write_str("regular"),
			KeyRole::Static => f.write_str("static"),
			KeyRole::PartitionKey => f.write_str("partition_key"),
			KeyRole::ClusteringKeyAsc => f.write_str("clustering_asc"),
			KeyRole::ClusteringKeyDesc => f.write_str("clustering_desc"),
		}
	}
}
