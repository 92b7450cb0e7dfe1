// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use ringschema_type::{KeyRole, StorageType};

use crate::{
	action::{PlannedAction, SearchCoreCommand},
	waiter::MarkerColumnWaiter,
};

/// Accepts planned actions in order. Implementations decide when, and
/// whether, they run.
pub trait StatementExecutor: Send + Sync {
	fn enqueue(&self, action: PlannedAction, provenance: &str) -> crate::Result<()>;
}

/// Read-only view of the live schema of one or more rings.
pub trait MetadataProvider: Send + Sync {
	fn table(&self, keyspace: &str, table: &str) -> crate::Result<Option<TableMetadata>>;

	fn tables(&self, keyspace: &str) -> crate::Result<Vec<String>>;
}

pub trait ResourceUploader: Send + Sync {
	fn upload(&self, source: &str, destination: &str) -> crate::Result<()>;
}

/// Executes drained actions against a live cluster.
pub trait ActionRunner: MetadataProvider + ResourceUploader {
	fn run_statement(&self, action: &PlannedAction) -> crate::Result<()>;

	fn search_core_admin(&self, keyspace: &str, table: &str, command: SearchCoreCommand) -> crate::Result<()>;

	fn upload_resource(&self, core: &str, source: &str, destination: &str) -> crate::Result<()> {
		self.upload(source, &format!("{}/{}", core, destination))
	}

	fn wait_for_marker_column(
		&self,
		keyspace: &str,
		table: &str,
		column: &str,
		timeout: Duration,
		poll_interval: Duration,
	) -> crate::Result<()> {
		MarkerColumnWaiter::new(self).with_poll_interval(poll_interval).wait(keyspace, table, column, timeout)
	}

	fn run(&self, action: &PlannedAction) -> crate::Result<()> {
		match action {
			PlannedAction::UploadResource {
				core,
				source,
				destination,
			} => self.upload_resource(core, source, destination),
			PlannedAction::SearchCoreAdmin {
				keyspace,
				table,
				command,
			} => self.search_core_admin(keyspace, table, *command),
			PlannedAction::WaitForMarkerColumn {
				keyspace,
				table,
				column,
				timeout,
				poll_interval,
			} => self.wait_for_marker_column(keyspace, table, column, *timeout, *poll_interval),
			_ => self.run_statement(action),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveColumn {
	pub name: String,
	pub storage_type: StorageType,
	pub key_role: KeyRole,
}

/// Live shape of one table as reported by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TableMetadata {
	pub keyspace: String,
	pub name: String,
	pub columns: Vec<LiveColumn>,
}

impl TableMetadata {
	pub fn new(keyspace: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			keyspace: keyspace.into(),
			name: name.into(),
			columns: vec![],
		}
	}

	pub fn with_column(mut self, name: impl Into<String>, storage_type: StorageType, key_role: KeyRole) -> Self {
		self.columns.push(LiveColumn {
			name: name.into(),
			storage_type,
			key_role,
		});
		self
	}

	/// Column lookup ignoring ASCII case.
	pub fn column(&self, name: &str) -> Option<&LiveColumn> {
		self.columns.iter().find(|column| column.name.eq_ignore_ascii_case(name))
	}

	pub fn has_column(&self, name: &str) -> bool {
		self.column(name).is_some()
	}
}
