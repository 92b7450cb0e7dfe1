// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;
use ringschema_catalog::Direction;
use ringschema_engine::{
	ActionRunner, CreateTable, MARKER_COLUMN, MetadataProvider, PlannedAction, ResourceUploader, SearchCoreCommand,
	TableMetadata,
};
use ringschema_type::{
	Error, KeyRole, StorageType,
	error::diagnostic::reconcile::{execution_failed, metadata_unavailable},
};
use tracing::trace;

#[derive(Default)]
struct ClusterState {
	keyspaces: BTreeMap<String, BTreeMap<String, TableMetadata>>,
	cores: BTreeSet<String>,
	uploads: Vec<(String, String)>,
	executed: Vec<PlannedAction>,
	unavailable: BTreeSet<String>,
	fail_on: Option<&'static str>,
	no_marker: bool,
}

pub struct InMemoryCluster {
	state: Mutex<ClusterState>,
}

impl Default for InMemoryCluster {
	fn default() -> Self {
		Self::new()
	}
}

impl InMemoryCluster {
	pub fn new() -> Self {
		Self {
			state: Mutex::new(ClusterState::default()),
		}
	}

	pub fn create_keyspace(&self, keyspace: &str) {
		self.state.lock().keyspaces.entry(keyspace.to_string()).or_default();
	}

	/// Puts a table into the live schema as-is, replacing any table with the
	/// same name.
	pub fn seed_table(&self, table: TableMetadata) {
		self.state.lock().keyspaces.entry(table.keyspace.clone()).or_default().insert(table.name.clone(), table);
	}

	/// Makes every metadata read of `keyspace` fail.
	pub fn set_unavailable(&self, keyspace: &str, unavailable: bool) {
		let mut state = self.state.lock();
		if unavailable {
			state.unavailable.insert(keyspace.to_string());
		} else {
			state.unavailable.remove(keyspace);
		}
	}

	/// Makes statements of the given action kind fail.
	pub fn fail_on(&self, kind: &'static str) {
		self.state.lock().fail_on = Some(kind);
	}

	/// Stops core creation from adding the marker column.
	pub fn suppress_marker_column(&self) {
		self.state.lock().no_marker = true;
	}

	pub fn live_table(&self, keyspace: &str, table: &str) -> Option<TableMetadata> {
		self.state.lock().keyspaces.get(keyspace).and_then(|tables| tables.get(table)).cloned()
	}

	pub fn has_keyspace(&self, keyspace: &str) -> bool {
		self.state.lock().keyspaces.contains_key(keyspace)
	}

	pub fn executed(&self) -> Vec<PlannedAction> {
		self.state.lock().executed.clone()
	}

	/// `(source, destination)` of every upload, in order.
	pub fn uploads(&self) -> Vec<(String, String)> {
		self.state.lock().uploads.clone()
	}

	pub fn cores(&self) -> Vec<String> {
		self.state.lock().cores.iter().cloned().collect()
	}

	fn apply(state: &mut ClusterState, action: &PlannedAction) -> Result<(), String> {
		match action {
			PlannedAction::CreateKeyspace {
				keyspace,
				..
			} => {
				state.keyspaces.entry(keyspace.clone()).or_default();
			}
			PlannedAction::DropKeyspace {
				keyspace,
			} => {
				state.keyspaces.remove(keyspace);
				state.cores.retain(|core| !core.starts_with(&format!("{}.", keyspace)));
			}
			PlannedAction::CreateTable(create) => {
				let tables = state.keyspaces.entry(create.keyspace.clone()).or_default();
				if tables.contains_key(&create.table) {
					return Err(format!("table {}.{} already exists", create.keyspace, create.table));
				}
				tables.insert(create.table.clone(), table_of(create));
			}
			PlannedAction::DropTable {
				keyspace,
				table,
				if_exists,
			} => {
				let removed = state.keyspaces.get_mut(keyspace).and_then(|tables| tables.remove(table));
				if removed.is_none() && !if_exists {
					return Err(format!("table {}.{} does not exist", keyspace, table));
				}
			}
			PlannedAction::AddColumn {
				keyspace,
				table,
				column,
			} => {
				let live = table_mut(state, keyspace, table)?;
				if live.has_column(&column.name) {
					return Err(format!("column {} already exists", column.name));
				}
				live.columns.push(ringschema_engine::LiveColumn {
					name: column.name.clone(),
					storage_type: column.storage_type.clone(),
					key_role: KeyRole::None,
				});
			}
			PlannedAction::AlterColumnType {
				keyspace,
				table,
				column,
			} => {
				let live = table_mut(state, keyspace, table)?;
				let Some(existing) =
					live.columns.iter_mut().find(|existing| existing.name.eq_ignore_ascii_case(&column.name))
				else {
					return Err(format!("column {} does not exist", column.name));
				};
				existing.storage_type = column.storage_type.clone();
			}
			PlannedAction::DropColumn {
				keyspace,
				table,
				column,
			} => {
				let live = table_mut(state, keyspace, table)?;
				let before = live.columns.len();
				live.columns.retain(|existing| !existing.name.eq_ignore_ascii_case(column));
				if live.columns.len() == before {
					return Err(format!("column {} does not exist", column));
				}
			}
			PlannedAction::CreateIndex {
				keyspace,
				table,
				column,
				..
			} => {
				let live = table_mut(state, keyspace, table)?;
				if !live.has_column(column) {
					return Err(format!("cannot index unknown column {}", column));
				}
			}
			PlannedAction::UploadResource {
				..
			}
			| PlannedAction::SearchCoreAdmin {
				..
			}
			| PlannedAction::WaitForMarkerColumn {
				..
			} => return Err(format!("{} is not a statement", action.kind())),
		}
		Ok(())
	}

	fn failure(action: &PlannedAction, reason: impl Into<String>) -> Error {
		execution_failed(action.to_string(), reason).into()
	}
}

fn table_of(create: &CreateTable) -> TableMetadata {
	let descending = create
		.options
		.as_ref()
		.map(|options| {
			options
				.clustering_order()
				.iter()
				.filter(|order| order.direction == Direction::Desc)
				.map(|order| order.column.to_lowercase())
				.collect::<BTreeSet<_>>()
		})
		.unwrap_or_default();

	let mut table = TableMetadata::new(create.keyspace.clone(), create.table.clone());
	for column in &create.partition_key {
		table = table.with_column(column.name.clone(), column.storage_type.clone(), KeyRole::PartitionKey);
	}
	for column in &create.clustering {
		let role = if descending.contains(&column.name.to_lowercase()) {
			KeyRole::ClusteringKeyDesc
		} else {
			KeyRole::ClusteringKeyAsc
		};
		table = table.with_column(column.name.clone(), column.storage_type.clone(), role);
	}
	for column in &create.statics {
		table = table.with_column(column.name.clone(), column.storage_type.clone(), KeyRole::Static);
	}
	for column in &create.regular {
		table = table.with_column(column.name.clone(), column.storage_type.clone(), KeyRole::None);
	}
	table
}

fn table_mut<'a>(state: &'a mut ClusterState, keyspace: &str, table: &str) -> Result<&'a mut TableMetadata, String> {
	state
		.keyspaces
		.get_mut(keyspace)
		.and_then(|tables| tables.get_mut(table))
		.ok_or_else(|| format!("table {}.{} does not exist", keyspace, table))
}

impl MetadataProvider for InMemoryCluster {
	fn table(&self, keyspace: &str, table: &str) -> ringschema_type::Result<Option<TableMetadata>> {
		let state = self.state.lock();
		if state.unavailable.contains(keyspace) {
			return Err(metadata_unavailable(keyspace, "no host in the ring answered").into());
		}
		Ok(state.keyspaces.get(keyspace).and_then(|tables| tables.get(table)).cloned())
	}

	fn tables(&self, keyspace: &str) -> ringschema_type::Result<Vec<String>> {
		let state = self.state.lock();
		if state.unavailable.contains(keyspace) {
			return Err(metadata_unavailable(keyspace, "no host in the ring answered").into());
		}
		Ok(state.keyspaces.get(keyspace).map(|tables| tables.keys().cloned().collect()).unwrap_or_default())
	}
}

impl ResourceUploader for InMemoryCluster {
	fn upload(&self, source: &str, destination: &str) -> ringschema_type::Result<()> {
		trace!(source, destination, "upload");
		self.state.lock().uploads.push((source.to_string(), destination.to_string()));
		Ok(())
	}
}

impl ActionRunner for InMemoryCluster {
	fn run_statement(&self, action: &PlannedAction) -> ringschema_type::Result<()> {
		let mut state = self.state.lock();
		if state.fail_on == Some(action.kind()) {
			return Err(Self::failure(action, "rejected by the cluster"));
		}
		Self::apply(&mut state, action).map_err(|reason| Self::failure(action, reason))?;
		state.executed.push(action.clone());
		Ok(())
	}

	fn search_core_admin(&self, keyspace: &str, table: &str, command: SearchCoreCommand) -> ringschema_type::Result<()> {
		let mut state = self.state.lock();
		let core = format!("{}.{}", keyspace, table);
		let action = PlannedAction::SearchCoreAdmin {
			keyspace: keyspace.to_string(),
			table: table.to_string(),
			command,
		};

		match command {
			SearchCoreCommand::Create => {
				if !state.no_marker {
					let live = table_mut(&mut state, keyspace, table).map_err(|reason| Self::failure(&action, reason))?;
					if !live.has_column(MARKER_COLUMN) {
						live.columns.push(ringschema_engine::LiveColumn {
							name: MARKER_COLUMN.to_string(),
							storage_type: StorageType::Text,
							key_role: KeyRole::None,
						});
					}
				}
				state.cores.insert(core);
			}
			SearchCoreCommand::Reload {
				..
			} => {
				if !state.cores.contains(&core) {
					return Err(Self::failure(&action, format!("no core named {}", core)));
				}
			}
			SearchCoreCommand::Unload => {
				if !state.cores.remove(&core) {
					return Err(Self::failure(&action, format!("no core named {}", core)));
				}
			}
		}
		state.executed.push(action);
		Ok(())
	}
}
