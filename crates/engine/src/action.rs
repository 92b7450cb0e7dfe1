// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Actions produced by planning.
//!
//! DDL variants render the store's CQL dialect through [`Display`]; the
//! remaining variants render a short human-readable line for logs.

use std::{
	fmt::{Display, Formatter},
	time::Duration,
};

use ringschema_catalog::{
	TableOptions,
	cql::{qualified_name, quote_identifier, quote_literal},
};
use ringschema_type::StorageType;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
	pub name: String,
	pub storage_type: StorageType,
}

impl ColumnSpec {
	pub fn new(name: impl Into<String>, storage_type: StorageType) -> Self {
		Self {
			name: name.into(),
			storage_type,
		}
	}
}

/// A CREATE TABLE statement with columns already bucketed by key role.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
	pub keyspace: String,
	pub table: String,
	pub partition_key: Vec<ColumnSpec>,
	pub clustering: Vec<ColumnSpec>,
	pub statics: Vec<ColumnSpec>,
	pub regular: Vec<ColumnSpec>,
	pub options: Option<TableOptions>,
}

impl CreateTable {
	/// All columns in the order they appear in the statement.
	pub fn columns(&self) -> impl Iterator<Item = &ColumnSpec> {
		self.partition_key.iter().chain(self.clustering.iter()).chain(self.statics.iter()).chain(self.regular.iter())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCoreCommand {
	Create,
	Reload {
		reindex: bool,
		delete_all: bool,
	},
	Unload,
}

impl Display for SearchCoreCommand {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			SearchCoreCommand::Create => f.write_str("CREATE"),
			SearchCoreCommand::Reload {
				reindex,
				delete_all,
			} => write!(f, "RELOAD reindex={} deleteAll={}", reindex, delete_all),
			SearchCoreCommand::Unload => f.write_str("UNLOAD deleteAll=true"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannedAction {
	CreateKeyspace {
		keyspace: String,
		replication_factor: u32,
	},
	CreateTable(CreateTable),
	AddColumn {
		keyspace: String,
		table: String,
		column: ColumnSpec,
	},
	AlterColumnType {
		keyspace: String,
		table: String,
		column: ColumnSpec,
	},
	DropColumn {
		keyspace: String,
		table: String,
		column: String,
	},
	CreateIndex {
		keyspace: String,
		table: String,
		name: String,
		column: String,
		keys: bool,
	},
	DropTable {
		keyspace: String,
		table: String,
		if_exists: bool,
	},
	DropKeyspace {
		keyspace: String,
	},
	/// Uploads a resource file into the search core named `core`.
	UploadResource {
		core: String,
		source: String,
		destination: String,
	},
	SearchCoreAdmin {
		keyspace: String,
		table: String,
		command: SearchCoreCommand,
	},
	WaitForMarkerColumn {
		keyspace: String,
		table: String,
		column: String,
		timeout: Duration,
		poll_interval: Duration,
	},
}

impl PlannedAction {
	pub fn kind(&self) -> &'static str {
		match self {
			PlannedAction::CreateKeyspace {
				..
			} => "create_keyspace",
			PlannedAction::CreateTable(_) => "create_table",
			PlannedAction::AddColumn {
				..
			} => "add_column",
			PlannedAction::AlterColumnType {
				..
			} => "alter_column_type",
			PlannedAction::DropColumn {
				..
			} => "drop_column",
			PlannedAction::CreateIndex {
				..
			} => "create_index",
			PlannedAction::DropTable {
				..
			} => "drop_table",
			PlannedAction::DropKeyspace {
				..
			} => "drop_keyspace",
			PlannedAction::UploadResource {
				..
			} => "upload_resource",
			PlannedAction::SearchCoreAdmin {
				..
			} => "search_core_admin",
			PlannedAction::WaitForMarkerColumn {
				..
			} => "wait_for_marker_column",
		}
	}

	/// True for statements sent to the store itself.
	pub fn is_ddl(&self) -> bool {
		!matches!(
			self,
			PlannedAction::UploadResource { .. }
				| PlannedAction::SearchCoreAdmin { .. }
				| PlannedAction::WaitForMarkerColumn { .. }
		)
	}

	/// True for actions that remove a table, a column or a keyspace.
	pub fn is_destructive(&self) -> bool {
		matches!(
			self,
			PlannedAction::DropColumn { .. } | PlannedAction::DropTable { .. } | PlannedAction::DropKeyspace { .. }
		)
	}
}

impl Display for PlannedAction {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			PlannedAction::CreateKeyspace {
				keyspace,
				replication_factor,
			} => write!(
				f,
				"CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
				quote_identifier(keyspace),
				replication_factor
			),
			PlannedAction::CreateTable(create) => write_create_table(f, create),
			PlannedAction::AddColumn {
				keyspace,
				table,
				column,
			} => write!(
				f,
				"ALTER TABLE {} ADD {} {}",
				qualified_name(keyspace, table),
				quote_identifier(&column.name),
				column.storage_type
			),
			PlannedAction::AlterColumnType {
				keyspace,
				table,
				column,
			} => write!(
				f,
				"ALTER TABLE {} ALTER {} TYPE {}",
				qualified_name(keyspace, table),
				quote_identifier(&column.name),
				column.storage_type
			),
			PlannedAction::DropColumn {
				keyspace,
				table,
				column,
			} => write!(f, "ALTER TABLE {} DROP {}", qualified_name(keyspace, table), quote_identifier(column)),
			PlannedAction::CreateIndex {
				keyspace,
				table,
				name,
				column,
				keys,
			} => {
				f.write_str("CREATE INDEX ")?;
				if !name.is_empty() {
					write!(f, "{} ", quote_identifier(name))?;
				}
				let column = quote_identifier(column);
				if *keys {
					write!(f, "ON {} (KEYS({}))", qualified_name(keyspace, table), column)
				} else {
					write!(f, "ON {} ({})", qualified_name(keyspace, table), column)
				}
			}
			PlannedAction::DropTable {
				keyspace,
				table,
				if_exists,
			} => {
				if *if_exists {
					write!(f, "DROP TABLE IF EXISTS {}", qualified_name(keyspace, table))
				} else {
					write!(f, "DROP TABLE {}", qualified_name(keyspace, table))
				}
			}
			PlannedAction::DropKeyspace {
				keyspace,
			} => write!(f, "DROP KEYSPACE IF EXISTS {}", quote_identifier(keyspace)),
			PlannedAction::UploadResource {
				core,
				source,
				destination,
			} => write!(f, "UPLOAD {} TO {}/{}", quote_literal(source), core, destination),
			PlannedAction::SearchCoreAdmin {
				keyspace,
				table,
				command,
			} => write!(f, "CORE {} {}.{}", command, keyspace, table),
			PlannedAction::WaitForMarkerColumn {
				keyspace,
				table,
				column,
				timeout,
				poll_interval,
			} => write!(
				f,
				"WAIT FOR COLUMN {} ON {} ({} ms, every {} ms)",
				column,
				qualified_name(keyspace, table),
				timeout.as_millis(),
				poll_interval.as_millis()
			),
		}
	}
}

fn write_create_table(f: &mut Formatter<'_>, create: &CreateTable) -> std::fmt::Result {
	write!(f, "CREATE TABLE {} (", qualified_name(&create.keyspace, &create.table))?;

	for column in create.columns() {
		write!(f, "{} {}", quote_identifier(&column.name), column.storage_type)?;
		if create.statics.contains(column) {
			f.write_str(" static")?;
		}
		f.write_str(", ")?;
	}

	let partition = create.partition_key.iter().map(|c| quote_identifier(&c.name)).collect::<Vec<_>>().join(", ");
	let partition = if create.partition_key.len() > 1 {
		format!("({})", partition)
	} else {
		partition
	};

	f.write_str("PRIMARY KEY (")?;
	f.write_str(&partition)?;
	for column in &create.clustering {
		write!(f, ", {}", quote_identifier(&column.name))?;
	}
	f.write_str("))")?;

	if let Some(options) = create.options.as_ref().filter(|options| options.has_options()) {
		write!(f, " WITH {}", options)?;
	}
	Ok(())
}
