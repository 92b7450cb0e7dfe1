// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fmt::Display, str::FromStr};

use ringschema_catalog::{SearchOptions, cql::qualified_name};
use ringschema_type::error::diagnostic::schema;
use tracing::{info, instrument};

use crate::{
	action::{PlannedAction, SearchCoreCommand},
	context::SchemaContext,
	orchestrator::DeclaredTable,
};

/// Resource uploads for a search core, config first, then schema and its
/// additional files.
pub(crate) fn upload_actions(
	keyspace: &str,
	table: &str,
	search: &SearchOptions,
	config: bool,
	schema: bool,
) -> Vec<PlannedAction> {
	let core = format!("{}.{}", keyspace, table);
	let upload = |source: &str, destination: &str| PlannedAction::UploadResource {
		core: core.clone(),
		source: source.to_string(),
		destination: destination.to_string(),
	};

	let mut actions = Vec::new();
	if config {
		actions.push(upload(&search.config_resource, "solrconfig.xml"));
	}
	if schema {
		actions.push(upload(&search.schema_resource, "schema.xml"));
		for file in &search.additional_files {
			actions.push(upload(&file.source, &file.destination));
		}
	}
	actions
}

/// Enqueues core-admin commands for the search core of one declared table.
pub struct SearchCoreModifier<'a> {
	context: &'a SchemaContext,
	keyspace: String,
	table: String,
}

impl<'a> SearchCoreModifier<'a> {
	pub fn for_table(context: &'a SchemaContext, table: &dyn DeclaredTable) -> Self {
		Self {
			context,
			keyspace: context.rings.resolve(table.ring_group()).keyspace.clone(),
			table: table.name().to_string(),
		}
	}

	pub fn create(&self) -> crate::Result<()> {
		self.enqueue(SearchCoreCommand::Create)
	}

	pub fn reload_in_place(&self) -> crate::Result<()> {
		self.reload(true, false)
	}

	pub fn reload_drop_index(&self) -> crate::Result<()> {
		self.reload(true, true)
	}

	pub fn reload_dont_reindex(&self) -> crate::Result<()> {
		self.reload(false, false)
	}

	pub fn unload(&self) -> crate::Result<()> {
		self.enqueue(SearchCoreCommand::Unload)
	}

	fn reload(&self, reindex: bool, delete_all: bool) -> crate::Result<()> {
		self.enqueue(SearchCoreCommand::Reload {
			reindex,
			delete_all,
		})
	}

	fn enqueue(&self, command: SearchCoreCommand) -> crate::Result<()> {
		let provenance = format!("search_core:{}", qualified_name(&self.keyspace, &self.table));
		self.context.executor.enqueue(
			PlannedAction::SearchCoreAdmin {
				keyspace: self.keyspace.clone(),
				table: self.table.clone(),
				command,
			},
			&provenance,
		)
	}
}

/// How a search core picks up new configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexType {
	/// Reload, drop the index and reindex everything.
	Full,
	/// Reload and reindex over the existing index.
	#[default]
	InPlace,
	/// Reload without reindexing.
	None,
	/// Create the core.
	Create,
}

impl Display for IndexType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			IndexType::Full => f.write_str("full"),
			IndexType::InPlace => f.write_str("inplace"),
			IndexType::None => f.write_str("none"),
			IndexType::Create => f.write_str("create"),
		}
	}
}

impl FromStr for IndexType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"full" => Ok(IndexType::Full),
			"inplace" | "in_place" => Ok(IndexType::InPlace),
			"none" => Ok(IndexType::None),
			"create" => Ok(IndexType::Create),
			other => Err(format!("unknown index type '{}'", other)),
		}
	}
}

/// Pushes new search configuration for a declared table and reloads its core.
pub struct SearchTableUpdater<'a> {
	context: &'a SchemaContext,
	update_config: bool,
	update_schema: bool,
	index_type: IndexType,
}

impl<'a> SearchTableUpdater<'a> {
	pub fn new(context: &'a SchemaContext) -> Self {
		Self {
			context,
			update_config: false,
			update_schema: false,
			index_type: IndexType::default(),
		}
	}

	pub fn update_config(mut self, value: bool) -> Self {
		self.update_config = value;
		self
	}

	pub fn update_schema(mut self, value: bool) -> Self {
		self.update_schema = value;
		self
	}

	pub fn index_type(mut self, value: IndexType) -> Self {
		self.index_type = value;
		self
	}

	/// Logs the names of every search-enabled table and returns them.
	pub fn list_search_tables(tables: &[&dyn DeclaredTable]) -> Vec<String> {
		info!("=== Listing available search tables ===");
		tables
			.iter()
			.filter(|table| table.search().enabled)
			.map(|table| {
				info!("* {}", table.name());
				table.name().to_string()
			})
			.collect()
	}

	/// Finds `name` among `tables` and updates it.
	pub fn update_named(&self, tables: &[&dyn DeclaredTable], name: &str) -> crate::Result<usize> {
		match tables.iter().find(|table| table.name().eq_ignore_ascii_case(name)) {
			Some(table) => self.update(*table),
			None => ringschema_type::err!(schema::unknown_table(name)),
		}
	}

	/// Enqueues the uploads and the core command, returning how many actions
	/// were enqueued.
	#[instrument(name = "engine::search::update", level = "debug", skip_all, fields(table = table.name(), index_type = %self.index_type))]
	pub fn update(&self, table: &dyn DeclaredTable) -> crate::Result<usize> {
		table.validate()?;
		let search = table.search();
		if !search.enabled {
			ringschema_type::return_error!(schema::search_not_enabled(table.name()));
		}

		let ring = self.context.rings.resolve(table.ring_group());
		let provenance = format!("search_table_updater:{}", qualified_name(&ring.keyspace, table.name()));
		let uploads = upload_actions(&ring.keyspace, table.name(), search, self.update_config, self.update_schema);
		let count = uploads.len() + 1;
		for action in uploads {
			self.context.executor.enqueue(action, &provenance)?;
		}

		let modifier = SearchCoreModifier::for_table(self.context, table);
		match self.index_type {
			IndexType::Create => modifier.create()?,
			IndexType::Full => modifier.reload_drop_index()?,
			IndexType::InPlace => modifier.reload_in_place()?,
			IndexType::None => modifier.reload_dont_reindex()?,
		}
		Ok(count)
	}
}
