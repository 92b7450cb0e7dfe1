// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeSet, time::Duration};

use ringschema_catalog::{Record, TableDescriptor};
use ringschema_config::AutoSchemaConfig;
use ringschema_type::StorageType;
use tracing::{debug, info, instrument, trace, warn};

use crate::{
	action::{ColumnSpec, PlannedAction},
	builder::{DEFAULT_MARKER_TIMEOUT, TableBuilder},
	context::SchemaContext,
	interface::MetadataProvider,
	waiter::{DEFAULT_POLL_INTERVAL, MARKER_COLUMN},
};

/// One difference between a declared table and its live counterpart.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaChange {
	CreateTable,
	AddColumn {
		column: String,
		storage_type: StorageType,
	},
	AlterColumnType {
		column: String,
		from: StorageType,
		to: StorageType,
	},
	/// A live column no declared column maps to. Only whitelisted ones are
	/// dropped.
	SuperfluousColumn {
		column: String,
		whitelisted: bool,
	},
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
	/// `keyspace.table`
	pub table: String,
	pub changes: Vec<SchemaChange>,
	pub enqueued: usize,
}

impl PlanResult {
	pub fn is_in_sync(&self) -> bool {
		self.changes.is_empty()
	}

	/// Superfluous columns that were left in place.
	pub fn skipped_columns(&self) -> Vec<&str> {
		self.changes
			.iter()
			.filter_map(|change| match change {
				SchemaChange::SuperfluousColumn {
					column,
					whitelisted: false,
				} => Some(column.as_str()),
				_ => None,
			})
			.collect()
	}
}

/// Diffs a declared table against live metadata and enqueues the changes.
pub struct TableComparator<'a> {
	context: &'a SchemaContext,
	metadata: &'a dyn MetadataProvider,
	dry_run: bool,
	drop_columns: BTreeSet<String>,
	marker_timeout: Duration,
	marker_poll_interval: Duration,
}

impl<'a> TableComparator<'a> {
	pub fn new(context: &'a SchemaContext) -> Self {
		Self {
			context,
			metadata: context.metadata.as_ref(),
			dry_run: false,
			drop_columns: BTreeSet::new(),
			marker_timeout: DEFAULT_MARKER_TIMEOUT,
			marker_poll_interval: DEFAULT_POLL_INTERVAL,
		}
	}

	pub fn with_config(mut self, config: &AutoSchemaConfig) -> Self {
		self.dry_run = config.dry_run;
		self.drop_columns = config.drop_columns.clone();
		self.marker_timeout = config.marker_timeout();
		self.marker_poll_interval = config.marker_poll_interval();
		self
	}

	/// Plans against `metadata` instead of the context's provider.
	pub fn with_metadata(mut self, metadata: &'a dyn MetadataProvider) -> Self {
		self.metadata = metadata;
		self
	}

	pub fn dry_run(mut self, dry_run: bool) -> Self {
		self.dry_run = dry_run;
		self
	}

	/// Whitelists `table.column` for dropping.
	pub fn allow_drop_column(mut self, name: impl Into<String>) -> Self {
		self.drop_columns.insert(name.into());
		self
	}

	#[instrument(name = "engine::comparator::compare", level = "debug", skip_all, fields(table = descriptor.name(), dry_run = self.dry_run))]
	pub fn compare<R: Record>(&self, descriptor: &TableDescriptor<R>) -> crate::Result<PlanResult> {
		descriptor.validate()?;

		let ring = self.context.rings.resolve(descriptor.ring_group());
		let keyspace = ring.keyspace.as_str();
		let table = descriptor.name();
		let mut result = PlanResult {
			table: format!("{}.{}", keyspace, table),
			changes: vec![],
			enqueued: 0,
		};

		let Some(live) = self.metadata.table(keyspace, table)? else {
			result.changes.push(SchemaChange::CreateTable);
			let builder = TableBuilder::new(self.context)
				.with_metadata(self.metadata)
				.with_marker_timeout(self.marker_timeout)
				.with_marker_poll_interval(self.marker_poll_interval);
			if self.dry_run {
				let planned = builder.plan(descriptor, ring)?;
				for action in &planned {
					info!(table = %result.table, "would run: {}", action);
				}
			} else {
				result.enqueued = builder.build(descriptor)?;
			}
			return Ok(result);
		};

		let columns = self.context.registry.compile(descriptor)?;
		let provenance = format!("table_comparator:{}", result.table);
		let mut actions = Vec::new();

		for column in columns.list().iter().filter(|column| column.included_in_create()) {
			match live.column(&column.name) {
				None => {
					debug!(column = %column.name, storage_type = %column.storage_type, "column is missing");
					result.changes.push(SchemaChange::AddColumn {
						column: column.name.clone(),
						storage_type: column.storage_type.clone(),
					});
					actions.push(PlannedAction::AddColumn {
						keyspace: keyspace.to_string(),
						table: table.to_string(),
						column: ColumnSpec::new(column.name.clone(), column.storage_type.clone()),
					});
				}
				Some(existing) if existing.storage_type != column.storage_type => {
					debug!(
						column = %column.name,
						from = %existing.storage_type,
						to = %column.storage_type,
						"column type differs"
					);
					result.changes.push(SchemaChange::AlterColumnType {
						column: column.name.clone(),
						from: existing.storage_type.clone(),
						to: column.storage_type.clone(),
					});
					actions.push(PlannedAction::AlterColumnType {
						keyspace: keyspace.to_string(),
						table: table.to_string(),
						column: ColumnSpec::new(column.name.clone(), column.storage_type.clone()),
					});
				}
				Some(_) => trace!(column = %column.name, "column in sync"),
			}
		}

		for existing in &live.columns {
			if columns.contains(&existing.name) {
				continue;
			}
			if descriptor.search().enabled && existing.name.eq_ignore_ascii_case(MARKER_COLUMN) {
				continue;
			}

			let whitelist_key = format!("{}.{}", table, existing.name.to_lowercase());
			let whitelisted = self.drop_columns.contains(&whitelist_key);
			result.changes.push(SchemaChange::SuperfluousColumn {
				column: existing.name.clone(),
				whitelisted,
			});

			if !whitelisted {
				warn!(
					table = %result.table,
					column = %existing.name,
					"superfluous column is kept; whitelist '{}' in drop_columns to drop it",
					whitelist_key
				);
				continue;
			}
			actions.push(PlannedAction::DropColumn {
				keyspace: keyspace.to_string(),
				table: table.to_string(),
				column: existing.name.clone(),
			});
		}

		if self.dry_run {
			for action in &actions {
				info!(table = %result.table, "would run: {}", action);
			}
			return Ok(result);
		}

		for action in actions {
			self.context.executor.enqueue(action, &provenance)?;
			result.enqueued += 1;
		}
		Ok(result)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use ringschema_catalog::test_utils::event_table;
	use ringschema_type::{KeyRole, StorageType};

	use super::{SchemaChange, TableComparator};
	use crate::{
		action::PlannedAction,
		context::SchemaContext,
		interface::{MetadataProvider, TableMetadata},
		queue::QueuedExecutor,
		ring::RingDirectory,
	};

	struct OneTable(Option<TableMetadata>);

	impl MetadataProvider for OneTable {
		fn table(&self, _keyspace: &str, _table: &str) -> crate::Result<Option<TableMetadata>> {
			Ok(self.0.clone())
		}

		fn tables(&self, _keyspace: &str) -> crate::Result<Vec<String>> {
			Ok(self.0.iter().map(|t| t.name.clone()).collect())
		}
	}

	fn live_events() -> TableMetadata {
		TableMetadata::new("app", "events")
			.with_column("id", StorageType::BigInt, KeyRole::PartitionKey)
			.with_column("ts", StorageType::Timestamp, KeyRole::ClusteringKeyDesc)
			.with_column("payload", StorageType::Text, KeyRole::None)
			.with_column("kind", StorageType::Text, KeyRole::None)
			.with_column("tags", StorageType::set(StorageType::Text), KeyRole::None)
			.with_column("attachments", StorageType::list(StorageType::Text), KeyRole::None)
			.with_column("counters", StorageType::map(StorageType::Text, StorageType::BigInt), KeyRole::None)
	}

	fn without(table: TableMetadata, column: &str) -> TableMetadata {
		TableMetadata {
			columns: table.columns.into_iter().filter(|c| c.name != column).collect(),
			..table
		}
	}

	fn setup(live: Option<TableMetadata>) -> (Arc<QueuedExecutor>, SchemaContext) {
		let queue = Arc::new(QueuedExecutor::new());
		let context = SchemaContext::new(queue.clone(), Arc::new(OneTable(live)), RingDirectory::single("app"));
		(queue, context)
	}

	#[test]
	fn test_in_sync() {
		let (queue, context) = setup(Some(live_events()));
		let result = TableComparator::new(&context).compare(&event_table()).unwrap();
		assert!(result.is_in_sync());
		assert_eq!(result.table, "app.events");
		assert!(queue.is_empty());
	}

	#[test]
	fn test_missing_column_is_added() {
		let (queue, context) = setup(Some(without(live_events(), "payload")));
		let result = TableComparator::new(&context).compare(&event_table()).unwrap();
		assert_eq!(
			result.changes,
			vec![SchemaChange::AddColumn {
				column: "payload".to_string(),
				storage_type: StorageType::Text,
			}]
		);
		assert_eq!(result.enqueued, 1);
		assert_eq!(queue.actions()[0].to_string(), "ALTER TABLE app.events ADD payload text");
		assert_eq!(queue.pending()[0].provenance, "table_comparator:app.events");
	}

	#[test]
	fn test_type_mismatch_is_altered() {
		let mut live = live_events();
		live.columns[2].storage_type = StorageType::Blob;
		let (queue, context) = setup(Some(live));
		let result = TableComparator::new(&context).compare(&event_table()).unwrap();
		assert_eq!(
			result.changes,
			vec![SchemaChange::AlterColumnType {
				column: "payload".to_string(),
				from: StorageType::Blob,
				to: StorageType::Text,
			}]
		);
		assert_eq!(queue.actions()[0].to_string(), "ALTER TABLE app.events ALTER payload TYPE text");
	}

	#[test]
	fn test_superfluous_column_not_whitelisted() {
		let live = live_events().with_column("legacy_flag", StorageType::Boolean, KeyRole::None);
		let (queue, context) = setup(Some(live));
		let result = TableComparator::new(&context).compare(&event_table()).unwrap();
		assert_eq!(result.skipped_columns(), vec!["legacy_flag"]);
		assert_eq!(result.enqueued, 0);
		assert!(queue.is_empty());
	}

	#[test]
	fn test_superfluous_column_whitelisted() {
		let live = live_events().with_column("Legacy_Flag", StorageType::Boolean, KeyRole::None);
		let (queue, context) = setup(Some(live));
		let result =
			TableComparator::new(&context).allow_drop_column("events.legacy_flag").compare(&event_table()).unwrap();
		assert!(result.skipped_columns().is_empty());
		assert_eq!(
			queue.actions(),
			vec![PlannedAction::DropColumn {
				keyspace: "app".to_string(),
				table: "events".to_string(),
				column: "Legacy_Flag".to_string(),
			}]
		);
	}

	#[test]
	fn test_adds_before_drops() {
		let live = without(live_events(), "payload").with_column("legacy_flag", StorageType::Boolean, KeyRole::None);
		let (queue, context) = setup(Some(live));
		TableComparator::new(&context).allow_drop_column("events.legacy_flag").compare(&event_table()).unwrap();
		let kinds = queue.actions().iter().map(PlannedAction::kind).collect::<Vec<_>>();
		assert_eq!(kinds, vec!["add_column", "drop_column"]);
	}

	#[test]
	fn test_dry_run_enqueues_nothing() {
		let live = without(live_events(), "payload").with_column("legacy_flag", StorageType::Boolean, KeyRole::None);
		let (queue, context) = setup(Some(live));
		let result = TableComparator::new(&context)
			.dry_run(true)
			.allow_drop_column("events.legacy_flag")
			.compare(&event_table())
			.unwrap();
		assert_eq!(result.changes.len(), 2);
		assert_eq!(result.enqueued, 0);
		assert!(queue.is_empty());
	}

	#[test]
	fn test_missing_table_is_built() {
		let (queue, context) = setup(None);
		let result = TableComparator::new(&context).compare(&event_table()).unwrap();
		assert_eq!(result.changes, vec![SchemaChange::CreateTable]);
		assert_eq!(result.enqueued, 1);
		assert_eq!(queue.actions()[0].kind(), "create_table");
	}

	#[test]
	fn test_missing_table_dry_run() {
		let (queue, context) = setup(None);
		let result = TableComparator::new(&context).dry_run(true).compare(&event_table()).unwrap();
		assert_eq!(result.changes, vec![SchemaChange::CreateTable]);
		assert!(queue.is_empty());
	}

	#[test]
	fn test_created_elsewhere_column_is_not_added() {
		let (_, context) = setup(Some(live_events()));
		let result = TableComparator::new(&context).compare(&event_table()).unwrap();
		assert!(!result.changes.iter().any(|change| matches!(
			change,
			SchemaChange::AddColumn { column, .. } if column == "solr_query"
		)));
	}
}
