// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeSet;

use ringschema_catalog::{Record, SearchOptions, TableDescriptor, cql::qualified_name};
use ringschema_config::AutoSchemaConfig;
use ringschema_type::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
	action::PlannedAction,
	builder::TableBuilder,
	comparator::{PlanResult, TableComparator},
	context::SchemaContext,
	interface::{MetadataProvider, TableMetadata},
};

/// A declared table with its record type erased, so tables over different
/// record types can be reconciled together.
pub trait DeclaredTable {
	fn name(&self) -> &str;

	fn ring_group(&self) -> &str;

	fn search(&self) -> &SearchOptions;

	fn validate(&self) -> crate::Result<()>;

	fn compare_with(&self, comparator: &TableComparator<'_>) -> crate::Result<PlanResult>;

	fn build_with(&self, builder: &TableBuilder<'_>) -> crate::Result<usize>;
}

impl<R: Record> DeclaredTable for TableDescriptor<R> {
	fn name(&self) -> &str {
		TableDescriptor::name(self)
	}

	fn ring_group(&self) -> &str {
		TableDescriptor::ring_group(self)
	}

	fn search(&self) -> &SearchOptions {
		TableDescriptor::search(self)
	}

	fn validate(&self) -> crate::Result<()> {
		TableDescriptor::validate(self)
	}

	fn compare_with(&self, comparator: &TableComparator<'_>) -> crate::Result<PlanResult> {
		comparator.compare(self)
	}

	fn build_with(&self, builder: &TableBuilder<'_>) -> crate::Result<usize> {
		builder.build(self)
	}
}

#[derive(Debug)]
pub struct TableFailure {
	/// `keyspace.table`, or the keyspace alone when listing its tables failed.
	pub target: String,
	pub error: Error,
}

/// Outcome of one reconciliation sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
	pub plans: Vec<PlanResult>,
	pub failures: Vec<TableFailure>,
	pub killed_keyspaces: Vec<String>,
	pub dropped_tables: Vec<String>,
	/// Live tables no declaration maps to, left in place.
	pub suggested_drops: Vec<String>,
}

impl SweepReport {
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}

	pub fn enqueued(&self) -> usize {
		self.plans.iter().map(|plan| plan.enqueued).sum::<usize>()
			+ self.dropped_tables.len()
			+ self.killed_keyspaces.len() * 2
	}
}

/// Live metadata as it will look once the killed keyspaces are dropped and
/// recreated empty.
struct AfterKill<'a> {
	inner: &'a dyn MetadataProvider,
	killed: BTreeSet<String>,
}

impl MetadataProvider for AfterKill<'_> {
	fn table(&self, keyspace: &str, table: &str) -> crate::Result<Option<TableMetadata>> {
		if self.killed.contains(keyspace) {
			return Ok(None);
		}
		self.inner.table(keyspace, table)
	}

	fn tables(&self, keyspace: &str) -> crate::Result<Vec<String>> {
		if self.killed.contains(keyspace) {
			return Ok(vec![]);
		}
		self.inner.tables(keyspace)
	}
}

/// Reconciles a whole set of declared tables across every ring.
pub struct SchemaOrchestrator<'a> {
	context: &'a SchemaContext,
}

impl<'a> SchemaOrchestrator<'a> {
	pub fn new(context: &'a SchemaContext) -> Self {
		Self {
			context,
		}
	}

	/// One sweep: optional keyspace kill, then every declared table is
	/// compared, then unmapped live tables are dropped or reported. A failing
	/// keyspace or table is recorded and the sweep moves on.
	#[instrument(name = "engine::orchestrator::reconcile_all", level = "info", skip_all, fields(tables = tables.len(), dry_run = config.dry_run))]
	pub fn reconcile_all(&self, tables: &[&dyn DeclaredTable], config: &AutoSchemaConfig) -> crate::Result<SweepReport> {
		let mut report = SweepReport::default();

		let mut killed = BTreeSet::new();
		if config.kill_first && !config.dry_run {
			for ring in self.context.rings.all() {
				if !killed.insert(ring.keyspace.clone()) {
					continue;
				}
				warn!(ring = %ring.name, keyspace = %ring.keyspace, "dropping keyspace before reconciling");
				let provenance = format!("kill_first:{}", ring.name);
				let enqueued = self
					.context
					.executor
					.enqueue(
						PlannedAction::DropKeyspace {
							keyspace: ring.keyspace.clone(),
						},
						&provenance,
					)
					.and_then(|_| {
						self.context.executor.enqueue(
							PlannedAction::CreateKeyspace {
								keyspace: ring.keyspace.clone(),
								replication_factor: ring.replication_factor,
							},
							&provenance,
						)
					});
				match enqueued {
					Ok(()) => report.killed_keyspaces.push(ring.keyspace.clone()),
					Err(error) => {
						warn!(keyspace = %ring.keyspace, error = %error, "keyspace kill not enqueued");
						killed.remove(&ring.keyspace);
						report.failures.push(TableFailure {
							target: ring.keyspace.clone(),
							error,
						});
					}
				}
			}
		}

		let metadata = AfterKill {
			inner: self.context.metadata.as_ref(),
			killed,
		};
		let comparator = TableComparator::new(self.context).with_config(config).with_metadata(&metadata);

		let mut processed = BTreeSet::new();
		for table in tables {
			let ring = self.context.rings.resolve(table.ring_group());
			let full_name = format!("{}.{}", ring.keyspace, table.name());
			processed.insert(full_name.to_lowercase());

			match table.compare_with(&comparator) {
				Ok(plan) => {
					debug!(table = %plan.table, changes = plan.changes.len(), enqueued = plan.enqueued, "compared");
					report.plans.push(plan);
				}
				Err(error) => {
					warn!(table = %full_name, error = %error, "table skipped");
					report.failures.push(TableFailure {
						target: full_name,
						error,
					});
				}
			}
		}

		let mut listed = BTreeSet::new();
		for ring in self.context.rings.all() {
			if !listed.insert(ring.keyspace.as_str()) {
				continue;
			}
			let live = match metadata.tables(&ring.keyspace) {
				Ok(live) => live,
				Err(error) => {
					warn!(keyspace = %ring.keyspace, error = %error, "cannot list live tables");
					report.failures.push(TableFailure {
						target: ring.keyspace.clone(),
						error,
					});
					continue;
				}
			};

			for name in live {
				let full_name = format!("{}.{}", ring.keyspace, name);
				if processed.contains(&full_name.to_lowercase()) {
					continue;
				}

				if config.drop_tables.contains(&full_name) && !config.dry_run {
					info!(table = %full_name, "dropping superfluous table");
					let enqueued = self.context.executor.enqueue(
						PlannedAction::DropTable {
							keyspace: ring.keyspace.clone(),
							table: name,
							if_exists: true,
						},
						&format!("schema_orchestrator:{}", full_name),
					);
					match enqueued {
						Ok(()) => report.dropped_tables.push(full_name),
						Err(error) => {
							warn!(table = %full_name, error = %error, "table drop not enqueued");
							report.failures.push(TableFailure {
								target: full_name,
								error,
							});
						}
					}
				} else {
					info!(
						"Superfluous table {}. To drop it, run auto-schema --drop-tables '{}'",
						full_name, full_name
					);
					report.suggested_drops.push(full_name);
				}
			}
		}

		info!(
			plans = report.plans.len(),
			failures = report.failures.len(),
			dropped = report.dropped_tables.len(),
			suggested = report.suggested_drops.len(),
			"sweep finished"
		);
		Ok(report)
	}

	/// Enqueues a `DROP TABLE IF EXISTS` for a declared table on its ring.
	pub fn drop_table_if_exists(&self, table: &dyn DeclaredTable) -> crate::Result<()> {
		table.validate()?;
		let ring = self.context.rings.resolve(table.ring_group());
		info!(keyspace = %ring.keyspace, table = table.name(), "dropping table");
		self.context.executor.enqueue(
			PlannedAction::DropTable {
				keyspace: ring.keyspace.clone(),
				table: table.name().to_string(),
				if_exists: true,
			},
			&format!("table_dropper:{}", qualified_name(&ring.keyspace, table.name())),
		)
	}
}

#[cfg(test)]
mod tests {
	use std::{collections::BTreeMap, sync::Arc};

	use ringschema_catalog::{TableDescriptor, test_utils::{Event, event_table}};
	use ringschema_config::{AutoSchemaConfig, MultiRingConfig, RingConfig};
	use ringschema_type::{
		KeyRole, StorageType,
		error::diagnostic::reconcile::{execution_failed, metadata_unavailable},
	};

	use super::{DeclaredTable, SchemaOrchestrator};
	use crate::{
		action::PlannedAction,
		context::SchemaContext,
		interface::{MetadataProvider, StatementExecutor, TableMetadata},
		queue::QueuedExecutor,
		ring::RingDirectory,
	};

	/// Queues everything except actions of one kind, which it refuses.
	struct Refusing {
		queue: QueuedExecutor,
		kind: &'static str,
	}

	impl StatementExecutor for Refusing {
		fn enqueue(&self, action: PlannedAction, provenance: &str) -> crate::Result<()> {
			if action.kind() == self.kind {
				return Err(execution_failed(action.to_string(), "queue refused").into());
			}
			self.queue.enqueue(action, provenance)
		}
	}

	fn refusing(kind: &'static str, metadata: Keyspaces) -> (Arc<Refusing>, SchemaContext) {
		let executor = Arc::new(Refusing {
			queue: QueuedExecutor::new(),
			kind,
		});
		let context = SchemaContext::new(executor.clone(), Arc::new(metadata), rings());
		(executor, context)
	}

	/// Live tables by keyspace; keyspaces listed in `down` fail every read.
	#[derive(Default)]
	struct Keyspaces {
		tables: Vec<TableMetadata>,
		down: Vec<&'static str>,
	}

	impl MetadataProvider for Keyspaces {
		fn table(&self, keyspace: &str, table: &str) -> crate::Result<Option<TableMetadata>> {
			if self.down.contains(&keyspace) {
				return Err(metadata_unavailable(keyspace, "no hosts available").into());
			}
			Ok(self.tables.iter().find(|t| t.keyspace == keyspace && t.name == table).cloned())
		}

		fn tables(&self, keyspace: &str) -> crate::Result<Vec<String>> {
			if self.down.contains(&keyspace) {
				return Err(metadata_unavailable(keyspace, "no hosts available").into());
			}
			Ok(self.tables.iter().filter(|t| t.keyspace == keyspace).map(|t| t.name.clone()).collect())
		}
	}

	fn rings() -> RingDirectory {
		RingDirectory::new(&MultiRingConfig {
			default_ring: "main".to_string(),
			rings: BTreeMap::from([
				(
					"main".to_string(),
					RingConfig {
						keyspace: "app".to_string(),
						replication_factor: 1,
					},
				),
				(
					"archive".to_string(),
					RingConfig {
						keyspace: "app_archive".to_string(),
						replication_factor: 2,
					},
				),
			]),
			groups: BTreeMap::new(),
		})
		.unwrap()
	}

	fn setup(metadata: Keyspaces) -> (Arc<QueuedExecutor>, SchemaContext) {
		let queue = Arc::new(QueuedExecutor::new());
		let context = SchemaContext::new(queue.clone(), Arc::new(metadata), rings());
		(queue, context)
	}

	fn archived_events() -> TableDescriptor<Event> {
		ringschema_catalog::test_utils::event_columns()
			.into_iter()
			.fold(TableDescriptor::builder("events").ring_group("archive"), |builder, column| builder.column(column))
			.build()
	}

	#[test]
	fn test_unmapped_table_is_suggested() {
		let (queue, context) = setup(Keyspaces {
			tables: vec![TableMetadata::new("app", "old_events")],
			..Keyspaces::default()
		});
		let events = event_table();
		let report = SchemaOrchestrator::new(&context)
			.reconcile_all(&[&events as &dyn DeclaredTable], &AutoSchemaConfig::default())
			.unwrap();

		assert_eq!(report.suggested_drops, vec!["app.old_events".to_string()]);
		assert!(report.dropped_tables.is_empty());
		assert_eq!(queue.actions().iter().filter(|a| a.is_destructive()).count(), 0);
	}

	#[test]
	fn test_whitelisted_table_is_dropped_last() {
		let (queue, context) = setup(Keyspaces {
			tables: vec![TableMetadata::new("app", "old_events")],
			..Keyspaces::default()
		});
		let config = AutoSchemaConfig {
			drop_tables: ["app.old_events".to_string()].into(),
			..AutoSchemaConfig::default()
		};
		let events = event_table();
		let report = SchemaOrchestrator::new(&context).reconcile_all(&[&events], &config).unwrap();

		assert_eq!(report.dropped_tables, vec!["app.old_events".to_string()]);
		let actions = queue.actions();
		assert_eq!(actions.first().map(PlannedAction::kind), Some("create_table"));
		assert_eq!(actions.last().map(ToString::to_string), Some("DROP TABLE IF EXISTS app.old_events".to_string()));
	}

	#[test]
	fn test_dry_run_does_not_drop_whitelisted() {
		let (queue, context) = setup(Keyspaces {
			tables: vec![TableMetadata::new("app", "old_events")],
			..Keyspaces::default()
		});
		let config = AutoSchemaConfig {
			dry_run: true,
			kill_first: true,
			drop_tables: ["app.old_events".to_string()].into(),
			..AutoSchemaConfig::default()
		};
		let events = event_table();
		let report = SchemaOrchestrator::new(&context).reconcile_all(&[&events], &config).unwrap();

		assert!(queue.is_empty());
		assert!(report.killed_keyspaces.is_empty());
		assert_eq!(report.suggested_drops, vec!["app.old_events".to_string()]);
	}

	#[test]
	fn test_failing_ring_is_isolated() {
		let (queue, context) = setup(Keyspaces {
			down: vec!["app_archive"],
			..Keyspaces::default()
		});
		let events = event_table();
		let archived = archived_events();
		let report = SchemaOrchestrator::new(&context)
			.reconcile_all(&[&archived as &dyn DeclaredTable, &events], &AutoSchemaConfig::default())
			.unwrap();

		assert!(!report.is_clean());
		let targets = report.failures.iter().map(|f| f.target.as_str()).collect::<Vec<_>>();
		assert_eq!(targets, vec!["app_archive.events", "app_archive"]);
		assert!(report.failures.iter().all(|f| f.error.code() == "RECON_002"));
		assert_eq!(report.plans.len(), 1);
		assert_eq!(report.plans[0].table, "app.events");
		assert_eq!(queue.actions()[0].kind(), "create_table");
	}

	#[test]
	fn test_kill_first() {
		let (queue, context) = setup(Keyspaces {
			tables: vec![
				TableMetadata::new("app", "events").with_column("id", StorageType::BigInt, KeyRole::PartitionKey),
				TableMetadata::new("app", "old_events"),
			],
			..Keyspaces::default()
		});
		let config = AutoSchemaConfig {
			kill_first: true,
			..AutoSchemaConfig::default()
		};
		let events = event_table();
		let report = SchemaOrchestrator::new(&context).reconcile_all(&[&events], &config).unwrap();

		assert_eq!(report.killed_keyspaces, vec!["app_archive".to_string(), "app".to_string()]);
		assert!(report.suggested_drops.is_empty());
		let kinds = queue.actions().iter().map(PlannedAction::kind).collect::<Vec<_>>();
		assert_eq!(
			kinds,
			vec!["drop_keyspace", "create_keyspace", "drop_keyspace", "create_keyspace", "create_table"]
		);
		assert_eq!(report.enqueued(), 5);
	}

	#[test]
	fn test_refused_table_drop_is_recorded() {
		let (executor, context) = refusing(
			"drop_table",
			Keyspaces {
				tables: vec![TableMetadata::new("app", "old_events"), TableMetadata::new("app", "older_events")],
				..Keyspaces::default()
			},
		);
		let config = AutoSchemaConfig {
			drop_tables: ["app.old_events".to_string()].into(),
			..AutoSchemaConfig::default()
		};
		let events = event_table();
		let report = SchemaOrchestrator::new(&context).reconcile_all(&[&events], &config).unwrap();

		assert!(report.dropped_tables.is_empty());
		assert_eq!(report.failures.len(), 1);
		assert_eq!(report.failures[0].target, "app.old_events");
		assert_eq!(report.failures[0].error.code(), "RECON_003");
		assert_eq!(report.suggested_drops, vec!["app.older_events".to_string()]);
		assert_eq!(executor.queue.actions()[0].kind(), "create_table");
	}

	#[test]
	fn test_refused_keyspace_kill_is_recorded() {
		let (executor, context) = refusing(
			"drop_keyspace",
			Keyspaces {
				tables: vec![TableMetadata::new("app", "events").with_column(
					"id",
					StorageType::BigInt,
					KeyRole::PartitionKey,
				)],
				..Keyspaces::default()
			},
		);
		let config = AutoSchemaConfig {
			kill_first: true,
			..AutoSchemaConfig::default()
		};
		let events = event_table();
		let report = SchemaOrchestrator::new(&context).reconcile_all(&[&events], &config).unwrap();

		assert!(report.killed_keyspaces.is_empty());
		let targets = report.failures.iter().map(|f| f.target.as_str()).collect::<Vec<_>>();
		assert_eq!(targets, vec!["app_archive", "app"]);
		assert_eq!(report.plans.len(), 1);
		assert!(executor.queue.actions().iter().all(|action| action.kind() == "add_column"));
	}

	#[test]
	fn test_drop_table_if_exists() {
		let (queue, context) = setup(Keyspaces::default());
		SchemaOrchestrator::new(&context).drop_table_if_exists(&archived_events()).unwrap();
		assert_eq!(queue.actions()[0].to_string(), "DROP TABLE IF EXISTS app_archive.events");
		assert_eq!(queue.pending()[0].provenance, "table_dropper:app_archive.events");
	}
}
