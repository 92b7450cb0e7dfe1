// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use ringschema_catalog::{ClusteringOrder, Direction, Record, TableDescriptor, TableOptions, cql::qualified_name};
use ringschema_type::KeyRole;
use tracing::{debug, instrument};

use crate::{
	action::{ColumnSpec, CreateTable, PlannedAction, SearchCoreCommand},
	context::SchemaContext,
	interface::MetadataProvider,
	ring::RingHandle,
	search::upload_actions,
	waiter::{DEFAULT_POLL_INTERVAL, MARKER_COLUMN},
};

pub const DEFAULT_MARKER_TIMEOUT: Duration = Duration::from_secs(60);

/// Plans and enqueues the creation of a table that does not exist yet.
pub struct TableBuilder<'a> {
	context: &'a SchemaContext,
	metadata: &'a dyn MetadataProvider,
	marker_timeout: Duration,
	marker_poll_interval: Duration,
}

impl<'a> TableBuilder<'a> {
	pub fn new(context: &'a SchemaContext) -> Self {
		Self {
			context,
			metadata: context.metadata.as_ref(),
			marker_timeout: DEFAULT_MARKER_TIMEOUT,
			marker_poll_interval: DEFAULT_POLL_INTERVAL,
		}
	}

	/// Plans against `metadata` instead of the context's provider.
	pub fn with_metadata(mut self, metadata: &'a dyn MetadataProvider) -> Self {
		self.metadata = metadata;
		self
	}

	pub fn with_marker_timeout(mut self, timeout: Duration) -> Self {
		self.marker_timeout = timeout;
		self
	}

	/// How often the marker column wait re-reads live metadata.
	pub fn with_marker_poll_interval(mut self, interval: Duration) -> Self {
		self.marker_poll_interval = interval;
		self
	}

	/// Enqueues everything needed to create `descriptor`'s table and returns
	/// the number of enqueued actions. A table that already exists is left
	/// alone.
	#[instrument(name = "engine::builder::build", level = "debug", skip_all, fields(table = descriptor.name()))]
	pub fn build<R: Record>(&self, descriptor: &TableDescriptor<R>) -> crate::Result<usize> {
		descriptor.validate()?;

		let ring = self.context.rings.resolve(descriptor.ring_group());
		if self.metadata.table(&ring.keyspace, descriptor.name())?.is_some() {
			debug!(keyspace = %ring.keyspace, "table already exists");
			return Ok(0);
		}

		let actions = self.plan(descriptor, ring)?;
		let provenance = format!("table_builder:{}", qualified_name(&ring.keyspace, descriptor.name()));
		let count = actions.len();
		for action in actions {
			self.context.executor.enqueue(action, &provenance)?;
		}
		Ok(count)
	}

	/// Actions that create `descriptor`'s table on `ring`, without looking at
	/// live metadata.
	pub fn plan<R: Record>(&self, descriptor: &TableDescriptor<R>, ring: &RingHandle) -> crate::Result<Vec<PlannedAction>> {
		descriptor.validate()?;
		let columns = self.context.registry.compile(descriptor)?;
		descriptor.validate_keys(&columns)?;

		let mut create = CreateTable {
			keyspace: ring.keyspace.clone(),
			table: descriptor.name().to_string(),
			partition_key: vec![],
			clustering: vec![],
			statics: vec![],
			regular: vec![],
			options: None,
		};

		let mut derived_order = Vec::new();
		let mut any_descending = false;
		for column in columns.list().iter().filter(|column| column.included_in_create()) {
			let spec = ColumnSpec::new(column.name.clone(), column.storage_type.clone());
			match column.key_role {
				KeyRole::PartitionKey => create.partition_key.push(spec),
				KeyRole::ClusteringKeyAsc | KeyRole::ClusteringKeyDesc => {
					any_descending |= column.key_role.is_descending();
					derived_order.push(ClusteringOrder {
						column: column.name.clone(),
						direction: if column.key_role.is_descending() {
							Direction::Desc
						} else {
							Direction::Asc
						},
					});
					create.clustering.push(spec);
				}
				KeyRole::Static => create.statics.push(spec),
				KeyRole::None => create.regular.push(spec),
			}
		}

		let overrides = descriptor.clustering_order();
		let clustering_order = if !overrides.is_empty() {
			overrides.iter().cloned().chain(derived_order.into_iter().skip(overrides.len())).collect::<Vec<_>>()
		} else if any_descending {
			derived_order
		} else {
			vec![]
		};

		let (options, _) = TableOptions::encode(descriptor.properties());
		let options = options.with_clustering_order(clustering_order);
		create.options = options.has_options().then_some(options);

		let mut actions = vec![PlannedAction::CreateTable(create)];

		for index in descriptor.indexes() {
			actions.push(PlannedAction::CreateIndex {
				keyspace: ring.keyspace.clone(),
				table: descriptor.name().to_string(),
				name: index.name.clone(),
				column: index.column.clone(),
				keys: index.keys,
			});
		}

		let search = descriptor.search();
		if search.enabled {
			actions.extend(upload_actions(&ring.keyspace, descriptor.name(), search, true, true));
			actions.push(PlannedAction::SearchCoreAdmin {
				keyspace: ring.keyspace.clone(),
				table: descriptor.name().to_string(),
				command: SearchCoreCommand::Create,
			});
			actions.push(PlannedAction::WaitForMarkerColumn {
				keyspace: ring.keyspace.clone(),
				table: descriptor.name().to_string(),
				column: MARKER_COLUMN.to_string(),
				timeout: search.marker_timeout.unwrap_or(self.marker_timeout),
				poll_interval: self.marker_poll_interval,
			});
		}

		Ok(actions)
	}
}
