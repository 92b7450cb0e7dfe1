// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use ringschema_catalog::SchemaRegistry;

use crate::{
	interface::{MetadataProvider, StatementExecutor},
	ring::RingDirectory,
};

/// Collaborators shared by the builder, comparator and orchestrator.
#[derive(Clone)]
pub struct SchemaContext {
	pub executor: Arc<dyn StatementExecutor>,
	pub metadata: Arc<dyn MetadataProvider>,
	pub registry: SchemaRegistry,
	pub rings: RingDirectory,
}

impl SchemaContext {
	pub fn new(
		executor: Arc<dyn StatementExecutor>,
		metadata: Arc<dyn MetadataProvider>,
		rings: RingDirectory,
	) -> Self {
		Self {
			executor,
			metadata,
			registry: SchemaRegistry::new(),
			rings,
		}
	}

	pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
		self.registry = registry;
		self
	}
}
