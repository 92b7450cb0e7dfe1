// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{any::Any, ops::Deref, sync::Arc};

use crossbeam_skiplist::SkipMap;
use tracing::{instrument, trace};

use crate::{CompiledColumns, DescriptorId, Record, TableDescriptor};

/// Lazily compiled column lists, one per table descriptor, kept for the
/// lifetime of the registry.
#[derive(Clone)]
pub struct SchemaRegistry(Arc<SchemaRegistryInner>);

pub struct SchemaRegistryInner {
	compiled: SkipMap<DescriptorId, Arc<dyn Any + Send + Sync>>,
}

impl Deref for SchemaRegistry {
	type Target = SchemaRegistryInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Default for SchemaRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl SchemaRegistry {
	pub fn new() -> Self {
		Self(Arc::new(SchemaRegistryInner {
			compiled: SkipMap::new(),
		}))
	}

	/// Returns the compiled columns of `descriptor`, compiling on first use.
	/// Two threads racing on the same descriptor both compile; the last
	/// insert wins and both results are equivalent.
	#[instrument(name = "catalog::registry::compile", level = "trace", skip_all, fields(table = descriptor.name()))]
	pub fn compile<R: Record>(&self, descriptor: &TableDescriptor<R>) -> crate::Result<Arc<CompiledColumns<R>>> {
		if let Some(entry) = self.compiled.get(&descriptor.id()) {
			if let Ok(compiled) = entry.value().clone().downcast::<CompiledColumns<R>>() {
				return Ok(compiled);
			}
		}

		let compiled = Arc::new(CompiledColumns::compile(descriptor)?);
		trace!(descriptor = %descriptor.id(), columns = compiled.len(), "compiled columns");
		self.compiled.insert(descriptor.id(), compiled.clone() as Arc<dyn Any + Send + Sync>);
		Ok(compiled)
	}

	pub fn contains(&self, id: DescriptorId) -> bool {
		self.compiled.contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.compiled.len()
	}

	pub fn is_empty(&self) -> bool {
		self.compiled.is_empty()
	}
}
