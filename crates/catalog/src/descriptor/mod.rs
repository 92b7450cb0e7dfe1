// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
	sync::atomic::{AtomicU64, Ordering},
	time::Duration,
};

use serde::{Deserialize, Serialize};

mod column;
mod validate;

pub use column::{CodecColumn, ColumnDescriptor, FieldPathColumn, ManualColumn, SearchCopyFieldColumn};

use crate::properties::TableProperties;

static NEXT_DESCRIPTOR_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize)]
pub struct DescriptorId(pub u64);

impl DescriptorId {
	fn next() -> Self {
		DescriptorId(NEXT_DESCRIPTOR_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl Deref for DescriptorId {
	type Target = u64;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl PartialEq<u64> for DescriptorId {
	fn eq(&self, other: &u64) -> bool {
		self.0.eq(other)
	}
}

impl From<DescriptorId> for u64 {
	fn from(value: DescriptorId) -> Self {
		value.0
	}
}

impl Display for DescriptorId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
	Asc,
	Desc,
}

impl Display for Direction {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Direction::Asc => f.write_str("ASC"),
			Direction::Desc => f.write_str("DESC"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringOrder {
	pub column: String,
	pub direction: Direction,
}

/// A secondary index created alongside the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalIndex {
	pub name: String,
	pub column: String,
	/// Index the keys of a map column instead of its values.
	pub keys: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResourceFile {
	pub source: String,
	pub destination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
	pub enabled: bool,
	pub config_resource: String,
	pub schema_resource: String,
	pub additional_files: Vec<SearchResourceFile>,
	/// Overrides the caller-supplied marker column budget for this table.
	pub marker_timeout: Option<Duration>,
}

/// Immutable declaration of one table.
pub struct TableDescriptor<R> {
	id: DescriptorId,
	name: String,
	ring_group: String,
	columns: Vec<ColumnDescriptor<R>>,
	properties: TableProperties,
	indexes: Vec<AdditionalIndex>,
	clustering_order: Vec<ClusteringOrder>,
	search: SearchOptions,
}

impl<R> TableDescriptor<R> {
	pub fn builder(name: impl Into<String>) -> TableDescriptorBuilder<R> {
		TableDescriptorBuilder {
			name: name.into(),
			ring_group: String::new(),
			columns: vec![],
			properties: TableProperties::default(),
			indexes: vec![],
			clustering_order: vec![],
			search: SearchOptions::default(),
		}
	}

	pub fn id(&self) -> DescriptorId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn ring_group(&self) -> &str {
		&self.ring_group
	}

	pub fn columns(&self) -> &[ColumnDescriptor<R>] {
		&self.columns
	}

	pub fn properties(&self) -> &TableProperties {
		&self.properties
	}

	pub fn indexes(&self) -> &[AdditionalIndex] {
		&self.indexes
	}

	pub fn clustering_order(&self) -> &[ClusteringOrder] {
		&self.clustering_order
	}

	pub fn search(&self) -> &SearchOptions {
		&self.search
	}
}

pub struct TableDescriptorBuilder<R> {
	name: String,
	ring_group: String,
	columns: Vec<ColumnDescriptor<R>>,
	properties: TableProperties,
	indexes: Vec<AdditionalIndex>,
	clustering_order: Vec<ClusteringOrder>,
	search: SearchOptions,
}

impl<R> TableDescriptorBuilder<R> {
	pub fn ring_group(mut self, group: impl Into<String>) -> Self {
		self.ring_group = group.into();
		self
	}

	pub fn column(mut self, column: ColumnDescriptor<R>) -> Self {
		self.columns.push(column);
		self
	}

	pub fn properties(mut self, properties: TableProperties) -> Self {
		self.properties = properties;
		self
	}

	pub fn index(mut self, name: impl Into<String>, column: impl Into<String>, keys: bool) -> Self {
		self.indexes.push(AdditionalIndex {
			name: name.into(),
			column: column.into(),
			keys,
		});
		self
	}

	pub fn clustering_order(mut self, column: impl Into<String>, direction: Direction) -> Self {
		self.clustering_order.push(ClusteringOrder {
			column: column.into(),
			direction,
		});
		self
	}

	pub fn search(mut self, search: SearchOptions) -> Self {
		self.search = search;
		self
	}

	pub fn build(self) -> TableDescriptor<R> {
		TableDescriptor {
			id: DescriptorId::next(),
			name: self.name,
			ring_group: self.ring_group,
			columns: self.columns,
			properties: self.properties,
			indexes: self.indexes,
			clustering_order: self.clustering_order,
			search: self.search,
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::test_utils::{Event, event_table};

	use super::*;

	#[test]
	fn test_descriptor_ids_are_unique() {
		let first = event_table();
		let second = event_table();
		assert_ne!(first.id(), second.id());
	}

	#[test]
	fn test_builder_keeps_declaration_order() {
		let descriptor = TableDescriptor::<Event>::builder("things")
			.column(ColumnDescriptor::named("b").whole_record_json())
			.column(ColumnDescriptor::named("a").created_elsewhere())
			.clustering_order("b", Direction::Desc)
			.build();
		let names: Vec<_> = descriptor.columns().iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["b", "a"]);
		assert_eq!(descriptor.clustering_order()[0].direction, Direction::Desc);
		assert_eq!(descriptor.ring_group(), "");
	}
}
