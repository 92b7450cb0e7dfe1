// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashMap;

use ringschema_type::{KeyRole, StorageType, error::diagnostic::schema};
use tracing::warn;

use crate::{
	ColumnDescriptor, TableDescriptor,
	column::{ColumnDefinition, ColumnKind},
};

/// Column definitions of one table, in declaration order, plus an index by
/// lowercased name.
pub struct CompiledColumns<R> {
	list: Vec<ColumnDefinition<R>>,
	by_name: HashMap<String, usize>,
}

impl<R> CompiledColumns<R> {
	pub fn compile(descriptor: &TableDescriptor<R>) -> crate::Result<Self> {
		let mut list = Vec::with_capacity(descriptor.columns().len());
		let mut by_name = HashMap::with_capacity(descriptor.columns().len());

		for column in descriptor.columns() {
			let Some(definition) = definition_of(descriptor.name(), column)? else {
				warn!(
					table = descriptor.name(),
					column = column.name.as_str(),
					"column selects no variant and is ignored"
				);
				continue;
			};

			let key = definition.name.to_lowercase();
			if by_name.contains_key(&key) {
				ringschema_type::return_error!(schema::duplicate_column(descriptor.name(), &definition.name));
			}
			by_name.insert(key, list.len());
			list.push(definition);
		}

		Ok(Self {
			list,
			by_name,
		})
	}

	pub fn list(&self) -> &[ColumnDefinition<R>] {
		&self.list
	}

	/// Case-insensitive lookup.
	pub fn get(&self, name: &str) -> Option<&ColumnDefinition<R>> {
		self.by_name.get(&name.to_lowercase()).map(|idx| &self.list[*idx])
	}

	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(&name.to_lowercase())
	}

	pub fn len(&self) -> usize {
		self.list.len()
	}

	pub fn is_empty(&self) -> bool {
		self.list.is_empty()
	}

	pub fn whole_record(&self) -> Option<&ColumnDefinition<R>> {
		self.list.iter().find(|column| column.is_whole_record())
	}
}

fn definition_of<R>(table: &str, column: &ColumnDescriptor<R>) -> crate::Result<Option<ColumnDefinition<R>>> {
	let selected = column.selected();
	if selected.len() > 1 {
		ringschema_type::return_error!(schema::ambiguous_column_variant(table, &column.name, &selected));
	}

	let name = column.name.clone();
	let definition = if let Some(field) = &column.field_path {
		ColumnDefinition {
			name,
			storage_type: field.storage_type.clone(),
			key_role: field.key_role,
			kind: ColumnKind::FieldPath(field.accessor.clone()),
		}
	} else if column.whole_record_json {
		ColumnDefinition {
			name,
			storage_type: StorageType::Text,
			key_role: KeyRole::None,
			kind: ColumnKind::WholeRecordJson,
		}
	} else if column.created_elsewhere {
		ColumnDefinition {
			name,
			storage_type: StorageType::Text,
			key_role: KeyRole::None,
			kind: ColumnKind::Placeholder,
		}
	} else if let Some(manual) = &column.manual {
		ColumnDefinition {
			name,
			storage_type: manual.storage_type.clone(),
			key_role: manual.key_role,
			kind: ColumnKind::Manual,
		}
	} else if let Some(codec) = &column.codec {
		ColumnDefinition {
			name,
			storage_type: codec.storage_type.clone(),
			key_role: codec.key_role,
			kind: ColumnKind::Codec(codec.codec.clone()),
		}
	} else if let Some(copy) = &column.search_copy_field {
		ColumnDefinition {
			name,
			storage_type: copy.storage_type.clone(),
			key_role: KeyRole::None,
			kind: ColumnKind::SearchCopyField,
		}
	} else {
		return Ok(None);
	};

	Ok(Some(definition))
}

#[cfg(test)]
mod tests {
	use ringschema_type::{KeyRole, StorageType};

	use super::*;
	use crate::test_utils::{Event, event_table};

	#[test]
	fn test_empty_descriptor() {
		let descriptor = TableDescriptor::<Event>::builder("empty").build();
		let compiled = CompiledColumns::compile(&descriptor).unwrap();
		assert!(compiled.is_empty());
		assert!(compiled.get("anything").is_none());
	}

	#[test]
	fn test_order_and_lookup() {
		let compiled = CompiledColumns::compile(&event_table()).unwrap();
		let names: Vec<_> = compiled.list().iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["id", "ts", "payload", "kind", "tags", "attachments", "counters", "solr_query"]);

		assert_eq!(compiled.get("PAYLOAD").unwrap().name, "payload");
		assert_eq!(compiled.get("ts").unwrap().key_role, KeyRole::ClusteringKeyDesc);
		assert!(compiled.contains("Solr_Query"));
	}

	#[test]
	fn test_unselected_column_is_dropped() {
		let descriptor = TableDescriptor::<Event>::builder("events")
			.column(ColumnDescriptor::named("id").manual(StorageType::BigInt, KeyRole::PartitionKey))
			.column(ColumnDescriptor::named("nothing"))
			.build();
		let compiled = CompiledColumns::compile(&descriptor).unwrap();
		assert_eq!(compiled.len(), 1);
		assert!(!compiled.contains("nothing"));
	}

	#[test]
	fn test_ambiguous_column() {
		let descriptor = TableDescriptor::<Event>::builder("events")
			.column(ColumnDescriptor::named("json").whole_record_json().manual(StorageType::Text, KeyRole::None))
			.build();
		let err = CompiledColumns::compile(&descriptor).err().unwrap();
		assert_eq!(err.code(), "SCHEMA_002");
	}

	#[test]
	fn test_duplicate_column_ignores_case() {
		let descriptor = TableDescriptor::<Event>::builder("events")
			.column(ColumnDescriptor::named("Payload").manual(StorageType::Text, KeyRole::None))
			.column(ColumnDescriptor::named("payload").manual(StorageType::Text, KeyRole::None))
			.build();
		let err = CompiledColumns::compile(&descriptor).err().unwrap();
		assert_eq!(err.code(), "SCHEMA_003");
	}

	#[test]
	fn test_key_roles_are_carried_over() {
		let compiled = CompiledColumns::compile(&event_table()).unwrap();
		let partition: Vec<_> =
			compiled.list().iter().filter(|c| c.key_role.is_partition()).map(|c| c.name.as_str()).collect();
		assert_eq!(partition, vec!["id"]);
	}
}
