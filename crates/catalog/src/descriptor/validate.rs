// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use ringschema_type::error::diagnostic::schema;

use crate::{CompiledColumns, TableDescriptor};

impl<R> TableDescriptor<R> {
	/// Checks the parts of the declaration that do not depend on compiled
	/// columns.
	pub fn validate(&self) -> crate::Result<()> {
		if self.name().trim().is_empty() {
			ringschema_type::return_error!(schema::blank_table_name());
		}

		let families = self.properties().compaction.declared_families();
		if families.len() > 1 {
			ringschema_type::return_error!(schema::multiple_compaction_families(self.name(), &families));
		}

		let search = self.search();
		if search.enabled {
			if search.config_resource.trim().is_empty() {
				ringschema_type::return_error!(schema::missing_search_resource(self.name(), "config_resource"));
			}
			if search.schema_resource.trim().is_empty() {
				ringschema_type::return_error!(schema::missing_search_resource(self.name(), "schema_resource"));
			}
			for file in &search.additional_files {
				if file.source.trim().is_empty() {
					ringschema_type::return_error!(schema::missing_search_resource(
						self.name(),
						"an additional file source"
					));
				}
				if file.destination.trim().is_empty() {
					ringschema_type::return_error!(schema::missing_search_resource(
						self.name(),
						"an additional file destination"
					));
				}
			}
		}

		Ok(())
	}

	/// Key invariants of a table about to be created: at least one partition
	/// key, and clustering-order overrides forming an in-order prefix of the
	/// clustering columns.
	pub fn validate_keys(&self, columns: &CompiledColumns<R>) -> crate::Result<()> {
		let has_partition_key =
			columns.list().iter().any(|column| column.included_in_create() && column.key_role.is_partition());
		if !has_partition_key {
			ringschema_type::return_error!(schema::missing_partition_key(self.name()));
		}

		let clustering = columns
			.list()
			.iter()
			.filter(|column| column.included_in_create() && column.key_role.is_clustering())
			.map(|column| column.name.as_str())
			.collect::<Vec<_>>();

		for (position, order) in self.clustering_order().iter().enumerate() {
			match columns.get(&order.column) {
				Some(column) if column.key_role.is_clustering() => {}
				_ => ringschema_type::return_error!(schema::invalid_clustering_order(self.name(), &order.column)),
			}
			match clustering.get(position) {
				Some(expected) if expected.eq_ignore_ascii_case(&order.column) => {}
				expected => ringschema_type::return_error!(schema::clustering_order_out_of_key_order(
					self.name(),
					&order.column,
					expected.copied()
				)),
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use ringschema_type::{KeyRole, StorageType};

	use crate::{
		ColumnDescriptor, Direction, SearchOptions, SearchResourceFile, TableDescriptor,
		properties::{Compaction, DateTiered, Leveled, TableProperties},
		test_utils::Event,
	};

	#[test]
	fn test_blank_name() {
		let descriptor = TableDescriptor::<Event>::builder("  ").build();
		assert_eq!(descriptor.validate().unwrap_err().code(), "SCHEMA_001");
	}

	#[test]
	fn test_multiple_compaction_families() {
		let descriptor = TableDescriptor::<Event>::builder("events")
			.properties(TableProperties {
				compaction: Compaction {
					date_tiered: Some(DateTiered::default()),
					leveled: Some(Leveled::default()),
					..Default::default()
				},
				..Default::default()
			})
			.build();
		assert_eq!(descriptor.validate().unwrap_err().code(), "SCHEMA_004");
	}

	#[test]
	fn test_search_requires_resources() {
		let descriptor = TableDescriptor::<Event>::builder("events")
			.search(SearchOptions {
				enabled: true,
				config_resource: "solrconfig.xml".to_string(),
				schema_resource: String::new(),
				..Default::default()
			})
			.build();
		assert_eq!(descriptor.validate().unwrap_err().code(), "SCHEMA_005");
	}

	#[test]
	fn test_search_additional_file_needs_destination() {
		let descriptor = TableDescriptor::<Event>::builder("events")
			.search(SearchOptions {
				enabled: true,
				config_resource: "events/solrconfig.xml".to_string(),
				schema_resource: "events/schema.xml".to_string(),
				additional_files: vec![SearchResourceFile {
					source: "events/stopwords.txt".to_string(),
					destination: " ".to_string(),
				}],
				marker_timeout: None,
			})
			.build();
		assert_eq!(descriptor.validate().unwrap_err().code(), "SCHEMA_005");
	}

	#[test]
	fn test_disabled_search_ignores_resources() {
		let descriptor = TableDescriptor::<Event>::builder("events").build();
		assert!(descriptor.validate().is_ok());
	}

	#[test]
	fn test_missing_partition_key() {
		let descriptor = TableDescriptor::<Event>::builder("events")
			.column(ColumnDescriptor::named("json").whole_record_json())
			.build();
		let compiled = crate::CompiledColumns::compile(&descriptor).unwrap();
		assert_eq!(descriptor.validate_keys(&compiled).unwrap_err().code(), "SCHEMA_006");
	}

	#[test]
	fn test_clustering_override_must_name_clustering_column() {
		let descriptor = TableDescriptor::<Event>::builder("events")
			.column(ColumnDescriptor::named("id").manual(StorageType::BigInt, KeyRole::PartitionKey))
			.column(ColumnDescriptor::named("payload").manual(StorageType::Text, KeyRole::None))
			.clustering_order("payload", Direction::Desc)
			.build();
		let compiled = crate::CompiledColumns::compile(&descriptor).unwrap();
		assert_eq!(descriptor.validate_keys(&compiled).unwrap_err().code(), "SCHEMA_007");
	}

	fn two_clustering_columns() -> crate::descriptor::TableDescriptorBuilder<Event> {
		TableDescriptor::<Event>::builder("events")
			.column(ColumnDescriptor::named("id").manual(StorageType::BigInt, KeyRole::PartitionKey))
			.column(ColumnDescriptor::named("day").manual(StorageType::Text, KeyRole::ClusteringKeyAsc))
			.column(ColumnDescriptor::named("ts").manual(StorageType::Timestamp, KeyRole::ClusteringKeyDesc))
	}

	#[test]
	fn test_clustering_override_prefix_is_valid() {
		let descriptor = two_clustering_columns().clustering_order("day", Direction::Desc).build();
		let compiled = crate::CompiledColumns::compile(&descriptor).unwrap();
		assert!(descriptor.validate_keys(&compiled).is_ok());
	}

	#[test]
	fn test_clustering_override_skipping_first_column() {
		let descriptor = two_clustering_columns().clustering_order("ts", Direction::Asc).build();
		let compiled = crate::CompiledColumns::compile(&descriptor).unwrap();
		let err = descriptor.validate_keys(&compiled).unwrap_err();
		assert_eq!(err.code(), "SCHEMA_007");
		assert!(err.message.contains("where the clustering key has 'day'"));
	}

	#[test]
	fn test_clustering_override_out_of_key_order() {
		let descriptor = two_clustering_columns()
			.clustering_order("ts", Direction::Asc)
			.clustering_order("day", Direction::Asc)
			.build();
		let compiled = crate::CompiledColumns::compile(&descriptor).unwrap();
		assert_eq!(descriptor.validate_keys(&compiled).unwrap_err().code(), "SCHEMA_007");
	}

	#[test]
	fn test_clustering_override_repeats_column() {
		let descriptor = two_clustering_columns()
			.clustering_order("day", Direction::Asc)
			.clustering_order("ts", Direction::Asc)
			.clustering_order("ts", Direction::Desc)
			.build();
		let compiled = crate::CompiledColumns::compile(&descriptor).unwrap();
		let err = descriptor.validate_keys(&compiled).unwrap_err();
		assert!(err.message.contains("more than once"));
	}
}
