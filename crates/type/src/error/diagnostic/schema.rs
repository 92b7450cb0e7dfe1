// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// SCHEMA_001: A table descriptor was declared without a name
pub fn blank_table_name() -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_001".to_string(),
		message: "table name must not be blank".to_string(),
		label: Some("blank table name".to_string()),
		help: Some("give the table descriptor a non-empty name".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// SCHEMA_002: A column descriptor selects more than one encoding variant
pub fn ambiguous_column_variant(table: &str, column: &str, selected: &[&str]) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_002".to_string(),
		message: format!(
			"column '{}' of table '{}' selects more than one variant: {}",
			column,
			table,
			selected.join(", ")
		),
		label: Some("ambiguous column variant".to_string()),
		help: Some("a column descriptor must select exactly one of field_path, whole_record_json, created_elsewhere, manual, codec or search_copy_field".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// SCHEMA_003: Two columns of the same table share a name, ignoring case
pub fn duplicate_column(table: &str, column: &str) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_003".to_string(),
		message: format!("column '{}' is declared more than once in table '{}'", column, table),
		label: Some("duplicate column".to_string()),
		help: Some("column names are compared case-insensitively; rename one of them".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// SCHEMA_004: A table declares more than one compaction strategy family
pub fn multiple_compaction_families(table: &str, families: &[&str]) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_004".to_string(),
		message: format!(
			"table '{}' declares more than one compaction strategy: {}",
			table,
			families.join(", ")
		),
		label: Some("conflicting compaction strategies".to_string()),
		help: Some("declare at most one of size_tiered, date_tiered or leveled".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// SCHEMA_005: Search indexing is enabled but a resource name is missing
pub fn missing_search_resource(table: &str, resource: &str) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_005".to_string(),
		message: format!("table '{}' enables search indexing but {} is blank", table, resource),
		label: Some("missing search resource".to_string()),
		help: Some("name the schema and config resources to upload for the search core".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// SCHEMA_006: A table to be created has no partition key column
pub fn missing_partition_key(table: &str) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_006".to_string(),
		message: format!("table '{}' has no partition key column", table),
		label: Some("missing partition key".to_string()),
		help: Some("declare at least one column with the partition key role".to_string()),
		notes: vec!["composite partition keys are the partition key columns in declaration order".to_string()],
		cause: None,
	}
}

/// SCHEMA_007: A clustering-order override names a column that is not a clustering column
pub fn invalid_clustering_order(table: &str, column: &str) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_007".to_string(),
		message: format!("clustering order of table '{}' references '{}' which is not a clustering column", table, column),
		label: Some("invalid clustering order".to_string()),
		help: Some("only columns with a clustering key role can appear in a clustering order".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// SCHEMA_007: Clustering-order overrides do not follow the clustering key
pub fn clustering_order_out_of_key_order(table: &str, column: &str, expected: Option<&str>) -> Diagnostic {
	let message = match expected {
		Some(expected) => format!(
			"clustering order of table '{}' lists '{}' where the clustering key has '{}'",
			table, column, expected
		),
		None => format!("clustering order of table '{}' lists '{}' more than once", table, column),
	};
	Diagnostic {
		code: "SCHEMA_007".to_string(),
		message,
		label: Some("invalid clustering order".to_string()),
		help: Some("list the clustering columns in key order, starting with the first one".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// SCHEMA_008: A search operation was requested for a table without search options
pub fn search_not_enabled(table: &str) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_008".to_string(),
		message: format!("table '{}' does not enable search", table),
		label: Some("search disabled".to_string()),
		help: Some("enable search in the table's search options first".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// SCHEMA_009: No declared table matches a name given on the command line
pub fn unknown_table(name: &str) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_009".to_string(),
		message: format!("no declared table is named '{}'", name),
		label: Some("unknown table".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}
