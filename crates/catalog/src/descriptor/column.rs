// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use ringschema_type::{KeyRole, StorageType};

use crate::column::{ColumnCodec, FieldAccessor};

pub struct FieldPathColumn<R> {
	pub storage_type: StorageType,
	pub key_role: KeyRole,
	pub accessor: FieldAccessor<R>,
}

#[derive(Debug, Clone)]
pub struct ManualColumn {
	pub storage_type: StorageType,
	pub key_role: KeyRole,
}

pub struct CodecColumn<R> {
	pub storage_type: StorageType,
	pub key_role: KeyRole,
	pub codec: Arc<dyn ColumnCodec<R>>,
}

#[derive(Debug, Clone)]
pub struct SearchCopyFieldColumn {
	pub storage_type: StorageType,
}

/// Declared form of a column. Exactly one of the sub-descriptors is expected
/// to be selected; compilation turns it into a
/// [`ColumnDefinition`](crate::column::ColumnDefinition).
pub struct ColumnDescriptor<R> {
	pub name: String,
	pub field_path: Option<FieldPathColumn<R>>,
	pub whole_record_json: bool,
	pub created_elsewhere: bool,
	pub manual: Option<ManualColumn>,
	pub codec: Option<CodecColumn<R>>,
	pub search_copy_field: Option<SearchCopyFieldColumn>,
}

impl<R> ColumnDescriptor<R> {
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			field_path: None,
			whole_record_json: false,
			created_elsewhere: false,
			manual: None,
			codec: None,
			search_copy_field: None,
		}
	}

	pub fn field_path(mut self, storage_type: StorageType, key_role: KeyRole, accessor: FieldAccessor<R>) -> Self {
		self.field_path = Some(FieldPathColumn {
			storage_type,
			key_role,
			accessor,
		});
		self
	}

	pub fn whole_record_json(mut self) -> Self {
		self.whole_record_json = true;
		self
	}

	pub fn created_elsewhere(mut self) -> Self {
		self.created_elsewhere = true;
		self
	}

	pub fn manual(mut self, storage_type: StorageType, key_role: KeyRole) -> Self {
		self.manual = Some(ManualColumn {
			storage_type,
			key_role,
		});
		self
	}

	pub fn codec(
		mut self,
		storage_type: StorageType,
		key_role: KeyRole,
		codec: impl ColumnCodec<R> + 'static,
	) -> Self {
		self.codec = Some(CodecColumn {
			storage_type,
			key_role,
			codec: Arc::new(codec),
		});
		self
	}

	pub fn search_copy_field(mut self, storage_type: StorageType) -> Self {
		self.search_copy_field = Some(SearchCopyFieldColumn {
			storage_type,
		});
		self
	}

	/// Names of the selected sub-descriptors, in declaration order.
	pub fn selected(&self) -> Vec<&'static str> {
		let mut result = Vec::new();
		if self.field_path.is_some() {
			result.push("field_path");
		}
		if self.whole_record_json {
			result.push("whole_record_json");
		}
		if self.created_elsewhere {
			result.push("created_elsewhere");
		}
		if self.manual.is_some() {
			result.push("manual");
		}
		if self.codec.is_some() {
			result.push("codec");
		}
		if self.search_copy_field.is_some() {
			result.push("search_copy_field");
		}
		result
	}
}
