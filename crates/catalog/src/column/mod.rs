// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Formatter},
	sync::Arc,
};

use ringschema_type::{KeyRole, StorageType, Value, error::diagnostic::codec as codec_diagnostic};

mod codec;
mod field;

pub use codec::{ColumnCodec, PrefixedMapCodec};
pub use field::{FieldAccessor, FieldEncoding};

use crate::Record;

/// A compiled column: identity, store type, key role and the strategy used
/// to move data between a record and a row cell.
pub struct ColumnDefinition<R> {
	pub name: String,
	pub storage_type: StorageType,
	pub key_role: KeyRole,
	pub kind: ColumnKind<R>,
}

pub enum ColumnKind<R> {
	FieldPath(FieldAccessor<R>),
	WholeRecordJson,
	Codec(Arc<dyn ColumnCodec<R>>),
	Manual,
	Placeholder,
	SearchCopyField,
}

impl<R> ColumnKind<R> {
	pub fn name(&self) -> &'static str {
		match self {
			ColumnKind::FieldPath(_) => "field_path",
			ColumnKind::WholeRecordJson => "whole_record_json",
			ColumnKind::Codec(_) => "codec",
			ColumnKind::Manual => "manual",
			ColumnKind::Placeholder => "created_elsewhere",
			ColumnKind::SearchCopyField => "search_copy_field",
		}
	}
}

impl<R> Clone for ColumnKind<R> {
	fn clone(&self) -> Self {
		match self {
			ColumnKind::FieldPath(accessor) => ColumnKind::FieldPath(accessor.clone()),
			ColumnKind::WholeRecordJson => ColumnKind::WholeRecordJson,
			ColumnKind::Codec(codec) => ColumnKind::Codec(codec.clone()),
			ColumnKind::Manual => ColumnKind::Manual,
			ColumnKind::Placeholder => ColumnKind::Placeholder,
			ColumnKind::SearchCopyField => ColumnKind::SearchCopyField,
		}
	}
}

impl<R> Clone for ColumnDefinition<R> {
	fn clone(&self) -> Self {
		Self {
			name: self.name.clone(),
			storage_type: self.storage_type.clone(),
			key_role: self.key_role,
			kind: self.kind.clone(),
		}
	}
}

impl<R> Debug for ColumnDefinition<R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ColumnDefinition")
			.field("name", &self.name)
			.field("storage_type", &self.storage_type)
			.field("key_role", &self.key_role)
			.field("kind", &self.kind.name())
			.finish()
	}
}

impl<R> ColumnDefinition<R> {
	/// Provisioned by an external integration; never part of CREATE or ALTER.
	pub fn created_elsewhere(&self) -> bool {
		matches!(self.kind, ColumnKind::Placeholder)
	}

	pub fn included_in_insert(&self) -> bool {
		!matches!(self.kind, ColumnKind::Placeholder | ColumnKind::SearchCopyField)
	}

	pub fn included_in_create(&self) -> bool {
		!matches!(self.kind, ColumnKind::Placeholder | ColumnKind::SearchCopyField)
	}

	pub fn is_whole_record(&self) -> bool {
		matches!(self.kind, ColumnKind::WholeRecordJson)
	}
}

impl<R: Record> ColumnDefinition<R> {
	pub fn encode(&self, record: &R) -> crate::Result<Option<Value>> {
		match &self.kind {
			ColumnKind::FieldPath(accessor) => {
				Ok(accessor.get(record)?.map(|value| value.conform(&self.storage_type)))
			}
			ColumnKind::WholeRecordJson => Ok(Some(Value::Text(serde_json::to_string(record)?))),
			ColumnKind::Codec(codec) => codec.encode(record),
			ColumnKind::Manual | ColumnKind::Placeholder | ColumnKind::SearchCopyField => Ok(None),
		}
	}

	pub fn decode(&self, record: &mut R, value: Option<&Value>) -> crate::Result<()> {
		match &self.kind {
			ColumnKind::FieldPath(accessor) => {
				let value = value.filter(|v| !v.is_empty_collection()).cloned();
				accessor.set(record, value)
			}
			ColumnKind::WholeRecordJson => {
				match value {
					Some(Value::Text(json)) => *record = serde_json::from_str(json)?,
					Some(other) => {
						ringschema_type::return_error!(codec_diagnostic::unexpected_value(
							"text",
							other.type_name()
						))
					}
					None => {}
				}
				Ok(())
			}
			ColumnKind::Codec(codec) => codec.decode(record, value),
			ColumnKind::Manual | ColumnKind::Placeholder | ColumnKind::SearchCopyField => Ok(()),
		}
	}
}
