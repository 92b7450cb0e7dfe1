// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod key_role;
mod storage_type;

pub use key_role::KeyRole;
pub use storage_type::{StorageType, StorageTypeParseError};

use crate::{Error, error::diagnostic::codec};

/// One row as read from or written to the store, keyed by column name in
/// column order. Null cells are absent keys.
pub type Row = IndexMap<String, Value>;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
	BigInt(i64),
	Blob(Vec<u8>),
	Boolean(bool),
	Counter(i64),
	Double(f64),
	Int(i32),
	Text(String),
	/// Milliseconds since the unix epoch.
	Timestamp(i64),
	Set(Vec<Value>),
	List(Vec<Value>),
	Map(Vec<(Value, Value)>),
}

impl Value {
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::BigInt(_) => "bigint",
			Value::Blob(_) => "blob",
			Value::Boolean(_) => "boolean",
			Value::Counter(_) => "counter",
			Value::Double(_) => "double",
			Value::Int(_) => "int",
			Value::Text(_) => "text",
			Value::Timestamp(_) => "timestamp",
			Value::Set(_) => "set",
			Value::List(_) => "list",
			Value::Map(_) => "map",
		}
	}

	pub fn is_empty_collection(&self) -> bool {
		match self {
			Value::Set(items) | Value::List(items) => items.is_empty(),
			Value::Map(entries) => entries.is_empty(),
			_ => false,
		}
	}

	/// Reshapes list/set values to the collection kind of `ty`; everything
	/// else is returned unchanged.
	pub fn conform(self, ty: &StorageType) -> Value {
		match (self, ty) {
			(Value::List(items), StorageType::Set(_)) => Value::Set(items),
			(Value::Set(items), StorageType::List(_)) => Value::List(items),
			(Value::BigInt(v), StorageType::Counter) => Value::Counter(v),
			(Value::BigInt(v), StorageType::Timestamp) => Value::Timestamp(v),
			(value, _) => value,
		}
	}

	pub fn into_elements(self) -> crate::Result<Vec<Value>> {
		match self {
			Value::Set(items) | Value::List(items) => Ok(items),
			other => Err(crate::error!(codec::unexpected_value("collection", other.type_name()))),
		}
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::BigInt(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(v)
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Double(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Text(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Text(v.to_string())
	}
}

impl From<Vec<u8>> for Value {
	fn from(v: Vec<u8>) -> Self {
		Value::Blob(v)
	}
}

impl TryFrom<Value> for i64 {
	type Error = Error;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::BigInt(v) | Value::Counter(v) | Value::Timestamp(v) => Ok(v),
			Value::Int(v) => Ok(v as i64),
			other => Err(crate::error!(codec::unexpected_value("bigint", other.type_name()))),
		}
	}
}

impl TryFrom<Value> for i32 {
	type Error = Error;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Int(v) => Ok(v),
			other => Err(crate::error!(codec::unexpected_value("int", other.type_name()))),
		}
	}
}

impl TryFrom<Value> for bool {
	type Error = Error;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Boolean(v) => Ok(v),
			other => Err(crate::error!(codec::unexpected_value("boolean", other.type_name()))),
		}
	}
}

impl TryFrom<Value> for f64 {
	type Error = Error;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Double(v) => Ok(v),
			other => Err(crate::error!(codec::unexpected_value("double", other.type_name()))),
		}
	}
}

impl TryFrom<Value> for String {
	type Error = Error;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Text(v) => Ok(v),
			other => Err(crate::error!(codec::unexpected_value("text", other.type_name()))),
		}
	}
}

impl TryFrom<Value> for Vec<u8> {
	type Error = Error;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Blob(v) => Ok(v),
			other => Err(crate::error!(codec::unexpected_value("blob", other.type_name()))),
		}
	}
}
