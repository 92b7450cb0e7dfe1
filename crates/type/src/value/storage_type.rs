// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
	Error,
	error::diagnostic::{Diagnostic, IntoDiagnostic, codec},
};

/// Column type as declared to the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageType {
	BigInt,
	Blob,
	Boolean,
	Counter,
	Double,
	Int,
	Text,
	Timestamp,
	Set(Box<StorageType>),
	List(Box<StorageType>),
	Map(Box<StorageType>, Box<StorageType>),
}

impl StorageType {
	pub fn set(inner: StorageType) -> Self {
		StorageType::Set(Box::new(inner))
	}

	pub fn list(inner: StorageType) -> Self {
		StorageType::List(Box::new(inner))
	}

	pub fn map(key: StorageType, value: StorageType) -> Self {
		StorageType::Map(Box::new(key), Box::new(value))
	}

	pub fn is_collection(&self) -> bool {
		matches!(self, StorageType::Set(_) | StorageType::List(_) | StorageType::Map(_, _))
	}
}

impl Display for StorageType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			StorageType::BigInt => f.write_str("bigint"),
			StorageType::Blob => f.write_str("blob"),
			StorageType::Boolean => f.write_str("boolean"),
			StorageType::Counter => f.write_str("counter"),
			StorageType::Double => f.write_str("double"),
			StorageType::Int => f.write_str("int"),
			StorageType::Text => f.write_str("text"),
			StorageType::Timestamp => f.write_str("timestamp"),
			StorageType::Set(inner) => write!(f, "set<{}>", inner),
			StorageType::List(inner) => write!(f, "list<{}>", inner),
			StorageType::Map(key, value) => write!(f, "map<{}, {}>", key, value),
		}
	}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageTypeParseError {
	#[error("unknown type name '{0}'")]
	UnknownName(String),
	#[error("'{0}' expects {1} type argument(s)")]
	Arity(String, usize),
	#[error("unbalanced angle brackets")]
	Unbalanced,
}

pub struct StorageTypeParseFailure {
	pub text: String,
	pub error: StorageTypeParseError,
}

impl IntoDiagnostic for StorageTypeParseFailure {
	fn into_diagnostic(self) -> Diagnostic {
		codec::invalid_storage_type(&self.text, self.error.to_string())
	}
}

impl FromStr for StorageType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse(s).map_err(|error| {
			crate::error!(
				StorageTypeParseFailure {
					text: s.to_string(),
					error
				}
				.into_diagnostic()
			)
		})
	}
}

fn parse(text: &str) -> Result<StorageType, StorageTypeParseError> {
	let text = text.trim();
	let Some(open) = text.find('<') else {
		return scalar(text);
	};
	if !text.ends_with('>') {
		return Err(StorageTypeParseError::Unbalanced);
	}

	let name = text[..open].trim().to_ascii_lowercase();
	let arguments = split_arguments(&text[open + 1..text.len() - 1])?;

	match (name.as_str(), arguments.as_slice()) {
		("set", [inner]) => Ok(StorageType::set(parse(inner)?)),
		("list", [inner]) => Ok(StorageType::list(parse(inner)?)),
		("map", [key, value]) => Ok(StorageType::map(parse(key)?, parse(value)?)),
		("frozen", [inner]) => parse(inner),
		("set" | "list" | "frozen", _) => Err(StorageTypeParseError::Arity(name, 1)),
		("map", _) => Err(StorageTypeParseError::Arity(name, 2)),
		_ => Err(StorageTypeParseError::UnknownName(name)),
	}
}

fn scalar(text: &str) -> Result<StorageType, StorageTypeParseError> {
	match text.to_ascii_lowercase().as_str() {
		"bigint" => Ok(StorageType::BigInt),
		"blob" => Ok(StorageType::Blob),
		"boolean" => Ok(StorageType::Boolean),
		"counter" => Ok(StorageType::Counter),
		"double" => Ok(StorageType::Double),
		"int" => Ok(StorageType::Int),
		"text" | "varchar" => Ok(StorageType::Text),
		"timestamp" => Ok(StorageType::Timestamp),
		other => Err(StorageTypeParseError::UnknownName(other.to_string())),
	}
}

// Splits on commas that are not nested inside angle brackets.
fn split_arguments(text: &str) -> Result<Vec<&str>, StorageTypeParseError> {
	let mut result = Vec::new();
	let mut depth = 0usize;
	let mut start = 0;
	for (idx, ch) in text.char_indices() {
		match ch {
			'<' => depth += 1,
			'>' => depth = depth.checked_sub(1).ok_or(StorageTypeParseError::Unbalanced)?,
			',' if depth == 0 => {
				result.push(&text[start..idx]);
				start = idx + 1;
			}
			_ => {}
		}
	}
	if depth != 0 {
		return Err(StorageTypeParseError::Unbalanced);
	}
	result.push(&text[start..]);
	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display() {
		assert_eq!(StorageType::BigInt.to_string(), "bigint");
		assert_eq!(StorageType::set(StorageType::Text).to_string(), "set<text>");
		assert_eq!(StorageType::map(StorageType::Text, StorageType::BigInt).to_string(), "map<text, bigint>");
	}

	#[test]
	fn test_parse_scalars() {
		assert_eq!("bigint".parse::<StorageType>().unwrap(), StorageType::BigInt);
		assert_eq!(" TEXT ".parse::<StorageType>().unwrap(), StorageType::Text);
		assert_eq!("varchar".parse::<StorageType>().unwrap(), StorageType::Text);
		assert_eq!("counter".parse::<StorageType>().unwrap(), StorageType::Counter);
	}

	#[test]
	fn test_parse_collections() {
		assert_eq!("list<int>".parse::<StorageType>().unwrap(), StorageType::list(StorageType::Int));
		assert_eq!(
			"map< text ,bigint >".parse::<StorageType>().unwrap(),
			StorageType::map(StorageType::Text, StorageType::BigInt)
		);
		assert_eq!(
			"frozen<set<text>>".parse::<StorageType>().unwrap(),
			StorageType::set(StorageType::Text)
		);
	}

	#[test]
	fn test_display_parses_back() {
		let ty = StorageType::map(StorageType::Text, StorageType::list(StorageType::Double));
		assert_eq!(ty.to_string().parse::<StorageType>().unwrap(), ty);
	}

	#[test]
	fn test_parse_errors() {
		let err = "uuid".parse::<StorageType>().unwrap_err();
		assert_eq!(err.code(), "CODEC_002");
		assert!("map<text>".parse::<StorageType>().is_err());
		assert!("list<text".parse::<StorageType>().is_err());
		assert!("set<text>>".parse::<StorageType>().is_err());
	}
}
