// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use ringschema_type::{Value, error::diagnostic::codec};

/// Pluggable encode/decode strategy for a single column.
pub trait ColumnCodec<R>: Send + Sync {
	fn encode(&self, record: &R) -> crate::Result<Option<Value>>;

	fn decode(&self, record: &mut R, value: Option<&Value>) -> crate::Result<()>;
}

/// Stores a `K -> Value` map as a `map<text, V>` cell whose keys are
/// `prefix + key`.
pub struct PrefixedMapCodec<R, K> {
	prefix: String,
	nullify_empty: bool,
	get: fn(&R) -> Option<&BTreeMap<K, Value>>,
	set: fn(&mut R, Option<BTreeMap<K, Value>>),
}

impl<R, K> PrefixedMapCodec<R, K> {
	pub fn new(
		prefix: impl Into<String>,
		get: fn(&R) -> Option<&BTreeMap<K, Value>>,
		set: fn(&mut R, Option<BTreeMap<K, Value>>),
	) -> Self {
		Self {
			prefix: prefix.into(),
			nullify_empty: false,
			get,
			set,
		}
	}

	/// Decode an empty stored map as absent instead of an empty map.
	pub fn nullify_empty(mut self, nullify_empty: bool) -> Self {
		self.nullify_empty = nullify_empty;
		self
	}
}

impl<R, K> ColumnCodec<R> for PrefixedMapCodec<R, K>
where
	K: Display + FromStr + Ord + Send + Sync,
{
	fn encode(&self, record: &R) -> crate::Result<Option<Value>> {
		let Some(map) = (self.get)(record) else {
			return Ok(None);
		};
		let entries = map
			.iter()
			.map(|(key, value)| (Value::Text(format!("{}{}", self.prefix, key)), value.clone()))
			.collect();
		Ok(Some(Value::Map(entries)))
	}

	fn decode(&self, record: &mut R, value: Option<&Value>) -> crate::Result<()> {
		let Some(value) = value else {
			return Ok(());
		};
		let Value::Map(entries) = value else {
			ringschema_type::return_error!(codec::unexpected_value("map", value.type_name()));
		};

		let mut result = BTreeMap::new();
		for (key, value) in entries {
			let Value::Text(key) = key else {
				ringschema_type::return_error!(codec::unexpected_value("text", key.type_name()));
			};
			let decoded = key
				.strip_prefix(self.prefix.as_str())
				.and_then(|k| k.parse::<K>().ok())
				.ok_or_else(|| ringschema_type::error!(codec::invalid_map_key(key, &self.prefix)))?;
			result.insert(decoded, value.clone());
		}

		if result.is_empty() && self.nullify_empty {
			(self.set)(record, None);
		} else {
			(self.set)(record, Some(result));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::Event;

	fn counters() -> PrefixedMapCodec<Event, i64> {
		PrefixedMapCodec::new("n_", |e: &Event| e.counters.as_ref(), |e, v| e.counters = v)
	}

	#[test]
	fn test_encode_prefixes_keys() {
		let event = Event {
			counters: Some(BTreeMap::from([(7, Value::BigInt(1)), (12, Value::BigInt(2))])),
			..Default::default()
		};
		let encoded = counters().encode(&event).unwrap().unwrap();
		assert_eq!(
			encoded,
			Value::Map(vec![
				(Value::Text("n_7".to_string()), Value::BigInt(1)),
				(Value::Text("n_12".to_string()), Value::BigInt(2)),
			])
		);
	}

	#[test]
	fn test_decode_strips_prefix_and_parses_key() {
		let mut event = Event::default();
		let stored = Value::Map(vec![(Value::Text("n_42".to_string()), Value::BigInt(5))]);
		counters().decode(&mut event, Some(&stored)).unwrap();
		assert_eq!(event.counters, Some(BTreeMap::from([(42, Value::BigInt(5))])));
	}

	#[test]
	fn test_decode_rejects_foreign_key() {
		let mut event = Event::default();
		let stored = Value::Map(vec![(Value::Text("x_42".to_string()), Value::BigInt(5))]);
		let err = counters().decode(&mut event, Some(&stored)).unwrap_err();
		assert_eq!(err.code(), "CODEC_001");
	}

	#[test]
	fn test_nullify_empty() {
		let mut event = Event::default();
		counters().nullify_empty(true).decode(&mut event, Some(&Value::Map(vec![]))).unwrap();
		assert_eq!(event.counters, None);

		counters().decode(&mut event, Some(&Value::Map(vec![]))).unwrap();
		assert_eq!(event.counters, Some(BTreeMap::new()));
	}

	#[test]
	fn test_absent_value_leaves_record_untouched() {
		let mut event = Event {
			counters: Some(BTreeMap::from([(1, Value::BigInt(1))])),
			..Default::default()
		};
		counters().decode(&mut event, None).unwrap();
		assert!(event.counters.is_some());
	}
}
