// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Display, Formatter},
	str::FromStr,
	sync::Arc,
};

use ringschema_type::{Error, Value, error::diagnostic::codec};
use serde::{Serialize, de::DeserializeOwned};

/// How a bound field is turned into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEncoding {
	/// The field converts directly to and from a [`Value`].
	Scalar,
	/// An enum stored as its symbolic name.
	EnumText,
	/// A collection of enums, each element stored as its symbolic name.
	EnumCollection,
	/// A collection of values, each element stored as embedded JSON text.
	JsonCollection,
}

type Getter<R> = Arc<dyn Fn(&R) -> crate::Result<Option<Value>> + Send + Sync>;
type Setter<R> = Arc<dyn Fn(&mut R, Option<Value>) -> crate::Result<()> + Send + Sync>;

/// Explicit getter/setter pair binding a column to a field of `R`.
pub struct FieldAccessor<R> {
	encoding: FieldEncoding,
	get: Getter<R>,
	set: Setter<R>,
}

impl<R> Clone for FieldAccessor<R> {
	fn clone(&self) -> Self {
		Self {
			encoding: self.encoding,
			get: self.get.clone(),
			set: self.set.clone(),
		}
	}
}

impl<R> Debug for FieldAccessor<R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FieldAccessor").field("encoding", &self.encoding).finish_non_exhaustive()
	}
}

impl<R: 'static> FieldAccessor<R> {
	pub fn new(
		encoding: FieldEncoding,
		get: impl Fn(&R) -> crate::Result<Option<Value>> + Send + Sync + 'static,
		set: impl Fn(&mut R, Option<Value>) -> crate::Result<()> + Send + Sync + 'static,
	) -> Self {
		Self {
			encoding,
			get: Arc::new(get),
			set: Arc::new(set),
		}
	}

	pub fn scalar<T>(get: fn(&R) -> Option<T>, set: fn(&mut R, Option<T>)) -> Self
	where
		T: Into<Value> + TryFrom<Value, Error = Error> + 'static,
	{
		Self::new(
			FieldEncoding::Scalar,
			move |record| Ok(get(record).map(Into::into)),
			move |record, value| {
				set(record, value.map(T::try_from).transpose()?);
				Ok(())
			},
		)
	}

	pub fn enum_text<E>(get: fn(&R) -> Option<E>, set: fn(&mut R, Option<E>)) -> Self
	where
		E: Display + FromStr + 'static,
	{
		Self::new(
			FieldEncoding::EnumText,
			move |record| Ok(get(record).map(|e| Value::Text(e.to_string()))),
			move |record, value| {
				set(record, value.map(parse_enum::<E>).transpose()?);
				Ok(())
			},
		)
	}

	pub fn enum_collection<E>(get: fn(&R) -> Option<Vec<E>>, set: fn(&mut R, Option<Vec<E>>)) -> Self
	where
		E: Display + FromStr + 'static,
	{
		Self::new(
			FieldEncoding::EnumCollection,
			move |record| {
				Ok(get(record).map(|items| {
					Value::List(items.iter().map(|e| Value::Text(e.to_string())).collect())
				}))
			},
			move |record, value| {
				let decoded = match value {
					Some(value) => Some(
						value.into_elements()?
							.into_iter()
							.map(parse_enum::<E>)
							.collect::<crate::Result<Vec<_>>>()?,
					),
					None => None,
				};
				set(record, decoded);
				Ok(())
			},
		)
	}

	pub fn json_collection<T>(get: fn(&R) -> Option<Vec<T>>, set: fn(&mut R, Option<Vec<T>>)) -> Self
	where
		T: Serialize + DeserializeOwned + 'static,
	{
		Self::new(
			FieldEncoding::JsonCollection,
			move |record| {
				let Some(items) = get(record) else {
					return Ok(None);
				};
				let mut encoded = Vec::with_capacity(items.len());
				for item in &items {
					encoded.push(Value::Text(serde_json::to_string(item)?));
				}
				Ok(Some(Value::List(encoded)))
			},
			move |record, value| {
				let decoded = match value {
					Some(value) => {
						let mut items = Vec::new();
						for element in value.into_elements()? {
							let text = String::try_from(element)?;
							items.push(serde_json::from_str(&text)?);
						}
						Some(items)
					}
					None => None,
				};
				set(record, decoded);
				Ok(())
			},
		)
	}

	pub fn encoding(&self) -> FieldEncoding {
		self.encoding
	}

	pub fn get(&self, record: &R) -> crate::Result<Option<Value>> {
		(self.get)(record)
	}

	pub fn set(&self, record: &mut R, value: Option<Value>) -> crate::Result<()> {
		(self.set)(record, value)
	}
}

fn parse_enum<E: FromStr>(value: Value) -> crate::Result<E> {
	let name = String::try_from(value)?;
	name.parse::<E>().map_err(|_| ringschema_type::error!(codec::unknown_enum_name(&name)))
}
