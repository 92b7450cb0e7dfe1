// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use ringschema_type::Row;

use crate::{CompiledColumns, Record};

/// Moves records in and out of rows using their compiled columns.
pub struct RowCodec;

impl RowCodec {
	/// Builds the row written for `record`. Only columns included in inserts
	/// are written, and absent cells are left out.
	pub fn encode<R: Record>(columns: &CompiledColumns<R>, record: &R) -> crate::Result<Row> {
		let mut row = Row::with_capacity(columns.len());
		for column in columns.list().iter().filter(|column| column.included_in_insert()) {
			if let Some(value) = column.encode(record)? {
				row.insert(column.name.clone(), value);
			}
		}
		Ok(row)
	}

	/// Rebuilds a record from `row`. A whole-record JSON cell wins over every
	/// other column; row columns without a definition are ignored.
	pub fn decode<R: Record>(columns: &CompiledColumns<R>, row: &Row) -> crate::Result<R> {
		let mut record = R::default();

		if let Some(whole) = columns.whole_record() {
			let cell = row.iter().find(|(name, _)| name.eq_ignore_ascii_case(&whole.name)).map(|(_, value)| value);
			if cell.is_some() {
				whole.decode(&mut record, cell)?;
				return Ok(record);
			}
		}

		for (name, value) in row {
			if let Some(column) = columns.get(name) {
				column.decode(&mut record, Some(value))?;
			}
		}
		Ok(record)
	}
}
