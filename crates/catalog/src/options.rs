// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use crate::{
	cql::{quote_identifier, quote_literal},
	descriptor::{ClusteringOrder, Direction},
	properties::{
		Caching, Compaction, CompactionOptions, Compression, CompressionMethod, KeyCaching, RowsPerPartition,
		SpeculativeRetry, TableProperties,
	},
};

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
	Float(f64),
	Integer(u64),
	Boolean(bool),
	Text(String),
	Map(Vec<(String, String)>),
}

impl Display for OptionValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			OptionValue::Float(v) => write!(f, "{}", v),
			OptionValue::Integer(v) => write!(f, "{}", v),
			OptionValue::Boolean(v) => write!(f, "{}", v),
			OptionValue::Text(v) => f.write_str(&quote_literal(v)),
			OptionValue::Map(entries) => {
				f.write_str("{")?;
				for (idx, (key, value)) in entries.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}: {}", quote_literal(key), quote_literal(value))?;
				}
				f.write_str("}")
			}
		}
	}
}

/// The option set of a CREATE TABLE statement, rendered as the body of its
/// `WITH` clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOptions {
	entries: Vec<(&'static str, OptionValue)>,
	compact_storage: bool,
	clustering_order: Vec<ClusteringOrder>,
}

impl TableOptions {
	/// Translates declared properties into store options. The flag reports
	/// whether any option was produced.
	pub fn encode(properties: &TableProperties) -> (TableOptions, bool) {
		let mut options = TableOptions::default();

		if let Some(chance) = properties.bloom_filter_fp_chance.filter(|chance| *chance > 0.0) {
			options.push("bloom_filter_fp_chance", OptionValue::Float(chance));
		}
		if let Some(comment) = properties.comment.as_ref().filter(|comment| !comment.is_empty()) {
			options.push("comment", OptionValue::Text(comment.clone()));
		}
		if let Some(caching) = &properties.caching {
			options.push("caching", encode_caching(caching));
		}
		options.encode_compaction(&properties.compaction);
		if let Some(compression) = encode_compression(&properties.compression) {
			options.push("compression", compression);
		}
		if let Some(chance) = properties.dclocal_read_repair_chance {
			options.push("dclocal_read_repair_chance", OptionValue::Float(chance));
		}
		if let Some(ttl) = properties.default_time_to_live {
			options.push("default_time_to_live", OptionValue::Integer(ttl as u64));
		}
		if let Some(seconds) = properties.gc_grace_seconds {
			options.push("gc_grace_seconds", OptionValue::Integer(seconds as u64));
		}
		if let Some(interval) = properties.min_index_interval {
			options.push("min_index_interval", OptionValue::Integer(interval as u64));
		}
		if let Some(interval) = properties.max_index_interval {
			options.push("max_index_interval", OptionValue::Integer(interval as u64));
		}
		if let Some(period) = properties.memtable_flush_period_in_ms {
			options.push("memtable_flush_period_in_ms", OptionValue::Integer(period as u64));
		}
		if let Some(populate) = properties.populate_io_cache_on_flush.as_option() {
			options.push("populate_io_cache_on_flush", OptionValue::Boolean(populate));
		}
		if let Some(chance) = properties.read_repair_chance {
			options.push("read_repair_chance", OptionValue::Float(chance));
		}
		if let Some(retry) = &properties.speculative_retry {
			options.push("speculative_retry", OptionValue::Text(encode_speculative_retry(retry)));
		}

		let produced = options.has_options();
		(options, produced)
	}

	fn push(&mut self, name: &'static str, value: OptionValue) {
		self.entries.push((name, value));
	}

	fn encode_compaction(&mut self, compaction: &Compaction) {
		if compaction.compact_storage {
			self.compact_storage = true;
		}
		if let Some(strategy) = compaction.strategy() {
			let encoded = CompactionOptions::encode(&strategy);
			let mut entries = vec![("class".to_string(), encoded.class)];
			entries.extend(encoded.options);
			self.push("compaction", OptionValue::Map(entries));
		}
	}

	pub fn with_clustering_order(mut self, order: Vec<ClusteringOrder>) -> Self {
		self.clustering_order = order;
		self
	}

	pub fn has_options(&self) -> bool {
		!self.entries.is_empty() || self.compact_storage || !self.clustering_order.is_empty()
	}

	pub fn get(&self, name: &str) -> Option<&OptionValue> {
		self.entries.iter().find(|(key, _)| *key == name).map(|(_, value)| value)
	}

	pub fn entries(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
		self.entries.iter().map(|(key, value)| (*key, value))
	}

	pub fn compact_storage(&self) -> bool {
		self.compact_storage
	}

	pub fn clustering_order(&self) -> &[ClusteringOrder] {
		&self.clustering_order
	}
}

impl Display for TableOptions {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let mut parts = Vec::new();
		if !self.clustering_order.is_empty() {
			let columns = self
				.clustering_order
				.iter()
				.map(|order| format!("{} {}", quote_identifier(&order.column), order.direction))
				.collect::<Vec<_>>();
			parts.push(format!("CLUSTERING ORDER BY ({})", columns.join(", ")));
		}
		if self.compact_storage {
			parts.push("COMPACT STORAGE".to_string());
		}
		for (name, value) in &self.entries {
			parts.push(format!("{} = {}", name, value));
		}
		f.write_str(&parts.join(" AND "))
	}
}

fn encode_caching(caching: &Caching) -> OptionValue {
	let mut entries = vec![(
		"keys".to_string(),
		match caching.keys {
			KeyCaching::All => "ALL".to_string(),
			KeyCaching::None => "NONE".to_string(),
		},
	)];
	if let Some(rows) = caching.rows_per_partition {
		let rows = match rows {
			RowsPerPartition::All => "ALL".to_string(),
			RowsPerPartition::None => "NONE".to_string(),
			RowsPerPartition::Count(count) => count.to_string(),
		};
		entries.push(("rows_per_partition".to_string(), rows));
	}
	OptionValue::Map(entries)
}

fn encode_compression(compression: &Compression) -> Option<OptionValue> {
	let class = match compression.method {
		CompressionMethod::Default => return None,
		CompressionMethod::None => {
			return Some(OptionValue::Map(vec![("sstable_compression".to_string(), String::new())]));
		}
		CompressionMethod::Lz4 => "LZ4Compressor",
		CompressionMethod::Snappy => "SnappyCompressor",
		CompressionMethod::Deflate => "DeflateCompressor",
	};

	let mut entries = vec![("sstable_compression".to_string(), class.to_string())];
	if let Some(chunk) = compression.chunk_length_kb {
		entries.push(("chunk_length_kb".to_string(), chunk.to_string()));
	}
	if let Some(chance) = compression.crc_check_chance {
		entries.push(("crc_check_chance".to_string(), chance.to_string()));
	}
	Some(OptionValue::Map(entries))
}

fn encode_speculative_retry(retry: &SpeculativeRetry) -> String {
	match retry {
		SpeculativeRetry::Always => "ALWAYS".to_string(),
		SpeculativeRetry::None => "NONE".to_string(),
		SpeculativeRetry::Percentile(percentile) => format!("{}PERCENTILE", percentile),
		SpeculativeRetry::Milliseconds(ms) => format!("{}ms", ms),
	}
}

impl ClusteringOrder {
	pub fn asc(column: impl Into<String>) -> Self {
		Self {
			column: column.into(),
			direction: Direction::Asc,
		}
	}

	pub fn desc(column: impl Into<String>) -> Self {
		Self {
			column: column.into(),
			direction: Direction::Desc,
		}
	}
}
