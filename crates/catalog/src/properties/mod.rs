// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Declared storage properties of a table. Every property is optional; an
//! unset property leaves the store default in place.

mod compaction;

pub use compaction::{
	Compaction, CompactionCommon, CompactionOptions, CompactionStrategy, DateTiered, Leveled, SizeTiered,
	TimestampResolution,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriBoolean {
	True,
	False,
	#[default]
	UseDefault,
}

impl TriBoolean {
	pub fn as_option(self) -> Option<bool> {
		match self {
			TriBoolean::True => Some(true),
			TriBoolean::False => Some(false),
			TriBoolean::UseDefault => None,
		}
	}
}

impl From<Option<bool>> for TriBoolean {
	fn from(value: Option<bool>) -> Self {
		match value {
			Some(true) => TriBoolean::True,
			Some(false) => TriBoolean::False,
			None => TriBoolean::UseDefault,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCaching {
	All,
	None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsPerPartition {
	All,
	None,
	Count(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caching {
	pub keys: KeyCaching,
	pub rows_per_partition: Option<RowsPerPartition>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionMethod {
	/// Leave compression as the store configures it.
	#[default]
	Default,
	/// Disable compression.
	None,
	Lz4,
	Snappy,
	Deflate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compression {
	pub method: CompressionMethod,
	pub chunk_length_kb: Option<u32>,
	pub crc_check_chance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeculativeRetry {
	Always,
	None,
	Percentile(u32),
	Milliseconds(u32),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableProperties {
	pub bloom_filter_fp_chance: Option<f64>,
	pub caching: Option<Caching>,
	pub comment: Option<String>,
	pub compaction: Compaction,
	pub compression: Compression,
	pub dclocal_read_repair_chance: Option<f64>,
	pub default_time_to_live: Option<u32>,
	pub gc_grace_seconds: Option<u32>,
	pub min_index_interval: Option<u32>,
	pub max_index_interval: Option<u32>,
	pub memtable_flush_period_in_ms: Option<u32>,
	pub populate_io_cache_on_flush: TriBoolean,
	pub read_repair_chance: Option<f64>,
	pub speculative_retry: Option<SpeculativeRetry>,
}
