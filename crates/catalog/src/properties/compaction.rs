// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use ringschema_type::error::diagnostic::codec;

use super::TriBoolean;

const SIZE_TIERED: &str = "SizeTieredCompactionStrategy";
const DATE_TIERED: &str = "DateTieredCompactionStrategy";
const LEVELED: &str = "LeveledCompactionStrategy";

/// Compaction declaration of a table. At most one family may be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compaction {
	pub compact_storage: bool,
	pub size_tiered: Option<SizeTiered>,
	pub date_tiered: Option<DateTiered>,
	pub leveled: Option<Leveled>,
}

impl Compaction {
	pub fn declared_families(&self) -> Vec<&'static str> {
		let mut result = Vec::new();
		if self.date_tiered.is_some() {
			result.push("date_tiered");
		}
		if self.size_tiered.is_some() {
			result.push("size_tiered");
		}
		if self.leveled.is_some() {
			result.push("leveled");
		}
		result
	}

	/// The selected family; date-tiered wins over size-tiered which wins over leveled.
	pub fn strategy(&self) -> Option<CompactionStrategy> {
		if let Some(date_tiered) = &self.date_tiered {
			return Some(CompactionStrategy::DateTiered(date_tiered.clone()));
		}
		if let Some(size_tiered) = &self.size_tiered {
			return Some(CompactionStrategy::SizeTiered(size_tiered.clone()));
		}
		self.leveled.as_ref().map(|leveled| CompactionStrategy::Leveled(leveled.clone()))
	}
}

/// Options shared by every compaction family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompactionCommon {
	pub enabled: TriBoolean,
	/// Seconds. Emitted unchanged as `tombstone_compaction_interval`.
	pub tombstone_compaction_interval: Option<u64>,
	/// Ratio of droppable tombstones, between 0 and 1.
	pub tombstone_threshold: Option<f64>,
	pub unchecked_tombstone_compaction: TriBoolean,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeTiered {
	pub common: CompactionCommon,
	pub bucket_high: Option<f64>,
	pub bucket_low: Option<f64>,
	pub cold_reads_to_omit: Option<f64>,
	pub max_threshold: Option<u32>,
	pub min_sstable_size: Option<u64>,
	pub min_threshold: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampResolution {
	Microseconds,
	Milliseconds,
}

impl Display for TimestampResolution {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TimestampResolution::Microseconds => f.write_str("MICROSECONDS"),
			TimestampResolution::Milliseconds => f.write_str("MILLISECONDS"),
		}
	}
}

impl FromStr for TimestampResolution {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"MICROSECONDS" => Ok(TimestampResolution::Microseconds),
			"MILLISECONDS" => Ok(TimestampResolution::Milliseconds),
			_ => Err(()),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateTiered {
	pub common: CompactionCommon,
	pub base_time_seconds: Option<u64>,
	pub max_sstable_age_days: Option<u32>,
	pub max_threshold: Option<u32>,
	pub min_threshold: Option<u32>,
	pub timestamp_resolution: Option<TimestampResolution>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leveled {
	pub common: CompactionCommon,
	pub sstable_size_in_mb: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompactionStrategy {
	SizeTiered(SizeTiered),
	DateTiered(DateTiered),
	Leveled(Leveled),
}

/// Store-facing form of a compaction strategy: the strategy class plus its
/// option map, keyed by the store's option names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionOptions {
	pub class: String,
	pub options: BTreeMap<String, String>,
}

impl CompactionOptions {
	pub fn encode(strategy: &CompactionStrategy) -> Self {
		let mut options = BTreeMap::new();
		let class = match strategy {
			CompactionStrategy::SizeTiered(size_tiered) => {
				put(&mut options, "bucket_high", size_tiered.bucket_high);
				put(&mut options, "bucket_low", size_tiered.bucket_low);
				put(&mut options, "cold_reads_to_omit", size_tiered.cold_reads_to_omit);
				put(&mut options, "max_threshold", size_tiered.max_threshold);
				put(&mut options, "min_sstable_size", size_tiered.min_sstable_size);
				put(&mut options, "min_threshold", size_tiered.min_threshold);
				put_common(&mut options, &size_tiered.common);
				SIZE_TIERED
			}
			CompactionStrategy::DateTiered(date_tiered) => {
				put(&mut options, "base_time_seconds", date_tiered.base_time_seconds);
				put(&mut options, "max_sstable_age_days", date_tiered.max_sstable_age_days);
				put(&mut options, "max_threshold", date_tiered.max_threshold);
				put(&mut options, "min_threshold", date_tiered.min_threshold);
				put(&mut options, "timestamp_resolution", date_tiered.timestamp_resolution);
				put_common(&mut options, &date_tiered.common);
				DATE_TIERED
			}
			CompactionStrategy::Leveled(leveled) => {
				put(&mut options, "sstable_size_in_mb", leveled.sstable_size_in_mb);
				put_common(&mut options, &leveled.common);
				LEVELED
			}
		};
		Self {
			class: class.to_string(),
			options,
		}
	}

	/// Reads an option map as reported by the store, including its `class`
	/// entry. Fully qualified class names are accepted.
	pub fn from_map(mut map: BTreeMap<String, String>) -> crate::Result<Self> {
		let Some(class) = map.remove("class") else {
			ringschema_type::return_error!(codec::unexpected_value("compaction class", "nothing"));
		};
		Ok(Self {
			class,
			options: map,
		})
	}

	pub fn decode(&self) -> crate::Result<CompactionStrategy> {
		let class = self.class.rsplit('.').next().unwrap_or(&self.class);
		let options = &self.options;
		match class {
			SIZE_TIERED => Ok(CompactionStrategy::SizeTiered(SizeTiered {
				common: take_common(options)?,
				bucket_high: take(options, "bucket_high")?,
				bucket_low: take(options, "bucket_low")?,
				cold_reads_to_omit: take(options, "cold_reads_to_omit")?,
				max_threshold: take(options, "max_threshold")?,
				min_sstable_size: take(options, "min_sstable_size")?,
				min_threshold: take(options, "min_threshold")?,
			})),
			DATE_TIERED => Ok(CompactionStrategy::DateTiered(DateTiered {
				common: take_common(options)?,
				base_time_seconds: take(options, "base_time_seconds")?,
				max_sstable_age_days: take(options, "max_sstable_age_days")?,
				max_threshold: take(options, "max_threshold")?,
				min_threshold: take(options, "min_threshold")?,
				timestamp_resolution: take(options, "timestamp_resolution")?,
			})),
			LEVELED => Ok(CompactionStrategy::Leveled(Leveled {
				common: take_common(options)?,
				sstable_size_in_mb: take(options, "sstable_size_in_mb")?,
			})),
			other => Err(ringschema_type::error!(codec::unexpected_value("compaction class", other))),
		}
	}
}

fn put<T: ToString>(options: &mut BTreeMap<String, String>, key: &str, value: Option<T>) {
	if let Some(value) = value {
		options.insert(key.to_string(), value.to_string());
	}
}

fn put_common(options: &mut BTreeMap<String, String>, common: &CompactionCommon) {
	put(options, "enabled", common.enabled.as_option());
	put(options, "tombstone_compaction_interval", common.tombstone_compaction_interval);
	put(options, "tombstone_threshold", common.tombstone_threshold);
	put(options, "unchecked_tombstone_compaction", common.unchecked_tombstone_compaction.as_option());
}

fn take<T: FromStr>(options: &BTreeMap<String, String>, key: &str) -> crate::Result<Option<T>> {
	match options.get(key) {
		None => Ok(None),
		Some(text) => text
			.parse::<T>()
			.map(Some)
			.map_err(|_| ringschema_type::error!(codec::unexpected_value(key, text))),
	}
}

fn take_common(options: &BTreeMap<String, String>) -> crate::Result<CompactionCommon> {
	Ok(CompactionCommon {
		enabled: take::<bool>(options, "enabled")?.into(),
		tombstone_compaction_interval: take(options, "tombstone_compaction_interval")?,
		tombstone_threshold: take(options, "tombstone_threshold")?,
		unchecked_tombstone_compaction: take::<bool>(options, "unchecked_tombstone_compaction")?.into(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_size_tiered_round_trip() {
		let strategy = CompactionStrategy::SizeTiered(SizeTiered {
			common: CompactionCommon {
				enabled: TriBoolean::True,
				tombstone_threshold: Some(0.2),
				..Default::default()
			},
			bucket_high: Some(1.5),
			min_threshold: Some(4),
			..Default::default()
		});
		let encoded = CompactionOptions::encode(&strategy);
		assert_eq!(encoded.class, "SizeTieredCompactionStrategy");
		assert_eq!(encoded.options.get("bucket_high").map(String::as_str), Some("1.5"));
		assert_eq!(encoded.options.get("enabled").map(String::as_str), Some("true"));
		assert!(!encoded.options.contains_key("bucket_low"));

		assert_eq!(encoded.decode().unwrap(), strategy);
	}

	#[test]
	fn test_date_tiered_round_trip() {
		let strategy = CompactionStrategy::DateTiered(DateTiered {
			base_time_seconds: Some(3600),
			max_sstable_age_days: Some(10),
			timestamp_resolution: Some(TimestampResolution::Milliseconds),
			..Default::default()
		});
		let encoded = CompactionOptions::encode(&strategy);
		assert_eq!(encoded.options.get("timestamp_resolution").map(String::as_str), Some("MILLISECONDS"));
		assert_eq!(encoded.decode().unwrap(), strategy);
	}

	#[test]
	fn test_tombstone_interval_is_emitted_in_seconds() {
		let strategy = CompactionStrategy::Leveled(Leveled {
			common: CompactionCommon {
				tombstone_compaction_interval: Some(86400),
				..Default::default()
			},
			..Default::default()
		});
		let encoded = CompactionOptions::encode(&strategy);
		assert_eq!(encoded.options.get("tombstone_compaction_interval").map(String::as_str), Some("86400"));
		assert_eq!(encoded.decode().unwrap(), strategy);
	}

	#[test]
	fn test_leveled_unset_stays_unset() {
		let strategy = CompactionStrategy::Leveled(Leveled::default());
		let encoded = CompactionOptions::encode(&strategy);
		assert!(encoded.options.is_empty());
		assert_eq!(encoded.decode().unwrap(), strategy);
	}

	#[test]
	fn test_from_map_accepts_qualified_class() {
		let map = BTreeMap::from([
			(
				"class".to_string(),
				"org.apache.cassandra.db.compaction.LeveledCompactionStrategy".to_string(),
			),
			("sstable_size_in_mb".to_string(), "160".to_string()),
		]);
		let decoded = CompactionOptions::from_map(map).unwrap().decode().unwrap();
		assert_eq!(
			decoded,
			CompactionStrategy::Leveled(Leveled {
				sstable_size_in_mb: Some(160),
				..Default::default()
			})
		);
	}

	#[test]
	fn test_decode_rejects_garbage() {
		let options = CompactionOptions {
			class: LEVELED.to_string(),
			options: BTreeMap::from([("sstable_size_in_mb".to_string(), "big".to_string())]),
		};
		assert_eq!(options.decode().unwrap_err().code(), "CODEC_001");
	}

	#[test]
	fn test_strategy_priority() {
		let compaction = Compaction {
			size_tiered: Some(SizeTiered::default()),
			leveled: Some(Leveled::default()),
			..Default::default()
		};
		assert_eq!(compaction.declared_families(), vec!["size_tiered", "leveled"]);
		assert!(matches!(compaction.strategy(), Some(CompactionStrategy::SizeTiered(_))));
	}
}
