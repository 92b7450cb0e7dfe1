// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod column;
mod compile;
pub mod cql;
pub mod descriptor;
pub mod options;
pub mod properties;
mod record;
mod registry;
mod row;
pub mod test_utils;

pub use compile::CompiledColumns;
pub use descriptor::{
	AdditionalIndex, ClusteringOrder, ColumnDescriptor, DescriptorId, Direction, SearchOptions, SearchResourceFile,
	TableDescriptor, TableDescriptorBuilder,
};
pub use options::{OptionValue, TableOptions};
pub use record::Record;
pub use registry::SchemaRegistry;
pub use ringschema_type::{Error, Result};
pub use row::RowCodec;
