// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod defaults;
mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use ringschema_type::{Error, Result};
pub use types::{AutoSchemaConfig, LogFormat, LoggingConfig, MultiRingConfig, RingConfig, SchemaConfig};
