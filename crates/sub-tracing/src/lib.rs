// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod builder;
mod error;

pub use builder::TracingBuilder;
pub use error::TracingError;
pub use ringschema_type::{Error, Result};
