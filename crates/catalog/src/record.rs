// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Serialize, de::DeserializeOwned};

/// A domain type that can be stored as a table row.
pub trait Record: Serialize + DeserializeOwned + Default + Send + Sync + 'static {}

impl<T> Record for T where T: Serialize + DeserializeOwned + Default + Send + Sync + 'static {}
