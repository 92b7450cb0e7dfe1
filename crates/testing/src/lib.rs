// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test collaborators for ringschema.
//!
//! [`InMemoryCluster`] keeps keyspaces, tables and search cores in memory,
//! answers metadata reads and applies drained actions, so plans can be
//! checked end to end without a running store.

mod cluster;

pub use cluster::InMemoryCluster;
