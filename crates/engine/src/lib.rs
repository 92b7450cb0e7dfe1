// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod action;
mod builder;
mod comparator;
mod context;
pub mod interface;
mod orchestrator;
mod queue;
mod ring;
mod search;
mod waiter;

pub use action::{ColumnSpec, CreateTable, PlannedAction, SearchCoreCommand};
pub use builder::{DEFAULT_MARKER_TIMEOUT, TableBuilder};
pub use comparator::{PlanResult, SchemaChange, TableComparator};
pub use context::SchemaContext;
pub use interface::{ActionRunner, LiveColumn, MetadataProvider, ResourceUploader, StatementExecutor, TableMetadata};
pub use orchestrator::{DeclaredTable, SchemaOrchestrator, SweepReport, TableFailure};
pub use queue::{QueuedAction, QueuedExecutor};
pub use ring::{RingDirectory, RingHandle};
pub use ringschema_type::{Error, Result};
pub use search::{IndexType, SearchCoreModifier, SearchTableUpdater};
pub use waiter::{DEFAULT_POLL_INTERVAL, MARKER_COLUMN, MarkerColumnWaiter};
