// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	thread::sleep,
	time::{Duration, Instant},
};

use ringschema_type::error::diagnostic::reconcile::marker_column_timeout;
use tracing::{debug, instrument};

use crate::interface::MetadataProvider;

/// Column the search integration adds once a core is live.
pub const MARKER_COLUMN: &str = "solr_query";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Polls live metadata until a column shows up on a table.
pub struct MarkerColumnWaiter<'a, M: MetadataProvider + ?Sized> {
	metadata: &'a M,
	poll_interval: Duration,
}

impl<'a, M: MetadataProvider + ?Sized> MarkerColumnWaiter<'a, M> {
	pub fn new(metadata: &'a M) -> Self {
		Self {
			metadata,
			poll_interval: DEFAULT_POLL_INTERVAL,
		}
	}

	pub fn with_poll_interval(mut self, interval: Duration) -> Self {
		self.poll_interval = interval;
		self
	}

	/// Returns once `column` is visible, or fails with RECON_001 after
	/// `timeout`. Metadata errors while polling count as "not yet visible".
	#[instrument(name = "engine::waiter::wait", level = "debug", skip(self))]
	pub fn wait(&self, keyspace: &str, table: &str, column: &str, timeout: Duration) -> crate::Result<()> {
		let start = Instant::now();
		let mut polls = 0u64;

		loop {
			polls += 1;
			match self.metadata.table(keyspace, table) {
				Ok(Some(live)) if live.has_column(column) => {
					debug!(polls, elapsed_ms = start.elapsed().as_millis() as u64, "marker column visible");
					return Ok(());
				}
				Ok(_) => {}
				Err(err) => debug!(error = %err, "metadata read failed while waiting"),
			}

			let elapsed = start.elapsed();
			if elapsed >= timeout {
				ringschema_type::return_error!(marker_column_timeout(
					keyspace,
					table,
					column,
					timeout.as_millis() as u64
				));
			}
			sleep(self.poll_interval.min(timeout - elapsed));
		}
	}
}
