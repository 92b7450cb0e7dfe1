// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::{
	action::PlannedAction,
	interface::{ActionRunner, StatementExecutor},
};

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedAction {
	pub action: PlannedAction,
	pub provenance: String,
}

/// Collects actions in enqueue order and runs them later in one drain.
#[derive(Debug, Default)]
pub struct QueuedExecutor {
	queue: Mutex<VecDeque<QueuedAction>>,
}

impl QueuedExecutor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.queue.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.queue.lock().is_empty()
	}

	/// Snapshot of the pending actions.
	pub fn pending(&self) -> Vec<QueuedAction> {
		self.queue.lock().iter().cloned().collect()
	}

	pub fn actions(&self) -> Vec<PlannedAction> {
		self.queue.lock().iter().map(|queued| queued.action.clone()).collect()
	}

	pub fn clear(&self) {
		self.queue.lock().clear();
	}

	/// Runs every pending action in order. Stops at the first failure and
	/// leaves the actions after it pending.
	#[instrument(name = "engine::queue::drain", level = "debug", skip_all)]
	pub fn drain(&self, runner: &dyn ActionRunner) -> crate::Result<usize> {
		let mut executed = 0;
		loop {
			let Some(next) = self.queue.lock().pop_front() else {
				return Ok(executed);
			};

			debug!(kind = next.action.kind(), provenance = %next.provenance, "{}", next.action);
			if let Err(err) = runner.run(&next.action) {
				warn!(provenance = %next.provenance, error = %err, "action failed: {}", next.action);
				return Err(err);
			}
			executed += 1;
		}
	}
}

impl StatementExecutor for QueuedExecutor {
	fn enqueue(&self, action: PlannedAction, provenance: &str) -> crate::Result<()> {
		self.queue.lock().push_back(QueuedAction {
			action,
			provenance: provenance.to_string(),
		});
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use parking_lot::Mutex;
	use ringschema_type::error::diagnostic::reconcile::execution_failed;

	use super::QueuedExecutor;
	use crate::{
		action::{PlannedAction, SearchCoreCommand},
		interface::{ActionRunner, MetadataProvider, ResourceUploader, StatementExecutor, TableMetadata},
	};

	#[derive(Default)]
	struct RecordingRunner {
		ran: Mutex<Vec<String>>,
		fail_on: Option<&'static str>,
	}

	impl MetadataProvider for RecordingRunner {
		fn table(&self, _keyspace: &str, _table: &str) -> crate::Result<Option<TableMetadata>> {
			Ok(None)
		}

		fn tables(&self, _keyspace: &str) -> crate::Result<Vec<String>> {
			Ok(vec![])
		}
	}

	impl ResourceUploader for RecordingRunner {
		fn upload(&self, source: &str, destination: &str) -> crate::Result<()> {
			self.ran.lock().push(format!("upload {} {}", source, destination));
			Ok(())
		}
	}

	impl ActionRunner for RecordingRunner {
		fn run_statement(&self, action: &PlannedAction) -> crate::Result<()> {
			if Some(action.kind()) == self.fail_on {
				return Err(execution_failed(action.to_string(), "rejected").into());
			}
			self.ran.lock().push(action.to_string());
			Ok(())
		}

		fn search_core_admin(&self, keyspace: &str, table: &str, command: SearchCoreCommand) -> crate::Result<()> {
			self.ran.lock().push(format!("core {} {}.{}", command, keyspace, table));
			Ok(())
		}
	}

	fn drop_table(table: &str) -> PlannedAction {
		PlannedAction::DropTable {
			keyspace: "app".to_string(),
			table: table.to_string(),
			if_exists: true,
		}
	}

	#[test]
	fn test_drain_in_enqueue_order() {
		let queue = QueuedExecutor::new();
		queue.enqueue(drop_table("a"), "test").unwrap();
		queue.enqueue(
			PlannedAction::UploadResource {
				core: "app.b".to_string(),
				source: "b/schema.xml".to_string(),
				destination: "schema.xml".to_string(),
			},
			"test",
		)
		.unwrap();
		queue.enqueue(drop_table("c"), "test").unwrap();
		assert_eq!(queue.len(), 3);

		let runner = RecordingRunner::default();
		assert_eq!(queue.drain(&runner).unwrap(), 3);
		assert!(queue.is_empty());
		assert_eq!(
			*runner.ran.lock(),
			vec![
				"DROP TABLE IF EXISTS app.a".to_string(),
				"upload b/schema.xml app.b/schema.xml".to_string(),
				"DROP TABLE IF EXISTS app.c".to_string(),
			]
		);
	}

	#[test]
	fn test_drain_stops_at_first_failure() {
		let queue = QueuedExecutor::new();
		queue.enqueue(
			PlannedAction::DropKeyspace {
				keyspace: "app".to_string(),
			},
			"test",
		)
		.unwrap();
		queue.enqueue(drop_table("a"), "test").unwrap();
		queue.enqueue(drop_table("b"), "test").unwrap();

		let runner = RecordingRunner {
			fail_on: Some("drop_table"),
			..RecordingRunner::default()
		};
		let err = queue.drain(&runner).unwrap_err();
		assert_eq!(err.code(), "RECON_003");
		assert_eq!(runner.ran.lock().len(), 1);
		assert_eq!(queue.actions(), vec![drop_table("b")]);
	}
}
