// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::BTreeMap,
	fmt::{Display, Formatter},
	str::FromStr,
};

use ringschema_type::{KeyRole, StorageType, Value};
use serde::{Deserialize, Serialize};

use crate::{
	ColumnDescriptor, TableDescriptor,
	column::{FieldAccessor, PrefixedMapCodec},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
	Created,
	Updated,
	Deleted,
}

impl Display for EventKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			EventKind::Created => f.write_str("CREATED"),
			EventKind::Updated => f.write_str("UPDATED"),
			EventKind::Deleted => f.write_str("DELETED"),
		}
	}
}

impl FromStr for EventKind {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"CREATED" => Ok(EventKind::Created),
			"UPDATED" => Ok(EventKind::Updated),
			"DELETED" => Ok(EventKind::Deleted),
			_ => Err(()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
	pub name: String,
	pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub id: i64,
	pub ts: i64,
	pub payload: Option<String>,
	pub kind: Option<EventKind>,
	pub tags: Option<Vec<EventKind>>,
	pub attachments: Option<Vec<Attachment>>,
	pub counters: Option<BTreeMap<i64, Value>>,
}

pub fn event_columns() -> Vec<ColumnDescriptor<Event>> {
	vec![
		ColumnDescriptor::named("id").field_path(
			StorageType::BigInt,
			KeyRole::PartitionKey,
			FieldAccessor::scalar(|e: &Event| Some(e.id), |e, v| e.id = v.unwrap_or_default()),
		),
		ColumnDescriptor::named("ts").field_path(
			StorageType::Timestamp,
			KeyRole::ClusteringKeyDesc,
			FieldAccessor::scalar(|e: &Event| Some(e.ts), |e, v| e.ts = v.unwrap_or_default()),
		),
		ColumnDescriptor::named("payload").field_path(
			StorageType::Text,
			KeyRole::None,
			FieldAccessor::scalar(|e: &Event| e.payload.clone(), |e, v| e.payload = v),
		),
		ColumnDescriptor::named("kind").field_path(
			StorageType::Text,
			KeyRole::None,
			FieldAccessor::enum_text(|e: &Event| e.kind, |e, v| e.kind = v),
		),
		ColumnDescriptor::named("tags").field_path(
			StorageType::set(StorageType::Text),
			KeyRole::None,
			FieldAccessor::enum_collection(|e: &Event| e.tags.clone(), |e, v| e.tags = v),
		),
		ColumnDescriptor::named("attachments").field_path(
			StorageType::list(StorageType::Text),
			KeyRole::None,
			FieldAccessor::json_collection(|e: &Event| e.attachments.clone(), |e, v| e.attachments = v),
		),
		ColumnDescriptor::named("counters").codec(
			StorageType::map(StorageType::Text, StorageType::BigInt),
			KeyRole::None,
			PrefixedMapCodec::new("c_", |e: &Event| e.counters.as_ref(), |e, v| e.counters = v),
		),
		ColumnDescriptor::named("solr_query").created_elsewhere(),
	]
}

/// `events` table in the default ring group.
pub fn event_table() -> TableDescriptor<Event> {
	event_columns().into_iter().fold(TableDescriptor::builder("events"), |builder, column| builder.column(column)).build()
}

/// Stored whole as JSON next to its key columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
	pub tenant: String,
	pub user_id: String,
	pub started_at: i64,
	pub owner: Option<String>,
}

/// `sessions` table in the `audit` ring group: composite partition key,
/// an ascending clustering column, a static column and a JSON body.
pub fn session_table() -> TableDescriptor<Session> {
	TableDescriptor::builder("sessions")
		.ring_group("audit")
		.column(ColumnDescriptor::named("tenant").field_path(
			StorageType::Text,
			KeyRole::PartitionKey,
			FieldAccessor::scalar(|s: &Session| Some(s.tenant.clone()), |s, v| s.tenant = v.unwrap_or_default()),
		))
		.column(ColumnDescriptor::named("user_id").field_path(
			StorageType::Text,
			KeyRole::PartitionKey,
			FieldAccessor::scalar(|s: &Session| Some(s.user_id.clone()), |s, v| s.user_id = v.unwrap_or_default()),
		))
		.column(ColumnDescriptor::named("started_at").field_path(
			StorageType::Timestamp,
			KeyRole::ClusteringKeyAsc,
			FieldAccessor::scalar(|s: &Session| Some(s.started_at), |s, v| s.started_at = v.unwrap_or_default()),
		))
		.column(ColumnDescriptor::named("owner").field_path(
			StorageType::Text,
			KeyRole::Static,
			FieldAccessor::scalar(|s: &Session| s.owner.clone(), |s, v| s.owner = v),
		))
		.column(ColumnDescriptor::named("body").whole_record_json())
		.build()
}
