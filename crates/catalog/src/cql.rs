// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::borrow::Cow;

const RESERVED: &[&str] = &[
	"add", "allow", "alter", "and", "apply", "asc", "authorize", "batch", "begin", "by", "columnfamily", "create",
	"delete", "desc", "describe", "drop", "entries", "execute", "from", "full", "grant", "if", "in", "index",
	"infinity", "insert", "into", "keyspace", "limit", "modify", "nan", "norecursive", "not", "null", "of", "on",
	"or", "order", "primary", "rename", "replace", "revoke", "schema", "select", "set", "table", "to", "token",
	"truncate", "unlogged", "update", "use", "using", "where", "with",
];

pub fn is_reserved(identifier: &str) -> bool {
	RESERVED.contains(&identifier.to_ascii_lowercase().as_str())
}

fn is_plain(identifier: &str) -> bool {
	let mut chars = identifier.chars();
	matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
		&& chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Quotes an identifier when it is a reserved word or would not survive the
/// store's case folding.
pub fn quote_identifier(identifier: &str) -> Cow<'_, str> {
	if is_plain(identifier) && !is_reserved(identifier) {
		Cow::Borrowed(identifier)
	} else {
		Cow::Owned(format!("\"{}\"", identifier.replace('"', "\"\"")))
	}
}

pub fn qualified_name(keyspace: &str, table: &str) -> String {
	format!("{}.{}", quote_identifier(keyspace), quote_identifier(table))
}

/// Renders a string literal, doubling embedded single quotes.
pub fn quote_literal(text: &str) -> String {
	format!("'{}'", text.replace('\'', "''"))
}
