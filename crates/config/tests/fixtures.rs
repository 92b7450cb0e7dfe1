// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::Path;

use ringschema_config::SchemaConfig;
use test_each_file::test_each_path;

test_each_path! { in "crates/config/tests/fixtures" as config => run_test }

// Each fixture starts with `# expect: ok` or `# expect: <diagnostic code>`.
fn run_test(path: &Path) {
	let content = std::fs::read_to_string(path).unwrap();
	let expected = content
		.lines()
		.find_map(|line| line.strip_prefix("# expect:"))
		.map(str::trim)
		.unwrap_or_else(|| panic!("{} has no expectation line", path.display()));

	match (expected, SchemaConfig::from_file(path)) {
		("ok", Ok(config)) => config.validate().unwrap(),
		("ok", Err(err)) => panic!("{}: expected success, got {}", path.display(), err),
		(code, Ok(_)) => panic!("{}: expected {}, got success", path.display(), code),
		(code, Err(err)) => assert_eq!(err.code(), code, "{}: {}", path.display(), err),
	}
}
