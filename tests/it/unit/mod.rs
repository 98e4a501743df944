//! Unit tests for co2board.

mod query_tests;
