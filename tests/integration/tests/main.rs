//! End-to-End Integration Tests
//!
//! These tests drive complete login attempts through the group
//! username/password form, backed by the in-memory store.

mod common;
mod group_login;
