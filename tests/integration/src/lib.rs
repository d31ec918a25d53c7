//! End-to-end login flow tests.
//!
//! The tests live under `tests/` and drive the group username/password
//! form against the in-memory store.
