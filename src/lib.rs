// Library target exists for criterion benchmarks and integration tests.
// The binary entry point is main.rs; this file re-declares the module tree so
// that harnesses can import types via `vocadr::engine::*` / `vocadr::session::*`.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by benchmarks and integration tests
pub mod engine;
pub mod provider;
pub mod session;
pub mod store;

// Private: required transitively (won't compile without them)
mod app;
mod config;
mod event;
mod ui;
