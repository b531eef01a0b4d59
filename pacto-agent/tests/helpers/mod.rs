//! Test Helper Utilities
//!
//! In-process fake backends for pacto-agent tests

#![allow(unused_imports)]

pub mod fake_backends;

pub use fake_backends::{
    closed_port_url, spawn, spawn_mcp, FakeOllama, FakeOpenAi, RecordedRequests,
};
