//! Integration test common infrastructure.
//!
//! Provides utilities for spawning test servers, creating test clients,
//! and asserting on line flows.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::{TestClient, message_text};
#[allow(unused_imports)]
pub use server::{SERVER_NAME, TestServer, test_config};
