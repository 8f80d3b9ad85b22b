//! Shared fixtures for integration tests with a mock HTTP server

pub mod mock_server;
