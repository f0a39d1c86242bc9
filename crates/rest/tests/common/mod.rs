//! Common test utilities for REST API testing.
//!
//! - [`harness`] - REST API test harness
//! - [`fixtures`] - Test data fixtures and test stores
//! - [`assertions`] - HTTP response assertions

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod harness;
