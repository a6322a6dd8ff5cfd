//! EMS API Server module
//!
//! Provides an HTTP REST API over the conversion pipeline for local tools.
//! Run with `ems-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server};
