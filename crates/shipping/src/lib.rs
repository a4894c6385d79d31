//! Parcelwise Shipping library.
//!
//! Carrier client, capability catalog cache, shipment planner and the HTTP
//! routes of the shipping service, exposed as a library so they can be
//! tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carrier;
pub mod config;
pub mod error;
pub mod planner;
pub mod routes;
pub mod state;
