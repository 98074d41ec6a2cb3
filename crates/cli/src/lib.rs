//! `rideline-cli` -- the `rideline` command-line client.
//!
//! Passengers request trips, pick a vehicle and wait for a driver;
//! drivers and admins confirm assignments and share positions. State
//! that the web client kept in session storage (last confirmation,
//! selected vehicle, trip summary, role) lives in a JSON session file.

pub mod args;
pub mod commands;
pub mod config;
pub mod output;
