//! `rideline-core` -- domain records and client-side helpers shared by
//! the service clients, the status poller and the CLI.
//!
//! Nothing in this crate performs I/O except the file-backed
//! [`session::FileStore`].

pub mod assignment;
pub mod confirmation;
pub mod display;
pub mod error;
pub mod ids;
pub mod location;
pub mod roles;
pub mod route;
pub mod session;
pub mod trip;
pub mod types;
pub mod vehicle;
