//! Backend for the school-administration dashboard.
//!
//! The dashboard drives this crate's `schooldeskd` binary over stdin/stdout
//! with one JSON request per line (see [`ipc`]). The academic calendar
//! arithmetic lives in [`calendar`] and is usable on its own.

pub mod backup;
pub mod calendar;
pub mod ipc;
pub mod logging;
pub mod store;
