//! API route handlers.
//!
//! Handlers parse and validate the HTTP shape of a request, call one
//! workflow operation, and serialize its result. Authorization beyond the
//! route-level role allow-list happens in the workflow layer.

pub mod health;
pub mod sub_boards;
pub mod tasks;
pub mod teams;
pub mod users;
