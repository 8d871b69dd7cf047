//! HTTP API: server, routing, and request/response mapping.
//!
//! The route tree mirrors the policy table in `staffgate-auth`: the guard
//! middleware decides access for every protected path before any handler
//! runs, and handlers only read the injected [`context::AccessContext`].

pub mod app;
pub mod context;
pub mod middleware;
