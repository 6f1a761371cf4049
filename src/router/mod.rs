//! # Router Module
//!
//! The caller-owned orchestrator tying the pipeline together: match ->
//! handler capability checks -> parameter resolution -> invocation ->
//! two-tier error handling.
//!
//! A [`Router`] is constructed per request with [`Router::for_request`] and
//! owns its registry, handler catalog, injection hook, and global error
//! handler — there is no process-wide state. One `execute()` call processes
//! one request start to finish; reuse across threads requires external
//! locking.
//!
//! ## Dispatch outcomes
//!
//! `execute()` distinguishes three shapes:
//!
//! - `Ok(Some(value))` — a handler (or an error handler) produced a result.
//! - `Ok(None)` — nothing to do: empty registry, no matching route, or a
//!   matched route whose handler reference never resolved.
//! - `Err(RouterError)` — a typed failure no error handler recovered.

mod core;

pub use core::Router;
