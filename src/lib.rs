//! # courser
//!
//! **courser** is a request-routing and handler-dispatch engine: it matches
//! an incoming HTTP method + path against a registry of route templates,
//! extracts path and query parameters, resolves a handler implementing a
//! capability contract, coerces the extracted string parameters into the
//! handler's declared parameter kinds, invokes the handler, and applies a
//! two-tier error-handling policy (per-route handler, then global
//! fallback).
//!
//! The crate is deliberately transport-agnostic. It consumes request facts
//! — `(method, path, queryString)` — and produces either a dispatch outcome
//! or a typed failure; reading those facts off the wire and turning the
//! outcome into an HTTP response belongs to the caller.
//!
//! ## Architecture
//!
//! Data flows one direction through five components:
//!
//! - **[`pattern`]** — compiles route templates (`/users/{id}`, `*`, `**`)
//!   into anchored, case-insensitive matchers with named capture groups
//! - **[`registry`]** — insertion-ordered `template -> (pattern, handler)`
//!   bindings with first-wins semantics, plus the handler catalog that
//!   resolves named references at bind time
//! - **[`matcher`]** — first-match scan over the registry, merging
//!   percent-decoded path captures with parsed query parameters (path
//!   captures win on collision)
//! - **[`resolver`]** — turns formal parameter descriptors plus the merged
//!   string map into a positional argument list, with an injection hook
//!   for non-primitive parameter types
//! - **[`router`]** — the dispatcher: capability checks, invocation, and
//!   the two-tier error policy
//!
//! ## Quick start
//!
//! ```
//! use courser::{BasicHandler, ParamKind, ParamSpec, Router};
//! use http::Method;
//! use serde_json::json;
//!
//! let mut router = Router::for_request(Method::GET, "/users/42", "trace=1");
//! router.bind(
//!     "/users/{id}",
//!     BasicHandler::new()
//!         .allow(Method::GET)
//!         .implement(
//!             vec![ParamSpec::new("id", ParamKind::Str)],
//!             |args| {
//!                 let id = args[0].as_str().unwrap_or_default();
//!                 Ok(json!(format!("user:{id}")))
//!             },
//!         )
//!         .build(),
//! );
//!
//! let outcome = router.execute().unwrap();
//! assert_eq!(outcome, Some(json!("user:42")));
//! ```
//!
//! ## Error handling
//!
//! A matched route can fail in typed ways — method not allowed, no
//! implementation, unresolvable parameters, or a failure inside the handler
//! itself ([`RouterError`]). Resolution and invocation failures are first
//! offered to the matched handler's own error callable; anything escaping
//! that tier goes to the single global fallback registered with
//! [`Router::catch`]; with neither present the failure propagates to the
//! caller. Absence of a matching route is *not* a failure: `execute()`
//! returns `Ok(None)` and the transport decides what that means.
//!
//! ## Concurrency model
//!
//! One router instance serves one request on one thread. There is no
//! internal locking, no I/O, and nothing cancellable; if a registry is
//! reused across requests the caller owns the synchronization.

pub mod error;
pub mod handler;
pub mod matcher;
pub mod pattern;
pub mod registry;
pub mod resolver;
pub mod router;

pub use error::RouterError;
pub use handler::{BasicHandler, Callable, ErrorCallback, Implementation, RouteHandler};
pub use matcher::{ParamVec, RouteMatch};
pub use pattern::CompiledPattern;
pub use registry::{HandlerCatalog, HandlerRef, Registry, RouteBinding};
pub use resolver::{ArgValue, Injected, InjectionHook, ParamKind, ParamSpec};
pub use router::Router;
