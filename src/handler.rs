//! Handler capability contract consumed by the dispatcher.
//!
//! A handler is anything implementing [`RouteHandler`]: it gates request
//! methods, optionally exposes an implementation callable (bundled with the
//! formal parameter descriptors the resolver needs), and optionally exposes
//! a per-route error callable that can recover from dispatch failures.
//!
//! The dispatcher holds no knowledge of concrete handler types beyond this
//! trait. [`BasicHandler`] covers the common case of building a handler out
//! of closures without a dedicated type.

use std::sync::Arc;

use http::Method;
use serde_json::Value;

use crate::error::RouterError;
use crate::resolver::{ArgValue, ParamSpec};

/// Implementation callable: positional arguments in, result value out.
pub type Callable = Arc<dyn Fn(&[ArgValue]) -> anyhow::Result<Value> + Send + Sync>;

/// Error callable: receives the dispatch failure, returns the recovery value.
pub type ErrorCallback = Arc<dyn Fn(&RouterError) -> Value + Send + Sync>;

/// An implementation callable together with its formal parameter descriptors.
///
/// Descriptors are supplied explicitly at construction; the resolver never
/// introspects the callable itself.
#[derive(Clone)]
pub struct Implementation {
    /// Formal parameters in declaration order.
    pub params: Vec<ParamSpec>,
    callable: Callable,
}

impl Implementation {
    pub fn new<F>(params: Vec<ParamSpec>, callable: F) -> Self
    where
        F: Fn(&[ArgValue]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            params,
            callable: Arc::new(callable),
        }
    }

    /// Invoke the callable with an argument list produced by the resolver.
    ///
    /// # Errors
    ///
    /// Propagates whatever the handler's own logic raises, untouched.
    pub fn invoke(&self, args: &[ArgValue]) -> anyhow::Result<Value> {
        (self.callable)(args)
    }
}

/// Capability contract every routable handler satisfies.
pub trait RouteHandler: Send + Sync {
    /// Whether this handler accepts the request method.
    fn is_method_allowed(&self, method: &Method) -> bool;

    /// The implementation callable, or `None` when the route is declared but
    /// not implemented (dispatch raises `NotImplemented`).
    fn implementation(&self) -> Option<Implementation>;

    /// Per-route error callable. When present, resolution and invocation
    /// failures are offered here before the global fallback.
    fn error_handler(&self) -> Option<ErrorCallback> {
        None
    }
}

/// Closure-backed [`RouteHandler`] for callers that do not want a dedicated
/// handler type.
///
/// ```
/// use courser::{BasicHandler, ParamKind, ParamSpec};
/// use http::Method;
/// use serde_json::json;
///
/// let handler = BasicHandler::new()
///     .allow(Method::GET)
///     .implement(
///         vec![ParamSpec::new("id", ParamKind::Int)],
///         |args| Ok(json!({ "id": args[0].as_int() })),
///     )
///     .build();
/// ```
#[derive(Default)]
pub struct BasicHandler {
    /// `None` means every method is allowed.
    allowed: Option<Vec<Method>>,
    implementation: Option<Implementation>,
    error_handler: Option<ErrorCallback>,
}

impl BasicHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the handler to the given method. May be called repeatedly;
    /// a handler with no `allow` calls accepts every method.
    #[must_use]
    pub fn allow(mut self, method: Method) -> Self {
        self.allowed.get_or_insert_with(Vec::new).push(method);
        self
    }

    #[must_use]
    pub fn implement<F>(mut self, params: Vec<ParamSpec>, callable: F) -> Self
    where
        F: Fn(&[ArgValue]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.implementation = Some(Implementation::new(params, callable));
        self
    }

    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RouterError) -> Value + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn build(self) -> Arc<dyn RouteHandler> {
        Arc::new(self)
    }
}

impl RouteHandler for BasicHandler {
    fn is_method_allowed(&self, method: &Method) -> bool {
        self.allowed
            .as_ref()
            .map_or(true, |allowed| allowed.contains(method))
    }

    fn implementation(&self) -> Option<Implementation> {
        self.implementation.clone()
    }

    fn error_handler(&self) -> Option<ErrorCallback> {
        self.error_handler.as_ref().map(Arc::clone)
    }
}
