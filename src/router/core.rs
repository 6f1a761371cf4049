use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::RouterError;
use crate::handler::{ErrorCallback, RouteHandler};
use crate::matcher::find_match;
use crate::registry::{HandlerCatalog, HandlerRef, Registry};
use crate::resolver::{resolve_args, Injected, InjectionHook};

/// Request-scoped routing and dispatch engine.
///
/// Holds the request facts supplied by the transport layer together with
/// the route registry, handler catalog, injection hook, and global error
/// handler. Everything is plain owned state: the router is built, fed
/// bindings, and executed once, all on the caller's thread.
pub struct Router {
    method: Method,
    path: String,
    query: String,
    registry: Registry,
    catalog: HandlerCatalog,
    injection_hook: Option<InjectionHook>,
    global_error_handler: Option<ErrorCallback>,
}

impl Router {
    /// Build a router for one request.
    ///
    /// `path` is the decoded path component without the query string;
    /// `query` is the raw `key=value&...` string, possibly empty.
    #[must_use]
    pub fn for_request(method: Method, path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: query.into(),
            registry: Registry::new(),
            catalog: HandlerCatalog::new(),
            injection_hook: None,
            global_error_handler: None,
        }
    }

    /// Register a named handler provider for `HandlerRef::Named` references
    /// and `bind_many`. Providers must be registered before the bindings
    /// that reference them.
    pub fn register_provider<F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn RouteHandler> + Send + Sync + 'static,
    {
        self.catalog.register(name, factory);
        self
    }

    /// Register the hook that resolves object-typed parameters.
    /// Last registration wins.
    pub fn register_injection_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str, &HashMap<String, String>) -> Option<Injected> + Send + Sync + 'static,
    {
        self.injection_hook = Some(Box::new(hook));
        self
    }

    /// Bind a route template to a handler reference.
    ///
    /// Named references resolve against the provider catalog here, at bind
    /// time; an unknown name binds with no handler and a match on it yields
    /// "nothing to do". First registration wins per template.
    pub fn bind(&mut self, template: &str, handler: impl Into<HandlerRef>) -> &mut Self {
        let resolved = match handler.into() {
            HandlerRef::Direct(handler) => Some(handler),
            HandlerRef::Named(name) => {
                let handler = self.catalog.resolve(&name);
                if handler.is_none() {
                    warn!(
                        template = %template,
                        provider = %name,
                        "No provider registered for handler reference"
                    );
                }
                handler
            }
        };
        self.registry.bind(template, resolved);
        self
    }

    /// Remove the binding for `template`; no-op when absent.
    pub fn unbind(&mut self, template: &str) -> &mut Self {
        self.registry.unbind(template);
        self
    }

    /// Bind a batch of `template -> provider name` pairs. Empty and
    /// already-bound templates are silently skipped by `bind`'s rules.
    pub fn bind_many<I, T, P>(&mut self, routes: I) -> &mut Self
    where
        I: IntoIterator<Item = (T, P)>,
        T: AsRef<str>,
        P: Into<String>,
    {
        for (template, provider) in routes {
            self.bind(template.as_ref(), HandlerRef::Named(provider.into()));
        }
        self
    }

    /// Register the global fallback error handler. At most one is active;
    /// last registration wins.
    pub fn catch<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&RouterError) -> Value + Send + Sync + 'static,
    {
        self.global_error_handler = Some(Arc::new(handler));
        self
    }

    /// Run the request through the pipeline.
    ///
    /// Any typed failure escaping the per-route tier is offered to the
    /// global fallback; with no fallback registered it propagates to the
    /// caller unchanged.
    ///
    /// # Errors
    ///
    /// The unrecovered [`RouterError`] kinds of the dispatch pipeline.
    pub fn execute(&self) -> Result<Option<Value>, RouterError> {
        match self.dispatch() {
            Ok(outcome) => Ok(outcome),
            Err(error) => match &self.global_error_handler {
                Some(recover) => {
                    info!(error = %error, "Global error handler recovered dispatch failure");
                    Ok(Some(recover(&error)))
                }
                None => Err(error),
            },
        }
    }

    fn dispatch(&self) -> Result<Option<Value>, RouterError> {
        if self.registry.is_empty() {
            debug!("Route registry is empty; nothing to dispatch");
            return Ok(None);
        }

        let Some(matched) = find_match(&self.registry, &self.path, &self.query) else {
            return Ok(None);
        };
        let route = matched.template.clone();

        let Some(handler) = matched.handler.as_ref() else {
            warn!(template = %route, "Matched route has no resolvable handler");
            return Ok(None);
        };

        if !handler.is_method_allowed(&self.method) {
            warn!(method = %self.method, template = %route, "Method not allowed for matched route");
            return Err(RouterError::MethodNotAllowed { route });
        }

        let Some(implementation) = handler.implementation() else {
            warn!(template = %route, "Matched route declares no implementation handler");
            return Err(RouterError::NotImplemented { route });
        };

        debug!(
            method = %self.method,
            template = %route,
            params = implementation.params.len(),
            "Dispatching to route handler"
        );

        let invoked = resolve_args(
            &implementation.params,
            &matched,
            self.injection_hook.as_ref(),
        )
        .and_then(|args| implementation.invoke(&args).map_err(RouterError::from));

        match invoked {
            Ok(value) => {
                info!(template = %route, "Handler produced a dispatch outcome");
                Ok(Some(value))
            }
            Err(error) => match handler.error_handler() {
                Some(recover) => {
                    debug!(template = %route, error = %error, "Per-route error handler recovered failure");
                    Ok(Some(recover(&error)))
                }
                None => Err(error),
            },
        }
    }
}
