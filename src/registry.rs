//! Insertion-ordered route registry and the handler catalog.
//!
//! The registry stores `template -> (compiled pattern, handler)` bindings
//! exactly in the order they were made; registration order is the sole
//! tie-break when templates overlap, so callers should bind more specific
//! templates first.
//!
//! Handler references are resolved once, at bind time: a
//! [`HandlerRef::Named`] looks its provider up in the [`HandlerCatalog`]
//! when `bind` runs, never during dispatch. A name with no registered
//! provider binds with no handler, and the dispatcher treats a match on
//! such a binding as "nothing to do".

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::handler::RouteHandler;
use crate::pattern::CompiledPattern;

/// Factory producing a handler instance for a named provider.
pub type HandlerFactory = Box<dyn Fn() -> Arc<dyn RouteHandler> + Send + Sync>;

/// Reference to a handler capability provider.
///
/// `Direct` carries the handler itself; `Named` is resolved against the
/// catalog at bind time.
pub enum HandlerRef {
    Direct(Arc<dyn RouteHandler>),
    Named(String),
}

impl From<Arc<dyn RouteHandler>> for HandlerRef {
    fn from(handler: Arc<dyn RouteHandler>) -> Self {
        HandlerRef::Direct(handler)
    }
}

impl<H: RouteHandler + 'static> From<Arc<H>> for HandlerRef {
    fn from(handler: Arc<H>) -> Self {
        HandlerRef::Direct(handler)
    }
}

impl From<&str> for HandlerRef {
    fn from(name: &str) -> Self {
        HandlerRef::Named(name.to_string())
    }
}

impl From<String> for HandlerRef {
    fn from(name: String) -> Self {
        HandlerRef::Named(name)
    }
}

/// Name-to-factory mapping for handler providers referenced by
/// [`HandlerRef::Named`] and `bind_many`.
#[derive(Default)]
pub struct HandlerCatalog {
    providers: HashMap<String, HandlerFactory>,
}

impl HandlerCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider factory. Re-registering a name replaces the
    /// previous factory; bindings already resolved are unaffected.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Arc<dyn RouteHandler> + Send + Sync + 'static,
    {
        if self
            .providers
            .insert(name.to_string(), Box::new(factory))
            .is_some()
        {
            warn!(provider = %name, "Replaced existing handler provider");
        }
    }

    /// Instantiate the provider registered under `name`, if any.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn RouteHandler>> {
        self.providers.get(name).map(|factory| factory())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }
}

/// One registered route: the template as authored, its compiled pattern,
/// and the handler the template resolved to at bind time.
pub struct RouteBinding {
    pub template: String,
    pub pattern: CompiledPattern,
    pub handler: Option<Arc<dyn RouteHandler>>,
}

/// Ordered `template -> (pattern, handler)` store.
#[derive(Default)]
pub struct Registry {
    bindings: Vec<RouteBinding>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `template`, compiling its pattern once. First registration wins:
    /// re-binding an existing template is a no-op, as is binding an empty
    /// template string.
    pub fn bind(&mut self, template: &str, handler: Option<Arc<dyn RouteHandler>>) {
        if template.is_empty() {
            debug!("Ignoring bind for empty route template");
            return;
        }
        if self.is_bound(template) {
            debug!(template = %template, "Route already bound; keeping first registration");
            return;
        }

        let pattern = CompiledPattern::compile(template);
        debug!(
            template = %template,
            pattern = %pattern.as_str(),
            resolved = handler.is_some(),
            "Route bound"
        );
        self.bindings.push(RouteBinding {
            template: template.to_string(),
            pattern,
            handler,
        });
    }

    /// Remove the binding for `template`, if present.
    pub fn unbind(&mut self, template: &str) {
        self.bindings.retain(|binding| binding.template != template);
    }

    #[must_use]
    pub fn is_bound(&self, template: &str) -> bool {
        self.bindings
            .iter()
            .any(|binding| binding.template == template)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteBinding> {
        self.bindings.iter()
    }
}
