//! Typed failures raised by the dispatch pipeline.
//!
//! Absence of a matching route is *not* represented here — an empty registry
//! or an unmatched path is a normal "no outcome" result. `RouterError` only
//! covers conditions where a route matched but dispatch could not complete.

use thiserror::Error;

/// Failure raised while dispatching a matched route.
///
/// The method and implementation gates carry the offending route template;
/// the parameter-resolution variants carry the declared type name of the
/// parameter that could not be resolved. Handler failures are opaque to the
/// router and passed through to error handlers verbatim.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The matched route declined the request method.
    #[error("method not allowed for route `{route}`")]
    MethodNotAllowed { route: String },

    /// The matched route allows the method but has no implementation callable.
    #[error("route `{route}` has no implementation handler")]
    NotImplemented { route: String },

    /// A non-nullable parameter had no value in the merged parameter map.
    #[error("missing value for required `{type_name}` parameter")]
    MissingParameterValue { type_name: String },

    /// A declared parameter type has no entry in the coercion table.
    #[error("no coercion known for parameter type `{type_name}`")]
    UnknownParameterType { type_name: String },

    /// The injection hook could not produce a value of the requested type.
    #[error("could not resolve a value for parameter type `{type_name}`")]
    UnresolvableParameterValue { type_name: String },

    /// An object-typed parameter was declared but no injection hook is registered.
    #[error("no injection handler registered for parameter type `{type_name}`")]
    MissingInjectionHandler { type_name: String },

    /// The handler's own implementation logic failed.
    #[error("handler invocation failed: {0}")]
    Invocation(#[from] anyhow::Error),
}

impl RouterError {
    /// HTTP status a transport layer would emit for this failure.
    ///
    /// The router itself never speaks HTTP; this is a convenience for the
    /// layer that translates failures into responses.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed { .. } => 405,
            RouterError::NotImplemented { .. } => 501,
            RouterError::MissingParameterValue { .. }
            | RouterError::UnknownParameterType { .. }
            | RouterError::UnresolvableParameterValue { .. }
            | RouterError::MissingInjectionHandler { .. } => 400,
            RouterError::Invocation(_) => 500,
        }
    }

    /// Route template carried by the method and implementation gate failures.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        match self {
            RouterError::MethodNotAllowed { route } | RouterError::NotImplemented { route } => {
                Some(route)
            }
            _ => None,
        }
    }

    /// Declared type name carried by the parameter-resolution failures.
    #[must_use]
    pub fn parameter_type(&self) -> Option<&str> {
        match self {
            RouterError::MissingParameterValue { type_name }
            | RouterError::UnknownParameterType { type_name }
            | RouterError::UnresolvableParameterValue { type_name }
            | RouterError::MissingInjectionHandler { type_name } => Some(type_name),
            _ => None,
        }
    }
}
