use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RouterError;
use crate::matcher::RouteMatch;

/// Declared type of a formal parameter, driving the coercion strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    /// No declared type; the raw string passes through unchanged.
    Untyped,
    Str,
    Bool,
    Int,
    Float,
    /// A declared built-in the coercion table has no entry for
    /// (e.g. `array`). Resolves to null when nullable, fails otherwise.
    Unsupported(String),
    /// A non-primitive type resolved through the injection hook.
    Object(String),
}

impl ParamKind {
    /// Map a declared type name onto a kind.
    ///
    /// Recognized scalar spellings map to their primitive kinds, known
    /// non-coercible built-ins to `Unsupported`, and anything else is
    /// treated as an object type for the injection hook.
    #[must_use]
    pub fn from_declared(name: &str) -> Self {
        match name {
            "string" | "str" => ParamKind::Str,
            "bool" | "boolean" => ParamKind::Bool,
            "int" | "integer" => ParamKind::Int,
            "float" | "double" | "number" => ParamKind::Float,
            "array" | "callable" | "iterable" | "resource" | "mixed" => {
                ParamKind::Unsupported(name.to_string())
            }
            _ => ParamKind::Object(name.to_string()),
        }
    }

    /// The declared type name carried by resolution failures.
    #[must_use]
    pub fn declared_name(&self) -> &str {
        match self {
            ParamKind::Untyped => "untyped",
            ParamKind::Str => "string",
            ParamKind::Bool => "bool",
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::Unsupported(name) | ParamKind::Object(name) => name,
        }
    }
}

/// Formal parameter descriptor, supplied alongside the implementation
/// callable in declaration order. Serializes to JSON so descriptor sets
/// can live in configuration data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub nullable: bool,
}

impl ParamSpec {
    #[must_use]
    pub fn new(name: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            nullable: false,
        }
    }

    /// An untyped parameter. Implicitly nullable: an absent value resolves
    /// to null rather than failing.
    #[must_use]
    pub fn untyped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Untyped,
            nullable: true,
        }
    }

    /// Mark the parameter nullable: an absent or unresolvable value
    /// supplies null instead of failing.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A value produced by the injection hook, tagged with the type name it
/// claims to satisfy. The payload is late-bound; handlers recover the
/// concrete type with [`Injected::downcast_ref`].
#[derive(Clone)]
pub struct Injected {
    type_name: Arc<str>,
    value: Arc<dyn Any + Send + Sync>,
}

impl Injected {
    pub fn new<T: Any + Send + Sync>(type_name: &str, value: T) -> Self {
        Self {
            type_name: Arc::from(type_name),
            value: Arc::new(value),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }
}

impl fmt::Debug for Injected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Injected").field(&self.type_name).finish()
    }
}

/// One positional argument handed to the implementation callable.
#[derive(Debug, Clone)]
pub enum ArgValue {
    Null,
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Injected(Injected),
}

impl ArgValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_injected(&self) -> Option<&Injected> {
        match self {
            ArgValue::Injected(value) => Some(value),
            _ => None,
        }
    }
}

/// External collaborator resolving object-typed parameters.
///
/// Called with the requested type name and the full merged parameter map;
/// returns a value claiming that type name, or `None`.
pub type InjectionHook =
    Box<dyn Fn(&str, &HashMap<String, String>) -> Option<Injected> + Send + Sync>;

/// Produce the positional argument list for an implementation callable.
///
/// Walks the descriptors in declaration order, coercing primitives from the
/// merged parameter map and delegating object types to the injection hook.
///
/// # Errors
///
/// `MissingParameterValue`, `UnknownParameterType`,
/// `UnresolvableParameterValue`, or `MissingInjectionHandler`, each
/// carrying the offending declared type name.
pub fn resolve_args(
    specs: &[ParamSpec],
    matched: &RouteMatch,
    hook: Option<&InjectionHook>,
) -> Result<Vec<ArgValue>, RouterError> {
    let mut args = Vec::with_capacity(specs.len());
    // Built lazily: only object-typed parameters need the full flat map.
    let mut full_map: Option<HashMap<String, String>> = None;

    for spec in specs {
        let value = match &spec.kind {
            ParamKind::Untyped => match matched.get_param(&spec.name) {
                Some(raw) => ArgValue::Str(raw.to_string()),
                None => ArgValue::Null,
            },
            ParamKind::Str => match lookup(matched, spec)? {
                Some(raw) => ArgValue::Str(raw.to_string()),
                None => ArgValue::Null,
            },
            ParamKind::Bool => match lookup(matched, spec)? {
                Some(raw) => ArgValue::Bool(truthy(raw)),
                None => ArgValue::Null,
            },
            ParamKind::Int => match lookup(matched, spec)? {
                Some(raw) => ArgValue::Int(parse_int(raw)),
                None => ArgValue::Null,
            },
            ParamKind::Float => match lookup(matched, spec)? {
                Some(raw) => ArgValue::Float(parse_float(raw)),
                None => ArgValue::Null,
            },
            ParamKind::Unsupported(name) => {
                if spec.nullable {
                    ArgValue::Null
                } else {
                    return Err(RouterError::UnknownParameterType {
                        type_name: name.clone(),
                    });
                }
            }
            ParamKind::Object(name) => {
                let Some(hook) = hook else {
                    return Err(RouterError::MissingInjectionHandler {
                        type_name: name.clone(),
                    });
                };
                let map = full_map.get_or_insert_with(|| matched.params_map());
                match hook(name, map) {
                    Some(injected) if injected.type_name() == name => ArgValue::Injected(injected),
                    Some(injected) => {
                        warn!(
                            requested = %name,
                            produced = %injected.type_name(),
                            "Injection hook produced a value of the wrong type"
                        );
                        return Err(RouterError::UnresolvableParameterValue {
                            type_name: name.clone(),
                        });
                    }
                    None if spec.nullable => ArgValue::Null,
                    None => {
                        return Err(RouterError::UnresolvableParameterValue {
                            type_name: name.clone(),
                        });
                    }
                }
            }
        };
        args.push(value);
    }

    Ok(args)
}

/// Look up a primitive parameter: present values coerce, absent values are
/// null for nullable parameters and a failure otherwise.
fn lookup<'m>(matched: &'m RouteMatch, spec: &ParamSpec) -> Result<Option<&'m str>, RouterError> {
    match matched.get_param(&spec.name) {
        Some(raw) => Ok(Some(raw)),
        None if spec.nullable => Ok(None),
        None => Err(RouterError::MissingParameterValue {
            type_name: spec.kind.declared_name().to_string(),
        }),
    }
}

/// String truthiness: empty and `"0"` are false, anything else is true.
fn truthy(raw: &str) -> bool {
    !raw.is_empty() && raw != "0"
}

/// Lenient integer parsing: integer form first, then float form truncated
/// toward zero (`"15.7"` -> 15), else 0.
fn parse_int(raw: &str) -> i64 {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        .unwrap_or(0)
}

/// Lenient float parsing: non-numeric input yields 0.0.
fn parse_float(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}
