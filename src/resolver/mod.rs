//! # Resolver Module
//!
//! Turns a callable's ordered formal parameter descriptors plus the merged
//! string parameter map into a positional argument list.
//!
//! ## Coercion policy
//!
//! - Untyped parameters pass the raw string through (or `Null` when absent;
//!   untyped is implicitly nullable).
//! - `string` is identity; `bool` follows string truthiness (`""` and `"0"`
//!   are false, everything else — including `"false"` — is true); `int` and
//!   `float` parse numerically, with non-numeric input yielding `0` / `0.0`
//!   rather than failing. Absent values supply `Null` for nullable
//!   parameters and raise `MissingParameterValue` otherwise.
//! - Declared built-ins outside the coercion table raise
//!   `UnknownParameterType` unless nullable. Numeric leniency and
//!   unknown-type strictness are deliberate: malformed input is a runtime
//!   fact coerced predictably, an unknown declared type is an authoring
//!   error surfaced loudly.
//! - Object types go through the registered injection hook; see
//!   [`InjectionHook`].
//!
//! Resolution runs once per dispatch attempt and is never cached.

mod core;

pub use core::{
    resolve_args, ArgValue, Injected, InjectionHook, ParamKind, ParamSpec,
};
