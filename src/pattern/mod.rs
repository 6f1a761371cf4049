//! # Pattern Module
//!
//! Compiles route templates into anchored matching patterns.
//!
//! A template mixes literal path text with three placeholder forms:
//!
//! - `{name}` — one path segment, captured under `name` (no `/` or `?`)
//! - `*` — one path segment, not captured
//! - `**` — one or more segments spanning `/`, not captured (stops at `?`)
//!
//! Compilation is a pure function of the template: literals are escaped,
//! placeholders substituted, a leading `/` prepended when missing, and the
//! result anchored so it matches the full path component while tolerating a
//! trailing `?query` suffix. Matching is case-insensitive.
//!
//! Malformed templates never raise an error here — they compile to a
//! pattern that matches nothing, and diagnosing them is the caller's
//! responsibility.

mod core;

pub use core::CompiledPattern;
