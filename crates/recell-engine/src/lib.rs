//! recell_engine - Reactive cell primitives + Rhai integration.

pub(crate) mod builtins;
pub mod engine;
