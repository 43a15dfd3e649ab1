//! Flutter-facing bindings for dotnote core.

pub mod api;
