//! Flutter bridge crate for the rollcall core.

pub mod api;
