//! Params module - the live-editable visual parameter set
//!
//! This module provides:
//! - `VisualParameters`, the flat record of tunable fields and their defaults
//! - `ParamId` / `ParamValue` for addressing fields generically
//! - `ParameterStore`, which clamps edits and notifies listeners

mod store;
mod visual;

pub use store::{sanitize, ListenerId, ParamChange, ParamEdit, ParamError, ParameterStore};
pub use visual::{ParamGroup, ParamId, ParamKind, ParamValue, Rgba, VisualParameters};
