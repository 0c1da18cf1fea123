//! Command implementations

pub(crate) mod analyze;
pub(crate) mod catalog;
pub(crate) mod common;
pub(crate) mod explain;
