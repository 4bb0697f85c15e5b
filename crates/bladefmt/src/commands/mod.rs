//! CLI command implementations.

pub(crate) mod format;

pub(crate) use format::FormatArgs;
