//! Shared test support.

pub(crate) mod rest;
