//! Shared application domain, backend access and card rendering.

pub mod auth;
pub mod backend;
pub mod cards;
pub mod context;
pub mod domain;
pub mod ids;

#[cfg(test)]
mod test;
