//! Master Data Handlers

pub(crate) mod branches;
pub(crate) mod issuers;
pub(crate) mod promos;
pub(crate) mod roles;
