//! Authentication and session context

mod errors;
pub mod identity;
mod models;
mod repository;
mod service;

pub use errors::*;
pub use identity::{
    IdentityClient, IdentityError, IdentityProvider, IdentitySession, MockIdentityProvider,
};
pub use models::*;
pub use repository::{MockProfilesRepository, ProfilesRepository, RestProfilesRepository};
pub use service::*;
