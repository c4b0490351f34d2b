//! Flat-file credential storage for studyplan.

pub mod config;
pub mod credentials;

pub use config::StoreConfig;
pub use credentials::{CredentialError, CredentialStore, hash_password};
