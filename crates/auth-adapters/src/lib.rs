//! # auth-adapters
//!
//! Identity resolution for the forum core. Credential *issuance* belongs
//! to the account service; this crate only verifies bearer tokens and maps
//! them to an `AuthContext`.

#[cfg(feature = "auth-jwt")]
pub mod jwt;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtIdentity;
