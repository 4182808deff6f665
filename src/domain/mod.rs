//! Domain Models
//!
//! Core domain types for the member console.

pub mod member;

pub use member::{Member, MembershipTier};
