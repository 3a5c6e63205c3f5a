//! Identity and access control.
//!
//! Password hashing ([`password`]), signed identity assertions
//! ([`session`]), and the request guards that recover caller identity
//! and enforce room/shelf membership ([`guard`]).

pub mod guard;
pub mod password;
pub mod session;

pub use guard::CurrentUser;
