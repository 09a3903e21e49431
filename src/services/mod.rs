//! Data-access services used by the handler modules.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the SQL and row types so handlers can stay focused on
//! request decoding and reply shaping. Every function takes the invocation's
//! connection; none of them open or close one.

pub mod artworks;
pub mod auth;
pub mod forum;
pub mod interactions;
