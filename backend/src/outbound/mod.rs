//! Outbound adapters implementing domain ports.
//!
//! Adapters translate between domain types and external wire formats. They
//! contain no registration rules.

pub mod google;
