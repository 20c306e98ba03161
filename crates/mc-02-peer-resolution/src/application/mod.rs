//! # Application Layer
//!
//! Peer resolution and staleness services.

pub mod resolver;
pub mod staleness;

pub use resolver::PeerResolver;
pub use staleness::StalenessDetector;
