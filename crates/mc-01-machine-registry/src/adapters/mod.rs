//! # Adapters Layer
//!
//! Implementations of the outbound ports.

pub mod ip_allocator;
pub mod memory;
pub mod notifier;

pub use ip_allocator::SequentialIpAllocator;
pub use memory::InMemoryStore;
pub use notifier::{BusNotifier, NotifierChain};
