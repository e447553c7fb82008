//! Event bus adapters.
//!
//! - `InMemoryEventBus` - in-process bus capturing published envelopes

mod in_memory;

pub use in_memory::InMemoryEventBus;
