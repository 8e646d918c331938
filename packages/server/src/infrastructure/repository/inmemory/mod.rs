//! InMemory Repository 実装

pub mod channel;

pub use channel::InMemoryChannelRepository;
