//! Modules layer - Infrastructure components behind the feature services
//!
//! Holds the in-memory case store and the sink the workflows save through.

pub mod store;
