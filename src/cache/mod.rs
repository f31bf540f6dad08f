//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing the fetched runs
//! data locally. Data is cached in JSON format and considered stale after
//! 60 minutes; the cached copy is what the viewer shows when the network
//! is unavailable.

pub mod manager;

pub use manager::CacheManager;
