/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */
//! A Redis convenience layer over the `redis` crate.
//!
//! ## Features
//!
//! - **Adaptor**: one command surface for a single server or a client-side sharded set of
//!   servers. Commands that cannot be routed by one key fail with
//!   [`AdaptorError::Unsupported`] when sharded.
//! - **Sharding**: consistent hashing compatible with `ShardedJedis` (MurmurHash64A or MD5,
//!   weighted virtual nodes, optional key tags).
//! - **Pooling**: r2d2 pools of adaptors, validated on checkout.
//! - **Clients**: pooled one-call helpers that log failures with the key.
//! - **Templates**: typed JSON values, with list-backed stacks and queues.
//!
//! ## Quick start
//!
//! ```no_run
//! use redis_adaptor::{AdaptorConfig, AdaptorPool, ShardInfo};
//!
//! fn main() -> redis_adaptor::AdaptorResult<()> {
//!     let config = AdaptorConfig::sharded(vec![
//!         ShardInfo::new("redis://127.0.0.1:6379"),
//!         ShardInfo::new("redis://127.0.0.1:6380"),
//!     ])
//!     .with_pool_size(16);
//!
//!     let pool = AdaptorPool::from_config(&config)?;
//!     let mut conn = pool.get_resource()?;
//!     conn.set("user:1", "wolf")?;
//!     let name: Option<String> = conn.get("user:1")?;
//!     assert_eq!(name.as_deref(), Some("wolf"));
//!
//!     // Multi-key commands need a single server.
//!     assert!(conn.rename("user:1", "user:2").unwrap_err().is_unsupported());
//!     Ok(())
//! }
//! ```

mod adaptor;
mod client;
mod codec;
mod config;
mod connection;
mod errors;
mod pool;
mod sharding;
mod template;
#[cfg(test)]
mod mock;

pub use adaptor::*;
pub use client::*;
pub use codec::*;
pub use config::*;
pub use connection::*;
pub use errors::*;
pub use pool::*;
pub use sharding::*;
pub use template::*;
