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
//! One command surface over a single Redis connection or a set of client-side shards.
//!
//! Single-key commands are routed to the shard owning the key. Whole-database
//! commands run on every shard. A handful of multi-key commands are emulated key
//! by key (non-atomically), and everything that cannot be expressed across
//! independent servers fails with [`AdaptorError::Unsupported`].

mod hashes;
mod keys;
mod lists;
mod objects;
mod pipeline;
mod pubsub;
mod scripting;
mod server;
mod sets;
mod sorted_sets;
mod strings;
mod transaction;

pub use keys::SortingParams;
pub use lists::ListPosition;
pub use pipeline::ShardedPipeline;
pub use sorted_sets::{Aggregate, ZParams};

use redis::{Cmd, ConnectionLike, FromRedisValue, ToRedisArgs};
use tracing::{debug, warn};

use crate::connection::ShardedConnection;
use crate::errors::{AdaptorError, AdaptorResult};

enum Backend<C> {
    Single(C),
    Sharded(ShardedConnection<C>),
}

/// Dropping an adaptor closes it, so a pool discarding one says `QUIT` to its servers.
pub struct RedisAdaptor<C: ConnectionLike> {
    backend: Backend<C>,
    closed: bool,
}

impl<C: ConnectionLike> Drop for RedisAdaptor<C> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<C: ConnectionLike> RedisAdaptor<C> {
    pub fn single(conn: C) -> Self {
        Self {
            backend: Backend::Single(conn),
            closed: false,
        }
    }

    pub fn sharded(conn: ShardedConnection<C>) -> Self {
        Self {
            backend: Backend::Sharded(conn),
            closed: false,
        }
    }

    #[inline]
    pub fn is_sharded(&self) -> bool {
        matches!(self.backend, Backend::Sharded(_))
    }

    /// The underlying connection when not sharded.
    pub fn connection(&mut self) -> Option<&mut C> {
        match &mut self.backend {
            Backend::Single(conn) => Some(conn),
            Backend::Sharded(_) => None,
        }
    }

    pub fn sharded_connection(&mut self) -> Option<&mut ShardedConnection<C>> {
        match &mut self.backend {
            Backend::Single(_) => None,
            Backend::Sharded(sharded) => Some(sharded),
        }
    }

    /// False once closed, or as soon as any underlying connection is.
    pub fn is_open(&self) -> bool {
        if self.closed {
            return false;
        }
        match &self.backend {
            Backend::Single(conn) => conn.is_open(),
            Backend::Sharded(sharded) => sharded.shards().iter().all(|shard| shard.conn.is_open()),
        }
    }

    /// Sends `QUIT` to every server. A pool discards the adaptor afterwards.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let quit = redis::cmd("QUIT");
        for conn in self.connections() {
            if let Err(e) = quit.query::<()>(conn) {
                debug!(error = %e, "QUIT failed while closing adaptor");
            }
        }
    }

    fn connections(&mut self) -> Vec<&mut C> {
        match &mut self.backend {
            Backend::Single(conn) => vec![conn],
            Backend::Sharded(sharded) => sharded.all_shards().collect(),
        }
    }

    fn conn_for(&mut self, key: &[u8]) -> &mut C {
        match &mut self.backend {
            Backend::Single(conn) => conn,
            Backend::Sharded(sharded) => sharded.get_shard(key),
        }
    }

    /// Runs `cmd` on the connection owning `key`.
    fn keyed<RV: FromRedisValue>(&mut self, key: &[u8], cmd: &Cmd) -> AdaptorResult<RV> {
        Ok(cmd.query(self.conn_for(key))?)
    }

    fn single_node(&mut self, command: &str) -> AdaptorResult<&mut C> {
        match &mut self.backend {
            Backend::Single(conn) => Ok(conn),
            Backend::Sharded(_) => {
                warn!(command, "command rejected on sharded connection");
                Err(AdaptorError::unsupported_sharded(command))
            }
        }
    }

    fn single_only<RV: FromRedisValue>(&mut self, command: &str, cmd: &Cmd) -> AdaptorResult<RV> {
        Ok(cmd.query(self.single_node(command)?)?)
    }

    /// Runs `cmd` on every server, one reply per shard in shard order.
    fn each_node<RV: FromRedisValue>(&mut self, cmd: &Cmd) -> AdaptorResult<Vec<RV>> {
        let mut replies = Vec::new();
        for conn in self.connections() {
            replies.push(cmd.query(conn)?);
        }
        Ok(replies)
    }
}

/// The bytes a key is routed by: its first encoded argument.
pub(crate) fn routing_key<K: ToRedisArgs>(key: &K) -> AdaptorResult<Vec<u8>> {
    key.to_redis_args()
        .into_iter()
        .next()
        .ok_or_else(|| AdaptorError::invalid_argument("a key is required"))
}
