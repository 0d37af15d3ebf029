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
use std::sync::Arc;
use std::time::Duration;

use redis::{ConnectionLike, RedisResult};
use tracing::debug;

use crate::config::ShardInfo;
use crate::errors::{AdaptorError, AdaptorResult};
use crate::sharding::ShardRing;

/// Opens connections to one server.
pub trait Connector: Send + Sync + 'static {
    type Connection: ConnectionLike + Send + 'static;

    fn connect(&self) -> RedisResult<Self::Connection>;

    /// Human readable address, used in logs.
    fn describe(&self) -> String;
}

/// [`Connector`] backed by a `redis::Client`, with an optional socket timeout.
#[derive(Debug, Clone)]
pub struct ClientConnector {
    client: redis::Client,
    timeout: Option<Duration>,
}

impl ClientConnector {
    pub fn open(url: &str, timeout: Option<Duration>) -> AdaptorResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self { client, timeout })
    }

    pub fn from_client(client: redis::Client) -> Self {
        Self { client, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[inline]
    pub fn client(&self) -> &redis::Client {
        &self.client
    }
}

impl Connector for ClientConnector {
    type Connection = redis::Connection;

    fn connect(&self) -> RedisResult<redis::Connection> {
        let conn = match self.timeout {
            Some(timeout) => {
                let conn = self.client.get_connection_with_timeout(timeout)?;
                conn.set_read_timeout(Some(timeout))?;
                conn.set_write_timeout(Some(timeout))?;
                conn
            }
            None => self.client.get_connection()?,
        };
        debug!(addr = %self.describe(), "Redis connection established");
        Ok(conn)
    }

    fn describe(&self) -> String {
        self.client.get_connection_info().addr.to_string()
    }
}

/// One shard: its description and an open connection.
pub struct Shard<C> {
    pub info: ShardInfo,
    pub conn: C,
}

/// A set of connections to independent servers, addressed through a [`ShardRing`].
pub struct ShardedConnection<C> {
    shards: Vec<Shard<C>>,
    ring: Arc<ShardRing>,
}

impl<C> ShardedConnection<C> {
    /// `shards` must be in the order the ring was built from.
    pub fn new(shards: Vec<(ShardInfo, C)>, ring: Arc<ShardRing>) -> AdaptorResult<Self> {
        if shards.len() != ring.shard_count() {
            return Err(AdaptorError::config(format!(
                "ring was built for {} shards but {} connections were supplied",
                ring.shard_count(),
                shards.len()
            )));
        }

        let shards = shards
            .into_iter()
            .map(|(info, conn)| Shard { info, conn })
            .collect();

        Ok(Self { shards, ring })
    }

    #[inline]
    pub fn shard_index(&self, key: &[u8]) -> usize {
        self.ring.route(key)
    }

    pub fn get_shard(&mut self, key: &[u8]) -> &mut C {
        let index = self.shard_index(key);
        &mut self.shards[index].conn
    }

    pub fn get_shard_info(&self, key: &[u8]) -> &ShardInfo {
        &self.shards[self.shard_index(key)].info
    }

    pub fn shard_at(&mut self, index: usize) -> Option<&mut C> {
        self.shards.get_mut(index).map(|shard| &mut shard.conn)
    }

    pub fn all_shards(&mut self) -> impl Iterator<Item = &mut C> {
        self.shards.iter_mut().map(|shard| &mut shard.conn)
    }

    #[inline]
    pub fn shards(&self) -> &[Shard<C>] {
        &self.shards
    }

    #[inline]
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    pub fn ring(&self) -> &Arc<ShardRing> {
        &self.ring
    }
}
