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
use std::marker::PhantomData;

use r2d2::ManageConnection;
use redis::{Commands, ConnectionLike};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use crate::codec::{from_json, to_json};
use crate::config::PoolConfig;
use crate::errors::{AdaptorError, AdaptorResult};
use crate::pool::build_pool;

/// Typed access to one kind of value, stored as JSON.
///
/// The list helpers double as a stack (`push`/`pop`, both on the left) and a FIFO queue
/// (`enqueue` on the right, `dequeue` on the left).
pub struct RedisTemplate<V, M: ManageConnection = redis::Client> {
    pool: r2d2::Pool<M>,
    _value: PhantomData<fn() -> V>,
}

impl<V, M: ManageConnection> Clone for RedisTemplate<V, M> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _value: PhantomData,
        }
    }
}

impl<V> RedisTemplate<V, redis::Client>
where
    V: Serialize + DeserializeOwned,
{
    pub fn open(url: &str) -> AdaptorResult<Self> {
        Self::with_manager(redis::Client::open(url)?, &PoolConfig::default())
    }
}

impl<V, M> RedisTemplate<V, M>
where
    V: Serialize + DeserializeOwned,
    M: ManageConnection,
    M::Connection: ConnectionLike,
{
    /// Shares `pool`, e.g. the one behind a `RedisClients`.
    pub fn new(pool: r2d2::Pool<M>) -> Self {
        Self {
            pool,
            _value: PhantomData,
        }
    }

    pub fn with_manager(manager: M, config: &PoolConfig) -> AdaptorResult<Self> {
        Ok(Self::new(build_pool(manager, config)?))
    }

    /// Runs `callback` on a pooled connection, returned to the pool afterwards.
    pub fn execute<T, F>(&self, callback: F) -> AdaptorResult<T>
    where
        F: FnOnce(&mut M::Connection) -> AdaptorResult<T>,
    {
        let result = self
            .pool
            .get()
            .map_err(AdaptorError::from)
            .and_then(|mut conn| callback(&mut *conn));
        if let Err(e) = &result {
            error!(error = %e, "redis template callback failed");
        }
        result
    }

    pub fn set_object(&self, key: &str, value: &V) -> AdaptorResult<()> {
        let json = to_json(value)?;
        self.execute(|conn| Ok(conn.set(key, json)?))
    }

    /// `None` when the key does not exist.
    pub fn get_object(&self, key: &str) -> AdaptorResult<Option<V>> {
        self.execute(|conn| {
            let json: Option<String> = conn.get(key)?;
            json.as_deref().map(from_json).transpose()
        })
    }

    /// Stack push onto the head; returns the new length.
    pub fn push(&self, key: &str, value: &V) -> AdaptorResult<i64> {
        let json = to_json(value)?;
        self.execute(|conn| Ok(conn.lpush(key, json)?))
    }

    pub fn pop(&self, key: &str) -> AdaptorResult<Option<V>> {
        self.pop_head(key)
    }

    /// Queue append at the tail; returns the new length.
    pub fn enqueue(&self, key: &str, value: &V) -> AdaptorResult<i64> {
        let json = to_json(value)?;
        self.execute(|conn| Ok(conn.rpush(key, json)?))
    }

    pub fn dequeue(&self, key: &str) -> AdaptorResult<Option<V>> {
        self.pop_head(key)
    }

    fn pop_head(&self, key: &str) -> AdaptorResult<Option<V>> {
        self.execute(|conn| {
            let json: Option<String> = redis::cmd("LPOP").arg(key).query(conn)?;
            json.as_deref().map(from_json).transpose()
        })
    }

    pub fn length(&self, key: &str) -> AdaptorResult<i64> {
        self.execute(|conn| Ok(conn.llen(key)?))
    }

    pub fn range(&self, key: &str, start: isize, end: isize) -> AdaptorResult<Vec<V>> {
        self.execute(|conn| {
            let members: Vec<String> = redis::cmd("LRANGE").arg(key).arg(start).arg(end).query(conn)?;
            members.iter().map(|json| from_json(json)).collect()
        })
    }

    /// Removes up to `count` occurrences of `value` (`0` removes all, negative counts from
    /// the tail); returns how many went.
    pub fn remove(&self, key: &str, count: isize, value: &V) -> AdaptorResult<i64> {
        let json = to_json(value)?;
        self.execute(|conn| Ok(redis::cmd("LREM").arg(key).arg(count).arg(json).query(conn)?))
    }

    pub fn index(&self, key: &str, index: isize) -> AdaptorResult<Option<V>> {
        self.execute(|conn| {
            let json: Option<String> = redis::cmd("LINDEX").arg(key).arg(index).query(conn)?;
            json.as_deref().map(from_json).transpose()
        })
    }

    /// `LSET`; fails when `index` is out of range.
    pub fn set_at(&self, key: &str, index: isize, value: &V) -> AdaptorResult<()> {
        let json = to_json(value)?;
        self.execute(|conn| Ok(redis::cmd("LSET").arg(key).arg(index).arg(json).query(conn)?))
    }

    pub fn trim(&self, key: &str, start: isize, end: isize) -> AdaptorResult<()> {
        self.execute(|conn| Ok(redis::cmd("LTRIM").arg(key).arg(start).arg(end).query(conn)?))
    }
}
