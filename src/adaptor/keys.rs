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
use std::collections::HashSet;

use rand::Rng;
use redis::{ConnectionLike, FromRedisValue, RedisWrite, ToRedisArgs, Value};

use super::{routing_key, Backend, RedisAdaptor};
use crate::errors::AdaptorResult;

/// Arguments of `SORT`, built like `SortingParams::new().limit(0, 10).desc().alpha()`.
#[derive(Debug, Clone, Default)]
pub struct SortingParams {
    by: Option<String>,
    limit: Option<(isize, isize)>,
    get: Vec<String>,
    desc: bool,
    alpha: bool,
}

impl SortingParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort by the values of external keys matching `pattern`.
    pub fn by(mut self, pattern: impl Into<String>) -> Self {
        self.by = Some(pattern.into());
        self
    }

    /// Skip sorting, useful together with `get`.
    pub fn nosort(self) -> Self {
        self.by("nosort")
    }

    pub fn get(mut self, pattern: impl Into<String>) -> Self {
        self.get.push(pattern.into());
        self
    }

    pub fn limit(mut self, start: isize, count: isize) -> Self {
        self.limit = Some((start, count));
        self
    }

    pub fn desc(mut self) -> Self {
        self.desc = true;
        self
    }

    pub fn asc(mut self) -> Self {
        self.desc = false;
        self
    }

    pub fn alpha(mut self) -> Self {
        self.alpha = true;
        self
    }
}

impl ToRedisArgs for SortingParams {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        if let Some(by) = &self.by {
            out.write_arg(b"BY");
            out.write_arg(by.as_bytes());
        }
        if let Some((start, count)) = self.limit {
            out.write_arg(b"LIMIT");
            out.write_arg(start.to_string().as_bytes());
            out.write_arg(count.to_string().as_bytes());
        }
        for pattern in &self.get {
            out.write_arg(b"GET");
            out.write_arg(pattern.as_bytes());
        }
        if self.desc {
            out.write_arg(b"DESC");
        }
        if self.alpha {
            out.write_arg(b"ALPHA");
        }
    }
}

impl<C: ConnectionLike> RedisAdaptor<C> {
    pub fn exists<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("EXISTS").arg(key))
    }

    /// Deletes `keys` and returns how many existed.
    ///
    /// Sharded connections delete key by key, so the operation is not atomic.
    pub fn del<K: ToRedisArgs>(&mut self, keys: &[K]) -> AdaptorResult<i64> {
        if !self.is_sharded() {
            let mut cmd = redis::cmd("DEL");
            for key in keys {
                cmd.arg(key);
            }
            return self.single_only("del", &cmd);
        }

        let mut count = 0;
        for key in keys {
            let route = routing_key(key)?;
            let deleted: i64 = self.keyed(&route, redis::cmd("DEL").arg(key))?;
            if deleted > 0 {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn key_type<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<String> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("TYPE").arg(key))
    }

    /// Keys matching `pattern`, the union over every shard.
    ///
    /// A key stored on more than one shard (e.g. left behind after the shard list
    /// changed) is reported once, in first-seen shard order.
    pub fn keys<P: ToRedisArgs, RV: FromRedisValue>(&mut self, pattern: P) -> AdaptorResult<Vec<RV>> {
        let per_shard: Vec<Vec<Vec<u8>>> = self.each_node(redis::cmd("KEYS").arg(pattern))?;
        let mut seen = HashSet::new();
        let unique: Vec<Value> = per_shard
            .into_iter()
            .flatten()
            .filter(|key| seen.insert(key.clone()))
            .map(Value::BulkString)
            .collect();
        Ok(redis::from_redis_value(&Value::Array(unique))?)
    }

    /// A random key; sharded connections ask a randomly picked shard.
    pub fn random_key<RV: FromRedisValue>(&mut self) -> AdaptorResult<Option<RV>> {
        let cmd = redis::cmd("RANDOMKEY");
        let conn = match &mut self.backend {
            Backend::Single(conn) => conn,
            Backend::Sharded(sharded) => {
                let index = rand::thread_rng().gen_range(0..sharded.shard_count());
                match sharded.shard_at(index) {
                    Some(conn) => conn,
                    None => return Ok(None),
                }
            }
        };
        Ok(cmd.query(conn)?)
    }

    pub fn rename<K: ToRedisArgs, N: ToRedisArgs>(&mut self, key: K, new_key: N) -> AdaptorResult<()> {
        self.single_only("rename", redis::cmd("RENAME").arg(key).arg(new_key))
    }

    pub fn renamenx<K: ToRedisArgs, N: ToRedisArgs>(&mut self, key: K, new_key: N) -> AdaptorResult<bool> {
        self.single_only("renamenx", redis::cmd("RENAMENX").arg(key).arg(new_key))
    }

    pub fn move_key<K: ToRedisArgs>(&mut self, key: K, db: i64) -> AdaptorResult<bool> {
        self.single_only("move", redis::cmd("MOVE").arg(key).arg(db))
    }

    pub fn expire<K: ToRedisArgs>(&mut self, key: K, seconds: i64) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("EXPIRE").arg(key).arg(seconds))
    }

    pub fn expire_at<K: ToRedisArgs>(&mut self, key: K, unix_time: i64) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("EXPIREAT").arg(key).arg(unix_time))
    }

    pub fn pexpire<K: ToRedisArgs>(&mut self, key: K, millis: i64) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("PEXPIRE").arg(key).arg(millis))
    }

    /// Seconds to live; `-1` without expiry, `-2` for a missing key.
    pub fn ttl<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("TTL").arg(key))
    }

    pub fn persist<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("PERSIST").arg(key))
    }

    pub fn object_refcount<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<Option<i64>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("OBJECT").arg("REFCOUNT").arg(key))
    }

    pub fn object_encoding<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<Option<String>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("OBJECT").arg("ENCODING").arg(key))
    }

    pub fn object_idletime<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<Option<i64>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("OBJECT").arg("IDLETIME").arg(key))
    }

    pub fn sort<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SORT").arg(key))
    }

    pub fn sort_by<K: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        params: &SortingParams,
    ) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SORT").arg(key).arg(params))
    }

    /// Stores the sorted result in `dst` and returns its length.
    pub fn sort_store<K: ToRedisArgs, D: ToRedisArgs>(&mut self, key: K, dst: D) -> AdaptorResult<i64> {
        self.single_only("sort", redis::cmd("SORT").arg(key).arg("STORE").arg(dst))
    }

    pub fn sort_by_store<K: ToRedisArgs, D: ToRedisArgs>(
        &mut self,
        key: K,
        params: &SortingParams,
        dst: D,
    ) -> AdaptorResult<i64> {
        self.single_only("sort", redis::cmd("SORT").arg(key).arg(params).arg("STORE").arg(dst))
    }
}
