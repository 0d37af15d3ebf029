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
use redis::{ConnectionLike, FromRedisValue, ToRedisArgs};

use super::{routing_key, RedisAdaptor};
use crate::errors::AdaptorResult;

/// Where `LINSERT` places the new element relative to the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPosition {
    Before,
    After,
}

impl ListPosition {
    fn as_arg(&self) -> &'static str {
        match self {
            ListPosition::Before => "BEFORE",
            ListPosition::After => "AFTER",
        }
    }
}

impl<C: ConnectionLike> RedisAdaptor<C> {
    /// Returns the list length after the push.
    pub fn rpush<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, values: &[V]) -> AdaptorResult<i64> {
        self.push("RPUSH", key, values)
    }

    pub fn lpush<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, values: &[V]) -> AdaptorResult<i64> {
        self.push("LPUSH", key, values)
    }

    /// Pushes only when the list already exists.
    pub fn rpushx<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, value: V) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("RPUSHX").arg(key).arg(value))
    }

    pub fn lpushx<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, value: V) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("LPUSHX").arg(key).arg(value))
    }

    fn push<K: ToRedisArgs, V: ToRedisArgs>(&mut self, name: &str, key: K, values: &[V]) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        let mut cmd = redis::cmd(name);
        cmd.arg(key);
        for value in values {
            cmd.arg(value);
        }
        self.keyed(&route, &cmd)
    }

    pub fn llen<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("LLEN").arg(key))
    }

    /// Inclusive range; negative indices count from the tail.
    pub fn lrange<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K, start: isize, stop: isize) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("LRANGE").arg(key).arg(start).arg(stop))
    }

    pub fn ltrim<K: ToRedisArgs>(&mut self, key: K, start: isize, stop: isize) -> AdaptorResult<()> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("LTRIM").arg(key).arg(start).arg(stop))
    }

    pub fn lindex<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K, index: isize) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("LINDEX").arg(key).arg(index))
    }

    pub fn lset<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, index: isize, value: V) -> AdaptorResult<()> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("LSET").arg(key).arg(index).arg(value))
    }

    /// Removes `count` occurrences of `value`: from the head when positive, from the tail
    /// when negative, all of them when zero.
    pub fn lrem<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, count: isize, value: V) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("LREM").arg(key).arg(count).arg(value))
    }

    pub fn lpop<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("LPOP").arg(key))
    }

    pub fn rpop<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("RPOP").arg(key))
    }

    /// New list length, `-1` when `pivot` is missing, `0` when the list is.
    pub fn linsert<K: ToRedisArgs, P: ToRedisArgs, V: ToRedisArgs>(
        &mut self,
        key: K,
        position: ListPosition,
        pivot: P,
        value: V,
    ) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(
            &route,
            redis::cmd("LINSERT").arg(key).arg(position.as_arg()).arg(pivot).arg(value),
        )
    }

    pub fn rpoplpush<S: ToRedisArgs, D: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        source: S,
        destination: D,
    ) -> AdaptorResult<RV> {
        self.single_only("rpoplpush", redis::cmd("RPOPLPUSH").arg(source).arg(destination))
    }

    /// `(key, value)` from the first non-empty list, `None` after `timeout` seconds.
    pub fn blpop<K: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        keys: &[K],
        timeout: usize,
    ) -> AdaptorResult<Option<(String, RV)>> {
        let mut cmd = redis::cmd("BLPOP");
        for key in keys {
            cmd.arg(key);
        }
        self.single_only("blpop", cmd.arg(timeout))
    }

    pub fn brpop<K: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        keys: &[K],
        timeout: usize,
    ) -> AdaptorResult<Option<(String, RV)>> {
        let mut cmd = redis::cmd("BRPOP");
        for key in keys {
            cmd.arg(key);
        }
        self.single_only("brpop", cmd.arg(timeout))
    }

    /// Sharded connections block on the source shard with `BRPOP` and then `LPUSH` the
    /// element on the destination shard, which is not atomic.
    pub fn brpoplpush<S: ToRedisArgs, D: ToRedisArgs>(
        &mut self,
        source: S,
        destination: D,
        timeout: usize,
    ) -> AdaptorResult<Option<Vec<u8>>> {
        if !self.is_sharded() {
            return self.single_only(
                "brpoplpush",
                redis::cmd("BRPOPLPUSH").arg(source).arg(destination).arg(timeout),
            );
        }

        let route = routing_key(&source)?;
        let popped: Option<(Vec<u8>, Vec<u8>)> =
            self.keyed(&route, redis::cmd("BRPOP").arg(source).arg(timeout))?;

        match popped {
            Some((_, element)) => {
                self.lpush(destination, &[&element])?;
                Ok(Some(element))
            }
            None => Ok(None),
        }
    }
}
