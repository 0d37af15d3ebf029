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

impl<C: ConnectionLike> RedisAdaptor<C> {
    pub fn set<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, value: V) -> AdaptorResult<()> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SET").arg(key).arg(value))
    }

    pub fn get<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("GET").arg(key))
    }

    pub fn getset<K: ToRedisArgs, V: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        value: V,
    ) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("GETSET").arg(key).arg(value))
    }

    pub fn setnx<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, value: V) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SETNX").arg(key).arg(value))
    }

    pub fn setex<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, seconds: u64, value: V) -> AdaptorResult<()> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SETEX").arg(key).arg(seconds).arg(value))
    }

    /// Values of `keys` in the same order; sharded connections issue one `GET` per key.
    pub fn mget<K: ToRedisArgs, RV: FromRedisValue>(&mut self, keys: &[K]) -> AdaptorResult<Vec<RV>> {
        if !self.is_sharded() {
            let mut cmd = redis::cmd("MGET");
            for key in keys {
                cmd.arg(key);
            }
            return self.single_only("mget", &cmd);
        }

        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key)?);
        }
        Ok(values)
    }

    /// Sharded connections issue one `SET` per pair, so other clients can observe a partial write.
    pub fn mset<K: ToRedisArgs, V: ToRedisArgs>(&mut self, items: &[(K, V)]) -> AdaptorResult<()> {
        if !self.is_sharded() {
            let mut cmd = redis::cmd("MSET");
            for (key, value) in items {
                cmd.arg(key).arg(value);
            }
            return self.single_only("mset", &cmd);
        }

        for (key, value) in items {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// `1` when every key was set, `0` when none was.
    ///
    /// Sharded connections issue `SETNX` per pair and return how many keys were set, so
    /// the all-or-nothing guarantee of `MSETNX` does not hold there.
    pub fn msetnx<K: ToRedisArgs, V: ToRedisArgs>(&mut self, items: &[(K, V)]) -> AdaptorResult<i64> {
        if !self.is_sharded() {
            let mut cmd = redis::cmd("MSETNX");
            for (key, value) in items {
                cmd.arg(key).arg(value);
            }
            return self.single_only("msetnx", &cmd);
        }

        let mut count = 0;
        for (key, value) in items {
            if self.setnx(key, value)? {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn incr<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("INCR").arg(key))
    }

    pub fn incr_by<K: ToRedisArgs>(&mut self, key: K, delta: i64) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("INCRBY").arg(key).arg(delta))
    }

    pub fn decr<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("DECR").arg(key))
    }

    pub fn decr_by<K: ToRedisArgs>(&mut self, key: K, delta: i64) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("DECRBY").arg(key).arg(delta))
    }

    pub fn append<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, value: V) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("APPEND").arg(key).arg(value))
    }

    pub fn substr<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K, start: isize, end: isize) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SUBSTR").arg(key).arg(start).arg(end))
    }

    pub fn getrange<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K, start: isize, end: isize) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("GETRANGE").arg(key).arg(start).arg(end))
    }

    pub fn setrange<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, offset: usize, value: V) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SETRANGE").arg(key).arg(offset).arg(value))
    }

    pub fn strlen<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("STRLEN").arg(key))
    }

    /// Returns the previous bit.
    pub fn setbit<K: ToRedisArgs>(&mut self, key: K, offset: usize, value: bool) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SETBIT").arg(key).arg(offset).arg(value))
    }

    pub fn getbit<K: ToRedisArgs>(&mut self, key: K, offset: usize) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("GETBIT").arg(key).arg(offset))
    }
}
