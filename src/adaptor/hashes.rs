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
    /// Returns true when `field` is new.
    pub fn hset<K: ToRedisArgs, F: ToRedisArgs, V: ToRedisArgs>(
        &mut self,
        key: K,
        field: F,
        value: V,
    ) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("HSET").arg(key).arg(field).arg(value))
    }

    pub fn hget<K: ToRedisArgs, F: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K, field: F) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("HGET").arg(key).arg(field))
    }

    pub fn hsetnx<K: ToRedisArgs, F: ToRedisArgs, V: ToRedisArgs>(
        &mut self,
        key: K,
        field: F,
        value: V,
    ) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("HSETNX").arg(key).arg(field).arg(value))
    }

    pub fn hmset<K: ToRedisArgs, F: ToRedisArgs, V: ToRedisArgs>(
        &mut self,
        key: K,
        items: &[(F, V)],
    ) -> AdaptorResult<()> {
        let route = routing_key(&key)?;
        let mut cmd = redis::cmd("HMSET");
        cmd.arg(key);
        for (field, value) in items {
            cmd.arg(field).arg(value);
        }
        self.keyed(&route, &cmd)
    }

    pub fn hmget<K: ToRedisArgs, F: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        fields: &[F],
    ) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        let mut cmd = redis::cmd("HMGET");
        cmd.arg(key);
        for field in fields {
            cmd.arg(field);
        }
        self.keyed(&route, &cmd)
    }

    pub fn hincr_by<K: ToRedisArgs, F: ToRedisArgs>(&mut self, key: K, field: F, delta: i64) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("HINCRBY").arg(key).arg(field).arg(delta))
    }

    pub fn hexists<K: ToRedisArgs, F: ToRedisArgs>(&mut self, key: K, field: F) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("HEXISTS").arg(key).arg(field))
    }

    pub fn hdel<K: ToRedisArgs, F: ToRedisArgs>(&mut self, key: K, fields: &[F]) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        let mut cmd = redis::cmd("HDEL");
        cmd.arg(key);
        for field in fields {
            cmd.arg(field);
        }
        self.keyed(&route, &cmd)
    }

    pub fn hlen<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("HLEN").arg(key))
    }

    pub fn hkeys<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("HKEYS").arg(key))
    }

    pub fn hvals<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("HVALS").arg(key))
    }

    /// Field/value pairs, typically read into a `HashMap`.
    pub fn hgetall<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("HGETALL").arg(key))
    }
}
