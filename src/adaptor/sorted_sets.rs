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
use redis::{Cmd, ConnectionLike, FromRedisValue, RedisWrite, ToRedisArgs};

use super::{routing_key, RedisAdaptor};
use crate::errors::AdaptorResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Aggregate {
    #[default]
    Sum,
    Min,
    Max,
}

/// `WEIGHTS` and `AGGREGATE` options of `ZUNIONSTORE` / `ZINTERSTORE`.
#[derive(Debug, Clone, Default)]
pub struct ZParams {
    weights: Vec<f64>,
    aggregate: Option<Aggregate>,
}

impl ZParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(mut self, weights: &[f64]) -> Self {
        self.weights = weights.to_vec();
        self
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }
}

impl ToRedisArgs for ZParams {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        if !self.weights.is_empty() {
            out.write_arg(b"WEIGHTS");
            for weight in &self.weights {
                out.write_arg(weight.to_string().as_bytes());
            }
        }
        if let Some(aggregate) = self.aggregate {
            out.write_arg(b"AGGREGATE");
            out.write_arg(match aggregate {
                Aggregate::Sum => b"SUM",
                Aggregate::Min => b"MIN",
                Aggregate::Max => b"MAX",
            });
        }
    }
}

fn store_cmd<D: ToRedisArgs, K: ToRedisArgs>(name: &str, dst: D, keys: &[K], params: Option<&ZParams>) -> Cmd {
    let mut cmd = redis::cmd(name);
    cmd.arg(dst).arg(keys.len());
    for key in keys {
        cmd.arg(key);
    }
    if let Some(params) = params {
        cmd.arg(params);
    }
    cmd
}

impl<C: ConnectionLike> RedisAdaptor<C> {
    /// Returns how many members were added (not updated).
    pub fn zadd<K: ToRedisArgs, M: ToRedisArgs>(&mut self, key: K, score: f64, member: M) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZADD").arg(key).arg(score).arg(member))
    }

    pub fn zadd_multiple<K: ToRedisArgs, M: ToRedisArgs>(&mut self, key: K, items: &[(f64, M)]) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        let mut cmd = redis::cmd("ZADD");
        cmd.arg(key);
        for (score, member) in items {
            cmd.arg(*score).arg(member);
        }
        self.keyed(&route, &cmd)
    }

    pub fn zrem<K: ToRedisArgs, M: ToRedisArgs>(&mut self, key: K, members: &[M]) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        let mut cmd = redis::cmd("ZREM");
        cmd.arg(key);
        for member in members {
            cmd.arg(member);
        }
        self.keyed(&route, &cmd)
    }

    /// Returns the new score.
    pub fn zincrby<K: ToRedisArgs, M: ToRedisArgs>(&mut self, key: K, delta: f64, member: M) -> AdaptorResult<f64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZINCRBY").arg(key).arg(delta).arg(member))
    }

    pub fn zrank<K: ToRedisArgs, M: ToRedisArgs>(&mut self, key: K, member: M) -> AdaptorResult<Option<i64>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZRANK").arg(key).arg(member))
    }

    pub fn zrevrank<K: ToRedisArgs, M: ToRedisArgs>(&mut self, key: K, member: M) -> AdaptorResult<Option<i64>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZREVRANK").arg(key).arg(member))
    }

    pub fn zrange<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K, start: isize, stop: isize) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZRANGE").arg(key).arg(start).arg(stop))
    }

    pub fn zrevrange<K: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        start: isize,
        stop: isize,
    ) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZREVRANGE").arg(key).arg(start).arg(stop))
    }

    pub fn zrange_withscores<K: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        start: isize,
        stop: isize,
    ) -> AdaptorResult<Vec<(RV, f64)>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZRANGE").arg(key).arg(start).arg(stop).arg("WITHSCORES"))
    }

    pub fn zrevrange_withscores<K: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        start: isize,
        stop: isize,
    ) -> AdaptorResult<Vec<(RV, f64)>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZREVRANGE").arg(key).arg(start).arg(stop).arg("WITHSCORES"))
    }

    pub fn zcard<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZCARD").arg(key))
    }

    pub fn zscore<K: ToRedisArgs, M: ToRedisArgs>(&mut self, key: K, member: M) -> AdaptorResult<Option<f64>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZSCORE").arg(key).arg(member))
    }

    /// Bounds accept numbers or the textual forms `-inf`, `+inf` and `(1.5`.
    pub fn zcount<K: ToRedisArgs, MIN: ToRedisArgs, MAX: ToRedisArgs>(
        &mut self,
        key: K,
        min: MIN,
        max: MAX,
    ) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZCOUNT").arg(key).arg(min).arg(max))
    }

    pub fn zrangebyscore<K: ToRedisArgs, MIN: ToRedisArgs, MAX: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        min: MIN,
        max: MAX,
    ) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZRANGEBYSCORE").arg(key).arg(min).arg(max))
    }

    pub fn zrangebyscore_limit<K: ToRedisArgs, MIN: ToRedisArgs, MAX: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        min: MIN,
        max: MAX,
        offset: isize,
        count: isize,
    ) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(
            &route,
            redis::cmd("ZRANGEBYSCORE").arg(key).arg(min).arg(max).arg("LIMIT").arg(offset).arg(count),
        )
    }

    pub fn zrangebyscore_withscores<K: ToRedisArgs, MIN: ToRedisArgs, MAX: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        min: MIN,
        max: MAX,
    ) -> AdaptorResult<Vec<(RV, f64)>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZRANGEBYSCORE").arg(key).arg(min).arg(max).arg("WITHSCORES"))
    }

    pub fn zrangebyscore_limit_withscores<K: ToRedisArgs, MIN: ToRedisArgs, MAX: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        min: MIN,
        max: MAX,
        offset: isize,
        count: isize,
    ) -> AdaptorResult<Vec<(RV, f64)>> {
        let route = routing_key(&key)?;
        self.keyed(
            &route,
            redis::cmd("ZRANGEBYSCORE")
                .arg(key)
                .arg(min)
                .arg(max)
                .arg("WITHSCORES")
                .arg("LIMIT")
                .arg(offset)
                .arg(count),
        )
    }

    /// Note the argument order: `max` comes first.
    pub fn zrevrangebyscore<K: ToRedisArgs, MAX: ToRedisArgs, MIN: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        max: MAX,
        min: MIN,
    ) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZREVRANGEBYSCORE").arg(key).arg(max).arg(min))
    }

    pub fn zrevrangebyscore_limit<K: ToRedisArgs, MAX: ToRedisArgs, MIN: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        max: MAX,
        min: MIN,
        offset: isize,
        count: isize,
    ) -> AdaptorResult<Vec<RV>> {
        let route = routing_key(&key)?;
        self.keyed(
            &route,
            redis::cmd("ZREVRANGEBYSCORE").arg(key).arg(max).arg(min).arg("LIMIT").arg(offset).arg(count),
        )
    }

    pub fn zrevrangebyscore_withscores<K: ToRedisArgs, MAX: ToRedisArgs, MIN: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        max: MAX,
        min: MIN,
    ) -> AdaptorResult<Vec<(RV, f64)>> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZREVRANGEBYSCORE").arg(key).arg(max).arg(min).arg("WITHSCORES"))
    }

    pub fn zrevrangebyscore_limit_withscores<K: ToRedisArgs, MAX: ToRedisArgs, MIN: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        key: K,
        max: MAX,
        min: MIN,
        offset: isize,
        count: isize,
    ) -> AdaptorResult<Vec<(RV, f64)>> {
        let route = routing_key(&key)?;
        self.keyed(
            &route,
            redis::cmd("ZREVRANGEBYSCORE")
                .arg(key)
                .arg(max)
                .arg(min)
                .arg("WITHSCORES")
                .arg("LIMIT")
                .arg(offset)
                .arg(count),
        )
    }

    pub fn zremrangebyrank<K: ToRedisArgs>(&mut self, key: K, start: isize, stop: isize) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZREMRANGEBYRANK").arg(key).arg(start).arg(stop))
    }

    pub fn zremrangebyscore<K: ToRedisArgs, MIN: ToRedisArgs, MAX: ToRedisArgs>(
        &mut self,
        key: K,
        min: MIN,
        max: MAX,
    ) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("ZREMRANGEBYSCORE").arg(key).arg(min).arg(max))
    }

    pub fn zunionstore<D: ToRedisArgs, K: ToRedisArgs>(&mut self, dst: D, keys: &[K]) -> AdaptorResult<i64> {
        self.single_only("zunionstore", &store_cmd("ZUNIONSTORE", dst, keys, None))
    }

    pub fn zunionstore_with_params<D: ToRedisArgs, K: ToRedisArgs>(
        &mut self,
        dst: D,
        keys: &[K],
        params: &ZParams,
    ) -> AdaptorResult<i64> {
        self.single_only("zunionstore", &store_cmd("ZUNIONSTORE", dst, keys, Some(params)))
    }

    pub fn zinterstore<D: ToRedisArgs, K: ToRedisArgs>(&mut self, dst: D, keys: &[K]) -> AdaptorResult<i64> {
        self.single_only("zinterstore", &store_cmd("ZINTERSTORE", dst, keys, None))
    }

    pub fn zinterstore_with_params<D: ToRedisArgs, K: ToRedisArgs>(
        &mut self,
        dst: D,
        keys: &[K],
        params: &ZParams,
    ) -> AdaptorResult<i64> {
        self.single_only("zinterstore", &store_cmd("ZINTERSTORE", dst, keys, Some(params)))
    }
}
