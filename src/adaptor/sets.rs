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
use redis::{Cmd, ConnectionLike, FromRedisValue, ToRedisArgs};

use super::{routing_key, RedisAdaptor};
use crate::errors::AdaptorResult;

fn multi_key<K: ToRedisArgs>(name: &str, keys: &[K]) -> Cmd {
    let mut cmd = redis::cmd(name);
    for key in keys {
        cmd.arg(key);
    }
    cmd
}

impl<C: ConnectionLike> RedisAdaptor<C> {
    /// Returns how many members were new.
    pub fn sadd<K: ToRedisArgs, M: ToRedisArgs>(&mut self, key: K, members: &[M]) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        let mut cmd = redis::cmd("SADD");
        cmd.arg(key);
        for member in members {
            cmd.arg(member);
        }
        self.keyed(&route, &cmd)
    }

    pub fn srem<K: ToRedisArgs, M: ToRedisArgs>(&mut self, key: K, members: &[M]) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        let mut cmd = redis::cmd("SREM");
        cmd.arg(key);
        for member in members {
            cmd.arg(member);
        }
        self.keyed(&route, &cmd)
    }

    pub fn smembers<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SMEMBERS").arg(key))
    }

    pub fn spop<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SPOP").arg(key))
    }

    pub fn scard<K: ToRedisArgs>(&mut self, key: K) -> AdaptorResult<i64> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SCARD").arg(key))
    }

    pub fn sismember<K: ToRedisArgs, M: ToRedisArgs>(&mut self, key: K, member: M) -> AdaptorResult<bool> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SISMEMBER").arg(key).arg(member))
    }

    pub fn srandmember<K: ToRedisArgs, RV: FromRedisValue>(&mut self, key: K) -> AdaptorResult<RV> {
        let route = routing_key(&key)?;
        self.keyed(&route, redis::cmd("SRANDMEMBER").arg(key))
    }

    /// Moves `member` from `source` to `destination`.
    ///
    /// Sharded connections run `SREM` on the source shard and, when the member was present,
    /// `SADD` on the destination shard. The move is not atomic there.
    pub fn smove<S: ToRedisArgs, D: ToRedisArgs, M: ToRedisArgs>(
        &mut self,
        source: S,
        destination: D,
        member: M,
    ) -> AdaptorResult<bool> {
        if !self.is_sharded() {
            return self.single_only("smove", redis::cmd("SMOVE").arg(source).arg(destination).arg(member));
        }

        let removed = self.srem(source, &[&member])?;
        if removed > 0 {
            self.sadd(destination, &[&member])?;
        }
        Ok(removed > 0)
    }

    pub fn sinter<K: ToRedisArgs, RV: FromRedisValue>(&mut self, keys: &[K]) -> AdaptorResult<RV> {
        self.single_only("sinter", &multi_key("SINTER", keys))
    }

    pub fn sinterstore<D: ToRedisArgs, K: ToRedisArgs>(&mut self, dst: D, keys: &[K]) -> AdaptorResult<i64> {
        let mut cmd = redis::cmd("SINTERSTORE");
        cmd.arg(dst).arg(keys_arg(keys));
        self.single_only("sinterstore", &cmd)
    }

    pub fn sunion<K: ToRedisArgs, RV: FromRedisValue>(&mut self, keys: &[K]) -> AdaptorResult<RV> {
        self.single_only("sunion", &multi_key("SUNION", keys))
    }

    pub fn sunionstore<D: ToRedisArgs, K: ToRedisArgs>(&mut self, dst: D, keys: &[K]) -> AdaptorResult<i64> {
        let mut cmd = redis::cmd("SUNIONSTORE");
        cmd.arg(dst).arg(keys_arg(keys));
        self.single_only("sunionstore", &cmd)
    }

    pub fn sdiff<K: ToRedisArgs, RV: FromRedisValue>(&mut self, keys: &[K]) -> AdaptorResult<RV> {
        self.single_only("sdiff", &multi_key("SDIFF", keys))
    }

    pub fn sdiffstore<D: ToRedisArgs, K: ToRedisArgs>(&mut self, dst: D, keys: &[K]) -> AdaptorResult<i64> {
        let mut cmd = redis::cmd("SDIFFSTORE");
        cmd.arg(dst).arg(keys_arg(keys));
        self.single_only("sdiffstore", &cmd)
    }
}

fn keys_arg<K: ToRedisArgs>(keys: &[K]) -> Vec<Vec<u8>> {
    keys.iter().flat_map(|key| key.to_redis_args()).collect()
}
