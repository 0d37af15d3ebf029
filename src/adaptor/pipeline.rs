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
use std::collections::BTreeMap;
use std::fmt;

use redis::{Cmd, ConnectionLike, FromRedisValue, Pipeline, ToRedisArgs, Value};
use tracing::debug;

use super::{Backend, RedisAdaptor};
use crate::errors::{AdaptorError, AdaptorResult};

/// Commands queued for a sharded adaptor, each tagged with the key that routes it.
///
/// On execution the commands are grouped into one pipeline per shard and the replies are
/// put back in submission order.
#[derive(Clone, Default)]
pub struct ShardedPipeline {
    commands: Vec<(Vec<u8>, Cmd)>,
}

impl fmt::Debug for ShardedPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<String> = self
            .commands
            .iter()
            .map(|(route, _)| String::from_utf8_lossy(route).into_owned())
            .collect();
        f.debug_struct("ShardedPipeline").field("routes", &routes).finish()
    }
}

impl ShardedPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `cmd`, routed by the first argument of `key`.
    pub fn add<K: ToRedisArgs>(&mut self, key: K, cmd: Cmd) -> &mut Self {
        let route = key.to_redis_args().into_iter().next().unwrap_or_default();
        self.commands.push((route, cmd));
        self
    }

    pub fn set<K: ToRedisArgs, V: ToRedisArgs>(&mut self, key: K, value: V) -> &mut Self {
        let cmd = redis::cmd("SET").arg(&key).arg(value).clone();
        self.add(key, cmd)
    }

    pub fn get<K: ToRedisArgs>(&mut self, key: K) -> &mut Self {
        let cmd = redis::cmd("GET").arg(&key).clone();
        self.add(key, cmd)
    }

    pub fn incr<K: ToRedisArgs>(&mut self, key: K, delta: i64) -> &mut Self {
        let cmd = redis::cmd("INCRBY").arg(&key).arg(delta).clone();
        self.add(key, cmd)
    }

    pub fn del<K: ToRedisArgs>(&mut self, key: K) -> &mut Self {
        let cmd = redis::cmd("DEL").arg(&key).clone();
        self.add(key, cmd)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<C: ConnectionLike> RedisAdaptor<C> {
    /// A plain pipeline for a single connection.
    pub fn pipeline(&mut self) -> AdaptorResult<Pipeline> {
        self.single_node("pipeline")?;
        Ok(redis::pipe())
    }

    pub fn exec_pipeline<RV: FromRedisValue>(&mut self, pipe: &Pipeline) -> AdaptorResult<RV> {
        let conn = self.single_node("pipeline")?;
        Ok(pipe.query(conn)?)
    }

    pub fn shard_pipeline(&mut self) -> AdaptorResult<ShardedPipeline> {
        if !self.is_sharded() {
            return Err(AdaptorError::unsupported_single(
                "shard_pipeline",
                "needs a sharded connection, use pipeline instead.",
            ));
        }
        Ok(ShardedPipeline::new())
    }

    /// Runs one pipeline per shard; the replies come back in the order the commands were added.
    pub fn exec_shard_pipeline<RV: FromRedisValue>(&mut self, pipeline: &ShardedPipeline) -> AdaptorResult<RV> {
        let sharded = match &mut self.backend {
            Backend::Sharded(sharded) => sharded,
            Backend::Single(_) => {
                return Err(AdaptorError::unsupported_single(
                    "exec_shard_pipeline",
                    "needs a sharded connection, use exec_pipeline instead.",
                ))
            }
        };

        let mut groups: BTreeMap<usize, (Pipeline, Vec<usize>)> = BTreeMap::new();
        for (position, (route, cmd)) in pipeline.commands.iter().enumerate() {
            let index = sharded.shard_index(route);
            let (pipe, positions) = groups.entry(index).or_insert_with(|| (redis::pipe(), Vec::new()));
            pipe.add_command(cmd.clone());
            positions.push(position);
        }

        let mut replies = vec![Value::Nil; pipeline.len()];
        for (index, (pipe, positions)) in groups {
            let conn = sharded
                .shard_at(index)
                .ok_or_else(|| AdaptorError::config("shard index out of range"))?;
            let values: Vec<Value> = pipe.query(conn)?;
            debug!(shard = index, commands = positions.len(), "shard pipeline executed");
            for (position, value) in positions.into_iter().zip(values) {
                replies[position] = value;
            }
        }

        Ok(redis::from_redis_value(&Value::Array(replies))?)
    }
}
