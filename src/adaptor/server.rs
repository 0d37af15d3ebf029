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

use super::RedisAdaptor;
use crate::errors::{AdaptorError, AdaptorResult};

impl<C: ConnectionLike> RedisAdaptor<C> {
    pub fn ping(&mut self) -> AdaptorResult<String> {
        self.single_only("ping", &redis::cmd("PING"))
    }

    /// `PING` on every server; fails unless each one answers `PONG`.
    pub fn ping_all(&mut self) -> AdaptorResult<()> {
        let replies: Vec<String> = self.each_node(&redis::cmd("PING"))?;
        match replies.iter().position(|reply| reply != "PONG") {
            Some(index) => Err(AdaptorError::RedisError(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "unexpected PING reply",
                format!("shard {} answered {}", index, replies[index]),
            )))),
            None => Ok(()),
        }
    }

    /// Asks the server to close the connection; the adaptor reports closed afterwards.
    pub fn quit(&mut self) -> AdaptorResult<String> {
        let reply = self.single_only("quit", &redis::cmd("QUIT"))?;
        self.closed = true;
        Ok(reply)
    }

    pub fn select(&mut self, db: i64) -> AdaptorResult<()> {
        self.single_only("select", redis::cmd("SELECT").arg(db))
    }

    pub fn info(&mut self) -> AdaptorResult<String> {
        self.single_only("info", &redis::cmd("INFO"))
    }

    /// Synchronous `SAVE`, on every shard when sharded.
    pub fn save(&mut self) -> AdaptorResult<()> {
        self.each_node::<()>(&redis::cmd("SAVE"))?;
        Ok(())
    }

    /// Number of keys, summed over every shard.
    pub fn dbsize(&mut self) -> AdaptorResult<i64> {
        let sizes: Vec<i64> = self.each_node(&redis::cmd("DBSIZE"))?;
        Ok(sizes.into_iter().sum())
    }

    pub fn flush_db(&mut self) -> AdaptorResult<()> {
        self.each_node::<()>(&redis::cmd("FLUSHDB"))?;
        Ok(())
    }

    pub fn flush_all(&mut self) -> AdaptorResult<()> {
        self.each_node::<()>(&redis::cmd("FLUSHALL"))?;
        Ok(())
    }

    /// `CONFIG GET` against the first shard; shards are expected to share a configuration.
    pub fn config_get<P: ToRedisArgs, RV: FromRedisValue>(&mut self, pattern: P) -> AdaptorResult<RV> {
        let cmd = redis::cmd("CONFIG").arg("GET").arg(pattern).clone();
        let conn = self
            .connections()
            .into_iter()
            .next()
            .ok_or_else(|| AdaptorError::config("no connection available"))?;
        Ok(cmd.query(conn)?)
    }

    pub fn config_set<P: ToRedisArgs, V: ToRedisArgs>(&mut self, parameter: P, value: V) -> AdaptorResult<()> {
        self.each_node::<()>(redis::cmd("CONFIG").arg("SET").arg(parameter).arg(value))?;
        Ok(())
    }

    pub fn config_reset_stat(&mut self) -> AdaptorResult<()> {
        self.each_node::<()>(redis::cmd("CONFIG").arg("RESETSTAT"))?;
        Ok(())
    }

    pub fn slowlog_reset(&mut self) -> AdaptorResult<()> {
        self.single_only("slowlog_reset", redis::cmd("SLOWLOG").arg("RESET"))
    }

    pub fn slowlog_len(&mut self) -> AdaptorResult<i64> {
        self.single_only("slowlog_len", redis::cmd("SLOWLOG").arg("LEN"))
    }

    /// Raw slow log entries, the newest `count` when given.
    pub fn slowlog_get<RV: FromRedisValue>(&mut self, count: Option<usize>) -> AdaptorResult<RV> {
        let mut cmd = redis::cmd("SLOWLOG");
        cmd.arg("GET");
        if let Some(count) = count {
            cmd.arg(count);
        }
        self.single_only("slowlog_get", &cmd)
    }
}
