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
use redis::{ConnectionLike, FromRedisValue, Pipeline, RedisResult, ToRedisArgs};

use super::RedisAdaptor;
use crate::errors::AdaptorResult;

impl<C: ConnectionLike> RedisAdaptor<C> {
    pub fn watch<K: ToRedisArgs>(&mut self, keys: &[K]) -> AdaptorResult<()> {
        let mut cmd = redis::cmd("WATCH");
        for key in keys {
            cmd.arg(key);
        }
        self.single_only("watch", &cmd)
    }

    pub fn unwatch(&mut self) -> AdaptorResult<()> {
        self.single_only("unwatch", &redis::cmd("UNWATCH"))
    }

    /// An empty `MULTI` / `EXEC` block to fill and hand to [`exec_transaction`](Self::exec_transaction).
    pub fn multi(&mut self) -> AdaptorResult<Pipeline> {
        self.single_node("multi")?;
        let mut pipe = redis::pipe();
        pipe.atomic();
        Ok(pipe)
    }

    pub fn exec_transaction<RV: FromRedisValue>(&mut self, pipe: &Pipeline) -> AdaptorResult<RV> {
        let conn = self.single_node("exec")?;
        Ok(pipe.query(conn)?)
    }

    /// Optimistic transaction: `WATCH keys`, build the block in `func`, retry while `EXEC`
    /// reports a conflict (`func` returns `Ok(None)`).
    pub fn transaction<K, T, F>(&mut self, keys: &[K], func: F) -> AdaptorResult<T>
    where
        K: ToRedisArgs,
        F: FnMut(&mut C, &mut Pipeline) -> RedisResult<Option<T>>,
    {
        let conn = self.single_node("transaction")?;
        Ok(redis::transaction(conn, keys, func)?)
    }
}
