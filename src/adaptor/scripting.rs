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

use super::RedisAdaptor;
use crate::errors::AdaptorResult;

fn script_cmd<S: ToRedisArgs, K: ToRedisArgs, A: ToRedisArgs>(name: &str, script: S, keys: &[K], args: &[A]) -> Cmd {
    let mut cmd = redis::cmd(name);
    cmd.arg(script).arg(keys.len());
    for key in keys {
        cmd.arg(key);
    }
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

// Scripts may touch any key, so none of these can be routed to a shard.
impl<C: ConnectionLike> RedisAdaptor<C> {
    pub fn eval<K: ToRedisArgs, A: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        script: &str,
        keys: &[K],
        args: &[A],
    ) -> AdaptorResult<RV> {
        self.single_only("eval", &script_cmd("EVAL", script, keys, args))
    }

    pub fn evalsha<K: ToRedisArgs, A: ToRedisArgs, RV: FromRedisValue>(
        &mut self,
        sha1: &str,
        keys: &[K],
        args: &[A],
    ) -> AdaptorResult<RV> {
        self.single_only("evalsha", &script_cmd("EVALSHA", sha1, keys, args))
    }

    pub fn script_exists(&mut self, sha1s: &[&str]) -> AdaptorResult<Vec<bool>> {
        let mut cmd = redis::cmd("SCRIPT");
        cmd.arg("EXISTS");
        for sha1 in sha1s {
            cmd.arg(*sha1);
        }
        self.single_only("script_exists", &cmd)
    }

    /// Returns the SHA1 of the loaded script.
    pub fn script_load(&mut self, script: &str) -> AdaptorResult<String> {
        self.single_only("script_load", redis::cmd("SCRIPT").arg("LOAD").arg(script))
    }

    pub fn script_flush(&mut self) -> AdaptorResult<()> {
        self.single_only("script_flush", redis::cmd("SCRIPT").arg("FLUSH"))
    }

    pub fn script_kill(&mut self) -> AdaptorResult<()> {
        self.single_only("script_kill", redis::cmd("SCRIPT").arg("KILL"))
    }
}
