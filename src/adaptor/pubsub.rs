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
use std::ops::ControlFlow;

use redis::{ConnectionLike, Msg, ToRedisArgs};
use tracing::debug;

use super::{routing_key, Backend, RedisAdaptor};
use crate::errors::{AdaptorError, AdaptorResult};

impl<C: ConnectionLike> RedisAdaptor<C> {
    /// Publishes on the shard owning `channel`; returns the number of receivers there.
    pub fn publish<CH: ToRedisArgs, M: ToRedisArgs>(&mut self, channel: CH, message: M) -> AdaptorResult<i64> {
        let route = routing_key(&channel)?;
        self.keyed(&route, redis::cmd("PUBLISH").arg(channel).arg(message))
    }
}

impl RedisAdaptor<redis::Connection> {
    /// Subscribes to `channels` and feeds every message to `handler` until it breaks.
    ///
    /// Publishers route by channel, so a sharded adaptor can only listen when every
    /// channel lives on the same shard.
    pub fn subscribe<F>(&mut self, channels: &[&str], mut handler: F) -> AdaptorResult<()>
    where
        F: FnMut(Msg) -> ControlFlow<()>,
    {
        let first = channels
            .first()
            .ok_or_else(|| AdaptorError::invalid_argument("subscribe needs at least one channel"))?;

        let conn = match &mut self.backend {
            Backend::Single(conn) => conn,
            Backend::Sharded(sharded) => {
                let index = sharded.shard_index(first.as_bytes());
                if channels.iter().any(|c| sharded.shard_index(c.as_bytes()) != index) {
                    return Err(AdaptorError::unsupported_sharded("subscribe to channels on different shards"));
                }
                sharded
                    .shard_at(index)
                    .ok_or_else(|| AdaptorError::config("shard index out of range"))?
            }
        };

        let mut pubsub = conn.as_pubsub();
        for channel in channels {
            pubsub.subscribe(*channel)?;
        }
        debug!(?channels, "subscribed");

        loop {
            let msg = pubsub.get_message()?;
            if handler(msg).is_break() {
                break;
            }
        }
        Ok(())
    }
}
