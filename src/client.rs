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
//! Pooled single-server convenience calls.
//!
//! Each call checks a connection out of the pool, runs one logical operation and hands the
//! connection back when it drops. Failures are logged with the key and then returned; a call
//! with an empty key sends nothing and yields the neutral value (`false`, `0`, `None`, empty).

use std::collections::{HashMap, HashSet};

use r2d2::ManageConnection;
use redis::{Commands, ConnectionLike, ToRedisArgs};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::codec::{decode_map_entry, encode_map_entry, from_json, to_json};
use crate::config::{AdaptorConfig, PoolConfig};
use crate::errors::{AdaptorError, AdaptorResult};
use crate::pool::build_pool;

pub struct RedisClients<M: ManageConnection = redis::Client> {
    pool: r2d2::Pool<M>,
}

impl<M: ManageConnection> Clone for RedisClients<M> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

impl RedisClients<redis::Client> {
    pub fn open(url: &str) -> AdaptorResult<Self> {
        Self::from_config(&AdaptorConfig::single_server(url))
    }

    /// Only single-server configurations are accepted.
    pub fn from_config(config: &AdaptorConfig) -> AdaptorResult<Self> {
        config.validate()?;
        if config.is_sharded() {
            return Err(AdaptorError::config("redis clients need a single server, not shards"));
        }
        let client = redis::Client::open(config.url.as_str())?;
        Self::with_manager(client, &config.pool)
    }
}

impl<M> RedisClients<M>
where
    M: ManageConnection,
    M::Connection: ConnectionLike,
{
    #[inline]
    pub fn new(pool: r2d2::Pool<M>) -> Self {
        Self { pool }
    }

    pub fn with_manager(manager: M, config: &PoolConfig) -> AdaptorResult<Self> {
        Ok(Self::new(build_pool(manager, config)?))
    }

    #[inline]
    pub fn pool(&self) -> &r2d2::Pool<M> {
        &self.pool
    }

    fn run<T, F>(&self, op: &'static str, key: &str, f: F) -> AdaptorResult<T>
    where
        T: Default,
        F: FnOnce(&mut M::Connection) -> AdaptorResult<T>,
    {
        if key.is_empty() {
            debug!(op, "empty key, nothing sent");
            return Ok(T::default());
        }
        let result = self
            .pool
            .get()
            .map_err(AdaptorError::from)
            .and_then(|mut conn| f(&mut *conn));
        if let Err(e) = &result {
            error!(op, key, error = %e, "redis call failed");
        }
        result
    }

    // Strings

    pub fn set<V: ToRedisArgs>(&self, key: &str, value: V) -> AdaptorResult<bool> {
        self.run("set", key, |conn| {
            let _: () = conn.set(key, value)?;
            Ok(true)
        })
    }

    /// `SETEX`: the value expires after `seconds`.
    pub fn set_ex<V: ToRedisArgs>(&self, key: &str, value: V, seconds: u64) -> AdaptorResult<bool> {
        self.run("set_ex", key, |conn| {
            let _: () = redis::cmd("SETEX").arg(key).arg(seconds).arg(value).query(conn)?;
            Ok(true)
        })
    }

    pub fn get(&self, key: &str) -> AdaptorResult<Option<String>> {
        self.run("get", key, |conn| Ok(conn.get(key)?))
    }

    /// True when the key existed.
    pub fn del(&self, key: &str) -> AdaptorResult<bool> {
        self.run("del", key, |conn| {
            let removed: i64 = conn.del(key)?;
            Ok(removed > 0)
        })
    }

    pub fn incr(&self, key: &str) -> AdaptorResult<i64> {
        self.run("incr", key, |conn| Ok(conn.incr(key, 1)?))
    }

    pub fn decr(&self, key: &str) -> AdaptorResult<i64> {
        self.run("decr", key, |conn| Ok(conn.decr(key, 1)?))
    }

    // JSON objects

    pub fn set_object<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AdaptorResult<bool> {
        self.run("set_object", key, |conn| {
            let _: () = conn.set(key, to_json(value)?)?;
            Ok(true)
        })
    }

    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> AdaptorResult<Option<T>> {
        self.run("get_object", key, |conn| {
            let json: Option<String> = conn.get(key)?;
            json.as_deref().map(from_json).transpose()
        })
    }

    /// Stores each entry as a `<json>^<field>` member of the set at `key`.
    pub fn set_map_object<V: Serialize>(&self, key: &str, map: &HashMap<String, V>) -> AdaptorResult<bool> {
        if map.is_empty() {
            return Ok(false);
        }
        self.run("set_map_object", key, |conn| {
            let members = map
                .iter()
                .map(|(field, value)| encode_map_entry(field, value))
                .collect::<AdaptorResult<Vec<_>>>()?;
            let _: i64 = conn.sadd(key, members)?;
            Ok(true)
        })
    }

    pub fn get_map_object<V: DeserializeOwned>(&self, key: &str) -> AdaptorResult<HashMap<String, V>> {
        self.run("get_map_object", key, |conn| {
            let members: Vec<String> = conn.smembers(key)?;
            members.iter().map(|member| decode_map_entry(member)).collect()
        })
    }

    pub fn set_list_objects<T: Serialize>(&self, key: &str, values: &[T]) -> AdaptorResult<bool> {
        if values.is_empty() {
            return Ok(false);
        }
        self.run("set_list_objects", key, |conn| {
            let json = values.iter().map(to_json).collect::<AdaptorResult<Vec<_>>>()?;
            let _: i64 = conn.rpush(key, json)?;
            Ok(true)
        })
    }

    pub fn get_list_objects<T: DeserializeOwned>(&self, key: &str) -> AdaptorResult<Vec<T>> {
        self.run("get_list_objects", key, |conn| {
            let members: Vec<String> = conn.lrange(key, 0, -1)?;
            members.iter().map(|json| from_json(json)).collect()
        })
    }

    pub fn set_set_objects<T: Serialize>(&self, key: &str, values: &[T]) -> AdaptorResult<bool> {
        if values.is_empty() {
            return Ok(false);
        }
        self.run("set_set_objects", key, |conn| {
            let json = values.iter().map(to_json).collect::<AdaptorResult<Vec<_>>>()?;
            let _: i64 = conn.sadd(key, json)?;
            Ok(true)
        })
    }

    pub fn get_set_objects<T, S>(&self, key: &str) -> AdaptorResult<S>
    where
        T: DeserializeOwned,
        S: FromIterator<T> + Default,
    {
        self.run("get_set_objects", key, |conn| {
            let members: Vec<String> = conn.smembers(key)?;
            members.iter().map(|json| from_json::<T>(json)).collect()
        })
    }

    // Sets

    pub fn add_set<V: ToRedisArgs>(&self, key: &str, members: &[V]) -> AdaptorResult<bool> {
        if members.is_empty() {
            return Ok(false);
        }
        self.run("add_set", key, |conn| {
            let _: i64 = conn.sadd(key, members)?;
            Ok(true)
        })
    }

    /// Adds the members, then sets the expiry; true only when both happened.
    pub fn add_set_with_expire<V: ToRedisArgs>(&self, key: &str, seconds: i64, members: &[V]) -> AdaptorResult<bool> {
        if !self.add_set(key, members)? {
            return Ok(false);
        }
        self.set_expire(key, seconds)
    }

    pub fn get_set(&self, key: &str) -> AdaptorResult<HashSet<String>> {
        self.run("get_set", key, |conn| Ok(conn.smembers(key)?))
    }

    pub fn count_set(&self, key: &str) -> AdaptorResult<i64> {
        self.run("count_set", key, |conn| Ok(conn.scard(key)?))
    }

    pub fn contains_in_set<V: ToRedisArgs>(&self, key: &str, member: V) -> AdaptorResult<bool> {
        self.run("contains_in_set", key, |conn| Ok(conn.sismember(key, member)?))
    }

    /// True when at least one member was removed.
    pub fn remove_set_value<V: ToRedisArgs>(&self, key: &str, members: &[V]) -> AdaptorResult<bool> {
        if members.is_empty() {
            return Ok(false);
        }
        self.run("remove_set_value", key, |conn| {
            let removed: i64 = conn.srem(key, members)?;
            Ok(removed > 0)
        })
    }

    // Expiry

    /// False when the key does not exist.
    pub fn set_expire(&self, key: &str, seconds: i64) -> AdaptorResult<bool> {
        self.run("set_expire", key, |conn| {
            Ok(redis::cmd("EXPIRE").arg(key).arg(seconds).query(conn)?)
        })
    }

    pub fn set_expire_at(&self, key: &str, unix_timestamp: i64) -> AdaptorResult<bool> {
        self.run("set_expire_at", key, |conn| {
            Ok(redis::cmd("EXPIREAT").arg(key).arg(unix_timestamp).query(conn)?)
        })
    }

    // Lists

    /// `LPUSH` of all values.
    pub fn add_list<V: ToRedisArgs>(&self, key: &str, values: &[V]) -> AdaptorResult<bool> {
        if values.is_empty() {
            return Ok(false);
        }
        self.run("add_list", key, |conn| {
            let _: i64 = conn.lpush(key, values)?;
            Ok(true)
        })
    }

    pub fn add_list_with_expire<V: ToRedisArgs>(&self, key: &str, seconds: i64, values: &[V]) -> AdaptorResult<bool> {
        if !self.add_list(key, values)? {
            return Ok(false);
        }
        self.set_expire(key, seconds)
    }

    /// Pushes the values one `LPUSH` at a time, stopping at the first failure.
    pub fn add_list_values<V: ToRedisArgs>(&self, key: &str, values: &[V]) -> AdaptorResult<bool> {
        if values.is_empty() {
            return Ok(false);
        }
        let mut pushed = false;
        for value in values {
            pushed = self.add_list(key, std::slice::from_ref(value))?;
        }
        Ok(pushed)
    }

    pub fn get_list(&self, key: &str) -> AdaptorResult<Vec<String>> {
        self.range_list(key, 0, -1)
    }

    pub fn range_list(&self, key: &str, start: isize, end: isize) -> AdaptorResult<Vec<String>> {
        self.run("range_list", key, |conn| {
            Ok(redis::cmd("LRANGE").arg(key).arg(start).arg(end).query(conn)?)
        })
    }

    pub fn count_list(&self, key: &str) -> AdaptorResult<i64> {
        self.run("count_list", key, |conn| Ok(conn.llen(key)?))
    }

    pub fn trim_list(&self, key: &str, start: isize, end: isize) -> AdaptorResult<bool> {
        self.run("trim_list", key, |conn| {
            let _: () = redis::cmd("LTRIM").arg(key).arg(start).arg(end).query(conn)?;
            Ok(true)
        })
    }

    /// `LREM key count value`; true when something was removed.
    pub fn remove_list_value<V: ToRedisArgs>(&self, key: &str, count: isize, value: V) -> AdaptorResult<bool> {
        self.run("remove_list_value", key, |conn| {
            let removed: i64 = redis::cmd("LREM").arg(key).arg(count).arg(value).query(conn)?;
            Ok(removed > 0)
        })
    }

    /// Number of `values` that had at least one occurrence removed.
    pub fn remove_list_values<V: ToRedisArgs>(&self, key: &str, count: isize, values: &[V]) -> AdaptorResult<usize> {
        let mut removed = 0;
        for value in values {
            if self.remove_list_value(key, count, value)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    // Hashes

    pub fn set_hash<F: ToRedisArgs, V: ToRedisArgs>(&self, key: &str, field: F, value: V) -> AdaptorResult<bool> {
        self.run("set_hash", key, |conn| {
            let _: i64 = conn.hset(key, field, value)?;
            Ok(true)
        })
    }

    pub fn get_hash<F: ToRedisArgs>(&self, key: &str, field: F) -> AdaptorResult<Option<String>> {
        self.run("get_hash", key, |conn| Ok(conn.hget(key, field)?))
    }

    pub fn del_hash<F: ToRedisArgs>(&self, key: &str, field: F) -> AdaptorResult<i64> {
        self.run("del_hash", key, |conn| Ok(conn.hdel(key, field)?))
    }

    pub fn del_hashes<F: ToRedisArgs>(&self, key: &str, fields: &[F]) -> AdaptorResult<i64> {
        if fields.is_empty() {
            return Ok(0);
        }
        self.run("del_hashes", key, |conn| Ok(conn.hdel(key, fields)?))
    }

    pub fn exists_hash<F: ToRedisArgs>(&self, key: &str, field: F) -> AdaptorResult<bool> {
        self.run("exists_hash", key, |conn| Ok(conn.hexists(key, field)?))
    }

    pub fn hash_values(&self, key: &str) -> AdaptorResult<Vec<String>> {
        self.run("hash_values", key, |conn| Ok(conn.hvals(key)?))
    }

    pub fn hash_keys(&self, key: &str) -> AdaptorResult<HashSet<String>> {
        self.run("hash_keys", key, |conn| Ok(conn.hkeys(key)?))
    }

    pub fn hash_len(&self, key: &str) -> AdaptorResult<i64> {
        self.run("hash_len", key, |conn| Ok(conn.hlen(key)?))
    }

    // Sorted sets

    pub fn set_sorted_set<V: ToRedisArgs>(&self, key: &str, score: f64, member: V) -> AdaptorResult<bool> {
        self.run("set_sorted_set", key, |conn| {
            let _: i64 = redis::cmd("ZADD").arg(key).arg(score).arg(member).query(conn)?;
            Ok(true)
        })
    }

    /// Members scored within `[start_score, end_score]`, highest first when `desc`.
    pub fn get_sorted_set(&self, key: &str, start_score: f64, end_score: f64, desc: bool) -> AdaptorResult<Vec<String>> {
        self.run("get_sorted_set", key, |conn| {
            let cmd = if desc {
                redis::cmd("ZREVRANGEBYSCORE").arg(key).arg(end_score).arg(start_score).clone()
            } else {
                redis::cmd("ZRANGEBYSCORE").arg(key).arg(start_score).arg(end_score).clone()
            };
            Ok(cmd.query(conn)?)
        })
    }

    /// Members ranked within `[start, end]`; negative ranks count from the end.
    pub fn get_sorted_set_by_range(&self, key: &str, start: isize, end: isize, desc: bool) -> AdaptorResult<Vec<String>> {
        self.run("get_sorted_set_by_range", key, |conn| {
            let name = if desc { "ZREVRANGE" } else { "ZRANGE" };
            Ok(redis::cmd(name).arg(key).arg(start).arg(end).query(conn)?)
        })
    }

    pub fn count_sorted_set(&self, key: &str, start_score: f64, end_score: f64) -> AdaptorResult<i64> {
        self.run("count_sorted_set", key, |conn| Ok(conn.zcount(key, start_score, end_score)?))
    }

    /// True when the member was present.
    pub fn del_sorted_set<V: ToRedisArgs>(&self, key: &str, member: V) -> AdaptorResult<bool> {
        self.run("del_sorted_set", key, |conn| {
            let removed: i64 = conn.zrem(key, member)?;
            Ok(removed > 0)
        })
    }

    pub fn get_score<V: ToRedisArgs>(&self, key: &str, member: V) -> AdaptorResult<Option<f64>> {
        self.run("get_score", key, |conn| Ok(conn.zscore(key, member)?))
    }
}
