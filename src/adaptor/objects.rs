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
use std::collections::HashMap;

use redis::{ConnectionLike, ToRedisArgs};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::RedisAdaptor;
use crate::codec::{decode_map_entry, encode_map_entry, from_json, to_json};
use crate::errors::AdaptorResult;

// JSON-encoded values. Every helper routes by its key, so all of them work sharded.
impl<C: ConnectionLike> RedisAdaptor<C> {
    pub fn set_object<K: ToRedisArgs, T: Serialize + ?Sized>(&mut self, key: K, value: &T) -> AdaptorResult<()> {
        let json = to_json(value)?;
        self.set(key, json)
    }

    /// `None` when the key does not exist.
    pub fn get_object<K: ToRedisArgs, T: DeserializeOwned>(&mut self, key: K) -> AdaptorResult<Option<T>> {
        let json: Option<String> = self.get(key)?;
        json.as_deref().map(from_json).transpose()
    }

    /// Adds every entry to the set at `key` as `<json>^<field>`; false when `map` is empty.
    pub fn set_map_object<K: ToRedisArgs, V: Serialize>(
        &mut self,
        key: K,
        map: &HashMap<String, V>,
    ) -> AdaptorResult<bool> {
        if map.is_empty() {
            return Ok(false);
        }
        let members = map
            .iter()
            .map(|(field, value)| encode_map_entry(field, value))
            .collect::<AdaptorResult<Vec<_>>>()?;
        self.sadd(key, &members)?;
        Ok(true)
    }

    pub fn get_map_object<K: ToRedisArgs, V: DeserializeOwned>(&mut self, key: K) -> AdaptorResult<HashMap<String, V>> {
        let members: Vec<String> = self.smembers(key)?;
        members.iter().map(|member| decode_map_entry(member)).collect()
    }

    /// Appends to the list at `key`; false when `values` is empty.
    pub fn set_list_objects<K: ToRedisArgs, T: Serialize>(&mut self, key: K, values: &[T]) -> AdaptorResult<bool> {
        if values.is_empty() {
            return Ok(false);
        }
        let json = values.iter().map(to_json).collect::<AdaptorResult<Vec<_>>>()?;
        self.rpush(key, &json)?;
        Ok(true)
    }

    pub fn get_list_objects<K: ToRedisArgs, T: DeserializeOwned>(&mut self, key: K) -> AdaptorResult<Vec<T>> {
        let members: Vec<String> = self.lrange(key, 0, -1)?;
        members.iter().map(|json| from_json(json)).collect()
    }

    pub fn set_set_objects<K: ToRedisArgs, T: Serialize>(&mut self, key: K, values: &[T]) -> AdaptorResult<bool> {
        if values.is_empty() {
            return Ok(false);
        }
        let json = values.iter().map(to_json).collect::<AdaptorResult<Vec<_>>>()?;
        self.sadd(key, &json)?;
        Ok(true)
    }

    /// Members decoded into any collection, e.g. `Vec<T>` or `HashSet<T>`.
    pub fn get_set_objects<K, T, S>(&mut self, key: K) -> AdaptorResult<S>
    where
        K: ToRedisArgs,
        T: DeserializeOwned,
        S: FromIterator<T>,
    {
        let members: Vec<String> = self.smembers(key)?;
        members.iter().map(|json| from_json::<T>(json)).collect()
    }

    /// Expiry in milliseconds.
    pub fn set_expire<K: ToRedisArgs>(&mut self, key: K, millis: i64) -> AdaptorResult<bool> {
        self.pexpire(key, millis)
    }
}
