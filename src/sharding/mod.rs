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
//! Client-side consistent hashing.
//!
//! Places keys the way Jedis' `ShardedJedis` does, so a Java and a Rust
//! client configured with the same shard list agree on where a key lives.

mod murmur;

use std::borrow::Cow;
use std::collections::BTreeMap;

use md5::{Digest, Md5};
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ShardInfo;
use crate::errors::{AdaptorError, AdaptorResult};

/// Virtual nodes per unit of shard weight.
pub const VIRTUAL_NODES: u32 = 160;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hashing {
    #[default]
    Murmur,
    Md5,
}

impl Hashing {
    pub fn hash(&self, data: &[u8]) -> i64 {
        match self {
            Hashing::Murmur => murmur::hash64a(data, murmur::SEED),
            Hashing::Md5 => {
                let digest = Md5::digest(data);
                u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]) as i64
            }
        }
    }
}

/// Immutable hash ring mapping keys to shard indices.
#[derive(Debug, Clone)]
pub struct ShardRing {
    points: BTreeMap<i64, usize>,
    shard_count: usize,
    hashing: Hashing,
    key_tag: Option<Regex>,
}

impl ShardRing {
    pub fn new(shards: &[ShardInfo], hashing: Hashing, key_tag_pattern: Option<&str>) -> AdaptorResult<Self> {
        if shards.is_empty() {
            return Err(AdaptorError::config("a shard ring needs at least one shard"));
        }

        let key_tag = key_tag_pattern.map(Regex::new).transpose()?;
        let mut points = BTreeMap::new();

        for (index, shard) in shards.iter().enumerate() {
            if shard.weight == 0 {
                return Err(AdaptorError::config(format!("shard {} has weight 0", index)));
            }
            for n in 0..VIRTUAL_NODES * shard.weight {
                let node = match &shard.name {
                    Some(name) => format!("{}*{}{}", name, shard.weight, n),
                    None => format!("SHARD-{}-NODE-{}", index, n),
                };
                points.insert(hashing.hash(node.as_bytes()), index);
            }
        }

        Ok(Self {
            points,
            shard_count: shards.len(),
            hashing,
            key_tag,
        })
    }

    /// Shard index owning `key`.
    pub fn route(&self, key: &[u8]) -> usize {
        if self.shard_count == 1 {
            return 0;
        }
        let hash = self.hashing.hash(&self.key_tag(key));
        self.points
            .range(hash..)
            .next()
            .or_else(|| self.points.iter().next())
            .map(|(_, index)| *index)
            .unwrap_or(0)
    }

    /// The part of `key` that is hashed: the first capture of the key tag pattern, or the whole key.
    pub fn key_tag<'a>(&self, key: &'a [u8]) -> Cow<'a, [u8]> {
        match &self.key_tag {
            Some(re) => match re.captures(key).and_then(|caps| caps.get(1)) {
                Some(tag) => Cow::Owned(tag.as_bytes().to_vec()),
                None => Cow::Borrowed(key),
            },
            None => Cow::Borrowed(key),
        }
    }

    #[inline]
    pub fn shard_count(&self) -> usize {
        self.shard_count
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn hashing(&self) -> Hashing {
        self.hashing
    }
}
