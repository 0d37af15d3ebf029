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
use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::errors::{AdaptorError, AdaptorResult};
use crate::sharding::Hashing;

/// Hash tag convention shared with Redis Cluster: `user:{42}:profile` hashes as `42`.
pub const DEFAULT_KEY_TAG_PATTERN: &str = r"\{(.+?)\}";

pub const DEFAULT_URL: &str = "redis://127.0.0.1:6379";

/// Deployment mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedisMode {
    #[default]
    Single,
    Sharded,
}

/// One independent server taking part in client-side sharding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardInfo {
    pub url: String,
    /// Ring identity. Unnamed shards are placed by their position in the list.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl ShardInfo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            weight: default_weight(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_max_size")]
    pub max_size: u32,
    /// Connections kept open while idle. `None` means `max_size`, filled eagerly when the
    /// pool is built.
    #[serde(default = "default_min_idle")]
    pub min_idle: Option<u32>,
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
    #[serde(default)]
    pub idle_timeout_ms: Option<u64>,
    #[serde(default = "default_test_on_borrow")]
    pub test_on_borrow: bool,
}

fn default_max_size() -> u32 {
    8
}

fn default_min_idle() -> Option<u32> {
    Some(0)
}

fn default_connection_timeout_ms() -> u64 {
    30_000
}

fn default_test_on_borrow() -> bool {
    true
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            min_idle: default_min_idle(),
            connection_timeout_ms: default_connection_timeout_ms(),
            idle_timeout_ms: None,
            test_on_borrow: default_test_on_borrow(),
        }
    }
}

impl PoolConfig {
    #[inline]
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    #[inline]
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptorConfig {
    #[serde(default)]
    pub mode: RedisMode,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub shards: Vec<ShardInfo>,
    #[serde(default)]
    pub hashing: Hashing,
    #[serde(default)]
    pub key_tag_pattern: Option<String>,
    /// Connect, read and write timeout applied to every server connection.
    #[serde(default)]
    pub socket_timeout_ms: Option<u64>,
    #[serde(default)]
    pub pool: PoolConfig,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

impl Default for AdaptorConfig {
    fn default() -> Self {
        Self::single_server(DEFAULT_URL)
    }
}

impl AdaptorConfig {
    pub fn single_server(url: impl Into<String>) -> Self {
        Self {
            mode: RedisMode::Single,
            url: url.into(),
            shards: Vec::new(),
            hashing: Hashing::default(),
            key_tag_pattern: None,
            socket_timeout_ms: None,
            pool: PoolConfig::default(),
        }
    }

    pub fn sharded(shards: Vec<ShardInfo>) -> Self {
        Self {
            mode: RedisMode::Sharded,
            shards,
            ..Self::single_server(DEFAULT_URL)
        }
    }

    pub fn with_pool_size(mut self, max_size: u32) -> Self {
        self.pool.max_size = max_size;
        self
    }

    pub fn with_min_idle(mut self, min_idle: u32) -> Self {
        self.pool.min_idle = Some(min_idle);
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.pool.connection_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool.idle_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_test_on_borrow(mut self, enabled: bool) -> Self {
        self.pool.test_on_borrow = enabled;
        self
    }

    pub fn with_socket_timeout(mut self, timeout: Duration) -> Self {
        self.socket_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_hashing(mut self, hashing: Hashing) -> Self {
        self.hashing = hashing;
        self
    }

    pub fn with_key_tag_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.key_tag_pattern = Some(pattern.into());
        self
    }

    #[inline]
    pub fn socket_timeout(&self) -> Option<Duration> {
        self.socket_timeout_ms.map(Duration::from_millis)
    }

    #[inline]
    pub fn is_sharded(&self) -> bool {
        self.mode == RedisMode::Sharded
    }

    /// Load from a TOML file overlaid with `REDIS_ADAPTOR_*` environment variables.
    ///
    /// Nested keys use a double underscore: `REDIS_ADAPTOR_POOL__MAX_SIZE=16`.
    /// A missing file is not an error, so the environment alone can configure the adaptor.
    pub fn load(path: impl AsRef<Path>) -> AdaptorResult<Self> {
        let config: Self = Figment::from(figment::providers::Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("REDIS_ADAPTOR_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AdaptorResult<()> {
        if self.pool.max_size == 0 {
            return Err(AdaptorError::config("pool.max_size must be greater than 0"));
        }
        if let Some(min_idle) = self.pool.min_idle {
            if min_idle > self.pool.max_size {
                return Err(AdaptorError::config(format!(
                    "pool.min_idle ({}) exceeds pool.max_size ({})",
                    min_idle, self.pool.max_size
                )));
            }
        }

        match self.mode {
            RedisMode::Single => {
                if self.url.trim().is_empty() {
                    return Err(AdaptorError::config("url is required in single mode"));
                }
            }
            RedisMode::Sharded => {
                if self.shards.is_empty() {
                    return Err(AdaptorError::config("sharded mode needs at least one shard"));
                }
                for (index, shard) in self.shards.iter().enumerate() {
                    if shard.weight == 0 {
                        return Err(AdaptorError::config(format!(
                            "shard {} ({}) has weight 0",
                            index, shard.url
                        )));
                    }
                    if shard.url.trim().is_empty() {
                        return Err(AdaptorError::config(format!("shard {} has an empty url", index)));
                    }
                }
            }
        }

        if let Some(pattern) = &self.key_tag_pattern {
            regex::Regex::new(pattern)?;
        }

        Ok(())
    }
}
