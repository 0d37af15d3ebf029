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
use thiserror::Error;

pub type AdaptorResult<T> = Result<T, AdaptorError>;

#[derive(Debug, Error)]
pub enum AdaptorError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("{command} {reason}")]
    Unsupported { command: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AdaptorError {
    /// The command needs a single node (or spans keys that may live on different shards).
    pub fn unsupported_sharded(command: impl Into<String>) -> Self {
        Self::Unsupported {
            command: command.into(),
            reason: "is not supported if sharded.".to_string(),
        }
    }

    /// The command only makes sense against a sharded backend.
    pub fn unsupported_single(command: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Unsupported {
            command: command.into(),
            reason: hint.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

impl From<figment::Error> for AdaptorError {
    fn from(e: figment::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

impl From<regex::Error> for AdaptorError {
    fn from(e: regex::Error) -> Self {
        Self::ConfigError(format!("invalid key tag pattern: {}", e))
    }
}
