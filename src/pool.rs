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
//! r2d2 pooling of [`RedisAdaptor`]s.
//!
//! A pooled sharded adaptor holds one connection per shard; all of them share one
//! [`ShardRing`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::adaptor::RedisAdaptor;
use crate::config::{AdaptorConfig, PoolConfig, ShardInfo};
use crate::connection::{ClientConnector, Connector, ShardedConnection};
use crate::errors::{AdaptorError, AdaptorResult};
use crate::sharding::{Hashing, ShardRing};

enum Layout<T> {
    Single(T),
    Sharded {
        shards: Vec<(ShardInfo, T)>,
        ring: Arc<ShardRing>,
    },
}

/// Creates, validates and discards adaptors on behalf of an `r2d2::Pool`.
pub struct AdaptorConnectionManager<T: Connector = ClientConnector> {
    layout: Layout<T>,
}

impl<T: Connector> AdaptorConnectionManager<T> {
    pub fn single(connector: T) -> Self {
        Self {
            layout: Layout::Single(connector),
        }
    }

    /// `shards` must be listed in the order `ring` was built from.
    pub fn sharded(shards: Vec<(ShardInfo, T)>, ring: ShardRing) -> AdaptorResult<Self> {
        if shards.len() != ring.shard_count() {
            return Err(AdaptorError::config(format!(
                "ring was built for {} shards but {} connectors were supplied",
                ring.shard_count(),
                shards.len()
            )));
        }
        Ok(Self {
            layout: Layout::Sharded {
                shards,
                ring: Arc::new(ring),
            },
        })
    }

    #[inline]
    pub fn is_sharded(&self) -> bool {
        matches!(self.layout, Layout::Sharded { .. })
    }
}

impl AdaptorConnectionManager<ClientConnector> {
    pub fn from_config(config: &AdaptorConfig) -> AdaptorResult<Self> {
        let timeout = config.socket_timeout();
        if !config.is_sharded() {
            return Ok(Self::single(ClientConnector::open(&config.url, timeout)?));
        }

        let ring = ShardRing::new(&config.shards, config.hashing, config.key_tag_pattern.as_deref())?;
        let shards = config
            .shards
            .iter()
            .map(|info| Ok((info.clone(), ClientConnector::open(&info.url, timeout)?)))
            .collect::<AdaptorResult<Vec<_>>>()?;
        Self::sharded(shards, ring)
    }
}

impl<T: Connector> r2d2::ManageConnection for AdaptorConnectionManager<T> {
    type Connection = RedisAdaptor<T::Connection>;
    type Error = AdaptorError;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        match &self.layout {
            Layout::Single(connector) => {
                let conn = connector.connect()?;
                debug!(addr = %connector.describe(), "adaptor connection created");
                Ok(RedisAdaptor::single(conn))
            }
            Layout::Sharded { shards, ring } => {
                let mut conns = Vec::with_capacity(shards.len());
                for (info, connector) in shards {
                    conns.push((info.clone(), connector.connect()?));
                }
                debug!(shards = conns.len(), "sharded adaptor connection created");
                Ok(RedisAdaptor::sharded(ShardedConnection::new(conns, ring.clone())?))
            }
        }
    }

    fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        conn.ping_all().map_err(|e| {
            warn!(error = %e, "pooled adaptor failed validation");
            e
        })
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        !conn.is_open()
    }
}

/// An `r2d2::Pool` sized and tuned from `config`.
pub(crate) fn build_pool<M: r2d2::ManageConnection>(manager: M, config: &PoolConfig) -> AdaptorResult<r2d2::Pool<M>> {
    Ok(r2d2::Pool::builder()
        .max_size(config.max_size)
        .min_idle(config.min_idle)
        .connection_timeout(config.connection_timeout())
        .idle_timeout(config.idle_timeout())
        .test_on_check_out(config.test_on_borrow)
        .build(manager)?)
}

pub type PooledAdaptor<T = ClientConnector> = r2d2::PooledConnection<AdaptorConnectionManager<T>>;

/// Pool of [`RedisAdaptor`]s, single or sharded.
pub struct AdaptorPool<T: Connector = ClientConnector> {
    pool: r2d2::Pool<AdaptorConnectionManager<T>>,
    sharded: bool,
}

impl<T: Connector> Clone for AdaptorPool<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            sharded: self.sharded,
        }
    }
}

impl AdaptorPool<ClientConnector> {
    pub fn single(url: &str) -> AdaptorResult<Self> {
        Self::from_config(&AdaptorConfig::single_server(url))
    }

    pub fn sharded(shards: Vec<ShardInfo>) -> AdaptorResult<Self> {
        Self::from_config(&AdaptorConfig::sharded(shards))
    }

    pub fn from_config(config: &AdaptorConfig) -> AdaptorResult<Self> {
        config.validate()?;
        let manager = AdaptorConnectionManager::from_config(config)?;
        Self::with_manager(manager, &config.pool)
    }
}

impl<T: Connector> AdaptorPool<T> {
    pub fn with_connector(connector: T, pool: &PoolConfig) -> AdaptorResult<Self> {
        Self::with_manager(AdaptorConnectionManager::single(connector), pool)
    }

    /// Sharded pool over caller supplied connectors, in ring order.
    pub fn with_connectors(
        shards: Vec<(ShardInfo, T)>,
        hashing: Hashing,
        key_tag_pattern: Option<&str>,
        pool: &PoolConfig,
    ) -> AdaptorResult<Self> {
        let infos: Vec<ShardInfo> = shards.iter().map(|(info, _)| info.clone()).collect();
        let ring = ShardRing::new(&infos, hashing, key_tag_pattern)?;
        Self::with_manager(AdaptorConnectionManager::sharded(shards, ring)?, pool)
    }

    pub fn with_manager(manager: AdaptorConnectionManager<T>, config: &PoolConfig) -> AdaptorResult<Self> {
        let sharded = manager.is_sharded();
        let pool = build_pool(manager, config)?;
        Ok(Self { pool, sharded })
    }

    /// Checks an adaptor out, waiting up to the configured connection timeout.
    pub fn get_resource(&self) -> AdaptorResult<PooledAdaptor<T>> {
        Ok(self.pool.get()?)
    }

    /// Checks an adaptor out only if one is idle right now.
    pub fn try_get_resource(&self) -> Option<PooledAdaptor<T>> {
        self.pool.try_get()
    }

    #[inline]
    pub fn state(&self) -> r2d2::State {
        self.pool.state()
    }

    #[inline]
    pub fn is_sharded(&self) -> bool {
        self.sharded
    }
}
