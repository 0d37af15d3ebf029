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
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{AdaptorError, AdaptorResult};

/// Joins a JSON value and its map field inside one set member: `<json>^<field>`.
pub const MAP_ENTRY_SEPARATOR: char = '^';

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> AdaptorResult<String> {
    serde_json::to_string(value).map_err(|e| AdaptorError::SerializationError(e.to_string()))
}

pub fn from_json<T: DeserializeOwned>(json: &str) -> AdaptorResult<T> {
    serde_json::from_str(json).map_err(|e| AdaptorError::DeserializationError(e.to_string()))
}

pub fn encode_map_entry<V: Serialize + ?Sized>(field: &str, value: &V) -> AdaptorResult<String> {
    if field.contains(MAP_ENTRY_SEPARATOR) {
        return Err(AdaptorError::invalid_argument(format!(
            "map field {:?} contains the reserved separator '{}'",
            field, MAP_ENTRY_SEPARATOR
        )));
    }
    Ok(format!("{}{}{}", to_json(value)?, MAP_ENTRY_SEPARATOR, field))
}

/// Splits on the last separator, so the JSON part may itself contain `^`.
pub fn decode_map_entry<V: DeserializeOwned>(member: &str) -> AdaptorResult<(String, V)> {
    let (json, field) = member.rsplit_once(MAP_ENTRY_SEPARATOR).ok_or_else(|| {
        AdaptorError::DeserializationError(format!("map entry without separator: {}", member))
    })?;
    Ok((field.to_string(), from_json(json)?))
}
