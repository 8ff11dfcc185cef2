/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

// Timestamps are written by the services in several layouts, and unset ones
// are sent as empty strings rather than being omitted.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use tracing::debug;

const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses a timestamp as sent by the services.
///
/// Timestamps without offset are taken to be UTC. An empty string yields `None`.
pub(crate) fn parse(value: &str) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    let mut last_error = None;
    for layout in NAIVE_LAYOUTS {
        match NaiveDateTime::parse_from_str(value, layout) {
            Ok(timestamp) => return Ok(Some(timestamp.and_utc())),
            Err(e) => last_error = Some(e),
        }
    }
    match last_error {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

/// Formats a timestamp the way the services expect it, e.g. `2021-02-26T18:26:49.000Z`.
pub(crate) fn format(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(timestamp) => serializer.serialize_str(&format(timestamp)),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    let Some(value) = value else {
        return Ok(None);
    };
    Ok(parse(&value).unwrap_or_else(|e| {
        debug!(value = value.as_str(), "Ignoring timestamp in unknown layout: {e}");
        None
    }))
}
