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
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{lenient_uuid, timestamp};

/// A call or conversation driven by an AI.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AIcall {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub ai_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub activeflow_id: Uuid,
    pub reference_type: String,
    #[serde(deserialize_with = "lenient_uuid")]
    pub reference_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub confbridge_id: Uuid,
    pub status: String,
    pub gender: String,
    pub language: String,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_end: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}

/// A function call requested by the AI, with its arguments as a JSON encoded string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFunction {
    pub name: String,
    pub arguments: String,
}
