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
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{lenient_uuid, null_as_default, timestamp, Action};

wire_enum! {
    pub enum ConferenceType {
        Conference => "conference",
        Connect => "connect",
        Queue => "queue",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conference {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[serde(rename = "type")]
    pub conference_type: ConferenceType,
    #[serde(deserialize_with = "lenient_uuid")]
    pub flow_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub confbridge_id: Uuid,
    pub status: String,
    pub name: String,
    pub detail: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Map<String, Value>,
    /// Seconds until the conference is terminated. 0 means no limit.
    pub timeout: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub pre_actions: Vec<Action>,
    #[serde(deserialize_with = "null_as_default")]
    pub post_actions: Vec<Action>,
    #[serde(deserialize_with = "null_as_default")]
    pub conferencecall_ids: Vec<Uuid>,
    #[serde(deserialize_with = "lenient_uuid")]
    pub recording_id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub recording_ids: Vec<Uuid>,
    #[serde(deserialize_with = "lenient_uuid")]
    pub transcribe_id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub transcribe_ids: Vec<Uuid>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_end: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}
