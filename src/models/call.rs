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

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{lenient_uuid, null_as_default, timestamp, Action, Address, RingMethod};

wire_enum! {
    pub enum CallStatus {
        Dialing => "dialing",
        Ringing => "ringing",
        Progressing => "progressing",
        Terminating => "terminating",
        Canceling => "canceling",
        Hangup => "hangup",
    }
}

wire_enum! {
    /// The audio direction(s) to mute.
    pub enum MuteDirection {
        Both => "both",
        In => "in",
        Out => "out",
    }
}

wire_enum! {
    /// The audio direction(s) an external media stream covers.
    pub enum MediaDirection {
        Both => "both",
        In => "in",
        Out => "out",
    }
}

/// A single call leg.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Call {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub owner_type: String,
    #[serde(deserialize_with = "lenient_uuid")]
    pub owner_id: Uuid,

    pub channel_id: String,
    pub bridge_id: String,

    #[serde(deserialize_with = "lenient_uuid")]
    pub flow_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub activeflow_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub confbridge_id: Uuid,

    #[serde(rename = "type")]
    pub call_type: String,

    #[serde(deserialize_with = "lenient_uuid")]
    pub master_call_id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub chained_call_ids: Vec<Uuid>,
    #[serde(deserialize_with = "lenient_uuid")]
    pub recording_id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub recording_ids: Vec<Uuid>,
    #[serde(deserialize_with = "lenient_uuid")]
    pub external_media_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub groupcall_id: Uuid,

    pub source: Address,
    pub destination: Address,

    pub status: CallStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub data: HashMap<String, String>,
    pub action: Action,
    pub action_next_hold: bool,
    pub direction: String,
    pub mute_direction: MuteDirection,

    pub hangup_by: String,
    pub hangup_reason: String,

    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_ringing: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_progressing: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_hangup: Option<DateTime<Utc>>,

    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}

/// A set of calls dialed together, of which the first to answer wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Groupcall {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub owner_type: String,
    #[serde(deserialize_with = "lenient_uuid")]
    pub owner_id: Uuid,
    pub status: String,
    #[serde(deserialize_with = "lenient_uuid")]
    pub flow_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub master_call_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub master_groupcall_id: Uuid,
    pub source: Address,
    #[serde(deserialize_with = "null_as_default")]
    pub destinations: Vec<Address>,
    #[serde(deserialize_with = "null_as_default")]
    pub call_ids: Vec<Uuid>,
    #[serde(deserialize_with = "null_as_default")]
    pub groupcall_ids: Vec<Uuid>,
    pub ring_method: RingMethod,
    pub answer_method: String,
    #[serde(deserialize_with = "lenient_uuid")]
    pub answer_call_id: Uuid,
    pub call_count: u64,
    pub groupcall_count: u64,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}
