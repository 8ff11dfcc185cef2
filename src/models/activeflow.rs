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

use super::{lenient_uuid, null_as_default, timestamp, Action};

wire_enum! {
    pub enum ActiveflowStatus {
        Running => "running",
        Ended => "ended",
    }
}

/// A running instance of a flow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activeflow {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub flow_id: Uuid,
    pub status: ActiveflowStatus,
    pub reference_type: String,
    #[serde(deserialize_with = "lenient_uuid")]
    pub reference_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub reference_activeflow_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub on_complete_flow_id: Uuid,
    pub current_action: Action,
    #[serde(deserialize_with = "lenient_uuid")]
    pub forward_action_id: Uuid,
    pub execute_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub executed_actions: Vec<Action>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}
