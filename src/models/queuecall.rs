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

use super::{lenient_uuid, null_as_default, timestamp, Address, RoutingMethod};

/// A call waiting in, or being served by, a queue.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Queuecall {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub queue_id: Uuid,
    pub reference_type: String,
    #[serde(deserialize_with = "lenient_uuid")]
    pub reference_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub reference_activeflow_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub forward_action_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub exit_action_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub confbridge_id: Uuid,
    pub source: Address,
    pub routing_method: RoutingMethod,
    #[serde(deserialize_with = "null_as_default")]
    pub tag_ids: Vec<Uuid>,
    pub status: String,
    #[serde(deserialize_with = "lenient_uuid")]
    pub service_agent_id: Uuid,
    pub timeout_wait: u64,
    pub timeout_service: u64,
    pub duration_waiting: u64,
    pub duration_service: u64,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_service: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_end: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}
