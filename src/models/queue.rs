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

use super::{null_as_default, timestamp, Action};

wire_enum! {
    /// How a waiting call is matched with an agent.
    pub enum RoutingMethod {
        Random => "random",
    }
}

wire_enum! {
    /// Whether the queue is dispatching waiting calls.
    pub enum QueueExecute {
        Run => "run",
        Stop => "stop",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Queue {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub detail: String,
    pub routing_method: RoutingMethod,
    #[serde(deserialize_with = "null_as_default")]
    pub tag_ids: Vec<Uuid>,
    pub execute: QueueExecute,
    #[serde(deserialize_with = "null_as_default")]
    pub wait_actions: Vec<Action>,
    /// Milliseconds a call waits for an agent.
    pub wait_timeout: u64,
    /// Milliseconds a call may be served by an agent.
    pub service_timeout: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub wait_queuecall_ids: Vec<Uuid>,
    #[serde(deserialize_with = "null_as_default")]
    pub service_queuecall_ids: Vec<Uuid>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}
