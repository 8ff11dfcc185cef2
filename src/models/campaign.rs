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
    /// What a campaign dials its targets for.
    pub enum CampaignType {
        Call => "call",
        Flow => "flow",
    }
}

wire_enum! {
    pub enum CampaignExecute {
        Run => "run",
        Stop => "stop",
    }
}

wire_enum! {
    pub enum CampaignStatus {
        Stop => "stop",
        Stopping => "stopping",
        Run => "run",
    }
}

wire_enum! {
    /// What a campaign does once its outplan has no more targets to dial.
    pub enum CampaignEndHandle {
        Stop => "stop",
        Continue => "continue",
    }
}

/// An outbound dialing campaign.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Campaign {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    pub execute: CampaignExecute,
    pub name: String,
    pub detail: String,
    pub status: CampaignStatus,
    /// Percentage of dialed calls relative to the available agents.
    pub service_level: i32,
    pub end_handle: CampaignEndHandle,
    #[serde(deserialize_with = "lenient_uuid")]
    pub flow_id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub actions: Vec<Action>,
    #[serde(deserialize_with = "lenient_uuid")]
    pub outplan_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub outdial_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub queue_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub next_campaign_id: Uuid,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}
