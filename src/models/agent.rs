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

use super::{null_as_default, timestamp, Address};

wire_enum! {
    /// How the addresses of an agent are rung.
    pub enum RingMethod {
        RingAll => "ringall",
        Linear => "linear",
    }
}

wire_enum! {
    pub enum AgentStatus {
        Available => "available",
        Away => "away",
        Busy => "busy",
        Offline => "offline",
        Ringing => "ringing",
    }
}

/// A set of permission flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(pub u64);

impl Permission {
    pub const NONE: Permission = Permission(0);
    pub const CUSTOMER_ADMIN: Permission = Permission(0x20);

    /// Checks if all flags of `other` are set in this permission.
    pub fn contains(&self, other: Permission) -> bool {
        self.0 & other.0 == other.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agent {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password_hash: String,
    pub name: String,
    pub detail: String,
    pub ring_method: RingMethod,
    pub status: AgentStatus,
    pub permission: Permission,
    #[serde(deserialize_with = "null_as_default")]
    pub tag_ids: Vec<Uuid>,
    #[serde(deserialize_with = "null_as_default")]
    pub addresses: Vec<Address>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}
