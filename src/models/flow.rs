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
use serde_json::Value;
use uuid::Uuid;

use super::{lenient_uuid, null_as_default, timestamp};

/// A step of a flow.
///
/// The option's layout depends on the action's type and is kept as a JSON value.
///
/// ```rust
/// use requesthandler::models::Action;
///
/// assert_eq!(
///     serde_json::to_string(&Action::new("answer")).unwrap(),
///     r#"{"id":"00000000-0000-0000-0000-000000000000","next_id":"00000000-0000-0000-0000-000000000000","type":"answer"}"#
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    #[serde(deserialize_with = "lenient_uuid")]
    pub id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub next_id: Uuid,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<Value>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_execute: Option<DateTime<Utc>>,
}

impl Action {
    pub fn new(action_type: impl Into<String>) -> Self {
        Action {
            action_type: action_type.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flow {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[serde(rename = "type")]
    pub flow_type: String,
    pub name: String,
    pub detail: String,
    pub persist: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub actions: Vec<Action>,
    #[serde(deserialize_with = "lenient_uuid")]
    pub on_complete_flow_id: Uuid,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}
