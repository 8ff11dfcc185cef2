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

/// A purchased telephone number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Number {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// The number in E.164 format.
    pub number: String,
    #[serde(deserialize_with = "lenient_uuid")]
    pub call_flow_id: Uuid,
    #[serde(deserialize_with = "lenient_uuid")]
    pub message_flow_id: Uuid,
    pub name: String,
    pub detail: String,
    pub provider_name: String,
    pub provider_reference_id: String,
    pub status: String,
    pub t38_enabled: bool,
    pub emergency_enabled: bool,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_purchase: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_renew: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_create: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_update: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub tm_delete: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_number_with_unset_flows() {
        let number: Number = serde_json::from_str(
            r#"{"id":"3e4d7e4c-7bd1-11eb-a09b-1f8a71b7d3f5","number":"+821100000001","call_flow_id":"","message_flow_id":"00000000-0000-0000-0000-000000000000","t38_enabled":true,"tm_renew":"2021-02-26 18:26:49.000"}"#,
        )
        .unwrap();

        assert_eq!(number.number, "+821100000001");
        assert!(number.call_flow_id.is_nil());
        assert!(number.t38_enabled);
        assert!(number.tm_renew.is_some());
    }
}
