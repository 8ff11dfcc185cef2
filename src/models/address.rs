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

use serde::{Deserialize, Serialize};

wire_enum! {
    /// The kind of endpoint an [`Address`] refers to.
    pub enum AddressType {
        Agent => "agent",
        Conference => "conference",
        Email => "email",
        Extension => "extension",
        Line => "line",
        Sip => "sip",
        Tel => "tel",
    }
}

/// An endpoint of a call, message or agent.
///
/// The descriptive fields are only sent if set.
///
/// ```rust
/// use requesthandler::models::Address;
///
/// let address = Address::tel("+821021656521");
/// assert_eq!(
///     serde_json::to_string(&address).unwrap(),
///     r#"{"type":"tel","target":"+821021656521"}"#
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(rename = "type")]
    pub address_type: AddressType,
    pub target: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl Address {
    pub fn new(address_type: AddressType, target: impl Into<String>) -> Self {
        Address {
            address_type,
            target: target.into(),
            ..Default::default()
        }
    }

    /// Creates the address of a telephone number.
    pub fn tel(number: impl Into<String>) -> Self {
        Address::new(AddressType::Tel, number)
    }
}
