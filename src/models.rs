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

//! Entities exchanged with the services of the mesh.
//!
//! The structs mirror the JSON documents the services send. All fields are optional
//! on the wire: missing fields, `null` lists and empty strings in place of
//! identifiers or timestamps decode to the field's default value.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

// Enums of string tokens where an empty string means "not set".
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $value:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            #[default]
            #[serde(rename = "")]
            None,
            $(
                $(#[$variant_meta])*
                #[serde(rename = $value)]
                $variant,
            )*
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::None => "",
                    $($name::$variant => $value,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

mod activeflow;
mod address;
mod agent;
mod aicall;
mod call;
mod campaign;
mod channel;
mod conference;
mod customer;
mod extension;
mod flow;
mod number;
mod queue;
mod queuecall;
mod talk;
pub(crate) mod timestamp;

pub use activeflow::{Activeflow, ActiveflowStatus};
pub use address::{Address, AddressType};
pub use agent::{Agent, AgentStatus, Permission, RingMethod};
pub use aicall::{AIcall, ToolFunction};
pub use call::{Call, CallStatus, Groupcall, MediaDirection, MuteDirection};
pub use campaign::{Campaign, CampaignEndHandle, CampaignExecute, CampaignStatus, CampaignType};
pub use channel::{AriChannel, CallerId, DialplanCep};
pub use conference::{Conference, ConferenceType};
pub use customer::Customer;
pub use extension::Extension;
pub use flow::{Action, Flow};
pub use number::Number;
pub use queue::{Queue, QueueExecute, RoutingMethod};
pub use queuecall::Queuecall;
pub use talk::Message;

/// Decodes `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes an identifier, mapping `null` and the empty string to the nil UUID.
pub(crate) fn lenient_uuid<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.is_empty() => {
            Uuid::parse_str(&value).map_err(serde::de::Error::custom)
        }
        _ => Ok(Uuid::nil()),
    }
}
