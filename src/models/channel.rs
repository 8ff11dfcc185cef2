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
//! Channel documents as returned by the Asterisk REST interface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallerId {
    pub name: String,
    pub number: String,
}

/// The dialplan location a channel is executing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialplanCep {
    pub context: String,
    pub exten: String,
    pub priority: i64,
    pub app_name: String,
    pub app_data: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AriChannel {
    pub id: String,
    pub name: String,
    pub state: String,
    pub caller: CallerId,
    pub connected: CallerId,
    pub accountcode: String,
    pub dialplan: DialplanCep,
    /// Creation time as formatted by Asterisk, e.g. `2020-04-25T00:27:18.341+0000`.
    pub creationtime: String,
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub channelvars: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ari_channel() {
        let channel: AriChannel = serde_json::from_str(
            r#"{"id":"1587774438.2390","name":"PJSIP/in-voipbin-00000948","state":"Ring","caller":{"name":"","number":"7trwe"},"connected":{"name":"","number":""},"accountcode":"","dialplan":{"context":"in-voipbin","exten":"011441332323027","priority":2,"app_name":"Stasis","app_data":"voipbin,CONTEXT=in-voipbin"},"creationtime":"2020-04-25T00:27:18.341+0000","channelvars":null,"language":"en"}"#,
        )
        .unwrap();

        assert_eq!(channel.caller.number, "7trwe");
        assert_eq!(channel.dialplan.priority, 2);
        assert_eq!(channel.dialplan.app_name, "Stasis");
        assert!(channel.channelvars.is_empty());
    }
}
