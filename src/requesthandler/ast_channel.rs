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

//! Channel operations of the Asterisk proxies.
//!
//! Each Asterisk instance is reached by means of its own request queue, see
//! [`QueueName::asterisk`]. The request URIs are the ones of the Asterisk REST Interface.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::models::{AriChannel, MuteDirection};
use crate::query::query_escape;
use crate::{QueueName, RequestMethod, Response, CONTENT_TYPE_JSON, CONTENT_TYPE_NONE};

use super::{
    check_deferrable_response, check_response, parse_response, RequestError, RequestHandler,
};

/// The Stasis application that channels are handed to.
pub const STASIS_APP: &str = "voipbin";

/// Operations on the channels of an Asterisk instance.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait AsteriskChannel: Send + Sync {
    async fn ast_channel_answer(&self, asterisk_id: &str, channel_id: &str)
        -> Result<(), RequestError>;

    /// Moves the channel back to the dialplan at the given location.
    async fn ast_channel_continue(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        context: &str,
        extension: &str,
        priority: i32,
        label: &str,
    ) -> Result<(), RequestError>;

    /// Hangs up the channel with the given Q.850 cause code.
    ///
    /// A non-zero `delay` defers the hangup by that many milliseconds.
    async fn ast_channel_hangup(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        cause: u16,
        delay: u64,
    ) -> Result<(), RequestError>;

    async fn ast_channel_variable_get(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        variable: &str,
    ) -> Result<String, RequestError>;

    async fn ast_channel_variable_set(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        variable: &str,
        value: &str,
    ) -> Result<(), RequestError>;

    async fn ast_channel_get(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<AriChannel, RequestError>;

    /// Indicates ringing to the channel.
    async fn ast_channel_ring(&self, asterisk_id: &str, channel_id: &str)
        -> Result<(), RequestError>;

    async fn ast_channel_hold_on(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError>;

    async fn ast_channel_hold_off(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError>;

    async fn ast_channel_music_on_hold_on(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError>;

    async fn ast_channel_music_on_hold_off(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError>;

    async fn ast_channel_silence_on(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError>;

    async fn ast_channel_silence_off(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError>;

    async fn ast_channel_mute_on(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        direction: MuteDirection,
    ) -> Result<(), RequestError>;

    async fn ast_channel_mute_off(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        direction: MuteDirection,
    ) -> Result<(), RequestError>;
}

#[derive(Serialize)]
struct ContinueRequest<'a> {
    context: &'a str,
    extension: &'a str,
    priority: i32,
    label: &'a str,
}

#[derive(Serialize)]
struct HangupRequest {
    reason_code: String,
}

#[derive(Serialize)]
struct VariableSetRequest<'a> {
    variable: &'a str,
    value: &'a str,
}

#[derive(Deserialize)]
struct VariableResponse {
    #[serde(default)]
    value: String,
}

#[derive(Serialize)]
struct MuteRequest {
    direction: MuteDirection,
}

impl RequestHandler {
    /// Sends a request to the proxy of an Asterisk instance.
    ///
    /// # Arguments
    ///
    /// * `asterisk_id` - The instance's identifier, usually its MAC address.
    /// * `resource` - The tag to record the request's latency under.
    /// * `timeout` - The number of milliseconds to wait for the reply. A value of 0
    ///   means the handler's default timeout.
    /// * `delay` - The number of milliseconds to defer delivery of the request by.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_request_ast(
        &self,
        asterisk_id: &str,
        uri: &str,
        method: RequestMethod,
        resource: &str,
        timeout: u64,
        delay: u64,
        data_type: &str,
        data: Option<Bytes>,
    ) -> Result<Option<Response>, RequestError> {
        let mut request = self.new_request(uri, method).with_data_type(data_type);
        request.data = data;
        self.dispatch(
            QueueName::asterisk(asterisk_id).as_str(),
            resource,
            request,
            self.timeout_or_default(timeout),
            delay,
        )
        .await
    }

    async fn ast_channel_command<T>(
        &self,
        asterisk_id: &str,
        uri: &str,
        method: RequestMethod,
        resource: &str,
        body: Option<&T>,
    ) -> Result<(), RequestError>
    where
        T: Serialize + Sync,
    {
        let (data_type, data) = match body {
            Some(body) => (CONTENT_TYPE_JSON, Some(Bytes::from(serde_json::to_vec(body)?))),
            None => (CONTENT_TYPE_NONE, None),
        };
        let response = self
            .send_request_ast(asterisk_id, uri, method, resource, 0, 0, data_type, data)
            .await?;
        check_response(response)
    }
}

#[async_trait]
impl AsteriskChannel for RequestHandler {
    async fn ast_channel_answer(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError> {
        self.ast_channel_command::<()>(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/answer"),
            RequestMethod::Post,
            "ast/channels/answer",
            None,
        )
        .await
    }

    async fn ast_channel_continue(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        context: &str,
        extension: &str,
        priority: i32,
        label: &str,
    ) -> Result<(), RequestError> {
        self.ast_channel_command(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/continue"),
            RequestMethod::Post,
            "ast/channels/continue",
            Some(&ContinueRequest {
                context,
                extension,
                priority,
                label,
            }),
        )
        .await
    }

    async fn ast_channel_hangup(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        cause: u16,
        delay: u64,
    ) -> Result<(), RequestError> {
        let data = serde_json::to_vec(&HangupRequest {
            reason_code: cause.to_string(),
        })?;
        let response = self
            .send_request_ast(
                asterisk_id,
                &format!("/ari/channels/{channel_id}"),
                RequestMethod::Delete,
                "ast/channels/hangup",
                0,
                delay,
                CONTENT_TYPE_JSON,
                Some(Bytes::from(data)),
            )
            .await?;
        check_deferrable_response(response, delay)
    }

    async fn ast_channel_variable_get(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        variable: &str,
    ) -> Result<String, RequestError> {
        let uri = format!(
            "/ari/channels/{channel_id}/variable?variable={}",
            query_escape(variable)
        );
        let response = self
            .send_request_ast(
                asterisk_id,
                &uri,
                RequestMethod::Get,
                "ast/channels/var",
                0,
                0,
                CONTENT_TYPE_JSON,
                None,
            )
            .await?;
        let res: VariableResponse = parse_response(response)?;
        Ok(res.value)
    }

    async fn ast_channel_variable_set(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        variable: &str,
        value: &str,
    ) -> Result<(), RequestError> {
        self.ast_channel_command(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/variable"),
            RequestMethod::Post,
            "ast/channels/var",
            Some(&VariableSetRequest { variable, value }),
        )
        .await
    }

    async fn ast_channel_get(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<AriChannel, RequestError> {
        let response = self
            .send_request_ast(
                asterisk_id,
                &format!("/ari/channels/{channel_id}"),
                RequestMethod::Get,
                "ast/channels",
                0,
                0,
                CONTENT_TYPE_JSON,
                None,
            )
            .await?;
        parse_response(response)
    }

    async fn ast_channel_ring(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError> {
        let response = self
            .send_request_ast(
                asterisk_id,
                &format!("/ari/channels/{channel_id}/ring"),
                RequestMethod::Post,
                "ast/channels/ring",
                0,
                0,
                CONTENT_TYPE_JSON,
                None,
            )
            .await?;
        check_response(response)
    }

    async fn ast_channel_hold_on(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError> {
        self.ast_channel_command::<()>(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/hold"),
            RequestMethod::Post,
            "ast/channels/hold",
            None,
        )
        .await
    }

    async fn ast_channel_hold_off(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError> {
        self.ast_channel_command::<()>(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/hold"),
            RequestMethod::Delete,
            "ast/channels/hold",
            None,
        )
        .await
    }

    async fn ast_channel_music_on_hold_on(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError> {
        self.ast_channel_command::<()>(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/moh"),
            RequestMethod::Post,
            "ast/channels/moh",
            None,
        )
        .await
    }

    async fn ast_channel_music_on_hold_off(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError> {
        self.ast_channel_command::<()>(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/moh"),
            RequestMethod::Delete,
            "ast/channels/moh",
            None,
        )
        .await
    }

    async fn ast_channel_silence_on(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError> {
        self.ast_channel_command::<()>(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/silence"),
            RequestMethod::Post,
            "ast/channels/silence",
            None,
        )
        .await
    }

    async fn ast_channel_silence_off(
        &self,
        asterisk_id: &str,
        channel_id: &str,
    ) -> Result<(), RequestError> {
        self.ast_channel_command::<()>(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/silence"),
            RequestMethod::Delete,
            "ast/channels/silence",
            None,
        )
        .await
    }

    async fn ast_channel_mute_on(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        direction: MuteDirection,
    ) -> Result<(), RequestError> {
        self.ast_channel_command(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/mute"),
            RequestMethod::Post,
            "ast/channels/mute",
            Some(&MuteRequest { direction }),
        )
        .await
    }

    async fn ast_channel_mute_off(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        direction: MuteDirection,
    ) -> Result<(), RequestError> {
        self.ast_channel_command(
            asterisk_id,
            &format!("/ari/channels/{channel_id}/mute"),
            RequestMethod::Delete,
            "ast/channels/mute",
            Some(&MuteRequest { direction }),
        )
        .await
    }
}
