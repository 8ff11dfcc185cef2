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

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    null_as_default, timestamp, Action, Address, Call, Groupcall, MediaDirection, MuteDirection,
};
use crate::query::{page_uri, FieldFilters};
use crate::{QueueName, Request, RequestMethod, CONTENT_TYPE_JSON};

use super::{
    check_deferrable_response, check_response, parse_response, RequestError, RequestHandler,
};

const RESOURCE_CALLS: &str = "call/calls";

/// Timeout (in milliseconds) for listing calls, which may take a while on large accounts.
const LIST_TIMEOUT: u64 = 30_000;

/// Operations of the call-manager.
///
/// Operations which change the media of a call (hold, mute, music on hold, silence)
/// come in pairs of `_on` and `_off`.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait CallManager: Send + Sync {
    /// Asks the call-manager to check if a call is still alive.
    ///
    /// # Arguments
    ///
    /// * `delay` - The number of milliseconds to defer the check by.
    /// * `retry_count` - The number of checks that have failed so far.
    async fn call_v1_call_health(
        &self,
        call_id: Uuid,
        delay: u64,
        retry_count: u32,
    ) -> Result<(), RequestError>;

    /// Notifies the call-manager that an action of a call has timed out.
    ///
    /// The call-manager ignores the notification if the call has moved on to another action.
    async fn call_v1_call_action_timeout(
        &self,
        call_id: Uuid,
        delay: u64,
        action: &Action,
    ) -> Result<(), RequestError>;

    /// Makes a call continue with the next action of its flow.
    ///
    /// # Arguments
    ///
    /// * `force` - Whether to move on even if the current action has not finished yet.
    async fn call_v1_call_action_next(&self, call_id: Uuid, force: bool)
        -> Result<(), RequestError>;

    /// Creates outgoing calls to the given destinations.
    ///
    /// Destinations that stand for more than one endpoint (e.g. an agent with several
    /// addresses) result in groupcalls rather than calls.
    ///
    /// # Returns
    ///
    /// The created calls and groupcalls.
    #[allow(clippy::too_many_arguments)]
    async fn call_v1_calls_create(
        &self,
        customer_id: Uuid,
        flow_id: Uuid,
        master_call_id: Uuid,
        source: &Address,
        destinations: &[Address],
        early_execution: bool,
        connect: bool,
    ) -> Result<(Vec<Call>, Vec<Groupcall>), RequestError>;

    /// Creates a single outgoing call with a given ID.
    #[allow(clippy::too_many_arguments)]
    async fn call_v1_call_create_with_id(
        &self,
        call_id: Uuid,
        customer_id: Uuid,
        flow_id: Uuid,
        activeflow_id: Uuid,
        master_call_id: Uuid,
        source: &Address,
        destination: &Address,
        groupcall_id: Uuid,
        early_execution: bool,
        connect: bool,
    ) -> Result<Call, RequestError>;

    async fn call_v1_call_get(&self, call_id: Uuid) -> Result<Call, RequestError>;

    /// Gets a page of calls matching the given filters.
    async fn call_v1_call_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &FieldFilters,
    ) -> Result<Vec<Call>, RequestError>;

    async fn call_v1_call_add_chained_call(
        &self,
        call_id: Uuid,
        chained_call_id: Uuid,
    ) -> Result<Call, RequestError>;

    async fn call_v1_call_remove_chained_call(
        &self,
        call_id: Uuid,
        chained_call_id: Uuid,
    ) -> Result<Call, RequestError>;

    async fn call_v1_call_delete(&self, call_id: Uuid) -> Result<Call, RequestError>;

    async fn call_v1_call_hangup(&self, call_id: Uuid) -> Result<Call, RequestError>;

    /// Starts streaming the call's media to an external host.
    ///
    /// # Arguments
    ///
    /// * `external_host` - The `host:port` to stream to.
    /// * `encapsulation` - e.g. `rtp`
    /// * `transport` - e.g. `udp`
    /// * `connection_type` - `client` or `server`
    /// * `format` - The codec, e.g. `ulaw`
    #[allow(clippy::too_many_arguments)]
    async fn call_v1_call_external_media_start(
        &self,
        call_id: Uuid,
        external_media_id: Uuid,
        external_host: &str,
        encapsulation: &str,
        transport: &str,
        connection_type: &str,
        format: &str,
        direction_listen: MediaDirection,
        direction_speak: MediaDirection,
    ) -> Result<Call, RequestError>;

    async fn call_v1_call_external_media_stop(&self, call_id: Uuid)
        -> Result<Call, RequestError>;

    /// Gets the DTMF digits received on a call so far.
    async fn call_v1_call_get_digits(&self, call_id: Uuid) -> Result<String, RequestError>;

    async fn call_v1_call_send_digits(&self, call_id: Uuid, digits: &str)
        -> Result<(), RequestError>;

    /// Starts recording a call.
    ///
    /// # Arguments
    ///
    /// * `end_of_silence` - Milliseconds of silence after which the recording stops. 0 disables the check.
    /// * `end_of_key` - DTMF key that stops the recording.
    /// * `duration` - Maximum length of the recording in seconds.
    /// * `on_end_flow_id` - The flow to run once the recording has ended.
    async fn call_v1_call_recording_start(
        &self,
        call_id: Uuid,
        format: &str,
        end_of_silence: u64,
        end_of_key: &str,
        duration: u64,
        on_end_flow_id: Uuid,
    ) -> Result<Call, RequestError>;

    async fn call_v1_call_recording_stop(&self, call_id: Uuid) -> Result<Call, RequestError>;

    async fn call_v1_call_update_confbridge_id(
        &self,
        call_id: Uuid,
        confbridge_id: Uuid,
    ) -> Result<Call, RequestError>;

    /// Speaks a text to a call.
    ///
    /// The reply is sent once the text has been spoken, so `timeout` should cover the
    /// text's length.
    async fn call_v1_call_talk(
        &self,
        call_id: Uuid,
        text: &str,
        gender: &str,
        language: &str,
        timeout: u64,
    ) -> Result<(), RequestError>;

    async fn call_v1_call_play(
        &self,
        call_id: Uuid,
        media_urls: &[String],
    ) -> Result<(), RequestError>;

    /// Stops playing media or speaking text to a call.
    async fn call_v1_call_media_stop(&self, call_id: Uuid) -> Result<(), RequestError>;

    async fn call_v1_call_hold_on(&self, call_id: Uuid) -> Result<(), RequestError>;
    async fn call_v1_call_hold_off(&self, call_id: Uuid) -> Result<(), RequestError>;

    async fn call_v1_call_mute_on(
        &self,
        call_id: Uuid,
        direction: MuteDirection,
    ) -> Result<(), RequestError>;
    async fn call_v1_call_mute_off(
        &self,
        call_id: Uuid,
        direction: MuteDirection,
    ) -> Result<(), RequestError>;

    async fn call_v1_call_music_on_hold_on(&self, call_id: Uuid) -> Result<(), RequestError>;
    async fn call_v1_call_music_on_hold_off(&self, call_id: Uuid) -> Result<(), RequestError>;

    async fn call_v1_call_silence_on(&self, call_id: Uuid) -> Result<(), RequestError>;
    async fn call_v1_call_silence_off(&self, call_id: Uuid) -> Result<(), RequestError>;
}

#[derive(Serialize)]
struct HealthRequest {
    retry_count: u32,
}

#[derive(Serialize)]
struct ActionTimeoutRequest<'a> {
    action_id: Uuid,
    action_type: &'a str,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    tm_execute: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct ActionNextRequest {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    force: bool,
}

#[derive(Serialize)]
struct CallsCreateRequest<'a> {
    flow_id: Uuid,
    customer_id: Uuid,
    master_call_id: Uuid,
    source: &'a Address,
    destinations: &'a [Address],
    early_execution: bool,
    connect: bool,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct CallsCreateResponse {
    #[serde(deserialize_with = "null_as_default")]
    calls: Vec<Call>,
    #[serde(deserialize_with = "null_as_default")]
    groupcalls: Vec<Groupcall>,
}

#[derive(Serialize)]
struct CreateWithIdRequest<'a> {
    flow_id: Uuid,
    activeflow_id: Uuid,
    customer_id: Uuid,
    master_call_id: Uuid,
    source: &'a Address,
    destination: &'a Address,
    groupcall_id: Uuid,
    early_execution: bool,
    connect: bool,
}

#[derive(Serialize)]
struct ChainedCallIdRequest {
    chained_call_id: Uuid,
}

#[derive(Serialize)]
struct ExternalMediaRequest<'a> {
    external_media_id: Uuid,
    external_host: &'a str,
    encapsulation: &'a str,
    transport: &'a str,
    connection_type: &'a str,
    format: &'a str,
    direction_listen: MediaDirection,
    direction_speak: MediaDirection,
}

#[derive(Deserialize)]
struct DigitsResponse {
    #[serde(default)]
    digits: String,
}

#[derive(Serialize)]
struct DigitsRequest<'a> {
    digits: &'a str,
}

#[derive(Serialize)]
struct RecordingStartRequest<'a> {
    format: &'a str,
    end_of_silence: u64,
    end_of_key: &'a str,
    duration: u64,
    on_end_flow_id: Uuid,
}

#[derive(Serialize)]
struct ConfbridgeIdRequest {
    confbridge_id: Uuid,
}

#[derive(Serialize)]
struct TalkRequest<'a> {
    text: &'a str,
    gender: &'a str,
    language: &'a str,
}

#[derive(Serialize)]
struct PlayRequest<'a> {
    media_urls: &'a [String],
}

#[derive(Serialize)]
struct MuteRequest {
    direction: MuteDirection,
}

impl RequestHandler {
    async fn call_entity(&self, resource: &str, request: Request) -> Result<Call, RequestError> {
        let response = self
            .send(QueueName::CALL_REQUEST, resource, request)
            .await?;
        parse_response(response)
    }

    async fn call_command(&self, resource: &str, request: Request) -> Result<(), RequestError> {
        let response = self
            .send(QueueName::CALL_REQUEST, resource, request)
            .await?;
        check_response(response)
    }

    async fn call_deferred_command(
        &self,
        resource: &str,
        request: Request,
        delay: u64,
    ) -> Result<(), RequestError> {
        let response = self
            .dispatch(
                QueueName::CALL_REQUEST,
                resource,
                request,
                self.default_timeout(),
                delay,
            )
            .await?;
        check_deferrable_response(response, delay)
    }

    fn call_uri(call_id: Uuid, suffix: &str) -> String {
        format!("/v1/calls/{call_id}{suffix}")
    }
}

#[async_trait]
impl CallManager for RequestHandler {
    async fn call_v1_call_health(
        &self,
        call_id: Uuid,
        delay: u64,
        retry_count: u32,
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/health-check"),
            RequestMethod::Post,
            &HealthRequest { retry_count },
        )?;
        self.call_deferred_command("call/calls/health", request, delay)
            .await
    }

    async fn call_v1_call_action_timeout(
        &self,
        call_id: Uuid,
        delay: u64,
        action: &Action,
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/action-timeout"),
            RequestMethod::Post,
            &ActionTimeoutRequest {
                action_id: action.id,
                action_type: &action.action_type,
                tm_execute: action.tm_execute,
            },
        )?;
        self.call_deferred_command("call/calls/<call-id>/action-timeout", request, delay)
            .await
    }

    async fn call_v1_call_action_next(
        &self,
        call_id: Uuid,
        force: bool,
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/action-next"),
            RequestMethod::Post,
            &ActionNextRequest { force },
        )?;
        self.call_command("call/calls/<call-id>/action-next", request)
            .await
    }

    async fn call_v1_calls_create(
        &self,
        customer_id: Uuid,
        flow_id: Uuid,
        master_call_id: Uuid,
        source: &Address,
        destinations: &[Address],
        early_execution: bool,
        connect: bool,
    ) -> Result<(Vec<Call>, Vec<Groupcall>), RequestError> {
        let request = self.new_json_request(
            "/v1/calls",
            RequestMethod::Post,
            &CallsCreateRequest {
                flow_id,
                customer_id,
                master_call_id,
                source,
                destinations,
                early_execution,
                connect,
            },
        )?;
        let response = self
            .send(QueueName::CALL_REQUEST, RESOURCE_CALLS, request)
            .await?;
        let created: CallsCreateResponse = parse_response(response)?;
        Ok((created.calls, created.groupcalls))
    }

    async fn call_v1_call_create_with_id(
        &self,
        call_id: Uuid,
        customer_id: Uuid,
        flow_id: Uuid,
        activeflow_id: Uuid,
        master_call_id: Uuid,
        source: &Address,
        destination: &Address,
        groupcall_id: Uuid,
        early_execution: bool,
        connect: bool,
    ) -> Result<Call, RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, ""),
            RequestMethod::Post,
            &CreateWithIdRequest {
                flow_id,
                activeflow_id,
                customer_id,
                master_call_id,
                source,
                destination,
                groupcall_id,
                early_execution,
                connect,
            },
        )?;
        self.call_entity(RESOURCE_CALLS, request).await
    }

    async fn call_v1_call_get(&self, call_id: Uuid) -> Result<Call, RequestError> {
        let request = self.new_request(Self::call_uri(call_id, ""), RequestMethod::Get);
        self.call_entity(RESOURCE_CALLS, request).await
    }

    async fn call_v1_call_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &FieldFilters,
    ) -> Result<Vec<Call>, RequestError> {
        let request = self.new_json_request(
            page_uri("/v1/calls", page_token, page_size),
            RequestMethod::Get,
            filters,
        )?;
        let response = self
            .dispatch(
                QueueName::CALL_REQUEST,
                RESOURCE_CALLS,
                request,
                LIST_TIMEOUT,
                0,
            )
            .await?;
        parse_response(response)
    }

    async fn call_v1_call_add_chained_call(
        &self,
        call_id: Uuid,
        chained_call_id: Uuid,
    ) -> Result<Call, RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/chained-call-ids"),
            RequestMethod::Post,
            &ChainedCallIdRequest { chained_call_id },
        )?;
        self.call_entity(RESOURCE_CALLS, request).await
    }

    async fn call_v1_call_remove_chained_call(
        &self,
        call_id: Uuid,
        chained_call_id: Uuid,
    ) -> Result<Call, RequestError> {
        let request = self.new_request(
            Self::call_uri(call_id, &format!("/chained-call-ids/{chained_call_id}")),
            RequestMethod::Delete,
        );
        self.call_entity(RESOURCE_CALLS, request).await
    }

    async fn call_v1_call_delete(&self, call_id: Uuid) -> Result<Call, RequestError> {
        let request = self.new_request(Self::call_uri(call_id, ""), RequestMethod::Delete);
        self.call_entity(RESOURCE_CALLS, request).await
    }

    async fn call_v1_call_hangup(&self, call_id: Uuid) -> Result<Call, RequestError> {
        let request = self
            .new_request(Self::call_uri(call_id, "/hangup"), RequestMethod::Post)
            .with_data_type(CONTENT_TYPE_JSON);
        self.call_entity(RESOURCE_CALLS, request).await
    }

    async fn call_v1_call_external_media_start(
        &self,
        call_id: Uuid,
        external_media_id: Uuid,
        external_host: &str,
        encapsulation: &str,
        transport: &str,
        connection_type: &str,
        format: &str,
        direction_listen: MediaDirection,
        direction_speak: MediaDirection,
    ) -> Result<Call, RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/external-media"),
            RequestMethod::Post,
            &ExternalMediaRequest {
                external_media_id,
                external_host,
                encapsulation,
                transport,
                connection_type,
                format,
                direction_listen,
                direction_speak,
            },
        )?;
        self.call_entity(RESOURCE_CALLS, request).await
    }

    async fn call_v1_call_external_media_stop(
        &self,
        call_id: Uuid,
    ) -> Result<Call, RequestError> {
        let request = self.new_request(
            Self::call_uri(call_id, "/external-media"),
            RequestMethod::Delete,
        );
        self.call_entity("call/calls/<call-id>/external-media", request)
            .await
    }

    async fn call_v1_call_get_digits(&self, call_id: Uuid) -> Result<String, RequestError> {
        let request = self
            .new_request(Self::call_uri(call_id, "/digits"), RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .send(QueueName::CALL_REQUEST, RESOURCE_CALLS, request)
            .await?;
        parse_response::<DigitsResponse>(response).map(|res| res.digits)
    }

    async fn call_v1_call_send_digits(
        &self,
        call_id: Uuid,
        digits: &str,
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/digits"),
            RequestMethod::Post,
            &DigitsRequest { digits },
        )?;
        self.call_command(RESOURCE_CALLS, request).await
    }

    async fn call_v1_call_recording_start(
        &self,
        call_id: Uuid,
        format: &str,
        end_of_silence: u64,
        end_of_key: &str,
        duration: u64,
        on_end_flow_id: Uuid,
    ) -> Result<Call, RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/recording_start"),
            RequestMethod::Post,
            &RecordingStartRequest {
                format,
                end_of_silence,
                end_of_key,
                duration,
                on_end_flow_id,
            },
        )?;
        self.call_entity("call/calls/<call-id>/recording-start", request)
            .await
    }

    async fn call_v1_call_recording_stop(&self, call_id: Uuid) -> Result<Call, RequestError> {
        let request = self.new_request(
            Self::call_uri(call_id, "/recording_stop"),
            RequestMethod::Post,
        );
        self.call_entity("call/calls/<call-id>/recording-stop", request)
            .await
    }

    async fn call_v1_call_update_confbridge_id(
        &self,
        call_id: Uuid,
        confbridge_id: Uuid,
    ) -> Result<Call, RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/confbridge_id"),
            RequestMethod::Put,
            &ConfbridgeIdRequest { confbridge_id },
        )?;
        self.call_entity("call/calls/<call-id>/confbridge_id", request)
            .await
    }

    async fn call_v1_call_talk(
        &self,
        call_id: Uuid,
        text: &str,
        gender: &str,
        language: &str,
        timeout: u64,
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/talk"),
            RequestMethod::Post,
            &TalkRequest {
                text,
                gender,
                language,
            },
        )?;
        let response = self
            .dispatch(
                QueueName::CALL_REQUEST,
                "call/calls/<call-id>/talk",
                request,
                self.timeout_or_default(timeout),
                0,
            )
            .await?;
        check_response(response)
    }

    async fn call_v1_call_play(
        &self,
        call_id: Uuid,
        media_urls: &[String],
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/play"),
            RequestMethod::Post,
            &PlayRequest { media_urls },
        )?;
        self.call_command("call/calls/<call-id>/play", request)
            .await
    }

    async fn call_v1_call_media_stop(&self, call_id: Uuid) -> Result<(), RequestError> {
        let request = self.new_request(Self::call_uri(call_id, "/media_stop"), RequestMethod::Post);
        self.call_command("call/calls/<call-id>/media_stop", request)
            .await
    }

    async fn call_v1_call_hold_on(&self, call_id: Uuid) -> Result<(), RequestError> {
        let request = self.new_request(Self::call_uri(call_id, "/hold"), RequestMethod::Post);
        self.call_command("call/calls/<call-id>/hold", request).await
    }

    async fn call_v1_call_hold_off(&self, call_id: Uuid) -> Result<(), RequestError> {
        let request = self.new_request(Self::call_uri(call_id, "/hold"), RequestMethod::Delete);
        self.call_command("call/calls/<call-id>/hold", request).await
    }

    async fn call_v1_call_mute_on(
        &self,
        call_id: Uuid,
        direction: MuteDirection,
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/mute"),
            RequestMethod::Post,
            &MuteRequest { direction },
        )?;
        self.call_command("call/calls/<call-id>/mute", request).await
    }

    async fn call_v1_call_mute_off(
        &self,
        call_id: Uuid,
        direction: MuteDirection,
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            Self::call_uri(call_id, "/mute"),
            RequestMethod::Delete,
            &MuteRequest { direction },
        )?;
        self.call_command("call/calls/<call-id>/mute", request).await
    }

    async fn call_v1_call_music_on_hold_on(&self, call_id: Uuid) -> Result<(), RequestError> {
        let request = self.new_request(Self::call_uri(call_id, "/moh"), RequestMethod::Post);
        self.call_command("call/calls/<call-id>/moh", request).await
    }

    async fn call_v1_call_music_on_hold_off(&self, call_id: Uuid) -> Result<(), RequestError> {
        let request = self.new_request(Self::call_uri(call_id, "/moh"), RequestMethod::Delete);
        self.call_command("call/calls/<call-id>/moh", request).await
    }

    async fn call_v1_call_silence_on(&self, call_id: Uuid) -> Result<(), RequestError> {
        let request = self.new_request(Self::call_uri(call_id, "/silence"), RequestMethod::Post);
        self.call_command("call/calls/<call-id>/silence", request)
            .await
    }

    async fn call_v1_call_silence_off(&self, call_id: Uuid) -> Result<(), RequestError> {
        let request = self.new_request(Self::call_uri(call_id, "/silence"), RequestMethod::Delete);
        self.call_command("call/calls/<call-id>/silence", request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use test_case::test_case;
    use uuid::uuid;

    use crate::models::CallStatus;
    use crate::requesthandler::test_support::{
        expect_delayed_request, expect_request, json_request, json_response, json_typed_request,
        request, status_response,
    };
    use crate::requesthandler::{DEFAULT_TIMEOUT, DELAY_SECOND};

    #[tokio::test]
    async fn test_call_health_is_deferred() {
        let handler = expect_delayed_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/5bfcdcd6-4c6e-11ec-bed9-8fe4c0fdf5ba/health-check",
                RequestMethod::Post,
                r#"{"retry_count":3}"#,
            ),
            10 * DELAY_SECOND,
        );

        let result = handler
            .call_v1_call_health(
                uuid!("5bfcdcd6-4c6e-11ec-bed9-8fe4c0fdf5ba"),
                10 * DELAY_SECOND,
                3,
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_action_timeout() {
        let handler = expect_delayed_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/c8ab1794-4c6e-11ec-86bc-773d32f65e3b/action-timeout",
                RequestMethod::Post,
                r#"{"action_id":"eccec152-4c6e-11ec-bb47-d343ee142464","action_type":"answer","tm_execute":"2020-09-20T03:23:20.995Z"}"#,
            ),
            DELAY_SECOND,
        );
        let action = Action {
            id: uuid!("eccec152-4c6e-11ec-bb47-d343ee142464"),
            tm_execute: Utc
                .with_ymd_and_hms(2020, 9, 20, 3, 23, 20)
                .single()
                .map(|t| t + chrono::Duration::milliseconds(995)),
            ..Action::new("answer")
        };

        let result = handler
            .call_v1_call_action_timeout(
                uuid!("c8ab1794-4c6e-11ec-86bc-773d32f65e3b"),
                DELAY_SECOND,
                &action,
            )
            .await;
        assert!(result.is_ok());
    }

    #[test_case(false, "{}"; "regular")]
    #[test_case(true, r#"{"force":true}"#; "forced")]
    #[tokio::test]
    async fn test_call_action_next(force: bool, expected_body: &'static str) {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/bee79b78-4c6f-11ec-a254-cb0b4d8d4c9c/action-next",
                RequestMethod::Post,
                expected_body,
            ),
            DEFAULT_TIMEOUT,
            status_response(200),
        );

        let result = handler
            .call_v1_call_action_next(uuid!("bee79b78-4c6f-11ec-a254-cb0b4d8d4c9c"), force)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_calls_create_returns_calls_and_groupcalls() {
        // GIVEN a call-manager creating a call and a groupcall
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls",
                RequestMethod::Post,
                r#"{"flow_id":"0783c168-4c70-11ec-a613-bfcd98aaa6da","customer_id":"3a09efda-7f52-11ec-a775-cfd868cdc292","master_call_id":"ecd7b104-8c97-11ec-895d-67294ed5a4d0","source":{"type":"tel","target":"+821021656521"},"destinations":[{"type":"tel","target":"+821021656522"}],"early_execution":true,"connect":true}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(
                r#"{"calls":[{"id":"fa0ddb32-25cd-11eb-a604-8b239b305055"}],"groupcalls":[{"id":"69b105a6-939b-4eb0-99a5-0efa5b3cd80e"}]}"#,
            ),
        );

        // WHEN creating calls
        let result = handler
            .call_v1_calls_create(
                uuid!("3a09efda-7f52-11ec-a775-cfd868cdc292"),
                uuid!("0783c168-4c70-11ec-a613-bfcd98aaa6da"),
                uuid!("ecd7b104-8c97-11ec-895d-67294ed5a4d0"),
                &Address::tel("+821021656521"),
                &[Address::tel("+821021656522")],
                true,
                true,
            )
            .await;

        // THEN both kinds of entities are returned
        let (calls, groupcalls) = result.unwrap();
        assert!(calls
            .first()
            .is_some_and(|c| c.id == uuid!("fa0ddb32-25cd-11eb-a604-8b239b305055")));
        assert!(groupcalls
            .first()
            .is_some_and(|g| g.id == uuid!("69b105a6-939b-4eb0-99a5-0efa5b3cd80e")));
    }

    #[tokio::test]
    async fn test_calls_create_accepts_null_groupcalls() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls",
                RequestMethod::Post,
                r#"{"flow_id":"00000000-0000-0000-0000-000000000000","customer_id":"3a09efda-7f52-11ec-a775-cfd868cdc292","master_call_id":"00000000-0000-0000-0000-000000000000","source":{"type":"tel","target":"+821021656521"},"destinations":[],"early_execution":false,"connect":false}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"calls":[],"groupcalls":null}"#),
        );

        let result = handler
            .call_v1_calls_create(
                uuid!("3a09efda-7f52-11ec-a775-cfd868cdc292"),
                Uuid::nil(),
                Uuid::nil(),
                &Address::tel("+821021656521"),
                &[],
                false,
                false,
            )
            .await;
        assert!(result.is_ok_and(|(calls, groupcalls)| calls.is_empty() && groupcalls.is_empty()));
    }

    #[tokio::test]
    async fn test_call_create_with_id() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/9dcdc9a0-4d1c-11ec-81cc-bf06212a283e",
                RequestMethod::Post,
                r#"{"flow_id":"9f4b89b6-4d1c-11ec-a565-af220567858d","activeflow_id":"0a5273c9-73ac-4590-87de-4c7f33da7614","customer_id":"45a4dbac-7f52-11ec-98a8-7f1e6d2fae52","master_call_id":"f993c284-8c97-11ec-aaa3-a76b1106d031","source":{"type":"tel","target":"+821021656521"},"destination":{"type":"tel","target":"+821021656522"},"groupcall_id":"8214ceaa-bbe0-11ed-9ae2-b72d8846362b","early_execution":true,"connect":true}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"9dcdc9a0-4d1c-11ec-81cc-bf06212a283e"}"#),
        );

        let result = handler
            .call_v1_call_create_with_id(
                uuid!("9dcdc9a0-4d1c-11ec-81cc-bf06212a283e"),
                uuid!("45a4dbac-7f52-11ec-98a8-7f1e6d2fae52"),
                uuid!("9f4b89b6-4d1c-11ec-a565-af220567858d"),
                uuid!("0a5273c9-73ac-4590-87de-4c7f33da7614"),
                uuid!("f993c284-8c97-11ec-aaa3-a76b1106d031"),
                &Address::tel("+821021656521"),
                &Address::tel("+821021656522"),
                uuid!("8214ceaa-bbe0-11ed-9ae2-b72d8846362b"),
                true,
                true,
            )
            .await;
        assert!(result.is_ok_and(|c| c.id == uuid!("9dcdc9a0-4d1c-11ec-81cc-bf06212a283e")));
    }

    #[tokio::test]
    async fn test_call_get() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            request(
                "/v1/calls/7ab80df4-4c72-11ec-b095-17146a0e7e4c",
                RequestMethod::Get,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"7ab80df4-4c72-11ec-b095-17146a0e7e4c","status":"progressing"}"#),
        );

        let result = handler
            .call_v1_call_get(uuid!("7ab80df4-4c72-11ec-b095-17146a0e7e4c"))
            .await;
        assert!(result.is_ok_and(|c| c.status == CallStatus::Progressing));
    }

    #[tokio::test]
    async fn test_call_gets_uses_list_timeout() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls?page_token=2020-09-20T03%3A23%3A20.995000&page_size=10",
                RequestMethod::Get,
                r#"{"deleted":false}"#,
            ),
            30_000,
            json_response(
                r#"[{"id":"11cfd8e8-4c73-11ec-8f06-b73cd86fc9ae"},{"id":"12237ce6-4c73-11ec-8a2a-57b7a8d6a6f4"}]"#,
            ),
        );
        let mut filters = FieldFilters::new();
        filters.insert("deleted".to_string(), false.into());

        let result = handler
            .call_v1_call_gets("2020-09-20T03:23:20.995000", 10, &filters)
            .await;
        assert!(result.is_ok_and(|calls| calls.len() == 2));
    }

    #[tokio::test]
    async fn test_call_add_chained_call() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/887a7600-25c9-11eb-ab60-338d7ef0ba0f/chained-call-ids",
                RequestMethod::Post,
                r#"{"chained_call_id":"8d48ded8-25c9-11eb-a8da-a7bcaada697c"}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"887a7600-25c9-11eb-ab60-338d7ef0ba0f","chained_call_ids":["8d48ded8-25c9-11eb-a8da-a7bcaada697c"]}"#),
        );

        let result = handler
            .call_v1_call_add_chained_call(
                uuid!("887a7600-25c9-11eb-ab60-338d7ef0ba0f"),
                uuid!("8d48ded8-25c9-11eb-a8da-a7bcaada697c"),
            )
            .await;
        assert!(result.is_ok_and(|c| c.chained_call_ids.len() == 1));
    }

    #[tokio::test]
    async fn test_call_remove_chained_call() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            request(
                "/v1/calls/1ced9274-8ee0-11ec-8c36-13795e573d73/chained-call-ids/1d38dcd4-8ee0-11ec-ace4-178f58435f40",
                RequestMethod::Delete,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"1ced9274-8ee0-11ec-8c36-13795e573d73"}"#),
        );

        let result = handler
            .call_v1_call_remove_chained_call(
                uuid!("1ced9274-8ee0-11ec-8c36-13795e573d73"),
                uuid!("1d38dcd4-8ee0-11ec-ace4-178f58435f40"),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_delete() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            request(
                "/v1/calls/045c4e0d-7838-46bf-b28d-3aeaa943a53e",
                RequestMethod::Delete,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"045c4e0d-7838-46bf-b28d-3aeaa943a53e"}"#),
        );

        let result = handler
            .call_v1_call_delete(uuid!("045c4e0d-7838-46bf-b28d-3aeaa943a53e"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_hangup() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_typed_request(
                "/v1/calls/fa0ddb32-25cd-11eb-a604-8b239b305055/hangup",
                RequestMethod::Post,
            ),
            DEFAULT_TIMEOUT,
            json_response(
                r#"{"id":"fa0ddb32-25cd-11eb-a604-8b239b305055","customer_id":"a789f1d6-7f52-11ec-b563-e3d43178d814","channel_id":"","flow_id":"59518eae-ed66-11ea-85ef-b77bdbc74ccc","type":"","master_call_id":"00000000-0000-0000-0000-000000000000","chained_call_ids":null,"source":{"type":"","target":"","name":""},"destination":{"type":"","target":"","name":""},"status":"","data":null,"action":{"id":"00000000-0000-0000-0000-000000000000","type":"","tm_execute":""},"direction":"","hangup_by":"","hangup_reason":"","tm_create":"","tm_update":"","tm_progressing":"","tm_ringing":"","tm_hangup":""}"#,
            ),
        );

        let result = handler
            .call_v1_call_hangup(uuid!("fa0ddb32-25cd-11eb-a604-8b239b305055"))
            .await;
        assert!(result.is_ok_and(|c| c.flow_id == uuid!("59518eae-ed66-11ea-85ef-b77bdbc74ccc")));
    }

    #[tokio::test]
    async fn test_call_external_media_start() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/a099a2a4-0ac7-11ec-b8ae-438c5d2fe6fb/external-media",
                RequestMethod::Post,
                r#"{"external_media_id":"b0c0c6e6-0ac7-11ec-9d4e-4b8b6c2f1b2d","external_host":"localhost:5060","encapsulation":"rtp","transport":"udp","connection_type":"client","format":"ulaw","direction_listen":"both","direction_speak":"in"}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"a099a2a4-0ac7-11ec-b8ae-438c5d2fe6fb"}"#),
        );

        let result = handler
            .call_v1_call_external_media_start(
                uuid!("a099a2a4-0ac7-11ec-b8ae-438c5d2fe6fb"),
                uuid!("b0c0c6e6-0ac7-11ec-9d4e-4b8b6c2f1b2d"),
                "localhost:5060",
                "rtp",
                "udp",
                "client",
                "ulaw",
                MediaDirection::Both,
                MediaDirection::In,
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_external_media_stop() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            request(
                "/v1/calls/487233ec-97c1-11ed-968d-47ee0ef18dbf/external-media",
                RequestMethod::Delete,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"487233ec-97c1-11ed-968d-47ee0ef18dbf"}"#),
        );

        let result = handler
            .call_v1_call_external_media_stop(uuid!("487233ec-97c1-11ed-968d-47ee0ef18dbf"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_get_digits() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_typed_request(
                "/v1/calls/3f73caf8-901a-11ec-8ec8-b7367d212083/digits",
                RequestMethod::Get,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"digits":"1"}"#),
        );

        let result = handler
            .call_v1_call_get_digits(uuid!("3f73caf8-901a-11ec-8ec8-b7367d212083"))
            .await;
        assert!(result.is_ok_and(|digits| digits == "1"));
    }

    #[tokio::test]
    async fn test_call_send_digits() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/be3f07ee-9916-11ec-a7c8-ef03823980a7/digits",
                RequestMethod::Post,
                r#"{"digits":"123"}"#,
            ),
            DEFAULT_TIMEOUT,
            status_response(200),
        );

        let result = handler
            .call_v1_call_send_digits(uuid!("be3f07ee-9916-11ec-a7c8-ef03823980a7"), "123")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_recording_start() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/6533f61e-9348-11ed-83bc-ab5a0adfe5e5/recording_start",
                RequestMethod::Post,
                r##"{"format":"wav","end_of_silence":1000,"end_of_key":"#","duration":86400,"on_end_flow_id":"00000000-0000-0000-0000-000000000000"}"##,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"6533f61e-9348-11ed-83bc-ab5a0adfe5e5"}"#),
        );

        let result = handler
            .call_v1_call_recording_start(
                uuid!("6533f61e-9348-11ed-83bc-ab5a0adfe5e5"),
                "wav",
                1_000,
                "#",
                86_400,
                Uuid::nil(),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_recording_stop() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            request(
                "/v1/calls/6593f41a-9348-11ed-bdd2-3b5bf8891acb/recording_stop",
                RequestMethod::Post,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"6593f41a-9348-11ed-bdd2-3b5bf8891acb"}"#),
        );

        let result = handler
            .call_v1_call_recording_stop(uuid!("6593f41a-9348-11ed-bdd2-3b5bf8891acb"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_update_confbridge_id() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/6c2d5016-467d-4d53-86ce-f5b5fc451b1c/confbridge_id",
                RequestMethod::Put,
                r#"{"confbridge_id":"9955fda3-fc5e-40eb-9c2d-7d0152e3c6ba"}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"6c2d5016-467d-4d53-86ce-f5b5fc451b1c","confbridge_id":"9955fda3-fc5e-40eb-9c2d-7d0152e3c6ba"}"#),
        );

        let result = handler
            .call_v1_call_update_confbridge_id(
                uuid!("6c2d5016-467d-4d53-86ce-f5b5fc451b1c"),
                uuid!("9955fda3-fc5e-40eb-9c2d-7d0152e3c6ba"),
            )
            .await;
        assert!(result
            .is_ok_and(|c| c.confbridge_id == uuid!("9955fda3-fc5e-40eb-9c2d-7d0152e3c6ba")));
    }

    #[tokio::test]
    async fn test_call_talk_uses_given_timeout() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/966842b8-a4b3-11ed-afc1-cfd28f99c181/talk",
                RequestMethod::Post,
                r#"{"text":"hello world","gender":"female","language":"en-US"}"#,
            ),
            10_000,
            status_response(200),
        );

        let result = handler
            .call_v1_call_talk(
                uuid!("966842b8-a4b3-11ed-afc1-cfd28f99c181"),
                "hello world",
                "female",
                "en-US",
                10_000,
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_play() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/ae44f0c7-887b-4cd2-9f30-a7ff80dd7300/play",
                RequestMethod::Post,
                r#"{"media_urls":["https://test.com/735efc89-5255-4ca0-8181-8ad802d2e24b.wav","https://test.com/a3366726-8fcc-4730-a03b-256bc343c1ea.wav"]}"#,
            ),
            DEFAULT_TIMEOUT,
            status_response(200),
        );

        let result = handler
            .call_v1_call_play(
                uuid!("ae44f0c7-887b-4cd2-9f30-a7ff80dd7300"),
                &[
                    "https://test.com/735efc89-5255-4ca0-8181-8ad802d2e24b.wav".to_string(),
                    "https://test.com/a3366726-8fcc-4730-a03b-256bc343c1ea.wav".to_string(),
                ],
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_media_stop() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            request(
                "/v1/calls/582ad5a4-e787-4b0b-8480-09253372a518/media_stop",
                RequestMethod::Post,
            ),
            DEFAULT_TIMEOUT,
            status_response(200),
        );

        let result = handler
            .call_v1_call_media_stop(uuid!("582ad5a4-e787-4b0b-8480-09253372a518"))
            .await;
        assert!(result.is_ok());
    }

    #[test_case("hold_on", RequestMethod::Post, "/hold"; "hold on")]
    #[test_case("hold_off", RequestMethod::Delete, "/hold"; "hold off")]
    #[test_case("moh_on", RequestMethod::Post, "/moh"; "music on hold on")]
    #[test_case("moh_off", RequestMethod::Delete, "/moh"; "music on hold off")]
    #[test_case("silence_on", RequestMethod::Post, "/silence"; "silence on")]
    #[test_case("silence_off", RequestMethod::Delete, "/silence"; "silence off")]
    #[tokio::test]
    async fn test_call_media_toggles(operation: &str, method: RequestMethod, suffix: &str) {
        let call_id = uuid!("b36a092a-cef5-11ed-8c7c-f765b9f87cd6");
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            request(&format!("/v1/calls/{call_id}{suffix}"), method),
            DEFAULT_TIMEOUT,
            status_response(200),
        );

        let result = match operation {
            "hold_on" => handler.call_v1_call_hold_on(call_id).await,
            "hold_off" => handler.call_v1_call_hold_off(call_id).await,
            "moh_on" => handler.call_v1_call_music_on_hold_on(call_id).await,
            "moh_off" => handler.call_v1_call_music_on_hold_off(call_id).await,
            "silence_on" => handler.call_v1_call_silence_on(call_id).await,
            _ => handler.call_v1_call_silence_off(call_id).await,
        };
        assert!(result.is_ok());
    }

    #[test_case(RequestMethod::Post; "mute on")]
    #[test_case(RequestMethod::Delete; "mute off")]
    #[tokio::test]
    async fn test_call_mute(method: RequestMethod) {
        let call_id = uuid!("b3c32e88-cef5-11ed-9f30-1b12722669f5");
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/b3c32e88-cef5-11ed-9f30-1b12722669f5/mute",
                method,
                r#"{"direction":"both"}"#,
            ),
            DEFAULT_TIMEOUT,
            status_response(200),
        );

        let result = if method == RequestMethod::Post {
            handler.call_v1_call_mute_on(call_id, MuteDirection::Both).await
        } else {
            handler.call_v1_call_mute_off(call_id, MuteDirection::Both).await
        };
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_call_hold_on_without_reply_is_not_found() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            request(
                "/v1/calls/b36a092a-cef5-11ed-8c7c-f765b9f87cd6/hold",
                RequestMethod::Post,
            ),
            DEFAULT_TIMEOUT,
            None,
        );

        let result = handler
            .call_v1_call_hold_on(uuid!("b36a092a-cef5-11ed-8c7c-f765b9f87cd6"))
            .await;
        assert!(result.is_err_and(|e| matches!(e, RequestError::NotFound)));
    }

    #[tokio::test]
    async fn test_call_health_without_delay_requires_reply() {
        let handler = expect_request(
            QueueName::CALL_REQUEST,
            json_request(
                "/v1/calls/5bfcdcd6-4c6e-11ec-bed9-8fe4c0fdf5ba/health-check",
                RequestMethod::Post,
                r#"{"retry_count":2}"#,
            ),
            DEFAULT_TIMEOUT,
            None,
        );

        let result = handler
            .call_v1_call_health(uuid!("5bfcdcd6-4c6e-11ec-bed9-8fe4c0fdf5ba"), 0, 2)
            .await;
        assert!(result.is_err_and(|e| matches!(e, RequestError::NotFound)));
    }
}
