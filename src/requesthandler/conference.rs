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
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::{Action, Conference, ConferenceType};
use crate::query::{merge_filters, page_uri, QueryFilters};
use crate::{QueueName, Request, RequestMethod};

use super::{check_deferrable_response, parse_response, RequestError, RequestHandler};

const RESOURCE_CONFERENCES: &str = "conference/conferences";
const RESOURCE_CONFERENCES_ID: &str = "conference/conferences/<conference-id>";

const LIST_TIMEOUT: u64 = 30_000;

/// Operations of the conference-manager.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait ConferenceManager: Send + Sync {
    async fn conference_v1_conference_get(
        &self,
        conference_id: Uuid,
    ) -> Result<Conference, RequestError>;

    async fn conference_v1_conference_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Conference>, RequestError>;

    async fn conference_v1_conference_delete(
        &self,
        conference_id: Uuid,
    ) -> Result<Conference, RequestError>;

    /// Deletes a conference after `delay` milliseconds.
    async fn conference_v1_conference_delete_delay(
        &self,
        conference_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError>;

    /// Stops a conference, hanging up all of its participants.
    ///
    /// # Returns
    ///
    /// The stopped conference, or `None` if the request has been deferred.
    async fn conference_v1_conference_stop(
        &self,
        conference_id: Uuid,
        delay: u64,
    ) -> Result<Option<Conference>, RequestError>;

    /// Creates a conference.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Seconds until the conference is terminated. 0 means no limit.
    /// * `data` - Arbitrary data attached to the conference.
    /// * `pre_actions` - Actions executed for each participant before joining.
    /// * `post_actions` - Actions executed for each participant after leaving.
    #[allow(clippy::too_many_arguments)]
    async fn conference_v1_conference_create(
        &self,
        customer_id: Uuid,
        conference_type: ConferenceType,
        name: &str,
        detail: &str,
        timeout: u64,
        data: &Map<String, Value>,
        pre_actions: &[Action],
        post_actions: &[Action],
    ) -> Result<Conference, RequestError>;

    #[allow(clippy::too_many_arguments)]
    async fn conference_v1_conference_update(
        &self,
        conference_id: Uuid,
        name: &str,
        detail: &str,
        timeout: u64,
        pre_actions: &[Action],
        post_actions: &[Action],
    ) -> Result<Conference, RequestError>;

    async fn conference_v1_conference_update_recording_id(
        &self,
        conference_id: Uuid,
        recording_id: Uuid,
    ) -> Result<Conference, RequestError>;

    async fn conference_v1_conference_recording_start(
        &self,
        conference_id: Uuid,
    ) -> Result<Conference, RequestError>;

    async fn conference_v1_conference_recording_stop(
        &self,
        conference_id: Uuid,
    ) -> Result<Conference, RequestError>;

    /// Starts transcribing a conference.
    ///
    /// # Arguments
    ///
    /// * `language` - BCP47 tag of the spoken language, e.g. `en-US`.
    async fn conference_v1_conference_transcribe_start(
        &self,
        conference_id: Uuid,
        language: &str,
    ) -> Result<Conference, RequestError>;

    async fn conference_v1_conference_transcribe_stop(
        &self,
        conference_id: Uuid,
    ) -> Result<Conference, RequestError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    #[serde(rename = "type")]
    conference_type: ConferenceType,
    customer_id: Uuid,
    name: &'a str,
    detail: &'a str,
    timeout: u64,
    data: &'a Map<String, Value>,
    pre_actions: &'a [Action],
    post_actions: &'a [Action],
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    name: &'a str,
    detail: &'a str,
    timeout: u64,
    pre_actions: &'a [Action],
    post_actions: &'a [Action],
}

#[derive(Serialize)]
struct RecordingIdRequest {
    recording_id: Uuid,
}

#[derive(Serialize)]
struct TranscribeStartRequest<'a> {
    language: &'a str,
}

impl RequestHandler {
    async fn conference_entity(
        &self,
        resource: &str,
        request: Request,
    ) -> Result<Conference, RequestError> {
        let response = self
            .send(QueueName::CONFERENCE_REQUEST, resource, request)
            .await?;
        parse_response(response)
    }
}

#[async_trait]
impl ConferenceManager for RequestHandler {
    async fn conference_v1_conference_get(
        &self,
        conference_id: Uuid,
    ) -> Result<Conference, RequestError> {
        let request = self.new_request(
            format!("/v1/conferences/{conference_id}"),
            RequestMethod::Get,
        );
        self.conference_entity(RESOURCE_CONFERENCES, request).await
    }

    async fn conference_v1_conference_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Conference>, RequestError> {
        let uri = merge_filters(page_uri("/v1/conferences", page_token, page_size), filters);
        let request = self.new_request(uri, RequestMethod::Get);
        let response = self
            .dispatch(
                QueueName::CONFERENCE_REQUEST,
                RESOURCE_CONFERENCES,
                request,
                LIST_TIMEOUT,
                0,
            )
            .await?;
        parse_response(response)
    }

    async fn conference_v1_conference_delete(
        &self,
        conference_id: Uuid,
    ) -> Result<Conference, RequestError> {
        let request = self.new_request(
            format!("/v1/conferences/{conference_id}"),
            RequestMethod::Delete,
        );
        self.conference_entity(RESOURCE_CONFERENCES_ID, request)
            .await
    }

    async fn conference_v1_conference_delete_delay(
        &self,
        conference_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError> {
        let request = self.new_request(
            format!("/v1/conferences/{conference_id}"),
            RequestMethod::Delete,
        );
        let response = self
            .dispatch(
                QueueName::CONFERENCE_REQUEST,
                RESOURCE_CONFERENCES,
                request,
                self.default_timeout(),
                delay,
            )
            .await?;
        check_deferrable_response(response, delay)
    }

    async fn conference_v1_conference_stop(
        &self,
        conference_id: Uuid,
        delay: u64,
    ) -> Result<Option<Conference>, RequestError> {
        let request = self.new_request(
            format!("/v1/conferences/{conference_id}/stop"),
            RequestMethod::Post,
        );
        let response = self
            .dispatch(
                QueueName::CONFERENCE_REQUEST,
                RESOURCE_CONFERENCES_ID,
                request,
                self.default_timeout(),
                delay,
            )
            .await?;
        match response {
            None if delay > 0 => Ok(None),
            response => parse_response(response).map(Some),
        }
    }

    async fn conference_v1_conference_create(
        &self,
        customer_id: Uuid,
        conference_type: ConferenceType,
        name: &str,
        detail: &str,
        timeout: u64,
        data: &Map<String, Value>,
        pre_actions: &[Action],
        post_actions: &[Action],
    ) -> Result<Conference, RequestError> {
        let request = self.new_json_request(
            "/v1/conferences",
            RequestMethod::Post,
            &CreateRequest {
                conference_type,
                customer_id,
                name,
                detail,
                timeout,
                data,
                pre_actions,
                post_actions,
            },
        )?;
        self.conference_entity(RESOURCE_CONFERENCES, request).await
    }

    async fn conference_v1_conference_update(
        &self,
        conference_id: Uuid,
        name: &str,
        detail: &str,
        timeout: u64,
        pre_actions: &[Action],
        post_actions: &[Action],
    ) -> Result<Conference, RequestError> {
        let request = self.new_json_request(
            format!("/v1/conferences/{conference_id}"),
            RequestMethod::Put,
            &UpdateRequest {
                name,
                detail,
                timeout,
                pre_actions,
                post_actions,
            },
        )?;
        self.conference_entity(RESOURCE_CONFERENCES, request).await
    }

    async fn conference_v1_conference_update_recording_id(
        &self,
        conference_id: Uuid,
        recording_id: Uuid,
    ) -> Result<Conference, RequestError> {
        let request = self.new_json_request(
            format!("/v1/conferences/{conference_id}/recording_id"),
            RequestMethod::Put,
            &RecordingIdRequest { recording_id },
        )?;
        self.conference_entity(RESOURCE_CONFERENCES, request).await
    }

    async fn conference_v1_conference_recording_start(
        &self,
        conference_id: Uuid,
    ) -> Result<Conference, RequestError> {
        let request = self.new_request(
            format!("/v1/conferences/{conference_id}/recording_start"),
            RequestMethod::Post,
        );
        self.conference_entity(
            "conference/conferences/<conference-id>/recording_start",
            request,
        )
        .await
    }

    async fn conference_v1_conference_recording_stop(
        &self,
        conference_id: Uuid,
    ) -> Result<Conference, RequestError> {
        let request = self.new_request(
            format!("/v1/conferences/{conference_id}/recording_stop"),
            RequestMethod::Post,
        );
        self.conference_entity(
            "conference/conferences/<conference-id>/recording_stop",
            request,
        )
        .await
    }

    async fn conference_v1_conference_transcribe_start(
        &self,
        conference_id: Uuid,
        language: &str,
    ) -> Result<Conference, RequestError> {
        let request = self.new_json_request(
            format!("/v1/conferences/{conference_id}/transcribe_start"),
            RequestMethod::Post,
            &TranscribeStartRequest { language },
        )?;
        self.conference_entity(
            "conference/conferences/<conference-id>/transcribe_start",
            request,
        )
        .await
    }

    async fn conference_v1_conference_transcribe_stop(
        &self,
        conference_id: Uuid,
    ) -> Result<Conference, RequestError> {
        let request = self.new_request(
            format!("/v1/conferences/{conference_id}/transcribe_stop"),
            RequestMethod::Post,
        );
        self.conference_entity(
            "conference/conferences/<conference-id>/transcribe_stop",
            request,
        )
        .await
    }
}
