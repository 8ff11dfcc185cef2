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

use crate::models::{AIcall, ToolFunction};
use crate::query::{page_uri, FieldFilters};
use crate::{QueueName, Request, RequestMethod};

use super::{check_deferrable_response, parse_response, RequestError, RequestHandler};

const RESOURCE_AICALLS: &str = "ai/aicalls";

/// Operations on the AI calls of the ai-manager.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait AicallManager: Send + Sync {
    /// Starts an AI call for the given reference.
    ///
    /// # Arguments
    ///
    /// * `reference_type` - The kind of the referenced resource, e.g. `call` or `conversation`.
    /// * `gender` - The voice gender used for speech synthesis.
    /// * `language` - A BCP 47 language tag, e.g. `en-US`.
    #[allow(clippy::too_many_arguments)]
    async fn ai_v1_aicall_start(
        &self,
        activeflow_id: Uuid,
        ai_id: Uuid,
        reference_type: &str,
        reference_id: Uuid,
        gender: &str,
        language: &str,
    ) -> Result<AIcall, RequestError>;

    async fn ai_v1_aicall_list(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &FieldFilters,
    ) -> Result<Vec<AIcall>, RequestError>;

    async fn ai_v1_aicall_get(&self, aicall_id: Uuid) -> Result<AIcall, RequestError>;

    async fn ai_v1_aicall_delete(&self, aicall_id: Uuid) -> Result<AIcall, RequestError>;

    async fn ai_v1_aicall_terminate(&self, aicall_id: Uuid) -> Result<AIcall, RequestError>;

    /// Terminates the AI call once `delay` milliseconds have passed.
    async fn ai_v1_aicall_terminate_with_delay(
        &self,
        aicall_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError>;

    /// Executes a tool the AI asked for and returns the tool's result.
    async fn ai_v1_aicall_tool_execute(
        &self,
        aicall_id: Uuid,
        tool_id: &str,
        tool_type: &str,
        function: &ToolFunction,
    ) -> Result<Map<String, Value>, RequestError>;
}

#[derive(Serialize)]
struct StartRequest<'a> {
    activeflow_id: Uuid,
    ai_id: Uuid,
    reference_type: &'a str,
    reference_id: Uuid,
    gender: &'a str,
    language: &'a str,
}

#[derive(Serialize)]
struct ToolExecuteRequest<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    tool_type: &'a str,
    function: &'a ToolFunction,
}

impl RequestHandler {
    async fn aicall_request<T>(&self, resource: &str, request: Request) -> Result<T, RequestError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.send(QueueName::AI_REQUEST, resource, request).await?;
        parse_response(response)
    }
}

#[async_trait]
impl AicallManager for RequestHandler {
    async fn ai_v1_aicall_start(
        &self,
        activeflow_id: Uuid,
        ai_id: Uuid,
        reference_type: &str,
        reference_id: Uuid,
        gender: &str,
        language: &str,
    ) -> Result<AIcall, RequestError> {
        let request = self.new_json_request(
            "/v1/aicalls",
            RequestMethod::Post,
            &StartRequest {
                activeflow_id,
                ai_id,
                reference_type,
                reference_id,
                gender,
                language,
            },
        )?;
        self.aicall_request(RESOURCE_AICALLS, request).await
    }

    async fn ai_v1_aicall_list(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &FieldFilters,
    ) -> Result<Vec<AIcall>, RequestError> {
        let request = self.new_json_request(
            page_uri("/v1/aicalls", page_token, page_size),
            RequestMethod::Get,
            filters,
        )?;
        self.aicall_request(RESOURCE_AICALLS, request).await
    }

    async fn ai_v1_aicall_get(&self, aicall_id: Uuid) -> Result<AIcall, RequestError> {
        let request = self.new_request(format!("/v1/aicalls/{aicall_id}"), RequestMethod::Get);
        self.aicall_request(RESOURCE_AICALLS, request).await
    }

    async fn ai_v1_aicall_delete(&self, aicall_id: Uuid) -> Result<AIcall, RequestError> {
        let request =
            self.new_request(format!("/v1/aicalls/{aicall_id}"), RequestMethod::Delete);
        self.aicall_request(RESOURCE_AICALLS, request).await
    }

    async fn ai_v1_aicall_terminate(&self, aicall_id: Uuid) -> Result<AIcall, RequestError> {
        let request = self.new_request(
            format!("/v1/aicalls/{aicall_id}/terminate"),
            RequestMethod::Post,
        );
        self.aicall_request("ai/aicalls/<aicall-id>/terminate", request)
            .await
    }

    async fn ai_v1_aicall_terminate_with_delay(
        &self,
        aicall_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError> {
        let request = self.new_request(
            format!("/v1/aicalls/{aicall_id}/terminate"),
            RequestMethod::Post,
        );
        let response = self
            .dispatch(
                QueueName::AI_REQUEST,
                "ai/aicalls/<aicall-id>/terminate",
                request,
                self.default_timeout(),
                delay,
            )
            .await?;
        check_deferrable_response(response, delay)
    }

    async fn ai_v1_aicall_tool_execute(
        &self,
        aicall_id: Uuid,
        tool_id: &str,
        tool_type: &str,
        function: &ToolFunction,
    ) -> Result<Map<String, Value>, RequestError> {
        let request = self.new_json_request(
            format!("/v1/aicalls/{aicall_id}/tool_execute"),
            RequestMethod::Post,
            &ToolExecuteRequest {
                id: tool_id,
                tool_type,
                function,
            },
        )?;
        self.aicall_request("ai/aicalls/<aicall-id>/tool_execute", request)
            .await
    }
}
