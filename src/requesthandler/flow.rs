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
use uuid::Uuid;

use crate::models::{Action, Flow};
use crate::query::{merge_filters, page_uri, QueryFilters};
use crate::{QueueName, Request, RequestMethod, CONTENT_TYPE_JSON};

use super::{parse_response, RequestError, RequestHandler};

const RESOURCE_FLOWS: &str = "flow/flows";

/// Operations of the flow-manager concerning flows.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait FlowManager: Send + Sync {
    /// Creates a flow.
    ///
    /// # Arguments
    ///
    /// * `flow_type` - e.g. `flow` or `conference`
    /// * `persist` - Whether to keep the flow after the reference it has been created for is gone.
    #[allow(clippy::too_many_arguments)]
    async fn flow_v1_flow_create(
        &self,
        customer_id: Uuid,
        flow_type: &str,
        name: &str,
        detail: &str,
        actions: &[Action],
        persist: bool,
    ) -> Result<Flow, RequestError>;

    async fn flow_v1_flow_update(
        &self,
        flow_id: Uuid,
        name: &str,
        detail: &str,
        actions: &[Action],
    ) -> Result<Flow, RequestError>;

    async fn flow_v1_flow_get(&self, flow_id: Uuid) -> Result<Flow, RequestError>;

    async fn flow_v1_flow_delete(&self, flow_id: Uuid) -> Result<Flow, RequestError>;

    async fn flow_v1_flow_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Flow>, RequestError>;

    /// Replaces the actions of a flow.
    async fn flow_v1_flow_update_actions(
        &self,
        flow_id: Uuid,
        actions: &[Action],
    ) -> Result<Flow, RequestError>;

    /// Gets a single action of a flow.
    async fn flow_v1_action_get(
        &self,
        flow_id: Uuid,
        action_id: Uuid,
    ) -> Result<Action, RequestError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    customer_id: Uuid,
    #[serde(rename = "type")]
    flow_type: &'a str,
    name: &'a str,
    detail: &'a str,
    actions: &'a [Action],
    persist: bool,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    name: &'a str,
    detail: &'a str,
    actions: &'a [Action],
}

#[derive(Serialize)]
struct ActionsRequest<'a> {
    actions: &'a [Action],
}

impl RequestHandler {
    async fn flow_request<T>(&self, resource: &str, request: Request) -> Result<T, RequestError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .send(QueueName::FLOW_REQUEST, resource, request)
            .await?;
        parse_response(response)
    }
}

#[async_trait]
impl FlowManager for RequestHandler {
    async fn flow_v1_flow_create(
        &self,
        customer_id: Uuid,
        flow_type: &str,
        name: &str,
        detail: &str,
        actions: &[Action],
        persist: bool,
    ) -> Result<Flow, RequestError> {
        let request = self.new_json_request(
            "/v1/flows",
            RequestMethod::Post,
            &CreateRequest {
                customer_id,
                flow_type,
                name,
                detail,
                actions,
                persist,
            },
        )?;
        self.flow_request(RESOURCE_FLOWS, request).await
    }

    async fn flow_v1_flow_update(
        &self,
        flow_id: Uuid,
        name: &str,
        detail: &str,
        actions: &[Action],
    ) -> Result<Flow, RequestError> {
        let request = self.new_json_request(
            format!("/v1/flows/{flow_id}"),
            RequestMethod::Put,
            &UpdateRequest {
                name,
                detail,
                actions,
            },
        )?;
        self.flow_request(RESOURCE_FLOWS, request).await
    }

    async fn flow_v1_flow_get(&self, flow_id: Uuid) -> Result<Flow, RequestError> {
        let request = self
            .new_request(format!("/v1/flows/{flow_id}"), RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        self.flow_request(RESOURCE_FLOWS, request).await
    }

    async fn flow_v1_flow_delete(&self, flow_id: Uuid) -> Result<Flow, RequestError> {
        let request = self
            .new_request(format!("/v1/flows/{flow_id}"), RequestMethod::Delete)
            .with_data_type(CONTENT_TYPE_JSON);
        self.flow_request(RESOURCE_FLOWS, request).await
    }

    async fn flow_v1_flow_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Flow>, RequestError> {
        let uri = merge_filters(page_uri("/v1/flows", page_token, page_size), filters);
        let request = self
            .new_request(uri, RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        self.flow_request(RESOURCE_FLOWS, request).await
    }

    async fn flow_v1_flow_update_actions(
        &self,
        flow_id: Uuid,
        actions: &[Action],
    ) -> Result<Flow, RequestError> {
        let request = self.new_json_request(
            format!("/v1/flows/{flow_id}/actions"),
            RequestMethod::Put,
            &ActionsRequest { actions },
        )?;
        self.flow_request("flow/flows/<flow-id>/actions", request)
            .await
    }

    async fn flow_v1_action_get(
        &self,
        flow_id: Uuid,
        action_id: Uuid,
    ) -> Result<Action, RequestError> {
        let request = self
            .new_request(
                format!("/v1/flows/{flow_id}/actions/{action_id}"),
                RequestMethod::Get,
            )
            .with_data_type(CONTENT_TYPE_JSON);
        self.flow_request("flow/flows/<flow-id>/actions", request)
            .await
    }
}
