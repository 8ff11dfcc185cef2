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

use crate::models::{Action, Activeflow};
use crate::query::{merge_filters, page_uri, QueryFilters};
use crate::{QueueName, Request, RequestMethod, CONTENT_TYPE_JSON};

use super::{
    check_deferrable_response, check_response, parse_response, RequestError, RequestHandler,
};

const RESOURCE_ACTIVEFLOWS: &str = "flow/activeflows";

/// Operations of the flow-manager concerning running flows.
///
/// An activeflow executes the actions of a flow on behalf of a reference, e.g. a call
/// or a conversation.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait ActiveflowManager: Send + Sync {
    /// Starts running a flow for a reference.
    ///
    /// # Arguments
    ///
    /// * `activeflow_id` - The ID to assign to the activeflow. The nil UUID lets the
    ///   flow-manager pick one.
    async fn flow_v1_activeflow_create(
        &self,
        activeflow_id: Uuid,
        customer_id: Uuid,
        flow_id: Uuid,
        reference_type: &str,
        reference_id: Uuid,
    ) -> Result<Activeflow, RequestError>;

    /// Gets the action to execute after the given one.
    async fn flow_v1_activeflow_get_next_action(
        &self,
        activeflow_id: Uuid,
        current_action_id: Uuid,
    ) -> Result<Action, RequestError>;

    /// Makes the activeflow jump to another action.
    ///
    /// # Arguments
    ///
    /// * `forward_now` - Whether to interrupt the action currently being executed.
    async fn flow_v1_activeflow_update_forward_action_id(
        &self,
        activeflow_id: Uuid,
        forward_action_id: Uuid,
        forward_now: bool,
    ) -> Result<(), RequestError>;

    async fn flow_v1_activeflow_execute(&self, activeflow_id: Uuid) -> Result<(), RequestError>;

    async fn flow_v1_activeflow_delete(
        &self,
        activeflow_id: Uuid,
    ) -> Result<Activeflow, RequestError>;

    async fn flow_v1_activeflow_stop(&self, activeflow_id: Uuid)
        -> Result<Activeflow, RequestError>;

    async fn flow_v1_activeflow_get(&self, activeflow_id: Uuid)
        -> Result<Activeflow, RequestError>;

    async fn flow_v1_activeflow_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Activeflow>, RequestError>;

    /// Appends actions right after the current action.
    async fn flow_v1_activeflow_add_actions(
        &self,
        activeflow_id: Uuid,
        actions: &[Action],
    ) -> Result<Activeflow, RequestError>;

    /// Pushes actions onto a new stack which is executed before the rest of the flow.
    async fn flow_v1_activeflow_push_actions(
        &self,
        activeflow_id: Uuid,
        actions: &[Action],
    ) -> Result<Activeflow, RequestError>;

    /// Tells the activeflow that a service it is waiting for has stopped.
    async fn flow_v1_activeflow_service_stop(
        &self,
        activeflow_id: Uuid,
        service_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    id: Uuid,
    customer_id: Uuid,
    flow_id: Uuid,
    reference_type: &'a str,
    reference_id: Uuid,
}

#[derive(Serialize)]
struct NextActionRequest {
    current_action_id: Uuid,
}

#[derive(Serialize)]
struct ForwardActionIdRequest {
    forward_action_id: Uuid,
    forward_now: bool,
}

#[derive(Serialize)]
struct ActionsRequest<'a> {
    actions: &'a [Action],
}

#[derive(Serialize)]
struct ServiceStopRequest {
    service_id: Uuid,
}

impl RequestHandler {
    async fn activeflow_entity(
        &self,
        resource: &str,
        request: Request,
    ) -> Result<Activeflow, RequestError> {
        let response = self
            .send(QueueName::FLOW_REQUEST, resource, request)
            .await?;
        parse_response(response)
    }
}

#[async_trait]
impl ActiveflowManager for RequestHandler {
    async fn flow_v1_activeflow_create(
        &self,
        activeflow_id: Uuid,
        customer_id: Uuid,
        flow_id: Uuid,
        reference_type: &str,
        reference_id: Uuid,
    ) -> Result<Activeflow, RequestError> {
        let request = self.new_json_request(
            "/v1/activeflows",
            RequestMethod::Post,
            &CreateRequest {
                id: activeflow_id,
                customer_id,
                flow_id,
                reference_type,
                reference_id,
            },
        )?;
        self.activeflow_entity(RESOURCE_ACTIVEFLOWS, request).await
    }

    async fn flow_v1_activeflow_get_next_action(
        &self,
        activeflow_id: Uuid,
        current_action_id: Uuid,
    ) -> Result<Action, RequestError> {
        let request = self.new_json_request(
            format!("/v1/activeflows/{activeflow_id}/next"),
            RequestMethod::Get,
            &NextActionRequest { current_action_id },
        )?;
        let response = self
            .send(
                QueueName::FLOW_REQUEST,
                "flow/activeflows/<activeflow-id>/next",
                request,
            )
            .await?;
        parse_response(response)
    }

    async fn flow_v1_activeflow_update_forward_action_id(
        &self,
        activeflow_id: Uuid,
        forward_action_id: Uuid,
        forward_now: bool,
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            format!("/v1/activeflows/{activeflow_id}/forward_action_id"),
            RequestMethod::Put,
            &ForwardActionIdRequest {
                forward_action_id,
                forward_now,
            },
        )?;
        let response = self
            .send(
                QueueName::FLOW_REQUEST,
                "flow/activeflows/<activeflow-id>/forward_action_id",
                request,
            )
            .await?;
        check_response(response)
    }

    async fn flow_v1_activeflow_execute(&self, activeflow_id: Uuid) -> Result<(), RequestError> {
        let request = self
            .new_request(
                format!("/v1/activeflows/{activeflow_id}/execute"),
                RequestMethod::Post,
            )
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .send(
                QueueName::FLOW_REQUEST,
                "flow/activeflows/<activeflow-id>/execute",
                request,
            )
            .await?;
        check_response(response)
    }

    async fn flow_v1_activeflow_delete(
        &self,
        activeflow_id: Uuid,
    ) -> Result<Activeflow, RequestError> {
        let request = self
            .new_request(
                format!("/v1/activeflows/{activeflow_id}"),
                RequestMethod::Delete,
            )
            .with_data_type(CONTENT_TYPE_JSON);
        self.activeflow_entity(RESOURCE_ACTIVEFLOWS, request).await
    }

    async fn flow_v1_activeflow_stop(
        &self,
        activeflow_id: Uuid,
    ) -> Result<Activeflow, RequestError> {
        let request = self.new_request(
            format!("/v1/activeflows/{activeflow_id}/stop"),
            RequestMethod::Post,
        );
        self.activeflow_entity("flow/activeflows/<activeflow-id>/stop", request)
            .await
    }

    async fn flow_v1_activeflow_get(
        &self,
        activeflow_id: Uuid,
    ) -> Result<Activeflow, RequestError> {
        let request = self.new_request(
            format!("/v1/activeflows/{activeflow_id}"),
            RequestMethod::Get,
        );
        self.activeflow_entity(RESOURCE_ACTIVEFLOWS, request).await
    }

    async fn flow_v1_activeflow_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Activeflow>, RequestError> {
        let uri = merge_filters(page_uri("/v1/activeflows", page_token, page_size), filters);
        let request = self.new_request(uri, RequestMethod::Get);
        let response = self
            .send(QueueName::FLOW_REQUEST, RESOURCE_ACTIVEFLOWS, request)
            .await?;
        parse_response(response)
    }

    async fn flow_v1_activeflow_add_actions(
        &self,
        activeflow_id: Uuid,
        actions: &[Action],
    ) -> Result<Activeflow, RequestError> {
        let request = self.new_json_request(
            format!("/v1/activeflows/{activeflow_id}/add_actions"),
            RequestMethod::Post,
            &ActionsRequest { actions },
        )?;
        self.activeflow_entity("flow/activeflows/<activeflow-id>/add_actions", request)
            .await
    }

    async fn flow_v1_activeflow_push_actions(
        &self,
        activeflow_id: Uuid,
        actions: &[Action],
    ) -> Result<Activeflow, RequestError> {
        let request = self.new_json_request(
            format!("/v1/activeflows/{activeflow_id}/push_actions"),
            RequestMethod::Post,
            &ActionsRequest { actions },
        )?;
        self.activeflow_entity("flow/activeflows/<activeflow-id>/push_actions", request)
            .await
    }

    async fn flow_v1_activeflow_service_stop(
        &self,
        activeflow_id: Uuid,
        service_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            format!("/v1/activeflows/{activeflow_id}/service_stop"),
            RequestMethod::Post,
            &ServiceStopRequest { service_id },
        )?;
        let response = self
            .dispatch(
                QueueName::FLOW_REQUEST,
                "flow/activeflows/<activeflow-id>/service_stop",
                request,
                self.default_timeout(),
                delay,
            )
            .await?;
        check_deferrable_response(response, delay)
    }
}
