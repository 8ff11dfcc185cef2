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

use crate::models::{Action, Agent, AgentStatus, Queue, QueueExecute, Queuecall, RoutingMethod};
use crate::query::{merge_filters, page_uri, QueryFilters};
use crate::{QueueName, RequestMethod, CONTENT_TYPE_JSON};

use super::{check_deferrable_response, parse_response, RequestError, RequestHandler};

const RESOURCE_QUEUES: &str = "queue/queues";

/// Operations of the queue-manager concerning queues.
///
/// Timeouts of a queue are given in milliseconds.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait QueueManager: Send + Sync {
    async fn queue_v1_queue_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Queue>, RequestError>;

    async fn queue_v1_queue_get(&self, queue_id: Uuid) -> Result<Queue, RequestError>;

    /// Gets the agents serving a queue.
    ///
    /// # Arguments
    ///
    /// * `status` - Only include agents in this status. [`AgentStatus::None`] includes all agents.
    async fn queue_v1_queue_get_agents(
        &self,
        queue_id: Uuid,
        status: AgentStatus,
    ) -> Result<Vec<Agent>, RequestError>;

    #[allow(clippy::too_many_arguments)]
    async fn queue_v1_queue_create(
        &self,
        customer_id: Uuid,
        name: &str,
        detail: &str,
        routing_method: RoutingMethod,
        tag_ids: &[Uuid],
        wait_actions: &[Action],
        wait_timeout: u64,
        service_timeout: u64,
    ) -> Result<Queue, RequestError>;

    async fn queue_v1_queue_delete(&self, queue_id: Uuid) -> Result<Queue, RequestError>;

    #[allow(clippy::too_many_arguments)]
    async fn queue_v1_queue_update(
        &self,
        queue_id: Uuid,
        name: &str,
        detail: &str,
        routing_method: RoutingMethod,
        tag_ids: &[Uuid],
        wait_actions: &[Action],
        wait_timeout: u64,
        service_timeout: u64,
    ) -> Result<Queue, RequestError>;

    async fn queue_v1_queue_update_tag_ids(
        &self,
        queue_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<Queue, RequestError>;

    async fn queue_v1_queue_update_routing_method(
        &self,
        queue_id: Uuid,
        routing_method: RoutingMethod,
    ) -> Result<Queue, RequestError>;

    async fn queue_v1_queue_update_actions(
        &self,
        queue_id: Uuid,
        wait_actions: &[Action],
        wait_timeout: u64,
        service_timeout: u64,
    ) -> Result<Queue, RequestError>;

    /// Puts a call or another reference into a queue.
    ///
    /// # Arguments
    ///
    /// * `exit_action_id` - The action of the reference's flow to continue with once
    ///   the reference leaves the queue.
    async fn queue_v1_queue_create_queuecall(
        &self,
        queue_id: Uuid,
        reference_type: &str,
        reference_id: Uuid,
        reference_activeflow_id: Uuid,
        exit_action_id: Uuid,
    ) -> Result<Queuecall, RequestError>;

    /// Makes the queue try to dispatch its waiting calls, optionally after a delay.
    async fn queue_v1_queue_execute_run(
        &self,
        queue_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError>;

    async fn queue_v1_queue_update_execute(
        &self,
        queue_id: Uuid,
        execute: QueueExecute,
    ) -> Result<Queue, RequestError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    customer_id: Uuid,
    name: &'a str,
    detail: &'a str,
    routing_method: RoutingMethod,
    tag_ids: &'a [Uuid],
    wait_actions: &'a [Action],
    wait_timeout: u64,
    service_timeout: u64,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    name: &'a str,
    detail: &'a str,
    routing_method: RoutingMethod,
    tag_ids: &'a [Uuid],
    wait_actions: &'a [Action],
    wait_timeout: u64,
    service_timeout: u64,
}

#[derive(Serialize)]
struct TagIdsRequest<'a> {
    tag_ids: &'a [Uuid],
}

#[derive(Serialize)]
struct RoutingMethodRequest {
    routing_method: RoutingMethod,
}

#[derive(Serialize)]
struct ActionsRequest<'a> {
    wait_actions: &'a [Action],
    wait_timeout: u64,
    service_timeout: u64,
}

#[derive(Serialize)]
struct CreateQueuecallRequest<'a> {
    reference_type: &'a str,
    reference_id: Uuid,
    reference_activeflow_id: Uuid,
    exit_action_id: Uuid,
}

#[derive(Serialize)]
struct ExecuteRequest {
    execute: QueueExecute,
}

#[async_trait]
impl QueueManager for RequestHandler {
    async fn queue_v1_queue_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Queue>, RequestError> {
        let uri = merge_filters(page_uri("/v1/queues", page_token, page_size), filters);
        let request = self
            .new_request(uri, RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .send(QueueName::QUEUE_REQUEST, RESOURCE_QUEUES, request)
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queue_get(&self, queue_id: Uuid) -> Result<Queue, RequestError> {
        let request = self
            .new_request(format!("/v1/queues/{queue_id}"), RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .send(QueueName::QUEUE_REQUEST, RESOURCE_QUEUES, request)
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queue_get_agents(
        &self,
        queue_id: Uuid,
        status: AgentStatus,
    ) -> Result<Vec<Agent>, RequestError> {
        let request = self
            .new_request(
                format!("/v1/queues/{queue_id}/agents?status={status}"),
                RequestMethod::Get,
            )
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .send(QueueName::QUEUE_REQUEST, "queue/queues/<queue-id>/agents", request)
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queue_create(
        &self,
        customer_id: Uuid,
        name: &str,
        detail: &str,
        routing_method: RoutingMethod,
        tag_ids: &[Uuid],
        wait_actions: &[Action],
        wait_timeout: u64,
        service_timeout: u64,
    ) -> Result<Queue, RequestError> {
        let request = self.new_json_request(
            "/v1/queues",
            RequestMethod::Post,
            &CreateRequest {
                customer_id,
                name,
                detail,
                routing_method,
                tag_ids,
                wait_actions,
                wait_timeout,
                service_timeout,
            },
        )?;
        let response = self
            .send(QueueName::QUEUE_REQUEST, RESOURCE_QUEUES, request)
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queue_delete(&self, queue_id: Uuid) -> Result<Queue, RequestError> {
        let request = self
            .new_request(format!("/v1/queues/{queue_id}"), RequestMethod::Delete)
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .send(QueueName::QUEUE_REQUEST, RESOURCE_QUEUES, request)
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queue_update(
        &self,
        queue_id: Uuid,
        name: &str,
        detail: &str,
        routing_method: RoutingMethod,
        tag_ids: &[Uuid],
        wait_actions: &[Action],
        wait_timeout: u64,
        service_timeout: u64,
    ) -> Result<Queue, RequestError> {
        let request = self.new_json_request(
            format!("/v1/queues/{queue_id}"),
            RequestMethod::Put,
            &UpdateRequest {
                name,
                detail,
                routing_method,
                tag_ids,
                wait_actions,
                wait_timeout,
                service_timeout,
            },
        )?;
        let response = self
            .send(QueueName::QUEUE_REQUEST, RESOURCE_QUEUES, request)
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queue_update_tag_ids(
        &self,
        queue_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<Queue, RequestError> {
        let request = self.new_json_request(
            format!("/v1/queues/{queue_id}/tag_ids"),
            RequestMethod::Put,
            &TagIdsRequest { tag_ids },
        )?;
        let response = self
            .send(QueueName::QUEUE_REQUEST, "queue/queues/<queue-id>/tag_ids", request)
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queue_update_routing_method(
        &self,
        queue_id: Uuid,
        routing_method: RoutingMethod,
    ) -> Result<Queue, RequestError> {
        let request = self.new_json_request(
            format!("/v1/queues/{queue_id}/routing_method"),
            RequestMethod::Put,
            &RoutingMethodRequest { routing_method },
        )?;
        let response = self
            .send(
                QueueName::QUEUE_REQUEST,
                "queue/queues/<queue-id>/routing_method",
                request,
            )
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queue_update_actions(
        &self,
        queue_id: Uuid,
        wait_actions: &[Action],
        wait_timeout: u64,
        service_timeout: u64,
    ) -> Result<Queue, RequestError> {
        let request = self.new_json_request(
            format!("/v1/queues/{queue_id}/wait_actions"),
            RequestMethod::Put,
            &ActionsRequest {
                wait_actions,
                wait_timeout,
                service_timeout,
            },
        )?;
        let response = self
            .send(
                QueueName::QUEUE_REQUEST,
                "queue/queues/<queue-id>/wait_actions",
                request,
            )
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queue_create_queuecall(
        &self,
        queue_id: Uuid,
        reference_type: &str,
        reference_id: Uuid,
        reference_activeflow_id: Uuid,
        exit_action_id: Uuid,
    ) -> Result<Queuecall, RequestError> {
        let request = self.new_json_request(
            format!("/v1/queues/{queue_id}/queuecalls"),
            RequestMethod::Post,
            &CreateQueuecallRequest {
                reference_type,
                reference_id,
                reference_activeflow_id,
                exit_action_id,
            },
        )?;
        let response = self
            .send(
                QueueName::QUEUE_REQUEST,
                "queue/queues/<queue-id>/queuecalls",
                request,
            )
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queue_execute_run(
        &self,
        queue_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError> {
        let request = self
            .new_request(
                format!("/v1/queues/{queue_id}/execute_run"),
                RequestMethod::Post,
            )
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .dispatch(
                QueueName::QUEUE_REQUEST,
                "queue/queues/<queue-id>/execute_run",
                request,
                self.default_timeout(),
                delay,
            )
            .await?;
        check_deferrable_response(response, delay)
    }

    async fn queue_v1_queue_update_execute(
        &self,
        queue_id: Uuid,
        execute: QueueExecute,
    ) -> Result<Queue, RequestError> {
        let request = self.new_json_request(
            format!("/v1/queues/{queue_id}/execute"),
            RequestMethod::Put,
            &ExecuteRequest { execute },
        )?;
        let response = self
            .send(QueueName::QUEUE_REQUEST, "queue/queues/<queue-id>/execute", request)
            .await?;
        parse_response(response)
    }
}
