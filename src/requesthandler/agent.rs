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

use crate::models::{Address, Agent, AgentStatus, Permission, RingMethod};
use crate::query::{page_uri, FieldFilters};
use crate::{QueueName, RequestMethod};

use super::{parse_response, RequestError, RequestHandler};

const RESOURCE_AGENTS: &str = "agent/agents";
const RESOURCE_AGENT: &str = "agent/agents/<agent-id>";

/// Operations of the agent-manager.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait AgentManager: Send + Sync {
    /// Creates a new agent.
    ///
    /// # Arguments
    ///
    /// * `timeout` - The number of milliseconds to wait for the reply, 0 for the default.
    /// * `password` - The agent's password in clear text. The agent-manager only keeps its hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent or the agent-manager
    /// replied with a failure status.
    #[allow(clippy::too_many_arguments)]
    async fn agent_v1_agent_create(
        &self,
        timeout: u64,
        customer_id: Uuid,
        username: &str,
        password: &str,
        name: &str,
        detail: &str,
        ring_method: RingMethod,
        permission: Permission,
        tag_ids: &[Uuid],
        addresses: &[Address],
    ) -> Result<Agent, RequestError>;

    async fn agent_v1_agent_get(&self, agent_id: Uuid) -> Result<Agent, RequestError>;

    /// Finds the agent of a customer that can be reached at the given address.
    async fn agent_v1_agent_get_by_customer_id_address(
        &self,
        timeout: u64,
        customer_id: Uuid,
        address: &Address,
    ) -> Result<Agent, RequestError>;

    /// Gets a page of agents matching the given filters, e.g. `{"deleted":false}`.
    async fn agent_v1_agent_list(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &FieldFilters,
    ) -> Result<Vec<Agent>, RequestError>;

    /// Gets the agents of a customer carrying any of the given tags.
    async fn agent_v1_agent_gets_by_tag_ids(
        &self,
        customer_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<Vec<Agent>, RequestError>;

    async fn agent_v1_agent_gets_by_tag_ids_and_status(
        &self,
        customer_id: Uuid,
        tag_ids: &[Uuid],
        status: AgentStatus,
    ) -> Result<Vec<Agent>, RequestError>;

    async fn agent_v1_agent_delete(&self, agent_id: Uuid) -> Result<Agent, RequestError>;

    async fn agent_v1_agent_update_addresses(
        &self,
        agent_id: Uuid,
        addresses: &[Address],
    ) -> Result<Agent, RequestError>;

    async fn agent_v1_agent_update_password(
        &self,
        timeout: u64,
        agent_id: Uuid,
        password: &str,
    ) -> Result<Agent, RequestError>;

    async fn agent_v1_agent_update(
        &self,
        agent_id: Uuid,
        name: &str,
        detail: &str,
        ring_method: RingMethod,
    ) -> Result<Agent, RequestError>;

    async fn agent_v1_agent_update_tag_ids(
        &self,
        agent_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<Agent, RequestError>;

    async fn agent_v1_agent_update_status(
        &self,
        agent_id: Uuid,
        status: AgentStatus,
    ) -> Result<Agent, RequestError>;

    async fn agent_v1_agent_update_permission(
        &self,
        agent_id: Uuid,
        permission: Permission,
    ) -> Result<Agent, RequestError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    customer_id: Uuid,
    username: &'a str,
    password: &'a str,
    name: &'a str,
    detail: &'a str,
    ring_method: RingMethod,
    permission: Permission,
    tag_ids: &'a [Uuid],
    addresses: &'a [Address],
}

#[derive(Serialize)]
struct GetByCustomerIdAddressRequest<'a> {
    customer_id: Uuid,
    address: &'a Address,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    name: &'a str,
    detail: &'a str,
    ring_method: RingMethod,
}

#[derive(Serialize)]
struct AddressesRequest<'a> {
    addresses: &'a [Address],
}

#[derive(Serialize)]
struct PasswordRequest<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct TagIdsRequest<'a> {
    tag_ids: &'a [Uuid],
}

#[derive(Serialize)]
struct StatusRequest {
    status: AgentStatus,
}

#[derive(Serialize)]
struct PermissionRequest {
    permission: Permission,
}

fn tag_ids_uri(customer_id: Uuid, tag_ids: &[Uuid]) -> String {
    let tag_ids = tag_ids
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("/v1/agents?customer_id={customer_id}&tag_ids={tag_ids}")
}

#[async_trait]
impl AgentManager for RequestHandler {
    async fn agent_v1_agent_create(
        &self,
        timeout: u64,
        customer_id: Uuid,
        username: &str,
        password: &str,
        name: &str,
        detail: &str,
        ring_method: RingMethod,
        permission: Permission,
        tag_ids: &[Uuid],
        addresses: &[Address],
    ) -> Result<Agent, RequestError> {
        let request = self.new_json_request(
            "/v1/agents",
            RequestMethod::Post,
            &CreateRequest {
                customer_id,
                username,
                password,
                name,
                detail,
                ring_method,
                permission,
                tag_ids,
                addresses,
            },
        )?;
        let response = self
            .dispatch(
                QueueName::AGENT_REQUEST,
                RESOURCE_AGENTS,
                request,
                self.timeout_or_default(timeout),
                0,
            )
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_get(&self, agent_id: Uuid) -> Result<Agent, RequestError> {
        let request = self.new_request(format!("/v1/agents/{agent_id}"), RequestMethod::Get);
        let response = self
            .send(QueueName::AGENT_REQUEST, RESOURCE_AGENT, request)
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_get_by_customer_id_address(
        &self,
        timeout: u64,
        customer_id: Uuid,
        address: &Address,
    ) -> Result<Agent, RequestError> {
        let request = self.new_json_request(
            "/v1/agents/get_by_customer_id_address",
            RequestMethod::Post,
            &GetByCustomerIdAddressRequest {
                customer_id,
                address,
            },
        )?;
        let response = self
            .dispatch(
                QueueName::AGENT_REQUEST,
                "agent/agents/get_by_customer_id_address",
                request,
                self.timeout_or_default(timeout),
                0,
            )
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_list(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &FieldFilters,
    ) -> Result<Vec<Agent>, RequestError> {
        let request = self.new_json_request(
            page_uri("/v1/agents", page_token, page_size),
            RequestMethod::Get,
            filters,
        )?;
        let response = self
            .send(QueueName::AGENT_REQUEST, RESOURCE_AGENTS, request)
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_gets_by_tag_ids(
        &self,
        customer_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<Vec<Agent>, RequestError> {
        let request = self.new_request(tag_ids_uri(customer_id, tag_ids), RequestMethod::Get);
        let response = self
            .send(QueueName::AGENT_REQUEST, RESOURCE_AGENTS, request)
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_gets_by_tag_ids_and_status(
        &self,
        customer_id: Uuid,
        tag_ids: &[Uuid],
        status: AgentStatus,
    ) -> Result<Vec<Agent>, RequestError> {
        let uri = format!("{}&status={status}", tag_ids_uri(customer_id, tag_ids));
        let request = self.new_request(uri, RequestMethod::Get);
        let response = self
            .send(QueueName::AGENT_REQUEST, RESOURCE_AGENTS, request)
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_delete(&self, agent_id: Uuid) -> Result<Agent, RequestError> {
        let request = self.new_request(format!("/v1/agents/{agent_id}"), RequestMethod::Delete);
        let response = self
            .send(QueueName::AGENT_REQUEST, RESOURCE_AGENT, request)
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_update_addresses(
        &self,
        agent_id: Uuid,
        addresses: &[Address],
    ) -> Result<Agent, RequestError> {
        let request = self.new_json_request(
            format!("/v1/agents/{agent_id}/addresses"),
            RequestMethod::Put,
            &AddressesRequest { addresses },
        )?;
        let response = self
            .send(
                QueueName::AGENT_REQUEST,
                "agent/agents/<agent-id>/addresses",
                request,
            )
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_update_password(
        &self,
        timeout: u64,
        agent_id: Uuid,
        password: &str,
    ) -> Result<Agent, RequestError> {
        let request = self.new_json_request(
            format!("/v1/agents/{agent_id}/password"),
            RequestMethod::Put,
            &PasswordRequest { password },
        )?;
        let response = self
            .dispatch(
                QueueName::AGENT_REQUEST,
                "agent/agents/<agent-id>/password",
                request,
                self.timeout_or_default(timeout),
                0,
            )
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_update(
        &self,
        agent_id: Uuid,
        name: &str,
        detail: &str,
        ring_method: RingMethod,
    ) -> Result<Agent, RequestError> {
        let request = self.new_json_request(
            format!("/v1/agents/{agent_id}"),
            RequestMethod::Put,
            &UpdateRequest {
                name,
                detail,
                ring_method,
            },
        )?;
        let response = self
            .send(QueueName::AGENT_REQUEST, RESOURCE_AGENT, request)
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_update_tag_ids(
        &self,
        agent_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<Agent, RequestError> {
        let request = self.new_json_request(
            format!("/v1/agents/{agent_id}/tag_ids"),
            RequestMethod::Put,
            &TagIdsRequest { tag_ids },
        )?;
        let response = self
            .send(
                QueueName::AGENT_REQUEST,
                "agent/agents/<agent-id>/tag_ids",
                request,
            )
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_update_status(
        &self,
        agent_id: Uuid,
        status: AgentStatus,
    ) -> Result<Agent, RequestError> {
        let request = self.new_json_request(
            format!("/v1/agents/{agent_id}/status"),
            RequestMethod::Put,
            &StatusRequest { status },
        )?;
        let response = self
            .send(
                QueueName::AGENT_REQUEST,
                "agent/agents/<agent-id>/status",
                request,
            )
            .await?;
        parse_response(response)
    }

    async fn agent_v1_agent_update_permission(
        &self,
        agent_id: Uuid,
        permission: Permission,
    ) -> Result<Agent, RequestError> {
        let request = self.new_json_request(
            format!("/v1/agents/{agent_id}/permission"),
            RequestMethod::Put,
            &PermissionRequest { permission },
        )?;
        let response = self
            .send(
                QueueName::AGENT_REQUEST,
                "agent/agents/<agent-id>/permission",
                request,
            )
            .await?;
        parse_response(response)
    }
}
