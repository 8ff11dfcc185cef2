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

use crate::models::{Action, Campaign, CampaignEndHandle, CampaignStatus, CampaignType};
use crate::query::page_uri;
use crate::{QueueName, Request, RequestMethod, CONTENT_TYPE_JSON};

use super::{check_deferrable_response, parse_response, RequestError, RequestHandler};

const RESOURCE_CAMPAIGNS: &str = "campaign/campaigns";

#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait CampaignManager: Send + Sync {
    /// Creates a campaign.
    ///
    /// # Arguments
    ///
    /// * `campaign_id` - The ID to assign. The nil UUID lets the campaign-manager pick one.
    /// * `service_level` - Percentage of calls to dial per available agent.
    /// * `outplan_id` - The dialing plan of the campaign.
    /// * `outdial_id` - The list of targets to dial.
    /// * `queue_id` - The queue answered calls are put into.
    /// * `next_campaign_id` - The campaign to run once this one has finished.
    #[allow(clippy::too_many_arguments)]
    async fn campaign_v1_campaign_create(
        &self,
        campaign_id: Uuid,
        customer_id: Uuid,
        campaign_type: CampaignType,
        name: &str,
        detail: &str,
        service_level: i32,
        end_handle: CampaignEndHandle,
        actions: &[Action],
        outplan_id: Uuid,
        outdial_id: Uuid,
        queue_id: Uuid,
        next_campaign_id: Uuid,
    ) -> Result<Campaign, RequestError>;

    async fn campaign_v1_campaign_gets_by_customer_id(
        &self,
        customer_id: Uuid,
        page_token: &str,
        page_size: u64,
    ) -> Result<Vec<Campaign>, RequestError>;

    async fn campaign_v1_campaign_get(&self, campaign_id: Uuid) -> Result<Campaign, RequestError>;

    async fn campaign_v1_campaign_delete(
        &self,
        campaign_id: Uuid,
    ) -> Result<Campaign, RequestError>;

    /// Makes the campaign dial its next targets, optionally after `delay` milliseconds.
    async fn campaign_v1_campaign_execute(
        &self,
        campaign_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError>;

    async fn campaign_v1_campaign_update_basic_info(
        &self,
        campaign_id: Uuid,
        name: &str,
        detail: &str,
        campaign_type: CampaignType,
        service_level: i32,
        end_handle: CampaignEndHandle,
    ) -> Result<Campaign, RequestError>;

    async fn campaign_v1_campaign_update_status(
        &self,
        campaign_id: Uuid,
        status: CampaignStatus,
    ) -> Result<Campaign, RequestError>;

    async fn campaign_v1_campaign_update_service_level(
        &self,
        campaign_id: Uuid,
        service_level: i32,
    ) -> Result<Campaign, RequestError>;

    async fn campaign_v1_campaign_update_actions(
        &self,
        campaign_id: Uuid,
        actions: &[Action],
    ) -> Result<Campaign, RequestError>;

    async fn campaign_v1_campaign_update_resource_info(
        &self,
        campaign_id: Uuid,
        outplan_id: Uuid,
        outdial_id: Uuid,
        queue_id: Uuid,
        next_campaign_id: Uuid,
    ) -> Result<Campaign, RequestError>;

    async fn campaign_v1_campaign_update_next_campaign_id(
        &self,
        campaign_id: Uuid,
        next_campaign_id: Uuid,
    ) -> Result<Campaign, RequestError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    id: Uuid,
    customer_id: Uuid,
    #[serde(rename = "type")]
    campaign_type: CampaignType,
    name: &'a str,
    detail: &'a str,
    service_level: i32,
    end_handle: CampaignEndHandle,
    actions: &'a [Action],
    outplan_id: Uuid,
    outdial_id: Uuid,
    queue_id: Uuid,
    next_campaign_id: Uuid,
}

#[derive(Serialize)]
struct BasicInfoRequest<'a> {
    name: &'a str,
    detail: &'a str,
    #[serde(rename = "type")]
    campaign_type: CampaignType,
    service_level: i32,
    end_handle: CampaignEndHandle,
}

#[derive(Serialize)]
struct StatusRequest {
    status: CampaignStatus,
}

#[derive(Serialize)]
struct ServiceLevelRequest {
    service_level: i32,
}

#[derive(Serialize)]
struct ActionsRequest<'a> {
    actions: &'a [Action],
}

#[derive(Serialize)]
struct ResourceInfoRequest {
    outplan_id: Uuid,
    outdial_id: Uuid,
    queue_id: Uuid,
    next_campaign_id: Uuid,
}

#[derive(Serialize)]
struct NextCampaignIdRequest {
    next_campaign_id: Uuid,
}

impl RequestHandler {
    async fn campaign_entity<T>(&self, resource: &str, request: Request) -> Result<T, RequestError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .send(QueueName::CAMPAIGN_REQUEST, resource, request)
            .await?;
        parse_response(response)
    }

    async fn campaign_update<B>(
        &self,
        campaign_id: Uuid,
        suffix: &str,
        body: &B,
    ) -> Result<Campaign, RequestError>
    where
        B: Serialize + Sync,
    {
        let request = self.new_json_request(
            format!("/v1/campaigns/{campaign_id}{suffix}"),
            RequestMethod::Put,
            body,
        )?;
        self.campaign_entity(RESOURCE_CAMPAIGNS, request).await
    }
}

#[async_trait]
impl CampaignManager for RequestHandler {
    async fn campaign_v1_campaign_create(
        &self,
        campaign_id: Uuid,
        customer_id: Uuid,
        campaign_type: CampaignType,
        name: &str,
        detail: &str,
        service_level: i32,
        end_handle: CampaignEndHandle,
        actions: &[Action],
        outplan_id: Uuid,
        outdial_id: Uuid,
        queue_id: Uuid,
        next_campaign_id: Uuid,
    ) -> Result<Campaign, RequestError> {
        let request = self.new_json_request(
            "/v1/campaigns",
            RequestMethod::Post,
            &CreateRequest {
                id: campaign_id,
                customer_id,
                campaign_type,
                name,
                detail,
                service_level,
                end_handle,
                actions,
                outplan_id,
                outdial_id,
                queue_id,
                next_campaign_id,
            },
        )?;
        self.campaign_entity(RESOURCE_CAMPAIGNS, request).await
    }

    async fn campaign_v1_campaign_gets_by_customer_id(
        &self,
        customer_id: Uuid,
        page_token: &str,
        page_size: u64,
    ) -> Result<Vec<Campaign>, RequestError> {
        let uri = format!(
            "{}&customer_id={customer_id}",
            page_uri("/v1/campaigns", page_token, page_size)
        );
        let request = self
            .new_request(uri, RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        self.campaign_entity(RESOURCE_CAMPAIGNS, request).await
    }

    async fn campaign_v1_campaign_get(&self, campaign_id: Uuid) -> Result<Campaign, RequestError> {
        let request = self
            .new_request(format!("/v1/campaigns/{campaign_id}"), RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        self.campaign_entity(RESOURCE_CAMPAIGNS, request).await
    }

    async fn campaign_v1_campaign_delete(
        &self,
        campaign_id: Uuid,
    ) -> Result<Campaign, RequestError> {
        let request = self
            .new_request(format!("/v1/campaigns/{campaign_id}"), RequestMethod::Delete)
            .with_data_type(CONTENT_TYPE_JSON);
        self.campaign_entity(RESOURCE_CAMPAIGNS, request).await
    }

    async fn campaign_v1_campaign_execute(
        &self,
        campaign_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError> {
        let request = self
            .new_request(
                format!("/v1/campaigns/{campaign_id}/execute"),
                RequestMethod::Post,
            )
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .dispatch(
                QueueName::CAMPAIGN_REQUEST,
                "campaign/campaigns/<campaign-id>/execute",
                request,
                self.default_timeout(),
                delay,
            )
            .await?;
        check_deferrable_response(response, delay)
    }

    async fn campaign_v1_campaign_update_basic_info(
        &self,
        campaign_id: Uuid,
        name: &str,
        detail: &str,
        campaign_type: CampaignType,
        service_level: i32,
        end_handle: CampaignEndHandle,
    ) -> Result<Campaign, RequestError> {
        self.campaign_update(
            campaign_id,
            "",
            &BasicInfoRequest {
                name,
                detail,
                campaign_type,
                service_level,
                end_handle,
            },
        )
        .await
    }

    async fn campaign_v1_campaign_update_status(
        &self,
        campaign_id: Uuid,
        status: CampaignStatus,
    ) -> Result<Campaign, RequestError> {
        self.campaign_update(campaign_id, "/status", &StatusRequest { status })
            .await
    }

    async fn campaign_v1_campaign_update_service_level(
        &self,
        campaign_id: Uuid,
        service_level: i32,
    ) -> Result<Campaign, RequestError> {
        self.campaign_update(
            campaign_id,
            "/service_level",
            &ServiceLevelRequest { service_level },
        )
        .await
    }

    async fn campaign_v1_campaign_update_actions(
        &self,
        campaign_id: Uuid,
        actions: &[Action],
    ) -> Result<Campaign, RequestError> {
        self.campaign_update(campaign_id, "/actions", &ActionsRequest { actions })
            .await
    }

    async fn campaign_v1_campaign_update_resource_info(
        &self,
        campaign_id: Uuid,
        outplan_id: Uuid,
        outdial_id: Uuid,
        queue_id: Uuid,
        next_campaign_id: Uuid,
    ) -> Result<Campaign, RequestError> {
        self.campaign_update(
            campaign_id,
            "/resource_info",
            &ResourceInfoRequest {
                outplan_id,
                outdial_id,
                queue_id,
                next_campaign_id,
            },
        )
        .await
    }

    async fn campaign_v1_campaign_update_next_campaign_id(
        &self,
        campaign_id: Uuid,
        next_campaign_id: Uuid,
    ) -> Result<Campaign, RequestError> {
        self.campaign_update(
            campaign_id,
            "/next_campaign_id",
            &NextCampaignIdRequest { next_campaign_id },
        )
        .await
    }
}
