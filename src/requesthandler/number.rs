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
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::models::{timestamp, Number};
use crate::query::{page_uri, FieldFilters};
use crate::{QueueName, Request, RequestMethod, CONTENT_TYPE_JSON};

use super::{parse_response, RequestError, RequestHandler};

const RESOURCE_NUMBERS: &str = "number/numbers";

/// Selects the numbers to renew.
///
/// ```rust
/// use requesthandler::NumberRenewal;
///
/// assert_eq!(serde_json::to_string(&NumberRenewal::Days(3)).unwrap(), r#"{"days":3}"#);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NumberRenewal {
    /// All numbers whose last renewal happened before the given time.
    #[serde(rename = "tm_renew", serialize_with = "serialize_tm_renew")]
    TmRenew(DateTime<Utc>),
    /// All numbers that have not been renewed for the given number of days.
    #[serde(rename = "days")]
    Days(u64),
    /// All numbers that have not been renewed for the given number of hours.
    #[serde(rename = "hours")]
    Hours(u64),
}

fn serialize_tm_renew<S>(tm_renew: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp::format(tm_renew))
}

/// Operations of the number-manager.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait NumberManager: Send + Sync {
    /// Purchases a number.
    #[allow(clippy::too_many_arguments)]
    async fn number_v1_number_create(
        &self,
        customer_id: Uuid,
        number: &str,
        call_flow_id: Uuid,
        message_flow_id: Uuid,
        name: &str,
        detail: &str,
    ) -> Result<Number, RequestError>;

    async fn number_v1_number_list(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &FieldFilters,
    ) -> Result<Vec<Number>, RequestError>;

    async fn number_v1_number_get(&self, number_id: Uuid) -> Result<Number, RequestError>;

    /// Releases a number.
    async fn number_v1_number_delete(&self, number_id: Uuid) -> Result<Number, RequestError>;

    async fn number_v1_number_update(
        &self,
        number_id: Uuid,
        call_flow_id: Uuid,
        message_flow_id: Uuid,
        name: &str,
        detail: &str,
    ) -> Result<Number, RequestError>;

    async fn number_v1_number_update_flow_ids(
        &self,
        number_id: Uuid,
        call_flow_id: Uuid,
        message_flow_id: Uuid,
    ) -> Result<Number, RequestError>;

    /// Renews the numbers selected by `renewal`.
    ///
    /// # Returns
    ///
    /// The renewed numbers.
    async fn number_v1_number_renew(
        &self,
        renewal: NumberRenewal,
    ) -> Result<Vec<Number>, RequestError>;

    async fn number_v1_number_renew_by_tm_renew(
        &self,
        tm_renew: DateTime<Utc>,
    ) -> Result<Vec<Number>, RequestError>;

    async fn number_v1_number_renew_by_days(&self, days: u64)
        -> Result<Vec<Number>, RequestError>;

    async fn number_v1_number_renew_by_hours(
        &self,
        hours: u64,
    ) -> Result<Vec<Number>, RequestError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    customer_id: Uuid,
    number: &'a str,
    call_flow_id: Uuid,
    message_flow_id: Uuid,
    name: &'a str,
    detail: &'a str,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    call_flow_id: Uuid,
    message_flow_id: Uuid,
    name: &'a str,
    detail: &'a str,
}

#[derive(Serialize)]
struct FlowIdsRequest {
    call_flow_id: Uuid,
    message_flow_id: Uuid,
}

impl RequestHandler {
    async fn number_request<T>(&self, resource: &str, request: Request) -> Result<T, RequestError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .send(QueueName::NUMBER_REQUEST, resource, request)
            .await?;
        parse_response(response)
    }
}

#[async_trait]
impl NumberManager for RequestHandler {
    async fn number_v1_number_create(
        &self,
        customer_id: Uuid,
        number: &str,
        call_flow_id: Uuid,
        message_flow_id: Uuid,
        name: &str,
        detail: &str,
    ) -> Result<Number, RequestError> {
        let request = self.new_json_request(
            "/v1/numbers",
            RequestMethod::Post,
            &CreateRequest {
                customer_id,
                number,
                call_flow_id,
                message_flow_id,
                name,
                detail,
            },
        )?;
        self.number_request(RESOURCE_NUMBERS, request).await
    }

    async fn number_v1_number_list(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &FieldFilters,
    ) -> Result<Vec<Number>, RequestError> {
        let request = self.new_json_request(
            page_uri("/v1/numbers", page_token, page_size),
            RequestMethod::Get,
            filters,
        )?;
        self.number_request(RESOURCE_NUMBERS, request).await
    }

    async fn number_v1_number_get(&self, number_id: Uuid) -> Result<Number, RequestError> {
        let request = self
            .new_request(format!("/v1/numbers/{number_id}"), RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        self.number_request(RESOURCE_NUMBERS, request).await
    }

    async fn number_v1_number_delete(&self, number_id: Uuid) -> Result<Number, RequestError> {
        let request = self
            .new_request(format!("/v1/numbers/{number_id}"), RequestMethod::Delete)
            .with_data_type(CONTENT_TYPE_JSON);
        self.number_request(RESOURCE_NUMBERS, request).await
    }

    async fn number_v1_number_update(
        &self,
        number_id: Uuid,
        call_flow_id: Uuid,
        message_flow_id: Uuid,
        name: &str,
        detail: &str,
    ) -> Result<Number, RequestError> {
        let request = self.new_json_request(
            format!("/v1/numbers/{number_id}"),
            RequestMethod::Put,
            &UpdateRequest {
                call_flow_id,
                message_flow_id,
                name,
                detail,
            },
        )?;
        self.number_request(RESOURCE_NUMBERS, request).await
    }

    async fn number_v1_number_update_flow_ids(
        &self,
        number_id: Uuid,
        call_flow_id: Uuid,
        message_flow_id: Uuid,
    ) -> Result<Number, RequestError> {
        let request = self.new_json_request(
            format!("/v1/numbers/{number_id}/flow_ids"),
            RequestMethod::Put,
            &FlowIdsRequest {
                call_flow_id,
                message_flow_id,
            },
        )?;
        self.number_request("number/numbers/<number-id>/flow_ids", request)
            .await
    }

    async fn number_v1_number_renew(
        &self,
        renewal: NumberRenewal,
    ) -> Result<Vec<Number>, RequestError> {
        let request = self.new_json_request("/v1/numbers/renew", RequestMethod::Post, &renewal)?;
        self.number_request("number/numbers/renew", request).await
    }

    async fn number_v1_number_renew_by_tm_renew(
        &self,
        tm_renew: DateTime<Utc>,
    ) -> Result<Vec<Number>, RequestError> {
        self.number_v1_number_renew(NumberRenewal::TmRenew(tm_renew))
            .await
    }

    async fn number_v1_number_renew_by_days(
        &self,
        days: u64,
    ) -> Result<Vec<Number>, RequestError> {
        self.number_v1_number_renew(NumberRenewal::Days(days)).await
    }

    async fn number_v1_number_renew_by_hours(
        &self,
        hours: u64,
    ) -> Result<Vec<Number>, RequestError> {
        self.number_v1_number_renew(NumberRenewal::Hours(hours))
            .await
    }
}
