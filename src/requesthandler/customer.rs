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
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Customer;
use crate::query::{merge_filters, page_uri, QueryFilters};
use crate::{QueueName, RequestMethod, CONTENT_TYPE_JSON};

use super::{parse_response, RequestError, RequestHandler};

const RESOURCE_CUSTOMERS: &str = "customer/customers";

/// Operations of the customer-manager.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait CustomerManager: Send + Sync {
    /// Gets a page of customers.
    ///
    /// Each filter is sent as a `filter_<key>` query parameter.
    async fn customer_v1_customer_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Customer>, RequestError>;

    async fn customer_v1_customer_get(&self, customer_id: Uuid) -> Result<Customer, RequestError>;

    async fn customer_v1_customer_delete(
        &self,
        customer_id: Uuid,
    ) -> Result<Customer, RequestError>;

    #[allow(clippy::too_many_arguments)]
    async fn customer_v1_customer_create(
        &self,
        timeout: u64,
        name: &str,
        detail: &str,
        email: &str,
        phone_number: &str,
        address: &str,
        webhook_method: &str,
        webhook_uri: &str,
    ) -> Result<Customer, RequestError>;

    /// Replaces the basic info of a customer.
    #[allow(clippy::too_many_arguments)]
    async fn customer_v1_customer_update(
        &self,
        customer_id: Uuid,
        name: &str,
        detail: &str,
        email: &str,
        phone_number: &str,
        address: &str,
        webhook_method: &str,
        webhook_uri: &str,
    ) -> Result<Customer, RequestError>;

    /// Checks if the customer's balance covers `count` units of the given kind of service.
    ///
    /// # Arguments
    ///
    /// * `reference_type` - The billed service, e.g. `call` or `sms`.
    /// * `country` - The ISO 3166 code of the destination country.
    async fn customer_v1_customer_is_valid_balance(
        &self,
        customer_id: Uuid,
        reference_type: &str,
        country: &str,
        count: u64,
    ) -> Result<bool, RequestError>;

    async fn customer_v1_customer_update_billing_account_id(
        &self,
        customer_id: Uuid,
        billing_account_id: Uuid,
    ) -> Result<Customer, RequestError>;
}

#[derive(Serialize)]
struct BasicInfoRequest<'a> {
    name: &'a str,
    detail: &'a str,
    email: &'a str,
    phone_number: &'a str,
    address: &'a str,
    webhook_method: &'a str,
    webhook_uri: &'a str,
}

#[derive(Serialize)]
struct IsValidBalanceRequest<'a> {
    reference_type: &'a str,
    country: &'a str,
    count: u64,
}

#[derive(Deserialize)]
struct IsValidBalanceResponse {
    valid: bool,
}

#[derive(Serialize)]
struct BillingAccountIdRequest {
    billing_account_id: Uuid,
}

#[async_trait]
impl CustomerManager for RequestHandler {
    async fn customer_v1_customer_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Customer>, RequestError> {
        let uri = merge_filters(page_uri("/v1/customers", page_token, page_size), filters);
        let request = self
            .new_request(uri, RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .send(QueueName::CUSTOMER_REQUEST, RESOURCE_CUSTOMERS, request)
            .await?;
        parse_response(response)
    }

    async fn customer_v1_customer_get(&self, customer_id: Uuid) -> Result<Customer, RequestError> {
        let request = self
            .new_request(format!("/v1/customers/{customer_id}"), RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .send(QueueName::CUSTOMER_REQUEST, RESOURCE_CUSTOMERS, request)
            .await?;
        parse_response(response)
    }

    async fn customer_v1_customer_delete(
        &self,
        customer_id: Uuid,
    ) -> Result<Customer, RequestError> {
        let request = self
            .new_request(format!("/v1/customers/{customer_id}"), RequestMethod::Delete)
            .with_data_type(CONTENT_TYPE_JSON);
        let response = self
            .send(QueueName::CUSTOMER_REQUEST, RESOURCE_CUSTOMERS, request)
            .await?;
        parse_response(response)
    }

    async fn customer_v1_customer_create(
        &self,
        timeout: u64,
        name: &str,
        detail: &str,
        email: &str,
        phone_number: &str,
        address: &str,
        webhook_method: &str,
        webhook_uri: &str,
    ) -> Result<Customer, RequestError> {
        let request = self.new_json_request(
            "/v1/customers",
            RequestMethod::Post,
            &BasicInfoRequest {
                name,
                detail,
                email,
                phone_number,
                address,
                webhook_method,
                webhook_uri,
            },
        )?;
        let response = self
            .dispatch(
                QueueName::CUSTOMER_REQUEST,
                RESOURCE_CUSTOMERS,
                request,
                self.timeout_or_default(timeout),
                0,
            )
            .await?;
        parse_response(response)
    }

    async fn customer_v1_customer_update(
        &self,
        customer_id: Uuid,
        name: &str,
        detail: &str,
        email: &str,
        phone_number: &str,
        address: &str,
        webhook_method: &str,
        webhook_uri: &str,
    ) -> Result<Customer, RequestError> {
        let request = self.new_json_request(
            format!("/v1/customers/{customer_id}"),
            RequestMethod::Put,
            &BasicInfoRequest {
                name,
                detail,
                email,
                phone_number,
                address,
                webhook_method,
                webhook_uri,
            },
        )?;
        let response = self
            .send(QueueName::CUSTOMER_REQUEST, RESOURCE_CUSTOMERS, request)
            .await?;
        parse_response(response)
    }

    async fn customer_v1_customer_is_valid_balance(
        &self,
        customer_id: Uuid,
        reference_type: &str,
        country: &str,
        count: u64,
    ) -> Result<bool, RequestError> {
        let request = self.new_json_request(
            format!("/v1/customers/{customer_id}/is_valid_balance"),
            RequestMethod::Post,
            &IsValidBalanceRequest {
                reference_type,
                country,
                count,
            },
        )?;
        let response = self
            .send(
                QueueName::CUSTOMER_REQUEST,
                "customer/customers/<customer-id>/is_valid_balance",
                request,
            )
            .await?;
        parse_response::<IsValidBalanceResponse>(response).map(|res| res.valid)
    }

    async fn customer_v1_customer_update_billing_account_id(
        &self,
        customer_id: Uuid,
        billing_account_id: Uuid,
    ) -> Result<Customer, RequestError> {
        let request = self.new_json_request(
            format!("/v1/customers/{customer_id}/billing_account_id"),
            RequestMethod::Put,
            &BillingAccountIdRequest { billing_account_id },
        )?;
        let response = self
            .send(
                QueueName::CUSTOMER_REQUEST,
                "customer/customers/<customer-id>/billing_account_id",
                request,
            )
            .await?;
        parse_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_case::test_case;
    use uuid::uuid;

    use crate::requesthandler::test_support::{
        expect_request, json_request, json_response, json_typed_request,
    };
    use crate::requesthandler::DEFAULT_TIMEOUT;

    #[test_case(
        &[("deleted", "false")],
        "/v1/customers?page_token=2021-03-02+03%3A23%3A20.995000&page_size=10&filter_deleted=false";
        "deleted filter"
    )]
    #[test_case(
        &[],
        "/v1/customers?page_token=2021-03-02+03%3A23%3A20.995000&page_size=10";
        "no filters"
    )]
    #[tokio::test]
    async fn test_customer_gets(filters: &[(&str, &str)], expected_uri: &'static str) {
        let handler = expect_request(
            QueueName::CUSTOMER_REQUEST,
            json_typed_request(expected_uri, RequestMethod::Get),
            DEFAULT_TIMEOUT,
            json_response(
                r#"[{"id":"30071608-7e43-11ec-b04a-bb4270e3e223","name":"test user 1"},{"id":"5ca81a9a-7e43-11ec-b271-5b65823bfdd3","name":"test user 2"}]"#,
            ),
        );
        let filters = filters
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<QueryFilters>();

        let result = handler
            .customer_v1_customer_gets("2021-03-02 03:23:20.995000", 10, &filters)
            .await;
        assert!(result.is_ok_and(|customers| customers.len() == 2
            && customers.first().is_some_and(|c| c.name == "test user 1")));
    }

    #[tokio::test]
    async fn test_customer_get() {
        let handler = expect_request(
            QueueName::CUSTOMER_REQUEST,
            json_typed_request(
                "/v1/customers/951a4038-7e43-11ec-bc59-4f1dc0de20b0",
                RequestMethod::Get,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"951a4038-7e43-11ec-bc59-4f1dc0de20b0","name":"test user 1","detail":"test user 1 detail"}"#),
        );

        let result = handler
            .customer_v1_customer_get(uuid!("951a4038-7e43-11ec-bc59-4f1dc0de20b0"))
            .await;
        assert!(result.is_ok_and(|c| c.detail == "test user 1 detail"));
    }

    #[tokio::test]
    async fn test_customer_delete() {
        let handler = expect_request(
            QueueName::CUSTOMER_REQUEST,
            json_typed_request(
                "/v1/customers/d6afec8c-7e43-11ec-ab03-ff394ae04b39",
                RequestMethod::Delete,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"d6afec8c-7e43-11ec-ab03-ff394ae04b39"}"#),
        );

        let result = handler
            .customer_v1_customer_delete(uuid!("d6afec8c-7e43-11ec-ab03-ff394ae04b39"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_customer_create() {
        let handler = expect_request(
            QueueName::CUSTOMER_REQUEST,
            json_request(
                "/v1/customers",
                RequestMethod::Post,
                r#"{"name":"test1","detail":"detail1","email":"test@test.com","phone_number":"+821100000001","address":"somewhere","webhook_method":"POST","webhook_uri":"test.com"}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"47943ef0-cb2f-11ee-adbd-136bc293c7e1"}"#),
        );

        let result = handler
            .customer_v1_customer_create(
                DEFAULT_TIMEOUT,
                "test1",
                "detail1",
                "test@test.com",
                "+821100000001",
                "somewhere",
                "POST",
                "test.com",
            )
            .await;
        assert!(result.is_ok_and(|c| c.id == uuid!("47943ef0-cb2f-11ee-adbd-136bc293c7e1")));
    }

    #[tokio::test]
    async fn test_customer_update() {
        let handler = expect_request(
            QueueName::CUSTOMER_REQUEST,
            json_request(
                "/v1/customers/eed8e316-7e45-11ec-bcac-97541487f2c1",
                RequestMethod::Put,
                r#"{"name":"test1","detail":"detail1","email":"test@test.com","phone_number":"+821100000001","address":"somewhere","webhook_method":"POST","webhook_uri":"test.com"}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"eed8e316-7e45-11ec-bcac-97541487f2c1"}"#),
        );

        let result = handler
            .customer_v1_customer_update(
                uuid!("eed8e316-7e45-11ec-bcac-97541487f2c1"),
                "test1",
                "detail1",
                "test@test.com",
                "+821100000001",
                "somewhere",
                "POST",
                "test.com",
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_customer_is_valid_balance() {
        let handler = expect_request(
            QueueName::CUSTOMER_REQUEST,
            json_request(
                "/v1/customers/57e0d56e-0f8e-11ee-a32d-4b65fba800d5/is_valid_balance",
                RequestMethod::Post,
                r#"{"reference_type":"call","country":"us","count":3}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"valid":true}"#),
        );

        let result = handler
            .customer_v1_customer_is_valid_balance(
                uuid!("57e0d56e-0f8e-11ee-a32d-4b65fba800d5"),
                "call",
                "us",
                3,
            )
            .await;
        assert!(result.is_ok_and(|valid| valid));
    }

    #[tokio::test]
    async fn test_customer_update_billing_account_id() {
        let handler = expect_request(
            QueueName::CUSTOMER_REQUEST,
            json_request(
                "/v1/customers/2935091e-0f94-11ee-a5e5-a34227ad44a6/billing_account_id",
                RequestMethod::Put,
                r#"{"billing_account_id":"296b4aba-0f94-11ee-99c9-ab67bb9c534a"}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"2935091e-0f94-11ee-a5e5-a34227ad44a6","billing_account_id":"296b4aba-0f94-11ee-99c9-ab67bb9c534a"}"#),
        );

        let result = handler
            .customer_v1_customer_update_billing_account_id(
                uuid!("2935091e-0f94-11ee-a5e5-a34227ad44a6"),
                uuid!("296b4aba-0f94-11ee-99c9-ab67bb9c534a"),
            )
            .await;
        assert!(result.is_ok_and(
            |c| c.billing_account_id == uuid!("296b4aba-0f94-11ee-99c9-ab67bb9c534a")
        ));
    }
}
