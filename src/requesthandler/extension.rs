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

use crate::models::Extension;
use crate::query::{merge_filters, page_uri, path_escape, query_escape, QueryFilters};
use crate::{QueueName, Request, RequestMethod, CONTENT_TYPE_JSON};

use super::{parse_response, RequestError, RequestHandler};

const RESOURCE_EXTENSIONS: &str = "registrar/extensions";

/// Operations on the extensions of the registrar-manager.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait ExtensionManager: Send + Sync {
    /// Creates an extension under the customer's default domain.
    async fn registrar_v1_extension_create(
        &self,
        customer_id: Uuid,
        extension: &str,
        password: &str,
        name: &str,
        detail: &str,
    ) -> Result<Extension, RequestError>;

    async fn registrar_v1_extension_get(
        &self,
        extension_id: Uuid,
    ) -> Result<Extension, RequestError>;

    async fn registrar_v1_extension_delete(
        &self,
        extension_id: Uuid,
    ) -> Result<Extension, RequestError>;

    async fn registrar_v1_extension_update(
        &self,
        extension_id: Uuid,
        name: &str,
        detail: &str,
        password: &str,
    ) -> Result<Extension, RequestError>;

    /// Gets a page of extensions. Each filter is sent as a `filter_<key>` query parameter.
    async fn registrar_v1_extension_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Extension>, RequestError>;

    /// Looks up an extension of the customer by its extension number.
    async fn registrar_v1_extension_get_by_extension(
        &self,
        customer_id: Uuid,
        extension: &str,
    ) -> Result<Extension, RequestError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    customer_id: Uuid,
    extension: &'a str,
    password: &'a str,
    domain_id: Uuid,
    name: &'a str,
    detail: &'a str,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    name: &'a str,
    detail: &'a str,
    password: &'a str,
}

impl RequestHandler {
    async fn extension_request<T>(&self, request: Request) -> Result<T, RequestError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .send(QueueName::REGISTRAR_REQUEST, RESOURCE_EXTENSIONS, request)
            .await?;
        parse_response(response)
    }
}

#[async_trait]
impl ExtensionManager for RequestHandler {
    async fn registrar_v1_extension_create(
        &self,
        customer_id: Uuid,
        extension: &str,
        password: &str,
        name: &str,
        detail: &str,
    ) -> Result<Extension, RequestError> {
        // the registrar assigns the domain
        let request = self.new_json_request(
            "/v1/extensions",
            RequestMethod::Post,
            &CreateRequest {
                customer_id,
                extension,
                password,
                domain_id: Uuid::nil(),
                name,
                detail,
            },
        )?;
        self.extension_request(request).await
    }

    async fn registrar_v1_extension_get(
        &self,
        extension_id: Uuid,
    ) -> Result<Extension, RequestError> {
        let request = self
            .new_request(format!("/v1/extensions/{extension_id}"), RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        self.extension_request(request).await
    }

    async fn registrar_v1_extension_delete(
        &self,
        extension_id: Uuid,
    ) -> Result<Extension, RequestError> {
        let request = self
            .new_request(
                format!("/v1/extensions/{extension_id}"),
                RequestMethod::Delete,
            )
            .with_data_type(CONTENT_TYPE_JSON);
        self.extension_request(request).await
    }

    async fn registrar_v1_extension_update(
        &self,
        extension_id: Uuid,
        name: &str,
        detail: &str,
        password: &str,
    ) -> Result<Extension, RequestError> {
        let request = self.new_json_request(
            format!("/v1/extensions/{extension_id}"),
            RequestMethod::Put,
            &UpdateRequest {
                name,
                detail,
                password,
            },
        )?;
        self.extension_request(request).await
    }

    async fn registrar_v1_extension_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Extension>, RequestError> {
        let uri = merge_filters(page_uri("/v1/extensions", page_token, page_size), filters);
        let request = self
            .new_request(uri, RequestMethod::Get)
            .with_data_type(CONTENT_TYPE_JSON);
        self.extension_request(request).await
    }

    async fn registrar_v1_extension_get_by_extension(
        &self,
        customer_id: Uuid,
        extension: &str,
    ) -> Result<Extension, RequestError> {
        let uri = format!(
            "/v1/extensions/extension/{}?customer_id={}",
            path_escape(extension),
            query_escape(&customer_id.to_string()),
        );
        let request = self.new_request(uri, RequestMethod::Get);
        self.extension_request(request).await
    }
}
