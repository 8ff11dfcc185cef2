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

use crate::models::Queuecall;
use crate::query::{merge_filters, page_uri, QueryFilters};
use crate::{QueueName, Request, RequestMethod};

use super::{check_deferrable_response, parse_response, RequestError, RequestHandler};

const RESOURCE_QUEUECALLS: &str = "queue/queuecalls";

/// Operations of the queue-manager concerning the calls in a queue.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait QueuecallManager: Send + Sync {
    async fn queue_v1_queuecall_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Queuecall>, RequestError>;

    async fn queue_v1_queuecall_get(&self, queuecall_id: Uuid) -> Result<Queuecall, RequestError>;

    /// Gets the queuecall of a call or other reference.
    async fn queue_v1_queuecall_get_by_reference_id(
        &self,
        reference_id: Uuid,
    ) -> Result<Queuecall, RequestError>;

    async fn queue_v1_queuecall_delete(
        &self,
        queuecall_id: Uuid,
    ) -> Result<Queuecall, RequestError>;

    /// Removes a queuecall from its queue.
    async fn queue_v1_queuecall_kick(&self, queuecall_id: Uuid)
        -> Result<Queuecall, RequestError>;

    async fn queue_v1_queuecall_kick_by_reference_id(
        &self,
        reference_id: Uuid,
    ) -> Result<Queuecall, RequestError>;

    /// Notifies the queue-manager that a queuecall has waited too long for an agent.
    ///
    /// This is usually scheduled with a delay equal to the queue's wait timeout.
    async fn queue_v1_queuecall_timeout_wait(
        &self,
        queuecall_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError>;

    async fn queue_v1_queuecall_timeout_service(
        &self,
        queuecall_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError>;

    async fn queue_v1_queuecall_update_status_waiting(
        &self,
        queuecall_id: Uuid,
    ) -> Result<Queuecall, RequestError>;

    /// Connects a queuecall to the given agent.
    async fn queue_v1_queuecall_execute(
        &self,
        queuecall_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Queuecall, RequestError>;

    async fn queue_v1_queuecall_health_check(
        &self,
        queuecall_id: Uuid,
        delay: u64,
        retry_count: u32,
    ) -> Result<(), RequestError>;
}

#[derive(Serialize)]
struct ExecuteRequest {
    agent_id: Uuid,
}

#[derive(Serialize)]
struct HealthCheckRequest {
    retry_count: u32,
}

impl RequestHandler {
    async fn queuecall_entity(
        &self,
        resource: &str,
        request: Request,
    ) -> Result<Queuecall, RequestError> {
        let response = self
            .send(QueueName::QUEUE_REQUEST, resource, request)
            .await?;
        parse_response(response)
    }

    async fn queuecall_deferred(
        &self,
        resource: &str,
        request: Request,
        delay: u64,
    ) -> Result<(), RequestError> {
        let response = self
            .dispatch(
                QueueName::QUEUE_REQUEST,
                resource,
                request,
                self.default_timeout(),
                delay,
            )
            .await?;
        check_deferrable_response(response, delay)
    }
}

#[async_trait]
impl QueuecallManager for RequestHandler {
    async fn queue_v1_queuecall_gets(
        &self,
        page_token: &str,
        page_size: u64,
        filters: &QueryFilters,
    ) -> Result<Vec<Queuecall>, RequestError> {
        let uri = merge_filters(page_uri("/v1/queuecalls", page_token, page_size), filters);
        let request = self.new_request(uri, RequestMethod::Get);
        let response = self
            .send(QueueName::QUEUE_REQUEST, RESOURCE_QUEUECALLS, request)
            .await?;
        parse_response(response)
    }

    async fn queue_v1_queuecall_get(&self, queuecall_id: Uuid) -> Result<Queuecall, RequestError> {
        let request =
            self.new_request(format!("/v1/queuecalls/{queuecall_id}"), RequestMethod::Get);
        self.queuecall_entity(RESOURCE_QUEUECALLS, request).await
    }

    async fn queue_v1_queuecall_get_by_reference_id(
        &self,
        reference_id: Uuid,
    ) -> Result<Queuecall, RequestError> {
        let request = self.new_request(
            format!("/v1/queuecalls/reference_id/{reference_id}"),
            RequestMethod::Get,
        );
        self.queuecall_entity("queue/queuecalls/reference_id", request)
            .await
    }

    async fn queue_v1_queuecall_delete(
        &self,
        queuecall_id: Uuid,
    ) -> Result<Queuecall, RequestError> {
        let request = self.new_request(
            format!("/v1/queuecalls/{queuecall_id}"),
            RequestMethod::Delete,
        );
        self.queuecall_entity(RESOURCE_QUEUECALLS, request).await
    }

    async fn queue_v1_queuecall_kick(
        &self,
        queuecall_id: Uuid,
    ) -> Result<Queuecall, RequestError> {
        let request = self.new_request(
            format!("/v1/queuecalls/{queuecall_id}/kick"),
            RequestMethod::Post,
        );
        self.queuecall_entity("queue/queuecalls/<queuecall-id>/kick", request)
            .await
    }

    async fn queue_v1_queuecall_kick_by_reference_id(
        &self,
        reference_id: Uuid,
    ) -> Result<Queuecall, RequestError> {
        let request = self.new_request(
            format!("/v1/queuecalls/reference_id/{reference_id}/kick"),
            RequestMethod::Post,
        );
        self.queuecall_entity("queue/queuecalls/reference_id/<reference-id>/kick", request)
            .await
    }

    async fn queue_v1_queuecall_timeout_wait(
        &self,
        queuecall_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError> {
        let request = self.new_request(
            format!("/v1/queuecalls/{queuecall_id}/timeout_wait"),
            RequestMethod::Post,
        );
        self.queuecall_deferred("queue/queuecalls/<queuecall-id>/timeout_wait", request, delay)
            .await
    }

    async fn queue_v1_queuecall_timeout_service(
        &self,
        queuecall_id: Uuid,
        delay: u64,
    ) -> Result<(), RequestError> {
        let request = self.new_request(
            format!("/v1/queuecalls/{queuecall_id}/timeout_service"),
            RequestMethod::Post,
        );
        self.queuecall_deferred(
            "queue/queuecalls/<queuecall-id>/timeout_service",
            request,
            delay,
        )
        .await
    }

    async fn queue_v1_queuecall_update_status_waiting(
        &self,
        queuecall_id: Uuid,
    ) -> Result<Queuecall, RequestError> {
        let request = self.new_request(
            format!("/v1/queuecalls/{queuecall_id}/status_waiting"),
            RequestMethod::Post,
        );
        self.queuecall_entity("queue/queuecalls/<queuecall-id>/status_waiting", request)
            .await
    }

    async fn queue_v1_queuecall_execute(
        &self,
        queuecall_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Queuecall, RequestError> {
        let request = self.new_json_request(
            format!("/v1/queuecalls/{queuecall_id}/execute"),
            RequestMethod::Post,
            &ExecuteRequest { agent_id },
        )?;
        self.queuecall_entity("queue/queuecalls/<queuecall-id>/execute", request)
            .await
    }

    async fn queue_v1_queuecall_health_check(
        &self,
        queuecall_id: Uuid,
        delay: u64,
        retry_count: u32,
    ) -> Result<(), RequestError> {
        let request = self.new_json_request(
            format!("/v1/queuecalls/{queuecall_id}/health-check"),
            RequestMethod::Post,
            &HealthCheckRequest { retry_count },
        )?;
        self.queuecall_deferred("queue/queuecalls/<queuecall-id>/health-check", request, delay)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uuid::uuid;

    use crate::requesthandler::test_support::{
        expect_delayed_request, expect_request, json_request, json_response, request,
    };
    use crate::requesthandler::{DEFAULT_TIMEOUT, DELAY_SECOND};

    #[tokio::test]
    async fn test_queuecall_gets() {
        let handler = expect_request(
            QueueName::QUEUE_REQUEST,
            request(
                "/v1/queuecalls?page_token=2020-09-20T03%3A23%3A20.995000&page_size=10&filter_deleted=false",
                RequestMethod::Get,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"[{"id":"07e42460-6159-11ec-8191-3b89ed95cdb5"}]"#),
        );
        let filters = QueryFilters::from([("deleted".to_string(), "false".to_string())]);

        let result = handler
            .queue_v1_queuecall_gets("2020-09-20T03:23:20.995000", 10, &filters)
            .await;
        assert!(result.is_ok_and(|calls| calls.len() == 1));
    }

    #[tokio::test]
    async fn test_queuecall_get() {
        let handler = expect_request(
            QueueName::QUEUE_REQUEST,
            request(
                "/v1/queuecalls/a2764422-6159-11ec-8d87-975236f7d7b7",
                RequestMethod::Get,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"a2764422-6159-11ec-8d87-975236f7d7b7"}"#),
        );

        let result = handler
            .queue_v1_queuecall_get(uuid!("a2764422-6159-11ec-8d87-975236f7d7b7"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_queuecall_get_by_reference_id() {
        let handler = expect_request(
            QueueName::QUEUE_REQUEST,
            request(
                "/v1/queuecalls/reference_id/f0d7b6e2-bcba-11ed-9715-db75795f979e",
                RequestMethod::Get,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"f102c5b2-bcba-11ed-8a78-07c8c15cd024","reference_id":"f0d7b6e2-bcba-11ed-9715-db75795f979e"}"#),
        );

        let result = handler
            .queue_v1_queuecall_get_by_reference_id(uuid!("f0d7b6e2-bcba-11ed-9715-db75795f979e"))
            .await;
        assert!(result
            .is_ok_and(|qc| qc.id == uuid!("f102c5b2-bcba-11ed-8a78-07c8c15cd024")));
    }

    #[tokio::test]
    async fn test_queuecall_delete() {
        let handler = expect_request(
            QueueName::QUEUE_REQUEST,
            request(
                "/v1/queuecalls/f4b44b28-4e79-11ec-be3c-73450ec23a51",
                RequestMethod::Delete,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"f4b44b28-4e79-11ec-be3c-73450ec23a51"}"#),
        );

        let result = handler
            .queue_v1_queuecall_delete(uuid!("f4b44b28-4e79-11ec-be3c-73450ec23a51"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_queuecall_kick() {
        let handler = expect_request(
            QueueName::QUEUE_REQUEST,
            request(
                "/v1/queuecalls/e96bfff6-bac8-11ed-a20f-9be3817d2737/kick",
                RequestMethod::Post,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"e96bfff6-bac8-11ed-a20f-9be3817d2737"}"#),
        );

        let result = handler
            .queue_v1_queuecall_kick(uuid!("e96bfff6-bac8-11ed-a20f-9be3817d2737"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_queuecall_kick_by_reference_id() {
        let handler = expect_request(
            QueueName::QUEUE_REQUEST,
            request(
                "/v1/queuecalls/reference_id/e9d1f928-bac8-11ed-a65d-7fb580a1eb02/kick",
                RequestMethod::Post,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"e9d1f928-bac8-11ed-a65d-7fb580a1eb02"}"#),
        );

        let result = handler
            .queue_v1_queuecall_kick_by_reference_id(uuid!("e9d1f928-bac8-11ed-a65d-7fb580a1eb02"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_queuecall_timeout_wait_is_deferred() {
        let handler = expect_delayed_request(
            QueueName::QUEUE_REQUEST,
            request(
                "/v1/queuecalls/ff5c5fba-60b3-11ec-97c3-ff9e56e19a78/timeout_wait",
                RequestMethod::Post,
            ),
            10 * DELAY_SECOND,
        );

        let result = handler
            .queue_v1_queuecall_timeout_wait(
                uuid!("ff5c5fba-60b3-11ec-97c3-ff9e56e19a78"),
                10 * DELAY_SECOND,
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_queuecall_timeout_service_is_deferred() {
        let handler = expect_delayed_request(
            QueueName::QUEUE_REQUEST,
            request(
                "/v1/queuecalls/ddf27cfa-60b4-11ec-b221-13486052ae97/timeout_service",
                RequestMethod::Post,
            ),
            10 * DELAY_SECOND,
        );

        let result = handler
            .queue_v1_queuecall_timeout_service(
                uuid!("ddf27cfa-60b4-11ec-b221-13486052ae97"),
                10 * DELAY_SECOND,
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_queuecall_update_status_waiting() {
        let handler = expect_request(
            QueueName::QUEUE_REQUEST,
            request(
                "/v1/queuecalls/092c9606-d1c8-11ec-8a0e-3383eeba05b5/status_waiting",
                RequestMethod::Post,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"092c9606-d1c8-11ec-8a0e-3383eeba05b5","status":"waiting"}"#),
        );

        let result = handler
            .queue_v1_queuecall_update_status_waiting(uuid!("092c9606-d1c8-11ec-8a0e-3383eeba05b5"))
            .await;
        assert!(result.is_ok_and(|qc| qc.status == "waiting"));
    }

    #[tokio::test]
    async fn test_queuecall_execute() {
        let handler = expect_request(
            QueueName::QUEUE_REQUEST,
            json_request(
                "/v1/queuecalls/dc293afd-dd16-492e-a725-a690dd300658/execute",
                RequestMethod::Post,
                r#"{"agent_id":"5b3d4931-40d9-4e54-aaa7-df221c8624b5"}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"dc293afd-dd16-492e-a725-a690dd300658"}"#),
        );

        let result = handler
            .queue_v1_queuecall_execute(
                uuid!("dc293afd-dd16-492e-a725-a690dd300658"),
                uuid!("5b3d4931-40d9-4e54-aaa7-df221c8624b5"),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_queuecall_health_check_without_delay() {
        let handler = expect_request(
            QueueName::QUEUE_REQUEST,
            json_request(
                "/v1/queuecalls/1a788e4e-d539-11ee-8f84-335e0b9857ba/health-check",
                RequestMethod::Post,
                r#"{"retry_count":1}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response("{}"),
        );

        let result = handler
            .queue_v1_queuecall_health_check(uuid!("1a788e4e-d539-11ee-8f84-335e0b9857ba"), 0, 1)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_queuecall_timeout_wait_now_without_reply_fails() {
        let handler = expect_request(
            QueueName::QUEUE_REQUEST,
            request(
                "/v1/queuecalls/ff5c5fba-60b3-11ec-97c3-ff9e56e19a78/timeout_wait",
                RequestMethod::Post,
            ),
            DEFAULT_TIMEOUT,
            None,
        );

        let result = handler
            .queue_v1_queuecall_timeout_wait(uuid!("ff5c5fba-60b3-11ec-97c3-ff9e56e19a78"), 0)
            .await;
        assert!(result.is_err_and(|e| matches!(e, RequestError::NotFound)));
    }
}
