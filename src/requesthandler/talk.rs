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

use crate::models::Message;
use crate::query::path_escape;
use crate::{QueueName, Request, RequestMethod};

use super::{parse_response, RequestError, RequestHandler};

const RESOURCE_MESSAGES: &str = "talk/messages";

/// Operations on the chat messages of the talk-manager.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait TalkManager: Send + Sync {
    async fn talk_v1_message_get(&self, message_id: Uuid) -> Result<Message, RequestError>;

    async fn talk_v1_message_delete(&self, message_id: Uuid) -> Result<Message, RequestError>;

    /// Posts a message to a chat.
    ///
    /// # Arguments
    ///
    /// * `parent_id` - The message being replied to, if any.
    #[allow(clippy::too_many_arguments)]
    async fn talk_v1_message_create(
        &self,
        chat_id: Uuid,
        parent_id: Option<Uuid>,
        owner_type: &str,
        owner_id: Uuid,
        message_type: &str,
        text: &str,
    ) -> Result<Message, RequestError>;

    async fn talk_v1_message_list(
        &self,
        page_token: &str,
        page_size: u64,
    ) -> Result<Vec<Message>, RequestError>;

    /// Adds an emoji reaction to a message.
    async fn talk_v1_message_reaction_create(
        &self,
        message_id: Uuid,
        owner_type: &str,
        owner_id: Uuid,
        emoji: &str,
    ) -> Result<Message, RequestError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    chat_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<Uuid>,
    owner_type: &'a str,
    owner_id: Uuid,
    #[serde(rename = "type")]
    message_type: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct ReactionRequest<'a> {
    owner_type: &'a str,
    owner_id: Uuid,
    emoji: &'a str,
}

impl RequestHandler {
    async fn talk_request<T>(&self, resource: &str, request: Request) -> Result<T, RequestError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .send(QueueName::TALK_REQUEST, resource, request)
            .await?;
        parse_response(response)
    }
}

#[async_trait]
impl TalkManager for RequestHandler {
    async fn talk_v1_message_get(&self, message_id: Uuid) -> Result<Message, RequestError> {
        let request = self.new_request(format!("/v1/messages/{message_id}"), RequestMethod::Get);
        self.talk_request(RESOURCE_MESSAGES, request).await
    }

    async fn talk_v1_message_delete(&self, message_id: Uuid) -> Result<Message, RequestError> {
        let request =
            self.new_request(format!("/v1/messages/{message_id}"), RequestMethod::Delete);
        self.talk_request(RESOURCE_MESSAGES, request).await
    }

    async fn talk_v1_message_create(
        &self,
        chat_id: Uuid,
        parent_id: Option<Uuid>,
        owner_type: &str,
        owner_id: Uuid,
        message_type: &str,
        text: &str,
    ) -> Result<Message, RequestError> {
        let request = self.new_json_request(
            "/v1/messages",
            RequestMethod::Post,
            &CreateRequest {
                chat_id,
                parent_id,
                owner_type,
                owner_id,
                message_type,
                text,
            },
        )?;
        self.talk_request(RESOURCE_MESSAGES, request).await
    }

    async fn talk_v1_message_list(
        &self,
        page_token: &str,
        page_size: u64,
    ) -> Result<Vec<Message>, RequestError> {
        let uri = format!(
            "/v1/messages?page_token={}&page_size={page_size}",
            path_escape(page_token)
        );
        let request = self.new_request(uri, RequestMethod::Get);
        self.talk_request(RESOURCE_MESSAGES, request).await
    }

    async fn talk_v1_message_reaction_create(
        &self,
        message_id: Uuid,
        owner_type: &str,
        owner_id: Uuid,
        emoji: &str,
    ) -> Result<Message, RequestError> {
        let request = self.new_json_request(
            format!("/v1/messages/{message_id}/reactions"),
            RequestMethod::Post,
            &ReactionRequest {
                owner_type,
                owner_id,
                emoji,
            },
        )?;
        self.talk_request("talk/messages/<message-id>/reactions", request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_case::test_case;
    use uuid::uuid;

    use crate::requesthandler::test_support::{
        expect_request, json_request, json_response, request,
    };
    use crate::requesthandler::DEFAULT_TIMEOUT;
    use crate::{Response, CONTENT_TYPE_JSON};

    fn created_response(body: &'static str) -> Option<Response> {
        Some(Response::new(201, CONTENT_TYPE_JSON, Some(body)))
    }

    #[tokio::test]
    async fn test_message_get() {
        let handler = expect_request(
            QueueName::TALK_REQUEST,
            request(
                "/v1/messages/7e3c2f9a-d7a4-11ef-95a2-5b9a1e1d2c3b",
                RequestMethod::Get,
            ),
            DEFAULT_TIMEOUT,
            json_response(
                r#"{"id":"7e3c2f9a-d7a4-11ef-95a2-5b9a1e1d2c3b","owner_type":"agent","type":"normal","text":"hello"}"#,
            ),
        );

        let result = handler
            .talk_v1_message_get(uuid!("7e3c2f9a-d7a4-11ef-95a2-5b9a1e1d2c3b"))
            .await;
        assert!(result.is_ok_and(|m| m.text == "hello" && m.message_type == "normal"));
    }

    #[tokio::test]
    async fn test_message_delete() {
        let handler = expect_request(
            QueueName::TALK_REQUEST,
            request(
                "/v1/messages/8a1b2c3d-d7a4-11ef-a0b1-7f6e5d4c3b2a",
                RequestMethod::Delete,
            ),
            DEFAULT_TIMEOUT,
            json_response(r#"{"id":"8a1b2c3d-d7a4-11ef-a0b1-7f6e5d4c3b2a","tm_delete":"2025-01-20T10:00:00.000000Z"}"#),
        );

        let result = handler
            .talk_v1_message_delete(uuid!("8a1b2c3d-d7a4-11ef-a0b1-7f6e5d4c3b2a"))
            .await;
        assert!(result.is_ok_and(|m| m.tm_delete.is_some()));
    }

    #[test_case(
        None,
        r#"{"chat_id":"9b8a7c6d-d7a4-11ef-b1c2-2e3f4a5b6c7d","owner_type":"agent","owner_id":"a1b2c3d4-d7a4-11ef-8c9d-0e1f2a3b4c5d","type":"normal","text":"hello"}"#;
        "top level message"
    )]
    #[test_case(
        Some(uuid!("b2c3d4e5-d7a4-11ef-9dae-1f2a3b4c5d6e")),
        r#"{"chat_id":"9b8a7c6d-d7a4-11ef-b1c2-2e3f4a5b6c7d","parent_id":"b2c3d4e5-d7a4-11ef-9dae-1f2a3b4c5d6e","owner_type":"agent","owner_id":"a1b2c3d4-d7a4-11ef-8c9d-0e1f2a3b4c5d","type":"normal","text":"hello"}"#;
        "reply"
    )]
    #[tokio::test]
    async fn test_message_create(parent_id: Option<Uuid>, expected_body: &'static str) {
        let handler = expect_request(
            QueueName::TALK_REQUEST,
            json_request("/v1/messages", RequestMethod::Post, expected_body),
            DEFAULT_TIMEOUT,
            created_response(
                r#"{"id":"c3d4e5f6-d7a4-11ef-aebf-2a3b4c5d6e7f","chat_id":"9b8a7c6d-d7a4-11ef-b1c2-2e3f4a5b6c7d","text":"hello"}"#,
            ),
        );

        let result = handler
            .talk_v1_message_create(
                uuid!("9b8a7c6d-d7a4-11ef-b1c2-2e3f4a5b6c7d"),
                parent_id,
                "agent",
                uuid!("a1b2c3d4-d7a4-11ef-8c9d-0e1f2a3b4c5d"),
                "normal",
                "hello",
            )
            .await;
        assert!(result.is_ok_and(|m| m.id == uuid!("c3d4e5f6-d7a4-11ef-aebf-2a3b4c5d6e7f")));
    }

    #[tokio::test]
    async fn test_message_list_escapes_token_as_path() {
        let handler = expect_request(
            QueueName::TALK_REQUEST,
            request(
                "/v1/messages?page_token=2020-09-20%2003%3A23%3A20.995000&page_size=10",
                RequestMethod::Get,
            ),
            DEFAULT_TIMEOUT,
            json_response(
                r#"[{"id":"d4e5f6a7-d7a4-11ef-bfc0-3b4c5d6e7f80"},{"id":"e5f6a7b8-d7a4-11ef-80d1-4c5d6e7f8091"}]"#,
            ),
        );

        let result = handler
            .talk_v1_message_list("2020-09-20 03:23:20.995000", 10)
            .await;
        assert!(result.is_ok_and(|messages| messages.len() == 2));
    }

    #[tokio::test]
    async fn test_message_reaction_create() {
        let handler = expect_request(
            QueueName::TALK_REQUEST,
            json_request(
                "/v1/messages/f6a7b8c9-d7a4-11ef-91e2-5d6e7f8091a2/reactions",
                RequestMethod::Post,
                r#"{"owner_type":"agent","owner_id":"a1b2c3d4-d7a4-11ef-8c9d-0e1f2a3b4c5d","emoji":"👍"}"#,
            ),
            DEFAULT_TIMEOUT,
            json_response(
                r#"{"id":"f6a7b8c9-d7a4-11ef-91e2-5d6e7f8091a2","metadata":{"reactions":[{"emoji":"👍","owner_type":"agent","owner_id":"a1b2c3d4-d7a4-11ef-8c9d-0e1f2a3b4c5d"}]}}"#,
            ),
        );

        let result = handler
            .talk_v1_message_reaction_create(
                uuid!("f6a7b8c9-d7a4-11ef-91e2-5d6e7f8091a2"),
                "agent",
                uuid!("a1b2c3d4-d7a4-11ef-8c9d-0e1f2a3b4c5d"),
                "👍",
            )
            .await;
        assert!(result.is_ok_and(|m| m
            .metadata
            .get("reactions")
            .is_some_and(serde_json::Value::is_array)));
    }
}
