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
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::{Event, CONTENT_TYPE_JSON};

use super::{RequestError, RequestHandler};

/// Publishes events on behalf of the service owning the handler.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes an event to the event queue of the handler's publisher.
    ///
    /// The event is fire-and-forget, nobody replies to it.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The kind of event, e.g. `call_hangup`.
    /// * `data` - The event's payload.
    async fn publish_event(&self, event_type: &str, data: &Value) -> Result<(), RequestError>;
}

#[async_trait]
impl EventPublisher for RequestHandler {
    async fn publish_event(&self, event_type: &str, data: &Value) -> Result<(), RequestError> {
        let event = Event {
            event_type: event_type.to_string(),
            publisher: self.publisher.to_string(),
            data_type: CONTENT_TYPE_JSON.to_string(),
            data: Some(Bytes::from(serde_json::to_vec(data)?)),
        };
        let queue = self.publisher.event_queue();

        debug!(queue = queue.as_str(), event_type, "publishing event");
        self.sock.event_publish(queue.as_str(), event).await?;
        self.metrics.increment_event(event_type);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use serde_json::json;

    use crate::requesthandler::test_support::{new_handler, TEST_PUBLISHER};
    use crate::{MockRequestMetrics, MockSockHandler, SockError};

    #[tokio::test]
    async fn test_publish_event_to_own_event_queue() {
        // GIVEN a broker accepting the event of the test service
        let mut sock = MockSockHandler::new();
        sock.expect_event_publish()
            .once()
            .withf(|queue, event| {
                queue == "bin-manager.test-manager.event"
                    && event.event_type == "call_hangup"
                    && event.publisher == TEST_PUBLISHER
                    && event.data_type == CONTENT_TYPE_JSON
                    && event.data.as_deref()
                        == Some(br#"{"id":"c8c4b4d4-8e3a-11ec-a3c2-1f1e0a5d2b7c"}"#.as_slice())
            })
            .return_const(Ok(()));
        let mut metrics = MockRequestMetrics::new();
        metrics
            .expect_increment_event()
            .withf(|event_type| event_type == "call_hangup")
            .once()
            .return_const(());
        let handler = new_handler(sock).with_metrics(Arc::new(metrics));

        // WHEN publishing an event
        let result = handler
            .publish_event(
                "call_hangup",
                &json!({"id": "c8c4b4d4-8e3a-11ec-a3c2-1f1e0a5d2b7c"}),
            )
            .await;

        // THEN the event is counted
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_publish_event_failure_is_not_counted() {
        let mut sock = MockSockHandler::new();
        sock.expect_event_publish()
            .once()
            .return_const(Err(SockError::Unavailable("connection closed".to_string())));
        let mut metrics = MockRequestMetrics::new();
        metrics.expect_increment_event().never();
        let handler = new_handler(sock).with_metrics(Arc::new(metrics));

        let result = handler.publish_event("call_hangup", &json!({})).await;
        assert!(result.is_err_and(|e| matches!(e, RequestError::Transport(_))));
    }
}
