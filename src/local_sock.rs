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

/*!
Provides a local [`SockHandler`] which can be used for connecting services running in the same
process, e.g. in integration tests.
*/

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{Event, Request, Response, SockError, SockHandler};

/// Consumes the requests sent to a queue.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait RequestConsumer: Send + Sync {
    /// Processes a request.
    ///
    /// # Returns
    ///
    /// The reply to send back, or `None` if the request is not answered.
    async fn on_request(&self, request: Request) -> Option<Response>;
}

/// Receives the events published to a queue.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    async fn on_event(&self, queue: &str, event: Event);
}

/// An error indicating a problem with (un)registering a consumer or subscriber.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("a consumer is already registered for queue {0}")]
    AlreadyExists(String),
    #[error("nothing registered for queue {0}")]
    NotFound(String),
}

#[derive(Default)]
struct Registry {
    consumers: RwLock<HashMap<String, Arc<dyn RequestConsumer>>>,
    subscribers: RwLock<HashMap<String, Vec<Arc<dyn EventSubscriber>>>>,
}

impl Registry {
    async fn consumer(&self, queue: &str) -> Result<Arc<dyn RequestConsumer>, SockError> {
        self.consumers
            .read()
            .await
            .get(queue)
            .cloned()
            .ok_or_else(|| SockError::NoRoute(queue.to_string()))
    }
}

/// A [`SockHandler`] that can be used to exchange messages within a single process.
///
/// A request is dispatched to the one [`RequestConsumer`] registered for its target queue.
/// An event is dispatched to all [`EventSubscriber`]s registered for its queue.
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct LocalSockHandler {
    registry: Arc<Registry>,
}

impl LocalSockHandler {
    pub fn new() -> Self {
        LocalSockHandler::default()
    }

    /// Registers the consumer of the requests sent to a queue.
    ///
    /// # Errors
    ///
    /// Returns an error if a consumer is already registered for the queue.
    pub async fn register_consumer(
        &self,
        queue: &str,
        consumer: Arc<dyn RequestConsumer>,
    ) -> Result<(), RegistrationError> {
        let mut consumers = self.registry.consumers.write().await;
        if consumers.contains_key(queue) {
            return Err(RegistrationError::AlreadyExists(queue.to_string()));
        }
        consumers.insert(queue.to_string(), consumer);
        debug!(queue, "registered request consumer");
        Ok(())
    }

    /// Removes the consumer of a queue.
    ///
    /// # Errors
    ///
    /// Returns an error if no consumer is registered for the queue.
    pub async fn unregister_consumer(&self, queue: &str) -> Result<(), RegistrationError> {
        if self.registry.consumers.write().await.remove(queue).is_none() {
            return Err(RegistrationError::NotFound(queue.to_string()));
        }
        debug!(queue, "unregistered request consumer");
        Ok(())
    }

    /// Adds a subscriber to the events published to a queue.
    pub async fn subscribe(&self, queue: &str, subscriber: Arc<dyn EventSubscriber>) {
        self.registry
            .subscribers
            .write()
            .await
            .entry(queue.to_string())
            .or_default()
            .push(subscriber);
    }

    /// Removes a subscriber that has been added with [`LocalSockHandler::subscribe`].
    ///
    /// # Errors
    ///
    /// Returns an error if the subscriber is not subscribed to the queue.
    pub async fn unsubscribe(
        &self,
        queue: &str,
        subscriber: &Arc<dyn EventSubscriber>,
    ) -> Result<(), RegistrationError> {
        let mut subscribers = self.registry.subscribers.write().await;
        let entries = subscribers
            .get_mut(queue)
            .ok_or_else(|| RegistrationError::NotFound(queue.to_string()))?;
        let count = entries.len();
        entries.retain(|s| !Arc::ptr_eq(s, subscriber));
        if entries.len() == count {
            return Err(RegistrationError::NotFound(queue.to_string()));
        }
        if entries.is_empty() {
            subscribers.remove(queue);
        }
        Ok(())
    }
}

#[async_trait]
impl SockHandler for LocalSockHandler {
    async fn request_publish(
        &self,
        target: &str,
        request: Request,
        timeout: Duration,
    ) -> Result<Option<Response>, SockError> {
        let consumer = self.registry.consumer(target).await?;
        debug!(queue = target, uri = %request.uri, "dispatching request");
        tokio::time::timeout(timeout, consumer.on_request(request))
            .await
            .map_err(|_elapsed| SockError::DeadlineExceeded)
    }

    async fn request_publish_with_delay(
        &self,
        queue: &str,
        request: Request,
        delay: Duration,
    ) -> Result<(), SockError> {
        let registry = self.registry.clone();
        let queue = queue.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match registry.consumer(&queue).await {
                Ok(consumer) => {
                    debug!(
                        queue = queue.as_str(),
                        uri = %request.uri,
                        "dispatching delayed request"
                    );
                    // nobody waits for the reply
                    let _ = consumer.on_request(request).await;
                }
                Err(e) => {
                    info!(
                        queue = queue.as_str(),
                        uri = %request.uri,
                        "dropping delayed request: {e}"
                    );
                }
            }
        });
        Ok(())
    }

    async fn event_publish(&self, queue: &str, event: Event) -> Result<(), SockError> {
        let subscribers = self
            .registry
            .subscribers
            .read()
            .await
            .get(queue)
            .cloned()
            .unwrap_or_default();
        debug!(
            queue,
            event_type = event.event_type.as_str(),
            subscribers = subscribers.len(),
            "dispatching event"
        );
        for subscriber in subscribers {
            subscriber.on_event(queue, event.clone()).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::sync::mpsc;

    use crate::{RequestMethod, CONTENT_TYPE_JSON};

    struct ForwardingConsumer {
        requests: mpsc::UnboundedSender<Request>,
    }

    #[async_trait]
    impl RequestConsumer for ForwardingConsumer {
        async fn on_request(&self, request: Request) -> Option<Response> {
            let _ = self.requests.send(request);
            None
        }
    }

    struct SlowConsumer;

    #[async_trait]
    impl RequestConsumer for SlowConsumer {
        async fn on_request(&self, _request: Request) -> Option<Response> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            None
        }
    }

    fn hangup_request() -> Request {
        Request::new(
            "/v1/calls/0c9e0a46-8e9e-11ec-a2f7-3f3e5d0c3a6b/hangup",
            RequestMethod::Post,
        )
    }

    #[tokio::test]
    async fn test_request_is_dispatched_to_registered_consumer() {
        let mut consumer = MockRequestConsumer::new();
        consumer
            .expect_on_request()
            .once()
            .withf(|request| request.method == RequestMethod::Post)
            .returning(|_| Some(Response::new(200, CONTENT_TYPE_JSON, Some("{}"))));
        let sock = LocalSockHandler::new();
        sock.register_consumer("bin-manager.call-manager.request", Arc::new(consumer))
            .await
            .unwrap();

        let result = sock
            .request_publish(
                "bin-manager.call-manager.request",
                hangup_request(),
                Duration::from_secs(3),
            )
            .await;
        assert!(result.is_ok_and(|response| response.is_some_and(|r| r.status_code == 200)));
    }

    #[tokio::test]
    async fn test_request_to_unknown_queue_has_no_route() {
        let sock = LocalSockHandler::new();

        let result = sock
            .request_publish(
                "bin-manager.call-manager.request",
                hangup_request(),
                Duration::from_secs(3),
            )
            .await;
        assert!(result.is_err_and(|e| matches!(e, SockError::NoRoute(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_times_out() {
        let sock = LocalSockHandler::new();
        sock.register_consumer("bin-manager.call-manager.request", Arc::new(SlowConsumer))
            .await
            .unwrap();

        let result = sock
            .request_publish(
                "bin-manager.call-manager.request",
                hangup_request(),
                Duration::from_secs(3),
            )
            .await;
        assert!(result.is_err_and(|e| e == SockError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_register_consumer_twice_fails() {
        let sock = LocalSockHandler::new();
        sock.register_consumer("bin-manager.flow-manager.request", Arc::new(SlowConsumer))
            .await
            .unwrap();

        let result = sock
            .register_consumer("bin-manager.flow-manager.request", Arc::new(SlowConsumer))
            .await;
        assert_eq!(
            result,
            Err(RegistrationError::AlreadyExists(
                "bin-manager.flow-manager.request".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_unregister_consumer() {
        let sock = LocalSockHandler::new();
        sock.register_consumer("bin-manager.flow-manager.request", Arc::new(SlowConsumer))
            .await
            .unwrap();

        assert!(sock
            .unregister_consumer("bin-manager.flow-manager.request")
            .await
            .is_ok());
        assert!(sock
            .unregister_consumer("bin-manager.flow-manager.request")
            .await
            .is_err_and(|e| matches!(e, RegistrationError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_request_is_delivered_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sock = LocalSockHandler::new();
        sock.register_consumer(
            "bin-manager.call-manager.request",
            Arc::new(ForwardingConsumer { requests: tx }),
        )
        .await
        .unwrap();
        let start = tokio::time::Instant::now();

        sock.request_publish_with_delay(
            "bin-manager.call-manager.request",
            hangup_request(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        let request = rx.recv().await.unwrap();
        assert_eq!(request, hangup_request());
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_event_is_fanned_out_to_all_subscribers() {
        let sock = LocalSockHandler::new();
        for _ in 0..2 {
            let mut subscriber = MockEventSubscriber::new();
            subscriber
                .expect_on_event()
                .once()
                .withf(|queue, event| {
                    queue == "bin-manager.call-manager.event" && event.event_type == "call_created"
                })
                .return_const(());
            sock.subscribe("bin-manager.call-manager.event", Arc::new(subscriber))
                .await;
        }
        let mut other = MockEventSubscriber::new();
        other.expect_on_event().never();
        sock.subscribe("bin-manager.flow-manager.event", Arc::new(other))
            .await;

        let event = Event {
            event_type: "call_created".to_string(),
            publisher: "call-manager".to_string(),
            data_type: CONTENT_TYPE_JSON.to_string(),
            data: None,
        };
        let result = sock
            .event_publish("bin-manager.call-manager.event", event)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let sock = LocalSockHandler::new();
        let mut subscriber = MockEventSubscriber::new();
        subscriber.expect_on_event().never();
        let subscriber: Arc<dyn EventSubscriber> = Arc::new(subscriber);
        sock.subscribe("bin-manager.call-manager.event", subscriber.clone())
            .await;

        assert!(sock
            .unsubscribe("bin-manager.call-manager.event", &subscriber)
            .await
            .is_ok());
        assert!(sock
            .unsubscribe("bin-manager.call-manager.event", &subscriber)
            .await
            .is_err());

        let event = Event {
            event_type: "call_created".to_string(),
            publisher: "call-manager".to_string(),
            data_type: String::new(),
            data: None,
        };
        assert!(sock
            .event_publish("bin-manager.call-manager.event", event)
            .await
            .is_ok());
    }
}
