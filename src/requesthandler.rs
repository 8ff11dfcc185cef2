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

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::{
    NoopRequestMetrics, QueueName, Request, RequestMethod, RequestMetrics, Response, ServiceName,
    SockError, SockHandler, CONTENT_TYPE_JSON,
};

pub use activeflow::ActiveflowManager;
pub use agent::AgentManager;
pub use aicall::AicallManager;
pub use ast_channel::{AsteriskChannel, STASIS_APP};
pub use call::CallManager;
pub use campaign::CampaignManager;
pub use conference::ConferenceManager;
pub use customer::CustomerManager;
pub use event::EventPublisher;
pub use extension::ExtensionManager;
pub use flow::FlowManager;
pub use number::{NumberManager, NumberRenewal};
pub use options::{
    RequestHandlerOptions, RequestHandlerOptionsBuilder, DEFAULT_TIMEOUT, DELAY_HOUR,
    DELAY_MINUTE, DELAY_NOW, DELAY_SECOND,
};
pub use queue::QueueManager;
pub use queuecall::QueuecallManager;
pub use talk::TalkManager;

#[cfg(any(test, feature = "test-util"))]
pub use activeflow::MockActiveflowManager;
#[cfg(any(test, feature = "test-util"))]
pub use agent::MockAgentManager;
#[cfg(any(test, feature = "test-util"))]
pub use aicall::MockAicallManager;
#[cfg(any(test, feature = "test-util"))]
pub use ast_channel::MockAsteriskChannel;
#[cfg(any(test, feature = "test-util"))]
pub use call::MockCallManager;
#[cfg(any(test, feature = "test-util"))]
pub use campaign::MockCampaignManager;
#[cfg(any(test, feature = "test-util"))]
pub use conference::MockConferenceManager;
#[cfg(any(test, feature = "test-util"))]
pub use customer::MockCustomerManager;
#[cfg(any(test, feature = "test-util"))]
pub use event::MockEventPublisher;
#[cfg(any(test, feature = "test-util"))]
pub use extension::MockExtensionManager;
#[cfg(any(test, feature = "test-util"))]
pub use flow::MockFlowManager;
#[cfg(any(test, feature = "test-util"))]
pub use number::MockNumberManager;
#[cfg(any(test, feature = "test-util"))]
pub use queue::MockQueueManager;
#[cfg(any(test, feature = "test-util"))]
pub use queuecall::MockQueuecallManager;
#[cfg(any(test, feature = "test-util"))]
pub use talk::MockTalkManager;

mod activeflow;
mod agent;
mod aicall;
mod ast_channel;
mod call;
mod campaign;
mod conference;
mod customer;
mod event;
mod extension;
mod flow;
mod number;
mod options;
mod queue;
mod queuecall;
mod talk;
#[cfg(test)]
mod test_support;

/// An error indicating a problem with sending a request or with the reply to it.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request could not be handed to the broker.
    #[error("could not send the request: {0}")]
    Transport(#[source] SockError),
    /// No reply has been received within the request's timeout.
    #[error("no reply received before deadline")]
    DeadlineExceeded,
    /// The service did not reply with a message.
    #[error("response code: 404")]
    NotFound,
    /// The service replied with a status code indicating failure.
    #[error("response code: {status_code}")]
    Remote { status_code: u16 },
    /// The reply's body is not a JSON document.
    #[error("unexpected response data type: {0}")]
    UnexpectedDataType(String),
    /// A request or reply body could not be converted.
    #[error("could not convert message body: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl RequestError {
    /// Gets the HTTP-like status code that corresponds to this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestError::NotFound => Some(404),
            RequestError::Remote { status_code } => Some(*status_code),
            RequestError::DeadlineExceeded => Some(408),
            RequestError::Transport(_)
            | RequestError::UnexpectedDataType(_)
            | RequestError::Serialization(_)
            | RequestError::InvalidArgument(_) => None,
        }
    }
}

impl From<SockError> for RequestError {
    fn from(value: SockError) -> Self {
        match value {
            SockError::DeadlineExceeded => RequestError::DeadlineExceeded,
            SockError::Unavailable(_) | SockError::NoRoute(_) | SockError::Internal(_) => {
                RequestError::Transport(value)
            }
        }
    }
}

/// A client for invoking operations of the other services of the mesh.
///
/// All service specific operations are available by means of the traits implemented
/// by this struct, e.g. [`CallManager`] or [`FlowManager`]. Each operation is mapped to
/// a [`Request`] that is sent to the service's request queue using the [`SockHandler`].
///
/// A handler holds no mutable state and can be shared by any number of tasks.
#[derive(Clone)]
pub struct RequestHandler {
    sock: Arc<dyn SockHandler>,
    publisher: ServiceName,
    default_timeout: u64,
    metrics: Arc<dyn RequestMetrics>,
}

impl RequestHandler {
    /// Creates a new handler.
    ///
    /// # Arguments
    ///
    /// * `sock` - The broker to send requests and events with.
    /// * `options` - The identity of the sending service and the default timeout.
    pub fn new(sock: Arc<dyn SockHandler>, options: RequestHandlerOptions) -> Self {
        RequestHandler {
            sock,
            default_timeout: options.default_timeout(),
            publisher: options.publisher().to_owned(),
            metrics: Arc::new(NoopRequestMetrics),
        }
    }

    /// Sets the recorder for request latencies and event counts.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn RequestMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn publisher(&self) -> &ServiceName {
        &self.publisher
    }

    pub fn default_timeout(&self) -> u64 {
        self.default_timeout
    }

    /// Sends a request to a queue.
    ///
    /// This is the escape hatch for services without dedicated operations.
    ///
    /// # Arguments
    ///
    /// * `queue` - The queue to send the request to.
    /// * `timeout` - The number of milliseconds to wait for the reply. A value of 0
    ///   means the handler's default timeout.
    /// * `delay` - The number of milliseconds to defer delivery of the request by.
    ///   Nobody waits for the reply of a deferred request.
    ///
    /// # Returns
    ///
    /// The reply, or `None` if the request has been deferred.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent or no reply has been
    /// received in time. The status code of the reply is not checked.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_request(
        &self,
        queue: &QueueName,
        uri: &str,
        method: RequestMethod,
        timeout: u64,
        delay: u64,
        data_type: &str,
        data: Option<Bytes>,
    ) -> Result<Option<Response>, RequestError> {
        let mut request = self.new_request(uri, method).with_data_type(data_type);
        request.data = data;
        self.dispatch(
            queue.as_str(),
            "",
            request,
            self.timeout_or_default(timeout),
            delay,
        )
        .await
    }

    /// Sends a request to a queue using the default timeout, without delay.
    pub(crate) async fn send(
        &self,
        queue: &str,
        resource: &str,
        request: Request,
    ) -> Result<Option<Response>, RequestError> {
        self.dispatch(queue, resource, request, self.default_timeout, 0)
            .await
    }

    pub(crate) fn timeout_or_default(&self, timeout: u64) -> u64 {
        if timeout == 0 {
            self.default_timeout
        } else {
            timeout
        }
    }

    pub(crate) fn new_request(&self, uri: impl Into<String>, method: RequestMethod) -> Request {
        Request::new(uri, method).with_publisher(self.publisher.as_str())
    }

    pub(crate) fn new_json_request<T>(
        &self,
        uri: impl Into<String>,
        method: RequestMethod,
        body: &T,
    ) -> Result<Request, RequestError>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(body)?;
        Ok(self.new_request(uri, method).with_data(CONTENT_TYPE_JSON, data))
    }

    /// Hands a request to the broker.
    ///
    /// A non-zero `delay` turns the request into a deferred one which is published
    /// to the delay exchange and yields `None`.
    pub(crate) async fn dispatch(
        &self,
        queue: &str,
        resource: &str,
        request: Request,
        timeout: u64,
        delay: u64,
    ) -> Result<Option<Response>, RequestError> {
        if let Err(e) = uriparse::RelativeReference::try_from(request.uri.as_str()) {
            return Err(RequestError::InvalidArgument(format!(
                "invalid request URI [{}]: {e}",
                request.uri
            )));
        }

        debug!(
            queue,
            uri = %request.uri,
            method = request.method.as_str(),
            resource,
            timeout,
            delay,
            data_type = %request.data_type,
            "sending request"
        );

        let method = request.method;
        let uri = request.uri.clone();
        let result = if delay > 0 {
            self.dispatch_delayed(queue, resource, request, delay)
                .await
                .map(|_| None)
        } else {
            self.dispatch_direct(queue, resource, request, timeout)
                .await
        };

        match result.as_ref() {
            Ok(Some(response)) => {
                debug!(queue, uri = %uri, status_code = response.status_code, "received response");
            }
            Ok(None) => {}
            Err(e) => {
                debug!(
                    queue,
                    uri = %uri,
                    method = method.as_str(),
                    delay,
                    "could not send the request: {e}"
                );
            }
        }
        result
    }

    async fn dispatch_direct(
        &self,
        target: &str,
        resource: &str,
        request: Request,
        timeout: u64,
    ) -> Result<Option<Response>, RequestError> {
        let method = request.method;
        let ttl = Duration::from_millis(timeout);

        let start = Instant::now();
        let result = match tokio::time::timeout(
            ttl,
            self.sock.request_publish(target, request, ttl),
        )
        .await
        {
            Ok(response) => response.map_err(RequestError::from),
            Err(_elapsed) => Err(RequestError::DeadlineExceeded),
        };
        self.metrics
            .observe_request(target, resource, method, start.elapsed());

        result
    }

    async fn dispatch_delayed(
        &self,
        queue: &str,
        resource: &str,
        request: Request,
        delay: u64,
    ) -> Result<(), RequestError> {
        let method = request.method;

        let start = Instant::now();
        let result = self
            .sock
            .request_publish_with_delay(queue, request, Duration::from_millis(delay))
            .await
            .map_err(RequestError::from);
        self.metrics
            .observe_request(QueueName::DELAY, resource, method, start.elapsed());

        result
    }
}

fn check_status(response: &Response) -> Result<(), RequestError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(RequestError::Remote {
            status_code: response.status_code,
        })
    }
}

/// Extracts the entity contained in a reply.
pub(crate) fn parse_response<T>(response: Option<Response>) -> Result<T, RequestError>
where
    T: DeserializeOwned,
{
    let Some(response) = response else {
        return Err(RequestError::NotFound);
    };
    check_status(&response)?;
    if !response.has_json_data_type() {
        return Err(RequestError::UnexpectedDataType(response.data_type));
    }
    let data = response.data.unwrap_or_default();
    serde_json::from_slice(&data).map_err(RequestError::from)
}

/// Checks that a reply indicates success, ignoring its body.
pub(crate) fn check_response(response: Option<Response>) -> Result<(), RequestError> {
    response
        .ok_or(RequestError::NotFound)
        .and_then(|response| check_status(&response))
}

/// Like [`check_response`] but accepts the absence of a reply to a request delivered
/// with a delay.
pub(crate) fn check_deferrable_response(
    response: Option<Response>,
    delay: u64,
) -> Result<(), RequestError> {
    match response {
        Some(response) => check_status(&response),
        None if delay > 0 => Ok(()),
        None => Err(RequestError::NotFound),
    }
}
