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

// helpers shared by the unit tests of the service specific operations

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::{
    MockSockHandler, Request, RequestHandler, RequestHandlerOptions, RequestMethod, Response,
    SockError, CONTENT_TYPE_JSON, CONTENT_TYPE_NONE,
};

pub(crate) const TEST_PUBLISHER: &str = "test-manager";

pub(crate) fn new_handler(sock: MockSockHandler) -> RequestHandler {
    RequestHandler::new(Arc::new(sock), RequestHandlerOptions::from(TEST_PUBLISHER))
}

/// A request without body, as sent by the handlers created in tests.
pub(crate) fn request(uri: &str, method: RequestMethod) -> Request {
    Request::new(uri, method).with_publisher(TEST_PUBLISHER)
}

/// A request declaring a JSON body without carrying one.
pub(crate) fn json_typed_request(uri: &str, method: RequestMethod) -> Request {
    request(uri, method).with_data_type(CONTENT_TYPE_JSON)
}

pub(crate) fn json_request(uri: &str, method: RequestMethod, body: &'static str) -> Request {
    request(uri, method).with_data(CONTENT_TYPE_JSON, Bytes::from_static(body.as_bytes()))
}

pub(crate) fn json_response(body: &'static str) -> Option<Response> {
    Some(Response::new(200, CONTENT_TYPE_JSON, Some(body)))
}

pub(crate) fn status_response(status_code: u16) -> Option<Response> {
    Some(Response::new::<Bytes>(status_code, CONTENT_TYPE_NONE, None))
}

/// Creates a handler whose broker expects exactly the given request and replies with `response`.
pub(crate) fn expect_request(
    target: &'static str,
    expected: Request,
    timeout: u64,
    response: Option<Response>,
) -> RequestHandler {
    let mut sock = MockSockHandler::new();
    sock.expect_request_publish()
        .once()
        .withf(move |actual_target, actual, actual_timeout| {
            actual_target == target
                && actual == &expected
                && *actual_timeout == Duration::from_millis(timeout)
        })
        .return_const(Ok(response));
    sock.expect_request_publish_with_delay().never();
    new_handler(sock)
}

/// Creates a handler whose broker fails to deliver any request.
pub(crate) fn failing_handler() -> RequestHandler {
    let mut sock = MockSockHandler::new();
    sock.expect_request_publish()
        .return_const(Err(SockError::Unavailable("connection refused".to_string())));
    new_handler(sock)
}

/// Creates a handler whose broker expects exactly the given deferred request.
pub(crate) fn expect_delayed_request(
    queue: &'static str,
    expected: Request,
    delay: u64,
) -> RequestHandler {
    let mut sock = MockSockHandler::new();
    sock.expect_request_publish().never();
    sock.expect_request_publish_with_delay()
        .once()
        .withf(move |actual_queue, actual, actual_delay| {
            actual_queue == queue
                && actual == &expected
                && *actual_delay == Duration::from_millis(delay)
        })
        .return_const(Ok(()));
    new_handler(sock)
}
