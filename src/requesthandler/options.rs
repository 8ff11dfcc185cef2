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

use serde::Deserialize;

use crate::ServiceName;

/// The number of milliseconds to wait for a reply if not specified otherwise.
pub const DEFAULT_TIMEOUT: u64 = 3_000;

/// Delays (in milliseconds) for requests that should be delivered later.
pub const DELAY_NOW: u64 = 0;
pub const DELAY_SECOND: u64 = 1_000;
pub const DELAY_MINUTE: u64 = DELAY_SECOND * 60;
pub const DELAY_HOUR: u64 = DELAY_MINUTE * 60;

/// Configuration of a [`RequestHandler`](crate::RequestHandler).
///
/// The options can be read from any format supported by serde, e.g.
///
/// ```rust
/// use requesthandler::RequestHandlerOptions;
///
/// let options: RequestHandlerOptions =
///     serde_json::from_str(r#"{"publisher":"call-manager"}"#).unwrap();
/// assert_eq!(options.publisher().as_str(), "call-manager");
/// assert_eq!(options.default_timeout(), 3_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestHandlerOptions {
    publisher: ServiceName,
    #[serde(default = "default_timeout")]
    default_timeout: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

impl RequestHandlerOptions {
    /// Constructs a new builder.
    pub fn builder(publisher: impl Into<ServiceName>) -> RequestHandlerOptionsBuilder {
        RequestHandlerOptionsBuilder {
            publisher: publisher.into(),
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Gets the name of the service that sends requests.
    pub fn publisher(&self) -> &ServiceName {
        &self.publisher
    }

    /// Gets the timeout (in milliseconds) used by operations without an explicit timeout.
    pub fn default_timeout(&self) -> u64 {
        if self.default_timeout == 0 {
            DEFAULT_TIMEOUT
        } else {
            self.default_timeout
        }
    }
}

/// Builder for constructing [`RequestHandlerOptions`].
#[derive(Debug, Clone)]
pub struct RequestHandlerOptionsBuilder {
    publisher: ServiceName,
    default_timeout: u64,
}

impl RequestHandlerOptionsBuilder {
    /// Sets the default timeout. A value of 0 restores [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: u64) -> Self {
        self.default_timeout = if timeout == 0 {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        self
    }

    pub fn build(self) -> RequestHandlerOptions {
        RequestHandlerOptions {
            publisher: self.publisher,
            default_timeout: self.default_timeout,
        }
    }
}

impl From<&str> for RequestHandlerOptions {
    fn from(publisher: &str) -> Self {
        RequestHandlerOptions::builder(publisher).build()
    }
}
