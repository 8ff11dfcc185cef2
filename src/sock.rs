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

//! Message envelopes exchanged with the broker and the abstraction of the broker itself.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use mediatype::{names, MediaType};
use serde::{Deserialize, Serialize};

/// Marks a message without a body.
pub const CONTENT_TYPE_NONE: &str = "";
/// Marks a plain text body.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";
/// Marks a JSON body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// The HTTP-like verb of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request sent to a service's request queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub uri: String,
    pub method: RequestMethod,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "raw_json")]
    pub data: Option<Bytes>,
}

impl Request {
    /// Creates a request without publisher and body.
    pub fn new(uri: impl Into<String>, method: RequestMethod) -> Self {
        Request {
            uri: uri.into(),
            method,
            publisher: String::new(),
            data_type: CONTENT_TYPE_NONE.to_string(),
            data: None,
        }
    }

    #[must_use]
    pub fn with_publisher(mut self, publisher: &str) -> Self {
        self.publisher = publisher.to_string();
        self
    }

    /// Sets the declared type of the body without setting the body itself.
    #[must_use]
    pub fn with_data_type(mut self, data_type: &str) -> Self {
        self.data_type = data_type.to_string();
        self
    }

    #[must_use]
    pub fn with_data(mut self, data_type: &str, data: impl Into<Bytes>) -> Self {
        self.data_type = data_type.to_string();
        self.data = Some(data.into());
        self
    }

    /// Gets the body as UTF-8 text, if there is one.
    pub fn data_str(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| std::str::from_utf8(data).ok())
    }
}

/// The reply of a service to a [`Request`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status_code: u16,
    #[serde(default)]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "raw_json")]
    pub data: Option<Bytes>,
}

impl Response {
    pub fn new<T>(status_code: u16, data_type: &str, data: Option<T>) -> Self
    where
        T: Into<Bytes>,
    {
        Response {
            status_code,
            data_type: data_type.to_string(),
            data: data.map(Into::into),
        }
    }

    /// Checks if the status code indicates success.
    pub fn is_success(&self) -> bool {
        self.status_code <= 299
    }

    /// Checks if the declared data type is empty or denotes a JSON document.
    ///
    /// Parameters like `charset` are ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use requesthandler::Response;
    ///
    /// assert!(Response::new::<&str>(200, "application/json; charset=utf-8", None).has_json_data_type());
    /// assert!(Response::new::<&str>(200, "", None).has_json_data_type());
    /// assert!(!Response::new::<&str>(200, "text/plain", None).has_json_data_type());
    /// ```
    pub fn has_json_data_type(&self) -> bool {
        if self.data_type.is_empty() {
            return true;
        }
        MediaType::parse(&self.data_type).is_ok_and(|media_type| {
            media_type.ty == names::APPLICATION && media_type.subty == names::JSON
        })
    }
}

/// A notification published to a service's event queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "raw_json")]
    pub data: Option<Bytes>,
}

/// An error indicating a problem while handing a message to the broker.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SockError {
    /// The broker cannot be reached or refused the message.
    #[error("broker unavailable: {0}")]
    Unavailable(String),
    /// No reply has been received within the given timeout.
    #[error("no reply received before deadline")]
    DeadlineExceeded,
    /// Nothing consumes messages from the target queue.
    #[error("no consumer for queue {0}")]
    NoRoute(String),
    #[error("internal broker error: {0}")]
    Internal(String),
}

/// The message broker used for reaching other services.
///
/// Implementations are expected to be safe for concurrent use by many callers.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait SockHandler: Send + Sync {
    /// Publishes a request to a queue and waits for the reply.
    ///
    /// # Returns
    ///
    /// The reply, or `None` if the consumer did not reply with a message.
    ///
    /// # Errors
    ///
    /// Returns [`SockError::DeadlineExceeded`] if no reply arrives within `timeout`.
    async fn request_publish(
        &self,
        target: &str,
        request: Request,
        timeout: Duration,
    ) -> Result<Option<Response>, SockError>;

    /// Publishes a request that is delivered to a queue after the given delay.
    ///
    /// Nobody waits for a reply to a delayed request.
    async fn request_publish_with_delay(
        &self,
        queue: &str,
        request: Request,
        delay: Duration,
    ) -> Result<(), SockError>;

    /// Publishes an event to an event queue.
    async fn event_publish(&self, queue: &str, event: Event) -> Result<(), SockError>;
}

// bodies are embedded as JSON documents rather than byte arrays
mod raw_json {
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::value::RawValue;

    pub fn serialize<S>(data: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match data {
            Some(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(serde::ser::Error::custom)?;
                let raw =
                    RawValue::from_string(text.to_owned()).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&raw)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Bytes>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<Box<RawValue>> = Option::deserialize(deserializer)?;
        Ok(raw.map(|value| Bytes::from(value.get().to_owned())))
    }
}
