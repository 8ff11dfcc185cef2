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

//! Names of the services and queues that make up the service mesh.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The name of a service, also used as the publisher of requests and events.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    pub const AGENT_MANAGER: &'static str = "agent-manager";
    pub const AI_MANAGER: &'static str = "ai-manager";
    pub const API_MANAGER: &'static str = "api-manager";
    pub const CALL_MANAGER: &'static str = "call-manager";
    pub const CAMPAIGN_MANAGER: &'static str = "campaign-manager";
    pub const CONFERENCE_MANAGER: &'static str = "conference-manager";
    pub const CUSTOMER_MANAGER: &'static str = "customer-manager";
    pub const FLOW_MANAGER: &'static str = "flow-manager";
    pub const NUMBER_MANAGER: &'static str = "number-manager";
    pub const QUEUE_MANAGER: &'static str = "queue-manager";
    pub const REGISTRAR_MANAGER: &'static str = "registrar-manager";
    pub const TALK_MANAGER: &'static str = "talk-manager";

    pub fn new(name: impl Into<String>) -> Self {
        ServiceName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Gets the queue that this service publishes its events to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use requesthandler::ServiceName;
    ///
    /// let publisher = ServiceName::new(ServiceName::CALL_MANAGER);
    /// assert_eq!(publisher.event_queue().as_str(), "bin-manager.call-manager.event");
    /// ```
    pub fn event_queue(&self) -> QueueName {
        QueueName(format!("bin-manager.{}.event", self.0))
    }

    /// Gets the queue that this service consumes requests from.
    pub fn request_queue(&self) -> QueueName {
        QueueName(format!("bin-manager.{}.request", self.0))
    }
}

impl Display for ServiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceName {
    fn from(value: &str) -> Self {
        ServiceName::new(value)
    }
}

/// The name of a broker queue or exchange.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueName(String);

macro_rules! queue_names {
    ($($name:ident => $value:literal),* $(,)?) => {
        impl QueueName {
            $(
                pub const $name: &'static str = $value;
            )*
        }
    };
}

queue_names! {
    AGENT_REQUEST => "bin-manager.agent-manager.request",
    AI_REQUEST => "bin-manager.ai-manager.request",
    BILLING_REQUEST => "bin-manager.billing-manager.request",
    CALL_REQUEST => "bin-manager.call-manager.request",
    CAMPAIGN_REQUEST => "bin-manager.campaign-manager.request",
    CHAT_REQUEST => "bin-manager.chat-manager.request",
    CONFERENCE_REQUEST => "bin-manager.conference-manager.request",
    CONTACT_REQUEST => "bin-manager.contact-manager.request",
    CONVERSATION_REQUEST => "bin-manager.conversation-manager.request",
    CUSTOMER_REQUEST => "bin-manager.customer-manager.request",
    EMAIL_REQUEST => "bin-manager.email-manager.request",
    FLOW_REQUEST => "bin-manager.flow-manager.request",
    MESSAGE_REQUEST => "bin-manager.message-manager.request",
    NUMBER_REQUEST => "bin-manager.number-manager.request",
    OUTDIAL_REQUEST => "bin-manager.outdial-manager.request",
    PIPECAT_REQUEST => "bin-manager.pipecat-manager.request",
    QUEUE_REQUEST => "bin-manager.queue-manager.request",
    REGISTRAR_REQUEST => "bin-manager.registrar-manager.request",
    ROUTE_REQUEST => "bin-manager.route-manager.request",
    STORAGE_REQUEST => "bin-manager.storage-manager.request",
    TAG_REQUEST => "bin-manager.tag-manager.request",
    TALK_REQUEST => "bin-manager.talk-manager.request",
    TIMELINE_REQUEST => "bin-manager.timeline-manager.request",
    TRANSCRIBE_REQUEST => "bin-manager.transcribe-manager.request",
    TRANSFER_REQUEST => "bin-manager.transfer-manager.request",
    TTS_REQUEST => "bin-manager.tts-manager.request",
    WEBHOOK_REQUEST => "bin-manager.webhook-manager.request",

    AGENT_EVENT => "bin-manager.agent-manager.event",
    AI_EVENT => "bin-manager.ai-manager.event",
    BILLING_EVENT => "bin-manager.billing-manager.event",
    CALL_EVENT => "bin-manager.call-manager.event",
    CHAT_EVENT => "bin-manager.chat-manager.event",
    CONFERENCE_EVENT => "bin-manager.conference-manager.event",
    CONVERSATION_EVENT => "bin-manager.conversation-manager.event",
    CUSTOMER_EVENT => "bin-manager.customer-manager.event",
    QUEUE_EVENT => "bin-manager.queue-manager.event",
    REGISTRAR_EVENT => "bin-manager.registrar-manager.event",
    STORAGE_EVENT => "bin-manager.storage-manager.event",

    DELAY => "bin-manager.delay",
}

impl QueueName {
    pub fn new(name: impl Into<String>) -> Self {
        QueueName(name.into())
    }

    /// Gets the request queue of the Asterisk proxy with the given ID.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use requesthandler::QueueName;
    ///
    /// assert_eq!(QueueName::asterisk("call").as_str(), "asterisk.call.request");
    /// ```
    pub fn asterisk(asterisk_id: &str) -> Self {
        QueueName(format!("asterisk.{asterisk_id}.request"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QueueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueueName {
    fn from(value: &str) -> Self {
        QueueName::new(value)
    }
}

impl AsRef<str> for QueueName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_queues_follow_naming_scheme() {
        let service = ServiceName::new(ServiceName::QUEUE_MANAGER);
        assert_eq!(service.request_queue().as_str(), QueueName::QUEUE_REQUEST);
        assert_eq!(service.event_queue().as_str(), QueueName::QUEUE_EVENT);
    }

    #[test]
    fn test_service_name_serializes_as_plain_string() {
        let service = ServiceName::from("flow-manager");
        assert_eq!(serde_json::to_string(&service).unwrap(), "\"flow-manager\"");
    }
}
