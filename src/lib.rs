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
requesthandler is a typed client for the services of the bin-manager mesh.

Services talk to each other by means of a message broker. Each service consumes requests from
its own queue (e.g. `bin-manager.call-manager.request`), replies to them with an HTTP-like
status code and a JSON body, and publishes events to its event queue.

The crate's central type is the [`RequestHandler`], which maps the operations of the other
services to requests, hands them to a [`SockHandler`], and decodes the replies into the types
of the [`models`] module. The operations are grouped by service in traits like [`CallManager`]
or [`FlowManager`], all of which are implemented by the handler.

```rust
# use std::sync::Arc;
# use requesthandler::{LocalSockHandler, RequestHandler, RequestHandlerOptions, SockHandler};
let sock: Arc<dyn SockHandler> = Arc::new(LocalSockHandler::new());
let handler = RequestHandler::new(
    sock,
    RequestHandlerOptions::builder("call-manager").with_default_timeout(5_000).build(),
);
assert_eq!(handler.default_timeout(), 5_000);
```

## Library contents

* the [`RequestHandler`] and the service specific traits it implements
* the [`SockHandler`] trait, which abstracts the broker, and the message types exchanged
  with it
* the [`models`] of the resources returned by the services
* the [`RequestMetrics`] trait for recording request latencies and published events
* the [`LocalSockHandler`], an in-process broker, if the `util` feature is enabled

## Features

* `util` (default) - the in-process [`LocalSockHandler`]
* `test-util` - [mockall](https://docs.rs/mockall) based mocks of all traits
*/

mod sock;
pub use sock::{
    Event, Request, RequestMethod, Response, SockError, SockHandler, CONTENT_TYPE_JSON,
    CONTENT_TYPE_NONE, CONTENT_TYPE_TEXT,
};
#[cfg(any(test, feature = "test-util"))]
pub use sock::MockSockHandler;

mod outline;
pub use outline::{QueueName, ServiceName};

mod metrics;
pub use metrics::{
    HistogramSnapshot, InMemoryRequestMetrics, NoopRequestMetrics, RequestMetrics,
    REQUEST_PROCESS_TIME_BUCKETS,
};
#[cfg(any(test, feature = "test-util"))]
pub use metrics::MockRequestMetrics;

pub mod models;
pub mod query;

mod requesthandler;
pub use requesthandler::{
    ActiveflowManager, AgentManager, AicallManager, AsteriskChannel, CallManager,
    CampaignManager, ConferenceManager, CustomerManager, EventPublisher, ExtensionManager,
    FlowManager, NumberManager, NumberRenewal, QueueManager, QueuecallManager, RequestError,
    RequestHandler, RequestHandlerOptions, RequestHandlerOptionsBuilder, TalkManager,
    DEFAULT_TIMEOUT, DELAY_HOUR, DELAY_MINUTE, DELAY_NOW, DELAY_SECOND, STASIS_APP,
};
#[cfg(any(test, feature = "test-util"))]
pub use requesthandler::{
    MockActiveflowManager, MockAgentManager, MockAicallManager, MockAsteriskChannel,
    MockCallManager, MockCampaignManager, MockConferenceManager, MockCustomerManager,
    MockEventPublisher, MockExtensionManager, MockFlowManager, MockNumberManager,
    MockQueueManager, MockQueuecallManager, MockTalkManager,
};

#[cfg(feature = "util")]
mod local_sock;
#[cfg(feature = "util")]
pub use local_sock::{EventSubscriber, LocalSockHandler, RegistrationError, RequestConsumer};
#[cfg(all(feature = "util", any(test, feature = "test-util")))]
pub use local_sock::{MockEventSubscriber, MockRequestConsumer};
