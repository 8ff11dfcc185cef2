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

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

use crate::RequestMethod;

/// Upper bounds (in milliseconds) of the request latency histogram buckets.
pub const REQUEST_PROCESS_TIME_BUCKETS: [u64; 5] = [50, 100, 500, 1000, 3000];

/// Records the outcome of requests and events sent by a
/// [`RequestHandler`](crate::RequestHandler).
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait RequestMetrics: Send + Sync {
    /// Records the time it took to hand a request to the broker (and receive the reply).
    fn observe_request(
        &self,
        target: &str,
        resource: &str,
        method: RequestMethod,
        elapsed: Duration,
    );

    /// Counts a published event.
    fn increment_event(&self, event_type: &str);
}

/// A [`RequestMetrics`] that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRequestMetrics;

impl RequestMetrics for NoopRequestMetrics {
    fn observe_request(
        &self,
        _target: &str,
        _resource: &str,
        _method: RequestMethod,
        _elapsed: Duration,
    ) {
    }

    fn increment_event(&self, _event_type: &str) {}
}

/// A point in time view of the latencies recorded for one label set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistogramSnapshot {
    /// Cumulative counts, one per entry of [`REQUEST_PROCESS_TIME_BUCKETS`].
    pub buckets: [u64; 5],
    pub count: u64,
    pub sum_millis: u64,
}

impl HistogramSnapshot {
    fn observe(&mut self, millis: u64) {
        for (bucket, bound) in self
            .buckets
            .iter_mut()
            .zip(REQUEST_PROCESS_TIME_BUCKETS.iter())
        {
            if millis <= *bound {
                *bucket += 1;
            }
        }
        self.count += 1;
        self.sum_millis += millis;
    }
}

type HistogramKey = (String, String, RequestMethod);

/// A [`RequestMetrics`] which keeps all recorded values in memory.
#[derive(Debug, Default)]
pub struct InMemoryRequestMetrics {
    request_process_time: Mutex<HashMap<HistogramKey, HistogramSnapshot>>,
    event_publish_total: Mutex<HashMap<String, u64>>,
}

impl InMemoryRequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the latencies recorded for requests to a target.
    pub fn request_process_time(
        &self,
        target: &str,
        resource: &str,
        method: RequestMethod,
    ) -> Option<HistogramSnapshot> {
        self.request_process_time.lock().map_or(None, |histograms| {
            histograms
                .get(&(target.to_string(), resource.to_string(), method))
                .cloned()
        })
    }

    /// Gets the number of published events of a type.
    pub fn event_publish_total(&self, event_type: &str) -> u64 {
        self.event_publish_total
            .lock()
            .map_or(0, |counters| counters.get(event_type).copied().unwrap_or(0))
    }
}

impl RequestMetrics for InMemoryRequestMetrics {
    fn observe_request(
        &self,
        target: &str,
        resource: &str,
        method: RequestMethod,
        elapsed: Duration,
    ) {
        let Ok(mut histograms) = self.request_process_time.lock() else {
            debug!(queue = target, resource, "cannot acquire lock for request histograms");
            return;
        };
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        histograms
            .entry((target.to_string(), resource.to_string(), method))
            .or_default()
            .observe(millis);
    }

    fn increment_event(&self, event_type: &str) {
        let Ok(mut counters) = self.event_publish_total.lock() else {
            debug!(event_type, "cannot acquire lock for event counters");
            return;
        };
        *counters.entry(event_type.to_string()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_request_fills_cumulative_buckets() {
        let metrics = InMemoryRequestMetrics::new();
        let target = "bin-manager.call-manager.request";

        metrics.observe_request(target, "call/calls", RequestMethod::Get, Duration::from_millis(30));
        metrics.observe_request(target, "call/calls", RequestMethod::Get, Duration::from_millis(700));
        metrics.observe_request(target, "call/calls", RequestMethod::Get, Duration::from_secs(5));

        let snapshot = metrics
            .request_process_time(target, "call/calls", RequestMethod::Get)
            .unwrap();
        assert_eq!(snapshot.buckets, [1, 1, 1, 2, 2]);
        assert_eq!(snapshot.count, 3);
        assert_eq!(snapshot.sum_millis, 5730);
    }

    #[test]
    fn test_histograms_are_labeled_by_method() {
        let metrics = InMemoryRequestMetrics::new();
        let target = "bin-manager.agent-manager.request";

        metrics.observe_request(target, "agent/agents", RequestMethod::Post, Duration::ZERO);

        assert!(metrics
            .request_process_time(target, "agent/agents", RequestMethod::Get)
            .is_none());
        assert_eq!(
            metrics
                .request_process_time(target, "agent/agents", RequestMethod::Post)
                .map(|s| s.count),
            Some(1)
        );
    }

    #[test]
    fn test_increment_event() {
        let metrics = InMemoryRequestMetrics::new();
        metrics.increment_event("call_hangup");
        metrics.increment_event("call_hangup");

        assert_eq!(metrics.event_publish_total("call_hangup"), 2);
        assert_eq!(metrics.event_publish_total("call_created"), 0);
    }
}
