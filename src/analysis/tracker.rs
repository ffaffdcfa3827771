// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

/// Identifies one analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Last-request-wins bookkeeping for analysis requests.
///
/// Starting a request supersedes any in flight. A result is accepted only for the most recent,
/// still-running ticket; late replies of superseded or cancelled requests are discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTracker {
    last: u64,
    in_flight: Option<Ticket>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Ticket {
        if let Some(previous) = self.in_flight {
            debug!(ticket = previous.0, "superseding in-flight analysis");
        }
        self.last = self.last.wrapping_add(1);
        let ticket = Ticket(self.last);
        self.in_flight = Some(ticket);
        ticket
    }

    /// Abandons the in-flight request, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        self.in_flight.take().is_some()
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.in_flight == Some(ticket)
    }

    /// Hands `result` back when `ticket` is still current and completes it; `None` otherwise.
    pub fn accept<T>(&mut self, ticket: Ticket, result: T) -> Option<T> {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "discarding stale analysis result");
            return None;
        }
        self.in_flight = None;
        Some(result)
    }
}
