use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::plan::PlanId;
use crate::types::{DepositId, OwnerId};

/// why a deposit produced no postings this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// plan id matched neither the store nor the fallback catalog
    PlanNotResolved,
    /// gating threshold not yet reached
    NotYetEligible,
}

/// all events emitted over an accrual cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    CycleStarted {
        timestamp: DateTime<Utc>,
    },
    InstallmentPosted {
        deposit_id: DepositId,
        owner_id: OwnerId,
        installment_index: u32,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    /// a concurrent cycle already committed this installment
    DuplicateSuppressed {
        deposit_id: DepositId,
        installment_index: u32,
        timestamp: DateTime<Utc>,
    },
    DepositSkipped {
        deposit_id: DepositId,
        plan_id: PlanId,
        reason: SkipReason,
        timestamp: DateTime<Utc>,
    },
    DepositFailed {
        deposit_id: DepositId,
        message: String,
        timestamp: DateTime<Utc>,
    },
    CycleCompleted {
        deposits_scanned: u32,
        installments_posted: u32,
        total_credited: Money,
        deposits_skipped: u32,
        deposits_errored: u32,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during a cycle
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_take_events_drains() {
        let mut store = EventStore::new();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        store.emit(Event::CycleStarted { timestamp: now });
        assert_eq!(store.events().len(), 1);

        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_event_serializes() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let event = Event::DepositSkipped {
            deposit_id: uuid::Uuid::new_v4(),
            plan_id: PlanId::from("starter"),
            reason: SkipReason::PlanNotResolved,
            timestamp: now,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("PlanNotResolved"));
    }
}
