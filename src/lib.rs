pub mod accrual;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod plan;
pub mod store;
pub mod types;

// re-export key types
pub use accrual::{AccrualJob, CycleSummary};
pub use config::AccrualConfig;
pub use decimal::{Money, Rate};
pub use errors::{AccrualError, Result};
pub use events::{Event, EventStore, SkipReason};
pub use plan::{AccrualMode, Plan, PlanCatalog, PlanId};
pub use store::{DepositStore, MemoryStore, PlanStore, PostingOutcome, ProfitLedger};
pub use types::{
    Account, Deposit, DepositId, DepositStatus, NewProfitPosting, OwnerId, PostingId,
    ProfitPosting,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
