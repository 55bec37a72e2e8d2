mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::plan::{Plan, PlanId};
use crate::types::{Deposit, DepositId, NewProfitPosting};

/// outcome of an installment posting attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingOutcome {
    /// posting written and the owner's earnings credited
    Posted,
    /// a posting with the same (deposit, installment) key already exists;
    /// nothing was written and nothing was credited
    Duplicate,
}

/// read access to deposits
pub trait DepositStore: Send + Sync {
    /// deposits that are confirmed and not yet matured as of `now`
    fn active_deposits(&self, now: DateTime<Utc>) -> Result<Vec<Deposit>>;
}

/// read access to stored plans
pub trait PlanStore: Send + Sync {
    fn find_plan(&self, plan_id: &PlanId) -> Result<Option<Plan>>;
}

/// the profit posting ledger and the account balances it credits
pub trait ProfitLedger: Send + Sync {
    /// number of installments already posted for a deposit
    fn posted_installments(&self, deposit_id: DepositId) -> Result<u32>;

    /// insert the posting and credit the owner's accrued earnings as one
    /// atomic unit, keyed by (source_deposit_id, installment_index); an
    /// existing key returns `Duplicate` without crediting
    fn post_installment(&self, posting: &NewProfitPosting) -> Result<PostingOutcome>;
}
