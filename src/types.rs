use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::plan::PlanId;

/// unique identifier for a deposit
pub type DepositId = Uuid;

/// unique identifier for an account owner
pub type OwnerId = Uuid;

/// unique identifier for a profit posting
pub type PostingId = Uuid;

/// deposit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    /// submitted, awaiting admin approval
    Pending,
    /// approved and earning
    Confirmed,
    /// declined by admin
    Rejected,
}

/// a confirmed investment principal tied to a plan and a maturity date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: DepositId,
    pub owner_id: OwnerId,
    pub plan_id: PlanId,
    pub principal: Money,
    pub status: DepositStatus,
    pub created_at: DateTime<Utc>,
    pub maturity_date: DateTime<Utc>,
}

impl Deposit {
    /// eligible for accrual: confirmed and not yet matured
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == DepositStatus::Confirmed && self.maturity_date > now
    }

    /// whole hours elapsed since creation, clamped at zero
    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> u32 {
        (now - self.created_at).num_hours().max(0) as u32
    }
}

/// immutable ledger record of one paid installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitPosting {
    pub id: PostingId,
    pub owner_id: OwnerId,
    pub source_deposit_id: DepositId,
    /// 1-based position in the deposit's installment sequence
    pub installment_index: u32,
    pub amount: Money,
    pub posted_at: DateTime<Utc>,
}

/// a posting about to be written; the ledger assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProfitPosting {
    pub owner_id: OwnerId,
    pub source_deposit_id: DepositId,
    pub installment_index: u32,
    pub amount: Money,
    pub posted_at: DateTime<Utc>,
}

/// the slice of an account the accrual job touches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub owner_id: OwnerId,
    /// total credited by accrual, increment-only
    pub accrued_earnings: Money,
}

impl Account {
    pub fn new(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            accrued_earnings: Money::ZERO,
        }
    }
}
