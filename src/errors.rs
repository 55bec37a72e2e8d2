use thiserror::Error;

use crate::plan::PlanId;
use crate::types::{DepositId, OwnerId};

#[derive(Error, Debug)]
pub enum AccrualError {
    #[error("store unavailable: {message}")]
    StoreUnavailable {
        message: String,
    },

    #[error("store operation failed: {message}")]
    StoreOperation {
        message: String,
    },

    #[error("owner account not found: {owner_id}")]
    OwnerNotFound {
        owner_id: OwnerId,
    },

    #[error("plan not found: {plan_id}")]
    PlanNotFound {
        plan_id: PlanId,
    },

    #[error("invalid plan {plan_id}: {message}")]
    InvalidPlan {
        plan_id: PlanId,
        message: String,
    },

    #[error("deposit not found: {deposit_id}")]
    DepositNotFound {
        deposit_id: DepositId,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, AccrualError>;
