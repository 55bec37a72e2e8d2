use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use uuid::Uuid;

use crate::errors::{AccrualError, Result};
use crate::plan::{Plan, PlanId};
use crate::store::{DepositStore, PlanStore, PostingOutcome, ProfitLedger};
use crate::types::{Account, Deposit, DepositId, NewProfitPosting, OwnerId, ProfitPosting};

#[derive(Debug, Default)]
struct Inner {
    deposits: BTreeMap<DepositId, Deposit>,
    plans: HashMap<PlanId, Plan>,
    // keyed by (deposit, installment); the key is the uniqueness constraint
    postings: BTreeMap<(DepositId, u32), ProfitPosting>,
    accounts: HashMap<OwnerId, Account>,
}

/// in-process store backing all four collections, for tests and embedders
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_deposit(&self, deposit: Deposit) {
        self.lock().deposits.insert(deposit.id, deposit);
    }

    pub fn insert_plan(&self, plan: Plan) {
        self.lock().plans.insert(plan.id.clone(), plan);
    }

    pub fn insert_account(&self, account: Account) {
        self.lock().accounts.insert(account.owner_id, account);
    }

    pub fn account(&self, owner_id: OwnerId) -> Option<Account> {
        self.lock().accounts.get(&owner_id).cloned()
    }

    pub fn postings_for(&self, deposit_id: DepositId) -> Vec<ProfitPosting> {
        self.lock()
            .postings
            .range((deposit_id, 0)..=(deposit_id, u32::MAX))
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DepositStore for MemoryStore {
    fn active_deposits(&self, now: DateTime<Utc>) -> Result<Vec<Deposit>> {
        Ok(self
            .lock()
            .deposits
            .values()
            .filter(|d| d.is_active(now))
            .cloned()
            .collect())
    }
}

impl PlanStore for MemoryStore {
    fn find_plan(&self, plan_id: &PlanId) -> Result<Option<Plan>> {
        Ok(self.lock().plans.get(plan_id).cloned())
    }
}

impl ProfitLedger for MemoryStore {
    fn posted_installments(&self, deposit_id: DepositId) -> Result<u32> {
        Ok(self
            .lock()
            .postings
            .range((deposit_id, 0)..=(deposit_id, u32::MAX))
            .count() as u32)
    }

    fn post_installment(&self, posting: &NewProfitPosting) -> Result<PostingOutcome> {
        let mut inner = self.lock();
        let key = (posting.source_deposit_id, posting.installment_index);

        if inner.postings.contains_key(&key) {
            return Ok(PostingOutcome::Duplicate);
        }

        // a missing owner must not leave an orphan posting behind
        let account = inner
            .accounts
            .get_mut(&posting.owner_id)
            .ok_or(AccrualError::OwnerNotFound {
                owner_id: posting.owner_id,
            })?;
        account.accrued_earnings += posting.amount;

        inner.postings.insert(
            key,
            ProfitPosting {
                id: Uuid::new_v4(),
                owner_id: posting.owner_id,
                source_deposit_id: posting.source_deposit_id,
                installment_index: posting.installment_index,
                amount: posting.amount,
                posted_at: posting.posted_at,
            },
        );

        Ok(PostingOutcome::Posted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::plan::AccrualMode;
    use crate::types::DepositStatus;
    use chrono::{Duration, TimeZone};

    fn sample_posting(deposit_id: DepositId, owner_id: OwnerId, index: u32) -> NewProfitPosting {
        NewProfitPosting {
            owner_id,
            source_deposit_id: deposit_id,
            installment_index: index,
            amount: Money::from_major(300),
            posted_at: Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_post_installment_credits_once() {
        let store = MemoryStore::new();
        let owner_id = Uuid::new_v4();
        let deposit_id = Uuid::new_v4();
        store.insert_account(Account::new(owner_id));

        let posting = sample_posting(deposit_id, owner_id, 4);

        // first attempt wins, second observes the key and no-ops
        assert_eq!(store.post_installment(&posting).unwrap(), PostingOutcome::Posted);
        assert_eq!(store.post_installment(&posting).unwrap(), PostingOutcome::Duplicate);

        let account = store.account(owner_id).unwrap();
        assert_eq!(account.accrued_earnings, Money::from_major(300));
        assert_eq!(store.posted_installments(deposit_id).unwrap(), 1);
    }

    #[test]
    fn test_missing_owner_leaves_ledger_untouched() {
        let store = MemoryStore::new();
        let deposit_id = Uuid::new_v4();

        let posting = sample_posting(deposit_id, Uuid::new_v4(), 1);
        let err = store.post_installment(&posting).unwrap_err();
        assert!(matches!(err, AccrualError::OwnerNotFound { .. }));
        assert_eq!(store.posted_installments(deposit_id).unwrap(), 0);
    }

    #[test]
    fn test_posting_count_scoped_to_deposit() {
        let store = MemoryStore::new();
        let owner_id = Uuid::new_v4();
        store.insert_account(Account::new(owner_id));

        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        store.post_installment(&sample_posting(first, owner_id, 1)).unwrap();
        store.post_installment(&sample_posting(first, owner_id, 2)).unwrap();
        store.post_installment(&sample_posting(second, owner_id, 1)).unwrap();

        assert_eq!(store.posted_installments(first).unwrap(), 2);
        assert_eq!(store.posted_installments(second).unwrap(), 1);
        assert_eq!(store.postings_for(first).len(), 2);
    }

    #[test]
    fn test_active_deposit_filter() {
        let store = MemoryStore::new();
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let now = created + Duration::hours(48);

        let make = |status: DepositStatus, maturity: DateTime<Utc>| Deposit {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            plan_id: PlanId::from("starter"),
            principal: Money::from_major(100),
            status,
            created_at: created,
            maturity_date: maturity,
        };

        let active = make(DepositStatus::Confirmed, created + Duration::hours(720));
        let active_id = active.id;
        store.insert_deposit(active);
        store.insert_deposit(make(DepositStatus::Pending, created + Duration::hours(720)));
        store.insert_deposit(make(DepositStatus::Confirmed, created + Duration::hours(24)));

        let found = store.active_deposits(now).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, active_id);
    }

    #[test]
    fn test_plan_lookup() {
        let store = MemoryStore::new();
        store.insert_plan(Plan::new(
            "custom",
            "Custom",
            Rate::from_percentage(20),
            48,
            AccrualMode::OneShot,
        ));

        let found = store.find_plan(&PlanId::from("custom")).unwrap().unwrap();
        assert_eq!(found.duration_hours, 48);
        assert!(store.find_plan(&PlanId::from("absent")).unwrap().is_none());
    }
}
