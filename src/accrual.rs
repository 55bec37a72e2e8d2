use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AccrualConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore, SkipReason};
use crate::plan::Plan;
use crate::store::{DepositStore, PlanStore, PostingOutcome, ProfitLedger};
use crate::types::{Deposit, NewProfitPosting};

/// work done by one accrual cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleSummary {
    pub deposits_scanned: u32,
    pub installments_posted: u32,
    pub total_credited: Money,
    /// deposits whose plan id resolved nowhere
    pub deposits_skipped: u32,
    /// deposits that failed mid-processing and were isolated
    pub deposits_errored: u32,
}

/// what processing one deposit produced
enum DepositOutcome {
    Posted,
    NotYetEligible,
    NothingDue,
    PlanNotResolved,
}

/// periodic batch job that walks active deposits and posts owed profit
/// installments, at most once per installment
pub struct AccrualJob {
    deposits: Arc<dyn DepositStore>,
    plans: Arc<dyn PlanStore>,
    ledger: Arc<dyn ProfitLedger>,
    config: AccrualConfig,
    pub events: EventStore,
}

impl AccrualJob {
    pub fn new(
        deposits: Arc<dyn DepositStore>,
        plans: Arc<dyn PlanStore>,
        ledger: Arc<dyn ProfitLedger>,
        config: AccrualConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            deposits,
            plans,
            ledger,
            config,
            events: EventStore::new(),
        })
    }

    /// run one cycle on the system clock
    pub fn run_cycle_now(&mut self) -> Result<CycleSummary> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.run_cycle(&time)
    }

    /// run one accrual cycle
    ///
    /// failing to list deposits aborts the whole cycle; any failure inside a
    /// single deposit is logged and counted, and the cycle continues
    pub fn run_cycle(&mut self, time_provider: &SafeTimeProvider) -> Result<CycleSummary> {
        let now = time_provider.now();
        self.events.emit(Event::CycleStarted { timestamp: now });

        let deposits = self.deposits.active_deposits(now)?;

        let mut summary = CycleSummary::default();
        for deposit in &deposits {
            summary.deposits_scanned += 1;

            // process_deposit accumulates committed postings into the
            // summary itself: work written before a mid-sequence failure
            // must still be reported
            match self.process_deposit(deposit, now, &mut summary) {
                Ok(DepositOutcome::Posted)
                | Ok(DepositOutcome::NotYetEligible)
                | Ok(DepositOutcome::NothingDue) => {}
                Ok(DepositOutcome::PlanNotResolved) => {
                    summary.deposits_skipped += 1;
                }
                Err(err) => {
                    warn!("deposit {} failed, continuing cycle: {}", deposit.id, err);
                    self.events.emit(Event::DepositFailed {
                        deposit_id: deposit.id,
                        message: err.to_string(),
                        timestamp: now,
                    });
                    summary.deposits_errored += 1;
                }
            }
        }

        info!(
            "accrual cycle done: scanned={} posted={} credited={} skipped={} errored={}",
            summary.deposits_scanned,
            summary.installments_posted,
            summary.total_credited,
            summary.deposits_skipped,
            summary.deposits_errored,
        );
        self.events.emit(Event::CycleCompleted {
            deposits_scanned: summary.deposits_scanned,
            installments_posted: summary.installments_posted,
            total_credited: summary.total_credited,
            deposits_skipped: summary.deposits_skipped,
            deposits_errored: summary.deposits_errored,
            timestamp: now,
        });

        Ok(summary)
    }

    /// stored plan first, fallback catalog second
    fn resolve_plan(&self, deposit: &Deposit) -> Result<Option<Plan>> {
        if let Some(plan) = self.plans.find_plan(&deposit.plan_id)? {
            return Ok(Some(plan));
        }
        Ok(self.config.fallback_plans.get(&deposit.plan_id).cloned())
    }

    fn process_deposit(
        &mut self,
        deposit: &Deposit,
        now: DateTime<Utc>,
        summary: &mut CycleSummary,
    ) -> Result<DepositOutcome> {
        let plan = match self.resolve_plan(deposit)? {
            Some(plan) => plan,
            None => {
                info!(
                    "deposit {} references unknown plan {:?}, skipping",
                    deposit.id, deposit.plan_id
                );
                self.events.emit(Event::DepositSkipped {
                    deposit_id: deposit.id,
                    plan_id: deposit.plan_id.clone(),
                    reason: SkipReason::PlanNotResolved,
                    timestamp: now,
                });
                return Ok(DepositOutcome::PlanNotResolved);
            }
        };

        let elapsed_hours = deposit.elapsed_hours(now);
        if elapsed_hours < plan.gate_hours(self.config.daily_gate_hours) {
            self.events.emit(Event::DepositSkipped {
                deposit_id: deposit.id,
                plan_id: plan.id.clone(),
                reason: SkipReason::NotYetEligible,
                timestamp: now,
            });
            return Ok(DepositOutcome::NotYetEligible);
        }

        // one installment per whole elapsed day; the posting count is the
        // idempotency record, never a stored cursor
        let days_since_deposit = elapsed_hours / 24;
        let already_posted = self.ledger.posted_installments(deposit.id)?;
        if days_since_deposit <= already_posted {
            return Ok(DepositOutcome::NothingDue);
        }

        let amount = plan.installment_amount(deposit.principal);
        for installment_index in (already_posted + 1)..=days_since_deposit {
            let posting = NewProfitPosting {
                owner_id: deposit.owner_id,
                source_deposit_id: deposit.id,
                installment_index,
                amount,
                posted_at: now,
            };

            match self.ledger.post_installment(&posting)? {
                PostingOutcome::Posted => {
                    debug!(
                        "posted installment {} of {} for deposit {}",
                        installment_index, amount, deposit.id
                    );
                    self.events.emit(Event::InstallmentPosted {
                        deposit_id: deposit.id,
                        owner_id: deposit.owner_id,
                        installment_index,
                        amount,
                        timestamp: now,
                    });
                    summary.installments_posted += 1;
                    summary.total_credited += amount;
                }
                PostingOutcome::Duplicate => {
                    debug!(
                        "installment {} for deposit {} already committed by another cycle",
                        installment_index, deposit.id
                    );
                    self.events.emit(Event::DuplicateSuppressed {
                        deposit_id: deposit.id,
                        installment_index,
                        timestamp: now,
                    });
                }
            }
        }

        Ok(DepositOutcome::Posted)
    }
}
