use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{Money, Rate};

/// plan identifier, a lowercase tier name such as "starter" or "vip"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
    pub fn new(id: impl Into<String>) -> Self {
        PlanId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlanId {
    fn from(s: &str) -> Self {
        PlanId(s.to_string())
    }
}

impl From<String> for PlanId {
    fn from(s: String) -> Self {
        PlanId(s)
    }
}

/// how a plan releases profit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccrualMode {
    /// one installment per elapsed day, eligible after the daily gate
    Daily,
    /// all owed installments release once the full duration has elapsed
    OneShot,
}

/// profit plan reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub display_name: String,
    /// profit paid per installment, as a fraction of principal
    pub profit_rate: Rate,
    /// nominal term length in hours
    pub duration_hours: u32,
    pub mode: AccrualMode,
}

impl Plan {
    pub fn new(
        id: impl Into<PlanId>,
        display_name: impl Into<String>,
        profit_rate: Rate,
        duration_hours: u32,
        mode: AccrualMode,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            profit_rate,
            duration_hours,
            mode,
        }
    }

    /// profit amount for one installment on the given principal
    pub fn installment_amount(&self, principal: Money) -> Money {
        principal * self.profit_rate
    }

    /// elapsed hours required before any installment releases
    pub fn gate_hours(&self, daily_gate_hours: u32) -> u32 {
        match self.mode {
            AccrualMode::Daily => daily_gate_hours,
            AccrualMode::OneShot => self.duration_hours,
        }
    }
}

/// lookup table of plans, used as the fallback when the plan store has no match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }

    /// the four built-in investment tiers
    pub fn builtin() -> Self {
        Self::new(vec![
            Plan::new("starter", "Starter", Rate::from_percentage(12), 720, AccrualMode::Daily),
            Plan::new("basic", "Basic", Rate::from_percentage(15), 720, AccrualMode::Daily),
            Plan::new(
                "professional",
                "Professional",
                Rate::from_percentage(30),
                720,
                AccrualMode::Daily,
            ),
            Plan::new("vip", "VIP", Rate::from_percentage(60), 720, AccrualMode::Daily),
        ])
    }

    pub fn get(&self, id: &PlanId) -> Option<&Plan> {
        self.plans.iter().find(|p| &p.id == id)
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
