use serde::{Deserialize, Serialize};

use crate::errors::{AccrualError, Result};
use crate::plan::PlanCatalog;

/// accrual job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualConfig {
    /// hours a daily-mode deposit must age before its first installment
    pub daily_gate_hours: u32,
    /// plans used when the plan store has no record for a deposit's plan id
    pub fallback_plans: PlanCatalog,
}

impl AccrualConfig {
    /// production defaults: 24h cadence, built-in tier table
    pub fn standard() -> Self {
        Self {
            daily_gate_hours: 24,
            fallback_plans: PlanCatalog::builtin(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.daily_gate_hours == 0 {
            return Err(AccrualError::InvalidConfiguration {
                message: "daily_gate_hours must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AccrualConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanId;

    #[test]
    fn test_standard_config() {
        let config = AccrualConfig::standard();
        assert_eq!(config.daily_gate_hours, 24);
        assert!(config.fallback_plans.get(&PlanId::from("basic")).is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_gate_rejected() {
        let config = AccrualConfig {
            daily_gate_hours: 0,
            fallback_plans: PlanCatalog::default(),
        };
        assert!(config.validate().is_err());
    }
}
