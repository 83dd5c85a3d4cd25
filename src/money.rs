/// Position sizing, profit tax and account cleanup predicates
use crate::config::MoneyConfig;

#[derive(Debug, Clone)]
pub struct MoneyManager {
    config: MoneyConfig,
}

impl MoneyManager {
    pub fn new(config: MoneyConfig) -> Self {
        Self { config }
    }

    /// SOL to commit to a new position
    pub fn position_size(&self, balance_sol: f64) -> f64 {
        balance_sol.max(0.0) * self.config.position_size_pct
    }

    /// Treasury share of a realized profit; losses are never taxed
    pub fn tax(&self, pnl_sol: f64) -> f64 {
        pnl_sol.max(0.0) * self.config.tax_rate
    }

    /// An emptied token account can be closed to reclaim rent
    pub fn should_reclaim(&self, token_balance: f64) -> bool {
        token_balance == 0.0
    }

    pub fn is_viable(&self, size_sol: f64) -> bool {
        size_sol >= self.config.min_trade_size_sol
    }

    pub fn is_dust(&self, amount: f64) -> bool {
        amount <= self.config.dust_threshold
    }
}

impl Default for MoneyManager {
    fn default() -> Self {
        Self::new(MoneyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax() {
        let m = MoneyManager::default();
        assert_eq!(m.tax(-5.0), 0.0);
        assert_eq!(m.tax(0.0), 0.0);
        assert_eq!(m.tax(10.0), 2.0);
    }

    #[test]
    fn test_position_size() {
        let m = MoneyManager::default();
        assert_eq!(m.position_size(50.0), 5.0);
        assert_eq!(m.position_size(-1.0), 0.0);
    }

    #[test]
    fn test_viability_and_dust() {
        let m = MoneyManager::default();
        assert!(m.is_viable(0.01));
        assert!(!m.is_viable(0.009));
        assert!(m.is_dust(0.0001));
        assert!(m.is_dust(0.0));
        assert!(!m.is_dust(0.00011));
    }

    #[test]
    fn test_should_reclaim() {
        let m = MoneyManager::default();
        assert!(m.should_reclaim(0.0));
        assert!(!m.should_reclaim(0.5));
    }
}
