//! Per-domain accuracy computed from attempt history.

#[derive(Clone, Debug, PartialEq)]
pub struct DomainStats {
    pub domain: String,
    pub attempts: i64,
    pub correct: i64,
    pub pct: f64,
}

impl DomainStats {
    pub fn new(domain: String, attempts: i64, correct: i64) -> Self {
        let pct = if attempts > 0 {
            correct as f64 / attempts as f64 * 100.0
        } else {
            0.0
        };
        Self {
            domain,
            attempts,
            correct,
            pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_attempts_has_zero_pct() {
        let stats = DomainStats::new("Cryptography".to_string(), 0, 0);
        assert_eq!(stats.pct, 0.0);
    }

    #[test]
    fn test_pct() {
        let stats = DomainStats::new("Cryptography".to_string(), 4, 3);
        assert_eq!(stats.pct, 75.0);
    }
}
