//! Closed-form polynomial in root form: `a(x - r1)(x - r2)...`

use serde::{Deserialize, Serialize};

use super::Func1D;
use crate::error::FuncError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    /// Leading coefficient
    pub a: f64,
    /// Real roots, in the order the learner typed them
    pub roots: Vec<f64>,
}

impl Polynomial {
    pub fn new(a: f64, roots: Vec<f64>) -> Self {
        Self { a, roots }
    }

    pub fn set_coefficient(&mut self, a: f64) {
        self.a = a;
    }

    pub fn set_roots(&mut self, roots: Vec<f64>) {
        self.roots = roots;
    }

    /// Parse a comma-separated root list such as `"0, 5, -2.5"`
    ///
    /// Blank input means no roots (a constant function).
    pub fn parse_roots(text: &str) -> Result<Vec<f64>, FuncError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        text.split(',')
            .map(str::trim)
            .map(|s| s.parse::<f64>().map_err(|_| FuncError::InvalidRoot(s.to_string())))
            .collect()
    }
}

impl Func1D for Polynomial {
    fn evaluate(&self, x: f64) -> f64 {
        self.roots.iter().fold(self.a, |n, root| n * (x - root))
    }

    fn describe(&self) -> String {
        let mut s = self.a.to_string();
        for root in &self.roots {
            s.push_str(&format!("(x-{root})"));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_roots_and_scale() {
        let p = Polynomial::new(0.1, vec![0.0, 5.0]);
        assert_eq!(p.evaluate(0.0), 0.0);
        assert_eq!(p.evaluate(5.0), 0.0);
        assert!((p.evaluate(10.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_roots_is_constant() {
        let p = Polynomial::new(-3.0, Vec::new());
        assert_eq!(p.evaluate(-100.0), -3.0);
        assert_eq!(p.evaluate(42.0), -3.0);
        assert_eq!(p.describe(), "-3");
    }

    #[test]
    fn test_describe() {
        let p = Polynomial::new(0.1, vec![0.0, 5.0]);
        assert_eq!(p.describe(), "0.1(x-0)(x-5)");
        let p = Polynomial::new(2.0, vec![-1.5]);
        assert_eq!(p.describe(), "2(x--1.5)");
    }

    #[test]
    fn test_parse_roots() {
        assert_eq!(Polynomial::parse_roots("0, 5 ,-2.5").unwrap(), vec![0.0, 5.0, -2.5]);
        assert_eq!(Polynomial::parse_roots("   ").unwrap(), Vec::<f64>::new());
        assert_eq!(
            Polynomial::parse_roots("1, two"),
            Err(FuncError::InvalidRoot("two".to_string()))
        );
        assert_eq!(
            Polynomial::parse_roots("1,,2"),
            Err(FuncError::InvalidRoot(String::new()))
        );
    }
}
