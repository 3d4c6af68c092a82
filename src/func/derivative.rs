//! Forward-difference derivative of another curve
//!
//! First-order accurate only; consumers must tolerate truncation error of
//! order `DERIVATIVE_STEP * f''`.

use super::Func1D;
use crate::consts::DERIVATIVE_STEP;

#[derive(Debug, Clone)]
pub struct Derivative<F> {
    func: F,
}

impl<F: Func1D> Derivative<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }

    pub fn inner(&self) -> &F {
        &self.func
    }
}

impl<F: Func1D> Func1D for Derivative<F> {
    fn evaluate(&self, x: f64) -> f64 {
        (self.func.evaluate(x + DERIVATIVE_STEP) - self.func.evaluate(x)) / DERIVATIVE_STEP
    }

    fn describe(&self) -> String {
        format!("d/dx[{}]", self.func.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::Polynomial;

    #[test]
    fn test_derivative_of_identity() {
        let d = Derivative::new(Polynomial::new(1.0, vec![0.0]));
        for x in [-50.0, -1.0, 0.0, 0.3, 7.0, 19.5] {
            assert!((d.evaluate(x) - 1.0).abs() < 1e-3, "x = {x}");
        }
    }

    #[test]
    fn test_derivative_of_parabola() {
        // d/dx 0.5 x (x - 4) = x - 2
        let d = Derivative::new(Polynomial::new(0.5, vec![0.0, 4.0]));
        assert!((d.evaluate(2.0)).abs() < 1e-3);
        assert!((d.evaluate(6.0) - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_second_derivative_nests() {
        let d2 = Derivative::new(Derivative::new(Polynomial::new(1.0, vec![0.0, 0.0])));
        assert_eq!(d2.describe(), "d/dx[d/dx[1(x-0)(x-0)]]");
        assert!((d2.evaluate(3.0) - 2.0).abs() < 0.05);
    }
}
