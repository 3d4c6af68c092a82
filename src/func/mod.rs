//! Scalar functions the car can ride on or roll down
//!
//! - `Func1D`: curves `y = f(x)` (polynomials and their derivatives)
//! - `Func2D`: scalar fields `z = f(x, y)` (compiled user expressions)
//!
//! Functions the learner edits live behind `Rc<RefCell<_>>` so every curve
//! built on them (including derivatives) sees the edit on the next frame.

pub mod derivative;
pub mod equation;
pub mod expression;
pub mod polynomial;

pub use derivative::Derivative;
pub use equation::EquationCompiler;
pub use expression::{CompiledExpression, Evaluable, ExpressionCompiler};
pub use polynomial::Polynomial;

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;

use crate::consts::GRADIENT_STEP;

/// A real function of one variable
pub trait Func1D {
    fn evaluate(&self, x: f64) -> f64;
    /// Human-readable formula, also used as the attempt record key
    fn describe(&self) -> String;
}

/// A real function of two variables
pub trait Func2D {
    fn evaluate(&self, x: f64, y: f64) -> f64;
    fn describe(&self) -> String;
}

impl<F: Func1D + ?Sized> Func1D for &F {
    fn evaluate(&self, x: f64) -> f64 {
        (**self).evaluate(x)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<F: Func1D + ?Sized> Func1D for Rc<RefCell<F>> {
    fn evaluate(&self, x: f64) -> f64 {
        self.borrow().evaluate(x)
    }

    fn describe(&self) -> String {
        self.borrow().describe()
    }
}

impl<F: Func2D + ?Sized> Func2D for &F {
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        (**self).evaluate(x, y)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<F: Func2D + ?Sized> Func2D for Rc<RefCell<F>> {
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.borrow().evaluate(x, y)
    }

    fn describe(&self) -> String {
        self.borrow().describe()
    }
}

/// `(df/dx, df/dy)` from two forward-difference probes
pub fn gradient<F: Func2D + ?Sized>(f: &F, x: f64, y: f64) -> DVec2 {
    let here = f.evaluate(x, y);
    DVec2::new(
        (f.evaluate(x + GRADIENT_STEP, y) - here) / GRADIENT_STEP,
        (f.evaluate(x, y + GRADIENT_STEP) - here) / GRADIENT_STEP,
    )
}
