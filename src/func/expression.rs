//! User-typed scalar field `f(x, y)` with sticky last-good compilation

use log::{debug, warn};

use super::Func2D;
use super::equation::EquationCompiler;
use crate::error::ExprError;

/// Formula used when the very first compile fails
pub const DEFAULT_EXPRESSION: &str = "0";

/// Probe point a fresh compile must evaluate at before it goes live
pub const PROBE_POINT: (f64, f64) = (1.0, 1.0);

/// Something that turns formula text into an evaluable handle
pub trait ExpressionCompiler {
    type Compiled: Evaluable;

    fn compile(&self, text: &str) -> Result<Self::Compiled, ExprError>;
}

/// A compiled formula in `x` and `y`
pub trait Evaluable {
    fn evaluate(&self, x: f64, y: f64) -> Result<f64, ExprError>;
}

/// A two-variable formula typed by the learner
///
/// `recompile` only swaps in new text once it compiles and survives a probe
/// evaluation, so a half-typed formula never disturbs a running field.
pub struct CompiledExpression<C: ExpressionCompiler = EquationCompiler> {
    compiler: C,
    source: String,
    compiled: C::Compiled,
}

impl CompiledExpression<EquationCompiler> {
    pub fn new(text: &str) -> Self {
        Self::with_compiler(EquationCompiler, text)
    }
}

impl<C: ExpressionCompiler> CompiledExpression<C> {
    /// Compile `text`, falling back to [`DEFAULT_EXPRESSION`] if it is invalid
    ///
    /// # Panics
    /// If the compiler rejects the default expression too.
    pub fn with_compiler(compiler: C, text: &str) -> Self {
        match Self::try_compile(&compiler, text) {
            Ok(compiled) => Self {
                compiler,
                source: text.to_string(),
                compiled,
            },
            Err(e) => {
                warn!("Formula {text:?} rejected ({e}), using {DEFAULT_EXPRESSION:?}");
                let compiled = match Self::try_compile(&compiler, DEFAULT_EXPRESSION) {
                    Ok(compiled) => compiled,
                    Err(e) => panic!("compiler rejects the default expression: {e}"),
                };
                Self {
                    compiler,
                    source: DEFAULT_EXPRESSION.to_string(),
                    compiled,
                }
            }
        }
    }

    fn try_compile(compiler: &C, text: &str) -> Result<C::Compiled, ExprError> {
        let compiled = compiler.compile(text)?;
        compiled.evaluate(PROBE_POINT.0, PROBE_POINT.1)?;
        Ok(compiled)
    }

    /// Replace the active formula; on error the previous one stays active
    pub fn recompile(&mut self, text: &str) -> Result<(), ExprError> {
        let compiled = Self::try_compile(&self.compiler, text)?;
        debug!("Formula recompiled: {text:?}");
        self.compiled = compiled;
        self.source = text.to_string();
        Ok(())
    }

    /// Source text of the active formula
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl<C: ExpressionCompiler> Func2D for CompiledExpression<C> {
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.compiled.evaluate(x, y).unwrap_or(f64::NAN)
    }

    fn describe(&self) -> String {
        self.source.clone()
    }
}

impl<C: ExpressionCompiler> std::fmt::Debug for CompiledExpression<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
