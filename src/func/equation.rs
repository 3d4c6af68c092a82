//! Built-in expression compiler for two-variable formulas
//!
//! Text is tokenized, parsed into an AST by recursive descent, then lowered
//! to bytecode for a small stack VM. Names are resolved at compile time so a
//! typo is reported while the learner is typing, not mid-attempt.

use super::expression::{Evaluable, ExpressionCompiler};
use crate::error::ExprError;

/// Deepest nesting of parentheses, signs and exponents a formula may use
pub const MAX_NESTING: usize = 256;
/// Longest formula, in tokens
pub const MAX_TOKENS: usize = 4096;

/// Stack machine instructions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpCode {
    /// Push a constant
    LoadConst(f64),
    /// Push `x`
    LoadX,
    /// Push `y`
    LoadY,
    /// Pop b, a; push a + b
    Add,
    /// Pop b, a; push a - b
    Sub,
    /// Pop b, a; push a * b
    Mul,
    /// Pop b, a; push a / b
    Div,
    /// Pop b, a; push a ^ b
    Pow,
    /// Pop a; push -a
    Neg,
    /// Pop a; push f(a)
    Call1(Builtin1),
    /// Pop b, a; push f(a, b)
    Call2(Builtin2),
}

/// One-argument builtin functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin1 {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Abs,
    Floor,
    Ceil,
    Sign,
}

impl Builtin1 {
    fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "exp" => Self::Exp,
            "ln" => Self::Ln,
            "log" => Self::Log10,
            "sqrt" => Self::Sqrt,
            "abs" => Self::Abs,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "sign" => Self::Sign,
            _ => return None,
        })
    }

    fn apply(self, a: f64) -> f64 {
        match self {
            Self::Sin => a.sin(),
            Self::Cos => a.cos(),
            Self::Tan => a.tan(),
            Self::Asin => a.asin(),
            Self::Acos => a.acos(),
            Self::Atan => a.atan(),
            Self::Sinh => a.sinh(),
            Self::Cosh => a.cosh(),
            Self::Tanh => a.tanh(),
            Self::Exp => a.exp(),
            Self::Ln => a.ln(),
            Self::Log10 => a.log10(),
            Self::Sqrt => a.sqrt(),
            Self::Abs => a.abs(),
            Self::Floor => a.floor(),
            Self::Ceil => a.ceil(),
            // 0 stays 0 (f64::signum would give 1)
            Self::Sign => {
                if a == 0.0 || a.is_nan() {
                    a
                } else {
                    a.signum()
                }
            }
        }
    }
}

/// Two-argument builtin functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin2 {
    Min,
    Max,
    Atan2,
    Pow,
}

impl Builtin2 {
    fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "min" => Self::Min,
            "max" => Self::Max,
            "atan2" => Self::Atan2,
            "pow" => Self::Pow,
            _ => return None,
        })
    }

    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Min => a.min(b),
            Self::Max => a.max(b),
            Self::Atan2 => a.atan2(b),
            Self::Pow => a.powf(b),
        }
    }
}

/// A compiled formula in `x` and `y`
#[derive(Debug, Clone, PartialEq)]
pub struct Bytecode {
    pub ops: Vec<OpCode>,
}

impl Bytecode {
    /// Run the program on a fresh stack
    pub fn execute(&self, x: f64, y: f64) -> Result<f64, ExprError> {
        let mut stack: Vec<f64> = Vec::with_capacity(16);
        let pop = |stack: &mut Vec<f64>| stack.pop().ok_or(ExprError::StackUnderflow);

        for op in &self.ops {
            match *op {
                OpCode::LoadConst(v) => stack.push(v),
                OpCode::LoadX => stack.push(x),
                OpCode::LoadY => stack.push(y),
                OpCode::Neg => {
                    let a = pop(&mut stack)?;
                    stack.push(-a);
                }
                OpCode::Call1(f) => {
                    let a = pop(&mut stack)?;
                    stack.push(f.apply(a));
                }
                OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Pow | OpCode::Call2(_) => {
                    let b = pop(&mut stack)?;
                    let a = pop(&mut stack)?;
                    stack.push(match *op {
                        OpCode::Add => a + b,
                        OpCode::Sub => a - b,
                        OpCode::Mul => a * b,
                        OpCode::Div => a / b,
                        OpCode::Pow => a.powf(b),
                        OpCode::Call2(f) => f.apply(a, b),
                        _ => unreachable!("binary opcodes only"),
                    });
                }
            }
        }

        pop(&mut stack)
    }
}

impl Evaluable for Bytecode {
    fn evaluate(&self, x: f64, y: f64) -> Result<f64, ExprError> {
        self.execute(x, y)
    }
}

/// Default compiler behind `CompiledExpression`
#[derive(Debug, Clone, Copy, Default)]
pub struct EquationCompiler;

impl ExpressionCompiler for EquationCompiler {
    type Compiled = Bytecode;

    fn compile(&self, text: &str) -> Result<Bytecode, ExprError> {
        let expr = parse(text)?;
        let mut ops = Vec::new();
        lower(&expr, &mut ops)?;
        Ok(Bytecode { ops })
    }
}

// --- AST ---

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Binary(Box<Expr>, BinOp, Box<Expr>),
    Neg(Box<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

fn lower(expr: &Expr, ops: &mut Vec<OpCode>) -> Result<(), ExprError> {
    match expr {
        Expr::Number(n) => ops.push(OpCode::LoadConst(*n)),
        Expr::Variable(name) => ops.push(match name.as_str() {
            "x" => OpCode::LoadX,
            "y" => OpCode::LoadY,
            "pi" => OpCode::LoadConst(std::f64::consts::PI),
            "e" => OpCode::LoadConst(std::f64::consts::E),
            _ => return Err(ExprError::UnknownVariable(name.clone())),
        }),
        Expr::Binary(left, op, right) => {
            lower(left, ops)?;
            lower(right, ops)?;
            ops.push(match op {
                BinOp::Add => OpCode::Add,
                BinOp::Sub => OpCode::Sub,
                BinOp::Mul => OpCode::Mul,
                BinOp::Div => OpCode::Div,
                BinOp::Pow => OpCode::Pow,
            });
        }
        Expr::Neg(operand) => {
            lower(operand, ops)?;
            ops.push(OpCode::Neg);
        }
        Expr::Call(name, args) => {
            let (op, expected) = if let Some(f) = Builtin1::lookup(name) {
                (OpCode::Call1(f), 1)
            } else if let Some(f) = Builtin2::lookup(name) {
                (OpCode::Call2(f), 2)
            } else {
                return Err(ExprError::UnknownFunction(name.clone()));
            };
            if args.len() != expected {
                return Err(ExprError::Arity {
                    name: name.clone(),
                    expected,
                    got: args.len(),
                });
            }
            for arg in args {
                lower(arg, ops)?;
            }
            ops.push(op);
        }
    }
    Ok(())
}

// --- Parser ---

/// Parse formula text into an expression tree
pub fn parse(input: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(input)?;
    if tokens.len() > MAX_TOKENS {
        return Err(ExprError::TooLong(tokens.len()));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_sum()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ExprError::UnexpectedToken(token.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Identifier(name) => f.write_str(name),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::Caret => f.write_str("^"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_digit() || c == '.' {
            let mut num_str = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    num_str.push(d);
                    chars.next();
                } else if (d == 'e' || d == 'E') && !num_str.is_empty() {
                    // Exponent only when digits follow, so `2e` stays `2 * e`
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    let sign = lookahead.next_if(|s| *s == '+' || *s == '-');
                    if lookahead.peek().is_some_and(|s| s.is_ascii_digit()) {
                        num_str.push(d);
                        chars.next();
                        if let Some(sign) = sign {
                            num_str.push(sign);
                            chars.next();
                        }
                    } else {
                        break;
                    }
                } else {
                    break;
                }
            }
            let value = num_str
                .parse()
                .map_err(|_| ExprError::InvalidNumber(num_str.clone()))?;
            tokens.push(Token::Number(value));
        } else if c.is_alphabetic() {
            let mut ident = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_alphanumeric() || d == '_' {
                    ident.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Identifier(ident));
        } else {
            tokens.push(match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '^' => Token::Caret,
                '(' => Token::LParen,
                ')' => Token::RParen,
                ',' => Token::Comma,
                other => return Err(ExprError::UnexpectedChar(other)),
            });
            chars.next();
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Current `parse_unary` recursion depth
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_rparen(&mut self) -> Result<(), ExprError> {
        match self.consume() {
            Some(Token::RParen) => Ok(()),
            _ => Err(ExprError::UnclosedParen),
        }
    }

    /// sum := product (('+' | '-') product)*
    fn parse_sum(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_product()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.consume();
            let right = self.parse_product()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    /// product := unary (('*' | '/') unary | implicit unary)*
    ///
    /// Implicit multiplication applies when a value is directly followed by
    /// an identifier, a number or an opening parenthesis: `2x`, `3(x+1)`.
    fn parse_product(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => {
                    self.consume();
                    BinOp::Mul
                }
                Some(Token::Slash) => {
                    self.consume();
                    BinOp::Div
                }
                Some(Token::Identifier(_) | Token::Number(_) | Token::LParen) => BinOp::Mul,
                _ => break,
            };
            let right = self.parse_unary()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    /// unary := '-' unary | '+' unary | power
    ///
    /// Every nested operand (bracket, sign, exponent, argument) passes
    /// through here, so this is where nesting is bounded.
    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        if self.depth >= MAX_NESTING {
            return Err(ExprError::TooDeep);
        }
        self.depth += 1;
        let expr = self.parse_signed();
        self.depth -= 1;
        expr
    }

    fn parse_signed(&mut self) -> Result<Expr, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.consume();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Some(Token::Plus) => {
                self.consume();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    /// power := primary ('^' unary)?   (right associative)
    fn parse_power(&mut self) -> Result<Expr, ExprError> {
        let base = self.parse_primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.consume();
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary(Box::new(base), BinOp::Pow, Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Identifier(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.consume();
                    let mut args = Vec::new();
                    if let Some(Token::RParen) = self.peek() {
                        self.consume();
                        return Ok(Expr::Call(name, args));
                    }
                    loop {
                        args.push(self.parse_sum()?);
                        match self.peek() {
                            Some(Token::Comma) => {
                                self.consume();
                            }
                            _ => break,
                        }
                    }
                    self.expect_rparen()?;
                    Ok(Expr::Call(name, args))
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Some(Token::LParen) => {
                let expr = self.parse_sum()?;
                self.expect_rparen()?;
                Ok(expr)
            }
            Some(token) => Err(ExprError::UnexpectedToken(token.to_string())),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}
