use cadre_core::{ExecutionResult, FailureReason, Tool, ToolParameters, string_param};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use thiserror::Error;

/// Deepest nesting of parentheses and unary signs the evaluator accepts.
pub const MAX_NESTING: usize = 64;

static ARITHMETIC_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9(][0-9.\s+\-*/%()]*[0-9)]").expect("arithmetic pattern is valid")
});

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unbalanced parentheses")]
    Unbalanced,
    #[error("division by zero")]
    DivisionByZero,
    #[error("expression nested deeper than {MAX_NESTING} levels")]
    TooDeep,
}

/// Evaluate an arithmetic expression.
///
/// Supports `+ - * / %`, parentheses, unary signs and decimal literals.
/// Nesting is capped at [`MAX_NESTING`].
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let chars: Vec<char> = expression.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut parser = Parser {
        chars,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    match parser.peek() {
        None => Ok(value),
        Some(')') => Err(EvalError::Unbalanced),
        Some(c) => Err(EvalError::UnexpectedChar(c, parser.pos)),
    }
}

/// Find the first arithmetic expression embedded in free text.
///
/// A candidate must contain at least one binary operator, so bare numbers
/// ("3 nights") are skipped.
pub fn extract_expression(text: &str) -> Option<String> {
    ARITHMETIC_RUN
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            candidate
                .chars()
                .skip(1)
                .any(|c| matches!(c, '+' | '-' | '*' | '/' | '%'))
        })
        .map(str::to_string)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            if op == '+' {
                value += rhs;
            } else {
                value -= rhs;
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | '/' | '%')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = match op {
                '*' => value * rhs,
                _ if rhs == 0.0 => return Err(EvalError::DivisionByZero),
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(c @ ('-' | '+' | '(')) => {
                if self.depth >= MAX_NESTING {
                    return Err(EvalError::TooDeep);
                }
                self.pos += 1;
                self.depth += 1;
                let value = self.nested(c);
                self.depth -= 1;
                value
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(EvalError::UnexpectedChar(c, self.pos)),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn nested(&mut self, opener: char) -> Result<f64, EvalError> {
        match opener {
            '-' => Ok(-self.factor()?),
            '+' => self.factor(),
            _ => {
                let value = self.expr()?;
                if self.peek() != Some(')') {
                    return Err(EvalError::Unbalanced);
                }
                self.pos += 1;
                Ok(value)
            }
        }
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse::<f64>()
            .map_err(|_| EvalError::InvalidNumber(literal))
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let rounded = format!("{:.10}", value);
        rounded
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Arithmetic calculator.
#[derive(Debug, Clone, Default)]
pub struct CalculatorTool;

impl CalculatorTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Perform mathematical calculations"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Arithmetic expression, e.g. (120 * 3) + 45"
                }
            },
            "required": ["expression"]
        })
    }

    fn call(&self, parameters: &ToolParameters) -> ExecutionResult {
        let expression = match string_param(parameters, "expression") {
            Ok(expression) => expression,
            Err(reason) => return ExecutionResult::failed(reason),
        };

        match evaluate(expression) {
            Ok(value) => ExecutionResult::success(format!(
                "{} = {}",
                expression.trim(),
                format_number(value)
            )),
            Err(err) => ExecutionResult::failed(FailureReason::InvalidInput {
                message: format!("cannot evaluate '{}': {}", expression.trim(), err),
            }),
        }
    }
}
