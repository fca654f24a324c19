//! Bounded arithmetic evaluator and question pre-scan

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::types::ToolsUsed;

/// Tool identifier recorded in `tools_used`
pub const CALCULATOR_TOOL: &str = "calculator";

/// Patterns that pick arithmetic out of free text
const EXPRESSION_PATTERNS: [&str; 3] = [
    r"[\d+\-*/^().]+(?:\s*[+\-*/^]\s*[\d+\-*/^().]+)+",
    r"\d+\.?\d*\s*[+\-*/^]\s*\d+\.?\d*",
    r"\(\s*[\d+\-*/^().]+\s*\)",
];

const OPERATORS: [char; 5] = ['+', '-', '*', '/', '^'];

/// Deepest nesting of parentheses, signs and exponents the parser accepts
const MAX_NESTING: usize = 64;

fn expression_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        EXPRESSION_PATTERNS
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::error!("Invalid expression pattern {}: {}", pattern, e);
                    None
                }
            })
            .collect()
    })
}

/// One evaluated expression
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    /// Expression text with whitespace removed
    pub expression: String,
    /// Result
    pub value: f64,
}

/// Arithmetic found in a question
#[derive(Debug, Clone, Default)]
pub struct Precomputed {
    /// Successful evaluations in first-match order
    pub calculations: Vec<Calculation>,
    /// `calculator` when at least one evaluation succeeded
    pub tools_used: ToolsUsed,
}

impl Precomputed {
    /// Result recorded for an expression
    pub fn get(&self, expression: &str) -> Option<f64> {
        self.calculations
            .iter()
            .find(|c| c.expression == expression)
            .map(|c| c.value)
    }
}

/// Scan a question for arithmetic and evaluate every candidate.
///
/// Candidates that fail to evaluate are dropped.
pub fn precompute(question: &str) -> Precomputed {
    let mut result = Precomputed::default();

    for pattern in expression_patterns() {
        for found in pattern.find_iter(question) {
            let candidate = found.as_str().trim();
            if candidate.chars().count() <= 1 || !candidate.contains(OPERATORS) {
                continue;
            }

            let key: String = candidate.chars().filter(|c| !c.is_whitespace()).collect();
            if result.get(&key).is_some() {
                continue;
            }

            match Calculator::evaluate(&key) {
                Ok(value) => {
                    tracing::debug!("Pre-computed {} = {}", key, value);
                    result.calculations.push(Calculation {
                        expression: key,
                        value,
                    });
                    result.tools_used.record(CALCULATOR_TOOL);
                }
                Err(e) => tracing::debug!("Skipping expression '{}': {}", candidate, e),
            }
        }
    }

    result
}

/// Evaluates `+ - * / // ^ **` over decimal numbers and parentheses
pub struct Calculator;

impl Calculator {
    /// Evaluate an expression. Whitespace is ignored; any other character
    /// outside digits, `.`, parentheses and the operators is rejected.
    pub fn evaluate(expression: &str) -> Result<f64> {
        let compact: Vec<char> = expression.chars().filter(|c| !c.is_whitespace()).collect();

        if compact
            .iter()
            .any(|c| !(c.is_ascii_digit() || "+-*/().^".contains(*c)))
        {
            return Err(Error::calculation("Invalid characters in expression"));
        }
        if compact.is_empty() {
            return Err(Error::calculation("Empty expression"));
        }

        let mut parser = Parser {
            chars: &compact,
            pos: 0,
            depth: 0,
        };
        let value = parser.expression()?;
        if parser.pos != compact.len() {
            return Err(Error::calculation(format!(
                "Unexpected '{}' at position {}",
                compact[parser.pos], parser.pos
            )));
        }
        if !value.is_finite() {
            return Err(Error::calculation("Result is not a finite number"));
        }
        Ok(value)
    }
}

/// Recursive-descent parser over the compacted expression
struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := unary (('*' | '/' | '//') unary)*
    fn term(&mut self) -> Result<f64> {
        let mut value = self.unary()?;
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('*'), Some('*')) => break,
                (Some('*'), _) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                (Some('/'), Some('/')) => {
                    self.pos += 2;
                    let rhs = self.unary()?;
                    value = divide(value, rhs)?.floor();
                }
                (Some('/'), _) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    value = divide(value, rhs)?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // Every recursive cycle in the grammar passes through `unary`
    fn unary(&mut self) -> Result<f64> {
        if self.depth >= MAX_NESTING {
            return Err(Error::calculation("Expression nested too deeply"));
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    // unary := ('+' | '-') unary | power
    fn signed(&mut self) -> Result<f64> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some('+') => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    // power := atom (('^' | '**') unary)?
    fn power(&mut self) -> Result<f64> {
        let base = self.atom()?;
        match (self.peek(), self.peek_at(1)) {
            (Some('^'), _) => {
                self.pos += 1;
            }
            (Some('*'), Some('*')) => {
                self.pos += 2;
            }
            _ => return Ok(base),
        }
        let exponent = self.unary()?;
        Ok(base.powf(exponent))
    }

    // atom := number | '(' expression ')'
    fn atom(&mut self) -> Result<f64> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let value = self.expression()?;
                if self.peek() != Some(')') {
                    return Err(Error::calculation("Unbalanced parentheses"));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(Error::calculation(format!(
                "Unexpected '{}' at position {}",
                c, self.pos
            ))),
            None => Err(Error::calculation("Unexpected end of expression")),
        }
    }

    fn number(&mut self) -> Result<f64> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse::<f64>()
            .map_err(|_| Error::calculation(format!("Invalid number '{}'", literal)))
    }
}

fn divide(lhs: f64, rhs: f64) -> Result<f64> {
    if rhs == 0.0 {
        return Err(Error::calculation("division by zero"));
    }
    Ok(lhs / rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_power() {
        assert_eq!(Calculator::evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(Calculator::evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(Calculator::evaluate("2^3^2").unwrap(), 512.0);
        assert_eq!(Calculator::evaluate("2**10").unwrap(), 1024.0);
        assert_eq!(Calculator::evaluate("-2^2").unwrap(), -4.0);
        assert_eq!(Calculator::evaluate("7 // 2").unwrap(), 3.0);
        assert_eq!(Calculator::evaluate("1.5 / 0.5").unwrap(), 3.0);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Calculator::evaluate("2 / 0"),
            Err(Error::Calculation(msg)) if msg.contains("division by zero")
        ));
        assert!(matches!(
            Calculator::evaluate("x + 1"),
            Err(Error::Calculation(msg)) if msg.contains("Invalid characters")
        ));
        assert!(Calculator::evaluate("(1 + 2").is_err());
        assert!(Calculator::evaluate("1 +").is_err());
        assert!(Calculator::evaluate("1..2 + 1").is_err());
        assert!(Calculator::evaluate("").is_err());
    }

    #[test]
    fn test_nesting_is_bounded() {
        assert_eq!(
            Calculator::evaluate(&format!("{}1+1{}", "(".repeat(20), ")".repeat(20))).unwrap(),
            2.0
        );
        assert_eq!(Calculator::evaluate("--1").unwrap(), 1.0);

        let deep = format!("{}1+1", "-".repeat(100_000));
        assert!(matches!(
            Calculator::evaluate(&deep),
            Err(Error::Calculation(msg)) if msg.contains("nested too deeply")
        ));
    }

    #[test]
    fn test_precompute_survives_deeply_nested_question() {
        let question = format!("what is {}1+1{}", "(".repeat(100_000), ")".repeat(100_000));
        let result = precompute(&question);
        assert_eq!(result.calculations.len(), 1);
        assert_eq!(result.get("1+1"), Some(2.0));
    }

    #[test]
    fn test_precompute_simple_sum() {
        let result = precompute("2 + 2");
        assert_eq!(result.get("2+2"), Some(4.0));
        assert!(result.tools_used.contains(CALCULATOR_TOOL));
    }

    #[test]
    fn test_precompute_without_arithmetic() {
        let result = precompute("What is Newton's second law?");
        assert!(result.calculations.is_empty());
        assert!(result.tools_used.is_empty());
    }

    #[test]
    fn test_precompute_drops_failures() {
        let result = precompute("What is 5 / 0?");
        assert!(result.calculations.is_empty());
        assert!(!result.tools_used.contains(CALCULATOR_TOOL));
    }

    #[test]
    fn test_precompute_deduplicates() {
        let result = precompute("Is (3 * 4) the same as 3*4?");
        let expressions: Vec<&str> = result
            .calculations
            .iter()
            .map(|c| c.expression.as_str())
            .collect();
        assert!(expressions.contains(&"3*4"));
        assert_eq!(
            expressions.iter().filter(|e| **e == "3*4").count(),
            1
        );
        assert_eq!(result.tools_used.as_slice(), &["calculator"]);
    }
}
