//! `calculate`: arithmetic expression evaluator
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    = term (("+" | "-") term)*
//! term    = unary (("*" | "/" | "%") unary)*
//! unary   = ("-" | "+") unary | power
//! power   = primary ("^" unary)?
//! primary = number | constant | function "(" expr ")" | "(" expr ")"
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so `-2^2`
//! is `-4`. `%` is floored modulo. Nesting deeper than [`MAX_DEPTH`] and any
//! non-finite intermediate value are errors.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::tool::{Tool, parse_arguments};

/// Deepest allowed nesting of parentheses, calls and unary signs
pub const MAX_DEPTH: usize = 256;

pub struct Calculator;

#[derive(Debug, Deserialize)]
struct CalculateArgs {
    expression: String,
}

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        "Evaluate a mathematical expression"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Mathematical expression to evaluate, e.g., '2 + 2', '5 * 3', 'sqrt(16) ^ 2'"
                }
            },
            "required": ["expression"]
        })
    }

    async fn execute(&self, arguments: Map<String, Value>) -> anyhow::Result<Value> {
        let args: CalculateArgs = parse_arguments(arguments)?;
        let result = evaluate(&args.expression)?;

        Ok(json!({
            "expression": args.expression,
            "result": result,
            "formatted_result": format_general(result),
        }))
    }
}

/// Evaluate an expression to a finite number
pub fn evaluate(expression: &str) -> anyhow::Result<f64> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        anyhow::bail!("expression is empty");
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some(token) = parser.peek() {
        anyhow::bail!("unexpected {token} at position {}", parser.pos + 1);
    }

    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {n}"),
            Self::Ident(name) => write!(f, "'{name}'"),
            Self::Op(op) => write!(f, "'{op}'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
        }
    }
}

fn tokenize(input: &str) -> anyhow::Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &input[start..end];
                let number = text
                    .parse::<f64>()
                    .map_err(|_| anyhow::anyhow!("invalid number '{text}'"))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        end = i + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(input[start..end].to_ascii_lowercase()));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            other => anyhow::bail!("unsupported character '{other}' in expression"),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat_op(&mut self, ops: &[char]) -> Option<char> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(op) => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn expect_rparen(&mut self) -> anyhow::Result<()> {
        match self.advance() {
            Some(Token::RParen) => Ok(()),
            Some(other) => anyhow::bail!("expected ')' but found {other}"),
            None => anyhow::bail!("missing closing ')'"),
        }
    }

    fn expr(&mut self) -> anyhow::Result<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.eat_op(&['+', '-']) {
            let rhs = self.term()?;
            value = finite(if op == '+' { value + rhs } else { value - rhs })?;
        }
        Ok(value)
    }

    fn term(&mut self) -> anyhow::Result<f64> {
        let mut value = self.unary()?;
        while let Some(op) = self.eat_op(&['*', '/', '%']) {
            let rhs = self.unary()?;
            value = finite(match op {
                '*' => value * rhs,
                _ if rhs == 0.0 => anyhow::bail!("division by zero"),
                '/' => value / rhs,
                _ => value - rhs * (value / rhs).floor(),
            })?;
        }
        Ok(value)
    }

    /// Every recursive path passes through here, so this bounds stack use
    fn unary(&mut self) -> anyhow::Result<f64> {
        if self.depth >= MAX_DEPTH {
            anyhow::bail!("expression nested too deeply (limit {MAX_DEPTH})");
        }

        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> anyhow::Result<f64> {
        match self.eat_op(&['-', '+']) {
            Some('-') => Ok(-self.unary()?),
            Some(_) => self.unary(),
            None => self.power(),
        }
    }

    fn power(&mut self) -> anyhow::Result<f64> {
        let base = self.primary()?;
        if self.eat_op(&['^']).is_some() {
            let exponent = self.unary()?;
            return finite(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> anyhow::Result<f64> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect_rparen()?;
                Ok(value)
            }
            Some(Token::Ident(name)) => self.identifier(&name),
            Some(other) => anyhow::bail!("unexpected {other}"),
            None => anyhow::bail!("unexpected end of expression"),
        }
    }

    fn identifier(&mut self, name: &str) -> anyhow::Result<f64> {
        match name {
            "pi" => return Ok(std::f64::consts::PI),
            "e" => return Ok(std::f64::consts::E),
            _ => {}
        }

        let function: fn(f64) -> anyhow::Result<f64> = match name {
            "sqrt" => |x| {
                if x < 0.0 {
                    anyhow::bail!("sqrt of a negative number");
                }
                Ok(x.sqrt())
            },
            "sin" => |x| Ok(x.sin()),
            "cos" => |x| Ok(x.cos()),
            "tan" => |x| Ok(x.tan()),
            "log" => |x| positive(x, "log").map(f64::log10),
            "ln" => |x| positive(x, "ln").map(f64::ln),
            "abs" => |x| Ok(x.abs()),
            other => anyhow::bail!("unknown identifier '{other}'"),
        };

        match self.advance() {
            Some(Token::LParen) => {}
            _ => anyhow::bail!("expected '(' after function '{name}'"),
        }

        let argument = self.expr()?;
        self.expect_rparen()?;
        function(argument).and_then(finite)
    }
}

fn finite(value: f64) -> anyhow::Result<f64> {
    if !value.is_finite() {
        anyhow::bail!("numeric overflow: intermediate result is not a finite number");
    }
    Ok(value)
}

fn positive(x: f64, function: &str) -> anyhow::Result<f64> {
    if x <= 0.0 {
        anyhow::bail!("{function} of a non-positive number");
    }
    Ok(x)
}

/// Format like C's `%g`: six significant digits, trailing zeros trimmed,
/// exponent notation outside `1e-4 <= |x| < 1e6`
pub fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }

    let scientific = format!("{value:.5e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..6).contains(&exponent) {
        let decimals = usize::try_from(5 - exponent).unwrap_or(0);
        trim_fraction(&format!("{value:.decimals$}")).to_owned()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
