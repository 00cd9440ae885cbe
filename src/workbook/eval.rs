//! Formula evaluation over a sheet
//!
//! Covers exactly the grammar the exporter emits: numeric literals, A1 cell
//! references, `+ - * /`, unary sign, parentheses, and `SUM(range)`. In
//! keeping with the engine's defensive posture the evaluator is total:
//! empty cells, text cells, unknown references, malformed formulas, and
//! reference cycles all evaluate to 0.0 rather than failing.

use super::sheet::{parse_cell_ref, Cell, Sheet};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Evaluates cells on demand with memoization
pub struct SheetEvaluator<'a> {
    sheet: &'a Sheet,
    cache: HashMap<(u32, u32), f64>,
    in_progress: HashSet<(u32, u32)>,
}

impl<'a> SheetEvaluator<'a> {
    pub fn new(sheet: &'a Sheet) -> Self {
        Self {
            sheet,
            cache: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Numeric value of the cell at (row, col)
    pub fn value(&mut self, row: u32, col: u32) -> f64 {
        let key = (row, col);
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }
        if !self.in_progress.insert(key) {
            // The exporter never emits cycles; guard anyway
            debug!("reference cycle at ({}, {})", row, col);
            return 0.0;
        }

        let value = match self.sheet.get(row, col) {
            Cell::Empty | Cell::Text(_) => 0.0,
            Cell::Number(n) => *n,
            Cell::Formula(source) => self.eval_formula(source),
        };

        self.in_progress.remove(&key);
        self.cache.insert(key, value);
        value
    }

    /// Numeric value of the cell at an A1-style reference
    pub fn value_at(&mut self, reference: &str) -> f64 {
        match parse_cell_ref(reference) {
            Some((row, col)) => self.value(row, col),
            None => 0.0,
        }
    }

    fn eval_formula(&mut self, source: &str) -> f64 {
        let source = source.strip_prefix('=').unwrap_or(source);
        match tokenize(source) {
            Some(tokens) => {
                let mut parser = Parser {
                    tokens,
                    pos: 0,
                    cells: self,
                };
                parser.parse().unwrap_or_else(|| {
                    debug!("malformed formula: {}", source);
                    0.0
                })
            }
            None => {
                debug!("unrecognized token in formula: {}", source);
                0.0
            }
        }
    }

    /// Sum of a rectangular range, row-major ascending (matches the order
    /// the engine accumulates totals in)
    fn sum_range(&mut self, from: (u32, u32), to: (u32, u32)) -> f64 {
        let (r1, c1) = (from.0.min(to.0), from.1.min(to.1));
        let (r2, c2) = (from.0.max(to.0), from.1.max(to.1));

        let mut total = 0.0;
        for row in r1..=r2 {
            for col in c1..=c2 {
                total += self.value(row, col);
            }
        }
        total
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Ref(u32, u32),
    Sum,
    Plus,
    Minus,
    Star,
    Slash,
    Colon,
    LParen,
    RParen,
}

fn tokenize(source: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let bytes = source.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            ':' => {
                tokens.push(Token::Colon);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < bytes.len() && matches!(bytes[i] as char, '0'..='9' | '.') {
                    i += 1;
                }
                let n: f64 = source[start..i].parse().ok()?;
                tokens.push(Token::Number(n));
            }
            'A'..='Z' | 'a'..='z' => {
                let start = i;
                while i < bytes.len() && (bytes[i] as char).is_ascii_alphanumeric() {
                    i += 1;
                }
                let word = &source[start..i];
                if word.eq_ignore_ascii_case("sum") {
                    tokens.push(Token::Sum);
                } else if let Some((row, col)) = parse_cell_ref(word) {
                    tokens.push(Token::Ref(row, col));
                } else {
                    return None;
                }
            }
            _ => return None,
        }
    }

    Some(tokens)
}

/// Recursive-descent parser evaluating as it goes
struct Parser<'e, 'a> {
    tokens: Vec<Token>,
    pos: usize,
    cells: &'e mut SheetEvaluator<'a>,
}

impl Parser<'_, '_> {
    fn parse(&mut self) -> Option<f64> {
        let value = self.expr()?;
        if self.pos == self.tokens.len() {
            Some(value)
        } else {
            None
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn expect(&mut self, token: Token) -> Option<()> {
        if self.advance()? == token {
            Some(())
        } else {
            None
        }
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Some(value),
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    value /= self.factor()?;
                }
                _ => return Some(value),
            }
        }
    }

    fn factor(&mut self) -> Option<f64> {
        match self.advance()? {
            Token::Number(n) => Some(n),
            Token::Ref(row, col) => Some(self.cells.value(row, col)),
            Token::Minus => Some(-self.factor()?),
            Token::Plus => self.factor(),
            Token::LParen => {
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                Some(value)
            }
            Token::Sum => {
                self.expect(Token::LParen)?;
                let from = match self.advance()? {
                    Token::Ref(row, col) => (row, col),
                    _ => return None,
                };
                self.expect(Token::Colon)?;
                let to = match self.advance()? {
                    Token::Ref(row, col) => (row, col),
                    _ => return None,
                };
                self.expect(Token::RParen)?;
                Some(self.cells.sum_range(from, to))
            }
            _ => None,
        }
    }
}
