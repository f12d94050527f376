//! Canonical ordering for components, versions, and page listings.
//!
//! Declared order wins: a component's position in the catalog's component
//! list (or a version's position within its component) is its *rank*. Ranked
//! entries sort before unranked ones, and unranked entries fall back to a
//! natural comparison where digit runs compare by value and letters ignore
//! case, so `"2"` sorts before `"10"` and `"Beta"` next to `"beta"`.
//!
//! Every comparator here ends in a raw byte comparison, so the resulting order
//! is total and never depends on input order.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Sentinel component for pages that belong to no component.
pub const ROOT_COMPONENT: &str = "ROOT";

/// Declared positions, keyed by name. First declaration wins.
#[derive(Debug, Default, Clone)]
pub struct Ranks {
    positions: HashMap<String, usize>,
}

impl Ranks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` at the next position unless it was already declared.
    pub fn declare(&mut self, name: &str) {
        let next = self.positions.len();
        self.positions.entry(name.to_string()).or_insert(next);
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Compare two names by declared rank, falling back to [`natural_cmp`].
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.get(a), self.get(b)) {
            (Some(ra), Some(rb)) => ra.cmp(&rb).then_with(|| a.cmp(b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => natural_cmp(a, b),
        }
    }
}

impl<'a> FromIterator<&'a str> for Ranks {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut ranks = Ranks::new();
        for name in iter {
            ranks.declare(name);
        }
        ranks
    }
}

/// Component ordering: `ROOT` first, then [`Ranks::compare`].
pub fn compare_components(ranks: &Ranks, a: &str, b: &str) -> Ordering {
    match (a == ROOT_COMPONENT, b == ROOT_COMPONENT) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => ranks.compare(a, b),
    }
}

/// Numeric-aware, case-insensitive comparison with a byte-order tie-break.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_cmp_loose(a, b).then_with(|| a.cmp(b))
}

/// The comparison without the tie-break; `"Guide"` and `"guide"` are equal here.
fn natural_cmp_loose(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = compare_chunks(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

/// Splits a string into alternating runs of ASCII digits and everything else.
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}

fn compare_chunks(a: Chunk<'_>, b: Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Digits(x), Chunk::Digits(y)) => compare_digit_runs(x, y),
        // Digits sort before letters, as in most collations.
        (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
        (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        (Chunk::Text(x), Chunk::Text(y)) => x
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(y.chars().flat_map(char::to_lowercase)),
    }
}

/// Compare digit runs by value without parsing, so arbitrarily long runs work.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
