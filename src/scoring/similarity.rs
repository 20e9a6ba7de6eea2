use serde::Serialize;
use std::collections::HashMap;

use crate::records::{BankRecord, Customer};

/// The closest candidate to a query string.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch<'a> {
    pub target: &'a str,
    pub index: usize,
    pub rating: f64,
}

/// Sørensen–Dice coefficient over character bigrams, whitespace ignored.
pub fn compare(a: &str, b: &str) -> f64 {
    if a.is_ascii() && b.is_ascii() {
        strsim::sorensen_dice(a, b)
    } else {
        char_dice(a, b)
    }
}

// strsim divides by byte length, so multi-byte text needs its own count.
fn char_dice(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut shared = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f64 / (a.len() + b.len() - 2) as f64
}

/// Find the candidate most similar to `query`. Ties keep the earliest candidate.
pub fn find_best_match<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
) -> Option<BestMatch<'a>> {
    let mut best: Option<BestMatch<'a>> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let target = candidate.as_ref();
        let rating = compare(query, target);
        if best.as_ref().map_or(true, |b| rating > b.rating) {
            best = Some(BestMatch { target, index, rating });
        }
    }
    best
}

/// Rating of the best match, or 0 when there are no candidates.
pub fn best_match_rating<S: AsRef<str>>(query: &str, candidates: &[S]) -> f64 {
    find_best_match(query, candidates).map_or(0.0, |m| m.rating)
}

/// Highest best-match rating of any query against the pool (0 for no queries).
fn max_best_match<Q: AsRef<str>, S: AsRef<str>>(queries: &[Q], pool: &[S]) -> f64 {
    queries
        .iter()
        .map(|q| best_match_rating(q.as_ref(), pool))
        .fold(0.0, f64::max)
}

pub fn name_similarity(bank: &BankRecord, customer: Option<&Customer>) -> f64 {
    match customer {
        Some(customer) => max_best_match(&bank.names, &customer.name_pool()),
        None => 0.0,
    }
}

pub fn email_similarity(bank: &BankRecord, customer: Option<&Customer>) -> f64 {
    match customer {
        Some(customer) => max_best_match(&bank.emails, &customer.email_pool()),
        None => 0.0,
    }
}

pub fn phone_similarity(bank: &BankRecord, customer: Option<&Customer>) -> f64 {
    if bank.phone_numbers.is_empty() {
        return 0.0;
    }
    match customer.and_then(|c| c.contact_phone_number.as_deref()) {
        Some(contact) => best_match_rating(contact, &bank.phone_numbers),
        None => 0.0,
    }
}

/// The three local signals for one bank/customer pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSimilarity {
    pub name: f64,
    pub email: f64,
    pub phone: f64,
}

impl LocalSimilarity {
    pub fn compute(bank: &BankRecord, customer: Option<&Customer>) -> Self {
        Self {
            name: name_similarity(bank, customer),
            email: email_similarity(bank, customer),
            phone: phone_similarity(bank, customer),
        }
    }

    /// Unweighted mean of the three signals.
    pub fn mean(&self) -> f64 {
        (self.name + self.email + self.phone) / 3.0
    }
}
