//! Naive merchant extraction: frequent description words stand in for
//! merchant names when asking the savings backend for alternatives.

use anyhow::Result;
use regex::Regex;
use std::collections::HashMap;

use crate::model::LedgerRow;

/// Words that describe the transaction rather than the merchant.
pub const STOPWORDS: [&str; 22] = [
    "transaction",
    "purchase",
    "payment",
    "debit",
    "credit",
    "online",
    "pos",
    "sale",
    "card",
    "store",
    "order",
    "transfer",
    "deposit",
    "withdrawal",
    "fee",
    "charge",
    "refund",
    "atm",
    "cash",
    "check",
    "ach",
    "wire",
];

const MIN_TOKEN_LEN: usize = 3;

pub struct MerchantTokenizer {
    word_re: Regex,
}

impl MerchantTokenizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            word_re: Regex::new(r"[a-z][a-z&'.-]+")?,
        })
    }

    /// Candidate merchant tokens of one description, in order of appearance.
    pub fn tokens<'a>(&'a self, lowered: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.word_re
            .find_iter(lowered)
            .map(|m| m.as_str())
            .filter(|w| w.len() >= MIN_TOKEN_LEN && !STOPWORDS.contains(w))
    }

    /// Top `limit` tokens by descending frequency; ties keep first-seen order.
    pub fn extract<R: LedgerRow>(&self, rows: &[R], limit: usize) -> Vec<String> {
        let mut order: Vec<(String, usize)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for row in rows {
            let desc = row.description();
            if desc.is_empty() {
                continue;
            }
            let lowered = desc.to_lowercase();
            for tok in self.tokens(&lowered) {
                match slots.get(tok) {
                    Some(&i) => order[i].1 += 1,
                    None => {
                        slots.insert(tok.to_string(), order.len());
                        order.push((tok.to_string(), 1));
                    }
                }
            }
        }

        // stable: equal counts stay in first-seen order
        order.sort_by(|a, b| b.1.cmp(&a.1));
        order.into_iter().take(limit).map(|(w, _)| w).collect()
    }
}

/// One-shot helper around [`MerchantTokenizer`].
pub fn extract_merchants<R: LedgerRow>(rows: &[R], limit: usize) -> Result<Vec<String>> {
    Ok(MerchantTokenizer::new()?.extract(rows, limit))
}
