use crate::model::{LanguageTotal, Record};
use std::collections::HashMap;

/// Include/exclude lists applied before totals are computed.
#[derive(Debug, Clone, Default)]
pub struct LanguageFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl LanguageFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    pub fn allows(&self, language: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|l| l == language) {
            return false;
        }
        !self.exclude.iter().any(|l| l == language)
    }
}

/// Per-language sums over every record, remembering the order in which
/// languages were first observed.
#[derive(Debug, Clone, Default)]
pub struct LanguageTotals {
    order: Vec<String>,
    totals: HashMap<String, u64>,
}

impl LanguageTotals {
    pub fn compute(records: &[Record], filter: &LanguageFilter) -> Self {
        let mut totals = LanguageTotals::default();

        for counts in records.iter().filter_map(|r| r.counts.as_ref()) {
            for (language, code) in counts.iter() {
                if !filter.allows(language) {
                    continue;
                }
                match totals.totals.get_mut(language) {
                    Some(total) => *total += code,
                    None => {
                        totals.order.push(language.to_string());
                        totals.totals.insert(language.to_string(), code);
                    }
                }
            }
        }

        totals
    }

    /// Languages in first-observed order.
    pub fn languages(&self) -> &[String] {
        &self.order
    }

    pub fn total(&self, language: &str) -> u64 {
        self.totals.get(language).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn to_vec(&self) -> Vec<LanguageTotal> {
        self.order
            .iter()
            .map(|language| LanguageTotal {
                language: language.clone(),
                total: self.total(language),
            })
            .collect()
    }
}

/// The top `top` languages by total, ties kept in first-observed order; with
/// `top == 0`, every language alphabetically.
pub fn select_languages(totals: &LanguageTotals, top: usize) -> Vec<String> {
    let mut languages = totals.languages().to_vec();
    if top == 0 {
        languages.sort();
        return languages;
    }

    // stable, so equal totals keep observation order
    languages.sort_by(|a, b| totals.total(b).cmp(&totals.total(a)));
    languages.truncate(top);
    languages
}
