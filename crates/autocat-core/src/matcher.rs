//! Keyword matcher for payee names
//!
//! Pure substring matching: the payee is lowercased (no other
//! normalization, accents and punctuation stay significant) and compared
//! against each rule's keywords in declaration order. The first keyword of
//! the first rule that is contained in the payee decides the category.
//!
//! Overlapping keywords across rules are resolved by rule order alone;
//! ties are neither detected nor reported.

use crate::rules::RuleSet;

/// A successful match, borrowing from the rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub category: &'a str,
    pub keyword: &'a str,
}

/// Find the first rule whose keywords match the payee
///
/// Deterministic for fixed inputs; no I/O, no side effects. Empty payees
/// never match.
pub fn match_payee<'a>(payee: &str, rules: &'a RuleSet) -> Option<RuleMatch<'a>> {
    if payee.is_empty() {
        return None;
    }

    let payee_lower = payee.to_lowercase();

    for rule in rules.iter() {
        for keyword in &rule.keywords {
            if payee_lower.contains(keyword.as_str()) {
                return Some(RuleMatch {
                    category: &rule.category,
                    keyword,
                });
            }
        }
    }

    None
}
