//! Categorization rule table
//!
//! A rule maps a budget category name to an ordered list of lowercase
//! keywords. The table itself is ordered: the matcher walks rules in
//! declaration order and the first hit wins, so a rules file doubles as a
//! priority list.
//!
//! Rules are loaded from a JSON array (order in the file is the evaluation
//! order) or fall back to the built-in Spanish default table.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::CategoryCatalog;

/// One categorization rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Category name, matched verbatim against the budget's catalog
    pub category: String,
    /// Lowercase substrings to look for in the payee name
    pub keywords: Vec<String>,
}

/// An ordered, immutable rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set, normalizing keywords to lowercase
    ///
    /// Rejects rules with an empty category, no keywords, or a blank keyword.
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(rules.len());
        for mut rule in rules {
            if rule.category.trim().is_empty() {
                return Err(Error::InvalidRule("empty category name".into()));
            }
            if rule.keywords.is_empty() {
                return Err(Error::InvalidRule(format!(
                    "rule for \"{}\" has no keywords",
                    rule.category
                )));
            }
            for keyword in &mut rule.keywords {
                let lowered = keyword.trim().to_lowercase();
                if lowered.is_empty() {
                    return Err(Error::InvalidRule(format!(
                        "rule for \"{}\" has a blank keyword",
                        rule.category
                    )));
                }
                *keyword = lowered;
            }
            normalized.push(rule);
        }
        Ok(Self { rules: normalized })
    }

    /// Load a rule set from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let rules: Vec<Rule> = serde_json::from_str(&contents)?;
        debug!("Loaded {} rules from {}", rules.len(), path.display());
        Self::new(rules)
    }

    /// The built-in default table, in the same order the original shipped it
    pub fn defaults() -> Self {
        fn rule(category: &str, keywords: &[&str]) -> Rule {
            Rule {
                category: category.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            }
        }

        // Validated by construction, so new() cannot fail here
        Self::new(vec![
            rule(
                "Supermercado",
                &[
                    "mercadona", "carrefour", "lidl", "aldi", "dia", "eroski", "alcampo",
                    "hipercor",
                ],
            ),
            rule(
                "Restaurantes y bares",
                &[
                    "restaurant",
                    "mcdonald",
                    "burger",
                    "pizza",
                    "kebab",
                    "cafeteria",
                    "bar",
                    "cerveceria",
                ],
            ),
            rule(
                "Gasolina",
                &["shell", "repsol", "cepsa", "bp", "galp", "gasolinera"],
            ),
            rule(
                "Transporte Público",
                &["metro", "renfe", "uber", "cabify", "taxi", "bus", "emt"],
            ),
            rule(
                "Suscripciones",
                &[
                    "netflix",
                    "spotify",
                    "hbo",
                    "disney",
                    "prime video",
                    "youtube",
                    "apple",
                ],
            ),
            rule(
                "Internet y móviles",
                &[
                    "vodafone",
                    "movistar",
                    "orange",
                    "yoigo",
                    "masmovil",
                    "pepephone",
                    "digi",
                ],
            ),
            rule(
                "Suministros (luz, agua y gas)",
                &[
                    "iberdrola", "endesa", "naturgy", "aqualia", "octopus", "holaluz",
                ],
            ),
            rule(
                "Ropa",
                &[
                    "zara",
                    "h&m",
                    "mango",
                    "pull&bear",
                    "bershka",
                    "primark",
                    "decathlon",
                ],
            ),
            rule(
                "Salud y belleza",
                &["farmacia", "pharmacy", "druni", "primor", "sephora"],
            ),
            rule(
                "Deporte",
                &["gym", "gimnasio", "fitness", "mcfit", "basicfit"],
            ),
        ])
        .unwrap_or_else(|_| Self { rules: Vec::new() })
    }

    /// Rules in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Startup validation: report rule categories the budget's catalog
    /// does not know about
    ///
    /// Such rules can never apply successfully; surfacing them up front
    /// beats failing per-transaction deep into a run.
    pub fn validate_against(&self, catalog: &CategoryCatalog) -> Vec<String> {
        self.rules
            .iter()
            .filter(|r| !catalog.contains(&r.category))
            .map(|r| {
                format!(
                    "Rule category \"{}\" does not exist in the budget's catalog",
                    r.category
                )
            })
            .collect()
    }
}
