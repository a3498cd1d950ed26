//! Router
//!
//! Static lookup from classification category to destination. Lookups are
//! case-insensitive and never fail: unknown categories go to the default
//! destination.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::RoutingConfig;
use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingRule {
    pub category: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    /// Category as returned by the classifier
    pub category: String,
    pub destination: String,
}

#[derive(Debug, Clone)]
pub struct RoutingTable {
    rules: Vec<RoutingRule>,
    default_index: usize,
}

impl RoutingTable {
    pub fn new<I, C, D>(rules: I, default_category: &str) -> AppResult<Self>
    where
        I: IntoIterator<Item = (C, D)>,
        C: Into<String>,
        D: Into<String>,
    {
        let mut table: Vec<RoutingRule> = Vec::new();
        for (category, destination) in rules {
            let category = category.into().trim().to_string();
            let destination = destination.into().trim().to_string();
            if category.is_empty() || destination.is_empty() {
                return Err(AppError::Config(
                    "routing rules need a category and a destination".to_string(),
                ));
            }
            if table.iter().any(|r| r.category.eq_ignore_ascii_case(&category)) {
                return Err(AppError::Config(format!(
                    "duplicate routing category: {}",
                    category
                )));
            }
            table.push(RoutingRule { category, destination });
        }

        let default_index = table
            .iter()
            .position(|r| r.category.eq_ignore_ascii_case(default_category.trim()))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "default category {} is not in the routing table",
                    default_category
                ))
            })?;

        Ok(Self {
            rules: table,
            default_index,
        })
    }

    pub fn from_config(config: &RoutingConfig) -> AppResult<Self> {
        let rules = Self::parse_rules(&config.rules)?;
        let table = Self::new(rules, &config.default_category)?;
        info!(rules = table.rules.len(), default = %table.default_category(), "Routing table loaded");
        Ok(table)
    }

    /// Parse `category=destination` pairs separated by commas
    pub fn parse_rules(raw: &str) -> AppResult<Vec<(String, String)>> {
        raw.split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                pair.split_once('=')
                    .map(|(c, d)| (c.trim().to_string(), d.trim().to_string()))
                    .ok_or_else(|| {
                        AppError::Config(format!("routing rule is not category=destination: {}", pair))
                    })
            })
            .collect()
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// Categories in table order
    pub fn categories(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.category.as_str()).collect()
    }

    pub fn default_category(&self) -> &str {
        &self.rules[self.default_index].category
    }

    pub fn default_destination(&self) -> &str {
        &self.rules[self.default_index].destination
    }

    /// Canonical spelling of a known category
    pub fn canonical_category(&self, category: &str) -> Option<&str> {
        let category = category.trim();
        self.rules
            .iter()
            .find(|r| r.category.eq_ignore_ascii_case(category))
            .map(|r| r.category.as_str())
    }

    pub fn route(&self, category: &str) -> RoutingDecision {
        let destination = match self
            .rules
            .iter()
            .find(|r| r.category.eq_ignore_ascii_case(category.trim()))
        {
            Some(rule) => rule.destination.clone(),
            None => {
                warn!(category, default = %self.default_category(), "Unknown category, using default route");
                self.default_destination().to_string()
            }
        };

        RoutingDecision {
            category: category.to_string(),
            destination,
        }
    }
}
