//! Classification rules for auto-discovered feature columns.
//!
//! The rule table is an explicit ordered list evaluated first-match-wins,
//! so the classification scheme itself is data: testable and extensible
//! without touching the discovery code.

/// Version tag recorded for every auto-registered feature.
pub const FEATURE_VERSION: &str = "1.0";

/// Identifier columns excluded from registration.
const IDENTIFIER_COLUMNS: &[&str] = &["customerid"];

/// Returns true if `column` names a record identifier rather than a feature.
///
/// Matching is case-insensitive and exact.
#[must_use]
pub fn is_identifier_column(column: &str) -> bool {
    IDENTIFIER_COLUMNS
        .iter()
        .any(|id| column.eq_ignore_ascii_case(id))
}

/// Predicate deciding whether a rule applies to a column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureMatcher {
    /// Matches the column name exactly.
    Exact(String),
    /// Matches any column starting with the prefix.
    Prefix(String),
}

/// A single classification rule: a predicate plus the description template
/// and source label to register when it matches.
///
/// Prefix templates may contain `{value}`, replaced with the column name
/// minus the matched prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRule {
    /// The predicate.
    pub matcher: FeatureMatcher,
    /// Description template for matching columns.
    pub description_template: String,
    /// Source-provenance label for matching columns.
    pub source_label: String,
}

impl FeatureRule {
    /// Creates an exact-name rule.
    #[must_use]
    pub fn exact(
        name: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            matcher: FeatureMatcher::Exact(name.into()),
            description_template: description.into(),
            source_label: source.into(),
        }
    }

    /// Creates a prefix rule.
    #[must_use]
    pub fn prefix(
        prefix: impl Into<String>,
        description_template: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            matcher: FeatureMatcher::Prefix(prefix.into()),
            description_template: description_template.into(),
            source_label: source.into(),
        }
    }

    /// Returns `(description, source)` if this rule matches `column`.
    #[must_use]
    pub fn describe(&self, column: &str) -> Option<(String, String)> {
        match &self.matcher {
            FeatureMatcher::Exact(name) if column == name => Some((
                self.description_template.clone(),
                self.source_label.clone(),
            )),
            FeatureMatcher::Prefix(prefix) => {
                let value = column.strip_prefix(prefix.as_str())?;
                Some((
                    self.description_template.replace("{value}", value),
                    self.source_label.clone(),
                ))
            }
            FeatureMatcher::Exact(_) => None,
        }
    }
}

/// An ordered rule table with a generic fallback.
///
/// `classify` walks the rules in order and returns the first match; columns
/// no rule claims get the fallback description, with `{column}` replaced by
/// the column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<FeatureRule>,
    fallback_template: String,
    fallback_source: String,
}

impl RuleTable {
    /// Creates a rule table.
    #[must_use]
    pub fn new(
        rules: Vec<FeatureRule>,
        fallback_template: impl Into<String>,
        fallback_source: impl Into<String>,
    ) -> Self {
        Self {
            rules,
            fallback_template: fallback_template.into(),
            fallback_source: fallback_source.into(),
        }
    }

    /// Classifies a column name into `(description, source)`.
    #[must_use]
    pub fn classify(&self, column: &str) -> (String, String) {
        for rule in &self.rules {
            if let Some(described) = rule.describe(column) {
                return described;
            }
        }
        (
            self.fallback_template.replace("{column}", column),
            self.fallback_source.clone(),
        )
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[FeatureRule] {
        &self.rules
    }
}

impl Default for RuleTable {
    /// The churn feature classification scheme: one derived ratio feature,
    /// three one-hot-encoded categorical groups, and a raw-dataset fallback.
    fn default() -> Self {
        Self::new(
            vec![
                FeatureRule::exact(
                    "avg_monthly_charge_per_tenure",
                    "Average monthly charge divided by customer tenure in months.",
                    "Derived from MonthlyCharges and tenure",
                ),
                FeatureRule::prefix(
                    "Contract_",
                    "Binary feature indicating if customer contract type is {value}.",
                    "Derived from Contract column",
                ),
                FeatureRule::prefix(
                    "InternetService_",
                    "Binary feature indicating if internet service type is {value}.",
                    "Derived from InternetService column",
                ),
                FeatureRule::prefix(
                    "PaymentMethod_",
                    "Binary feature indicating if payment method is {value}.",
                    "Derived from PaymentMethod column",
                ),
            ],
            "Feature derived from original dataset column: {column}.",
            "Telco churn dataset",
        )
    }
}
