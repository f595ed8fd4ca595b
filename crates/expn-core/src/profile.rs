//! Expense profile: monthly income plus per-category expenses
//!
//! Profiles are built per interaction from whatever the caller collected
//! (sliders, CLI flags) and discarded afterwards. Over-budget profiles are
//! valid input; they are what the advice generator reacts to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Currency label used in prompts and CLI output
pub const CURRENCY_LABEL: &str = "₹";

/// Expense categories collected from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rent,
    Food,
    Transport,
    Entertainment,
    Savings,
}

impl Category {
    /// Key used in prompts, config and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Savings => "savings",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rent => "Rent/Mortgage",
            Self::Food => "Food Expenses",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Savings => "Savings",
        }
    }

    /// All categories in form order
    pub fn all() -> &'static [Category] {
        &[
            Self::Rent,
            Self::Food,
            Self::Transport,
            Self::Entertainment,
            Self::Savings,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rent" | "mortgage" => Ok(Self::Rent),
            "food" => Ok(Self::Food),
            "transport" => Ok(Self::Transport),
            "entertainment" => Ok(Self::Entertainment),
            "savings" => Ok(Self::Savings),
            other => Err(format!("Unknown expense category: {}", other)),
        }
    }
}

/// Income and expenses for one budgeting period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseProfile {
    income: f64,
    /// Insertion-ordered; each category appears at most once
    expenses: Vec<(Category, f64)>,
}

impl ExpenseProfile {
    /// Create a profile with no expenses
    pub fn new(income: f64) -> Result<Self> {
        Ok(Self {
            income: validate_amount("income", income)?,
            expenses: Vec::new(),
        })
    }

    /// Builder-style variant of [`ExpenseProfile::set_expense`]
    pub fn with_expense(mut self, category: Category, amount: f64) -> Result<Self> {
        self.set_expense(category, amount)?;
        Ok(self)
    }

    /// Set the amount for a category, replacing an existing value in place
    pub fn set_expense(&mut self, category: Category, amount: f64) -> Result<()> {
        let amount = validate_amount(category.as_str(), amount)?;
        match self.expenses.iter_mut().find(|(c, _)| *c == category) {
            Some(entry) => entry.1 = amount,
            None => self.expenses.push((category, amount)),
        }
        Ok(())
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    /// Expenses in the order they were set
    pub fn expenses(&self) -> &[(Category, f64)] {
        &self.expenses
    }

    pub fn expense(&self, category: Category) -> Option<f64> {
        self.expenses
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, amount)| *amount)
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().map(|(_, amount)| amount).sum()
    }

    /// Income left after expenses (negative when over budget)
    pub fn remaining(&self) -> f64 {
        self.income - self.total_expenses()
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining() < 0.0
    }
}

impl Default for ExpenseProfile {
    /// The form's initial values
    fn default() -> Self {
        Self {
            income: 25000.0,
            expenses: vec![
                (Category::Rent, 10000.0),
                (Category::Food, 5000.0),
                (Category::Transport, 2000.0),
                (Category::Entertainment, 1000.0),
                (Category::Savings, 5000.0),
            ],
        }
    }
}

fn validate_amount(field: &str, amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidData(format!(
            "{} must be a non-negative amount, got {}",
            field, amount
        )));
    }
    Ok(amount)
}

/// Format an amount without a currency label
///
/// Whole numbers print without decimals (`25000`), anything else in its
/// shortest exact form (`10000.999`), never rounded.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{}", amount)
    }
}

/// Format an amount with the currency label, keeping the sign in front
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}{}", CURRENCY_LABEL, format_amount(amount.abs()))
    } else {
        format!("{}{}", CURRENCY_LABEL, format_amount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_matches_form() {
        let profile = ExpenseProfile::default();
        assert_eq!(profile.income(), 25000.0);
        assert_eq!(profile.expenses().len(), 5);
        assert_eq!(profile.expense(Category::Rent), Some(10000.0));
        assert_eq!(profile.total_expenses(), 23000.0);
        assert_eq!(profile.remaining(), 2000.0);
        assert!(!profile.is_over_budget());
    }

    #[test]
    fn test_set_expense_replaces_in_place() {
        let mut profile = ExpenseProfile::new(1000.0)
            .unwrap()
            .with_expense(Category::Rent, 100.0)
            .unwrap()
            .with_expense(Category::Food, 50.0)
            .unwrap();

        profile.set_expense(Category::Rent, 300.0).unwrap();

        assert_eq!(
            profile.expenses(),
            &[(Category::Rent, 300.0), (Category::Food, 50.0)]
        );
    }

    #[test]
    fn test_over_budget_is_valid() {
        let profile = ExpenseProfile::new(500.0)
            .unwrap()
            .with_expense(Category::Rent, 20000.0)
            .unwrap();
        assert!(profile.is_over_budget());
        assert_eq!(profile.remaining(), -19500.0);
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        assert!(ExpenseProfile::new(-1.0).is_err());
        assert!(ExpenseProfile::new(f64::NAN).is_err());

        let mut profile = ExpenseProfile::new(0.0).unwrap();
        assert!(profile.set_expense(Category::Food, -5.0).is_err());
        assert!(profile
            .set_expense(Category::Food, f64::INFINITY)
            .is_err());
        assert!(profile.expenses().is_empty());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Rent".parse::<Category>(), Ok(Category::Rent));
        assert_eq!(" savings ".parse::<Category>(), Ok(Category::Savings));
        assert!("utilities".parse::<Category>().is_err());

        for category in Category::all() {
            assert_eq!(category.as_str().parse::<Category>(), Ok(*category));
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(25000.0), "25000");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(1234.5), "1234.5");
        assert_eq!(format_amount(10000.999), "10000.999");
        assert_eq!(format_currency(2000.0), "₹2000");
        assert_eq!(format_currency(-19500.0), "-₹19500");
    }
}
