// src/pool/controller.rs

use super::{Controller, UserLoan};
use crate::config::{DEFAULT_LIQUIDATION_DISCOUNT, DEFAULT_LOAN_DISCOUNT};
use crate::types::Wad;

/// Reference loan controller: discounts plus a static loan book. There is no
/// liquidation logic; the book only shapes band seeding and state records.
#[derive(Debug, Clone, PartialEq)]
pub struct SimController {
    loan_discount: Wad,
    liquidation_discount: Wad,
    loans: Vec<UserLoan>,
}

impl SimController {
    pub fn new(loan_discount: Wad, liquidation_discount: Wad) -> Self {
        Self {
            loan_discount,
            liquidation_discount,
            loans: Vec::new(),
        }
    }

    pub fn with_loans(mut self, loans: Vec<UserLoan>) -> Self {
        self.loans = loans;
        self
    }

    pub fn add_loan(&mut self, loan: UserLoan) {
        self.loans.push(loan);
    }
}

impl Default for SimController {
    fn default() -> Self {
        Self::new(DEFAULT_LOAN_DISCOUNT, DEFAULT_LIQUIDATION_DISCOUNT)
    }
}

impl Controller for SimController {
    fn loan_discount(&self) -> Wad {
        self.loan_discount
    }

    fn liquidation_discount(&self) -> Wad {
        self.liquidation_discount
    }

    fn loans(&self) -> &[UserLoan] {
        &self.loans
    }

    fn set_loan_discount(&mut self, v: Wad) {
        self.loan_discount = v;
    }

    fn set_liquidation_discount(&mut self, v: Wad) {
        self.liquidation_discount = v;
    }
}
