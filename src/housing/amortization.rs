//! Fixed-rate loan amortization, stepped one year (12 virtual months) at a time

use serde::{Deserialize, Serialize};

/// Level monthly payment for a fully amortizing loan
///
/// `payment = P * r(1+r)^n / ((1+r)^n - 1)` with `r = annual_rate / 12` and
/// `n = term_years * 12`. Zero principal yields a zero payment and a zero
/// rate yields straight-line repayment.
pub fn monthly_payment(principal: f64, annual_rate: f64, term_years: u32) -> f64 {
    let n = term_years * 12;
    if principal <= 0.0 || n == 0 {
        return 0.0;
    }

    let r = annual_rate / 12.0;
    if r == 0.0 {
        return principal / n as f64;
    }

    let growth = (1.0 + r).powi(n as i32);
    principal * r * growth / (growth - 1.0)
}

/// Totals for one year of payments
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanYear {
    pub payments: f64,
    pub interest: f64,
    pub principal: f64,
    /// Balance after the year's last payment
    pub remaining: f64,
}

/// Running state of a mortgage
#[derive(Debug, Clone)]
pub struct LoanState {
    monthly_rate: f64,
    payment: f64,
    remaining: f64,
    months_paid: u32,
    term_months: u32,
}

impl LoanState {
    pub fn new(principal: f64, annual_rate: f64, term_years: u32) -> Self {
        Self {
            monthly_rate: annual_rate / 12.0,
            payment: monthly_payment(principal, annual_rate, term_years),
            remaining: principal.max(0.0),
            months_paid: 0,
            term_months: term_years * 12,
        }
    }

    pub fn monthly_payment(&self) -> f64 {
        self.payment
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Whether payments are still due
    pub fn is_amortizing(&self) -> bool {
        self.months_paid < self.term_months && self.remaining > 0.0
    }

    /// Pay 12 months and return the year's totals
    ///
    /// Returns an all-zero year (with the current balance) once the loan is
    /// closed.
    pub fn advance_year(&mut self) -> LoanYear {
        let mut year = LoanYear {
            remaining: self.remaining,
            ..Default::default()
        };
        if !self.is_amortizing() {
            return year;
        }

        for _ in 0..12 {
            if self.months_paid >= self.term_months {
                break;
            }
            self.months_paid += 1;

            let interest = self.remaining * self.monthly_rate;
            let mut principal_portion = self.payment - interest;
            // Final scheduled payment absorbs rounding drift
            if self.months_paid == self.term_months {
                principal_portion = self.remaining;
            }

            let before = self.remaining;
            self.remaining = (self.remaining - principal_portion).max(0.0);

            year.payments += self.payment;
            year.interest += interest;
            year.principal += before - self.remaining;
        }

        year.remaining = self.remaining;
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_standard_payment() {
        // $300k over 30 years at 6%
        let payment = monthly_payment(300_000.0, 0.06, 30);
        assert_abs_diff_eq!(payment, 1798.65, epsilon = 0.01);
    }

    #[test]
    fn test_degenerate_payments() {
        assert_eq!(monthly_payment(0.0, 0.06, 30), 0.0);
        assert_relative_eq!(monthly_payment(120_000.0, 0.0, 10), 1_000.0);
    }

    #[test]
    fn test_full_amortization_closes_loan() {
        let mut loan = LoanState::new(300_000.0, 0.06, 30);
        let mut principal_paid = 0.0;
        let mut years = 0;

        while loan.is_amortizing() {
            principal_paid += loan.advance_year().principal;
            years += 1;
        }

        assert_eq!(years, 30);
        assert_abs_diff_eq!(principal_paid, 300_000.0, epsilon = 1e-6);
        assert_eq!(loan.remaining(), 0.0);
    }

    #[test]
    fn test_year_totals_split_payment() {
        let mut loan = LoanState::new(300_000.0, 0.06, 30);
        let year = loan.advance_year();

        assert_relative_eq!(year.payments, loan.monthly_payment() * 12.0, max_relative = 1e-12);
        assert_abs_diff_eq!(year.interest + year.principal, year.payments, epsilon = 1e-6);
        // Early years are interest heavy
        assert!(year.interest > year.principal);
        assert_abs_diff_eq!(year.remaining, 300_000.0 - year.principal, epsilon = 1e-6);
    }

    #[test]
    fn test_closed_loan_yields_empty_years() {
        let mut loan = LoanState::new(0.0, 0.06, 15);
        assert!(!loan.is_amortizing());

        let year = loan.advance_year();
        assert_eq!(year, LoanYear::default());
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let mut loan = LoanState::new(15_000.0, 0.0, 15);
        let year = loan.advance_year();

        assert_eq!(year.interest, 0.0);
        assert_relative_eq!(year.principal, 1_000.0, max_relative = 1e-12);
    }
}
