//! Month-by-month amortization schedule

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::LoanResult;

/// One month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationScheduleEntry {
    /// 1-based payment number
    pub month: u32,
    pub payment: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub remaining_balance: f64,
}

/// Iterator over schedule entries, finite with exactly `number_of_payments` items
#[derive(Debug, Clone)]
pub struct ScheduleIter {
    balance: f64,
    monthly_rate: f64,
    payment: f64,
    month: u32,
    number_of_payments: u32,
}

impl ScheduleIter {
    pub(crate) fn new(principal: f64, monthly_rate: f64, payment: f64, number_of_payments: u32) -> Self {
        Self {
            balance: principal,
            monthly_rate,
            payment,
            month: 0,
            number_of_payments,
        }
    }
}

impl Iterator for ScheduleIter {
    type Item = AmortizationScheduleEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.month >= self.number_of_payments {
            return None;
        }
        self.month += 1;

        let interest_portion = self.balance * self.monthly_rate;
        let principal_portion = self.payment - interest_portion;

        // Final period absorbs accumulated rounding
        self.balance = if self.month == self.number_of_payments {
            0.0
        } else {
            (self.balance - principal_portion).max(0.0)
        };

        Some(AmortizationScheduleEntry {
            month: self.month,
            payment: self.payment,
            principal_portion,
            interest_portion,
            remaining_balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.number_of_payments - self.month) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ScheduleIter {}

/// Totals across a schedule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_payments: f64,
    pub total_principal: f64,
    pub total_interest: f64,
    pub final_balance: f64,
}

/// Collected amortization schedule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub entries: Vec<AmortizationScheduleEntry>,
}

impl FromIterator<AmortizationScheduleEntry> for AmortizationSchedule {
    fn from_iter<I: IntoIterator<Item = AmortizationScheduleEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl AmortizationSchedule {
    /// Number of payments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the schedule has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in month order
    pub fn iter(&self) -> std::slice::Iter<'_, AmortizationScheduleEntry> {
        self.entries.iter()
    }

    /// Totals across all payments
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            total_payments: self.entries.iter().map(|e| e.payment).sum(),
            total_principal: self.entries.iter().map(|e| e.principal_portion).sum(),
            total_interest: self.entries.iter().map(|e| e.interest_portion).sum(),
            final_balance: self.entries.last().map(|e| e.remaining_balance).unwrap_or(0.0),
        }
    }

    /// Write the schedule as CSV with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> LoanResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["Month", "Payment", "Principal", "Interest", "Balance"])?;

        for entry in &self.entries {
            csv_writer.write_record(&[
                entry.month.to_string(),
                format!("{:.2}", entry.payment),
                format!("{:.2}", entry.principal_portion),
                format!("{:.2}", entry.interest_portion),
                format!("{:.2}", entry.remaining_balance),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = &'a AmortizationScheduleEntry;
    type IntoIter = std::slice::Iter<'a, AmortizationScheduleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
