//! End-to-end checks of the public calculator API

use approx::assert_relative_eq;
use loan_calculator::{
    AffordabilityEngine, AmortizationEngine, LoanCalculator, LoanError, LoanType, PayoffSimulator,
    MAX_PAYOFF_MONTHS,
};

const CASES: [(f64, f64, u32); 6] = [
    (120_000.0, 0.0, 10),
    (300_000.0, 6.5, 30),
    (1_500.0, 29.99, 1),
    (832_750.0, 7.25, 50),
    (45_000.0, 0.01, 5),
    (250_000.0, 3.875, 15),
];

#[test]
fn total_amount_is_payment_times_count() {
    let engine = AmortizationEngine::new();
    for (p, r, t) in CASES {
        let result = engine.compute(p, r, t).unwrap();
        assert_eq!(result.number_of_payments, t * 12);
        assert_eq!(result.total_amount, result.monthly_payment * result.number_of_payments as f64);
    }
}

#[test]
fn affordability_inverts_amortization() {
    let amort = AmortizationEngine::new();
    let afford = AffordabilityEngine::new();
    for (p, r, t) in CASES {
        let payment = amort.compute(p, r, t).unwrap().monthly_payment;
        let principal = afford.compute_affordable_principal(payment, r, t).unwrap();
        assert_relative_eq!(principal, p, max_relative = 1e-6);
    }
}

#[test]
fn zero_rate_boundary() {
    let result = AmortizationEngine::new().compute(120_000.0, 0.0, 10).unwrap();
    assert_eq!(result.monthly_payment, 1000.0);
}

#[test]
fn payoff_converges() {
    let result = PayoffSimulator::new().simulate(5000.0, 20.0 / 1200.0, 200.0).unwrap();
    assert!(result.months > 0 && result.months <= MAX_PAYOFF_MONTHS);
    assert!((result.total_paid - result.total_interest - 5000.0).abs() < 1e-6);
}

#[test]
fn payoff_rejects_interest_only_shortfall() {
    let err = PayoffSimulator::new().simulate(5000.0, 20.0 / 1200.0, 50.0).unwrap_err();
    assert!(matches!(err, LoanError::NonConvergentPayoff { .. }));
}

#[test]
fn payoff_is_deterministic() {
    let sim = PayoffSimulator::new();
    let a = sim.simulate(7_321.55, 0.0199, 250.0).unwrap();
    let b = sim.simulate(7_321.55, 0.0199, 250.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn classification_boundary() {
    let calc = LoanCalculator::new().unwrap();

    let at_limit = calc.classify(832_750.0, "Alabama", Some(""));
    assert!(at_limit.is_conforming);
    assert_eq!(at_limit.difference, 0.0);

    let over = calc.classify(832_751.0, "Alabama", Some(""));
    assert!(!over.is_conforming);
    assert_eq!(over.loan_type, LoanType::Jumbo);
}

#[test]
fn schedule_ends_at_zero_and_never_rises() {
    let engine = AmortizationEngine::new();
    for (p, r, t) in CASES {
        let schedule = engine.generate_schedule(p, r, t).unwrap();
        assert_eq!(schedule.len(), (t * 12) as usize);

        let balances: Vec<f64> = schedule.iter().map(|e| e.remaining_balance).collect();
        assert!(balances.windows(2).all(|w| w[1] <= w[0]), "balance rose for {:?}", (p, r, t));
        assert_eq!(*balances.last().unwrap(), 0.0);
    }
}

#[test]
fn invalid_parameters_are_errors() {
    let amort = AmortizationEngine::new();
    assert!(matches!(amort.compute(-5.0, 5.0, 10), Err(LoanError::InvalidParameter { .. })));
    assert!(matches!(amort.generate_schedule(5.0, -5.0, 10), Err(LoanError::InvalidParameter { .. })));
    assert!(matches!(
        AffordabilityEngine::new().compute_affordable_principal(1000.0, 5.0, 0),
        Err(LoanError::InvalidParameter { .. })
    ));
}

#[test]
fn vanishingly_small_rate_round_trips() {
    let amort = AmortizationEngine::new();
    let result = amort.compute(100_000.0, 1e-15, 30).unwrap();
    assert!(result.monthly_payment.is_finite() && result.total_amount.is_finite());

    let principal = AffordabilityEngine::new()
        .compute_affordable_principal(result.monthly_payment, 1e-15, 30)
        .unwrap();
    assert_relative_eq!(principal, 100_000.0, max_relative = 1e-6);
}

#[test]
fn absurd_terms_are_rejected_before_scheduling() {
    let amort = AmortizationEngine::new();
    assert!(matches!(
        amort.generate_schedule(100_000.0, 5.0, 178_000_000),
        Err(LoanError::InvalidParameter { .. })
    ));
    assert!(amort.generate_schedule(100_000.0, 5.0, 100).is_ok());
}
