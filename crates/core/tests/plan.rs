use edgecheck_core::candidates::Value;
use edgecheck_core::plan::TrialPlan;

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&i| Value::Int(i)).collect()
}

#[test]
fn every_trial_has_one_argument_per_parameter() {
    let sets = vec![ints(&[0, 1]), ints(&[0, 1, 2]), ints(&[0])];
    let trials: Vec<_> = TrialPlan::new(sets, 100).collect();
    assert_eq!(trials.len(), 6);
    assert!(trials.iter().all(|t| t.len() == 3));
}

#[test]
fn plan_is_truncated_at_the_cap() {
    let sets = vec![ints(&[0, 1, 2]), ints(&[0, 1, 2])];
    let trials: Vec<_> = TrialPlan::new(sets, 4).collect();
    assert_eq!(trials.len(), 4);
}

#[test]
fn zero_parameters_yield_one_empty_trial() {
    let trials: Vec<_> = TrialPlan::new(Vec::new(), 24).collect();
    assert_eq!(trials, vec![Vec::new()]);
}

#[test]
fn first_parameter_varies_slowest() {
    let sets = vec![ints(&[0, 1]), ints(&[7, 8])];
    let trials: Vec<_> = TrialPlan::new(sets, 100).collect();
    assert_eq!(
        trials,
        vec![
            ints(&[0, 7]),
            ints(&[0, 8]),
            ints(&[1, 7]),
            ints(&[1, 8]),
        ]
    );
}

#[test]
fn planning_is_deterministic() {
    let sets = || vec![ints(&[0, 1, 2]), ints(&[3, 4])];
    let a: Vec<_> = TrialPlan::new(sets(), 24).collect();
    let b: Vec<_> = TrialPlan::new(sets(), 24).collect();
    assert_eq!(a, b);
}

#[test]
fn a_zero_cap_plans_nothing() {
    let trials: Vec<_> = TrialPlan::new(vec![ints(&[0])], 0).collect();
    assert!(trials.is_empty());
}
