use tta_domain::*;
use tta_model::*;
use tta_runner::*;

/// One component counting x down from 5 on a two-location loop. The loop
/// dies when x reaches 0.
fn countdown_network() -> Ntta {
    let mut b = TtaBuilder::new();
    let l0 = b.location("L0");
    let l1 = b.location("L1");
    b.edge(
        "dec",
        l0,
        l1,
        Expression::guard("x > 0").unwrap(),
        UpdateSet::updates("x := x - 1").unwrap(),
    );
    b.edge("back", l1, l0, Expression::guard("").unwrap(), UpdateSet::default());

    let mut nb = NttaBuilder::new();
    nb.add_component("Main", b.build(l0).unwrap());
    nb.add_internal("x", 5.to_value());
    nb.build().unwrap()
}

/// One component spinning on itself; x is never mutated.
fn self_loop_network() -> Ntta {
    let mut b = TtaBuilder::new();
    let l0 = b.location("L0");
    b.edge("spin", l0, l0, Expression::guard("").unwrap(), UpdateSet::default());

    let mut nb = NttaBuilder::new();
    nb.add_component("Main", b.build(l0).unwrap());
    nb.add_internal("x", 0.to_value());
    nb.build().unwrap()
}

fn queries(network: &mut Ntta, texts: &[&str], pick: PickStrategy) -> VerificationResults {
    let warnings = Warnings::default();
    let queries = compile_queries(texts, &warnings).unwrap();
    let settings = SearchSettings {
        pick,
        ..SearchSettings::default()
    };
    verify(network, queries, settings).unwrap()
}

#[test]
fn countdown_reaches_zero_with_a_witness() {
    let mut ntta = countdown_network();
    let results = queries(&mut ntta, &["E F x == 0"], PickStrategy::First);

    let outcome = &results.outcomes[0];
    assert!(outcome.satisfied);

    let witness = outcome.witness.as_ref().unwrap();
    assert_eq!(witness.first().unwrap().internal.get("x"), Some(&Value::Int(5)));
    assert_eq!(witness.last().unwrap().internal.get("x"), Some(&Value::Int(0)));
    // parent links walk back to the initial configuration
    assert_eq!(witness.first().unwrap().locations["Main"], "L0");
}

#[test]
fn unreachable_value_terminates_without_a_witness() {
    let mut ntta = self_loop_network();
    let results = queries(&mut ntta, &["E F x == 1"], PickStrategy::First);

    let outcome = &results.outcomes[0];
    assert!(!outcome.satisfied);
    assert!(outcome.witness.is_none());
}

#[test]
fn every_pick_strategy_finds_the_goal() {
    for pick in [PickStrategy::First, PickStrategy::Last, PickStrategy::Random] {
        let mut ntta = countdown_network();
        let results = queries(&mut ntta, &["E F x == 0"], pick);
        assert!(results.outcomes[0].satisfied, "failed with {:?}", pick);
    }
}

#[test]
fn invariants_hold_on_exhaustion() {
    let mut ntta = countdown_network();
    let results = queries(&mut ntta, &["A G x >= 0"], PickStrategy::First);

    let outcome = &results.outcomes[0];
    assert!(outcome.satisfied);
    assert!(outcome.witness.is_none());
}

#[test]
fn violated_invariants_come_with_a_counterexample() {
    let mut ntta = countdown_network();
    let results = queries(&mut ntta, &["A G x > 0"], PickStrategy::First);

    let outcome = &results.outcomes[0];
    assert!(!outcome.satisfied);
    let witness = outcome.witness.as_ref().unwrap();
    assert_eq!(witness.last().unwrap().internal.get("x"), Some(&Value::Int(0)));
}

#[test]
fn goals_holding_initially_resolve_immediately() {
    let mut ntta = countdown_network();
    let results = queries(&mut ntta, &["E F x == 5"], PickStrategy::First);

    let outcome = &results.outcomes[0];
    assert!(outcome.satisfied);
    assert_eq!(outcome.witness.as_ref().unwrap().len(), 1);
}

#[test]
fn several_queries_resolve_in_one_run() {
    let mut ntta = countdown_network();
    let results = queries(
        &mut ntta,
        &["E F x == 0", "E F x == 9", "A G x >= 0"],
        PickStrategy::First,
    );

    assert!(results.outcome("E F x == 0").unwrap().satisfied);
    assert!(!results.outcome("E F x == 9").unwrap().satisfied);
    assert!(results.outcome("A G x >= 0").unwrap().satisfied);
}

#[test]
fn unsupported_query_shapes_are_dropped() {
    let warnings = Warnings::default();
    let queries = compile_queries(&["E F x == 0", "E G x == 0"], &warnings).unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].text, "E F x == 0");
}

#[test]
fn cancellation_stops_the_search() {
    let mut ntta = self_loop_network();
    let warnings = Warnings::default();
    let queries = compile_queries(&["E F x == 1"], &warnings).unwrap();

    let settings = SearchSettings::default();
    settings.cancel.cancel();
    let result = verify(&mut ntta, queries, settings);
    assert_eq!(result, Err(TtaError::Cancelled));
}

#[test]
fn past_deadlines_stop_the_search() {
    let mut ntta = self_loop_network();
    let warnings = Warnings::default();
    let queries = compile_queries(&["E F x == 1"], &warnings).unwrap();

    let settings = SearchSettings {
        deadline: Some(std::time::Instant::now()),
        ..SearchSettings::default()
    };
    let result = verify(&mut ntta, queries, settings);
    assert_eq!(result, Err(TtaError::Cancelled));
}

#[test]
fn results_print_one_line_per_query() {
    let mut ntta = countdown_network();
    let results = queries(
        &mut ntta,
        &["E F x == 0", "A G x >= 0"],
        PickStrategy::First,
    );
    let text = format!("{}", results);
    assert!(text.contains("E F x == 0: true\n"));
    assert!(text.contains("A G x >= 0: true\n"));
    // the witness trace is printed step by step
    assert!(text.contains("step 0:"));
    assert!(text.contains("Main @ L0"));
}

#[tokio::test]
async fn launch_runs_on_a_blocking_task() {
    let ntta = countdown_network();
    let warnings = Warnings::default();
    let queries = compile_queries(&["E F x == 0"], &warnings).unwrap();

    let results = launch_verification(ntta, queries, SearchSettings::default())
        .await
        .unwrap();
    assert!(results.outcomes[0].satisfied);
}
