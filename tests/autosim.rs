// tests/autosim.rs

use llamma_simulator::{
    ConfigurationError, SimConfig, SimController, SimError, SimLlamma, SimMode, UserLoan, Value,
    WAD, autosim, generate_prices,
};

fn controller() -> SimController {
    SimController::default().with_loans(vec![
        UserLoan::new("alice", 10 * WAD, 15_000 * WAD, 2, 11),
        UserLoan::new("bob", 4 * WAD, 5_000 * WAD, 6, 15),
    ])
}

#[test]
fn pool_sweep_reports_every_combination() {
    // Arrange
    let pool = SimLlamma::new(100, 0, 0, 2_000 * WAD);
    let prices = generate_prices(2_000.0, 300.0, 60, 1_700_000_000).unwrap();
    let config = SimConfig::from_json_str(
        r#"{"total_y": 1000.0, "variable_params": {"A": [50, 100, 150], "fee": [0, 6000000000000000]}}"#,
    )
    .unwrap();

    // Act
    let results = autosim(&pool, &controller(), &prices, SimMode::Pool, &config).unwrap();

    // Assert
    assert_eq!(results.mode, SimMode::Pool);
    assert_eq!(results.runs.len(), 6);
    for run in &results.runs {
        let a = run.parameters["A"];
        assert_eq!(
            run.results.sim_parameters.column("A").map(|c| c[0].clone()),
            Some(Value::Int(a)),
            "snapshot reflects the applied parameters"
        );
        assert_eq!(run.results.state_data.len(), 60);
        let change = run.results.summary.column_f64("pool_value_change").unwrap()[0];
        assert!(change.is_finite());
    }
}

#[test]
fn controller_sweep_seeds_from_loans() {
    let pool = SimLlamma::new(100, 0, 0, 2_000 * WAD);
    let prices = generate_prices(2_000.0, 150.0, 40, 0).unwrap();
    let mut config = SimConfig::default();
    config.variable_params.insert(
        "loan_discount".to_string(),
        serde_json::json!([5 * 10i64.pow(16), 9 * 10i64.pow(16)]),
    );

    let results = autosim(&pool, &controller(), &prices, SimMode::Controller, &config).unwrap();

    assert_eq!(results.runs.len(), 2);
    let state = &results.runs[0].results.state_data;
    assert_eq!(state.column("n_loans").map(|c| c[0].clone()), Some(Value::Int(2)));
    assert_eq!(
        results.runs[1].results.sim_parameters.column("loan_discount").map(|c| c[0].clone()),
        Some(Value::Amount(9 * 10u128.pow(16)))
    );
}

#[test]
fn sparse_prices_are_interpolated_before_the_run() {
    let pool = SimLlamma::new(100, 0, 0, 2_000 * WAD);
    // samples 300 s apart, capped at 100 s: two extra points per gap
    let prices = generate_prices(2_000.0, 100.0, 5, 0).unwrap();
    let config = SimConfig {
        prices_max_interval: 100,
        ..SimConfig::default()
    };

    let results = autosim(&pool, &controller(), &prices, SimMode::Pool, &config).unwrap();

    assert_eq!(results.runs[0].results.state_data.len(), 13);
}

#[test]
fn unknown_sweep_keys_are_rejected() {
    let pool = SimLlamma::default();
    let prices = generate_prices(2_000.0, 100.0, 5, 0).unwrap();
    let mut config = SimConfig::default();
    config
        .variable_params
        .insert("N".to_string(), serde_json::json!([10]));

    let result = autosim(&pool, &controller(), &prices, SimMode::Pool, &config);

    assert!(matches!(
        result,
        Err(SimError::Configuration(ConfigurationError::UnexpectedParameter { .. }))
    ));
}

#[test]
fn results_serialize_to_json() {
    let pool = SimLlamma::new(100, 0, 0, 2_000 * WAD);
    let prices = generate_prices(2_000.0, 200.0, 10, 0).unwrap();
    let config = SimConfig {
        test: true,
        ..SimConfig::default()
    };

    let results = autosim(&pool, &controller(), &prices, SimMode::Pool, &config).unwrap();
    let json = serde_json::to_value(&results).unwrap();

    assert_eq!(json["mode"], "Pool");
    assert_eq!(json["runs"].as_array().map(Vec::len), Some(2));
    assert!(json["runs"][0]["results"]["summary"]["columns"].is_array());
}

#[test]
fn n_mode_without_a_band_count_fits_the_path() {
    // Arrange: the CLI's default series, 2000 falling to 1600, needs ~23 bands at A = 100
    let pool = SimLlamma::new(100, 0, 0, 2_000 * WAD);
    let prices = generate_prices(2_000.0, 400.0, 50, 0).unwrap();

    // Act
    let plain = autosim(&pool, &controller(), &prices, SimMode::N, &SimConfig::default()).unwrap();
    let test = SimConfig {
        test: true,
        ..SimConfig::default()
    };
    let reduced = autosim(&pool, &controller(), &prices, SimMode::N, &test).unwrap();

    // Assert
    for results in [&plain, &reduced] {
        assert_eq!(results.runs.len(), 1);
        let n = results.runs[0]
            .results
            .sim_parameters
            .column("N")
            .and_then(|c| c[0].as_int())
            .unwrap();
        assert!(n >= 20, "N covers the whole path, got {n}");
    }
}

