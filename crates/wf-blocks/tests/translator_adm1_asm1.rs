//! End-to-end tests for the ADM1 to ASM1 translator: a digester effluent
//! fixed at the inlet, initialized and solved, checked against hand
//! balances of the outlet stream.

use proptest::prelude::*;
use wf_blocks::{InitializeOutcome, TranslatorAdm1Asm1, TranslatorConfig};
use wf_core::{k, m3pd, pa};
use wf_flowsheet::Flowsheet;
use wf_properties::{Adm1Component, Adm1State, Asm1Component, StateBlock};
use wf_solver::NewtonConfig;

/// Mesophilic digester effluent, concentrations in each component's own
/// basis (kg COD/m^3, kmol C/m^3 for S_IC, kmol N/m^3 for S_IN).
const INLET_CONCENTRATIONS: [(&str, f64); 24] = [
    ("S_su", 0.01195),
    ("S_aa", 0.00531),
    ("S_fa", 0.09862),
    ("S_va", 0.01168),
    ("S_bu", 0.01325),
    ("S_pro", 0.01578),
    ("S_ac", 0.19763),
    ("S_h2", 2.36e-7),
    ("S_ch4", 0.05509),
    ("S_IC", 0.15268),
    ("S_IN", 0.13023),
    ("S_I", 0.32870),
    ("X_c", 0.30870),
    ("X_ch", 0.02795),
    ("X_pr", 0.10260),
    ("X_li", 0.02948),
    ("X_su", 0.42017),
    ("X_aa", 1.17917),
    ("X_fa", 0.24304),
    ("X_c4", 0.43192),
    ("X_pro", 0.13731),
    ("X_ac", 0.76056),
    ("X_h2", 0.31702),
    ("X_I", 25.61739),
];

const FLOW_M3_PER_DAY: f64 = 178.4674;

fn table(symbol: &str) -> f64 {
    INLET_CONCENTRATIONS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, v)| *v)
        .unwrap()
}

fn sum(symbols: &[&str]) -> f64 {
    symbols.iter().map(|s| table(s)).sum()
}

fn steady_block() -> TranslatorAdm1Asm1 {
    let fs = Flowsheet::steady_state("sludge_train");
    TranslatorAdm1Asm1::new("asm_translator", &fs, TranslatorConfig::default()).unwrap()
}

fn fix_effluent_inlet(block: &mut TranslatorAdm1Asm1, t: usize) {
    let inlet = block.inlet_mut(t);
    inlet.fix_flow_vol(m3pd(FLOW_M3_PER_DAY));
    inlet.fix_temperature(k(308.15));
    inlet.fix_pressure(pa(101_325.0));
    for (symbol, value) in INLET_CONCENTRATIONS {
        let c = Adm1Component::from_symbol(symbol).unwrap();
        inlet.conc_mut(c).fix_at(value);
    }
}

fn outlet_conc(block: &TranslatorAdm1Asm1, symbol: &str) -> f64 {
    let c = Asm1Component::from_symbol(symbol).unwrap();
    block.outlet(0).conc(c).value()
}

#[test]
fn digester_effluent_translates_to_activated_sludge_feed() {
    let mut block = steady_block();
    fix_effluent_inlet(&mut block, 0);
    assert_eq!(block.degrees_of_freedom(), 0);

    let report = match block.initialize(None, None, &NewtonConfig::default()).unwrap() {
        InitializeOutcome::Solved(report) => report,
        other => panic!("expected a solve, got {other:?}"),
    };
    assert!(report.optimal, "termination = {}", report.termination);

    // Stream conditions pass through unchanged.
    let outlet = block.outlet(0);
    let inlet = block.inlet(0);
    assert!((outlet.flow_vol.value() - inlet.flow_vol.value()).abs() < 1e-12);
    assert!((outlet.temperature.value() - 308.15).abs() < 1e-9);
    assert!((outlet.pressure.value() - 101_325.0).abs() < 1e-6);

    // Inerts carry over.
    assert!((outlet_conc(&block, "S_I") - table("S_I")).abs() < 1e-9);
    assert!((outlet_conc(&block, "X_I") - table("X_I")).abs() < 1e-9);

    // COD lumping.
    let readily = sum(&["S_su", "S_aa", "S_fa", "S_va", "S_bu", "S_pro", "S_ac"]);
    assert!((outlet_conc(&block, "S_S") - readily).abs() < 1e-9);
    let slowly = sum(&[
        "X_c", "X_ch", "X_pr", "X_li", "X_su", "X_aa", "X_fa", "X_c4", "X_pro", "X_ac", "X_h2",
    ]);
    assert!((outlet_conc(&block, "X_S") - slowly).abs() < 1e-9);

    // Nitrogen mapping.
    let n_i = 0.06 / 14.0;
    let n_aa = 0.007;
    let n_bac = 0.08 / 14.0;
    assert!((outlet_conc(&block, "S_NH") - table("S_IN")).abs() < 1e-9);
    let s_nd = table("S_I") * n_i + table("S_I") * n_aa;
    assert!((outlet_conc(&block, "S_ND") - s_nd).abs() < 1e-9);
    let biomass = sum(&["X_su", "X_aa", "X_fa", "X_c4", "X_pro", "X_ac", "X_h2"]);
    let x_nd = n_bac * biomass
        + table("X_I") * n_i
        + table("X_c") * n_i
        + table("X_pr") * n_aa
        - table("X_I") * n_i * 0.06;
    assert!((outlet_conc(&block, "X_ND") - x_nd).abs() < 1e-9);

    // Alkalinity follows inorganic carbon.
    assert!((outlet.alkalinity.value() - table("S_IC")).abs() < 1e-9);

    // Components with no digester counterpart sit at trace level.
    for symbol in ["X_BH", "X_BA", "X_P", "S_O", "S_NO"] {
        let value = outlet_conc(&block, symbol);
        assert!((value - 1e-6).abs() < 1e-10, "{symbol} = {value}");
    }

    // The user-applied inlet fixing survives initialization.
    assert_eq!(inlet.free_count(), 0);
    assert_eq!(block.outlet(0).free_count(), 16);
}

#[test]
fn user_fixed_outlet_variable_leaves_initialization_incomplete() {
    let mut block = steady_block();
    // Inlet left free on purpose; the hold will pin it during the attempt.
    block.outlet_mut(0).conc_mut(Asm1Component::SS).fix_at(0.5);

    let outcome = block.initialize(None, None, &NewtonConfig::default()).unwrap();
    assert_eq!(
        outcome,
        InitializeOutcome::Incomplete {
            degrees_of_freedom: -1
        }
    );

    // The hold was released: the inlet is free again, the user's outlet
    // fixing is untouched.
    assert_eq!(block.inlet(0).free_count(), 27);
    assert!(block.outlet(0).conc(Asm1Component::SS).is_fixed());
}

#[test]
fn inlet_guess_seeds_free_variables_during_initialization() {
    let mut block = steady_block();
    let inlet = block.inlet_mut(0);
    inlet.fix_flow_vol(m3pd(FLOW_M3_PER_DAY));
    inlet.fix_temperature(k(308.15));
    inlet.fix_pressure(pa(101_325.0));
    for (symbol, value) in INLET_CONCENTRATIONS {
        // Acetate deliberately left free; the guess below supplies it.
        if symbol == "S_ac" {
            continue;
        }
        let c = Adm1Component::from_symbol(symbol).unwrap();
        inlet.conc_mut(c).fix_at(value);
    }

    let mut guess = Adm1State::new(true);
    guess.conc_mut(Adm1Component::SAc).set_value(0.5);

    let outcome = block.initialize(Some(&guess), None, &NewtonConfig::default()).unwrap();
    assert!(matches!(outcome, InitializeOutcome::Solved(ref r) if r.optimal));

    // The guess value was held through the solve and released afterwards.
    assert!(!block.inlet(0).conc(Adm1Component::SAc).is_fixed());
    assert_eq!(block.inlet(0).conc(Adm1Component::SAc).value(), 0.5);

    let readily_without_ac = sum(&["S_su", "S_aa", "S_fa", "S_va", "S_bu", "S_pro"]);
    let s_s = outlet_conc(&block, "S_S");
    assert!((s_s - (readily_without_ac + 0.5)).abs() < 1e-9);
}

#[test]
fn dynamic_flowsheet_builds_a_state_pair_per_time_point() {
    let fs = Flowsheet::dynamic("sludge_train", vec![0.0, 3600.0, 7200.0]).unwrap();
    let mut block =
        TranslatorAdm1Asm1::new("asm_translator", &fs, TranslatorConfig::default()).unwrap();
    assert_eq!(block.num_time_points(), 3);

    let flows = [170.0, 180.0, 190.0];
    for (t, flow) in flows.iter().enumerate() {
        fix_effluent_inlet(&mut block, t);
        block.inlet_mut(t).fix_flow_vol(m3pd(*flow));
    }
    assert_eq!(block.degrees_of_freedom(), 0);

    let outcome = block.initialize(None, None, &NewtonConfig::default()).unwrap();
    assert!(matches!(outcome, InitializeOutcome::Solved(ref r) if r.optimal));

    for (t, flow) in flows.iter().enumerate() {
        let got = block.outlet(t).flow_vol.value() * 86_400.0;
        assert!((got - flow).abs() < 1e-6, "t={t}: {got} m3/d");
    }
    assert_eq!(block.residuals().len(), 48);
}

#[test]
fn translation_report_serialises() {
    let mut block = steady_block();
    fix_effluent_inlet(&mut block, 0);
    let solve = block.solve(&NewtonConfig::default()).unwrap();
    let report = block.report(solve, 0);

    let json = serde_json::to_string_pretty(&report).unwrap();
    let parsed: wf_blocks::TranslationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
    assert_eq!(parsed.block, "asm_translator");
    assert_eq!(parsed.outlet.concentrations.len(), 12);
    assert!(parsed.outlet.alkalinity_kmol_per_m3.is_some());
    assert!(parsed.inlet.alkalinity_kmol_per_m3.is_none());
    assert!((parsed.inlet.flow_m3_per_day - FLOW_M3_PER_DAY).abs() < 1e-9);
}

proptest! {
    /// The COD and nitrogen pass-throughs hold for arbitrary effluent
    /// compositions, not just the nominal one.
    #[test]
    fn lumping_balances_hold_for_random_effluents(
        concs in proptest::collection::vec(0.0f64..30.0, 24),
        flow in 50.0f64..500.0,
    ) {
        let mut block = steady_block();
        let inlet = block.inlet_mut(0);
        inlet.fix_flow_vol(m3pd(flow));
        inlet.fix_temperature(k(308.15));
        inlet.fix_pressure(pa(101_325.0));
        for (i, c) in Adm1Component::ALL.iter().enumerate() {
            inlet.conc_mut(*c).fix_at(concs[i]);
        }

        let report = block.solve(&NewtonConfig::default()).unwrap();
        prop_assert!(report.optimal);

        let lookup = |c: Adm1Component| block.inlet(0).conc(c).value();
        let readily: f64 = wf_blocks::READILY_BIODEGRADABLE.iter().map(|&c| lookup(c)).sum();
        let slowly: f64 = wf_blocks::SLOWLY_BIODEGRADABLE.iter().map(|&c| lookup(c)).sum();
        prop_assert!((outlet_conc(&block, "S_S") - readily).abs() < 1e-7);
        prop_assert!((outlet_conc(&block, "X_S") - slowly).abs() < 1e-7);
        prop_assert!((outlet_conc(&block, "S_NH") - lookup(Adm1Component::SIN)).abs() < 1e-7);
        prop_assert!(
            (block.outlet(0).alkalinity.value() - lookup(Adm1Component::SIC)).abs() < 1e-7
        );
    }
}
