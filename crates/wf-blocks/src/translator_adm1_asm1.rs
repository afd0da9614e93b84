//! ADM1 to ASM1 stream translator block.
//!
//! Connects an anaerobic digester effluent (ADM1 basis) to an activated
//! sludge train (ASM1 basis). COD is conserved by carrying the inerts over
//! and lumping the remaining substrates into the readily and slowly
//! biodegradable pools; nitrogen follows the composition parameters; the
//! ASM1 components with no digester counterpart are pinned at a trace
//! concentration.

use nalgebra::DVector;
use tracing::{info, info_span, warn};
use wf_core::Real;
use wf_flowsheet::{ExportedVariable, Flowsheet};
use wf_properties::adm1::Adm1Component;
use wf_properties::asm1::Asm1Component;
use wf_properties::{Adm1State, Asm1State, PropertyPackage, StateBlock, StateFlags};
use wf_solver::{AlgebraicSystem, NewtonConfig, solve_square};

use crate::config::TranslatorConfig;
use crate::error::BlockResult;
use crate::report::{SolveReport, StreamSummary, TranslationReport};

/// ADM1 substrates lumped into readily biodegradable COD (`S_S`).
pub const READILY_BIODEGRADABLE: [Adm1Component; 7] = [
    Adm1Component::SSu,
    Adm1Component::SAa,
    Adm1Component::SFa,
    Adm1Component::SVa,
    Adm1Component::SBu,
    Adm1Component::SPro,
    Adm1Component::SAc,
];

/// ADM1 particulates lumped into slowly biodegradable COD (`X_S`).
pub const SLOWLY_BIODEGRADABLE: [Adm1Component; 11] = [
    Adm1Component::XC,
    Adm1Component::XCh,
    Adm1Component::XPr,
    Adm1Component::XLi,
    Adm1Component::XSu,
    Adm1Component::XAa,
    Adm1Component::XFa,
    Adm1Component::XC4,
    Adm1Component::XPro,
    Adm1Component::XAc,
    Adm1Component::XH2,
];

/// The seven ADM1 biomass groups, the organic nitrogen carriers in the
/// particulate balance.
pub const BIOMASS_GROUPS: [Adm1Component; 7] = [
    Adm1Component::XSu,
    Adm1Component::XAa,
    Adm1Component::XFa,
    Adm1Component::XC4,
    Adm1Component::XPro,
    Adm1Component::XAc,
    Adm1Component::XH2,
];

/// ASM1 components with no digester counterpart, pinned at trace level.
pub const ZERO_FLOW_COMPONENTS: [Asm1Component; 5] = [
    Asm1Component::XBH,
    Asm1Component::XBA,
    Asm1Component::XP,
    Asm1Component::SO,
    Asm1Component::SNO,
];

/// Concentration assigned to the zero-flow components, kg/m^3.
pub const TRACE_CONCENTRATION: Real = 1e-6;

/// Constraints written per time point.
pub const CONSTRAINTS_PER_TIME: usize = 16;

/// Constraint names in residual order.
pub const CONSTRAINT_NAMES: [&str; CONSTRAINTS_PER_TIME] = [
    "flow_vol_equality",
    "temperature_equality",
    "pressure_equality",
    "S_I_equality",
    "X_I_equality",
    "S_S_lumping",
    "X_S_lumping",
    "S_NH_from_S_IN",
    "S_ND_from_S_I",
    "X_ND_balance",
    "alkalinity_from_S_IC",
    "X_BH_trace",
    "X_BA_trace",
    "X_P_trace",
    "S_O_trace",
    "S_NO_trace",
];

/// Composition parameters of the nitrogen mapping.
///
/// Mutable through [`TranslatorAdm1Asm1::params_mut`] so plant-specific
/// compositions can be applied before solving.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorParams {
    /// Nitrogen content of inert COD, kmol N/kg COD.
    pub n_i: Real,
    /// Nitrogen content of amino acids and proteins, kg N/kg COD.
    pub n_aa: Real,
    /// Nitrogen content of biomass, kmol N/kg COD.
    pub n_bac: Real,
    /// Correction fraction applied to the particulate inert nitrogen term
    /// (dimensionless).
    pub i_ec: Real,
}

impl Default for TranslatorParams {
    fn default() -> Self {
        Self {
            n_i: 0.06 / 14.0,
            n_aa: 0.007,
            n_bac: 0.08 / 14.0,
            i_ec: 0.06,
        }
    }
}

/// Evaluate the 16 translation residuals for one inlet/outlet pair.
fn residuals_into(
    params: &TranslatorParams,
    inlet: &Adm1State,
    outlet: &Asm1State,
    out: &mut [Real],
) {
    use Adm1Component as In;
    use Asm1Component as Out;

    debug_assert_eq!(out.len(), CONSTRAINTS_PER_TIME);
    let conc_in = |c: In| inlet.conc(c).value();
    let conc_out = |c: Out| outlet.conc(c).value();

    out[0] = outlet.flow_vol.value() - inlet.flow_vol.value();
    out[1] = outlet.temperature.value() - inlet.temperature.value();
    out[2] = outlet.pressure.value() - inlet.pressure.value();

    // Inerts pass through unchanged.
    out[3] = conc_out(Out::SI) - conc_in(In::SI);
    out[4] = conc_out(Out::XI) - conc_in(In::XI);

    // COD lumping.
    out[5] = conc_out(Out::SS)
        - READILY_BIODEGRADABLE
            .iter()
            .map(|&c| conc_in(c))
            .sum::<Real>();
    out[6] = conc_out(Out::XS)
        - SLOWLY_BIODEGRADABLE
            .iter()
            .map(|&c| conc_in(c))
            .sum::<Real>();

    // Nitrogen mapping.
    out[7] = conc_out(Out::SNH) - conc_in(In::SIN);
    out[8] = conc_out(Out::SND) - (conc_in(In::SI) * params.n_i + conc_in(In::SI) * params.n_aa);
    let biomass_cod: Real = BIOMASS_GROUPS.iter().map(|&c| conc_in(c)).sum();
    out[9] = conc_out(Out::XND)
        - (params.n_bac * biomass_cod
            + conc_in(In::XI) * params.n_i
            + conc_in(In::XC) * params.n_i
            + conc_in(In::XPr) * params.n_aa
            - conc_in(In::XI) * params.n_i * params.i_ec);

    out[10] = outlet.alkalinity.value() - conc_in(In::SIC);

    for (k, &c) in ZERO_FLOW_COMPONENTS.iter().enumerate() {
        out[11 + k] = conc_out(c) - TRACE_CONCENTRATION;
    }
}

/// Outcome of block initialization.
#[derive(Debug, Clone, PartialEq)]
pub enum InitializeOutcome {
    /// The block was exactly determined and a solve ran to completion
    /// (check the report for the termination condition).
    Solved(SolveReport),
    /// Degrees of freedom were nonzero, so no solve ran. The caller must
    /// fix or free variables to close the balance.
    Incomplete { degrees_of_freedom: i64 },
}

/// The translator unit: one ADM1 inlet state and one ASM1 outlet state per
/// flowsheet time point, linked by the 16 translation constraints.
#[derive(Debug, Clone)]
pub struct TranslatorAdm1Asm1 {
    name: String,
    config: TranslatorConfig,
    params: TranslatorParams,
    properties_in: Vec<Adm1State>,
    properties_out: Vec<Asm1State>,
}

impl TranslatorAdm1Asm1 {
    /// Build the block against a flowsheet, one inlet/outlet state pair per
    /// time point.
    pub fn new(
        name: impl Into<String>,
        flowsheet: &Flowsheet,
        config: TranslatorConfig,
    ) -> BlockResult<Self> {
        config.validate()?;
        let nt = flowsheet.time().len();
        let mut properties_in = Vec::with_capacity(nt);
        let mut properties_out = Vec::with_capacity(nt);
        for _ in flowsheet.time().indices() {
            properties_in.push(config.inlet_package.build_state(true, &config.inlet_args)?);
            properties_out.push(
                config
                    .outlet_package
                    .build_state(config.outlet_state_defined, &config.outlet_args)?,
            );
        }
        Ok(Self {
            name: name.into(),
            config,
            params: TranslatorParams::default(),
            properties_in,
            properties_out,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn params(&self) -> &TranslatorParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut TranslatorParams {
        &mut self.params
    }

    pub fn num_time_points(&self) -> usize {
        self.properties_in.len()
    }

    pub fn inlet(&self, t: usize) -> &Adm1State {
        &self.properties_in[t]
    }

    pub fn inlet_mut(&mut self, t: usize) -> &mut Adm1State {
        &mut self.properties_in[t]
    }

    pub fn outlet(&self, t: usize) -> &Asm1State {
        &self.properties_out[t]
    }

    pub fn outlet_mut(&mut self, t: usize) -> &mut Asm1State {
        &mut self.properties_out[t]
    }

    /// Number of free variables across all state blocks.
    pub fn free_var_count(&self) -> usize {
        let inlet: usize = self.properties_in.iter().map(StateBlock::free_count).sum();
        let outlet: usize = self.properties_out.iter().map(StateBlock::free_count).sum();
        inlet + outlet
    }

    /// Free variables minus constraints. Zero means the block is ready to
    /// solve.
    pub fn degrees_of_freedom(&self) -> i64 {
        self.free_var_count() as i64 - (CONSTRAINTS_PER_TIME * self.properties_in.len()) as i64
    }

    /// All residuals at the current values, stacked per time point in
    /// constraint order.
    pub fn residuals(&self) -> DVector<Real> {
        let nt = self.properties_in.len();
        let mut out = DVector::zeros(CONSTRAINTS_PER_TIME * nt);
        let slice = out.as_mut_slice();
        for t in 0..nt {
            residuals_into(
                &self.params,
                &self.properties_in[t],
                &self.properties_out[t],
                &mut slice[t * CONSTRAINTS_PER_TIME..(t + 1) * CONSTRAINTS_PER_TIME],
            );
        }
        out
    }

    /// Named residual values for one time point, for diagnostics.
    pub fn constraint_report(&self, t: usize) -> Vec<(&'static str, Real)> {
        let mut out = [0.0; CONSTRAINTS_PER_TIME];
        residuals_into(
            &self.params,
            &self.properties_in[t],
            &self.properties_out[t],
            &mut out,
        );
        CONSTRAINT_NAMES.iter().copied().zip(out).collect()
    }

    /// Values of the free variables across all blocks, inlets first.
    fn pack_free(&self) -> Vec<Real> {
        let mut out = Vec::with_capacity(self.free_var_count());
        for s in &self.properties_in {
            s.pack_free(&mut out);
        }
        for s in &self.properties_out {
            s.pack_free(&mut out);
        }
        out
    }

    fn unpack_free(&mut self, x: &[Real]) {
        let mut cursor = 0;
        for s in &mut self.properties_in {
            s.unpack_free(x, &mut cursor);
        }
        for s in &mut self.properties_out {
            s.unpack_free(x, &mut cursor);
        }
        debug_assert_eq!(cursor, x.len());
    }

    /// Solve the translation equations for the free variables.
    ///
    /// The block must be exactly determined, which in practice means a
    /// fully fixed inlet and a fully free outlet. State values are
    /// validated first, so a non-finite or negative inlet fails before any
    /// iteration. The best iterate is written back even when the iteration
    /// stops short; the report says how it ended.
    pub fn solve(&mut self, config: &NewtonConfig) -> BlockResult<SolveReport> {
        for s in &self.properties_in {
            s.validate()?;
        }
        for s in &self.properties_out {
            s.validate()?;
        }
        let outcome = solve_square(&TranslatorSystem { block: self }, config)?;
        self.unpack_free(outcome.x.as_slice());
        Ok(SolveReport::from_outcome(&outcome))
    }

    /// Two-stage initialization: hold the inlet, seed the outlet, solve if
    /// exactly determined, then release the inlet to its pre-hold pattern.
    ///
    /// `inlet_guess` and `outlet_guess` seed the free variables before the
    /// solve; package defaults are used when absent. The inlet hold is
    /// always released, whether or not the solve succeeded.
    pub fn initialize(
        &mut self,
        inlet_guess: Option<&Adm1State>,
        outlet_guess: Option<&Asm1State>,
        config: &NewtonConfig,
    ) -> BlockResult<InitializeOutcome> {
        let _span = info_span!("initialize", block = %self.name).entered();

        let default_in = self
            .config
            .inlet_package
            .build_state(true, &self.config.inlet_args)?;
        let default_out = self
            .config
            .outlet_package
            .build_state(self.config.outlet_state_defined, &self.config.outlet_args)?;
        let seed_in = inlet_guess.unwrap_or(&default_in);
        let seed_out = outlet_guess.unwrap_or(&default_out);

        let mut flags: Vec<StateFlags> = Vec::with_capacity(self.properties_in.len());
        for state in &mut self.properties_in {
            state.seed_from(seed_in);
            flags.push(state.hold_state());
        }
        for state in &mut self.properties_out {
            state.seed_from(seed_out);
        }

        let dof = self.degrees_of_freedom();
        let result = if dof == 0 {
            self.solve(config).map(InitializeOutcome::Solved)
        } else {
            warn!(
                degrees_of_freedom = dof,
                "initialization incomplete; fix or free state variables to close the balance"
            );
            Ok(InitializeOutcome::Incomplete {
                degrees_of_freedom: dof,
            })
        };

        // The hold must be undone on every path, including solver setup
        // errors.
        for (state, f) in self.properties_in.iter_mut().zip(&flags) {
            state.release_state(f);
        }

        if let Ok(InitializeOutcome::Solved(report)) = &result {
            info!(
                condition = %report.termination,
                iterations = report.iterations,
                residual_norm = report.residual_norm,
                "initialization complete"
            );
        }
        result
    }

    /// Inlet stream snapshot in engineering units.
    pub fn inlet_summary(&self, t: usize) -> StreamSummary {
        let s = &self.properties_in[t];
        StreamSummary {
            flow_m3_per_day: StreamSummary::flow_to_daily(s.flow_vol.value()),
            temperature_k: s.temperature.value(),
            pressure_pa: s.pressure.value(),
            concentrations: Adm1Component::ALL
                .iter()
                .map(|&c| (c.symbol().to_string(), s.conc(c).value()))
                .collect(),
            alkalinity_kmol_per_m3: None,
        }
    }

    /// Outlet stream snapshot in engineering units.
    pub fn outlet_summary(&self, t: usize) -> StreamSummary {
        let s = &self.properties_out[t];
        StreamSummary {
            flow_m3_per_day: StreamSummary::flow_to_daily(s.flow_vol.value()),
            temperature_k: s.temperature.value(),
            pressure_pa: s.pressure.value(),
            concentrations: Asm1Component::ALL
                .iter()
                .map(|&c| (c.symbol().to_string(), s.conc(c).value()))
                .collect(),
            alkalinity_kmol_per_m3: Some(s.alkalinity.value()),
        }
    }

    /// Assemble the full translation report for one time point.
    pub fn report(&self, solve: SolveReport, t: usize) -> TranslationReport {
        TranslationReport {
            block: self.name.clone(),
            solve,
            inlet: self.inlet_summary(t),
            outlet: self.outlet_summary(t),
        }
    }

    /// Contribute this block's stream variables to a flowsheet interface.
    /// Inlet entries are editable inputs; outlet entries are read only.
    pub fn export_variables(&self, t: usize) -> Vec<ExportedVariable> {
        let mut vars = Vec::new();
        let inlet = &self.properties_in[t];
        for i in 0..inlet.var_count() {
            let name = inlet.var_name(i);
            vars.push(ExportedVariable {
                name: format!("{}.inlet.{}", self.name, name),
                display_name: display_name(name),
                units: adm1_units(name).to_string(),
                value: inlet.var(i).value(),
                fixed: inlet.var(i).is_fixed(),
                read_only: false,
            });
        }
        let outlet = &self.properties_out[t];
        for i in 0..outlet.var_count() {
            let name = outlet.var_name(i);
            vars.push(ExportedVariable {
                name: format!("{}.outlet.{}", self.name, name),
                display_name: display_name(name),
                units: asm1_units(name).to_string(),
                value: outlet.var(i).value(),
                fixed: outlet.var(i).is_fixed(),
                read_only: true,
            });
        }
        vars
    }
}

/// View of the translator as a square algebraic system over its free
/// variables.
struct TranslatorSystem<'a> {
    block: &'a TranslatorAdm1Asm1,
}

impl AlgebraicSystem for TranslatorSystem<'_> {
    fn dimension(&self) -> usize {
        self.block.free_var_count()
    }

    fn residual_count(&self) -> usize {
        CONSTRAINTS_PER_TIME * self.block.properties_in.len()
    }

    fn initial_guess(&self) -> DVector<Real> {
        DVector::from_vec(self.block.pack_free())
    }

    fn residuals(&self, x: &DVector<Real>) -> DVector<Real> {
        // Scratch copy keeps evaluation pure for the parallel Jacobian.
        let mut scratch = self.block.clone();
        scratch.unpack_free(x.as_slice());
        scratch.residuals()
    }
}

fn display_name(var: &str) -> String {
    match var {
        "flow_vol" => "Volumetric flow".to_string(),
        "temperature" => "Temperature".to_string(),
        "pressure" => "Pressure".to_string(),
        "alkalinity" => "Alkalinity".to_string(),
        symbol => format!("{symbol} concentration"),
    }
}

fn adm1_units(var: &str) -> &'static str {
    match var {
        "flow_vol" => "m3/s",
        "temperature" => "K",
        "pressure" => "Pa",
        "S_IC" => "kmol C/m3",
        "S_IN" => "kmol N/m3",
        _ => "kg COD/m3",
    }
}

fn asm1_units(var: &str) -> &'static str {
    match var {
        "flow_vol" => "m3/s",
        "temperature" => "K",
        "pressure" => "Pa",
        "alkalinity" => "kmol/m3",
        "S_NO" | "S_NH" | "S_ND" | "X_ND" => "kg N/m3",
        _ => "kg COD/m3",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlockError;
    use wf_core::{k, m3pd, pa};
    use wf_solver::SolverError;

    fn steady_block() -> TranslatorAdm1Asm1 {
        let fs = Flowsheet::steady_state("fs");
        TranslatorAdm1Asm1::new("asm_translator", &fs, TranslatorConfig::default()).unwrap()
    }

    fn fix_inlet(block: &mut TranslatorAdm1Asm1, t: usize) {
        let inlet = block.inlet_mut(t);
        inlet.fix_flow_vol(m3pd(178.4674));
        inlet.fix_temperature(k(308.15));
        inlet.fix_pressure(pa(101_325.0));
        inlet.fix_all_conc();
    }

    #[test]
    fn fresh_block_has_27_degrees_of_freedom() {
        let block = steady_block();
        assert_eq!(block.free_var_count(), 27 + 16);
        assert_eq!(block.degrees_of_freedom(), 27);
    }

    #[test]
    fn fully_fixed_inlet_closes_the_balance() {
        let mut block = steady_block();
        fix_inlet(&mut block, 0);
        assert_eq!(block.degrees_of_freedom(), 0);
    }

    #[test]
    fn new_rejects_dynamic_config() {
        let fs = Flowsheet::steady_state("fs");
        let config = TranslatorConfig {
            dynamic: true,
            ..TranslatorConfig::default()
        };
        assert!(matches!(
            TranslatorAdm1Asm1::new("t", &fs, config),
            Err(BlockError::Config { .. })
        ));
    }

    #[test]
    fn soluble_inert_nitrogen_coefficient() {
        // With S_I = 1, the soluble organic nitrogen comes out at
        // N_I + N_aa = 0.06/14 + 0.007.
        let mut block = steady_block();
        block.inlet_mut(0).conc_mut(Adm1Component::SI).set_value(1.0);
        fix_inlet(&mut block, 0);
        let outcome = block.initialize(None, None, &NewtonConfig::default()).unwrap();
        match outcome {
            InitializeOutcome::Solved(report) => assert!(report.optimal),
            other => panic!("expected a solve, got {other:?}"),
        }
        let s_nd = block.outlet(0).conc(Asm1Component::SND).value();
        assert!((s_nd - (0.06 / 14.0 + 0.007)).abs() < 1e-9, "S_ND = {s_nd}");
    }

    #[test]
    fn inert_correction_parameter_shifts_particulate_nitrogen() {
        let mut block = steady_block();
        fix_inlet(&mut block, 0);
        block.solve(&NewtonConfig::default()).unwrap();
        let x_nd_before = block.outlet(0).conc(Asm1Component::XND).value();

        block.params_mut().i_ec = 0.0;
        block.solve(&NewtonConfig::default()).unwrap();
        let x_nd_after = block.outlet(0).conc(Asm1Component::XND).value();

        let x_i = block.inlet(0).conc(Adm1Component::XI).value();
        let expected_delta = x_i * (0.06 / 14.0) * 0.06;
        assert!((x_nd_after - x_nd_before - expected_delta).abs() < 1e-9);
    }

    #[test]
    fn solve_requires_square_system() {
        let mut block = steady_block();
        // 27 spare degrees of freedom: structural error, not a status.
        match block.solve(&NewtonConfig::default()) {
            Err(BlockError::Solver(SolverError::NotSquare {
                variables,
                residuals,
            })) => {
                assert_eq!(variables, 43);
                assert_eq!(residuals, 16);
            }
            other => panic!("expected NotSquare, got {other:?}"),
        }
    }

    #[test]
    fn solve_rejects_non_physical_inlet() {
        let mut block = steady_block();
        fix_inlet(&mut block, 0);
        block.inlet_mut(0).conc_mut(Adm1Component::SAc).fix_at(-1.0);
        assert!(matches!(
            block.solve(&NewtonConfig::default()),
            Err(BlockError::Property(_))
        ));
    }

    #[test]
    fn residuals_vanish_after_solve() {
        let mut block = steady_block();
        fix_inlet(&mut block, 0);
        let report = block.solve(&NewtonConfig::default()).unwrap();
        assert!(report.optimal);
        for (name, value) in block.constraint_report(0) {
            assert!(value.abs() < 1e-8, "{name} residual = {value}");
        }
    }

    #[test]
    fn exported_variables_cover_both_streams() {
        let block = steady_block();
        let vars = block.export_variables(0);
        assert_eq!(vars.len(), 27 + 16);

        let s_in = vars
            .iter()
            .find(|v| v.name == "asm_translator.inlet.S_IN")
            .unwrap();
        assert_eq!(s_in.units, "kmol N/m3");
        assert!(!s_in.read_only);

        let alk = vars
            .iter()
            .find(|v| v.name == "asm_translator.outlet.alkalinity")
            .unwrap();
        assert_eq!(alk.units, "kmol/m3");
        assert!(alk.read_only);
        assert_eq!(alk.display_name, "Alkalinity");
    }

    #[test]
    fn constraint_names_line_up_with_residuals() {
        let block = steady_block();
        let rows = block.constraint_report(0);
        assert_eq!(rows.len(), CONSTRAINTS_PER_TIME);
        assert_eq!(rows[0].0, "flow_vol_equality");
        assert_eq!(rows[15].0, "S_NO_trace");
    }
}
