//! Anaerobic Digestion Model no. 1 (ADM1) component basis and state block.

use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;
use uom::si::volume_rate::cubic_meter_per_second;
use wf_core::units::SECONDS_PER_DAY;
use wf_core::{Pressure, Real, Temperature, Var, VolumeRate};

use crate::error::PropertyResult;
use crate::package::{
    PackageArgs, PropertyPackage, StateBlock, check_common_args, check_nonnegative, check_positive,
};

/// The 24 ADM1 components.
///
/// Soluble species carry an `S_` symbol, particulates an `X_`.
/// Concentrations are kg COD/m^3 except the two inorganic pools:
/// `S_IC` is kmol C/m^3 and `S_IN` is kmol N/m^3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adm1Component {
    SSu,
    SAa,
    SFa,
    SVa,
    SBu,
    SPro,
    SAc,
    SH2,
    SCh4,
    SIC,
    SIN,
    SI,
    XC,
    XCh,
    XPr,
    XLi,
    XSu,
    XAa,
    XFa,
    XC4,
    XPro,
    XAc,
    XH2,
    XI,
}

const SYMBOLS: [&str; Adm1Component::COUNT] = [
    "S_su", "S_aa", "S_fa", "S_va", "S_bu", "S_pro", "S_ac", "S_h2", "S_ch4", "S_IC", "S_IN",
    "S_I", "X_c", "X_ch", "X_pr", "X_li", "X_su", "X_aa", "X_fa", "X_c4", "X_pro", "X_ac", "X_h2",
    "X_I",
];

impl Adm1Component {
    pub const COUNT: usize = 24;

    /// All components in canonical order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::SSu,
        Self::SAa,
        Self::SFa,
        Self::SVa,
        Self::SBu,
        Self::SPro,
        Self::SAc,
        Self::SH2,
        Self::SCh4,
        Self::SIC,
        Self::SIN,
        Self::SI,
        Self::XC,
        Self::XCh,
        Self::XPr,
        Self::XLi,
        Self::XSu,
        Self::XAa,
        Self::XFa,
        Self::XC4,
        Self::XPro,
        Self::XAc,
        Self::XH2,
        Self::XI,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The literature symbol, e.g. `"S_ac"`.
    pub fn symbol(self) -> &'static str {
        SYMBOLS[self as usize]
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.symbol() == symbol)
    }
}

impl std::fmt::Display for Adm1Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Default concentrations seeding free variables, a representative
/// mesophilic digester effluent.
fn default_conc(c: Adm1Component) -> Real {
    use Adm1Component::*;
    match c {
        SSu => 0.011955,
        SAa => 0.005314,
        SFa => 0.098621,
        SVa => 0.011685,
        SBu => 0.013251,
        SPro => 0.015776,
        SAc => 0.197630,
        SH2 => 2.36e-7,
        SCh4 => 0.055088,
        SIC => 0.152678,
        SIN => 0.130230,
        SI => 0.328697,
        XC => 0.308698,
        XCh => 0.027947,
        XPr => 0.102600,
        XLi => 0.029483,
        XSu => 0.420166,
        XAa => 1.179171,
        XFa => 0.243035,
        XC4 => 0.431921,
        XPro => 0.137305,
        XAc => 0.760562,
        XH2 => 0.317022,
        XI => 25.617391,
    }
}

const DEFAULT_FLOW_M3_PER_DAY: Real = 178.4674;
const DEFAULT_TEMPERATURE_K: Real = 308.15;
const DEFAULT_PRESSURE_PA: Real = 101_325.0;

/// State variables of one ADM1 stream at one time point: volumetric flow
/// (m^3/s), temperature (K), pressure (Pa), and the 24 component
/// concentrations.
#[derive(Debug, Clone, PartialEq)]
pub struct Adm1State {
    pub flow_vol: Var,
    pub temperature: Var,
    pub pressure: Var,
    conc: [Var; Adm1Component::COUNT],
    defined_state: bool,
}

impl Adm1State {
    pub fn new(defined_state: bool) -> Self {
        Self {
            flow_vol: Var::new(DEFAULT_FLOW_M3_PER_DAY / SECONDS_PER_DAY),
            temperature: Var::new(DEFAULT_TEMPERATURE_K),
            pressure: Var::new(DEFAULT_PRESSURE_PA),
            conc: std::array::from_fn(|i| Var::new(default_conc(Adm1Component::ALL[i]))),
            defined_state,
        }
    }

    pub fn conc(&self, c: Adm1Component) -> &Var {
        &self.conc[c.index()]
    }

    pub fn conc_mut(&mut self, c: Adm1Component) -> &mut Var {
        &mut self.conc[c.index()]
    }

    pub fn fix_flow_vol(&mut self, q: VolumeRate) {
        self.flow_vol.fix_at(q.get::<cubic_meter_per_second>());
    }

    pub fn fix_temperature(&mut self, t: Temperature) {
        self.temperature.fix_at(t.get::<kelvin>());
    }

    pub fn fix_pressure(&mut self, p: Pressure) {
        self.pressure.fix_at(p.get::<pascal>());
    }

    /// Fix every concentration at its current value.
    pub fn fix_all_conc(&mut self) {
        for v in &mut self.conc {
            v.fix();
        }
    }

    /// Check every state variable is finite and physically meaningful:
    /// nonnegative flow and concentrations, positive temperature and
    /// pressure.
    pub fn validate(&self) -> PropertyResult<()> {
        check_nonnegative("flow_vol", self.flow_vol.value())?;
        check_positive("temperature", self.temperature.value())?;
        check_positive("pressure", self.pressure.value())?;
        for c in Adm1Component::ALL {
            check_nonnegative(c.symbol(), self.conc(c).value())?;
        }
        Ok(())
    }
}

impl StateBlock for Adm1State {
    fn var_count(&self) -> usize {
        3 + Adm1Component::COUNT
    }

    fn var(&self, i: usize) -> &Var {
        match i {
            0 => &self.flow_vol,
            1 => &self.temperature,
            2 => &self.pressure,
            _ => &self.conc[i - 3],
        }
    }

    fn var_mut(&mut self, i: usize) -> &mut Var {
        match i {
            0 => &mut self.flow_vol,
            1 => &mut self.temperature,
            2 => &mut self.pressure,
            _ => &mut self.conc[i - 3],
        }
    }

    fn var_name(&self, i: usize) -> &'static str {
        match i {
            0 => "flow_vol",
            1 => "temperature",
            2 => "pressure",
            _ => SYMBOLS[i - 3],
        }
    }

    fn is_defined_state(&self) -> bool {
        self.defined_state
    }
}

/// The ADM1 property package: component set plus state block defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Adm1PropertyPackage;

impl PropertyPackage for Adm1PropertyPackage {
    type State = Adm1State;

    fn name(&self) -> &'static str {
        "ADM1"
    }

    fn component_symbols(&self) -> &'static [&'static str] {
        &SYMBOLS
    }

    fn build_state(&self, defined_state: bool, args: &PackageArgs) -> PropertyResult<Self::State> {
        check_common_args(self.name(), args)?;
        Ok(Adm1State::new(defined_state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropertyError;
    use proptest::prelude::*;

    #[test]
    fn component_order_and_symbols_agree() {
        for (i, c) in Adm1Component::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(Adm1Component::from_symbol(c.symbol()), Some(*c));
        }
        assert_eq!(Adm1Component::from_symbol("S_xyz"), None);
    }

    #[test]
    fn new_state_is_fully_free() {
        let s = Adm1State::new(true);
        assert_eq!(s.var_count(), 27);
        assert_eq!(s.free_count(), 27);
        assert!(s.is_defined_state());
    }

    #[test]
    fn hold_then_release_restores_fixed_pattern() {
        let mut s = Adm1State::new(true);
        s.fix_temperature(wf_core::k(308.15));
        let flags = s.hold_state();
        assert_eq!(flags.len(), 26);
        assert_eq!(s.free_count(), 0);
        s.release_state(&flags);
        assert_eq!(s.free_count(), 26);
        assert!(s.temperature.is_fixed());
    }

    #[test]
    fn typed_fixers_store_si_values() {
        let mut s = Adm1State::new(true);
        s.fix_flow_vol(wf_core::m3pd(86_400.0));
        s.fix_pressure(wf_core::pa(101_325.0));
        assert!((s.flow_vol.value() - 1.0).abs() < 1e-12);
        assert_eq!(s.pressure.value(), 101_325.0);
    }

    #[test]
    fn validate_rejects_non_physical_values() {
        assert!(Adm1State::new(true).validate().is_ok());

        let mut s = Adm1State::new(true);
        s.conc_mut(Adm1Component::SAc).set_value(-0.1);
        assert!(matches!(s.validate(), Err(PropertyError::NonPhysical { .. })));

        let mut s = Adm1State::new(true);
        s.temperature.set_value(0.0);
        assert!(s.validate().is_err());

        let mut s = Adm1State::new(true);
        s.flow_vol.set_value(f64::NAN);
        assert!(s.validate().is_err());
    }

    #[test]
    fn package_rejects_unknown_args() {
        let pkg = Adm1PropertyPackage;
        let mut args = PackageArgs::new();
        args.insert("activity_model".to_string(), 1.0);
        match pkg.build_state(true, &args) {
            Err(PropertyError::UnknownArgument { package, key }) => {
                assert_eq!(package, "ADM1");
                assert_eq!(key, "activity_model");
            }
            other => panic!("expected UnknownArgument, got {other:?}"),
        }
    }

    #[test]
    fn package_rejects_phase_equilibrium() {
        let pkg = Adm1PropertyPackage;
        let mut args = PackageArgs::new();
        args.insert("has_phase_equilibrium".to_string(), 1.0);
        assert!(matches!(
            pkg.build_state(true, &args),
            Err(PropertyError::InvalidArgument { .. })
        ));
        args.insert("has_phase_equilibrium".to_string(), 0.0);
        assert!(pkg.build_state(true, &args).is_ok());
    }

    proptest! {
        #[test]
        fn hold_release_restores_any_fixed_pattern(
            mask in proptest::collection::vec(any::<bool>(), 27),
        ) {
            let mut s = Adm1State::new(true);
            for (i, &fix) in mask.iter().enumerate() {
                if fix {
                    s.var_mut(i).fix();
                }
            }
            let before: Vec<bool> = (0..s.var_count()).map(|i| s.var(i).is_fixed()).collect();
            let flags = s.hold_state();
            prop_assert_eq!(s.free_count(), 0);
            s.release_state(&flags);
            let after: Vec<bool> = (0..s.var_count()).map(|i| s.var(i).is_fixed()).collect();
            prop_assert_eq!(before, after);
        }
    }
}
