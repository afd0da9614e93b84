//! Activated Sludge Model no. 1 (ASM1) component basis and state block.

use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;
use uom::si::volume_rate::cubic_meter_per_second;
use wf_core::units::SECONDS_PER_DAY;
use wf_core::{Pressure, Real, Temperature, Var, VolumeRate};

use crate::error::PropertyResult;
use crate::package::{
    PackageArgs, PropertyPackage, StateBlock, check_common_args, check_nonnegative, check_positive,
};

/// The 12 ASM1 components.
///
/// COD-based species (kg COD/m^3): `S_I`, `S_S`, `X_I`, `X_S`, `X_BH`,
/// `X_BA`, `X_P`; dissolved oxygen `S_O` is kg -COD/m^3; the nitrogen
/// species (kg N/m^3): `S_NO`, `S_NH`, `S_ND`, `X_ND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asm1Component {
    SI,
    SS,
    XI,
    XS,
    XBH,
    XBA,
    XP,
    SO,
    SNO,
    SNH,
    SND,
    XND,
}

const SYMBOLS: [&str; Asm1Component::COUNT] = [
    "S_I", "S_S", "X_I", "X_S", "X_BH", "X_BA", "X_P", "S_O", "S_NO", "S_NH", "S_ND", "X_ND",
];

impl Asm1Component {
    pub const COUNT: usize = 12;

    /// All components in canonical order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::SI,
        Self::SS,
        Self::XI,
        Self::XS,
        Self::XBH,
        Self::XBA,
        Self::XP,
        Self::SO,
        Self::SNO,
        Self::SNH,
        Self::SND,
        Self::XND,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The literature symbol, e.g. `"X_BH"`.
    pub fn symbol(self) -> &'static str {
        SYMBOLS[self as usize]
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.symbol() == symbol)
    }
}

impl std::fmt::Display for Asm1Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Default concentrations seeding free variables, matched to the digester
/// effluent defaults of the ADM1 package so a freshly built translator
/// starts near its own solution.
fn default_conc(c: Asm1Component) -> Real {
    use Asm1Component::*;
    match c {
        SI => 0.328697,
        SS => 0.354232,
        XI => 25.617391,
        XS => 3.957910,
        XBH => 1e-6,
        XBA => 1e-6,
        XP => 1e-6,
        SO => 1e-6,
        SNO => 1e-6,
        SNH => 0.130230,
        SND => 0.003710,
        XND => 0.125181,
    }
}

const DEFAULT_FLOW_M3_PER_DAY: Real = 178.4674;
const DEFAULT_TEMPERATURE_K: Real = 308.15;
const DEFAULT_PRESSURE_PA: Real = 101_325.0;
const DEFAULT_ALKALINITY_KMOL_PER_M3: Real = 0.152678;

/// State variables of one ASM1 stream at one time point: volumetric flow
/// (m^3/s), temperature (K), pressure (Pa), the 12 component
/// concentrations, and alkalinity (kmol HCO3/m^3).
#[derive(Debug, Clone, PartialEq)]
pub struct Asm1State {
    pub flow_vol: Var,
    pub temperature: Var,
    pub pressure: Var,
    conc: [Var; Asm1Component::COUNT],
    pub alkalinity: Var,
    defined_state: bool,
}

impl Asm1State {
    pub fn new(defined_state: bool) -> Self {
        Self {
            flow_vol: Var::new(DEFAULT_FLOW_M3_PER_DAY / SECONDS_PER_DAY),
            temperature: Var::new(DEFAULT_TEMPERATURE_K),
            pressure: Var::new(DEFAULT_PRESSURE_PA),
            conc: std::array::from_fn(|i| Var::new(default_conc(Asm1Component::ALL[i]))),
            alkalinity: Var::new(DEFAULT_ALKALINITY_KMOL_PER_M3),
            defined_state,
        }
    }

    pub fn conc(&self, c: Asm1Component) -> &Var {
        &self.conc[c.index()]
    }

    pub fn conc_mut(&mut self, c: Asm1Component) -> &mut Var {
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

    /// Check every state variable is finite and physically meaningful:
    /// nonnegative flow, concentrations and alkalinity, positive
    /// temperature and pressure.
    pub fn validate(&self) -> PropertyResult<()> {
        check_nonnegative("flow_vol", self.flow_vol.value())?;
        check_positive("temperature", self.temperature.value())?;
        check_positive("pressure", self.pressure.value())?;
        for c in Asm1Component::ALL {
            check_nonnegative(c.symbol(), self.conc(c).value())?;
        }
        check_nonnegative("alkalinity", self.alkalinity.value())
    }
}

impl StateBlock for Asm1State {
    fn var_count(&self) -> usize {
        3 + Asm1Component::COUNT + 1
    }

    fn var(&self, i: usize) -> &Var {
        match i {
            0 => &self.flow_vol,
            1 => &self.temperature,
            2 => &self.pressure,
            i if i < 3 + Asm1Component::COUNT => &self.conc[i - 3],
            _ => &self.alkalinity,
        }
    }

    fn var_mut(&mut self, i: usize) -> &mut Var {
        match i {
            0 => &mut self.flow_vol,
            1 => &mut self.temperature,
            2 => &mut self.pressure,
            i if i < 3 + Asm1Component::COUNT => &mut self.conc[i - 3],
            _ => &mut self.alkalinity,
        }
    }

    fn var_name(&self, i: usize) -> &'static str {
        match i {
            0 => "flow_vol",
            1 => "temperature",
            2 => "pressure",
            i if i < 3 + Asm1Component::COUNT => SYMBOLS[i - 3],
            _ => "alkalinity",
        }
    }

    fn is_defined_state(&self) -> bool {
        self.defined_state
    }
}

/// The ASM1 property package: component set plus state block defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Asm1PropertyPackage;

impl PropertyPackage for Asm1PropertyPackage {
    type State = Asm1State;

    fn name(&self) -> &'static str {
        "ASM1"
    }

    fn component_symbols(&self) -> &'static [&'static str] {
        &SYMBOLS
    }

    fn build_state(&self, defined_state: bool, args: &PackageArgs) -> PropertyResult<Self::State> {
        check_common_args(self.name(), args)?;
        Ok(Asm1State::new(defined_state))
    }
}
