//! SI unit aliases and constructors.
//!
//! Quantities crossing a model boundary (stream flow, temperature, pressure)
//! use `uom` so the compiler checks the unit. Species concentrations stay
//! plain `Real` kg/m^3: the biokinetic models mix COD-, nitrogen-, and
//! mole-based measures that `uom` has no dimension for, so those carry their
//! basis in documentation instead.

use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature, VolumeRate as UomVolumeRate};
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;
use uom::si::volume_rate::cubic_meter_per_second;

pub type Pressure = UomPressure;
pub type Temperature = ThermodynamicTemperature;
pub type VolumeRate = UomVolumeRate;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Pressure from pascals.
#[inline]
pub fn pa(value: f64) -> Pressure {
    Pressure::new::<pascal>(value)
}

/// Temperature from kelvins.
#[inline]
pub fn k(value: f64) -> Temperature {
    Temperature::new::<kelvin>(value)
}

/// Volumetric flow from cubic metres per second.
#[inline]
pub fn m3ps(value: f64) -> VolumeRate {
    VolumeRate::new::<cubic_meter_per_second>(value)
}

/// Volumetric flow from cubic metres per day, the customary unit in
/// wastewater plant data.
#[inline]
pub fn m3pd(value: f64) -> VolumeRate {
    m3ps(value / SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::volume_rate::cubic_meter_per_second;

    #[test]
    fn day_flow_converts_to_si() {
        let q = m3pd(86_400.0);
        assert!((q.get::<cubic_meter_per_second>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constructors_round_trip() {
        use uom::si::pressure::pascal;
        use uom::si::thermodynamic_temperature::kelvin;
        assert_eq!(pa(101_325.0).get::<pascal>(), 101_325.0);
        assert_eq!(k(308.15).get::<kelvin>(), 308.15);
    }
}
