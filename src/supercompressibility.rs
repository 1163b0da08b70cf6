//! Supercompressibility (FPV) from an AGA8 detail characterization.
//!
//! `FPV = sqrt(Zb / Zf)`, with `Zf` evaluated at flowing conditions and `Zb`
//! at base conditions.

use aga8::composition::Composition;
use aga8::detail::Detail;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BASE_P: f64 = 14.73;
pub const BASE_T: f64 = 60.0;
pub const PSI_TO_KPA: f64 = 6.89476;

#[derive(Debug, Error)]
pub enum FpvError {
    #[error("invalid gas composition: {0}")]
    Composition(String),
    #[error("flowing pressure must be positive, got {0} psia")]
    Pressure(f64),
    #[error("flowing temperature {0} °F is at or below absolute zero")]
    Temperature(f64),
    #[error("AGA8 returned a non-physical compressibility (z = {0})")]
    Compressibility(f64),
}

/// Mole fractions of the gas components. Components left out of a
/// composition file are zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasComposition {
    pub methane: f64,
    pub nitrogen: f64,
    pub carbon_dioxide: f64,
    pub ethane: f64,
    pub propane: f64,
    pub isobutane: f64,
    pub n_butane: f64,
    pub isopentane: f64,
    pub n_pentane: f64,
    pub hexane: f64,
    pub heptane: f64,
    pub octane: f64,
    pub nonane: f64,
    pub decane: f64,
    pub hydrogen: f64,
    pub oxygen: f64,
    pub carbon_monoxide: f64,
    pub water: f64,
    pub hydrogen_sulfide: f64,
    pub helium: f64,
    pub argon: f64,
}

impl GasComposition {
    /// Sweet methane with a trace of H2S.
    pub fn sweet_methane() -> Self {
        GasComposition {
            methane: 0.9996,
            nitrogen: 0.0,
            carbon_dioxide: 0.0,
            ethane: 0.0,
            propane: 0.0,
            isobutane: 0.0,
            n_butane: 0.0,
            isopentane: 0.0,
            n_pentane: 0.0,
            hexane: 0.0,
            heptane: 0.0,
            octane: 0.0,
            nonane: 0.0,
            decane: 0.0,
            hydrogen: 0.0,
            oxygen: 0.0,
            carbon_monoxide: 0.0,
            water: 0.0,
            hydrogen_sulfide: 0.0004,
            helium: 0.0,
            argon: 0.0,
        }
    }
}

impl From<&GasComposition> for Composition {
    fn from(c: &GasComposition) -> Self {
        Composition {
            methane: c.methane,
            nitrogen: c.nitrogen,
            carbon_dioxide: c.carbon_dioxide,
            ethane: c.ethane,
            propane: c.propane,
            isobutane: c.isobutane,
            n_butane: c.n_butane,
            isopentane: c.isopentane,
            n_pentane: c.n_pentane,
            hexane: c.hexane,
            heptane: c.heptane,
            octane: c.octane,
            nonane: c.nonane,
            decane: c.decane,
            hydrogen: c.hydrogen,
            oxygen: c.oxygen,
            carbon_monoxide: c.carbon_monoxide,
            water: c.water,
            hydrogen_sulfide: c.hydrogen_sulfide,
            helium: c.helium,
            argon: c.argon,
        }
    }
}

fn fahrenheit_to_kelvin(t: f64) -> f64 {
    (t - 32.0) * 5.0 / 9.0 + 273.15
}

/// Compressibility factor at `pressure` psia and `temperature` °F.
pub fn compressibility(
    composition: &GasComposition,
    pressure: f64,
    temperature: f64,
) -> Result<f64, FpvError> {
    if pressure.is_nan() || pressure <= 0.0 {
        return Err(FpvError::Pressure(pressure));
    }
    let kelvin = fahrenheit_to_kelvin(temperature);
    if kelvin.is_nan() || kelvin <= 0.0 {
        return Err(FpvError::Temperature(temperature));
    }

    let mut detail = Detail::new();
    detail
        .set_composition(&Composition::from(composition))
        .map_err(|e| FpvError::Composition(format!("{:?}", e)))?;
    detail.p = pressure * PSI_TO_KPA;
    detail.t = kelvin;
    let _ = detail.density();
    detail.properties();

    if detail.z.is_finite() && detail.z > 0.0 {
        Ok(detail.z)
    } else {
        Err(FpvError::Compressibility(detail.z))
    }
}

/// Supercompressibility factor at `pressure` psia and `temperature` °F.
pub fn fpv(composition: &GasComposition, pressure: f64, temperature: f64) -> Result<f64, FpvError> {
    let z_f = compressibility(composition, pressure, temperature)?;
    let z_b = compressibility(composition, BASE_P, BASE_T)?;
    Ok((z_b / z_f).sqrt())
}
