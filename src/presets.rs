//! Gas property presets ("cromatografía").
//!
//! A preset only carries gravity, the specific heat ratio and FPV; applying
//! one leaves every other input untouched.

use crate::orifice::Inputs;
use crate::overlay::InputsPatch;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    /// Short name accepted on the command line.
    pub key: &'static str,
    pub name: &'static str,
    pub gravgas: f64,
    pub relacion_calor_especifico: f64,
    pub fpv: f64,
}

pub const PRESETS: [Preset; 5] = [
    Preset {
        key: "tipico",
        name: "Gas típico",
        gravgas: 0.65,
        relacion_calor_especifico: 1.31,
        fpv: 1.02,
    },
    Preset {
        key: "asociado-humedo",
        name: "Gas asociado húmedo",
        gravgas: 0.75,
        relacion_calor_especifico: 1.28,
        fpv: 1.015,
    },
    Preset {
        key: "seco",
        name: "Gas seco",
        gravgas: 0.60,
        relacion_calor_especifico: 1.33,
        fpv: 1.025,
    },
    Preset {
        key: "pm-08",
        name: "Gas PM-08",
        gravgas: 0.6631,
        relacion_calor_especifico: 1.3,
        fpv: 1.0212752,
    },
    Preset {
        key: "c-109",
        name: "Gas C-109",
        gravgas: 0.6631,
        relacion_calor_especifico: 1.33,
        fpv: 1.02196342,
    },
];

impl Preset {
    pub fn patch(&self) -> InputsPatch {
        InputsPatch {
            gravgas: Some(self.gravgas),
            relacion_calor_especifico: Some(self.relacion_calor_especifico),
            fpv: Some(self.fpv),
            ..InputsPatch::default()
        }
    }

    pub fn apply(&self, inputs: Inputs) -> Inputs {
        self.patch().apply(inputs)
    }
}

/// Looks a preset up by key or display name, ignoring case.
pub fn find(name: &str) -> Option<&'static Preset> {
    let name = name.trim().to_lowercase();
    PRESETS
        .iter()
        .find(|p| p.key == name || p.name.to_lowercase() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orifice::compute;

    fn field_reading() -> Inputs {
        Inputs {
            pluma_azul: 10.0,
            pluma_roja: 10.0,
            diametro_placa: 2.0,
            diametro_puente: 4.0,
            medidor_rango_estatico: 50.0,
            medidor_rango_diferencial: 50.0,
            temperaturac: 20.0,
            gravgas: 0.65,
            fb: 674.44,
            fpv: 1.02,
            relacion_calor_especifico: 1.31,
        }
    }

    #[test]
    fn find_by_key_or_name() {
        assert_eq!(find("seco").map(|p| p.name), Some("Gas seco"));
        assert_eq!(find("PM-08").map(|p| p.key), Some("pm-08"));
        assert_eq!(find("gas asociado HÚMEDO").map(|p| p.key), Some("asociado-humedo"));
        assert!(find("propano").is_none());
    }

    #[test]
    fn applying_a_preset_touches_only_gas_properties() {
        let before = field_reading();
        let after = find("seco").unwrap().apply(before);

        assert_eq!(after.gravgas, 0.60);
        assert_eq!(after.relacion_calor_especifico, 1.33);
        assert_eq!(after.fpv, 1.025);
        assert_eq!(
            Inputs {
                gravgas: before.gravgas,
                relacion_calor_especifico: before.relacion_calor_especifico,
                fpv: before.fpv,
                ..after
            },
            before
        );
    }

    #[test]
    fn preset_changes_only_dependent_outputs() {
        let before = compute(&field_reading());
        let after = compute(&find("seco").unwrap().apply(field_reading()));

        // Terms independent of gravity, k and FPV.
        assert_eq!(after.beta_d, before.beta_d);
        assert_eq!(after.b, before.b);
        assert_eq!(after.e, before.e);
        assert_eq!(after.k, before.k);
        assert_eq!(after.pfipca, before.pfipca);
        assert_eq!(after.hw, before.hw);
        assert_eq!(after.x, before.x);
        assert_eq!(after.be, before.be);
        assert_eq!(after.fr, before.fr);
        assert_eq!(after.temperaturaf, before.temperaturaf);
        assert_eq!(after.ftf, before.ftf);

        assert_ne!(after.y, before.y);
        assert_ne!(after.fg, before.fg);
        assert_ne!(after.c_hora, before.c_hora);
        assert_ne!(after.factor_correccion, before.factor_correccion);
        assert_ne!(after.caudaldegas, before.caudaldegas);
    }

    #[test]
    fn preset_keys_are_unique() {
        for (i, a) in PRESETS.iter().enumerate() {
            for b in &PRESETS[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }
}
