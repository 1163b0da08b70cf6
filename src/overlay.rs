//! Partial input records merged over a complete [`Inputs`].
//!
//! Presets, the saved state file, command-line flags and the watched inputs
//! file all arrive as an [`InputsPatch`]. Only the fields a patch carries are
//! replaced; everything else keeps the value of the base record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::orifice::Inputs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputsPatch {
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub pluma_azul: Option<f64>,
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub pluma_roja: Option<f64>,
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub diametro_placa: Option<f64>,
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub diametro_puente: Option<f64>,
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub medidor_rango_estatico: Option<f64>,
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub medidor_rango_diferencial: Option<f64>,
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub temperaturac: Option<f64>,
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub gravgas: Option<f64>,
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub fb: Option<f64>,
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub fpv: Option<f64>,
    #[serde(default, deserialize_with = "coerce", skip_serializing_if = "Option::is_none")]
    pub relacion_calor_especifico: Option<f64>,
}

impl InputsPatch {
    /// Parses a JSON object of field values.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn is_empty(&self) -> bool {
        *self == InputsPatch::default()
    }

    /// Returns `base` with every field this patch carries replaced.
    pub fn apply(&self, base: Inputs) -> Inputs {
        Inputs {
            pluma_azul: self.pluma_azul.unwrap_or(base.pluma_azul),
            pluma_roja: self.pluma_roja.unwrap_or(base.pluma_roja),
            diametro_placa: self.diametro_placa.unwrap_or(base.diametro_placa),
            diametro_puente: self.diametro_puente.unwrap_or(base.diametro_puente),
            medidor_rango_estatico: self
                .medidor_rango_estatico
                .unwrap_or(base.medidor_rango_estatico),
            medidor_rango_diferencial: self
                .medidor_rango_diferencial
                .unwrap_or(base.medidor_rango_diferencial),
            temperaturac: self.temperaturac.unwrap_or(base.temperaturac),
            gravgas: self.gravgas.unwrap_or(base.gravgas),
            fb: self.fb.unwrap_or(base.fb),
            fpv: self.fpv.unwrap_or(base.fpv),
            relacion_calor_especifico: self
                .relacion_calor_especifico
                .unwrap_or(base.relacion_calor_especifico),
        }
    }
}

/// Coerces a raw field value to a number the way the entry form does:
/// numeric strings are parsed, anything unparseable becomes 0 and `null`
/// leaves the field unset.
fn coerce<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_base_values() {
        let patch = InputsPatch::from_json(r#"{"diametroPlaca": 2, "gravgas": 0.7}"#).unwrap();
        let merged = patch.apply(Inputs::default());

        assert_eq!(merged.diametro_placa, 2.0);
        assert_eq!(merged.gravgas, 0.7);
        assert_eq!(merged.fb, 674.44);
        assert_eq!(merged.fpv, 1.02196342);
        assert_eq!(merged.pluma_azul, 0.0);
    }

    #[test]
    fn form_strings_are_coerced() {
        let patch = InputsPatch::from_json(
            r#"{"plumaAzul": " 12.5 ", "plumaRoja": "", "fb": "abc", "fpv": null, "temperaturac": "-5"}"#,
        )
        .unwrap();

        assert_eq!(patch.pluma_azul, Some(12.5));
        assert_eq!(patch.pluma_roja, Some(0.0));
        assert_eq!(patch.fb, Some(0.0));
        assert_eq!(patch.fpv, None);
        assert_eq!(patch.temperaturac, Some(-5.0));
    }

    #[test]
    fn non_finite_strings_become_zero() {
        let patch = InputsPatch::from_json(r#"{"gravgas": "inf", "fb": "NaN"}"#).unwrap();
        assert_eq!(patch.gravgas, Some(0.0));
        assert_eq!(patch.fb, Some(0.0));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let patch = InputsPatch::from_json(r#"{"autoCalc": true, "gravgas": 0.6}"#).unwrap();
        assert_eq!(patch.gravgas, Some(0.6));
        assert_eq!(patch.pluma_azul, None);
    }

    #[test]
    fn empty_patch_is_identity() {
        let patch = InputsPatch::from_json("{}").unwrap();
        assert!(patch.is_empty());

        let base = Inputs {
            pluma_azul: 3.0,
            ..Inputs::default()
        };
        assert_eq!(patch.apply(base), base);
    }

    #[test]
    fn complete_record_round_trips_through_a_patch() {
        let inputs = Inputs {
            pluma_azul: 1.0,
            diametro_puente: 4.026,
            temperaturac: 31.5,
            ..Inputs::default()
        };
        let text = serde_json::to_string(&inputs).unwrap();
        let patch = InputsPatch::from_json(&text).unwrap();

        assert_eq!(patch.apply(Inputs::default()), inputs);
    }

    #[test]
    fn serialized_patch_skips_unset_fields() {
        let patch = InputsPatch {
            fpv: Some(1.02),
            ..InputsPatch::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"fpv":1.02}"#);
    }
}
