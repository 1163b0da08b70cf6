use serde::{Deserialize, Serialize};

/// Head/pressure ratio constant for the `x` term.
pub const N3: f64 = 27.7;
/// kgf/cm² to psi.
pub const KGF_CM2_TO_PSI: f64 = 14.2233;
/// Rankine offset used by the flowing temperature factor.
pub const N5: f64 = 460.0;
/// Reference temperature, °R.
pub const BASE_T_R: f64 = 520.0;
pub const FT3_PER_M3: f64 = 35.31;
pub const HOURS_PER_DAY: f64 = 24.0;
/// Orifice discharge constant of the `be` term. Not the specific heat ratio.
pub const K_DISCHARGE: f64 = 0.647;
pub const BE_DIVISOR: f64 = 12835.0;

/// One set of chart readings and gas properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inputs {
    pub pluma_azul: f64,
    pub pluma_roja: f64,
    /// Orifice plate diameter, inches.
    pub diametro_placa: f64,
    /// Meter run bore, inches.
    pub diametro_puente: f64,
    /// Static chart range, percent of full scale.
    pub medidor_rango_estatico: f64,
    /// Differential chart range, percent of full scale.
    pub medidor_rango_diferencial: f64,
    /// Flowing temperature, °C.
    pub temperaturac: f64,
    pub gravgas: f64,
    pub fb: f64,
    pub fpv: f64,
    /// Ratio of specific heats of the gas.
    pub relacion_calor_especifico: f64,
}

impl Default for Inputs {
    fn default() -> Self {
        Inputs {
            pluma_azul: 0.0,
            pluma_roja: 0.0,
            diametro_placa: 0.0,
            diametro_puente: 0.0,
            medidor_rango_estatico: 0.0,
            medidor_rango_diferencial: 0.0,
            temperaturac: 0.0,
            gravgas: 1.0,
            fb: 674.44,
            fpv: 1.02196342,
            relacion_calor_especifico: 1.3,
        }
    }
}

/// Every term of the flow calculation, final result last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outputs {
    pub beta_d: f64,
    pub b: f64,
    pub e: f64,
    pub k: f64,
    pub pfipca: f64,
    pub hw: f64,
    pub x: f64,
    pub y: f64,
    pub be: f64,
    pub fr: f64,
    pub temperaturaf: f64,
    pub ftf: f64,
    pub fg: f64,
    pub c_hora: f64,
    pub factor_correccion: f64,
    pub caudaldegas: f64,
}

impl Outputs {
    /// True when every term is a finite number.
    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|v| v.is_finite())
    }

    /// Terms in declaration order.
    pub fn values(&self) -> [f64; 16] {
        [
            self.beta_d,
            self.b,
            self.e,
            self.k,
            self.pfipca,
            self.hw,
            self.x,
            self.y,
            self.be,
            self.fr,
            self.temperaturaf,
            self.ftf,
            self.fg,
            self.c_hora,
            self.factor_correccion,
            self.caudaldegas,
        ]
    }
}

fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn sqrt_positive(n: f64) -> f64 {
    if n > 0.0 {
        n.sqrt()
    } else {
        0.0
    }
}

/// Computes the gas flow rate and all of its intermediate terms.
///
/// Degenerate inputs (zero diameters, zero pressure, non-positive gravity)
/// never fail: the affected term becomes 0 and the result degrades toward
/// zero. Every term is finite for any finite inputs.
pub fn compute(inputs: &Inputs) -> Outputs {
    let Inputs {
        pluma_azul,
        pluma_roja,
        diametro_placa,
        diametro_puente,
        medidor_rango_estatico,
        medidor_rango_diferencial,
        temperaturac,
        gravgas,
        fb,
        fpv,
        relacion_calor_especifico,
    } = *inputs;

    // Besides the positivity checks, every term that can leave the f64 range
    // on extreme finite inputs is an overflow guard: a non-finite result is
    // taken as 0.
    let (beta_d, b) = if diametro_puente > 0.0 {
        (
            finite_or_zero(diametro_placa / diametro_puente),
            finite_or_zero(530.0 / diametro_puente.sqrt()),
        )
    } else {
        (0.0, 0.0)
    };
    let polinomio = finite_or_zero(
        830.0 - 5000.0 * beta_d + 9000.0 * beta_d.powi(2) - 4200.0 * beta_d.powi(3) + b,
    );
    let e = finite_or_zero(diametro_placa * polinomio);
    let k = K_DISCHARGE;

    let pfipca =
        finite_or_zero(medidor_rango_estatico * diametro_placa / 100.0 * KGF_CM2_TO_PSI);
    let hw = finite_or_zero(medidor_rango_diferencial * diametro_puente / 100.0);
    let x = if pfipca > 0.0 {
        finite_or_zero(hw / (N3 * pfipca))
    } else {
        0.0
    };

    let raiz = (1.0 + x).sqrt();
    let numerador = (0.41 + 0.35 * relacion_calor_especifico.powi(4)) * x;
    // Expansion factor: raiz is NaN for x < -1 and zero for x == -1.
    let y = if beta_d > 0.0 {
        finite_or_zero(raiz - numerador / (beta_d * raiz))
    } else {
        0.0
    };

    let be = if k > 0.0 && diametro_placa > 0.0 {
        finite_or_zero(e / (BE_DIVISOR * k * diametro_placa))
    } else {
        0.0
    };
    let fr = if pfipca > 0.0 && hw > 0.0 {
        finite_or_zero(1.0 + be / (pfipca * hw).sqrt())
    } else {
        0.0
    };

    let temperaturaf = finite_or_zero(9.0 / 5.0 * temperaturac + 32.0);
    let rankine = N5 + temperaturaf;
    let ftf = if rankine > 0.0 {
        (BASE_T_R / rankine).sqrt()
    } else {
        0.0
    };
    let fg = if gravgas > 0.0 {
        finite_or_zero((1.0 / gravgas).sqrt())
    } else {
        0.0
    };

    let c_hora = finite_or_zero(fb * fpv * ftf * fg * fr * y);
    let factor_correccion = finite_or_zero(
        c_hora * HOURS_PER_DAY / FT3_PER_M3
            * sqrt_positive(
                KGF_CM2_TO_PSI * medidor_rango_diferencial * medidor_rango_estatico / 10000.0,
            ),
    );
    let caudaldegas = finite_or_zero(sqrt_positive(pluma_azul * pluma_roja) * factor_correccion);

    Outputs {
        beta_d,
        b,
        e,
        k,
        pfipca,
        hw,
        x,
        y,
        be,
        fr,
        temperaturaf,
        ftf,
        fg,
        c_hora,
        factor_correccion,
        caudaldegas,
    }
}
