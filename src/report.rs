use tabled::{Table, Tabled};

use crate::orifice::Outputs;

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Quantity")]
    label: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Fixed-point formatting; non-finite values render as `-`.
pub fn fmt(n: f64, digits: usize) -> String {
    if !n.is_finite() {
        return "-".to_string();
    }
    format!("{:.*}", digits, n)
}

fn headline(o: &Outputs) -> Vec<Row> {
    vec![
        Row {
            label: "Caudal de gas",
            value: fmt(o.caudaldegas, 3),
        },
        Row {
            label: "CHora",
            value: fmt(o.c_hora, 5),
        },
        Row {
            label: "Factor corrección",
            value: fmt(o.factor_correccion, 5),
        },
    ]
}

fn audit(o: &Outputs) -> Vec<Row> {
    [
        ("β", o.beta_d),
        ("y", o.y),
        ("FTF", o.ftf),
        ("FG", o.fg),
        ("FR", o.fr),
        ("PFIPCA", o.pfipca),
        ("HW", o.hw),
        ("x", o.x),
        ("b", o.b),
        ("e", o.e),
        ("k", o.k),
        ("Temp (°F)", o.temperaturaf),
    ]
    .into_iter()
    .map(|(label, v)| Row {
        label,
        value: fmt(v, 5),
    })
    .collect()
}

/// Headline results followed by the intermediate terms.
pub fn render(o: &Outputs) -> String {
    format!(
        "Result\n{}\n\nIntermediate calculations (audit)\n{}",
        Table::new(headline(o)),
        Table::new(audit(o))
    )
}

/// One-line summary for verbose output.
pub fn summary(o: &Outputs) -> String {
    format!(
        "Caudal = {}    CHora = {}    Factor = {}",
        fmt(o.caudaldegas, 3),
        fmt(o.c_hora, 5),
        fmt(o.factor_correccion, 5)
    )
}
