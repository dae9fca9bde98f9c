use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Maps a normalized temperature (0 = cold, 1 = hot) to RGB.
///
/// The ramp is the simple blue-to-red gradient the grid view paints with:
/// red rises with temperature, blue falls, green stays off. Inputs outside
/// [0, 1] are clamped.
pub fn heat_color(t: f64) -> [f32; 3] {
    let v = t.clamp(0.0, 1.0) as f32;
    [v, 0.0, 1.0 - v]
}

/// Flattens a temperature field into an RGB triple per cell.
///
/// `max` is the normalization reference (usually the source temperature);
/// non-positive `max` renders everything cold.
pub fn field_colors(field: &[f64], max: f64) -> Vec<f32> {
    let mut out = Vec::with_capacity(field.len() * 3);
    for &value in field {
        let t = if max > 0.0 { value / max } else { 0.0 };
        out.extend_from_slice(&heat_color(t));
    }
    out
}

/// One entry of a color legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendStop {
    /// Normalized value in [0, 1].
    pub value: f64,
    pub color: [f32; 3],
}

/// Evenly spaced legend stops from cold to hot, endpoints included.
pub fn legend(stops: usize) -> Vec<LegendStop> {
    if stops == 0 {
        return vec![];
    }
    if stops == 1 {
        return vec![LegendStop {
            value: 0.0,
            color: heat_color(0.0),
        }];
    }
    (0..stops)
        .map(|i| {
            let value = i as f64 / (stops - 1) as f64;
            LegendStop {
                value,
                color: heat_color(value),
            }
        })
        .collect()
}

/// Parses a `#RRGGBB` material color into normalized RGB.
pub fn parse_hex_color(hex: &str) -> Result<[f32; 3]> {
    let digits = hex
        .strip_prefix('#')
        .with_context(|| format!("Color '{hex}' does not start with '#'"))?;
    anyhow::ensure!(
        digits.len() == 6,
        "Color '{hex}' is not a 6-digit hex triplet"
    );
    let channel = |range: std::ops::Range<usize>| -> Result<f32> {
        let byte = u8::from_str_radix(&digits[range], 16)
            .with_context(|| format!("Color '{hex}' has a non-hex digit"))?;
        Ok(byte as f32 / 255.0)
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}
