//! Text rendering of label annotations.

use super::types::LabelAnnotation;
use std::fmt;

/// First line of every non-empty description.
pub const DESCRIPTION_HEADER: &str = "Descrição da imagem:";

/// Returned when the remote found no labels for the image.
pub const NO_LABELS_MESSAGE: &str = "Nenhuma descrição foi encontrada para a imagem.";

/// Outcome of a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum Description {
    /// Labels in the order the remote returned them (never empty)
    Labels(Vec<LabelAnnotation>),
    NoLabels,
}

impl Description {
    pub fn from_labels(labels: Vec<LabelAnnotation>) -> Self {
        if labels.is_empty() {
            Description::NoLabels
        } else {
            Description::Labels(labels)
        }
    }

    pub fn labels(&self) -> &[LabelAnnotation] {
        match self {
            Description::Labels(labels) => labels,
            Description::NoLabels => &[],
        }
    }

    /// Render the human-readable summary returned to clients.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Description::NoLabels => f.write_str(NO_LABELS_MESSAGE),
            Description::Labels(labels) => {
                writeln!(f, "{DESCRIPTION_HEADER}")?;
                for label in labels {
                    writeln!(
                        f,
                        "- {} (confidence: {})",
                        label.description,
                        format_confidence(label.score)
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Format a `[0, 1]` score as a percentage with two decimals.
///
/// Ties round up, not to even: 12.125 renders as `12.13%`.
pub fn format_confidence(score: f32) -> String {
    format!("{}%", round_half_up(f64::from(score * 100.0), 2))
}

/// Round the shortest decimal representation of `value` to `places`
/// fractional digits, with ties going away from zero.
fn round_half_up(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let repr = value.abs().to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let frac = frac_part.as_bytes();

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain((0..places).map(|i| frac.get(i).copied().unwrap_or(b'0')))
        .map(|b| b - b'0')
        .collect();

    if frac.get(places).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - places;
    let mut out = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() && digits.iter().any(|&d| d != 0) {
        out.push('-');
    }
    for (i, digit) in digits.iter().enumerate() {
        if i == split {
            out.push('.');
        }
        out.push(char::from(b'0' + digit));
    }
    out
}
