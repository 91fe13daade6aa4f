use serde::{Deserialize, Serialize};

/// Sampler knobs as the runtime reports them: `[temperature, top_p, top_k]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: i32,
}

impl SamplerParams {
    /// Positional mapping of the flat array returned by the runtime.
    /// `None` when fewer than three entries are present; `top_k` is truncated.
    pub fn from_array(values: &[f32]) -> Option<Self> {
        if values.len() < 3 {
            return None;
        }
        Some(Self {
            temperature: values[0],
            top_p: values[1],
            top_k: values[2] as i32,
        })
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.temperature, self.top_p, self.top_k as f32]
    }
}

/// Repetition penalties: `[presence, frequency, decay]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyParams {
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    pub penalty_decay: f32,
}

impl PenaltyParams {
    pub fn from_array(values: &[f32]) -> Option<Self> {
        match values {
            [presence, frequency, decay, ..] => Some(Self {
                presence_penalty: *presence,
                frequency_penalty: *frequency,
                penalty_decay: *decay,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_arrays_are_rejected() {
        assert_eq!(SamplerParams::from_array(&[]), None);
        assert_eq!(SamplerParams::from_array(&[0.8, 0.9]), None);
        assert_eq!(PenaltyParams::from_array(&[0.1]), None);
    }

    #[test]
    fn maps_positionally_and_truncates_top_k() {
        let p = SamplerParams::from_array(&[0.8, 0.9, 40.0]).unwrap();
        assert_eq!(
            p,
            SamplerParams {
                temperature: 0.8,
                top_p: 0.9,
                top_k: 40
            }
        );

        let p = SamplerParams::from_array(&[1.0, 0.5, 12.9, 99.0]).unwrap();
        assert_eq!(p.top_k, 12);
    }

    #[test]
    fn penalty_maps_first_three() {
        let p = PenaltyParams::from_array(&[0.4, 0.5, 0.996]).unwrap();
        assert_eq!(p.presence_penalty, 0.4);
        assert_eq!(p.frequency_penalty, 0.5);
        assert_eq!(p.penalty_decay, 0.996);
    }
}
