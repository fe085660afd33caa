//! Sample validation.

use super::Sample;

/// Check that a sample is safe to record.
///
/// A sample is rejected when `V`, `I` or `P` is non-finite. Non-finite
/// numbers inside `extra` are tolerated but replaced by `0.0` so that
/// serialized history stays valid JSON.
pub fn validate_sample(sample: &mut Sample) -> bool {
    if !(sample.v.is_finite() && sample.i.is_finite() && sample.p.is_finite()) {
        return false;
    }

    for value in sample.extra.values_mut() {
        if let super::ExtraValue::Number(v) = value {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
    }

    true
}
