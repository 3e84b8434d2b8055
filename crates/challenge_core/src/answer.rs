//! Free-text answer normalization and matching.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalization {
    pub trim: bool,
    pub case_fold: bool,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            trim: true,
            case_fold: false,
        }
    }
}

pub fn normalize(raw: &str, rules: Normalization) -> String {
    let value = if rules.trim { raw.trim() } else { raw };
    if rules.case_fold {
        value.to_lowercase()
    } else {
        value.to_string()
    }
}

/// Accepted literals go through the same normalization as the input, so a
/// catalog may spell `"Genesis Block"` and still match `"genesis block"`.
pub fn matches_any<S: AsRef<str>>(accepted: &[S], raw: &str, rules: Normalization) -> bool {
    let candidate = normalize(raw, rules);
    accepted
        .iter()
        .any(|literal| normalize(literal.as_ref(), rules) == candidate)
}
