//! Required-field coverage.

/// Which required fields are covered by the current mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    /// Required keys selected as a target by at least one column.
    pub covered: Vec<String>,
    /// Required keys no column targets.
    pub missing: Vec<String>,
    /// `covered / required`, 1.0 when nothing is required.
    pub ratio: f64,
}

impl Coverage {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Ratio as a whole percentage, rounded.
    pub fn percent(&self) -> u8 {
        (self.ratio * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Computes coverage of `required_keys` by the given target keys.
///
/// Duplicate required keys are counted once.
pub fn required_field_coverage<'a, I>(targets: I, required_keys: &[String]) -> Coverage
where
    I: IntoIterator<Item = &'a str>,
{
    let targets: Vec<&str> = targets.into_iter().filter(|t| !t.is_empty()).collect();

    let mut covered = Vec::new();
    let mut missing = Vec::new();
    for key in required_keys {
        if covered.contains(key) || missing.contains(key) {
            continue;
        }
        if targets.contains(&key.as_str()) {
            covered.push(key.clone());
        } else {
            missing.push(key.clone());
        }
    }

    let total = covered.len() + missing.len();
    let ratio = if total == 0 {
        1.0
    } else {
        covered.len() as f64 / total as f64
    };

    Coverage {
        covered,
        missing,
        ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_empty_required_is_complete() {
        let coverage = required_field_coverage(["firstName"], &[]);
        assert!(coverage.is_complete());
        assert_eq!(coverage.ratio, 1.0);
        assert_eq!(coverage.percent(), 100);
    }

    #[test]
    fn test_half_covered() {
        let coverage = required_field_coverage(["firstName", ""], &keys(&["firstName", "lastName"]));
        assert_eq!(coverage.covered, vec!["firstName"]);
        assert_eq!(coverage.missing, vec!["lastName"]);
        assert_eq!(coverage.percent(), 50);
        assert!(!coverage.is_complete());
    }

    #[test]
    fn test_duplicate_required_counted_once() {
        let coverage = required_field_coverage(["a"], &keys(&["a", "a", "b"]));
        assert_eq!(coverage.ratio, 0.5);
    }
}
