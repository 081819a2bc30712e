//! Update validation: a replacement reading may never move backwards.

use odo_types::Reading;

use crate::error::{RegistryError, RegistryResult};

/// A single check applied to a proposed replacement.
pub trait UpdateRule: Send + Sync {
    fn name(&self) -> &str;

    /// Accept `proposed` as a replacement for `current`, or explain why not.
    fn check(&self, current: &Reading, proposed: &Reading) -> RegistryResult<()>;
}

/// The proposed value must not be below the current one.
pub struct MonotonicValue;

impl UpdateRule for MonotonicValue {
    fn name(&self) -> &str {
        "monotonic-value"
    }

    fn check(&self, current: &Reading, proposed: &Reading) -> RegistryResult<()> {
        let current_value = current.value()?;
        let proposed_value = proposed.value()?;
        if proposed_value.is_below(&current_value) {
            return Err(RegistryError::ValueRegression {
                current: current.reading.clone(),
                proposed: proposed.reading.clone(),
            });
        }
        Ok(())
    }
}

/// The proposed date must not be before the current one.
pub struct MonotonicDate;

impl UpdateRule for MonotonicDate {
    fn name(&self) -> &str {
        "monotonic-date"
    }

    fn check(&self, current: &Reading, proposed: &Reading) -> RegistryResult<()> {
        let current_date = current.date()?;
        let proposed_date = proposed.date()?;
        if current_date.is_after(&proposed_date) {
            return Err(RegistryError::DateRegression {
                current: current.creation_date.clone(),
                proposed: proposed.creation_date.clone(),
            });
        }
        Ok(())
    }
}

/// Ordered chain of [`UpdateRule`]s. The first failing rule wins.
///
/// The default chain checks the value, then the date. Accepted readings
/// replace the stored one whole; no fields are merged.
pub struct UpdateValidator {
    rules: Vec<Box<dyn UpdateRule>>,
}

impl UpdateValidator {
    pub fn new(rules: Vec<Box<dyn UpdateRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, current: &Reading, proposed: &Reading) -> RegistryResult<()> {
        for rule in &self.rules {
            rule.check(current, proposed)?;
        }
        Ok(())
    }
}

impl Default for UpdateValidator {
    fn default() -> Self {
        Self::new(vec![Box::new(MonotonicValue), Box::new(MonotonicDate)])
    }
}

impl std::fmt::Debug for UpdateValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateValidator")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    fn reading(value: &str, date: &str) -> Reading {
        Reading::new("100001", value, date)
    }

    fn kind_of(current: &Reading, proposed: &Reading) -> Option<ErrorKind> {
        UpdateValidator::default()
            .validate(current, proposed)
            .err()
            .map(|e| e.kind())
    }

    #[test]
    fn forward_update_is_accepted() {
        let current = reading("50", "12/01/2017");
        assert_eq!(kind_of(&current, &reading("100", "12/20/2017")), None);
    }

    #[test]
    fn equal_value_and_date_are_accepted() {
        let current = reading("50", "12/01/2017");
        assert_eq!(kind_of(&current, &reading("50", "12/01/2017")), None);
    }

    #[test]
    fn lower_value_is_a_value_regression() {
        let current = reading("50", "12/01/2017");
        assert_eq!(
            kind_of(&current, &reading("20", "12/01/2017")),
            Some(ErrorKind::ValueRegression)
        );
    }

    #[test]
    fn earlier_date_is_a_date_regression() {
        let current = reading("50", "12/01/2017");
        assert_eq!(
            kind_of(&current, &reading("100", "11/20/2017")),
            Some(ErrorKind::DateRegression)
        );
    }

    #[test]
    fn value_is_checked_before_date() {
        let current = reading("50", "12/01/2017");
        assert_eq!(
            kind_of(&current, &reading("20", "11/20/2017")),
            Some(ErrorKind::ValueRegression)
        );
    }

    #[test]
    fn values_compare_numerically() {
        let current = reading("9", "12/01/2017");
        assert_eq!(kind_of(&current, &reading("10", "12/01/2017")), None);
    }

    #[test]
    fn unparseable_dates_are_invalid() {
        let current = reading("50", "12/01/2017");
        assert_eq!(
            kind_of(&current, &reading("60", "2017-12-02")),
            Some(ErrorKind::InvalidDate)
        );
        let stored_bad = reading("50", "someday");
        assert_eq!(
            kind_of(&stored_bad, &reading("60", "12/02/2017")),
            Some(ErrorKind::InvalidDate)
        );
    }

    #[test]
    fn unparseable_values_are_invalid() {
        let current = reading("50", "12/01/2017");
        assert_eq!(
            kind_of(&current, &reading("lots", "12/02/2017")),
            Some(ErrorKind::InvalidValue)
        );
    }

    #[test]
    fn custom_chain_runs_only_its_rules() {
        let validator = UpdateValidator::new(vec![Box::new(MonotonicDate)]);
        assert_eq!(validator.rule_names(), vec!["monotonic-date"]);
        let current = reading("50", "12/01/2017");
        assert!(validator
            .validate(&current, &reading("1", "12/02/2017"))
            .is_ok());
    }

    proptest! {
        #[test]
        fn accepted_iff_nothing_regresses(
            v1 in 0u32..100_000, v2 in 0u32..100_000,
            d1 in 1u32..=28, d2 in 1u32..=28,
        ) {
            let current = reading(&v1.to_string(), &format!("06/{d1:02}/2018"));
            let proposed = reading(&v2.to_string(), &format!("06/{d2:02}/2018"));
            let accepted = UpdateValidator::default().validate(&current, &proposed).is_ok();
            prop_assert_eq!(accepted, v2 >= v1 && d2 >= d1);
        }
    }
}
