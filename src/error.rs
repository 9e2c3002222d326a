use thiserror::Error;

/// An invalid hyperparameter supplied at construction time
///
/// Misconfiguration is rejected up front rather than surfacing as a silent
/// logic error during the first update or decay call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value falls outside its valid interval
    #[error("invalid value {value} for `{name}`: expected a value in {expected}")]
    Range {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
    /// A count that must be positive was zero
    #[error("`{name}` must be nonzero")]
    Zero { name: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = ConfigError::Range {
            name: "gamma",
            value: 1.5,
            expected: "[0, 1]",
        };
        assert_eq!(
            err.to_string(),
            "invalid value 1.5 for `gamma`: expected a value in [0, 1]"
        );

        let err = ConfigError::Zero { name: "batch_size" };
        assert_eq!(err.to_string(), "`batch_size` must be nonzero");
    }
}
