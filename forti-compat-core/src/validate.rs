use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors returned when a state value fails its field validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expected type of {key} to be integer")]
    NotInteger { key: String },
    #[error("expected type of {key} to be string")]
    NotString { key: String },
    #[error("expected {key} to be in the range ({min} - {max}), got {value}")]
    OutOfRange {
        key: String,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("expected {key} to be in the range ({min} - {max}) or equal to 0, got {value}")]
    OutOfRangeOrZero {
        key: String,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("expected length of {key} to be in the range ({min} - {max}), got {len}")]
    Length {
        key: String,
        min: usize,
        max: usize,
        len: usize,
    },
}

/// Value constraint attached to a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    IntBetween { min: i64, max: i64 },
    /// Like `IntBetween`, but 0 is always accepted as "unset".
    IntBetweenWithZero { min: i64, max: i64 },
    StringLen { min: usize, max: usize },
}

impl Validator {
    /// Check `value` for the attribute named `key`.
    pub fn check(&self, key: &str, value: &Value) -> Result<(), ValidationError> {
        match *self {
            Self::IntBetween { min, max } => {
                let v = integer(key, value)?;
                if (min..=max).contains(&v) {
                    Ok(())
                } else {
                    Err(ValidationError::OutOfRange {
                        key: key.to_string(),
                        min,
                        max,
                        value: v,
                    })
                }
            }
            Self::IntBetweenWithZero { min, max } => {
                let v = integer(key, value)?;
                if (min..=max).contains(&v) || v == 0 {
                    Ok(())
                } else {
                    Err(ValidationError::OutOfRangeOrZero {
                        key: key.to_string(),
                        min,
                        max,
                        value: v,
                    })
                }
            }
            Self::StringLen { min, max } => {
                let Some(s) = value.as_str() else {
                    return Err(ValidationError::NotString {
                        key: key.to_string(),
                    });
                };
                let len = s.chars().count();
                if (min..=max).contains(&len) {
                    Ok(())
                } else {
                    Err(ValidationError::Length {
                        key: key.to_string(),
                        min,
                        max,
                        len,
                    })
                }
            }
        }
    }
}

fn integer(key: &str, value: &Value) -> Result<i64, ValidationError> {
    value.as_i64().ok_or_else(|| ValidationError::NotInteger {
        key: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ValidationError, Validator};

    #[test]
    fn with_zero_accepts_zero_outside_range() {
        let check = Validator::IntBetweenWithZero { min: 10, max: 600 };
        assert_eq!(check.check("timeout", &json!(0)), Ok(()));
        assert_eq!(check.check("timeout", &json!(10)), Ok(()));
        assert_eq!(check.check("timeout", &json!(600)), Ok(()));
        let err = check.check("timeout", &json!(5)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected timeout to be in the range (10 - 600) or equal to 0, got 5"
        );
    }

    #[test]
    fn non_integer_is_rejected() {
        let check = Validator::IntBetween { min: 0, max: 65535 };
        assert_eq!(
            check.check("collector_port", &json!("2055")),
            Err(ValidationError::NotInteger {
                key: "collector_port".to_string()
            })
        );
        assert_eq!(
            check.check("collector_port", &json!(1.5)).unwrap_err().to_string(),
            "expected type of collector_port to be integer"
        );
    }

    #[test]
    fn string_length_counts_chars() {
        let check = Validator::StringLen { min: 0, max: 3 };
        assert_eq!(check.check("name", &json!("äöü")), Ok(()));
        assert!(matches!(
            check.check("name", &json!("abcd")),
            Err(ValidationError::Length { len: 4, .. })
        ));
    }
}
