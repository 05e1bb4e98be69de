use crate::types::errors::LabelError;
use crate::types::FieldValue;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The two outcomes a transaction can be classified into.
///
/// Both the stored ground-truth column and the inference verdict are normalized
/// into this type, so reconciliation never compares encoded strings.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Class {
    Legit,
    Fraud
}

impl Class {
    /// Applies the decision rule: strictly above the threshold is fraud.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score > threshold {
            Class::Fraud
        } else {
            Class::Legit
        }
    }

    /// Normalizes a stored classification value.
    ///
    /// Accepts `0`/`1` as floats or as text (`"0"`, `"1"`, `"0.0"`, `"1.0"`).
    pub fn from_field(value: &FieldValue) -> Result<Self, LabelError> {
        match value {
            FieldValue::Float(number) => Self::from_number(*number),
            FieldValue::Text(text) => {
                let number: f64 = text.trim().parse()
                    .map_err(|_| LabelError::UnknownText(text.clone()))?;

                Self::from_number(number).map_err(|_| LabelError::UnknownText(text.clone()))
            }
        }
    }

    fn from_number(number: f64) -> Result<Self, LabelError> {
        if number == 0.0 {
            Ok(Class::Legit)
        } else if number == 1.0 {
            Ok(Class::Fraud)
        } else {
            Err(LabelError::UnknownNumber(number))
        }
    }
}

impl Display for Class {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Class::Legit => write!(formatter, "NOT FRAUD"),
            Class::Fraud => write!(formatter, "FRAUD")
        }
    }
}
