/// A dynamically-typed scalar as held in a store bin.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Float(f64)
}

impl FieldValue {
    /// Interprets the value as a number.
    ///
    /// Text is trimmed and parsed as a decimal float. Returns `None` when the
    /// value has no numeric reading; callers decide how to fill the gap.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(number) => Some(*number),
            FieldValue::Text(text) => text.trim().parse().ok()
        }
    }

    /// Parses a raw cell, preferring a float reading over text.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(number) => FieldValue::Float(number),
            Err(_) => FieldValue::Text(raw.to_string())
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}
