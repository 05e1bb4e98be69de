mod class;
mod errors;
mod value;

pub use class::Class;
pub use value::FieldValue;

pub type EntityId = String;
