//! Built-in rule handlers

pub mod email;
pub mod length;
pub mod lower;
pub mod nonzero;
pub mod required;

pub use email::Email;
pub use length::Length;
pub use lower::Lower;
pub use nonzero::NonZero;
pub use required::Required;
