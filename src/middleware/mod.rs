pub mod error_envelope;
pub mod path_id;
pub mod validate;

pub use error_envelope::normalize_errors;
pub use path_id::PathId;
pub use validate::ValidatedJson;
