//! Error type shared by the conversion, execution and binding helpers.
//!
//! Script compile and runtime failures are not represented here: they stay
//! on the caller's `v8::TryCatch` (see [`crate::execute_js`]).

/// Errors returned by the V8 helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The value's `ToString` threw (e.g. a `Symbol`).
    #[error("value could not be converted to a string")]
    StringConversion,

    /// A string vector was requested from something that is not an array.
    #[error("value is not an array")]
    NotAnArray,

    /// An array element's `ToString` threw.
    #[error("array element {index} could not be converted to a string")]
    ElementConversion { index: u32 },

    /// `describe_error` was called on a `TryCatch` that caught nothing.
    #[error("no exception has been caught")]
    NothingCaught,

    /// V8 refused to allocate a string (usually: too long).
    #[error("failed to allocate V8 string")]
    StringAllocation,

    /// V8 failed to instantiate a native function.
    #[error("failed to create function `{0}`")]
    FunctionCreation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
