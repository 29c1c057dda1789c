use alloc::borrow::Cow;
use core::fmt;

/// Failures the adapter detects itself.
///
/// Errors raised by an [`Os`](crate::os::Os) or
/// [`BuildSteps`](crate::steps::BuildSteps) implementation are never
/// wrapped in this type; they travel up unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreError {
    Option(Cow<'static, str>),
    EmptySources(Cow<'static, str>),
    Collision(Cow<'static, str>),
}

macro_rules! bail_option_error {
    ($msg:expr, $($arg:tt)*) => { return Err($crate::error::TreError::Option(alloc::format!($msg, $($arg)*).into()).into()) };
    ($msg:expr) =>              { return Err($crate::error::TreError::Option(alloc::format!($msg).into()).into()) };
}

macro_rules! bail_collision_error {
    ($msg:expr, $($arg:tt)*) => { return Err($crate::error::TreError::Collision(alloc::format!($msg, $($arg)*).into()).into()) };
    ($msg:expr) =>              { return Err($crate::error::TreError::Collision(alloc::format!($msg).into()).into()) };
}

pub(crate) use {bail_collision_error, bail_option_error};

impl fmt::Display for TreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TreError::Option(msg) => write!(f, "Invalid option: {}", msg),
            TreError::EmptySources(glob) => write!(f, "No sources matched: {}", glob),
            TreError::Collision(msg) => write!(f, "Staging collision: {}", msg),
        }
    }
}

impl core::error::Error for TreError {}
