use serde::{Deserialize, Serialize};
use thiserror::Error;
#[cfg(feature = "backend")]
use {crate::api::error::ServerError, http::StatusCode};

#[cfg(feature = "backend")]
use crate::progression::ProgressionError;

macro_rules! response_error {
    ($name:ident {
        $(
            #[code($variant_code:expr)]
            $variant:ident
            $({ $($var_struct_body_tt:tt)* })?
        ,)*
    }) => {

        #[derive(Debug, Clone, Serialize, Deserialize, Error)]
        pub enum $name {
            $(
                #[error("{}::{}: {:?}", stringify!($name), stringify!($variant), self)]
                $variant $({
                    $($var_struct_body_tt)*
                })?,
            )*
        }

        #[cfg(feature="backend")]
        impl From<$name> for ServerError<$name> {
            fn from(inner: $name) -> Self {
                let code = match &inner {
                    $( $name::$variant { .. } => $variant_code, )*
                };
                Self::Inner { code, inner }
            }
        }
    };
}

response_error!(RecommendationError {
    #[code(StatusCode::NOT_FOUND)]
    NoActiveProgramme { lifter_id: String },
    #[code(StatusCode::BAD_REQUEST)]
    InvalidInput { message: String },
});

response_error!(CompleteWorkoutError {
    #[code(StatusCode::NOT_FOUND)]
    NoActiveProgramme { lifter_id: String },
    #[code(StatusCode::BAD_REQUEST)]
    InvalidInput { message: String },
});

response_error!(RpeScheduleError {
    #[code(StatusCode::BAD_REQUEST)]
    InvalidProgramLength { message: String },
});

/// Maps engine errors onto a route error. Missing context and invalid input
/// become typed errors, store failures are surfaced as database errors
#[cfg(feature = "backend")]
macro_rules! from_progression_error {
    ($name:ident) => {
        impl From<ProgressionError> for ServerError<$name> {
            fn from(err: ProgressionError) -> Self {
                match err {
                    ProgressionError::NoActiveProgramme { lifter_id } => {
                        $name::NoActiveProgramme { lifter_id: lifter_id.to_string() }.into()
                    }
                    ProgressionError::Store { message } => ServerError::Database { message },
                    e @ ProgressionError::ProgrammeNotFound { .. } => {
                        ServerError::Other { message: e.to_string() }
                    }
                    e @ (ProgressionError::InvalidProgramLength { .. }
                    | ProgressionError::InvalidLoad { .. }
                    | ProgressionError::PositionNotActive { .. }) => {
                        $name::InvalidInput { message: e.to_string() }.into()
                    }
                }
            }
        }
    };
}

#[cfg(feature = "backend")]
from_progression_error!(RecommendationError);
#[cfg(feature = "backend")]
from_progression_error!(CompleteWorkoutError);

#[cfg(feature = "backend")]
impl From<ProgressionError> for ServerError<RpeScheduleError> {
    fn from(err: ProgressionError) -> Self {
        match err {
            ProgressionError::Store { message } => ServerError::Database { message },
            e => RpeScheduleError::InvalidProgramLength { message: e.to_string() }.into(),
        }
    }
}
