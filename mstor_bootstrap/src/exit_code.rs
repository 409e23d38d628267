//! Unix exit codes following BSD `sysexits.h` conventions.
//!
//! `main` maps the top-level `Result` it gets back from running the store
//! into one of these before calling `std::process::exit`, so shell scripts
//! and supervisors driving `mstor` can distinguish "bad arguments" from
//! "disk full" from "someone sent SIGTERM" without parsing log text.

use std::fmt;

use mstor_domain::error::MstorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    #[default]
    Success = 0,
    Error = 1,
    UsageError = 64,
    DataError = 65,
    NoInput = 66,
    Unavailable = 69,
    Software = 70,
    OsError = 71,
    CantCreate = 73,
    IoError = 74,
    TempFail = 75,
    NoPerm = 77,
    Config = 78,
    Interrupted = 130,
    Terminated = 143,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a store error to an exit code using its stable `category()` tag
    /// rather than matching on display text.
    pub fn from_mstor_error(err: &MstorError) -> Self {
        match err.category() {
            "permission" => ExitCode::NoPerm,
            "not_found" | "no_such_user" => ExitCode::NoInput,
            "not_dir" | "is_dir" | "not_empty" | "name_too_long" | "unsupported" => {
                ExitCode::UsageError
            }
            "corruption" | "malformed_record" | "incompatible_version" => ExitCode::DataError,
            "io" => {
                if err.is_recoverable() {
                    ExitCode::TempFail
                } else {
                    ExitCode::IoError
                }
            }
            "out_of_memory" => ExitCode::OsError,
            _ => ExitCode::Software,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::Unavailable => "Service unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::OsError => "System error",
            ExitCode::CantCreate => "Cannot create output file",
            ExitCode::IoError => "I/O error",
            ExitCode::TempFail => "Temporary failure, retry",
            ExitCode::NoPerm => "Permission denied",
            ExitCode::Config => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_permission_errors() {
        let err = MstorError::permission("no write access");
        assert_eq!(ExitCode::from_mstor_error(&err), ExitCode::NoPerm);
    }

    #[test]
    fn maps_not_found_and_no_such_user() {
        assert_eq!(
            ExitCode::from_mstor_error(&MstorError::not_found("/a")),
            ExitCode::NoInput
        );
        assert_eq!(
            ExitCode::from_mstor_error(&MstorError::no_such_user("bob")),
            ExitCode::NoInput
        );
    }

    #[test]
    fn maps_io_by_recoverability() {
        let err: MstorError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(ExitCode::from_mstor_error(&err), ExitCode::TempFail);
    }

    #[test]
    fn maps_corruption_to_data_error() {
        let err = MstorError::corruption("bad node payload length");
        assert_eq!(ExitCode::from_mstor_error(&err), ExitCode::DataError);
    }

    #[test]
    fn values_match_sysexits() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::UsageError.as_i32(), 64);
        assert_eq!(ExitCode::Config.as_i32(), 78);
        assert_eq!(ExitCode::Terminated.as_i32(), 143);
    }
}
