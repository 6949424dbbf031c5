//! Error taxonomy shared with the dashboard. Codes are stable wire values.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("An unknown error occurred.")]
    Unknown,
    #[error("Configuration file contains invalid settings.")]
    ConfigSettingsNotValid,
    #[error("Vendor utility not found.")]
    VendorUtilityNotFound,
    #[error("Vendor command returned no data.")]
    VendorDataNotReturned,
    #[error("Vendor command returned unparseable data.")]
    VendorDataBadParse,
    #[error("Vendor data valid, but not enough received.")]
    VendorDataNotEnough,
    #[error("Unable to open process for reading.")]
    ProcessNotOpened,
    #[error("Bad array data received.")]
    BadArrayData,
}

impl ErrorKind {
    pub fn code(self) -> u16 {
        match self {
            ErrorKind::Unknown => 100,
            ErrorKind::ConfigSettingsNotValid => 200,
            ErrorKind::VendorUtilityNotFound => 300,
            ErrorKind::VendorDataNotReturned => 301,
            ErrorKind::VendorDataBadParse => 302,
            ErrorKind::VendorDataNotEnough => 303,
            ErrorKind::ProcessNotOpened => 400,
            ErrorKind::BadArrayData => 500,
        }
    }
}

/// One entry of a reading's `error` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub code: u16,
    pub message: String,
    pub extra: String,
}

impl ErrorRecord {
    pub fn new(kind: ErrorKind, extra: impl Into<String>) -> Self {
        Self {
            code: kind.code(),
            message: kind.to_string(),
            extra: extra.into(),
        }
    }
}

impl From<ErrorKind> for ErrorRecord {
    fn from(kind: ErrorKind) -> Self {
        ErrorRecord::new(kind, "")
    }
}
