use std::{io, path::Path};

use thiserror::Error;

use crate::kind::StreamKind;

#[derive(Debug, Error)]
pub enum AdsError {
    #[error("Specified file was not found: \"{path}\"")]
    NotFound { path: String },

    #[error("Could not find a part of the path \"{path}\"")]
    DirectoryNotFound { path: String },

    #[error("Access to the path \"{path}\" was denied")]
    AccessDenied { path: String },

    #[error("Could not find the drive for the path \"{path}\"")]
    DriveNotFound { path: String },

    #[error(
        "The process cannot access the file \"{path}\" because it is being used by another process"
    )]
    SharingViolation { path: String },

    #[error("Cannot create \"{path}\" because a file or stream with the same name already exists")]
    AlreadyExists { path: String },

    #[error("The path \"{path}\" is too long")]
    PathTooLong { path: String },

    #[error("The operation on \"{path}\" was cancelled")]
    Cancelled { path: String },

    #[error("Only $DATA streams support I/O, stream {name:?} is {kind}")]
    UnsupportedStreamKind { name: String, kind: StreamKind },

    #[error("Malformed stream record: {0:?}")]
    MalformedRecord(String),

    #[error("Windows error {code} on \"{path}\": {message}")]
    NativeFailure {
        code: u32,
        message: String,
        path: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

pub(crate) const ERROR_FILE_NOT_FOUND: u32 = 2;
pub(crate) const ERROR_PATH_NOT_FOUND: u32 = 3;
pub(crate) const ERROR_ACCESS_DENIED: u32 = 5;
pub(crate) const ERROR_INVALID_DRIVE: u32 = 15;
pub(crate) const ERROR_SHARING_VIOLATION: u32 = 32;
pub(crate) const ERROR_HANDLE_EOF: u32 = 38;
pub(crate) const ERROR_FILE_EXISTS: u32 = 80;
pub(crate) const ERROR_ALREADY_EXISTS: u32 = 183;
pub(crate) const ERROR_FILENAME_EXCED_RANGE: u32 = 206;
pub(crate) const ERROR_OPERATION_ABORTED: u32 = 995;

const UNKNOWN_PATH: &str = "<unknown>";
const UNKNOWN_MESSAGE: &str = "Unknown IO error.";

// First match wins, so a code appears at most once.
const KNOWN_ERRORS: &[(u32, fn(String) -> AdsError)] = &[
    (ERROR_FILE_NOT_FOUND, |path| AdsError::NotFound { path }),
    (ERROR_PATH_NOT_FOUND, |path| AdsError::DirectoryNotFound { path }),
    (ERROR_ACCESS_DENIED, |path| AdsError::AccessDenied { path }),
    (ERROR_INVALID_DRIVE, |path| AdsError::DriveNotFound { path }),
    (ERROR_SHARING_VIOLATION, |path| AdsError::SharingViolation { path }),
    (ERROR_FILE_EXISTS, |path| AdsError::AlreadyExists { path }),
    (ERROR_ALREADY_EXISTS, |path| AdsError::AlreadyExists { path }),
    (ERROR_FILENAME_EXCED_RANGE, |path| AdsError::PathTooLong { path }),
    (ERROR_OPERATION_ABORTED, |path| AdsError::Cancelled { path }),
];

/// Maps a native error code and the path it occurred on to an [`AdsError`].
///
/// Codes outside the known set become [`AdsError::NativeFailure`], keeping the code and the
/// system message for it.
pub fn translate(code: u32, path: Option<&Path>) -> AdsError {
    let path = path.map_or_else(
        || UNKNOWN_PATH.to_string(),
        |p| p.to_string_lossy().into_owned(),
    );

    match KNOWN_ERRORS.iter().find(|(known, _)| *known == code) {
        Some((_, make)) => make(path),
        None => AdsError::NativeFailure {
            code,
            message: message_for(code),
            path,
        },
    }
}

/// Translates an error returned by a native primitive.
///
/// Errors without an OS code did not come from the native layer and are kept as
/// [`AdsError::IoError`].
pub fn translate_io(err: io::Error, path: Option<&Path>) -> AdsError {
    match err.raw_os_error() {
        Some(code) => translate(code as u32, path),
        None => AdsError::IoError(err),
    }
}

#[cfg(windows)]
fn message_for(code: u32) -> String {
    let message = windows::core::HRESULT::from_win32(code).message();
    let message = message.trim();
    if message.is_empty() {
        UNKNOWN_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}

#[cfg(not(windows))]
fn message_for(_code: u32) -> String {
    UNKNOWN_MESSAGE.to_string()
}
