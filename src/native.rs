//! The native primitives the enumerator and broker are built on.
//!
//! [`StreamApi`] is implemented by [`crate::win32::Win32StreamApi`] on Windows. Failures are
//! reported as [`std::io::Error`] carrying the raw Win32 error code.

use std::{io, path::Path};

use crate::{
    record::RawStreamRecord,
    stream::{OpenIntent, OpenMode, ShareMode},
};

pub const GENERIC_READ: u32 = 0x8000_0000;
pub const GENERIC_WRITE: u32 = 0x4000_0000;

pub const FILE_SHARE_READ: u32 = 0x0000_0001;
pub const FILE_SHARE_WRITE: u32 = 0x0000_0002;
pub const FILE_SHARE_DELETE: u32 = 0x0000_0004;

pub const CREATE_NEW: u32 = 1;
pub const CREATE_ALWAYS: u32 = 2;
pub const OPEN_EXISTING: u32 = 3;
pub const OPEN_ALWAYS: u32 = 4;
pub const TRUNCATE_EXISTING: u32 = 5;

pub const FILE_ATTRIBUTE_NORMAL: u32 = 0x0000_0080;
pub const FILE_FLAG_OVERLAPPED: u32 = 0x4000_0000;

/// Arguments for a native create/open call, already translated to Win32 flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeOpenRequest {
    pub desired_access: u32,
    pub share_mode: u32,
    pub creation_disposition: u32,
    pub flags_and_attributes: u32,
}

impl NativeOpenRequest {
    pub fn from_intent(intent: &OpenIntent, overlapped_io: bool) -> Self {
        let mut desired_access = 0;
        if intent.access.can_read() {
            desired_access |= GENERIC_READ;
        }
        if intent.access.can_write() {
            desired_access |= GENERIC_WRITE;
        }

        let flags_and_attributes = if overlapped_io {
            FILE_ATTRIBUTE_NORMAL | FILE_FLAG_OVERLAPPED
        } else {
            FILE_ATTRIBUTE_NORMAL
        };

        NativeOpenRequest {
            desired_access,
            share_mode: native_share_mode(intent.share),
            creation_disposition: creation_disposition(intent.mode),
            flags_and_attributes,
        }
    }
}

fn native_share_mode(share: ShareMode) -> u32 {
    let mut mode = 0;
    if share.contains(ShareMode::DELETE) {
        mode |= FILE_SHARE_DELETE;
    }
    if share.contains(ShareMode::READ) {
        mode |= FILE_SHARE_READ;
    }
    if share.contains(ShareMode::WRITE) {
        mode |= FILE_SHARE_WRITE;
    }
    mode
}

/// Append opens like `OpenOrCreate`; positioning at the end is the caller's job.
fn creation_disposition(mode: OpenMode) -> u32 {
    match mode {
        OpenMode::CreateNew => CREATE_NEW,
        OpenMode::Create => CREATE_ALWAYS,
        OpenMode::Open => OPEN_EXISTING,
        OpenMode::OpenOrCreate => OPEN_ALWAYS,
        OpenMode::Truncate => TRUNCATE_EXISTING,
        OpenMode::Append => OPEN_ALWAYS,
    }
}

/// Native stream enumeration and file primitives.
pub trait StreamApi {
    /// An in-progress stream search.
    type Search;
    /// An open I/O handle.
    type Handle;

    /// Starts a stream search on `path`, writing the first record into `record`.
    ///
    /// Fails with `ERROR_HANDLE_EOF` when there is nothing to enumerate.
    fn find_first_stream(
        &self,
        path: &Path,
        record: &mut RawStreamRecord,
    ) -> io::Result<Self::Search>;

    /// Advances the search, writing the next record into `record`.
    ///
    /// Fails with `ERROR_HANDLE_EOF` once the search is exhausted.
    fn find_next_stream(
        &self,
        search: &mut Self::Search,
        record: &mut RawStreamRecord,
    ) -> io::Result<()>;

    /// Releases a search acquired by [`StreamApi::find_first_stream`].
    fn find_close(&self, search: Self::Search) -> io::Result<()>;

    /// Creates or opens `path` (a `<file>:<stream>` path) with the given native flags.
    fn create_file(&self, path: &Path, request: &NativeOpenRequest) -> io::Result<Self::Handle>;

    /// Opens a plain file path through the ordinary file-open primitive.
    fn open_file(
        &self,
        path: &Path,
        request: &NativeOpenRequest,
        mode: OpenMode,
    ) -> io::Result<Self::Handle>;

    /// Deletes a named stream given its `<file>:<stream>` path.
    fn delete_file(&self, path: &Path) -> io::Result<()>;

    /// Deletes a whole file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}
