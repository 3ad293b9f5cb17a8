//! [`StreamApi`] backed by the Windows stream enumeration and file APIs.

use std::{
    ffi::c_void,
    fs::{File, OpenOptions},
    io,
    os::windows::{fs::OpenOptionsExt, io::FromRawHandle},
    path::Path,
};

use log::debug;
use windows::{
    Win32::{
        Foundation::HANDLE,
        Storage::FileSystem::{
            CreateFileW, DeleteFileW, FILE_CREATION_DISPOSITION, FILE_FLAGS_AND_ATTRIBUTES,
            FILE_SHARE_MODE, FindClose, FindFirstStreamW, FindNextStreamW, FindStreamInfoStandard,
        },
    },
    core::HSTRING,
};

use crate::{
    native::{FILE_FLAG_OVERLAPPED, GENERIC_READ, GENERIC_WRITE, NativeOpenRequest, StreamApi},
    record::RawStreamRecord,
    stream::OpenMode,
};

/// Search handle returned by `FindFirstStreamW`.
#[derive(Debug)]
pub struct FindStreamHandle(HANDLE);

/// The Windows stream API. Handles are returned as [`std::fs::File`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32StreamApi;

/// Converts a `windows` error into an `io::Error` carrying the Win32 code.
fn to_io_error(err: windows::core::Error) -> io::Error {
    let hresult = err.code().0 as u32;
    // HRESULT_FROM_WIN32 puts the Win32 code in the low word under FACILITY_WIN32.
    if hresult & 0xFFFF_0000 == 0x8007_0000 {
        io::Error::from_raw_os_error((hresult & 0xFFFF) as i32)
    } else {
        io::Error::from_raw_os_error(hresult as i32)
    }
}

impl StreamApi for Win32StreamApi {
    type Search = FindStreamHandle;
    type Handle = File;

    fn find_first_stream(
        &self,
        path: &Path,
        record: &mut RawStreamRecord,
    ) -> io::Result<FindStreamHandle> {
        // SAFETY: RawStreamRecord is repr(C) and at least as large as WIN32_FIND_STREAM_DATA,
        // which is what FindStreamInfoStandard writes.
        let handle = unsafe {
            FindFirstStreamW(
                &HSTRING::from(path.as_os_str()),
                FindStreamInfoStandard,
                record as *mut RawStreamRecord as *mut c_void,
                None,
            )
        }
        .map_err(to_io_error)?;

        Ok(FindStreamHandle(handle))
    }

    fn find_next_stream(
        &self,
        search: &mut FindStreamHandle,
        record: &mut RawStreamRecord,
    ) -> io::Result<()> {
        unsafe { FindNextStreamW(search.0, record as *mut RawStreamRecord as *mut c_void) }
            .map_err(to_io_error)
    }

    fn find_close(&self, search: FindStreamHandle) -> io::Result<()> {
        unsafe { FindClose(search.0) }.map_err(to_io_error)
    }

    fn create_file(&self, path: &Path, request: &NativeOpenRequest) -> io::Result<File> {
        let handle = unsafe {
            CreateFileW(
                &HSTRING::from(path.as_os_str()),
                request.desired_access,
                FILE_SHARE_MODE(request.share_mode),
                None,
                FILE_CREATION_DISPOSITION(request.creation_disposition),
                FILE_FLAGS_AND_ATTRIBUTES(request.flags_and_attributes),
                None,
            )
        }
        .map_err(to_io_error)?;

        debug!("Opened stream handle for {}", path.display());
        // SAFETY: CreateFileW returned a valid handle that nothing else owns.
        Ok(unsafe { File::from_raw_handle(handle.0) })
    }

    fn open_file(
        &self,
        path: &Path,
        request: &NativeOpenRequest,
        mode: OpenMode,
    ) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options
            .read(request.desired_access & GENERIC_READ != 0)
            .write(request.desired_access & GENERIC_WRITE != 0)
            .share_mode(request.share_mode)
            .custom_flags(request.flags_and_attributes & FILE_FLAG_OVERLAPPED);

        match mode {
            OpenMode::CreateNew => options.create_new(true),
            OpenMode::Create => options.create(true).truncate(true),
            OpenMode::Open => &mut options,
            OpenMode::OpenOrCreate | OpenMode::Append => options.create(true),
            OpenMode::Truncate => options.truncate(true),
        };

        options.open(path)
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        unsafe { DeleteFileW(&HSTRING::from(path.as_os_str())) }.map_err(to_io_error)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}
