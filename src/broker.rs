//! Turns stream descriptors into native handles, and deletes streams.

use std::{
    io::{Seek, SeekFrom},
    path::Path,
};

use log::{debug, warn};

use crate::{
    AdsResult,
    enumerator::StreamIter,
    errors::{self, AdsError},
    native::{NativeOpenRequest, StreamApi},
    stream::{DataStream, OpenIntent, OpenMode, ShareMode, StreamAccess},
};

#[cfg(windows)]
use crate::win32::Win32StreamApi;

/// Options applied to every open issued by a [`StreamBroker`].
#[derive(Debug, Clone, Default)]
pub struct BrokerOptions {
    /// Request overlapped-capable handles (`FILE_FLAG_OVERLAPPED`).
    ///
    /// Such handles must be driven with overlapped I/O; `std::fs::File` reads and writes on them
    /// are not supported.
    pub overlapped_io: bool,
}

/// Enumerates, opens, and deletes the data streams of files through a [`StreamApi`].
#[derive(Debug, Clone)]
pub struct StreamBroker<A: StreamApi> {
    api: A,
    options: BrokerOptions,
}

#[cfg(windows)]
impl StreamBroker<Win32StreamApi> {
    /// Creates a broker backed by the Windows stream API.
    pub fn native() -> Self {
        StreamBroker::new(Win32StreamApi)
    }
}

#[cfg(windows)]
impl Default for StreamBroker<Win32StreamApi> {
    fn default() -> Self {
        Self::native()
    }
}

impl<A: StreamApi> StreamBroker<A> {
    pub fn new(api: A) -> Self {
        StreamBroker {
            api,
            options: BrokerOptions::default(),
        }
    }

    pub fn new_with_options(api: A, options: BrokerOptions) -> Self {
        StreamBroker { api, options }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn options(&self) -> &BrokerOptions {
        &self.options
    }

    /// Returns a lazy iterator over the streams of `file`.
    pub fn enumerate<'p>(&self, file: &'p Path) -> StreamIter<'p, '_, A> {
        StreamIter::new(&self.api, file)
    }

    /// Finds the stream called `name` on `file`. The default stream is named `""`.
    pub fn find<'p>(&self, file: &'p Path, name: &str) -> AdsResult<Option<DataStream<'p>>> {
        for stream in self.enumerate(file) {
            let stream = stream?;
            if stream.name() == name {
                return Ok(Some(stream));
            }
        }
        Ok(None)
    }

    /// Opens `stream` with the requested mode, access, and sharing.
    ///
    /// The default stream is opened through the plain file path; named streams through
    /// `<file>:<name>`. Streams that are not `$DATA` are rejected before any native call.
    pub fn open(&self, stream: &DataStream<'_>, intent: OpenIntent) -> AdsResult<A::Handle> {
        ensure_data_stream(stream)?;

        let request = NativeOpenRequest::from_intent(&intent, self.options.overlapped_io);
        let target = stream.target_path();
        debug!("Opening {} with {:?}", target.display(), intent);

        let result = if stream.is_default() {
            self.api.open_file(&target, &request, intent.mode)
        } else {
            self.api.create_file(&target, &request)
        };

        result.map_err(|err| {
            warn!("Error opening {}: {}", target.display(), err);
            errors::translate_io(err, Some(&target))
        })
    }

    /// Deletes `stream`. Deleting the default stream deletes the whole file.
    pub fn delete(&self, stream: &DataStream<'_>) -> AdsResult<()> {
        ensure_data_stream(stream)?;

        let target = stream.target_path();
        debug!("Deleting {}", target.display());

        let result = if stream.is_default() {
            self.api.remove_file(&target)
        } else {
            self.api.delete_file(&target)
        };

        result.map_err(|err| {
            warn!("Error deleting {}: {}", target.display(), err);
            errors::translate_io(err, Some(&target))
        })
    }

    /// Creates a new named stream on `file` for writing. Fails if the stream exists.
    pub fn create(&self, file: &Path, name: &str) -> AdsResult<A::Handle> {
        self.open(
            &DataStream::new(file, name),
            OpenIntent::new(OpenMode::CreateNew, StreamAccess::Write, ShareMode::NONE),
        )
    }

    /// Opens an existing stream for reading, letting others read it too.
    pub fn open_read(&self, stream: &DataStream<'_>) -> AdsResult<A::Handle> {
        self.open(
            stream,
            OpenIntent::new(OpenMode::Open, StreamAccess::Read, ShareMode::READ),
        )
    }

    /// Opens the stream for writing at its start, creating it if missing. Contents are kept.
    pub fn open_write(&self, stream: &DataStream<'_>) -> AdsResult<A::Handle> {
        self.open(
            stream,
            OpenIntent::new(OpenMode::OpenOrCreate, StreamAccess::Write, ShareMode::NONE),
        )
    }

    /// Creates the stream, or truncates it if it exists, for reading and writing.
    pub fn create_or_truncate(&self, stream: &DataStream<'_>) -> AdsResult<A::Handle> {
        self.open(
            stream,
            OpenIntent::new(OpenMode::Create, StreamAccess::ReadWrite, ShareMode::NONE),
        )
    }

    /// Opens an existing stream for writing and truncates it to zero bytes.
    pub fn truncate(&self, stream: &DataStream<'_>) -> AdsResult<A::Handle> {
        self.open(
            stream,
            OpenIntent::new(OpenMode::Truncate, StreamAccess::Write, ShareMode::NONE),
        )
    }
}

impl<A> StreamBroker<A>
where
    A: StreamApi,
    A::Handle: Seek,
{
    /// Opens the stream for writing positioned at its end, creating it if missing.
    pub fn open_append(&self, stream: &DataStream<'_>) -> AdsResult<A::Handle> {
        let mut handle = self.open(
            stream,
            OpenIntent::new(OpenMode::Append, StreamAccess::Write, ShareMode::NONE),
        )?;
        handle
            .seek(SeekFrom::End(0))
            .map_err(|err| errors::translate_io(err, Some(&stream.target_path())))?;
        Ok(handle)
    }
}

fn ensure_data_stream(stream: &DataStream<'_>) -> AdsResult<()> {
    if stream.kind().is_data() {
        return Ok(());
    }

    warn!(
        "Refusing I/O on {} stream {:?} of {}",
        stream.kind(),
        stream.name(),
        stream.file().display()
    );
    Err(AdsError::UnsupportedStreamKind {
        name: stream.name().to_string(),
        kind: stream.kind(),
    })
}
