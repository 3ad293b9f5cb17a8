//! Stream descriptors and the open intent used to acquire handles to them.

use std::{
    ffi::OsString,
    ops::{BitOr, BitOrAssign},
    path::{Path, PathBuf},
};

use crate::kind::StreamKind;

/// Describes one data stream attached to a file.
///
/// The descriptor borrows the owning file path and holds no OS resource. `length` is the size
/// observed when the stream was enumerated and may be stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataStream<'a> {
    file: &'a Path,
    name: String,
    length: u64,
    kind: StreamKind,
}

impl<'a> DataStream<'a> {
    /// Describes a `$DATA` stream that may not exist yet, e.g. one about to be created.
    pub fn new(file: &'a Path, name: impl Into<String>) -> Self {
        DataStream {
            file,
            name: name.into(),
            length: 0,
            kind: StreamKind::Data,
        }
    }

    pub(crate) fn discovered(file: &'a Path, name: String, length: u64, kind: StreamKind) -> Self {
        DataStream {
            file,
            name,
            length,
            kind,
        }
    }

    /// The file this stream belongs to.
    pub fn file(&self) -> &'a Path {
        self.file
    }

    /// The stream name. Empty for the default stream.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in bytes at enumeration time.
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    /// Returns true for the file's unnamed stream.
    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    /// The path handed to the OS for this stream: `<file>:<name>`, or the plain file path for
    /// the default stream.
    pub fn target_path(&self) -> PathBuf {
        if self.is_default() {
            return self.file.to_path_buf();
        }

        let mut target = OsString::from(self.file.as_os_str());
        target.push(":");
        target.push(&self.name);
        PathBuf::from(target)
    }
}

/// How an open treats an existing or missing stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Create a new stream, fail if it exists.
    CreateNew,
    /// Create a new stream, truncating an existing one.
    Create,
    /// Open an existing stream, fail if it is missing.
    Open,
    /// Open the stream, creating it if missing.
    OpenOrCreate,
    /// Open an existing stream and truncate it to zero bytes.
    Truncate,
    /// Open or create the stream; the caller positions at the end.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamAccess {
    Read,
    Write,
    ReadWrite,
}

impl StreamAccess {
    pub fn can_read(&self) -> bool {
        matches!(self, StreamAccess::Read | StreamAccess::ReadWrite)
    }

    pub fn can_write(&self) -> bool {
        matches!(self, StreamAccess::Write | StreamAccess::ReadWrite)
    }
}

/// Which concurrent opens other handles may perform while this one is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShareMode(u8);

impl ShareMode {
    pub const NONE: ShareMode = ShareMode(0);
    pub const READ: ShareMode = ShareMode(1);
    pub const WRITE: ShareMode = ShareMode(1 << 1);
    pub const DELETE: ShareMode = ShareMode(1 << 2);

    pub fn contains(&self, other: ShareMode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ShareMode {
    type Output = ShareMode;

    fn bitor(self, rhs: ShareMode) -> ShareMode {
        ShareMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for ShareMode {
    fn bitor_assign(&mut self, rhs: ShareMode) {
        self.0 |= rhs.0;
    }
}

/// The mode, access, and sharing requested for an open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenIntent {
    pub mode: OpenMode,
    pub access: StreamAccess,
    pub share: ShareMode,
}

impl Default for OpenIntent {
    fn default() -> Self {
        OpenIntent {
            mode: OpenMode::Open,
            access: StreamAccess::Read,
            share: ShareMode::NONE,
        }
    }
}

impl OpenIntent {
    pub fn new(mode: OpenMode, access: StreamAccess, share: ShareMode) -> Self {
        OpenIntent {
            mode,
            access,
            share,
        }
    }

    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn access(mut self, access: StreamAccess) -> Self {
        self.access = access;
        self
    }

    pub fn share(mut self, share: ShareMode) -> Self {
        self.share = share;
        self
    }
}
