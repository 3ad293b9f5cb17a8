//! # ntfs-streams-rs
//!
//! A Rust library for discovering, reading, writing, and deleting NTFS alternate data streams.
//!
//! An NTFS file can carry named streams besides its ordinary contents. They are invisible to the
//! usual file APIs and are addressed as `<file>:<stream>`. This crate enumerates them as Rust
//! iterators and opens them as regular [`std::fs::File`] handles.
//!
//! ## Features
//! - Enumerate every stream of a file, with its name, size, and attribute kind
//! - Open named streams with explicit mode, access, and sharing
//! - Create, append to, truncate, and delete named streams
//! - Safe wrappers over the Windows stream API; native search handles are always released
//!
//! ## Example: Enumerate Streams
//! ```rust,no_run
//! # #[cfg(windows)]
//! # fn main() -> ntfs_streams_rs::AdsResult<()> {
//! use ntfs_streams_rs::broker::StreamBroker;
//! use std::{io::Read, path::Path};
//!
//! let file = Path::new(r"C:\Users\Public\Documents\test.txt");
//! let broker = StreamBroker::native();
//! for stream in broker.enumerate(file) {
//!     let stream = stream?;
//!     println!("stream {:?} ({} bytes, {})", stream.name(), stream.length(), stream.kind());
//!     if stream.kind().is_data() {
//!         let mut contents = Vec::new();
//!         broker.open_read(&stream)?.read_to_end(&mut contents)?;
//!     }
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```
//!
//! ## Example: Append to a Stream
//! ```rust,no_run
//! # #[cfg(windows)]
//! # fn main() -> ntfs_streams_rs::AdsResult<()> {
//! use ntfs_streams_rs::{broker::StreamBroker, stream::DataStream};
//! use std::{io::Write, path::Path};
//!
//! let file = Path::new(r"C:\Users\Public\Documents\test.txt");
//! let broker = StreamBroker::native();
//! let notes = DataStream::new(file, "notes");
//! broker.open_append(&notes)?.write_all(b"visited\n")?;
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```
//!
//! ## Platform
//! - Windows, NTFS volumes. The enumeration and open logic is portable and runs against any
//!   [`native::StreamApi`] implementation.
//!
//! ## License
//! MIT License.

pub mod broker;
pub mod enumerator;
pub mod errors;
pub mod kind;
pub mod native;
pub mod record;
pub mod stream;
#[cfg(windows)]
pub mod win32;

// Re-export commonly used types
pub use broker::{BrokerOptions, StreamBroker};
pub use errors::AdsError;
pub use kind::StreamKind;
pub use stream::{DataStream, OpenIntent, OpenMode, ShareMode, StreamAccess};

/// A convenient type alias for Results with AdsError.
pub type AdsResult<T> = std::result::Result<T, AdsError>;
