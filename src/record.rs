//! Raw stream enumeration records and their decoding.

use log::warn;

use crate::{AdsResult, errors::AdsError, kind::StreamKind};

/// Capacity of the stream name buffer, in UTF-16 code units.
///
/// `WIN32_FIND_STREAM_DATA` reserves `MAX_PATH + 36` (296) code units. The scratch record keeps a
/// few more so the OS never writes past its end.
pub const STREAM_NAME_CAPACITY: usize = 300;

/// Scratch record filled by the stream enumeration calls.
///
/// The layout is a prefix-compatible superset of `WIN32_FIND_STREAM_DATA`, so a pointer to it can
/// be handed directly to `FindFirstStreamW`/`FindNextStreamW`.
#[repr(C)]
#[derive(Clone)]
pub struct RawStreamRecord {
    /// Current size of the stream in bytes.
    pub stream_size: i64,
    /// Null terminated `:<name>:<$TYPE>` string.
    pub stream_name: [u16; STREAM_NAME_CAPACITY],
}

impl RawStreamRecord {
    pub fn new() -> Self {
        RawStreamRecord {
            stream_size: 0,
            stream_name: [0u16; STREAM_NAME_CAPACITY],
        }
    }

    /// Fills the record, truncating the name to the buffer capacity. Used by in-memory backends.
    pub fn fill(&mut self, stream_size: i64, stream_name: &str) {
        self.stream_size = stream_size;
        self.stream_name = [0u16; STREAM_NAME_CAPACITY];
        for (slot, unit) in self
            .stream_name
            .iter_mut()
            .zip(stream_name.encode_utf16().take(STREAM_NAME_CAPACITY - 1))
        {
            *slot = unit;
        }
    }

    /// The name buffer up to (not including) the null terminator.
    pub fn name_units(&self) -> &[u16] {
        let end = self
            .stream_name
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(self.stream_name.len());
        &self.stream_name[..end]
    }

    /// Stream size clamped to zero; the OS never reports negative sizes.
    pub fn size(&self) -> u64 {
        self.stream_size.max(0) as u64
    }
}

impl Default for RawStreamRecord {
    fn default() -> Self {
        Self::new()
    }
}

const COLON: u16 = b':' as u16;

/// Splits a raw `:<name>:<$TYPE>` buffer into the stream name and its kind.
///
/// The buffer is read up to the first null code unit. An empty name denotes the default stream.
/// A buffer that does not start with a colon, or has no colon after the name, is rejected with
/// [`AdsError::MalformedRecord`].
pub fn parse_stream_name(raw: &[u16]) -> AdsResult<(String, StreamKind)> {
    let end = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
    let units = &raw[..end];

    let Some((&first, rest)) = units.split_first() else {
        warn!("Empty stream record");
        return Err(AdsError::MalformedRecord("empty stream record".to_string()));
    };

    if first != COLON {
        let text = String::from_utf16_lossy(units);
        warn!("Stream record without leading colon: {:?}", text);
        return Err(AdsError::MalformedRecord(text));
    }

    let Some(boundary) = rest.iter().position(|&c| c == COLON) else {
        let text = String::from_utf16_lossy(units);
        warn!("Stream record without type separator: {:?}", text);
        return Err(AdsError::MalformedRecord(text));
    };

    let name = String::from_utf16_lossy(&rest[..boundary]);
    let token = String::from_utf16_lossy(&rest[boundary + 1..]);

    Ok((name, StreamKind::from_type_token(&token)))
}
