//! Classification of the attribute type tokens reported by stream enumeration.

use std::fmt;

/// The NTFS attribute class a stream belongs to.
///
/// Only [`StreamKind::Data`] streams carry bytes that can be read, written, or deleted.
/// All other kinds describe filesystem metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StreamKind {
    Unknown,
    AttributeList,
    Bitmap,
    Data,
    ExtendedAttributes,
    ExtendedAttributeInformation,
    FileName,
    IndexAllocation,
    IndexRoot,
    LoggedUtilityStream,
    ObjectId,
    ReparsePoint,
}

const TYPE_TOKENS: &[(&str, StreamKind)] = &[
    ("$ATTRIBUTE_LIST", StreamKind::AttributeList),
    ("$BITMAP", StreamKind::Bitmap),
    ("$DATA", StreamKind::Data),
    ("$EA", StreamKind::ExtendedAttributes),
    ("$EA_INFORMATION", StreamKind::ExtendedAttributeInformation),
    ("$FILE_NAME", StreamKind::FileName),
    ("$INDEX_ALLOCATION", StreamKind::IndexAllocation),
    ("$INDEX_ROOT", StreamKind::IndexRoot),
    ("$LOGGED_UTILITY_STREAM", StreamKind::LoggedUtilityStream),
    ("$OBJECT_ID", StreamKind::ObjectId),
    ("$REPARSE_POINT", StreamKind::ReparsePoint),
];

impl StreamKind {
    /// Looks up the kind for a raw type token such as `$DATA`.
    ///
    /// Unrecognized tokens map to [`StreamKind::Unknown`]; this never fails.
    pub fn from_type_token(token: &str) -> Self {
        TYPE_TOKENS
            .iter()
            .find(|(name, _)| *name == token)
            .map_or(StreamKind::Unknown, |(_, kind)| *kind)
    }

    /// Returns the type token for this kind, or `None` for [`StreamKind::Unknown`].
    pub fn type_token(&self) -> Option<&'static str> {
        TYPE_TOKENS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(name, _)| *name)
    }

    /// Returns true if the stream holds byte data.
    pub fn is_data(&self) -> bool {
        *self == StreamKind::Data
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_token().unwrap_or("<unknown>"))
    }
}
