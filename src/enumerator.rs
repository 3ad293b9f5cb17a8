//! Lazy enumeration of the streams attached to a file.
//!
//! A [`StreamIter`] owns at most one native search. The search is acquired on the first call to
//! `next`, and released exactly once: when the OS reports the end of the search, when a record
//! fails to decode or the OS reports an error, or when the iterator is dropped early.

use std::{iter::FusedIterator, path::Path};

use log::{debug, warn};

use crate::{
    AdsResult,
    errors::{self, ERROR_HANDLE_EOF},
    native::StreamApi,
    record::{RawStreamRecord, parse_stream_name},
    stream::DataStream,
};

enum SearchState<S> {
    Unopened,
    Active(S),
    Finished,
}

/// Iterator over the streams of one file, in the order the OS reports them.
///
/// Yields `Err` at most once; the iterator is finished afterwards.
pub struct StreamIter<'p, 'a, A: StreamApi> {
    api: &'a A,
    file: &'p Path,
    record: RawStreamRecord,
    state: SearchState<A::Search>,
}

impl<'p, 'a, A: StreamApi> StreamIter<'p, 'a, A> {
    pub(crate) fn new(api: &'a A, file: &'p Path) -> Self {
        StreamIter {
            api,
            file,
            record: RawStreamRecord::new(),
            state: SearchState::Unopened,
        }
    }

    /// The file being enumerated.
    pub fn file(&self) -> &'p Path {
        self.file
    }

    /// Stops the enumeration and releases the native search, reporting a failed release.
    ///
    /// Dropping the iterator releases the search too, but can only log a failure.
    pub fn close(mut self) -> AdsResult<()> {
        match std::mem::replace(&mut self.state, SearchState::Finished) {
            SearchState::Active(search) => {
                debug!("Closing stream search on {}", self.file.display());
                self.api
                    .find_close(search)
                    .map_err(|err| errors::translate_io(err, Some(self.file)))
            }
            SearchState::Unopened | SearchState::Finished => Ok(()),
        }
    }

    /// Acquires the search on first use, otherwise moves it to the next record.
    fn advance(&mut self) -> std::io::Result<()> {
        if let SearchState::Active(search) = &mut self.state {
            return self.api.find_next_stream(search, &mut self.record);
        }

        let search = self.api.find_first_stream(self.file, &mut self.record)?;
        debug!("Opened stream search on {}", self.file.display());
        self.state = SearchState::Active(search);
        Ok(())
    }

    fn finish(&mut self) {
        if let SearchState::Active(search) =
            std::mem::replace(&mut self.state, SearchState::Finished)
        {
            debug!("Closing stream search on {}", self.file.display());
            if let Err(err) = self.api.find_close(search) {
                warn!(
                    "Error closing stream search on {}: {}",
                    self.file.display(),
                    err
                );
            }
        }
    }
}

impl<'p, A: StreamApi> Iterator for StreamIter<'p, '_, A> {
    type Item = AdsResult<DataStream<'p>>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, SearchState::Finished) {
            return None;
        }

        match self.advance() {
            Ok(()) => {}
            Err(err) if err.raw_os_error() == Some(ERROR_HANDLE_EOF as i32) => {
                self.finish();
                return None;
            }
            Err(err) => {
                warn!(
                    "Error enumerating streams of {}: {}",
                    self.file.display(),
                    err
                );
                self.finish();
                return Some(Err(errors::translate_io(err, Some(self.file))));
            }
        }

        match parse_stream_name(self.record.name_units()) {
            Ok((name, kind)) => Some(Ok(DataStream::discovered(
                self.file,
                name,
                self.record.size(),
                kind,
            ))),
            Err(err) => {
                self.finish();
                Some(Err(err))
            }
        }
    }
}

impl<A: StreamApi> FusedIterator for StreamIter<'_, '_, A> {}

impl<A: StreamApi> Drop for StreamIter<'_, '_, A> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Collects every stream of `file`, failing on the first error.
pub fn collect_streams<'p, A: StreamApi>(
    api: &A,
    file: &'p Path,
) -> AdsResult<Vec<DataStream<'p>>> {
    StreamIter::new(api, file).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::AdsError,
        kind::StreamKind,
        tests::{MemoryStreamApi, NativeCall},
    };
    use std::path::PathBuf;

    #[test]
    fn enumerate_default_and_named_test() -> Result<(), AdsError> {
        let api = MemoryStreamApi::new();
        let file = PathBuf::from(r"C:\data\test.txt");
        api.add_file(&file, &[0u8; 120]);
        api.add_stream(&file, "notes", b"seventeen bytes!!");

        let streams = collect_streams(&api, &file)?;
        let tuples: Vec<_> = streams
            .iter()
            .map(|s| (s.name().to_string(), s.length(), s.kind()))
            .collect();
        assert_eq!(
            tuples,
            vec![
                (String::new(), 120, StreamKind::Data),
                ("notes".to_string(), 17, StreamKind::Data),
            ]
        );
        assert!(streams.iter().all(|s| s.file() == file.as_path()));

        api.assert_searches_released();
        assert_eq!(api.count_calls(|c| matches!(c, NativeCall::FindClose(_))), 1);
        Ok(())
    }

    #[test]
    fn enumerate_empty_search_test() -> Result<(), AdsError> {
        let api = MemoryStreamApi::new();
        let file = PathBuf::from("no-streams");
        api.add_empty_file(&file);

        let streams = collect_streams(&api, &file)?;
        assert!(streams.is_empty());

        // Acquisition reported end of data, so there was nothing to release.
        assert_eq!(api.count_calls(|c| matches!(c, NativeCall::FindClose(_))), 0);
        api.assert_searches_released();
        Ok(())
    }

    #[test]
    fn enumerate_missing_file_test() {
        let api = MemoryStreamApi::new();
        let file = PathBuf::from("missing.txt");

        let mut iter = StreamIter::new(&api, &file);
        match iter.next() {
            Some(Err(AdsError::NotFound { path })) => assert_eq!(path, "missing.txt"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(iter.next().is_none());
        api.assert_searches_released();
    }

    #[test]
    fn enumerate_is_lazy_test() {
        let api = MemoryStreamApi::new();
        let file = PathBuf::from("lazy.txt");
        api.add_file(&file, b"x");

        let iter = StreamIter::new(&api, &file);
        drop(iter);
        assert!(api.calls().is_empty());
    }

    #[test]
    fn abandoned_enumeration_releases_test() -> Result<(), AdsError> {
        let api = MemoryStreamApi::new();
        let file = PathBuf::from("abandon.txt");
        api.add_file(&file, b"body");
        api.add_stream(&file, "a", b"1");
        api.add_stream(&file, "b", b"2");

        let mut iter = StreamIter::new(&api, &file);
        let first = iter.next().expect("default stream")?;
        assert_eq!(first.name(), "");
        assert_eq!(api.live_searches(), 1);

        drop(iter);
        api.assert_searches_released();
        Ok(())
    }

    #[test]
    fn explicit_close_test() -> Result<(), AdsError> {
        let api = MemoryStreamApi::new();
        let file = PathBuf::from("close.txt");
        api.add_file(&file, b"body");
        api.add_stream(&file, "a", b"1");

        let mut iter = StreamIter::new(&api, &file);
        iter.next().expect("default stream")?;
        iter.close()?;

        api.assert_searches_released();
        assert_eq!(api.count_calls(|c| matches!(c, NativeCall::FindClose(_))), 1);
        Ok(())
    }

    #[test]
    fn advance_error_releases_test() {
        let api = MemoryStreamApi::new();
        let file = PathBuf::from("flaky.txt");
        api.add_file(&file, b"body");
        api.add_stream(&file, "a", b"1");
        api.fail_find_next_with(32);

        let results: Vec<_> = StreamIter::new(&api, &file).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(AdsError::SharingViolation { .. })
        ));
        api.assert_searches_released();
    }

    #[test]
    fn malformed_record_is_fatal_test() {
        let api = MemoryStreamApi::new();
        let file = PathBuf::from("broken.txt");
        api.add_file(&file, b"body");
        api.add_raw_record(&file, ":no-separator", 4);
        api.add_stream(&file, "after", b"never seen");

        let results: Vec<_> = StreamIter::new(&api, &file).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[1], Err(AdsError::MalformedRecord(_))));
        api.assert_searches_released();
    }

    #[test]
    fn metadata_streams_are_reported_test() -> Result<(), AdsError> {
        let api = MemoryStreamApi::new();
        let dir = PathBuf::from(r"C:\data");
        api.add_empty_file(&dir);
        api.add_raw_record(&dir, ":$I30:$INDEX_ROOT", 48);

        let streams = collect_streams(&api, &dir)?;
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].name(), "$I30");
        assert_eq!(streams[0].kind(), StreamKind::IndexRoot);
        assert_eq!(streams[0].length(), 48);
        Ok(())
    }
}
