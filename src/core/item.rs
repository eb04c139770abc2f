use crate::error::WxrError;

/// Result returned by [`ItemReader::read`].
///
/// - `Ok(Some(item))` when an item was read
/// - `Ok(None)` when the reader is exhausted
/// - `Err(WxrError)` when reading failed
pub type ItemReaderResult<R> = Result<Option<R>, WxrError>;

/// Result returned by the [`ItemWriter`] operations.
pub type ItemWriterResult = Result<(), WxrError>;

/// A source of items, read one at a time.
pub trait ItemReader<R> {
    /// Reads the next item.
    fn read(&self) -> ItemReaderResult<R>;
}

/// A sink of items, written one chunk at a time.
pub trait ItemWriter<W> {
    /// Writes a chunk of items.
    fn write(&self, items: &[W]) -> ItemWriterResult;

    /// Flushes buffered output to the underlying destination.
    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }

    /// Called once before the first chunk is written.
    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    /// Called once after the last chunk is written.
    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}
