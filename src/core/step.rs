use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use log::{debug, error, info};

use crate::error::WxrError;

use super::item::{ItemReader, ItemWriter};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum StepStatus {
    Success,
    Error,
    Started,
}

/// Outcome of a successful [`StepInstance::execute`] call.
#[derive(Debug)]
pub struct StepExecution {
    pub name: String,
    pub status: StepStatus,
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    /// Number of items read from the reader
    pub read_count: usize,
    /// Number of items handed to the writer
    pub write_count: usize,
}

#[derive(Debug, PartialEq)]
enum ChunkStatus {
    Full,
    Finished,
}

/// A step reading items in chunks and handing every chunk to a writer.
///
/// There is no skip policy: the first read or write error stops the step and
/// is returned to the caller.
///
/// # Examples
///
/// ```
/// use wxr_flatten::core::step::{StepBuilder, StepStatus};
/// use wxr_flatten::item::wxr::WxrItemReaderBuilder;
/// use wxr_flatten::item::csv::csv_writer::CsvItemWriterBuilder;
///
/// let xml = r#"<rss><channel>
///   <item><title>Hello</title></item>
///   <item><title>World</title><wp:status>draft</wp:status></item>
/// </channel></rss>"#;
///
/// let reader = WxrItemReaderBuilder::new().from_reader(xml.as_bytes()).unwrap();
/// let writer = CsvItemWriterBuilder::new().has_headers(true).from_writer(vec![]);
///
/// let step = StepBuilder::new()
///     .name("wxr-to-csv")
///     .reader(&reader)
///     .writer(&writer)
///     .chunk(10)
///     .build()
///     .unwrap();
///
/// let execution = step.execute().unwrap();
/// assert_eq!(execution.status, StepStatus::Success);
/// assert_eq!(execution.write_count, 2);
///
/// let csv = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(csv, "title,wp:status\nHello,\nWorld,draft\n");
/// ```
pub struct StepInstance<'a, T> {
    name: String,
    reader: &'a dyn ItemReader<T>,
    writer: &'a dyn ItemWriter<T>,
    chunk_size: usize,
    status: Cell<StepStatus>,
    read_count: Cell<usize>,
    write_count: Cell<usize>,
}

impl<T> StepInstance<'_, T> {
    pub fn execute(&self) -> Result<StepExecution, WxrError> {
        let start = Instant::now();
        info!("Start of step: {}", self.name);
        self.status.set(StepStatus::Started);

        let result = self.run_chunks();

        let status = match &result {
            Ok(()) => StepStatus::Success,
            Err(err) => {
                error!("Step {} failed: {}", self.name, err);
                StepStatus::Error
            }
        };
        self.status.set(status);
        result?;

        info!("End of step: {}", self.name);

        Ok(StepExecution {
            name: self.name.clone(),
            status,
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            read_count: self.read_count.get(),
            write_count: self.write_count.get(),
        })
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_status(&self) -> StepStatus {
        self.status.get()
    }

    pub fn get_read_count(&self) -> usize {
        self.read_count.get()
    }

    pub fn get_write_count(&self) -> usize {
        self.write_count.get()
    }

    fn run_chunks(&self) -> Result<(), WxrError> {
        self.writer.open()?;

        let mut chunk: Vec<T> = Vec::with_capacity(self.chunk_size);
        loop {
            let status = self.read_chunk(&mut chunk)?;

            if !chunk.is_empty() {
                self.write_chunk(&chunk)?;
            }

            if status == ChunkStatus::Finished {
                break;
            }
        }

        self.writer.close()
    }

    fn read_chunk(&self, chunk: &mut Vec<T>) -> Result<ChunkStatus, WxrError> {
        debug!("Start reading chunk");
        chunk.clear();

        while let Some(item) = self.reader.read()? {
            chunk.push(item);
            self.read_count.set(self.read_count.get() + 1);

            if chunk.len() == self.chunk_size {
                debug!("End reading chunk: FULL");
                return Ok(ChunkStatus::Full);
            }
        }

        debug!("End reading chunk: FINISHED");
        Ok(ChunkStatus::Finished)
    }

    fn write_chunk(&self, chunk: &[T]) -> Result<(), WxrError> {
        debug!("Start writing chunk of {} items", chunk.len());
        self.writer.write(chunk)?;
        self.writer.flush()?;
        self.write_count.set(self.write_count.get() + chunk.len());
        debug!("End writing chunk");
        Ok(())
    }
}

pub struct StepBuilder<'a, T> {
    name: Option<String>,
    reader: Option<&'a dyn ItemReader<T>>,
    writer: Option<&'a dyn ItemWriter<T>>,
    chunk_size: usize,
}

impl<T> Default for StepBuilder<'_, T> {
    fn default() -> Self {
        Self {
            name: None,
            reader: None,
            writer: None,
            chunk_size: 1,
        }
    }
}

impl<'a, T> StepBuilder<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn reader(mut self, reader: &'a impl ItemReader<T>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn writer(mut self, writer: &'a impl ItemWriter<T>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Sets the number of items written per chunk (the commit interval).
    pub fn chunk(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn build(self) -> Result<StepInstance<'a, T>, WxrError> {
        let reader = self
            .reader
            .ok_or_else(|| WxrError::Step("has no reader".to_string()))?;
        let writer = self
            .writer
            .ok_or_else(|| WxrError::Step("has no writer".to_string()))?;
        if self.chunk_size == 0 {
            return Err(WxrError::Step("chunk size must be positive".to_string()));
        }

        Ok(StepInstance {
            name: self.name.unwrap_or_else(|| "step".to_string()),
            reader,
            writer,
            chunk_size: self.chunk_size,
            status: Cell::new(StepStatus::Started),
            read_count: Cell::new(0),
            write_count: Cell::new(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use mockall::mock;

    use crate::{
        core::item::{ItemReader, ItemReaderResult, ItemWriter, ItemWriterResult},
        error::WxrError,
    };

    use super::{StepBuilder, StepStatus};

    struct VecReader {
        items: RefCell<Vec<Result<u32, WxrError>>>,
    }

    impl VecReader {
        fn new(items: Vec<Result<u32, WxrError>>) -> Self {
            let mut items = items;
            items.reverse();
            Self {
                items: RefCell::new(items),
            }
        }
    }

    impl ItemReader<u32> for VecReader {
        fn read(&self) -> ItemReaderResult<u32> {
            self.items.borrow_mut().pop().transpose()
        }
    }

    mock! {
        Writer {}
        impl ItemWriter<u32> for Writer {
            fn write(&self, items: &[u32]) -> ItemWriterResult;
            fn flush(&self) -> ItemWriterResult;
            fn open(&self) -> ItemWriterResult;
            fn close(&self) -> ItemWriterResult;
        }
    }

    #[test]
    fn step_should_write_items_in_chunks() {
        let reader = VecReader::new(vec![Ok(1), Ok(2), Ok(3)]);

        let mut writer = MockWriter::new();
        writer.expect_open().times(1).returning(|| Ok(()));
        writer
            .expect_write()
            .withf(|items: &[u32]| items.to_vec() == vec![1, 2])
            .times(1)
            .returning(|_| Ok(()));
        writer
            .expect_write()
            .withf(|items: &[u32]| items.to_vec() == vec![3])
            .times(1)
            .returning(|_| Ok(()));
        writer.expect_flush().times(2).returning(|| Ok(()));
        writer.expect_close().times(1).returning(|| Ok(()));

        let step = StepBuilder::new()
            .reader(&reader)
            .writer(&writer)
            .chunk(2)
            .build()
            .unwrap();

        let execution = step.execute().unwrap();

        assert_eq!(execution.status, StepStatus::Success);
        assert_eq!(execution.read_count, 3);
        assert_eq!(execution.write_count, 3);
    }

    #[test]
    fn step_should_stop_on_read_error() {
        let reader = VecReader::new(vec![Ok(1), Err(WxrError::EmptyDocument), Ok(3)]);

        let mut writer = MockWriter::new();
        writer.expect_open().times(1).returning(|| Ok(()));
        writer.expect_write().never();
        writer.expect_close().never();

        let step = StepBuilder::new()
            .reader(&reader)
            .writer(&writer)
            .chunk(5)
            .build()
            .unwrap();

        let result = step.execute();

        assert!(matches!(result, Err(WxrError::EmptyDocument)));
        assert_eq!(step.get_status(), StepStatus::Error);
        assert_eq!(step.get_read_count(), 1);
        assert_eq!(step.get_write_count(), 0);
    }

    #[test]
    fn step_should_stop_on_write_error() {
        let reader = VecReader::new(vec![Ok(1), Ok(2)]);

        let mut writer = MockWriter::new();
        writer.expect_open().returning(|| Ok(()));
        writer
            .expect_write()
            .times(1)
            .returning(|_| Err(WxrError::ItemWriter("disk full".to_string())));
        writer.expect_flush().never();

        let step = StepBuilder::new()
            .reader(&reader)
            .writer(&writer)
            .chunk(1)
            .build()
            .unwrap();

        let result = step.execute();

        assert!(matches!(result, Err(WxrError::ItemWriter(_))));
        assert_eq!(step.get_write_count(), 0);
    }

    #[test]
    fn build_should_fail_without_reader() {
        let writer = MockWriter::new();

        let result = StepBuilder::<u32>::new().writer(&writer).build();

        assert!(matches!(result, Err(WxrError::Step(_))));
    }

    #[test]
    fn build_should_reject_empty_chunk() {
        let reader = VecReader::new(vec![]);
        let writer = MockWriter::new();

        let result = StepBuilder::new()
            .reader(&reader)
            .writer(&writer)
            .chunk(0)
            .build();

        assert!(matches!(result, Err(WxrError::Step(_))));
    }
}
