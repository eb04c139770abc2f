use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::Write,
    path::Path,
};

use csv::{Writer, WriterBuilder};

use crate::{
    core::item::{ItemWriter, ItemWriterResult},
    error::WxrError,
    wxr::record::Record,
};

/// Writes records as CSV rows.
///
/// The header row, when enabled, is taken from the columns of the first record
/// written. The null marker is written as an empty field.
pub struct CsvItemWriter<T: Write> {
    writer: RefCell<Writer<T>>,
    has_headers: bool,
    header_written: Cell<bool>,
}

impl<T: Write> ItemWriter<Record> for CsvItemWriter<T> {
    fn write(&self, items: &[Record]) -> ItemWriterResult {
        let mut writer = self.writer.borrow_mut();

        for record in items {
            if self.has_headers && !self.header_written.get() {
                writer
                    .write_record(record.keys())
                    .map_err(|e| WxrError::ItemWriter(e.to_string()))?;
                self.header_written.set(true);
            }

            writer
                .write_record(record.iter().map(|(_, value)| value.unwrap_or_default()))
                .map_err(|e| WxrError::ItemWriter(e.to_string()))?;
        }

        Ok(())
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    fn flush(&self) -> ItemWriterResult {
        self.writer
            .borrow_mut()
            .flush()
            .map_err(|e| WxrError::ItemWriter(e.to_string()))
    }
}

impl<T: Write> CsvItemWriter<T> {
    pub fn into_inner(self) -> Result<T, WxrError> {
        self.writer
            .into_inner()
            .into_inner()
            .map_err(|e| WxrError::ItemWriter(e.to_string()))
    }
}

pub struct CsvItemWriterBuilder {
    delimiter: u8,
    has_headers: bool,
}

impl Default for CsvItemWriterBuilder {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
        }
    }
}

impl CsvItemWriterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemWriter<File>, WxrError> {
        let file = File::create(path.as_ref()).map_err(|e| WxrError::Io {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;

        Ok(self.from_writer(file))
    }

    /// Creates a writer over any [`Write`] destination.
    ///
    /// # Example
    ///
    /// ```
    /// use wxr_flatten::core::item::ItemWriter;
    /// use wxr_flatten::item::csv::csv_writer::CsvItemWriterBuilder;
    /// use wxr_flatten::wxr::record::Record;
    ///
    /// let mut first = Record::new();
    /// first.insert("title", "Hello, world");
    /// first.insert_null("category_category");
    ///
    /// let mut second = Record::new();
    /// second.insert("title", "About");
    /// second.insert("category_category", "A,B");
    ///
    /// let writer = CsvItemWriterBuilder::new()
    ///     .has_headers(true)
    ///     .delimiter(b';')
    ///     .from_writer(vec![]);
    /// writer.write(&[first, second]).unwrap();
    ///
    /// let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    /// assert_eq!(data, "title;category_category\nHello, world;\nAbout;A,B\n");
    /// ```
    pub fn from_writer<W: Write>(self, wtr: W) -> CsvItemWriter<W> {
        let writer = WriterBuilder::new()
            .flexible(false)
            .has_headers(false)
            .delimiter(self.delimiter)
            .from_writer(wtr);

        CsvItemWriter {
            writer: RefCell::new(writer),
            has_headers: self.has_headers,
            header_written: Cell::new(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{env::temp_dir, error::Error, fs};

    use rand::distr::{Alphanumeric, SampleString};

    use crate::{core::item::ItemWriter, wxr::record::Record};

    use super::CsvItemWriterBuilder;

    fn record(pairs: &[(&str, Option<&str>)]) -> Record {
        pairs
            .iter()
            .map(|(key, value)| (*key, value.map(str::to_string)))
            .collect()
    }

    #[test]
    fn header_should_be_written_once_across_chunks() -> Result<(), Box<dyn Error>> {
        let writer = CsvItemWriterBuilder::new()
            .has_headers(true)
            .from_writer(vec![]);

        writer.write(&[record(&[("title", Some("A")), ("guid", None)])])?;
        writer.write(&[record(&[("title", Some("B")), ("guid", Some("x"))])])?;

        let data = String::from_utf8(writer.into_inner()?)?;
        assert_eq!(data, "title,guid\nA,\nB,x\n");

        Ok(())
    }

    #[test]
    fn rows_should_be_written_without_header() -> Result<(), Box<dyn Error>> {
        let writer = CsvItemWriterBuilder::new().from_writer(vec![]);

        writer.write(&[record(&[("content", Some("line one\nline \"two\""))])])?;

        let data = String::from_utf8(writer.into_inner()?)?;
        assert_eq!(data, "\"line one\nline \"\"two\"\"\"\n");

        Ok(())
    }

    #[test]
    fn records_should_be_written_to_file() -> Result<(), Box<dyn Error>> {
        let path = temp_dir().join(format!(
            "{}.csv",
            Alphanumeric.sample_string(&mut rand::rng(), 16)
        ));

        let writer = CsvItemWriterBuilder::new()
            .has_headers(true)
            .from_path(&path)?;
        writer.write(&[record(&[("title", Some("Hello"))])])?;
        writer.flush()?;

        assert_eq!(fs::read_to_string(&path)?, "title\nHello\n");
        fs::remove_file(&path)?;

        Ok(())
    }
}
