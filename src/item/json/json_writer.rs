use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::{
    core::item::{ItemWriter, ItemWriterResult},
    error::WxrError,
};

/// Writes items as one JSON array of objects.
///
/// `open` writes the opening bracket and `close` the closing one, so the
/// output is only a complete document once the writer has been closed.
pub struct JsonItemWriter<W: Write> {
    stream: RefCell<BufWriter<W>>,
    use_pretty_formatter: bool,
    is_first_element: Cell<bool>,
}

impl<W: Write> JsonItemWriter<W> {
    fn write_bytes(&self, bytes: &[u8]) -> ItemWriterResult {
        self.stream
            .borrow_mut()
            .write_all(bytes)
            .map_err(|e| WxrError::ItemWriter(e.to_string()))
    }

    pub fn into_inner(self) -> Result<W, WxrError> {
        self.stream
            .into_inner()
            .into_inner()
            .map_err(|e| WxrError::ItemWriter(e.to_string()))
    }
}

impl<W: Write, T: Serialize> ItemWriter<T> for JsonItemWriter<W> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        for item in items {
            if !self.is_first_element.get() {
                let separator: &[u8] = if self.use_pretty_formatter { b",\n" } else { b"," };
                self.write_bytes(separator)?;
            }

            let json = if self.use_pretty_formatter {
                serde_json::to_string_pretty(item)
            } else {
                serde_json::to_string(item)
            }
            .map_err(|e| WxrError::ItemWriter(e.to_string()))?;

            self.write_bytes(json.as_bytes())?;
            self.is_first_element.set(false);
        }

        Ok(())
    }

    fn flush(&self) -> ItemWriterResult {
        self.stream
            .borrow_mut()
            .flush()
            .map_err(|e| WxrError::ItemWriter(e.to_string()))
    }

    fn open(&self) -> ItemWriterResult {
        self.is_first_element.set(true);
        let bracket: &[u8] = if self.use_pretty_formatter { b"[\n" } else { b"[" };
        self.write_bytes(bracket)
    }

    fn close(&self) -> ItemWriterResult {
        let bracket: &[u8] = if self.use_pretty_formatter { b"\n]\n" } else { b"]\n" };
        self.write_bytes(bracket)?;
        ItemWriter::<T>::flush(self)
    }
}

#[derive(Default)]
pub struct JsonItemWriterBuilder {
    pretty_formatter: bool,
}

impl JsonItemWriterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty_formatter(mut self, yes: bool) -> Self {
        self.pretty_formatter = yes;
        self
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<JsonItemWriter<File>, WxrError> {
        let file = File::create(path.as_ref()).map_err(|e| WxrError::Io {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;

        Ok(self.from_writer(file))
    }

    pub fn from_writer<W: Write>(self, wtr: W) -> JsonItemWriter<W> {
        JsonItemWriter {
            stream: RefCell::new(BufWriter::new(wtr)),
            use_pretty_formatter: self.pretty_formatter,
            is_first_element: Cell::new(true),
        }
    }
}
