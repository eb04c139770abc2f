use std::{
    cell::{Cell, OnceCell},
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::WxrError,
    wxr::{
        self,
        config::{default_sanitizer_options, merge_options, FlattenRules, SanitizerOptions},
        record::Record,
        sanitizer::{BasicSanitizer, XmlSanitizer},
        tokenizer::{QuickXmlTokenizer, Tokenizer},
        tree::{self, Element},
    },
};

enum Source {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A builder for [`WxrItemReader`].
///
/// # Examples
///
/// ```
/// use wxr_flatten::item::wxr::WxrItemReaderBuilder;
/// use wxr_flatten::core::item::ItemReader;
///
/// let xml = r#"<rss><channel>
///   <item><title>First</title><guid isPermaLink="false">http://x/?p=1</guid></item>
///   <item><title>Second</title></item>
/// </channel></rss>"#;
///
/// let reader = WxrItemReaderBuilder::new()
///     .sanitizer_option("ascii-chars", true)
///     .source_name("inline.xml")
///     .from_reader(xml.as_bytes())
///     .unwrap();
///
/// let first = reader.read().unwrap().unwrap();
/// assert_eq!(first.value("guid_isPermaLink"), Some("false"));
///
/// let second = reader.read().unwrap().unwrap();
/// assert_eq!(second.get("guid"), Some(&None));
///
/// assert!(reader.read().unwrap().is_none());
/// ```
#[derive(Default)]
pub struct WxrItemReaderBuilder {
    rules: FlattenRules,
    options: SanitizerOptions,
    sanitizer: Option<Box<dyn XmlSanitizer>>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    source_name: Option<String>,
}

impl WxrItemReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tag name of the elements turned into records (`item` by default).
    pub fn tag<S: AsRef<str>>(mut self, tag_name: S) -> Self {
        self.rules.item_tag = tag_name.as_ref().to_string();
        self
    }

    /// Replaces all WordPress tag names at once. Overrides a previous [`tag`](Self::tag).
    pub fn rules(mut self, rules: FlattenRules) -> Self {
        self.rules = rules;
        self
    }

    /// Adds one sanitizer option; it wins over the default of the same name.
    pub fn sanitizer_option<K: Into<String>, V: Into<serde_json::Value>>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn sanitizer_options(mut self, options: SanitizerOptions) -> Self {
        self.options.extend(options);
        self
    }

    pub fn sanitizer<S: XmlSanitizer + 'static>(mut self, sanitizer: S) -> Self {
        self.sanitizer = Some(Box::new(sanitizer));
        self
    }

    pub fn tokenizer<T: Tokenizer + 'static>(mut self, tokenizer: T) -> Self {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    /// Name used in errors and logs, the path by default.
    pub fn source_name<S: Into<String>>(mut self, name: S) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Creates a reader over a file. The file is only read on first use.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> WxrItemReader {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        self.build(Source::Path(path), name)
    }

    /// Creates a reader over any byte source, reading it to the end right away.
    pub fn from_reader<R: Read>(self, mut rdr: R) -> Result<WxrItemReader, WxrError> {
        let name = self
            .source_name
            .clone()
            .unwrap_or_else(|| "<reader>".to_string());

        let mut bytes = Vec::new();
        rdr.read_to_end(&mut bytes).map_err(|e| {
            error!("Failed to read {}: {}", name, e);
            WxrError::Io {
                path: PathBuf::from(&name),
                source: e,
            }
        })?;

        Ok(self.build(Source::Bytes(bytes), name))
    }

    fn build(self, source: Source, default_name: String) -> WxrItemReader {
        WxrItemReader {
            source,
            source_name: self.source_name.unwrap_or(default_name),
            options: merge_options(&default_sanitizer_options(), &self.options),
            sanitizer: self.sanitizer.unwrap_or_else(|| Box::new(BasicSanitizer)),
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(QuickXmlTokenizer::new())),
            rules: self.rules,
            xml: OnceCell::new(),
            tree: OnceCell::new(),
            records: OnceCell::new(),
            position: Cell::new(0),
        }
    }
}

/// Reads a WXR export as uniform [`Record`]s, one per `<item>`.
///
/// The whole document is converted on first access: sanitized text, element
/// tree and records are each computed once and cached. Any failure aborts the
/// conversion; no record is ever returned from a document that failed.
pub struct WxrItemReader {
    source: Source,
    source_name: String,
    options: SanitizerOptions,
    sanitizer: Box<dyn XmlSanitizer>,
    tokenizer: Box<dyn Tokenizer>,
    rules: FlattenRules,
    xml: OnceCell<String>,
    tree: OnceCell<Element>,
    records: OnceCell<Vec<Record>>,
    position: Cell<usize>,
}

impl WxrItemReader {
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The sanitizer options in effect: defaults merged with the caller's.
    pub fn sanitizer_config(&self) -> &SanitizerOptions {
        &self.options
    }

    pub fn rules(&self) -> &FlattenRules {
        &self.rules
    }

    /// All records of the document, every one holding the same columns.
    pub fn items(&self) -> Result<&[Record], WxrError> {
        if let Some(records) = self.records.get() {
            return Ok(records);
        }

        let root = self.tree()?;
        let records = wxr::records_from_tree(root, &self.rules);
        info!(
            "Converted {} items from {}",
            records.len(),
            self.source_name
        );

        Ok(self.records.get_or_init(|| records))
    }

    /// The element tree of the document.
    pub fn tree(&self) -> Result<&Element, WxrError> {
        if let Some(root) = self.tree.get() {
            return Ok(root);
        }

        let xml = self.xml()?;
        let root = self
            .tokenizer
            .tokenize(xml)
            .and_then(tree::build_tree)
            .map_err(|e| self.fail(e))?;

        Ok(self.tree.get_or_init(|| root))
    }

    fn xml(&self) -> Result<&str, WxrError> {
        if let Some(xml) = self.xml.get() {
            return Ok(xml);
        }

        let raw = self.raw_text().map_err(|e| self.fail(e))?;
        let xml = self
            .sanitizer
            .sanitize(&raw, &self.options)
            .map_err(|e| self.fail(e))?;
        debug!("Sanitized XML of {} is {} bytes", self.source_name, xml.len());

        Ok(self.xml.get_or_init(|| xml))
    }

    fn raw_text(&self) -> Result<String, WxrError> {
        let bytes = match &self.source {
            Source::Path(path) => fs::read(path).map_err(|e| WxrError::Io {
                path: path.clone(),
                source: e,
            })?,
            Source::Bytes(bytes) => bytes.clone(),
        };

        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "{} is not valid UTF-8, replacing invalid sequences",
                    self.source_name
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        })
    }

    fn fail(&self, error: WxrError) -> WxrError {
        let error = error.in_source(self.source_name.as_str());
        error!("{}", error);
        error
    }
}

impl ItemReader<Record> for WxrItemReader {
    fn read(&self) -> ItemReaderResult<Record> {
        let records = self.items()?;
        let position = self.position.get();

        match records.get(position) {
            Some(record) => {
                self.position.set(position + 1);
                Ok(Some(record.clone()))
            }
            None => {
                debug!("Reached end of {}", self.source_name);
                Ok(None)
            }
        }
    }
}
