/// JSON output for flattened records.
///
/// [`JsonItemWriter`] serializes every record as a JSON object and wraps the
/// whole step output in one array. Columns keep their record order and the
/// null marker is written as `null`, so no information from the flattening
/// pipeline is lost.
///
/// # Examples
///
/// ```
/// use wxr_flatten::core::step::StepBuilder;
/// use wxr_flatten::item::json::JsonItemWriterBuilder;
/// use wxr_flatten::item::wxr::WxrItemReaderBuilder;
///
/// let xml = r#"<rss><channel>
///   <item>
///     <title>Hello</title>
///     <wp:postmeta>
///       <wp:meta_key>_edit_lock</wp:meta_key>
///       <wp:meta_value>1221689350</wp:meta_value>
///     </wp:postmeta>
///   </item>
///   <item><title>About</title></item>
/// </channel></rss>"#;
///
/// let reader = WxrItemReaderBuilder::new().from_reader(xml.as_bytes()).unwrap();
///
/// let mut buffer = Vec::new();
/// {
///     let writer = JsonItemWriterBuilder::new().from_writer(&mut buffer);
///
///     let step = StepBuilder::new()
///         .reader(&reader)
///         .writer(&writer)
///         .chunk(10)
///         .build()
///         .unwrap();
///     step.execute().unwrap();
/// }
///
/// let json = String::from_utf8(buffer).unwrap();
/// assert_eq!(
///     json,
///     "[{\"title\":\"Hello\",\"_edit_lock\":\"1221689350\"},{\"title\":\"About\",\"_edit_lock\":null}]\n"
/// );
/// ```
pub mod json_writer;

pub use json_writer::{JsonItemWriter, JsonItemWriterBuilder};
