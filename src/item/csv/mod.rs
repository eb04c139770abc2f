/// CSV output for flattened records.
///
/// [`CsvItemWriter`](csv_writer::CsvItemWriter) turns reconciled records into
/// delimited rows. Because every reconciled record carries the same columns,
/// the header taken from the first record matches every row.
///
/// # Examples
///
/// ```
/// use wxr_flatten::core::step::StepBuilder;
/// use wxr_flatten::item::csv::csv_writer::CsvItemWriterBuilder;
/// use wxr_flatten::item::wxr::WxrItemReaderBuilder;
///
/// let xml = r#"<rss><channel>
///   <item>
///     <title>Hello</title>
///     <category domain="post_tag">rust</category>
///     <category domain="post_tag">xml</category>
///   </item>
///   <item><title>About</title></item>
/// </channel></rss>"#;
///
/// let reader = WxrItemReaderBuilder::new().from_reader(xml.as_bytes()).unwrap();
///
/// let mut buffer = Vec::new();
/// {
///     let writer = CsvItemWriterBuilder::new()
///         .has_headers(true)
///         .from_writer(&mut buffer);
///
///     let step = StepBuilder::new()
///         .reader(&reader)
///         .writer(&writer)
///         .chunk(1)
///         .build()
///         .unwrap();
///     step.execute().unwrap();
/// } // writer is dropped here, releasing the borrow
///
/// let csv_output = String::from_utf8(buffer).unwrap();
/// assert_eq!(csv_output, "title,category_post_tag\nHello,\"rust,xml\"\nAbout,\n");
/// ```

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;
