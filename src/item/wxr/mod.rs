/// Reading WordPress WXR exports as flat records.
///
/// [`WxrItemReader`] runs the whole [`crate::wxr`] pipeline over a file or any
/// byte source and hands out the resulting records through the
/// [`ItemReader`](crate::core::item::ItemReader) trait, so an export can be
/// fed straight into a [`Step`](crate::core::step::StepInstance).
///
/// # Examples
///
/// ```no_run
/// use wxr_flatten::item::wxr::WxrItemReaderBuilder;
///
/// let reader = WxrItemReaderBuilder::new()
///     .sanitizer_option("ascii-chars", true)
///     .from_path("export/posts.xml");
///
/// for record in reader.items().unwrap() {
///     println!("{:?}", record.value("title"));
/// }
/// ```
pub mod wxr_reader;

pub use wxr_reader::{WxrItemReader, WxrItemReaderBuilder};
