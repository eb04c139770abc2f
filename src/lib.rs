#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # wxr-flatten

 Turns WordPress WXR exports into flat, uniform records ready for CSV or JSON.

 A WXR file is an RSS document where every post, page or attachment is an
 `<item>` holding plain fields, repeated `<category>` tags and repeated
 `<wp:postmeta>` key/value blocks. This crate sanitizes the raw export, parses
 it into an element tree, locates every item and flattens it into a
 [`Record`](wxr::record::Record): an ordered map from column name to an optional
 string. Once all items are flattened, records are reconciled so that every
 record carries the same columns in the same order.

 ## Core Concepts

- **Sanitizer:** repairs a raw export before parsing, see [`wxr::sanitizer`].
- **Tokenizer:** turns XML text into a flat list of parse events, see [`wxr::tokenizer`].
- **Tree:** the nested element structure rebuilt from those events, see [`wxr::tree`].
- **Record:** one flattened item, see [`wxr::record`].
- **ItemReader:** hands out records one at a time, see [`item::wxr::WxrItemReader`].
- **ItemWriter:** receives records one chunk at a time (CSV, JSON, logger).
- **Step:** pipes a reader into a writer chunk by chunk, see [`core::step`].

 ## Features

| **Feature**   | **Description**                                               |
|---------------|---------------------------------------------------------------|
| csv           | Enables the CSV `ItemWriter`                                  |
| json          | Enables the JSON `ItemWriter`                                 |
| logger        | Enables a logger `ItemWriter`, useful for debugging purposes  |
| full          | Enables all available features                                |

 ## Getting Started

```toml
[dependencies]
wxr-flatten = { version = "<version>", features = ["csv"] }
```

```rust
# use wxr_flatten::{
#     core::step::{StepBuilder, StepStatus},
#     error::WxrError,
#     item::{csv::csv_writer::CsvItemWriterBuilder, wxr::WxrItemReaderBuilder},
# };
fn main() -> Result<(), WxrError> {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <item>
      <title>Hello world!</title>
      <wp:post_id>1</wp:post_id>
      <category domain="category" nicename="news"><![CDATA[News]]></category>
      <category domain="post_tag" nicename="intro"><![CDATA[intro]]></category>
      <wp:postmeta>
        <wp:meta_key>_edit_lock</wp:meta_key>
        <wp:meta_value>1221689350</wp:meta_value>
      </wp:postmeta>
    </item>
    <item>
      <title>About</title>
      <wp:post_id>2</wp:post_id>
    </item>
  </channel>
</rss>"#;

    let reader = WxrItemReaderBuilder::new().from_reader(xml.as_bytes())?;
    let writer = CsvItemWriterBuilder::new()
        .has_headers(true)
        .from_writer(vec![]);

    let step = StepBuilder::new()
        .name("posts")
        .reader(&reader)
        .writer(&writer)
        .chunk(100)
        .build()?;

    let execution = step.execute()?;
    assert_eq!(execution.status, StepStatus::Success);

    let csv = String::from_utf8(writer.into_inner()?).unwrap_or_default();
    assert_eq!(
        csv,
        "title,wp:post_id,category_category,category_post_tag,_edit_lock\n\
         Hello world!,1,News,intro,1221689350\n\
         About,2,,,\n"
    );

    Ok(())
}
```

 Without the step machinery, [`wxr::convert`] runs the same pipeline over an
 XML string and returns every record at once.
 */

/// Chunk-oriented processing: reader/writer traits and the step running them
pub mod core;

/// Error types shared by the whole pipeline
pub mod error;

#[doc(inline)]
pub use error::*;

/// Item readers and writers
pub mod item;

/// The WXR pipeline: sanitize, tokenize, build, locate, flatten, reconcile
pub mod wxr;
