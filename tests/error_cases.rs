mod common;

use std::io::Write;

use tempfile::NamedTempFile;

use wxr_flatten::{
    core::{
        item::ItemReader,
        step::{StepBuilder, StepStatus},
    },
    error::WxrError,
    item::{
        csv::csv_writer::CsvItemWriterBuilder, json::JsonItemWriterBuilder,
        wxr::WxrItemReaderBuilder,
    },
    wxr::{
        config::FlattenRules,
        convert,
        event::ParseEvent,
        tokenizer::{QuickXmlTokenizer, Tokenizer},
    },
};

use common::{broken_file, fixture};

struct UnbalancedTokenizer;

impl Tokenizer for UnbalancedTokenizer {
    fn tokenize(&self, _xml: &str) -> Result<Vec<ParseEvent>, WxrError> {
        Ok(vec![
            ParseEvent::open("rss"),
            ParseEvent::close("rss"),
            ParseEvent::close("channel"),
        ])
    }
}

#[test]
fn empty_file_should_fail_with_its_name() {
    let file = NamedTempFile::new().unwrap();
    let reader = WxrItemReaderBuilder::new().from_path(file.path());

    let error = reader.items().unwrap_err();

    assert!(matches!(error.root_cause(), WxrError::EmptyDocument));
    assert!(error
        .to_string()
        .contains(&file.path().display().to_string()));
}

#[test]
fn prolog_only_document_should_be_empty() {
    let reader = WxrItemReaderBuilder::new()
        .source_name("prolog.xml")
        .from_reader("<?xml version=\"1.0\"?>\n<!-- nothing -->\n".as_bytes())
        .unwrap();

    match reader.read() {
        Err(WxrError::Conversion { source_name, cause }) => {
            assert_eq!(source_name, "prolog.xml");
            assert!(matches!(*cause, WxrError::EmptyDocument));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn unclosed_element_should_fail_sanitization() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "<rss><channel><item><title>Hi</title></item></rss>").unwrap();

    let reader = WxrItemReaderBuilder::new().from_path(file.path());

    let error = reader.read().unwrap_err();
    assert!(matches!(error.root_cause(), WxrError::Sanitization(_)));
}

#[test]
fn several_roots_should_fail_sanitization() {
    let reader = WxrItemReaderBuilder::new()
        .from_reader("<item><title>A</title></item><item><title>B</title></item>".as_bytes())
        .unwrap();

    let error = reader.items().unwrap_err();
    assert!(matches!(error.root_cause(), WxrError::Sanitization(_)));
}

#[test]
fn unbalanced_events_should_fail_structure() {
    let reader = WxrItemReaderBuilder::new()
        .tokenizer(UnbalancedTokenizer)
        .from_path(fixture("posts.xml"));

    let error = reader.items().unwrap_err();
    assert!(matches!(error.root_cause(), WxrError::Structure(_)));
}

#[test]
fn convert_should_reject_malformed_xml() {
    let result = convert(
        "<rss><item><title>A</item></rss>",
        &QuickXmlTokenizer::new(),
        &FlattenRules::default(),
    );

    assert!(matches!(result, Err(WxrError::Tokenizer(_))));
}

#[test]
fn missing_file_should_fail_on_first_read() {
    let reader = WxrItemReaderBuilder::new().from_path("does/not/exist.xml");

    let error = reader.read().unwrap_err();
    assert!(matches!(error.root_cause(), WxrError::Io { .. }));
}

#[test]
fn failed_conversion_should_fail_the_step() {
    let reader = WxrItemReaderBuilder::new().from_path("does/not/exist.xml");
    let writer = CsvItemWriterBuilder::new().from_writer(vec![]);

    let step = StepBuilder::new()
        .reader(&reader)
        .writer(&writer)
        .chunk(2)
        .build()
        .unwrap();

    assert!(step.execute().is_err());
    assert_eq!(step.get_status(), StepStatus::Error);
    assert_eq!(step.get_write_count(), 0);
}

#[test]
fn broken_destination_should_fail_the_csv_step() {
    let reader = WxrItemReaderBuilder::new().from_path(fixture("posts.xml"));
    let writer = CsvItemWriterBuilder::new()
        .has_headers(true)
        .from_writer(broken_file());

    let step = StepBuilder::new()
        .reader(&reader)
        .writer(&writer)
        .chunk(3)
        .build()
        .unwrap();

    let error = step.execute().unwrap_err();

    assert!(matches!(error, WxrError::ItemWriter(_)));
    assert_eq!(step.get_status(), StepStatus::Error);
    assert_eq!(step.get_read_count(), 3);
}

#[test]
fn broken_destination_should_fail_the_json_step() {
    let reader = WxrItemReaderBuilder::new().from_path(fixture("posts.xml"));
    let writer = JsonItemWriterBuilder::new().from_writer(broken_file());

    let step = StepBuilder::new()
        .reader(&reader)
        .writer(&writer)
        .chunk(1)
        .build()
        .unwrap();

    assert!(matches!(step.execute(), Err(WxrError::ItemWriter(_))));
    assert_eq!(step.get_status(), StepStatus::Error);
}

#[test]
fn step_without_writer_should_not_build() {
    let reader = WxrItemReaderBuilder::new().from_path(fixture("posts.xml"));

    let result = StepBuilder::<wxr_flatten::wxr::record::Record>::new()
        .reader(&reader)
        .build();

    assert!(matches!(result, Err(WxrError::Step(_))));
}
