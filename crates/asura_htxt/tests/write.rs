use std::path::PathBuf;

use asura_htxt::error::Result;
use asura_htxt::read::HtxtReader;
use asura_htxt::table::Workbook;
use asura_htxt::types::Container;
use asura_htxt::write::{encode, Layout};
use pretty_assertions::{assert_eq, assert_str_eq};
use tracing_test::traced_test;

fn sample() -> Result<Vec<u8>> {
    let path = PathBuf::from(format!(
        "{}/resources/sample.asr_en",
        env!("CARGO_MANIFEST_DIR")
    ));
    Ok(std::fs::read(path)?)
}

#[traced_test]
#[test]
fn rewrite_htxt() -> Result<()> {
    let expected = sample()?;
    let htxt = HtxtReader::from_bytes(&expected)?;

    let actual = encode(&htxt)?;

    assert_eq!(actual.len(), expected.len());
    assert_str_eq!(format!("{:02X?}", actual), format!("{:02X?}", expected));

    Ok(())
}

#[test]
fn sample_layout() -> Result<()> {
    let htxt = HtxtReader::from_bytes(&sample()?)?;
    let layout = Layout::compute(&htxt)?;

    assert_eq!(layout.content_size, 175);
    assert_eq!(layout.text_size, 60);
    assert_eq!(layout.name_size, 35);
    assert_eq!(layout.file_name_region, 12);
    assert_eq!(layout.file_size(), 199);

    Ok(())
}

#[traced_test]
#[test]
fn rewrite_through_workbook() -> Result<()> {
    let expected = sample()?;
    let htxt = HtxtReader::from_bytes(&expected)?;

    let mut document = Vec::new();
    Workbook::from(&htxt).to_writer(&mut document)?;
    let imported = Container::try_from(Workbook::from_reader(document.as_slice())?)?;

    assert_eq!(imported, htxt);
    assert_eq!(encode(&imported)?, expected);

    Ok(())
}
