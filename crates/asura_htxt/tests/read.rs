use std::fs::File;
use std::path::PathBuf;

use asura_htxt::error::Result;
use asura_htxt::read::HtxtReader;
use asura_htxt::types::Record;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), name))
}

#[traced_test]
#[test]
fn parse_htxt() -> Result<()> {
    let mut file = File::open(resource("sample.asr_en"))?;
    let htxt = HtxtReader::decode(&mut file)?;

    assert_eq!(htxt.magic_number, 0x1a2b3c4d);
    assert_eq!(htxt.language_id, 0x00000001);
    assert_eq!(htxt.file_name, "hud_text");
    assert_eq!(htxt.len(), 4);

    assert_eq!(
        htxt.records,
        vec![
            Record::new(0x00000001, "MENU_START".into(), "Start Game".into()),
            Record::new(0x00000002, "JP_GREETING".into(), "こんにちは世界".into()),
            Record::new(
                0x00000003,
                "PATH\\7f".into(),
                "Caf\\00e9\\000aC:\\005cx".into()
            ),
            Record::new(0xdeadbeef, "EMPTY".into(), "".into()),
        ]
    );

    Ok(())
}

#[test]
fn parse_truncated_htxt() -> Result<()> {
    let data = std::fs::read(resource("sample.asr_en"))?;

    // cut inside the header, the text table, the file name and the names blob
    for len in [0, 11, 30, 60, 130, 150] {
        assert!(
            HtxtReader::from_bytes(&data[..len]).is_err(),
            "{len} bytes should not decode"
        );
    }

    // the trailer is never read
    assert!(HtxtReader::from_bytes(&data[..data.len() - 16]).is_ok());

    Ok(())
}
