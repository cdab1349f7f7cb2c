use pretty_assertions::assert_eq;

use super::*;

#[test]
fn primitives_are_little_endian() {
    let mut writer = BinWriter::new();
    writer.write_bool(true);
    writer.write_uint(0x0102_0304);
    writer.write_int(-2);
    writer.write_string("mvp");
    assert_eq!(
        writer.as_bytes(),
        &[
            1u8, // bool
            0x04, 0x03, 0x02, 0x01, // uint
            0xFE, 0xFF, 0xFF, 0xFF, // int
            3, 0, 0, 0, b'm', b'v', b'p', // string
        ]
    );
}

#[test]
fn tags_are_byte_reversed_on_disk() {
    let mut writer = BinWriter::new();
    writer.write_tag(*b"VERT");
    assert_eq!(writer.as_bytes(), b"TREV");

    let bytes = writer.into_bytes();
    let mut reader = BinReader::new(&bytes);
    assert_eq!(reader.read_tag().unwrap(), *b"VERT");
}

#[test]
fn word_block_is_prefixed_with_its_byte_length() {
    let mut writer = BinWriter::new();
    writer.write_words(&[0x0723_0203, 7]);
    assert_eq!(&writer.as_bytes()[..4], &[8u8, 0, 0, 0]);
    assert_eq!(writer.len(), 12);

    let bytes = writer.into_bytes();
    let mut reader = BinReader::new(&bytes);
    assert_eq!(reader.read_words().unwrap(), vec![0x0723_0203, 7]);
    assert!(reader.is_at_end());
}

#[test]
fn truncated_string_reports_the_shortfall() {
    let mut writer = BinWriter::new();
    writer.write_uint(10);
    writer.write_bytes(b"abc");
    let bytes = writer.into_bytes();

    let err = BinReader::new(&bytes).read_string().unwrap_err();
    assert!(
        matches!(err, ContainerError::Truncated { offset: 4, needed: 7 }),
        "{err}"
    );
}

#[test]
fn wrong_tag_names_both_tags() {
    let mut writer = BinWriter::new();
    writer.write_tag(*b"PIXL");
    let bytes = writer.into_bytes();

    let err = BinReader::new(&bytes).expect_tag(*b"HULL").unwrap_err();
    assert_eq!(err.to_string(), "expected tag 'HULL' at byte 0, found 'PIXL'");
}

#[test]
fn malformed_values_are_rejected() {
    let bytes = [2u8];
    assert!(matches!(
        BinReader::new(&bytes).read_bool(),
        Err(ContainerError::InvalidBool { offset: 0, value: 2 })
    ));

    let bytes = [2u8, 0, 0, 0, 0xC3, 0x28];
    assert!(matches!(
        BinReader::new(&bytes).read_string(),
        Err(ContainerError::InvalidUtf8 { offset: 4 })
    ));

    let bytes = [3u8, 0, 0, 0, 1, 2, 3];
    assert!(matches!(
        BinReader::new(&bytes).read_words(),
        Err(ContainerError::UnalignedBinary { offset: 0, len: 3 })
    ));
}

#[test]
fn write_to_creates_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.bin");
    let mut writer = BinWriter::new();
    writer.write_string("Lit");
    writer.write_to(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), writer.into_bytes());
}
