//! Fixture helpers shared by unit tests.

use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Writes a TIFF-container EXIF block holding the given ASCII fields.
pub fn write_exif_fixture(path: &Path, fields: &[(Tag, &str)]) {
    let fields: Vec<Field> = fields
        .iter()
        .map(|(tag, value)| Field {
            tag: *tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![value.as_bytes().to_vec()]),
        })
        .collect();

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, true).expect("encode exif fixture");
    fs::write(path, buf.into_inner()).expect("write exif fixture");
}
