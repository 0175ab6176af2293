use std::io::Write;

use serde::Serialize;

use crate::io::IoError;

/// Writes `value` as single-line JSON followed by a newline.
pub fn write_json_line<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    value: &T,
) -> Result<(), IoError> {
    serde_json::to_writer(&mut writer, value)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Writes `value` as JSON with 2-space indentation and a trailing newline.
pub fn write_pretty_json<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    value: &T,
) -> Result<(), IoError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    Ok(())
}
