// ABOUTME: Result channel rendering for the setkit CLI
// ABOUTME: Writes a response as protocol lines or as a JSON document

use crate::config::OutputFormat;
use setkit_settings::Response;
use std::io::Write;

pub fn render<W: Write>(response: &Response, format: OutputFormat, out: &mut W) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => response.write_lines(out)?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, response)?;
            writeln!(out)?;
            out.flush()?;
        }
    }
    Ok(())
}
