//! Human-readable console output for probe runs.

use proxyprobe_core::{ProbeError, ProbeResult, ProxyReply, ProxyResponse, ResponseBody};
use serde_json::Value;
use std::io::Write;

/// Writes the probe transcript to any [`Write`] sink.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    /// Wraps a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Gives the writer back.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// `=== title ===` preceded by a blank line.
    pub fn section(&mut self, title: &str) -> ProbeResult<()> {
        writeln!(self.out, "\n=== {title} ===")?;
        Ok(())
    }

    /// The target URL (when given) and the pretty-printed payload.
    pub fn payload(&mut self, url: Option<&str>, payload: &Value) -> ProbeResult<()> {
        if let Some(url) = url {
            writeln!(self.out, "URL: {url}")?;
        }
        writeln!(self.out, "\nPayload:")?;
        writeln!(self.out, "{}", serde_json::to_string_pretty(payload)?)?;
        Ok(())
    }

    /// Marks the point where the request goes out.
    pub fn sending(&mut self) -> ProbeResult<()> {
        writeln!(self.out, "\nSending request...")?;
        Ok(())
    }

    /// Status, optionally the headers, then the body.
    pub fn response(&mut self, resp: &ProxyResponse, with_headers: bool) -> ProbeResult<()> {
        writeln!(self.out, "\nResponse Status: {}", resp.status)?;
        if with_headers {
            writeln!(self.out, "Response Headers:")?;
            for (name, value) in &resp.headers {
                writeln!(self.out, "  {name}: {value}")?;
            }
        }
        match &resp.body {
            ResponseBody::Json(value) => {
                writeln!(self.out, "\nResponse Body:")?;
                writeln!(self.out, "{}", serde_json::to_string_pretty(value)?)?;
            }
            ResponseBody::Text(text) => {
                writeln!(self.out, "\nNon-JSON Response:")?;
                writeln!(self.out, "{text}")?;
            }
        }
        Ok(())
    }

    /// `debug.env` and `debug.sql_query`, if the reply carries them.
    pub fn debug(&mut self, reply: &ProxyReply) -> ProbeResult<()> {
        let Some(debug) = &reply.debug else {
            return Ok(());
        };
        if !debug.env.is_empty() {
            writeln!(self.out, "\nDebug Env:")?;
            for (key, value) in &debug.env {
                match value {
                    Value::String(s) => writeln!(self.out, "  {key}: {s}")?,
                    other => writeln!(self.out, "  {key}: {other}")?,
                }
            }
        }
        if let Some(sql) = &debug.sql_query {
            writeln!(self.out, "\nSQL Query:")?;
            writeln!(self.out, "{sql}")?;
        }
        Ok(())
    }

    /// Placeholder guidance, printed as-is.
    pub fn guidance(&mut self, text: &str) -> ProbeResult<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Labeled failure line, e.g. `Request Error: connection refused`.
    pub fn failure(&mut self, err: &ProbeError) -> ProbeResult<()> {
        if err.is_guidance() {
            return self.guidance(&err.to_string());
        }
        writeln!(self.out, "\n{}: {err}", err.label())?;
        Ok(())
    }
}
