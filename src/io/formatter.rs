//! Splitting content files into front matter and body, and joining them back
//!
//! The block is recognised by its first line: `---` opens YAML, `+++` opens
//! TOML and a line starting with `{` opens a JSON object. The body is kept as
//! raw bytes so that a rewrite never alters it.

use crate::core::{Metadata, ParsedContent};
use crate::error::{HoorError, Result};
use std::path::PathBuf;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy)]
struct Line {
    start: usize,
    end: usize,
    next: usize,
}

fn lines(bytes: &[u8]) -> impl Iterator<Item = Line> + '_ {
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= bytes.len() {
            return None;
        }
        let start = pos;
        let (end, next) = match bytes[pos..].iter().position(|&b| b == b'\n') {
            Some(i) => (pos + i, pos + i + 1),
            None => (bytes.len(), bytes.len()),
        };
        pos = next;
        Some(Line { start, end, next })
    })
}

fn trim_end(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., last] = line {
        if last.is_ascii_whitespace() {
            line = rest;
        } else {
            break;
        }
    }
    line
}

fn block_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| {
        HoorError::invalid_front_matter(PathBuf::new(), format!("front matter is not UTF-8: {e}"))
    })
}

/// Split a content file into its front matter and body.
///
/// Returns `Ok(None)` when the file does not start with a front matter block.
/// Errors carry no path; attach one with [`HoorError::at`].
pub fn parse(bytes: &[u8]) -> Result<Option<ParsedContent>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut all_lines = lines(bytes);

    let Some(first) = all_lines.next() else {
        return Ok(None);
    };
    let opening = trim_end(&bytes[first.start..first.end]);

    match opening {
        b"---" | b"+++" => {
            let is_yaml = opening == b"---";
            let closing = all_lines.find(|line| {
                let text = trim_end(&bytes[line.start..line.end]);
                text == opening || (is_yaml && text == b"...")
            });
            let Some(closing) = closing else {
                return Err(HoorError::invalid_front_matter(
                    PathBuf::new(),
                    "front matter is not terminated",
                ));
            };

            let text = block_text(&bytes[first.next..closing.start])?;
            let metadata = if is_yaml {
                Metadata::Yaml(decode_yaml(text)?)
            } else {
                Metadata::Toml(toml::from_str(text)?)
            };
            Ok(Some(ParsedContent::new(metadata, bytes[closing.next..].to_vec())))
        }
        _ if opening.starts_with(b"{") => {
            let closing = if opening.ends_with(b"}") {
                Some(first)
            } else {
                all_lines.find(|line| trim_end(&bytes[line.start..line.end]) == b"}")
            };
            let Some(closing) = closing else {
                return Err(HoorError::invalid_front_matter(
                    PathBuf::new(),
                    "JSON front matter is not terminated",
                ));
            };

            let text = block_text(&bytes[first.start..closing.end])?;
            let map = serde_json::from_str(text)?;
            Ok(Some(ParsedContent::new(
                Metadata::Json(map),
                bytes[closing.next..].to_vec(),
            )))
        }
        _ => Ok(None),
    }
}

fn decode_yaml(text: &str) -> Result<serde_yaml::Mapping> {
    if text.trim().is_empty() {
        return Ok(serde_yaml::Mapping::new());
    }
    match serde_yaml::from_str(text)? {
        serde_yaml::Value::Mapping(map) => Ok(map),
        serde_yaml::Value::Null => Ok(serde_yaml::Mapping::new()),
        other => Err(HoorError::invalid_front_matter(
            PathBuf::new(),
            format!("expected a mapping, found {other:?}"),
        )),
    }
}

/// Serialize front matter and body back into file contents.
///
/// The block is written with the fence it was read with and followed by the
/// body bytes exactly as parsed.
pub fn render(content: &ParsedContent) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(content.body.len() + 512);

    match &content.metadata {
        Metadata::Yaml(map) => {
            out.extend_from_slice(b"---\n");
            if !map.is_empty() {
                let yaml = serde_yaml::to_string(map)?;
                push_block(&mut out, yaml.trim_start_matches("---\n"));
            }
            out.extend_from_slice(b"---\n");
        }
        Metadata::Toml(table) => {
            out.extend_from_slice(b"+++\n");
            push_block(&mut out, &toml::to_string(table)?);
            out.extend_from_slice(b"+++\n");
        }
        Metadata::Json(map) => {
            push_block(&mut out, &serde_json::to_string_pretty(map)?);
        }
    }

    out.extend_from_slice(&content.body);
    Ok(out)
}

fn push_block(out: &mut Vec<u8>, text: &str) {
    if text.is_empty() {
        return;
    }
    out.extend_from_slice(text.as_bytes());
    if !text.ends_with('\n') {
        out.push(b'\n');
    }
}
