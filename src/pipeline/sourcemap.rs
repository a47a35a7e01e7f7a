//! Line-granular source map v3 writer.
//!
//! Every mapped output line gets one segment at column 0 pointing at a
//! `(source, line)` pair. Column-level precision is not tracked: bundles are
//! built from whole files, so a line is the smallest unit we can vouch for.

use serde::Serialize;

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Serialised form (`*.map`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    pub file: String,
    pub sources: Vec<String>,
    pub sources_content: Vec<Option<String>>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Accumulates line mappings while a bundle is concatenated.
#[derive(Debug)]
pub struct SourceMapBuilder {
    file: String,
    sources: Vec<String>,
    contents: Vec<Option<String>>,
    /// One entry per output line: `(source index, source line)`.
    lines: Vec<(u32, u32)>,
}

impl SourceMapBuilder {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            sources: Vec::new(),
            contents: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Register a source and return its index.
    pub fn add_source(&mut self, name: impl Into<String>, content: Option<String>) -> u32 {
        self.sources.push(name.into());
        self.contents.push(content);
        (self.sources.len() - 1) as u32
    }

    /// Map the next `count` output lines to consecutive source lines starting at 0.
    pub fn map_lines(&mut self, source: u32, count: usize) {
        self.lines
            .extend((0..count).map(|line| (source, line as u32)));
    }

    /// Map the next `count` output lines all to source line `line`.
    pub fn map_block(&mut self, source: u32, line: u32, count: usize) {
        self.lines
            .extend(std::iter::repeat_n((source, line), count));
    }

    pub fn build(self) -> SourceMap {
        SourceMap {
            version: 3,
            file: self.file,
            sources: self.sources,
            sources_content: self.contents,
            names: Vec::new(),
            mappings: encode_mappings(&self.lines),
        }
    }
}

/// Number of output lines `text` occupies when followed by a separator newline.
pub fn line_span(text: &str) -> usize {
    text.matches('\n').count() + 1
}

fn encode_mappings(lines: &[(u32, u32)]) -> String {
    let mut out = String::new();
    let mut prev_source = 0i64;
    let mut prev_line = 0i64;

    for (i, &(source, src_line)) in lines.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        let (source, src_line) = (i64::from(source), i64::from(src_line));

        // generated column, source index, source line, source column
        encode_vlq(&mut out, 0);
        encode_vlq(&mut out, source - prev_source);
        encode_vlq(&mut out, src_line - prev_line);
        encode_vlq(&mut out, 0);

        prev_source = source;
        prev_line = src_line;
    }
    out
}

fn encode_vlq(out: &mut String, value: i64) {
    let signed = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };
    let mut vlq = signed as u64;

    loop {
        let mut digit = (vlq & 0b1_1111) as u8;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b10_0000;
        }
        out.push(BASE64[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: i64) -> String {
        let mut out = String::new();
        encode_vlq(&mut out, value);
        out
    }

    #[test]
    fn test_vlq() {
        assert_eq!(vlq(0), "A");
        assert_eq!(vlq(1), "C");
        assert_eq!(vlq(-1), "D");
        assert_eq!(vlq(15), "e");
        assert_eq!(vlq(16), "gB");
        assert_eq!(vlq(-17), "jB");
        assert_eq!(vlq(1000), "w+B");
    }

    #[test]
    fn test_concatenated_script_mappings() {
        let mut builder = SourceMapBuilder::new("vendor.js");
        let a = builder.add_source("../../node_modules/a.js", None);
        let b = builder.add_source("../../node_modules/b.js", None);
        builder.map_lines(a, 2);
        builder.map_lines(b, 2);
        let map = builder.build();

        // a:0, a:+1, b:-1 (back to line 0 of the next source), b:+1
        assert_eq!(map.mappings, "AAAA;AACA;ACDA;AACA");
        assert_eq!(map.version, 3);
    }

    #[test]
    fn test_block_lines() {
        let mut builder = SourceMapBuilder::new("app.css");
        let s = builder.add_source("app.scss", Some("a{}".into()));
        builder.map_block(s, 0, 2);
        let map = builder.build();
        assert_eq!(map.mappings, "AAAA;AAAA");
    }

    #[test]
    fn test_json_shape() {
        let mut builder = SourceMapBuilder::new("app.js");
        let s = builder.add_source("../../assets/js/app.js", Some("x();".into()));
        builder.map_lines(s, 1);
        let json: serde_json::Value =
            serde_json::from_str(&builder.build().to_json().unwrap()).unwrap();

        assert_eq!(json["version"], 3);
        assert_eq!(json["file"], "app.js");
        assert_eq!(json["sources"][0], "../../assets/js/app.js");
        assert_eq!(json["sourcesContent"][0], "x();");
        assert_eq!(json["names"], serde_json::json!([]));
        assert_eq!(json["mappings"], "AAAA");
    }

    #[test]
    fn test_line_span() {
        assert_eq!(line_span("a"), 1);
        assert_eq!(line_span("a\nb"), 2);
        assert_eq!(line_span("a\nb\n"), 3);
    }
}
