//! Brace-block tokenizer for game `.cfg` files.
//!
//! The format is a loose tree of named nodes:
//!
//! ```text
//! PART
//! {
//!     name = JetEngine      // comments run to end of line
//!     MODULE
//!     {
//!         name = ModuleEngines
//!     }
//! }
//! ```
//!
//! A node's name is either written before `{` on the same line or on the last
//! bare line preceding it. Lines containing `=` are key/value entries.

use encoding_rs::UTF_8;
use tracing::trace;

use partcatalog_shared::{PartCatalogError, Result};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named, brace-delimited region of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// Label preceding `{` (may be empty for anonymous blocks).
    pub name: String,
    /// 1-based line where the opening `{` appears.
    pub line: usize,
    /// Key/value entries directly inside this block, in file order.
    pub values: Vec<KeyValue>,
    /// Nested blocks, in file order.
    pub children: Vec<Block>,
}

/// A single `key = value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl Block {
    /// Value recorded for `key`. A repeated key resolves to its last entry.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|kv| kv.key == key)
            .map(|kv| kv.value.as_str())
    }
}

/// Characters some editors leave at the start of a file.
const PREAMBLE_CHARS: &[char] = &['\u{feff}', '\u{200b}', '\u{2060}'];

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode raw file bytes into text, dropping any leading byte-order mark or
/// other invisible preamble.
///
/// Files are UTF-8 unless a UTF-16 BOM says otherwise. Invalid sequences
/// become U+FFFD.
pub fn decode(bytes: &[u8]) -> String {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        trace!(encoding = encoding.name(), "replaced malformed sequences while decoding");
    }
    text.trim_start_matches(PREAMBLE_CHARS).to_string()
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Parse config text into its top-level blocks, in file order.
///
/// Fails with [`PartCatalogError::Unparseable`] when braces do not balance.
pub fn parse_blocks(text: &str) -> Result<Vec<Block>> {
    let text = text.trim_start_matches(PREAMBLE_CHARS).replace("\r\n", "\n");

    let mut top: Vec<Block> = Vec::new();
    let mut stack: Vec<Block> = Vec::new();
    // Bare line that may name the next block.
    let mut header: Option<String> = None;

    for (idx, raw_line) in text.split(['\n', '\r']).enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line);
        let mut pending = String::new();

        for ch in line.chars() {
            match ch {
                '{' => {
                    let name = match pending.trim() {
                        "" => header.take().unwrap_or_default(),
                        inline => {
                            header = None;
                            inline.to_string()
                        }
                    };
                    pending.clear();
                    stack.push(Block {
                        name,
                        line: line_no,
                        ..Block::default()
                    });
                }
                '}' => {
                    if let Some(current) = stack.last_mut() {
                        push_entry(current, &pending);
                    }
                    pending.clear();
                    header = None;

                    let closed = stack
                        .pop()
                        .ok_or_else(|| PartCatalogError::unparseable(line_no, "unexpected `}`"))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(closed),
                        None => top.push(closed),
                    }
                }
                _ => pending.push(ch),
            }
        }

        let rest = pending.trim();
        if rest.is_empty() {
            continue;
        }
        if rest.contains('=') {
            header = None;
            if let Some(current) = stack.last_mut() {
                push_entry(current, rest);
            }
        } else {
            header = Some(rest.to_string());
        }
    }

    if let Some(open) = stack.first() {
        return Err(PartCatalogError::unparseable(
            open.line,
            format!("block `{}` is never closed", open.name),
        ));
    }

    Ok(top)
}

/// Drop a trailing `//` comment.
fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Record `key = value` on `block`; text without `=` is ignored.
fn push_entry(block: &mut Block, text: &str) {
    let Some((key, value)) = text.split_once('=') else {
        return;
    };
    let key = key.trim();
    if key.is_empty() {
        return;
    }
    block.values.push(KeyValue {
        key: key.to_string(),
        value: value.trim().to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_blocks() {
        let text = "PART\n{\n\tname = JetEngine\n\tMODULE\n\t{\n\t\tname = ModuleEngines\n\t\tPROPELLANT\n\t\t{\n\t\t\tname = LiquidFuel\n\t\t}\n\t}\n}\n";
        let blocks = parse_blocks(text).unwrap();

        assert_eq!(blocks.len(), 1);
        let part = &blocks[0];
        assert_eq!(part.name, "PART");
        assert_eq!(part.line, 2);
        assert_eq!(part.value("name"), Some("JetEngine"));
        assert_eq!(part.children.len(), 1);

        let module = &part.children[0];
        assert_eq!(module.name, "MODULE");
        assert_eq!(module.value("name"), Some("ModuleEngines"));
        assert_eq!(module.children.iter().filter(|b| b.name == "PROPELLANT").count(), 1);
        assert_eq!(module.children[0].value("name"), Some("LiquidFuel"));
    }

    #[test]
    fn nested_values_stay_in_their_block() {
        let text = "PART\n{\nname = A\nMODULE\n{\nname = M\nisEnabled = true\n}\ncost = 5\n}";
        let blocks = parse_blocks(text).unwrap();
        let keys: Vec<&str> = blocks[0].values.iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys, ["name", "cost"]);
    }

    #[test]
    fn multiple_top_level_blocks_in_order() {
        let text = "PART\n{\nname = a\n}\nRESOURCE_DEFINITION\n{\nname = Ore\n}\nPART\n{\nname = b\n}\n";
        let blocks = parse_blocks(text).unwrap();
        let names: Vec<&str> = blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["PART", "RESOURCE_DEFINITION", "PART"]);
        assert_eq!(blocks[2].value("name"), Some("b"));
    }

    #[test]
    fn inline_header_and_single_line_block() {
        let text = "PART {\nname = inline\nMODULE { name = ModuleCommand }\n}\n";
        let blocks = parse_blocks(text).unwrap();
        assert_eq!(blocks[0].name, "PART");
        assert_eq!(blocks[0].value("name"), Some("inline"));
        assert_eq!(blocks[0].children[0].name, "MODULE");
        assert_eq!(blocks[0].children[0].value("name"), Some("ModuleCommand"));
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let text = "// header comment\n\nPART // the part\n{\n\n  name = commented // trailing\n  // title = hidden\n}\n";
        let blocks = parse_blocks(text).unwrap();
        assert_eq!(blocks[0].name, "PART");
        assert_eq!(blocks[0].value("name"), Some("commented"));
        assert_eq!(blocks[0].value("title"), None);
    }

    #[test]
    fn crlf_and_lone_cr_line_endings() {
        let crlf = "PART\r\n{\r\nname = crlf\r\n}\r\n";
        let cr = "PART\r{\rname = cr\r}\r";
        assert_eq!(parse_blocks(crlf).unwrap()[0].value("name"), Some("crlf"));
        assert_eq!(parse_blocks(cr).unwrap()[0].value("name"), Some("cr"));
    }

    #[test]
    fn value_split_on_first_equals() {
        let text = "PART\n{\nname = x\ndescription = a = b\n}";
        let blocks = parse_blocks(text).unwrap();
        assert_eq!(blocks[0].value("description"), Some("a = b"));
    }

    #[test]
    fn top_level_values_are_dropped() {
        let text = "loose = value\nPART\n{\nname = x\n}";
        let blocks = parse_blocks(text).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].values.len(), 1);
    }

    #[test]
    fn value_line_resets_pending_header() {
        // `stray` is followed by a value line, so the brace opens an anonymous block.
        let text = "stray\nkey = v\n{\nname = x\n}";
        let blocks = parse_blocks(text).unwrap();
        assert_eq!(blocks[0].name, "");
    }

    #[test]
    fn unclosed_block_is_unparseable() {
        let err = parse_blocks("PART\n{\nname = x\nMODULE\n{\n}\n").unwrap_err();
        match err {
            PartCatalogError::Unparseable { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("PART"));
            }
            other => panic!("expected Unparseable, got {other:?}"),
        }
    }

    #[test]
    fn stray_close_brace_is_unparseable() {
        let err = parse_blocks("PART\n{\nname = x\n}\n}\n").unwrap_err();
        assert!(matches!(err, PartCatalogError::Unparseable { line: 5, .. }));
    }

    #[test]
    fn decode_strips_byte_order_mark() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"PART\n{\nname = GooExperiment\n}\n");
        let text = decode(&bytes);
        assert!(text.starts_with("PART"));
        assert_eq!(
            parse_blocks(&text).unwrap()[0].value("name"),
            Some("GooExperiment")
        );
    }

    #[test]
    fn decode_tolerates_invalid_utf8() {
        let bytes = b"PART\n{\nname = x\ntitle = caf\xE9\n}\n";
        let blocks = parse_blocks(&decode(bytes)).unwrap();
        assert_eq!(blocks[0].value("name"), Some("x"));
        assert!(blocks[0].value("title").is_some());
    }

    #[test]
    fn decode_utf16_le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend("PART\n{\nname = wide\n}\n".encode_utf16().flat_map(u16::to_le_bytes));
        let text = decode(&bytes);
        assert!(text.starts_with("PART"));
        assert_eq!(parse_blocks(&text).unwrap()[0].value("name"), Some("wide"));
    }

    #[test]
    fn repeated_key_value_is_last_entry() {
        let blocks = parse_blocks("PART\n{\nname = a\nname = b\n}\n").unwrap();
        assert_eq!(blocks[0].values.len(), 2);
        assert_eq!(blocks[0].value("name"), Some("b"));
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        assert!(parse_blocks("").unwrap().is_empty());
        assert!(parse_blocks("\u{feff}").unwrap().is_empty());
    }
}
