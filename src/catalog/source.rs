//! Line-level pass over `.po` text before `polib` sees it
//!
//! `polib` needs a complete header, panics on malformed lines and skips `#~`
//! entries. This pass checks every line, lifts the header values out and
//! splits active from obsolete entries. Both halves are re-emitted behind
//! [`STUB_HEADER`], so `polib` only ever parses text it accepts.

use regex::Regex;
use std::collections::HashMap;
use std::fmt::Write as _;

/// A header with every field `polib` requires. Real values live in [`PoSource`].
pub(super) const STUB_HEADER: &str = "msgid \"\"\n\
msgstr \"Project-Id-Version: \\n\"\n\
\"POT-Creation-Date: \\n\"\n\
\"PO-Revision-Date: \\n\"\n\
\"Language-Team: \\n\"\n\
\"MIME-Version: 1.0\\n\"\n\
\"Content-Type: text/plain; charset=UTF-8\\n\"\n\
\"Content-Transfer-Encoding: 8bit\\n\"\n\
\"Language: \\n\"\n\
\"Plural-Forms: nplurals=1; plural=0;\\n\"\n";

/// `polib` reads `msgstr[0]` to `msgstr[9]` and drops anything above.
const MAX_PLURAL_FORMS: usize = 10;

/// A `.po` file split into its header values and `polib`-ready text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoSource {
    pub language: Option<String>,
    /// Raw `Plural-Forms` value, valid or not
    pub plural_forms: Option<String>,
    pub active: String,
    pub obsolete: String,
    pub obsolete_count: usize,
}

#[derive(Debug, Default)]
struct Block {
    lines: Vec<String>,
    obsolete: bool,
    has_content: bool,
    seen_msgstr: bool,
    keyword: Option<String>,
}

impl Block {
    /// Raw (still escaped) value of each keyword in the block
    fn fields(&self) -> HashMap<String, String> {
        let mut fields: HashMap<String, String> = HashMap::new();
        let mut current: Option<String> = None;
        for line in &self.lines {
            if line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix('"') {
                if let Some(key) = &current {
                    let value = rest.strip_suffix('"').unwrap_or(rest);
                    fields.entry(key.clone()).or_default().push_str(value);
                }
                continue;
            }
            if let Some((key, value)) = line.split_once(' ') {
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(value);
                fields.insert(key.to_string(), value.to_string());
                current = Some(key.to_string());
            }
        }
        fields
    }

    fn is_header(&self) -> bool {
        let fields = self.fields();
        fields.get("msgid").is_some_and(|id| id.is_empty()) && !fields.contains_key("msgctxt")
    }
}

impl PoSource {
    /// Split and check `.po` text. The error names the offending line.
    pub fn parse(text: &str) -> Result<Self, String> {
        // Pattern: keyword, optional plural index, one quoted string
        let keyword_line =
            Regex::new(r#"^(msgctxt|msgid_plural|msgid|msgstr(?:\[(\d+)\])?)\s+(".*")$"#)
                .map_err(|e| format!("Regex error: {}", e))?;
        let mut blocks: Vec<Block> = Vec::new();
        let mut block = Block::default();

        let text = text.trim_start_matches('\u{feff}');
        for (index, raw) in text.lines().enumerate() {
            let number = index + 1;
            let line = raw.trim();
            if line.is_empty() {
                blocks.push(std::mem::take(&mut block));
                continue;
            }

            let (line, obsolete) = match line.strip_prefix("#~") {
                // previous msgid of an obsolete entry
                Some(rest) if rest.starts_with('|') => continue,
                Some(rest) => (rest.trim(), true),
                None => (line, false),
            };
            if line.is_empty() {
                continue;
            }

            if line.starts_with('#') {
                if block.seen_msgstr {
                    blocks.push(std::mem::take(&mut block));
                }
                block.obsolete |= obsolete;
                block.lines.push(line.to_string());
                continue;
            }

            if line.starts_with('"') {
                if line.len() < 2 || !line.ends_with('"') {
                    return Err(format!("line {}: unterminated string {:?}", number, line));
                }
                if block.keyword.is_none() {
                    return Err(format!(
                        "line {}: string {:?} does not follow a keyword",
                        number, line
                    ));
                }
                block.obsolete |= obsolete;
                block.lines.push(line.to_string());
                continue;
            }

            let caps = keyword_line
                .captures(line)
                .ok_or_else(|| format!("line {}: cannot parse {:?}", number, line))?;
            let keyword = caps[1].to_string();
            if let Some(form) = caps.get(2) {
                let form: usize = form
                    .as_str()
                    .parse()
                    .map_err(|_| format!("line {}: bad plural index in {:?}", number, line))?;
                if form >= MAX_PLURAL_FORMS {
                    return Err(format!(
                        "line {}: more than {} plural forms are not supported",
                        number, MAX_PLURAL_FORMS
                    ));
                }
            }

            // a new entry without a blank line in between
            if block.seen_msgstr && (keyword == "msgctxt" || keyword == "msgid") {
                blocks.push(std::mem::take(&mut block));
            }
            block.seen_msgstr |= keyword.starts_with("msgstr");
            block.obsolete |= obsolete;
            block.has_content = true;
            block.lines.push(format!("{} {}", keyword, &caps[3]));
            block.keyword = Some(keyword);
        }
        blocks.push(block);

        let mut blocks: Vec<Block> = blocks.into_iter().filter(|b| b.has_content).collect();

        let mut source = PoSource::default();
        if blocks
            .first()
            .is_some_and(|first| !first.obsolete && first.is_header())
        {
            let header = blocks.remove(0).fields();
            let values = header_values(&unescape(
                header.get("msgstr").map(String::as_str).unwrap_or_default(),
            ));
            source.language = values.get("Language").cloned();
            source.plural_forms = values.get("Plural-Forms").cloned();
        }

        source.active = STUB_HEADER.to_string();
        source.obsolete = STUB_HEADER.to_string();
        for block in &blocks {
            let target = if block.obsolete {
                source.obsolete_count += 1;
                &mut source.obsolete
            } else {
                &mut source.active
            };
            // writing to a String cannot fail
            let _ = write!(target, "\n{}\n", block.lines.join("\n"));
        }

        Ok(source)
    }
}

/// `Key: value` lines of the header, empty values left out
fn header_values(header: &str) -> HashMap<String, String> {
    header
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let value = value.trim();
            (!value.is_empty()).then(|| (key.trim().to_string(), value.to_string()))
        })
        .collect()
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Turn `polib` output into the `#~` form. Comment lines stay as they are.
pub(super) fn obsolete_lines(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        if line.is_empty() || line.starts_with('#') {
            out.push_str(line);
        } else {
            out.push_str("#~ ");
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}
