//! Reading and writing the app-list file.
//!
//! The file is JSON-like but never parsed strictly: a settings object may
//! appear anywhere, and the first top-level array holds the launchable
//! entries. Unknown keys are ignored and broken entries are skipped. Saving
//! only ever rewrites the settings header; everything from the array start
//! onward is copied back byte for byte.

use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::iter::Peekable;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const NAME_LIMIT: usize = 63;
pub const ALIAS_LIMIT: usize = 127;
pub const SETTING_LIMIT: usize = 15;

pub const DEFAULT_MAX_ENTRIES: usize = 256;
pub const DEFAULT_MAX_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: &'static str },
    #[error("cannot write {}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot encode settings")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavMode {
    #[default]
    Letters,
    FunctionKeys,
}

impl NavMode {
    pub fn toggled(self) -> Self {
        match self {
            NavMode::Letters => NavMode::FunctionKeys,
            NavMode::FunctionKeys => NavMode::Letters,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NavMode::Letters => "Letters",
            NavMode::FunctionKeys => "Function Keys",
        }
    }

    fn from_config(value: &str) -> Option<Self> {
        match value {
            "letters" => Some(NavMode::Letters),
            "function_keys" => Some(NavMode::FunctionKeys),
            _ => None,
        }
    }
}

/// Navigation scheme and colour names. Field order is the on-disk order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub nav_mode: NavMode,
    pub app_fg: String,
    pub app_bg: String,
    pub sel_fg: String,
    pub sel_bg: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nav_mode: NavMode::Letters,
            app_fg: "cyan".into(),
            app_bg: "black".into(),
            sel_fg: "black".into(),
            sel_bg: "yellow".into(),
        }
    }
}

impl Settings {
    fn apply(&mut self, key: &str, value: &str) {
        if value.is_empty() || value.chars().count() > SETTING_LIMIT {
            warn!(key, len = value.len(), "ignoring out-of-bounds setting");
            return;
        }
        let slot = match key {
            "nav_mode" => {
                match NavMode::from_config(value) {
                    Some(mode) => self.nav_mode = mode,
                    None => warn!(value, "unknown nav_mode, keeping {:?}", self.nav_mode),
                }
                return;
            }
            "app_fg" => &mut self.app_fg,
            "app_bg" => &mut self.app_bg,
            "sel_fg" => &mut self.sel_fg,
            "sel_bg" => &mut self.sel_bg,
            _ => return,
        };
        *slot = value.to_string();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppEntry {
    pub name: String,
    pub alias: String,
    pub enter_to_return: bool,
}

impl AppEntry {
    pub fn new(name: impl Into<String>, alias: impl Into<String>, enter_to_return: bool) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            enter_to_return,
        }
    }

    fn from_fields(fields: &[(String, String)]) -> Option<Self> {
        let lookup = |key: &str| {
            fields
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str())
        };
        let name = lookup("name").map(|value| bounded(value.trim(), NAME_LIMIT))?;
        let alias = lookup("alias").map(|value| bounded(value.trim(), ALIAS_LIMIT))?;
        if name.is_empty() || alias.is_empty() {
            return None;
        }
        let enter_to_return = lookup("entertoreturn")
            .map(|value| {
                let value = value.trim_start();
                value.starts_with("true") || value.starts_with('1')
            })
            .unwrap_or(false);
        Some(Self {
            name,
            alias,
            enter_to_return,
        })
    }
}

/// Entries in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppCatalog {
    entries: Vec<AppEntry>,
}

impl AppCatalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AppEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AppEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }
}

impl From<Vec<AppEntry>> for AppCatalog {
    fn from(entries: Vec<AppEntry>) -> Self {
        Self { entries }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_entries: usize,
    /// Bytes read by `load`; the rest of a larger file is not parsed.
    pub max_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    pub settings: Settings,
    pub catalog: AppCatalog,
}

pub fn load(path: &Path) -> Result<LoadedConfig, ConfigError> {
    load_with(path, &Limits::default())
}

pub fn load_with(path: &Path, limits: &Limits) -> Result<LoadedConfig, ConfigError> {
    let not_found = |source| ConfigError::NotFound {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(not_found)?;
    let mut buf = Vec::new();
    file.take(limits.max_bytes as u64)
        .read_to_end(&mut buf)
        .map_err(not_found)?;
    if buf.len() == limits.max_bytes {
        if let Ok(meta) = fs::metadata(path) {
            if meta.len() > limits.max_bytes as u64 {
                warn!(
                    path = %path.display(),
                    size = meta.len(),
                    limit = limits.max_bytes,
                    "config larger than load buffer, tail ignored"
                );
            }
        }
    }
    let loaded = parse(&buf, limits);
    info!(
        path = %path.display(),
        apps = loaded.catalog.len(),
        nav_mode = ?loaded.settings.nav_mode,
        "configuration loaded"
    );
    Ok(loaded)
}

pub fn parse(text: &[u8], limits: &Limits) -> LoadedConfig {
    LoadedConfig {
        settings: parse_settings(text),
        catalog: parse_entries(text, limits.max_entries),
    }
}

/// Rewrites the settings header of `path`, keeping the entries section as is.
///
/// The whole file is read before it is opened for writing, so a missing array
/// or an unreadable file leaves the disk untouched.
pub fn save(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let original = fs::read(path).map_err(|source| ConfigError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let updated = splice_settings(&original, settings)?.ok_or_else(|| ConfigError::Malformed {
        path: path.to_path_buf(),
        reason: "no application list found",
    })?;
    let write_failed = |source| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(write_failed)?;
    file.write_all(&updated).map_err(write_failed)?;
    file.flush().map_err(write_failed)?;
    info!(path = %path.display(), nav_mode = ?settings.nav_mode, "settings saved");
    Ok(())
}

/// Fresh settings header followed by `original` from its array start, or
/// `None` when `original` has no array.
pub fn splice_settings(
    original: &[u8],
    settings: &Settings,
) -> Result<Option<Vec<u8>>, serde_json::Error> {
    let Some(start) = array_start(original) else {
        return Ok(None);
    };
    let mut out = settings_header(settings)?.into_bytes();
    out.extend_from_slice(&original[start..]);
    Ok(Some(out))
}

pub fn settings_header(settings: &Settings) -> Result<String, serde_json::Error> {
    #[derive(Serialize)]
    struct Header<'a> {
        settings: &'a Settings,
    }
    let body = serde_json::to_string(&Header { settings })?;
    Ok(format!("{body},\n"))
}

fn parse_settings(text: &[u8]) -> Settings {
    let mut settings = Settings::default();
    let mut tokens = Tokenizer::new(text).peekable();
    while let Some(token) = tokens.next() {
        if token.kind != TokenKind::Str(b"settings") || !eat(&mut tokens, TokenKind::Colon) {
            continue;
        }
        if !eat(&mut tokens, TokenKind::ObjectStart) {
            continue;
        }
        let (fields, _) = read_object(&mut tokens);
        for (key, value) in &fields {
            settings.apply(key, value.trim());
        }
        break;
    }
    settings
}

fn parse_entries(text: &[u8], max_entries: usize) -> AppCatalog {
    let mut catalog = AppCatalog::default();
    let Some(start) = array_start(text) else {
        warn!("no application list in config");
        return catalog;
    };
    let mut tokens = Tokenizer::at(text, start + 1).peekable();
    while catalog.len() < max_entries {
        let Some(token) = tokens.next() else { break };
        match token.kind {
            TokenKind::ArrayEnd => break,
            TokenKind::ArrayStart => skip_nested(&mut tokens),
            TokenKind::ObjectStart => {
                let (fields, end) = read_object(&mut tokens);
                if end == ObjectEnd::Eof {
                    warn!(offset = token.offset, "dropping unterminated entry");
                    break;
                }
                match AppEntry::from_fields(&fields) {
                    Some(entry) => {
                        debug!(name = %entry.name, alias = %entry.alias, "app entry");
                        catalog.entries.push(entry);
                    }
                    None => warn!(offset = token.offset, "skipping entry without name or alias"),
                }
                if end == ObjectEnd::ArrayClosed {
                    break;
                }
            }
            _ => {}
        }
    }
    if catalog.len() == max_entries {
        debug!(max_entries, "entry bound reached");
    }
    catalog
}

/// Offset of the first `[` outside any object or array.
fn array_start(text: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    for token in Tokenizer::new(text) {
        match token.kind {
            TokenKind::ArrayStart if depth == 0 => return Some(token.offset),
            TokenKind::ObjectStart | TokenKind::ArrayStart => depth += 1,
            TokenKind::ObjectEnd | TokenKind::ArrayEnd => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

fn bounded(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((cut, _)) => {
            debug!(limit, "truncating field");
            value[..cut].to_string()
        }
        None => value.to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenKind<'a> {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Colon,
    Comma,
    /// Raw bytes between the quotes, escapes still in place.
    Str(&'a [u8]),
    Bare(&'a [u8]),
}

#[derive(Clone, Copy, Debug)]
struct Token<'a> {
    kind: TokenKind<'a>,
    offset: usize,
}

/// Splits the file into structural characters, quoted strings and barewords.
/// `//` starts a comment running to the end of the line.
struct Tokenizer<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self::at(text, 0)
    }

    fn at(text: &'a [u8], pos: usize) -> Self {
        Self { text, pos }
    }

    fn skip_blank(&mut self) {
        loop {
            while self.pos < self.text.len() && self.text[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.text[self.pos..].starts_with(b"//") {
                while self.pos < self.text.len() && self.text[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            break;
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.skip_blank();
        let offset = self.pos;
        let byte = *self.text.get(offset)?;
        let structural = match byte {
            b'{' => Some(TokenKind::ObjectStart),
            b'}' => Some(TokenKind::ObjectEnd),
            b'[' => Some(TokenKind::ArrayStart),
            b']' => Some(TokenKind::ArrayEnd),
            b':' => Some(TokenKind::Colon),
            b',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = structural {
            self.pos += 1;
            return Some(Token { kind, offset });
        }
        if byte == b'"' {
            let body = &self.text[offset + 1..];
            let mut escaped = false;
            let close = body.iter().position(|&b| {
                if escaped {
                    escaped = false;
                    return false;
                }
                escaped = b == b'\\';
                b == b'"'
            });
            let (content, next) = match close {
                Some(end) => (&body[..end], offset + 1 + end + 1),
                None => (body, self.text.len()),
            };
            self.pos = next;
            return Some(Token {
                kind: TokenKind::Str(content),
                offset,
            });
        }
        let len = self.text[offset..]
            .iter()
            .position(|&b| b.is_ascii_whitespace() || b"{}[]:,\"".contains(&b))
            .unwrap_or(self.text.len() - offset);
        self.pos = offset + len;
        Some(Token {
            kind: TokenKind::Bare(&self.text[offset..self.pos]),
            offset,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ObjectEnd {
    Closed,
    /// A `]` arrived before the object's `}`.
    ArrayClosed,
    Eof,
}

fn eat<'a>(tokens: &mut Peekable<Tokenizer<'a>>, kind: TokenKind<'a>) -> bool {
    tokens.next_if(|token| token.kind == kind).is_some()
}

/// Collects `"key": scalar` pairs of an object whose `{` was already consumed.
/// Nested containers are skipped; stray tokens are ignored.
fn read_object(tokens: &mut Peekable<Tokenizer<'_>>) -> (Vec<(String, String)>, ObjectEnd) {
    let mut fields = Vec::new();
    while let Some(token) = tokens.next() {
        match token.kind {
            TokenKind::ObjectEnd => return (fields, ObjectEnd::Closed),
            TokenKind::ArrayEnd => return (fields, ObjectEnd::ArrayClosed),
            TokenKind::ObjectStart | TokenKind::ArrayStart => skip_nested(tokens),
            TokenKind::Str(key) => {
                if !eat(tokens, TokenKind::Colon) {
                    continue;
                }
                let value = match tokens.peek().map(|token| token.kind) {
                    Some(TokenKind::Str(raw)) | Some(TokenKind::Bare(raw)) => raw,
                    _ => continue,
                };
                tokens.next();
                let key = decode(key).into_owned();
                if fields.iter().any(|(existing, _)| *existing == key) {
                    continue;
                }
                fields.push((key, decode(value).into_owned()));
            }
            _ => {}
        }
    }
    (fields, ObjectEnd::Eof)
}

fn skip_nested(tokens: &mut Peekable<Tokenizer<'_>>) {
    let mut depth = 1usize;
    for token in tokens.by_ref() {
        match token.kind {
            TokenKind::ObjectStart | TokenKind::ArrayStart => depth += 1,
            TokenKind::ObjectEnd | TokenKind::ArrayEnd => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

fn decode(raw: &[u8]) -> Cow<'_, str> {
    if !raw.contains(&b'\\') {
        return String::from_utf8_lossy(raw);
    }
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied();
    while let Some(byte) = bytes.next() {
        if byte != b'\\' {
            out.push(byte);
            continue;
        }
        match bytes.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b't') => out.push(b'\t'),
            Some(b'r') => out.push(b'\r'),
            Some(other) => out.push(other),
            None => out.push(b'\\'),
        }
    }
    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{"settings":{"nav_mode":"letters","app_fg":"cyan","app_bg":"black","sel_fg":"black","sel_bg":"yellow"}},
[
  {"name": "Text Editor", "alias": "nano", "entertoreturn": true},
  {"name": "File Browser", "alias": "mc"}
]
"#;

    fn parse_str(text: &str) -> LoadedConfig {
        parse(text.as_bytes(), &Limits::default())
    }

    #[test]
    fn parses_sample_file() {
        let loaded = parse_str(SAMPLE);
        assert_eq!(loaded.settings, Settings::default());
        assert_eq!(
            loaded.catalog.entries(),
            &[
                AppEntry::new("Text Editor", "nano", true),
                AppEntry::new("File Browser", "mc", false),
            ]
        );
    }

    #[test]
    fn compact_file_with_partial_settings() {
        let loaded = parse_str(
            r#"{"settings":{"nav_mode":"letters"}},[{"name":"A","alias":"echo a"},{"name":"B","alias":"echo b"}]"#,
        );
        assert_eq!(loaded.settings.nav_mode, NavMode::Letters);
        assert_eq!(loaded.settings.app_fg, "cyan");
        assert_eq!(loaded.settings.sel_bg, "yellow");
        assert_eq!(
            loaded.catalog.entries(),
            &[
                AppEntry::new("A", "echo a", false),
                AppEntry::new("B", "echo b", false),
            ]
        );
    }

    #[test]
    fn settings_keys_in_any_order() {
        let loaded = parse_str(
            r#"{"settings": { "sel_bg" : "red", "nav_mode": "function_keys", "app_fg":"green" }}, []"#,
        );
        assert_eq!(loaded.settings.nav_mode, NavMode::FunctionKeys);
        assert_eq!(loaded.settings.app_fg, "green");
        assert_eq!(loaded.settings.app_bg, "black");
        assert_eq!(loaded.settings.sel_bg, "red");
        assert!(loaded.catalog.is_empty());
    }

    #[test]
    fn overlong_setting_keeps_default() {
        let loaded = parse_str(r#"{"settings":{"app_fg":"a-very-long-colour-name"}},[]"#);
        assert_eq!(loaded.settings.app_fg, "cyan");
    }

    #[test]
    fn unknown_nav_mode_keeps_default() {
        let loaded = parse_str(r#"{"settings":{"nav_mode":"vim"}},[]"#);
        assert_eq!(loaded.settings.nav_mode, NavMode::Letters);
    }

    #[test]
    fn missing_settings_uses_defaults() {
        let loaded = parse_str(r#"[{"name":"A","alias":"a"}]"#);
        assert_eq!(loaded.settings, Settings::default());
        assert_eq!(loaded.catalog.len(), 1);
    }

    #[test]
    fn entry_without_alias_is_skipped() {
        let loaded = parse_str(
            r#"[{"name":"Broken"},{"name":"Good","alias":"true"},{"alias":"orphan"},{"name":"","alias":"x"}]"#,
        );
        assert_eq!(
            loaded.catalog.entries(),
            &[AppEntry::new("Good", "true", false)]
        );
    }

    #[test]
    fn enter_to_return_variants() {
        let loaded = parse_str(
            r#"[
              {"name":"a","alias":"a","entertoreturn":true},
              {"name":"b","alias":"b","entertoreturn":"true"},
              {"name":"c","alias":"c","entertoreturn":1},
              {"name":"d","alias":"d","entertoreturn":false},
              {"name":"e","alias":"e","entertoreturn":"0"}
            ]"#,
        );
        let flags: Vec<bool> = loaded.catalog.iter().map(|e| e.enter_to_return).collect();
        assert_eq!(flags, vec![true, true, true, false, false]);
    }

    #[test]
    fn long_fields_are_truncated() {
        let name = "n".repeat(200);
        let alias = "échо ".repeat(60);
        let text = format!(r#"[{{"name":"{name}","alias":"{alias}"}}]"#);
        let loaded = parse_str(&text);
        let entry = loaded.catalog.get(0).expect("entry");
        assert_eq!(entry.name.chars().count(), NAME_LIMIT);
        assert_eq!(entry.alias.chars().count(), ALIAS_LIMIT);
    }

    #[test]
    fn entry_bound_drops_extra_entries() {
        let text = format!(
            "[{}]",
            (0..10)
                .map(|i| format!(r#"{{"name":"app{i}","alias":"run{i}"}}"#))
                .collect::<Vec<_>>()
                .join(",")
        );
        let limits = Limits {
            max_entries: 4,
            ..Limits::default()
        };
        let loaded = parse(text.as_bytes(), &limits);
        assert_eq!(loaded.catalog.len(), 4);
        assert_eq!(loaded.catalog.get(3).map(|e| e.name.as_str()), Some("app3"));
    }

    #[test]
    fn brackets_and_escapes_inside_strings() {
        let loaded = parse_str(
            r#"[{"name":"Check [x]","alias":"[ -f \"/tmp/x\" ] && echo }"},{"name":"Next","alias":"ls"}]"#,
        );
        assert_eq!(loaded.catalog.len(), 2);
        let first = loaded.catalog.get(0).expect("entry");
        assert_eq!(first.name, "Check [x]");
        assert_eq!(first.alias, r#"[ -f "/tmp/x" ] && echo }"#);
    }

    #[test]
    fn nested_values_and_unknown_keys_are_ignored() {
        let loaded = parse_str(
            r#"[{"icon":{"glyph":"x","alias":"nope"},"tags":["a","b"],"name":"A","alias":"a","extra":42}]"#,
        );
        assert_eq!(loaded.catalog.entries(), &[AppEntry::new("A", "a", false)]);
    }

    #[test]
    fn comments_and_whitespace_are_tolerated() {
        let loaded = parse_str(
            "// launcher list\n[\n  // editors\n  { \"name\" :   \"  Vim \" ,\n \"alias\": \"vim\" }\n]\n",
        );
        assert_eq!(loaded.catalog.entries(), &[AppEntry::new("Vim", "vim", false)]);
    }

    #[test]
    fn missing_array_yields_empty_catalog() {
        let loaded = parse_str(r#"{"settings":{"nav_mode":"function_keys"}}"#);
        assert!(loaded.catalog.is_empty());
        assert_eq!(loaded.settings.nav_mode, NavMode::FunctionKeys);
    }

    #[test]
    fn unclosed_array_keeps_complete_entries() {
        let loaded = parse_str(r#"[{"name":"A","alias":"a"},{"name":"B","alias":"b"#);
        assert_eq!(loaded.catalog.entries(), &[AppEntry::new("A", "a", false)]);
    }

    const LIST_BEHIND_NESTED_ARRAY: &str = "{\"settings\":{\"nav_mode\":\"letters\",\"favorites\":[\"A\"]}},\n[{\"name\":\"A\",\"alias\":\"echo a\"},{\"name\":\"B\",\"alias\":\"echo b\"}]";

    #[test]
    fn array_inside_settings_is_not_the_app_list() {
        let loaded = parse_str(LIST_BEHIND_NESTED_ARRAY);
        assert_eq!(
            loaded.catalog.entries(),
            &[
                AppEntry::new("A", "echo a", false),
                AppEntry::new("B", "echo b", false)
            ]
        );
        assert_eq!(loaded.settings.nav_mode, NavMode::Letters);
    }

    #[test]
    fn array_only_inside_settings_counts_as_missing() {
        let loaded = parse_str(r#"{"settings":{"nav_mode":"letters","favorites":["A"]}}"#);
        assert!(loaded.catalog.is_empty());
    }

    #[test]
    fn save_replaces_settings_holding_an_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-list.txt");
        fs::write(&path, LIST_BEHIND_NESTED_ARRAY).unwrap();

        let settings = Settings {
            nav_mode: NavMode::FunctionKeys,
            ..Settings::default()
        };
        save(&path, &settings).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let expected = format!(
            "{}{}",
            settings_header(&settings).unwrap(),
            "[{\"name\":\"A\",\"alias\":\"echo a\"},{\"name\":\"B\",\"alias\":\"echo b\"}]"
        );
        assert_eq!(written, expected);
        assert!(!written.contains("favorites"));

        let reloaded = load(&path).unwrap();
        assert_eq!(reloaded.settings, settings);
        assert_eq!(reloaded.catalog.len(), 2);
    }

    #[test]
    fn header_matches_on_disk_format() {
        let header = settings_header(&Settings::default()).unwrap();
        assert_eq!(
            header,
            "{\"settings\":{\"nav_mode\":\"letters\",\"app_fg\":\"cyan\",\"app_bg\":\"black\",\"sel_fg\":\"black\",\"sel_bg\":\"yellow\"}},\n"
        );
    }

    #[test]
    fn save_rewrites_header_and_keeps_entries_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-list.txt");
        let original = "{\"settings\":{\"nav_mode\":\"letters\"}},\n[\n  {\"name\": \"A\",   \"alias\": \"echo a\", \"note\": \"kept\"} // comment\n]\n";
        fs::write(&path, original).unwrap();

        let settings = Settings {
            nav_mode: NavMode::FunctionKeys,
            ..Settings::default()
        };
        save(&path, &settings).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let array = &original[original.find('[').unwrap()..];
        assert!(written.ends_with(array));
        assert!(written.starts_with("{\"settings\":{\"nav_mode\":\"function_keys\""));

        let reloaded = load(&path).unwrap();
        assert_eq!(reloaded.settings, settings);
        assert_eq!(reloaded.catalog.entries(), &[AppEntry::new("A", "echo a", false)]);
    }

    #[test]
    fn repeated_saves_are_stable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-list.txt");
        fs::write(&path, SAMPLE).unwrap();
        let settings = Settings::default();
        save(&path, &settings).unwrap();
        let first = fs::read(&path).unwrap();
        save(&path, &settings).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn save_without_array_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-list.txt");
        let original = r#"{"settings":{"nav_mode":"letters"}}"#;
        fs::write(&path, original).unwrap();

        let err = save(&path, &Settings::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn save_to_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = save(&dir.path().join("absent.txt"), &Settings::default()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn load_reads_only_the_buffer_bound() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-list.txt");
        let text = r#"[{"name":"A","alias":"a"},{"name":"B","alias":"b"}]"#;
        fs::write(&path, text).unwrap();
        let cut = text.find(",{").unwrap() + 1;
        let limits = Limits {
            max_bytes: cut,
            ..Limits::default()
        };
        let loaded = load_with(&path, &limits).unwrap();
        assert_eq!(loaded.catalog.entries(), &[AppEntry::new("A", "a", false)]);
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mode = NavMode::Letters;
        assert_eq!(mode.toggled(), NavMode::FunctionKeys);
        assert_eq!(mode.toggled().toggled(), mode);
    }
}
