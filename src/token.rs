//! HTML tokenizer
//!
//! Splits HTML into a flat sequence of indivisible tokens. The markup is
//! treated as opaque: nesting and balance are never validated, which keeps
//! the two token streams of a diff flat and cheap to align.
//!
//! # Classification
//!
//! Scanned left to right, first rule that applies wins:
//!
//! 1. a whole `<video>…</video>` or `<picture>…</picture>` subtree
//! 2. a tag, from `<` to the next `>`
//! 3. a maximal run of ASCII word characters (`[A-Za-z0-9_]`)
//! 4. a maximal run of whitespace
//! 5. exactly one other character (punctuation, CJK, a stray `<`, ...)
//!
//! Rule 5 accepts anything, so tokenization never fails, and concatenating
//! the tokens gives back the input byte for byte.
//!
//! ```
//! use html_token_diff::tokenize;
//!
//! let tokens = tokenize("<a> Hello World </a>");
//! assert_eq!(tokens, ["<a>", " ", "Hello", " ", "World", " ", "</a>"]);
//! ```

use std::fmt;

use rustc_hash::FxHashMap;

/// Elements captured whole, including all descendants.
const ATOMIC_SUBTREES: [&str; 2] = ["video", "picture"];

// =============================================================================
// Tokenizer
// =============================================================================

/// Split `html` into tokens borrowed from the input.
pub fn tokenize(html: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < html.len() {
        let len = next_token_len(&html[pos..]);
        tokens.push(&html[pos..pos + len]);
        pos += len;
    }
    tokens
}

/// Byte length of the token at the start of `rest` (non-empty).
fn next_token_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    match bytes[0] {
        b'<' => atomic_subtree_len(rest)
            .or_else(|| tag_len(rest))
            .unwrap_or(1),
        b if is_word_byte(b) => bytes.iter().take_while(|b| is_word_byte(**b)).count(),
        _ => {
            let ws: usize = rest
                .chars()
                .take_while(|c| c.is_whitespace())
                .map(char::len_utf8)
                .sum();
            if ws > 0 {
                ws
            } else {
                rest.chars().next().map_or(1, char::len_utf8)
            }
        }
    }
}

#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// `<` followed by at least one non-`>` character and a closing `>`.
fn tag_len(rest: &str) -> Option<usize> {
    let close = rest.as_bytes().iter().position(|&b| b == b'>')?;
    (close >= 2).then_some(close + 1)
}

/// Length of a whole video/picture element starting at `rest`.
///
/// Returns `None` when `rest` does not open one of those elements, or when
/// no closing tag follows; the opening tag is then an ordinary tag.
fn atomic_subtree_len(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix('<')?;
    for name in ATOMIC_SUBTREES {
        let Some(after_name) = body.strip_prefix(name) else {
            continue;
        };
        if !after_name.starts_with(is_name_boundary) {
            continue;
        }
        let open_end = 1 + name.len() + after_name.find('>')? + 1;
        let closing = format!("</{name}>");
        let close_at = rest[open_end..].find(closing.as_str())?;
        return Some(open_end + close_at + closing.len());
    }
    None
}

#[inline]
fn is_name_boundary(c: char) -> bool {
    c.is_whitespace() || c == '>' || c == '/'
}

// =============================================================================
// Token classification
// =============================================================================

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A whole video/picture element
    AtomicSubtree,
    /// A single tag (opening, closing, self-closing, comment, doctype)
    Tag,
    /// A run of ASCII word characters
    Word,
    /// A run of whitespace
    Whitespace,
    /// Any other single character
    Other,
}

impl TokenKind {
    /// Classify a token produced by [`tokenize`].
    pub fn of(token: &str) -> Self {
        if is_atomic_subtree(token) {
            Self::AtomicSubtree
        } else if is_tag(token) {
            Self::Tag
        } else if !token.is_empty() && token.bytes().all(is_word_byte) {
            Self::Word
        } else if !token.is_empty() && token.chars().all(char::is_whitespace) {
            Self::Whitespace
        } else {
            Self::Other
        }
    }
}

/// Whether the token is markup: it starts with a complete tag.
///
/// Whole video/picture subtrees count as markup too.
#[inline]
pub fn is_tag(token: &str) -> bool {
    token.starts_with('<') && tag_len(token).is_some()
}

/// Whether the token is a whole video/picture subtree.
#[inline]
pub fn is_atomic_subtree(token: &str) -> bool {
    atomic_subtree_len(token) == Some(token.len())
}

/// Whether the token is a single `<img ...>` tag.
pub fn is_image(token: &str) -> bool {
    single_tag_body(token)
        .and_then(|body| body.strip_prefix("img"))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(is_name_boundary))
}

/// Whether the token is never split apart when decorated.
#[inline]
pub fn is_atomic(token: &str) -> bool {
    is_image(token) || is_atomic_subtree(token)
}

/// Text between `<` and `>` when the token is exactly one tag.
fn single_tag_body(token: &str) -> Option<&str> {
    let body = token.strip_prefix('<')?.strip_suffix('>')?;
    (!body.contains('>')).then_some(body)
}

/// Name and direction of a single tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo<'a> {
    /// Everything up to the first whitespace (`br/` for `<br/>`)
    pub name: &'a str,
    /// Closing tag (`</p>`)
    pub is_end: bool,
}

impl<'a> TagInfo<'a> {
    /// Parse a single tag token; `None` for text or multi-tag tokens.
    pub fn parse(token: &'a str) -> Option<Self> {
        let body = single_tag_body(token)?;
        if let Some(rest) = body.strip_prefix('/') {
            let name = leading_name(rest, |c| c.is_whitespace());
            if !name.is_empty() {
                return Some(Self { name, is_end: true });
            }
        }
        let name = leading_name(body, |c| c.is_whitespace());
        (!name.is_empty()).then_some(Self {
            name,
            is_end: false,
        })
    }

    /// Whether two tags would pair up structurally.
    #[inline]
    pub fn same_tag(&self, other: &TagInfo<'_>) -> bool {
        self.name == other.name && self.is_end == other.is_end
    }
}

fn leading_name(s: &str, stop: impl Fn(char) -> bool) -> &str {
    let end = s.find(stop).unwrap_or(s.len());
    &s[..end]
}

/// Byte offset just past the element name of an opening tag.
///
/// Comments, doctypes and processing instructions are not opening tags.
pub(crate) fn start_tag_name_end(token: &str) -> Option<usize> {
    let body = single_tag_body(token)?;
    let name = leading_name(body, |c| c.is_whitespace() || c == '/');
    // `<!DOCTYPE>`, `<!-- -->` and `<?xml ?>` are left unnumbered in both panes.
    if name.is_empty() || name.starts_with(['!', '?']) {
        return None;
    }
    Some(1 + name.len())
}

// =============================================================================
// Interning
// =============================================================================

/// Dense integer id of a distinct token text.
///
/// Equal ids mean byte-identical tokens within one [`Interner`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u32);

impl TokenId {
    /// Get the raw id
    #[inline]
    pub const fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self.0)
    }
}

/// Maps token text to [`TokenId`]s shared by both sides of a diff.
#[derive(Debug, Default)]
pub struct Interner<'a> {
    ids: FxHashMap<&'a str, TokenId>,
}

impl<'a> Interner<'a> {
    /// Create an empty interner
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `token`, allocating a new one on first sight.
    pub fn intern(&mut self, token: &'a str) -> TokenId {
        let next = TokenId(self.ids.len() as u32);
        *self.ids.entry(token).or_insert(next)
    }

    /// Number of distinct tokens seen
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if nothing was interned
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A tokenized document: token texts plus their interned ids.
#[derive(Debug, Clone, Default)]
pub struct TokenStream<'a> {
    tokens: Vec<&'a str>,
    ids: Vec<TokenId>,
}

impl<'a> TokenStream<'a> {
    /// Tokenize `html`, interning every token.
    pub fn new(html: &'a str, interner: &mut Interner<'a>) -> Self {
        let tokens = tokenize(html);
        let ids = tokens.iter().map(|t| interner.intern(t)).collect();
        Self { tokens, ids }
    }

    /// Token texts in document order
    #[inline]
    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    /// Interned ids, parallel to [`tokens`](Self::tokens)
    #[inline]
    pub fn ids(&self) -> &[TokenId] {
        &self.ids
    }

    /// Number of tokens
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the document produced no tokens
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        assert_eq!(
            tokenize("<p class=\"x\">Hi, there</p>"),
            ["<p class=\"x\">", "Hi", ",", " ", "there", "</p>"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_cjk_split_per_character() {
        assert_eq!(tokenize("夜已深 ok"), ["夜", "已", "深", " ", "ok"]);
    }

    #[test]
    fn test_whitespace_run_is_one_token() {
        assert_eq!(tokenize("a \n\t b"), ["a", " \n\t ", "b"]);
    }

    #[test]
    fn test_video_subtree_is_one_token() {
        let html = "<p>x</p><video controls>\n<source src=\"a.mp4\"></video>!";
        assert_eq!(
            tokenize(html),
            [
                "<p>",
                "x",
                "</p>",
                "<video controls>\n<source src=\"a.mp4\"></video>",
                "!"
            ]
        );
    }

    #[test]
    fn test_picture_subtree_is_one_token() {
        let html = "<picture><source srcset=\"a.webp\"><img src=\"a.jpg\"></picture>";
        assert_eq!(tokenize(html), [html]);
    }

    #[test]
    fn test_subtree_is_lazy() {
        let html = "<video>a</video> <video>b</video>";
        assert_eq!(tokenize(html), ["<video>a</video>", " ", "<video>b</video>"]);
    }

    #[test]
    fn test_unclosed_video_falls_back_to_tag() {
        assert_eq!(tokenize("<video src=a>x"), ["<video src=a>", "x"]);
    }

    #[test]
    fn test_similar_name_is_plain_tag() {
        assert_eq!(tokenize("<videos></video>"), ["<videos>", "</video>"]);
    }

    #[test]
    fn test_stray_angle_brackets() {
        assert_eq!(tokenize("a < b"), ["a", " ", "<", " ", "b"]);
        assert_eq!(tokenize("a > b"), ["a", " ", ">", " ", "b"]);
        assert_eq!(tokenize("<>"), ["<", ">"]);
        assert_eq!(tokenize("x<y"), ["x", "<", "y"]);
    }

    #[test]
    fn test_tag_spans_lines() {
        assert_eq!(tokenize("<a\nhref=\"/\">"), ["<a\nhref=\"/\">"]);
    }

    #[test]
    fn test_token_kind() {
        assert_eq!(TokenKind::of("<div>"), TokenKind::Tag);
        assert_eq!(TokenKind::of("<video></video>"), TokenKind::AtomicSubtree);
        assert_eq!(TokenKind::of("abc_1"), TokenKind::Word);
        assert_eq!(TokenKind::of(" \n"), TokenKind::Whitespace);
        assert_eq!(TokenKind::of("，"), TokenKind::Other);
        assert_eq!(TokenKind::of("<"), TokenKind::Other);
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("<img src=\"a.jpg\">"));
        assert!(is_image("<img/>"));
        assert!(is_image("<img>"));
        assert!(!is_image("<imgs>"));
        assert!(!is_image("</img>"));
        assert!(!is_image("<p>"));
    }

    #[test]
    fn test_is_atomic() {
        assert!(is_atomic("<img src=\"a.jpg\">"));
        assert!(is_atomic("<video src=\"a\"></video>"));
        assert!(!is_atomic("<video src=\"a\">"));
        assert!(!is_atomic("text"));
    }

    #[test]
    fn test_tag_info_parse() {
        assert_eq!(
            TagInfo::parse("<p class=\"a\">"),
            Some(TagInfo { name: "p", is_end: false })
        );
        assert_eq!(TagInfo::parse("</p>"), Some(TagInfo { name: "p", is_end: true }));
        assert_eq!(TagInfo::parse("<br/>"), Some(TagInfo { name: "br/", is_end: false }));
        assert_eq!(TagInfo::parse("hello"), None);
        assert_eq!(TagInfo::parse("<video></video>"), None);
        assert_eq!(TagInfo::parse("< p>"), None);
    }

    #[test]
    fn test_start_tag_name_end() {
        assert_eq!(start_tag_name_end("<div class=\"a\">"), Some(4));
        assert_eq!(start_tag_name_end("<br/>"), Some(3));
        assert_eq!(start_tag_name_end("</div>"), None);
        assert_eq!(start_tag_name_end("<!-- note -->"), None);
        assert_eq!(start_tag_name_end("<!DOCTYPE html>"), None);
        assert_eq!(start_tag_name_end("<?xml version=\"1.0\"?>"), None);
        assert_eq!(start_tag_name_end("<video></video>"), None);
    }

    #[test]
    fn test_interner_shares_ids() {
        let mut interner = Interner::new();
        let old = TokenStream::new("<p>a b</p>", &mut interner);
        let new = TokenStream::new("<p>b a</p>", &mut interner);
        assert_eq!(old.ids()[0], new.ids()[0]);
        assert_eq!(old.ids()[1], new.ids()[3]);
        assert_ne!(old.ids()[1], old.ids()[3]);
        // "<p>", "a", " ", "b", "</p>"
        assert_eq!(interner.len(), 5);
    }
}
