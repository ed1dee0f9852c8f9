//! Diff-aware HTML rendering
//!
//! Turns an edit script plus the two token sequences back into HTML.
//!
//! # Decoration
//!
//! Changed tokens are wrapped so a stylesheet can highlight them:
//!
//! | Tokens | Wrapper |
//! |--------|---------|
//! | `<img>` tag | `<span class="{inline}">…</span>` |
//! | whole `<video>`/`<picture>` | `<div class="{block}">…</div>` |
//! | run of text between tags | `<span class="{text}">…</span>`, dropped if only whitespace |
//! | any other tag | emitted as is |
//!
//! Deleted inline and block wrappers also carry a close marker
//! (`<span class="html-diff-close-icon"></span>`).
//!
//! # Views
//!
//! - **Unified**: one document. Replaced ranges are reconciled so that tags
//!   present on both sides are emitted once, undecorated.
//! - **Side-by-side**: two documents. Opening tags in unchanged runs get a
//!   sequence attribute (`data-seq="1"`, `"2"`, …) shared by both panes, which
//!   lets a viewer synchronize scrolling.

use compact_str::CompactString;
use smallvec::SmallVec;
use tracing::error;

use crate::algo::{OpKind, Operation};
use crate::error::{DiffError, DiffResult};
use crate::token::{is_atomic, is_atomic_subtree, is_image, is_tag, start_tag_name_end, TagInfo};

/// Default attribute carrying scroll-sync sequence numbers.
pub const DEFAULT_SEQ_ATTR: &str = "data-seq";

/// Marker appended inside deleted inline and block wrappers.
pub const CLOSE_ICON: &str = "<span class=\"html-diff-close-icon\"></span>";

/// Token buffer used while reconciling replaced ranges.
type Pending<'a> = SmallVec<[&'a str; 16]>;

// =============================================================================
// RenderConfig
// =============================================================================

/// Which side of a change is being decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Content only in the new document
    Create,
    /// Content only in the old document
    Delete,
}

/// Decoration class names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    pub create_text: CompactString,
    pub delete_text: CompactString,
    pub create_inline: CompactString,
    pub delete_inline: CompactString,
    pub create_block: CompactString,
    pub delete_block: CompactString,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            create_text: CompactString::const_new("html-diff-create-text-wrapper"),
            delete_text: CompactString::const_new("html-diff-delete-text-wrapper"),
            create_inline: CompactString::const_new("html-diff-create-inline-wrapper"),
            delete_inline: CompactString::const_new("html-diff-delete-inline-wrapper"),
            create_block: CompactString::const_new("html-diff-create-block-wrapper"),
            delete_block: CompactString::const_new("html-diff-delete-block-wrapper"),
        }
    }
}

impl ClassNames {
    /// Set the class for created text.
    pub fn with_create_text(mut self, class: impl Into<CompactString>) -> Self {
        self.create_text = class.into();
        self
    }

    /// Set the class for deleted text.
    pub fn with_delete_text(mut self, class: impl Into<CompactString>) -> Self {
        self.delete_text = class.into();
        self
    }

    /// Set the class for created images.
    pub fn with_create_inline(mut self, class: impl Into<CompactString>) -> Self {
        self.create_inline = class.into();
        self
    }

    /// Set the class for deleted images.
    pub fn with_delete_inline(mut self, class: impl Into<CompactString>) -> Self {
        self.delete_inline = class.into();
        self
    }

    /// Set the class for created video/picture blocks.
    pub fn with_create_block(mut self, class: impl Into<CompactString>) -> Self {
        self.create_block = class.into();
        self
    }

    /// Set the class for deleted video/picture blocks.
    pub fn with_delete_block(mut self, class: impl Into<CompactString>) -> Self {
        self.delete_block = class.into();
        self
    }

    fn text(&self, change: Change) -> &str {
        match change {
            Change::Create => &self.create_text,
            Change::Delete => &self.delete_text,
        }
    }

    fn inline(&self, change: Change) -> &str {
        match change {
            Change::Create => &self.create_inline,
            Change::Delete => &self.delete_inline,
        }
    }

    fn block(&self, change: Change) -> &str {
        match change {
            Change::Create => &self.create_block,
            Change::Delete => &self.delete_block,
        }
    }

    /// Reject names that would break out of a quoted attribute.
    pub fn validate(&self) -> DiffResult<()> {
        let slots = [
            ("createText", &self.create_text),
            ("deleteText", &self.delete_text),
            ("createInline", &self.create_inline),
            ("deleteInline", &self.delete_inline),
            ("createBlock", &self.create_block),
            ("deleteBlock", &self.delete_block),
        ];
        for (slot, value) in slots {
            check_name(slot, value)?;
        }
        Ok(())
    }
}

fn check_name(slot: &'static str, value: &str) -> DiffResult<()> {
    if value.is_empty() || value.contains(['"', '<', '>']) {
        return Err(DiffError::invalid_name(slot, value));
    }
    Ok(())
}

/// Configuration for HTML rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Decoration class names
    pub class_names: ClassNames,
    /// Attribute name for scroll-sync sequence numbers (default: "data-seq").
    pub seq_attr: CompactString,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            class_names: ClassNames::default(),
            seq_attr: CompactString::const_new(DEFAULT_SEQ_ATTR),
        }
    }
}

impl RenderConfig {
    /// Set decoration class names.
    pub fn with_class_names(mut self, class_names: ClassNames) -> Self {
        self.class_names = class_names;
        self
    }

    /// Set custom attribute name for sequence numbers.
    pub fn with_seq_attr(mut self, attr_name: impl Into<CompactString>) -> Self {
        self.seq_attr = attr_name.into();
        self
    }

    /// Validate class names and the sequence attribute name.
    pub fn validate(&self) -> DiffResult<()> {
        self.class_names.validate()?;
        if self.seq_attr.contains(char::is_whitespace) || self.seq_attr.contains('=') {
            return Err(DiffError::invalid_name("seqAttr", self.seq_attr.as_str()));
        }
        check_name("seqAttr", &self.seq_attr)
    }
}

// =============================================================================
// Decoration
// =============================================================================

/// Append `tokens` decorated as one change.
pub(crate) fn dress_up(change: Change, tokens: &[&str], classes: &ClassNames, out: &mut String) {
    let mut text_start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if !is_tag(token) {
            continue;
        }
        if i > text_start {
            dress_up_text(change, &tokens[text_start..i], classes, out);
        }
        text_start = i + 1;
        if is_atomic_subtree(token) {
            dress_up_block(change, token, classes, out);
        } else if is_image(token) {
            dress_up_inline(change, token, classes, out);
        } else {
            out.push_str(token);
        }
    }
    if text_start < tokens.len() {
        dress_up_text(change, &tokens[text_start..], classes, out);
    }
}

fn dress_up_text(change: Change, tokens: &[&str], classes: &ClassNames, out: &mut String) {
    if tokens.iter().all(|t| t.trim().is_empty()) {
        return;
    }
    open_wrapper(out, "span", classes.text(change));
    for token in tokens {
        out.push_str(token);
    }
    out.push_str("</span>");
}

fn dress_up_inline(change: Change, token: &str, classes: &ClassNames, out: &mut String) {
    open_wrapper(out, "span", classes.inline(change));
    out.push_str(token);
    if change == Change::Delete {
        out.push_str(CLOSE_ICON);
    }
    out.push_str("</span>");
}

fn dress_up_block(change: Change, token: &str, classes: &ClassNames, out: &mut String) {
    open_wrapper(out, "div", classes.block(change));
    out.push_str(token);
    if change == Change::Delete {
        out.push_str(CLOSE_ICON);
    }
    out.push_str("</div>");
}

#[inline]
fn open_wrapper(out: &mut String, tag: &str, class: &str) {
    out.push('<');
    out.push_str(tag);
    out.push_str(" class=\"");
    out.push_str(class);
    out.push_str("\">");
}

// =============================================================================
// Unified Rendering
// =============================================================================

/// Render the edit script as a single annotated document.
pub fn render_unified(old: &[&str], new: &[&str], ops: &[Operation], config: &RenderConfig) -> String {
    let classes = &config.class_names;
    let mut out = String::with_capacity(estimate_len(old, new));

    for op in ops {
        if !check_op(op, old.len(), new.len()) {
            continue;
        }
        match op.kind {
            OpKind::Equal => {
                for token in &new[op.new_range()] {
                    out.push_str(token);
                }
            }
            OpKind::Delete => dress_up(Change::Delete, &old[op.old_range()], classes, &mut out),
            OpKind::Create => dress_up(Change::Create, &new[op.new_range()], classes, &mut out),
            OpKind::Replace => {
                render_replace(&old[op.old_range()], &new[op.new_range()], classes, &mut out)
            }
        }
    }
    out
}

/// Merge a replaced range so tags surviving on both sides appear once.
///
/// Old tokens are walked left to right. Text collects into a pending
/// deletion. At each old tag the deletion is flushed and the new side is
/// scanned from the cursor for a tag with the same name and direction:
/// everything skipped over is emitted as created, then the tag itself, bare.
fn render_replace(olds: &[&str], news: &[&str], classes: &ClassNames, out: &mut String) {
    // A lone tag on each side is an attribute change; show the new tag only.
    if let ([old], [new]) = (olds, news) {
        if is_tag(old) && is_tag(new) {
            out.push_str(new);
            return;
        }
    }

    let mut pending_delete: Pending<'_> = SmallVec::new();
    let mut pending_create: Pending<'_> = SmallVec::new();
    let mut create_index = 0;

    for &old in olds {
        // Images and video/picture blocks stay in the deletion as a unit.
        let old_tag = match TagInfo::parse(old) {
            Some(tag) if !is_atomic(old) => tag,
            _ => {
                pending_delete.push(old);
                continue;
            }
        };

        dress_up(Change::Delete, &pending_delete, classes, out);
        pending_delete.clear();

        let mut found = false;
        for (offset, &new) in news[create_index..].iter().enumerate() {
            if TagInfo::parse(new).is_some_and(|tag| tag.same_tag(&old_tag)) {
                found = true;
                dress_up(Change::Create, &pending_create, classes, out);
                out.push_str(new);
                pending_create.clear();
                create_index += offset + 1;
                break;
            }
            pending_create.push(new);
        }
        if !found {
            // The scanned new tokens are dropped from the buffer; the cursor
            // does not move, so later scans see them again.
            out.push_str(old);
            pending_create.clear();
        }
    }

    pending_create.extend_from_slice(&news[create_index..]);
    dress_up(Change::Delete, &pending_delete, classes, out);
    dress_up(Change::Create, &pending_create, classes, out);
}

// =============================================================================
// Side-by-side Rendering
// =============================================================================

/// Render the edit script as an `(old, new)` pair of documents.
pub fn render_side_by_side(
    old: &[&str],
    new: &[&str],
    ops: &[Operation],
    config: &RenderConfig,
) -> (String, String) {
    let classes = &config.class_names;
    let mut old_html = String::with_capacity(estimate_len(old, &[]));
    let mut new_html = String::with_capacity(estimate_len(&[], new));
    let mut equal_html = String::new();
    let mut sequence: u64 = 0;

    for op in ops {
        if !check_op(op, old.len(), new.len()) {
            continue;
        }
        match op.kind {
            OpKind::Equal => {
                equal_html.clear();
                for token in &new[op.new_range()] {
                    push_with_seq(token, &config.seq_attr, &mut sequence, &mut equal_html);
                }
                old_html.push_str(&equal_html);
                new_html.push_str(&equal_html);
            }
            OpKind::Delete => dress_up(Change::Delete, &old[op.old_range()], classes, &mut old_html),
            OpKind::Create => dress_up(Change::Create, &new[op.new_range()], classes, &mut new_html),
            OpKind::Replace => {
                dress_up(Change::Delete, &old[op.old_range()], classes, &mut old_html);
                dress_up(Change::Create, &new[op.new_range()], classes, &mut new_html);
            }
        }
    }
    (old_html, new_html)
}

/// Append `token`, numbering it right after the tag name if it opens an element.
fn push_with_seq(token: &str, attr: &str, sequence: &mut u64, out: &mut String) {
    let Some(name_end) = start_tag_name_end(token) else {
        out.push_str(token);
        return;
    };
    *sequence += 1;
    out.push_str(&token[..name_end]);
    out.push(' ');
    out.push_str(attr);
    out.push_str("=\"");
    out.push_str(&sequence.to_string());
    out.push('"');
    out.push_str(&token[name_end..]);
}

// =============================================================================
// Helpers
// =============================================================================

/// Log and reject operations that do not fit the token sequences.
fn check_op(op: &Operation, old_len: usize, new_len: usize) -> bool {
    let consistent = op.is_consistent(old_len, new_len);
    if !consistent {
        error!(
            kind = op.kind.as_str(),
            old = ?op.old_range(),
            new = ?op.new_range(),
            old_len,
            new_len,
            "inconsistent operation skipped"
        );
    }
    debug_assert!(consistent, "inconsistent operation: {op:?}");
    consistent
}

fn estimate_len(old: &[&str], new: &[&str]) -> usize {
    let len: usize = old.iter().chain(new).map(|t| t.len()).sum();
    len + len / 4
}

// =============================================================================
// Tests
// =============================================================================
