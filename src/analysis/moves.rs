//! Move execution: turn a planned relocation into a minimal text splice.
//!
//! A statement travels inside its "envelope": from the start of its earliest
//! leading comment to the start of the next statement's envelope (or the end
//! of the container). Comments between two statements belong to the later
//! one's envelope, so no comment is ever claimed twice. The splice replaces
//! one contiguous range and leaves every byte outside it untouched.

use serde::Serialize;

use crate::span::Span;
use super::BlockContext;

/// A single contiguous byte-range replacement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextEdit {
    pub span: Span,
    pub text: String,
}

/// Compute the splice that moves statement `from` to position `to`.
pub fn plan_move(ctx: &BlockContext<'_>, from: usize, to: usize) -> TextEdit {
    let text = ctx.source;
    if to < from {
        let segment_start = envelope_start(ctx, to);
        let moving_start = envelope_start(ctx, from);
        let segment_end = next_envelope_start(ctx, from);
        let before = &text[segment_start..moving_start];
        let moving = text[moving_start..segment_end].trim_end_matches([' ', '\t']);
        TextEdit {
            span: Span::new(segment_start, segment_end),
            text: format!("{moving}{before}"),
        }
    } else {
        let segment_start = envelope_start(ctx, from);
        let moving_end = next_envelope_start(ctx, from);
        let segment_end = envelope_start(ctx, to);
        let moving = text[segment_start..moving_end].trim_end_matches([' ', '\t']);
        let between = &text[moving_end..segment_end];
        TextEdit {
            span: Span::new(segment_start, segment_end),
            text: format!("{between}{moving}"),
        }
    }
}

/// Apply an edit as a straight text replacement.
pub fn apply_edit(source: &str, edit: &TextEdit) -> String {
    let mut result = String::with_capacity(source.len() + edit.text.len());
    result.push_str(&source[..edit.span.start]);
    result.push_str(&edit.text);
    result.push_str(&source[edit.span.end..]);
    result
}

/// Start of the statement's envelope: its earliest leading comment (any
/// comment strictly between the previous statement and this one), extended
/// over the line's indentation so relocated statements keep their column.
fn envelope_start(ctx: &BlockContext<'_>, index: usize) -> usize {
    let stmt_start = ctx.stmts[index].span.start;
    let lower = if index == 0 {
        content_start(ctx)
    } else {
        ctx.stmts[index - 1].span.end
    };
    let base = ctx.comments
        .iter()
        .filter(|c| c.span.start >= lower && c.span.end <= stmt_start)
        .map(|c| c.span.start)
        .min()
        .unwrap_or(stmt_start);

    // Pull in leading indentation, but only when nothing except whitespace
    // precedes the envelope on its line.
    let bytes = ctx.source.as_bytes();
    let mut start = base;
    while start > lower && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    if start == lower || bytes[start - 1] == b'\n' {
        start
    } else {
        base
    }
}

/// Where the envelope after `index` begins: the next statement's envelope, or
/// the container end clamped before a closing brace.
fn next_envelope_start(ctx: &BlockContext<'_>, index: usize) -> usize {
    if index + 1 < ctx.stmts.len() {
        envelope_start(ctx, index + 1)
    } else {
        let closing = if ctx.braced { 1 } else { 0 };
        ctx.span.end.saturating_sub(closing).max(ctx.stmts[index].span.end)
    }
}

fn content_start(ctx: &BlockContext<'_>) -> usize {
    if ctx.braced {
        ctx.span.start + 1
    } else {
        ctx.span.start
    }
}
