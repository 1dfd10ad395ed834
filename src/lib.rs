pub mod span;
pub mod diagnostics;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod analysis;

use analysis::{analyze_block, apply_edit, collect_blocks, materialize_fix, BlockContext, Violation};
use config::RuleConfig;
use diagnostics::LintError;

/// Upper bound on fix/re-analyze rounds. Each applied fix settles at least
/// one statement, so real inputs converge long before this.
const MAX_FIX_PASSES: usize = 64;

/// Analyze a whole source file: lex, parse, then run one ordering pass over
/// every lexical block independently (top level, braced blocks, function
/// bodies).
pub fn analyze_source(source: &str, config: &RuleConfig) -> Result<Vec<Violation>, LintError> {
    let (program, comments) = parser::parse_source(source)?;
    let mut violations = Vec::new();
    for block in collect_blocks(&program) {
        let ctx = BlockContext {
            source,
            stmts: block.stmts,
            comments: &comments,
            span: block.span,
            braced: block.braced,
            config,
        };
        violations.extend(analyze_block(&ctx));
    }
    violations.sort_by_key(|v| v.span.start);
    Ok(violations)
}

/// Apply fixes to a fixed point: one edit per round, re-analyzing the result,
/// until no fixable violation remains. Returns the fixed source and how many
/// edits were applied.
pub fn fix_source(source: &str, config: &RuleConfig) -> Result<(String, usize), LintError> {
    let mut current = source.to_string();
    let mut applied = 0;
    for _ in 0..MAX_FIX_PASSES {
        let edit = {
            let (program, comments) = parser::parse_source(&current)?;
            let mut found = None;
            'blocks: for block in collect_blocks(&program) {
                let ctx = BlockContext {
                    source: &current,
                    stmts: block.stmts,
                    comments: &comments,
                    span: block.span,
                    braced: block.braced,
                    config,
                };
                for violation in analyze_block(&ctx) {
                    if let Some(edit) = materialize_fix(&ctx, &violation) {
                        found = Some(edit);
                        break 'blocks;
                    }
                }
            }
            found
        };
        match edit {
            Some(edit) => {
                current = apply_edit(&current, &edit);
                applied += 1;
            }
            None => break,
        }
    }
    Ok((current, applied))
}
