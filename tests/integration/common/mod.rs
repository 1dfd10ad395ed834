#![allow(dead_code)]

use flowlint::analysis::{
    analyze_block, apply_edit, materialize_fix, BlockContext, Violation,
};
use flowlint::config::RuleConfig;
use flowlint::lexer::Comment;
use flowlint::parser::ast::Program;
use flowlint::parser::parse_source;

/// A parsed fixture plus everything needed to build block contexts.
pub struct Parsed {
    pub source: String,
    pub program: Program,
    pub comments: Vec<Comment>,
    pub config: RuleConfig,
}

pub fn parse(source: &str) -> Parsed {
    let (program, comments) = parse_source(source).expect("fixture should parse");
    Parsed {
        source: source.to_string(),
        program,
        comments,
        config: RuleConfig::default(),
    }
}

pub fn parse_with_config(source: &str, config: RuleConfig) -> Parsed {
    let mut parsed = parse(source);
    parsed.config = config;
    parsed
}

impl Parsed {
    /// Context for the top-level program block.
    pub fn top_block(&self) -> BlockContext<'_> {
        BlockContext {
            source: &self.source,
            stmts: &self.program.body,
            comments: &self.comments,
            span: self.program.span,
            braced: false,
            config: &self.config,
        }
    }

    pub fn analyze(&self) -> Vec<Violation> {
        analyze_block(&self.top_block())
    }

    pub fn apply(&self, violation: &Violation) -> String {
        let edit = materialize_fix(&self.top_block(), violation)
            .expect("violation should have a fix");
        apply_edit(&self.source, &edit)
    }
}

/// Analyze the top-level block of a fixture with the default config.
pub fn analyze_top(source: &str) -> Vec<Violation> {
    parse(source).analyze()
}

/// Apply the first reported violation's fix.
pub fn apply_first_fix(source: &str) -> String {
    let parsed = parse(source);
    let violations = parsed.analyze();
    let violation = violations.first().expect("expected a violation");
    parsed.apply(violation)
}
