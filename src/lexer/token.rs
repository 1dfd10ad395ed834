use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\u{feff}]+")]
pub enum Token {
    // Keywords
    #[token("var")]
    Var,
    #[token("let")]
    Let,
    #[token("const")]
    Const,
    #[token("function")]
    Function,
    #[token("class")]
    Class,
    #[token("extends")]
    Extends,
    #[token("static")]
    Static,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("of")]
    Of,
    #[token("in")]
    In,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("throw")]
    Throw,
    #[token("new")]
    New,
    #[token("delete")]
    Delete,
    #[token("typeof")]
    TypeOf,
    #[token("void")]
    Void,
    #[token("instanceof")]
    InstanceOf,
    #[token("this")]
    This,
    #[token("super")]
    Super,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("as")]
    As,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| {
        i64::from_str_radix(&lex.slice()[2..], 16).ok().map(|n| n as f64)
    })]
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    NumberLit(f64),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r#"'([^'\\\n]|\\.)*'"#, |lex| unescape(lex.slice()))]
    StringLit(String),

    // Raw template body, backticks stripped. `${...}` interpolation is split
    // apart by the parser, which re-lexes each hole at its source offset.
    #[regex(r"`([^`\\]|\\.)*`", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    TemplateLit(String),

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    // Comments are real tokens here: the analysis needs their exact ranges to
    // compute move envelopes. `lex()` diverts them into a side list.
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    // Punctuation
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?.")]
    QuestionDot,
    #[token("=>")]
    Arrow,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // Operators
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("===")]
    EqEqEq,
    #[token("!=")]
    BangEq,
    #[token("!==")]
    BangEqEq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&&=")]
    AmpAmpEq,
    #[token("||=")]
    PipePipeEq,
    #[token("??=")]
    QuestionQuestionEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token(">>>")]
    UShr,
    #[token("+")]
    Plus,
    #[token("++")]
    PlusPlus,
    #[token("-")]
    Minus,
    #[token("--")]
    MinusMinus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("??")]
    QuestionQuestion,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
}

fn unescape(quoted: &str) -> String {
    let raw = &quoted[1..quoted.len() - 1];
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('0') => result.push('\0'),
                Some(other) => result.push(other),
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }
    result
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Token::Var => "'var'",
            Token::Let => "'let'",
            Token::Const => "'const'",
            Token::Function => "'function'",
            Token::Class => "'class'",
            Token::Extends => "'extends'",
            Token::Static => "'static'",
            Token::Return => "'return'",
            Token::If => "'if'",
            Token::Else => "'else'",
            Token::While => "'while'",
            Token::For => "'for'",
            Token::Of => "'of'",
            Token::In => "'in'",
            Token::Break => "'break'",
            Token::Continue => "'continue'",
            Token::Try => "'try'",
            Token::Catch => "'catch'",
            Token::Finally => "'finally'",
            Token::Throw => "'throw'",
            Token::New => "'new'",
            Token::Delete => "'delete'",
            Token::TypeOf => "'typeof'",
            Token::Void => "'void'",
            Token::InstanceOf => "'instanceof'",
            Token::This => "'this'",
            Token::Super => "'super'",
            Token::True => "'true'",
            Token::False => "'false'",
            Token::Null => "'null'",
            Token::As => "'as'",
            Token::NumberLit(_) => "number literal",
            Token::StringLit(_) => "string literal",
            Token::TemplateLit(_) => "template literal",
            Token::Ident => "identifier",
            Token::LineComment | Token::BlockComment => "comment",
            Token::LBrace => "'{'",
            Token::RBrace => "'}'",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::Semi => "';'",
            Token::Comma => "','",
            Token::Dot => "'.'",
            Token::Ellipsis => "'...'",
            Token::QuestionDot => "'?.'",
            Token::Arrow => "'=>'",
            Token::Question => "'?'",
            Token::Colon => "':'",
            Token::Eq => "'='",
            Token::EqEq => "'=='",
            Token::EqEqEq => "'==='",
            Token::BangEq => "'!='",
            Token::BangEqEq => "'!=='",
            Token::PlusEq => "'+='",
            Token::MinusEq => "'-='",
            Token::StarEq => "'*='",
            Token::SlashEq => "'/='",
            Token::PercentEq => "'%='",
            Token::AmpAmpEq => "'&&='",
            Token::PipePipeEq => "'||='",
            Token::QuestionQuestionEq => "'??='",
            Token::Lt => "'<'",
            Token::LtEq => "'<='",
            Token::Gt => "'>'",
            Token::GtEq => "'>='",
            Token::Shl => "'<<'",
            Token::Shr => "'>>'",
            Token::UShr => "'>>>'",
            Token::Plus => "'+'",
            Token::PlusPlus => "'++'",
            Token::Minus => "'-'",
            Token::MinusMinus => "'--'",
            Token::Star => "'*'",
            Token::StarStar => "'**'",
            Token::Slash => "'/'",
            Token::Percent => "'%'",
            Token::Bang => "'!'",
            Token::Tilde => "'~'",
            Token::AmpAmp => "'&&'",
            Token::PipePipe => "'||'",
            Token::QuestionQuestion => "'??'",
            Token::Amp => "'&'",
            Token::Pipe => "'|'",
            Token::Caret => "'^'",
        };
        write!(f, "{s}")
    }
}
