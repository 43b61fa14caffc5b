//! Fixed enumerations of PHP punctuators and keywords.
//!
//! Analyzers compare token text against these instead of spelling
//! operators out as string literals.

/// A fixed token value that can be compared against token text.
pub trait TokenValue {
    /// Exact source spelling.
    fn value(&self) -> &'static str;

    /// Whether `text` spells this value.
    fn matches(&self, text: &str) -> bool {
        text == self.value()
    }
}

/// PHP operators and delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punctuator {
    /// `?->`
    NullsafeArrow,
    /// `<=>`
    Spaceship,
    /// `**=`
    StarStarEqual,
    /// `...`
    Ellipsis,
    /// `<<=`
    ShiftLeftEqual,
    /// `>>=`
    ShiftRightEqual,
    /// `===`
    StrictEqual,
    /// `!==`
    StrictNotEqual,
    /// `??=`
    CoalesceEqual,
    /// `**`
    StarStar,
    /// `++`
    Increment,
    /// `--`
    Decrement,
    /// `->`
    Arrow,
    /// `=>`
    DoubleArrow,
    /// `::`
    DoubleColon,
    /// `==`
    EqualEqual,
    /// `!=`
    NotEqual,
    /// `<>`
    LessGreater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `??`
    Coalesce,
    /// `+=`
    PlusEqual,
    /// `-=`
    MinusEqual,
    /// `*=`
    StarEqual,
    /// `/=`
    SlashEqual,
    /// `.=`
    DotEqual,
    /// `%=`
    PercentEqual,
    /// `&=`
    AmpersandEqual,
    /// `|=`
    PipeEqual,
    /// `^=`
    CaretEqual,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `#[`
    AttributeOpen,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `(`
    LParenthesis,
    /// `)`
    RParenthesis,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LCurlyBrace,
    /// `}`
    RCurlyBrace,
    /// `=`
    Equal,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `.`
    Dot,
    /// `!`
    Bang,
    /// `~`
    Tilde,
    /// `@`
    At,
    /// `?`
    Query,
    /// `:`
    Colon,
    /// `&`
    Ampersand,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `\`
    NsSeparator,
    /// `$`
    Dollar,
}

impl Punctuator {
    /// Every punctuator, longest spelling first so the lexer can do
    /// longest-match by scanning in order.
    pub const ALL: &'static [Self] = &[
        Self::NullsafeArrow,
        Self::Spaceship,
        Self::StarStarEqual,
        Self::Ellipsis,
        Self::ShiftLeftEqual,
        Self::ShiftRightEqual,
        Self::StrictEqual,
        Self::StrictNotEqual,
        Self::CoalesceEqual,
        Self::StarStar,
        Self::Increment,
        Self::Decrement,
        Self::Arrow,
        Self::DoubleArrow,
        Self::DoubleColon,
        Self::EqualEqual,
        Self::NotEqual,
        Self::LessGreater,
        Self::LessEqual,
        Self::GreaterEqual,
        Self::AndAnd,
        Self::OrOr,
        Self::Coalesce,
        Self::PlusEqual,
        Self::MinusEqual,
        Self::StarEqual,
        Self::SlashEqual,
        Self::DotEqual,
        Self::PercentEqual,
        Self::AmpersandEqual,
        Self::PipeEqual,
        Self::CaretEqual,
        Self::ShiftLeft,
        Self::ShiftRight,
        Self::AttributeOpen,
        Self::Semicolon,
        Self::Comma,
        Self::LParenthesis,
        Self::RParenthesis,
        Self::LBracket,
        Self::RBracket,
        Self::LCurlyBrace,
        Self::RCurlyBrace,
        Self::Equal,
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Slash,
        Self::Percent,
        Self::Dot,
        Self::Bang,
        Self::Tilde,
        Self::At,
        Self::Query,
        Self::Colon,
        Self::Ampersand,
        Self::Pipe,
        Self::Caret,
        Self::LessThan,
        Self::GreaterThan,
        Self::NsSeparator,
        Self::Dollar,
    ];
}

impl TokenValue for Punctuator {
    fn value(&self) -> &'static str {
        match self {
            Self::NullsafeArrow => "?->",
            Self::Spaceship => "<=>",
            Self::StarStarEqual => "**=",
            Self::Ellipsis => "...",
            Self::ShiftLeftEqual => "<<=",
            Self::ShiftRightEqual => ">>=",
            Self::StrictEqual => "===",
            Self::StrictNotEqual => "!==",
            Self::CoalesceEqual => "??=",
            Self::StarStar => "**",
            Self::Increment => "++",
            Self::Decrement => "--",
            Self::Arrow => "->",
            Self::DoubleArrow => "=>",
            Self::DoubleColon => "::",
            Self::EqualEqual => "==",
            Self::NotEqual => "!=",
            Self::LessGreater => "<>",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Coalesce => "??",
            Self::PlusEqual => "+=",
            Self::MinusEqual => "-=",
            Self::StarEqual => "*=",
            Self::SlashEqual => "/=",
            Self::DotEqual => ".=",
            Self::PercentEqual => "%=",
            Self::AmpersandEqual => "&=",
            Self::PipeEqual => "|=",
            Self::CaretEqual => "^=",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::AttributeOpen => "#[",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::LParenthesis => "(",
            Self::RParenthesis => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LCurlyBrace => "{",
            Self::RCurlyBrace => "}",
            Self::Equal => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Dot => ".",
            Self::Bang => "!",
            Self::Tilde => "~",
            Self::At => "@",
            Self::Query => "?",
            Self::Colon => ":",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::NsSeparator => "\\",
            Self::Dollar => "$",
        }
    }
}

/// PHP reserved words. Matched case-insensitively, like PHP does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Abstract,
    And,
    Array,
    As,
    Break,
    Callable,
    Case,
    Catch,
    Class,
    Clone,
    Const,
    Continue,
    Declare,
    Default,
    Die,
    Do,
    Echo,
    Else,
    Elseif,
    Empty,
    Enddeclare,
    Endfor,
    Endforeach,
    Endif,
    Endswitch,
    Endwhile,
    Enum,
    Exit,
    Extends,
    Final,
    Finally,
    Fn,
    For,
    Foreach,
    From,
    Function,
    Global,
    Goto,
    If,
    Implements,
    Include,
    IncludeOnce,
    Instanceof,
    Insteadof,
    Interface,
    Isset,
    List,
    Match,
    Namespace,
    New,
    Or,
    Print,
    Private,
    Protected,
    Public,
    Readonly,
    Require,
    RequireOnce,
    Return,
    Static,
    Switch,
    Throw,
    Trait,
    Try,
    Unset,
    Use,
    Var,
    While,
    Xor,
    Yield,
}

impl Keyword {
    pub const ALL: &'static [Self] = &[
        Self::Abstract,
        Self::And,
        Self::Array,
        Self::As,
        Self::Break,
        Self::Callable,
        Self::Case,
        Self::Catch,
        Self::Class,
        Self::Clone,
        Self::Const,
        Self::Continue,
        Self::Declare,
        Self::Default,
        Self::Die,
        Self::Do,
        Self::Echo,
        Self::Else,
        Self::Elseif,
        Self::Empty,
        Self::Enddeclare,
        Self::Endfor,
        Self::Endforeach,
        Self::Endif,
        Self::Endswitch,
        Self::Endwhile,
        Self::Enum,
        Self::Exit,
        Self::Extends,
        Self::Final,
        Self::Finally,
        Self::Fn,
        Self::For,
        Self::Foreach,
        Self::From,
        Self::Function,
        Self::Global,
        Self::Goto,
        Self::If,
        Self::Implements,
        Self::Include,
        Self::IncludeOnce,
        Self::Instanceof,
        Self::Insteadof,
        Self::Interface,
        Self::Isset,
        Self::List,
        Self::Match,
        Self::Namespace,
        Self::New,
        Self::Or,
        Self::Print,
        Self::Private,
        Self::Protected,
        Self::Public,
        Self::Readonly,
        Self::Require,
        Self::RequireOnce,
        Self::Return,
        Self::Static,
        Self::Switch,
        Self::Throw,
        Self::Trait,
        Self::Try,
        Self::Unset,
        Self::Use,
        Self::Var,
        Self::While,
        Self::Xor,
        Self::Yield,
    ];

    /// Look up the keyword spelled by `text`, ignoring ASCII case.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.matches(text))
    }
}

impl TokenValue for Keyword {
    fn value(&self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::And => "and",
            Self::Array => "array",
            Self::As => "as",
            Self::Break => "break",
            Self::Callable => "callable",
            Self::Case => "case",
            Self::Catch => "catch",
            Self::Class => "class",
            Self::Clone => "clone",
            Self::Const => "const",
            Self::Continue => "continue",
            Self::Declare => "declare",
            Self::Default => "default",
            Self::Die => "die",
            Self::Do => "do",
            Self::Echo => "echo",
            Self::Else => "else",
            Self::Elseif => "elseif",
            Self::Empty => "empty",
            Self::Enddeclare => "enddeclare",
            Self::Endfor => "endfor",
            Self::Endforeach => "endforeach",
            Self::Endif => "endif",
            Self::Endswitch => "endswitch",
            Self::Endwhile => "endwhile",
            Self::Enum => "enum",
            Self::Exit => "exit",
            Self::Extends => "extends",
            Self::Final => "final",
            Self::Finally => "finally",
            Self::Fn => "fn",
            Self::For => "for",
            Self::Foreach => "foreach",
            Self::From => "from",
            Self::Function => "function",
            Self::Global => "global",
            Self::Goto => "goto",
            Self::If => "if",
            Self::Implements => "implements",
            Self::Include => "include",
            Self::IncludeOnce => "include_once",
            Self::Instanceof => "instanceof",
            Self::Insteadof => "insteadof",
            Self::Interface => "interface",
            Self::Isset => "isset",
            Self::List => "list",
            Self::Match => "match",
            Self::Namespace => "namespace",
            Self::New => "new",
            Self::Or => "or",
            Self::Print => "print",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Public => "public",
            Self::Readonly => "readonly",
            Self::Require => "require",
            Self::RequireOnce => "require_once",
            Self::Return => "return",
            Self::Static => "static",
            Self::Switch => "switch",
            Self::Throw => "throw",
            Self::Trait => "trait",
            Self::Try => "try",
            Self::Unset => "unset",
            Self::Use => "use",
            Self::Var => "var",
            Self::While => "while",
            Self::Xor => "xor",
            Self::Yield => "yield",
        }
    }

    fn matches(&self, text: &str) -> bool {
        text.eq_ignore_ascii_case(self.value())
    }
}
