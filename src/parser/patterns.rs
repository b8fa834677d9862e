//! Static pattern table driving the line parser.
//!
//! Each recognized construct is a (regex, kind) rule. Rules are kept in a
//! fixed order and the first matching single-line rule wins, so adding a new
//! construct is a one-line change here.

use lazy_static::lazy_static;
use regex::Regex;

use super::SymbolKind;

/// How a matched rule participates in block tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Pushes a frame on the open-block stack (detail mode).
    Opener,
    /// Emits a complete occurrence on the current line.
    Single,
    /// Attribute-list continuation, only valid after an attribute line.
    Continuation,
}

/// One entry of the dispatch table.
pub struct Rule {
    pub name: &'static str,
    pub role: Role,
    pub kind: SymbolKind,
    pub regex: Regex,
    /// Restricted to `.rake` files (rake DSL constructs).
    pub rake_only: bool,
}

impl Rule {
    fn new(name: &'static str, role: Role, kind: SymbolKind, pattern: &str) -> Self {
        Self {
            name,
            role,
            kind,
            regex: Regex::new(pattern).expect("invalid symbol pattern"),
            rake_only: false,
        }
    }

    fn rake(name: &'static str, role: Role, kind: SymbolKind, pattern: &str) -> Self {
        Self {
            rake_only: true,
            ..Self::new(name, role, kind, pattern)
        }
    }
}

lazy_static! {
    /// Ordered dispatch table. Openers come first, then single-line
    /// completions in priority order, with the attribute continuation last.
    pub static ref RULES: Vec<Rule> = vec![
        Rule::new("sclass", Role::Opener, SymbolKind::Class, r"^\s*class\s*<<\s*([^\s;]+)"),
        Rule::new("class", Role::Opener, SymbolKind::Class, r"^\s*class\s+([^\s<;]+)"),
        Rule::new("module", Role::Opener, SymbolKind::Module, r"^\s*module\s+([^\s;]+)"),
        Rule::new("method", Role::Opener, SymbolKind::Method, r"^\s*def\s+([^\s(;]+)"),
        Rule::new("constant", Role::Single, SymbolKind::Constant, r"^\s*([A-Z][A-Za-z0-9_:]*)\s*=[^=>~]"),
        Rule::new("scope", Role::Single, SymbolKind::Scope, r"^\s*scope\s+:([a-zA-Z0-9_]+[!?]?)"),
        Rule::new("alias", Role::Single, SymbolKind::Alias, r"^\s*alias\s+(\S+)"),
        Rule::new("alias_method", Role::Single, SymbolKind::Alias, r"^\s*alias_method\s+:([^\s,]+)"),
        Rule::new("alias_attribute", Role::Single, SymbolKind::Alias, r"^\s*alias_attribute\s+:([^\s,]+)"),
        Rule::new("attr", Role::Single, SymbolKind::Attribute, r"^\s*attr_(?:reader|writer|accessor)\(?\s*((?::\w+[?!=]?)(?:\s*,\s*:\w+[?!=]?)*)?"),
        Rule::new("mattr", Role::Single, SymbolKind::Attribute, r"^\s*mattr_(?:reader|writer|accessor)\(?\s*((?::\w+[?!=]?)(?:\s*,\s*:\w+[?!=]?)*)?"),
        Rule::new("thread_mattr", Role::Single, SymbolKind::Attribute, r"^\s*thread_mattr_accessor\(?\s*((?::\w+[?!=]?)(?:\s*,\s*:\w+[?!=]?)*)?"),
        Rule::new("attribute", Role::Single, SymbolKind::Attribute, r"^\s*attribute\(?\s*:(\w+[?!=]?)?"),
        Rule::new("date_attribute", Role::Single, SymbolKind::Attribute, r"^\s*date_attribute\(?\s*:(\w+[?!=]?)?"),
        Rule::new("class_attribute", Role::Single, SymbolKind::Attribute, r"^\s*class_attribute\(?\s*((?::\w+[?!=]?)(?:\s*,\s*:\w+[?!=]?)*)?"),
        Rule::new("attributes", Role::Single, SymbolKind::Attribute, r"^\s*attributes\(?\s*((?::\w+[?!=]?)(?:\s*,\s*:\w+[?!=]?)*)?"),
        Rule::new("delegate", Role::Single, SymbolKind::Attribute, r"^\s*delegate\(?\s*((?::\w+[?!=]?)(?:\s*,\s*:\w+[?!=]?)*)?"),
        Rule::new("association", Role::Single, SymbolKind::Association, r"^\s*(?:belongs_to|has_one|has_many|has_and_belongs_to_many)\s+:(\w+)"),
        Rule::rake("namespace", Role::Single, SymbolKind::Namespace, r"^\s*namespace\s+:(\w+)"),
        Rule::rake("task", Role::Single, SymbolKind::Task, r"^\s*task\s+:?(\w+)"),
        Rule::new("attr_cont", Role::Continuation, SymbolKind::Attribute, r"^\s*((?::\w+[?!=]?)(?:\s*,\s*:\w+[?!=]?)*)\s*,?\s*$"),
    ];

    /// Comment lines are skipped before any other matching.
    pub static ref COMMENT: Regex = Regex::new(r"^\s*#").expect("invalid comment pattern");

    /// Block terminator, whole word at statement start.
    pub static ref END: Regex = Regex::new(r"^\s*end\b").expect("invalid end pattern");

    /// Control keyword opening a block at statement start.
    static ref CONTROL_LEADING: Regex =
        Regex::new(r"^\s*(if|unless|while|until|for|case|begin)\b").expect("invalid control pattern");

    /// Control keyword used as an expression after an assignment
    /// (`x = if cond` opens a block even though text precedes the keyword).
    static ref CONTROL_ASSIGNED: Regex =
        Regex::new(r"[^=<>!~]=\s*(if|unless|while|until|case|begin)\b")
            .expect("invalid control pattern");

    /// Trailing `do`, optionally with block arguments.
    static ref DO_TRAILING: Regex =
        Regex::new(r"\bdo\s*(\|[^|]*\|)?\s*$").expect("invalid do pattern");
}

/// Detect a control-keyword block opener in `statement`, honoring the
/// statement-modifier rule: a trailing keyword preceded by other content
/// does not open a block unless it follows an assignment operator.
/// Trailing `do` is checked separately so a named declaration with a block
/// (`task :migrate do`) keeps its name.
pub fn control_keyword_opener(statement: &str) -> Option<SymbolKind> {
    if let Some(caps) = CONTROL_LEADING.captures(statement) {
        return keyword_kind(&caps[1]);
    }
    if let Some(caps) = CONTROL_ASSIGNED.captures(statement) {
        return keyword_kind(&caps[1]);
    }
    None
}

/// True when the statement ends with a block-opening `do`.
pub fn has_trailing_do(statement: &str) -> bool {
    DO_TRAILING.is_match(statement)
}

fn keyword_kind(keyword: &str) -> Option<SymbolKind> {
    match keyword {
        "if" => Some(SymbolKind::If),
        "unless" => Some(SymbolKind::Unless),
        "while" => Some(SymbolKind::While),
        "until" => Some(SymbolKind::Until),
        "for" => Some(SymbolKind::For),
        "case" => Some(SymbolKind::Case),
        "begin" => Some(SymbolKind::Begin),
        _ => None,
    }
}
