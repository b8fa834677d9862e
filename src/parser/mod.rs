//! Line-oriented Ruby symbol parser.
//!
//! Scans a file's text line by line against the pattern table in
//! [`patterns`], tracking open blocks on an explicit stack. No AST is built;
//! the scan recognizes declarations and block structure with enough fidelity
//! for symbol navigation, and degrades to best-effort recovery on input it
//! does not understand.

pub mod patterns;

use std::path::{Path, PathBuf};

use serde::Serialize;

use patterns::{Role, COMMENT, END, RULES};

/// Kind of a parsed symbol occurrence.
///
/// The control-flow kinds only appear in detail-mode parser output (for
/// outline spans); the index never registers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Module,
    Method,
    Constant,
    Scope,
    Alias,
    Attribute,
    Association,
    Namespace,
    Task,
    If,
    Unless,
    While,
    Until,
    For,
    Case,
    Begin,
    Do,
}

impl SymbolKind {
    /// Control-flow block markers, tracked for spans but never indexed.
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            SymbolKind::If
                | SymbolKind::Unless
                | SymbolKind::While
                | SymbolKind::Until
                | SymbolKind::For
                | SymbolKind::Case
                | SymbolKind::Begin
                | SymbolKind::Do
        )
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SymbolKind::Class => "class",
            SymbolKind::Module => "module",
            SymbolKind::Method => "method",
            SymbolKind::Constant => "constant",
            SymbolKind::Scope => "scope",
            SymbolKind::Alias => "alias",
            SymbolKind::Attribute => "attribute",
            SymbolKind::Association => "association",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Task => "task",
            SymbolKind::If => "if",
            SymbolKind::Unless => "unless",
            SymbolKind::While => "while",
            SymbolKind::Until => "until",
            SymbolKind::For => "for",
            SymbolKind::Case => "case",
            SymbolKind::Begin => "begin",
            SymbolKind::Do => "do",
        };
        write!(f, "{}", name)
    }
}

/// One occurrence of a named symbol at a file location.
#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    pub name: String,
    pub file: PathBuf,
    /// 1-based line of the declaration.
    pub start_line: usize,
    /// Closing line for block symbols; `None` for single-line declarations
    /// and for blocks left open at end of file.
    pub end_line: Option<usize>,
    pub kind: SymbolKind,
}

/// A block that has been opened but not yet terminated.
#[derive(Debug)]
struct OpenBlock {
    kind: SymbolKind,
    name: String,
    start_line: usize,
}

/// Ruby vs. rake dialect, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileType {
    Ruby,
    Rake,
}

/// Outcome of matching one statement against the dispatch table.
///
/// `Complete` and `Open` carry the captured name — for attribute-family
/// rules the raw symbol list, possibly empty when the list continues on the
/// next line (`attr_reader` alone).
enum StatementMatch {
    Complete { kind: SymbolKind, name: String },
    Open { kind: SymbolKind, name: String },
    Close,
}

/// Parser options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Track full block nesting (control keywords, `end` spans, `;`-split
    /// statements). When off, every construct is emitted as a complete
    /// single-line occurrence, which is the cheap bulk-indexing path.
    pub fetch_details: bool,
}

/// Parses one file's content into symbol occurrences.
///
/// Stateless across files; construct a fresh parser per file.
pub struct FileParser<'a> {
    file: &'a Path,
    content: &'a str,
    file_type: FileType,
    fetch_details: bool,
    last_kind: Option<SymbolKind>,
}

impl<'a> FileParser<'a> {
    pub fn new(file: &'a Path, content: &'a str, options: ParseOptions) -> Self {
        let file_type = match file.extension().and_then(|e| e.to_str()) {
            Some("rake") => FileType::Rake,
            _ => FileType::Ruby,
        };
        Self {
            file,
            content,
            file_type,
            fetch_details: options.fetch_details,
            last_kind: None,
        }
    }

    /// Scan the content and return occurrences in emission order: complete
    /// declarations as they are seen, block symbols when their `end` is
    /// reached, and any blocks still open at EOF flushed with a start line
    /// only.
    pub fn parse(&mut self) -> Vec<Symbol> {
        let mut symbols = Vec::new();
        let mut stack: Vec<OpenBlock> = Vec::new();

        for (idx, line) in self.content.lines().enumerate() {
            let line_no = idx + 1;

            if COMMENT.is_match(line) {
                continue;
            }

            if self.fetch_details {
                for statement in line.split(';') {
                    self.parse_statement(statement, line_no, &mut symbols, &mut stack);
                }
            } else {
                self.parse_statement(line, line_no, &mut symbols, &mut stack);
            }
        }

        // Unterminated blocks are recovered, not reported: emit them with a
        // start line only.
        for block in stack {
            symbols.push(Symbol {
                name: block.name,
                file: self.file.to_path_buf(),
                start_line: block.start_line,
                end_line: None,
                kind: block.kind,
            });
        }

        symbols
    }

    fn parse_statement(
        &mut self,
        statement: &str,
        line_no: usize,
        symbols: &mut Vec<Symbol>,
        stack: &mut Vec<OpenBlock>,
    ) {
        let Some(token) = self.match_statement(statement) else {
            self.last_kind = None;
            return;
        };

        match token {
            StatementMatch::Complete { kind, name } => {
                self.last_kind = Some(kind);
                if !name.is_empty() {
                    self.emit(kind, &name, line_no, symbols);
                }
            }
            StatementMatch::Open { kind, name } => {
                self.last_kind = Some(kind);
                stack.push(OpenBlock {
                    kind,
                    name,
                    start_line: line_no,
                });
            }
            StatementMatch::Close => {
                self.last_kind = None;
                // Dangling `end` with nothing open is ignored.
                if let Some(block) = stack.pop() {
                    symbols.push(Symbol {
                        name: block.name,
                        file: self.file.to_path_buf(),
                        start_line: block.start_line,
                        end_line: Some(line_no),
                        kind: block.kind,
                    });
                }
            }
        }
    }

    /// Match one statement against the dispatch table. Openers take priority
    /// over the terminator, which takes priority over single-line rules; at
    /// most one token is produced per statement.
    fn match_statement(&self, statement: &str) -> Option<StatementMatch> {
        if statement.trim().is_empty() || COMMENT.is_match(statement) {
            return None;
        }

        for rule in RULES.iter().filter(|r| r.role == Role::Opener) {
            if let Some(caps) = rule.regex.captures(statement) {
                let mut name = caps[1].to_string();
                if rule.kind == SymbolKind::Method {
                    name = strip_receiver(&name);
                }
                return Some(if self.fetch_details {
                    StatementMatch::Open {
                        kind: rule.kind,
                        name,
                    }
                } else {
                    StatementMatch::Complete {
                        kind: rule.kind,
                        name,
                    }
                });
            }
        }

        if self.fetch_details {
            if let Some(kind) = patterns::control_keyword_opener(statement) {
                return Some(StatementMatch::Open {
                    kind,
                    name: kind.to_string(),
                });
            }
            if END.is_match(statement) {
                return Some(StatementMatch::Close);
            }
        }

        for rule in RULES.iter().filter(|r| r.role != Role::Opener) {
            if rule.rake_only && self.file_type != FileType::Rake {
                continue;
            }
            if rule.role == Role::Continuation && self.last_kind != Some(SymbolKind::Attribute) {
                continue;
            }
            if let Some(caps) = rule.regex.captures(statement) {
                let name = caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                // A declaration carrying its own block (`task :migrate do`)
                // opens under its declared name, not as a bare do-block.
                if self.fetch_details && !name.is_empty() && patterns::has_trailing_do(statement) {
                    return Some(StatementMatch::Open {
                        kind: rule.kind,
                        name,
                    });
                }
                return Some(StatementMatch::Complete {
                    kind: rule.kind,
                    name,
                });
            }
        }

        if self.fetch_details && patterns::has_trailing_do(statement) {
            return Some(StatementMatch::Open {
                kind: SymbolKind::Do,
                name: SymbolKind::Do.to_string(),
            });
        }

        None
    }

    fn emit(&self, kind: SymbolKind, name: &str, line_no: usize, symbols: &mut Vec<Symbol>) {
        if kind == SymbolKind::Attribute {
            // The capture is a comma-separated `:symbol` list; one
            // occurrence per entry, all on the same line.
            for entry in name.split(',') {
                let entry = entry.trim().trim_start_matches(':').trim();
                if entry.is_empty() {
                    continue;
                }
                symbols.push(Symbol {
                    name: entry.to_string(),
                    file: self.file.to_path_buf(),
                    start_line: line_no,
                    end_line: None,
                    kind,
                });
            }
        } else {
            symbols.push(Symbol {
                name: name.to_string(),
                file: self.file.to_path_buf(),
                start_line: line_no,
                end_line: None,
                kind,
            });
        }
    }
}

/// Drop a constant or `self` receiver from a method name: `self.build` and
/// `Loader.build` both index as `build`.
fn strip_receiver(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, method)) => method.to_string(),
        None => name.to_string(),
    }
}

/// Convenience wrapper used by the index and the CLI.
pub fn parse_file(file: &Path, content: &str, options: ParseOptions) -> Vec<Symbol> {
    FileParser::new(file, content, options).parse()
}
