use ropey::Rope;
use tree_sitter::{Language, Node, Parser};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Builtin,
    String,
    Number,
    Comment,
}

/// Highlighted span of one line, in char columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

/// The grammar the editors parse with. Editors cannot be built before it is
/// ready.
pub struct EditorLibrary {
    language: &'static str,
    grammar: Language,
}

impl EditorLibrary {
    pub fn python() -> Self {
        Self {
            language: super::PYTHON,
            grammar: tree_sitter_python::language(),
        }
    }

    pub fn language(&self) -> &'static str {
        self.language
    }

    pub fn node_kind_count(&self) -> usize {
        self.grammar.node_kind_count()
    }

    /// A parser for the grammar, or `None` when the grammar's ABI is not one
    /// the linked tree-sitter accepts.
    pub fn parser(&self) -> Option<Parser> {
        let mut parser = Parser::new();
        parser.set_language(self.grammar).ok()?;
        Some(parser)
    }

    /// Whether `kind` names one of the grammar's keyword tokens.
    pub fn is_keyword(&self, kind: &str) -> bool {
        is_python_keyword(kind)
    }

    pub fn classify(&self, node: Node<'_>, rope: &Rope) -> Option<TokenKind> {
        let kind = node.kind();
        if kind == "comment" {
            return Some(TokenKind::Comment);
        }
        if kind.contains("string") {
            return Some(TokenKind::String);
        }
        match kind {
            "integer" | "float" => Some(TokenKind::Number),
            "true" | "false" | "none" => Some(TokenKind::Keyword),
            "identifier" => classify_identifier(node, rope),
            _ if !node.is_named() && self.is_keyword(kind) => Some(TokenKind::Keyword),
            _ => None,
        }
    }
}

fn classify_identifier(node: Node<'_>, rope: &Rope) -> Option<TokenKind> {
    if is_receiver(node, rope) {
        return Some(TokenKind::Builtin);
    }
    let parent = node.parent()?;
    if parent.kind() == "call" && parent.child_by_field_name("function") == Some(node) {
        return Some(TokenKind::Builtin);
    }
    None
}

fn is_receiver(node: Node<'_>, rope: &Rope) -> bool {
    let end = node.end_byte().min(rope.len_bytes());
    let start = node.start_byte().min(end);
    let text = rope.slice(rope.byte_to_char(start)..rope.byte_to_char(end));
    text == "self" || text == "cls"
}

fn is_python_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "and"
            | "as"
            | "assert"
            | "async"
            | "await"
            | "break"
            | "case"
            | "class"
            | "continue"
            | "def"
            | "del"
            | "elif"
            | "else"
            | "except"
            | "finally"
            | "for"
            | "from"
            | "global"
            | "if"
            | "import"
            | "in"
            | "is"
            | "lambda"
            | "match"
            | "nonlocal"
            | "not"
            | "or"
            | "pass"
            | "raise"
            | "return"
            | "try"
            | "while"
            | "with"
            | "yield"
    )
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/editor/library.rs"]
mod tests;
