//! analyze::scanner
//!
//! Character-level surface scanner for Java-like sources.
//!
//! # Design
//!
//! The scanner makes two passes: a tokenizer that skips comments and
//! string/char literals and emits identifier, number, and punctuation
//! tokens with byte spans, and a declaration pass that recognizes
//! imports, type declarations, and method declarations by local token
//! shape. It is deliberately a surface reading — no symbol resolution,
//! no type checking — which is all the detector set needs.
//!
//! # Limitations
//!
//! Anonymous classes, lambdas, and annotation arguments are tokenized
//! but not modeled as declarations. Unterminated comments and string
//! literals are consumed to end of input; unbalanced braces and
//! parentheses are reported as [`AnalyzeError::Unbalanced`].

use super::{
    AnalyzeError, DeclKind, IdentUse, ImportDecl, MethodDecl, NumericLiteral, ParamDecl,
    ParsedUnit, SourceAnalyzer, TypeDecl,
};
use crate::core::source::SourceIdentity;
use crate::core::types::Span;

/// Java keywords; excluded from identifier-shaped declaration matching.
const KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "record",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "var",
    "void",
    "volatile",
    "while",
];

fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// Keywords that open a type declaration body.
const TYPE_KEYWORDS: &[&str] = &["class", "interface", "enum", "record"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Ident,
    Number,
    Punct(char),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    text: String,
    span: Span,
}

impl Token {
    fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == text
    }

    fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }
}

/// Surface analyzer for Java-like source text.
///
/// Stateless; one instance serves any number of parses.
///
/// # Example
///
/// ```
/// use burnish::analyze::{SourceAnalyzer, SurfaceAnalyzer};
/// use burnish::core::source::SourceIdentity;
/// use uuid::Uuid;
///
/// let analyzer = SurfaceAnalyzer::new();
/// let source = SourceIdentity::new(
///     "Name.java",
///     "class Name { void boom(String m){ if(m.length()>1){} } }",
///     Uuid::new_v4(),
/// );
/// let unit = analyzer.parse(&source).unwrap();
/// assert_eq!(unit.types().len(), 1);
/// assert_eq!(unit.methods().len(), 1);
/// assert_eq!(unit.literals().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SurfaceAnalyzer;

impl SurfaceAnalyzer {
    /// Create a surface analyzer.
    pub fn new() -> Self {
        Self
    }
}

impl SourceAnalyzer for SurfaceAnalyzer {
    fn parse(&self, source: &SourceIdentity) -> Result<ParsedUnit, AnalyzeError> {
        let text = source.content();
        let tokens = tokenize(text);

        let imports = scan_imports(&tokens);
        let types = scan_types(&tokens)?;
        let methods = scan_methods(&tokens)?;

        let literals = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| NumericLiteral {
                text: t.text.clone(),
                span: t.span,
            })
            .collect();

        let identifiers = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Ident && !is_keyword(&t.text))
            .map(|t| IdentUse {
                name: t.text.clone(),
                span: t.span,
            })
            .collect();

        Ok(ParsedUnit::new(
            source.signature().clone(),
            imports,
            types,
            methods,
            literals,
            identifiers,
        ))
    }

    fn locate(&self, unit: &ParsedUnit, kind: DeclKind, name: &str) -> Option<Span> {
        match kind {
            DeclKind::Import => unit
                .imports()
                .iter()
                .find(|i| i.name == name || i.path == name)
                .map(|i| i.span),
            DeclKind::Type => unit
                .types()
                .iter()
                .find(|t| t.name == name)
                .map(|t| t.name_span),
            DeclKind::Method => unit
                .methods()
                .iter()
                .find(|m| m.name == name)
                .map(|m| m.name_span),
            DeclKind::Parameter => unit
                .methods()
                .iter()
                .flat_map(|m| m.params.iter())
                .find(|p| p.name == name)
                .map(|p| p.span),
        }
    }
}

/// Tokenize source text, skipping whitespace, comments, and string/char
/// literals.
fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let end_of = |i: usize| -> usize {
        chars.get(i).map(|(pos, _)| *pos).unwrap_or(text.len())
    };

    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Line and block comments
        if c == '/' && i + 1 < chars.len() {
            let (_, next) = chars[i + 1];
            if next == '/' {
                i += 2;
                while i < chars.len() && chars[i].1 != '\n' {
                    i += 1;
                }
                continue;
            }
            if next == '*' {
                i += 2;
                while i + 1 < chars.len() && !(chars[i].1 == '*' && chars[i + 1].1 == '/') {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
                continue;
            }
        }

        // String and char literals (skipped; escapes honored)
        if c == '"' || c == '\'' {
            i += 1;
            while i < chars.len() && chars[i].1 != c {
                if chars[i].1 == '\\' {
                    i += 1;
                }
                i += 1;
            }
            i = (i + 1).min(chars.len());
            continue;
        }

        // Identifiers
        if c.is_alphabetic() || c == '_' || c == '$' {
            let mut j = i + 1;
            while j < chars.len() {
                let ch = chars[j].1;
                if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                    j += 1;
                } else {
                    break;
                }
            }
            let span = Span::new(start, end_of(j)).expect("token spans ascend");
            tokens.push(Token {
                kind: TokenKind::Ident,
                text: text[start..end_of(j)].to_string(),
                span,
            });
            i = j;
            continue;
        }

        // Numeric literals (covers hex, floats, suffixes, underscores)
        if c.is_ascii_digit() {
            let mut j = i + 1;
            while j < chars.len() {
                let ch = chars[j].1;
                if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                    j += 1;
                } else {
                    break;
                }
            }
            let span = Span::new(start, end_of(j)).expect("token spans ascend");
            tokens.push(Token {
                kind: TokenKind::Number,
                text: text[start..end_of(j)].to_string(),
                span,
            });
            i = j;
            continue;
        }

        // Everything else is single-character punctuation
        let span = Span::new(start, end_of(i + 1)).expect("token spans ascend");
        tokens.push(Token {
            kind: TokenKind::Punct(c),
            text: c.to_string(),
            span,
        });
        i += 1;
    }

    tokens
}

/// Index of the matching closer for the opener at `open_idx`.
fn matching_close(
    tokens: &[Token],
    open_idx: usize,
    open: char,
    close: char,
) -> Result<usize, AnalyzeError> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open_idx) {
        if token.is_punct(open) {
            depth += 1;
        } else if token.is_punct(close) {
            depth -= 1;
            if depth == 0 {
                return Ok(idx);
            }
        }
    }
    Err(AnalyzeError::Unbalanced {
        open,
        at: tokens[open_idx].span.start(),
    })
}

fn scan_imports(tokens: &[Token]) -> Vec<ImportDecl> {
    let mut imports = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        if !tokens[i].is_ident("import") {
            i += 1;
            continue;
        }

        let start = tokens[i].span.start();
        let mut j = i + 1;
        let mut path = String::new();
        let mut name = String::new();
        while j < tokens.len() && !tokens[j].is_punct(';') {
            // `static` in `import static` is part of the statement, not
            // the path
            if !tokens[j].is_ident("static") {
                path.push_str(&tokens[j].text);
                if tokens[j].kind == TokenKind::Ident || tokens[j].is_punct('*') {
                    name = tokens[j].text.clone();
                }
            }
            j += 1;
        }

        let end = if j < tokens.len() {
            tokens[j].span.end()
        } else {
            tokens[j - 1].span.end()
        };

        if !path.is_empty() {
            imports.push(ImportDecl {
                name,
                path,
                span: Span::new(start, end).expect("statement spans ascend"),
            });
        }
        i = j + 1;
    }

    imports
}

fn scan_types(tokens: &[Token]) -> Result<Vec<TypeDecl>, AnalyzeError> {
    let mut types = Vec::new();

    for i in 0..tokens.len() {
        let is_type_kw =
            tokens[i].kind == TokenKind::Ident && TYPE_KEYWORDS.contains(&tokens[i].text.as_str());
        if !is_type_kw {
            continue;
        }
        let Some(name_token) = tokens.get(i + 1) else {
            continue;
        };
        if name_token.kind != TokenKind::Ident || is_keyword(&name_token.text) {
            continue;
        }

        // Find the body (or a bodiless `;` for forward-style declarations)
        let mut k = i + 2;
        let mut body_open = None;
        while k < tokens.len() {
            if tokens[k].is_punct('{') {
                body_open = Some(k);
                break;
            }
            if tokens[k].is_punct(';') {
                break;
            }
            k += 1;
        }

        let end = match body_open {
            Some(open) => tokens[matching_close(tokens, open, '{', '}')?].span.end(),
            None if k < tokens.len() => tokens[k].span.end(),
            None => tokens[tokens.len() - 1].span.end(),
        };

        types.push(TypeDecl {
            name: name_token.text.clone(),
            name_span: name_token.span,
            span: Span::new(tokens[i].span.start(), end).expect("decl spans ascend"),
        });
    }

    Ok(types)
}

fn scan_methods(tokens: &[Token]) -> Result<Vec<MethodDecl>, AnalyzeError> {
    let mut methods = Vec::new();

    for i in 0..tokens.len() {
        if tokens[i].kind != TokenKind::Ident || is_keyword(&tokens[i].text) {
            continue;
        }
        if !tokens.get(i + 1).is_some_and(|t| t.is_punct('(')) {
            continue;
        }
        // Calls (`x.f(...)`) and allocations (`new F(...)`) are not
        // declarations
        if i > 0 && (tokens[i - 1].is_punct('.') || tokens[i - 1].is_ident("new")) {
            continue;
        }

        let params_close = matching_close(tokens, i + 1, '(', ')')?;

        // Skip a throws clause between the parameter list and the body
        let mut k = params_close + 1;
        if tokens.get(k).is_some_and(|t| t.is_ident("throws")) {
            k += 1;
            while tokens.get(k).is_some_and(|t| {
                t.kind == TokenKind::Ident || t.is_punct('.') || t.is_punct(',')
            }) {
                k += 1;
            }
        }
        if !tokens.get(k).is_some_and(|t| t.is_punct('{')) {
            continue;
        }
        let body_close = matching_close(tokens, k, '{', '}')?;

        // Extend the declaration span back over modifiers, return type,
        // and annotations
        let mut start_idx = i;
        while start_idx > 0 {
            let prev = &tokens[start_idx - 1];
            let keeps = match prev.kind {
                TokenKind::Ident => !prev.is_ident("new"),
                TokenKind::Punct(c) => matches!(c, '<' | '>' | '[' | ']' | '.' | '@'),
                TokenKind::Number => false,
            };
            if keeps {
                start_idx -= 1;
            } else {
                break;
            }
        }

        let is_private = tokens[start_idx..i].iter().any(|t| t.is_ident("private"));

        methods.push(MethodDecl {
            name: tokens[i].text.clone(),
            name_span: tokens[i].span,
            span: Span::new(tokens[start_idx].span.start(), tokens[body_close].span.end())
                .expect("decl spans ascend"),
            body: Span::new(tokens[k].span.start(), tokens[body_close].span.end())
                .expect("body spans ascend"),
            params: scan_params(&tokens[i + 2..params_close]),
            is_private,
        });
    }

    Ok(methods)
}

/// Parameter names from the tokens between a signature's parentheses.
///
/// Splits at top-level commas (generics, arrays, and nested parens
/// tracked) and takes the last identifier of each segment as the name.
fn scan_params(tokens: &[Token]) -> Vec<ParamDecl> {
    let mut params = Vec::new();
    let mut depth = 0i32;
    let mut last_ident: Option<&Token> = None;

    for token in tokens {
        match token.kind {
            TokenKind::Punct('<') | TokenKind::Punct('(') | TokenKind::Punct('[') => depth += 1,
            TokenKind::Punct('>') | TokenKind::Punct(')') | TokenKind::Punct(']') => depth -= 1,
            TokenKind::Punct(',') if depth == 0 => {
                if let Some(ident) = last_ident.take() {
                    params.push(ParamDecl {
                        name: ident.text.clone(),
                        span: ident.span,
                    });
                }
            }
            TokenKind::Ident if !is_keyword(&token.text) => last_ident = Some(token),
            _ => {}
        }
    }
    if let Some(ident) = last_ident.take() {
        params.push(ParamDecl {
            name: ident.text.clone(),
            span: ident.span,
        });
    }

    params
}
