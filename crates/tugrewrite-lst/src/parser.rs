// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Reference parser for a Groovy subset.
//!
//! The parser captures every byte of whitespace and every comment into the
//! prefixes and paddings of the tree, so printing an unedited result gives
//! back the input exactly.
//!
//! ## Grammar
//!
//! ```text
//! <unit>        := [shebang] (<statement>)* <space>
//! <statement>   := "def" <ident> ["=" <expr>]
//!                | "class" <ident> <block>
//!                | <expr>
//! <block>       := "{" (<statement>)* "}"
//! <expr>        := <relational> (("==~" | "==" | "!=" | "=~") <relational>)*
//! <relational>  := <range> (("<=" | ">=" | "<" | ">" | "in") <range>)*
//! <range>       := <additive> [(".." | "..<") <additive>]
//! <additive>    := <term> (("+" | "-") <term>)*
//! <term>        := <postfix> (("*" | "/" | "%") <postfix>)*
//! <postfix>     := <primary> ("." <ident> | "[" <expr> "]")*
//! <primary>     := number | 'string' | "gstring" | <list> | <map>
//!                | "true" | "false" | "null" | <ident>
//! <list>        := "[" [<expr> ("," <expr>)* [","]] "]"
//! <map>         := "[:]" | "[" <entry> ("," <entry>)* [","] "]"
//! <entry>       := <expr> ":" <expr>
//! ```
//!
//! An infix or postfix operator must start on the same line as its left
//! operand; a line break ends the expression. The empty map is spelled `[:]`
//! with nothing between the brackets.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use tugrewrite_core::source::UTF8_BOM;
use tugrewrite_core::{FileAttributes, Markers, RewriteError, RewriteResult, SourceMetadata};
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, opt};
use winnow::error::{ErrMode, ParserError};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_until, take_while};
use winnow::ModalResult;

use crate::padding::{Container, LeftPadded, RightPadded};
use crate::space::Space;
use crate::tree::{
    Binary, BinaryOperator, Block, ClassDeclaration, CompilationUnit, Dialect, Empty,
    ExpressionStatement, FieldAccess, GBinary, GBinaryOperator, GString, GStringValue,
    Identifier, ListLiteral, Literal, LiteralValue, MapEntry, MapLiteral, Range, TrailingComma,
    VariableDeclaration, J,
};
use crate::types::{JavaType, Primitive};

const LIST_TYPE: &str = "java.util.ArrayList";
const MAP_TYPE: &str = "java.util.LinkedHashMap";
const GSTRING_TYPE: &str = "groovy.lang.GString";
const MATCHER_TYPE: &str = "java.util.regex.Matcher";

const RESERVED: [&str; 3] = ["def", "class", "in"];

/// Parse Groovy source text into a compilation unit.
///
/// `path` is recorded in the unit's source metadata together with the
/// checksum of `text` and whether it starts with a byte order mark.
pub fn parse_groovy(path: impl Into<PathBuf>, text: &str) -> RewriteResult<Arc<CompilationUnit>> {
    let path = path.into();
    let body = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let bom_len = text.len() - body.len();

    let (shebang, statements, eof) =
        compilation_unit
            .parse(body)
            .map_err(|e| RewriteError::Parse {
                path: path.clone(),
                offset: e.offset() + bom_len,
                message: describe_error(body, e.offset()),
            })?;

    debug!(
        path = %path.display(),
        statements = statements.len(),
        "parsed groovy source"
    );

    let mut builder =
        CompilationUnit::builder(Dialect::Groovy, SourceMetadata::for_text(path, text))
            .statements(statements)
            .eof(eof);
    if let Some(shebang) = shebang {
        builder = builder.shebang(shebang);
    }
    Ok(builder.build()?)
}

/// Read and parse a Groovy file, recording its file attributes.
pub fn parse_file(path: &Path) -> RewriteResult<Arc<CompilationUnit>> {
    let text = fs::read_to_string(path)?;
    let attributes = FileAttributes::from_metadata(&fs::metadata(path)?);
    let cu = parse_groovy(path, &text)?;
    Ok(cu.with_file_attributes(Some(attributes)))
}

fn describe_error(body: &str, offset: usize) -> String {
    match body.get(offset..).and_then(|rest| rest.chars().next()) {
        Some(c) => format!("unexpected {c:?}"),
        None => "unexpected end of input".to_string(),
    }
}

// ============================================================================
// Parser implementation using winnow
// ============================================================================

type Unit = (Option<String>, Vec<RightPadded<J>>, Space);

/// Parse a whole unit: optional shebang, statements, trailing space.
fn compilation_unit(input: &mut &str) -> ModalResult<Unit> {
    let shebang = opt(("#!", take_till(0.., '\n')).take())
        .parse_next(input)?
        .map(str::to_string);

    let mut statements = Vec::new();
    loop {
        let prefix = space(input)?;
        if input.is_empty() {
            return Ok((shebang, statements, prefix));
        }
        let stmt = statement(prefix, input)?;
        statements.push(RightPadded::build(stmt));
    }
}

/// Whitespace and comments, captured verbatim.
fn space(input: &mut &str) -> ModalResult<Space> {
    let start = *input;
    loop {
        let _ = multispace0.parse_next(input)?;
        if input.starts_with("//") {
            let _ = take_till(0.., '\n').parse_next(input)?;
        } else if input.starts_with("/*") {
            let _ = ("/*", take_until(0.., "*/"), "*/").parse_next(input)?;
        } else {
            break;
        }
    }
    let consumed = &start[..start.len() - input.len()];
    Ok(Space::format(consumed))
}

/// Space before an infix or postfix operator, or `None` (with the input
/// restored) when a line break comes first.
fn operator_space(input: &mut &str) -> ModalResult<Option<Space>> {
    let checkpoint = *input;
    let before = space(input)?;
    if before.to_string().contains('\n') {
        *input = checkpoint;
        return Ok(None);
    }
    Ok(Some(before))
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn starts_with_ident(input: &str) -> bool {
    input.chars().next().is_some_and(is_ident_start)
}

fn identifier_text<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (one_of(is_ident_start), take_while(0.., is_ident_continue))
        .take()
        .parse_next(input)
}

/// Consume `word` when it is the next whole identifier.
fn keyword(input: &mut &str, word: &str) -> bool {
    let mut lookahead = *input;
    match identifier_text(&mut lookahead) {
        Ok(found) if found == word => {
            *input = lookahead;
            true
        }
        _ => false,
    }
}

/// `.` and the name after it, with the space between them as the name's
/// prefix. The input is left alone when no name follows the dot.
fn dotted_name(input: &mut &str) -> ModalResult<Option<Arc<Identifier>>> {
    let checkpoint = *input;
    if opt('.').parse_next(input)?.is_none() {
        return Ok(None);
    }
    let prefix = space(input)?;
    if !starts_with_ident(input) {
        *input = checkpoint;
        return Ok(None);
    }
    identifier(prefix, input).map(Some)
}

fn identifier(prefix: Space, input: &mut &str) -> ModalResult<Arc<Identifier>> {
    let checkpoint = *input;
    let name = identifier_text(input)?;
    if RESERVED.contains(&name) {
        *input = checkpoint;
        return Err(ErrMode::from_input(input));
    }
    Ok(Identifier::build(prefix, name))
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

fn statement(prefix: Space, input: &mut &str) -> ModalResult<J> {
    if keyword(input, "def") {
        return variable_declaration(prefix, input);
    }
    if keyword(input, "class") {
        return class_declaration(prefix, input);
    }
    let expr = expression(prefix, input)?;
    Ok(J::ExpressionStatement(ExpressionStatement::new(expr)))
}

/// After `def`: the name and an optional initializer.
fn variable_declaration(prefix: Space, input: &mut &str) -> ModalResult<J> {
    let name_prefix = space(input)?;
    let name = identifier(name_prefix, input)?;

    let checkpoint = *input;
    let initializer = match operator_space(input)? {
        Some(before) if opt('=').parse_next(input)?.is_some() => {
            let value_prefix = space(input)?;
            let value = expression(value_prefix, input)?;
            Some(LeftPadded::new(before, value, Markers::EMPTY))
        }
        _ => {
            *input = checkpoint;
            None
        }
    };
    Ok(J::VariableDeclaration(VariableDeclaration::build(
        prefix,
        name,
        initializer,
    )))
}

/// After `class`: the name and the body.
fn class_declaration(prefix: Space, input: &mut &str) -> ModalResult<J> {
    let name_prefix = space(input)?;
    let name = identifier(name_prefix, input)?;
    let body_prefix = space(input)?;
    let body = block(body_prefix, input)?;
    Ok(J::ClassDeclaration(ClassDeclaration::build(
        prefix, name, body,
    )))
}

fn block(prefix: Space, input: &mut &str) -> ModalResult<Arc<Block>> {
    '{'.parse_next(input)?;
    let mut statements = Vec::new();
    let end = loop {
        let next = space(input)?;
        if opt('}').parse_next(input)?.is_some() {
            break next;
        }
        if input.is_empty() {
            return Err(ErrMode::from_input(input));
        }
        statements.push(RightPadded::build(statement(next, input)?));
    };
    Block::build(prefix, statements, end).map_err(|_| ErrMode::from_input(input))
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

type Operand = fn(Space, &mut &str) -> ModalResult<J>;

#[derive(Debug, Clone, Copy)]
enum Infix {
    Base(BinaryOperator),
    Groovy(GBinaryOperator),
}

fn expression(prefix: Space, input: &mut &str) -> ModalResult<J> {
    infix_level(prefix, input, relational, equality_operator)
}

fn equality_operator(input: &mut &str) -> ModalResult<Infix> {
    alt((
        "==~".value(Infix::Groovy(GBinaryOperator::Match)),
        "==".value(Infix::Base(BinaryOperator::Equal)),
        "!=".value(Infix::Base(BinaryOperator::NotEqual)),
        "=~".value(Infix::Groovy(GBinaryOperator::Find)),
    ))
    .parse_next(input)
}

fn relational(prefix: Space, input: &mut &str) -> ModalResult<J> {
    infix_level(prefix, input, range, relational_operator)
}

fn relational_operator(input: &mut &str) -> ModalResult<Infix> {
    if keyword(input, "in") {
        return Ok(Infix::Groovy(GBinaryOperator::In));
    }
    alt((
        "<=".value(Infix::Base(BinaryOperator::LessThanOrEqual)),
        ">=".value(Infix::Base(BinaryOperator::GreaterThanOrEqual)),
        "<".value(Infix::Base(BinaryOperator::LessThan)),
        ">".value(Infix::Base(BinaryOperator::GreaterThan)),
    ))
    .parse_next(input)
}

fn range(prefix: Space, input: &mut &str) -> ModalResult<J> {
    let from = additive(prefix, input)?;

    let checkpoint = *input;
    let Some(before) = operator_space(input)? else {
        return Ok(from);
    };
    if opt("..").parse_next(input)?.is_none() {
        *input = checkpoint;
        return Ok(from);
    }
    let inclusive = opt('<').parse_next(input)?.is_none();
    let to_prefix = space(input)?;
    let to = additive(to_prefix, input)?;

    let prefix = from.prefix().clone();
    Ok(J::Range(Range::build(
        prefix,
        from.with_prefix(Space::EMPTY),
        LeftPadded::new(before, inclusive, Markers::EMPTY),
        to,
    )))
}

fn additive(prefix: Space, input: &mut &str) -> ModalResult<J> {
    infix_level(prefix, input, term, additive_operator)
}

fn additive_operator(input: &mut &str) -> ModalResult<Infix> {
    alt((
        '+'.value(Infix::Base(BinaryOperator::Addition)),
        '-'.value(Infix::Base(BinaryOperator::Subtraction)),
    ))
    .parse_next(input)
}

fn term(prefix: Space, input: &mut &str) -> ModalResult<J> {
    infix_level(prefix, input, postfix, term_operator)
}

fn term_operator(input: &mut &str) -> ModalResult<Infix> {
    alt((
        '*'.value(Infix::Base(BinaryOperator::Multiplication)),
        '/'.value(Infix::Base(BinaryOperator::Division)),
        '%'.value(Infix::Base(BinaryOperator::Modulo)),
    ))
    .parse_next(input)
}

/// A left-associative chain of `operand`s joined by `operator`.
fn infix_level(
    prefix: Space,
    input: &mut &str,
    operand: Operand,
    operator: fn(&mut &str) -> ModalResult<Infix>,
) -> ModalResult<J> {
    let mut left = operand(prefix, input)?;
    loop {
        let checkpoint = *input;
        let Some(before) = operator_space(input)? else {
            break;
        };
        let Some(op) = opt(operator).parse_next(input)? else {
            *input = checkpoint;
            break;
        };
        let right_prefix = space(input)?;
        let right = operand(right_prefix, input)?;
        left = infix(left, before, op, right);
    }
    Ok(left)
}

/// Join two operands. The left operand's prefix moves to the new node.
fn infix(left: J, before: Space, op: Infix, right: J) -> J {
    let prefix = left.prefix().clone();
    let left = left.with_prefix(Space::EMPTY);
    match op {
        Infix::Base(op) => J::Binary(Binary::build(
            prefix,
            left,
            LeftPadded::new(before, op, Markers::EMPTY),
            right,
            binary_type(op),
        )),
        Infix::Groovy(op) => J::GBinary(GBinary::build(
            prefix,
            left,
            LeftPadded::new(before, op, Markers::EMPTY),
            right,
            Space::EMPTY,
            gbinary_type(op),
        )),
    }
}

fn binary_type(op: BinaryOperator) -> Option<JavaType> {
    match op {
        BinaryOperator::Equal
        | BinaryOperator::NotEqual
        | BinaryOperator::LessThan
        | BinaryOperator::GreaterThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThanOrEqual => Some(JavaType::Primitive(Primitive::Boolean)),
        _ => None,
    }
}

fn gbinary_type(op: GBinaryOperator) -> Option<JavaType> {
    match op {
        GBinaryOperator::Find => Some(JavaType::class(MATCHER_TYPE)),
        GBinaryOperator::Match | GBinaryOperator::In => {
            Some(JavaType::Primitive(Primitive::Boolean))
        }
        GBinaryOperator::Access => None,
    }
}

/// Field access and index access, left to right.
fn postfix(prefix: Space, input: &mut &str) -> ModalResult<J> {
    let mut target = primary(prefix, input)?;
    loop {
        let checkpoint = *input;
        let Some(before) = operator_space(input)? else {
            break;
        };
        if let Some(name) = dotted_name(input)? {
            let prefix = target.prefix().clone();
            target = J::FieldAccess(FieldAccess::build(
                prefix,
                target.with_prefix(Space::EMPTY),
                LeftPadded::new(before, name, Markers::EMPTY),
            ));
        } else if opt('[').parse_next(input)?.is_some() {
            let index_prefix = space(input)?;
            let index = expression(index_prefix, input)?;
            let after = space(input)?;
            ']'.parse_next(input)?;
            let prefix = target.prefix().clone();
            target = J::GBinary(GBinary::build(
                prefix,
                target.with_prefix(Space::EMPTY),
                LeftPadded::new(before, GBinaryOperator::Access, Markers::EMPTY),
                index,
                after,
                None,
            ));
        } else {
            *input = checkpoint;
            break;
        }
    }
    Ok(target)
}

fn primary(prefix: Space, input: &mut &str) -> ModalResult<J> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some('['), _) => collection(prefix, input),
        (Some('\''), _) => single_quoted(prefix, input),
        (Some('"'), _) => double_quoted(prefix, input),
        (Some(c), _) if c.is_ascii_digit() => number(prefix, input),
        (Some('-'), Some(c)) if c.is_ascii_digit() => number(prefix, input),
        (Some(c), _) if is_ident_start(c) => word(prefix, input),
        _ => Err(ErrMode::from_input(input)),
    }
}

fn word(prefix: Space, input: &mut &str) -> ModalResult<J> {
    let value = if keyword(input, "true") {
        LiteralValue::Bool(true)
    } else if keyword(input, "false") {
        LiteralValue::Bool(false)
    } else if keyword(input, "null") {
        LiteralValue::Null
    } else {
        return Ok(J::Identifier(identifier(prefix, input)?));
    };
    Ok(J::Literal(Literal::of(prefix, value)))
}

fn number(prefix: Space, input: &mut &str) -> ModalResult<J> {
    let checkpoint = *input;
    let text = (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .parse_next(input)?;
    let value = if text.contains('.') {
        text.parse().map(LiteralValue::Float).ok()
    } else {
        text.parse().map(LiteralValue::Int).ok()
    };
    let Some(value) = value else {
        *input = checkpoint;
        return Err(ErrMode::from_input(input));
    };
    let java_type = JavaType::Primitive(value.primitive());
    Ok(J::Literal(Literal::build(prefix, value, text, Some(java_type))))
}

/// Decode backslash escapes of a quoted string body.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn string_literal(prefix: Space, raw: &str, source: &str) -> J {
    J::Literal(Literal::build(
        prefix,
        LiteralValue::Str(unescape(raw)),
        source,
        Some(JavaType::Primitive(Primitive::String)),
    ))
}

fn single_quoted(prefix: Space, input: &mut &str) -> ModalResult<J> {
    let start = *input;
    '\''.parse_next(input)?;
    loop {
        let mut chars = input.chars();
        match chars.next() {
            Some('\'') => break,
            Some('\\') if chars.next().is_some() => *input = &input[2..],
            Some('\n') | Some('\\') | None => return Err(ErrMode::from_input(input)),
            Some(c) => *input = &input[c.len_utf8()..],
        }
    }
    '\''.parse_next(input)?;
    let source = &start[..start.len() - input.len()];
    Ok(string_literal(prefix, &source[1..source.len() - 1], source))
}

/// A double-quoted string; a GString when it interpolates.
fn double_quoted(prefix: Space, input: &mut &str) -> ModalResult<J> {
    let start = *input;
    '"'.parse_next(input)?;
    let mut parts = Vec::new();
    let mut fragment = *input;
    loop {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some('"'), _) => break,
            (Some('\\'), Some(escaped)) if escaped != '\n' => {
                *input = &input[1 + escaped.len_utf8()..];
            }
            (Some('$'), Some(next)) if next == '{' || is_ident_start(next) => {
                push_fragment(&mut parts, fragment, input);
                '$'.parse_next(input)?;
                parts.push(J::GStringValue(interpolation(input)?));
                fragment = *input;
            }
            (Some('\n'), _) | (Some('\\'), _) | (None, _) => {
                return Err(ErrMode::from_input(input));
            }
            (Some(c), _) => *input = &input[c.len_utf8()..],
        }
    }
    if parts.is_empty() {
        '"'.parse_next(input)?;
        let source = &start[..start.len() - input.len()];
        return Ok(string_literal(prefix, &source[1..source.len() - 1], source));
    }
    push_fragment(&mut parts, fragment, input);
    '"'.parse_next(input)?;
    Ok(J::GString(GString::build(
        prefix,
        "\"",
        parts,
        Some(JavaType::class(GSTRING_TYPE)),
    )))
}

/// Record the literal text between `fragment` and the current position.
fn push_fragment(parts: &mut Vec<J>, fragment: &str, input: &str) {
    let raw = &fragment[..fragment.len() - input.len()];
    if !raw.is_empty() {
        parts.push(string_literal(Space::EMPTY, raw, raw));
    }
}

/// After `$`: `{expr}` or a dotted name.
fn interpolation(input: &mut &str) -> ModalResult<Arc<GStringValue>> {
    if opt('{').parse_next(input)?.is_some() {
        let tree_prefix = space(input)?;
        let tree = expression(tree_prefix, input)?;
        let after = space(input)?;
        '}'.parse_next(input)?;
        return Ok(GStringValue::build(tree, after, true));
    }
    let mut tree = J::Identifier(identifier(Space::EMPTY, input)?);
    while input.starts_with('.') && starts_with_ident(&input[1..]) {
        '.'.parse_next(input)?;
        let name = identifier(Space::EMPTY, input)?;
        tree = J::FieldAccess(FieldAccess::build(
            Space::EMPTY,
            tree,
            LeftPadded::build(name),
        ));
    }
    Ok(GStringValue::build(tree, Space::EMPTY, false))
}

// ----------------------------------------------------------------------------
// Collections
// ----------------------------------------------------------------------------

enum Element {
    Item(J),
    Entry(Arc<MapEntry>),
}

/// A list or map literal.
fn collection(prefix: Space, input: &mut &str) -> ModalResult<J> {
    if opt("[:]").parse_next(input)?.is_some() {
        return Ok(J::MapLiteral(MapLiteral::build(
            prefix,
            Container::empty(),
            Some(JavaType::class(MAP_TYPE)),
        )));
    }
    '['.parse_next(input)?;

    let mut elements: Vec<RightPadded<Element>> = Vec::new();
    loop {
        let element_prefix = space(input)?;
        if elements.is_empty() && opt(']').parse_next(input)?.is_some() {
            let empty = J::Empty(Empty::build(element_prefix));
            let container = Container::new(
                Space::EMPTY,
                vec![RightPadded::build(empty)],
                Markers::EMPTY,
            );
            return Ok(J::ListLiteral(ListLiteral::build(
                prefix,
                container,
                Some(JavaType::class(LIST_TYPE)),
            )));
        }

        let element = collection_element(element_prefix, input)?;
        let after = space(input)?;
        if opt(',').parse_next(input)?.is_some() {
            let checkpoint = *input;
            let suffix = space(input)?;
            if opt(']').parse_next(input)?.is_some() {
                let markers = Markers::EMPTY.add(TrailingComma::new(suffix));
                elements.push(RightPadded::new(element, after, markers));
                break;
            }
            *input = checkpoint;
            elements.push(RightPadded::new(element, after, Markers::EMPTY));
        } else {
            ']'.parse_next(input)?;
            elements.push(RightPadded::new(element, after, Markers::EMPTY));
            break;
        }
    }

    let is_map = matches!(elements[0].element(), Element::Entry(_));
    if is_map {
        let mut entries = Vec::with_capacity(elements.len());
        for padded in elements {
            let after = padded.after().clone();
            let markers = padded.markers().clone();
            match padded.into_element() {
                Element::Entry(entry) => entries.push(RightPadded::new(entry, after, markers)),
                Element::Item(_) => return Err(ErrMode::from_input(input)),
            }
        }
        let container = Container::new(Space::EMPTY, entries, Markers::EMPTY);
        return Ok(J::MapLiteral(MapLiteral::build(
            prefix,
            container,
            Some(JavaType::class(MAP_TYPE)),
        )));
    }

    let mut items = Vec::with_capacity(elements.len());
    for padded in elements {
        let after = padded.after().clone();
        let markers = padded.markers().clone();
        match padded.into_element() {
            Element::Item(item) => items.push(RightPadded::new(item, after, markers)),
            Element::Entry(_) => return Err(ErrMode::from_input(input)),
        }
    }
    let container = Container::new(Space::EMPTY, items, Markers::EMPTY);
    Ok(J::ListLiteral(ListLiteral::build(
        prefix,
        container,
        Some(JavaType::class(LIST_TYPE)),
    )))
}

/// A list item, or a map entry when a `:` follows the expression.
fn collection_element(prefix: Space, input: &mut &str) -> ModalResult<Element> {
    let key = expression(prefix, input)?;
    let checkpoint = *input;
    let before_colon = space(input)?;
    if opt(':').parse_next(input)?.is_none() {
        *input = checkpoint;
        return Ok(Element::Item(key));
    }
    let value_prefix = space(input)?;
    let value = expression(value_prefix, input)?;
    let entry_prefix = key.prefix().clone();
    let key = RightPadded::new(key.with_prefix(Space::EMPTY), before_colon, Markers::EMPTY);
    Ok(Element::Entry(MapEntry::build(entry_prefix, key, value, None)))
}
