//! Signature parsing.
//!
//! ```text
//! Ctor      := QualifiedName '(' [ParamList] ')'
//! Method    := QualifiedName '.' MemberName '(' [ParamList] ')'
//! ParamList := ParamType (',' ParamType)*
//! ParamType := PrimitiveKeyword | ParamType '[]' | QualifiedName
//! ```
//!
//! Whitespace around commas and around the whole parameter list is ignored.
//! A missing parenthesis is a caller error, reported rather than treated as
//! "not found".

pub mod descriptor;

use crate::base::constants::PARAM_SEPARATOR;
use crate::error::{ReflectError, Result};

pub use descriptor::{ParamType, array_descriptor, descriptor_for, type_name_for};

/// A parsed constructor or method signature borrowing the caller's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature<'a> {
    text: &'a str,
    owner: &'a str,
    member: Option<&'a str>,
    params: &'a str,
}

impl<'a> Signature<'a> {
    /// Parse `pkg.Type(params)`.
    pub fn parse_constructor(text: &'a str) -> Result<Self> {
        let (open, close) = parentheses(text)?;
        Ok(Self {
            text,
            owner: text[..open].trim(),
            member: None,
            params: &text[open + 1..close],
        })
    }

    /// Parse `pkg.Type.member(params)`; the member name follows the last `.`
    /// before the opening parenthesis.
    pub fn parse_method(text: &'a str) -> Result<Self> {
        let (open, close) = parentheses(text)?;
        let qualifier = &text[..open];
        let dot = qualifier
            .rfind('.')
            .ok_or_else(|| ReflectError::missing_member_name(text))?;
        Ok(Self {
            text,
            owner: qualifier[..dot].trim(),
            member: Some(qualifier[dot + 1..].trim()),
            params: &text[open + 1..close],
        })
    }

    /// The full signature as supplied.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Qualified name of the owning type.
    pub fn owner(&self) -> &'a str {
        self.owner
    }

    /// Member name; `None` for constructor signatures.
    pub fn member(&self) -> Option<&'a str> {
        self.member
    }

    pub fn is_constructor(&self) -> bool {
        self.member.is_none()
    }

    /// True when the parameter list is empty or whitespace.
    pub fn has_no_params(&self) -> bool {
        self.params.trim().is_empty()
    }

    /// Trimmed parameter tokens in declaration order.
    pub fn param_tokens(&self) -> impl Iterator<Item = &'a str> + 'a {
        let list = self.params.trim();
        (!list.is_empty())
            .then(|| list.split(PARAM_SEPARATOR).map(str::trim))
            .into_iter()
            .flatten()
    }

    /// Classify every parameter token.
    ///
    /// All tokens are validated before any is resolved, so a malformed token
    /// is reported even when an earlier one would not resolve.
    pub fn param_types(&self) -> Result<Vec<ParamType<'a>>> {
        self.param_tokens().map(ParamType::parse).collect()
    }
}

/// Byte offsets of the first `(` and the first `)` after it.
fn parentheses(text: &str) -> Result<(usize, usize)> {
    let open = text
        .find('(')
        .ok_or_else(|| ReflectError::missing_parenthesis(text, '('))?;
    let close = text[open..]
        .find(')')
        .map(|offset| open + offset)
        .ok_or_else(|| ReflectError::missing_parenthesis(text, ')'))?;
    Ok((open, close))
}
