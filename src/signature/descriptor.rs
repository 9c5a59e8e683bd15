//! Parameter token classification and type descriptor encoding.
//!
//! A parameter token is a primitive keyword, a qualified reference type name,
//! or either of those followed by one to three `[]`. Arrays are resolved
//! through their descriptor, the same name-based lookup plain types use:
//!
//! ```text
//! int         -> primitive handle (no lookup)
//! int[][]     -> "[[I"
//! pkg.Part[]  -> "[Lpkg.Part;"
//! pkg.Part    -> "pkg.Part"
//! ```

use smol_str::SmolStr;

use crate::base::constants::{ARRAY_DESCRIPTOR_PREFIX, ARRAY_SUFFIX, MAX_ARRAY_DIMENSIONS};
use crate::error::{ReflectError, Result};
use crate::host::{Primitive, TypeHandle};

/// A classified parameter token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType<'a> {
    Primitive(Primitive),
    Array { element: &'a str, dimensions: usize },
    Reference(&'a str),
}

impl<'a> ParamType<'a> {
    /// Classify a token, trimming surrounding whitespace.
    ///
    /// More than [`MAX_ARRAY_DIMENSIONS`] `[]` suffixes is an error.
    pub fn parse(token: &'a str) -> Result<Self> {
        let token = token.trim();
        let mut element = token;
        let mut dimensions = 0;
        while let Some(stripped) = element.strip_suffix(ARRAY_SUFFIX) {
            element = stripped;
            dimensions += 1;
        }
        if dimensions > MAX_ARRAY_DIMENSIONS {
            return Err(ReflectError::array_dimension(token, dimensions));
        }

        Ok(if dimensions > 0 {
            Self::Array {
                element,
                dimensions,
            }
        } else if let Some(primitive) = Primitive::from_keyword(token) {
            Self::Primitive(primitive)
        } else {
            Self::Reference(token)
        })
    }

    /// The name this parameter is looked up under, `None` for primitives.
    pub fn lookup_name(&self) -> Option<String> {
        match *self {
            Self::Primitive(_) => None,
            Self::Array {
                element,
                dimensions,
            } => Some(array_descriptor(element, dimensions)),
            Self::Reference(name) => Some(name.to_string()),
        }
    }

    /// Resolve to a handle; primitives map to their dedicated handles,
    /// everything else goes through `lookup`.
    pub fn resolve(&self, lookup: impl FnOnce(&str) -> Option<TypeHandle>) -> Option<TypeHandle> {
        match *self {
            Self::Primitive(primitive) => Some(primitive.handle()),
            Self::Array {
                element,
                dimensions,
            } => lookup(&array_descriptor(element, dimensions)),
            Self::Reference(name) => lookup(name),
        }
    }

    /// Canonical type name: keyword, array descriptor or qualified name.
    pub fn canonical_name(&self) -> SmolStr {
        match *self {
            Self::Primitive(primitive) => SmolStr::new_static(primitive.keyword()),
            _ => self.lookup_name().map(SmolStr::from).unwrap_or_default(),
        }
    }
}

/// Descriptor of an array element: `Z B C S I J F D` or `L<name>;`.
pub fn descriptor_for(element: &str) -> String {
    match Primitive::from_keyword(element) {
        Some(primitive) => primitive.descriptor().to_string(),
        None => format!("L{element};"),
    }
}

/// Descriptor of a `dimensions`-dimensional array of `element`.
pub fn array_descriptor(element: &str, dimensions: usize) -> String {
    let element = descriptor_for(element);
    let mut descriptor = String::with_capacity(dimensions + element.len());
    descriptor.extend(std::iter::repeat_n(ARRAY_DESCRIPTOR_PREFIX, dimensions));
    descriptor.push_str(&element);
    descriptor
}

/// Canonical type name for a parameter token.
pub fn type_name_for(token: &str) -> Result<SmolStr> {
    ParamType::parse(token).map(|param| param.canonical_name())
}
