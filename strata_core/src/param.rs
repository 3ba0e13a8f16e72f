// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Token/value parameter lists and the declaration scope.
//!
//! Almost every call on the interface carries a trailing parameter list of
//! `(token, values)` pairs. Tokens are declared ahead of time — either from
//! the standard set every session starts with, or via `declare` — and the
//! declaration tells a backend how to interpret the raw values.
//!
//! Declaration parsing returns a typed [`Result`]; it is the only part of
//! the engine where the caller receives an error value directly rather than
//! through the reporter collaborator.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Storage class of a declared token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StorageClass {
    /// One value for the whole primitive.
    #[default]
    Uniform,
    /// One value, never interpolated.
    Constant,
    /// One value per parametric corner, interpolated.
    Varying,
    /// One value per control vertex.
    Vertex,
    /// One value per facet corner, interpolated within the facet.
    FaceVarying,
}

/// Value type of a declared token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Single float.
    Float,
    /// Single integer.
    Int,
    /// String.
    StringType,
    /// Color (component count follows the option's color samples).
    Color,
    /// 3-D point.
    Point,
    /// 3-D direction vector.
    Vector,
    /// 3-D surface normal.
    Normal,
    /// Homogeneous 4-D point.
    Hpoint,
    /// 4×4 matrix.
    Matrix,
}

/// A parsed token declaration: `[class] type ['[' n ']']`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Declaration {
    /// Storage class (defaults to `uniform` when omitted).
    pub class: StorageClass,
    /// Value type.
    pub ty: ValueType,
    /// Array arity (1 when no `[n]` suffix is present).
    pub arity: u32,
}

/// Failure to parse a declaration string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeclError {
    /// The declaration string was empty.
    #[error("empty declaration")]
    Empty,
    /// The type word was not recognized.
    #[error("unknown declaration type `{0}`")]
    UnknownType(String),
    /// The `[n]` suffix was malformed or zero.
    #[error("malformed array arity in `{0}`")]
    BadArity(String),
    /// Trailing words after the type/arity.
    #[error("trailing tokens in declaration `{0}`")]
    Trailing(String),
    /// `declare` was issued with no active rendering context.
    #[error("no active rendering context")]
    NoContext,
}

impl Declaration {
    /// Parses a declaration string such as `"varying color"` or
    /// `"vertex point[4]"`.
    pub fn parse(decl: &str) -> Result<Self, DeclError> {
        let mut words = decl.split_whitespace();
        let first = words.next().ok_or(DeclError::Empty)?;

        let (class, type_word) = match parse_class(first) {
            Some(class) => {
                let ty = words.next().ok_or(DeclError::Empty)?;
                (class, ty)
            }
            None => (StorageClass::Uniform, first),
        };

        if words.next().is_some() {
            return Err(DeclError::Trailing(decl.to_string()));
        }

        // Split an optional "[n]" suffix off the type word.
        let (type_name, arity) = match type_word.find('[') {
            Some(open) => {
                let inner = type_word[open + 1..]
                    .strip_suffix(']')
                    .ok_or_else(|| DeclError::BadArity(decl.to_string()))?;
                let n: u32 = inner
                    .parse()
                    .map_err(|_| DeclError::BadArity(decl.to_string()))?;
                if n == 0 {
                    return Err(DeclError::BadArity(decl.to_string()));
                }
                (&type_word[..open], n)
            }
            None => (type_word, 1),
        };

        let ty = parse_type(type_name)
            .ok_or_else(|| DeclError::UnknownType(type_name.to_string()))?;

        Ok(Self { class, ty, arity })
    }
}

fn parse_class(word: &str) -> Option<StorageClass> {
    match word {
        "constant" => Some(StorageClass::Constant),
        "uniform" => Some(StorageClass::Uniform),
        "varying" => Some(StorageClass::Varying),
        "vertex" => Some(StorageClass::Vertex),
        "facevarying" => Some(StorageClass::FaceVarying),
        _ => None,
    }
}

fn parse_type(word: &str) -> Option<ValueType> {
    match word {
        "float" => Some(ValueType::Float),
        "int" | "integer" => Some(ValueType::Int),
        "string" => Some(ValueType::StringType),
        "color" => Some(ValueType::Color),
        "point" => Some(ValueType::Point),
        "vector" => Some(ValueType::Vector),
        "normal" => Some(ValueType::Normal),
        "hpoint" => Some(ValueType::Hpoint),
        "matrix" => Some(ValueType::Matrix),
        _ => None,
    }
}

/// Name → declaration map for one session.
///
/// Each session starts from a copy of [`DeclScope::standard`]; `declare`
/// then adds to (or shadows within) the session's own scope only. The
/// standard scope itself is never mutated after creation.
#[derive(Clone, Debug, Default)]
pub struct DeclScope {
    map: BTreeMap<String, Declaration>,
}

impl DeclScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default scope: the standard geometric and shading
    /// tokens every session understands without an explicit `declare`.
    #[must_use]
    pub fn standard() -> Self {
        let mut scope = Self::new();
        let entries: &[(&str, StorageClass, ValueType)] = &[
            ("P", StorageClass::Vertex, ValueType::Point),
            ("Pz", StorageClass::Vertex, ValueType::Float),
            ("Pw", StorageClass::Vertex, ValueType::Hpoint),
            ("N", StorageClass::Varying, ValueType::Normal),
            ("Np", StorageClass::Uniform, ValueType::Normal),
            ("Cs", StorageClass::Varying, ValueType::Color),
            ("Os", StorageClass::Varying, ValueType::Color),
            ("s", StorageClass::Varying, ValueType::Float),
            ("t", StorageClass::Varying, ValueType::Float),
            ("intensity", StorageClass::Uniform, ValueType::Float),
            ("lightcolor", StorageClass::Uniform, ValueType::Color),
            ("from", StorageClass::Uniform, ValueType::Point),
            ("to", StorageClass::Uniform, ValueType::Point),
            ("coneangle", StorageClass::Uniform, ValueType::Float),
            ("conedeltaangle", StorageClass::Uniform, ValueType::Float),
            ("Ka", StorageClass::Uniform, ValueType::Float),
            ("Kd", StorageClass::Uniform, ValueType::Float),
            ("Ks", StorageClass::Uniform, ValueType::Float),
            ("roughness", StorageClass::Uniform, ValueType::Float),
            ("fov", StorageClass::Uniform, ValueType::Float),
        ];
        for (name, class, ty) in entries {
            scope.map.insert(
                (*name).to_string(),
                Declaration {
                    class: *class,
                    ty: *ty,
                    arity: 1,
                },
            );
        }
        scope.map.insert(
            "st".to_string(),
            Declaration {
                class: StorageClass::Varying,
                ty: ValueType::Float,
                arity: 2,
            },
        );
        scope.map.insert(
            "origin".to_string(),
            Declaration {
                class: StorageClass::Uniform,
                ty: ValueType::Int,
                arity: 2,
            },
        );
        scope
    }

    /// Parses `decl` and binds it to `name` in this scope.
    pub fn declare(&mut self, name: &str, decl: &str) -> Result<Declaration, DeclError> {
        let parsed = Declaration::parse(decl)?;
        self.map.insert(name.to_string(), parsed);
        Ok(parsed)
    }

    /// Looks up a declared token.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Declaration> {
        self.map.get(name).copied()
    }

    /// Number of declared tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the scope is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The values carried by one parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Floating-point data.
    Floats(Vec<f64>),
    /// Integer data.
    Ints(Vec<i32>),
    /// String data.
    Strings(Vec<String>),
}

impl ParamValue {
    /// Number of raw values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Floats(v) => v.len(),
            Self::Ints(v) => v.len(),
            Self::Strings(v) => v.len(),
        }
    }

    /// Whether there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One `(token, values)` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Declared token name.
    pub name: String,
    /// Raw values.
    pub value: ParamValue,
}

impl Param {
    /// Convenience constructor for float data.
    #[must_use]
    pub fn floats(name: &str, values: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            value: ParamValue::Floats(values.to_vec()),
        }
    }

    /// Convenience constructor for integer data.
    #[must_use]
    pub fn ints(name: &str, values: &[i32]) -> Self {
        Self {
            name: name.to_string(),
            value: ParamValue::Ints(values.to_vec()),
        }
    }

    /// Convenience constructor for string data.
    #[must_use]
    pub fn strings(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            value: ParamValue::Strings(values.iter().map(|s| (*s).to_string()).collect()),
        }
    }
}

/// An ordered parameter list.
pub type ParamList = Vec<Param>;

/// Finds a parameter by token name.
#[must_use]
pub fn find<'a>(params: &'a [Param], name: &str) -> Option<&'a ParamValue> {
    params.iter().find(|p| p.name == name).map(|p| &p.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_type_defaults_to_uniform() {
        let d = Declaration::parse("float").unwrap();
        assert_eq!(d.class, StorageClass::Uniform);
        assert_eq!(d.ty, ValueType::Float);
        assert_eq!(d.arity, 1);
    }

    #[test]
    fn parse_class_type_arity() {
        let d = Declaration::parse("vertex point[4]").unwrap();
        assert_eq!(d.class, StorageClass::Vertex);
        assert_eq!(d.ty, ValueType::Point);
        assert_eq!(d.arity, 4);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Declaration::parse(""), Err(DeclError::Empty));
        assert!(matches!(
            Declaration::parse("varying blob"),
            Err(DeclError::UnknownType(_))
        ));
        assert!(matches!(
            Declaration::parse("float[0]"),
            Err(DeclError::BadArity(_))
        ));
        assert!(matches!(
            Declaration::parse("float[3"),
            Err(DeclError::BadArity(_))
        ));
        assert!(matches!(
            Declaration::parse("uniform float extra"),
            Err(DeclError::Trailing(_))
        ));
    }

    #[test]
    fn standard_scope_has_geometric_tokens() {
        let scope = DeclScope::standard();
        let p = scope.lookup("P").unwrap();
        assert_eq!(p.class, StorageClass::Vertex);
        assert_eq!(p.ty, ValueType::Point);
        let st = scope.lookup("st").unwrap();
        assert_eq!(st.arity, 2);
        assert!(scope.lookup("madeup").is_none());
    }

    #[test]
    fn declare_shadows_per_scope() {
        let mut a = DeclScope::standard();
        let b = a.clone();
        a.declare("temperature", "varying float").unwrap();
        assert!(a.lookup("temperature").is_some());
        assert!(b.lookup("temperature").is_none());
    }

    #[test]
    fn find_locates_params() {
        let params = alloc::vec![
            Param::floats("intensity", &[0.5]),
            Param::strings("texturename", &["grid.tx"]),
        ];
        assert_eq!(
            find(&params, "intensity"),
            Some(&ParamValue::Floats(alloc::vec![0.5]))
        );
        assert!(find(&params, "absent").is_none());
    }
}
