//! Function prototypes and definitions.

use crate::{Expr, Name};

/// A function's name and parameter list, independent of whether a body
/// exists.
///
/// Identity for redefinition purposes is `(name, arity)`. Parameter names
/// within one prototype are pairwise distinct — a well-formedness
/// obligation on the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    pub name: Name,
    pub params: Vec<Name>,
}

impl Prototype {
    pub fn new(name: Name, params: Vec<Name>) -> Self {
        Prototype { name, params }
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A function definition, or an extern/forward declaration when `body`
/// is absent.
#[derive(Debug, PartialEq)]
pub struct Function {
    pub proto: Prototype,
    pub body: Option<Expr>,
}

impl Function {
    pub fn new(proto: Prototype, body: Expr) -> Self {
        Function {
            proto,
            body: Some(body),
        }
    }

    /// An extern declaration: a prototype with no body.
    pub fn extern_decl(proto: Prototype) -> Self {
        Function { proto, body: None }
    }

    /// True if this is a body-less extern/forward declaration.
    pub fn is_extern(&self) -> bool {
        self.body.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_counts_params() {
        let proto = Prototype::new(Name::from_raw(1), vec![Name::from_raw(2), Name::from_raw(3)]);
        assert_eq!(proto.arity(), 2);
    }

    #[test]
    fn extern_has_no_body() {
        let proto = Prototype::new(Name::from_raw(1), vec![]);
        let f = Function::extern_decl(proto.clone());
        assert!(f.is_extern());
        let g = Function::new(proto, Expr::Number(0.0));
        assert!(!g.is_extern());
    }
}
