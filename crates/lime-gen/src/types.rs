//! Type mapping between Lime's five surface types and LLVM IR types.
//!
//! Unlike the AST's `value_type`/`return_type` fields (plain strings taken
//! straight from the `TYPE` token literal), codegen needs to reason about
//! types structurally: is this operand numeric, is it the pointer-shaped
//! `str`, does this function return anything at all. `LimeType` is that
//! structural form; `TypeMapper` is the one place that knows how each
//! variant is represented in LLVM.

use inkwell::context::Context;
use inkwell::types::BasicTypeEnum;
use inkwell::AddressSpace;

/// One of Lime's five surface types, resolved from a `TYPE` token's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimeType {
    Int,
    Float,
    Bool,
    Void,
    Str,
}

impl LimeType {
    /// Parses a type keyword's literal text (`"int"`, `"float"`, ...).
    /// Returns `None` for anything else; the parser already guarantees
    /// `LetStatement.value_type`/`FunctionParameter.value_type` are one of
    /// the five keywords, so a `None` here indicates a malformed AST.
    pub fn from_keyword(text: &str) -> Option<Self> {
        Some(match text {
            "int" => LimeType::Int,
            "float" => LimeType::Float,
            "bool" => LimeType::Bool,
            "void" => LimeType::Void,
            "str" => LimeType::Str,
            _ => return None,
        })
    }

    pub fn is_int(self) -> bool {
        matches!(self, LimeType::Int)
    }

    pub fn is_float(self) -> bool {
        matches!(self, LimeType::Float)
    }
}

/// Maps `LimeType`s to the LLVM types codegen actually builds with.
pub struct TypeMapper<'ctx> {
    context: &'ctx Context,
}

impl<'ctx> TypeMapper<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }

    /// The LLVM representation of a `LimeType` that can appear as a value
    /// (i.e. everything but `void`, which has no `BasicTypeEnum`).
    pub fn basic_type(&self, ty: LimeType) -> BasicTypeEnum<'ctx> {
        match ty {
            LimeType::Int => self.context.i32_type().into(),
            LimeType::Float => self.context.f32_type().into(),
            LimeType::Bool => self.context.bool_type().into(),
            LimeType::Str => self.context.ptr_type(AddressSpace::default()).into(),
            LimeType::Void => unreachable!("void has no BasicTypeEnum; check for Void before calling basic_type"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_type_keyword() {
        assert_eq!(LimeType::from_keyword("int"), Some(LimeType::Int));
        assert_eq!(LimeType::from_keyword("float"), Some(LimeType::Float));
        assert_eq!(LimeType::from_keyword("bool"), Some(LimeType::Bool));
        assert_eq!(LimeType::from_keyword("void"), Some(LimeType::Void));
        assert_eq!(LimeType::from_keyword("str"), Some(LimeType::Str));
    }

    #[test]
    fn rejects_unknown_text() {
        assert_eq!(LimeType::from_keyword("double"), None);
    }

    #[test]
    fn basic_type_maps_int_to_32_bits() {
        let context = Context::create();
        let mapper = TypeMapper::new(&context);
        let BasicTypeEnum::IntType(int_ty) = mapper.basic_type(LimeType::Int) else {
            panic!("expected int type");
        };
        assert_eq!(int_ty.get_bit_width(), 32);
    }

    #[test]
    fn basic_type_maps_bool_to_1_bit() {
        let context = Context::create();
        let mapper = TypeMapper::new(&context);
        let BasicTypeEnum::IntType(int_ty) = mapper.basic_type(LimeType::Bool) else {
            panic!("expected int type");
        };
        assert_eq!(int_ty.get_bit_width(), 1);
    }
}
