//! Expression lowering: literal resolution, operators, and calls.

use inkwell::values::BasicValueEnum;
use inkwell::{FloatPredicate, IntPredicate};

use lime_par::{CallExpression, Expression, InfixExpression, PostfixExpression, PrefixExpression};

use crate::environment::Binding;
use crate::types::LimeType;

use super::CodeGen;

impl<'ctx> CodeGen<'ctx> {
    /// Resolves an expression to its `(value, type)` pair. This is the one
    /// place every expression variant funnels through, which is what lets
    /// the printf builtin (see `lower_call_expression`) reuse an argument's
    /// already-resolved value instead of re-deriving it from module state.
    pub(super) fn resolve_value(&mut self, expr: &Expression) -> (BasicValueEnum<'ctx>, LimeType) {
        match expr {
            Expression::Integer(lit) => (
                self.types
                    .basic_type(LimeType::Int)
                    .into_int_type()
                    .const_int(lit.value as u64, true)
                    .into(),
                LimeType::Int,
            ),
            Expression::Float(lit) => (
                self.types
                    .basic_type(LimeType::Float)
                    .into_float_type()
                    .const_float(lit.value)
                    .into(),
                LimeType::Float,
            ),
            Expression::Boolean(lit) => (
                self.types
                    .basic_type(LimeType::Bool)
                    .into_int_type()
                    .const_int(lit.value as u64, false)
                    .into(),
                LimeType::Bool,
            ),
            Expression::String(lit) => self.intern_string(&lit.value),
            Expression::Identifier(ident) => match self.env.lookup(&ident.value) {
                Some(Binding::Local { ptr, ty }) => {
                    let loaded = self
                        .builder
                        .build_load(self.types.basic_type(ty), ptr, &ident.value)
                        .unwrap();
                    (loaded, ty)
                }
                Some(Binding::Function { .. }) => {
                    self.push_error(format!("`{}` names a function, not a value", ident.value));
                    (self.undef(LimeType::Int), LimeType::Int)
                }
                None => {
                    self.push_error(format!("undeclared identifier `{}`", ident.value));
                    (self.undef(LimeType::Int), LimeType::Int)
                }
            },
            Expression::Infix(infix) => self.lower_infix_expression(infix),
            Expression::Prefix(prefix) => self.lower_prefix_expression(prefix),
            Expression::Postfix(postfix) => self.lower_postfix_expression(postfix),
            Expression::Call(call) => self.lower_call_expression(call),
        }
    }

    fn undef(&self, ty: LimeType) -> BasicValueEnum<'ctx> {
        self.types.basic_type(ty).const_zero()
    }

    fn lower_infix_expression(&mut self, infix: &InfixExpression) -> (BasicValueEnum<'ctx>, LimeType) {
        let left = self.resolve_value(&infix.left);
        let right = self.resolve_value(&infix.right);
        let ((left, left_ty), (right, right_ty)) = self.promote_numeric(left, right);

        if left_ty.is_int() && right_ty.is_int() {
            let l = left.into_int_value();
            let r = right.into_int_value();
            return match infix.operator.as_str() {
                "+" => (self.builder.build_int_add(l, r, "add").unwrap().into(), LimeType::Int),
                "-" => (self.builder.build_int_sub(l, r, "sub").unwrap().into(), LimeType::Int),
                "*" => (self.builder.build_int_mul(l, r, "mul").unwrap().into(), LimeType::Int),
                "/" => (self.builder.build_int_signed_div(l, r, "div").unwrap().into(), LimeType::Int),
                "%" => (self.builder.build_int_signed_rem(l, r, "rem").unwrap().into(), LimeType::Int),
                "^" => {
                    self.push_error("operator `^` is not implemented");
                    (self.undef(LimeType::Int), LimeType::Int)
                }
                op @ ("<" | "<=" | ">" | ">=" | "==" | "!=") => {
                    let predicate = int_predicate(op);
                    (
                        self.builder.build_int_compare(predicate, l, r, "cmp").unwrap().into(),
                        LimeType::Bool,
                    )
                }
                other => {
                    self.push_error(format!("unsupported operator `{other}`"));
                    (self.undef(LimeType::Int), LimeType::Int)
                }
            };
        }

        if left_ty.is_float() && right_ty.is_float() {
            let l = left.into_float_value();
            let r = right.into_float_value();
            return match infix.operator.as_str() {
                "+" => (self.builder.build_float_add(l, r, "fadd").unwrap().into(), LimeType::Float),
                "-" => (self.builder.build_float_sub(l, r, "fsub").unwrap().into(), LimeType::Float),
                "*" => (self.builder.build_float_mul(l, r, "fmul").unwrap().into(), LimeType::Float),
                "/" => (self.builder.build_float_div(l, r, "fdiv").unwrap().into(), LimeType::Float),
                "%" => (self.builder.build_float_rem(l, r, "frem").unwrap().into(), LimeType::Float),
                "^" => {
                    self.push_error("operator `^` is not implemented");
                    (self.undef(LimeType::Float), LimeType::Float)
                }
                op @ ("<" | "<=" | ">" | ">=" | "==" | "!=") => {
                    let predicate = float_predicate(op);
                    (
                        self.builder.build_float_compare(predicate, l, r, "fcmp").unwrap().into(),
                        LimeType::Bool,
                    )
                }
                other => {
                    self.push_error(format!("unsupported operator `{other}`"));
                    (self.undef(LimeType::Float), LimeType::Float)
                }
            };
        }

        self.push_error(format!(
            "infix operator `{}` is not supported between these operand types",
            infix.operator
        ));
        (self.undef(LimeType::Int), LimeType::Int)
    }

    fn lower_prefix_expression(&mut self, prefix: &PrefixExpression) -> (BasicValueEnum<'ctx>, LimeType) {
        let (right, right_ty) = self.resolve_value(&prefix.right);

        match (prefix.operator.as_str(), right_ty) {
            ("-", LimeType::Float) => {
                let minus_one = self.context.f32_type().const_float(-1.0);
                (
                    self.builder.build_float_mul(right.into_float_value(), minus_one, "fneg").unwrap().into(),
                    LimeType::Float,
                )
            }
            ("-", _) => {
                let minus_one = self.context.i32_type().const_int((-1i64) as u64, true);
                (
                    self.builder.build_int_mul(right.into_int_value(), minus_one, "neg").unwrap().into(),
                    LimeType::Int,
                )
            }
            ("!", LimeType::Float) => {
                self.push_error("`!` is not supported on a float operand");
                (self.undef(LimeType::Bool), LimeType::Bool)
            }
            ("!", _) => (
                self.builder.build_not(right.into_int_value(), "not").unwrap().into(),
                right_ty,
            ),
            (other, _) => {
                self.push_error(format!("unsupported prefix operator `{other}`"));
                (self.undef(LimeType::Int), LimeType::Int)
            }
        }
    }

    fn lower_postfix_expression(&mut self, postfix: &PostfixExpression) -> (BasicValueEnum<'ctx>, LimeType) {
        let Expression::Identifier(ident) = postfix.left.as_ref() else {
            self.push_error("postfix operators require an identifier operand");
            return (self.undef(LimeType::Int), LimeType::Int);
        };

        let Some(Binding::Local { ptr, ty }) = self.env.lookup(&ident.value) else {
            self.push_error(format!(
                "identifier `{}` has not been declared before it was used in a postfix expression",
                ident.value
            ));
            return (self.undef(LimeType::Int), LimeType::Int);
        };

        let orig = self.builder.build_load(self.types.basic_type(ty), ptr, "orig").unwrap();

        let value: BasicValueEnum<'ctx> = match (postfix.operator.as_str(), ty) {
            ("++", LimeType::Int) => {
                let one = self.context.i32_type().const_int(1, false);
                self.builder.build_int_add(orig.into_int_value(), one, "inc").unwrap().into()
            }
            ("++", LimeType::Float) => {
                let one = self.context.f32_type().const_float(1.0);
                self.builder.build_float_add(orig.into_float_value(), one, "finc").unwrap().into()
            }
            ("--", LimeType::Int) => {
                let one = self.context.i32_type().const_int(1, false);
                self.builder.build_int_sub(orig.into_int_value(), one, "dec").unwrap().into()
            }
            ("--", LimeType::Float) => {
                let one = self.context.f32_type().const_float(1.0);
                self.builder.build_float_sub(orig.into_float_value(), one, "fdec").unwrap().into()
            }
            (other, _) => {
                self.push_error(format!("unsupported postfix operator `{other}`"));
                return (self.undef(LimeType::Int), LimeType::Int);
            }
        };

        let _ = self.builder.build_store(ptr, value);
        (value, ty)
    }

    fn lower_call_expression(&mut self, call: &CallExpression) -> (BasicValueEnum<'ctx>, LimeType) {
        let Expression::Identifier(callee) = call.function.as_ref() else {
            self.push_error("call target must be a plain identifier");
            return (self.undef(LimeType::Int), LimeType::Int);
        };

        let args: Vec<(BasicValueEnum<'ctx>, LimeType)> =
            call.arguments.iter().map(|arg| self.resolve_value(arg)).collect();

        if callee.value == "printf" {
            return self.lower_printf_call(&args);
        }

        let Some(Binding::Function { value, return_type, .. }) = self.env.lookup(&callee.value) else {
            self.push_error(format!("call to unknown function `{}`", callee.value));
            return (self.undef(LimeType::Int), LimeType::Int);
        };

        let arg_values: Vec<_> = args.iter().map(|(v, _)| (*v).into()).collect();
        let call_site = self.builder.build_call(value, &arg_values, "call").unwrap();

        match return_type {
            Some(ret_ty) => (
                call_site.try_as_basic_value().left().expect("non-void call has a value"),
                ret_ty,
            ),
            None => (self.undef(LimeType::Int), LimeType::Int),
        }
    }

    /// `printf(fmt, args...)`. The format argument's resolved value is
    /// already the right pointer shape regardless of whether it came from
    /// an `IdentifierLiteral` (a load of a `str` slot) or a fresh
    /// `StringLiteral` (the interned global's address) — both paths run
    /// through `resolve_value` above, so there is no need to re-derive the
    /// format source from module state the way the reference does by
    /// re-reading the most recently allocated `__str_<counter>` global.
    fn lower_printf_call(&mut self, args: &[(BasicValueEnum<'ctx>, LimeType)]) -> (BasicValueEnum<'ctx>, LimeType) {
        let Some((fmt, _)) = args.first() else {
            self.push_error("`printf` requires a format argument");
            return (self.undef(LimeType::Int), LimeType::Int);
        };

        let Some(Binding::Function { value: printf, .. }) = self.env.lookup("printf") else {
            unreachable!("printf is always registered by register_builtins");
        };

        let mut call_args: Vec<inkwell::values::BasicMetadataValueEnum<'ctx>> = vec![(*fmt).into()];
        call_args.extend(args[1..].iter().map(|(v, _)| (*v).into()));

        let call_site = self.builder.build_call(printf, &call_args, "printf_call").unwrap();
        (
            call_site.try_as_basic_value().left().expect("printf returns i32"),
            LimeType::Int,
        )
    }

    /// Interns a string literal as an `internal`, `constant` global array
    /// of `i8`, matching the reference's `__str_N` naming and its `\n` →
    /// newline-plus-NUL escape handling, plus a trailing NUL.
    fn intern_string(&mut self, raw: &str) -> (BasicValueEnum<'ctx>, LimeType) {
        let mut bytes = Vec::with_capacity(raw.len() + 1);
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' && chars.peek() == Some(&'n') {
                chars.next();
                bytes.push(b'\n');
                bytes.push(0);
            } else {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
        bytes.push(0);

        let i8_type = self.context.i8_type();
        let const_bytes: Vec<_> = bytes.iter().map(|b| i8_type.const_int(*b as u64, false)).collect();
        let array_ty = i8_type.array_type(const_bytes.len() as u32);
        let initializer = i8_type.const_array(&const_bytes);

        let name = self.fresh_name("__str");
        let global = self.module.add_global(array_ty, None, &name);
        global.set_linkage(inkwell::module::Linkage::Internal);
        global.set_constant(true);
        global.set_initializer(&initializer);

        (global.as_pointer_value().into(), LimeType::Str)
    }
}

fn int_predicate(op: &str) -> IntPredicate {
    match op {
        "<" => IntPredicate::SLT,
        "<=" => IntPredicate::SLE,
        ">" => IntPredicate::SGT,
        ">=" => IntPredicate::SGE,
        "==" => IntPredicate::EQ,
        "!=" => IntPredicate::NE,
        other => unreachable!("not a comparison operator: {other}"),
    }
}

fn float_predicate(op: &str) -> FloatPredicate {
    match op {
        "<" => FloatPredicate::OLT,
        "<=" => FloatPredicate::OLE,
        ">" => FloatPredicate::OGT,
        ">=" => FloatPredicate::OGE,
        "==" => FloatPredicate::OEQ,
        "!=" => FloatPredicate::ONE,
        other => unreachable!("not a comparison operator: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell::context::Context;
    use lime_par::Parser;

    fn lower<'ctx>(context: &'ctx Context, source: &str) -> super::CodeGen<'ctx> {
        let mut parser = Parser::from_source(source);
        let program = parser.parse_program();
        assert!(parser.errors.is_empty(), "parse errors: {:?}", parser.errors);
        let mut codegen = super::CodeGen::new(context);
        codegen.compile_program(&program);
        codegen
    }

    #[test]
    fn string_interning_produces_distinct_globals_for_repeated_literals() {
        let context = Context::create();
        let codegen = lower(
            &context,
            r#"fn main() -> int { printf("hi"); printf("hi"); return 0; }"#,
        );
        assert!(codegen.errors().is_empty(), "{:?}", codegen.errors());
        let ir = codegen.emit_ir();
        assert!(ir.contains("__str_1"));
        assert!(ir.contains("__str_2"));
    }

    #[test]
    fn exponent_operator_is_rejected_as_not_implemented() {
        let context = Context::create();
        let codegen = lower(&context, "fn main() -> int { return 2 ^ 3; }");
        assert!(codegen.errors().iter().any(|e| e.contains("not implemented")));
    }

    #[test]
    fn bang_on_float_is_a_codegen_error() {
        let context = Context::create();
        let codegen = lower(&context, "fn main() -> int { let x: float = 1.0; return !x; }");
        assert!(codegen.errors().iter().any(|e| e.contains("float")));
    }

    #[test]
    fn mixed_int_float_addition_promotes_the_int_side() {
        let context = Context::create();
        let codegen = lower(
            &context,
            "fn main() -> int { let a: float = 1.5; let b: int = 2; let c: float = a + b; return 0; }",
        );
        assert!(codegen.errors().is_empty(), "{:?}", codegen.errors());
        assert!(codegen.emit_ir().contains("sitofp"));
    }
}
