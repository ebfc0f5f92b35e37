//! Statement lowering.

use inkwell::types::BasicType;
use inkwell::values::BasicValue;

use lime_par::{
    AssignStatement, BlockStatement, ForStatement, FunctionStatement, IfStatement, ImportStatement,
    LetStatement, Program, Statement, WhileStatement,
};
use lime_par::Parser;

use crate::environment::Binding;
use crate::types::LimeType;

use super::CodeGen;

impl<'ctx> CodeGen<'ctx> {
    /// Lowers a whole program into the current module. Public entry point;
    /// also used recursively by `ImportStatement` to inline an imported
    /// file's statements into the same module.
    pub fn compile_program(&mut self, program: &Program) {
        for stmt in &program.statements {
            self.compile_statement(stmt);
        }
    }

    fn compile_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Expression(s) => self.compile_expression(&s.expr),
            Statement::Let(s) => self.compile_let_statement(s),
            Statement::Function(s) => self.compile_function_statement(s),
            Statement::Block(s) => self.compile_block_statement(s),
            Statement::Return(s) => {
                // Pointer-typed (`str`) returns need no special handling
                // here: opaque pointers mean the resolved value is already
                // the bare address the reference's legacy gep-to-array
                // path was reaching for.
                let (value, _ty) = self.resolve_value(&s.return_value);
                self.build_return(Some(&value));
            }
            Statement::Assign(s) => self.compile_assign_statement(s),
            Statement::If(s) => self.compile_if_statement(s),
            Statement::While(s) => self.compile_while_statement(s),
            Statement::Break(_) => self.compile_break_statement(),
            Statement::Continue(_) => self.compile_continue_statement(),
            Statement::For(s) => self.compile_for_statement(s),
            Statement::Import(s) => self.compile_import_statement(s),
        }
    }

    fn compile_expression(&mut self, expr: &lime_par::Expression) {
        self.resolve_value(expr);
    }

    fn compile_let_statement(&mut self, stmt: &LetStatement) {
        let (value, ty) = self.resolve_value(&stmt.value);

        match self.env.lookup(&stmt.name) {
            Some(Binding::Local { ptr, .. }) => {
                let _ = self.builder.build_store(ptr, value);
            }
            _ => {
                let basic_ty = self.types.basic_type(ty);
                let ptr = match self.builder.build_alloca(basic_ty, &stmt.name) {
                    Ok(ptr) => ptr,
                    Err(_) => {
                        self.push_error(format!("failed to allocate local `{}`", stmt.name));
                        return;
                    }
                };
                let _ = self.builder.build_store(ptr, value);
                self.env.define(stmt.name.clone(), Binding::Local { ptr, ty });
            }
        }
    }

    fn compile_function_statement(&mut self, stmt: &FunctionStatement) {
        if self.in_function {
            self.push_error(format!(
                "nested function definition `{}` is not supported",
                stmt.name
            ));
            return;
        }

        let param_types: Vec<LimeType> = stmt
            .parameters
            .iter()
            .filter_map(|p| LimeType::from_keyword(&p.value_type))
            .collect();
        if param_types.len() != stmt.parameters.len() {
            self.push_error(format!(
                "function `{}` has a parameter with an unknown type",
                stmt.name
            ));
            return;
        }

        let Some(return_lime_type) = LimeType::from_keyword(&stmt.return_type) else {
            self.push_error(format!(
                "function `{}` has an unknown return type `{}`",
                stmt.name, stmt.return_type
            ));
            return;
        };

        let llvm_param_types: Vec<_> = param_types
            .iter()
            .map(|t| self.types.basic_type(*t).into())
            .collect();
        let fn_type = match return_lime_type {
            LimeType::Void => self.context.void_type().fn_type(&llvm_param_types, false),
            other => self.types.basic_type(other).fn_type(&llvm_param_types, false),
        };

        let function = self.module.add_function(&stmt.name, fn_type, None);
        let return_type = (return_lime_type != LimeType::Void).then_some(return_lime_type);

        // Bind the function in the enclosing scope before lowering the
        // body and before entering the child scope, so a sibling function
        // defined earlier can already see it, and so it still resolves
        // after the child scope is torn down (self-reference, per
        // `spec.md` §4.5 FunctionStatement step 4).
        self.env.define(
            stmt.name.clone(),
            Binding::Function {
                value: function,
                param_types: param_types.clone(),
                return_type,
            },
        );

        let entry = self.context.append_basic_block(function, &format!("{}_entry", stmt.name));
        let previous_block = self.builder.get_insert_block();
        self.builder.position_at_end(entry);

        self.push_scope();
        self.in_function = true;

        for (i, param) in stmt.parameters.iter().enumerate() {
            let llvm_ty = self.types.basic_type(param_types[i]);
            let ptr = match self.builder.build_alloca(llvm_ty, &param.name) {
                Ok(ptr) => ptr,
                Err(_) => {
                    self.push_error(format!("failed to allocate parameter `{}`", param.name));
                    continue;
                }
            };
            let arg = function.get_nth_param(i as u32).expect("parameter count mismatch");
            let _ = self.builder.build_store(ptr, arg);
            self.env.define(
                param.name.clone(),
                Binding::Local {
                    ptr,
                    ty: param_types[i],
                },
            );
        }

        // Bind the function under its own name inside its own scope too,
        // so a recursive call resolves without walking past the parameter
        // frame.
        self.env.define(
            stmt.name.clone(),
            Binding::Function {
                value: function,
                param_types: param_types.clone(),
                return_type,
            },
        );

        self.compile_block_statement(&stmt.body);

        if return_type.is_none() {
            self.build_return(None);
        }

        self.in_function = false;
        self.pop_scope();

        if let Some(block) = previous_block {
            self.builder.position_at_end(block);
        }
    }

    fn compile_block_statement(&mut self, block: &BlockStatement) {
        for stmt in &block.statements {
            self.compile_statement(stmt);
        }
    }

    fn compile_assign_statement(&mut self, stmt: &AssignStatement) {
        let Some(Binding::Local { ptr, ty: target_ty }) = self.env.lookup(&stmt.name) else {
            self.push_error(format!(
                "identifier `{}` has not been declared before it was re-assigned",
                stmt.name
            ));
            return;
        };

        let (rhs, rhs_ty) = self.resolve_value(&stmt.value);
        let orig = self.builder.build_load(self.types.basic_type(target_ty), ptr, "orig").unwrap();

        let ((lhs, lhs_ty), (rhs, _rhs_ty)) =
            self.promote_numeric((orig, target_ty), (rhs, rhs_ty));

        let value: Box<dyn BasicValue<'ctx>> = match stmt.operator.as_str() {
            "=" => Box::new(rhs),
            "+=" if lhs_ty.is_int() => Box::new(self.builder.build_int_add(lhs.into_int_value(), rhs.into_int_value(), "add").unwrap()),
            "+=" => Box::new(self.builder.build_float_add(lhs.into_float_value(), rhs.into_float_value(), "fadd").unwrap()),
            "-=" if lhs_ty.is_int() => Box::new(self.builder.build_int_sub(lhs.into_int_value(), rhs.into_int_value(), "sub").unwrap()),
            "-=" => Box::new(self.builder.build_float_sub(lhs.into_float_value(), rhs.into_float_value(), "fsub").unwrap()),
            "*=" if lhs_ty.is_int() => Box::new(self.builder.build_int_mul(lhs.into_int_value(), rhs.into_int_value(), "mul").unwrap()),
            "*=" => Box::new(self.builder.build_float_mul(lhs.into_float_value(), rhs.into_float_value(), "fmul").unwrap()),
            "/=" if lhs_ty.is_int() => Box::new(self.builder.build_int_signed_div(lhs.into_int_value(), rhs.into_int_value(), "div").unwrap()),
            "/=" => Box::new(self.builder.build_float_div(lhs.into_float_value(), rhs.into_float_value(), "fdiv").unwrap()),
            other => {
                self.push_error(format!("unsupported assignment operator `{other}`"));
                return;
            }
        };

        let _ = self.builder.build_store(ptr, value.as_basic_value_enum());
    }

    fn compile_if_statement(&mut self, stmt: &IfStatement) {
        let (cond, _) = self.resolve_value(&stmt.condition);
        let cond = cond.into_int_value();

        let function = self
            .builder
            .get_insert_block()
            .and_then(|b| b.get_parent())
            .expect("if statement lowered outside a function");

        let then_block = self.context.append_basic_block(function, &self.fresh_name("if_then"));
        let merge_block = self.context.append_basic_block(function, &self.fresh_name("if_merge"));

        // Tracks whether any edge actually lands on `merge_block`. When an
        // `if`/`else` has both arms terminate (e.g. both return), neither
        // side falls through, and `merge_block` would otherwise end up with
        // no predecessor *and* no terminator of its own — invalid IR.
        let mut merge_reachable = false;

        if let Some(alternative) = &stmt.alternative {
            let else_block = self.context.append_basic_block(function, &self.fresh_name("if_else"));
            self.build_cond_branch(cond, then_block, else_block);

            self.builder.position_at_end(then_block);
            self.compile_block_statement(&stmt.consequence);
            if !self.current_block_is_terminated() {
                self.build_branch(merge_block);
                merge_reachable = true;
            }

            self.builder.position_at_end(else_block);
            self.compile_block_statement(alternative);
            if !self.current_block_is_terminated() {
                self.build_branch(merge_block);
                merge_reachable = true;
            }
        } else {
            // The cond branch's false edge always targets `merge_block`
            // directly, so it alone guarantees a predecessor — unless the
            // `if` itself sits in already-dead code (the block it's lowered
            // into was already terminated), in which case this branch is
            // itself skipped and contributes no edge.
            let cond_branch_reaches_merge = !self.current_block_is_terminated();
            self.build_cond_branch(cond, then_block, merge_block);
            merge_reachable |= cond_branch_reaches_merge;

            self.builder.position_at_end(then_block);
            self.compile_block_statement(&stmt.consequence);
            if !self.current_block_is_terminated() {
                self.build_branch(merge_block);
                merge_reachable = true;
            }
        }

        self.builder.position_at_end(merge_block);
        if !merge_reachable {
            let _ = self.builder.build_unreachable();
        }
    }

    fn compile_while_statement(&mut self, stmt: &WhileStatement) {
        let function = self
            .builder
            .get_insert_block()
            .and_then(|b| b.get_parent())
            .expect("while statement lowered outside a function");

        let entry = self.context.append_basic_block(function, &self.fresh_name("while_loop_entry"));
        let otherwise = self.context.append_basic_block(function, &self.fresh_name("while_loop_otherwise"));

        self.break_targets.push(otherwise);
        self.continue_targets.push(entry);

        let (cond, _) = self.resolve_value(&stmt.condition);
        self.build_cond_branch(cond.into_int_value(), entry, otherwise);

        self.builder.position_at_end(entry);
        self.compile_block_statement(&stmt.body);

        let (cond, _) = self.resolve_value(&stmt.condition);
        self.build_cond_branch(cond.into_int_value(), entry, otherwise);

        self.builder.position_at_end(otherwise);
        self.break_targets.pop();
        self.continue_targets.pop();
    }

    fn compile_break_statement(&mut self) {
        match self.break_targets.last().copied() {
            Some(target) => self.build_branch(target),
            None => self.push_error("`break` used outside a loop"),
        }
    }

    fn compile_continue_statement(&mut self) {
        match self.continue_targets.last().copied() {
            Some(target) => self.build_branch(target),
            None => self.push_error("`continue` used outside a loop"),
        }
    }

    fn compile_for_statement(&mut self, stmt: &ForStatement) {
        self.push_scope();

        self.compile_let_statement(&stmt.var_declaration);

        let function = self
            .builder
            .get_insert_block()
            .and_then(|b| b.get_parent())
            .expect("for statement lowered outside a function");

        let entry = self.context.append_basic_block(function, &self.fresh_name("for_loop_entry"));
        let otherwise = self.context.append_basic_block(function, &self.fresh_name("for_loop_otherwise"));

        self.break_targets.push(otherwise);
        self.continue_targets.push(entry);

        self.build_branch(entry);
        self.builder.position_at_end(entry);

        self.compile_block_statement(&stmt.body);
        self.compile_statement(&stmt.step);

        let (cond, _) = self.resolve_value(&stmt.condition);
        self.build_cond_branch(cond.into_int_value(), entry, otherwise);

        self.builder.position_at_end(otherwise);
        self.break_targets.pop();
        self.continue_targets.pop();

        self.pop_scope();
    }

    fn compile_import_statement(&mut self, stmt: &ImportStatement) {
        let path = match std::path::Path::new(&stmt.file_path).canonicalize() {
            Ok(path) => path,
            Err(source) => {
                self.push_error(
                    lime_util::UtilError::ReadSource {
                        path: std::path::PathBuf::from(&stmt.file_path),
                        source,
                    }
                    .to_string(),
                );
                return;
            }
        };

        if self.imported_files.contains(&path) {
            self.push_warning(format!(
                "[Lime Warning]: `{}` is already imported globally",
                stmt.file_path
            ));
            return;
        }

        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                self.push_error(format!("failed to read imported file `{}`: {err}", stmt.file_path));
                return;
            }
        };

        let mut parser = Parser::from_source(&source);
        let program = parser.parse_program();
        if !parser.errors.is_empty() {
            self.push_error(format!(
                "error with imported file `{}`: {}",
                stmt.file_path,
                parser.errors.join("; ")
            ));
            return;
        }

        self.imported_files.insert(path);
        self.compile_program(&program);
    }

    /// Symmetric int/float promotion: whichever side is `int` gets
    /// `sitofp`-converted when the other side is `float`. Used by both
    /// infix expressions and compound assignment.
    pub(super) fn promote_numeric(
        &mut self,
        (left, left_ty): (inkwell::values::BasicValueEnum<'ctx>, LimeType),
        (right, right_ty): (inkwell::values::BasicValueEnum<'ctx>, LimeType),
    ) -> (
        (inkwell::values::BasicValueEnum<'ctx>, LimeType),
        (inkwell::values::BasicValueEnum<'ctx>, LimeType),
    ) {
        let float_ty = self.context.f32_type();
        let mut left = left;
        let mut left_ty = left_ty;
        let mut right = right;
        let mut right_ty = right_ty;

        if left_ty.is_int() && right_ty.is_float() {
            left = self
                .builder
                .build_signed_int_to_float(left.into_int_value(), float_ty, "promote")
                .unwrap()
                .into();
            left_ty = LimeType::Float;
        }
        if left_ty.is_float() && right_ty.is_int() {
            right = self
                .builder
                .build_signed_int_to_float(right.into_int_value(), float_ty, "promote")
                .unwrap()
                .into();
            right_ty = LimeType::Float;
        }

        ((left, left_ty), (right, right_ty))
    }
}

#[cfg(test)]
mod tests {
    use inkwell::context::Context;
    use lime_par::Parser;

    use super::CodeGen;

    fn lower<'ctx>(context: &'ctx Context, source: &str) -> CodeGen<'ctx> {
        let mut parser = Parser::from_source(source);
        let program = parser.parse_program();
        assert!(parser.errors.is_empty(), "parse errors: {:?}", parser.errors);
        let mut codegen = CodeGen::new(context);
        codegen.compile_program(&program);
        codegen
    }

    #[test]
    fn if_else_where_both_arms_return_gives_merge_block_a_terminator() {
        let context = Context::create();
        let codegen = lower(
            &context,
            "fn fact(n: int) -> int {\n\
               if n <= 1 { return 1; } else { return n * fact(n - 1); }\n\
             }\n\
             fn main() -> int { return fact(6); }",
        );
        assert!(codegen.errors().is_empty(), "{:?}", codegen.errors());
        let ir = codegen.emit_ir();
        // The merge block has no predecessor since both arms return; it
        // must still end in its own terminator rather than being left
        // empty.
        assert!(ir.contains("if_merge"));
        assert!(ir.contains("unreachable"));
    }

    #[test]
    fn break_outside_a_loop_is_a_codegen_error() {
        let context = Context::create();
        let codegen = lower(&context, "fn main() -> int { break; return 0; }");
        assert!(codegen.errors().iter().any(|e| e.contains("break")));
    }

    #[test]
    fn continue_outside_a_loop_is_a_codegen_error() {
        let context = Context::create();
        let codegen = lower(&context, "fn main() -> int { continue; return 0; }");
        assert!(codegen.errors().iter().any(|e| e.contains("continue")));
    }

    #[test]
    fn importing_a_missing_file_is_a_codegen_error() {
        let context = Context::create();
        let codegen = lower(
            &context,
            r#"import "does_not_exist_anywhere.lime"; fn main() -> int { return 0; }"#,
        );
        assert!(!codegen.errors().is_empty());
    }

    #[test]
    fn import_inlines_the_imported_functions_and_warns_on_reimport() {
        let dir = tempfile::tempdir().unwrap();
        let lib_path = dir.path().join("lib.lime");
        std::fs::write(&lib_path, "fn helper() -> int { return 7; }").unwrap();

        let source = format!(
            "import \"{}\";\nimport \"{}\";\nfn main() -> int {{ return helper(); }}",
            lib_path.display(),
            lib_path.display(),
        );

        let context = Context::create();
        let codegen = lower(&context, &source);
        assert!(codegen.errors().is_empty(), "{:?}", codegen.errors());
        assert!(codegen.emit_ir().contains("define i32 @helper"));
        assert!(codegen
            .warnings()
            .iter()
            .any(|w| w.contains("already imported")));
    }
}
