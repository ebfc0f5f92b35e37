//! AST → LLVM IR lowering.
//!
//! `CodeGen` owns everything a single compilation unit needs: the module
//! under construction, a builder anchored at the block currently being
//! filled in, the active `Environment`, the loop-target stacks, and the
//! accumulated diagnostics. Statement lowering lives in `stmt.rs`,
//! expression lowering (including the printf builtin) lives in `expr.rs`;
//! this module holds construction, builtin registration, and the small
//! pieces of bookkeeping both submodules share.

mod expr;
mod stmt;

use std::path::PathBuf;

use inkwell::basic_block::BasicBlock;
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::values::BasicValue;
use inkwell::{AddressSpace, Builder};
use rustc_hash::FxHashSet;

use crate::environment::{Binding, Environment};
use crate::types::{LimeType, TypeMapper};

pub struct CodeGen<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    types: TypeMapper<'ctx>,
    env: Environment<'ctx>,
    counter: u32,
    break_targets: Vec<BasicBlock<'ctx>>,
    continue_targets: Vec<BasicBlock<'ctx>>,
    imported_files: FxHashSet<PathBuf>,
    /// Set while lowering a `FunctionStatement`'s body; a second
    /// `FunctionStatement` encountered while this is set is a nested
    /// function definition, rejected per `spec.md` §9's Open Question.
    in_function: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl<'ctx> CodeGen<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        let module = context.create_module("main");
        let mut codegen = Self {
            context,
            module,
            builder: context.create_builder(),
            types: TypeMapper::new(context),
            env: Environment::default(),
            counter: 0,
            break_targets: Vec::new(),
            continue_targets: Vec::new(),
            imported_files: FxHashSet::default(),
            in_function: false,
            errors: Vec::new(),
            warnings: Vec::new(),
        };
        codegen.register_builtins();
        codegen
    }

    fn register_builtins(&mut self) {
        let i8_ptr = self.context.ptr_type(AddressSpace::default());
        let i32_ty = self.context.i32_type();
        let printf_ty = i32_ty.fn_type(&[i8_ptr.into()], true);
        let printf = self.module.add_function("printf", printf_ty, Some(Linkage::External));
        self.env.define(
            "printf",
            Binding::Function {
                value: printf,
                param_types: vec![LimeType::Str],
                return_type: Some(LimeType::Int),
            },
        );

        let bool_ty = self.context.bool_type();
        let true_global = self.module.add_global(bool_ty, None, "true");
        true_global.set_linkage(Linkage::Internal);
        true_global.set_constant(true);
        true_global.set_initializer(&bool_ty.const_int(1, false));
        self.env.define(
            "true",
            Binding::Local {
                ptr: true_global.as_pointer_value(),
                ty: LimeType::Bool,
            },
        );

        let false_global = self.module.add_global(bool_ty, None, "false");
        false_global.set_linkage(Linkage::Internal);
        false_global.set_constant(true);
        false_global.set_initializer(&bool_ty.const_int(0, false));
        self.env.define(
            "false",
            Binding::Local {
                ptr: false_global.as_pointer_value(),
                ty: LimeType::Bool,
            },
        );
    }

    /// The accumulated diagnostics. Empty means the lowered module is
    /// usable; per `spec.md` §7, the driver is responsible for checking
    /// this and deciding whether to emit IR.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Non-fatal diagnostics, e.g. `import`ing an already-imported file.
    /// Unlike `errors`, these never fail the compilation; the driver
    /// reports them through its own verbose-mode channel.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The module's textual IR, for `--emit=ir` output.
    pub fn emit_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn fresh_name(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}_{}", self.counter)
    }

    fn push_scope(&mut self) {
        let parent = std::mem::take(&mut self.env);
        self.env = Environment::with_parent(parent);
    }

    fn pop_scope(&mut self) {
        let child = std::mem::take(&mut self.env);
        self.env = child
            .into_parent()
            .expect("pop_scope called without a matching push_scope");
    }

    /// `true` if the block the builder is currently positioned at already
    /// ends in a terminator (`ret`/`br`/`cbr`). Every lowering routine that
    /// can emit a terminator checks this first, so an `if`/`else` where
    /// both arms return doesn't get a second, dead terminator appended
    /// after it (the "double termination" fix called for by `spec.md` §9).
    fn current_block_is_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_terminator())
            .is_some()
    }

    fn build_return(&mut self, value: Option<&dyn BasicValue<'ctx>>) {
        if self.current_block_is_terminated() {
            return;
        }
        let _ = self.builder.build_return(value);
    }

    fn build_branch(&mut self, target: BasicBlock<'ctx>) {
        if self.current_block_is_terminated() {
            return;
        }
        let _ = self.builder.build_unconditional_branch(target);
    }

    fn build_cond_branch(
        &mut self,
        cond: inkwell::values::IntValue<'ctx>,
        then_block: BasicBlock<'ctx>,
        else_block: BasicBlock<'ctx>,
    ) {
        if self.current_block_is_terminated() {
            return;
        }
        let _ = self.builder.build_conditional_branch(cond, then_block, else_block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lime_par::Parser;

    fn compile_in<'ctx>(context: &'ctx Context, source: &str) -> CodeGen<'ctx> {
        let mut parser = Parser::from_source(source);
        let program = parser.parse_program();
        assert!(parser.errors.is_empty(), "parse errors: {:?}", parser.errors);
        let mut codegen = CodeGen::new(context);
        codegen.compile_program(&program);
        codegen
    }

    #[test]
    fn registers_printf_true_false_on_construction() {
        let context = Context::create();
        let codegen = CodeGen::new(&context);
        assert!(codegen.module.get_function("printf").is_some());
        assert!(codegen.module.get_global("true").is_some());
        assert!(codegen.module.get_global("false").is_some());
    }

    #[test]
    fn arithmetic_precedence_scenario_lowers_without_errors() {
        let context = Context::create();
        let codegen = compile_in(&context, "fn main() -> int { return 2 + 3 * 4; }");
        assert!(codegen.errors().is_empty(), "{:?}", codegen.errors());
        let ir = codegen.emit_ir();
        assert!(ir.contains("define i32 @main"));
        assert!(ir.contains("ret i32"));
    }
}
