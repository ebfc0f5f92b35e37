//! The lexically-scoped symbol table codegen binds names into.
//!
//! Mirrors the reference compiler's `Environment`: a flat map of bindings
//! plus an optional parent, with `lookup` walking the chain and `define`
//! always writing into the current frame. Rust's ownership rules rule out
//! the reference's "just keep a `parent` pointer around" shape, so a child
//! scope takes ownership of its parent (via `push`/`pop` on `CodeGen`,
//! using `std::mem::take`) rather than borrowing it.

use std::collections::HashMap;

use inkwell::values::{FunctionValue, PointerValue};

use crate::types::LimeType;

/// What a name in scope resolves to.
#[derive(Clone, Copy)]
pub enum Binding<'ctx> {
    /// A local variable, parameter, or builtin constant: an address to
    /// load from, plus the type stored there.
    Local { ptr: PointerValue<'ctx>, ty: LimeType },
    /// A function, callable by name. `return_type` is `None` for `void`.
    Function {
        value: FunctionValue<'ctx>,
        param_types: Vec<LimeType>,
        return_type: Option<LimeType>,
    },
}

#[derive(Default)]
pub struct Environment<'ctx> {
    bindings: HashMap<String, Binding<'ctx>>,
    parent: Option<Box<Environment<'ctx>>>,
}

impl<'ctx> Environment<'ctx> {
    pub fn with_parent(parent: Environment<'ctx>) -> Self {
        Self {
            bindings: HashMap::new(),
            parent: Some(Box::new(parent)),
        }
    }

    /// Unconditional write into this frame. Per `spec.md` §4.4, this
    /// silently shadows an outer binding of the same name; there is no
    /// shadow check.
    pub fn define(&mut self, name: impl Into<String>, binding: Binding<'ctx>) {
        self.bindings.insert(name.into(), binding);
    }

    /// Walks this frame, then its parent chain, returning the first hit.
    pub fn lookup(&self, name: &str) -> Option<Binding<'ctx>> {
        if let Some(binding) = self.bindings.get(name) {
            return Some(*binding);
        }
        self.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// Drops this frame and returns its parent, or `None` at the root.
    /// Used by `CodeGen::pop_scope` to restore the enclosing scope.
    pub fn into_parent(self) -> Option<Environment<'ctx>> {
        self.parent.map(|p| *p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell::context::Context;
    use inkwell::module::Module;
    use inkwell::AddressSpace;

    fn dummy_ptr<'ctx>(module: &Module<'ctx>, name: &str) -> PointerValue<'ctx> {
        let context = module.get_context();
        let ptr_ty = context.ptr_type(AddressSpace::default());
        let global = module.add_global(ptr_ty, None, name);
        global.as_pointer_value()
    }

    #[test]
    fn lookup_finds_binding_in_current_frame() {
        let context = Context::create();
        let module = context.create_module("test");
        let mut env = Environment::default();
        env.define(
            "x",
            Binding::Local {
                ptr: dummy_ptr(&module, "x"),
                ty: LimeType::Int,
            },
        );
        assert!(env.lookup("x").is_some());
        assert!(env.lookup("y").is_none());
    }

    #[test]
    fn lookup_walks_into_parent_frame() {
        let context = Context::create();
        let module = context.create_module("test");
        let mut parent = Environment::default();
        parent.define(
            "x",
            Binding::Local {
                ptr: dummy_ptr(&module, "x"),
                ty: LimeType::Int,
            },
        );
        let child = Environment::with_parent(parent);
        assert!(child.lookup("x").is_some());
    }

    #[test]
    fn child_binding_does_not_leak_into_parent() {
        let context = Context::create();
        let module = context.create_module("test");
        let parent = Environment::default();
        let mut child = Environment::with_parent(parent);
        child.define(
            "x",
            Binding::Local {
                ptr: dummy_ptr(&module, "x"),
                ty: LimeType::Int,
            },
        );
        let parent = child.into_parent().unwrap();
        assert!(parent.lookup("x").is_none());
    }
}
