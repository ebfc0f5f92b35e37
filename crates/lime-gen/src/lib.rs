//! AST → LLVM IR lowering for Lime.
//!
//! This crate owns the two pieces `spec.md` groups under "code
//! generation": the lexically-scoped [`Environment`] symbol table and the
//! [`CodeGen`] struct that walks a `lime_par::Program` and emits an
//! `inkwell` module. It has no opinion on how the resulting IR is
//! consumed (printed, JIT-ed, handed to a linker); that's `lime-drv`'s
//! job.

mod codegen;
mod environment;
mod types;

#[cfg(test)]
mod scenarios;

pub use codegen::CodeGen;
pub use environment::{Binding, Environment};
pub use types::{LimeType, TypeMapper};
