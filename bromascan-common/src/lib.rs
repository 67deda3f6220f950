//! Shared data model for `bromascan`.
//!
//! This crate exposes the types that flow between every other crate in the
//! workspace:
//!
//!  - [`Platform`]: the four targetable binary platforms.
//!  - [`Arch`]: the CPU architecture a platform disassembles as.
//!  - [`Address`]: one method's binding on one platform.
//!  - [`Binding`]: a method's per-platform addresses.
//!  - [`MethodDecl`] / [`ClassDecl`]: the binding catalog's declarations.
//!
//! This module is part of the `bromascan` crate family.

mod address;
mod decl;
mod platform;

pub use address::Address;
pub use decl::{Binding, ClassDecl, FuncArg, MethodDecl};
pub use platform::{Arch, Platform, PlatformParseError};
