use crate::{Address, Platform};

/// One named, typed parameter of a [`MethodDecl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncArg {
    pub name: String,
    pub ty: String,
}

/// A method's address on every platform the catalog schema knows about.
///
/// The `android32`/`android64` fields are carried through for catalog
/// round-tripping (they appear in the JSON codegen data and must not be
/// dropped by `broutil`), but no Android variant exists in [`Platform`]:
/// this core never synthesizes or scans against them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Binding {
    pub windows: Address,
    pub mac_intel: Address,
    pub mac_arm: Address,
    pub ios: Address,
    pub android32: Address,
    pub android64: Address,
}

impl Binding {
    /// The address recorded for `platform`.
    pub fn for_platform(&self, platform: Platform) -> Address {
        match platform {
            Platform::Windows => self.windows,
            Platform::MacIntel => self.mac_intel,
            Platform::MacArm => self.mac_arm,
            Platform::Ios => self.ios,
        }
    }

    /// Returns a copy of this binding with the address for `platform`
    /// replaced by `address`.
    pub fn with_platform(mut self, platform: Platform, address: Address) -> Self {
        match platform {
            Platform::Windows => self.windows = address,
            Platform::MacIntel => self.mac_intel = address,
            Platform::MacArm => self.mac_arm = address,
            Platform::Ios => self.ios = address,
        }
        self
    }
}

/// A method declaration as read from the binding catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: String,
    pub args: Vec<FuncArg>,
    pub binding: Binding,
    pub is_virtual: bool,
    pub is_static: bool,
    pub is_const: bool,
}

/// A class and the ordered list of methods declared on it.
///
/// Method order is preserved exactly as read from the catalog (§3 invariant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub methods: Vec<MethodDecl>,
}
