use std::path::Path;

use bromascan_common::{Address, Binding, ClassDecl, FuncArg, MethodDecl};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Reads the JSON codegen-data file naming every class, method and
/// per-platform binding the synthesis/scan core consumes (§6, supplemented
/// grammar).
pub fn read_bindings(path: &Path) -> Result<Vec<ClassDecl>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bindings(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_bindings(text: &str) -> Result<Vec<ClassDecl>, serde_json::Error> {
    let root: CodegenRoot = serde_json::from_str(text)?;
    Ok(root.classes.into_iter().map(ClassDecl::from).collect())
}

#[derive(Deserialize)]
struct CodegenRoot {
    classes: Vec<CodegenClass>,
}

#[derive(Deserialize)]
struct CodegenClass {
    name: String,
    functions: Vec<CodegenFunction>,
}

#[derive(Deserialize)]
struct CodegenFunction {
    name: String,
    #[serde(rename = "return")]
    return_type: String,
    #[serde(rename = "static")]
    is_static: bool,
    #[serde(rename = "virtual")]
    is_virtual: bool,
    #[serde(rename = "const")]
    is_const: bool,
    args: Vec<CodegenArg>,
    bindings: CodegenBindings,
}

#[derive(Deserialize)]
struct CodegenArg {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Deserialize)]
struct CodegenBindings {
    win: Option<CodegenBindingValue>,
    imac: Option<CodegenBindingValue>,
    m1: Option<CodegenBindingValue>,
    ios: Option<CodegenBindingValue>,
    android32: Option<CodegenBindingValue>,
    android64: Option<CodegenBindingValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CodegenBindingValue {
    Offset(u64),
    Tag(String),
}

fn to_address(value: Option<CodegenBindingValue>) -> Address {
    match value {
        None => Address::Null,
        Some(CodegenBindingValue::Offset(offset)) => Address::Offset(offset),
        Some(CodegenBindingValue::Tag(tag)) if tag == "link" => Address::Link,
        Some(CodegenBindingValue::Tag(tag)) if tag == "inline" => Address::Inlined,
        Some(CodegenBindingValue::Tag(_)) => Address::Null,
    }
}

fn from_address(address: Address) -> Option<CodegenBindingValue> {
    match address {
        Address::Null => None,
        Address::Link => Some(CodegenBindingValue::Tag("link".to_string())),
        Address::Inlined => Some(CodegenBindingValue::Tag("inline".to_string())),
        Address::Offset(offset) => Some(CodegenBindingValue::Offset(offset)),
    }
}

impl Serialize for CodegenBindingValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CodegenBindingValue::Offset(offset) => serializer.serialize_u64(*offset),
            CodegenBindingValue::Tag(tag) => serializer.serialize_str(tag),
        }
    }
}

/// Writes the catalog back out in the same JSON grammar [`read_bindings`]
/// consumes — `broutil`'s `clear`/`merge`/`format` modes all round-trip
/// through this writer after editing the in-memory [`ClassDecl`] tree.
pub fn write_bindings(path: &Path, classes: &[ClassDecl]) -> Result<(), CatalogError> {
    #[derive(Serialize)]
    struct Root<'a> {
        classes: Vec<ClassOut<'a>>,
    }
    #[derive(Serialize)]
    struct ClassOut<'a> {
        name: &'a str,
        functions: Vec<FunctionOut<'a>>,
    }
    #[derive(Serialize)]
    struct FunctionOut<'a> {
        name: &'a str,
        #[serde(rename = "return")]
        return_type: &'a str,
        #[serde(rename = "static")]
        is_static: bool,
        #[serde(rename = "virtual")]
        is_virtual: bool,
        #[serde(rename = "const")]
        is_const: bool,
        args: Vec<CodegenArgOut<'a>>,
        bindings: BindingsOut,
    }
    #[derive(Serialize)]
    struct CodegenArgOut<'a> {
        name: &'a str,
        #[serde(rename = "type")]
        ty: &'a str,
    }
    #[derive(Serialize)]
    struct BindingsOut {
        win: Option<CodegenBindingValue>,
        imac: Option<CodegenBindingValue>,
        m1: Option<CodegenBindingValue>,
        ios: Option<CodegenBindingValue>,
        android32: Option<CodegenBindingValue>,
        android64: Option<CodegenBindingValue>,
    }

    let root = Root {
        classes: classes
            .iter()
            .map(|class| ClassOut {
                name: &class.name,
                functions: class
                    .methods
                    .iter()
                    .map(|method| FunctionOut {
                        name: &method.name,
                        return_type: &method.return_type,
                        is_static: method.is_static,
                        is_virtual: method.is_virtual,
                        is_const: method.is_const,
                        args: method
                            .args
                            .iter()
                            .map(|arg| CodegenArgOut { name: &arg.name, ty: &arg.ty })
                            .collect(),
                        bindings: BindingsOut {
                            win: from_address(method.binding.windows),
                            imac: from_address(method.binding.mac_intel),
                            m1: from_address(method.binding.mac_arm),
                            ios: from_address(method.binding.ios),
                            android32: from_address(method.binding.android32),
                            android64: from_address(method.binding.android64),
                        },
                    })
                    .collect(),
            })
            .collect(),
    };

    let text = serde_json::to_string_pretty(&root).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl From<CodegenClass> for ClassDecl {
    fn from(class: CodegenClass) -> Self {
        ClassDecl {
            name: class.name,
            methods: class.functions.into_iter().map(MethodDecl::from).collect(),
        }
    }
}

impl From<CodegenFunction> for MethodDecl {
    fn from(function: CodegenFunction) -> Self {
        MethodDecl {
            name: function.name,
            return_type: function.return_type,
            args: function
                .args
                .into_iter()
                .map(|arg| FuncArg { name: arg.name, ty: arg.ty })
                .collect(),
            binding: Binding {
                windows: to_address(function.bindings.win),
                mac_intel: to_address(function.bindings.imac),
                mac_arm: to_address(function.bindings.m1),
                ios: to_address(function.bindings.ios),
                android32: to_address(function.bindings.android32),
                android64: to_address(function.bindings.android64),
            },
            is_virtual: function.is_virtual,
            is_static: function.is_static,
            is_const: function.is_const,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "classes": [
            { "name": "cocos2d::CCNode", "functions": [
                { "name": "init", "return": "bool", "static": false,
                  "virtual": true, "const": false, "args": [],
                  "bindings": { "win": 4096, "imac": "link", "m1": "inline",
                                "ios": null, "android32": null, "android64": null } }
            ] }
        ]
    }"#;

    #[test]
    fn parses_minimal_catalog() {
        let classes = parse_bindings(CATALOG).unwrap();
        assert_eq!(classes.len(), 1);
        let method = &classes[0].methods[0];
        assert_eq!(method.name, "init");
        assert!(method.is_virtual);
        assert_eq!(method.binding.windows, Address::Offset(4096));
        assert_eq!(method.binding.mac_intel, Address::Link);
        assert_eq!(method.binding.mac_arm, Address::Inlined);
        assert_eq!(method.binding.ios, Address::Null);
    }

    #[test]
    fn unrecognized_binding_tag_is_null() {
        let catalog = CATALOG.replace(r#""m1": "inline""#, r#""m1": "weird""#);
        let classes = parse_bindings(&catalog).unwrap();
        assert_eq!(classes[0].methods[0].binding.mac_arm, Address::Null);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_bindings("not json").is_err());
    }

    #[test]
    fn write_then_read_bindings_round_trips() {
        let classes = parse_bindings(CATALOG).unwrap();
        let path = std::env::temp_dir().join(format!("bromascan-test-bindings-{}.json", std::process::id()));

        write_bindings(&path, &classes).unwrap();
        let read_back = read_bindings(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(read_back, classes);
    }
}
