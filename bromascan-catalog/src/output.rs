use std::path::Path;
use std::str::FromStr;

use bromascan_common::{MethodDecl, Platform};
use bromascan_pattern::Pattern;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One method's result, after synthesis or scanning (§3, "MethodBinding").
///
/// `pattern` and `offset` are independent: a freshly synthesized binding
/// carries only `pattern`, a freshly scanned one only `offset`. Only
/// `method.name`/`return_type`/`args` round-trip through the catalog JSON —
/// the per-platform `binding`/`is_virtual`/`is_static`/`is_const` fields on
/// `method` are not part of this envelope and are defaulted on read.
#[derive(Debug, Clone)]
pub struct MethodBinding {
    pub method: MethodDecl,
    pub pattern: Option<Pattern>,
    pub offset: Option<u64>,
}

/// A class and its ordered method results.
#[derive(Debug, Clone)]
pub struct ClassBinding {
    pub name: String,
    pub methods: Vec<MethodBinding>,
}

#[derive(Serialize, Deserialize)]
struct ArgJson {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

/// Loads a previously written pattern catalog (§6) for scanning.
///
/// Lenient on read: a method's `pattern`/`offset` may be an explicit JSON
/// `null` or simply absent — both mean "not present" (mirrors the original
/// generic catalog reader, which checks `contains(...) && !is_null()`).
pub fn read_patterns(path: &Path) -> Result<(Platform, Vec<ClassBinding>), CatalogError> {
    #[derive(Deserialize)]
    struct MethodJson {
        name: String,
        #[serde(rename = "return")]
        return_type: String,
        args: Vec<ArgJson>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        offset: Option<u64>,
    }
    #[derive(Deserialize)]
    struct ClassJson {
        name: String,
        functions: Vec<MethodJson>,
    }
    #[derive(Deserialize)]
    struct CatalogJson {
        platform: String,
        classes: Vec<ClassJson>,
    }

    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog: CatalogJson = serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let platform =
        Platform::from_str(&catalog.platform).map_err(|_| CatalogError::UnknownPlatform(catalog.platform))?;

    let classes = catalog
        .classes
        .into_iter()
        .map(|class| ClassBinding {
            name: class.name,
            methods: class
                .functions
                .into_iter()
                .map(|function| MethodBinding {
                    method: MethodDecl {
                        name: function.name,
                        return_type: function.return_type,
                        args: function
                            .args
                            .into_iter()
                            .map(|arg| bromascan_common::FuncArg { name: arg.name, ty: arg.ty })
                            .collect(),
                        binding: Default::default(),
                        is_virtual: false,
                        is_static: false,
                        is_const: false,
                    },
                    pattern: function.pattern.and_then(|text| text.parse().ok()),
                    offset: function.offset,
                })
                .collect(),
        })
        .collect();

    Ok((platform, classes))
}

/// Writes a pattern catalog (§6): the output of synthesis, input to
/// scanning. Every method's `pattern` field is present, `null` when the
/// method carries none — matching the original generator's writer, which
/// always emits the key.
pub fn write_patterns(path: &Path, platform: Platform, classes: &[ClassBinding]) -> Result<(), CatalogError> {
    #[derive(Serialize)]
    struct MethodJson<'a> {
        name: &'a str,
        #[serde(rename = "return")]
        return_type: &'a str,
        args: Vec<ArgJson>,
        pattern: Option<String>,
    }
    #[derive(Serialize)]
    struct ClassJson<'a> {
        name: &'a str,
        functions: Vec<MethodJson<'a>>,
    }
    #[derive(Serialize)]
    struct CatalogJson<'a> {
        platform: String,
        classes: Vec<ClassJson<'a>>,
    }

    let catalog = CatalogJson {
        platform: platform.to_string(),
        classes: classes
            .iter()
            .map(|class| ClassJson {
                name: &class.name,
                functions: class
                    .methods
                    .iter()
                    .map(|binding| MethodJson {
                        name: &binding.method.name,
                        return_type: &binding.method.return_type,
                        args: binding
                            .method
                            .args
                            .iter()
                            .map(|arg| ArgJson {
                                name: arg.name.clone(),
                                ty: arg.ty.clone(),
                            })
                            .collect(),
                        pattern: binding.pattern.as_ref().map(ToString::to_string),
                    })
                    .collect(),
            })
            .collect(),
    };

    write_json(path, &catalog)
}

/// Writes a scan-result catalog (§6): only methods with a resolved
/// `offset` are kept, classes left empty by that filter are dropped, and
/// `pattern` is stripped from every entry to keep the output small
/// (mirrors the original scanner's `saveResults`).
pub fn write_scan_results(path: &Path, platform: Platform, classes: &[ClassBinding]) -> Result<(), CatalogError> {
    #[derive(Serialize)]
    struct MethodJson<'a> {
        name: &'a str,
        #[serde(rename = "return")]
        return_type: &'a str,
        args: Vec<ArgJson>,
        offset: u64,
    }
    #[derive(Serialize)]
    struct ClassJson<'a> {
        name: &'a str,
        functions: Vec<MethodJson<'a>>,
    }
    #[derive(Serialize)]
    struct CatalogJson<'a> {
        platform: String,
        classes: Vec<ClassJson<'a>>,
    }

    let filtered_classes: Vec<ClassJson> = classes
        .iter()
        .filter_map(|class| {
            let functions: Vec<MethodJson> = class
                .methods
                .iter()
                .filter_map(|binding| {
                    let offset = binding.offset?;
                    Some(MethodJson {
                        name: &binding.method.name,
                        return_type: &binding.method.return_type,
                        args: binding
                            .method
                            .args
                            .iter()
                            .map(|arg| ArgJson {
                                name: arg.name.clone(),
                                ty: arg.ty.clone(),
                            })
                            .collect(),
                        offset,
                    })
                })
                .collect();

            if functions.is_empty() {
                None
            } else {
                Some(ClassJson { name: &class.name, functions })
            }
        })
        .collect();

    let catalog = CatalogJson {
        platform: platform.to_string(),
        classes: filtered_classes,
    };

    write_json(path, &catalog)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CatalogError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bromascan_common::FuncArg;

    fn sample_method(name: &str) -> MethodDecl {
        MethodDecl {
            name: name.to_string(),
            return_type: "void".to_string(),
            args: vec![FuncArg {
                name: "x".to_string(),
                ty: "int".to_string(),
            }],
            binding: Default::default(),
            is_virtual: false,
            is_static: false,
            is_const: false,
        }
    }

    #[test]
    fn write_then_read_pattern_catalog_round_trips() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("bromascan-test-patterns-{}.json", std::process::id()));

        let pattern: Pattern = "aa bb ?? cc".parse().unwrap();
        let classes = vec![ClassBinding {
            name: "cocos2d::CCNode".to_string(),
            methods: vec![MethodBinding {
                method: sample_method("init"),
                pattern: Some(pattern.clone()),
                offset: None,
            }],
        }];

        write_patterns(&path, Platform::Windows, &classes).unwrap();
        let (platform, read_back) = read_patterns(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(platform, Platform::Windows);
        assert_eq!(read_back[0].methods[0].pattern.as_ref().unwrap().to_string(), pattern.to_string());
        assert!(read_back[0].methods[0].offset.is_none());
    }

    #[test]
    fn scan_results_drop_empty_classes_and_unmatched_methods() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("bromascan-test-scan-{}.json", std::process::id()));

        let classes = vec![
            ClassBinding {
                name: "Found".to_string(),
                methods: vec![
                    MethodBinding {
                        method: sample_method("hit"),
                        pattern: Some("aa".parse().unwrap()),
                        offset: Some(0x1000),
                    },
                    MethodBinding {
                        method: sample_method("miss"),
                        pattern: Some("bb".parse().unwrap()),
                        offset: None,
                    },
                ],
            },
            ClassBinding {
                name: "AllMissed".to_string(),
                methods: vec![MethodBinding {
                    method: sample_method("miss2"),
                    pattern: Some("cc".parse().unwrap()),
                    offset: None,
                }],
            },
        ];

        write_scan_results(&path, Platform::Windows, &classes).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(text.contains("\"hit\""));
        assert!(!text.contains("\"miss\""));
        assert!(!text.contains("AllMissed"));
        assert!(!text.contains("pattern"));
    }
}
