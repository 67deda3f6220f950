use bromascan_common::{Address, ClassDecl, Platform};

use crate::output::ClassBinding;

/// Resets every `Offset` binding back to `Address::Null`, leaving `Link`
/// and `Inlined` bindings untouched (§2: the JSON-model equivalent of
/// `clearBindings`'s rule "don't touch binds < 0").
pub fn clear_bindings(classes: &mut [ClassDecl]) {
    for class in classes {
        for method in &mut class.methods {
            for platform in [Platform::Windows, Platform::MacIntel, Platform::MacArm, Platform::Ios] {
                if matches!(method.binding.for_platform(platform), Address::Offset(_)) {
                    method.binding = method.binding.with_platform(platform, Address::Null);
                }
            }
        }
    }
}

/// Writes resolved offsets from a scan-result catalog back into `classes`
/// as `Offset` bindings for `platform` (§2, the JSON-model equivalent of
/// `mergeScanResults`).
///
/// Matches by class name and, within a class, by method name plus the
/// exact sequence of argument types (to disambiguate overloads) — matching
/// the original merge's comparison. A method present in `scan_results` but
/// absent from `classes`, or whose offset is unresolved, is left untouched
/// rather than clearing any prior value.
pub fn merge_scan_results(classes: &mut [ClassDecl], platform: Platform, scan_results: &[ClassBinding]) {
    for result_class in scan_results {
        let Some(class) = classes.iter_mut().find(|c| c.name == result_class.name) else {
            continue;
        };

        for result_method in &result_class.methods {
            let Some(offset) = result_method.offset else {
                continue;
            };

            let method = class.methods.iter_mut().find(|m| {
                m.name == result_method.method.name
                    && m.args.len() == result_method.method.args.len()
                    && m.args
                        .iter()
                        .zip(result_method.method.args.iter())
                        .all(|(a, b)| a.ty == b.ty)
            });

            if let Some(method) = method {
                method.binding = method.binding.with_platform(platform, Address::Offset(offset));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bromascan_common::{Binding, FuncArg, MethodDecl};
    use crate::output::MethodBinding;

    fn method(name: &str, binding: Binding) -> MethodDecl {
        MethodDecl {
            name: name.to_string(),
            return_type: "void".to_string(),
            args: vec![],
            binding,
            is_virtual: false,
            is_static: false,
            is_const: false,
        }
    }

    #[test]
    fn clear_bindings_only_touches_offsets() {
        let mut classes = vec![ClassDecl {
            name: "Cls".to_string(),
            methods: vec![method(
                "m",
                Binding {
                    windows: Address::Offset(10),
                    mac_intel: Address::Link,
                    mac_arm: Address::Inlined,
                    ios: Address::Null,
                    android32: Address::Null,
                    android64: Address::Null,
                },
            )],
        }];

        clear_bindings(&mut classes);

        let binding = classes[0].methods[0].binding;
        assert_eq!(binding.windows, Address::Null);
        assert_eq!(binding.mac_intel, Address::Link);
        assert_eq!(binding.mac_arm, Address::Inlined);
    }

    #[test]
    fn merge_sets_matching_methods_only() {
        let mut classes = vec![ClassDecl {
            name: "Cls".to_string(),
            methods: vec![method("found", Binding::default()), method("untouched", Binding::default())],
        }];

        let results = vec![ClassBinding {
            name: "Cls".to_string(),
            methods: vec![
                MethodBinding {
                    method: method("found", Binding::default()),
                    pattern: None,
                    offset: Some(0x2000),
                },
                MethodBinding {
                    method: method("missing_in_catalog", Binding::default()),
                    pattern: None,
                    offset: Some(0x3000),
                },
            ],
        }];

        merge_scan_results(&mut classes, Platform::Windows, &results);

        assert_eq!(classes[0].methods[0].binding.windows, Address::Offset(0x2000));
        assert_eq!(classes[0].methods[1].binding.windows, Address::Null);
    }
}
