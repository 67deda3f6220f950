use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use bromascan_asm::{Arm64Generator, X86Generator};
use bromascan_catalog::{ClassBinding, MethodBinding};
use bromascan_common::{Address, Arch, ClassDecl, Platform};
use bromascan_jobs::{Counters, ThreadPool};
use bromascan_pattern::{synthesize, GenerateError, Pattern, DEFAULT_MAX_TOKENS};

use crate::error::OrchestratorError;

/// The outcome of one synthesis run: the pattern catalog plus progress
/// counters for the orchestrator's summary line (§4.7, §4.9).
pub struct GenerateSummary {
    pub classes: Vec<ClassBinding>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Drives pattern synthesis (C5) across a binding catalog, fanned out over
/// C7's worker pool (§4.9).
///
/// One `Generator` can be reused across runs; it only carries the token
/// budget each synthesis is allowed to grow to.
pub struct Generator {
    max_tokens: usize,
}

impl Default for Generator {
    fn default() -> Self {
        Generator {
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(max_tokens: usize) -> Self {
        Generator { max_tokens }
    }

    /// Locates `platform`'s code section in `binary`, then synthesizes a
    /// pattern for every method in `classes` with a resolved `Offset`
    /// binding on that platform.
    ///
    /// Per-method failures (§7) never abort the run: they're recorded in
    /// the returned counters and the method is simply absent from the
    /// output pattern catalog.
    pub fn run(
        &self,
        binary: &[u8],
        platform: Platform,
        classes: Vec<ClassDecl>,
    ) -> Result<GenerateSummary, OrchestratorError> {
        let section = bromascan_container::locate(platform, binary)?;
        let data: Arc<[u8]> = Arc::from(section.data);
        let base_correction = section.base_correction;
        let max_tokens = self.max_tokens;
        let arch = platform.arch();

        let counters = Arc::new(Counters::new());
        let results: Arc<Mutex<Vec<ClassBinding>>> = Arc::new(Mutex::new(Vec::new()));
        let pool = ThreadPool::with_default_size();

        for class in classes {
            if class.methods.is_empty() {
                continue;
            }

            let eligible = class
                .methods
                .iter()
                .filter(|method| matches!(method.binding.for_platform(platform), Address::Offset(_)))
                .count();
            counters.add_total(eligible);
            if eligible == 0 {
                continue;
            }

            let data = Arc::clone(&data);
            let counters = Arc::clone(&counters);
            let results = Arc::clone(&results);

            pool.enqueue(move || {
                let mut methods = Vec::new();

                for method in &class.methods {
                    let Address::Offset(offset) = method.binding.for_platform(platform) else {
                        continue;
                    };
                    let corrected = (offset as i64 - base_correction) as usize;

                    trace!(class = %class.name, method = %method.name, offset, "synthesizing pattern");
                    match synthesize_one(arch, &data, corrected, max_tokens) {
                        Ok(pattern) => {
                            counters.record_success();
                            methods.push(MethodBinding {
                                method: method.clone(),
                                pattern: Some(pattern),
                                offset: None,
                            });
                        }
                        Err(err) => {
                            counters.record_failure();
                            debug!(class = %class.name, method = %method.name, %err, "synthesis failed");
                        }
                    }
                }

                if methods.is_empty() {
                    return;
                }

                results.lock().unwrap().push(ClassBinding {
                    name: class.name,
                    methods,
                });
            });
        }

        pool.wait_all();
        drop(pool);

        let classes = Arc::try_unwrap(results)
            .expect("all worker tasks have finished by the time the pool is dropped")
            .into_inner()
            .unwrap();

        Ok(GenerateSummary {
            classes,
            total: counters.total(),
            successful: counters.successful(),
            failed: counters.failed(),
        })
    }
}

fn synthesize_one(arch: Arch, section: &[u8], offset: usize, max_tokens: usize) -> Result<Pattern, GenerateError> {
    if offset >= section.len() {
        return Err(GenerateError::NotFound);
    }
    match arch {
        Arch::X86_64 => synthesize(X86Generator::new(&section[offset..]), section, offset, max_tokens),
        Arch::Aarch64 => synthesize(Arm64Generator::new(&section[offset..]), section, offset, max_tokens),
    }
}
