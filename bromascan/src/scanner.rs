use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use bromascan_catalog::{ClassBinding, MethodBinding};
use bromascan_common::Platform;
use bromascan_jobs::{Counters, ThreadPool};

use crate::error::OrchestratorError;

/// The outcome of one scan run: the scan-result catalog plus progress
/// counters for the orchestrator's summary line (§4.6, §4.9).
pub struct ScanSummary {
    pub classes: Vec<ClassBinding>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Drives pattern scanning (C6) across a pattern catalog, fanned out over
/// C7's worker pool (§4.9).
#[derive(Default)]
pub struct Scanner;

impl Scanner {
    pub fn new() -> Self {
        Scanner
    }

    /// Locates `platform`'s code section in `binary`, then searches it for
    /// every method's pattern in `classes`.
    ///
    /// Methods without a pattern, or whose pattern fails to find a unique
    /// hit, are simply absent from the returned scan-result catalog (§3).
    pub fn run(
        &self,
        binary: &[u8],
        platform: Platform,
        classes: Vec<ClassBinding>,
    ) -> Result<ScanSummary, OrchestratorError> {
        let section = bromascan_container::locate(platform, binary)?;
        let data: Arc<[u8]> = Arc::from(section.data);
        let base_correction = section.base_correction;
        let step = platform.arch().scan_step();

        let counters = Arc::new(Counters::new());
        let results: Arc<Mutex<Vec<ClassBinding>>> = Arc::new(Mutex::new(Vec::new()));
        let pool = ThreadPool::with_default_size();

        for class in classes {
            if class.methods.is_empty() {
                continue;
            }

            let with_pattern = class.methods.iter().filter(|method| method.pattern.is_some()).count();
            counters.add_total(with_pattern);
            if with_pattern == 0 {
                continue;
            }

            let data = Arc::clone(&data);
            let counters = Arc::clone(&counters);
            let results = Arc::clone(&results);

            pool.enqueue(move || {
                let mut methods = Vec::new();

                for mut binding in class.methods {
                    let Some(pattern) = binding.pattern.take() else {
                        continue;
                    };

                    trace!(class = %class.name, method = %binding.method.name, "scanning for pattern");
                    match bromascan_pattern::scan(&data, &pattern, step) {
                        Ok(hit) => {
                            counters.record_success();
                            binding.offset = Some((hit as i64 + base_correction) as u64);
                            methods.push(binding);
                        }
                        Err(err) => {
                            counters.record_failure();
                            debug!(class = %class.name, method = %binding.method.name, %err, "scan failed");
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

        Ok(ScanSummary {
            classes,
            total: counters.total(),
            successful: counters.successful(),
            failed: counters.failed(),
        })
    }
}
