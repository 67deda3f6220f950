use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::thread::{self, JoinHandle};

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Shared {
    queue: Mutex<VecDeque<Task>>,
    condvar: Condvar,
    stop: AtomicBool,
    active_tasks: AtomicUsize,
}

/// A fixed-size pool of worker threads draining one shared task queue (§4.7).
///
/// Each enqueued task is expected to own everything it needs (typically one
/// class's worth of method work) and to run to completion without blocking
/// on another task's result. Dropping the pool stops and joins every worker.
pub struct ThreadPool {
    workers: Vec<JoinHandle<()>>,
    shared: std::sync::Arc<Shared>,
}

impl ThreadPool {
    /// Spawns `thread_count` workers, each blocking on the queue's condition
    /// variable until a task arrives or the pool is stopped.
    pub fn new(thread_count: usize) -> Self {
        let shared = std::sync::Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            stop: AtomicBool::new(false),
            active_tasks: AtomicUsize::new(0),
        });

        let workers = (0..thread_count.max(1))
            .map(|_| {
                let shared = std::sync::Arc::clone(&shared);
                thread::spawn(move || Self::worker_loop(shared))
            })
            .collect();

        ThreadPool { workers, shared }
    }

    /// Uses the host's available parallelism, falling back to one thread.
    pub fn with_default_size() -> Self {
        let count = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self::new(count)
    }

    fn worker_loop(shared: std::sync::Arc<Shared>) {
        loop {
            let task = {
                let mut queue = shared.queue.lock().unwrap();
                loop {
                    if let Some(task) = queue.pop_front() {
                        shared.active_tasks.fetch_add(1, Ordering::AcqRel);
                        break Some(task);
                    }
                    if shared.stop.load(Ordering::Acquire) {
                        break None;
                    }
                    queue = shared.condvar.wait(queue).unwrap();
                }
            };

            let Some(task) = task else {
                return;
            };

            task();
            shared.active_tasks.fetch_sub(1, Ordering::AcqRel);
        }
    }

    /// Queues `task` for a worker to pick up.
    pub fn enqueue<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.queue.lock().unwrap().push_back(Box::new(task));
        self.shared.condvar.notify_one();
    }

    /// Blocks until the queue is empty and no worker is mid-task.
    pub fn wait_all(&self) {
        loop {
            let idle = {
                let queue = self.shared.queue.lock().unwrap();
                queue.is_empty() && self.shared.active_tasks.load(Ordering::Acquire) == 0
            };
            if idle {
                return;
            }
            thread::yield_now();
        }
    }

    /// True if any task is queued or in flight.
    pub fn is_running(&self) -> bool {
        let queue = self.shared.queue.lock().unwrap();
        !queue.is_empty() || self.shared.active_tasks.load(Ordering::Acquire) > 0
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
        self.shared.condvar.notify_all();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize as StdAtomicUsize;
    use std::sync::Arc;

    #[test]
    fn runs_all_enqueued_tasks() {
        let pool = ThreadPool::new(4);
        let counter = Arc::new(StdAtomicUsize::new(0));
        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            pool.enqueue(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.wait_all();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
        assert!(!pool.is_running());
    }

    #[test]
    fn single_worker_processes_sequentially() {
        let pool = ThreadPool::new(1);
        let results = Arc::new(Mutex::new(Vec::new()));
        for i in 0..10 {
            let results = Arc::clone(&results);
            pool.enqueue(move || {
                results.lock().unwrap().push(i);
            });
        }
        pool.wait_all();
        assert_eq!(*results.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }
}
