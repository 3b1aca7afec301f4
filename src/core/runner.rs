//! Leveled parallel task scheduler
//!
//! Runs an arbitrary per-package task across dependency levels: everything
//! in level *i* completes (success or failure) before anything in level
//! *i+1* starts. Within a level, tasks run concurrently up to `max_jobs`.
//!
//! A failing task never aborts its siblings or later levels; failures are
//! collected and returned after every level has been attempted. Graph
//! construction errors (cycles, missing dependencies) must be handled by
//! the caller before the runner is invoked.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::core::graph::compute_levels;
use crate::core::registry::{Package, Registry};
use crate::error::BuildError;

/// A recorded per-package task failure
#[derive(Debug, Clone)]
pub struct TaskFailure {
    /// Name of the failed package
    pub name: String,
    /// Diagnostic text from the task
    pub error: String,
}

/// Run `task` once per package in `order`, level by level
///
/// With `max_jobs == 1` execution is fully sequential in the stable level
/// order, which keeps test runs and debugging deterministic. Larger values
/// bound concurrency within a level; the level barrier is unconditional.
pub async fn run_in_levels<F, Fut>(
    registry: &Registry,
    order: &[String],
    task: F,
    max_jobs: usize,
) -> Vec<TaskFailure>
where
    F: Fn(Package) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BuildError>> + Send + 'static,
{
    let levels = compute_levels(registry, order);
    let max_jobs = max_jobs.max(1);

    if max_jobs == 1 {
        run_sequential(registry, &levels, task).await
    } else {
        run_bounded(registry, &levels, task, max_jobs).await
    }
}

async fn run_sequential<F, Fut>(
    registry: &Registry,
    levels: &[Vec<String>],
    task: F,
) -> Vec<TaskFailure>
where
    F: Fn(Package) -> Fut,
    Fut: Future<Output = Result<(), BuildError>>,
{
    let mut failed = Vec::new();

    for (index, level) in levels.iter().enumerate() {
        tracing::info!("Level {index}: {level:?}");

        for name in level {
            let Some(package) = registry.get(name) else {
                continue;
            };
            match task(package.clone()).await {
                Ok(()) => tracing::info!("Done: {name}"),
                Err(e) => {
                    tracing::warn!("Failed: {name} - {e}");
                    failed.push(TaskFailure {
                        name: name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    failed
}

async fn run_bounded<F, Fut>(
    registry: &Registry,
    levels: &[Vec<String>],
    task: F,
    max_jobs: usize,
) -> Vec<TaskFailure>
where
    F: Fn(Package) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BuildError>> + Send + 'static,
{
    let task = Arc::new(task);
    let mut failed = Vec::new();

    for (index, level) in levels.iter().enumerate() {
        tracing::info!("Level {index}: {level:?}");

        let semaphore = Arc::new(Semaphore::new(max_jobs));
        let mut handles = Vec::with_capacity(level.len());

        for name in level {
            let Some(package) = registry.get(name) else {
                continue;
            };
            let package = package.clone();
            let task = Arc::clone(&task);
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.unwrap();
                (*task)(package).await
            });
            handles.push((name.clone(), handle));
        }

        // Level barrier: every task in this level settles before the next
        // level is dispatched.
        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(())) => tracing::info!("Done: {name}"),
                Ok(Err(e)) => {
                    tracing::warn!("Failed: {name} - {e}");
                    failed.push(TaskFailure {
                        name,
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed: {name} - {e}");
                    failed.push(TaskFailure {
                        name,
                        error: format!("task aborted: {e}"),
                    });
                }
            }
        }
    }

    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::build_order;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;
    use tokio::time::{sleep, Duration};

    fn package(name: &str, dependencies: &[&str]) -> Package {
        Package {
            name: name.to_string(),
            version: "0.0.0".to_string(),
            path: PathBuf::from(name),
            dependencies: dependencies.iter().map(ToString::to_string).collect(),
        }
    }

    fn diamond() -> Registry {
        Registry::from_packages(vec![
            package("a", &[]),
            package("b", &["a"]),
            package("c", &["a"]),
            package("d", &["b", "c"]),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_sequential_visits_flattened_level_order() {
        let registry = diamond();
        let order = build_order(&registry).unwrap();

        let visited = Arc::new(Mutex::new(Vec::new()));
        let visited_clone = Arc::clone(&visited);

        let failed = run_in_levels(
            &registry,
            &order,
            move |package: Package| {
                let visited = Arc::clone(&visited_clone);
                async move {
                    visited.lock().unwrap().push(package.name);
                    Ok(())
                }
            },
            1,
        )
        .await;

        assert!(failed.is_empty());
        let visited = visited.lock().unwrap();
        // Levels concatenated: [a], [b, c], [d]
        assert_eq!(*visited, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_others_still_attempted() {
        let registry = diamond();
        let order = build_order(&registry).unwrap();

        let attempted = Arc::new(Mutex::new(Vec::new()));
        let attempted_clone = Arc::clone(&attempted);

        let failed = run_in_levels(
            &registry,
            &order,
            move |package: Package| {
                let attempted = Arc::clone(&attempted_clone);
                async move {
                    attempted.lock().unwrap().push(package.name.clone());
                    if package.name == "b" {
                        return Err(BuildError::StepFailed {
                            step: "build".to_string(),
                            package: package.name,
                            output: "boom".to_string(),
                        });
                    }
                    Ok(())
                }
            },
            4,
        )
        .await;

        let failed_names: Vec<&str> = failed.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failed_names, vec!["b"]);

        // The sibling and the dependent of the failed package still ran
        let attempted = attempted.lock().unwrap();
        assert!(attempted.contains(&"c".to_string()));
        assert!(attempted.contains(&"d".to_string()));
        assert_eq!(attempted.len(), 4);
    }

    #[tokio::test]
    async fn test_level_barrier_holds_under_parallelism() {
        let registry = diamond();
        let order = build_order(&registry).unwrap();

        let spans = Arc::new(Mutex::new(HashMap::new()));
        let spans_clone = Arc::clone(&spans);
        let epoch = Instant::now();

        let failed = run_in_levels(
            &registry,
            &order,
            move |package: Package| {
                let spans = Arc::clone(&spans_clone);
                async move {
                    let started = epoch.elapsed();
                    sleep(Duration::from_millis(30)).await;
                    let finished = epoch.elapsed();
                    spans
                        .lock()
                        .unwrap()
                        .insert(package.name, (started, finished));
                    Ok(())
                }
            },
            4,
        )
        .await;

        assert!(failed.is_empty());
        let spans = spans.lock().unwrap();

        // No level-2 start before every level-1 task finished, and none of
        // level 1 before level 0.
        let (_, a_end) = spans["a"];
        let (b_start, b_end) = spans["b"];
        let (c_start, c_end) = spans["c"];
        let (d_start, _) = spans["d"];

        assert!(b_start >= a_end);
        assert!(c_start >= a_end);
        assert!(d_start >= b_end);
        assert!(d_start >= c_end);

        // Same-level tasks overlap
        assert!(b_start < c_end && c_start < b_end);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded_by_max_jobs() {
        let registry = Registry::from_packages(vec![
            package("p1", &[]),
            package("p2", &[]),
            package("p3", &[]),
            package("p4", &[]),
            package("p5", &[]),
        ])
        .unwrap();
        let order = build_order(&registry).unwrap();

        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let current_clone = Arc::clone(&current);
        let peak_clone = Arc::clone(&peak);

        let failed = run_in_levels(
            &registry,
            &order,
            move |_package: Package| {
                let current = Arc::clone(&current_clone);
                let peak = Arc::clone(&peak_clone);
                async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    sleep(Duration::from_millis(20)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                }
            },
            2,
        )
        .await;

        assert!(failed.is_empty());
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_zero_jobs_is_clamped_to_sequential() {
        let registry = Registry::from_packages(vec![package("only", &[])]).unwrap();
        let order = build_order(&registry).unwrap();

        let failed = run_in_levels(
            &registry,
            &order,
            |_package: Package| async move { Ok(()) },
            0,
        )
        .await;

        assert!(failed.is_empty());
    }

    #[tokio::test]
    async fn test_empty_order_runs_nothing() {
        let registry = Registry::from_packages(vec![package("only", &[])]).unwrap();

        let failed = run_in_levels(
            &registry,
            &[],
            |_package: Package| async move { Ok(()) },
            4,
        )
        .await;

        assert!(failed.is_empty());
    }
}
