use crate::error::Result;
use crate::task::{Task, Tick};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Shape of the synthetic workload.
///
/// Arrivals form a walk: each task arrives a uniform gap after the previous
/// one. Tasks are bimodal, mostly short with some long ones, and get a
/// deadline of `arrival + cpu + floor(cpu * slack)`.
#[derive(Debug, Clone)]
pub struct WorkloadSpec {
    pub arrival_gap: RangeInclusive<Tick>,
    /// Probability that a task is short.
    pub short_fraction: f64,
    pub short_cpu: RangeInclusive<Tick>,
    pub long_cpu: RangeInclusive<Tick>,
    pub memory: RangeInclusive<u64>,
    /// Half-open range `[lo, hi)` of deadline slack factors.
    pub slack: (f64, f64),
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            arrival_gap: 0..=50,
            short_fraction: 0.8,
            short_cpu: 1..=10,
            long_cpu: 20..=40,
            memory: 1..=4,
            slack: (1.5, 4.0),
        }
    }
}

/// Generates `n` tasks with ids `0..n`, sorted by arrival. The same seed
/// always yields the same tasks.
pub fn generate(spec: &WorkloadSpec, n: usize, seed: u64) -> Result<Vec<Task>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tasks = Vec::with_capacity(n);
    let mut arrival: Tick = 0;

    for id in 0..n {
        arrival += rng.gen_range(spec.arrival_gap.clone());
        let cpu = if rng.gen_bool(spec.short_fraction) {
            rng.gen_range(spec.short_cpu.clone())
        } else {
            rng.gen_range(spec.long_cpu.clone())
        };
        let memory = rng.gen_range(spec.memory.clone());
        let slack_factor: f64 = rng.gen_range(spec.slack.0..spec.slack.1);
        let slack = (cpu as f64 * slack_factor) as Tick;
        let deadline = arrival + cpu + slack;
        tasks.push(Task::new(id, arrival, cpu, memory, deadline)?);
    }

    // already ordered by construction; kept stable for custom specs
    tasks.sort_by_key(|t| t.arrival_time());
    log::debug!(
        "generated {} tasks (seed {}), last arrival at {}",
        tasks.len(),
        seed,
        arrival
    );
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let spec = WorkloadSpec::default();
        let tasks = generate(&spec, 500, 42).unwrap();
        assert_eq!(tasks.len(), 500);
        for (i, pair) in tasks.windows(2).enumerate() {
            assert!(pair[0].arrival_time() <= pair[1].arrival_time(), "unsorted at {i}");
        }
        for task in &tasks {
            let cpu = task.cpu_required();
            assert!(spec.short_cpu.contains(&cpu) || spec.long_cpu.contains(&cpu));
            assert!(spec.memory.contains(&task.memory_required()));
            // slack is at least floor(1.5 * cpu)
            assert!(task.deadline() >= task.arrival_time() + cpu + cpu * 3 / 2);
            assert!(task.deadline() <= task.arrival_time() + cpu * 5);
        }
        let short = tasks
            .iter()
            .filter(|t| spec.short_cpu.contains(&t.cpu_required()))
            .count();
        assert!(short > 300 && short < 500, "short tasks: {short}");
        let mut ids: Vec<_> = tasks.iter().map(|t| t.id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_generate_is_seeded() {
        let spec = WorkloadSpec::default();
        assert_eq!(generate(&spec, 100, 7).unwrap(), generate(&spec, 100, 7).unwrap());
        assert_ne!(generate(&spec, 100, 7).unwrap(), generate(&spec, 100, 8).unwrap());
        assert!(generate(&spec, 0, 7).unwrap().is_empty());
    }
}
