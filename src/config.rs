use crate::error::Result;
use crate::scheduler::{MlfqScheduler, RoundRobinScheduler, Scheduler, SchedulerKind};
use crate::task::Tick;
use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_TASKS: usize = 10_000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_BOOST_INTERVAL: Tick = 250;
pub const DEFAULT_RR_QUANTUM: Tick = 15;

/// Simulation parameters shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct SimConfig {
    /// Number of synthetic tasks to generate
    #[arg(long, global = true, default_value_t = DEFAULT_TASKS)]
    pub tasks: usize,

    /// Seed for the workload generator
    #[arg(long, global = true, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// MLFQ time quanta, one per level, highest priority first
    #[arg(long, global = true, value_delimiter = ',', default_values_t = [10, 20, 40])]
    pub quanta: Vec<Tick>,

    /// MLFQ priority boost interval in ticks (0 disables boosting)
    #[arg(long, global = true, default_value_t = DEFAULT_BOOST_INTERVAL)]
    pub boost: Tick,

    /// Round robin time quantum
    #[arg(long, global = true, default_value_t = DEFAULT_RR_QUANTUM)]
    pub rr_quantum: Tick,

    /// Directory receiving the result CSVs
    #[arg(long, global = true, default_value = "./data")]
    pub out_dir: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tasks: DEFAULT_TASKS,
            seed: DEFAULT_SEED,
            quanta: vec![10, 20, 40],
            boost: DEFAULT_BOOST_INTERVAL,
            rr_quantum: DEFAULT_RR_QUANTUM,
            out_dir: PathBuf::from("./data"),
        }
    }
}

impl SimConfig {
    /// One MLFQ level per configured quantum.
    pub fn mlfq(&self) -> Result<MlfqScheduler> {
        MlfqScheduler::new(self.quanta.len(), &self.quanta, self.boost)
    }

    pub fn round_robin(&self) -> Result<RoundRobinScheduler> {
        RoundRobinScheduler::new(self.rr_quantum)
    }

    pub fn build(&self, kind: SchedulerKind) -> Result<Box<dyn Scheduler>> {
        Ok(match kind {
            SchedulerKind::Mlfq => Box::new(self.mlfq()?),
            SchedulerKind::RoundRobin => Box::new(self.round_robin()?),
        })
    }

    pub fn mlfq_csv(&self) -> PathBuf {
        self.out_dir.join("mlfq_results.csv")
    }

    pub fn rr_csv(&self) -> PathBuf {
        self.out_dir.join("rr_results.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        config: SimConfig,
    }

    #[test]
    fn test_defaults_match_cli_defaults() {
        let parsed = Cli::try_parse_from(["schedsim"]).unwrap().config;
        let default = SimConfig::default();
        assert_eq!(parsed.tasks, default.tasks);
        assert_eq!(parsed.seed, default.seed);
        assert_eq!(parsed.quanta, default.quanta);
        assert_eq!(parsed.boost, default.boost);
        assert_eq!(parsed.rr_quantum, default.rr_quantum);
        assert_eq!(parsed.out_dir, default.out_dir);
    }

    #[test]
    fn test_flags() {
        let config = Cli::try_parse_from([
            "schedsim",
            "--tasks",
            "50",
            "--quanta",
            "2,4",
            "--boost",
            "0",
            "--rr-quantum",
            "3",
            "--out-dir",
            "/tmp/out",
        ])
        .unwrap()
        .config;
        assert_eq!(config.tasks, 50);
        assert_eq!(config.quanta, vec![2, 4]);
        let mlfq = config.mlfq().unwrap();
        assert_eq!(mlfq.num_levels(), 2);
        assert_eq!(mlfq.boost_interval(), 0);
        assert_eq!(config.round_robin().unwrap().quantum(), 3);
        assert_eq!(config.rr_csv(), PathBuf::from("/tmp/out/rr_results.csv"));
        assert_eq!(config.build(SchedulerKind::Mlfq).unwrap().name(), "MLFQ");
        assert_eq!(
            config.build(SchedulerKind::RoundRobin).unwrap().name(),
            "Round Robin"
        );
    }

    #[test]
    fn test_invalid_schedulers() {
        let config = SimConfig {
            quanta: vec![5, 0],
            rr_quantum: 0,
            ..Default::default()
        };
        assert!(matches!(config.mlfq(), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(
            config.round_robin(),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
