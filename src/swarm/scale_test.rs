//! Large-flock timing runs.
//!
//! The neighbour search is all-pairs, so frame cost grows with the square of
//! the population. These runs print per-frame timings for the default flock
//! and a few worker counts.
//!
//! Run: cargo test --release -- --nocapture --ignored

#[cfg(test)]
mod tests {
    use crate::core::FlockConfig;
    use crate::swarm::simulation::FlockSimulation;
    use std::f64::consts::TAU;
    use std::time::{Duration, Instant};

    fn banner(title: &str) -> String {
        let sep = "=".repeat(80);
        println!("\n{}", sep);
        println!("  {}", title);
        println!("{}\n", sep);
        sep
    }

    fn avg_ms(times: &[Duration]) -> f64 {
        times.iter().map(|t| t.as_secs_f64() * 1000.0).sum::<f64>() / times.len().max(1) as f64
    }

    /// Default 1600-agent flock on the default 8 workers
    #[test]
    #[ignore]
    fn scale_default_flock() {
        let sep = banner("TERMFLOCK - 1600 AGENT FRAME TIMING");

        println!("[1/3] Spawning flock...");
        let t0 = Instant::now();
        let mut sim = FlockSimulation::with_seed(FlockConfig::default(), 1).unwrap();
        println!("  Init: {:?}  |  Agents: {}", t0.elapsed(), sim.agents().len());

        println!("\n[2/3] Running 60 frames...");
        let mut times = Vec::new();
        for i in 0..60 {
            let report = sim.step_frame().unwrap();
            times.push(report.elapsed);
            if i % 10 == 0 {
                let m = sim.metrics();
                println!(
                    "  Frame {:>3}: {:?}  |  Polarization: {:.3}  |  Visible: {}",
                    report.frame, report.elapsed, m.polarization, m.visible
                );
            }
        }

        println!("\n[3/3] Verifying state...");
        assert_eq!(sim.frame(), 60);
        for a in sim.agents() {
            assert!(a.x.is_finite() && a.y.is_finite());
            assert!((0.0..TAU).contains(&a.direction));
        }

        println!("\n{}", sep);
        println!("  RESULT: PASSED  |  Avg frame: {:.2} ms", avg_ms(&times));
        println!("{}\n", sep);
    }

    /// Same flock across worker counts; positions must not depend on the split
    #[test]
    #[ignore]
    fn scale_worker_sweep() {
        let sep = banner("TERMFLOCK - WORKER SWEEP (6400 AGENTS)");

        let base = FlockConfig::default()
            .with_population(6400)
            .with_bounds(2000.0, 2000.0);
        let mut reference = None;

        for workers in [1, 2, 4, 8, 16] {
            let mut sim = FlockSimulation::with_seed(base.clone().with_workers(workers), 42).unwrap();
            let mut times = Vec::new();
            for _ in 0..10 {
                times.push(sim.step_frame().unwrap().elapsed);
            }
            println!("  Workers {:>2}: avg frame {:.2} ms", workers, avg_ms(&times));

            let agents = sim.agents().to_vec();
            match &reference {
                None => reference = Some(agents),
                Some(r) => assert_eq!(r, &agents, "workers={}", workers),
            }
        }

        println!("\n{}", sep);
        println!("  RESULT: PASSED  |  Identical frames across worker counts");
        println!("{}\n", sep);
    }
}
