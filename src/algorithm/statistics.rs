//! # Statistics
//!
//! Wall-clock timers and counters over the solving process, with a printable report.
use std::fmt;
use std::time::{Duration, Instant};

/// A stopwatch that accumulates across start/stop pairs.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl Timer {
    /// Start measuring; a no-op when already running.
    pub fn start(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Stop measuring and fold the elapsed time into the total.
    pub fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    /// Total measured time in seconds, including a currently running span.
    pub fn seconds(&self) -> f64 {
        let mut total = self.accumulated;
        if let Some(since) = self.running_since {
            total += since.elapsed();
        }
        total.as_secs_f64()
    }

    /// Forget all measured time.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = None;
    }
}

/// Counters and timers over reading, solving and refining.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub reading_time: Timer,
    pub solving_time: Timer,
    pub preprocessing_time: Timer,
    pub simplex_time: Timer,
    pub sync_time: Timer,
    pub transform_time: Timer,

    pub iterations: u64,
    pub iterations_from_basis: u64,
    pub iterations_primal: u64,
    pub lu_factorizations: u64,
    pub lu_solves: u64,
    pub lu_factorization_time: f64,
    pub lu_solve_time: f64,
    pub refinements: u64,
    pub stall_refinements: u64,
}

impl Statistics {
    /// Clear all statistics.
    pub fn clear(&mut self) {
        self.reading_time.reset();
        self.clear_solving_data();
    }

    /// Clear the statistics on the solving process, keeping the reading time.
    pub fn clear_solving_data(&mut self) {
        self.solving_time.reset();
        self.preprocessing_time.reset();
        self.simplex_time.reset();
        self.sync_time.reset();
        self.transform_time.reset();
        self.lu_factorization_time = 0.0;
        self.lu_solve_time = 0.0;
        self.iterations = 0;
        self.iterations_from_basis = 0;
        self.iterations_primal = 0;
        self.lu_factorizations = 0;
        self.lu_solves = 0;
        self.refinements = 0;
        self.stall_refinements = 0;
    }
}

fn phase(f: &mut fmt::Formatter, label: &str, seconds: f64, solving: f64) -> fmt::Result {
    write!(f, "\n  {:<17}: {:.2}", label, seconds)?;
    if solving > 0.0 {
        write!(f, " ({:.2}% of solving time)", 100.0 * seconds / solving)?;
    }
    Ok(())
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let solving = self.solving_time.seconds();
        let reading = self.reading_time.seconds();
        let other = solving
            - self.sync_time.seconds()
            - self.transform_time.seconds()
            - self.preprocessing_time.seconds()
            - self.simplex_time.seconds();

        writeln!(f, "Total time         : {:.2}", reading + solving)?;
        writeln!(f, "  Reading          : {:.2}", reading)?;
        write!(f, "  Solving          : {:.2}", solving)?;
        phase(f, "Preprocessing", self.preprocessing_time.seconds(), solving)?;
        phase(f, "Simplex", self.simplex_time.seconds(), solving)?;
        phase(f, "Synchronization", self.sync_time.seconds(), solving)?;
        phase(f, "Transformation", self.transform_time.seconds(), solving)?;
        phase(f, "Other", other, solving)?;

        writeln!(f)?;
        writeln!(f, "Refinements        : {}", self.refinements)?;
        writeln!(f, "  Stalling         : {}", self.stall_refinements)?;

        writeln!(f, "Iterations         : {}", self.iterations)?;
        let scratch = self.iterations - self.iterations_from_basis;
        write!(f, "  From scratch     : {}", scratch)?;
        if self.iterations > 0 {
            write!(f, " ({:.2}%)", 100.0 * scratch as f64 / self.iterations as f64)?;
        }
        write!(f, "\n  From basis       : {}", self.iterations_from_basis)?;
        if self.iterations > 0 {
            write!(
                f, " ({:.2}%)",
                100.0 * self.iterations_from_basis as f64 / self.iterations as f64,
            )?;
        }
        write!(f, "\n  Primal           : {}", self.iterations_primal)?;
        if self.iterations > 0 {
            write!(
                f, " ({:.2}%)",
                100.0 * self.iterations_primal as f64 / self.iterations as f64,
            )?;
        }
        let dual = self.iterations - self.iterations_primal;
        write!(f, "\n  Dual             : {}", dual)?;
        if self.iterations > 0 {
            write!(f, " ({:.2}%)", 100.0 * dual as f64 / self.iterations as f64)?;
        }

        writeln!(f)?;
        writeln!(f, "LU factorizations  : {}", self.lu_factorizations)?;
        write!(f, "  Factor. frequency: ")?;
        if self.lu_factorizations > 0 {
            writeln!(
                f, "{:.2} iterations per factorization",
                self.iterations as f64 / self.lu_factorizations as f64,
            )?;
        } else {
            writeln!(f, "-")?;
        }
        writeln!(f, "  Factor. time     : {:.2}", self.lu_factorization_time)?;

        writeln!(f, "LU solves          : {}", self.lu_solves)?;
        write!(f, "  Solve frequency  : ")?;
        if self.lu_solves > 0 && self.iterations > 0 {
            writeln!(
                f, "{:.2} solves per iteration",
                self.lu_solves as f64 / self.iterations as f64,
            )?;
        } else {
            writeln!(f, "-")?;
        }
        write!(f, "  Solve time       : {:.2}", self.lu_solve_time)
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::statistics::Statistics;

    #[test]
    fn report_renders() {
        let mut statistics = Statistics::default();
        statistics.iterations = 10;
        statistics.iterations_primal = 7;
        statistics.lu_factorizations = 2;
        statistics.lu_solves = 30;

        let report = format!("{}", statistics);
        assert!(report.contains("Iterations         : 10"));
        assert!(report.contains("5.00 iterations per factorization"));
        assert!(report.contains("3.00 solves per iteration"));
        assert!(report.contains("Stalling         : 0"));
    }

    #[test]
    fn clearing() {
        let mut statistics = Statistics::default();
        statistics.reading_time.start();
        statistics.iterations = 3;
        statistics.clear_solving_data();
        assert_eq!(statistics.iterations, 0);
        // Reading time survives a solving-data clear.
        statistics.reading_time.stop();
        statistics.clear();
        assert_eq!(statistics.reading_time.seconds(), 0.0);
    }
}
