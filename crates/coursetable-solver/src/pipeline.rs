//! The multi-week pipeline.
//!
//! A term of [`TEACHING_WEEKS`] weeks is solved level by level. Weekly
//! events are placed in one grid. Biweekly events are split over two copies
//! of it (weeks 1-6 and 7-12), triweekly events over four copies of those
//! and single-week events over twelve, one per week. Whatever stays
//! unplaced is replicated by the number of weeks it stands for and placed
//! in an extra catch-up week.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use coursetable_config::SolverConfig;
use coursetable_core::{CourseEvent, EventFactory, Registry, TimeTable, TEACHING_WEEKS};
use coursetable_scoring::total_cost;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::info;

use crate::clock::{Clock, MonotonicClock};
use crate::error::Result;
use crate::output::WeekTimetable;
use crate::partition::{seed_remaining_hours, Recurrence, RecurrenceBuckets};
use crate::phase::{ConstructionPhase, Phase, SimulatedAnnealingPhase, TabuSearchPhase};
use crate::schedule::Schedule;
use crate::scope::SolverScope;
use crate::stats::SolverStats;

/// Which part of the pipeline a sub-problem belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Recurring(Recurrence),
    /// The extra week that collects leftovers of every level.
    CatchUp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Recurring(recurrence) => recurrence.fmt(f),
            Stage::CatchUp => f.write_str("catch_up"),
        }
    }
}

/// Outcome of one sub-problem.
#[derive(Debug, Clone)]
pub struct SubproblemReport {
    pub stage: Stage,
    /// Index of the grid within its stage.
    pub block: u32,
    pub week_offset: u32,
    /// Events handed to the sub-problem.
    pub events: usize,
    /// Events still unplaced when it finished.
    pub unplaced: usize,
    /// Soft cost of the final grid.
    pub cost: f64,
    pub stats: SolverStats,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// One grid per teaching week, then the catch-up week.
    pub weeks: Vec<WeekTimetable>,
    /// Events that found no place even in the catch-up week.
    pub unplaced: Vec<CourseEvent>,
    pub reports: Vec<SubproblemReport>,
}

impl PipelineOutcome {
    pub fn is_feasible(&self) -> bool {
        self.unplaced.is_empty()
    }
}

struct Job {
    stage: Stage,
    block: u32,
    seed: Option<u64>,
    schedule: Schedule,
    improve: bool,
}

/// Seed of the `index`-th sub-problem, derived from the configured seed.
fn job_seed(base_seed: u64, index: usize) -> u64 {
    base_seed ^ (index as u64).rotate_left(17) ^ 0x9E37_79B1_85EB_CA87
}

/// Splits `items` into `n` contiguous chunks whose sizes differ by at most
/// one, larger chunks first.
pub fn split_chunks<T>(items: Vec<T>, n: usize) -> Vec<Vec<T>> {
    if n == 0 {
        return Vec::new();
    }
    let (size, larger) = (items.len() / n, items.len() % n);
    let mut items = items.into_iter();
    (0..n)
        .map(|i| items.by_ref().take(size + usize::from(i < larger)).collect())
        .collect()
}

/// Runs every level of the term on a shared registry.
#[derive(Debug)]
pub struct TimetablePipeline {
    config: SolverConfig,
    clock: Arc<dyn Clock>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
}

impl TimetablePipeline {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            clock: Arc::new(MonotonicClock::new()),
            terminate_early_flag: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Raising the flag makes every running and later phase stop at its
    /// next step.
    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves every level and the catch-up week.
    pub fn solve(&self, registry: &Registry, factory: &EventFactory, buckets: RecurrenceBuckets) -> Result<PipelineOutcome> {
        self.config.validate()?;
        let started = self.clock.now();
        let deadline = self.config.time_limit().map(|limit| started + limit);
        let mut rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(
            event = "solve_start",
            events = buckets.len(),
            courses = registry.course_count(),
            rooms = registry.room_count(),
            parallel = self.config.parallel_subproblems,
        );

        let RecurrenceBuckets {
            weekly,
            mut biweekly,
            mut triweekly,
            mut irregular,
        } = buckets;
        biweekly.shuffle(&mut rng);
        triweekly.shuffle(&mut rng);
        irregular.shuffle(&mut rng);

        let mut level = Level {
            pipeline: self,
            registry,
            factory,
            deadline,
            next_job: 0,
            reports: Vec::new(),
            catch_up: Vec::new(),
        };

        let mut first = TimeTable::new(registry);
        seed_remaining_hours(registry, &mut first);
        let mut grids = vec![first];
        for (recurrence, events) in [
            (Recurrence::Weekly, weekly),
            (Recurrence::Biweekly, biweekly),
            (Recurrence::Triweekly, triweekly),
            (Recurrence::Irregular, irregular),
        ] {
            grids = level.run(recurrence, &grids, events)?;
        }

        let mut catch_up = std::mem::take(&mut level.catch_up);
        catch_up.shuffle(&mut rng);
        let mut catch_up_grid = TimeTable::new(registry).rebased(TEACHING_WEEKS);
        for course in registry.courses() {
            catch_up_grid.set_remaining_hours(course.id, 0);
        }
        for event in &catch_up {
            catch_up_grid.add_course_hours(event.course(), 1);
        }
        let job = level.job(Stage::CatchUp, 0, catch_up_grid, catch_up, false);
        let (schedule, report) = self.run_job(registry, factory, deadline, job)?;
        level.reports.push(report);

        let mut weeks: Vec<WeekTimetable> = grids
            .into_iter()
            .zip(1..)
            .map(|(timetable, week)| WeekTimetable {
                timetable,
                weeks: vec![week],
            })
            .collect();
        weeks.push(WeekTimetable {
            timetable: schedule.timetable,
            weeks: vec![TEACHING_WEEKS + 1],
        });

        let outcome = PipelineOutcome {
            weeks,
            unplaced: schedule.unplaced,
            reports: level.reports,
        };
        info!(
            event = "solve_end",
            duration_ms = self.clock.now().saturating_sub(started).as_millis() as u64,
            weeks = outcome.weeks.len(),
            unplaced = outcome.unplaced.len(),
            feasible = outcome.is_feasible(),
        );
        Ok(outcome)
    }

    fn scope<'a>(
        &self,
        registry: &'a Registry,
        factory: &'a EventFactory,
        deadline: Option<Duration>,
        seed: Option<u64>,
    ) -> SolverScope<'a> {
        let scope = match seed {
            Some(seed) => SolverScope::with_seed(registry, factory, seed),
            None => SolverScope::new(registry, factory),
        };
        scope
            .with_clock(Arc::clone(&self.clock))
            .with_weights(self.config.penalty_weights())
            .with_environment_mode(self.config.environment_mode)
            .with_deadline(deadline)
            .with_terminate_early_flag(self.terminate_early_flag.clone())
    }

    fn run_job(
        &self,
        registry: &Registry,
        factory: &EventFactory,
        deadline: Option<Duration>,
        job: Job,
    ) -> Result<(Schedule, SubproblemReport)> {
        let mut scope = self.scope(registry, factory, deadline, job.seed);
        let mut schedule = job.schedule;
        let events = schedule.distance();
        let week_offset = schedule.timetable.week_offset();

        info!(
            event = "subproblem_start",
            stage = %job.stage,
            block = job.block,
            week_offset = week_offset,
            events = events,
        );

        let mut phases: Vec<Box<dyn Phase>> = vec![
            Box::new(ConstructionPhase::new(&self.config.construction)),
            Box::new(TabuSearchPhase::new(&self.config.tabu_search)),
        ];
        if job.improve {
            phases.push(Box::new(SimulatedAnnealingPhase::new(&self.config.simulated_annealing)));
        }
        for phase in &mut phases {
            phase.solve(&mut schedule, &mut scope)?;
        }

        let cost = total_cost(registry, &schedule.timetable, scope.weights());
        let report = SubproblemReport {
            stage: job.stage,
            block: job.block,
            week_offset,
            events,
            unplaced: schedule.distance(),
            cost,
            stats: scope.stats().clone(),
        };
        Ok((schedule, report))
    }
}

/// Bookkeeping shared by the levels of one run.
struct Level<'p, 'a> {
    pipeline: &'p TimetablePipeline,
    registry: &'a Registry,
    factory: &'a EventFactory,
    deadline: Option<Duration>,
    next_job: usize,
    reports: Vec<SubproblemReport>,
    catch_up: Vec<CourseEvent>,
}

impl Level<'_, '_> {
    fn job(&mut self, stage: Stage, block: u32, timetable: TimeTable, events: Vec<CourseEvent>, improve: bool) -> Job {
        let seed = self
            .pipeline
            .config
            .random_seed
            .map(|seed| job_seed(seed, self.next_job));
        self.next_job += 1;
        Job {
            stage,
            block,
            seed,
            schedule: Schedule::new(timetable, events),
            improve,
        }
    }

    /// Solves one level. Block `b` starts from a copy of the previous
    /// level's grid it falls in, moved to week `b * weeks_covered`.
    fn run(&mut self, recurrence: Recurrence, previous: &[TimeTable], events: Vec<CourseEvent>) -> Result<Vec<TimeTable>> {
        let blocks = recurrence.blocks();
        let per_previous = (blocks as usize / previous.len().max(1)).max(1);
        let chunks = split_chunks(events, blocks as usize);

        let mut jobs = Vec::with_capacity(chunks.len());
        for (block, chunk) in (0..blocks).zip(chunks) {
            let source = &previous[(block as usize / per_previous).min(previous.len() - 1)];
            let grid = source.rebased(block * recurrence.weeks_covered());
            let improve = recurrence == Recurrence::Weekly;
            jobs.push(self.job(Stage::Recurring(recurrence), block, grid, chunk, improve));
        }

        let pipeline = self.pipeline;
        let (registry, factory, deadline) = (self.registry, self.factory, self.deadline);
        let results: Vec<(Schedule, SubproblemReport)> = if pipeline.config.parallel_subproblems {
            jobs.into_par_iter()
                .map(|job| pipeline.run_job(registry, factory, deadline, job))
                .collect::<Result<_>>()?
        } else {
            jobs.into_iter()
                .map(|job| pipeline.run_job(registry, factory, deadline, job))
                .collect::<Result<_>>()?
        };

        let mut grids = Vec::with_capacity(results.len());
        for (schedule, report) in results {
            for event in &schedule.unplaced {
                self.catch_up
                    .extend((0..recurrence.weeks_covered()).map(|_| self.factory.duplicate(event)));
            }
            self.reports.push(report);
            grids.push(schedule.timetable);
        }
        Ok(grids)
    }
}
