//! Simulated and scripted backends for the capability traits.
//!
//! - [`SimulatedWorld`]: a 2-D vehicle pose over a [`SignalField`], handing
//!   out a [`SimMover`] and a [`SimSensor`] that share the same world, with
//!   optional Gaussian noise and fault injection
//! - [`ScriptedSignal`]: a signal source that replays fixed readings
//! - [`RecordingMover`]: a mover that only records what it was asked to do
//!
//! The world uses the same frame as [`RelativeMove::unit_offset`]: forward is
//! `+y` (north) and right is `+x` (east).

use std::cell::RefCell;
use std::rc::Rc;

use homing_types::{
    HomingError, HomingResult, MotionFault, RelativeMove, SensorUnavailable, SignalScore,
};
use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::traits::{Mover, RawSignalSource};

// ============================================================================
// Signal fields
// ============================================================================

/// A noise-free raw reading for every point in the plane.
///
/// Readings follow the sensor's sign convention (negative, dBm-like). Any
/// `Fn(&Point2<f64>) -> f64` is a field.
pub trait SignalField {
    /// Raw reading at `position`.
    fn reading_at(&self, position: &Point2<f64>) -> f64;
}

impl<F: Fn(&Point2<f64>) -> f64> SignalField for F {
    fn reading_at(&self, position: &Point2<f64>) -> f64 {
        self(position)
    }
}

/// A reading that falls off linearly with distance: `-(base + slope * d)`.
///
/// # Example
///
/// ```
/// use homing_nav::sim::{LinearField, SignalField};
/// use nalgebra::Point2;
///
/// let field = LinearField::new(Point2::new(3.0, 0.0), 40.0, 2.0);
/// assert!((field.reading_at(&Point2::origin()) + 46.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearField {
    source: Point2<f64>,
    base: f64,
    slope: f64,
}

impl LinearField {
    /// Creates a field centered on `source`.
    #[must_use]
    pub const fn new(source: Point2<f64>, base: f64, slope: f64) -> Self {
        Self {
            source,
            base,
            slope,
        }
    }

    /// Location of the transmitter.
    #[must_use]
    pub const fn source(&self) -> Point2<f64> {
        self.source
    }
}

impl SignalField for LinearField {
    fn reading_at(&self, position: &Point2<f64>) -> f64 {
        let distance = nalgebra::distance(&self.source, position);
        -(self.base + self.slope * distance)
    }
}

/// Log-distance path loss: `tx_power - 10 * n * log10(max(d, d_min))`.
///
/// Defaults to -40 dBm at one metre, exponent 2 (free space), and a 0.1 m
/// floor on distance.
///
/// # Example
///
/// ```
/// use homing_nav::sim::{PathLossField, SignalField};
/// use nalgebra::Point2;
///
/// let field = PathLossField::new(Point2::origin());
/// // Ten metres away in free space loses 20 dB on top of the 1 m power.
/// assert!((field.reading_at(&Point2::new(10.0, 0.0)) + 60.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLossField {
    source: Point2<f64>,
    tx_power: f64,
    exponent: f64,
    min_distance: f64,
}

impl PathLossField {
    /// Creates a free-space field centered on `source`.
    #[must_use]
    pub const fn new(source: Point2<f64>) -> Self {
        Self {
            source,
            tx_power: -40.0,
            exponent: 2.0,
            min_distance: 0.1,
        }
    }

    /// Sets the reading at one metre.
    #[must_use]
    pub const fn with_tx_power(mut self, dbm: f64) -> Self {
        self.tx_power = dbm;
        self
    }

    /// Sets the path-loss exponent (2 in free space, higher indoors).
    #[must_use]
    pub const fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    /// Sets the distance floor.
    #[must_use]
    pub const fn with_min_distance(mut self, distance: f64) -> Self {
        self.min_distance = distance;
        self
    }

    /// Location of the transmitter.
    #[must_use]
    pub const fn source(&self) -> Point2<f64> {
        self.source
    }
}

impl SignalField for PathLossField {
    fn reading_at(&self, position: &Point2<f64>) -> f64 {
        let distance = nalgebra::distance(&self.source, position).max(self.min_distance);
        self.tx_power - 10.0 * self.exponent * distance.log10()
    }
}

// ============================================================================
// Simulated world
// ============================================================================

struct WorldState {
    field: Box<dyn SignalField>,
    position: Point2<f64>,
    trail: Vec<Point2<f64>>,
    moves: Vec<(RelativeMove, f64)>,
    reads: usize,
    noise: Option<Normal<f64>>,
    rng: StdRng,
    outages: Vec<usize>,
    sensor_dead_after: Option<usize>,
    motion_fault_after: Option<usize>,
}

impl WorldState {
    fn apply_move(&mut self, motion: RelativeMove, distance: f64) -> Result<(), MotionFault> {
        if self
            .motion_fault_after
            .is_some_and(|limit| self.moves.len() >= limit)
        {
            return Err(MotionFault::new(motion, distance, "simulated vehicle rejected the move"));
        }
        self.position += motion.unit_offset() * distance;
        self.trail.push(self.position);
        self.moves.push((motion, distance));
        Ok(())
    }

    fn take_reading(&mut self) -> Result<f64, SensorUnavailable> {
        let index = self.reads;
        self.reads += 1;

        if self.sensor_dead_after.is_some_and(|limit| index >= limit) {
            return Err(SensorUnavailable::new("simulated sensor stopped reporting"));
        }
        if self.outages.contains(&index) {
            return Err(SensorUnavailable::new(format!("simulated dropout on read {index}")));
        }

        let clean = self.field.reading_at(&self.position);
        let noise = self.noise.map_or(0.0, |normal| normal.sample(&mut self.rng));
        Ok(clean + noise)
    }
}

/// A simulated vehicle in a signal field.
///
/// The world is shared: [`mover`](Self::mover) and [`sensor`](Self::sensor)
/// return handles onto the same pose, so a move changes what the sensor
/// reads next. Handles are single-threaded.
///
/// # Example
///
/// ```
/// use homing_nav::sim::{LinearField, SimulatedWorld};
/// use homing_nav::{Mover, RawSignalSource};
/// use homing_types::RelativeMove;
/// use nalgebra::Point2;
///
/// let world = SimulatedWorld::new(LinearField::new(Point2::new(0.0, 2.0), 30.0, 1.0));
/// let mut mover = world.mover();
/// let mut sensor = world.sensor();
///
/// assert!((sensor.read().unwrap() + 32.0).abs() < 1e-12);
/// mover.move_by(RelativeMove::Forward, 2.0).unwrap();
/// assert!((sensor.read().unwrap() + 30.0).abs() < 1e-12);
/// assert_eq!(world.position(), Point2::new(0.0, 2.0));
/// ```
#[derive(Clone)]
pub struct SimulatedWorld {
    state: Rc<RefCell<WorldState>>,
}

impl std::fmt::Debug for SimulatedWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SimulatedWorld")
            .field("position", &state.position)
            .field("moves", &state.moves.len())
            .field("reads", &state.reads)
            .finish_non_exhaustive()
    }
}

impl SimulatedWorld {
    /// Creates a world with the vehicle at the origin and no noise or faults.
    #[must_use]
    pub fn new(field: impl SignalField + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(WorldState {
                field: Box::new(field),
                position: Point2::origin(),
                trail: Vec::new(),
                moves: Vec::new(),
                reads: 0,
                noise: None,
                rng: StdRng::seed_from_u64(0),
                outages: Vec::new(),
                sensor_dead_after: None,
                motion_fault_after: None,
            })),
        }
    }

    /// Places the vehicle at `position`.
    #[must_use]
    pub fn with_start(self, position: Point2<f64>) -> Self {
        self.state.borrow_mut().position = position;
        self
    }

    /// Seeds the noise generator.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.state.borrow_mut().rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Adds zero-mean Gaussian noise to every reading.
    ///
    /// # Errors
    ///
    /// Returns [`HomingError::InvalidConfig`] if `std_dev` is negative or not
    /// finite.
    pub fn with_noise(self, std_dev: f64) -> HomingResult<Self> {
        let normal = Normal::new(0.0, std_dev)
            .map_err(|e| HomingError::invalid_config(format!("noise std dev {std_dev}: {e}")))?;
        self.state.borrow_mut().noise = Some(normal);
        Ok(self)
    }

    /// Makes the reads with the given zero-based indices fail.
    #[must_use]
    pub fn with_sensor_outages(self, reads: impl IntoIterator<Item = usize>) -> Self {
        self.state.borrow_mut().outages.extend(reads);
        self
    }

    /// Makes every read fail once `reads` readings have been attempted.
    #[must_use]
    pub fn with_sensor_dead_after(self, reads: usize) -> Self {
        self.state.borrow_mut().sensor_dead_after = Some(reads);
        self
    }

    /// Makes every move fail once `moves` moves have been completed.
    #[must_use]
    pub fn with_motion_fault_after(self, moves: usize) -> Self {
        self.state.borrow_mut().motion_fault_after = Some(moves);
        self
    }

    /// Returns a mover handle onto this world.
    #[must_use]
    pub fn mover(&self) -> SimMover {
        SimMover {
            state: Rc::clone(&self.state),
        }
    }

    /// Returns a sensor handle onto this world.
    #[must_use]
    pub fn sensor(&self) -> SimSensor {
        SimSensor {
            state: Rc::clone(&self.state),
        }
    }

    /// Current vehicle position.
    #[must_use]
    pub fn position(&self) -> Point2<f64> {
        self.state.borrow().position
    }

    /// Positions after each completed move.
    #[must_use]
    pub fn trail(&self) -> Vec<Point2<f64>> {
        self.state.borrow().trail.clone()
    }

    /// Completed moves, in order.
    #[must_use]
    pub fn moves(&self) -> Vec<(RelativeMove, f64)> {
        self.state.borrow().moves.clone()
    }

    /// Number of attempted reads, failed ones included.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.state.borrow().reads
    }

    /// Noise-free score at `position`.
    #[must_use]
    pub fn score_at(&self, position: &Point2<f64>) -> SignalScore {
        SignalScore::from_reading(self.state.borrow().field.reading_at(position))
    }
}

/// [`Mover`] handle onto a [`SimulatedWorld`].
#[derive(Clone)]
pub struct SimMover {
    state: Rc<RefCell<WorldState>>,
}

impl std::fmt::Debug for SimMover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimMover").finish_non_exhaustive()
    }
}

impl Mover for SimMover {
    fn move_by(&mut self, motion: RelativeMove, distance: f64) -> Result<(), MotionFault> {
        self.state.borrow_mut().apply_move(motion, distance)
    }
}

/// [`RawSignalSource`] handle onto a [`SimulatedWorld`].
#[derive(Clone)]
pub struct SimSensor {
    state: Rc<RefCell<WorldState>>,
}

impl std::fmt::Debug for SimSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimSensor").finish_non_exhaustive()
    }
}

impl RawSignalSource for SimSensor {
    fn read(&mut self) -> Result<f64, SensorUnavailable> {
        self.state.borrow_mut().take_reading()
    }
}

// ============================================================================
// Lightweight mocks
// ============================================================================

#[derive(Debug, Clone)]
enum Script {
    Sequence(Vec<f64>),
    Cycling(Vec<f64>),
}

/// A signal source that replays fixed readings.
///
/// # Example
///
/// ```
/// use homing_nav::sim::ScriptedSignal;
/// use homing_nav::RawSignalSource;
///
/// let mut source = ScriptedSignal::sequence(vec![-50.0, -45.0]);
/// assert_eq!(source.read(), Ok(-50.0));
/// assert_eq!(source.read(), Ok(-45.0));
/// assert!(source.read().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSignal {
    script: Script,
    cursor: usize,
    failures_left: usize,
    reads: usize,
}

impl ScriptedSignal {
    /// Replays `readings` once, then reports the source as unavailable.
    #[must_use]
    pub const fn sequence(readings: Vec<f64>) -> Self {
        Self::from_script(Script::Sequence(readings))
    }

    /// Replays `readings` forever.
    ///
    /// An empty list behaves like an exhausted sequence.
    #[must_use]
    pub const fn cycling(readings: Vec<f64>) -> Self {
        Self::from_script(Script::Cycling(readings))
    }

    /// Always returns `reading`.
    #[must_use]
    pub fn constant(reading: f64) -> Self {
        Self::cycling(vec![reading])
    }

    const fn from_script(script: Script) -> Self {
        Self {
            script,
            cursor: 0,
            failures_left: 0,
            reads: 0,
        }
    }

    /// Fails the first `count` reads without consuming the script.
    #[must_use]
    pub const fn failing_first(mut self, count: usize) -> Self {
        self.failures_left = count;
        self
    }

    /// Number of attempted reads, failed ones included.
    #[must_use]
    pub const fn reads(&self) -> usize {
        self.reads
    }
}

impl RawSignalSource for ScriptedSignal {
    fn read(&mut self) -> Result<f64, SensorUnavailable> {
        self.reads += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(SensorUnavailable::new("scripted dropout"));
        }

        let reading = match &self.script {
            Script::Sequence(readings) => readings.get(self.cursor).copied(),
            Script::Cycling(readings) if readings.is_empty() => None,
            Script::Cycling(readings) => Some(readings[self.cursor % readings.len()]),
        };
        let reading = reading.ok_or_else(|| SensorUnavailable::new("script exhausted"))?;
        self.cursor += 1;
        Ok(reading)
    }
}

/// A mover that records moves and tracks the net displacement.
#[derive(Debug, Clone, Default)]
pub struct RecordingMover {
    moves: Vec<(RelativeMove, f64)>,
    reject_after: Option<usize>,
}

impl RecordingMover {
    /// Creates a mover that accepts every move.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every move once `count` moves have been accepted.
    #[must_use]
    pub const fn rejecting_after(mut self, count: usize) -> Self {
        self.reject_after = Some(count);
        self
    }

    /// Accepted moves, in order.
    #[must_use]
    pub fn moves(&self) -> &[(RelativeMove, f64)] {
        &self.moves
    }

    /// Net displacement of all accepted moves.
    #[must_use]
    pub fn displacement(&self) -> Vector2<f64> {
        self.moves
            .iter()
            .fold(Vector2::zeros(), |acc, &(motion, distance)| {
                acc + motion.unit_offset() * distance
            })
    }
}

impl Mover for RecordingMover {
    fn move_by(&mut self, motion: RelativeMove, distance: f64) -> Result<(), MotionFault> {
        if self.reject_after.is_some_and(|limit| self.moves.len() >= limit) {
            return Err(MotionFault::new(motion, distance, "recording mover rejected the move"));
        }
        self.moves.push((motion, distance));
        Ok(())
    }
}
