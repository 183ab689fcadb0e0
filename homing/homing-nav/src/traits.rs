//! Capability interfaces consumed by the navigator.
//!
//! The navigator never talks to hardware directly. It drives a [`Mover`] and
//! reads a [`RawSignalSource`]; the flight infrastructure supplies the real
//! implementations and [`crate::sim`] supplies simulated ones.
//!
//! Both calls are blocking and totally ordered: a move must finish before
//! the next reading is taken, because moving changes what the sensor sees.

use homing_types::{MotionFault, RelativeMove, SensorUnavailable};

/// Something that can move the vehicle along its body axes.
///
/// Implement this trait for your vehicle link to let the navigator fly it.
pub trait Mover {
    /// Moves `distance` along `motion` and returns once the move is complete.
    ///
    /// # Errors
    ///
    /// Returns [`MotionFault`] if the vehicle rejects the command.
    fn move_by(&mut self, motion: RelativeMove, distance: f64) -> Result<(), MotionFault>;
}

/// Something that produces raw signed signal readings (e.g. RSSI in dBm).
pub trait RawSignalSource {
    /// Takes one reading.
    ///
    /// # Errors
    ///
    /// Returns [`SensorUnavailable`] if no reading arrives within the
    /// source's own timeout.
    fn read(&mut self) -> Result<f64, SensorUnavailable>;
}

impl<T: Mover + ?Sized> Mover for &mut T {
    fn move_by(&mut self, motion: RelativeMove, distance: f64) -> Result<(), MotionFault> {
        (**self).move_by(motion, distance)
    }
}

impl<T: Mover + ?Sized> Mover for Box<T> {
    fn move_by(&mut self, motion: RelativeMove, distance: f64) -> Result<(), MotionFault> {
        (**self).move_by(motion, distance)
    }
}

impl<T: RawSignalSource + ?Sized> RawSignalSource for &mut T {
    fn read(&mut self) -> Result<f64, SensorUnavailable> {
        (**self).read()
    }
}

impl<T: RawSignalSource + ?Sized> RawSignalSource for Box<T> {
    fn read(&mut self) -> Result<f64, SensorUnavailable> {
        (**self).read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(usize);

    impl Mover for Counter {
        fn move_by(&mut self, _motion: RelativeMove, _distance: f64) -> Result<(), MotionFault> {
            self.0 += 1;
            Ok(())
        }
    }

    impl RawSignalSource for Counter {
        fn read(&mut self) -> Result<f64, SensorUnavailable> {
            self.0 += 1;
            #[allow(clippy::cast_precision_loss)]
            Ok(-(self.0 as f64))
        }
    }

    fn drive<M: Mover>(mut mover: M) {
        mover.move_by(RelativeMove::Forward, 1.0).ok();
        mover.move_by(RelativeMove::Back, 1.0).ok();
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut counter = Counter(0);
        drive(&mut counter);
        assert_eq!(counter.0, 2);
    }

    #[test]
    fn test_boxed_dyn_forwards() {
        let mut source: Box<dyn RawSignalSource> = Box::new(Counter(0));
        assert_eq!(source.read(), Ok(-1.0));
        assert_eq!(source.read(), Ok(-2.0));

        let mut mover: Box<dyn Mover> = Box::new(Counter(0));
        assert!(mover.move_by(RelativeMove::Left, 0.5).is_ok());
    }
}
