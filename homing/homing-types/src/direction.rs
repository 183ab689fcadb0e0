//! Compass directions and body-relative moves.
//!
//! This module defines the closed [`Direction`] type used throughout the
//! homing navigator, together with the four body-relative moves
//! ([`RelativeMove`]) a vehicle actually executes.
//!
//! # Conventions
//!
//! The vehicle's body frame is fixed for the whole flight:
//!
//! - `Forward` is north (`+y`)
//! - `Right` is east (`+x`)
//!
//! Diagonal compass directions are flown as two body moves of the same
//! distance (e.g. north-east is forward, then right).
//!
//! # Example
//!
//! ```
//! use homing_types::{Direction, RelativeMove};
//!
//! let heading = Direction::NorthEast;
//! assert_eq!(heading.opposite(), Direction::SouthWest);
//! assert_eq!(
//!     heading.relative_moves(),
//!     &[RelativeMove::Forward, RelativeMove::Right]
//! );
//! ```

use nalgebra::Vector2;
use rand::Rng;

/// One of the four moves a vehicle can make relative to its body frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelativeMove {
    /// Move along the body's nose (`+y`).
    Forward,
    /// Move against the body's nose (`-y`).
    Back,
    /// Move to the body's left (`-x`).
    Left,
    /// Move to the body's right (`+x`).
    Right,
}

impl RelativeMove {
    /// Unit displacement of this move in the body frame.
    #[must_use]
    pub fn unit_offset(self) -> Vector2<f64> {
        match self {
            Self::Forward => Vector2::new(0.0, 1.0),
            Self::Back => Vector2::new(0.0, -1.0),
            Self::Left => Vector2::new(-1.0, 0.0),
            Self::Right => Vector2::new(1.0, 0.0),
        }
    }

    /// Returns the move that undoes this one.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Back,
            Self::Back => Self::Forward,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A compass heading, plus the two navigator sentinels.
///
/// The eight compass points are ordered clockwise starting at north.
/// [`Direction::None`] means "no committed heading" and makes the homing loop
/// explore; [`Direction::Land`] is the terminal command issued on arrival.
///
/// # Example
///
/// ```
/// use homing_types::Direction;
///
/// for d in Direction::COMPASS {
///     assert_eq!(d.opposite().opposite(), d);
/// }
/// assert!(Direction::None.is_sentinel());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// North (body forward).
    North,
    /// North-east.
    NorthEast,
    /// East (body right).
    East,
    /// South-east.
    SouthEast,
    /// South (body back).
    South,
    /// South-west.
    SouthWest,
    /// West (body left).
    West,
    /// North-west.
    NorthWest,
    /// No committed heading; the next iteration must explore.
    #[default]
    None,
    /// Terminal heading: the vehicle should land.
    Land,
}

impl Direction {
    /// The eight compass points in clockwise order, starting at north.
    pub const COMPASS: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// Zero-based position on the compass wheel, or `None` for sentinels.
    #[must_use]
    pub const fn wheel_index(self) -> Option<usize> {
        match self {
            Self::North => Some(0),
            Self::NorthEast => Some(1),
            Self::East => Some(2),
            Self::SouthEast => Some(3),
            Self::South => Some(4),
            Self::SouthWest => Some(5),
            Self::West => Some(6),
            Self::NorthWest => Some(7),
            Self::None | Self::Land => None,
        }
    }

    /// Compass point at a zero-based wheel position (taken modulo 8).
    #[must_use]
    pub const fn from_wheel_index(index: usize) -> Self {
        Self::COMPASS[index % 8]
    }

    /// Returns `true` for [`Direction::None`] and [`Direction::Land`].
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        matches!(self, Self::None | Self::Land)
    }

    /// Returns `true` for the eight compass points.
    #[must_use]
    pub const fn is_compass(self) -> bool {
        !self.is_sentinel()
    }

    /// Returns `true` for the four diagonal compass points.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::NorthEast | Self::SouthEast | Self::SouthWest | Self::NorthWest
        )
    }

    /// Rotates a compass point clockwise by `steps` eighth-turns.
    ///
    /// Sentinels are returned unchanged.
    #[must_use]
    pub const fn rotated(self, steps: usize) -> Self {
        match self.wheel_index() {
            Some(index) => Self::from_wheel_index(index + steps % 8),
            None => self,
        }
    }

    /// The compass point directly behind this one (half a turn away).
    ///
    /// Sentinels have no opposite and are returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use homing_types::Direction;
    ///
    /// assert_eq!(Direction::North.opposite(), Direction::South);
    /// assert_eq!(Direction::SouthEast.opposite(), Direction::NorthWest);
    /// assert_eq!(Direction::None.opposite(), Direction::None);
    /// ```
    #[must_use]
    pub const fn opposite(self) -> Self {
        self.rotated(4)
    }

    /// Picks one of the eight compass points uniformly at random.
    ///
    /// Never returns a sentinel.
    ///
    /// # Example
    ///
    /// ```
    /// use homing_types::Direction;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// assert!(Direction::random(&mut rng).is_compass());
    /// ```
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::COMPASS[rng.gen_range(0..Self::COMPASS.len())]
    }

    /// Body moves that fly this heading, in order.
    ///
    /// Diagonals take two moves; sentinels produce no motion.
    #[must_use]
    pub const fn relative_moves(self) -> &'static [RelativeMove] {
        use RelativeMove::{Back, Forward, Left, Right};
        match self {
            Self::North => &[Forward],
            Self::NorthEast => &[Forward, Right],
            Self::East => &[Right],
            Self::SouthEast => &[Back, Right],
            Self::South => &[Back],
            Self::SouthWest => &[Back, Left],
            Self::West => &[Left],
            Self::NorthWest => &[Forward, Left],
            Self::None | Self::Land => &[],
        }
    }

    /// Displacement produced by flying this heading one step of unit length.
    ///
    /// Diagonals move one unit on each axis.
    #[must_use]
    pub fn unit_offset(self) -> Vector2<f64> {
        self.relative_moves()
            .iter()
            .fold(Vector2::zeros(), |acc, m| acc + m.unit_offset())
    }

    /// Short compass label (`"N"`, `"NE"`, ..., `"NONE"`, `"LAND"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
            Self::None => "NONE",
            Self::Land => "LAND",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
