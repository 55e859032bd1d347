//! Fixed position source
//!
//! Reports the same coordinate on every fix. Backs the manual `--from`
//! origin on the command line.

use crate::coord::Coordinate;
use crate::error::Result;
use crate::location::{FixOptions, LocationError, PositionFix, PositionSource};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPositionSource {
    coordinate: Coordinate,
}

impl FixedPositionSource {
    pub fn new(coordinate: Coordinate) -> Result<Self> {
        coordinate.validate()?;
        Ok(Self { coordinate })
    }
}

impl PositionSource for FixedPositionSource {
    async fn current_position(
        &self,
        _options: &FixOptions,
    ) -> std::result::Result<PositionFix, LocationError> {
        Ok(PositionFix::now(self.coordinate, Some(0.0)))
    }
}
