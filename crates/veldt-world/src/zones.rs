use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ZoneError {
    #[error("flat zone falloff must be positive (got {0})")]
    NonPositiveFalloff(f32),
    #[error("flat zone core radius must be non-negative (got {0})")]
    NegativeCoreRadius(f32),
    #[error("ramp zone margin must be positive (got {0})")]
    NonPositiveMargin(f32),
    #[error("ramp zone half width must be positive (got {0})")]
    NonPositiveHalfWidth(f32),
    #[error("ramp zone north bound {north} must exceed south bound {south}")]
    InvertedBounds { north: f32, south: f32 },
}

/// Circular plateau override: terrain is pulled to `target_height` with
/// full strength inside `core_radius` and a smooth falloff to zero at
/// `core_radius + falloff`.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct FlatZone {
    pub x: f32,
    pub z: f32,
    pub core_radius: f32,
    pub falloff: f32,
    pub target_height: f32,
}

impl FlatZone {
    pub fn validate(&self) -> Result<(), ZoneError> {
        if self.core_radius < 0.0 {
            return Err(ZoneError::NegativeCoreRadius(self.core_radius));
        }
        if self.falloff <= 0.0 {
            return Err(ZoneError::NonPositiveFalloff(self.falloff));
        }
        Ok(())
    }

    /// Blend weight at planar distance `d` from the zone center.
    /// 1 inside the core, cubic falloff to 0 at core + falloff.
    #[inline]
    pub fn weight(&self, d: f32) -> f32 {
        if d <= self.core_radius {
            1.0
        } else if d >= self.core_radius + self.falloff {
            0.0
        } else {
            1.0 - smoothstep((d - self.core_radius) / self.falloff)
        }
    }
}

/// Rectangular carved descent: between the north and south z bounds the
/// terrain is lowered toward a linear ramp from `start_height` (north
/// edge) to `end_height` (south edge). The override never raises ground.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RampZone {
    pub center_x: f32,
    pub half_width: f32,
    pub north: f32,
    pub south: f32,
    pub start_height: f32,
    pub end_height: f32,
    pub margin: f32,
}

impl RampZone {
    pub fn validate(&self) -> Result<(), ZoneError> {
        if self.half_width <= 0.0 {
            return Err(ZoneError::NonPositiveHalfWidth(self.half_width));
        }
        if self.margin <= 0.0 {
            return Err(ZoneError::NonPositiveMargin(self.margin));
        }
        if self.north <= self.south {
            return Err(ZoneError::InvertedBounds {
                north: self.north,
                south: self.south,
            });
        }
        Ok(())
    }

    /// Ramp surface height at `z`, linear from south to north.
    #[inline]
    pub fn surface_height(&self, z: f32) -> f32 {
        let t = (z - self.south) / (self.north - self.south);
        self.end_height + (self.start_height - self.end_height) * t
    }

    /// Blend weight from the x-distance to the centerline: 1 inside the
    /// half width, cubic falloff to 0 across the margin. Zero outside
    /// the z bounds.
    #[inline]
    pub fn weight(&self, x: f32, z: f32) -> f32 {
        if z < self.south || z > self.north {
            return 0.0;
        }
        let dx = (x - self.center_x).abs();
        if dx <= self.half_width {
            1.0
        } else if dx >= self.half_width + self.margin {
            0.0
        } else {
            1.0 - smoothstep((dx - self.half_width) / self.margin)
        }
    }
}

/// Cubic smoothstep on [0, 1]: zero derivative at both ends, so zone
/// boundaries never show a crease.
#[inline]
pub(crate) fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> FlatZone {
        FlatZone {
            x: 0.0,
            z: 0.0,
            core_radius: 16.0,
            falloff: 12.0,
            target_height: 20.0,
        }
    }

    #[test]
    fn flat_zone_rejects_degenerate_falloff() {
        let mut z = flat();
        z.falloff = 0.0;
        assert_eq!(z.validate(), Err(ZoneError::NonPositiveFalloff(0.0)));
    }

    #[test]
    fn flat_zone_weight_profile() {
        let z = flat();
        assert_eq!(z.weight(0.0), 1.0);
        assert_eq!(z.weight(16.0), 1.0);
        assert_eq!(z.weight(28.0), 0.0);
        assert_eq!(z.weight(100.0), 0.0);
        let mid = z.weight(22.0);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn ramp_zone_rejects_inverted_bounds() {
        let z = RampZone {
            center_x: 0.0,
            half_width: 4.0,
            north: -10.0,
            south: 10.0,
            start_height: 20.0,
            end_height: 5.0,
            margin: 2.0,
        };
        assert!(matches!(
            z.validate(),
            Err(ZoneError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn ramp_surface_interpolates_north_to_south() {
        let z = RampZone {
            center_x: 0.0,
            half_width: 4.0,
            north: 100.0,
            south: 0.0,
            start_height: 20.0,
            end_height: 5.0,
            margin: 2.0,
        };
        assert_eq!(z.surface_height(100.0), 20.0);
        assert_eq!(z.surface_height(0.0), 5.0);
        assert_eq!(z.surface_height(50.0), 12.5);
    }

    #[test]
    fn smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);
    }
}
