use crate::game::error::ConfigError;
use crate::geometry::{distance, intersects_obstacle, Point};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelConfig {
    pub fuel_cost_per_unit_distance: f64,
    pub speed_units_per_second: f64,
    pub fuel_price_per_unit: f64,
    /// Control point offset from the midpoint, in gravity-well radii.
    pub deflection_factor: f64,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            fuel_cost_per_unit_distance: 0.1,
            speed_units_per_second: 100.0,
            fuel_price_per_unit: 1.5,
            deflection_factor: 1.5,
        }
    }
}

impl TravelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed_units_per_second > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "speed_units_per_second",
                value: self.speed_units_per_second,
            });
        }
        for (field, value) in [
            ("fuel_cost_per_unit_distance", self.fuel_cost_per_unit_distance),
            ("fuel_price_per_unit", self.fuel_price_per_unit),
            ("deflection_factor", self.deflection_factor),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }

    pub fn fuel_required(&self, path_distance: f64, fuel_efficiency: f64) -> f64 {
        path_distance * fuel_efficiency * self.fuel_cost_per_unit_distance
    }

    pub fn duration_secs(&self, path_distance: f64) -> f64 {
        path_distance / self.speed_units_per_second
    }
}

/// The star's exclusion zone. Straight legs crossing it are bent around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityWell {
    pub center: Point,
    pub radius: f64,
}

impl GravityWell {
    pub fn at_origin(radius: f64) -> Self {
        Self {
            center: Point::ORIGIN,
            radius,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TravelPath {
    pub start: Point,
    pub end: Point,
    /// Quadratic control point; present only on curved paths.
    pub control: Option<Point>,
    pub distance: f64,
    pub curved: bool,
}

impl TravelPath {
    /// SVG path data for the presentation layer.
    pub fn svg(&self) -> String {
        match self.control {
            Some(c) => format!(
                "M {} {} Q {} {} {} {}",
                self.start.x, self.start.y, c.x, c.y, self.end.x, self.end.y
            ),
            None => format!(
                "M {} {} L {} {}",
                self.start.x, self.start.y, self.end.x, self.end.y
            ),
        }
    }
}

pub fn plan(start: Point, end: Point, well: GravityWell, deflection_factor: f64) -> TravelPath {
    if !intersects_obstacle(start, end, well.center, well.radius) {
        return TravelPath {
            start,
            end,
            control: None,
            distance: distance(start, end),
            curved: false,
        };
    }

    let mid = start.midpoint(end);
    let offset = well.radius * deflection_factor;
    let (nx, ny) = push_direction(start, end, mid, well, offset);
    let control = Point::new(mid.x + nx * offset, mid.y + ny * offset);

    TravelPath {
        start,
        end,
        control: Some(control),
        // Two-leg approximation of the curve length, shared by fuel and rendering.
        distance: distance(start, control) + distance(control, end),
        curved: true,
    }
}

/// Unit vector from the well center through the midpoint, as long as pushing
/// along it moves the curve sideways by at least the well radius. Legs that
/// pass close to the center have a radial vector running almost along the
/// segment; those are pushed along the segment normal instead, on the side
/// facing away from the center.
fn push_direction(
    start: Point,
    end: Point,
    mid: Point,
    well: GravityWell,
    offset: f64,
) -> (f64, f64) {
    let sx = end.x - start.x;
    let sy = end.y - start.y;
    let seg = sx.hypot(sy);
    let (ux, uy) = if seg > f64::EPSILON {
        (sx / seg, sy / seg)
    } else {
        (1.0, 0.0)
    };
    let (nx, ny) = (-uy, ux);

    let dx = mid.x - well.center.x;
    let dy = mid.y - well.center.y;
    let len = dx.hypot(dy);
    if len > f64::EPSILON {
        let (rx, ry) = (dx / len, dy / len);
        if (rx * nx + ry * ny).abs() * offset >= well.radius {
            return (rx, ry);
        }
    }
    if dx * nx + dy * ny < 0.0 {
        (-nx, -ny)
    } else {
        (nx, ny)
    }
}
