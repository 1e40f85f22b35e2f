// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geographic coordinates and great-circle measurements.
//!
//! All angular comparisons in the workspace go through [`LonLat::bearing_to`]
//! so that one projection is used consistently.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Longitude is x, latitude is y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LonLat {
    lon: f64,
    lat: f64,
}

impl LonLat {
    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lon: f64, lat: f64) -> Result<Self> {
        if !lon.is_finite()
            || !lat.is_finite()
            || !(-180.0..=180.0).contains(&lon)
            || !(-90.0..=90.0).contains(&lat)
        {
            return Err(Error::InvalidCoordinate { lon, lat });
        }
        Ok(Self { lon, lat })
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Initial great-circle bearing towards `other`, in degrees `[0, 360)`
    /// clockwise from north.
    pub fn bearing_to(&self, other: LonLat) -> f64 {
        let (phi1, phi2) = (self.lat.to_radians(), other.lat.to_radians());
        let delta_lambda = (other.lon - self.lon).to_radians();
        let y = delta_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();
        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }

    /// Haversine distance in meters.
    pub fn distance_m(&self, other: LonLat) -> f64 {
        let (phi1, phi2) = (self.lat.to_radians(), other.lat.to_radians());
        let delta_phi = phi2 - phi1;
        let delta_lambda = (other.lon - self.lon).to_radians();
        let a = (delta_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
        EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LonLat({}, {})", self.lon, self.lat)
    }
}

/// Normalizes an angle in degrees to `(-180, 180]`.
pub fn normalize_delta(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}
