//! Catalog configuration for the solar-system simulation.
//!
//! This module defines a thin, `serde`-deserializable representation of the
//! body catalog. A catalog consists of:
//!
//! - [`BodyConfig`]    – initial state and display attributes of one body
//! - [`CatalogConfig`] – epoch date plus the body list, loadable from YAML
//!
//! # YAML format
//! An example catalog YAML matching these types:
//!
//! ```yaml
//! epoch: 2022-01-01
//! bodies:
//!   - name: "Sun"
//!     image: "sun.jpeg"
//!     display_radius: 15.0
//!     m: 1.98847e30
//!     x: [ -1.283674643550172e9, 5.007104996950605e8 ]
//!     v: [ -5.809369653802155, -1.461959576560110e1 ]
//! ```
//!
//! A built-in catalog (the Sun and eight planets, state vectors from the
//! JPL Horizons system for 2022-01-01, barycentric, SI units) is compiled in
//! so no file is needed for the default session.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::simulation::states::{Body, NVec2, System};

/// Configuration for a single body's initial state and display attributes.
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String, // unique identity within the catalog
    pub image: String, // image reference, opaque to the core
    pub display_radius: f64, // sprite size in pixels at zoom 1.0
    pub m: f64, // mass in kg
    pub x: [f64; 2], // epoch position in m
    pub v: [f64; 2], // epoch velocity in m/s
}

/// Top-level catalog: the epoch the state vectors are anchored to, plus the
/// bodies themselves.
#[derive(Deserialize, Debug, Clone)]
pub struct CatalogConfig {
    pub epoch: NaiveDate,
    pub bodies: Vec<BodyConfig>,
}

impl CatalogConfig {
    /// The built-in nine-body solar system.
    ///
    /// Distances are from the solar-system barycenter for 2022-01-01,
    /// https://ssd.jpl.nasa.gov/horizons/app.html#/ (converted km -> m).
    pub fn builtin() -> Self {
        let body = |name: &str, image: &str, display_radius: f64, m: f64, x: [f64; 2], v: [f64; 2]| {
            BodyConfig {
                name: name.to_string(),
                image: image.to_string(),
                display_radius,
                m,
                x,
                v,
            }
        };

        Self {
            epoch: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            bodies: vec![
                body(
                    "Sun", "sun.jpeg", 15.0, 1.98847e30,
                    [-1.283674643550172e9, 5.007104996950605e8],
                    [-5.809369653802155, -1.461959576560110e1],
                ),
                body(
                    "Mercury", "mercury.jpeg", 3.0, 0.30104e24,
                    [5.242617205495467e10, -5.596063357617276e9],
                    [-3.931719860392732e3, 5.056613955108243e4],
                ),
                body(
                    "Venus", "venus.jpeg", 5.0, 4.8673e24,
                    [-1.143612889654620e10, 1.076180391552140e11],
                    [-3.498958532524220e4, -3.509011592387367e3],
                ),
                body(
                    "Earth", "earth.jpeg", 6.0, 5.9722e24,
                    [-2.741147560901964e10, 1.452697499646169e11],
                    [-2.981801522121922e4, -5.415519940416356e3],
                ),
                body(
                    "Mars", "mars.jpeg", 4.0, 0.64169e24,
                    [-1.309510737126251e11, -1.893127398896606e11],
                    [2.090994471204196e4, -1.160503586188451e4],
                ),
                body(
                    "Jupiter", "jupiter.jpeg", 13.0, 1898.13e24,
                    [6.955554713494443e11, -2.679620040967891e11],
                    [4.539612624165795e3, 1.280513202430234e4],
                ),
                body(
                    "Saturn", "saturn.png", 20.0, 568.32e24,
                    [1.039929082221698e12, -1.056650148100382e12],
                    [6.345150014839902e3, 6.756117343710409e3],
                ),
                body(
                    "Uranus", "uranus.jpeg", 12.0, 86.811e24,
                    [2.152570437700128e12, 2.016888245555490e12],
                    [-4.705853565766252e3, 4.652144641704226e3],
                ),
                body(
                    "Neptune", "neptune.jpeg", 12.0, 102.409e24,
                    [4.431790029686977e12, -6.114486878028781e11],
                    [7.066237951457524e2, 5.417076605926207e3],
                ),
            ],
        }
    }

    /// Bodies: map `BodyConfig` -> runtime `Body` with the system at t = 0
    /// (i.e. at the catalog epoch).
    pub fn build_system(&self) -> System {
        let bodies: Vec<Body> = self
            .bodies
            .iter()
            .map(|bc: &BodyConfig| Body {
                name: bc.name.clone(),
                x: NVec2::new(bc.x[0], bc.x[1]),
                v: NVec2::new(bc.v[0], bc.v[1]),
                a: NVec2::zeros(),
                m: bc.m,
                display_radius: bc.display_radius,
                image: bc.image.clone(),
            })
            .collect();

        System { bodies, t: 0.0 }
    }
}
