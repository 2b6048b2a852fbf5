use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::Rng;

use crate::config::{FieldAxis, ScatteringModel, SimulationConfig};
use crate::core::{CollisionCatalog, CollisionKind, Simulation, SimulationOutput};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_axis(axis: &str) -> PyResult<FieldAxis> {
    match axis {
        "x" | "X" => Ok(FieldAxis::X),
        "y" | "Y" => Ok(FieldAxis::Y),
        "z" | "Z" => Ok(FieldAxis::Z),
        other => Err(py_err(format!("field_axis must be 'x', 'y' or 'z', got {other:?}"))),
    }
}

fn kind_code(kind: CollisionKind) -> f64 {
    match kind {
        CollisionKind::Elastic => 0.0,
        CollisionKind::Excitation => 1.0,
        CollisionKind::Ionization => 2.0,
    }
}

/// SwarmSim: Python-facing wrapper around the Rust transport engine.
///
/// API:
/// - __new__(cross_sections, max_collisions=10_000_000, num_electrons=1000, reduced_field=100.0,
///           distance=0.01, pressure=10.0, diameter=0.05, seed=None, field_axis="z", isotropic=False)
/// - run() -> np.ndarray, shape (M, 9)
/// - density / field_strength / max_frequency (after run)
#[pyclass]
pub struct SwarmSim {
    config: SimulationConfig,
    catalog: CollisionCatalog,
    last: Option<SimulationOutput>,
}

#[pymethods]
impl SwarmSim {
    /// Build a simulation from cross-section file text and run parameters.
    ///
    /// Parameters
    /// - cross_sections: text in the ELASTIC/EXCITATION/IONIZATION block format
    /// - seed: generator seed (int); None draws one from the OS-seeded thread RNG
    ///
    /// Errors: raises ValueError on malformed data or invalid parameters.
    #[new]
    #[pyo3(signature = (
        cross_sections,
        max_collisions=10_000_000,
        num_electrons=1000,
        reduced_field=100.0,
        distance=0.01,
        pressure=10.0,
        diameter=0.05,
        seed=None,
        field_axis="z",
        isotropic=false,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        cross_sections: &str,
        max_collisions: u64,
        num_electrons: usize,
        reduced_field: f64,
        distance: f64,
        pressure: f64,
        diameter: f64,
        seed: Option<u32>,
        field_axis: &str,
        isotropic: bool,
    ) -> PyResult<Self> {
        let catalog = CollisionCatalog::parse(cross_sections).map_err(py_err)?;
        let config = SimulationConfig {
            max_collisions,
            num_electrons,
            reduced_field,
            distance,
            pressure,
            diameter,
            seed: seed.unwrap_or_else(|| rand::rng().random()),
            field_axis: parse_axis(field_axis)?,
            scattering: if isotropic {
                ScatteringModel::Isotropic
            } else {
                ScatteringModel::Anisotropic
            },
            ..Default::default()
        };
        config.validate().map_err(py_err)?;
        Ok(Self {
            config,
            catalog,
            last: None,
        })
    }

    /// Run the simulation (releases the GIL) and return events as a float64 array
    /// with columns [t, x, y, z, energy, order, electron_id, channel, kind]
    /// where kind is 0 elastic, 1 excitation, 2 ionization.
    fn run(&mut self, py: Python<'_>) -> PyResult<Py<PyArray2<f64>>> {
        let sim = Simulation::new(self.config.clone(), self.catalog.clone()).map_err(py_err)?;
        let output = py.detach(|| sim.run()).map_err(py_err)?;

        let mut arr = Array2::<f64>::zeros((output.events.len(), 9));
        for (i, ev) in output.events.iter().enumerate() {
            arr[[i, 0]] = ev.time_f64();
            arr[[i, 1]] = ev.r[0];
            arr[[i, 2]] = ev.r[1];
            arr[[i, 3]] = ev.r[2];
            arr[[i, 4]] = ev.energy;
            arr[[i, 5]] = f64::from(ev.order);
            arr[[i, 6]] = ev.electron_id as f64;
            arr[[i, 7]] = ev.channel as f64;
            arr[[i, 8]] = kind_code(ev.kind);
        }
        self.last = Some(output);
        Ok(arr.into_pyarray(py).unbind())
    }

    /// Seed actually used by this simulation.
    #[getter]
    fn seed(&self) -> u32 {
        self.config.seed
    }

    /// Gas number density (m^-3) of the last run.
    #[getter]
    fn density(&self) -> Option<f64> {
        self.last.as_ref().map(|o| o.density)
    }

    /// Electric field (V/m) of the last run.
    #[getter]
    fn field_strength(&self) -> Option<f64> {
        self.last.as_ref().map(|o| o.field_strength)
    }

    /// Null-collision ceiling (1/s) of the last run.
    #[getter]
    fn max_frequency(&self) -> Option<f64> {
        self.last.as_ref().map(|o| o.max_frequency)
    }
}

/// The swarmsim Python module entry point.
#[pymodule]
fn swarmsim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<SwarmSim>()?;
    Ok(())
}
