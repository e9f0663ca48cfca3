use super::simulation::FlockSimulation;
use crate::core::{FlockConfig, FlockError};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

impl From<FlockError> for PyErr {
    fn from(err: FlockError) -> PyErr {
        match err {
            FlockError::InvalidConfiguration(_) | FlockError::Config(_) => {
                PyValueError::new_err(err.to_string())
            }
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

#[pyclass]
pub struct PyFlock {
    sim: FlockSimulation,
}

#[pymethods]
impl PyFlock {
    #[new]
    #[pyo3(signature = (population=1600, width=1000.0, height=1000.0, workers=8, seed=None))]
    pub fn new(
        population: usize,
        width: f64,
        height: f64,
        workers: usize,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let cfg = FlockConfig::default()
            .with_population(population)
            .with_bounds(width, height)
            .with_workers(workers);
        Self::build(cfg, seed)
    }

    /// Build from a JSON configuration string; missing fields take defaults.
    #[staticmethod]
    #[pyo3(signature = (json, seed=None))]
    pub fn from_json(json: &str, seed: Option<u64>) -> PyResult<Self> {
        Self::build(FlockConfig::from_json(json)?, seed)
    }

    /// Advance the flock by one frame. Returns the new frame number.
    pub fn tick(&mut self) -> PyResult<u64> {
        self.sim.step_frame()?;
        Ok(self.sim.frame())
    }

    /// `(id, x, y, direction)` for every agent of the latest frame
    pub fn agents(&self) -> Vec<(u32, f64, f64, f64)> {
        self.sim
            .agents()
            .iter()
            .map(|a| (a.id, a.x, a.y, a.direction))
            .collect()
    }

    /// `(index, sprite)` for agents whose rotation sprite changed last frame
    pub fn changed_sprites(&self) -> Vec<(usize, u32)> {
        let sprites = self.sim.sprites();
        sprites
            .changed()
            .filter_map(|i| sprites.get(i).map(|t| (i, t.current)))
            .collect()
    }

    pub fn resize(&mut self, width: f64, height: f64) -> PyResult<()> {
        Ok(self.sim.resize(width, height)?)
    }

    /// Population metrics of the latest frame
    pub fn metrics(&self) -> PyResult<PyObject> {
        let m = self.sim.metrics();
        Python::with_gil(|py| {
            let dict = PyDict::new_bound(py);
            dict.set_item("frame", m.frame)?;
            dict.set_item("population", m.population)?;
            dict.set_item("centroid", (m.centroid.x, m.centroid.y))?;
            dict.set_item("polarization", m.polarization)?;
            dict.set_item("visible", m.visible)?;
            Ok(dict.into())
        })
    }
}

impl PyFlock {
    fn build(cfg: FlockConfig, seed: Option<u64>) -> PyResult<Self> {
        let sim = match seed {
            Some(seed) => FlockSimulation::with_seed(cfg, seed)?,
            None => FlockSimulation::new(cfg)?,
        };
        Ok(PyFlock { sim })
    }
}

/// Initialize tracing for the library.
#[pyfunction]
#[pyo3(name = "setup_logging", signature = (level=None))]
pub fn py_setup_logging(level: Option<String>) {
    crate::setup_logging(level.as_deref());
}
