//! PyO3 wrapper for DrawEngine
//!
//! Exposes an engine over a simulated ledger to Python.
//!
//! # Example (from Python)
//!
//! ```python
//! from entropy_draw_core_rs import DrawEngine
//!
//! engine = DrawEngine(genesis_seed=7, initial_blocks=32)
//! entry = engine.commit(10, 3, 31, "round-1")
//! assert engine.is_member(10, 3, 31, "round-1", entry["result"][0])
//! ```

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{draw_error_to_py, entry_to_py};
use crate::core::ledger::{EntropySource, SimulatedLedger};
use crate::engine::{DrawEngine as RustDrawEngine, EngineConfig};
use crate::rng::SamplerConfig;

/// Python wrapper for the Rust draw engine
#[pyclass(name = "DrawEngine")]
pub struct PyDrawEngine {
    inner: RustDrawEngine<SimulatedLedger>,
}

#[pymethods]
impl PyDrawEngine {
    #[new]
    #[pyo3(signature = (genesis_seed = 0, retention_window = 256, initial_blocks = 0, max_collisions = None))]
    fn new(
        genesis_seed: u64,
        retention_window: u64,
        initial_blocks: u64,
        max_collisions: Option<u64>,
    ) -> PyResult<Self> {
        if retention_window == 0 {
            return Err(pyo3::exceptions::PyValueError::new_err(
                "retention_window must be positive",
            ));
        }
        let mut ledger = SimulatedLedger::new(genesis_seed, retention_window);
        ledger.mine_blocks(initial_blocks);
        let config = EngineConfig {
            sampler: SamplerConfig { max_collisions },
        };
        Ok(PyDrawEngine {
            inner: RustDrawEngine::new(ledger, config),
        })
    }

    /// Mine `n` blocks; returns the new current height
    #[pyo3(signature = (n = 1))]
    fn mine(&mut self, n: u64) -> u64 {
        self.inner.source_mut().mine_blocks(n);
        self.inner.source().current_height()
    }

    fn current_height(&self) -> u64 {
        self.inner.source().current_height()
    }

    /// Pin a height; returns the hash as a hex string
    fn pin(&mut self, height: u64) -> PyResult<String> {
        self.inner
            .pin(height)
            .map(|hash| hash.to_hex())
            .map_err(draw_error_to_py)
    }

    fn pinned(&self, height: u64) -> Option<String> {
        self.inner.pinned(height).map(|hash| hash.to_hex())
    }

    fn draw(&mut self, max: u64, count: u64, height: u64, salt: &str) -> PyResult<Vec<u64>> {
        self.inner
            .draw(max, count, height, salt)
            .map(|result| result.into_values())
            .map_err(draw_error_to_py)
    }

    fn commit(
        &mut self,
        py: Python,
        max: u64,
        count: u64,
        height: u64,
        salt: &str,
    ) -> PyResult<Py<PyDict>> {
        let entry = self
            .inner
            .commit(max, count, height, salt)
            .map_err(draw_error_to_py)?;
        entry_to_py(py, &entry)
    }

    fn is_member(
        &self,
        max: u64,
        count: u64,
        height: u64,
        salt: &str,
        candidate: u64,
    ) -> PyResult<bool> {
        self.inner
            .is_member(max, count, height, salt, candidate)
            .map_err(draw_error_to_py)
    }

    /// All audit entries as a list of dicts
    fn audit_log(&self, py: Python) -> PyResult<Vec<Py<PyDict>>> {
        self.inner
            .audit_log()
            .entries()
            .iter()
            .map(|entry| entry_to_py(py, entry))
            .collect()
    }
}
