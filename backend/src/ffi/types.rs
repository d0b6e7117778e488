//! Type conversion utilities for FFI boundary
//!
//! Converts engine results and errors into Python objects.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::engine::DrawError;
use crate::models::AuditLogEntry;

/// Map an engine error onto a Python exception
///
/// Caller mistakes (`InvalidCount`, `AlreadyPinned`) become `ValueError`;
/// everything else becomes `RuntimeError`.
pub fn draw_error_to_py(err: DrawError) -> PyErr {
    match err {
        DrawError::InvalidCount { .. } | DrawError::AlreadyPinned(_) => {
            PyValueError::new_err(err.to_string())
        }
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Convert an audit entry to a Python dict
pub fn entry_to_py(py: Python<'_>, entry: &AuditLogEntry) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("max", entry.max)?;
    dict.set_item("count", entry.count)?;
    dict.set_item("height", entry.height)?;
    dict.set_item("salt", &entry.salt)?;
    dict.set_item("result", entry.result.clone())?;
    Ok(dict.unbind())
}
