//! Python bindings for the bcp-tracker Rust library.
//!
//! Exposes [`PipelineTracker`] so a Python dashboard can drive the checklist
//! and read every derived figure without reimplementing the rules. Calls are
//! serialized by the GIL.

use anyhow::Context;
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use bcp_tracker::errors::ConfigurationError;
use bcp_tracker::observability::init_tracing;
use bcp_tracker::prelude::{
    CheckRegistry, PipelineTracker, RegistryDefinition, StageAction, StageRef, TrackerConfig,
};

/// Python wrapper for the tracker.
#[pyclass(name = "PipelineTracker")]
pub struct PyPipelineTracker {
    inner: PipelineTracker,
}

#[pymethods]
impl PyPipelineTracker {
    /// Creates a tracker for the BCP pipeline with every check false.
    #[new]
    fn new() -> Self {
        Self {
            inner: PipelineTracker::bcp().with_config(TrackerConfig::from_env()),
        }
    }

    /// Creates a tracker from a JSON registry definition file.
    #[staticmethod]
    fn from_definition_file(path: String) -> PyResult<Self> {
        let registry = load_registry(&path).map_err(|err| PyRuntimeError::new_err(format!("{err:#}")))?;
        Ok(Self {
            inner: PipelineTracker::new(registry).with_config(TrackerConfig::from_env()),
        })
    }

    /// Session identifier.
    #[getter]
    fn session_id(&self) -> String {
        self.inner.session_id().to_string()
    }

    /// Ordered check names of a stage (number or key).
    fn check_names(&self, stage: &Bound<'_, PyAny>) -> PyResult<Vec<String>> {
        let names = self.inner.check_names(stage_ref(stage)?).map_err(key_error)?;
        Ok(names.to_vec())
    }

    /// Current value of one check.
    fn value(&self, stage: &Bound<'_, PyAny>, check: &str) -> PyResult<bool> {
        self.inner.value(stage_ref(stage)?, check).map_err(key_error)
    }

    /// Flips one check.
    fn toggle(&mut self, stage: &Bound<'_, PyAny>, check: &str) -> PyResult<()> {
        self.inner.toggle(stage_ref(stage)?, check).map_err(key_error)
    }

    /// Progress of one stage as `{"passed", "total", "percentage"}`.
    fn stage_progress(&self, py: Python<'_>, stage: &Bound<'_, PyAny>) -> PyResult<PyObject> {
        let progress = self.inner.stage_progress(stage_ref(stage)?).map_err(key_error)?;
        let dict = PyDict::new_bound(py);
        dict.set_item("passed", progress.passed)?;
        dict.set_item("total", progress.total)?;
        dict.set_item("percentage", progress.percentage)?;
        Ok(dict.into_py(py))
    }

    /// Whether a stage is blocked. Unknown and negative numbers are not.
    fn is_stage_blocked(&self, stage_number: i64) -> bool {
        u32::try_from(stage_number).is_ok_and(|n| self.inner.is_stage_blocked(n))
    }

    /// Party accountable for a stage.
    fn responsibility(&self, stage_number: i64) -> String {
        u32::try_from(stage_number)
            .map(|n| self.inner.responsibility(n))
            .unwrap_or_default()
            .to_string()
    }

    /// Automation mode of a stage.
    fn automation(&self, stage_number: i64) -> String {
        u32::try_from(stage_number)
            .map(|n| self.inner.automation(n))
            .unwrap_or_default()
            .to_string()
    }

    /// Derived status of a stage.
    fn stage_status(&self, stage: &Bound<'_, PyAny>) -> PyResult<String> {
        let status = self.inner.stage_status(stage_ref(stage)?).map_err(key_error)?;
        Ok(status.to_string())
    }

    /// Overall status as `{"passed", "total", "percentage"}`.
    fn overall_status(&self, py: Python<'_>) -> PyResult<PyObject> {
        let overall = self.inner.overall_status();
        let dict = PyDict::new_bound(py);
        dict.set_item("passed", overall.passed)?;
        dict.set_item("total", overall.total)?;
        dict.set_item("percentage", overall.percentage)?;
        dict.set_item("health", self.inner.overall_health().to_string())?;
        Ok(dict.into_py(py))
    }

    /// Actions configured for a stage as `[(name, available)]`.
    fn available_actions(&self, py: Python<'_>, stage: &Bound<'_, PyAny>) -> PyResult<PyObject> {
        let actions = self.inner.available_actions(stage_ref(stage)?).map_err(key_error)?;
        let list = PyList::new_bound(
            py,
            actions
                .into_iter()
                .map(|(action, available)| -> PyObject { (action.to_string(), available).into_py(py) }),
        );
        Ok(list.into_py(py))
    }

    /// Invokes an action by name. Returns `"dispatched"` or the skip reason.
    fn invoke_action(&self, stage: &Bound<'_, PyAny>, action: &str) -> PyResult<String> {
        let action: StageAction = serde_json::from_value(serde_json::Value::String(action.to_string()))
            .map_err(|_| PyValueError::new_err(format!("Unknown action '{action}'")))?;
        let outcome = self
            .inner
            .invoke_action(stage_ref(stage)?, action)
            .map_err(key_error)?;
        let value = serde_json::to_value(outcome).map_err(runtime_error)?;
        Ok(match value.get("reason").and_then(serde_json::Value::as_str) {
            Some(reason) => reason.to_string(),
            None => "dispatched".to_string(),
        })
    }

    /// Full dashboard snapshot as pretty-printed JSON.
    fn snapshot_json(&self) -> PyResult<String> {
        self.inner.snapshot().to_json_pretty().map_err(runtime_error)
    }

    fn __repr__(&self) -> String {
        let overall = self.inner.overall_status();
        format!(
            "PipelineTracker(stages={}, passed={}/{}, percentage={}%)",
            self.inner.registry().len(),
            overall.passed,
            overall.total,
            overall.percentage
        )
    }
}

/// Installs the global tracing subscriber from the environment.
///
/// Returns false if a subscriber was already installed.
#[pyfunction]
fn init_logging() -> bool {
    init_tracing(&TrackerConfig::from_env().logging)
}

// Helper functions

fn load_registry(path: &str) -> anyhow::Result<CheckRegistry> {
    let definition = RegistryDefinition::from_path(path)
        .with_context(|| format!("failed to read registry definition from {path}"))?;
    CheckRegistry::new(definition).with_context(|| format!("invalid registry definition in {path}"))
}

fn stage_ref(obj: &Bound<'_, PyAny>) -> PyResult<StageRef> {
    if let Ok(number) = obj.extract::<u32>() {
        return Ok(StageRef::Number(number));
    }
    if let Ok(key) = obj.extract::<String>() {
        return Ok(StageRef::Key(key));
    }
    Err(PyKeyError::new_err(format!(
        "stage must be a stage number or key, got {}",
        obj.repr()?
    )))
}

/// `KeyError(message, details)` where `details` is the error's dict form.
fn key_error(err: ConfigurationError) -> PyErr {
    Python::with_gil(|py| {
        let details = json_to_py(py, &err.to_value()).unwrap_or_else(|_| py.None());
        PyKeyError::new_err((err.to_string(), details))
    })
}

fn json_to_py(py: Python<'_>, value: &serde_json::Value) -> PyResult<PyObject> {
    Ok(match value {
        serde_json::Value::Null => py.None(),
        serde_json::Value::Bool(b) => b.into_py(py),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.into_py(py),
            (None, Some(f)) => f.into_py(py),
            (None, None) => py.None(),
        },
        serde_json::Value::String(s) => s.into_py(py),
        serde_json::Value::Array(items) => {
            let items = items
                .iter()
                .map(|v| json_to_py(py, v))
                .collect::<PyResult<Vec<_>>>()?;
            PyList::new_bound(py, items).into_py(py)
        }
        serde_json::Value::Object(map) => {
            let dict = PyDict::new_bound(py);
            for (k, v) in map {
                dict.set_item(k, json_to_py(py, v)?)?;
            }
            dict.into_py(py)
        }
    })
}

fn runtime_error(err: serde_json::Error) -> PyErr {
    PyRuntimeError::new_err(err.to_string())
}

/// The bcp_tracker Python module.
#[pymodule]
fn bcp_tracker_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPipelineTracker>()?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
