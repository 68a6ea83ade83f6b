use crate::{
    components, encode, format_decimal, parse_input, step, toggle_bit,
    BitPattern, Direction, FloatComponents, Precision,
};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::format;
use std::string::{String, ToString};

fn to_precision(name: &str) -> PyResult<Precision> {
    Precision::from_string(name)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

fn to_direction(name: &str) -> PyResult<Direction> {
    match name.to_ascii_lowercase().as_str() {
        "next" => Ok(Direction::Next),
        "prev" => Ok(Direction::Prev),
        _ => Err(PyValueError::new_err(format!(
            "invalid direction {:?}, expected \"next\" or \"prev\"",
            name
        ))),
    }
}

/// The fields of a stored bit pattern.
///
/// This class holds the sign, exponent and mantissa fields as strings of
/// '0' and '1', and the value that the format stores.
#[pyclass(name = "Components")]
struct PyComponents {
    inner: FloatComponents,
}

#[pymethods]
impl PyComponents {
    /// The sign bit, as "0" or "1".
    #[getter]
    fn sign(&self) -> String {
        self.inner.sign.clone()
    }
    /// The exponent field, most significant bit first.
    #[getter]
    fn exponent(&self) -> String {
        self.inner.exponent.clone()
    }
    /// The mantissa field, most significant bit first.
    #[getter]
    fn mantissa(&self) -> String {
        self.inner.mantissa.clone()
    }
    #[getter]
    fn full_binary(&self) -> String {
        self.inner.full_binary.clone()
    }
    #[getter]
    fn hex(&self) -> String {
        self.inner.hex.clone()
    }
    /// The value that the format stores.
    #[getter]
    fn value(&self) -> f64 {
        self.inner.value
    }
    /// Returns the category of the pattern as a string.
    fn get_category(&self) -> String {
        self.inner.category().as_string().to_string()
    }
    fn __str__(&self) -> String {
        format!("{}", self.inner)
    }
    fn __repr__(&self) -> String {
        self.__str__()
    }
}

/// Returns the bit pattern of `value` in the given precision.
///
/// Args:
///     value: The number to encode
///     precision: "half", "single" or "double"
#[pyfunction(name = "encode")]
fn py_encode(value: f64, precision: &str) -> PyResult<u64> {
    Ok(encode(value, to_precision(precision)?).bits())
}

/// Returns the number that the bit pattern stores.
///
/// Args:
///     bits: The pattern, as an integer
///     precision: "half", "single" or "double"
#[pyfunction(name = "decode")]
fn py_decode(bits: u64, precision: &str) -> PyResult<f64> {
    let precision = to_precision(precision)?;
    Ok(BitPattern::new(bits, precision).decode())
}

/// Splits the pattern of `value` into its fields.
#[pyfunction(name = "components")]
fn py_components(value: f64, precision: &str) -> PyResult<PyComponents> {
    Ok(PyComponents {
        inner: components(value, to_precision(precision)?),
    })
}

/// Flips the bit at `index` (zero is the sign bit) of the stored pattern.
#[pyfunction(name = "toggle_bit")]
fn py_toggle_bit(value: f64, precision: &str, index: i64) -> PyResult<f64> {
    let precision = to_precision(precision)?;
    let index = usize::try_from(index).map_err(|_| {
        PyValueError::new_err(format!("negative bit index {}", index))
    })?;
    toggle_bit(value, precision, index)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Returns the neighboring representable value.
///
/// Args:
///     value: The number to start from
///     precision: "half", "single" or "double"
///     direction: "next" or "prev"
#[pyfunction(name = "step")]
fn py_step(value: f64, precision: &str, direction: &str) -> PyResult<f64> {
    let precision = to_precision(precision)?;
    let direction = to_direction(direction)?;
    Ok(step(value, precision, direction))
}

/// Returns the exact decimal expansion of `value`, without an exponent.
#[pyfunction(name = "format_decimal")]
fn py_format_decimal(value: f64) -> String {
    format_decimal(value)
}

/// Parses the text of an input field.
#[pyfunction(name = "parse_input")]
fn py_parse_input(text: &str) -> PyResult<f64> {
    parse_input(text).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn _bitfloat(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyComponents>()?;

    // Add the functions to the module
    m.add_function(wrap_pyfunction!(py_encode, m)?)?;
    m.add_function(wrap_pyfunction!(py_decode, m)?)?;
    m.add_function(wrap_pyfunction!(py_components, m)?)?;
    m.add_function(wrap_pyfunction!(py_toggle_bit, m)?)?;
    m.add_function(wrap_pyfunction!(py_step, m)?)?;
    m.add_function(wrap_pyfunction!(py_format_decimal, m)?)?;
    m.add_function(wrap_pyfunction!(py_parse_input, m)?)?;
    Ok(())
}
