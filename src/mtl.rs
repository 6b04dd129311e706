use std::path::Path;

use log::debug;
use regex::Regex;

use crate::error::{Result, UhiError};
use crate::thermal::CalibrationConstants;

/// Parsed MTL metadata text.
///
/// The MTL file is a line-oriented `KEY = VALUE` blob; values of interest
/// are plain decimals, optionally signed and in exponent notation
/// (e.g. `RADIANCE_MULT_BAND_10 = 3.3420E-04`).
pub struct MtlMetadata {
    text: String,
}

impl MtlMetadata {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(MtlMetadata { text })
    }

    pub fn from_text<S: Into<String>>(text: S) -> Self {
        MtlMetadata { text: text.into() }
    }

    /// Look up a numeric constant by keyword.
    ///
    /// Returns `None` when the keyword is absent or its value does not
    /// parse as a float. Callers that cannot tolerate a missing key should
    /// go through [`MtlMetadata::calibration`] instead.
    pub fn value(&self, keyword: &str) -> Option<f64> {
        let pattern = format!(r"{}\s=\s([-+0-9.Ee]+)", regex::escape(keyword));
        let re = Regex::new(&pattern).ok()?;
        let value = re
            .captures(&self.text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        debug!("MTL {} = {:?}", keyword, value);
        value
    }

    /// Extract the four radiometric calibration constants for a band.
    ///
    /// A missing key is a hard error: conversion with a hole in the
    /// constants would silently corrupt every output cell.
    pub fn calibration(&self, band: u8) -> Result<CalibrationConstants> {
        let get = |key: String| -> Result<f64> {
            self.value(&key)
                .ok_or(UhiError::MissingConstant { key })
        };

        Ok(CalibrationConstants {
            radiance_mult: get(format!("RADIANCE_MULT_BAND_{}", band))?,
            radiance_add: get(format!("RADIANCE_ADD_BAND_{}", band))?,
            k1: get(format!("K1_CONSTANT_BAND_{}", band))?,
            k2: get(format!("K2_CONSTANT_BAND_{}", band))?,
        })
    }
}
