//! Memory limit specifications such as `"1G"`, `"512m"`, `"4096"` or `"50%"`.

use crate::core::ResolverError;

const MEGABYTE: f64 = 1024.0 * 1024.0;
const GIGABYTE: f64 = 1024.0 * MEGABYTE;

/// Sentinel for "no memory limit".
pub const UNLIMITED: i64 = -1;

/// A parsed memory limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemSpec {
    /// Limit in bytes. Zero when the spec was empty, [`UNLIMITED`] for `"-1"`.
    pub bytes: i64,
    /// Whether the limit was given as a share of physical memory.
    pub is_percent: bool,
}

impl MemSpec {
    const fn bytes(bytes: i64) -> Self {
        Self {
            bytes,
            is_percent: false,
        }
    }
}

/// Parse a memory limit specification.
///
/// Accepted forms:
///
/// - `""` -> 0 bytes (not set)
/// - `"-1"` -> [`UNLIMITED`]
/// - `"<int>"`, `"<int>b"`, `"<int>B"` -> bytes
/// - `"<float>m"`, `"<float>M"` -> megabytes
/// - `"<float>g"`, `"<float>G"` -> gigabytes
/// - `"<int>%"` -> percentage of `physical_mem`
///
/// # Errors
///
/// Returns [`ResolverError::InvalidMemSpec`] for anything else, including
/// negative values other than `"-1"`, and for a percentage when
/// `physical_mem` is zero.
pub fn parse_mem_spec(spec: &str, physical_mem: u64) -> Result<MemSpec, ResolverError> {
    if spec.is_empty() {
        return Ok(MemSpec::bytes(0));
    }
    if spec == "-1" {
        return Ok(MemSpec::bytes(UNLIMITED));
    }

    let invalid = || ResolverError::InvalidMemSpec(spec.to_string());
    let Some((unit_at, unit)) = spec.char_indices().next_back() else {
        return Err(invalid());
    };
    let number = &spec[..unit_at];

    match unit {
        'g' | 'G' => scaled(number, GIGABYTE).map(MemSpec::bytes).ok_or_else(invalid),
        'm' | 'M' => scaled(number, MEGABYTE).map(MemSpec::bytes).ok_or_else(invalid),
        'b' | 'B' => whole(number).map(MemSpec::bytes).ok_or_else(invalid),
        '%' => {
            let percent = whole(number).ok_or_else(invalid)?;
            if physical_mem == 0 {
                tracing::warn!(spec, "physical memory unknown, cannot size a percent limit");
                return Err(invalid());
            }
            Ok(MemSpec {
                bytes: share_of(percent, physical_mem).ok_or_else(invalid)?,
                is_percent: true,
            })
        }
        _ => whole(spec).map(MemSpec::bytes).ok_or_else(invalid),
    }
}

/// Resolve the default pool memory limit from its spec.
///
/// A zero result means the limit was not set and is reported as [`UNLIMITED`].
///
/// # Errors
///
/// Propagates [`ResolverError::InvalidMemSpec`] from [`parse_mem_spec`].
pub fn default_mem_limit(spec: &str, physical_mem: u64) -> Result<i64, ResolverError> {
    let parsed = parse_mem_spec(spec, physical_mem)?;
    Ok(if parsed.bytes == 0 { UNLIMITED } else { parsed.bytes })
}

fn whole(number: &str) -> Option<i64> {
    number.parse::<i64>().ok().filter(|n| *n >= 0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scaled(number: &str, multiplier: f64) -> Option<i64> {
    let value = number.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let bytes = value * multiplier;
    (bytes < i64::MAX as f64).then_some(bytes as i64)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn share_of(percent: i64, physical_mem: u64) -> Option<i64> {
    let bytes = percent as f64 / 100.0 * physical_mem as f64;
    (bytes < i64::MAX as f64).then_some(bytes as i64)
}
