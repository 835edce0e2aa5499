// ── Telemetry derivation ──
//
// Collapses the printer's two temperature sensors into one exposed
// reading plus a settled/busy signal. Pure function; the polling loop
// decides how each outcome reaches the registry.

use thiserror::Error;

/// A reading of zero is treated the same as a missing reading: a
/// sensor that genuinely sits at 0.0 degrees is indistinguishable from
/// one that never reported, and "no data" must not masquerade as a
/// temperature.
#[derive(Debug, Error)]
#[error("implausible telemetry: nozzle {nozzle:?}, bed {bed:?}")]
pub struct SanityFailure {
    pub nozzle: Option<f64>,
    pub bed: Option<f64>,
}

/// Outcome of one telemetry derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThermalState {
    /// No target set: the printer is in (or near) steady state.
    Steady {
        /// True iff nozzle and bed have converged within the
        /// configured delta -- i.e. not still cooling down from a
        /// just-finished job.
        active: bool,
        /// Arithmetic mean of nozzle and bed temperature.
        temperature: f64,
    },
    /// A target temperature is set: the printer is heating toward it.
    /// The caller must surface this as a busy condition and leave the
    /// previous temperature value untouched.
    Busy,
}

/// Derive the exposed thermal state from two raw readings and their
/// targets.
pub fn derive_thermal(
    temp_nozzle: Option<f64>,
    temp_bed: Option<f64>,
    target_nozzle: Option<f64>,
    target_bed: Option<f64>,
    max_delta: f64,
) -> Result<ThermalState, SanityFailure> {
    let nozzle = temp_nozzle.filter(|t| *t != 0.0);
    let bed = temp_bed.filter(|t| *t != 0.0);

    let (Some(nozzle), Some(bed)) = (nozzle, bed) else {
        return Err(SanityFailure {
            nozzle: temp_nozzle,
            bed: temp_bed,
        });
    };

    let heating = target_nozzle.unwrap_or(0.0) != 0.0 || target_bed.unwrap_or(0.0) != 0.0;
    if heating {
        return Ok(ThermalState::Busy);
    }

    Ok(ThermalState::Steady {
        active: (nozzle - bed).abs() < max_delta,
        temperature: (nozzle + bed) / 2.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diverged_sensors_read_inactive() {
        // Just finished a job: nozzle still hot, bed cooled.
        let state = derive_thermal(Some(210.0), Some(60.0), Some(0.0), Some(0.0), 5.0).unwrap();
        assert_eq!(
            state,
            ThermalState::Steady {
                active: false,
                temperature: 135.0
            }
        );
    }

    #[test]
    fn converged_sensors_read_active() {
        let state = derive_thermal(Some(60.0), Some(58.0), Some(0.0), Some(0.0), 5.0).unwrap();
        assert_eq!(
            state,
            ThermalState::Steady {
                active: true,
                temperature: 59.0
            }
        );
    }

    #[test]
    fn any_target_means_busy() {
        let state = derive_thermal(Some(200.0), Some(60.0), Some(215.0), Some(0.0), 5.0).unwrap();
        assert_eq!(state, ThermalState::Busy);

        let state = derive_thermal(Some(200.0), Some(60.0), None, Some(60.0), 5.0).unwrap();
        assert_eq!(state, ThermalState::Busy);
    }

    #[test]
    fn zero_or_missing_reading_fails_sanity() {
        assert!(derive_thermal(Some(0.0), Some(60.0), Some(0.0), Some(0.0), 5.0).is_err());
        assert!(derive_thermal(Some(210.0), None, Some(0.0), Some(0.0), 5.0).is_err());
    }

    #[test]
    fn delta_boundary_is_exclusive() {
        // |60 - 55| == 5 is not strictly less than 5.
        let state = derive_thermal(Some(60.0), Some(55.0), None, None, 5.0).unwrap();
        assert_eq!(
            state,
            ThermalState::Steady {
                active: false,
                temperature: 57.5
            }
        );
    }
}
