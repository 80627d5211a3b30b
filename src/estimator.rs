//! Closed-form advertising packet-loss estimate.

use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::common::*;
use crate::poisson::{self, PoissonError};

/// Errors raised for configurations outside the estimator's domain.
#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    /// At least one beacon must occupy the channel.
    #[error("beacon count must be non-zero")]
    ZeroBeaconCount,

    /// The advertising interval must be a positive duration.
    #[error("advertising interval must be positive, got {0}")]
    InvalidInterval(f64),

    /// The derived rate parameter fell outside the Poisson domain.
    #[error(transparent)]
    Poisson(#[from] PoissonError),
}

/// Link and duty-cycle parameters of the advertising channel.
#[derive(Clone, Debug)]
pub struct LinkConfig {
    /// Number of beacons sharing the channel.
    pub beacon_count: u64,
    /// Advertising interval of each beacon, in seconds.
    pub advertising_interval: f64,
    /// Fixed processing delay added to the on-air time, in seconds.
    pub software_latency: f64,
    /// Advertising payload, in bytes.
    pub payload_length: u64,
    /// Symbol period of the signaling rate, in seconds.
    pub symbol_period: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            beacon_count: BEACON_COUNT,
            advertising_interval: ADVERTISING_INTERVAL,
            software_latency: SOFTWARE_LATENCY,
            payload_length: PAYLOAD_LENGTH,
            symbol_period: SYMBOL_PERIOD,
        }
    }
}

impl LinkConfig {
    /// Link-layer packet length in bytes, framing overhead included.
    pub fn packet_length_bytes(&self) -> u64 {
        PREAMBLE_LENGTH
            + ACCESS_ADDRESS_LENGTH
            + HEADER_LENGTH
            + LENGTH_LENGTH
            + self.payload_length
            + CRC_LENGTH
    }

    /// Link-layer packet length in bits.
    pub fn packet_length_bits(&self) -> u64 {
        self.packet_length_bytes() * 8
    }

    /// On-air time of one packet, in seconds.
    pub fn packet_period(&self) -> f64 {
        self.packet_length_bits() as f64 * self.symbol_period
    }

    /// Mean spacing between advertising events on the channel, in seconds.
    pub fn slot(&self) -> f64 {
        self.advertising_interval / self.beacon_count as f64
    }

    /// Expected number of competing events per advertising slot.
    pub fn lambda(&self) -> f64 {
        (self.packet_period() + self.software_latency) / self.slot()
    }
}

impl fmt::Display for LinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Beacon Count             = {}", self.beacon_count)?;
        writeln!(
            f,
            "Advertising Interval     = {:.0} msec",
            self.advertising_interval * 1.0e3
        )?;
        writeln!(
            f,
            "Link Layer Packet Length = {} bytes, {} bits",
            self.packet_length_bytes(),
            self.packet_length_bits()
        )?;
        write!(
            f,
            "Link Layer Packet Period = {:.0} usec",
            self.packet_period() * 1.0e6
        )
    }
}

/// One row of the probability table.
#[derive(Clone, Copy, Debug)]
pub struct ProbabilityRow {
    /// Number of advertising events in the slot.
    pub k: u64,
    /// Probability of exactly `k` events.
    pub probability: f64,
}

/// Event probabilities for one advertising slot.
#[derive(Clone, Debug)]
pub struct LossEstimate {
    /// Rate parameter the table was evaluated at.
    pub lambda: f64,
    /// P(k, lambda) for k below `common::MAX_EVENT_COUNT`.
    pub rows: Vec<ProbabilityRow>,
    /// Probability that the slot carries no packet at all.
    pub p_none: f64,
    /// Probability that exactly one packet occupies the slot.
    pub p_received: f64,
    /// Probability that overlapping packets collide, summed over k >= 2.
    pub p_lost: f64,
}

impl LossEstimate {
    /// Fraction of transmitted packets lost, normalized over
    /// {received, lost}. Zero when nothing was transmitted at all.
    pub fn loss_ratio(&self) -> f64 {
        let transmitted = self.p_received + self.p_lost;

        if transmitted == 0.0 {
            0.0
        } else {
            self.p_lost / transmitted
        }
    }

    /// Loss ratio expressed as a percentage.
    pub fn loss_percent(&self) -> f64 {
        self.loss_ratio() * 100.0
    }
}

impl fmt::Display for LossEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "P({:3}, {:.3}) = {:.3e}", row.k, self.lambda, row.probability)?;
        }

        writeln!(f)?;
        writeln!(f, "P packet none = {:.4e}", self.p_none)?;
        writeln!(f, "P packet recv = {:.4e}", self.p_received)?;
        writeln!(f, "P packet lost = {:.4e}", self.p_lost)?;
        write!(f, "percent packet loss = {:.1}", self.loss_percent())
    }
}

/// Evaluates the packet-loss estimate for `config`.
///
/// The event table is truncated at `common::MAX_EVENT_COUNT` events per
/// slot; the tail mass beyond it stays below 1e-9 for rates up to 1.
pub fn estimate(config: &LinkConfig) -> Result<LossEstimate, EstimateError> {
    if config.beacon_count == 0 {
        return Err(EstimateError::ZeroBeaconCount);
    }

    if config.advertising_interval <= 0.0 {
        return Err(EstimateError::InvalidInterval(config.advertising_interval));
    }

    let lambda = config.lambda();
    trace!(
        lambda,
        packet_bits = config.packet_length_bits(),
        slot = config.slot(),
        "Estimator initialized"
    );

    let mut rows = Vec::with_capacity(MAX_EVENT_COUNT as usize);
    let mut p_none = 0.0;
    let mut p_received = 0.0;
    let mut p_lost = 0.0;

    for k in 0..MAX_EVENT_COUNT {
        let probability = poisson::pmf(k, lambda)?;

        match k {
            0 => p_none = probability,
            1 => p_received = probability,
            _ => p_lost += probability,
        }

        rows.push(ProbabilityRow { k, probability });
    }

    trace!(p_none, p_received, p_lost, "Slot probabilities accumulated");

    Ok(LossEstimate {
        lambda,
        rows,
        p_none,
        p_received,
        p_lost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn reference_configuration() {
        let config = LinkConfig::default();

        assert_eq!(config.packet_length_bytes(), 47);
        assert_eq!(config.packet_length_bits(), 376);
        assert!((config.packet_period() - 376.0e-6).abs() < 1e-12);
        assert!((config.lambda() - 0.3752).abs() < 1e-12);

        let loss = estimate(&config).unwrap();

        assert!((loss.p_none - 0.6871).abs() < 2e-4);
        assert!((loss.p_received - 0.2579).abs() < 2e-4);
        assert!((loss.loss_percent() - 17.6).abs() < 0.05);
    }

    #[test_log::test]
    fn loss_grows_with_competing_beacons() {
        let lone = LinkConfig {
            beacon_count: 1,
            ..LinkConfig::default()
        };
        let crowded = LinkConfig::default();

        assert!(lone.lambda() < crowded.lambda());

        let lone_loss = estimate(&lone).unwrap().loss_percent();
        let crowded_loss = estimate(&crowded).unwrap().loss_percent();

        assert!(lone_loss < 0.5, "lone beacon loss = {lone_loss}");
        assert!(crowded_loss > 10.0 * lone_loss);
    }

    #[test_log::test]
    fn idle_channel_reports_no_loss() {
        let config = LinkConfig {
            software_latency: 0.0,
            symbol_period: 0.0,
            ..LinkConfig::default()
        };

        let loss = estimate(&config).unwrap();

        assert_eq!(loss.lambda, 0.0);
        assert!((loss.p_none - 1.0).abs() < 1e-12);
        assert_eq!(loss.p_received, 0.0);
        assert_eq!(loss.p_lost, 0.0);
        assert_eq!(loss.loss_ratio(), 0.0);
    }

    #[test_log::test]
    fn rejects_degenerate_configurations() {
        let no_beacons = LinkConfig {
            beacon_count: 0,
            ..LinkConfig::default()
        };
        assert_eq!(estimate(&no_beacons).unwrap_err(), EstimateError::ZeroBeaconCount);

        let no_interval = LinkConfig {
            advertising_interval: 0.0,
            ..LinkConfig::default()
        };
        assert_eq!(
            estimate(&no_interval).unwrap_err(),
            EstimateError::InvalidInterval(0.0)
        );

        let negative_latency = LinkConfig {
            software_latency: -2.0e-3,
            ..LinkConfig::default()
        };
        assert!(matches!(
            estimate(&negative_latency).unwrap_err(),
            EstimateError::Poisson(PoissonError::NegativeRate(_))
        ));
    }

    #[test_log::test]
    fn table_covers_the_truncation_range() {
        let loss = estimate(&LinkConfig::default()).unwrap();

        assert_eq!(loss.rows.len(), MAX_EVENT_COUNT as usize);
        assert_eq!(loss.rows[0].k, 0);
        assert_eq!(loss.rows.last().unwrap().k, MAX_EVENT_COUNT - 1);

        let table_sum: f64 = loss.rows.iter().map(|row| row.probability).sum();
        let bucket_sum = loss.p_none + loss.p_received + loss.p_lost;

        assert!((table_sum - 1.0).abs() < 1e-6);
        assert!((table_sum - bucket_sum).abs() < 1e-12);
    }

    #[test_log::test]
    fn report_shape() {
        let config = LinkConfig::default();
        let report = estimate(&config).unwrap().to_string();

        assert!(report.contains("P(  0, 0.375) = "));
        assert!(report.contains("P packet none = "));
        assert!(report.contains("P packet recv = "));
        assert!(report.contains("P packet lost = "));
        assert_eq!(report.lines().last().unwrap(), "percent packet loss = 17.6");

        let echo = config.to_string();
        assert!(echo.contains("Beacon Count             = 100"));
        assert!(echo.contains("Advertising Interval     = 500 msec"));
        assert!(echo.contains("= 47 bytes, 376 bits"));
        assert!(echo.contains("= 376 usec"));
    }
}
