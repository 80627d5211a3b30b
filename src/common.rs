/// Preamble field, in bytes
pub static PREAMBLE_LENGTH: u64 = 1;

/// Access address field, in bytes
pub static ACCESS_ADDRESS_LENGTH: u64 = 4;

/// PDU header field, in bytes
pub static HEADER_LENGTH: u64 = 1;

/// PDU length field, in bytes
pub static LENGTH_LENGTH: u64 = 1;

/// Advertising payload, in bytes: 6 address bytes + advertising data
pub static PAYLOAD_LENGTH: u64 = 37;

/// CRC field, in bytes
pub static CRC_LENGTH: u64 = 3;

/// Symbol period for 1 Mbps signaling
pub static SYMBOL_PERIOD: f64 = 1.0e-6;

/// Number of beacons sharing the advertising channel
pub static BEACON_COUNT: u64 = 100;

/// Advertising interval of each beacon
pub static ADVERTISING_INTERVAL: f64 = 500.0e-3;

/// Fixed processing delay added to the on-air time
pub static SOFTWARE_LATENCY: f64 = 1500.0e-6;

/// Event count the probability table is truncated at. The tail mass beyond
/// this bound stays below 1e-9 for rates up to 1.
pub static MAX_EVENT_COUNT: u64 = 10;
