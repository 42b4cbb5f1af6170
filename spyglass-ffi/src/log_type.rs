// Raw log-type codes as the engine sends them over the bridge.
// The order matters: these values are part of the wire contract and mirror
// the engine's own log severity enumeration.

/// A runtime error.
pub const LOG_TYPE_ERROR: u8 = 0;
/// An assertion failure.
pub const LOG_TYPE_ASSERT: u8 = 1;
/// A warning.
pub const LOG_TYPE_WARNING: u8 = 2;
/// A regular log message.
pub const LOG_TYPE_LOG: u8 = 3;
/// An uncaught exception.
pub const LOG_TYPE_EXCEPTION: u8 = 4;

/// Number of distinct log-type codes.
pub const LOG_TYPE_COUNT: u8 = 5;

/// Mask with every log type enabled.
pub const LOG_TYPE_MASK_ALL: u8 = (1 << LOG_TYPE_COUNT) - 1;

/// Single-type bit mask for a raw code. The code must be valid.
#[inline]
pub const fn log_type_mask(raw: u8) -> u8 {
    1 << raw
}

/// Whether a raw code names a known log type.
#[inline]
pub const fn is_log_type_valid(raw: u8) -> bool {
    raw < LOG_TYPE_COUNT
}
