//! Default values for sbom-doc configuration.

/// Console table width, matching a wide terminal
pub const DEFAULT_CONSOLE_WIDTH: usize = 150;

/// PDF body font size in points
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// SPDX license list endpoint; `<base>/<id>.json` holds each license
pub const DEFAULT_LICENSE_BASE_URL: &str = "https://spdx.org/licenses";

/// Per-request timeout for license text lookups
pub const DEFAULT_LICENSE_TIMEOUT_SECS: u64 = 10;

/// License texts change rarely; cache them for a week
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24 * 7;
