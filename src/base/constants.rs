//! Constants shared by the signature grammar, the host type model and configuration.

// ============================================================================
// SIGNATURE GRAMMAR
// ============================================================================

/// Maximum number of `[]` suffixes accepted on a parameter token.
pub const MAX_ARRAY_DIMENSIONS: usize = 3;

/// Suffix marking one array dimension in a signature parameter token.
pub const ARRAY_SUFFIX: &str = "[]";

/// Prefix marking one array dimension in a type descriptor.
pub const ARRAY_DESCRIPTOR_PREFIX: char = '[';

/// Separator between parameter tokens.
pub const PARAM_SEPARATOR: char = ',';

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Environment variable overriding the profile reported by the default loader.
pub const ENV_PROFILE: &str = "REFLECT_PROFILE";

/// Environment variable sizing the initial type cache.
pub const ENV_CACHE_CAPACITY: &str = "REFLECT_CACHE_CAPACITY";

/// Initial type cache capacity when none is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Name of the process-wide default registry.
pub const SYSTEM_REGISTRY_NAME: &str = "system";

// ============================================================================
// SCRATCH BUFFERS
// ============================================================================

/// Number of idle scratch buffers a pool keeps around.
pub const DEFAULT_SCRATCH_RETENTION: usize = 16;

/// Buffers that grew past this capacity are dropped instead of recycled.
pub const MAX_SCRATCH_CAPACITY: usize = 4096;
