//! Session configuration.

/// Tuning knobs for a [`Calculator`](crate::Calculator) session.
///
/// Neither setting changes any result, only how fast it is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of factorials computed up front when the calculator is created.
    pub cache_size: usize,
    /// Multiset combination size from which enumeration switches from rebuilding index arrays to
    /// stepping a [`FreqVector`](crate::FreqVector).
    pub multiset_crossover: usize,
}

impl Config {
    pub const DEFAULT_CACHE_SIZE: usize = 100;
    pub const DEFAULT_MULTISET_CROSSOVER: usize = 1000;

    pub fn with_cache_size(self, cache_size: usize) -> Config {
        Config { cache_size, ..self }
    }

    pub fn with_multiset_crossover(self, multiset_crossover: usize) -> Config {
        Config {
            multiset_crossover,
            ..self
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            cache_size: Config::DEFAULT_CACHE_SIZE,
            multiset_crossover: Config::DEFAULT_MULTISET_CROSSOVER,
        }
    }
}
