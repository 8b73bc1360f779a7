use std::num::NonZeroUsize;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("stampede/", env!("CARGO_PKG_VERSION"));

/// Config filenames checked when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["stampede.toml", "stampede.json"];

/// Worker count used when `--workers` is 0: one per available CPU.
pub(crate) fn default_worker_count() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
