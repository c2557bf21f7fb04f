use crate::ChannelError;

/// Configuration for [`RingChannel`](crate::RingChannel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of resident items (default: 64)
    pub capacity: usize,
    /// Enable metrics collection (slight overhead)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    pub const fn new(capacity: usize, enable_metrics: bool) -> Self {
        Self {
            capacity,
            enable_metrics,
        }
    }

    /// Sets the capacity.
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enables or disables metrics collection.
    pub const fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Checks that the configuration describes a buildable channel.
    pub fn validate(&self) -> Result<(), ChannelError> {
        if self.capacity < 1 || self.capacity == usize::MAX {
            return Err(ChannelError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 64,
            enable_metrics: false,
        }
    }
}

/// Single-slot mailbox: only the most recent item is kept.
pub const LATEST_ONLY_CONFIG: Config = Config::new(1, false);
