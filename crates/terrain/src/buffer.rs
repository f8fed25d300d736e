use std::{collections::VecDeque, error, fmt};

use model::ElevationObservation;
use serde::Serialize;

pub const DEFAULT_AD_HOC_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BufferMode {
    /// Single point lookups from clicks and search results.
    #[default]
    AdHoc,
    /// The sampled profile of a drawn line.
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A drawn line owns the buffer.
    ProfileActive,
    /// A newer profile run started, or the buffer was cleared.
    StaleLease,
}

impl error::Error for BufferError {}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BufferError::ProfileActive => write!(f, "a profile owns the buffer"),
            BufferError::StaleLease => write!(f, "profile run was superseded"),
        }
    }
}

/// Permission of one profile run to replace the buffer content.
#[derive(Debug, PartialEq, Eq)]
pub struct ProfileLease {
    generation: u64,
}

/// Observations shown by the elevation chart.
#[derive(Debug)]
pub struct ElevationBuffer {
    mode: BufferMode,
    observations: VecDeque<ElevationObservation>,
    ad_hoc_capacity: usize,
    generation: u64,
    pending: Option<u64>,
}

impl Default for ElevationBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_AD_HOC_CAPACITY)
    }
}

impl ElevationBuffer {
    pub fn new(ad_hoc_capacity: usize) -> Self {
        Self {
            mode: BufferMode::AdHoc,
            observations: VecDeque::with_capacity(ad_hoc_capacity),
            ad_hoc_capacity,
            generation: 0,
            pending: None,
        }
    }

    /// Appends a single observation, evicting the oldest ones beyond capacity.
    pub fn append_ad_hoc(&mut self, observation: ElevationObservation) -> Result<(), BufferError> {
        if self.mode == BufferMode::Profile {
            return Err(BufferError::ProfileActive);
        }
        self.observations.push_back(observation);
        while self.observations.len() > self.ad_hoc_capacity {
            self.observations.pop_front();
        }
        Ok(())
    }

    /// Hands the buffer to a new profile run. Leases of earlier runs become stale.
    pub fn begin_profile(&mut self) -> ProfileLease {
        if self.mode != BufferMode::Profile {
            self.observations.clear();
            self.mode = BufferMode::Profile;
        }
        self.generation += 1;
        self.pending = Some(self.generation);
        ProfileLease {
            generation: self.generation,
        }
    }

    pub fn replace_profile(
        &mut self,
        lease: ProfileLease,
        observations: Vec<ElevationObservation>,
    ) -> Result<(), BufferError> {
        self.release(lease)?;
        self.observations = observations.into();
        Ok(())
    }

    /// Ends a run without data. The previous profile is dropped, the buffer stays
    /// owned by the drawn line.
    pub fn abandon_profile(&mut self, lease: ProfileLease) -> Result<(), BufferError> {
        self.release(lease)?;
        self.observations.clear();
        Ok(())
    }

    fn release(&mut self, lease: ProfileLease) -> Result<(), BufferError> {
        if self.pending != Some(lease.generation) {
            return Err(BufferError::StaleLease);
        }
        self.pending = None;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.observations.clear();
        self.mode = BufferMode::AdHoc;
        self.pending = None;
    }

    pub fn snapshot(&self) -> Vec<ElevationObservation> {
        self.observations.iter().cloned().collect()
    }

    pub fn mode(&self) -> BufferMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
