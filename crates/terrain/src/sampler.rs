use model::{Path, ProjectedPoint};

pub const DEFAULT_MAX_SAMPLES: usize = 20;

/// Reduces drawn lines to a bounded number of representative points.
#[derive(Debug, Clone, Copy)]
pub struct PathSampler {
    max_samples: usize,
}

impl Default for PathSampler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAMPLES)
    }
}

impl PathSampler {
    pub fn new(max_samples: usize) -> Self {
        Self { max_samples }
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Samples every segment of the path on its own and concatenates the results
    /// in segment order.
    pub fn sample(&self, path: &Path) -> Vec<ProjectedPoint> {
        path.segments
            .iter()
            .flat_map(|segment| self.sample_segment(segment))
            .collect()
    }

    pub fn sample_segment(&self, segment: &[ProjectedPoint]) -> Vec<ProjectedPoint> {
        match segment.len() {
            0 => vec![],
            1 => segment.to_vec(),
            count if count <= self.max_samples => segment.to_vec(),
            count => sample_indices(count, self.max_samples)
                .map(|index| segment[index])
                .collect(),
        }
    }
}

/// `samples` evenly spaced indices into a sequence of `count` elements, starting
/// at the first and ending at the last element.
///
/// Index `i` is `round(i * (count - 1) / (samples - 1))`, halves rounded up.
pub fn sample_indices(count: usize, samples: usize) -> impl Iterator<Item = usize> {
    let last = count.saturating_sub(1);
    (0..samples).map(move |i| {
        if samples < 2 {
            return 0;
        }
        let span = samples - 1;
        ((2 * i * last + span) / (2 * span)).min(last)
    })
}

#[cfg(test)]
mod tests {
    use model::SpatialReference;

    use super::*;

    fn segment(count: usize) -> Vec<ProjectedPoint> {
        (0..count)
            .map(|i| ProjectedPoint::new(i as f64, -(i as f64), SpatialReference::WEB_MERCATOR))
            .collect()
    }

    #[test]
    fn short_segments_are_kept() {
        let sampler = PathSampler::new(20);
        for count in 1..=20 {
            let input = segment(count);
            assert_eq!(sampler.sample_segment(&input), input);
        }
    }

    #[test]
    fn long_segments_keep_endpoints() {
        for max_samples in 2..25 {
            let sampler = PathSampler::new(max_samples);
            for count in (max_samples + 1)..80 {
                let input = segment(count);
                let output = sampler.sample_segment(&input);
                assert_eq!(output.len(), max_samples);
                assert_eq!(output[0], input[0]);
                assert_eq!(output[max_samples - 1], input[count - 1]);
            }
        }
    }

    #[test]
    fn indices_are_evenly_spaced() {
        assert_eq!(sample_indices(7, 4).collect::<Vec<_>>(), vec![0, 2, 4, 6]);
        assert_eq!(sample_indices(10, 4).collect::<Vec<_>>(), vec![0, 3, 6, 9]);
        assert_eq!(sample_indices(6, 4).collect::<Vec<_>>(), vec![0, 2, 3, 5]);
        // 100 points down to 20: step of 99/19
        let indices = sample_indices(100, 20).collect::<Vec<_>>();
        assert_eq!(indices[1], 5);
        assert_eq!(indices[10], 52);
        assert_eq!(indices[19], 99);
    }

    #[test]
    fn segments_are_concatenated_in_order() {
        let path = Path::new(vec![segment(30), vec![], segment(1), segment(3)]);
        let output = PathSampler::new(20).sample(&path);
        assert_eq!(output.len(), 20 + 1 + 3);
        assert_eq!(output[19].x, 29.0);
        assert_eq!(output[20].x, 0.0);
        assert_eq!(output[21..], segment(3)[..]);
    }

    #[test]
    fn degenerate_sample_counts() {
        let input = segment(5);
        assert!(PathSampler::new(0).sample_segment(&input).is_empty());
        assert_eq!(PathSampler::new(1).sample_segment(&input), vec![input[0]]);
        assert_eq!(PathSampler::new(0).sample_segment(&input[..1]), vec![input[0]]);
    }
}
