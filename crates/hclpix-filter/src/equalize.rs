//! Level equalization
//!
//! Redistributes the values of an 8-bit channel so that every output level
//! holds either `N / 256` or `N / 256 + 1` pixels, where `N` is the number of
//! pixels. Unlike a lookup-table equalization, pixels that share a source
//! level may be spread over several target levels.
//!
//! # Algorithm
//!
//! 1. Count the pixels at every source level.
//! 2. Give target level `t` a capacity of `N / 256`, plus one if
//!    `t < N % 256`.
//! 3. Walk the source levels in ascending order and fill target capacity
//!    greedily, recording a segment `(count, target)` each time a source
//!    level's pixels land on a target.
//! 4. Scan the pixels again; each takes the target of the segment on top of
//!    its source level's stack, which is popped once its count is used up.
//!
//! Each level's segments form a stack, so the last recorded (highest) target
//! is handed out first. Among pixels with equal source values the targets
//! never increase in scan order.

use crate::{FilterError, FilterResult};
use hclpix_core::Image;
use log::{debug, trace};

/// Number of 8-bit levels
pub const LEVELS: usize = 256;

/// Pixels of one source level that map to one target level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    count: usize,
    target: u8,
}

/// Segments for all source levels, stored contiguously by level.
#[derive(Debug)]
struct Plan {
    segments: Vec<Segment>,
    /// One past the top-of-stack segment of each source level
    top: [usize; LEVELS],
}

/// Count the pixels at every level.
pub fn level_histogram(pixels: &[u8]) -> [usize; LEVELS] {
    let mut hist = [0usize; LEVELS];
    for &p in pixels {
        hist[p as usize] += 1;
    }
    hist
}

fn plan_segments(hist: &[usize; LEVELS], n: usize) -> Plan {
    let base = n / LEVELS;
    let extra = n % LEVELS;
    let mut capacity: [usize; LEVELS] = std::array::from_fn(|t| base + usize::from(t < extra));

    let mut segments = Vec::with_capacity(2 * LEVELS);
    let mut top = [0usize; LEVELS];
    let mut target = 0usize;

    for (level, &count) in hist.iter().enumerate() {
        let mut remaining = count;
        while remaining > 0 {
            let take = remaining.min(capacity[target]);
            if take > 0 {
                segments.push(Segment {
                    count: take,
                    target: target as u8,
                });
                remaining -= take;
                capacity[target] -= take;
            }
            if capacity[target] == 0 {
                if target == LEVELS - 1 {
                    break;
                }
                target += 1;
            }
        }
        top[level] = segments.len();
    }

    trace!("Planned {} segments for {} pixels", segments.len(), n);
    Plan { segments, top }
}

/// Equalize the levels of an 8-bit channel in place.
///
/// After the call every level `t` holds `N / 256` pixels, plus one more when
/// `t < N % 256`. The mapping is monotone: a pixel never ends up below a
/// pixel whose source level was lower.
///
/// An empty slice is left unchanged.
pub fn equalize_levels(pixels: &mut [u8]) {
    let n = pixels.len();
    if n == 0 {
        return;
    }

    let hist = level_histogram(pixels);
    debug!(
        "Equalizing {} pixels over {} occupied levels ({} per level, {} levels get one more)",
        n,
        hist.iter().filter(|&&c| c > 0).count(),
        n / LEVELS,
        n % LEVELS
    );

    let Plan {
        mut segments,
        mut top,
    } = plan_segments(&hist, n);

    // Every occupied level owns at least one segment, since capacities sum to n.
    for p in pixels.iter_mut() {
        let level = *p as usize;
        let segment = &mut segments[top[level] - 1];
        *p = segment.target;
        segment.count -= 1;
        if segment.count == 0 {
            top[level] -= 1;
        }
    }
}

/// Equalize one channel of an 8-bit image in place.
///
/// # Arguments
///
/// * `image` - Image to modify
/// * `channel` - 0, 1 or 2 for a primary channel, 3 for alpha
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] if `channel` is out of range
/// or names an alpha plane the image does not have.
pub fn equalize_image_channel(image: &mut Image<u8>, channel: usize) -> FilterResult<()> {
    let plane = match channel {
        0..=2 => image.channel_mut(channel),
        3 => image
            .alpha_mut()
            .ok_or_else(|| FilterError::InvalidParameters("image has no alpha plane".into()))?,
        _ => {
            return Err(FilterError::InvalidParameters(format!(
                "channel must be 0..=3, got {}",
                channel
            )));
        }
    };
    equalize_levels(plane);
    Ok(())
}
