use crate::error::QueryWarning;
use crate::platform;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Page size assumed when the OS cannot tell us.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Align `value` up to the next multiple of `align`.
/// `align` must be a power of two.
#[inline(always)]
pub const fn align_up(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (value + align - 1) & !(align - 1)
}

/// Check if `value` is aligned to `align`.
#[inline(always)]
pub const fn is_aligned(value: usize, align: usize) -> bool {
    value & (align - 1) == 0
}

/// Greatest common divisor (Euclid). `gcd(a, 0) == a`.
pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple; zero if either operand is zero.
///
/// Divides before multiplying so page and block sizes of a few MiB stay far
/// from the `u64` limit.
pub const fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    (a / gcd(a, b)) * b
}

#[inline(always)]
pub const fn is_power_of_two(n: u64) -> bool {
    n > 0 && (n & (n - 1)) == 0
}

/// Runtime page size. Starts at the fallback so `page_size()` never
/// returns zero, even before `init_page_size()` has run.
static PAGE_SIZE_CACHED: AtomicUsize = AtomicUsize::new(DEFAULT_PAGE_SIZE);

/// Query the page size from the OS and cache it for the rest of the process.
///
/// On failure the fallback stays in place and the returned warning tells the
/// caller what happened.
pub fn init_page_size() -> Result<usize, QueryWarning> {
    let ps = validate_page_size(platform::page_size())?;
    PAGE_SIZE_CACHED.store(ps, Ordering::Release);
    Ok(ps)
}

/// Accept a page size reported by the OS only if it is a power of two.
pub fn validate_page_size(raw: Option<usize>) -> Result<usize, QueryWarning> {
    match raw {
        Some(ps) if ps.is_power_of_two() => Ok(ps),
        _ => Err(QueryWarning::PageSize {
            fallback: DEFAULT_PAGE_SIZE,
        }),
    }
}

/// Get the cached page size (4096 until `init_page_size()` succeeds).
#[inline(always)]
pub fn page_size() -> usize {
    PAGE_SIZE_CACHED.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_is_symmetric_and_absorbs_zero() {
        let samples = [0u64, 1, 2, 3, 7, 12, 512, 4096, 65536, 1 << 20, 3 * 4096];
        for &a in &samples {
            assert_eq!(gcd(a, 0), a);
            for &b in &samples {
                assert_eq!(gcd(a, b), gcd(b, a), "gcd({a}, {b})");
            }
        }
        assert_eq!(gcd(4096, 512), 512);
        assert_eq!(gcd(12, 18), 6);
    }

    #[test]
    fn lcm_times_gcd_is_product() {
        let samples = [1u64, 2, 3, 6, 512, 4096, 16384, 65536, 1 << 20, 12288];
        for &a in &samples {
            for &b in &samples {
                assert_eq!(lcm(a, b) * gcd(a, b), a * b, "lcm({a}, {b})");
            }
        }
        assert_eq!(lcm(4096, 512), 4096);
        assert_eq!(lcm(4096, 65536), 65536);
        assert_eq!(lcm(4096, 12288), 12288);
    }

    #[test]
    fn lcm_with_zero_is_zero() {
        assert_eq!(lcm(0, 4096), 0);
        assert_eq!(lcm(4096, 0), 0);
        assert_eq!(lcm(0, 0), 0);
    }

    #[test]
    fn power_of_two_predicate() {
        assert!(!is_power_of_two(0));
        for shift in 0..64 {
            assert!(is_power_of_two(1 << shift));
        }
        for n in [3u64, 5, 6, 7, 12, 100, 4095, 4097, 3 << 10] {
            assert!(!is_power_of_two(n), "{n}");
        }
    }

    #[test]
    fn alignment_helpers() {
        assert_eq!(align_up(0, 4096), 0);
        assert_eq!(align_up(1, 4096), 4096);
        assert_eq!(align_up(4096, 4096), 4096);
        assert_eq!(align_up(4097, 4096), 8192);
        assert!(is_aligned(8192, 4096));
        assert!(!is_aligned(8200, 4096));
    }

    #[test]
    fn unusable_page_size_reports_fallback() {
        for raw in [None, Some(0), Some(3000), Some(4097)] {
            match validate_page_size(raw) {
                Err(QueryWarning::PageSize { fallback }) => assert_eq!(fallback, 4096),
                other => panic!("{raw:?} accepted: {other:?}"),
            }
        }
        assert_eq!(validate_page_size(Some(16384)).ok(), Some(16384));
    }

    #[test]
    fn failed_init_leaves_a_usable_page_size() {
        if init_page_size().is_err() {
            assert_eq!(page_size(), DEFAULT_PAGE_SIZE);
        }
    }

    #[test]
    fn page_size_is_usable_after_init() {
        let _ = init_page_size();
        let ps = page_size();
        assert!(ps.is_power_of_two());
        assert!(ps >= 512);
    }
}
