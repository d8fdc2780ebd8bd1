//! Minimum-interval gate in front of event admission.
//!
//! Mechanical contacts bounce for a few milliseconds and raise a burst of edges for a
//! single press. The filter keeps the first edge and drops the rest until
//! `min_interval` ticks have passed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    /// `None` until the first edge, which is always admitted.
    last_accepted: Option<u64>,
    min_interval: u64,
}

impl Debounce {
    pub const fn new(min_interval: u64) -> Self {
        Self {
            last_accepted: None,
            min_interval,
        }
    }

    #[inline]
    pub fn min_interval(&self) -> u64 {
        self.min_interval
    }

    #[inline]
    pub fn last_accepted(&self) -> Option<u64> {
        self.last_accepted
    }

    /// Admit the edge seen at `now` if it is at least `min_interval` ticks after the
    /// last admitted one. A rejected edge leaves the state untouched.
    ///
    /// The distance is taken with wrapping arithmetic, so a tick counter that rolls
    /// over keeps working.
    #[inline]
    pub fn admit(&mut self, now: u64) -> bool {
        if let Some(last) = self.last_accepted {
            if now.wrapping_sub(last) < self.min_interval {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::Debounce;

    #[test]
    fn first_edge_is_always_admitted() {
        let mut debounce = Debounce::new(20);
        assert!(debounce.admit(0));
        assert_eq!(debounce.last_accepted(), Some(0));
    }

    #[test]
    fn suppresses_bounce_inside_interval() {
        let mut debounce = Debounce::new(20);
        assert!(debounce.admit(100));
        assert!(!debounce.admit(110));
        assert_eq!(debounce.last_accepted(), Some(100));
        assert!(!debounce.admit(119));
        assert!(debounce.admit(125));
        assert_eq!(debounce.last_accepted(), Some(125));
    }

    #[test]
    fn exact_interval_is_admitted() {
        let mut debounce = Debounce::new(20);
        assert!(debounce.admit(40));
        assert!(debounce.admit(60));
    }

    #[test]
    fn survives_tick_wraparound() {
        let mut debounce = Debounce::new(20);
        assert!(debounce.admit(u64::MAX - 5));
        assert!(!debounce.admit(3));
        assert!(debounce.admit(14));
    }

    #[test]
    fn zero_interval_admits_everything() {
        let mut debounce = Debounce::new(0);
        assert!(debounce.admit(7));
        assert!(debounce.admit(7));
        assert!(debounce.admit(8));
    }
}
