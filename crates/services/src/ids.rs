//! Session-local ids for newly created entities.

use chrono::Utc;

/// Millisecond timestamps, bumped when two ids would land in the same
/// millisecond. Unique within one running store only; the remote side may
/// hand back its own ids on the next fetch.
#[derive(Debug, Default)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last + 1);
        self.last = id;
        id
    }

    /// Same as [`IdClock::next`], for entities with text ids.
    pub fn next_string(&mut self) -> String {
        self.next().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_strictly_increase() {
        let mut clock = IdClock::new();
        let ids: Vec<i64> = (0..1_000).map(|_| clock.next()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids[0] >= 1_600_000_000_000);
    }

    #[test]
    fn string_ids_share_the_sequence() {
        let mut clock = IdClock::new();
        let a = clock.next();
        let b: i64 = clock.next_string().parse().unwrap();
        assert!(b > a);
    }
}
