use std::time::{Duration, Instant};

/// What the shell should do right after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Input too short: clear the dropdown now, nothing is scheduled.
    Clear,
    /// A fetch is pending for this deadline.
    Scheduled(Instant),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    text: String,
    due: Instant,
}

/// Holds at most one pending suggestion fetch; each keystroke replaces it.
#[derive(Debug)]
pub struct SuggestionDebouncer {
    delay: Duration,
    min_chars: usize,
    pending: Option<Pending>,
}

impl SuggestionDebouncer {
    pub fn new(delay: Duration, min_chars: usize) -> Self {
        Self {
            delay,
            min_chars,
            pending: None,
        }
    }

    pub fn on_input(&mut self, text: &str, now: Instant) -> InputOutcome {
        if text.chars().count() < self.min_chars {
            self.pending = None;
            return InputOutcome::Clear;
        }

        let due = now + self.delay;
        self.pending = Some(Pending {
            text: text.to_string(),
            due,
        });
        InputOutcome::Scheduled(due)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Hands out the pending text once its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(p) if p.due <= now => self.pending.take().map(|p| p.text),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(200);

    #[test]
    fn short_input_clears_and_schedules_nothing() {
        let mut d = SuggestionDebouncer::new(DELAY, 2);
        let t0 = Instant::now();

        assert_eq!(d.on_input("h", t0), InputOutcome::Clear);
        assert_eq!(d.on_input("", t0), InputOutcome::Clear);
        assert!(d.deadline().is_none());
        assert!(d.take_due(t0 + DELAY * 10).is_none());
    }

    #[test]
    fn nothing_fires_before_the_delay() {
        let mut d = SuggestionDebouncer::new(DELAY, 2);
        let t0 = Instant::now();

        d.on_input("he", t0);
        assert!(d.take_due(t0 + Duration::from_millis(199)).is_none());
        assert_eq!(d.take_due(t0 + DELAY).as_deref(), Some("he"));
        assert!(d.take_due(t0 + DELAY).is_none());
    }

    #[test]
    fn latest_keystroke_supersedes_earlier_ones() {
        let mut d = SuggestionDebouncer::new(DELAY, 2);
        let t0 = Instant::now();

        d.on_input("he", t0);
        d.on_input("hel", t0 + Duration::from_millis(150));

        assert!(d.take_due(t0 + DELAY).is_none());
        assert_eq!(
            d.take_due(t0 + Duration::from_millis(350)).as_deref(),
            Some("hel")
        );
    }

    #[test]
    fn backspacing_below_minimum_cancels_pending_fetch() {
        let mut d = SuggestionDebouncer::new(DELAY, 2);
        let t0 = Instant::now();

        d.on_input("he", t0);
        d.on_input("h", t0 + Duration::from_millis(50));
        assert!(d.take_due(t0 + DELAY * 2).is_none());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut d = SuggestionDebouncer::new(DELAY, 2);
        assert_eq!(d.on_input("я", Instant::now()), InputOutcome::Clear);
    }
}
