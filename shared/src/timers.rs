//! Cancellable timers for timed UI effects.
//!
//! Each type is one effect slot: starting it again cancels whatever was still
//! pending, so two runs never overlap.

use bevy::prelude::*;
use std::time::Duration;

/// Throttle shared by every caller that holds the same instance.
#[derive(Clone, Debug)]
pub struct Cooldown {
    period: Duration,
    last_fired: Option<Duration>,
}

impl Cooldown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_fired: None,
        }
    }

    /// Fire at `now` unless the previous firing was less than one period ago.
    pub fn try_fire(&mut self, now: Duration) -> bool {
        if self
            .last_fired
            .is_some_and(|last| now.saturating_sub(last) < self.period)
        {
            return false;
        }
        self.last_fired = Some(now);
        true
    }
}

/// Something visible for a fixed time.
#[derive(Clone, Debug, Default)]
pub struct AutoHide {
    timer: Option<Timer>,
}

impl AutoHide {
    /// Show for `duration`, replacing any pending hide.
    pub fn show(&mut self, duration: Duration) {
        self.timer = Some(Timer::new(duration, TimerMode::Once));
    }

    pub fn hide(&mut self) {
        self.timer = None;
    }

    pub fn is_visible(&self) -> bool {
        self.timer.is_some()
    }

    /// Returns `true` on the tick the effect hides itself.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        timer.tick(delta);
        if timer.just_finished() {
            self.timer = None;
            return true;
        }
        false
    }
}

#[derive(Clone, Debug)]
struct TypewriterRun {
    chars: Vec<char>,
    revealed: usize,
    ticker: Option<Timer>,
    elapsed: Duration,
    visible_for: Duration,
    fade_at: Option<Duration>,
}

/// Character-by-character text reveal that hides itself after a while.
#[derive(Clone, Debug, Default)]
pub struct Typewriter {
    run: Option<TypewriterRun>,
}

impl Typewriter {
    /// Start revealing `text`, cancelling any run in progress.
    pub fn start(
        &mut self,
        text: &str,
        char_interval: Duration,
        visible_for: Duration,
        fade_lead: Option<Duration>,
    ) {
        let chars: Vec<char> = text.chars().collect();
        let ticker = (!char_interval.is_zero()).then(|| Timer::new(char_interval, TimerMode::Repeating));
        let revealed = if ticker.is_some() { 0 } else { chars.len() };
        self.run = Some(TypewriterRun {
            chars,
            revealed,
            ticker,
            elapsed: Duration::ZERO,
            visible_for,
            fade_at: fade_lead.map(|lead| visible_for.saturating_sub(lead)),
        });
    }

    pub fn cancel(&mut self) {
        self.run = None;
    }

    /// Advance by `delta`. Returns `true` on the tick the text hides.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        run.elapsed += delta;
        if let Some(ticker) = run.ticker.as_mut() {
            ticker.tick(delta);
            let steps = ticker.times_finished_this_tick() as usize;
            run.revealed = (run.revealed + steps).min(run.chars.len());
        }
        if run.elapsed >= run.visible_for {
            self.run = None;
            return true;
        }
        false
    }

    /// Text revealed so far, or `None` when hidden.
    pub fn visible_text(&self) -> Option<String> {
        self.run
            .as_ref()
            .map(|run| run.chars[..run.revealed].iter().collect())
    }

    /// 1.0 until the fade point, 0.0 after it.
    pub fn opacity(&self) -> f32 {
        match &self.run {
            Some(run) if run.fade_at.is_some_and(|at| run.elapsed >= at) => 0.0,
            Some(_) => 1.0,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_throttles() {
        let mut cooldown = Cooldown::new(Duration::from_millis(4000));
        assert!(cooldown.try_fire(Duration::from_millis(100)));
        assert!(!cooldown.try_fire(Duration::from_millis(3000)));
        assert!(!cooldown.try_fire(Duration::from_millis(4099)));
        assert!(cooldown.try_fire(Duration::from_millis(4100)));
    }

    #[test]
    fn test_auto_hide_restart_extends() {
        let mut hide = AutoHide::default();
        hide.show(Duration::from_millis(100));
        assert!(!hide.tick(Duration::from_millis(80)));
        hide.show(Duration::from_millis(100));
        assert!(!hide.tick(Duration::from_millis(80)));
        assert!(hide.is_visible());
        assert!(hide.tick(Duration::from_millis(30)));
        assert!(!hide.is_visible());
    }

    #[test]
    fn test_typewriter_reveal_and_hide() {
        let mut tw = Typewriter::default();
        tw.start("hola", Duration::from_millis(50), Duration::from_millis(1000), None);
        assert_eq!(tw.visible_text().as_deref(), Some(""));
        tw.tick(Duration::from_millis(120));
        assert_eq!(tw.visible_text().as_deref(), Some("ho"));
        tw.tick(Duration::from_millis(500));
        assert_eq!(tw.visible_text().as_deref(), Some("hola"));
        assert!(tw.tick(Duration::from_millis(400)));
        assert_eq!(tw.visible_text(), None);
    }

    #[test]
    fn test_typewriter_restart_cancels_previous() {
        let mut tw = Typewriter::default();
        tw.start("primero", Duration::from_millis(10), Duration::from_millis(500), None);
        tw.tick(Duration::from_millis(200));
        tw.start("otro", Duration::from_millis(10), Duration::from_millis(500), None);
        assert_eq!(tw.visible_text().as_deref(), Some(""));
        // The first run would have hidden here; the new one keeps going.
        assert!(!tw.tick(Duration::from_millis(350)));
        assert_eq!(tw.visible_text().as_deref(), Some("otro"));
    }

    #[test]
    fn test_typewriter_fade() {
        let mut tw = Typewriter::default();
        tw.start(
            "aviso",
            Duration::from_millis(60),
            Duration::from_millis(6000),
            Some(Duration::from_millis(1500)),
        );
        tw.tick(Duration::from_millis(4400));
        assert_eq!(tw.opacity(), 1.0);
        tw.tick(Duration::from_millis(200));
        assert_eq!(tw.opacity(), 0.0);
        assert!(tw.visible_text().is_some());
    }
}
