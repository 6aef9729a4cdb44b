//! The long-running loop behind `calendarlight run`.
//!
//! Calendars are fetched once at start and every `CALENDAR_SYNC_PERIOD`
//! after that. The cached events are checked one second past every minute
//! and the lights updated to match.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use busylight::LightManager;
use chrono::{DateTime, Utc};
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::CalendarLightResult;
use crate::event::CalendarEvent;
use crate::schedule::{self, CALENDAR_SYNC_PERIOD, LightCommand};
use crate::source::CalendarSource;
use crate::user_config::CalendarEntry;

/// Where light commands end up.
pub trait LightSink {
    fn apply(&mut self, command: LightCommand) -> CalendarLightResult<()>;

    /// How often the current command must be re-sent, if at all.
    fn keepalive_interval(&self) -> Option<Duration> {
        None
    }
}

impl LightSink for LightManager {
    fn apply(&mut self, command: LightCommand) -> CalendarLightResult<()> {
        LightManager::apply(self, command.color())?;
        Ok(())
    }

    fn keepalive_interval(&self) -> Option<Duration> {
        LightManager::keepalive_interval(self)
    }
}

pub struct Runner<S, L> {
    calendars: Vec<CalendarEntry>,
    source: S,
    lights: L,
    /// Upcoming events by calendar id.
    upcoming: HashMap<String, Vec<CalendarEvent>>,
    last_command: Option<LightCommand>,
}

impl<S: CalendarSource, L: LightSink> Runner<S, L> {
    pub fn new(calendars: Vec<CalendarEntry>, source: S, lights: L) -> Self {
        Runner {
            calendars,
            source,
            lights,
            upcoming: HashMap::new(),
            last_command: None,
        }
    }

    pub fn lights(&self) -> &L {
        &self.lights
    }

    /// Cached events, in configured calendar order.
    pub fn upcoming_events(&self) -> Vec<CalendarEvent> {
        self.calendars
            .iter()
            .filter_map(|c| self.upcoming.get(&c.id))
            .flatten()
            .cloned()
            .collect()
    }

    /// Refresh the event cache from every configured calendar.
    ///
    /// A calendar that fails keeps its previously cached events. The first
    /// failure is returned once every calendar has been tried.
    pub async fn fetch_calendar_events(&mut self, now: DateTime<Utc>) -> CalendarLightResult<()> {
        tracing::info!("Fetching events from configured calendars");
        let mut first_error = None;

        for calendar in &self.calendars {
            tracing::debug!("Fetching events for: {}", calendar);
            match self.source.upcoming_events(&calendar.id, now).await {
                Ok(events) => {
                    tracing::debug!("{} upcoming event(s) in {}", events.len(), calendar);
                    self.upcoming.insert(calendar.id.clone(), events);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch events for {}: {}", calendar, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Update the lights for `now` and return how long to wait until the
    /// next check.
    pub fn execute_schedule(&mut self, now: DateTime<Utc>) -> Duration {
        tracing::debug!("Executing schedule");
        let events = self.upcoming_events();
        let command = schedule::resolve(&events, &self.calendars, now);
        self.send(command);

        let (next, wait) = schedule::next_tick(now);
        tracing::debug!("Next schedule execution at: {}", next);
        wait
    }

    fn send(&mut self, command: LightCommand) {
        if self.last_command != Some(command) {
            tracing::info!("Light: {:?}", command);
        }
        if let Err(e) = self.lights.apply(command) {
            tracing::warn!("Failed to update lights: {}", e);
        }
        self.last_command = Some(command);
    }

    /// Run until `shutdown` completes, then switch the lights off.
    ///
    /// Only the initial fetch can fail; later sync and light errors are
    /// logged and retried on the next tick.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> CalendarLightResult<()> {
        if self.calendars.is_empty() {
            tracing::warn!("No calendars configured. The light will stay off");
        }

        self.fetch_calendar_events(Utc::now()).await?;

        let mut sync = tokio::time::interval_at(Instant::now() + CALENDAR_SYNC_PERIOD, CALENDAR_SYNC_PERIOD);
        sync.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let keepalive_period = self.lights.keepalive_interval();
        let period = keepalive_period.unwrap_or(CALENDAR_SYNC_PERIOD);
        let mut keepalive = tokio::time::interval_at(Instant::now() + period, period);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        let mut next_run = Instant::now() + self.execute_schedule(Utc::now());

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutting down, turning lights off");
                    self.send(LightCommand::Off);
                    return Ok(());
                }
                _ = tokio::time::sleep_until(next_run) => {
                    next_run = Instant::now() + self.execute_schedule(Utc::now());
                }
                _ = sync.tick() => {
                    if let Err(e) = self.fetch_calendar_events(Utc::now()).await {
                        tracing::warn!("Calendar sync failed, keeping cached events: {}", e);
                    }
                }
                _ = keepalive.tick(), if keepalive_period.is_some() => {
                    if let Some(command) = self.last_command {
                        if let Err(e) = self.lights.apply(command) {
                            tracing::warn!("Keepalive failed: {}", e);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use busylight::Rgb;
    use chrono::TimeZone;

    use super::*;
    use crate::error::CalendarLightError;
    use crate::event::CalendarInfo;

    /// Clones share their events, so a test can change them mid-run.
    #[derive(Default, Clone)]
    struct FakeSource {
        events: Arc<Mutex<HashMap<String, Result<Vec<CalendarEvent>, String>>>>,
    }

    impl FakeSource {
        fn set(&self, calendar_id: &str, events: Result<Vec<CalendarEvent>, String>) {
            self.events
                .lock()
                .unwrap()
                .insert(calendar_id.to_string(), events);
        }
    }

    #[async_trait]
    impl CalendarSource for FakeSource {
        async fn list_calendars(&self) -> CalendarLightResult<Vec<CalendarInfo>> {
            Ok(vec![])
        }

        async fn upcoming_events(
            &self,
            calendar_id: &str,
            _now: DateTime<Utc>,
        ) -> CalendarLightResult<Vec<CalendarEvent>> {
            match self.events.lock().unwrap().get(calendar_id) {
                Some(Ok(events)) => Ok(events.clone()),
                Some(Err(message)) => Err(CalendarLightError::Calendar(message.clone())),
                None => Ok(vec![]),
            }
        }
    }

    #[derive(Default)]
    struct FakeSink {
        commands: Vec<LightCommand>,
        keepalive: Option<Duration>,
    }

    impl LightSink for FakeSink {
        fn apply(&mut self, command: LightCommand) -> CalendarLightResult<()> {
            self.commands.push(command);
            Ok(())
        }

        fn keepalive_interval(&self) -> Option<Duration> {
            self.keepalive
        }
    }

    fn event(calendar: &str, start: DateTime<Utc>, end: DateTime<Utc>, description: &str) -> CalendarEvent {
        CalendarEvent {
            id: format!("{calendar}-event"),
            calendar_id: calendar.into(),
            summary: Some("Focus".into()),
            description: Some(description.into()),
            start: Some(start),
            end: Some(end),
        }
    }

    fn calendars() -> Vec<CalendarEntry> {
        vec![CalendarEntry::new("work", "Work"), CalendarEntry::new("home", "Home")]
    }

    #[tokio::test]
    async fn fetch_keeps_cache_of_failing_calendar() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let source = FakeSource::default();
        source.set("work", Ok(vec![event("work", now, now, "color: blue")]));
        source.set("home", Ok(vec![event("home", now, now, "color: green")]));

        let mut runner = Runner::new(calendars(), source, FakeSink::default());
        runner.fetch_calendar_events(now).await.unwrap();
        assert_eq!(runner.upcoming_events().len(), 2);

        runner.source.set("home", Err("boom".into()));
        runner.source.set("work", Ok(vec![]));
        let result = runner.fetch_calendar_events(now).await;

        assert!(matches!(result, Err(CalendarLightError::Calendar(m)) if m == "boom"));
        let cached = runner.upcoming_events();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].calendar_id, "home");
    }

    #[tokio::test]
    async fn execute_schedule_drives_lights() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 20).unwrap();
        let source = FakeSource::default();
        source.set(
            "work",
            Ok(vec![event(
                "work",
                now - chrono::Duration::minutes(5),
                now + chrono::Duration::minutes(25),
                "color: blue",
            )]),
        );

        let mut runner = Runner::new(calendars(), source, FakeSink::default());
        runner.fetch_calendar_events(now).await.unwrap();

        let wait = runner.execute_schedule(now);
        assert_eq!(wait, Duration::from_secs(41));

        let wait = runner.execute_schedule(now + chrono::Duration::hours(1));
        assert_eq!(wait, Duration::from_secs(41));

        assert_eq!(
            runner.lights().commands,
            vec![LightCommand::On(Rgb::new(0, 0, 255)), LightCommand::Off]
        );
    }

    #[tokio::test]
    async fn run_fails_when_initial_fetch_fails() {
        let source = FakeSource::default();
        source.set("work", Err("not logged in".into()));

        let mut runner = Runner::new(calendars(), source, FakeSink::default());
        let result = runner.run(std::future::pending()).await;

        assert!(result.is_err());
        assert!(runner.lights().commands.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn run_updates_lights_until_shutdown() {
        let now = Utc::now();
        let source = FakeSource::default();
        source.set(
            "work",
            Ok(vec![event(
                "work",
                now - chrono::Duration::hours(1),
                now + chrono::Duration::hours(1),
                "color: yellow",
            )]),
        );

        let sink = FakeSink {
            keepalive: Some(Duration::from_secs(10)),
            ..Default::default()
        };
        let mut runner = Runner::new(calendars(), source, sink);

        runner
            .run(tokio::time::sleep(Duration::from_secs(150)))
            .await
            .unwrap();

        let commands = &runner.lights().commands;
        let yellow = LightCommand::On(Rgb::new(255, 255, 0));

        assert_eq!(commands.first(), Some(&yellow));
        assert_eq!(commands.last(), Some(&LightCommand::Off));
        // Schedule ticks plus keepalives every 10s.
        assert!(commands.len() > 10);
        assert!(commands[..commands.len() - 1].iter().all(|c| *c == yellow));
    }

    /// Records when (since `start`) each command arrived.
    struct TimedSink {
        start: Instant,
        commands: Vec<(Duration, LightCommand)>,
    }

    impl TimedSink {
        fn new() -> Self {
            TimedSink {
                start: Instant::now(),
                commands: Vec::new(),
            }
        }
    }

    impl LightSink for TimedSink {
        fn apply(&mut self, command: LightCommand) -> CalendarLightResult<()> {
            self.commands.push((self.start.elapsed(), command));
            Ok(())
        }
    }

    fn all_morning(calendar: &str, description: &str) -> CalendarEvent {
        let now = Utc::now();
        event(
            calendar,
            now - chrono::Duration::hours(2),
            now + chrono::Duration::hours(2),
            description,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn sync_tick_picks_up_changed_events() {
        let source = FakeSource::default();
        source.set("work", Ok(vec![all_morning("work", "color: yellow")]));

        let handle = source.clone();
        let shutdown = async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            handle.set("work", Ok(vec![all_morning("work", "color: blue")]));
            tokio::time::sleep(Duration::from_secs(20 * 60)).await;
        };

        let mut runner = Runner::new(calendars(), source, TimedSink::new());
        runner.run(shutdown).await.unwrap();

        let yellow = LightCommand::On(Rgb::new(255, 255, 0));
        let blue = LightCommand::On(Rgb::new(0, 0, 255));
        let commands = &runner.lights().commands;

        assert!(
            commands
                .iter()
                .filter(|(at, _)| *at < CALENDAR_SYNC_PERIOD)
                .all(|(_, c)| *c == yellow)
        );

        let first_blue = commands.iter().find(|(_, c)| *c == blue).map(|(at, _)| *at);
        assert!(first_blue.is_some_and(|at| at >= CALENDAR_SYNC_PERIOD));
        assert_eq!(commands.last().map(|(_, c)| *c), Some(LightCommand::Off));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_sync_keeps_showing_cached_events() {
        let source = FakeSource::default();
        source.set("work", Ok(vec![all_morning("work", "color: yellow")]));

        let handle = source.clone();
        let shutdown = async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            handle.set("work", Err("offline".into()));
            tokio::time::sleep(Duration::from_secs(20 * 60)).await;
        };

        let mut runner = Runner::new(calendars(), source, TimedSink::new());
        runner.run(shutdown).await.unwrap();

        let yellow = LightCommand::On(Rgb::new(255, 255, 0));
        let (last, rest) = runner.lights().commands.split_last().unwrap();

        assert_eq!(last.1, LightCommand::Off);
        assert!(rest.iter().all(|(_, c)| *c == yellow));
        assert!(rest.iter().any(|(at, _)| *at > CALENDAR_SYNC_PERIOD));
        assert_eq!(runner.upcoming_events().len(), 1);
    }
}
