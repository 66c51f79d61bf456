use autokit_core::{CoreError, ErrorExt, PostingSchedule};
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime};
use std::future::Future;
use tracing::{debug, info};

/// How often the cooperative loop wakes up to check for due triggers.
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// Next local wall-clock occurrence of `time_of_day` strictly after `now`.
///
/// Wall-clock (naive local) time throughout: triggers mean "09:00 on the
/// kitchen clock", the same reading the posting schedule was written in.
pub fn next_occurrence(now: NaiveDateTime, time_of_day: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(time_of_day);
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

/// One daily trigger: a time of day plus the next moment it fires.
#[derive(Debug, Clone)]
pub struct DailyTrigger {
    time_of_day: NaiveTime,
    next_fire: NaiveDateTime,
}

impl DailyTrigger {
    fn new(time_of_day: NaiveTime, now: NaiveDateTime) -> Self {
        Self {
            time_of_day,
            next_fire: next_occurrence(now, time_of_day),
        }
    }

    fn is_due(&self, now: NaiveDateTime) -> bool {
        self.next_fire <= now
    }

    fn advance(&mut self) {
        self.next_fire = self.next_fire + ChronoDuration::days(1);
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.time_of_day
    }

    pub fn next_fire(&self) -> NaiveDateTime {
        self.next_fire
    }
}

/// Fires a job once per day at each configured time.
///
/// Single-tasked and cooperative: the loop sleeps, collects due triggers,
/// and runs them sequentially in the same iteration. There is no catch-up —
/// triggers are seeded from "now", so a time already past today first fires
/// tomorrow, and nothing is remembered across restarts.
#[derive(Debug)]
pub struct PostScheduler {
    triggers: Vec<DailyTrigger>,
}

impl PostScheduler {
    pub fn new(schedule: &PostingSchedule) -> Self {
        Self::with_start(schedule, Local::now().naive_local())
    }

    /// Seed triggers from an explicit "now". Tests drive this directly.
    pub fn with_start(schedule: &PostingSchedule, now: NaiveDateTime) -> Self {
        let triggers = schedule
            .times()
            .iter()
            .map(|&time| DailyTrigger::new(time, now))
            .collect();
        Self { triggers }
    }

    pub fn triggers(&self) -> &[DailyTrigger] {
        &self.triggers
    }

    /// Run every due trigger sequentially and advance each by one day.
    ///
    /// A failing job is logged and swallowed; it never stops the loop and
    /// the trigger still moves to tomorrow (that slot is spent either way).
    pub async fn run_due<F, Fut>(&mut self, job: &mut F, now: NaiveDateTime) -> usize
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), CoreError>>,
    {
        let mut fired = 0;
        for trigger in &mut self.triggers {
            if !trigger.is_due(now) {
                continue;
            }

            info!("Trigger {} is due", trigger.time_of_day);
            match job().await {
                Ok(()) => debug!("Scheduled job completed"),
                Err(e) => {
                    e.log_error();
                }
            }
            trigger.advance();
            fired += 1;
        }
        fired
    }

    /// The cooperative loop: wake every 60 seconds, run whatever is due.
    pub async fn run<F, Fut>(&mut self, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), CoreError>>,
    {
        let times: Vec<String> = self
            .triggers
            .iter()
            .map(|t| t.time_of_day.format("%H:%M").to_string())
            .collect();
        info!("Scheduler started. Will post at {}", times.join(", "));

        let mut interval = tokio::time::interval(POLL_INTERVAL);
        // The first tick completes immediately; skip it so the loop starts
        // with a full sleep like the original.
        interval.tick().await;

        loop {
            interval.tick().await;
            let fired = self.run_due(&mut job, Local::now().naive_local()).await;
            if fired > 0 {
                debug!("Executed {} trigger(s) this iteration", fired);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autokit_core::LlmError;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_next_occurrence_later_today() {
        let next = next_occurrence(at(8, 0), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(next, at(9, 0));
    }

    #[test]
    fn test_next_occurrence_rolls_to_tomorrow() {
        let next = next_occurrence(at(10, 0), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(next, at(9, 0) + ChronoDuration::days(1));
    }

    #[test]
    fn test_trigger_at_exactly_now_rolls_forward() {
        // Seeding at 09:00 sharp must not fire immediately; there is no
        // catch-up for the moment the process starts.
        let next = next_occurrence(at(9, 0), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(next, at(9, 0) + ChronoDuration::days(1));
    }

    #[tokio::test]
    async fn test_due_triggers_fire_and_advance() {
        let schedule = PostingSchedule::parse(["09:00", "12:00"]).unwrap();
        let mut scheduler = PostScheduler::with_start(&schedule, at(8, 0));

        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let mut job = move || {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        };

        // 08:30: nothing due yet.
        assert_eq!(scheduler.run_due(&mut job, at(8, 30)).await, 0);

        // 09:05: the 09:00 trigger fires once and moves to tomorrow.
        assert_eq!(scheduler.run_due(&mut job, at(9, 5)).await, 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(
            scheduler.triggers()[0].next_fire(),
            at(9, 0) + ChronoDuration::days(1)
        );

        // 09:06: same trigger does not fire again today.
        assert_eq!(scheduler.run_due(&mut job, at(9, 6)).await, 0);

        // 12:00 sharp is due (fire time <= now).
        assert_eq!(scheduler.run_due(&mut job, at(12, 0)).await, 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_simultaneous_triggers_run_sequentially_in_one_iteration() {
        let schedule = PostingSchedule::parse(["09:00", "09:00", "09:30"]).unwrap();
        let mut scheduler = PostScheduler::with_start(&schedule, at(8, 0));

        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let mut job = move || {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        };

        // A poll at 09:45 owes all three triggers; they run in one pass.
        assert_eq!(scheduler.run_due(&mut job, at(9, 45)).await, 3);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_job_failure_is_swallowed_and_trigger_still_advances() {
        let schedule = PostingSchedule::parse(["09:00"]).unwrap();
        let mut scheduler = PostScheduler::with_start(&schedule, at(8, 0));

        let mut job = || async {
            Err(CoreError::Llm(LlmError::ServiceUnavailable {
                provider: "OpenAI".to_string(),
            }))
        };

        // The failure is logged, not propagated; the slot is spent.
        assert_eq!(scheduler.run_due(&mut job, at(9, 1)).await, 1);
        assert_eq!(
            scheduler.triggers()[0].next_fire(),
            at(9, 0) + ChronoDuration::days(1)
        );
    }

    #[test]
    fn test_past_times_seed_for_tomorrow() {
        let schedule = PostingSchedule::parse(["09:00"]).unwrap();
        let scheduler = PostScheduler::with_start(&schedule, at(15, 0));

        // Started at 15:00: today's 09:00 slot is silently skipped.
        assert_eq!(
            scheduler.triggers()[0].next_fire(),
            at(9, 0) + ChronoDuration::days(1)
        );
    }
}
