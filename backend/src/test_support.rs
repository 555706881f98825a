//! Test utilities for the foodgram crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for `cfg(test)` and behind the `test-support` feature.

pub mod clock {
    //! Deterministic clocks for services that stamp `created_at`.

    use std::sync::{Mutex, MutexGuard, PoisonError};

    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use mockable::Clock;

    /// Fixed instant used as the default starting point in tests.
    pub fn fixture_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Clock that returns its current instant, then moves forward one step.
    ///
    /// Successive reads are strictly increasing, which keeps newest-first
    /// ordering deterministic.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: TimeDelta,
    }

    impl SteppingClock {
        /// Start at `start` and advance by `step` after each read.
        pub fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }

        /// Clock that never advances.
        pub fn frozen(at: DateTime<Utc>) -> Self {
            Self::new(at, TimeDelta::zero())
        }

        fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
            self.next.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl Default for SteppingClock {
        fn default() -> Self {
            Self::new(fixture_timestamp(), TimeDelta::seconds(1))
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let mut next = self.lock();
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use rstest::rstest;

        #[rstest]
        fn stepping_clock_advances_after_each_read() {
            let clock = SteppingClock::default();
            let first = clock.utc();
            let second = clock.utc();
            assert_eq!(second - first, TimeDelta::seconds(1));
        }

        #[rstest]
        fn frozen_clock_repeats() {
            let clock = SteppingClock::frozen(fixture_timestamp());
            assert_eq!(clock.utc(), clock.utc());
        }
    }
}

pub mod seed {
    //! Helpers that populate repositories with valid rows.

    use crate::domain::ports::{IngredientRepository, UserRepository};
    use crate::domain::{Ingredient, IngredientDraft, User, UserId, Username};

    /// Insert a user with a random id and return the id.
    ///
    /// # Panics
    /// Panics when the username is invalid or the insert fails.
    pub async fn user<R: UserRepository + ?Sized>(repo: &R, username: &str) -> UserId {
        let username = match Username::new(username) {
            Ok(username) => username,
            Err(error) => panic!("invalid seed username {username}: {error}"),
        };
        let user = User::new(UserId::random(), username);
        if let Err(error) = repo.insert(&user).await {
            panic!("seed user insert failed: {error}");
        }
        user.id().clone()
    }

    /// Insert an ingredient and return the stored row.
    ///
    /// # Panics
    /// Panics when the draft is invalid or the insert fails.
    pub async fn ingredient<R: IngredientRepository + ?Sized>(
        repo: &R,
        name: &str,
        unit: &str,
    ) -> Ingredient {
        let draft = match IngredientDraft::try_new(name, unit) {
            Ok(draft) => draft,
            Err(error) => panic!("invalid seed ingredient {name} ({unit}): {error}"),
        };
        match repo.insert(&draft).await {
            Ok(ingredient) => ingredient,
            Err(error) => panic!("seed ingredient insert failed: {error}"),
        }
    }
}
