//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for `cfg(test)` and behind the `test-support` feature.

pub mod clock {
    //! Controllable wall clock.

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    /// Clock that only moves when told to.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock_clock() += TimeDelta::seconds(seconds);
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod directory {
    //! Scripted driven-port doubles for the registration pipeline.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::ProvisionedAccount;
    use crate::domain::StudentId;
    use crate::domain::ports::{
        CreatedDirectoryAccount, DirectoryProvider, DirectoryProviderError,
        StudentIdAllocationError, StudentIdAllocator,
    };

    /// What the directory double saw, minus the password.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedAccount {
        pub primary_email: String,
        pub given_name: String,
        pub family_name: String,
        pub recovery_email: Option<String>,
        pub student_id: String,
    }

    /// Directory double that answers every call with the same scripted result.
    pub struct ScriptedDirectoryProvider {
        outcome: Result<CreatedDirectoryAccount, DirectoryProviderError>,
        calls: Mutex<Vec<RecordedAccount>>,
    }

    impl ScriptedDirectoryProvider {
        /// Accept every account and echo its address back.
        pub fn accepting() -> Self {
            Self::answering(Ok(CreatedDirectoryAccount {
                primary_email: None,
            }))
        }

        /// Fail every call with `error`.
        pub fn failing(error: DirectoryProviderError) -> Self {
            Self::answering(Err(error))
        }

        /// Answer every call with `outcome`. A success with no address echoes
        /// the requested one.
        pub fn answering(outcome: Result<CreatedDirectoryAccount, DirectoryProviderError>) -> Self {
            Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Accounts received so far, in call order.
        pub fn calls(&self) -> Vec<RecordedAccount> {
            match self.calls.lock() {
                Ok(calls) => calls.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            }
        }
    }

    #[async_trait]
    impl DirectoryProvider for ScriptedDirectoryProvider {
        async fn create_account(
            &self,
            account: &ProvisionedAccount,
        ) -> Result<CreatedDirectoryAccount, DirectoryProviderError> {
            let record = RecordedAccount {
                primary_email: account.primary_email().to_string(),
                given_name: account.name().given_name.clone(),
                family_name: account.name().family_name.clone(),
                recovery_email: account.recovery_email().map(str::to_owned),
                student_id: account.student_id().to_string(),
            };
            match self.calls.lock() {
                Ok(mut calls) => calls.push(record),
                Err(poisoned) => poisoned.into_inner().push(record),
            }
            match &self.outcome {
                Ok(CreatedDirectoryAccount {
                    primary_email: None,
                }) => Ok(CreatedDirectoryAccount {
                    primary_email: Some(account.primary_email().to_string()),
                }),
                other => other.clone(),
            }
        }
    }

    /// Allocator that always hands out the same identifier.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedStudentIdAllocator(pub StudentId);

    #[async_trait]
    impl StudentIdAllocator for FixedStudentIdAllocator {
        async fn allocate(&self) -> Result<StudentId, StudentIdAllocationError> {
            Ok(self.0)
        }
    }
}
