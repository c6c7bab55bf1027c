use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use quiz_core::model::{ExperimentAssignment, QuestionBank, UserKey};
use storage::repository::Storage;

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::AppServicesError;
use crate::event_reporter::{
    EventLogReporter, EventReporter, EventSink, FanOutReporter, HttpEventReporter,
    spawn_event_pump,
};
use crate::experiment_service::{AssignmentHandle, ExperimentService};
use crate::identity_service::IdentityService;
use crate::question_bank_service::{LoadedBank, QuestionBankService};
use crate::quiz_controller::QuizController;

/// Assembles app-facing services around one storage backend.
///
/// Must be built inside a tokio runtime: the event pump is spawned here.
#[derive(Clone)]
pub struct AppServices {
    user_key: UserKey,
    questions: Arc<QuestionBankService>,
    experiment: Arc<ExperimentService>,
    events: EventSink,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the user key lookup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: QuizConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, config).await
    }

    /// # Errors
    ///
    /// Returns `AppServicesError` if the user key cannot be read or created.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        config: QuizConfig,
    ) -> Result<Self, AppServicesError> {
        let identity = IdentityService::new(Arc::clone(&storage.identity));
        let user_key = identity.get_or_create().await?;

        let log = EventLogReporter::new(clock, Arc::clone(&storage.events));
        let mut reporter = FanOutReporter::default().with(Arc::new(log));
        if let Some(url) = config.events_url.as_deref() {
            info!("forwarding engagement events to collector");
            let http = HttpEventReporter::new(url, user_key.clone(), clock);
            reporter = reporter.with(Arc::new(http));
        }
        let reporter: Arc<dyn EventReporter> = Arc::new(reporter);
        // Detached: the pump ends once every sink is dropped.
        let (events, _pump) = spawn_event_pump(reporter);

        let experiment = Arc::new(ExperimentService::from_config(
            config.flag_service,
            config.arm_labels,
        ));
        let questions = Arc::new(QuestionBankService::new(config.questions));

        Ok(Self {
            user_key,
            questions,
            experiment,
            events,
        })
    }

    #[must_use]
    pub fn user_key(&self) -> &UserKey {
        &self.user_key
    }

    #[must_use]
    pub fn question_bank_service(&self) -> Arc<QuestionBankService> {
        Arc::clone(&self.questions)
    }

    #[must_use]
    pub fn assignment(&self) -> AssignmentHandle {
        self.experiment.handle()
    }

    #[must_use]
    pub fn events(&self) -> EventSink {
        self.events.clone()
    }

    pub async fn load_questions(&self) -> LoadedBank {
        self.questions.load_or_fallback().await
    }

    /// Resolve the experiment arm in the background.
    #[must_use]
    pub fn spawn_assignment(&self) -> JoinHandle<Option<ExperimentAssignment>> {
        let experiment = Arc::clone(&self.experiment);
        let key = self.user_key.clone();
        tokio::spawn(async move { experiment.resolve(&key).await })
    }

    #[must_use]
    pub fn controller(&self, bank: QuestionBank) -> QuizController {
        QuizController::new(bank, self.assignment(), self.events())
    }
}
