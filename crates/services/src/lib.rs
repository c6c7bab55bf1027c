#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod event_reporter;
pub mod experiment_service;
pub mod identity_service;
pub mod question_bank_service;
pub mod quiz_controller;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use config::{FlagServiceConfig, QuestionSource, QuizConfig};
pub use error::{AppServicesError, AssignmentError, QuestionSourceError, ReportError};
pub use event_reporter::{
    EventLogReporter, EventReporter, EventSink, FanOutReporter, HttpEventReporter,
    run_event_pump, spawn_event_pump,
};
pub use experiment_service::{
    AssignmentHandle, AssignmentProvider, ExperimentService, FixedAssignmentProvider,
    HttpAssignmentProvider,
};
pub use identity_service::IdentityService;
pub use question_bank_service::{LoadedBank, QuestionBankService};
pub use quiz_controller::QuizController;
