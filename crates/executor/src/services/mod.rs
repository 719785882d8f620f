pub mod analysis_service;
pub mod decision_service;
pub mod telegram_service;

pub use analysis_service::AnalysisService;
pub use decision_service::DecisionService;
pub use telegram_service::TelegramService;
