//! Session, preference and moderation models for admin.

pub mod flash;
pub mod preferences;
pub mod report;
pub mod session;

pub use flash::{Flash, FlashLevel, push_flash, take_flashes};
pub use preferences::UiPreferences;
pub use report::{Report, ReportFilter, ReportQueue};
pub use session::AdminSession;
pub use session::keys as session_keys;
