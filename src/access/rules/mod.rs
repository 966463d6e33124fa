pub mod delay_between_attempts;
pub mod ip_address;
pub mod num_attempts;
pub mod open_close_date;
pub mod password;
pub mod time_limit;

pub use delay_between_attempts::DelayBetweenAttemptsRule;
pub use ip_address::IpAddressRule;
pub use num_attempts::NumAttemptsRule;
pub use open_close_date::OpenCloseDateRule;
pub use password::PasswordRule;
pub use time_limit::TimeLimitRule;
