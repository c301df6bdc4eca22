pub const APP_TITLE: &str = "Mini App";
pub const USER_LABEL: &str = "User:";
pub const NO_USER_BADGE: &str = "no data";
pub const BUSY_TEXT: &str = "Working on it...";

pub const TAB_GENERATE: &str = "Generate";
pub const TAB_HISTORY: &str = "History";
pub const TAB_BILLING: &str = "Billing";

pub const GENERATE_HEADING: &str = "Content generation";
pub const OUTPUT_HINT: &str = "Response (raw JSON for now):";
pub const HISTORY_HEADING: &str = "Generation history";
pub const BILLING_HEADING: &str = "Billing and plans";
pub const BILLING_HINT: &str = "A product showcase will live here. For now these are stub buttons.";
pub const BILLING_FOOTER: &str =
    "Requires backend endpoint POST /payments/create -> { url } and provider webhooks.";

pub const RULE: &str = "----------------------------------------";
