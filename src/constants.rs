//! # System Constants
//!
//! Step names, wire-level response bodies and ledger column headers that define
//! the externally visible contract of the gateway.

/// Names of the pipeline steps, as reported in `PipelineResult::failed_step`
/// and in operator notifications
pub mod steps {
    pub const CREATE_CUSTOMER: &str = "create_customer";
    pub const CREATE_SUBSCRIPTION: &str = "create_subscription";
    pub const APPEND_LEDGER_ROW: &str = "append_ledger_row";
    pub const FIND_ORG_MEMBER: &str = "find_org_member";
    pub const INVITE_ORG_MEMBER: &str = "invite_org_member";

    /// Steps that belong to the payment stage of the membership workflow
    pub const PAYMENT_STAGE: &[&str] = &[CREATE_CUSTOMER, CREATE_SUBSCRIPTION];
}

/// Human-readable workflow labels used in notifications and logs
pub mod workflows {
    pub const MEMBERSHIP: &str = "Membership";
    pub const ORG_INVITE: &str = "GitHub organization invite";
}

/// Plain-text response bodies returned to HTTP callers
pub mod responses {
    pub const PAYMENT_SUCCESS: &str = "payment_success";
    pub const PAYMENT_ERROR: &str = "payment_error";
    pub const MEMBERSHIP_STORAGE_ERROR: &str = "membership_storage_error";
    pub const INVALID_EMAIL: &str = "Invalid email";
    pub const GITHUB_USER_NOT_FOUND: &str = "github_user_not_found";
    pub const GITHUB_INVITE_ERROR: &str = "github_invite_error";
}

/// Header row of the membership ledger worksheet
pub mod ledger_columns {
    pub const FEE_PAID_ON: &str = "jäsenmaksu";
    pub const STREET_ADDRESS: &str = "katuosoite";
    pub const FULL_NAME: &str = "koko nimi";
    pub const JOINED_ON: &str = "liittymispäivä";
    pub const ADDED_BY: &str = "lisääjä";
    pub const CITY: &str = "paikkakunta";
    pub const POSTCODE: &str = "postinumero";
    pub const CHAT_HANDLE: &str = "slack";
    pub const EMAIL: &str = "sähköposti";

    pub const ALL: &[&str] = &[
        FEE_PAID_ON,
        STREET_ADDRESS,
        FULL_NAME,
        JOINED_ON,
        ADDED_BY,
        CITY,
        POSTCODE,
        CHAT_HANDLE,
        EMAIL,
    ];

    /// Columns written as literal text
    pub const TEXT: &[&str] = &[POSTCODE];

    /// Date format used for every date column
    pub const DATE_FORMAT: &str = "%d.%m.%Y";
}

/// Environment variables read outside of the layered configuration
pub mod env {
    pub const ENVIRONMENT: &str = "MEMBERSHIP_ENV";
    pub const CONFIG_DIR: &str = "MEMBERSHIP_CONFIG_DIR";
    pub const LOG_FORMAT: &str = "MEMBERSHIP_LOG_FORMAT";
    pub const CONFIG_PREFIX: &str = "MEMBERSHIP";
}
