pub mod cli_consts {
    //! Client Configuration Constants
    //!
    //! This module contains all configuration constants for the client,
    //! organized by functional area for clarity and maintainability.

    // =============================================================================
    // EVENT CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered activity events between screens and the UI loop
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // TABLE CONFIGURATION
    // =============================================================================

    /// List tables and their interaction timing
    pub mod table {
        use std::time::Duration;

        /// Rows per page for every list table
        pub const PAGE_SIZE: usize = 5;

        /// Quiet period after the last keystroke before a search is applied (milliseconds)
        pub const SEARCH_DEBOUNCE_MS: u64 = 500;

        /// Helper function to get the search debounce delay
        pub const fn search_debounce() -> Duration {
            Duration::from_millis(SEARCH_DEBOUNCE_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client configuration
    pub mod http {
        use std::time::Duration;

        /// TCP connect timeout (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Whole-request timeout (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        /// Multipart field name the upload endpoint reads the file from
        pub const UPLOAD_FIELD: &str = "archivo";

        /// Server messages longer than this are replaced by a generic one
        pub const MAX_INLINE_MESSAGE_LEN: usize = 200;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // TAX CONFIGURATION
    // =============================================================================

    /// Peruvian general sales tax
    pub mod tax {
        use rust_decimal::Decimal;

        /// IGV rate (18%)
        pub fn igv_rate() -> Decimal {
            Decimal::new(18, 2)
        }

        /// Decimal places kept on derived amounts
        pub const MONEY_SCALE: u32 = 2;
    }

    // =============================================================================
    // FILES
    // =============================================================================

    /// Directory (under $HOME) the client keeps its session file in
    pub const CONFIG_DIR: &str = ".contadesk";

    /// Session file name
    pub const CONFIG_FILE: &str = "config.json";

    /// Directory (under $HOME) downloaded reports are written to
    pub const REPORTS_DIR: &str = "contadesk-reportes";
}
