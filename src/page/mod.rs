//! Page-context operations.
//!
//! The scanner and the filler never run in this process. They are
//! JavaScript function declarations handed to a [`PageHost`], which runs
//! them inside the target tab. Arguments and results cross that boundary
//! as plain JSON only.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `scanner` | Read-only form enumeration |
//! | `filler` | Fill plans and value application |
//! | `scripts` | Page-context function declarations |

// ============================================================================
// Submodules
// ============================================================================

/// Fill plans and value application.
pub mod filler;

/// Read-only form enumeration.
pub mod scanner;

/// Page-context function declarations.
pub mod scripts;

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::identifiers::TabId;

// ============================================================================
// Re-exports
// ============================================================================

pub use filler::{FieldWrite, FillPlan, FillReport, FillStep, MatchRule, Resolution, fill};
pub use scanner::{scan, scan_active};

// ============================================================================
// PageHost
// ============================================================================

/// The active tab of the current window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTab {
    /// Tab identifier for targeted script execution.
    pub tab_id: TabId,
    /// Page URL, if the host could report one.
    pub url: Option<Url>,
}

/// Browser capabilities the workflow depends on.
#[async_trait]
pub trait PageHost: Send + Sync {
    /// Returns the active tab of the current window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TabUnavailable`](crate::Error::TabUnavailable) if
    /// there is none.
    async fn active_tab(&self) -> Result<ActiveTab>;

    /// Runs `function_declaration` in the tab's page context with `args`
    /// and returns its result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InjectionFailed`](crate::Error::InjectionFailed) if
    /// the function cannot run.
    async fn call_function(
        &self,
        tab_id: TabId,
        function_declaration: &str,
        args: Vec<Value>,
    ) -> Result<Value>;
}

// ============================================================================
// Test Support
// ============================================================================

#[cfg(test)]
pub(crate) mod mock {
    use parking_lot::Mutex;

    use super::*;
    use crate::error::Error;

    /// A recorded `call_function` invocation.
    #[derive(Debug, Clone)]
    pub(crate) struct Call {
        pub(crate) function: String,
        pub(crate) args: Vec<Value>,
    }

    /// Scripted host: answers scans and fills with canned values.
    #[derive(Default)]
    pub(crate) struct MockHost {
        pub(crate) tab: Option<u32>,
        pub(crate) scan_result: Value,
        pub(crate) fill_result: Value,
        pub(crate) fail_with: Option<String>,
        pub(crate) calls: Mutex<Vec<Call>>,
    }

    impl MockHost {
        pub(crate) fn with_scan(scan_result: Value) -> Self {
            Self {
                tab: Some(3),
                scan_result,
                fill_result: serde_json::json!({ "formFound": true, "filled": [], "skipped": [] }),
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl PageHost for MockHost {
        async fn active_tab(&self) -> Result<ActiveTab> {
            let tab_id = self.tab.and_then(TabId::new).ok_or(Error::TabUnavailable)?;
            Ok(ActiveTab {
                tab_id,
                url: Url::parse("https://example.com/signup").ok(),
            })
        }

        async fn call_function(
            &self,
            _tab_id: TabId,
            function_declaration: &str,
            args: Vec<Value>,
        ) -> Result<Value> {
            self.calls.lock().push(Call {
                function: function_declaration.to_string(),
                args: args.clone(),
            });

            if let Some(message) = &self.fail_with {
                return Err(Error::injection_failed(message.clone()));
            }

            if function_declaration == scripts::SCAN_FORMS {
                Ok(self.scan_result.clone())
            } else {
                Ok(self.fill_result.clone())
            }
        }
    }
}
